//! Client constants.
//!
//! This module contains constant values used throughout the client layer.

/// Header carrying the auth token on every authenticated request.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Fallback error message when the server supplied no status text
/// (transport failures, undecodable responses).
pub const SERVER_ERROR: &str = "Server Error";

/// Confirmation shown before the account-delete request is issued.
pub const DELETE_ACCOUNT_PROMPT: &str = "Are you sure? This can NOT be undone!";

/// Routes the client navigates to imperatively.
pub mod routes {
    /// Post-submit landing route.
    pub const HOME: &str = "/home";
}

/// REST endpoints, relative to the configured API base.
pub mod endpoints {
    /// Profile collection (list all / create-or-update / delete account).
    pub const PROFILES: &str = "/profiles";

    /// Current user's profile.
    pub const PROFILE_ME: &str = "/profiles/me";

    /// Profile image upload (multipart).
    pub const PROFILE_UPLOAD: &str = "/profiles/upload";

    /// Experience sub-resource (add).
    pub const EXPERIENCE: &str = "/profiles/experience";

    /// Education sub-resource (add).
    pub const EDUCATION: &str = "/profiles/education";

    /// Registration.
    pub const REGISTER: &str = "/users/register";

    /// Login.
    pub const LOGIN: &str = "/users/login";

    /// Current authenticated user.
    pub const USER_ME: &str = "/users/me";

    /// Post collection (list / create).
    pub const POSTS: &str = "/posts";

    /// Profile of a given user.
    #[must_use]
    pub fn profile_by_user(user_id: &str) -> String {
        format!("/profiles/user/{user_id}")
    }

    /// Experience entry by id (delete).
    #[must_use]
    pub fn experience(id: &str) -> String {
        format!("/profiles/experience/{id}")
    }

    /// Education entry by id (delete).
    #[must_use]
    pub fn education(id: &str) -> String {
        format!("/profiles/education/{id}")
    }

    /// Post by id (fetch / delete).
    #[must_use]
    pub fn post(id: &str) -> String {
        format!("/posts/{id}")
    }

    /// Like a post.
    #[must_use]
    pub fn like(id: &str) -> String {
        format!("/posts/like/{id}")
    }

    /// Remove a like from a post.
    #[must_use]
    pub fn unlike(id: &str) -> String {
        format!("/posts/unlike/{id}")
    }

    /// Comment on a post.
    #[must_use]
    pub fn comment(post_id: &str) -> String {
        format!("/posts/comment/{post_id}")
    }

    /// A single comment on a post (delete).
    #[must_use]
    pub fn comment_item(post_id: &str, comment_id: &str) -> String {
        format!("/posts/comment/{post_id}/{comment_id}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameterized_endpoints() {
        assert_eq!(endpoints::profile_by_user("abc"), "/profiles/user/abc");
        assert_eq!(endpoints::experience("1"), "/profiles/experience/1");
        assert_eq!(endpoints::comment_item("p1", "c2"), "/posts/comment/p1/c2");
    }

    #[test]
    fn test_header_constant() {
        assert_eq!(AUTH_HEADER, "x-auth-token");
    }
}

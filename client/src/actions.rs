//! Application actions.
//!
//! Actions are the only way to communicate with the store. Each slice owns
//! an action enum split into **commands** (user intent, reduced into an
//! async request effect) and **events** (settled results, reduced into
//! state transitions). The root [`AppAction`] wraps them all, so an effect
//! settling in one slice can dispatch into another (a profile failure
//! showing alerts) without any reducer reaching across slices.

use crate::constants::routes;
use crate::error::ErrorInfo;
use crate::state::{
    Comment, CommentForm, EducationForm, ExperienceForm, Like, LoginForm, Post, PostForm,
    Profile, ProfileForm, ProfileImage, RegisterForm, User,
};
use serde::{Deserialize, Serialize};

/// Root action: one variant per slice, plus imperative navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppAction {
    /// Authentication slice.
    Users(UserAction),

    /// Profile slice.
    Profile(ProfileAction),

    /// Posts slice.
    Posts(PostAction),

    /// Alerts side-channel.
    Alert(AlertAction),

    /// Imperative navigation, applied strictly after the dispatches that
    /// precede it in a batch. State-identity; the navigator call is its
    /// effect.
    Navigate(Route),
}

/// The fixed set of routes the state layer navigates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Post-submit landing page.
    Home,
}

impl Route {
    /// The literal path handed to the navigator.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => routes::HOME,
        }
    }
}

/// Authentication actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UserAction {
    // ═══════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════
    /// Register a new account.
    Register(RegisterForm),

    /// Log in.
    Login(LoginForm),

    /// Load the authenticated user for the stored token.
    LoadCurrent,

    /// Drop the session. No request; clears auth state and, via effect,
    /// the loaded profile.
    Logout,

    // ═══════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════
    /// A persisted token was found at startup.
    SessionRestored {
        /// The stored token.
        token: String,
    },

    /// Registration succeeded.
    Registered {
        /// The issued token.
        token: String,
    },

    /// Login succeeded.
    LoggedIn {
        /// The issued token.
        token: String,
    },

    /// The authenticated user was loaded.
    Loaded(User),

    /// An auth request failed; the session is dropped.
    AuthFailed(ErrorInfo),
}

/// Profile actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProfileAction {
    // ═══════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════
    /// Fetch the current user's profile.
    FetchCurrent,

    /// Fetch a profile by user id.
    Fetch {
        /// Owning user's id.
        user_id: String,
    },

    /// Fetch the profile directory. Clears the loaded profile before the
    /// request is issued.
    FetchAll,

    /// Create or update the current user's profile.
    Save {
        /// Form data.
        form: ProfileForm,
        /// True when editing an existing profile; controls the alert text
        /// and suppresses the post-create navigation.
        edit: bool,
    },

    /// Upload a profile image (multipart).
    UploadImage {
        /// Image bytes.
        bytes: Vec<u8>,
        /// Original file name.
        filename: String,
    },

    /// Add a work-history entry.
    AddExperience(ExperienceForm),

    /// Add an education entry.
    AddEducation(EducationForm),

    /// Remove a work-history entry.
    DeleteExperience {
        /// Entry id.
        id: String,
    },

    /// Remove an education entry.
    DeleteEducation {
        /// Entry id.
        id: String,
    },

    /// Delete the account and profile. Gated on an explicit confirmation
    /// before any request is issued.
    DeleteAccount,

    // ═══════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════
    /// A profile was fetched.
    Loaded(Profile),

    /// The profile directory was fetched.
    ListLoaded(Vec<Profile>),

    /// The profile was created or updated (also covers sub-resource
    /// changes, which answer with the full profile).
    Saved(Profile),

    /// An image was uploaded.
    ImageUploaded(ProfileImage),

    /// Clear the loaded profile only; directory, error, and loading flag
    /// are untouched.
    Cleared,

    /// A profile request failed.
    Failed(ErrorInfo),
}

/// Posts actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PostAction {
    // ═══════════════════════════════════════════════════════════════════
    // Commands
    // ═══════════════════════════════════════════════════════════════════
    /// Fetch the feed.
    FetchAll,

    /// Fetch one post for detail view.
    Fetch {
        /// Post id.
        id: String,
    },

    /// Create a post.
    Add(PostForm),

    /// Delete a post.
    Delete {
        /// Post id.
        id: String,
    },

    /// Like a post.
    Like {
        /// Post id.
        id: String,
    },

    /// Remove a like.
    Unlike {
        /// Post id.
        id: String,
    },

    /// Comment on a post.
    AddComment {
        /// Post id.
        id: String,
        /// Comment form.
        form: CommentForm,
    },

    /// Delete a comment.
    DeleteComment {
        /// Post id.
        id: String,
        /// Comment id.
        comment_id: String,
    },

    // ═══════════════════════════════════════════════════════════════════
    // Events
    // ═══════════════════════════════════════════════════════════════════
    /// The feed was fetched.
    Loaded(Vec<Post>),

    /// A single post was fetched.
    PostLoaded(Post),

    /// A post was created.
    Added(Post),

    /// A post was deleted.
    Deleted {
        /// Post id.
        id: String,
    },

    /// A post's likes changed.
    LikesUpdated {
        /// Post id.
        id: String,
        /// Replacement likes.
        likes: Vec<Like>,
    },

    /// The loaded post's comments changed.
    CommentsUpdated {
        /// Post id.
        id: String,
        /// Replacement comments.
        comments: Vec<Comment>,
    },

    /// A posts request failed.
    Failed(ErrorInfo),
}

/// Alert actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AlertAction {
    /// Show an alert. The reducer mints the id and schedules the
    /// self-dismissal timer.
    Show {
        /// Message text.
        message: String,
        /// Visual category.
        kind: crate::state::AlertKind,
    },

    /// Dismiss an alert by id (manual dismissal or expired timer).
    Dismiss {
        /// Alert id.
        id: uuid::Uuid,
    },
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)] // test code

    use super::*;

    #[test]
    fn route_paths_are_literal() {
        assert_eq!(Route::Home.as_str(), "/home");
    }

    #[test]
    fn actions_round_trip_through_serde() {
        let action = AppAction::Profile(ProfileAction::Fetch {
            user_id: "64b0aa".to_string(),
        });
        let json = serde_json::to_string(&action).expect("action should serialize");
        let back: AppAction = serde_json::from_str(&json).expect("action should deserialize");
        assert_eq!(back, action);
    }
}

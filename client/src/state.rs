//! Application state tree and domain models.
//!
//! The state is composed of four mutually independent slices. No slice
//! reducer reads another slice's data; cross-slice consequences (an alert
//! shown because a profile save failed) travel as actions produced by
//! effects, never as reducer reads.
//!
//! All types are `Clone` to support the snapshot model: views receive
//! immutable snapshots and may only request changes by dispatching actions.

use crate::error::ErrorInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════
// Root State
// ═══════════════════════════════════════════════════════════════════════

/// Root application state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    /// Authentication and current-user slice.
    pub users: UsersState,

    /// Profile slice (own profile, directory, upload state).
    pub profiles: ProfilesState,

    /// Posts slice (feed and loaded post).
    pub posts: PostsState,

    /// Ephemeral notification slice.
    pub alerts: AlertsState,
}

// ═══════════════════════════════════════════════════════════════════════
// Slice States
// ═══════════════════════════════════════════════════════════════════════

/// Authentication slice.
///
/// The token held here is mirrored into the HTTP adapter's default header
/// and the persisted storage by the store-level subscription; the reducer
/// itself only ever touches this in-memory copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsersState {
    /// Auth token, `None` when unauthenticated.
    pub token: Option<String>,

    /// Whether a user is currently authenticated.
    pub is_authenticated: bool,

    /// True until the first auth request settles.
    pub loading: bool,

    /// The authenticated user, once loaded.
    pub user: Option<User>,

    /// Last auth failure.
    pub error: ErrorInfo,
}

impl Default for UsersState {
    fn default() -> Self {
        Self {
            token: None,
            is_authenticated: false,
            loading: true,
            user: None,
            error: ErrorInfo::default(),
        }
    }
}

/// Profile slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilesState {
    /// The currently loaded profile (own or another user's).
    pub profile: Option<Profile>,

    /// The profile directory.
    pub profiles: Vec<Profile>,

    /// True until the first profile request settles (success or failure).
    pub loading: bool,

    /// Last profile failure.
    pub error: ErrorInfo,

    /// Most recently uploaded profile image.
    pub image: Option<ProfileImage>,
}

impl Default for ProfilesState {
    fn default() -> Self {
        Self {
            profile: None,
            profiles: Vec::new(),
            loading: true,
            error: ErrorInfo::default(),
            image: None,
        }
    }
}

/// Posts slice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostsState {
    /// The feed.
    pub posts: Vec<Post>,

    /// The post loaded for detail view.
    pub post: Option<Post>,

    /// True until the first posts request settles.
    pub loading: bool,

    /// Last posts failure.
    pub error: ErrorInfo,
}

impl Default for PostsState {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            post: None,
            loading: true,
            error: ErrorInfo::default(),
        }
    }
}

/// Alerts slice: an ordered sequence of concurrently visible alerts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertsState {
    /// Visible alerts, oldest first.
    pub alerts: Vec<Alert>,
}

// ═══════════════════════════════════════════════════════════════════════
// Domain Models
// ═══════════════════════════════════════════════════════════════════════

/// An authenticated user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,
}

/// The user reference embedded in a profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileUser {
    /// Backend id of the owning user.
    #[serde(rename = "_id")]
    pub id: String,

    /// Display name.
    pub name: String,

    /// Avatar URL, denormalized by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A member profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Backend id.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Owning user, populated by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<ProfileUser>,

    /// Professional status ("Developer", "Student", ...).
    pub status: String,

    /// Current company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Personal website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Skills.
    pub skills: Vec<String>,

    /// Short bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// GitHub username for the repos widget.
    #[serde(rename = "githubusername", skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,

    /// Work history, newest first.
    pub experience: Vec<Experience>,

    /// Education history, newest first.
    pub education: Vec<Education>,

    /// Social profiles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub social: Option<SocialLinks>,
}

/// A work-history entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    /// Backend id.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Job title.
    pub title: String,

    /// Company.
    pub company: String,

    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Start date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    /// End date, absent while current.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,

    /// Whether this is the current position.
    pub current: bool,

    /// Role description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An education entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    /// Backend id.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// School.
    pub school: String,

    /// Degree.
    pub degree: String,

    /// Field of study.
    #[serde(rename = "fieldofstudy")]
    pub field_of_study: String,

    /// Start date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<DateTime<Utc>>,

    /// End date, absent while current.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<DateTime<Utc>>,

    /// Whether this is ongoing.
    pub current: bool,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Social profile links.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    /// YouTube channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,

    /// Twitter handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,

    /// Facebook page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,

    /// LinkedIn profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,

    /// Instagram handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// The served location of an uploaded profile image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileImage {
    /// URL the image is served from.
    pub url: String,
}

/// A feed post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    /// Backend id.
    #[serde(rename = "_id")]
    pub id: String,

    /// Id of the authoring user.
    pub user: String,

    /// Post body.
    pub text: String,

    /// Author display name, denormalized by the backend.
    pub name: String,

    /// Author avatar URL, denormalized by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Creation date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    /// Likes.
    pub likes: Vec<Like>,

    /// Comments, newest first.
    pub comments: Vec<Comment>,
}

/// A like on a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Like {
    /// Backend id of the like entry.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Id of the liking user.
    pub user: String,
}

/// A comment on a post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    /// Backend id.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Id of the commenting user.
    pub user: String,

    /// Comment body.
    pub text: String,

    /// Commenter display name, denormalized by the backend.
    pub name: String,

    /// Commenter avatar URL, denormalized by the backend.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,

    /// Creation date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
}

/// An ephemeral, self-expiring notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    /// Unique alert id; dismissal and timer cancellation key on it.
    pub id: uuid::Uuid,

    /// Message shown to the user.
    pub msg: String,

    /// Visual category.
    pub kind: AlertKind,

    /// When the alert was created.
    pub created_at: DateTime<Utc>,
}

/// Alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    /// Operation succeeded.
    Success,
    /// Operation failed or input was rejected.
    Error,
}

// ═══════════════════════════════════════════════════════════════════════
// Form Inputs
// ═══════════════════════════════════════════════════════════════════════

/// Create-or-update profile form.
///
/// Skills travel as the comma-separated string the form collects; the
/// backend splits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileForm {
    /// Professional status.
    pub status: String,

    /// Comma-separated skills.
    pub skills: String,

    /// Company.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Bio.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,

    /// GitHub username.
    #[serde(rename = "githubusername", skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,

    /// YouTube channel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube: Option<String>,

    /// Twitter handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,

    /// Facebook page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,

    /// LinkedIn profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,

    /// Instagram handle.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

/// Add-experience form. Dates travel as the `YYYY-MM-DD` strings the date
/// inputs produce.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceForm {
    /// Job title.
    pub title: String,

    /// Company.
    pub company: String,

    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Start date.
    pub from: String,

    /// End date, empty while current.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Whether this is the current position.
    pub current: bool,

    /// Role description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Add-education form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationForm {
    /// School.
    pub school: String,

    /// Degree.
    pub degree: String,

    /// Field of study.
    #[serde(rename = "fieldofstudy")]
    pub field_of_study: String,

    /// Start date.
    pub from: String,

    /// End date, empty while current.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,

    /// Whether this is ongoing.
    pub current: bool,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Registration form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    /// Display name.
    pub name: String,

    /// Email address.
    pub email: String,

    /// Password.
    pub password: String,
}

/// Login form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    /// Email address.
    pub email: String,

    /// Password.
    pub password: String,
}

/// New-post form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    /// Post body.
    pub text: String,
}

/// New-comment form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentForm {
    /// Comment body.
    pub text: String,
}

/// Auth response carrying the session token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenResponse {
    /// The issued auth token.
    pub token: String,
}

//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cartwheel_core::{Email, UserId};

/// A registered user (domain type).
///
/// Registration only - login and credentials are outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (unique).
    pub email: Email,
    /// User's login name (unique).
    pub username: String,
    /// Display name.
    pub name: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

/// Unvalidated registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    /// Email address, validated during registration.
    pub email: String,
    /// Desired username, validated during registration.
    pub username: String,
    /// Display name.
    pub name: String,
}

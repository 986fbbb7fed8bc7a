//! User registration.
//!
//! Validates a new user's email and username, rejects duplicates of
//! either, and persists via the user store. No passwords or login here;
//! credentials belong to whatever authentication layer sits on top.

use std::sync::Arc;

use thiserror::Error;
use tracing::{info, instrument};

use cartwheel_core::{Email, EmailError};

use crate::models::{NewUser, User};
use crate::stores::{StoreError, UserStore};

/// Minimum username length.
const MIN_USERNAME_LENGTH: usize = 5;

/// Errors that can occur during registration.
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Username too short.
    #[error("username must be at least {min} characters")]
    InvalidUsername {
        /// Minimum accepted length.
        min: usize,
    },

    /// An account with this email already exists.
    #[error("an account with this email already exists")]
    EmailTaken,

    /// This username is already taken.
    #[error("this username is already taken")]
    UsernameTaken,

    /// Store failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// User registration service.
pub struct RegistrationService<S> {
    stores: Arc<S>,
}

impl<S> RegistrationService<S>
where
    S: UserStore,
{
    /// Create a new registration service.
    #[must_use]
    pub const fn new(stores: Arc<S>) -> Self {
        Self { stores }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::InvalidEmail` or `InvalidUsername` if
    /// validation fails, and `EmailTaken` / `UsernameTaken` if another
    /// account already holds the email or username.
    #[instrument(skip(self, new_user), fields(username = %new_user.username))]
    pub async fn register(&self, new_user: NewUser) -> Result<User, RegistrationError> {
        let email = Email::parse(&new_user.email)?;

        if new_user.username.chars().count() < MIN_USERNAME_LENGTH {
            return Err(RegistrationError::InvalidUsername {
                min: MIN_USERNAME_LENGTH,
            });
        }

        if self.stores.get_by_email(&email).await?.is_some() {
            return Err(RegistrationError::EmailTaken);
        }
        if self
            .stores
            .get_by_username(&new_user.username)
            .await?
            .is_some()
        {
            return Err(RegistrationError::UsernameTaken);
        }

        let user = self
            .stores
            .create(&email, &new_user.username, &new_user.name)
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }
}

//! Driving port for account mutations.

use std::fmt;

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::domain::{
    Email, Error, ImageUpload, Password, PersonName, Principal, StoredImage, User, Username,
};

/// Validated registration payload.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: Email,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password: Password,
}

/// Password change payload; the current password is checked verbatim.
#[derive(Clone)]
pub struct PasswordChange {
    pub current_password: Zeroizing<String>,
    pub new_password: Password,
}

impl fmt::Debug for PasswordChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordChange").finish_non_exhaustive()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create an account; taken e-mail or username yields `Conflict`.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Replace the password after checking the current one.
    async fn set_password(&self, principal: Principal, change: PasswordChange)
    -> Result<(), Error>;

    /// Store a new avatar and return its location.
    async fn set_avatar(
        &self,
        principal: Principal,
        upload: ImageUpload,
    ) -> Result<StoredImage, Error>;

    async fn remove_avatar(&self, principal: Principal) -> Result<(), Error>;
}

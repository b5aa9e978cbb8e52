//! Port abstraction for account persistence adapters and their errors.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    Counted, Email, PasswordHash, PersonName, Principal, StoredImage, User, UserId, Username,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "user repository query failed: {message}",
        /// A unique column already holds the submitted value.
        Duplicate { field: String } =>
            Conflict: "a user with this {field} already exists",
    }
}

/// Fields required to insert an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub password_hash: PasswordHash,
}

/// Stored login material for one account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub principal: Principal,
    pub password_hash: PasswordHash,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert an account; duplicate e-mail or username yields
    /// [`UserPersistenceError::Duplicate`].
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch several users; unknown ids are skipped.
    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError>;

    /// Load credentials for a login attempt.
    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Current password hash of a user.
    async fn password_hash(&self, id: UserId)
    -> Result<Option<PasswordHash>, UserPersistenceError>;

    async fn update_password(
        &self,
        id: UserId,
        hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Replace the avatar, returning the previous one.
    async fn set_avatar(
        &self,
        id: UserId,
        avatar: Option<StoredImage>,
    ) -> Result<Option<StoredImage>, UserPersistenceError>;

    /// Users ordered by id.
    async fn list(&self, page: PageRequest) -> Result<Counted<User>, UserPersistenceError>;
}

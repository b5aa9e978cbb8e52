//! Port for issued API token storage.
use async_trait::async_trait;

use crate::domain::{Principal, TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum AuthTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "token repository query failed: {message}",
    }
}

/// Tokens are stored by digest only; the plaintext never reaches the adapter.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    async fn insert(
        &self,
        digest: &TokenDigest,
        user: UserId,
    ) -> Result<(), AuthTokenRepositoryError>;

    /// Resolve the owner of a token.
    async fn find_principal(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<Principal>, AuthTokenRepositoryError>;

    /// Delete every token issued to `user`.
    async fn delete_for_user(&self, user: UserId) -> Result<(), AuthTokenRepositoryError>;
}

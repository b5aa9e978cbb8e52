//! Driving ports for token login and request authentication.
//!
//! Inbound adapters call these to exchange credentials for an API token and
//! to resolve a presented token into a [`Principal`] without touching the
//! backing storage.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, LoginCredentials, Principal};

/// Domain use-case port for issuing and revoking tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a fresh token.
    ///
    /// Unknown e-mail and wrong password are indistinguishable to callers.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error>;

    /// Revoke the principal's tokens.
    async fn logout(&self, principal: Principal) -> Result<(), Error>;
}

/// Domain use-case port for authenticating requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Resolve a presented token; `None` when it is not recognised.
    async fn authenticate(&self, token: &AuthToken) -> Result<Option<Principal>, Error>;
}

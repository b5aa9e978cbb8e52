//! Token login and request authentication.
//!
//! Password hashing is CPU bound, so hashing and verification run on the
//! blocking thread pool.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuthTokenRepository, LoginService, PasswordHasher, TokenAuthenticator, UserRepository,
};
use crate::domain::{AuthToken, Error, LoginCredentials, Password, PasswordHash, Principal};

const INVALID_CREDENTIALS: &str = "unable to log in with the provided credentials";

pub(crate) async fn hash_password<H>(hasher: &Arc<H>, password: &Password) -> Result<PasswordHash, Error>
where
    H: PasswordHasher + 'static,
{
    let hasher = Arc::clone(hasher);
    let password = password.clone();
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
        .map_err(Error::from)
}

pub(crate) async fn verify_password<H>(
    hasher: &Arc<H>,
    candidate: &str,
    hash: PasswordHash,
) -> Result<bool, Error>
where
    H: PasswordHasher + 'static,
{
    let hasher = Arc::clone(hasher);
    let candidate = Zeroizing::new(candidate.to_owned());
    tokio::task::spawn_blocking(move || hasher.verify(candidate.as_str(), &hash))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

/// Implements [`LoginService`] and [`TokenAuthenticator`].
pub struct AuthService<U, T, H> {
    users: Arc<U>,
    tokens: Arc<T>,
    hasher: Arc<H>,
}

impl<U, T, H> AuthService<U, T, H> {
    pub fn new(users: Arc<U>, tokens: Arc<T>, hasher: Arc<H>) -> Self {
        Self {
            users,
            tokens,
            hasher,
        }
    }
}

#[async_trait]
impl<U, T, H> LoginService for AuthService<U, T, H>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher + 'static,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, Error> {
        let Some(stored) = self.users.find_credentials(credentials.email()).await? else {
            return Err(Error::invalid_request(INVALID_CREDENTIALS));
        };
        let matches =
            verify_password(&self.hasher, credentials.password(), stored.password_hash).await?;
        if !matches {
            return Err(Error::invalid_request(INVALID_CREDENTIALS));
        }

        let token = AuthToken::generate();
        self.tokens
            .insert(&token.digest(), stored.principal.id)
            .await?;
        info!(user_id = %stored.principal.id, "issued api token");
        Ok(token)
    }

    async fn logout(&self, principal: Principal) -> Result<(), Error> {
        self.tokens.delete_for_user(principal.id).await?;
        info!(user_id = %principal.id, "revoked api tokens");
        Ok(())
    }
}

#[async_trait]
impl<U, T, H> TokenAuthenticator for AuthService<U, T, H>
where
    U: UserRepository,
    T: AuthTokenRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, token: &AuthToken) -> Result<Option<Principal>, Error> {
        Ok(self.tokens.find_principal(&token.digest()).await?)
    }
}

//! PostgreSQL-backed API token storage.
//!
//! Only SHA-256 digests of issued tokens reach the database.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuthTokenRepository, AuthTokenRepositoryError};
use crate::domain::{Principal, TokenDigest, UserId};

use super::diesel_helpers::{DbFailure, classify_diesel_error, map_pool_error_message};
use super::models::NewAuthTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::{auth_tokens, users};

#[derive(Clone)]
pub struct DieselAuthTokenRepository {
    pool: DbPool,
}

impl DieselAuthTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AuthTokenRepositoryError {
    AuthTokenRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> AuthTokenRepositoryError {
    match classify_diesel_error(error, "auth_tokens") {
        DbFailure::Connection(message) => AuthTokenRepositoryError::connection(message),
        DbFailure::Query(message) => AuthTokenRepositoryError::query(message),
        DbFailure::UniqueViolation { .. } => AuthTokenRepositoryError::query("token collision"),
        DbFailure::CheckViolation { .. } => AuthTokenRepositoryError::query("constraint violated"),
    }
}

#[async_trait]
impl AuthTokenRepository for DieselAuthTokenRepository {
    async fn insert(
        &self,
        digest: &TokenDigest,
        user: UserId,
    ) -> Result<(), AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(auth_tokens::table)
            .values(&NewAuthTokenRow {
                digest: digest.as_str(),
                user_id: user.get(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_principal(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<Principal>, AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<(i64, bool)> = auth_tokens::table
            .inner_join(users::table)
            .filter(auth_tokens::digest.eq(digest.as_str()))
            .select((users::id, users::is_superuser))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(|(id, is_superuser)| Principal {
            id: UserId::new(id),
            is_superuser,
        }))
    }

    async fn delete_for_user(&self, user: UserId) -> Result<(), AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::delete(auth_tokens::table.filter(auth_tokens::user_id.eq(user.get())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }
}

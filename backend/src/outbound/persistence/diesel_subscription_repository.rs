//! PostgreSQL-backed author subscriptions.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{Counted, User, UserId};

use super::diesel_helpers::{
    DbFailure, classify_diesel_error, from_db_count, map_pool_error_message, page_window,
};
use super::models::{NewSubscriptionRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{subscriptions, users};

#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubscriptionRepositoryError {
    SubscriptionRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> SubscriptionRepositoryError {
    match classify_diesel_error(error, "subscriptions") {
        DbFailure::Connection(message) => SubscriptionRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => SubscriptionRepositoryError::duplicate(),
        DbFailure::CheckViolation { .. } => SubscriptionRepositoryError::self_subscription(),
        DbFailure::Query(message) => SubscriptionRepositoryError::query(message),
    }
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<(), SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(subscriptions::table)
            .values(&NewSubscriptionRow {
                user_id: follower.get(),
                following_id: author.get(),
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn unsubscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            subscriptions::table
                .filter(subscriptions::user_id.eq(follower.get()))
                .filter(subscriptions::following_id.eq(author.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn followed_authors(
        &self,
        follower: UserId,
        page: PageRequest,
    ) -> Result<Counted<User>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (limit, offset) = page_window(page);

        let total: i64 = subscriptions::table
            .filter(subscriptions::user_id.eq(follower.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<UserRow> = users::table
            .inner_join(subscriptions::table.on(subscriptions::following_id.eq(users::id)))
            .filter(subscriptions::user_id.eq(follower.get()))
            .order_by(users::id)
            .limit(limit)
            .offset(offset)
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Counted::new(
            rows.into_iter().map(User::from).collect(),
            from_db_count(total),
        ))
    }

    async fn followed_among(
        &self,
        follower: UserId,
        authors: &[UserId],
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError> {
        if authors.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i64> = authors.iter().map(|id| id.get()).collect();

        let followed: Vec<i64> = subscriptions::table
            .filter(subscriptions::user_id.eq(follower.get()))
            .filter(subscriptions::following_id.eq_any(raw))
            .select(subscriptions::following_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(followed.into_iter().map(UserId::new).collect())
    }
}

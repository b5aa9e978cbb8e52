//! Port for author subscriptions.
use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Counted, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "subscription repository query failed: {message}",
        /// The follower already follows the author.
        Duplicate => Conflict: "already subscribed to this author",
        /// The storage layer rejected a self-subscription.
        SelfSubscription => InvalidRequest: "cannot subscribe to yourself",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<(), SubscriptionRepositoryError>;

    /// Returns `false` when no subscription existed.
    async fn unsubscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    /// Authors followed by `follower`, ordered by id.
    async fn followed_authors(
        &self,
        follower: UserId,
        page: PageRequest,
    ) -> Result<Counted<User>, SubscriptionRepositoryError>;

    /// The subset of `authors` that `follower` follows.
    async fn followed_among(
        &self,
        follower: UserId,
        authors: &[UserId],
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError>;
}

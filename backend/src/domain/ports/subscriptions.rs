//! Driving ports for following authors.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{AuthorSubscription, Counted, Error, Principal, RecipesLimit, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsCommand: Send + Sync {
    /// Follow `author`; self-follow is `InvalidRequest`, a repeat is
    /// `Conflict`.
    async fn subscribe(
        &self,
        principal: Principal,
        author: UserId,
        recipes_limit: RecipesLimit,
    ) -> Result<AuthorSubscription, Error>;

    /// Stop following; `InvalidRequest` when not subscribed.
    async fn unsubscribe(&self, principal: Principal, author: UserId) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionsQuery: Send + Sync {
    /// Followed authors with their recipe previews.
    async fn subscriptions(
        &self,
        principal: Principal,
        page: PageRequest,
        recipes_limit: RecipesLimit,
    ) -> Result<Counted<AuthorSubscription>, Error>;
}

//! Author subscription services.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    RecipeRepository, SubscriptionRepository, SubscriptionsCommand, SubscriptionsQuery,
    UserRepository,
};
use crate::domain::{
    AuthorSubscription, Counted, Error, Principal, RecipesLimit, User, UserId, UserProfile,
};

/// Implements [`SubscriptionsCommand`] and [`SubscriptionsQuery`].
pub struct SubscriptionService<S, U, R> {
    subscriptions: Arc<S>,
    users: Arc<U>,
    recipes: Arc<R>,
}

impl<S, U, R> SubscriptionService<S, U, R> {
    pub fn new(subscriptions: Arc<S>, users: Arc<U>, recipes: Arc<R>) -> Self {
        Self {
            subscriptions,
            users,
            recipes,
        }
    }
}

impl<S, U, R> SubscriptionService<S, U, R>
where
    U: UserRepository,
    R: RecipeRepository,
{
    async fn author(&self, id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))
    }

    /// Projection of a followed author, so `is_subscribed` is always true.
    async fn project(&self, author: User, limit: RecipesLimit) -> Result<AuthorSubscription, Error> {
        let summaries = self.recipes.author_summaries(author.id, limit.get()).await?;
        Ok(AuthorSubscription {
            author: UserProfile {
                user: author,
                is_subscribed: true,
            },
            recipes: summaries.items,
            recipes_count: summaries.total,
        })
    }
}

#[async_trait]
impl<S, U, R> SubscriptionsCommand for SubscriptionService<S, U, R>
where
    S: SubscriptionRepository,
    U: UserRepository,
    R: RecipeRepository,
{
    async fn subscribe(
        &self,
        principal: Principal,
        author: UserId,
        recipes_limit: RecipesLimit,
    ) -> Result<AuthorSubscription, Error> {
        let author = self.author(author).await?;
        if author.id == principal.id {
            return Err(Error::invalid_request("cannot subscribe to yourself")
                .with_details(json!({ "field": "author", "code": "self_subscription" })));
        }
        self.subscriptions.subscribe(principal.id, author.id).await?;
        info!(follower = %principal.id, author = %author.id, "subscribed");
        self.project(author, recipes_limit).await
    }

    async fn unsubscribe(&self, principal: Principal, author: UserId) -> Result<(), Error> {
        let author = self.author(author).await?;
        if !self.subscriptions.unsubscribe(principal.id, author.id).await? {
            return Err(Error::invalid_request("not subscribed to this author")
                .with_details(json!({ "field": "author", "code": "absent" })));
        }
        info!(follower = %principal.id, author = %author.id, "unsubscribed");
        Ok(())
    }
}

#[async_trait]
impl<S, U, R> SubscriptionsQuery for SubscriptionService<S, U, R>
where
    S: SubscriptionRepository,
    U: UserRepository,
    R: RecipeRepository,
{
    async fn subscriptions(
        &self,
        principal: Principal,
        page: PageRequest,
        recipes_limit: RecipesLimit,
    ) -> Result<Counted<AuthorSubscription>, Error> {
        let Counted { items, total } = self
            .subscriptions
            .followed_authors(principal.id, page)
            .await?;
        let mut projections = Vec::with_capacity(items.len());
        for author in items {
            projections.push(self.project(author, recipes_limit).await?);
        }
        Ok(Counted::new(projections, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        MockRecipeRepository, MockSubscriptionRepository, MockUserRepository,
        SubscriptionRepositoryError,
    };
    use crate::domain::{ErrorCode, RecipeId, RecipeSummary, StoredImage};
    use rstest::rstest;

    const ME: UserId = UserId::new(1);
    const AUTHOR: UserId = UserId::new(2);

    type Service =
        SubscriptionService<MockSubscriptionRepository, MockUserRepository, MockRecipeRepository>;

    fn user(id: UserId) -> User {
        User {
            id,
            email: format!("u{id}@example.com"),
            username: format!("u{id}"),
            first_name: "U".to_owned(),
            last_name: "Ser".to_owned(),
            avatar: None,
            is_superuser: false,
        }
    }

    fn summary(id: i64) -> RecipeSummary {
        RecipeSummary {
            id: RecipeId::new(id),
            name: format!("recipe {id}"),
            image: StoredImage::new(format!("recipes/images/{id}.png")),
            cooking_time: 5,
        }
    }

    fn users() -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| Ok(Some(user(id))));
        users
    }

    fn service(
        subscriptions: MockSubscriptionRepository,
        users: MockUserRepository,
        recipes: MockRecipeRepository,
    ) -> Service {
        SubscriptionService::new(Arc::new(subscriptions), Arc::new(users), Arc::new(recipes))
    }

    #[rstest]
    #[tokio::test]
    async fn self_subscription_is_rejected() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_subscribe().never();

        let err = service(subscriptions, users(), MockRecipeRepository::new())
            .subscribe(Principal::user(ME), ME, RecipesLimit::UNLIMITED)
            .await
            .expect_err("self follow");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn subscribe_returns_limited_recipes_with_total() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_subscribe()
            .withf(|follower, author| *follower == ME && *author == AUTHOR)
            .times(1)
            .returning(|_, _| Ok(()));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_author_summaries()
            .withf(|author, limit| *author == AUTHOR && *limit == Some(1))
            .returning(|_, _| Ok(Counted::new(vec![summary(9)], 3)));

        let projection = service(subscriptions, users(), recipes)
            .subscribe(Principal::user(ME), AUTHOR, RecipesLimit::from(Some(1)))
            .await
            .expect("subscribed");
        assert!(projection.author.is_subscribed);
        assert_eq!(projection.recipes.len(), 1);
        assert_eq!(projection.recipes_count, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn repeated_subscription_is_a_conflict() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_subscribe()
            .returning(|_, _| Err(SubscriptionRepositoryError::duplicate()));

        let err = service(subscriptions, users(), MockRecipeRepository::new())
            .subscribe(Principal::user(ME), AUTHOR, RecipesLimit::UNLIMITED)
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn unsubscribing_without_subscription_is_invalid() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_unsubscribe().returning(|_, _| Ok(false));

        let err = service(subscriptions, users(), MockRecipeRepository::new())
            .unsubscribe(Principal::user(ME), AUTHOR)
            .await
            .expect_err("not subscribed");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[tokio::test]
    async fn subscribing_to_unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let err = service(MockSubscriptionRepository::new(), users, MockRecipeRepository::new())
            .subscribe(Principal::user(ME), UserId::new(77), RecipesLimit::UNLIMITED)
            .await
            .expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn listing_projects_each_followed_author() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_followed_authors()
            .returning(|_, _| Ok(Counted::new(vec![user(AUTHOR), user(UserId::new(3))], 5)));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_author_summaries()
            .times(2)
            .returning(|author, _| Ok(Counted::new(vec![summary(author.get())], 1)));

        let page = service(subscriptions, MockUserRepository::new(), recipes)
            .subscriptions(Principal::user(ME), PageRequest::default(), RecipesLimit::UNLIMITED)
            .await
            .expect("listed");
        assert_eq!(page.total, 5);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|item| item.author.is_subscribed));
    }
}

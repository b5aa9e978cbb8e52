//! Viewer-relative user projections shared by several services.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::ports::{SubscriptionRepository, UserRepository};
use crate::domain::{Error, User, UserId, UserProfile};

/// Resolves `is_subscribed` for users as seen by a viewer.
pub struct ProfileResolver<U, S> {
    users: Arc<U>,
    subscriptions: Arc<S>,
}

impl<U, S> Clone for ProfileResolver<U, S> {
    fn clone(&self) -> Self {
        Self {
            users: Arc::clone(&self.users),
            subscriptions: Arc::clone(&self.subscriptions),
        }
    }
}

impl<U, S> ProfileResolver<U, S>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    pub fn new(users: Arc<U>, subscriptions: Arc<S>) -> Self {
        Self {
            users,
            subscriptions,
        }
    }

    /// Project `users` for `viewer`, preserving order.
    ///
    /// Anonymous viewers never see a subscription, and neither does a viewer
    /// looking at their own profile.
    pub async fn profiles(
        &self,
        viewer: Option<UserId>,
        users: Vec<User>,
    ) -> Result<Vec<UserProfile>, Error> {
        let followed = match viewer {
            Some(viewer) if !users.is_empty() => {
                let ids: Vec<UserId> = users.iter().map(|user| user.id).collect();
                self.subscriptions.followed_among(viewer, &ids).await?
            }
            _ => Vec::new(),
        };
        Ok(users
            .into_iter()
            .map(|user| {
                let is_subscribed = Some(user.id) != viewer && followed.contains(&user.id);
                UserProfile {
                    user,
                    is_subscribed,
                }
            })
            .collect())
    }

    /// Profile of one user; `NotFound` when absent.
    pub async fn profile(&self, viewer: Option<UserId>, id: UserId) -> Result<UserProfile, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        self.profiles(viewer, vec![user])
            .await?
            .pop()
            .ok_or_else(|| Error::internal("profile projection lost a user"))
    }

    /// Profiles keyed by id; unknown ids are absent from the map.
    pub async fn profiles_by_id(
        &self,
        viewer: Option<UserId>,
        ids: &[UserId],
    ) -> Result<HashMap<UserId, UserProfile>, Error> {
        let mut unique = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();
        let users = self.users.find_many(&unique).await?;
        Ok(self
            .profiles(viewer, users)
            .await?
            .into_iter()
            .map(|profile| (profile.user.id, profile))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockSubscriptionRepository, MockUserRepository};
    use rstest::rstest;

    pub(crate) fn user(id: i64) -> User {
        User {
            id: UserId::new(id),
            email: format!("user{id}@example.com"),
            username: format!("user{id}"),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            avatar: None,
            is_superuser: false,
        }
    }

    fn resolver(
        users: MockUserRepository,
        subscriptions: MockSubscriptionRepository,
    ) -> ProfileResolver<MockUserRepository, MockSubscriptionRepository> {
        ProfileResolver::new(Arc::new(users), Arc::new(subscriptions))
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_viewers_skip_subscription_lookup() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions.expect_followed_among().never();
        let profiles = resolver(MockUserRepository::new(), subscriptions)
            .profiles(None, vec![user(1), user(2)])
            .await
            .expect("profiles");
        assert!(profiles.iter().all(|profile| !profile.is_subscribed));
    }

    #[rstest]
    #[tokio::test]
    async fn followed_users_are_flagged() {
        let mut subscriptions = MockSubscriptionRepository::new();
        subscriptions
            .expect_followed_among()
            .times(1)
            .return_once(|_, _| Ok(vec![UserId::new(2)]));
        let profiles = resolver(MockUserRepository::new(), subscriptions)
            .profiles(Some(UserId::new(1)), vec![user(1), user(2), user(3)])
            .await
            .expect("profiles");
        let flags: Vec<bool> = profiles.iter().map(|p| p.is_subscribed).collect();
        assert_eq!(flags, vec![false, true, false]);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let err = resolver(users, MockSubscriptionRepository::new())
            .profile(None, UserId::new(5))
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), crate::domain::ErrorCode::NotFound);
    }
}

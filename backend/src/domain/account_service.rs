//! Account registration, profiles, passwords and avatars.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::auth_service::{hash_password, verify_password};
use crate::domain::ports::{
    ImageStore, NewUser, PasswordChange, PasswordHasher, Registration, SubscriptionRepository,
    UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::profiles::ProfileResolver;
use crate::domain::{
    Counted, Error, ImageKind, ImageUpload, Principal, StoredImage, User, UserId, UserProfile,
};

/// Implements [`UsersQuery`] and [`UsersCommand`].
pub struct AccountService<U, S, H, I> {
    users: Arc<U>,
    profiles: ProfileResolver<U, S>,
    hasher: Arc<H>,
    images: Arc<I>,
}

impl<U, S, H, I> AccountService<U, S, H, I>
where
    U: UserRepository,
    S: SubscriptionRepository,
{
    pub fn new(users: Arc<U>, subscriptions: Arc<S>, hasher: Arc<H>, images: Arc<I>) -> Self {
        Self {
            profiles: ProfileResolver::new(Arc::clone(&users), subscriptions),
            users,
            hasher,
            images,
        }
    }
}

impl<U, S, H, I> AccountService<U, S, H, I>
where
    I: ImageStore,
{
    async fn discard_image(&self, image: &StoredImage) {
        if let Err(err) = self.images.remove(image).await {
            warn!(image = image.as_str(), error = %err, "failed to remove replaced avatar");
        }
    }
}

#[async_trait]
impl<U, S, H, I> UsersQuery for AccountService<U, S, H, I>
where
    U: UserRepository,
    S: SubscriptionRepository,
    H: PasswordHasher + 'static,
    I: ImageStore,
{
    async fn list_users(
        &self,
        viewer: Option<Principal>,
        page: PageRequest,
    ) -> Result<Counted<UserProfile>, Error> {
        let Counted { items, total } = self.users.list(page).await?;
        let viewer = viewer.map(|principal| principal.id);
        let profiles = self.profiles.profiles(viewer, items).await?;
        Ok(Counted::new(profiles, total))
    }

    async fn user_profile(
        &self,
        viewer: Option<Principal>,
        id: UserId,
    ) -> Result<UserProfile, Error> {
        self.profiles
            .profile(viewer.map(|principal| principal.id), id)
            .await
    }
}

#[async_trait]
impl<U, S, H, I> UsersCommand for AccountService<U, S, H, I>
where
    U: UserRepository,
    S: SubscriptionRepository,
    H: PasswordHasher + 'static,
    I: ImageStore,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = hash_password(&self.hasher, &registration.password).await?;
        let user = self
            .users
            .create(&NewUser {
                email: registration.email,
                username: registration.username,
                first_name: registration.first_name,
                last_name: registration.last_name,
                password_hash,
            })
            .await?;
        info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    async fn set_password(&self, principal: Principal, change: PasswordChange) -> Result<(), Error> {
        let current = self
            .users
            .password_hash(principal.id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {} not found", principal.id)))?;
        if !verify_password(&self.hasher, change.current_password.as_str(), current).await? {
            return Err(
                Error::invalid_request("current password is incorrect").with_details(json!({
                    "field": "current_password",
                    "code": "invalid",
                })),
            );
        }
        let hash = hash_password(&self.hasher, &change.new_password).await?;
        self.users.update_password(principal.id, &hash).await?;
        info!(user_id = %principal.id, "changed password");
        Ok(())
    }

    async fn set_avatar(
        &self,
        principal: Principal,
        upload: ImageUpload,
    ) -> Result<StoredImage, Error> {
        let stored = self.images.save(ImageKind::Avatar, &upload).await?;
        let previous = match self
            .users
            .set_avatar(principal.id, Some(stored.clone()))
            .await
        {
            Ok(previous) => previous,
            Err(err) => {
                self.discard_image(&stored).await;
                return Err(err.into());
            }
        };
        if let Some(previous) = previous {
            self.discard_image(&previous).await;
        }
        Ok(stored)
    }

    async fn remove_avatar(&self, principal: Principal) -> Result<(), Error> {
        if let Some(previous) = self.users.set_avatar(principal.id, None).await? {
            self.discard_image(&previous).await;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;

//! Driving port for administrator catalogue writes.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, NewIngredient, NewTag, Principal, Tag, TagId};

/// Every operation requires a superuser requester.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    async fn create_tag(&self, requester: Option<Principal>, tag: NewTag) -> Result<Tag, Error>;

    async fn delete_tag(&self, requester: Option<Principal>, id: TagId) -> Result<(), Error>;

    async fn create_ingredient(
        &self,
        requester: Option<Principal>,
        ingredient: NewIngredient,
    ) -> Result<Ingredient, Error>;

    async fn delete_ingredient(
        &self,
        requester: Option<Principal>,
        id: IngredientId,
    ) -> Result<(), Error>;
}

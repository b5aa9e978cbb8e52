//! Driving port for recipe writes.
//!
//! Update and delete take an optional requester so the author check can
//! distinguish anonymous callers from other users. Payloads arrive
//! unvalidated; the author check runs before validation.

use async_trait::async_trait;

use crate::domain::{Error, Principal, RecipeDraftInput, RecipeId, RecipeView};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    async fn create_recipe(
        &self,
        author: Principal,
        input: RecipeDraftInput,
    ) -> Result<RecipeView, Error>;

    async fn update_recipe(
        &self,
        requester: Option<Principal>,
        id: RecipeId,
        input: RecipeDraftInput,
    ) -> Result<RecipeView, Error>;

    async fn delete_recipe(&self, requester: Option<Principal>, id: RecipeId)
    -> Result<(), Error>;
}

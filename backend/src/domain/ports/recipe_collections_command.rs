//! Driving ports for favorites, the shopping cart, and list export.

use async_trait::async_trait;

use crate::domain::{Error, Principal, RecipeId, RecipeSummary, ShoppingListDocument};

use super::RecipeCollection;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCollectionsCommand: Send + Sync {
    /// Add a recipe; `Conflict` when already present.
    async fn add_to_collection(
        &self,
        principal: Principal,
        collection: RecipeCollection,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error>;

    /// Remove a recipe; `InvalidRequest` when absent.
    async fn remove_from_collection(
        &self,
        principal: Principal,
        collection: RecipeCollection,
        recipe: RecipeId,
    ) -> Result<(), Error>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListExport: Send + Sync {
    /// Aggregate and render the principal's cart.
    async fn export_shopping_list(&self, principal: Principal)
    -> Result<ShoppingListDocument, Error>;
}

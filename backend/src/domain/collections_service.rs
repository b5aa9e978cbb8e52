//! Favorites, shopping cart and shopping list export.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CollectionRepository, CollectionRepositoryError, RecipeCollection, RecipeCollectionsCommand,
    RecipeRepository, ShoppingListExport, ShoppingListRenderer, UserRepository,
};
use crate::domain::{
    Error, Principal, Recipe, RecipeId, RecipeSummary, ShoppingList, ShoppingListDocument,
};

/// Implements [`RecipeCollectionsCommand`] and [`ShoppingListExport`].
pub struct RecipeCollectionsService<R, L, U, P> {
    recipes: Arc<R>,
    collections: Arc<L>,
    users: Arc<U>,
    renderer: Arc<P>,
}

impl<R, L, U, P> RecipeCollectionsService<R, L, U, P> {
    pub fn new(recipes: Arc<R>, collections: Arc<L>, users: Arc<U>, renderer: Arc<P>) -> Self {
        Self {
            recipes,
            collections,
            users,
            renderer,
        }
    }
}

impl<R, L, U, P> RecipeCollectionsService<R, L, U, P>
where
    R: RecipeRepository,
{
    async fn existing(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("recipe {id} not found")))
    }
}

#[async_trait]
impl<R, L, U, P> RecipeCollectionsCommand for RecipeCollectionsService<R, L, U, P>
where
    R: RecipeRepository,
    L: CollectionRepository,
    U: UserRepository,
    P: ShoppingListRenderer + 'static,
{
    async fn add_to_collection(
        &self,
        principal: Principal,
        collection: RecipeCollection,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let recipe = self.existing(recipe).await?;
        self.collections
            .add(collection, principal.id, recipe.id)
            .await
            .map_err(|err| match err {
                CollectionRepositoryError::Duplicate { .. } => Error::from(err)
                    .with_details(json!({ "field": "recipe", "code": "duplicate" })),
                other => other.into(),
            })?;
        info!(user_id = %principal.id, recipe_id = %recipe.id, %collection, "added recipe");
        Ok(RecipeSummary::from(&recipe))
    }

    async fn remove_from_collection(
        &self,
        principal: Principal,
        collection: RecipeCollection,
        recipe: RecipeId,
    ) -> Result<(), Error> {
        let recipe = self.existing(recipe).await?;
        if !self
            .collections
            .remove(collection, principal.id, recipe.id)
            .await?
        {
            return Err(
                Error::invalid_request(format!("recipe is not in {collection}"))
                    .with_details(json!({ "field": "recipe", "code": "absent" })),
            );
        }
        info!(user_id = %principal.id, recipe_id = %recipe.id, %collection, "removed recipe");
        Ok(())
    }
}

#[async_trait]
impl<R, L, U, P> ShoppingListExport for RecipeCollectionsService<R, L, U, P>
where
    R: RecipeRepository,
    L: CollectionRepository,
    U: UserRepository,
    P: ShoppingListRenderer + 'static,
{
    async fn export_shopping_list(
        &self,
        principal: Principal,
    ) -> Result<ShoppingListDocument, Error> {
        let user = self
            .users
            .find_by_id(principal.id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {} not found", principal.id)))?;
        let rows = self.collections.cart_ingredients(principal.id).await?;
        let list = ShoppingList::aggregate(rows);

        let renderer = Arc::clone(&self.renderer);
        let content = tokio::task::spawn_blocking(move || renderer.render(&list))
            .await
            .map_err(|err| Error::internal(format!("shopping list task failed: {err}")))??;

        Ok(ShoppingListDocument {
            filename: format!("shopping_cart_{}.pdf", user.username),
            content,
        })
    }
}

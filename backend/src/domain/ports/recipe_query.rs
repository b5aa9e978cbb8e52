//! Driving port for recipe reads and short-link resolution.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    Counted, Error, Principal, RecipeFilterQuery, RecipeId, RecipeView, ShortCode,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Filtered recipes, newest first.
    async fn list_recipes(
        &self,
        viewer: Option<Principal>,
        filter: RecipeFilterQuery,
        page: PageRequest,
    ) -> Result<Counted<RecipeView>, Error>;

    async fn recipe(&self, viewer: Option<Principal>, id: RecipeId) -> Result<RecipeView, Error>;

    /// Short code assigned to a recipe.
    async fn short_link(&self, id: RecipeId) -> Result<ShortCode, Error>;

    /// Recipe behind a short code; `NotFound` when unknown.
    async fn resolve_short_link(&self, code: ShortCode) -> Result<RecipeId, Error>;
}

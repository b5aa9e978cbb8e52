//! Port for recipe persistence.
//!
//! Multi-row writes ([`RecipeRepository::create`] and
//! [`RecipeRepository::update`]) must be atomic: the recipe row and its tag
//! and ingredient join rows are written in one transaction, and an update
//! replaces both join sets wholesale.

use std::collections::HashMap;

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    Counted, NewRecipe, Recipe, RecipeChanges, RecipeFilter, RecipeId, RecipeRelations,
    RecipeSummary, ShortCode, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "recipe repository query failed: {message}",
        /// A unique constraint rejected the write.
        Duplicate { message: String } => Conflict: "{message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its join rows.
    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipeRepositoryError>;

    /// Overwrite a recipe; `None` when it no longer exists.
    async fn update(
        &self,
        id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Returns `false` when no row matched.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    async fn find_by_short_code(
        &self,
        code: &ShortCode,
    ) -> Result<Option<RecipeId>, RecipeRepositoryError>;

    async fn short_code_exists(&self, code: &ShortCode) -> Result<bool, RecipeRepositoryError>;

    /// Recipes matching `filter`, newest first.
    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Counted<Recipe>, RecipeRepositoryError>;

    /// Tags, ingredient lines and viewer flags for each of `ids`.
    ///
    /// Flags are `false` when `viewer` is `None`. Ids without rows map to
    /// empty relations.
    async fn relations(
        &self,
        ids: &[RecipeId],
        viewer: Option<UserId>,
    ) -> Result<HashMap<RecipeId, RecipeRelations>, RecipeRepositoryError>;

    /// Newest recipes of `author`, truncated to `limit`, with the author's
    /// total recipe count.
    async fn author_summaries(
        &self,
        author: UserId,
        limit: Option<u32>,
    ) -> Result<Counted<RecipeSummary>, RecipeRepositoryError>;
}

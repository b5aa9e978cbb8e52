//! Port for tag and ingredient persistence.
//!
//! Tags and ingredients are small reference tables maintained by
//! administrators. Recipe validation uses [`CatalogueRepository::missing_tags`]
//! and [`CatalogueRepository::missing_ingredients`] to reject references to
//! rows that do not exist.

use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, NewIngredient, NewTag, Tag, TagId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "catalogue repository query failed: {message}",
        /// Unique slug or (name, unit) pair already present.
        Duplicate { message: String } => Conflict: "{message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// All tags ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError>;

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError>;

    async fn create_tag(&self, tag: &NewTag) -> Result<Tag, CatalogueRepositoryError>;

    /// Returns `false` when no row matched.
    async fn delete_tag(&self, id: TagId) -> Result<bool, CatalogueRepositoryError>;

    /// Ingredients ordered by id, optionally restricted to a case-insensitive
    /// name prefix.
    async fn list_ingredients(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError>;

    async fn create_ingredient(
        &self,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, CatalogueRepositoryError>;

    /// Returns `false` when no row matched.
    async fn delete_ingredient(&self, id: IngredientId) -> Result<bool, CatalogueRepositoryError>;

    /// Ids from `ids` with no matching tag row.
    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError>;

    /// Ids from `ids` with no matching ingredient row.
    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError>;

    /// Insert entries that are not present yet, returning how many were
    /// added. Used by the bulk importer.
    async fn import(
        &self,
        tags: &[NewTag],
        ingredients: &[NewIngredient],
    ) -> Result<ImportSummary, CatalogueRepositoryError>;
}

/// Rows inserted by [`CatalogueRepository::import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub tags_added: usize,
    pub ingredients_added: usize,
}

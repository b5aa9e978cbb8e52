//! PostgreSQL-backed tag and ingredient catalogue.

use std::collections::HashSet;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError, ImportSummary};
use crate::domain::{Ingredient, IngredientId, NewIngredient, NewTag, Tag, TagId};

use super::diesel_helpers::{DbFailure, classify_diesel_error, map_pool_error_message};
use super::models::{IngredientRow, NewIngredientRow, NewTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, tags};

/// Diesel-backed implementation of the [`CatalogueRepository`] port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost/foodgram")).await?;
    /// let repo = DieselCatalogueRepository::new(pool);
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    CatalogueRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    duplicate_message: &'static str,
) -> CatalogueRepositoryError {
    match classify_diesel_error(error, "catalogue") {
        DbFailure::Connection(message) => CatalogueRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => CatalogueRepositoryError::duplicate(duplicate_message),
        DbFailure::Query(message) => CatalogueRepositoryError::query(message),
        DbFailure::CheckViolation { .. } => CatalogueRepositoryError::query("constraint violated"),
    }
}

fn map_read_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_diesel_error(error, "duplicate catalogue entry")
}

const DUPLICATE_TAG: &str = "a tag with this slug already exists";
const DUPLICATE_INGREDIENT: &str =
    "an ingredient with this name and measurement unit already exists";

/// Escape `LIKE` wildcards so the prefix matches literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Requested ids absent from `found`, in request order.
fn missing<T: Copy + Eq + std::hash::Hash>(requested: &[T], found: &[T]) -> Vec<T> {
    let found: HashSet<T> = found.iter().copied().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect()
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order_by((tags::name, tags::id))
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(rows.into_iter().map(Tag::from).collect())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TagRow> = tags::table
            .filter(tags::id.eq(id.get()))
            .select(TagRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Tag::from))
    }

    async fn create_tag(&self, tag: &NewTag) -> Result<Tag, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(tags::table)
            .values(&NewTagRow {
                name: tag.name(),
                slug: tag.slug(),
            })
            .returning(TagRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Tag::from)
            .map_err(|err| map_diesel_error(err, DUPLICATE_TAG))
    }

    async fn delete_tag(&self, id: TagId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(tags::table.filter(tags::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(deleted > 0)
    }

    async fn list_ingredients(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .order_by(ingredients::id)
            .select(IngredientRow::as_select())
            .into_boxed();
        if let Some(prefix) = name_prefix {
            query = query.filter(ingredients::name.ilike(like_prefix(&prefix)));
        }
        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(map_read_error)?;
        Ok(rows.into_iter().map(Ingredient::from).collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .filter(ingredients::id.eq(id.get()))
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        Ok(row.map(Ingredient::from))
    }

    async fn create_ingredient(
        &self,
        ingredient: &NewIngredient,
    ) -> Result<Ingredient, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(ingredients::table)
            .values(&NewIngredientRow {
                name: ingredient.name(),
                measurement_unit: ingredient.measurement_unit(),
            })
            .returning(IngredientRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Ingredient::from)
            .map_err(|err| map_diesel_error(err, DUPLICATE_INGREDIENT))
    }

    async fn delete_ingredient(&self, id: IngredientId) -> Result<bool, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(ingredients::table.filter(ingredients::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(deleted > 0)
    }

    async fn missing_tags(&self, ids: &[TagId]) -> Result<Vec<TagId>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Vec<i64> = tags::table
            .filter(tags::id.eq_any(ids.iter().map(|id| id.get()).collect::<Vec<_>>()))
            .select(tags::id)
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        let found: Vec<TagId> = found.into_iter().map(TagId::new).collect();
        Ok(missing(ids, &found))
    }

    async fn missing_ingredients(
        &self,
        ids: &[IngredientId],
    ) -> Result<Vec<IngredientId>, CatalogueRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let found: Vec<i64> = ingredients::table
            .filter(ingredients::id.eq_any(ids.iter().map(|id| id.get()).collect::<Vec<_>>()))
            .select(ingredients::id)
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        let found: Vec<IngredientId> = found.into_iter().map(IngredientId::new).collect();
        Ok(missing(ids, &found))
    }

    async fn import(
        &self,
        tags: &[NewTag],
        ingredients: &[NewIngredient],
    ) -> Result<ImportSummary, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let tag_rows: Vec<NewTagRow<'_>> = tags
            .iter()
            .map(|tag| NewTagRow {
                name: tag.name(),
                slug: tag.slug(),
            })
            .collect();
        let ingredient_rows: Vec<NewIngredientRow<'_>> = ingredients
            .iter()
            .map(|ingredient| NewIngredientRow {
                name: ingredient.name(),
                measurement_unit: ingredient.measurement_unit(),
            })
            .collect();

        conn.transaction(|conn| {
            async move {
                let mut summary = ImportSummary::default();
                if !tag_rows.is_empty() {
                    summary.tags_added = diesel::insert_into(tags::table)
                        .values(&tag_rows)
                        .on_conflict(tags::slug)
                        .do_nothing()
                        .execute(conn)
                        .await?;
                }
                if !ingredient_rows.is_empty() {
                    summary.ingredients_added = diesel::insert_into(ingredients::table)
                        .values(&ingredient_rows)
                        .on_conflict((ingredients::name, ingredients::measurement_unit))
                        .do_nothing()
                        .execute(conn)
                        .await?;
                }
                Ok(summary)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_read_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("sug", "sug%")]
    #[case("50%_", "50\\%\\_%")]
    #[case("", "%")]
    fn prefixes_are_escaped(#[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(like_prefix(prefix), expected);
    }

    #[rstest]
    fn missing_keeps_request_order() {
        let requested = [TagId::new(3), TagId::new(1), TagId::new(2)];
        let found = [TagId::new(1)];
        assert_eq!(missing(&requested, &found), vec![TagId::new(3), TagId::new(2)]);
    }
}

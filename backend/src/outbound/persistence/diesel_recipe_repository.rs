//! PostgreSQL-backed recipe storage.
//!
//! A recipe row and its tag and ingredient join rows are written in one
//! transaction. Updates replace both join sets wholesale.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Counted, Ingredient, IngredientAmount, NewRecipe, Recipe, RecipeChanges, RecipeFilter,
    RecipeId, RecipeIngredientLine, RecipeRelations, RecipeSummary, ShortCode, Tag, TagId, UserId,
};

use super::diesel_helpers::{
    DbFailure, classify_diesel_error, from_db_count, from_db_int, map_pool_error_message,
    page_window, to_db_int,
};
use super::models::{
    IngredientRow, NewRecipeRow, RecipeIngredientRow, RecipeRow, RecipeSummaryRow, RecipeTagRow,
    RecipeUpdate, TagRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    favorites, ingredients, recipe_ingredients, recipe_tags, recipes, shopping_cart, tags,
};

/// Diesel-backed implementation of the [`RecipeRepository`] port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    RecipeRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    match classify_diesel_error(error, "recipes") {
        DbFailure::Connection(message) => RecipeRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => {
            RecipeRepositoryError::duplicate("a recipe with this short code already exists")
        }
        DbFailure::Query(message) => RecipeRepositoryError::query(message),
        DbFailure::CheckViolation { constraint } => RecipeRepositoryError::query(format!(
            "constraint {} violated",
            constraint.as_deref().unwrap_or("unknown")
        )),
    }
}

fn tag_rows(recipe_id: i64, tags: &[TagId]) -> Vec<RecipeTagRow> {
    tags.iter()
        .map(|tag| RecipeTagRow {
            recipe_id,
            tag_id: tag.get(),
        })
        .collect()
}

fn ingredient_rows(recipe_id: i64, lines: &[IngredientAmount]) -> Vec<RecipeIngredientRow> {
    lines
        .iter()
        .map(|line| RecipeIngredientRow {
            recipe_id,
            ingredient_id: line.ingredient_id.get(),
            amount: to_db_int(line.amount),
        })
        .collect()
}

/// Insert the join rows of one recipe.
async fn insert_joins(
    conn: &mut AsyncPgConnection,
    recipe_id: i64,
    tags: &[TagId],
    lines: &[IngredientAmount],
) -> QueryResult<()> {
    diesel::insert_into(recipe_tags::table)
        .values(tag_rows(recipe_id, tags))
        .execute(conn)
        .await?;
    diesel::insert_into(recipe_ingredients::table)
        .values(ingredient_rows(recipe_id, lines))
        .execute(conn)
        .await?;
    Ok(())
}

/// Recipes matching `filter`, unordered and unpaginated.
fn filtered(filter: &RecipeFilter) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(author.get()));
    }
    if !filter.tag_slugs.is_empty() {
        query = query.filter(
            recipes::id.eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::slug.eq_any(filter.tag_slugs.clone()))
                    .select(recipe_tags::recipe_id),
            ),
        );
    }
    if let Some(user) = filter.favorited_by {
        query = query.filter(
            recipes::id.eq_any(
                favorites::table
                    .filter(favorites::user_id.eq(user.get()))
                    .select(favorites::recipe_id),
            ),
        );
    }
    if let Some(user) = filter.in_cart_of {
        query = query.filter(
            recipes::id.eq_any(
                shopping_cart::table
                    .filter(shopping_cart::user_id.eq(user.get()))
                    .select(shopping_cart::recipe_id),
            ),
        );
    }
    query
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(&self, recipe: &NewRecipe) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRecipeRow {
            author_id: recipe.author_id.get(),
            name: &recipe.name,
            image: recipe.image.as_str(),
            description: &recipe.text,
            cooking_time: to_db_int(recipe.cooking_time),
            short_code: recipe.short_code.as_str(),
        };

        conn.transaction(|conn| {
            async move {
                let stored: RecipeRow = diesel::insert_into(recipes::table)
                    .values(&row)
                    .returning(RecipeRow::as_returning())
                    .get_result(conn)
                    .await?;
                insert_joins(conn, stored.id, &recipe.tags, &recipe.ingredients).await?;
                Ok(Recipe::from(stored))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn update(
        &self,
        id: RecipeId,
        changes: &RecipeChanges,
    ) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let update = RecipeUpdate {
            name: &changes.name,
            image: changes.image.as_ref().map(|image| image.as_str()),
            description: &changes.text,
            cooking_time: to_db_int(changes.cooking_time),
        };

        conn.transaction(|conn| {
            async move {
                let stored: Option<RecipeRow> =
                    diesel::update(recipes::table.filter(recipes::id.eq(id.get())))
                        .set(&update)
                        .returning(RecipeRow::as_returning())
                        .get_result(conn)
                        .await
                        .optional()?;
                let Some(stored) = stored else {
                    return Ok(None);
                };
                diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(stored.id)))
                    .execute(conn)
                    .await?;
                diesel::delete(
                    recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(stored.id)),
                )
                .execute(conn)
                .await?;
                insert_joins(conn, stored.id, &changes.tags, &changes.ingredients).await?;
                Ok(Some(Recipe::from(stored)))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(recipes::table.filter(recipes::id.eq(id.get())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<RecipeRow> = recipes::table
            .filter(recipes::id.eq(id.get()))
            .select(RecipeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Recipe::from))
    }

    async fn find_by_short_code(
        &self,
        code: &ShortCode,
    ) -> Result<Option<RecipeId>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id: Option<i64> = recipes::table
            .filter(recipes::short_code.eq(code.as_str()))
            .select(recipes::id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(id.map(RecipeId::new))
    }

    async fn short_code_exists(&self, code: &ShortCode) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            recipes::table.filter(recipes::short_code.eq(code.as_str())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn list(
        &self,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Counted<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let (limit, offset) = page_window(page);

        let total: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows: Vec<RecipeRow> = filtered(filter)
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .limit(limit)
            .offset(offset)
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(Counted::new(
            rows.into_iter().map(Recipe::from).collect(),
            from_db_count(total),
        ))
    }

    async fn relations(
        &self,
        ids: &[RecipeId],
        viewer: Option<UserId>,
    ) -> Result<HashMap<RecipeId, RecipeRelations>, RecipeRepositoryError> {
        let mut relations: HashMap<RecipeId, RecipeRelations> = ids
            .iter()
            .map(|id| (*id, RecipeRelations::default()))
            .collect();
        if ids.is_empty() {
            return Ok(relations);
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw: Vec<i64> = ids.iter().map(|id| id.get()).collect();

        let tag_rows: Vec<(i64, TagRow)> = recipe_tags::table
            .inner_join(tags::table)
            .filter(recipe_tags::recipe_id.eq_any(&raw))
            .order_by((tags::name, tags::id))
            .select((recipe_tags::recipe_id, TagRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        for (recipe_id, row) in tag_rows {
            if let Some(entry) = relations.get_mut(&RecipeId::new(recipe_id)) {
                entry.tags.push(Tag::from(row));
            }
        }

        let ingredient_rows: Vec<(i64, IngredientRow, i32)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(recipe_ingredients::recipe_id.eq_any(&raw))
            .order_by((ingredients::name, ingredients::id))
            .select((
                recipe_ingredients::recipe_id,
                IngredientRow::as_select(),
                recipe_ingredients::amount,
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        for (recipe_id, row, amount) in ingredient_rows {
            if let Some(entry) = relations.get_mut(&RecipeId::new(recipe_id)) {
                entry.ingredients.push(RecipeIngredientLine {
                    ingredient: Ingredient::from(row),
                    amount: from_db_int(amount),
                });
            }
        }

        let Some(viewer) = viewer else {
            return Ok(relations);
        };
        let favorited: Vec<i64> = favorites::table
            .filter(favorites::user_id.eq(viewer.get()))
            .filter(favorites::recipe_id.eq_any(&raw))
            .select(favorites::recipe_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        for recipe_id in favorited {
            if let Some(entry) = relations.get_mut(&RecipeId::new(recipe_id)) {
                entry.is_favorited = true;
            }
        }
        let carted: Vec<i64> = shopping_cart::table
            .filter(shopping_cart::user_id.eq(viewer.get()))
            .filter(shopping_cart::recipe_id.eq_any(&raw))
            .select(shopping_cart::recipe_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        for recipe_id in carted {
            if let Some(entry) = relations.get_mut(&RecipeId::new(recipe_id)) {
                entry.is_in_shopping_cart = true;
            }
        }

        Ok(relations)
    }

    async fn author_summaries(
        &self,
        author: UserId,
        limit: Option<u32>,
    ) -> Result<Counted<RecipeSummary>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let mut query = recipes::table
            .filter(recipes::author_id.eq(author.get()))
            .order_by((recipes::created_at.desc(), recipes::id.desc()))
            .select(RecipeSummaryRow::as_select())
            .into_boxed();
        if let Some(limit) = limit {
            query = query.limit(i64::from(limit));
        }
        let rows: Vec<RecipeSummaryRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;

        Ok(Counted::new(
            rows.into_iter().map(RecipeSummary::from).collect(),
            from_db_count(total),
        ))
    }
}

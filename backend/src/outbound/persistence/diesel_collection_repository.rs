//! PostgreSQL-backed favorites and shopping cart.
//!
//! Both collections are `(user_id, recipe_id)` tables whose primary key is
//! the only guard against double submission.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CollectionRepository, CollectionRepositoryError, RecipeCollection};
use crate::domain::{CartIngredient, RecipeId, UserId};

use super::diesel_helpers::{
    DbFailure, classify_diesel_error, from_db_int, map_pool_error_message,
};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, ingredients, recipe_ingredients, shopping_cart};

#[derive(Clone)]
pub struct DieselCollectionRepository {
    pool: DbPool,
}

impl DieselCollectionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CollectionRepositoryError {
    CollectionRepositoryError::connection(map_pool_error_message(error))
}

fn map_diesel_error(
    error: diesel::result::Error,
    collection: RecipeCollection,
) -> CollectionRepositoryError {
    match classify_diesel_error(error, "collections") {
        DbFailure::Connection(message) => CollectionRepositoryError::connection(message),
        DbFailure::UniqueViolation { .. } => {
            CollectionRepositoryError::duplicate(collection.to_string())
        }
        DbFailure::Query(message) => CollectionRepositoryError::query(message),
        DbFailure::CheckViolation { .. } => {
            CollectionRepositoryError::query("constraint violated")
        }
    }
}

#[async_trait]
impl CollectionRepository for DieselCollectionRepository {
    async fn add(
        &self,
        collection: RecipeCollection,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = match collection {
            RecipeCollection::Favorites => {
                diesel::insert_into(favorites::table)
                    .values((
                        favorites::user_id.eq(user.get()),
                        favorites::recipe_id.eq(recipe.get()),
                    ))
                    .execute(&mut conn)
                    .await
            }
            RecipeCollection::ShoppingCart => {
                diesel::insert_into(shopping_cart::table)
                    .values((
                        shopping_cart::user_id.eq(user.get()),
                        shopping_cart::recipe_id.eq(recipe.get()),
                    ))
                    .execute(&mut conn)
                    .await
            }
        };
        inserted
            .map(|_| ())
            .map_err(|err| map_diesel_error(err, collection))
    }

    async fn remove(
        &self,
        collection: RecipeCollection,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = match collection {
            RecipeCollection::Favorites => {
                diesel::delete(
                    favorites::table
                        .filter(favorites::user_id.eq(user.get()))
                        .filter(favorites::recipe_id.eq(recipe.get())),
                )
                .execute(&mut conn)
                .await
            }
            RecipeCollection::ShoppingCart => {
                diesel::delete(
                    shopping_cart::table
                        .filter(shopping_cart::user_id.eq(user.get()))
                        .filter(shopping_cart::recipe_id.eq(recipe.get())),
                )
                .execute(&mut conn)
                .await
            }
        };
        deleted
            .map(|count| count > 0)
            .map_err(|err| map_diesel_error(err, collection))
    }

    async fn cart_ingredients(
        &self,
        user: UserId,
    ) -> Result<Vec<CartIngredient>, CollectionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(String, String, i32)> = recipe_ingredients::table
            .inner_join(ingredients::table)
            .filter(
                recipe_ingredients::recipe_id.eq_any(
                    shopping_cart::table
                        .filter(shopping_cart::user_id.eq(user.get()))
                        .select(shopping_cart::recipe_id),
                ),
            )
            .select((
                ingredients::name,
                ingredients::measurement_unit,
                recipe_ingredients::amount,
            ))
            .load(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, RecipeCollection::ShoppingCart))?;

        Ok(rows
            .into_iter()
            .map(|(name, measurement_unit, amount)| CartIngredient {
                name,
                measurement_unit,
                amount: from_db_int(amount),
            })
            .collect())
    }
}

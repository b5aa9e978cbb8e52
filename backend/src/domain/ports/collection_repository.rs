//! Port for per-user recipe collections: favorites and the shopping cart.
use std::fmt;

use async_trait::async_trait;

use crate::domain::{CartIngredient, RecipeId, UserId};

use super::define_port_error;

/// The two symmetric toggle collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecipeCollection {
    Favorites,
    ShoppingCart,
}

impl fmt::Display for RecipeCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Favorites => "favorites",
            Self::ShoppingCart => "shopping cart",
        })
    }
}

define_port_error! {
    /// Errors raised by collection repository adapters.
    pub enum CollectionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            ServiceUnavailable: "collection repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            InternalError: "collection repository query failed: {message}",
        /// The `(user, recipe)` pair is already present.
        Duplicate { collection: String } =>
            Conflict: "recipe is already in {collection}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Insert the pair; an existing pair yields
    /// [`CollectionRepositoryError::Duplicate`].
    async fn add(
        &self,
        collection: RecipeCollection,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), CollectionRepositoryError>;

    /// Returns `false` when the pair was absent.
    async fn remove(
        &self,
        collection: RecipeCollection,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, CollectionRepositoryError>;

    /// Every ingredient line of every recipe in the user's cart.
    async fn cart_ingredients(
        &self,
        user: UserId,
    ) -> Result<Vec<CartIngredient>, CollectionRepositoryError>;
}

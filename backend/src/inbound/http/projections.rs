//! JSON response projections.
//!
//! Domain entities hold stored image paths; responses expose absolute media
//! URLs, so projections are built through [`Projector`], which borrows the
//! image store for URL resolution.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ImageStore;
use crate::domain::{
    AuthorSubscription, Ingredient, RecipeIngredientLine, RecipeSummary, RecipeView, Tag, User,
    UserProfile,
};

/// Public user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "chef@example.com")]
    pub email: String,
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "chef")]
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this user. Always false for anonymous viewers.
    pub is_subscribed: bool,
    pub avatar: Option<String>,
}

/// Account returned by registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RegisteredUserResponse {
    pub email: String,
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<User> for RegisteredUserResponse {
    fn from(user: User) -> Self {
        Self {
            email: user.email,
            id: user.id.get(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TagResponse {
    pub id: i64,
    #[schema(example = "Breakfast")]
    pub name: String,
    #[schema(example = "breakfast")]
    pub slug: String,
}

impl From<Tag> for TagResponse {
    fn from(tag: Tag) -> Self {
        Self {
            id: tag.id.get(),
            name: tag.name,
            slug: tag.slug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IngredientResponse {
    pub id: i64,
    #[schema(example = "flour")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientResponse {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.get(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeIngredientResponse {
    pub id: i64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

impl From<RecipeIngredientLine> for RecipeIngredientResponse {
    fn from(line: RecipeIngredientLine) -> Self {
        Self {
            id: line.ingredient.id.get(),
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount,
        }
    }
}

/// Full recipe projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeResponse {
    pub id: i64,
    pub tags: Vec<TagResponse>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    pub image: String,
    pub text: String,
    pub cooking_time: u32,
}

/// Minimal recipe projection used by toggles and subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecipeSummaryResponse {
    pub id: i64,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

/// A followed author with a preview of their recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    #[serde(flatten)]
    pub author: UserResponse,
    pub recipes: Vec<RecipeSummaryResponse>,
    pub recipes_count: u64,
}

/// Builds projections that embed media URLs.
#[derive(Clone, Copy)]
pub struct Projector<'a> {
    images: &'a dyn ImageStore,
}

impl<'a> Projector<'a> {
    pub fn new(images: &'a dyn ImageStore) -> Self {
        Self { images }
    }

    pub fn user(&self, profile: UserProfile) -> UserResponse {
        let UserProfile {
            user,
            is_subscribed,
        } = profile;
        UserResponse {
            avatar: user.avatar.as_ref().map(|image| self.images.url(image)),
            email: user.email,
            id: user.id.get(),
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_subscribed,
        }
    }

    pub fn summary(&self, summary: RecipeSummary) -> RecipeSummaryResponse {
        RecipeSummaryResponse {
            id: summary.id.get(),
            image: self.images.url(&summary.image),
            name: summary.name,
            cooking_time: summary.cooking_time,
        }
    }

    pub fn recipe(&self, view: RecipeView) -> RecipeResponse {
        let RecipeView {
            recipe,
            author,
            relations,
        } = view;
        RecipeResponse {
            id: recipe.id.get(),
            tags: relations.tags.into_iter().map(TagResponse::from).collect(),
            author: self.user(author),
            ingredients: relations
                .ingredients
                .into_iter()
                .map(RecipeIngredientResponse::from)
                .collect(),
            is_favorited: relations.is_favorited,
            is_in_shopping_cart: relations.is_in_shopping_cart,
            image: self.images.url(&recipe.image),
            name: recipe.name,
            text: recipe.text,
            cooking_time: recipe.cooking_time,
        }
    }

    pub fn subscription(&self, subscription: AuthorSubscription) -> SubscriptionResponse {
        SubscriptionResponse {
            author: self.user(subscription.author),
            recipes: subscription
                .recipes
                .into_iter()
                .map(|summary| self.summary(summary))
                .collect(),
            recipes_count: subscription.recipes_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StoredImage, UserId};
    use crate::inbound::http::test_utils::{media_store, sample_profile, sample_view};
    use rstest::rstest;

    #[rstest]
    fn user_projection_resolves_avatar_url() {
        let store = media_store();
        let mut profile = sample_profile(3, true);
        profile.user.avatar = Some(StoredImage::new("users/avatars/a.png"));

        let response = Projector::new(&store).user(profile);

        assert_eq!(response.id, 3);
        assert!(response.is_subscribed);
        assert_eq!(
            response.avatar.as_deref(),
            Some("http://testserver/media/users/avatars/a.png")
        );
    }

    #[rstest]
    fn recipe_projection_flattens_relations() {
        let store = media_store();
        let response = Projector::new(&store).recipe(sample_view(10, UserId::new(3)));

        let json = serde_json::to_value(&response).expect("serialise");
        assert_eq!(json["id"], 10);
        assert_eq!(json["author"]["id"], 3);
        assert_eq!(json["ingredients"][0]["measurement_unit"], "g");
        assert_eq!(json["tags"][0]["slug"], "breakfast");
        assert_eq!(json["image"], "http://testserver/media/recipes/images/10.png");
    }

    #[rstest]
    fn subscription_projection_inlines_author_fields() {
        let store = media_store();
        let view = sample_view(10, UserId::new(3));
        let subscription = AuthorSubscription {
            author: view.author.clone(),
            recipes: vec![RecipeSummary::from(&view.recipe)],
            recipes_count: 4,
        };

        let json = serde_json::to_value(Projector::new(&store).subscription(subscription))
            .expect("serialise");

        assert_eq!(json["username"], "user3");
        assert_eq!(json["recipes_count"], 4);
        assert_eq!(json["recipes"][0]["cooking_time"], 15);
        assert!(json.get("author").is_none());
    }
}

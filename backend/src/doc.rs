//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every endpoint under `/api`, the short link redirect and the
//!   health probes
//! - **Schemas**: request and response bodies plus domain type wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that keep utoipa out of the
//!   domain
//! - **Security**: the `Authorization: Token <key>` scheme
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::catalogue::{IngredientRequest, TagRequest};
use crate::inbound::http::projections::{
    IngredientResponse, RecipeIngredientResponse, RecipeResponse, RecipeSummaryResponse,
    RegisteredUserResponse, SubscriptionResponse, TagResponse, UserResponse,
};
use crate::inbound::http::recipes::{IngredientAmountRequest, RecipeRequest, ShortLinkResponse};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, RecipePageSchema, SubscriptionPageSchema, UserPageSchema,
};
use crate::inbound::http::tokens::{LoginRequest, TokenResponse};
use crate::inbound::http::users::{
    AvatarRequest, AvatarResponse, RegisterRequest, SetPasswordRequest,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "TokenAuth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` issued by POST /api/auth/token/login/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Foodgram API",
        description = "Recipe sharing: users, tags, ingredients, recipes, favourites, shopping cart and subscriptions."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("TokenAuth" = [])),
    paths(
        crate::inbound::http::tokens::login,
        crate::inbound::http::tokens::logout,
        crate::inbound::http::users::register,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::user_profile,
        crate::inbound::http::users::user_write_not_allowed,
        crate::inbound::http::users::set_password,
        crate::inbound::http::users::set_avatar,
        crate::inbound::http::users::remove_avatar,
        crate::inbound::http::subscriptions::list_subscriptions,
        crate::inbound::http::subscriptions::subscribe,
        crate::inbound::http::subscriptions::unsubscribe,
        crate::inbound::http::catalogue::list_tags,
        crate::inbound::http::catalogue::get_tag,
        crate::inbound::http::catalogue::create_tag,
        crate::inbound::http::catalogue::delete_tag,
        crate::inbound::http::catalogue::list_ingredients,
        crate::inbound::http::catalogue::get_ingredient,
        crate::inbound::http::catalogue::create_ingredient,
        crate::inbound::http::catalogue::delete_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::get_link,
        crate::inbound::http::recipes::add_favorite,
        crate::inbound::http::recipes::remove_favorite,
        crate::inbound::http::recipes::add_to_cart,
        crate::inbound::http::recipes::remove_from_cart,
        crate::inbound::http::recipes::download_shopping_cart,
        crate::inbound::http::short_links::resolve,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        TokenResponse,
        RegisterRequest,
        RegisteredUserResponse,
        SetPasswordRequest,
        AvatarRequest,
        AvatarResponse,
        UserResponse,
        UserPageSchema,
        SubscriptionResponse,
        SubscriptionPageSchema,
        TagRequest,
        TagResponse,
        IngredientRequest,
        IngredientResponse,
        IngredientAmountRequest,
        RecipeRequest,
        RecipeResponse,
        RecipeIngredientResponse,
        RecipeSummaryResponse,
        RecipePageSchema,
        ShortLinkResponse,
    )),
    tags(
        (name = "auth", description = "Token login and logout"),
        (name = "users", description = "Registration, profiles and avatars"),
        (name = "subscriptions", description = "Following authors"),
        (name = "tags", description = "Recipe tags"),
        (name = "ingredients", description = "Ingredient catalogue"),
        (name = "recipes", description = "Recipes, favourites, shopping cart and short links"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "details");
    }

    #[test]
    fn openapi_recipe_schema_exposes_flags() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let recipe = schemas.get("RecipeResponse").expect("RecipeResponse schema");

        assert_object_schema_has_field(recipe, "is_favorited");
        assert_object_schema_has_field(recipe, "is_in_shopping_cart");
        assert_object_schema_has_field(recipe, "cooking_time");
    }

    #[rstest]
    #[case("/api/auth/token/login/")]
    #[case("/api/users/")]
    #[case("/api/users/me/")]
    #[case("/api/users/subscriptions/")]
    #[case("/api/tags/{id}/")]
    #[case("/api/ingredients/")]
    #[case("/api/recipes/{id}/get-link/")]
    #[case("/api/recipes/download_shopping_cart/")]
    #[case("/s/{code}/")]
    #[case("/health/ready")]
    fn openapi_lists_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[test]
    fn openapi_registers_token_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("TokenAuth"));
    }
}

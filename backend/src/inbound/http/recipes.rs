//! Recipe handlers.
//!
//! ```text
//! GET    /api/recipes/?author&tags&is_favorited&is_in_shopping_cart&limit&offset
//! POST   /api/recipes/
//! GET    /api/recipes/download_shopping_cart/
//! GET    /api/recipes/{id}/
//! PATCH  /api/recipes/{id}/
//! DELETE /api/recipes/{id}/
//! GET    /api/recipes/{id}/get-link/
//! POST   /api/recipes/{id}/favorite/
//! DELETE /api/recipes/{id}/favorite/
//! POST   /api/recipes/{id}/shopping_cart/
//! DELETE /api/recipes/{id}/shopping_cart/
//! ```

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::{Page, PageLimits, PageRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::RecipeCollection;
use crate::domain::{
    Error, IngredientAmountInput, Principal, RecipeDraftInput, RecipeFilterQuery, RecipeId,
    UserId, parse_flag,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Authenticated, Viewer};
use crate::inbound::http::listing::page_of;
use crate::inbound::http::projections::{Projector, RecipeResponse, RecipeSummaryResponse};
use crate::inbound::http::schemas::{ErrorSchema, RecipePageSchema};
use crate::inbound::http::state::HttpState;

/// Recipe list query. `tags` may repeat; any matching slug selects a recipe.
#[derive(Debug, Default, Clone, PartialEq, Eq, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListParams {
    /// Author id.
    #[param(value_type = Option<i64>)]
    pub author: Option<String>,
    /// Tag slugs.
    pub tags: Vec<String>,
    /// `1` or `true` restricts to the caller's favorites.
    pub is_favorited: Option<String>,
    /// `1` or `true` restricts to the caller's shopping cart.
    pub is_in_shopping_cart: Option<String>,
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
    #[param(value_type = Option<u64>)]
    pub offset: Option<String>,
}

impl RecipeListParams {
    /// Collect parameters from decoded query pairs. Later scalars win.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "author" => params.author = Some(value),
                "tags" => params.tags.push(value),
                "is_favorited" => params.is_favorited = Some(value),
                "is_in_shopping_cart" => params.is_in_shopping_cart = Some(value),
                "limit" => params.limit = Some(value),
                "offset" => params.offset = Some(value),
                _ => {}
            }
        }
        params
    }

    pub fn filter(&self) -> Result<RecipeFilterQuery, Error> {
        let author = match self.author.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<i64>().map(UserId::new).map_err(|_| {
                Error::invalid_request("author must be a user id").with_details(json!({
                    "field": "author",
                    "code": "invalid",
                }))
            })?),
        };
        Ok(RecipeFilterQuery {
            author,
            tags: self
                .tags
                .iter()
                .map(|slug| slug.trim())
                .filter(|slug| !slug.is_empty())
                .map(str::to_owned)
                .collect(),
            is_favorited: parse_flag(self.is_favorited.as_deref()),
            is_in_shopping_cart: parse_flag(self.is_in_shopping_cart.as_deref()),
        })
    }

    pub fn page(&self, limits: PageLimits) -> PageRequest {
        PageRequest::from_query(self.limit.as_deref(), self.offset.as_deref(), limits)
    }
}

/// One `{id, amount}` ingredient line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct IngredientAmountRequest {
    pub id: i64,
    pub amount: i64,
}

/// Recipe create and update payload.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RecipeRequest {
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
    pub tags: Option<Vec<i64>>,
    /// `data:image/<format>;base64,<payload>`. Optional on update.
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    /// Minutes.
    pub cooking_time: Option<i64>,
}

impl From<RecipeRequest> for RecipeDraftInput {
    fn from(payload: RecipeRequest) -> Self {
        Self {
            name: payload.name,
            text: payload.text,
            cooking_time: payload.cooking_time,
            image: payload.image,
            ingredients: payload.ingredients.map(|lines| {
                lines
                    .into_iter()
                    .map(|line| IngredientAmountInput {
                        id: line.id,
                        amount: line.amount,
                    })
                    .collect()
            }),
            tags: payload.tags,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ShortLinkResponse {
    #[serde(rename = "short-link")]
    #[schema(example = "https://foodgram.example/s/Ab3dE9/")]
    pub short_link: String,
}

/// List recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/recipes/",
    params(RecipeListParams),
    responses(
        (status = 200, description = "Recipes", body = RecipePageSchema),
        (status = 400, description = "Invalid filter", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipes/")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    viewer: Viewer,
    req: HttpRequest,
    query: web::Query<Vec<(String, String)>>,
) -> ApiResult<web::Json<Page<RecipeResponse>>> {
    let params = RecipeListParams::from_pairs(query.into_inner());
    let filter = params.filter()?;
    let request = params.page(state.page_limits);
    let recipes = state
        .recipes
        .list_recipes(viewer.principal(), filter, request)
        .await?;
    let projector = Projector::new(state.images.as_ref());
    Ok(web::Json(page_of(&req, recipes, request, |view| {
        projector.recipe(view)
    })))
}

/// Publish a recipe.
#[utoipa::path(
    post,
    path = "/api/recipes/",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes/")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let view = state
        .recipe_commands
        .create_recipe(principal, payload.into_inner().into())
        .await?;
    let body = Projector::new(state.images.as_ref()).recipe(view);
    Ok(HttpResponse::Created().json(body))
}

#[utoipa::path(
    get,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipes/{id}/")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let view = state
        .recipes
        .recipe(viewer.principal(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(Projector::new(state.images.as_ref()).recipe(view)))
}

/// Update a recipe. Only its author may do so.
///
/// `ingredients` and `tags` replace the existing sets and are required.
#[utoipa::path(
    patch,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}/")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<i64>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let view = state
        .recipe_commands
        .update_recipe(
            viewer.principal(),
            RecipeId::new(path.into_inner()),
            payload.into_inner().into(),
        )
        .await?;
    Ok(web::Json(Projector::new(state.images.as_ref()).recipe(view)))
}

/// Delete a recipe. Only its author may do so.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .recipe_commands
        .delete_recipe(viewer.principal(), RecipeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Absolute short link for a recipe.
#[utoipa::path(
    get,
    path = "/api/recipes/{id}/get-link/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Short link", body = ShortLinkResponse),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipeLink",
    security([])
)]
#[get("/recipes/{id}/get-link/")]
pub async fn get_link(
    state: web::Data<HttpState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> ApiResult<web::Json<ShortLinkResponse>> {
    let code = state
        .recipes
        .short_link(RecipeId::new(path.into_inner()))
        .await?;
    let info = req.connection_info();
    Ok(web::Json(ShortLinkResponse {
        short_link: format!("{}://{}{}", info.scheme(), info.host(), code.path()),
    }))
}

async fn add_to(
    state: &HttpState,
    principal: Principal,
    collection: RecipeCollection,
    id: i64,
) -> ApiResult<HttpResponse> {
    let summary = state
        .collections
        .add_to_collection(principal, collection, RecipeId::new(id))
        .await?;
    let body: RecipeSummaryResponse = Projector::new(state.images.as_ref()).summary(summary);
    Ok(HttpResponse::Created().json(body))
}

async fn remove_from(
    state: &HttpState,
    principal: Principal,
    collection: RecipeCollection,
    id: i64,
) -> ApiResult<HttpResponse> {
    state
        .collections
        .remove_from_collection(principal, collection, RecipeId::new(id))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a recipe to the caller's favorites.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema),
        (status = 409, description = "Already a favorite", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{id}/favorite/")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add_to(
        &state,
        principal,
        RecipeCollection::Favorites,
        path.into_inner(),
    )
    .await
}

/// Remove a recipe from the caller's favorites.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/favorite/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not a favorite", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{id}/favorite/")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove_from(
        &state,
        principal,
        RecipeCollection::Favorites,
        path.into_inner(),
    )
    .await
}

/// Add a recipe to the caller's shopping cart.
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema),
        (status = 409, description = "Already in the cart", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "addToShoppingCart"
)]
#[post("/recipes/{id}/shopping_cart/")]
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    add_to(
        &state,
        principal,
        RecipeCollection::ShoppingCart,
        path.into_inner(),
    )
    .await
}

/// Remove a recipe from the caller's shopping cart.
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}/shopping_cart/",
    params(("id" = i64, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 400, description = "Not in the cart", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "removeFromShoppingCart"
)]
#[delete("/recipes/{id}/shopping_cart/")]
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    remove_from(
        &state,
        principal,
        RecipeCollection::ShoppingCart,
        path.into_inner(),
    )
    .await
}

/// Aggregated shopping list of the caller's cart as a PDF attachment.
#[utoipa::path(
    get,
    path = "/api/recipes/download_shopping_cart/",
    responses(
        (status = 200, description = "Shopping list", content_type = "application/pdf", body = Vec<u8>),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "downloadShoppingCart"
)]
#[get("/recipes/download_shopping_cart/")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
) -> ApiResult<HttpResponse> {
    let document = state.shopping_list.export_shopping_list(principal).await?;
    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(document.filename)],
        })
        .body(document.content))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;

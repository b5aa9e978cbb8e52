//! Tag and ingredient catalogue handlers.
//!
//! ```text
//! GET    /api/tags/
//! POST   /api/tags/
//! GET    /api/tags/{id}/
//! DELETE /api/tags/{id}/
//! GET    /api/ingredients/?name=
//! POST   /api/ingredients/
//! GET    /api/ingredients/{id}/
//! DELETE /api/ingredients/{id}/
//! ```
//!
//! Reads are public and unpaginated. Writes are reserved for superusers.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{IngredientId, NewIngredient, NewTag, TagId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Viewer;
use crate::inbound::http::projections::{IngredientResponse, TagResponse};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, catalogue_field_error, required};

#[derive(Debug, Deserialize, ToSchema)]
pub struct TagRequest {
    #[schema(example = "Breakfast")]
    pub name: Option<String>,
    #[schema(example = "breakfast")]
    pub slug: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IngredientRequest {
    #[schema(example = "flour")]
    pub name: Option<String>,
    #[schema(example = "g")]
    pub measurement_unit: Option<String>,
}

/// Ingredient search parameters.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientSearch {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// List all tags.
#[utoipa::path(
    get,
    path = "/api/tags/",
    responses((status = 200, description = "Tags ordered by name", body = [TagResponse])),
    tags = ["catalogue"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags/")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.catalogue.tags().await?;
    Ok(web::Json(tags.into_iter().map(TagResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/tags/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag", body = TagResponse),
        (status = 404, description = "Unknown tag", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getTag",
    security([])
)]
#[get("/tags/{id}/")]
pub async fn get_tag(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<TagResponse>> {
    let tag = state.catalogue.tag(TagId::new(path.into_inner())).await?;
    Ok(web::Json(tag.into()))
}

/// Create a tag. Superusers only.
#[utoipa::path(
    post,
    path = "/api/tags/",
    request_body = TagRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a superuser", body = ErrorSchema),
        (status = 409, description = "Slug already taken", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createTag"
)]
#[post("/tags/")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    viewer: Viewer,
    payload: web::Json<TagRequest>,
) -> ApiResult<HttpResponse> {
    let TagRequest { name, slug } = payload.into_inner();
    let name = required(name, FieldName::new("name"))?;
    let slug = required(slug, FieldName::new("slug"))?;
    let tag = NewTag::new(&name, &slug).map_err(|err| catalogue_field_error(&err))?;
    let created = state
        .catalogue_admin
        .create_tag(viewer.principal(), tag)
        .await?;
    Ok(HttpResponse::Created().json(TagResponse::from(created)))
}

/// Delete a tag. Superusers only.
#[utoipa::path(
    delete,
    path = "/api/tags/{id}/",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 204, description = "Tag deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a superuser", body = ErrorSchema),
        (status = 404, description = "Unknown tag", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "deleteTag"
)]
#[delete("/tags/{id}/")]
pub async fn delete_tag(
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .catalogue_admin
        .delete_tag(viewer.principal(), TagId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// List ingredients, optionally filtered by name prefix.
#[utoipa::path(
    get,
    path = "/api/ingredients/",
    params(IngredientSearch),
    responses((status = 200, description = "Ingredients", body = [IngredientResponse])),
    tags = ["catalogue"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    query: web::Query<IngredientSearch>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let prefix = query
        .into_inner()
        .name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty());
    let ingredients = state.catalogue.ingredients(prefix).await?;
    Ok(web::Json(
        ingredients
            .into_iter()
            .map(IngredientResponse::from)
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientResponse),
        (status = 404, description = "Unknown ingredient", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}/")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<i64>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let ingredient = state
        .catalogue
        .ingredient(IngredientId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ingredient.into()))
}

/// Create an ingredient. Superusers only.
#[utoipa::path(
    post,
    path = "/api/ingredients/",
    request_body = IngredientRequest,
    responses(
        (status = 201, description = "Ingredient created", body = IngredientResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a superuser", body = ErrorSchema),
        (status = 409, description = "Name and unit already exist", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createIngredient"
)]
#[post("/ingredients/")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    viewer: Viewer,
    payload: web::Json<IngredientRequest>,
) -> ApiResult<HttpResponse> {
    let IngredientRequest {
        name,
        measurement_unit,
    } = payload.into_inner();
    let name = required(name, FieldName::new("name"))?;
    let unit = required(measurement_unit, FieldName::new("measurement_unit"))?;
    let ingredient = NewIngredient::new(&name, &unit).map_err(|err| catalogue_field_error(&err))?;
    let created = state
        .catalogue_admin
        .create_ingredient(viewer.principal(), ingredient)
        .await?;
    Ok(HttpResponse::Created().json(IngredientResponse::from(created)))
}

/// Delete an ingredient. Superusers only.
#[utoipa::path(
    delete,
    path = "/api/ingredients/{id}/",
    params(("id" = i64, Path, description = "Ingredient id")),
    responses(
        (status = 204, description = "Ingredient deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Not a superuser", body = ErrorSchema),
        (status = 404, description = "Unknown ingredient", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "deleteIngredient"
)]
#[delete("/ingredients/{id}/")]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .catalogue_admin
        .delete_ingredient(viewer.principal(), IngredientId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

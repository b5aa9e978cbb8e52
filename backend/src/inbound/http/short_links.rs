//! Short link redirects.
//!
//! ```text
//! GET /s/{code}/
//! ```
//!
//! Served outside the `/api` scope so shared links stay short.

use actix_web::http::header::LOCATION;
use actix_web::{HttpResponse, get, web};

use crate::domain::{Error, ShortCode};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Redirect a short code to its recipe.
#[utoipa::path(
    get,
    path = "/s/{code}/",
    params(("code" = String, Path, description = "Short code issued by get-link")),
    responses(
        (status = 302, description = "Redirect to the recipe"),
        (status = 404, description = "Unknown code", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "resolveShortLink",
    security([])
)]
#[get("/s/{code}/")]
pub async fn resolve(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let code = ShortCode::parse(&path).ok_or_else(|| Error::not_found("short link not found"))?;
    let recipe = state.recipes.resolve_short_link(code).await?;
    Ok(HttpResponse::Found()
        .insert_header((LOCATION, format!("/api/recipes/{}/", recipe.get())))
        .finish())
}

//! Author subscription handlers.
//!
//! ```text
//! GET    /api/users/subscriptions/?limit&offset&recipes_limit
//! POST   /api/users/{id}/subscribe/?recipes_limit
//! DELETE /api/users/{id}/subscribe/
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use pagination::Page;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{RecipesLimit, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::listing::{PageParams, page_of};
use crate::inbound::http::projections::{Projector, SubscriptionResponse};
use crate::inbound::http::schemas::{ErrorSchema, SubscriptionPageSchema};
use crate::inbound::http::state::HttpState;

/// Cap on the recipes embedded per author.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipesLimitParams {
    /// Non-numeric values are ignored.
    #[param(value_type = Option<u32>)]
    pub recipes_limit: Option<String>,
}

impl RecipesLimitParams {
    fn limit(&self) -> RecipesLimit {
        RecipesLimit::from_query(self.recipes_limit.as_deref())
    }
}

/// Authors followed by the caller.
#[utoipa::path(
    get,
    path = "/api/users/subscriptions/",
    params(PageParams, RecipesLimitParams),
    responses(
        (status = 200, description = "Followed authors", body = SubscriptionPageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscriptions"
)]
#[get("/users/subscriptions/")]
pub async fn list_subscriptions(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    req: HttpRequest,
    page: web::Query<PageParams>,
    limit: web::Query<RecipesLimitParams>,
) -> ApiResult<web::Json<Page<SubscriptionResponse>>> {
    let request = page.request(state.page_limits);
    let authors = state
        .subscriptions_query
        .subscriptions(principal, request, limit.limit())
        .await?;
    let projector = Projector::new(state.images.as_ref());
    Ok(web::Json(page_of(&req, authors, request, |author| {
        projector.subscription(author)
    })))
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/users/{id}/subscribe/",
    params(("id" = i64, Path, description = "Author id"), RecipesLimitParams),
    responses(
        (status = 201, description = "Subscribed", body = SubscriptionResponse),
        (status = 400, description = "Cannot follow yourself", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown author", body = ErrorSchema),
        (status = 409, description = "Already subscribed", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribe"
)]
#[post("/users/{id}/subscribe/")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    path: web::Path<i64>,
    limit: web::Query<RecipesLimitParams>,
) -> ApiResult<HttpResponse> {
    let author = UserId::new(path.into_inner());
    let subscription = state
        .subscriptions
        .subscribe(principal, author, limit.limit())
        .await?;
    let body = Projector::new(state.images.as_ref()).subscription(subscription);
    Ok(HttpResponse::Created().json(body))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/users/{id}/subscribe/",
    params(("id" = i64, Path, description = "Author id")),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Not subscribed", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown author", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "unsubscribe"
)]
#[delete("/users/{id}/subscribe/")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    state
        .subscriptions
        .unsubscribe(principal, UserId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

//! User account HTTP handlers.
//!
//! ```text
//! POST   /api/users/
//! GET    /api/users/
//! GET    /api/users/me/
//! POST   /api/users/set_password/
//! PUT    /api/users/me/avatar/
//! DELETE /api/users/me/avatar/
//! GET    /api/users/{id}/
//! ```
//!
//! `PUT`, `PATCH` and `DELETE` on a user resource answer `405`.

use actix_web::{HttpRequest, HttpResponse, delete, get, post, put, route, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::ports::{PasswordChange, Registration};
use crate::domain::{Email, Error, ImageUpload, Password, PersonName, UserId, Username};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::{Authenticated, Viewer};
use crate::inbound::http::listing::{PageParams, page_of};
use crate::inbound::http::projections::{Projector, RegisteredUserResponse, UserResponse};
use crate::inbound::http::schemas::{ErrorSchema, UserPageSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, credentials_error, image_error, required, user_field_error,
};

/// Registration payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "chef@example.com")]
    pub email: Option<String>,
    #[schema(example = "chef")]
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    #[schema(example = "correct horse battery")]
    pub password: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(payload: RegisterRequest) -> Result<Self, Self::Error> {
        let email = required(payload.email, FieldName::new("email"))?;
        let username = required(payload.username, FieldName::new("username"))?;
        let first_name = required(payload.first_name, FieldName::new("first_name"))?;
        let last_name = required(payload.last_name, FieldName::new("last_name"))?;
        let password = Zeroizing::new(required(payload.password, FieldName::new("password"))?);

        Ok(Self {
            email: Email::new(&email).map_err(|err| user_field_error(&err))?,
            username: Username::new(&username).map_err(|err| user_field_error(&err))?,
            first_name: PersonName::new("first_name", &first_name)
                .map_err(|err| user_field_error(&err))?,
            last_name: PersonName::new("last_name", &last_name)
                .map_err(|err| user_field_error(&err))?,
            password: Password::new(&password)
                .map_err(|err| credentials_error(&err, FieldName::new("password")))?,
        })
    }
}

/// Password change payload.
#[derive(Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub new_password: Option<String>,
    pub current_password: Option<String>,
}

impl TryFrom<SetPasswordRequest> for PasswordChange {
    type Error = Error;

    fn try_from(payload: SetPasswordRequest) -> Result<Self, Self::Error> {
        let new_password = Zeroizing::new(required(
            payload.new_password,
            FieldName::new("new_password"),
        )?);
        let current_password = Zeroizing::new(required(
            payload.current_password,
            FieldName::new("current_password"),
        )?);
        Ok(Self {
            new_password: Password::new(&new_password)
                .map_err(|err| credentials_error(&err, FieldName::new("new_password")))?,
            current_password,
        })
    }
}

/// Avatar upload payload.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AvatarRequest {
    /// `data:image/<format>;base64,<payload>`
    pub avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/users/",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisteredUserResponse),
        (status = 400, description = "Invalid payload", body = ErrorSchema),
        (status = 409, description = "Email or username already taken", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users/")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let user = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisteredUserResponse::from(user)))
}

/// List users.
#[utoipa::path(
    get,
    path = "/api/users/",
    params(PageParams),
    responses(
        (status = 200, description = "Users", body = UserPageSchema),
        (status = 401, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users/")]
pub async fn list_users(
    state: web::Data<HttpState>,
    viewer: Viewer,
    req: HttpRequest,
    query: web::Query<PageParams>,
) -> ApiResult<web::Json<Page<UserResponse>>> {
    let request = query.request(state.page_limits);
    let users = state.users.list_users(viewer.principal(), request).await?;
    let projector = Projector::new(state.images.as_ref());
    Ok(web::Json(page_of(&req, users, request, |profile| {
        projector.user(profile)
    })))
}

/// Profile of the authenticated user.
#[utoipa::path(
    get,
    path = "/api/users/me/",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me/")]
pub async fn current_user(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
) -> ApiResult<web::Json<UserResponse>> {
    let profile = state.users.user_profile(Some(principal), principal.id).await?;
    Ok(web::Json(Projector::new(state.images.as_ref()).user(profile)))
}

/// Profile of any user.
#[utoipa::path(
    get,
    path = "/api/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}/")]
pub async fn user_profile(
    state: web::Data<HttpState>,
    viewer: Viewer,
    path: web::Path<i64>,
) -> ApiResult<web::Json<UserResponse>> {
    let id = UserId::new(path.into_inner());
    let profile = state.users.user_profile(viewer.principal(), id).await?;
    Ok(web::Json(Projector::new(state.images.as_ref()).user(profile)))
}

/// Accounts are not edited or deleted through the API.
#[utoipa::path(
    method(put, patch, delete),
    path = "/api/users/{id}/",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 405, description = "User resources are read-only", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "rejectUserWrite"
)]
#[route("/users/{id}/", method = "PUT", method = "PATCH", method = "DELETE")]
pub async fn user_write_not_allowed() -> ApiResult<HttpResponse> {
    Err(Error::method_not_allowed("method not allowed on user resources"))
}

/// Change the authenticated user's password.
#[utoipa::path(
    post,
    path = "/api/users/set_password/",
    request_body = SetPasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid payload or wrong current password", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setPassword"
)]
#[post("/users/set_password/")]
pub async fn set_password(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let change = PasswordChange::try_from(payload.into_inner())?;
    state.accounts.set_password(principal, change).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Upload or replace the authenticated user's avatar.
#[utoipa::path(
    put,
    path = "/api/users/me/avatar/",
    request_body = AvatarRequest,
    responses(
        (status = 200, description = "Avatar stored", body = AvatarResponse),
        (status = 400, description = "Invalid image", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "setAvatar"
)]
#[put("/users/me/avatar/")]
pub async fn set_avatar(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
    payload: web::Json<AvatarRequest>,
) -> ApiResult<web::Json<AvatarResponse>> {
    let field = FieldName::new("avatar");
    let raw = required(payload.into_inner().avatar, field)?;
    let upload = ImageUpload::from_data_url(&raw).map_err(|err| image_error(field, &err))?;
    let stored = state.accounts.set_avatar(principal, upload).await?;
    Ok(web::Json(AvatarResponse {
        avatar: state.images.url(&stored),
    }))
}

/// Remove the authenticated user's avatar.
#[utoipa::path(
    delete,
    path = "/api/users/me/avatar/",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "removeAvatar"
)]
#[delete("/users/me/avatar/")]
pub async fn remove_avatar(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
) -> ApiResult<HttpResponse> {
    state.accounts.remove_avatar(principal).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;

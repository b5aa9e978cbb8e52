//! API token issuance.
//!
//! ```text
//! POST /api/auth/token/login/
//! POST /api/auth/token/logout/
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::LoginCredentials;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, credentials_error, required};

/// Login payload.
#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "chef@example.com")]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub auth_token: String,
}

/// Exchange credentials for an API token.
#[utoipa::path(
    post,
    path = "/api/auth/token/login/",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/token/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let LoginRequest { email, password } = payload.into_inner();
    let password_field = FieldName::new("password");
    let email = required(email, FieldName::new("email"))?;
    let password = Zeroizing::new(required(password, password_field)?);
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(|err| credentials_error(&err, password_field))?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(TokenResponse {
        auth_token: token.expose().to_owned(),
    }))
}

/// Revoke the caller's tokens.
#[utoipa::path(
    post,
    path = "/api/auth/token/logout/",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/token/logout/")]
pub async fn logout(
    state: web::Data<HttpState>,
    Authenticated(principal): Authenticated,
) -> ApiResult<HttpResponse> {
    state.login.logout(principal).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;

    use crate::domain::{AuthToken, Error, ErrorCode, Principal, UserId};
    use crate::inbound::http::test_utils::{MockPorts, api_app, authed};

    #[rstest]
    #[actix_web::test]
    async fn login_returns_token() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_login()
            .withf(|creds| creds.email().as_str() == "chef@example.com" && creds.password() == "pw")
            .times(1)
            .returning(|_| Ok(AuthToken::from_presented("issued-token")));
        let app = test::init_service(api_app(ports)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/token/login/")
            .set_json(json!({"email": "chef@example.com", "password": "pw"}))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: TokenResponse = test::read_body_json(res).await;
        assert_eq!(body.auth_token, "issued-token");
    }

    #[rstest]
    #[actix_web::test]
    async fn bad_credentials_are_a_validation_error() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_login()
            .returning(|_| Err(Error::invalid_request("unable to log in")));
        let app = test::init_service(api_app(ports)).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/token/login/")
            .set_json(json!({"email": "chef@example.com", "password": "wrong"}))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case(json!({"password": "pw"}), "email")]
    #[case(json!({"email": "chef@example.com"}), "password")]
    #[case(json!({"email": "chef@example.com", "password": ""}), "password")]
    #[actix_web::test]
    async fn incomplete_login_payloads_are_rejected(
        #[case] body: serde_json::Value,
        #[case] field: &str,
    ) {
        let app = test::init_service(api_app(MockPorts::default())).await;
        let req = test::TestRequest::post()
            .uri("/api/auth/token/login/")
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let error: Error = test::read_body_json(res).await;
        assert_eq!(error.details().expect("details")["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_requires_a_token() {
        let app = test::init_service(api_app(MockPorts::default())).await;
        let req = test::TestRequest::post()
            .uri("/api/auth/token/logout/")
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let error: Error = test::read_body_json(res).await;
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_revokes_tokens() {
        let principal = Principal::user(UserId::new(3));
        let mut ports = MockPorts::default();
        ports.authenticate_as(principal);
        ports
            .login
            .expect_logout()
            .withf(move |p| *p == principal)
            .times(1)
            .returning(|_| Ok(()));
        let app = test::init_service(api_app(ports)).await;

        let req = authed(test::TestRequest::post().uri("/api/auth/token/logout/")).to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}

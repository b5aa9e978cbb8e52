//! Shared harness driving the HTTP API over in-memory adapters.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};

use foodgram::domain::UserId;
use foodgram::inbound::http::configure;
use foodgram::inbound::http::error::not_found;
use foodgram::test_support::memory::{InMemoryBackend, InMemoryDatabase};

pub const PASSWORD: &str = "Str0ng-pass-phrase";
pub const PIXEL: &str = "data:image/png;base64,iVBORw0KGgo=";

/// A signed-in account.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub token: String,
}

impl Account {
    pub fn user_id(&self) -> UserId {
        UserId::new(self.id)
    }

    pub fn sign(&self, req: TestRequest) -> TestRequest {
        req.insert_header((header::AUTHORIZATION, format!("Token {}", self.token)))
    }
}

/// Build the API over a fresh in-memory backend.
pub async fn init_app() -> (
    impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    Arc<InMemoryDatabase>,
) {
    let InMemoryBackend {
        database, state, ..
    } = InMemoryBackend::new();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure)
            .default_service(web::to(not_found)),
    )
    .await;
    (app, database)
}

/// Send a request and decode the body as JSON. Empty bodies become `Null`.
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    req: TestRequest,
) -> (StatusCode, Value) {
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let bytes = test::read_body(res).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

/// Register `username` and exchange its credentials for a token.
pub async fn sign_up(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    username: &str,
) -> Account {
    let email = format!("{username}@example.com");
    let (status, created) = send(
        app,
        TestRequest::post().uri("/api/users/").set_json(json!({
            "email": email,
            "username": username,
            "first_name": "Test",
            "last_name": "Cook",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {username}: {created}");

    let (status, token) = send(
        app,
        TestRequest::post()
            .uri("/api/auth/token/login/")
            .set_json(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login {username}: {token}");

    Account {
        id: created["id"].as_i64().expect("user id"),
        token: token["auth_token"]
            .as_str()
            .expect("auth token")
            .to_owned(),
    }
}

/// A minimal valid recipe payload.
pub fn recipe_payload(name: &str, ingredients: Value, tags: Value) -> Value {
    json!({
        "ingredients": ingredients,
        "tags": tags,
        "image": PIXEL,
        "name": name,
        "text": "Mix and serve.",
        "cooking_time": 10,
    })
}

/// Create a recipe as `author`, returning its id.
pub async fn create_recipe(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    author: &Account,
    payload: Value,
) -> i64 {
    let (status, body) = send(
        app,
        author.sign(TestRequest::post().uri("/api/recipes/").set_json(payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create recipe: {body}");
    body["id"].as_i64().expect("recipe id")
}

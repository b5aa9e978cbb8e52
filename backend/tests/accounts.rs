//! Account, token and subscription flows over the in-memory backend.

#[allow(dead_code, reason = "Shared harness helpers are used unevenly across suites.")]
#[path = "support/api.rs"]
mod api;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use api::{PASSWORD, PIXEL, init_app, recipe_payload, send, sign_up};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[actix_web::test]
async fn duplicate_email_is_a_conflict() {
    let (app, _) = init_app().await;
    sign_up(&app, "chef").await;

    let (status, body) = send(
        &app,
        TestRequest::post().uri("/api/users/").set_json(json!({
            "email": "chef@example.com",
            "username": "other",
            "first_name": "Other",
            "last_name": "Cook",
            "password": PASSWORD,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[rstest]
#[actix_web::test]
async fn wrong_password_is_rejected_without_a_token() {
    let (app, _) = init_app().await;
    sign_up(&app, "chef").await;

    let (status, body) = send(
        &app,
        TestRequest::post()
            .uri("/api/auth/token/login/")
            .set_json(json!({ "email": "chef@example.com", "password": "not-the-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("auth_token").is_none());
}

#[rstest]
#[actix_web::test]
async fn logout_revokes_every_token() {
    let (app, database) = init_app().await;
    let chef = sign_up(&app, "chef").await;

    let (status, me) = send(&app, chef.sign(TestRequest::get().uri("/api/users/me/"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "chef");
    assert_eq!(me["is_subscribed"], false);

    let (status, _) = send(
        &app,
        chef.sign(TestRequest::post().uri("/api/auth/token/logout/")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(database.token_count(chef.user_id()), 0);

    let (status, _) = send(&app, chef.sign(TestRequest::get().uri("/api/users/me/"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn password_change_requires_current_password() {
    let (app, _) = init_app().await;
    let chef = sign_up(&app, "chef").await;

    let (status, _) = send(
        &app,
        chef.sign(TestRequest::post().uri("/api/users/set_password/").set_json(json!({
            "new_password": "An0ther-pass-phrase",
            "current_password": "wrong-password",
        }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        chef.sign(TestRequest::post().uri("/api/users/set_password/").set_json(json!({
            "new_password": "An0ther-pass-phrase",
            "current_password": PASSWORD,
        }))),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        TestRequest::post().uri("/api/auth/token/login/").set_json(json!({
            "email": "chef@example.com",
            "password": "An0ther-pass-phrase",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[actix_web::test]
async fn avatar_can_be_set_and_removed() {
    let (app, _) = init_app().await;
    let chef = sign_up(&app, "chef").await;

    let (status, body) = send(
        &app,
        chef.sign(
            TestRequest::put()
                .uri("/api/users/me/avatar/")
                .set_json(json!({ "avatar": PIXEL })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let url = body["avatar"].as_str().expect("avatar url");
    assert!(url.starts_with("http://testserver/media/"), "{url}");

    let (status, _) = send(
        &app,
        chef.sign(TestRequest::delete().uri("/api/users/me/avatar/")),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, me) = send(&app, chef.sign(TestRequest::get().uri("/api/users/me/"))).await;
    assert!(me["avatar"].is_null());
}

#[rstest]
#[case(TestRequest::put())]
#[case(TestRequest::patch())]
#[case(TestRequest::delete())]
#[actix_web::test]
async fn user_resources_are_read_only(#[case] req: TestRequest) {
    let (app, _) = init_app().await;
    let chef = sign_up(&app, "chef").await;

    let uri = format!("/api/users/{}/", chef.id);
    let (status, _) = send(&app, chef.sign(req.uri(&uri))).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[rstest]
#[actix_web::test]
async fn subscribing_to_yourself_is_rejected() {
    let (app, _) = init_app().await;
    let chef = sign_up(&app, "chef").await;

    let uri = format!("/api/users/{}/subscribe/", chef.id);
    let (status, _) = send(&app, chef.sign(TestRequest::post().uri(&uri))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn subscriptions_toggle_and_list_recipe_previews() {
    let (app, database) = init_app().await;
    let author = sign_up(&app, "author").await;
    let reader = sign_up(&app, "reader").await;
    let salt = database.seed_ingredient("salt", "g");
    let dinner = database.seed_tag("Dinner", "dinner");
    for name in ["Soup", "Stew", "Salad"] {
        api::create_recipe(
            &app,
            &author,
            recipe_payload(
                name,
                json!([{ "id": salt.id.get(), "amount": 5 }]),
                json!([dinner.id.get()]),
            ),
        )
        .await;
    }

    let uri = format!("/api/users/{}/subscribe/?recipes_limit=2", author.id);
    let (status, body) = send(&app, reader.sign(TestRequest::post().uri(&uri))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["is_subscribed"], true);
    assert_eq!(body["recipes_count"], 3);
    assert_eq!(body["recipes"].as_array().map(Vec::len), Some(2));

    let (status, _) = send(&app, reader.sign(TestRequest::post().uri(&uri))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, list) = send(
        &app,
        reader.sign(TestRequest::get().uri("/api/users/subscriptions/")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["count"], 1);
    assert_eq!(list["results"][0]["username"], "author");

    let (_, profile) = send(
        &app,
        reader.sign(TestRequest::get().uri(&format!("/api/users/{}/", author.id))),
    )
    .await;
    assert_eq!(profile["is_subscribed"], true);

    let uri = format!("/api/users/{}/subscribe/", author.id);
    let (status, _) = send(&app, reader.sign(TestRequest::delete().uri(&uri))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, reader.sign(TestRequest::delete().uri(&uri))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn user_listing_is_paginated() {
    let (app, _) = init_app().await;
    for name in ["ann", "bob", "cat"] {
        sign_up(&app, name).await;
    }

    let (status, page) = send(&app, TestRequest::get().uri("/api/users/?limit=2")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 3);
    assert_eq!(page["results"].as_array().map(Vec::len), Some(2));
    assert!(page["next"].as_str().is_some_and(|next| next.contains("offset=2")));
    assert!(page["previous"].is_null());
}

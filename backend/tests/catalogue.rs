//! Tag and ingredient catalogue endpoints over the in-memory backend.

#[allow(dead_code, reason = "Shared harness helpers are used unevenly across suites.")]
#[path = "support/api.rs"]
mod api;

use actix_web::http::StatusCode;
use actix_web::test::TestRequest;
use api::{init_app, send, sign_up};
use rstest::rstest;
use serde_json::json;

#[rstest]
#[case("/api/tags/", json!({ "name": "Vegan", "slug": "vegan" }))]
#[case("/api/ingredients/", json!({ "name": "tofu", "measurement_unit": "g" }))]
#[actix_web::test]
async fn catalogue_writes_require_a_superuser(#[case] uri: &str, #[case] payload: serde_json::Value) {
    let (app, database) = init_app().await;
    let cook = sign_up(&app, "cook").await;
    let admin = sign_up(&app, "admin").await;
    database.promote_to_superuser(admin.user_id());

    let (status, _) = send(&app, TestRequest::post().uri(uri).set_json(&payload)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        cook.sign(TestRequest::post().uri(uri).set_json(&payload)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, created) = send(
        &app,
        admin.sign(TestRequest::post().uri(uri).set_json(&payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");

    let (status, _) = send(
        &app,
        admin.sign(TestRequest::post().uri(uri).set_json(&payload)),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let item = format!("{uri}{}/", created["id"]);
    let (status, _) = send(&app, cook.sign(TestRequest::delete().uri(&item))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, admin.sign(TestRequest::delete().uri(&item))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, TestRequest::get().uri(&item)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn tags_are_public_and_unpaginated() {
    let (app, database) = init_app().await;
    let breakfast = database.seed_tag("Breakfast", "breakfast");
    database.seed_tag("Dinner", "dinner");

    let (status, tags) = send(&app, TestRequest::get().uri("/api/tags/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags.as_array().map(Vec::len), Some(2));

    let uri = format!("/api/tags/{}/", breakfast.id.get());
    let (status, tag) = send(&app, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tag["slug"], "breakfast");
}

#[rstest]
#[case("", 3)]
#[case("?name=sa", 2)]
#[case("?name=SAL", 1)]
#[case("?name=pepper", 0)]
#[actix_web::test]
async fn ingredients_filter_by_name_prefix(#[case] query: &str, #[case] expected: usize) {
    let (app, database) = init_app().await;
    database.seed_ingredient("salt", "g");
    database.seed_ingredient("saffron", "g");
    database.seed_ingredient("rock salt", "g");

    let uri = format!("/api/ingredients/{query}");
    let (status, found) = send(&app, TestRequest::get().uri(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(expected));
}

#[rstest]
#[actix_web::test]
async fn malformed_tag_slug_is_a_bad_request() {
    let (app, database) = init_app().await;
    let admin = sign_up(&app, "admin").await;
    database.promote_to_superuser(admin.user_id());

    let (status, body) = send(
        &app,
        admin.sign(
            TestRequest::post()
                .uri("/api/tags/")
                .set_json(json!({ "name": "Odd", "slug": "not a slug" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

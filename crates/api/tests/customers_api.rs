//! Customer CRUD and bulk import.

mod common;

use axum::http::StatusCode;
use common::{admin_with_org, body_json, delete_auth, get_auth, post_json_auth, put_json_auth};
use serde_json::json;
use sqlx::PgPool;

async fn create_customer(
    app: &axum::Router,
    token: &str,
    body: serde_json::Value,
) -> serde_json::Value {
    let response = post_json_auth(app.clone(), "/api/v1/customers", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_normalizes_handles_and_logs_activity(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, org_id) = admin_with_org(&app, "marge").await;

    let customer = create_customer(
        &app,
        &token,
        json!({
            "firstName": " Lisa ",
            "lastName": "Simpson",
            "email": "lisa@springfield.test",
            "instagramHandle": "sprinkle",
            "twitterHandle": "   ",
            "preferences": ["Maple"],
        }),
    )
    .await;

    assert_eq!(customer["first_name"], "Lisa");
    assert_eq!(customer["instagram_handle"], "@sprinkle");
    assert!(customer["twitter_handle"].is_null());
    assert_eq!(customer["organization_id"], org_id);

    let json = body_json(
        get_auth(app, "/api/v1/activities?action_type=customer_create", &token).await,
    )
    .await;
    assert_eq!(json["data"][0]["entity_id"], customer["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_requires_name_and_valid_email(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = admin_with_org(&app, "marge").await;

    for body in [
        json!({ "firstName": "", "email": "a@b.test" }),
        json!({ "firstName": "Bart", "email": "not-an-email" }),
    ] {
        let response = post_json_auth(app.clone(), "/api/v1/customers", &token, body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_in_organization_is_a_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = admin_with_org(&app, "marge").await;

    create_customer(&app, &token, json!({ "firstName": "Moe", "email": "moe@tavern.test" })).await;
    let response = post_json_auth(
        app,
        "/api/v1/customers",
        &token,
        json!({ "firstName": "Moe", "email": "MOE@tavern.test" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn customers_are_scoped_to_the_organization(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (marge, _) = admin_with_org(&app, "marge").await;
    let (ned, _) = admin_with_org(&app, "ned").await;

    let customer =
        create_customer(&app, &marge, json!({ "firstName": "Moe", "email": "moe@tavern.test" }))
            .await;
    let id = customer["id"].as_i64().unwrap();

    let json = body_json(get_auth(app.clone(), "/api/v1/customers", &ned).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let response = get_auth(app.clone(), &format!("/api/v1/customers/{id}"), &ned).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, &format!("/api/v1/customers/{id}"), &marge).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_changes_only_given_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = admin_with_org(&app, "marge").await;
    let customer = create_customer(
        &app,
        &token,
        json!({
            "firstName": "Moe",
            "lastName": "Szyslak",
            "email": "moe@tavern.test",
            "instagramHandle": "@moes",
        }),
    )
    .await;
    let uri = format!("/api/v1/customers/{}", customer["id"]);

    let response = put_json_auth(
        app.clone(),
        &uri,
        &token,
        json!({ "tiktokHandle": "moetok", "instagramHandle": "" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["last_name"], "Szyslak");
    assert_eq!(json["data"]["tiktok_handle"], "@moetok");
    assert!(json["data"]["instagram_handle"].is_null());

    let response = put_json_auth(app, &uri, &token, json!({ "email": "nope" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_returns_204_then_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = admin_with_org(&app, "marge").await;
    let customer =
        create_customer(&app, &token, json!({ "firstName": "Moe", "email": "moe@tavern.test" }))
            .await;
    let uri = format!("/api/v1/customers/{}", customer["id"]);

    let response = delete_auth(app.clone(), &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn import_skips_duplicates_and_reports_bad_rows(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = admin_with_org(&app, "marge").await;
    create_customer(&app, &token, json!({ "firstName": "Moe", "email": "moe@tavern.test" })).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/customers/import",
        &token,
        json!({
            "rows": [
                { "firstName": "Barney", "email": "barney@tavern.test", "preferences": "glazed; jelly" },
                { "firstName": "Moe", "email": "Moe@Tavern.test" },
                { "firstName": "Barney", "email": "barney@tavern.test" },
                { "firstName": "", "email": "nobody@tavern.test" },
                { "firstName": "Lenny", "email": "lenny@plant.test", "instagramHandle": "lenny" },
            ]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["added"], 2);
    assert_eq!(json["data"]["skipped"], 2);
    assert_eq!(json["data"]["errors"][0]["row"], 4);

    let json = body_json(get_auth(app, "/api/v1/customers", &token).await).await;
    let customers = json["data"].as_array().unwrap();
    assert_eq!(customers.len(), 3);
    let barney = customers
        .iter()
        .find(|c| c["first_name"] == "Barney")
        .unwrap();
    assert_eq!(barney["preferences"], json!(["glazed", "jelly"]));
    let lenny = customers.iter().find(|c| c["first_name"] == "Lenny").unwrap();
    assert_eq!(lenny["instagram_handle"], "@lenny");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pagination_limits_results(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = admin_with_org(&app, "marge").await;
    for i in 0..3 {
        create_customer(
            &app,
            &token,
            json!({ "firstName": format!("C{i}"), "email": format!("c{i}@donut.test") }),
        )
        .await;
    }

    let json = body_json(get_auth(app.clone(), "/api/v1/customers?limit=2", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let json =
        body_json(get_auth(app, "/api/v1/customers?limit=2&offset=2", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

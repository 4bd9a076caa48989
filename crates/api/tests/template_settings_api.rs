//! Per-user template overrides.

mod common;

use axum::http::StatusCode;
use common::{admin_with_org, body_json, get_auth, put_json_auth, register};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn upsert_replaces_overrides_for_a_content_type(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, org_id) = admin_with_org(&app, "marge").await;

    let response = put_json_auth(
        app.clone(),
        "/api/v1/template-settings",
        &token,
        json!({
            "contentType": "quiz",
            "emailTemplateId": "TPL-EMAIL",
            "instagramTemplateId": "TPL-IG",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["organization_id"], org_id);
    assert_eq!(json["data"]["email_template_id"], "TPL-EMAIL");

    put_json_auth(
        app.clone(),
        "/api/v1/template-settings",
        &token,
        json!({ "contentType": "quiz", "emailTemplateId": "TPL-EMAIL-2" }),
    )
    .await;

    let json = body_json(get_auth(app.clone(), "/api/v1/template-settings", &token).await).await;
    let settings = json["data"].as_array().unwrap();
    assert_eq!(settings.len(), 1);
    assert_eq!(settings[0]["email_template_id"], "TPL-EMAIL-2");
    assert!(settings[0]["instagram_template_id"].is_null());

    let json = body_json(
        get_auth(
            app,
            "/api/v1/activities?action_type=template_settings_update",
            &token,
        )
        .await,
    )
    .await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn reserved_content_types_cannot_be_configured(pool: PgPool) {
    let app = common::build_test_app(pool);
    let token = register(&app, "bart").await;

    for content_type in ["fact", "poll"] {
        let response = put_json_auth(
            app.clone(),
            "/api/v1/template-settings",
            &token,
            json!({ "contentType": content_type, "emailTemplateId": "X" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("Unsupported content type"));
    }
}

pub mod activities;
pub mod campaigns;
pub mod canva;
pub mod customers;
pub mod generation_runs;
pub mod health;
pub mod organizations;
pub mod template_settings;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /users/me                           get, upsert
///
/// /organizations                      create
/// /organizations/current              get
/// /organizations/current/brand        update (editor)
///
/// /customers                          list, create (editor)
/// /customers/import                   bulk import (editor)
/// /customers/{id}                     get, update, delete (editor)
///
/// /campaigns                          list
/// /campaigns/generate                 schedule one customer (editor)
/// /campaigns/generate-bulk            schedule many customers (editor)
/// /campaigns/{id}                     get with designs
///
/// /generation-runs                    list by batch
/// /generation-runs/{id}               get
///
/// /template-settings                  list, upsert
///
/// /activities                         recent activity feed
///
/// /canva/authorize                    start OAuth (PKCE)
/// /canva/callback                     finish OAuth
/// /canva/status                       connection status
/// /canva/connection                   disconnect
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", users::router())
        .nest("/organizations", organizations::router())
        .nest("/customers", customers::router())
        .nest("/campaigns", campaigns::router())
        .nest("/generation-runs", generation_runs::router())
        .nest("/template-settings", template_settings::router())
        .nest("/activities", activities::router())
        .nest("/canva", canva::router())
}

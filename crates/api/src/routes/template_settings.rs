use axum::routing::get;
use axum::Router;

use crate::handlers::template_settings;
use crate::state::AppState;

/// Routes mounted at `/template-settings`.
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(template_settings::list).put(template_settings::upsert),
    )
}

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::organizations;
use crate::state::AppState;

/// Routes mounted at `/organizations`.
///
/// ```text
/// POST /                 -> create
/// GET  /current          -> get_current
/// PUT  /current/brand    -> update_brand (editor)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(organizations::create))
        .route("/current", get(organizations::get_current))
        .route("/current/brand", put(organizations::update_brand))
}

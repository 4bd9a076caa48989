use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::canva;
use crate::state::AppState;

/// Routes mounted at `/canva`.
///
/// ```text
/// GET    /authorize    -> authorize
/// POST   /callback     -> callback
/// GET    /status       -> status
/// DELETE /connection   -> disconnect
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/authorize", get(canva::authorize))
        .route("/callback", post(canva::callback))
        .route("/status", get(canva::status))
        .route("/connection", delete(canva::disconnect))
}

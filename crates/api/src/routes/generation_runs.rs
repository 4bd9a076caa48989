use axum::routing::get;
use axum::Router;

use crate::handlers::generation_runs;
use crate::state::AppState;

/// Routes mounted at `/generation-runs`.
///
/// ```text
/// GET /          -> list_by_batch (?batch_id=)
/// GET /{id}      -> get_by_id
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(generation_runs::list_by_batch))
        .route("/{id}", get(generation_runs::get_by_id))
}

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::campaigns;
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET  /                -> list (?customer_id=&limit=&offset=)
/// POST /generate        -> generate (editor, 202)
/// POST /generate-bulk   -> generate_bulk (editor, 202)
/// GET  /{id}            -> get_by_id (with designs)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaigns::list))
        .route("/generate", post(campaigns::generate))
        .route("/generate-bulk", post(campaigns::generate_bulk))
        .route("/{id}", get(campaigns::get_by_id))
}

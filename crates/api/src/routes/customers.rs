use axum::routing::{get, post};
use axum::Router;

use crate::handlers::customers;
use crate::state::AppState;

/// Routes mounted at `/customers`.
///
/// ```text
/// GET    /          -> list
/// POST   /          -> create (editor)
/// POST   /import    -> import (editor)
/// GET    /{id}      -> get_by_id
/// PUT    /{id}      -> update (editor)
/// DELETE /{id}      -> delete (editor)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(customers::list).post(customers::create))
        .route("/import", post(customers::import))
        .route(
            "/{id}",
            get(customers::get_by_id)
                .put(customers::update)
                .delete(customers::delete),
        )
}

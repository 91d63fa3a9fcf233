use std::sync::Arc;

use axum::{
    extract::State,
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};

use crate::handlers::comments::{delete_comment, list_comments, post_comment};
use crate::handlers::middleware::auth_middleware;
use crate::utils::state::AppState;

pub fn comment_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/", post(post_comment))
        .route("/{id}", delete(delete_comment))
        .layer(from_fn(move |req, next| {
            auth_middleware(State(state.clone()), req, next)
        }));

    Router::new()
        .route("/article/{id}", get(list_comments))
        .merge(protected)
}

use std::sync::Arc;

use axum::{extract::State, middleware::from_fn, routing::post, Router};

use crate::handlers::middleware::auth_middleware;
use crate::handlers::votes::{dislike_article, like_article};
use crate::utils::state::AppState;

pub fn vote_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/like", post(like_article))
        .route("/dislike", post(dislike_article))
        .layer(from_fn(move |req, next| {
            auth_middleware(State(state.clone()), req, next)
        }))
}

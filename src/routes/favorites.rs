use std::sync::Arc;

use axum::{
    extract::State,
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::handlers::favorites::{list_favorites, toggle_favorite};
use crate::handlers::middleware::auth_middleware;
use crate::utils::state::AppState;

pub fn favorite_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/toggle", post(toggle_favorite))
        .layer(from_fn(move |req, next| {
            auth_middleware(State(state.clone()), req, next)
        }))
}

use std::sync::Arc;

use axum::{
    extract::State,
    middleware::from_fn,
    routing::{delete, get, post},
    Router,
};

use crate::handlers::categories::{create_category, delete_category, list_categories};
use crate::handlers::middleware::auth_middleware;
use crate::utils::state::AppState;

pub fn category_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/{id}", delete(delete_category))
        .layer(from_fn(move |req, next| {
            auth_middleware(State(state.clone()), req, next)
        }))
}

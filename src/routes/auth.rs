use std::sync::Arc;

use axum::{
    extract::State,
    middleware::from_fn,
    routing::post,
    Router,
};

use crate::handlers::auth::{login, logout, refresh_token_handler, register};
use crate::handlers::middleware::auth_middleware;
use crate::utils::state::AppState;

pub fn auth_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/refresh", post(refresh_token_handler))
        .route(
            "/logout",
            post(logout).route_layer(from_fn(move |req, next| {
                auth_middleware(State(state.clone()), req, next)
            })),
        )
}

use std::sync::Arc;

use axum::{
    extract::State,
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::handlers::articles::{
    article_engagement, get_feed, patch_audio, patch_image, refresh_feed,
};
use crate::handlers::middleware::auth_middleware;
use crate::utils::state::AppState;

pub fn article_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Reading the feed is open; everything that writes or is user-scoped
    // sits behind the auth middleware.
    let protected = Router::new()
        .route("/refresh", post(refresh_feed))
        .route("/image", post(patch_image))
        .route("/audio", post(patch_audio))
        .route("/engagement/{id}", get(article_engagement))
        .layer(from_fn(move |req, next| {
            auth_middleware(State(state.clone()), req, next)
        }));

    Router::new().route("/", get(get_feed)).merge(protected)
}

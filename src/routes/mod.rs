pub mod articles;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod favorites;
pub mod votes;

use axum::{response::IntoResponse, routing::get, Json, Router};
use dashmap::DashMap;
use http::StatusCode;
use serde_json::json;
use std::error::Error;
use std::sync::Arc;
use supabase_auth::models::AuthClient;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{filter, layer::SubscriberExt, util::SubscriberInitExt, Registry};

use crate::{
    db::{supabase::SupabaseStore, Store},
    routes::{
        articles::article_routes, auth::auth_routes, categories::category_routes,
        comments::comment_routes, favorites::favorite_routes, votes::vote_routes,
    },
    utils::{config::Config, state::AppState},
};

pub async fn make_app() -> Result<Router, Box<dyn Error>> {
    let log_level = std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase();

    let level = match log_level.as_str() {
        "error" => Level::ERROR,
        "warn" => Level::WARN,
        "info" => Level::INFO,
        "debug" => Level::DEBUG,
        "trace" => Level::TRACE,
        _ => Level::INFO,
    };

    let filter = filter::Targets::new()
        .with_target("tower_http::trace::on_response", Level::TRACE)
        .with_target("tower_http::trace::on_request", Level::TRACE)
        .with_target("tower_http::trace::make_span", Level::DEBUG)
        .with_target("axum::rejection", Level::TRACE)
        .with_target(env!("CARGO_PKG_NAME").replace('-', "_"), level)
        .with_default(Level::INFO);

    let tracing_layer = tracing_subscriber::fmt::layer();

    Registry::default().with(tracing_layer).with(filter).init();

    info!("Initializing application...");
    let config = Config::init();
    info!("Configuration loaded successfully");

    let store: Arc<dyn Store> = Arc::new(SupabaseStore::new(&config));
    let supabase_auth = AuthClient::new(
        config.supabase_project_url.clone(),
        config.supabase_anon_key.clone(),
        config.supabase_jwt_secret.clone(),
    );
    let http_client = reqwest::Client::new();
    info!("External clients initialized successfully");

    let state = Arc::new(AppState {
        store,
        supabase_auth,
        config,
        http_client,
        feed_cache: DashMap::new(),
        favorites: DashMap::new(),
    });

    let app = Router::new()
        .route("/", get(health_check))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/articles", article_routes(state.clone()))
        .nest("/votes", vote_routes(state.clone()))
        .nest("/favorites", favorite_routes(state.clone()))
        .nest("/comments", comment_routes(state.clone()))
        .nest("/categories", category_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state);
    info!("Application initialized successfully");

    Ok(app)
}

async fn health_check() -> impl IntoResponse {
    return (StatusCode::OK, Json(json!({"message": "Hello World"}))).into_response();
}

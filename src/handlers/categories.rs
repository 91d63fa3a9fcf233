use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::{
    models::{category::NewCategory, error::Error, jwt::Claims},
    utils::{ids::parse_durable_id, state::AppState},
};

/// Global categories plus the caller's own.
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    match state.store.categories_for_user(claims.user_id()).await {
        Ok(categories) => (StatusCode::OK, Json(json!({ "data": categories }))).into_response(),
        Err(error) => {
            warn!(%error, "category list unavailable");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to fetch categories"})),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub label: String,
    pub value: String,
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<impl IntoResponse, Error> {
    let user_id = claims
        .user_id()
        .ok_or((StatusCode::UNAUTHORIZED, "Login required"))?;

    let category = state
        .store
        .insert_category(&NewCategory {
            label: payload.label,
            value: payload.value,
            user_id: Some(user_id),
        })
        .await
        .map_err(|error| {
            warn!(%error, "category insert failed");
            Error::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create category",
            )
        })?;

    Ok((StatusCode::CREATED, Json(json!({ "data": category }))))
}

/// Owner-only delete; global categories and foreign rows match nothing.
pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(category_id): Path<String>,
) -> impl IntoResponse {
    let Some(user_id) = claims.user_id() else {
        return Error::from((StatusCode::UNAUTHORIZED, "Login required")).into_response();
    };
    let Some(category_id) = parse_durable_id(&category_id) else {
        return StatusCode::NO_CONTENT.into_response();
    };
    if let Err(error) = state.store.delete_category(category_id, user_id).await {
        warn!(%error, %category_id, "category delete dropped");
    }
    StatusCode::NO_CONTENT.into_response()
}

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Extension, Json};
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use supabase_auth::models::EmailSignUpResult;
use tracing::warn;

use crate::{
    handlers::middleware::decode_session_token,
    models::jwt::Claims,
    utils::{
        session::{on_session_event, SessionEvent},
        state::AppState,
    },
};

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> impl IntoResponse {
    let signup = state
        .supabase_auth
        .sign_up_with_email_and_password(&payload.email, &payload.password, None)
        .await;

    match signup {
        Ok(EmailSignUpResult::SessionResult(session)) => {
            notify_signed_in(&state, &session.access_token, SessionEvent::SignedIn).await;
            (
                StatusCode::CREATED,
                Json(json!({
                    "message": "User registered",
                    "data": {
                        "access_token": session.access_token,
                        "refresh_token": session.refresh_token,
                    }
                })),
            )
                .into_response()
        }
        Ok(EmailSignUpResult::ConfirmationResult(_)) => (
            StatusCode::CREATED,
            Json(json!({"message": "User registered, confirmation email sent"})),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": e.to_string()})),
        )
            .into_response(),
    }
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let session = state
        .supabase_auth
        .login_with_email(&payload.email, &payload.password)
        .await;

    match session {
        Ok(session) => {
            let favorite_ids =
                notify_signed_in(&state, &session.access_token, SessionEvent::SignedIn).await;
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Login successful",
                    "data": {
                        "access_token": session.access_token,
                        "refresh_token": session.refresh_token,
                        "favorite_ids": favorite_ids,
                    }
                })),
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid credentials"})),
        )
            .into_response(),
    }
}

pub async fn refresh_token_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> impl IntoResponse {
    let session = state
        .supabase_auth
        .exchange_token_for_session(&payload.refresh_token)
        .await;

    match session {
        Ok(session) => {
            notify_signed_in(&state, &session.access_token, SessionEvent::TokenRefreshed).await;
            (
                StatusCode::OK,
                Json(json!({
                    "message": "Token refreshed",
                    "data": {
                        "access_token": session.access_token,
                        "refresh_token": session.refresh_token,
                    }
                })),
            )
                .into_response()
        }
        Err(_) => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Failed to refresh token"})),
        )
            .into_response(),
    }
}

/// Drops the server-held session state; the client discards its tokens.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    if let Some(user_id) = claims.user_id() {
        on_session_event(&state, SessionEvent::SignedOut, user_id).await;
    }
    (StatusCode::OK, Json(json!({"message": "Signed out"}))).into_response()
}

/// Decode the freshly issued access token and fire the session event that
/// loads the user's favorite set. Returns the loaded ids for the response.
async fn notify_signed_in(
    state: &Arc<AppState>,
    access_token: &str,
    event: SessionEvent,
) -> Vec<String> {
    let claims = match decode_session_token(access_token, &state.config) {
        Ok(claims) => claims,
        Err(_) => {
            warn!("issued access token did not validate; favorite set not loaded");
            return Vec::new();
        }
    };
    let Some(user_id) = claims.user_id() else {
        return Vec::new();
    };
    on_session_event(state, event, user_id).await;
    state
        .favorites_snapshot(user_id)
        .unwrap_or_default()
        .into_iter()
        .map(|id| id.to_string())
        .collect()
}

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::IntoResponse,
};
use http::{header, StatusCode};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;

use crate::{
    models::{error::Error, jwt::Claims},
    utils::{config::Config, state::AppState},
};

/// Validate the Supabase access token and stash its claims in the request
/// extensions. A missing or invalid token is the "login required" signal for
/// every gesture route layered behind this middleware.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, Error> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or((StatusCode::UNAUTHORIZED, "Login required"))?;

    let claims = decode_session_token(token, &state.config)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// ES256 validation against the project's JWK components. Shared with the
/// auth handlers, which decode the freshly issued token to learn the user id.
pub fn decode_session_token(token: &str, config: &Config) -> Result<Claims, Error> {
    let decoding_key =
        DecodingKey::from_ec_components(&config.jwk_x, &config.jwk_y).map_err(|e| {
            Error::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                &format!("Invalid JWK: {}", e),
            )
        })?;

    let mut validation = Validation::new(Algorithm::ES256);
    validation.set_audience(&["authenticated"]);

    let decoded = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        Error::new(
            StatusCode::UNAUTHORIZED,
            &format!("Token validation failed: {}", e),
        )
    })?;

    Ok(decoded.claims)
}

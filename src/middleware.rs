use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderName, Method};
use axum_extra::extract::CookieJar;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::config::Config;
use crate::error::AppError;
use crate::AppState;

/// Cookie the identity provider sets for same-origin browser sessions.
pub const SESSION_COOKIE: &str = "__session";

/// The owner id of an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner(pub String);

impl FromRequestParts<AppState> for Owner {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match bearer_token(parts)? {
            Some(token) => Some(token),
            None => session_token(parts),
        };

        match token {
            Some(token) => match state.verifier.verify(&token) {
                Ok(owner) => Ok(Owner(owner)),
                Err(err) => {
                    warn!(error = %err, "Rejected credential");
                    Err(AppError::Unauthorized)
                }
            },
            None => match &state.config.dev_fallback_owner {
                Some(owner) => {
                    warn!(owner = %owner, "No credential presented, using fallback owner");
                    Ok(Owner(owner.clone()))
                }
                None => {
                    warn!("Unauthorized API access attempt");
                    Err(AppError::Unauthorized)
                }
            },
        }
    }
}

/// `Ok(None)` only when no `Authorization` header was sent. A header that does
/// not carry a usable bearer token is rejected outright.
fn bearer_token(parts: &Parts) -> Result<Option<String>, AppError> {
    let Some(header) = parts.headers.get(AUTHORIZATION) else {
        return Ok(None);
    };

    let token = header
        .to_str()
        .ok()
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());

    match token {
        Some(token) => Ok(Some(token.to_string())),
        None => {
            warn!("Rejected malformed Authorization header");
            Err(AppError::Unauthorized)
        }
    }
}

fn session_token(parts: &Parts) -> Option<String> {
    let jar = CookieJar::from_headers(&parts.headers);
    let value = jar.get(SESSION_COOKIE)?.value().trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Cross-origin policy for the browser client. Pre-flight requests are
/// answered here and never reach the handlers.
pub fn cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.allowed_origins.clone()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            HeaderName::from_static("content-type"),
            HeaderName::from_static("authorization"),
        ])
        .allow_credentials(true)
}

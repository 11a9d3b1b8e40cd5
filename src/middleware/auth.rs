use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::auth::{validate_token, Claims};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, inserted into request extensions by [`require_admin`].
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
    pub is_admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
            is_admin: claims.is_admin,
        }
    }
}

/// Lets the request through only with a valid token whose `isAdmin` is true.
/// Every other case, including a valid non-admin token, is 401.
pub async fn require_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_user = match authenticate(&headers, &state.config.security.jwt_secret) {
        Ok(user) => user,
        Err(msg) => return ApiError::unauthorized(msg).into_response(),
    };

    if !auth_user.is_admin {
        debug!("Rejected non-admin user: {}", auth_user.username);
        return ApiError::unauthorized("Admin privileges required").into_response();
    }

    request.extensions_mut().insert(auth_user);
    next.run(request).await
}

fn authenticate(headers: &HeaderMap, secret: &str) -> Result<AuthUser, String> {
    let token = extract_jwt_from_headers(headers)?;
    let claims = validate_token(&token, secret).map_err(|e| e.to_string())?;
    Ok(AuthUser::from(claims))
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

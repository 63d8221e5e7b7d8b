use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::TokenError;
use crate::database::models::user::{Role, User};
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated user context attached to the request after the bearer
/// token has been verified. Deliberately excludes the password hash.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for AuthUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Why a request was rejected. Logged for diagnostics only; every branch
/// produces the same outward 401.
#[derive(Debug)]
enum RejectReason {
    NoToken,
    TokenFailed(TokenError),
    UserGone(Uuid),
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectReason::NoToken => write!(f, "missing or non-bearer authorization header"),
            RejectReason::TokenFailed(e) => write!(f, "token verification failed: {}", e),
            RejectReason::UserGone(id) => write!(f, "token subject {} no longer exists", id),
        }
    }
}

/// Authentication middleware for every protected route: extracts the
/// bearer token, verifies it, resolves the user, and injects [`AuthUser`]
/// into the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    match authenticate(&state, &headers).await? {
        Ok(auth_user) => {
            request.extensions_mut().insert(auth_user);
            Ok(next.run(request).await)
        }
        Err(reason) => {
            tracing::warn!("rejected request: {}", reason);
            Err(ApiError::Unauthorized)
        }
    }
}

/// Inner result distinguishes a rejection (uniform 401) from a storage
/// failure (500).
async fn authenticate(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Result<AuthUser, RejectReason>, ApiError> {
    let token = match extract_bearer_token(headers) {
        Some(token) => token,
        None => return Ok(Err(RejectReason::NoToken)),
    };

    let user_id = match state.tokens.verify(token) {
        Ok(id) => id,
        Err(e) => return Ok(Err(RejectReason::TokenFailed(e))),
    };

    match state.users.user_by_id(user_id).await? {
        Some(user) => Ok(Ok(AuthUser::from(&user))),
        None => Ok(Err(RejectReason::UserGone(user_id))),
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let token = headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

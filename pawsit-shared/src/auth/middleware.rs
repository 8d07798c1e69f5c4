/// JWT authentication middleware for Axum
///
/// Every request whose path starts with `/api` must carry
/// `Authorization: Bearer <token>`, except the public `/api/auth/*` routes.
/// Paths outside `/api` (health checks, static assets) pass through untouched.
///
/// On success an [`AuthContext`] is added to the request extensions; handlers
/// take it as an extractor. Missing headers, malformed headers, bad
/// signatures and expired tokens all end the request with a generic 401 before
/// any handler runs.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Router};
/// use pawsit_shared::auth::middleware::{jwt_auth_middleware, AuthContext};
///
/// async fn me(auth: AuthContext) -> String {
///     format!("user {} ({})", auth.user_id, auth.role)
/// }
///
/// let app: Router = Router::new()
///     .route("/api/me", get(me))
///     .layer(middleware::from_fn_with_state(
///         "your-jwt-secret".to_string(),
///         jwt_auth_middleware,
///     ));
/// ```

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::jwt::{validate_token, JwtError};
use crate::models::user::Role;

/// Authenticated caller, added to request extensions by [`jwt_auth_middleware`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user_id: i64,
    pub role: Role,
}

impl AuthContext {
    pub fn new(user_id: i64, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Error type for authentication middleware
#[derive(Debug)]
pub enum AuthError {
    /// No Authorization header
    MissingCredentials,

    /// Header present but not `Bearer <token>`
    InvalidFormat,

    /// Signature, algorithm, issuer or expiry check failed
    InvalidToken,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match self {
            AuthError::MissingCredentials | AuthError::InvalidFormat => {
                "missing or invalid Authorization header"
            }
            AuthError::InvalidToken => "invalid token",
        };

        (StatusCode::UNAUTHORIZED, Json(json!({ "error": message }))).into_response()
    }
}

/// Returns true if `path` needs a bearer token
pub fn requires_auth(path: &str) -> bool {
    let under_api = path == "/api" || path.starts_with("/api/");
    let public = path.starts_with("/api/auth/");
    under_api && !public
}

/// JWT authentication middleware
///
/// State is the signing secret.
pub async fn jwt_auth_middleware(
    State(secret): State<String>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    if !requires_auth(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidFormat)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)?;

    let claims = validate_token(token, &secret).map_err(|e| {
        match e {
            JwtError::Expired => tracing::debug!("Rejected expired token"),
            other => tracing::debug!(error = %other, "Rejected invalid token"),
        }
        AuthError::InvalidToken
    })?;

    req.extensions_mut()
        .insert(AuthContext::new(claims.sub, claims.role));

    Ok(next.run(req).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .copied()
            .ok_or(AuthError::MissingCredentials)
    }
}

use axum::{
    body::Body as AxumBody,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use jsonwebtoken::{decode, DecodingKey, Validation};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::warn;

use crate::web::models::{AuthenticatedUser, Claims};
use crate::web::{error::AppError, AppState};

/// Pulls the JWT from the Authorization header (Bearer) or the `token`
/// cookie and decodes it into the authenticated identity.
fn user_from_headers(headers: &HeaderMap, jwt_secret: &str) -> Option<AuthenticatedUser> {
    let jar = CookieJar::from_headers(headers);
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
        .or_else(|| jar.get("token").map(|c| c.value().to_string()))?;

    let token_data = decode::<Claims>(
        &token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!(error = ?e, "JWT decoding failed");
        e
    })
    .ok()?;

    Some(AuthenticatedUser {
        id: token_data.claims.user_id,
        email: token_data.claims.sub,
        is_admin: token_data.claims.is_admin,
    })
}

/// Layer for protected routers: rejects the request before any handler or
/// storage work when no valid identity is presented.
pub async fn auth(
    State(state): State<Arc<AppState>>,
    mut req: Request<AxumBody>,
    next: Next,
) -> Result<Response, AppError> {
    let user = user_from_headers(req.headers(), &state.config.jwt_secret)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Extractor for public endpoints whose response still varies by viewer
/// (subscription flags, boolean facets). Absent or invalid credentials
/// yield an anonymous viewer instead of an error.
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl FromRequestParts<Arc<AppState>> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(user_from_headers(
            &parts.headers,
            &state.config.jwt_secret,
        )))
    }
}

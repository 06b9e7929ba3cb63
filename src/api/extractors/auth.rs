use axum::{
    extract::{FromRequestParts, FromRef},
    http::{header::AUTHORIZATION, request::Parts},
};
use crate::state::AppState;
use crate::domain::models::auth::Session;
use crate::error::AppError;
use std::sync::Arc;
use tracing::Span;

/// Verified caller, taken from `Authorization: Bearer <jwt>`.
pub struct AuthUser(pub Session);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(AUTHORIZATION)
            .ok_or(AppError::Unauthorized)?
            .to_str()
            .map_err(|_| AppError::Unauthorized)?;

        let token = header.strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or(AppError::Unauthorized)?
            .trim();

        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let session = app_state.auth_service.verify_token(token)?;

        Span::current().record("user_id", session.user_id.as_str());
        Span::current().record("role", session.role.as_str());

        Ok(AuthUser(session))
    }
}

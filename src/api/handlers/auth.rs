use axum::{extract::State, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::LoginRequest, responses::{success, success_with_message}};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::ApiJson;
use crate::domain::models::auth::{AuthResponse, UserProfile};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = payload.email.trim();
    let user = match state.user_repo.find_by_email(email).await? {
        Some(user) => user,
        None => {
            warn!("Login attempt for unknown email");
            return Err(AppError::Unauthorized);
        }
    };

    state.auth_service.verify_password(&user, &payload.password)?;
    let (token, expires_in) = state.auth_service.issue_token(&user)?;

    info!("User logged in: {}", user.id);

    Ok(success_with_message("data", AuthResponse {
        token,
        token_type: "Bearer",
        expires_in,
        user: UserProfile::from(&user),
    }, "Login successful"))
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.user_repo.find_by_id(&session.user_id).await?
        .ok_or(AppError::Unauthorized)?;
    Ok(success("user", UserProfile::from(&user)))
}

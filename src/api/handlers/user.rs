use axum::{extract::State, http::StatusCode, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::CreateUserRequest, responses::{success, success_with_message, UserCreatedResponse}};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::ApiJson;
use crate::api::handlers::scope::branch_in_scope;
use crate::domain::models::{auth::UserProfile, user::{NewUserParams, Role, User}};
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};
use std::sync::Arc;
use tracing::info;

const MIN_PASSWORD_LEN: usize = 8;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if !session.role.can_create(payload.role) {
        return Err(AppError::Forbidden(format!(
            "Role {} may not create {} accounts", session.role.as_str(), payload.role.as_str()
        )));
    }

    let email = payload.email.trim().to_lowercase();
    if !email.contains('@') {
        return Err(AppError::Validation("Invalid email".into()));
    }
    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::Validation("Full name is required".into()));
    }
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let (hotel_id, branch_id) = match payload.role {
        Role::SuperAdmin => (None, None),
        Role::Ceo => match payload.hotel_id {
            Some(hotel_id) => (Some(state.catalog.get_hotel(&hotel_id).await?.id), None),
            None => (None, None),
        },
        Role::BranchAdmin | Role::Receptionist => {
            let branch_id = payload.branch_id
                .ok_or(AppError::Validation("branch_id is required for branch staff".into()))?;
            let branch = branch_in_scope(&state, &session, &branch_id).await?;
            (Some(branch.hotel_id), Some(branch.id))
        }
    };

    let (password, generated) = match payload.password {
        Some(password) if password.len() < MIN_PASSWORD_LEN => {
            return Err(AppError::Validation(format!("Password must be at least {} characters", MIN_PASSWORD_LEN)));
        }
        Some(password) => (password, None),
        None => {
            let secret: String = OsRng.sample_iter(&Alphanumeric).take(16).map(char::from).collect();
            (secret.clone(), Some(secret))
        }
    };

    let user = User::new(NewUserParams {
        email,
        full_name,
        password_hash: state.auth_service.hash_password(&password)?,
        role: payload.role,
        hotel_id,
        branch_id,
    });
    let created = state.user_repo.create(&user).await?;

    info!("User created: {} ({}) by {}", created.id, created.role.as_str(), session.user_id);

    Ok((StatusCode::CREATED, success_with_message("user", UserCreatedResponse {
        user: UserProfile::from(&created),
        initial_password: generated,
    }, "User created")))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let users = match session.role {
        Role::SuperAdmin => state.user_repo.list(None, None).await?,
        Role::Ceo => {
            let hotel_id = session.hotel_id.as_deref()
                .ok_or(AppError::Forbidden("No hotel assigned to this account".into()))?;
            state.user_repo.list(Some(hotel_id), None).await?
        }
        Role::BranchAdmin => {
            let branch_id = session.branch_id.as_deref()
                .ok_or(AppError::Forbidden("No branch assigned to this account".into()))?;
            state.user_repo.list(None, Some(branch_id)).await?
        }
        Role::Receptionist => return Err(AppError::Forbidden("Receptionists cannot list staff".into())),
    };

    let profiles: Vec<UserProfile> = users.iter().map(UserProfile::from).collect();
    Ok(success("users", profiles))
}

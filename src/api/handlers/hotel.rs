use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::{CreateBranchRequest, CreateHotelRequest}, responses::{success, success_with_message}};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::ApiJson;
use crate::domain::models::{hotel::NewHotelParams, user::Role};
use crate::domain::services::catalog::HotelPatch;
use std::sync::Arc;

pub async fn create_hotel(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiJson(payload): ApiJson<CreateHotelRequest>,
) -> Result<impl IntoResponse, AppError> {
    session.require_role(&[Role::SuperAdmin])?;

    let hotel = state.catalog.create_hotel(NewHotelParams {
        name: payload.name,
        email: payload.email,
        phone: payload.phone,
        address: payload.address,
        ceo_id: payload.ceo_id,
    }).await?;

    Ok((StatusCode::CREATED, success_with_message("hotel", hotel, "Hotel created")))
}

pub async fn list_hotels(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let hotels: Vec<_> = state.catalog.list_hotels().await?
        .into_iter()
        .filter(|h| session.can_access_hotel(&h.id))
        .collect();
    Ok(success("hotels", hotels))
}

pub async fn get_hotel(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    session.ensure_hotel(&id)?;
    let hotel = state.catalog.get_hotel(&id).await?;
    Ok(success("hotel", hotel))
}

pub async fn update_hotel(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<HotelPatch>,
) -> Result<impl IntoResponse, AppError> {
    session.require_role(&[Role::SuperAdmin, Role::Ceo])?;
    session.ensure_hotel(&id)?;
    if !session.is_super_admin() && (patch.ceo_id.is_some() || patch.is_active.is_some()) {
        return Err(AppError::Forbidden("Only a super admin can change ownership or activation".into()));
    }

    let hotel = state.catalog.update_hotel(&id, patch).await?;
    Ok(success_with_message("hotel", hotel, "Hotel updated"))
}

pub async fn deactivate_hotel(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    session.require_role(&[Role::SuperAdmin])?;
    let hotel = state.catalog.deactivate_hotel(&id).await?;
    Ok(success_with_message("hotel", hotel, "Hotel deactivated"))
}

pub async fn create_branch(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(hotel_id): Path<String>,
    ApiJson(payload): ApiJson<CreateBranchRequest>,
) -> Result<impl IntoResponse, AppError> {
    session.require_role(&[Role::SuperAdmin, Role::Ceo])?;
    session.ensure_hotel(&hotel_id)?;

    let branch = state.catalog
        .create_branch(&hotel_id, &payload.name, payload.address, payload.phone)
        .await?;
    Ok((StatusCode::CREATED, success_with_message("branch", branch, "Branch created")))
}

pub async fn list_branches(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(hotel_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    session.ensure_hotel(&hotel_id)?;
    let branches: Vec<_> = state.catalog.list_branches(&hotel_id).await?
        .into_iter()
        .filter(|b| session.can_access_branch(b))
        .collect();
    Ok(success("branches", branches))
}

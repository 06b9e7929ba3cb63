use axum::{extract::{Path, State}, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::OccupancyQuery, responses::success};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::ApiQuery;
use crate::api::handlers::scope::branch_in_scope;
use crate::domain::services::availability::occupancy_by_day;
use std::sync::Arc;

pub async fn get_branch(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(branch_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let branch = branch_in_scope(&state, &session, &branch_id).await?;
    Ok(success("branch", branch))
}

pub async fn list_branch_rooms(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(branch_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    branch_in_scope(&state, &session, &branch_id).await?;
    let groups = state.catalog.list_rooms_by_branch(&branch_id).await?;
    Ok(success("branchRooms", groups))
}

pub async fn room_availability(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(branch_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    branch_in_scope(&state, &session, &branch_id).await?;
    let counts = state.catalog.room_availability_by_branch(&branch_id).await?;
    Ok(success("roomAvailability", counts))
}

pub async fn occupancy(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(branch_id): Path<String>,
    ApiQuery(window): ApiQuery<OccupancyQuery>,
) -> Result<impl IntoResponse, AppError> {
    branch_in_scope(&state, &session, &branch_id).await?;

    let total_rooms = state.room_repo.count_by_branch(&branch_id).await?;
    let bookings = state.booking_repo.list_for_branch(&branch_id, window.from, window.to).await?;
    let days = occupancy_by_day(total_rooms, &bookings, window.from, window.to)?;

    Ok(success("occupancy", days))
}

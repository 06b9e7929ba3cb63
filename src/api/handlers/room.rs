use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::{AvailabilityQuery, CreateRoomRequest},
    responses::{success, success_with_message, AvailabilityResponse},
};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::{ApiJson, ApiQuery};
use crate::api::handlers::scope::{branch_in_scope, room_in_scope};
use crate::domain::services::catalog::RoomPatch;
use std::sync::Arc;

pub async fn create_room(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiJson(payload): ApiJson<CreateRoomRequest>,
) -> Result<impl IntoResponse, AppError> {
    session.ensure_can_manage_catalog()?;
    branch_in_scope(&state, &session, &payload.branch_id).await?;

    let room = state.catalog.create_room(
        &payload.branch_id,
        payload.room_type_id,
        &payload.room_number,
        payload.floor.unwrap_or(0),
    ).await?;

    Ok((StatusCode::CREATED, success_with_message("room", room, "Room created")))
}

pub async fn get_room(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let room = room_in_scope(&state, &session, &id).await?;
    Ok(success("room", room))
}

pub async fn update_room(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<RoomPatch>,
) -> Result<impl IntoResponse, AppError> {
    room_in_scope(&state, &session, &id).await?;
    // Front desk may flip housekeeping status; everything else is inventory management.
    let status_only = patch.room_type_id.is_none() && patch.room_number.is_none() && patch.floor.is_none();
    if !status_only {
        session.ensure_can_manage_catalog()?;
    }

    let room = state.catalog.update_room(&id, patch).await?;
    Ok(success_with_message("room", room, "Room updated"))
}

pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    session.ensure_can_manage_catalog()?;
    room_in_scope(&state, &session, &id).await?;

    state.catalog.delete_room(&id).await?;
    Ok(success_with_message("room", serde_json::Value::Null, "Room deleted"))
}

pub async fn check_availability(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    room_in_scope(&state, &session, &id).await?;

    let available = state.booking_engine
        .is_room_available(&id, query.check_in, query.check_out, query.exclude_booking_id.as_deref())
        .await?;

    Ok(success("available", AvailabilityResponse {
        room_id: id,
        check_in: query.check_in,
        check_out: query.check_out,
        available,
    }))
}

use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{requests::CreateRoomTypeRequest, responses::{success, success_with_message}};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::ApiJson;
use crate::api::handlers::scope::{branch_in_scope, room_type_in_scope};
use crate::domain::models::room::{NewRoomTypeParams, RoomTypeView};
use crate::domain::services::catalog::RoomTypePatch;
use std::sync::Arc;

pub async fn create_room_type(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiJson(payload): ApiJson<CreateRoomTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    session.ensure_can_manage_catalog()?;
    branch_in_scope(&state, &session, &payload.branch_id).await?;

    let created = state.catalog.create_room_type(NewRoomTypeParams {
        branch_id: payload.branch_id,
        name: payload.name,
        description: payload.description,
        price_per_night: payload.price_per_night,
        max_occupancy: payload.max_occupancy,
        amenities: payload.amenities,
    }).await?;

    Ok((StatusCode::CREATED, success_with_message("data", RoomTypeView::from(&created), "Room type created")))
}

/// Raw rows: `amenities` stays a JSON-encoded string here.
pub async fn list_by_branch(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(branch_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    branch_in_scope(&state, &session, &branch_id).await?;
    let room_types = state.catalog.list_room_types(&branch_id).await?;
    Ok(success("data", room_types))
}

pub async fn get_room_type(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let room_type = room_type_in_scope(&state, &session, &id).await?;
    Ok(success("data", RoomTypeView::from(&room_type)))
}

pub async fn update_room_type(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<RoomTypePatch>,
) -> Result<impl IntoResponse, AppError> {
    session.ensure_can_manage_catalog()?;
    room_type_in_scope(&state, &session, &id).await?;

    let updated = state.catalog.update_room_type(&id, patch).await?;
    Ok(success_with_message("data", RoomTypeView::from(&updated), "Room type updated"))
}

pub async fn delete_room_type(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    session.ensure_can_manage_catalog()?;
    room_type_in_scope(&state, &session, &id).await?;

    state.catalog.delete_room_type(&id).await?;
    Ok(success_with_message("data", serde_json::Value::Null, "Room type deleted"))
}

pub async fn available_rooms(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    room_type_in_scope(&state, &session, &id).await?;
    let rooms = state.catalog.list_available_rooms_by_type(&id).await?;
    Ok(success("availableRooms", rooms))
}

pub async fn floors(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    room_type_in_scope(&state, &session, &id).await?;
    let floors = state.catalog.available_floors(&id).await?;
    Ok(success("floors", floors))
}

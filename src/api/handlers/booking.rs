use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::{CreateBookingRequest, StatusChangeRequest, UpdateBookingByIdRequest},
    responses::{success, success_with_message},
};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::ApiJson;
use crate::api::handlers::scope::{booking_in_scope, room_in_scope};
use crate::domain::models::auth::Session;
use crate::domain::models::booking::Booking;
use crate::domain::services::booking_engine::{BookingPatch, BookingRequest};
use std::sync::Arc;
use tracing::info;

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiJson(payload): ApiJson<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let request = BookingRequest::try_from(payload)?;
    room_in_scope(&state, &session, &request.room_id).await?;

    let booking = state.booking_engine.create_booking(request).await?;
    info!("Booking {} created by {}", booking.id, session.user_id);

    Ok((StatusCode::CREATED, success_with_message("booking", booking, "Booking created")))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = booking_in_scope(&state, &session, &id).await?;
    Ok(success("booking", booking))
}

async fn apply_update(state: &AppState, session: &Session, id: &str, patch: BookingPatch) -> Result<Booking, AppError> {
    booking_in_scope(state, session, id).await?;
    if let Some(room_id) = &patch.room_id {
        room_in_scope(state, session, room_id).await?;
    }
    state.booking_engine.update_booking(id, patch).await
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<BookingPatch>,
) -> Result<impl IntoResponse, AppError> {
    let booking = apply_update(&state, &session, &id, patch).await?;
    Ok(success_with_message("booking", booking, "Booking updated"))
}

/// `PUT /v1/bookings/update` carries the booking id in the body.
pub async fn update_booking_by_body(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiJson(payload): ApiJson<UpdateBookingByIdRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = apply_update(&state, &session, &payload.id, payload.patch).await?;
    Ok(success_with_message("booking", booking, "Booking updated"))
}

pub async fn change_status(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<StatusChangeRequest>,
) -> Result<impl IntoResponse, AppError> {
    booking_in_scope(&state, &session, &id).await?;

    let booking = state.booking_engine.transition_booking(&id, payload.status).await?;
    let message = format!("Booking is now {}", booking.status);
    Ok(success_with_message("booking", booking, &message))
}

pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    booking_in_scope(&state, &session, &id).await?;
    state.booking_engine.delete_booking(&id).await?;
    Ok(success_with_message("booking", serde_json::Value::Null, "Booking deleted"))
}

use axum::{extract::State, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::responses::success;
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::ApiQuery;
use crate::api::handlers::scope::narrow;
use crate::domain::models::booking::BookingFilter;
use crate::domain::services::reporting::revenue_by_month;
use std::sync::Arc;

pub async fn bookings_summary(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiQuery(mut filter): ApiQuery<BookingFilter>,
) -> Result<impl IntoResponse, AppError> {
    narrow(&session, &mut filter.hotel_id, &mut filter.branch_id)?;
    let rows = state.booking_repo.list_summaries(&filter).await?;
    Ok(success("bookings", rows))
}

pub async fn count_by_status(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiQuery(mut filter): ApiQuery<BookingFilter>,
) -> Result<impl IntoResponse, AppError> {
    narrow(&session, &mut filter.hotel_id, &mut filter.branch_id)?;
    let counts = state.booking_repo.count_by_status(&filter).await?;
    Ok(success("counts", counts))
}

pub async fn revenue(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiQuery(mut filter): ApiQuery<BookingFilter>,
) -> Result<impl IntoResponse, AppError> {
    narrow(&session, &mut filter.hotel_id, &mut filter.branch_id)?;
    let rows = state.booking_repo.list_summaries(&filter).await?;
    Ok(success("revenue", revenue_by_month(&rows)))
}

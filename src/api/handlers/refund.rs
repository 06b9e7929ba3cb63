use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::{
    requests::{CreateRefundRequest, ResolveRefundRequest},
    responses::{success, success_with_message},
};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::{ApiJson, ApiQuery};
use crate::api::handlers::scope::{booking_in_scope, narrow};
use crate::domain::models::{booking::RefundFilter, user::Role};
use std::sync::Arc;

pub async fn request_refund(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiJson(payload): ApiJson<CreateRefundRequest>,
) -> Result<impl IntoResponse, AppError> {
    booking_in_scope(&state, &session, &payload.booking_id).await?;

    let refund = state.booking_engine
        .request_refund(&payload.booking_id, payload.amount, payload.reason)
        .await?;
    Ok((StatusCode::CREATED, success_with_message("refund", refund, "Refund requested")))
}

pub async fn resolve_refund(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ResolveRefundRequest>,
) -> Result<impl IntoResponse, AppError> {
    session.require_role(&[Role::SuperAdmin, Role::Ceo, Role::BranchAdmin])?;

    let existing = state.refund_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Refund not found".into()))?;
    booking_in_scope(&state, &session, &existing.booking_id).await?;

    let refund = state.booking_engine.resolve_refund(&id, payload.status).await?;
    Ok(success_with_message("refund", refund, "Refund resolved"))
}

pub async fn list_refunds(
    State(state): State<Arc<AppState>>,
    AuthUser(session): AuthUser,
    ApiQuery(mut filter): ApiQuery<RefundFilter>,
) -> Result<impl IntoResponse, AppError> {
    narrow(&session, &mut filter.hotel_id, &mut filter.branch_id)?;
    let refunds = state.booking_engine.list_refunds(&filter).await?;
    Ok(success("refunds", refunds))
}

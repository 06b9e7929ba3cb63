use axum::{extract::{Path, State}, http::StatusCode, response::IntoResponse};
use crate::state::AppState;
use crate::error::AppError;
use crate::api::dtos::responses::{success, success_with_message};
use crate::api::extractors::auth::AuthUser;
use crate::api::extractors::payload::ApiJson;
use crate::domain::models::customer::CustomerDetails;
use crate::domain::services::booking_engine::CustomerPatch;
use std::sync::Arc;

pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    ApiJson(details): ApiJson<CustomerDetails>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.booking_engine.create_customer(details).await?;
    Ok((StatusCode::CREATED, success_with_message("customer", customer, "Customer created")))
}

pub async fn list_summary(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let customers = state.booking_engine.list_customer_summaries().await?;
    Ok(success("customers", customers))
}

pub async fn get_customer(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.booking_engine.get_customer(&id).await?;
    Ok(success("customer", customer))
}

pub async fn update_customer(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<CustomerPatch>,
) -> Result<impl IntoResponse, AppError> {
    let customer = state.booking_engine.update_customer(&id, patch).await?;
    Ok(success_with_message("customer", customer, "Customer updated"))
}

pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.booking_engine.delete_customer(&id).await?;
    Ok(success_with_message("customer", serde_json::Value::Null, "Customer deleted"))
}

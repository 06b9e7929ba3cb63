use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{
    auth, booking, branch, customer, health, hotel, refund, report, room, room_type, user,
};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Auth & staff
        .route("/v1/auth/user-login", post(auth::login))
        .route("/v1/auth/me", get(auth::me))
        .route("/v1/users", post(user::create_user).get(user::list_users))

        // Hotels & branches
        .route("/v1/hotels", post(hotel::create_hotel).get(hotel::list_hotels))
        .route("/v1/hotels/{id}", get(hotel::get_hotel).patch(hotel::update_hotel).delete(hotel::deactivate_hotel))
        .route("/v1/hotels/{hotel_id}/branches", post(hotel::create_branch).get(hotel::list_branches))
        .route("/v1/branches/{branch_id}", get(branch::get_branch))
        .route("/v1/branches/{branch_id}/rooms", get(branch::list_branch_rooms))
        .route("/v1/branches/{branch_id}/room-availability", get(branch::room_availability))
        .route("/v1/branches/{branch_id}/occupancy", get(branch::occupancy))

        // Room types
        .route("/v1/room-types", post(room_type::create_room_type))
        .route("/v1/room-types/branch/{branch_id}", get(room_type::list_by_branch))
        .route("/v1/room-types/{id}", get(room_type::get_room_type).put(room_type::update_room_type).delete(room_type::delete_room_type))
        .route("/v1/room-types/{id}/available-rooms", get(room_type::available_rooms))
        .route("/v1/room-types/{id}/floors", get(room_type::floors))

        // Rooms
        .route("/v1/rooms", post(room::create_room))
        .route("/v1/rooms/{id}", get(room::get_room).put(room::update_room).delete(room::delete_room))
        .route("/v1/rooms/{id}/availability", get(room::check_availability))

        // Bookings (static segments before `{id}`)
        .route("/v1/bookings", post(booking::create_booking))
        .route("/v1/bookings/summary", get(report::bookings_summary))
        .route("/v1/bookings/stats/status", get(report::count_by_status))
        .route("/v1/bookings/stats/revenue", get(report::revenue))
        .route("/v1/bookings/update", put(booking::update_booking_by_body))
        .route("/v1/bookings/{id}", get(booking::get_booking).put(booking::update_booking).delete(booking::delete_booking))
        .route("/v1/bookings/{id}/status", post(booking::change_status))

        // Customers
        .route("/v1/customers", post(customer::create_customer))
        .route("/v1/customers/summary", get(customer::list_summary))
        .route("/v1/customers/{id}", get(customer::get_customer).put(customer::update_customer).delete(customer::delete_customer))

        // Refunds
        .route("/v1/refunds", post(refund::request_refund).get(refund::list_refunds))
        .route("/v1/refunds/{id}/resolve", post(refund::resolve_refund))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                        role = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}

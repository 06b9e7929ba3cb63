//! Hotel / branch scope checks shared by the handlers.

use crate::domain::models::{
    auth::Session,
    booking::Booking,
    hotel::Branch,
    room::{Room, RoomType},
    user::Role,
};
use crate::error::AppError;
use crate::state::AppState;

pub async fn branch_in_scope(state: &AppState, session: &Session, branch_id: &str) -> Result<Branch, AppError> {
    let branch = state.catalog.get_branch(branch_id).await?;
    session.ensure_branch(&branch)?;
    Ok(branch)
}

pub async fn room_type_in_scope(state: &AppState, session: &Session, room_type_id: &str) -> Result<RoomType, AppError> {
    let room_type = state.catalog.get_room_type(room_type_id).await?;
    branch_in_scope(state, session, &room_type.branch_id).await?;
    Ok(room_type)
}

pub async fn room_in_scope(state: &AppState, session: &Session, room_id: &str) -> Result<Room, AppError> {
    let room = state.catalog.get_room(room_id).await?;
    branch_in_scope(state, session, &room.branch_id).await?;
    Ok(room)
}

pub async fn booking_in_scope(state: &AppState, session: &Session, booking_id: &str) -> Result<Booking, AppError> {
    let booking = state.booking_engine.get_booking(booking_id).await?;
    room_in_scope(state, session, &booking.room_id).await?;
    Ok(booking)
}

/// Hotel and branch a listing must be narrowed to. `(None, None)` leaves the caller's filter as is.
pub fn forced_scope(session: &Session) -> Result<(Option<String>, Option<String>), AppError> {
    match session.role {
        Role::SuperAdmin => Ok((None, None)),
        Role::Ceo => {
            let hotel = session.hotel_id.clone()
                .ok_or(AppError::Forbidden("No hotel assigned to this account".into()))?;
            Ok((Some(hotel), None))
        }
        Role::BranchAdmin | Role::Receptionist => {
            let branch = session.branch_id.clone()
                .ok_or(AppError::Forbidden("No branch assigned to this account".into()))?;
            Ok((session.hotel_id.clone(), Some(branch)))
        }
    }
}

/// Overwrites the requested hotel/branch with the caller's own where the role is scoped.
pub fn narrow(
    session: &Session,
    hotel_id: &mut Option<String>,
    branch_id: &mut Option<String>,
) -> Result<(), AppError> {
    let (hotel, branch) = forced_scope(session)?;
    if hotel.is_some() { *hotel_id = hotel; }
    if branch.is_some() { *branch_id = branch; }
    Ok(())
}

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Deserialize;
use chrono::Utc;
use tracing::info;

use crate::domain::models::{
    hotel::{Branch, Hotel, NewHotelParams},
    room::{
        encode_amenities, Amenities, BranchRoomGroup, NewRoomTypeParams, Room, RoomStatus, RoomType,
        RoomTypeAvailability, RoomTypeView,
    },
    user::Role,
};
use crate::domain::ports::{
    BookingRepository, BranchRepository, HotelRepository, RoomRepository, RoomTypeRepository, UserRepository,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Default)]
pub struct HotelPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub ceo_id: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RoomTypePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_per_night: Option<f64>,
    pub max_occupancy: Option<i32>,
    pub amenities: Option<Amenities>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RoomPatch {
    /// Empty string unassigns the room from its type.
    pub room_type_id: Option<String>,
    pub room_number: Option<String>,
    pub floor: Option<i32>,
    pub status: Option<RoomStatus>,
}

pub struct CatalogService {
    hotels: Arc<dyn HotelRepository>,
    branches: Arc<dyn BranchRepository>,
    room_types: Arc<dyn RoomTypeRepository>,
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
    users: Arc<dyn UserRepository>,
}

fn require_name(value: &str, what: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", what)));
    }
    Ok(trimmed.to_string())
}

fn validate_rate(price_per_night: f64, max_occupancy: i32) -> Result<(), AppError> {
    if !price_per_night.is_finite() || price_per_night <= 0.0 {
        return Err(AppError::Validation("Price per night must be greater than zero".into()));
    }
    if max_occupancy < 1 {
        return Err(AppError::Validation("Max occupancy must be at least 1".into()));
    }
    Ok(())
}

impl CatalogService {
    pub fn new(
        hotels: Arc<dyn HotelRepository>,
        branches: Arc<dyn BranchRepository>,
        room_types: Arc<dyn RoomTypeRepository>,
        rooms: Arc<dyn RoomRepository>,
        bookings: Arc<dyn BookingRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { hotels, branches, room_types, rooms, bookings, users }
    }

    // ---- Hotels ----

    pub async fn create_hotel(&self, mut params: NewHotelParams) -> Result<Hotel, AppError> {
        params.name = require_name(&params.name, "Hotel name")?;
        if let Some(ceo_id) = &params.ceo_id {
            self.ensure_ceo(ceo_id).await?;
        }

        let hotel = self.hotels.create(&Hotel::new(params)).await?;
        if let Some(ceo_id) = &hotel.ceo_id {
            self.users.assign_hotel(ceo_id, &hotel.id).await?;
        }

        info!("Hotel created: {}", hotel.id);
        Ok(hotel)
    }

    pub async fn get_hotel(&self, id: &str) -> Result<Hotel, AppError> {
        self.hotels.find_by_id(id).await?
            .ok_or(AppError::NotFound("Hotel not found".into()))
    }

    pub async fn list_hotels(&self) -> Result<Vec<Hotel>, AppError> {
        self.hotels.list().await
    }

    pub async fn update_hotel(&self, id: &str, patch: HotelPatch) -> Result<Hotel, AppError> {
        let mut hotel = self.get_hotel(id).await?;

        if let Some(name) = patch.name { hotel.name = require_name(&name, "Hotel name")?; }
        if let Some(email) = patch.email { hotel.email = Some(email); }
        if let Some(phone) = patch.phone { hotel.phone = Some(phone); }
        if let Some(address) = patch.address { hotel.address = Some(address); }
        if let Some(active) = patch.is_active { hotel.is_active = active; }

        let mut new_ceo = None;
        if let Some(ceo_id) = patch.ceo_id {
            self.ensure_ceo(&ceo_id).await?;
            hotel.ceo_id = Some(ceo_id.clone());
            new_ceo = Some(ceo_id);
        }

        let updated = self.hotels.update(&hotel).await?;
        if let Some(ceo_id) = new_ceo {
            self.users.assign_hotel(&ceo_id, &updated.id).await?;
        }
        info!("Hotel updated: {}", updated.id);
        Ok(updated)
    }

    /// Hotels are never hard-deleted.
    pub async fn deactivate_hotel(&self, id: &str) -> Result<Hotel, AppError> {
        self.get_hotel(id).await?;
        let hotel = self.hotels.set_active(id, false).await?;
        info!("Hotel deactivated: {}", id);
        Ok(hotel)
    }

    async fn ensure_ceo(&self, user_id: &str) -> Result<(), AppError> {
        let user = self.users.find_by_id(user_id).await?
            .ok_or(AppError::NotFound("CEO user not found".into()))?;
        if user.role != Role::Ceo {
            return Err(AppError::Validation("Assigned owner must have the ceo role".into()));
        }
        Ok(())
    }

    // ---- Branches ----

    pub async fn create_branch(
        &self,
        hotel_id: &str,
        name: &str,
        address: Option<String>,
        phone: Option<String>,
    ) -> Result<Branch, AppError> {
        let hotel = self.get_hotel(hotel_id).await?;
        if !hotel.is_active {
            return Err(AppError::Conflict("Hotel is deactivated".into()));
        }
        let name = require_name(name, "Branch name")?;

        let branch = self.branches.create(&Branch::new(hotel.id, name, address, phone)).await?;
        info!("Branch created: {} for hotel {}", branch.id, branch.hotel_id);
        Ok(branch)
    }

    pub async fn get_branch(&self, id: &str) -> Result<Branch, AppError> {
        self.branches.find_by_id(id).await?
            .ok_or(AppError::NotFound("Branch not found".into()))
    }

    pub async fn list_branches(&self, hotel_id: &str) -> Result<Vec<Branch>, AppError> {
        self.get_hotel(hotel_id).await?;
        self.branches.list_by_hotel(hotel_id).await
    }

    // ---- Room types ----

    pub async fn create_room_type(&self, mut params: NewRoomTypeParams) -> Result<RoomType, AppError> {
        params.name = require_name(&params.name, "Room type name")?;
        validate_rate(params.price_per_night, params.max_occupancy)?;
        self.get_branch(&params.branch_id).await?;

        let created = self.room_types.create(&RoomType::new(params)).await?;
        info!("Room type created: {} ({})", created.name, created.id);
        Ok(created)
    }

    pub async fn get_room_type(&self, id: &str) -> Result<RoomType, AppError> {
        self.room_types.find_by_id(id).await?
            .ok_or(AppError::NotFound("Room type not found".into()))
    }

    pub async fn list_room_types(&self, branch_id: &str) -> Result<Vec<RoomType>, AppError> {
        self.get_branch(branch_id).await?;
        self.room_types.list_by_branch(branch_id).await
    }

    pub async fn update_room_type(&self, id: &str, patch: RoomTypePatch) -> Result<RoomType, AppError> {
        let mut room_type = self.get_room_type(id).await?;

        if let Some(name) = patch.name { room_type.name = require_name(&name, "Room type name")?; }
        if let Some(description) = patch.description { room_type.description = Some(description); }
        if let Some(price) = patch.price_per_night { room_type.price_per_night = price; }
        if let Some(max) = patch.max_occupancy { room_type.max_occupancy = max; }
        if let Some(amenities) = patch.amenities { room_type.amenities = encode_amenities(&amenities); }

        validate_rate(room_type.price_per_night, room_type.max_occupancy)?;

        let updated = self.room_types.update(&room_type).await?;
        info!("Room type updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_room_type(&self, id: &str) -> Result<(), AppError> {
        self.get_room_type(id).await?;
        if self.rooms.count_by_type(id).await? > 0 {
            return Err(AppError::Conflict("Room type still has rooms assigned".into()));
        }
        self.room_types.delete(id).await?;
        info!("Room type deleted: {}", id);
        Ok(())
    }

    // ---- Rooms ----

    async fn check_type_in_branch(&self, room_type_id: &str, branch_id: &str) -> Result<(), AppError> {
        let room_type = self.get_room_type(room_type_id).await?;
        if room_type.branch_id != branch_id {
            return Err(AppError::Validation("Room type belongs to a different branch".into()));
        }
        Ok(())
    }

    pub async fn create_room(
        &self,
        branch_id: &str,
        room_type_id: Option<String>,
        room_number: &str,
        floor: i32,
    ) -> Result<Room, AppError> {
        self.get_branch(branch_id).await?;
        let room_number = require_name(room_number, "Room number")?;
        let room_type_id = room_type_id.filter(|id| !id.is_empty());

        if let Some(type_id) = &room_type_id {
            self.check_type_in_branch(type_id, branch_id).await?;
        }

        if self.rooms.find_by_number(branch_id, &room_number).await?.is_some() {
            return Err(AppError::Conflict(format!("Room {} already exists in this branch", room_number)));
        }

        let room = self.rooms.create(&Room::new(branch_id.to_string(), room_type_id, room_number, floor)).await?;
        info!("Room created: {} ({})", room.room_number, room.id);
        Ok(room)
    }

    pub async fn get_room(&self, id: &str) -> Result<Room, AppError> {
        self.rooms.find_by_id(id).await?
            .ok_or(AppError::NotFound("Room not found".into()))
    }

    pub async fn update_room(&self, id: &str, patch: RoomPatch) -> Result<Room, AppError> {
        let mut room = self.get_room(id).await?;

        if let Some(number) = patch.room_number {
            let number = require_name(&number, "Room number")?;
            if number != room.room_number {
                if self.rooms.find_by_number(&room.branch_id, &number).await?.is_some() {
                    return Err(AppError::Conflict(format!("Room {} already exists in this branch", number)));
                }
                room.room_number = number;
            }
        }

        if let Some(type_id) = patch.room_type_id {
            let next = Some(type_id).filter(|id| !id.is_empty());
            if next != room.room_type_id {
                // Open bookings were priced and capacity-checked against the current type.
                if self.bookings.count_active_for_room(id).await? > 0 {
                    return Err(AppError::Conflict("Room type cannot change while the room has active bookings".into()));
                }
                if let Some(type_id) = &next {
                    self.check_type_in_branch(type_id, &room.branch_id).await?;
                }
                room.room_type_id = next;
            }
        }

        if let Some(floor) = patch.floor { room.floor = floor; }
        if let Some(status) = patch.status { room.status = status; }
        room.updated_at = Some(Utc::now());

        let updated = self.rooms.update(&room).await?;
        info!("Room updated: {}", updated.id);
        Ok(updated)
    }

    pub async fn delete_room(&self, id: &str) -> Result<(), AppError> {
        self.get_room(id).await?;
        if self.bookings.count_active_for_room(id).await? > 0 {
            return Err(AppError::Conflict("Room has active bookings".into()));
        }
        self.rooms.delete(id).await?;
        info!("Room deleted: {}", id);
        Ok(())
    }

    pub async fn list_rooms_by_branch(&self, branch_id: &str) -> Result<Vec<BranchRoomGroup>, AppError> {
        self.get_branch(branch_id).await?;
        let room_types = self.room_types.list_by_branch(branch_id).await?;
        let rooms = self.rooms.list_by_branch(branch_id).await?;
        Ok(group_rooms(&room_types, rooms))
    }

    pub async fn list_available_rooms_by_type(&self, room_type_id: &str) -> Result<Vec<Room>, AppError> {
        self.get_room_type(room_type_id).await?;
        self.rooms.list_by_type_and_status(room_type_id, RoomStatus::Available).await
    }

    pub async fn room_availability_by_branch(&self, branch_id: &str) -> Result<Vec<RoomTypeAvailability>, AppError> {
        let groups = self.list_rooms_by_branch(branch_id).await?;
        Ok(groups.iter().map(availability_counts).collect())
    }

    /// Floors already used by rooms of this type; a read helper for forms, not a constraint.
    pub async fn available_floors(&self, room_type_id: &str) -> Result<Vec<i32>, AppError> {
        self.get_room_type(room_type_id).await?;
        let floors: BTreeSet<i32> = self.rooms.list_by_type(room_type_id).await?
            .into_iter()
            .map(|r| r.floor)
            .collect();
        Ok(floors.into_iter().collect())
    }
}

/// Groups rooms under their type in room-type order; unassigned rooms come last.
pub fn group_rooms(room_types: &[RoomType], rooms: Vec<Room>) -> Vec<BranchRoomGroup> {
    let mut groups: Vec<BranchRoomGroup> = room_types
        .iter()
        .map(|rt| BranchRoomGroup { room_type: Some(RoomTypeView::from(rt)), rooms: Vec::new() })
        .collect();
    let mut unassigned = Vec::new();

    for room in rooms {
        let slot = room.room_type_id.as_ref().and_then(|type_id| {
            groups.iter().position(|g| g.room_type.as_ref().is_some_and(|rt| &rt.id == type_id))
        });
        match slot {
            Some(idx) => groups[idx].rooms.push(room),
            None => unassigned.push(room),
        }
    }

    if !unassigned.is_empty() {
        groups.push(BranchRoomGroup { room_type: None, rooms: unassigned });
    }
    groups
}

fn availability_counts(group: &BranchRoomGroup) -> RoomTypeAvailability {
    let mut counts = RoomTypeAvailability {
        room_type_id: group.room_type.as_ref().map(|rt| rt.id.clone()),
        room_type: group.room_type.as_ref().map(|rt| rt.name.clone()),
        ..Default::default()
    };
    for room in &group.rooms {
        counts.total += 1;
        match room.status {
            RoomStatus::Available => counts.available += 1,
            RoomStatus::Occupied => counts.occupied += 1,
            RoomStatus::Maintenance => counts.maintenance += 1,
        }
    }
    counts
}

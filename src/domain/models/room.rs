use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Amenity name to availability flag, stored as JSON text.
pub type Amenities = BTreeMap<String, bool>;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct RoomType {
    pub id: String,
    pub branch_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_per_night: f64,
    pub max_occupancy: i32,
    pub amenities: String,
    pub created_at: DateTime<Utc>,
}

pub struct NewRoomTypeParams {
    pub branch_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_per_night: f64,
    pub max_occupancy: i32,
    pub amenities: Amenities,
}

impl RoomType {
    pub fn new(params: NewRoomTypeParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            branch_id: params.branch_id,
            name: params.name,
            description: params.description,
            price_per_night: params.price_per_night,
            max_occupancy: params.max_occupancy,
            amenities: encode_amenities(&params.amenities),
            created_at: Utc::now(),
        }
    }

    /// Malformed JSON decodes as "no amenities" rather than failing the read.
    pub fn amenities_map(&self) -> Amenities {
        serde_json::from_str(&self.amenities).unwrap_or_default()
    }
}

pub fn encode_amenities(amenities: &Amenities) -> String {
    serde_json::to_string(amenities).unwrap_or_else(|_| "{}".to_string())
}

/// Room type with amenities decoded, as nested in the branch room listing.
#[derive(Debug, Serialize, Clone)]
pub struct RoomTypeView {
    pub id: String,
    pub branch_id: String,
    pub name: String,
    pub description: Option<String>,
    pub price_per_night: f64,
    pub max_occupancy: i32,
    pub amenities: Amenities,
}

impl From<&RoomType> for RoomTypeView {
    fn from(rt: &RoomType) -> Self {
        Self {
            id: rt.id.clone(),
            branch_id: rt.branch_id.clone(),
            name: rt.name.clone(),
            description: rt.description.clone(),
            price_per_night: rt.price_per_night,
            max_occupancy: rt.max_occupancy,
            amenities: rt.amenities_map(),
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown room status: {0}")]
pub struct UnknownRoomStatus(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Maintenance,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Maintenance => "maintenance",
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomStatus {
    type Err = UnknownRoomStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "available" => Ok(RoomStatus::Available),
            "occupied" => Ok(RoomStatus::Occupied),
            "maintenance" => Ok(RoomStatus::Maintenance),
            _ => Err(UnknownRoomStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for RoomStatus {
    type Error = UnknownRoomStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Room {
    pub id: String,
    pub branch_id: String,
    pub room_type_id: Option<String>,
    pub room_number: String,
    pub floor: i32,
    #[sqlx(try_from = "String")]
    pub status: RoomStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Room {
    pub fn new(branch_id: String, room_type_id: Option<String>, room_number: String, floor: i32) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            branch_id,
            room_type_id,
            room_number,
            floor,
            status: RoomStatus::Available,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// One entry of the branch room listing: a room type and its rooms.
/// Rooms without a type are grouped under `room_type: None`.
#[derive(Debug, Serialize)]
pub struct BranchRoomGroup {
    pub room_type: Option<RoomTypeView>,
    pub rooms: Vec<Room>,
}

#[derive(Debug, Serialize, Default, PartialEq)]
pub struct RoomTypeAvailability {
    pub room_type_id: Option<String>,
    pub room_type: Option<String>,
    pub total: i64,
    pub available: i64,
    pub occupied: i64,
    pub maintenance: i64,
}

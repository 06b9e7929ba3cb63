use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub ceo_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewHotelParams {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub ceo_id: Option<String>,
}

impl Hotel {
    pub fn new(params: NewHotelParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: params.name,
            email: params.email,
            phone: params.phone,
            address: params.address,
            ceo_id: params.ceo_id,
            is_active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Branch {
    pub id: String,
    pub hotel_id: String,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Branch {
    pub fn new(hotel_id: String, name: String, address: Option<String>, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            hotel_id,
            name,
            address,
            phone,
            created_at: Utc::now(),
        }
    }
}

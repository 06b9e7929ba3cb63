use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Customer {
    pub id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub nationality: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub emergency_contact: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CustomerDetails {
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub nationality: Option<String>,
    pub id_type: Option<String>,
    pub id_number: Option<String>,
    pub emergency_contact: Option<String>,
}

impl Customer {
    pub fn new(details: CustomerDetails) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            full_name: details.full_name,
            phone: details.phone,
            email: details.email,
            address: details.address,
            nationality: details.nationality,
            id_type: details.id_type,
            id_number: details.id_number,
            emergency_contact: details.emergency_contact,
            created_at: Utc::now(),
        }
    }
}

/// Row of the customers table view.
#[derive(Debug, Serialize, FromRow, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub total_bookings: i64,
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Ceo,
    BranchAdmin,
    Receptionist,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "super_admin",
            Role::Ceo => "ceo",
            Role::BranchAdmin => "branch_admin",
            Role::Receptionist => "receptionist",
        }
    }

    /// Roles a user of this role may create accounts for.
    pub fn can_create(&self, other: Role) -> bool {
        match self {
            Role::SuperAdmin => true,
            Role::Ceo => matches!(other, Role::BranchAdmin | Role::Receptionist),
            Role::BranchAdmin => other == Role::Receptionist,
            Role::Receptionist => false,
        }
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Role::SuperAdmin),
            "ceo" => Ok(Role::Ceo),
            "branch_admin" => Ok(Role::BranchAdmin),
            "receptionist" => Ok(Role::Receptionist),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub hotel_id: Option<String>,
    pub branch_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewUserParams {
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role: Role,
    pub hotel_id: Option<String>,
    pub branch_id: Option<String>,
}

impl User {
    pub fn new(params: NewUserParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: params.email,
            full_name: params.full_name,
            password_hash: params.password_hash,
            role: params.role,
            hotel_id: params.hotel_id,
            branch_id: params.branch_id,
            created_at: Utc::now(),
        }
    }
}

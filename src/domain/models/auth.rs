use serde::{Deserialize, Serialize};

use crate::domain::models::{hotel::Branch, user::{Role, User}};
use crate::error::AppError;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
    pub role: Role,
    pub hotel_id: Option<String>,
    pub branch_id: Option<String>,
}

/// Per-request caller context, built from a verified access token.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
    pub hotel_id: Option<String>,
    pub branch_id: Option<String>,
}

impl Session {
    pub fn is_super_admin(&self) -> bool {
        self.role == Role::SuperAdmin
    }

    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!("Role {} may not perform this action", self.role.as_str())))
        }
    }

    pub fn can_access_hotel(&self, hotel_id: &str) -> bool {
        self.is_super_admin() || self.hotel_id.as_deref() == Some(hotel_id)
    }

    pub fn ensure_hotel(&self, hotel_id: &str) -> Result<(), AppError> {
        if self.can_access_hotel(hotel_id) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Hotel is outside your scope".into()))
        }
    }

    pub fn can_access_branch(&self, branch: &Branch) -> bool {
        match self.role {
            Role::SuperAdmin => true,
            Role::Ceo => self.hotel_id.as_deref() == Some(branch.hotel_id.as_str()),
            Role::BranchAdmin | Role::Receptionist => self.branch_id.as_deref() == Some(branch.id.as_str()),
        }
    }

    pub fn ensure_branch(&self, branch: &Branch) -> Result<(), AppError> {
        if self.can_access_branch(branch) {
            Ok(())
        } else {
            Err(AppError::Forbidden("Branch is outside your scope".into()))
        }
    }

    /// Receptionists work the front desk but do not manage inventory.
    pub fn ensure_can_manage_catalog(&self) -> Result<(), AppError> {
        self.require_role(&[Role::SuperAdmin, Role::Ceo, Role::BranchAdmin])
    }
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserProfile,
}

#[derive(Serialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub hotel_id: Option<String>,
    pub branch_id: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            hotel_id: user.hotel_id.clone(),
            branch_id: user.branch_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn branch(id: &str, hotel_id: &str) -> Branch {
        Branch {
            id: id.into(),
            hotel_id: hotel_id.into(),
            name: "Main".into(),
            address: None,
            phone: None,
            created_at: Utc::now(),
        }
    }

    fn session(role: Role, hotel: Option<&str>, branch: Option<&str>) -> Session {
        Session {
            user_id: "u".into(),
            role,
            hotel_id: hotel.map(Into::into),
            branch_id: branch.map(Into::into),
        }
    }

    #[test]
    fn test_branch_scope_by_role() {
        let b = branch("b1", "h1");

        assert!(session(Role::SuperAdmin, None, None).can_access_branch(&b));
        assert!(session(Role::Ceo, Some("h1"), None).can_access_branch(&b));
        assert!(!session(Role::Ceo, Some("h2"), None).can_access_branch(&b));
        assert!(session(Role::Receptionist, Some("h1"), Some("b1")).can_access_branch(&b));
        assert!(!session(Role::BranchAdmin, Some("h1"), Some("b2")).can_access_branch(&b));
    }

    #[test]
    fn test_receptionist_cannot_manage_catalog() {
        let s = session(Role::Receptionist, Some("h1"), Some("b1"));
        assert!(matches!(s.ensure_can_manage_catalog(), Err(AppError::Forbidden(_))));
    }
}

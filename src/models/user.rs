use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{check_email, require};
use super::{wire_enum, Entity, EntityId, InsertPosition, ValidationError};
use crate::metrics;

/// Roles offered by the user form. The role field itself is free text.
pub const ROLES: &[&str] = &[
    "Sales Executive",
    "Senior Sales Executive",
    "Team Lead",
    "Sales Manager",
    "Admin",
];

pub const DEPARTMENTS: &[&str] = &["Sales", "Marketing", "Support", "Admin"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum UserStatus {
    #[default]
    Active,
    Inactive,
    OnLeave,
}

wire_enum!(UserStatus {
    Active => "active",
    Inactive => "inactive",
    OnLeave => "on-leave",
});

/// A member of the sales organisation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub department: String,
    pub status: UserStatus,
    pub join_date: NaiveDate,
    pub leads_assigned: u32,
    /// Expected to stay at or below `leads_assigned`; the backend does not enforce it.
    pub leads_converted: u32,
}

impl User {
    /// Percentage of assigned leads converted, rounded to the nearest integer.
    pub fn conversion_rate(&self) -> u64 {
        metrics::conversion_rate(self.leads_assigned, self.leads_converted)
    }

    pub fn is_team_lead(&self) -> bool {
        self.role == "Team Lead"
    }

    /// Matches both "Sales Executive" and "Senior Sales Executive".
    pub fn is_sales_executive(&self) -> bool {
        self.role.contains("Sales Executive")
    }
}

/// Creation payload: a user minus `id`, `joinDate` and the lead counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub department: String,
    pub status: UserStatus,
}

impl Default for NewUser {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            role: String::new(),
            department: "Sales".to_string(),
            status: UserStatus::Active,
        }
    }
}

/// Partial user sent with `PUT /users/{id}`. Absent fields are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads_assigned: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leads_converted: Option<u32>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Entity for User {
    type New = NewUser;
    type Patch = UserPatch;

    const KIND: &'static str = "user";
    const INSERT: InsertPosition = InsertPosition::Back;

    fn id(&self) -> EntityId {
        self.id
    }

    fn create(id: EntityId, new: NewUser, today: NaiveDate) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            role: new.role,
            department: new.department,
            status: new.status,
            join_date: today,
            leads_assigned: 0,
            leads_converted: 0,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.role {
            self.role = v;
        }
        if let Some(v) = patch.department {
            self.department = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.leads_assigned {
            self.leads_assigned = v;
        }
        if let Some(v) = patch.leads_converted {
            self.leads_converted = v;
        }
    }

    fn validate(new: &NewUser) -> Result<(), ValidationError> {
        require("name", &new.name)?;
        require("email", &new.email)?;
        check_email(&new.email)?;
        require("role", &new.role)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(assigned: u32, converted: u32) -> User {
        User {
            id: 1,
            name: "Rahul Sharma".into(),
            email: "rahul@company.com".into(),
            phone: "+91 98765 43210".into(),
            role: "Senior Sales Executive".into(),
            department: "Sales".into(),
            status: UserStatus::Active,
            join_date: NaiveDate::from_ymd_opt(2023, 6, 15).unwrap(),
            leads_assigned: assigned,
            leads_converted: converted,
        }
    }

    #[test]
    fn test_conversion_rate() {
        assert_eq!(user(25, 8).conversion_rate(), 32);
        assert_eq!(user(0, 0).conversion_rate(), 0);
    }

    #[test]
    fn test_role_predicates() {
        let mut u = user(0, 0);
        assert!(u.is_sales_executive());
        assert!(!u.is_team_lead());

        u.role = "Team Lead".into();
        assert!(u.is_team_lead());
        assert!(!u.is_sales_executive());
    }

    #[test]
    fn test_create_zeroes_counters() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let new = NewUser {
            name: "Neha Gupta".into(),
            email: "neha@company.com".into(),
            role: "Sales Executive".into(),
            ..Default::default()
        };
        let u = User::create(5, new, today);
        assert_eq!(u.join_date, today);
        assert_eq!(u.leads_assigned, 0);
        assert_eq!(u.leads_converted, 0);
        assert_eq!(u.department, "Sales");
        assert_eq!(u.status, UserStatus::Active);
    }

    #[test]
    fn test_validate_requires_role_and_email() {
        let mut new = NewUser {
            name: "Neha Gupta".into(),
            email: "neha@company.com".into(),
            ..Default::default()
        };
        assert_eq!(User::validate(&new), Err(ValidationError::MissingField("role")));

        new.role = "Admin".into();
        assert!(User::validate(&new).is_ok());

        new.email = "neha".into();
        assert!(matches!(User::validate(&new), Err(ValidationError::InvalidEmail(_))));
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = UserPatch {
            status: Some(UserStatus::OnLeave),
            ..Default::default()
        };
        let json = serde_json::to_string(&patch).unwrap();
        assert_eq!(json, r#"{"status":"on-leave"}"#);
    }

    #[test]
    fn test_decode_backend_record() {
        let json = r#"{
            "id": 3, "name": "Amit Kumar", "email": "amit@company.com",
            "phone": "+91 76543 21098", "role": "Team Lead", "department": "Sales",
            "status": "active", "joinDate": "2023-03-10",
            "leadsAssigned": 32, "leadsConverted": 12
        }"#;
        let u: User = serde_json::from_str(json).unwrap();
        assert_eq!(u.id, 3);
        assert_eq!(u.join_date, NaiveDate::from_ymd_opt(2023, 3, 10).unwrap());
        assert_eq!(u.conversion_rate(), 38);
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::{check_email, require};
use super::{wire_enum, Entity, EntityId, InsertPosition, ValidationError};

/// Pipeline stage of a lead
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Won,
    Lost,
}

wire_enum!(LeadStatus {
    New => "new",
    Contacted => "contacted",
    Qualified => "qualified",
    Proposal => "proposal",
    Won => "won",
    Lost => "lost",
});

impl LeadStatus {
    /// Won and lost leads have left the pipeline.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Urgency shared by leads and follow-ups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

wire_enum!(Priority {
    Low => "low",
    Medium => "medium",
    High => "high",
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: EntityId,
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub priority: Priority,
    /// Free-text name, usually one of `ASSIGNEES`
    pub assignee: String,
    pub created_date: NaiveDate,
    pub last_contact: NaiveDate,
    #[serde(default)]
    pub next_follow_up: Option<NaiveDate>,
    #[serde(default)]
    pub notes: String,
}

/// Fields collected by the "add lead" form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub status: LeadStatus,
    pub priority: Priority,
    pub assignee: String,
    pub next_follow_up: Option<NaiveDate>,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<LeadStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_contact: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_follow_up: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LeadPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Entity for Lead {
    type New = NewLead;
    type Patch = LeadPatch;

    const KIND: &'static str = "lead";
    const INSERT: InsertPosition = InsertPosition::Back;

    fn id(&self) -> EntityId {
        self.id
    }

    fn create(id: EntityId, new: NewLead, today: NaiveDate) -> Self {
        Self {
            id,
            company_name: new.company_name,
            contact_person: new.contact_person,
            email: new.email,
            phone: new.phone,
            status: new.status,
            priority: new.priority,
            assignee: new.assignee,
            created_date: today,
            last_contact: today,
            next_follow_up: new.next_follow_up,
            notes: new.notes,
        }
    }

    fn apply(&mut self, patch: LeadPatch) {
        if let Some(v) = patch.company_name {
            self.company_name = v;
        }
        if let Some(v) = patch.contact_person {
            self.contact_person = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(v) = patch.assignee {
            self.assignee = v;
        }
        if let Some(v) = patch.last_contact {
            self.last_contact = v;
        }
        if let Some(v) = patch.next_follow_up {
            self.next_follow_up = Some(v);
        }
        if let Some(v) = patch.notes {
            self.notes = v;
        }
    }

    fn validate(new: &NewLead) -> Result<(), ValidationError> {
        require("company name", &new.company_name)?;
        require("contact person", &new.contact_person)?;
        if !new.email.trim().is_empty() {
            check_email(&new.email)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()
    }

    fn new_lead() -> NewLead {
        NewLead {
            company_name: "Acme Corp".into(),
            contact_person: "John Smith".into(),
            email: "john@acme.com".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_create_fills_defaults() {
        let lead = Lead::create(7, new_lead(), today());
        assert_eq!(lead.id, 7);
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.priority, Priority::Medium);
        assert_eq!(lead.created_date, today());
        assert_eq!(lead.last_contact, today());
    }

    #[test]
    fn test_apply_merges_only_supplied_fields() {
        let mut lead = Lead::create(1, new_lead(), today());
        lead.apply(LeadPatch {
            status: Some(LeadStatus::Qualified),
            notes: Some("Budget approved".into()),
            ..Default::default()
        });
        assert_eq!(lead.status, LeadStatus::Qualified);
        assert_eq!(lead.notes, "Budget approved");
        assert_eq!(lead.company_name, "Acme Corp");
        assert_eq!(lead.priority, Priority::Medium);
    }

    #[test]
    fn test_validate() {
        assert!(Lead::validate(&new_lead()).is_ok());

        let mut missing = new_lead();
        missing.company_name.clear();
        assert_eq!(
            Lead::validate(&missing),
            Err(ValidationError::MissingField("company name"))
        );

        let mut no_email = new_lead();
        no_email.email.clear();
        assert!(Lead::validate(&no_email).is_ok());

        let mut bad_email = new_lead();
        bad_email.email = "john".into();
        assert!(matches!(Lead::validate(&bad_email), Err(ValidationError::InvalidEmail(_))));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let lead = Lead::create(3, new_lead(), today());
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["companyName"], "Acme Corp");
        assert_eq!(json["createdDate"], "2024-01-17");
        assert_eq!(json["status"], "new");
    }

    #[test]
    fn test_closed_statuses() {
        assert!(LeadStatus::Won.is_closed());
        assert!(LeadStatus::Lost.is_closed());
        assert!(!LeadStatus::Proposal.is_closed());
    }
}

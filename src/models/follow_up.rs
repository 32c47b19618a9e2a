use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::validation::require;
use super::{wire_enum, Entity, EntityId, InsertPosition, Priority, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpType {
    #[default]
    Call,
    Email,
    Meeting,
    Demo,
}

wire_enum!(FollowUpType {
    Call => "call",
    Email => "email",
    Meeting => "meeting",
    Demo => "demo",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStatus {
    #[default]
    Pending,
    Completed,
    Overdue,
    Cancelled,
}

wire_enum!(FollowUpStatus {
    Pending => "pending",
    Completed => "completed",
    Overdue => "overdue",
    Cancelled => "cancelled",
});

impl FollowUpStatus {
    /// Completed and cancelled follow-ups accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// A scheduled reminder to contact a lead
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub id: EntityId,
    #[serde(default)]
    pub lead_id: Option<EntityId>,
    pub lead_name: String,
    pub assignee: String,
    #[serde(rename = "type")]
    pub kind: FollowUpType,
    pub priority: Priority,
    /// Stored status. Read `effective_status` for anything date-sensitive.
    pub status: FollowUpStatus,
    pub scheduled_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub scheduled_time: NaiveTime,
    pub description: String,
    #[serde(default)]
    pub notes: String,
    pub created_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
}

impl FollowUp {
    /// Status as of `today`: a pending follow-up whose date has passed reads
    /// as overdue. Nothing is written back.
    pub fn effective_status(&self, today: NaiveDate) -> FollowUpStatus {
        match self.status {
            FollowUpStatus::Pending if self.scheduled_date < today => FollowUpStatus::Overdue,
            other => other,
        }
    }

    pub fn is_due_today(&self, today: NaiveDate) -> bool {
        self.scheduled_date == today && self.status == FollowUpStatus::Pending
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.effective_status(today) == FollowUpStatus::Overdue
    }

    /// Completed within the inclusive window `[today - 7 days, today]`.
    pub fn completed_within_week(&self, today: NaiveDate) -> bool {
        match self.completed_date {
            Some(done) => done >= today - Duration::days(7) && done <= today,
            None => false,
        }
    }

    /// Mark as completed on `today`. Returns false when already terminal.
    pub fn complete(&mut self, today: NaiveDate) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = FollowUpStatus::Completed;
        self.completed_date = Some(today);
        true
    }

    /// Returns false when already terminal.
    pub fn cancel(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = FollowUpStatus::Cancelled;
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFollowUp {
    pub lead_id: Option<EntityId>,
    pub lead_name: String,
    pub assignee: String,
    #[serde(rename = "type")]
    pub kind: FollowUpType,
    pub priority: Priority,
    pub scheduled_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub scheduled_time: NaiveTime,
    pub description: String,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<FollowUpType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FollowUpStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_date: Option<NaiveDate>,
    #[serde(default, with = "hhmm::option", skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
}

impl FollowUpPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Entity for FollowUp {
    type New = NewFollowUp;
    type Patch = FollowUpPatch;

    const KIND: &'static str = "follow-up";
    const INSERT: InsertPosition = InsertPosition::Front;

    fn id(&self) -> EntityId {
        self.id
    }

    fn create(id: EntityId, new: NewFollowUp, today: NaiveDate) -> Self {
        Self {
            id,
            lead_id: new.lead_id,
            lead_name: new.lead_name,
            assignee: new.assignee,
            kind: new.kind,
            priority: new.priority,
            status: FollowUpStatus::Pending,
            scheduled_date: new.scheduled_date,
            scheduled_time: new.scheduled_time,
            description: new.description,
            notes: new.notes,
            created_date: today,
            completed_date: None,
        }
    }

    fn apply(&mut self, patch: FollowUpPatch) {
        if let Some(v) = patch.lead_name {
            self.lead_name = v;
        }
        if let Some(v) = patch.assignee {
            self.assignee = v;
        }
        if let Some(v) = patch.kind {
            self.kind = v;
        }
        if let Some(v) = patch.priority {
            self.priority = v;
        }
        if let Some(v) = patch.status {
            self.status = v;
        }
        if let Some(v) = patch.scheduled_date {
            self.scheduled_date = v;
        }
        if let Some(v) = patch.scheduled_time {
            self.scheduled_time = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.notes {
            self.notes = v;
        }
        if let Some(v) = patch.completed_date {
            self.completed_date = Some(v);
        }
    }

    fn validate(new: &NewFollowUp) -> Result<(), ValidationError> {
        require("lead name", &new.lead_name)?;
        require("assignee", &new.assignee)?;
        require("description", &new.description)?;
        Ok(())
    }
}

/// `HH:MM` wire format for scheduled times; seconds are accepted on input.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    /// Same format for optional fields.
    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &Option<NaiveTime>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match time {
                Some(time) => super::serialize(time, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                Some(s) => super::parse(&s).map(Some).map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }

    fn parse(s: &str) -> Result<NaiveTime, chrono::ParseError> {
        NaiveTime::parse_from_str(s, FORMAT).or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
    }
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::validation::require;
use super::{wire_enum, Entity, EntityId, InsertPosition, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    #[default]
    Outbound,
}

wire_enum!(CallDirection {
    Inbound => "inbound",
    Outbound => "outbound",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CallOutcome {
    #[default]
    Connected,
    NoAnswer,
    Voicemail,
    Busy,
}

wire_enum!(CallOutcome {
    Connected => "connected",
    NoAnswer => "no-answer",
    Voicemail => "voicemail",
    Busy => "busy",
});

/// One entry in the call history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: EntityId,
    #[serde(default)]
    pub lead_id: Option<EntityId>,
    pub lead_name: String,
    pub caller: String,
    pub direction: CallDirection,
    pub outcome: CallOutcome,
    pub duration_minutes: u32,
    pub call_date: NaiveDate,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCall {
    pub lead_id: Option<EntityId>,
    pub lead_name: String,
    pub caller: String,
    pub direction: CallDirection,
    pub outcome: CallOutcome,
    pub duration_minutes: u32,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<CallOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Entity for Call {
    type New = NewCall;
    type Patch = CallPatch;

    const KIND: &'static str = "call";
    const INSERT: InsertPosition = InsertPosition::Back;

    fn id(&self) -> EntityId {
        self.id
    }

    fn create(id: EntityId, new: NewCall, today: NaiveDate) -> Self {
        Self {
            id,
            lead_id: new.lead_id,
            lead_name: new.lead_name,
            caller: new.caller,
            direction: new.direction,
            outcome: new.outcome,
            duration_minutes: new.duration_minutes,
            call_date: today,
            notes: new.notes,
        }
    }

    fn apply(&mut self, patch: CallPatch) {
        if let Some(v) = patch.outcome {
            self.outcome = v;
        }
        if let Some(v) = patch.duration_minutes {
            self.duration_minutes = v;
        }
        if let Some(v) = patch.notes {
            self.notes = v;
        }
    }

    fn validate(new: &NewCall) -> Result<(), ValidationError> {
        require("lead name", &new.lead_name)?;
        require("caller", &new.caller)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_stamps_call_date() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let call = Call::create(
            2,
            NewCall {
                lead_id: Some(1),
                lead_name: "Acme Corp".into(),
                caller: "Rahul Sharma".into(),
                ..Default::default()
            },
            today,
        );
        assert_eq!(call.call_date, today);
        assert_eq!(call.direction, CallDirection::Outbound);
        assert_eq!(call.outcome, CallOutcome::Connected);
    }

    #[test]
    fn test_outcome_wire_spelling() {
        assert_eq!(serde_json::to_string(&CallOutcome::NoAnswer).unwrap(), r#""no-answer""#);
        assert_eq!("no-answer".parse::<CallOutcome>(), Ok(CallOutcome::NoAnswer));
    }

    #[test]
    fn test_validate() {
        let mut new = NewCall {
            lead_name: "Acme Corp".into(),
            ..Default::default()
        };
        assert_eq!(Call::validate(&new), Err(ValidationError::MissingField("caller")));
        new.caller = "Priya Patel".into();
        assert!(Call::validate(&new).is_ok());
    }
}

//! Entity schema shared by every store and view.
//!
//! Four flat records (Lead, User, FollowUp, Call), their closed value sets,
//! creation payloads and patches.

use chrono::NaiveDate;

/// Integer identity shared by all entities.
pub type EntityId = u32;

/// Sales staff names that leads and follow-ups are assigned to.
pub const ASSIGNEES: &[&str] = &["Rahul Sharma", "Priya Patel", "Amit Kumar", "Sneha Singh"];

/// Where a newly created entity lands in its store's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    Front,
    Back,
}

/// A flat record with a unique integer identity, owned by an entity store.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Creation payload: the entity minus identity, dates and counters.
    type New: Clone + Send + Sync;
    /// Partial update; absent fields keep their current value.
    type Patch: Clone + Send + Sync;

    /// Singular noun used in logs and messages ("lead", "user", ...).
    const KIND: &'static str;
    const INSERT: InsertPosition;

    fn id(&self) -> EntityId;

    /// Build the persisted entity from a payload, filling defaulted fields.
    fn create(id: EntityId, new: Self::New, today: NaiveDate) -> Self;

    fn apply(&mut self, patch: Self::Patch);

    fn validate(new: &Self::New) -> Result<(), ValidationError>;
}

/// Generates `as_str`, `label`, `ALL`, `Display` and `FromStr` for a closed
/// value set. Parsing is case-insensitive on the wire spelling.
macro_rules! wire_enum {
    ($name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire,)+
                }
            }

            /// Capitalised form for display ("on-leave" -> "On-leave").
            pub fn label(&self) -> String {
                let s = self.as_str();
                let mut chars = s.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    other => Err(format!(
                        "invalid {}: '{}' (expected one of: {})",
                        stringify!($name),
                        other,
                        [$($wire),+].join(", ")
                    )),
                }
            }
        }
    };
}

pub(crate) use wire_enum;

mod call;
mod follow_up;
mod lead;
mod user;
mod validation;

pub use call::{Call, CallDirection, CallOutcome, CallPatch, NewCall};
pub use follow_up::{FollowUp, FollowUpPatch, FollowUpStatus, FollowUpType, NewFollowUp};
pub use lead::{Lead, LeadPatch, LeadStatus, NewLead, Priority};
pub use user::{NewUser, User, UserPatch, UserStatus, DEPARTMENTS, ROLES};
pub use validation::{is_valid_email, require, ValidationError};

//! Search and categorical filtering over entity lists.
//!
//! Every filter is a conjunction: a case-insensitive substring search over
//! the entity's searchable fields, plus zero or more categorical selections
//! where `Choice::All` imposes no constraint. Results keep input order.

use chrono::NaiveDate;
use std::convert::Infallible;
use std::str::FromStr;

use crate::models::{
    Call, CallOutcome, FollowUp, FollowUpStatus, Lead, LeadStatus, Priority, User, UserStatus,
};

/// Categorical selection: a specific value, or the `"all"` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl Choice<String> {
    fn admits_str(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }
}

impl<T: FromStr> FromStr for Choice<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Choice::All)
        } else {
            s.parse().map(Choice::Only)
        }
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Choice::All, Choice::Only)
    }
}

/// Lower-cased free-text term. Empty matches everything.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Search {
    needle: String,
}

impl Search {
    pub fn new(term: &str) -> Self {
        Self {
            needle: term.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// True when the term is a substring of at least one field.
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        self.needle.is_empty()
            || fields
                .iter()
                .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

impl FromStr for Search {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Search::new(s))
    }
}

pub trait Filter<T> {
    fn matches(&self, item: &T) -> bool;
}

/// Stable filter: the sub-sequence of `items` the filter accepts.
pub fn apply<'a, T, F>(items: &'a [T], filter: &F) -> Vec<&'a T>
where
    F: Filter<T> + ?Sized,
{
    items.iter().filter(|item| filter.matches(item)).collect()
}

/// Searches company name and contact person.
#[derive(Debug, Clone, Default)]
pub struct LeadFilter {
    pub search: Search,
    pub status: Choice<LeadStatus>,
    pub priority: Choice<Priority>,
    pub assignee: Choice<String>,
}

impl Filter<Lead> for LeadFilter {
    fn matches(&self, lead: &Lead) -> bool {
        self.search
            .matches_any(&[lead.company_name.as_str(), lead.contact_person.as_str()])
            && self.status.admits(&lead.status)
            && self.priority.admits(&lead.priority)
            && self.assignee.admits_str(&lead.assignee)
    }
}

/// Searches name and email.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub search: Search,
    pub role: Choice<String>,
    pub status: Choice<UserStatus>,
}

impl Filter<User> for UserFilter {
    fn matches(&self, user: &User) -> bool {
        self.search
            .matches_any(&[user.name.as_str(), user.email.as_str()])
            && self.role.admits_str(&user.role)
            && self.status.admits(&user.status)
    }
}

/// Searches lead name and assignee. Status is compared against the
/// effective status as of `today`, so a lapsed pending follow-up is
/// selected by `overdue`.
#[derive(Debug, Clone)]
pub struct FollowUpFilter {
    pub search: Search,
    pub status: Choice<FollowUpStatus>,
    pub priority: Choice<Priority>,
    pub assignee: Choice<String>,
    pub today: NaiveDate,
}

impl FollowUpFilter {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            search: Search::default(),
            status: Choice::All,
            priority: Choice::All,
            assignee: Choice::All,
            today,
        }
    }
}

impl Filter<FollowUp> for FollowUpFilter {
    fn matches(&self, follow_up: &FollowUp) -> bool {
        self.search
            .matches_any(&[follow_up.lead_name.as_str(), follow_up.assignee.as_str()])
            && self.status.admits(&follow_up.effective_status(self.today))
            && self.priority.admits(&follow_up.priority)
            && self.assignee.admits_str(&follow_up.assignee)
    }
}

/// Searches lead name and caller.
#[derive(Debug, Clone, Default)]
pub struct CallFilter {
    pub search: Search,
    pub outcome: Choice<CallOutcome>,
}

impl Filter<Call> for CallFilter {
    fn matches(&self, call: &Call) -> bool {
        self.search
            .matches_any(&[call.lead_name.as_str(), call.caller.as_str()])
            && self.outcome.admits(&call.outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 17).unwrap()
    }

    fn ids<T: crate::models::Entity>(items: &[&T]) -> Vec<u32> {
        items.iter().map(|e| e.id()).collect()
    }

    #[test]
    fn test_choice_parse() {
        assert_eq!("all".parse::<Choice<LeadStatus>>(), Ok(Choice::All));
        assert_eq!("ALL".parse::<Choice<LeadStatus>>(), Ok(Choice::All));
        assert_eq!(
            "won".parse::<Choice<LeadStatus>>(),
            Ok(Choice::Only(LeadStatus::Won))
        );
        assert!("nope".parse::<Choice<LeadStatus>>().is_err());
        assert_eq!(
            "Team Lead".parse::<Choice<String>>(),
            Ok(Choice::Only("Team Lead".to_string()))
        );
    }

    #[test]
    fn test_empty_filter_returns_input_unchanged() {
        let users = seed::users();
        let result = apply(&users, &UserFilter::default());
        assert_eq!(result.len(), users.len());
        assert!(result.iter().zip(users.iter()).all(|(a, b)| *a == b));

        let follow_ups = seed::follow_ups();
        let result = apply(&follow_ups, &FollowUpFilter::new(today()));
        assert_eq!(ids(&result), follow_ups.iter().map(|f| f.id).collect::<Vec<_>>());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let users = seed::users();
        let filter = UserFilter {
            search: Search::new("PRIYA"),
            ..Default::default()
        };
        assert_eq!(ids(&apply(&users, &filter)), vec![2]);

        // email field is searched too
        let filter = UserFilter {
            search: Search::new("@company.com"),
            ..Default::default()
        };
        assert_eq!(apply(&users, &filter).len(), users.len());
    }

    #[test]
    fn test_role_filter_is_exact() {
        let users = seed::users();
        let filter = UserFilter {
            role: Choice::Only("Sales Executive".into()),
            ..Default::default()
        };
        // "Senior Sales Executive" is not an exact match
        assert_eq!(ids(&apply(&users, &filter)), vec![2, 4]);
    }

    #[test]
    fn test_predicates_are_anded_and_order_preserved() {
        let follow_ups = seed::follow_ups();
        let mut filter = FollowUpFilter::new(today());
        filter.search = Search::new("acme");
        filter.assignee = Choice::Only("Rahul Sharma".into());
        let result = apply(&follow_ups, &filter);
        assert_eq!(ids(&result), vec![1, 4]);

        filter.priority = Choice::Only(Priority::High);
        assert_eq!(ids(&apply(&follow_ups, &filter)), vec![1]);
    }

    #[test]
    fn test_follow_up_status_uses_effective_status() {
        let follow_ups = seed::follow_ups();
        let mut filter = FollowUpFilter::new(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap());
        filter.status = Choice::Only(FollowUpStatus::Overdue);
        // ids 1 and 2 were pending with dates before the 20th
        assert_eq!(ids(&apply(&follow_ups, &filter)), vec![1, 2, 4]);

        filter.status = Choice::Only(FollowUpStatus::Pending);
        assert!(apply(&follow_ups, &filter).is_empty());
    }

    #[test]
    fn test_every_excluded_item_fails_a_predicate() {
        let leads = seed::leads();
        let filter = LeadFilter {
            search: Search::new("tech"),
            status: Choice::Only(LeadStatus::Contacted),
            ..Default::default()
        };
        let kept = apply(&leads, &filter);
        for lead in &leads {
            let included = kept.iter().any(|k| k.id == lead.id);
            assert_eq!(included, filter.matches(lead));
        }
        assert!(kept.iter().all(|l| l.status == LeadStatus::Contacted));
    }

    #[test]
    fn test_call_filter() {
        let calls = seed::calls();
        let filter = CallFilter {
            outcome: Choice::Only(CallOutcome::NoAnswer),
            ..Default::default()
        };
        assert!(apply(&calls, &filter)
            .iter()
            .all(|c| c.outcome == CallOutcome::NoAnswer));
    }
}

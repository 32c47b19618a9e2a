//! Derived metrics for stat cards and the dashboard.
//!
//! Every function here is a pure projection of `(list, today)`; nothing is
//! cached or stored back on the entities.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Call, FollowUp, FollowUpStatus, Lead, LeadStatus, Priority, User, UserStatus};

/// Number of items satisfying `pred`.
pub fn count_where<T>(items: &[T], pred: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| pred(item)).count()
}

/// `round(converted / assigned * 100)`, half rounding up; `0` when nothing is assigned.
/// Converted may exceed assigned, so the result can pass 100 and is kept wide.
pub fn conversion_rate(assigned: u32, converted: u32) -> u64 {
    if assigned == 0 {
        return 0;
    }
    let scaled = u64::from(converted) * 100;
    let assigned = u64::from(assigned);
    (scaled * 2 + assigned) / (assigned * 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UserStats {
    pub total: usize,
    pub active: usize,
    pub team_leads: usize,
    pub sales_executives: usize,
}

impl UserStats {
    pub fn compute(users: &[User]) -> Self {
        Self {
            total: users.len(),
            active: count_where(users, |u| u.status == UserStatus::Active),
            team_leads: count_where(users, User::is_team_lead),
            sales_executives: count_where(users, User::is_sales_executive),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FollowUpStats {
    pub due_today: usize,
    pub overdue: usize,
    pub pending: usize,
    pub completed_this_week: usize,
}

impl FollowUpStats {
    pub fn compute(follow_ups: &[FollowUp], today: NaiveDate) -> Self {
        Self {
            due_today: count_where(follow_ups, |f| f.is_due_today(today)),
            overdue: count_where(follow_ups, |f| f.is_overdue(today)),
            pending: count_where(follow_ups, |f| {
                f.effective_status(today) == FollowUpStatus::Pending
            }),
            completed_this_week: count_where(follow_ups, |f| f.completed_within_week(today)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LeadStats {
    pub total: usize,
    /// Every status is present, zero counts included.
    pub by_status: BTreeMap<&'static str, usize>,
    /// Still in the pipeline (not won or lost).
    pub open: usize,
    pub high_priority: usize,
}

impl LeadStats {
    pub fn compute(leads: &[Lead]) -> Self {
        let by_status = LeadStatus::ALL
            .iter()
            .map(|status| (status.as_str(), count_where(leads, |l| l.status == *status)))
            .collect();

        Self {
            total: leads.len(),
            by_status,
            open: count_where(leads, |l| !l.status.is_closed()),
            high_priority: count_where(leads, |l| l.priority == Priority::High),
        }
    }

    pub fn count(&self, status: LeadStatus) -> usize {
        self.by_status.get(status.as_str()).copied().unwrap_or(0)
    }
}

/// Headline numbers for the landing view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct DashboardSummary {
    pub total_leads: usize,
    pub new_leads: usize,
    pub follow_ups_today: usize,
    pub calls_today: usize,
    /// Team-wide converted / assigned, as a percentage with one decimal.
    pub team_conversion_rate: f64,
}

impl DashboardSummary {
    pub fn compute(
        leads: &[Lead],
        users: &[User],
        follow_ups: &[FollowUp],
        calls: &[Call],
        today: NaiveDate,
    ) -> Self {
        Self {
            total_leads: leads.len(),
            new_leads: count_where(leads, |l| l.status == LeadStatus::New),
            follow_ups_today: count_where(follow_ups, |f| f.is_due_today(today)),
            calls_today: count_where(calls, |c| c.call_date == today),
            team_conversion_rate: team_conversion_rate(users),
        }
    }
}

fn team_conversion_rate(users: &[User]) -> f64 {
    let assigned: u64 = users.iter().map(|u| u64::from(u.leads_assigned)).sum();
    let converted: u64 = users.iter().map(|u| u64::from(u.leads_converted)).sum();
    if assigned == 0 {
        return 0.0;
    }
    (converted as f64 / assigned as f64 * 1000.0).round() / 10.0
}

//! Plain-text tables and stat blocks for the terminal views.

use chrono::{Datelike, NaiveDate};

use super::ui::truncate;
use crate::metrics::{DashboardSummary, FollowUpStats, LeadStats, UserStats};
use crate::models::{Call, FollowUp, Lead, LeadStatus, User};

/// Format a date as "Jan 17, 2024"
pub fn format_date(date: NaiveDate) -> String {
    format!("{} {}, {}", month_abbrev(date.month()), date.day(), date.year())
}

/// Get month abbreviation
fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

// ============================================================================
// Leads
// ============================================================================

pub fn lead_header() -> String {
    format!(
        "{:>4}  {:<22}  {:<16}  {:<10}  {:<6}  {:<14}  {}",
        "ID", "COMPANY", "CONTACT", "STATUS", "PRIO", "ASSIGNEE", "LAST CONTACT"
    )
}

pub fn lead_row(lead: &Lead) -> String {
    format!(
        "{:>4}  {:<22}  {:<16}  {:<10}  {:<6}  {:<14}  {}",
        lead.id,
        truncate(&lead.company_name, 22),
        truncate(&lead.contact_person, 16),
        lead.status.label(),
        lead.priority.label(),
        truncate(&lead.assignee, 14),
        format_date(lead.last_contact)
    )
}

pub fn print_leads(leads: &[&Lead]) {
    if leads.is_empty() {
        println!("No leads found.");
        return;
    }
    println!("{}", lead_header());
    for lead in leads {
        println!("{}", lead_row(lead));
    }
}

pub fn print_lead(lead: &Lead) {
    println!("{}\n", lead.company_name);
    println!("  {}", lead.contact_person);
    if !lead.email.is_empty() {
        println!("  {}", lead.email);
    }
    if !lead.phone.is_empty() {
        println!("  {}", lead.phone);
    }
    println!(
        "  {} · {} priority · {}",
        lead.status.label(),
        lead.priority.label(),
        lead.assignee
    );
    println!(
        "  created {} · last contact {}",
        format_date(lead.created_date),
        format_date(lead.last_contact)
    );
    if let Some(next) = lead.next_follow_up {
        println!("  next follow-up {}", format_date(next));
    }
    if !lead.notes.is_empty() {
        println!("  {}", truncate(&lead.notes, 60));
    }
}

pub fn print_lead_stats(stats: &LeadStats) {
    let pipeline: Vec<String> = LeadStatus::ALL
        .iter()
        .map(|s| format!("{} {}", s.label(), stats.count(*s)))
        .collect();
    println!(
        "Leads {}  ·  Open {}  ·  High priority {}",
        stats.total, stats.open, stats.high_priority
    );
    println!("  {}", pipeline.join("  "));
}

// ============================================================================
// Users
// ============================================================================

pub fn user_header() -> String {
    format!(
        "{:>4}  {:<18}  {:<24}  {:<22}  {:<9}  {:>5}  {:>5}",
        "ID", "NAME", "EMAIL", "ROLE", "STATUS", "LEADS", "CONV"
    )
}

pub fn user_row(user: &User) -> String {
    format!(
        "{:>4}  {:<18}  {:<24}  {:<22}  {:<9}  {:>5}  {:>4}%",
        user.id,
        truncate(&user.name, 18),
        truncate(&user.email, 24),
        truncate(&user.role, 22),
        user.status.label(),
        user.leads_assigned,
        user.conversion_rate()
    )
}

/// `load_error` replaces the rows when the last fetch failed.
pub fn print_users(users: &[&User], load_error: Option<&str>) {
    println!("{}", user_header());
    if let Some(message) = load_error {
        println!("  {}", message);
        return;
    }
    if users.is_empty() {
        println!("  No users found.");
        return;
    }
    for user in users {
        println!("{}", user_row(user));
    }
}

pub fn print_user_stats(stats: &UserStats) {
    println!(
        "Users {}  ·  Active {}  ·  Team leads {}  ·  Sales executives {}",
        stats.total, stats.active, stats.team_leads, stats.sales_executives
    );
}

// ============================================================================
// Follow-ups
// ============================================================================

pub fn follow_up_header() -> String {
    format!(
        "{:>4}  {:<18}  {:<14}  {:<8}  {:<6}  {:<10}  {}",
        "ID", "LEAD", "ASSIGNEE", "TYPE", "PRIO", "STATUS", "SCHEDULED"
    )
}

/// Status column shows the status as of `today`.
pub fn follow_up_row(follow_up: &FollowUp, today: NaiveDate) -> String {
    format!(
        "{:>4}  {:<18}  {:<14}  {:<8}  {:<6}  {:<10}  {} {}",
        follow_up.id,
        truncate(&follow_up.lead_name, 18),
        truncate(&follow_up.assignee, 14),
        follow_up.kind.label(),
        follow_up.priority.label(),
        follow_up.effective_status(today).label(),
        format_date(follow_up.scheduled_date),
        follow_up.scheduled_time.format("%H:%M")
    )
}

pub fn print_follow_ups(follow_ups: &[&FollowUp], today: NaiveDate) {
    if follow_ups.is_empty() {
        println!("No follow-ups found.");
        return;
    }
    println!("{}", follow_up_header());
    for follow_up in follow_ups {
        println!("{}", follow_up_row(follow_up, today));
    }
}

pub fn print_follow_up_stats(stats: &FollowUpStats) {
    println!(
        "Due today {}  ·  Overdue {}  ·  Pending {}  ·  Completed this week {}",
        stats.due_today, stats.overdue, stats.pending, stats.completed_this_week
    );
}

// ============================================================================
// Calls
// ============================================================================

pub fn call_header() -> String {
    format!(
        "{:>4}  {:<20}  {:<14}  {:<8}  {:<9}  {:>4}  {}",
        "ID", "LEAD", "CALLER", "DIR", "OUTCOME", "MIN", "DATE"
    )
}

pub fn call_row(call: &Call) -> String {
    format!(
        "{:>4}  {:<20}  {:<14}  {:<8}  {:<9}  {:>4}  {}",
        call.id,
        truncate(&call.lead_name, 20),
        truncate(&call.caller, 14),
        call.direction.label(),
        call.outcome.label(),
        call.duration_minutes,
        format_date(call.call_date)
    )
}

pub fn print_calls(calls: &[&Call]) {
    if calls.is_empty() {
        println!("No calls found.");
        return;
    }
    println!("{}", call_header());
    for call in calls {
        println!("{}", call_row(call));
    }
}

// ============================================================================
// Dashboard
// ============================================================================

pub fn dashboard_lines(summary: &DashboardSummary) -> Vec<String> {
    vec![
        format!("Total leads          {}", summary.total_leads),
        format!("New leads            {}", summary.new_leads),
        format!("Follow-ups today     {}", summary.follow_ups_today),
        format!("Calls today          {}", summary.calls_today),
        format!("Team conversion      {:.1}%", summary.team_conversion_rate),
    ]
}

pub fn print_dashboard(summary: &DashboardSummary) {
    for line in dashboard_lines(summary) {
        println!("{}", line);
    }
}

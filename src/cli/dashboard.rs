use anyhow::Result;

use super::display::{format_date, print_dashboard, print_follow_up_stats, print_follow_ups};
use super::session::Session;
use super::ui::warning;
use crate::metrics::FollowUpStats;
use crate::models::FollowUp;

/// Headline figures, then what needs attention today.
pub fn run_dashboard(session: &Session) -> Result<()> {
    let view = session.view();
    let crm = view.crm();
    let today = view.today();

    if let Some(message) = view.read(crm.users.last_error()) {
        warning(&format!("{} Team figures are incomplete.", message));
    }

    let summary = view.read(crm.dashboard());
    println!("{} · {} mode\n", format_date(today), crm.mode());
    print_dashboard(&summary);

    let follow_ups = view.read(crm.follow_ups.list());
    println!();
    print_follow_up_stats(&FollowUpStats::compute(&follow_ups, today));

    let attention = needs_attention(&follow_ups, today);
    if !attention.is_empty() {
        println!("\nNeeds attention");
        print_follow_ups(&attention, today);
    }
    Ok(())
}

/// Due today or overdue, earliest first.
fn needs_attention(follow_ups: &[FollowUp], today: chrono::NaiveDate) -> Vec<&FollowUp> {
    let mut due: Vec<&FollowUp> = follow_ups
        .iter()
        .filter(|f| f.is_due_today(today) || f.is_overdue(today))
        .collect();
    due.sort_by_key(|f| (f.scheduled_date, f.scheduled_time));
    due
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::NaiveDate;

    #[test]
    fn test_needs_attention_orders_by_schedule() {
        let follow_ups = seed::follow_ups();
        let today = NaiveDate::from_ymd_opt(2024, 1, 18).unwrap();
        let ids: Vec<u32> = needs_attention(&follow_ups, today)
            .iter()
            .map(|f| f.id)
            .collect();
        // 4 is overdue from the 16th, 1 is due today
        assert_eq!(ids, vec![4, 1]);
    }
}

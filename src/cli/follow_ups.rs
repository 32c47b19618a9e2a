use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};

use super::display::{print_follow_up_stats, print_follow_ups};
use super::session::{Session, View};
use super::ui::{ask, ask_parsed, ask_time, confirm, select, select_choice, select_value, status};
use super::{DeleteArgs, FollowUpAddArgs, FollowUpCommand, FollowUpListArgs, IdArgs};
use crate::filter::{self, Choice, FollowUpFilter, Search};
use crate::metrics::FollowUpStats;
use crate::models::{
    EntityId, FollowUp, FollowUpStatus, FollowUpType, NewFollowUp, Priority, ASSIGNEES,
};
use crate::store::FollowUpActions;

/// Execute a `follow-ups` subcommand
pub fn run_follow_ups(session: &Session, command: FollowUpCommand) -> Result<()> {
    let view = session.view();
    match command {
        FollowUpCommand::List(args) => list(&view, &args),
        FollowUpCommand::Add(args) => add(&view, args),
        FollowUpCommand::Complete(IdArgs { id }) => complete(&view, id),
        FollowUpCommand::Cancel(IdArgs { id }) => cancel(&view, id),
        FollowUpCommand::Delete(args) => delete(&view, args),
        FollowUpCommand::Stats => stats(&view),
    }
}

pub fn follow_up_filter(args: &FollowUpListArgs, today: NaiveDate) -> FollowUpFilter {
    FollowUpFilter {
        search: Search::new(&args.search),
        status: args.status.clone(),
        priority: args.priority.clone(),
        assignee: args.assignee.clone(),
        today,
    }
}

fn list(view: &View, args: &FollowUpListArgs) -> Result<()> {
    let today = view.today();
    let follow_ups = view.read(view.crm().follow_ups.list());
    let visible = filter::apply(&follow_ups, &follow_up_filter(args, today));
    print_follow_ups(&visible, today);
    println!();
    print_follow_up_stats(&FollowUpStats::compute(&follow_ups, today));
    Ok(())
}

fn stats(view: &View) -> Result<()> {
    let follow_ups = view.read(view.crm().follow_ups.list());
    print_follow_up_stats(&FollowUpStats::compute(&follow_ups, view.today()));
    Ok(())
}

fn add(view: &View, args: FollowUpAddArgs) -> Result<()> {
    let new = if args.is_empty() {
        match prompt_new_follow_up(view)? {
            Some(new) => new,
            None => {
                status("Cancelled.");
                return Ok(());
            }
        }
    } else {
        let lead_name = match args.lead {
            Some(id) => view
                .read(view.crm().leads.get(id))
                .map(|lead| lead.company_name)
                .ok_or_else(|| anyhow!("No lead with id {}.", id))?,
            None => String::new(),
        };
        new_follow_up_from(args, lead_name, view.today())
    };

    let follow_up = view.run(view.crm().follow_ups.add(new))?;
    status(&format!(
        "\nScheduled: {} with {} on {} (#{})",
        follow_up.kind.label(),
        follow_up.lead_name,
        follow_up.scheduled_date,
        follow_up.id
    ));
    Ok(())
}

fn complete(view: &View, id: EntityId) -> Result<()> {
    let current = find(view, id)?;
    match view.run(view.crm().follow_ups.mark_completed(id, view.today()))? {
        Some(_) => status("Completed."),
        None => status(&format!("Already {}.", current.status)),
    }
    Ok(())
}

fn cancel(view: &View, id: EntityId) -> Result<()> {
    let current = find(view, id)?;
    match view.run(view.crm().follow_ups.cancel(id))? {
        Some(_) => status("Cancelled."),
        None => status(&format!("Already {}.", current.status)),
    }
    Ok(())
}

fn delete(view: &View, args: DeleteArgs) -> Result<()> {
    let follow_up = find(view, args.id)?;
    let prompt = format!(
        "Delete {} with {}?",
        follow_up.kind.label().to_lowercase(),
        follow_up.lead_name
    );
    if !args.yes && !confirm(&prompt)? {
        status("Cancelled.");
        return Ok(());
    }
    view.run(view.crm().follow_ups.remove(args.id))?;
    status("Deleted.");
    Ok(())
}

fn find(view: &View, id: EntityId) -> Result<FollowUp> {
    view.read(view.crm().follow_ups.get(id))
        .ok_or_else(|| anyhow!("No follow-up with id {}.", id))
}

/// Flags to payload. `lead_name` comes from `--lead` when given; otherwise
/// `--lead-name` is used as is. Date defaults to today, time to 09:00.
pub fn new_follow_up_from(args: FollowUpAddArgs, lead_name: String, today: NaiveDate) -> NewFollowUp {
    NewFollowUp {
        lead_id: args.lead,
        lead_name: if lead_name.is_empty() {
            args.lead_name.unwrap_or_default()
        } else {
            lead_name
        },
        assignee: args.assignee.unwrap_or_default(),
        kind: args.kind.unwrap_or_default(),
        priority: args.priority.unwrap_or_default(),
        scheduled_date: args.date.unwrap_or(today),
        scheduled_time: args.time.unwrap_or_else(default_time),
        description: args.description.unwrap_or_default(),
        notes: args.notes.unwrap_or_default(),
    }
}

fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default()
}

fn prompt_new_follow_up(view: &View) -> Result<Option<NewFollowUp>> {
    let leads = view.read(view.crm().leads.list());
    let labels: Vec<String> = leads.iter().map(|l| l.company_name.clone()).collect();
    let Some(idx) = select("lead", &labels)? else {
        return Ok(None);
    };
    let lead = &leads[idx];

    let Some(assignee) = select_value("assignee", ASSIGNEES, |a| a.to_string())? else {
        return Ok(None);
    };
    let Some(kind) = select_value("type", FollowUpType::ALL, |t| t.label())? else {
        return Ok(None);
    };
    let Some(priority) = select_value("priority", Priority::ALL, |p| p.label())? else {
        return Ok(None);
    };
    let Some(scheduled_date) = ask_parsed("date (YYYY-MM-DD)", Some(view.today()))? else {
        return Ok(None);
    };
    let Some(scheduled_time) = ask_time("time (HH:MM)", default_time())? else {
        return Ok(None);
    };
    let Some(description) = ask("description", None)? else {
        return Ok(None);
    };
    let Some(notes) = ask("notes", None)? else {
        return Ok(None);
    };

    Ok(Some(NewFollowUp {
        lead_id: Some(lead.id),
        lead_name: lead.company_name.clone(),
        assignee: assignee.to_string(),
        kind,
        priority,
        scheduled_date,
        scheduled_time,
        description,
        notes,
    }))
}

// ============================================================================
// Interactive view
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Filter,
    Add,
    Complete,
    Cancel,
    Delete,
    Back,
}

impl Action {
    const ALL: &'static [Action] = &[
        Action::Filter,
        Action::Add,
        Action::Complete,
        Action::Cancel,
        Action::Delete,
        Action::Back,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::Filter => "Search / filter",
            Action::Add => "Schedule follow-up",
            Action::Complete => "Mark completed",
            Action::Cancel => "Cancel follow-up",
            Action::Delete => "Delete follow-up",
            Action::Back => "Back",
        }
    }
}

/// Follow-up view for the interactive menu
pub fn browse(session: &Session) -> Result<()> {
    let view = session.view();
    let mut args = FollowUpListArgs::default();

    loop {
        list(&view, &args)?;
        println!();

        let Some(action) = select_value("follow-ups", Action::ALL, |a| a.label().to_string())?
        else {
            return Ok(());
        };

        let result = match action {
            Action::Filter => prompt_filter(&mut args),
            Action::Add => add(&view, FollowUpAddArgs::default()),
            Action::Complete => pick_open(&view)?.map_or(Ok(()), |id| complete(&view, id)),
            Action::Cancel => pick_open(&view)?.map_or(Ok(()), |id| cancel(&view, id)),
            Action::Delete => pick(&view, &args)?
                .map_or(Ok(()), |id| delete(&view, DeleteArgs { id, yes: false })),
            Action::Back => return Ok(()),
        };
        if let Err(e) = result {
            eprintln!("\nError: {}", e);
        }
        println!();
    }
}

fn prompt_filter(args: &mut FollowUpListArgs) -> Result<()> {
    if let Some(search) = ask("search", Some(&args.search))? {
        args.search = search;
    }
    if let Some(choice) = select_choice("status", FollowUpStatus::ALL, |s| s.label())? {
        args.status = choice;
    }
    if let Some(choice) = select_choice("priority", Priority::ALL, |p| p.label())? {
        args.priority = choice;
    }
    if let Some(choice) = select_choice("assignee", ASSIGNEES, |a| a.to_string())? {
        args.assignee = match choice {
            Choice::All => Choice::All,
            Choice::Only(name) => Choice::Only(name.to_string()),
        };
    }
    Ok(())
}

fn label(follow_up: &FollowUp) -> String {
    format!(
        "{} · {} · {}",
        follow_up.lead_name,
        follow_up.kind.label(),
        follow_up.scheduled_date
    )
}

fn pick(view: &View, args: &FollowUpListArgs) -> Result<Option<EntityId>> {
    let follow_ups = view.read(view.crm().follow_ups.list());
    let visible = filter::apply(&follow_ups, &follow_up_filter(args, view.today()));
    let labels: Vec<String> = visible.iter().map(|f| label(f)).collect();
    Ok(select("follow-up", &labels)?.map(|idx| visible[idx].id))
}

/// Only follow-ups that can still be completed or cancelled.
fn pick_open(view: &View) -> Result<Option<EntityId>> {
    let follow_ups = view.read(view.crm().follow_ups.list());
    let open: Vec<&FollowUp> = follow_ups
        .iter()
        .filter(|f| !f.status.is_terminal())
        .collect();
    if open.is_empty() {
        status("Nothing open.");
        return Ok(None);
    }
    let labels: Vec<String> = open.iter().map(|f| label(f)).collect();
    Ok(select("follow-up", &labels)?.map(|idx| open[idx].id))
}

use anyhow::{anyhow, Result};

use super::display::{print_lead, print_lead_stats, print_leads};
use super::session::{Session, View};
use super::ui::{
    ask, ask_date, ask_parsed, confirm, non_empty, select, select_choice, select_value, status,
};
use super::{DeleteArgs, LeadAddArgs, LeadCallArgs, LeadCommand, LeadListArgs, LeadUpdateArgs};
use crate::filter::{self, Choice, LeadFilter, Search};
use crate::metrics::LeadStats;
use crate::models::{
    CallOutcome, EntityId, Lead, LeadPatch, LeadStatus, NewLead, Priority, ASSIGNEES,
};

/// Execute a `leads` subcommand
pub fn run_leads(session: &Session, command: LeadCommand) -> Result<()> {
    let view = session.view();
    match command {
        LeadCommand::List(args) => list(&view, &args),
        LeadCommand::Add(args) => add(&view, args),
        LeadCommand::Update(args) => update(&view, args),
        LeadCommand::Delete(args) => delete(&view, args),
        LeadCommand::Call(args) => call(&view, args),
    }
}

pub fn lead_filter(args: &LeadListArgs) -> LeadFilter {
    LeadFilter {
        search: Search::new(&args.search),
        status: args.status.clone(),
        priority: args.priority.clone(),
        assignee: args.assignee.clone(),
    }
}

fn list(view: &View, args: &LeadListArgs) -> Result<()> {
    let leads = view.read(view.crm().leads.list());
    let visible = filter::apply(&leads, &lead_filter(args));
    print_leads(&visible);
    println!();
    print_lead_stats(&LeadStats::compute(&leads));
    Ok(())
}

fn add(view: &View, args: LeadAddArgs) -> Result<()> {
    let new = if args.is_empty() {
        match prompt_new_lead()? {
            Some(new) => new,
            None => {
                status("Cancelled.");
                return Ok(());
            }
        }
    } else {
        new_lead_from(args)
    };

    let lead = view.run(view.crm().leads.add(new))?;
    status(&format!("\nCreated: {} (#{})", lead.company_name, lead.id));
    Ok(())
}

fn update(view: &View, args: LeadUpdateArgs) -> Result<()> {
    let current = find(view, args.id)?;
    let patch = if args.fields.is_empty() {
        match prompt_lead_patch(&current)? {
            Some(patch) => patch,
            None => {
                status("Cancelled.");
                return Ok(());
            }
        }
    } else {
        patch_from(args.fields)
    };

    if patch.is_empty() {
        status("No changes.");
        return Ok(());
    }
    match view.run(view.crm().leads.update(args.id, patch))? {
        Some(_) => status("Saved."),
        None => return Err(not_found(args.id)),
    }
    Ok(())
}

fn delete(view: &View, args: DeleteArgs) -> Result<()> {
    let lead = find(view, args.id)?;
    if !args.yes && !confirm(&format!("Delete {}?", lead.company_name))? {
        status("Cancelled.");
        return Ok(());
    }
    view.run(view.crm().leads.remove(args.id))?;
    status("Deleted.");
    Ok(())
}

fn call(view: &View, args: LeadCallArgs) -> Result<()> {
    let call = view
        .run(
            view.crm()
                .call_lead(args.id, args.outcome, args.duration, &args.notes),
        )?
        .ok_or_else(|| not_found(args.id))?;
    status(&format!(
        "Logged: {} call with {} ({} min).",
        call.outcome.label(),
        call.lead_name,
        call.duration_minutes
    ));
    Ok(())
}

fn find(view: &View, id: EntityId) -> Result<Lead> {
    view.read(view.crm().leads.get(id))
        .ok_or_else(|| not_found(id))
}

fn not_found(id: EntityId) -> anyhow::Error {
    anyhow!("No lead with id {}.", id)
}

pub fn new_lead_from(args: LeadAddArgs) -> NewLead {
    NewLead {
        company_name: args.company.unwrap_or_default(),
        contact_person: args.contact.unwrap_or_default(),
        email: args.email.unwrap_or_default(),
        phone: args.phone.unwrap_or_default(),
        status: args.status.unwrap_or_default(),
        priority: args.priority.unwrap_or_default(),
        assignee: args.assignee.unwrap_or_default(),
        next_follow_up: args.next_follow_up,
        notes: args.notes.unwrap_or_default(),
    }
}

pub fn patch_from(args: LeadAddArgs) -> LeadPatch {
    LeadPatch {
        company_name: args.company,
        contact_person: args.contact,
        email: args.email,
        phone: args.phone,
        status: args.status,
        priority: args.priority,
        assignee: args.assignee,
        last_contact: None,
        next_follow_up: args.next_follow_up,
        notes: args.notes,
    }
}

fn prompt_new_lead() -> Result<Option<NewLead>> {
    let Some(company_name) = ask("company", None)? else {
        return Ok(None);
    };
    let Some(contact_person) = ask("contact", None)? else {
        return Ok(None);
    };
    let Some(email) = ask("email", None)? else {
        return Ok(None);
    };
    let Some(phone) = ask("phone", None)? else {
        return Ok(None);
    };
    let Some(priority) = select_value("priority", Priority::ALL, |p| p.label())? else {
        return Ok(None);
    };
    let Some(assignee) = select_value("assignee", ASSIGNEES, |a| a.to_string())? else {
        return Ok(None);
    };
    let Some(next_follow_up) = ask_date("next follow-up (YYYY-MM-DD)", None)? else {
        return Ok(None);
    };
    let Some(notes) = ask("notes", None)? else {
        return Ok(None);
    };

    Ok(Some(NewLead {
        company_name,
        contact_person,
        email,
        phone,
        status: LeadStatus::New,
        priority,
        assignee: assignee.to_string(),
        next_follow_up,
        notes,
    }))
}

/// Edit form: each field shows its current value; only changed fields land in the patch.
fn prompt_lead_patch(lead: &Lead) -> Result<Option<LeadPatch>> {
    let changed = |new: String, old: &str| non_empty(new).filter(|v| v != old);

    let Some(company) = ask("company", Some(&lead.company_name))? else {
        return Ok(None);
    };
    let Some(contact) = ask("contact", Some(&lead.contact_person))? else {
        return Ok(None);
    };
    let Some(email) = ask("email", Some(&lead.email))? else {
        return Ok(None);
    };
    let Some(phone) = ask("phone", Some(&lead.phone))? else {
        return Ok(None);
    };
    let Some(status) = ask_parsed("status", Some(lead.status))? else {
        return Ok(None);
    };
    let Some(priority) = ask_parsed("priority", Some(lead.priority))? else {
        return Ok(None);
    };
    let Some(assignee) = ask("assignee", Some(&lead.assignee))? else {
        return Ok(None);
    };
    let Some(next_follow_up) = ask_date("next follow-up (YYYY-MM-DD)", lead.next_follow_up)? else {
        return Ok(None);
    };
    let Some(notes) = ask("notes", Some(&lead.notes))? else {
        return Ok(None);
    };

    Ok(Some(LeadPatch {
        company_name: changed(company, &lead.company_name),
        contact_person: changed(contact, &lead.contact_person),
        email: changed(email, &lead.email),
        phone: changed(phone, &lead.phone),
        status: Some(status).filter(|s| *s != lead.status),
        priority: Some(priority).filter(|p| *p != lead.priority),
        assignee: changed(assignee, &lead.assignee),
        last_contact: None,
        next_follow_up: next_follow_up.filter(|d| Some(*d) != lead.next_follow_up),
        notes: changed(notes, &lead.notes),
    }))
}

// ============================================================================
// Interactive view
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Filter,
    Add,
    Edit,
    Call,
    Delete,
    Back,
}

impl Action {
    const ALL: &'static [Action] = &[
        Action::Filter,
        Action::Add,
        Action::Edit,
        Action::Call,
        Action::Delete,
        Action::Back,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::Filter => "Search / filter",
            Action::Add => "Add lead",
            Action::Edit => "Edit lead",
            Action::Call => "Log call",
            Action::Delete => "Delete lead",
            Action::Back => "Back",
        }
    }
}

/// Lead management view for the interactive menu. Filter state lives as
/// long as the view.
pub fn browse(session: &Session) -> Result<()> {
    let view = session.view();
    let mut args = LeadListArgs::default();

    loop {
        list(&view, &args)?;
        println!();

        let Some(action) = select_value("leads", Action::ALL, |a| a.label().to_string())? else {
            return Ok(());
        };

        let result = match action {
            Action::Filter => prompt_filter(&mut args),
            Action::Add => add(&view, LeadAddArgs::default()),
            Action::Edit => pick(&view, &args)?.map_or(Ok(()), |id| {
                update(
                    &view,
                    LeadUpdateArgs {
                        id,
                        fields: LeadAddArgs::default(),
                    },
                )
            }),
            Action::Call => pick(&view, &args)?.map_or(Ok(()), |id| call_prompt(&view, id)),
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

fn prompt_filter(args: &mut LeadListArgs) -> Result<()> {
    if let Some(search) = ask("search", Some(&args.search))? {
        args.search = search;
    }
    if let Some(choice) = select_choice("status", LeadStatus::ALL, |s| s.label())? {
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

/// Choose one of the currently visible leads.
fn pick(view: &View, args: &LeadListArgs) -> Result<Option<EntityId>> {
    let leads = view.read(view.crm().leads.list());
    let visible = filter::apply(&leads, &lead_filter(args));
    let labels: Vec<String> = visible
        .iter()
        .map(|l| format!("{} · {}", l.company_name, l.contact_person))
        .collect();
    Ok(select("lead", &labels)?.map(|idx| visible[idx].id))
}

fn call_prompt(view: &View, id: EntityId) -> Result<()> {
    print_lead(&find(view, id)?);
    println!();
    let Some(outcome) = select_value("outcome", CallOutcome::ALL, |o| o.label())? else {
        return Ok(());
    };
    let Some(duration) = ask_parsed("minutes", Some(0u32))? else {
        return Ok(());
    };
    let Some(notes) = ask("notes", None)? else {
        return Ok(());
    };
    call(
        view,
        LeadCallArgs {
            id,
            outcome,
            duration,
            notes,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed;
    use chrono::NaiveDate;

    #[test]
    fn test_new_lead_from_flags_uses_defaults() {
        let new = new_lead_from(LeadAddArgs {
            company: Some("Orbit Labs".into()),
            contact: Some("Jane Doe".into()),
            ..Default::default()
        });
        assert_eq!(new.status, LeadStatus::New);
        assert_eq!(new.priority, Priority::Medium);
        assert_eq!(new.email, "");
        assert_eq!(new.next_follow_up, None);
    }

    #[test]
    fn test_patch_from_only_carries_given_fields() {
        let patch = patch_from(LeadAddArgs {
            status: Some(LeadStatus::Qualified),
            next_follow_up: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        });
        assert_eq!(
            patch,
            LeadPatch {
                status: Some(LeadStatus::Qualified),
                next_follow_up: NaiveDate::from_ymd_opt(2024, 2, 1),
                ..Default::default()
            }
        );
        assert!(patch_from(LeadAddArgs::default()).is_empty());
    }

    #[test]
    fn test_list_args_build_filter() {
        let args = LeadListArgs {
            search: "SMITH".into(),
            status: Choice::Only(LeadStatus::Proposal),
            ..Default::default()
        };
        let leads = seed::leads();
        let visible = filter::apply(&leads, &lead_filter(&args));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].company_name, "Acme Corp");
    }

    #[test]
    fn test_action_labels_are_unique() {
        let mut labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), Action::ALL.len());
    }
}

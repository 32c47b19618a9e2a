use anyhow::Result;

use super::display::print_calls;
use super::session::{Session, View};
use super::ui::{ask, select, select_choice};
use super::{CallCommand, CallListArgs};
use crate::filter::{self, CallFilter, Search};
use crate::models::CallOutcome;

pub fn run_calls(session: &Session, command: CallCommand) -> Result<()> {
    let view = session.view();
    match command {
        CallCommand::List(args) => list(&view, &args),
    }
}

pub fn call_filter(args: &CallListArgs) -> CallFilter {
    CallFilter {
        search: Search::new(&args.search),
        outcome: args.outcome.clone(),
    }
}

fn list(view: &View, args: &CallListArgs) -> Result<()> {
    let calls = view.read(view.crm().calls.list());
    let visible = filter::apply(&calls, &call_filter(args));
    print_calls(&visible);
    let minutes: u32 = visible.iter().map(|c| c.duration_minutes).sum();
    println!("\n{} calls, {} min", visible.len(), minutes);
    Ok(())
}

/// Call history for the interactive menu. Calls are logged from the lead view.
pub fn browse(session: &Session) -> Result<()> {
    let view = session.view();
    let mut args = CallListArgs::default();

    loop {
        list(&view, &args)?;
        println!();

        if select("calls", &["Search / filter", "Back"])? != Some(0) {
            return Ok(());
        }

        if let Some(search) = ask("search", Some(&args.search))? {
            args.search = search;
        }
        if let Some(choice) = select_choice("outcome", CallOutcome::ALL, |o| o.label())? {
            args.outcome = choice;
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Choice;
    use crate::seed;

    #[test]
    fn test_call_filter_from_args() {
        let args = CallListArgs {
            search: "priya".into(),
            outcome: Choice::All,
        };
        let calls = seed::calls();
        let visible = filter::apply(&calls, &call_filter(&args));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].lead_name, "Tech Solutions");
    }

    #[test]
    fn test_outcome_filter() {
        let args = CallListArgs {
            outcome: Choice::Only(CallOutcome::Connected),
            ..Default::default()
        };
        let calls = seed::calls();
        let ids: Vec<u32> = filter::apply(&calls, &call_filter(&args))
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }
}

//! Main menu for leadmgr
//!
//! Uses inquire for clean, reliable terminal interaction.

use anyhow::{anyhow, Result};
use inquire::Select;
use std::io::{self, IsTerminal};

use super::session::Session;
use super::ui::{clear_screen, minimal_render_config, wait_for_continue};
use super::{calls, follow_ups, leads, run_dashboard, settings, users};
use crate::config::AppConfig;
use crate::db::Database;

/// Menu options with type-safe variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuOption {
    Dashboard,
    Leads,
    FollowUps,
    Calls,
    Users,
    Settings,
    Quit,
}

impl MenuOption {
    const ALL: &'static [MenuOption] = &[
        MenuOption::Dashboard,
        MenuOption::Leads,
        MenuOption::FollowUps,
        MenuOption::Calls,
        MenuOption::Users,
        MenuOption::Settings,
        MenuOption::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuOption::Dashboard => "Dashboard",
            MenuOption::Leads => "Leads",
            MenuOption::FollowUps => "Follow-ups",
            MenuOption::Calls => "Calls",
            MenuOption::Users => "Team",
            MenuOption::Settings => "Settings",
            MenuOption::Quit => "Quit",
        }
    }

    fn from_label(s: &str) -> Option<MenuOption> {
        MenuOption::ALL.iter().find(|opt| opt.label() == s).copied()
    }
}

/// Run the interactive main menu until Quit, Escape or Ctrl+C.
pub fn run_menu(session: &Session, db: &Database, config: &AppConfig) -> Result<()> {
    if !io::stdin().is_terminal() {
        return Err(anyhow!(
            "Interactive menu requires a terminal. Use subcommands for non-interactive use:\n  \
            leadmgr dashboard\n  \
            leadmgr leads list\n  \
            leadmgr follow-ups list --status overdue\n  \
            Run 'leadmgr --help' for all options."
        ));
    }

    let menu_labels: Vec<&str> = MenuOption::ALL.iter().map(|opt| opt.label()).collect();

    while !session.is_cancelled() {
        // Clear screen - if this fails, continue anyway
        let _ = clear_screen();

        let selection = Select::new("leadmgr", menu_labels.clone())
            .with_render_config(minimal_render_config())
            .with_page_size(menu_labels.len())
            .with_vim_mode(true)
            .prompt_skippable();

        // Prompt errors (Ctrl+C, terminal issues) end the session
        let Ok(Some(choice_label)) = selection else {
            return Ok(());
        };
        let Some(choice) = MenuOption::from_label(choice_label) else {
            continue;
        };
        if choice == MenuOption::Quit {
            return Ok(());
        }

        let _ = clear_screen();

        if let Err(e) = execute(session, db, config, choice) {
            eprintln!("\nError: {}", e);
            wait_for_continue();
        }
    }
    Ok(())
}

fn execute(session: &Session, db: &Database, config: &AppConfig, choice: MenuOption) -> Result<()> {
    match choice {
        MenuOption::Dashboard => {
            run_dashboard(session)?;
            wait_for_continue();
            Ok(())
        }
        MenuOption::Leads => leads::browse(session),
        MenuOption::FollowUps => follow_ups::browse(session),
        MenuOption::Calls => calls::browse(session),
        MenuOption::Users => users::browse(session),
        MenuOption::Settings => settings::browse(db, config),
        MenuOption::Quit => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for option in MenuOption::ALL {
            assert_eq!(MenuOption::from_label(option.label()), Some(*option));
        }
        assert_eq!(MenuOption::from_label("Browse"), None);
    }
}

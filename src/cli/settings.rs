//! `config` subcommand and the settings screen.
//!
//! Stored values take effect on the next start; flags and environment
//! variables still win over them.

use anyhow::Result;

use super::ui::{ask, select, status};
use super::ConfigCommand;
use crate::config::{AppConfig, SETTING_KEYS};
use crate::db::Database;
use crate::error::ConfigError;

/// Execute a `config` subcommand. `effective` is what this run resolved to.
pub fn run_config(db: &Database, command: ConfigCommand, effective: &AppConfig) -> Result<()> {
    match command {
        ConfigCommand::Show => show(db, effective),
        ConfigCommand::Set { key, value } => {
            AppConfig::set(db, &key, &value)?;
            status("Saved.");
            Ok(())
        }
        ConfigCommand::Unset { key } => {
            if AppConfig::unset(db, &key)? {
                status("Removed.");
            } else {
                status(&format!("{} was not set.", key));
            }
            Ok(())
        }
    }
}

fn show(db: &Database, effective: &AppConfig) -> Result<()> {
    for line in effective_lines(effective) {
        println!("{}", line);
    }

    let stored = db.list_settings()?;
    println!();
    if stored.is_empty() {
        println!("No stored settings.");
    } else {
        println!("Stored");
        for (key, value) in stored {
            println!("  {:<12} {}", key, value);
        }
    }
    Ok(())
}

pub fn effective_lines(config: &AppConfig) -> Vec<String> {
    vec![
        format!("mode         {}", config.mode),
        format!("api_url      {}", config.api_url),
        format!("api_prefix   {}", config.api_prefix),
        format!("api base     {}", config.api_base()),
    ]
}

/// Settings screen for the interactive menu: pick a key, enter a value.
/// A blank value removes the stored setting.
pub fn browse(db: &Database, effective: &AppConfig) -> Result<()> {
    loop {
        show(db, effective)?;
        println!();

        let mut options: Vec<&str> = SETTING_KEYS.to_vec();
        options.push("Back");
        let Some(idx) = select("settings", &options)? else {
            return Ok(());
        };
        let Some(key) = SETTING_KEYS.get(idx) else {
            return Ok(());
        };

        // no default in the prompt, so a blank answer really is blank
        let label = match db.get_setting(key)? {
            Some(current) => format!("{} [{}, blank removes]", key, current),
            None => key.to_string(),
        };
        let Some(value) = ask(&label, None)? else {
            continue;
        };
        match store_input(db, key, &value) {
            Ok(true) => status("Saved. Restart to apply."),
            Ok(false) => status("Nothing stored."),
            Err(e) => eprintln!("\nError: {}", e),
        }
        println!();
    }
}

/// Store `input` under `key`, or remove the key when `input` is blank.
/// Returns false when a blank input had nothing to remove.
fn store_input(db: &Database, key: &str, input: &str) -> Result<bool, ConfigError> {
    if input.trim().is_empty() {
        return AppConfig::unset(db, key);
    }
    AppConfig::set(db, key, input)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StoreMode, SETTING_MODE};

    #[test]
    fn test_set_and_unset_through_command() {
        let db = Database::open_memory().unwrap();
        let effective = AppConfig::default();

        run_config(
            &db,
            ConfigCommand::Set {
                key: "mode".into(),
                value: "LIVE".into(),
            },
            &effective,
        )
        .unwrap();
        assert_eq!(db.get_setting(SETTING_MODE).unwrap().as_deref(), Some("live"));

        run_config(&db, ConfigCommand::Unset { key: "mode".into() }, &effective).unwrap();
        assert_eq!(db.get_setting(SETTING_MODE).unwrap(), None);
    }

    #[test]
    fn test_set_rejects_unknown_key() {
        let db = Database::open_memory().unwrap();
        let result = run_config(
            &db,
            ConfigCommand::Set {
                key: "theme".into(),
                value: "dark".into(),
            },
            &AppConfig::default(),
        );
        assert!(result.is_err());
        assert!(db.list_settings().unwrap().is_empty());
    }

    #[test]
    fn test_blank_input_removes_stored_setting() {
        let db = Database::open_memory().unwrap();
        assert!(store_input(&db, "mode", "live").unwrap());
        assert_eq!(db.get_setting(SETTING_MODE).unwrap().as_deref(), Some("live"));

        assert!(store_input(&db, "mode", "  ").unwrap());
        assert_eq!(db.get_setting(SETTING_MODE).unwrap(), None);
        assert!(!store_input(&db, "mode", "").unwrap());
    }

    #[test]
    fn test_effective_lines() {
        let config = AppConfig {
            mode: StoreMode::Live,
            api_url: "https://crm.example.com".into(),
            api_prefix: String::new(),
        };
        let lines = effective_lines(&config);
        assert_eq!(lines[0], "mode         live");
        assert_eq!(lines[3], "api base     https://crm.example.com");
    }
}

//! Shared UI primitives for leadmgr
//!
//! Design principles:
//! - Minimal: Show only what's needed
//! - Clean: No decorative borders or lines
//! - Consistent: Same patterns everywhere
//!
//! Conventions:
//! - Prompts: lowercase with colon and space: `search: `
//! - Feedback: single word when possible: `Saved.`

use anyhow::Result;
use chrono::{NaiveDate, NaiveTime};
use crossterm::{
    cursor,
    terminal::{Clear, ClearType},
    ExecutableCommand,
};
use inquire::{ui::RenderConfig, Confirm, InquireError, Select, Text};
use std::fmt::Display;
use std::io::{self, Write};
use std::str::FromStr;

use crate::filter::Choice;

// ============================================================================
// Layout Primitives
// ============================================================================

/// Truncate a string to max_chars, adding ellipsis if needed.
/// Result will be at most max_chars characters (including ellipsis if truncated).
pub fn truncate(s: &str, max_chars: usize) -> String {
    if max_chars == 0 {
        return String::new();
    }

    let truncate_at = max_chars.saturating_sub(1); // Leave room for ellipsis
    let mut truncate_idx = 0;

    for (count, (idx, _)) in s.char_indices().enumerate() {
        if count == truncate_at {
            truncate_idx = idx;
        }
        if count + 1 > max_chars {
            return format!("{}…", &s[..truncate_idx]);
        }
    }

    s.to_string()
}

/// Get terminal dimensions, defaulting to 80x24 if unavailable
pub fn term_size() -> (usize, usize) {
    crossterm::terminal::size()
        .map(|(w, h)| (w as usize, h as usize))
        .unwrap_or((80, 24))
}

/// Get number of visible content lines for scrollable lists.
pub fn visible_lines() -> usize {
    let (_, height) = term_size();
    height.saturating_sub(4).max(5)
}

// ============================================================================
// Message Functions
// ============================================================================

/// Print a status message to stdout
#[inline]
pub fn status(msg: &str) {
    println!("{}", msg);
}

/// Print a warning message to stderr
#[inline]
pub fn warning(msg: &str) {
    eprintln!("Warning: {}", msg);
}

/// Clear the terminal screen and move cursor to top-left
pub fn clear_screen() -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(Clear(ClearType::All))?;
    stdout.execute(cursor::MoveTo(0, 0))?;
    stdout.flush()?;
    Ok(())
}

/// Wait for user to press enter to continue
pub fn wait_for_continue() {
    println!();
    let _ = Text::new("[enter]")
        .with_render_config(minimal_render_config())
        .prompt_skippable();
}

// ============================================================================
// Prompts
// ============================================================================

/// Get a minimal render config for inquire prompts
pub fn minimal_render_config() -> RenderConfig<'static> {
    RenderConfig::default_colored()
        .with_prompt_prefix(inquire::ui::Styled::new(""))
        .with_answered_prompt_prefix(inquire::ui::Styled::new(""))
}

/// Display a selection menu and return the chosen index
pub fn select<T: ToString>(prompt: &str, options: &[T]) -> Result<Option<usize>> {
    if options.is_empty() {
        return Ok(None);
    }

    let items: Vec<String> = options.iter().map(|o| o.to_string()).collect();

    let result = Select::new(prompt, items.clone())
        .with_render_config(minimal_render_config())
        .with_page_size(visible_lines())
        .with_vim_mode(true)
        .prompt_skippable()?;

    Ok(result.and_then(|selected| items.iter().position(|o| *o == selected)))
}

/// Pick one value from a closed set, showing each as `label`.
pub fn select_value<T: Copy>(
    prompt: &str,
    values: &[T],
    label: impl Fn(&T) -> String,
) -> Result<Option<T>> {
    let labels: Vec<String> = values.iter().map(&label).collect();
    Ok(select(prompt, &labels)?.map(|idx| values[idx]))
}

/// Prompt for yes/no confirmation (default: no)
pub fn confirm(prompt: &str) -> Result<bool> {
    let result = Confirm::new(prompt)
        .with_render_config(minimal_render_config())
        .with_default(false)
        .prompt()?;
    Ok(result)
}

// ============================================================================
// Form Input Helpers
// ============================================================================

/// Result type for form inputs that can be cancelled
pub enum FormResult<T> {
    Value(T),
    Cancelled,
}

/// Prompt for a field with optional current value
/// Format: `field [current]: ` or `field: ` if no current value
/// Empty input returns the current value (or empty string if no current)
pub fn prompt_field(field: &str, current: Option<&str>) -> Result<FormResult<String>> {
    let prompt = match current {
        Some(val) if !val.is_empty() => format!("{} [{}]: ", field, truncate(val, 30)),
        _ => format!("{}: ", field),
    };

    let result = Text::new(&prompt)
        .with_render_config(minimal_render_config())
        .prompt();

    match result {
        Ok(input) => {
            let input = input.trim();
            if input.is_empty() {
                Ok(FormResult::Value(current.unwrap_or("").to_string()))
            } else {
                Ok(FormResult::Value(input.to_string()))
            }
        }
        Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
            Ok(FormResult::Cancelled)
        }
        Err(e) => Err(e.into()),
    }
}

/// `prompt_field` with cancellation folded into `None`.
pub fn ask(field: &str, current: Option<&str>) -> Result<Option<String>> {
    Ok(match prompt_field(field, current)? {
        FormResult::Value(v) => Some(v),
        FormResult::Cancelled => None,
    })
}

/// Prompt until the input parses, keeping `current` on empty input.
/// `None` when cancelled.
pub fn ask_parsed<T>(field: &str, current: Option<T>) -> Result<Option<T>>
where
    T: FromStr + Display + Clone,
    T::Err: Display,
{
    let shown = current.as_ref().map(|c| c.to_string());
    loop {
        let Some(input) = ask(field, shown.as_deref())? else {
            return Ok(None);
        };
        if input.is_empty() {
            if let Some(c) = current.clone() {
                return Ok(Some(c));
            }
            warning(&format!("{} is required", field));
            continue;
        }
        match input.parse::<T>() {
            Ok(v) => return Ok(Some(v)),
            Err(e) => warning(&e.to_string()),
        }
    }
}

/// Optional date field; blank keeps `current`. Outer `None` when cancelled.
pub fn ask_date(field: &str, current: Option<NaiveDate>) -> Result<Option<Option<NaiveDate>>> {
    let shown = current.map(|d| d.to_string());
    loop {
        let Some(input) = ask(field, shown.as_deref())? else {
            return Ok(None);
        };
        if input.is_empty() || Some(&input) == shown.as_ref() {
            return Ok(Some(current));
        }
        match parse_date(&input) {
            Ok(d) => return Ok(Some(Some(d))),
            Err(e) => warning(&e),
        }
    }
}

/// Time field that re-prompts until the input parses; blank keeps `current`.
/// `None` when cancelled.
pub fn ask_time(field: &str, current: NaiveTime) -> Result<Option<NaiveTime>> {
    let shown = current.format("%H:%M").to_string();
    loop {
        let Some(input) = ask(field, Some(&shown))? else {
            return Ok(None);
        };
        match time_or(&input, current) {
            Ok(t) => return Ok(Some(t)),
            Err(e) => warning(&e),
        }
    }
}

/// `current` for blank input, otherwise the parsed `HH:MM`.
pub fn time_or(input: &str, current: NaiveTime) -> Result<NaiveTime, String> {
    if input.trim().is_empty() {
        Ok(current)
    } else {
        parse_time(input)
    }
}

/// Pick a categorical filter value, with "All" offered first.
pub fn select_choice<T: Copy>(
    prompt: &str,
    values: &[T],
    label: impl Fn(&T) -> String,
) -> Result<Option<Choice<T>>> {
    let mut labels = vec!["All".to_string()];
    labels.extend(values.iter().map(&label));
    Ok(select(prompt, &labels)?.map(|idx| match idx {
        0 => Choice::All,
        n => Choice::Only(values[n - 1]),
    }))
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s.trim()))
}

/// Parse an `HH:MM` time.
pub fn parse_time(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map_err(|_| format!("invalid time '{}' (expected HH:MM)", s.trim()))
}

/// `None` for blank input, otherwise the trimmed value.
pub fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Acme Corp", 20), "Acme Corp");
        assert_eq!(truncate("Nimbus Cloud Services", 10), "Nimbus Cl…");
        assert_eq!(truncate("Nimbus Cloud Services", 10).chars().count(), 10);
        assert_eq!(truncate("abc", 3), "abc");
        assert_eq!(truncate("abcd", 3), "ab…");
        assert_eq!(truncate("anything", 0), "");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("Müller GmbH & Co", 7), "Müller…");
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(
            parse_date(" 2024-01-18 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 18).unwrap()
        );
        assert!(parse_date("18/01/2024").is_err());
        assert_eq!(
            parse_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert!(parse_time("9.30am").is_err());
    }

    #[test]
    fn test_time_or_keeps_current_and_rejects_typos() {
        let nine = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        assert_eq!(time_or("", nine), Ok(nine));
        assert_eq!(time_or("14:15", nine), Ok(NaiveTime::from_hms_opt(14, 15, 0).unwrap()));
        assert_eq!(
            time_or("2pm", nine),
            Err("invalid time '2pm' (expected HH:MM)".to_string())
        );
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  ".into()), None);
        assert_eq!(non_empty(" Acme ".into()), Some("Acme".into()));
    }
}

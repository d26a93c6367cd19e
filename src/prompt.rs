// Interactive confirmations

use crate::ui;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};

/// Answer to "remove this entry?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalChoice {
    Remove,
    /// Remove, and stop asking from now on.
    RemoveAndStopAsking,
    Cancel,
}

impl RemovalChoice {
    /// `(confirmed, suppress_future_prompts)`
    pub fn outcome(self) -> (bool, bool) {
        match self {
            RemovalChoice::Remove => (true, false),
            RemovalChoice::RemoveAndStopAsking => (true, true),
            RemovalChoice::Cancel => (false, false),
        }
    }

    fn from_index(index: Option<usize>) -> Self {
        match index {
            Some(0) => RemovalChoice::Remove,
            Some(1) => RemovalChoice::RemoveAndStopAsking,
            _ => RemovalChoice::Cancel,
        }
    }
}

/// Ask whether to remove `label`. Without a terminal there is nobody to
/// ask, so the answer is cancel.
pub fn confirm_removal(label: &str) -> RemovalChoice {
    if !ui::is_tty() {
        return RemovalChoice::Cancel;
    }

    let items = ["Remove", "Remove and don't ask again", "Cancel"];
    let picked = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Remove {} from the list?", label))
        .items(&items)
        .default(0)
        .interact_opt()
        .unwrap_or(None);
    RemovalChoice::from_index(picked)
}

/// Pick one of `items`. `None` when cancelled or without a terminal.
pub fn select(prompt: &str, items: &[String], default: usize) -> Option<usize> {
    if !ui::is_tty() || items.is_empty() {
        return None;
    }

    Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .items(items)
        .default(default.min(items.len() - 1))
        .interact_opt()
        .unwrap_or(None)
}

/// Yes/no question, `default` when there is no terminal.
pub fn confirm(prompt: &str, default: bool) -> bool {
    if !ui::is_tty() {
        return default;
    }

    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact_opt()
        .unwrap_or(None)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcomes() {
        assert_eq!(RemovalChoice::Remove.outcome(), (true, false));
        assert_eq!(RemovalChoice::RemoveAndStopAsking.outcome(), (true, true));
        assert_eq!(RemovalChoice::Cancel.outcome(), (false, false));
    }

    #[test]
    fn test_escape_means_cancel() {
        assert_eq!(RemovalChoice::from_index(None), RemovalChoice::Cancel);
        assert_eq!(RemovalChoice::from_index(Some(1)), RemovalChoice::RemoveAndStopAsking);
        assert_eq!(RemovalChoice::from_index(Some(7)), RemovalChoice::Cancel);
    }
}

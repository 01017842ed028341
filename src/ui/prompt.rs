use dialoguer::Confirm;

use crate::core::error::{PurgeError, Result};


pub trait Confirmation {
    fn confirm(&self, message: &str) -> Result<bool>;
}


pub struct TerminalConfirmation;

impl Confirmation for TerminalConfirmation {
    fn confirm(&self, message: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(|e| PurgeError::Prompt(e.to_string()))
    }
}


/// Used for `--yes`.
pub struct AssumeYes;

impl Confirmation for AssumeYes {
    fn confirm(&self, _message: &str) -> Result<bool> {
        Ok(true)
    }
}

pub fn confirmation_message(scope: &str, dry_run: bool) -> String {
    if dry_run {
        format!("Dry run: list {} that would be deleted?", scope)
    } else {
        format!("This will permanently delete {}. Continue?", scope)
    }
}

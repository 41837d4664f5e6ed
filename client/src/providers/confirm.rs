//! Confirmation gate for destructive operations.

use std::io::{BufRead, Write};

/// Blocking confirmation dialog. The request an operation guards is only
/// issued after this returns `true`.
pub trait ConfirmPrompt: Send + Sync {
    /// Ask the user to confirm; `false` aborts the operation.
    fn confirm(&self, message: &str) -> bool;
}

/// Terminal y/N prompt, defaulting to no.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl ConfirmPrompt for TerminalConfirm {
    fn confirm(&self, message: &str) -> bool {
        eprint!("{message} [y/N] ");
        let _ = std::io::stderr().flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

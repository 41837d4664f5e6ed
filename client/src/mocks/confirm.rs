//! Mock confirmation prompt.

use crate::providers::ConfirmPrompt;
use std::sync::{Arc, Mutex, PoisonError};

/// Confirmation prompt with a fixed answer, recording every prompt shown.
#[derive(Debug, Clone)]
pub struct StaticConfirm {
    answer: bool,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl StaticConfirm {
    /// A prompt that always confirms.
    #[must_use]
    pub fn accepting() -> Self {
        Self {
            answer: true,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A prompt that always declines.
    #[must_use]
    pub fn declining() -> Self {
        Self {
            answer: false,
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Prompts shown so far, in order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ConfirmPrompt for StaticConfirm {
    fn confirm(&self, message: &str) -> bool {
        self.prompts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
        self.answer
    }
}

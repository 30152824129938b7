use std::sync::Arc;

use mockall::automock;
use tracing::debug;

use crate::dom::{Element, EventKind};

/// Asks the user a yes/no question.
#[automock]
pub trait ConfirmPrompt: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

/// A prompt that always gives the same answer, for hosts that cannot ask.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl ConfirmPrompt for FixedAnswer {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

/// Guards clicks on elements carrying a `data-confirm` prompt.
///
/// Declining cancels the click's default action and stops the remaining
/// listeners; accepting leaves the click untouched.
#[derive(Clone)]
pub struct ConfirmGuard {
    prompt: Arc<dyn ConfirmPrompt>,
}

impl ConfirmGuard {
    pub fn new(prompt: Arc<dyn ConfirmPrompt>) -> Self {
        Self { prompt }
    }

    /// Returns `false` when `element` has no `data-confirm` attribute.
    pub fn bind(&self, element: &Element) -> bool {
        let Some(message) = element.data("confirm") else {
            return false;
        };

        let prompt = Arc::clone(&self.prompt);
        element.add_event_listener(EventKind::Click, move |_, event| {
            if !prompt.confirm(&message) {
                debug!(message = %message, "Confirmation declined");
                event.prevent_default();
                event.stop_propagation();
            }
        });
        true
    }
}

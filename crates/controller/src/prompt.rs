//! The capability a host UI lends the controller for blocking questions.

use std::sync::Mutex;

/// Blocking confirmation and alert dialogs supplied by the host.
pub trait HostPrompt: Send + Sync {
    /// Asks a yes/no question; `true` means go ahead.
    fn confirm(&self, message: &str) -> bool;

    /// Shows a message that needs no answer.
    fn alert(&self, message: &str);
}

/// A prompt with a fixed answer that records everything it was shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answer: bool,
    confirmations: Mutex<Vec<String>>,
    alerts: Mutex<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn accepting() -> Self {
        ScriptedPrompt {
            answer: true,
            ..Default::default()
        }
    }

    pub fn declining() -> Self {
        ScriptedPrompt::default()
    }

    pub fn confirmations(&self) -> Vec<String> {
        lock(&self.confirmations).clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        lock(&self.alerts).clone()
    }
}

impl HostPrompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> bool {
        lock(&self.confirmations).push(message.to_string());
        self.answer
    }

    fn alert(&self, message: &str) {
        lock(&self.alerts).push(message.to_string());
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

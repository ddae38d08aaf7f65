//! User confirmation for destructive operations.

/// Asks the user to confirm an action before it is dispatched.
pub trait ConfirmationPrompt: Send + Sync {
    /// Returns `true` if the user agreed.
    fn confirm(&self, message: &str) -> bool;
}

/// Answers every prompt the same way (`--yes` flags, tests).
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl ConfirmationPrompt for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        self.0
    }
}

impl<F> ConfirmationPrompt for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

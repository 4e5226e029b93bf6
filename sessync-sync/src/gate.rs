//! Confirmation gate for operations that overwrite the other side.
//!
//! [`confirmation_for`] is a pure decision; how a human is asked is behind the
//! [`Confirm`] trait (interactive prompt in the CLI, fixed answers in tests).

use sessync_core::{Operation, Project, SyncMode};

/// What must happen before an operation may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Go ahead.
    NotRequired,
    /// Ask; a "no" cancels the operation.
    Required,
    /// Ask even when the caller passed `--yes`; a "no" is a refusal.
    Mandatory,
    /// The operation is never permitted for this mode.
    Forbidden,
}

/// Decide whether `operation` on a project with `mode` needs confirmation.
pub fn confirmation_for(operation: Operation, mode: SyncMode, assume_yes: bool) -> Confirmation {
    match (operation, mode) {
        (Operation::Pull, SyncMode::PushOnly) => Confirmation::Forbidden,
        (Operation::Pull, _) => Confirmation::NotRequired,
        (Operation::Push, SyncMode::PullOnly) => Confirmation::Mandatory,
        (Operation::Push, _) if assume_yes => Confirmation::NotRequired,
        (Operation::Push, _) => Confirmation::Required,
    }
}

/// A prompt shown before an overwriting operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub message: String,
    /// The project is read-only in this direction; the prompt should say so loudly.
    pub against_mode: bool,
}

impl Prompt {
    pub fn for_operation(project: &Project, operation: Operation, confirmation: Confirmation) -> Self {
        let against_mode = confirmation == Confirmation::Mandatory;
        let message = if against_mode {
            format!(
                "Project '{}' is configured as read-only ({}). {} anyway?",
                project.name, project.mode, capitalize(operation)
            )
        } else {
            format!(
                "{} '{}' and overwrite the remote copy?",
                capitalize(operation),
                project.name
            )
        };
        Self {
            message,
            against_mode,
        }
    }
}

fn capitalize(operation: Operation) -> &'static str {
    match operation {
        Operation::Pull => "Pull",
        Operation::Push => "Push",
    }
}

/// Obtains a yes/no answer from a human (or a stand-in).
pub trait Confirm {
    fn confirm(&self, prompt: &Prompt) -> bool;
}

/// Always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _prompt: &Prompt) -> bool {
        self.0
    }
}

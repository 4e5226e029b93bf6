//! Batch sync over every eligible project.
//!
//! Each attempt is independent: a failure is recorded and the batch moves on.
//! The aggregate only fails once every eligible project has been attempted.

use sessync_core::{Config, Operation, Project, ProjectName};

use crate::error::{BatchFailure, SyncError};
use crate::orchestrator::{Orchestrator, SyncOutcome};

/// One attempted operation within a batch.
#[derive(Debug)]
pub struct Attempt {
    pub project: ProjectName,
    pub operation: Operation,
    pub result: Result<SyncOutcome, SyncError>,
}

/// Every attempt of a batch, in execution order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub attempts: Vec<Attempt>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.attempts.iter().filter(|a| a.result.is_err()).count()
    }

    /// `Err(BatchFailed)` listing every failure when at least one attempt failed.
    pub fn into_result(self) -> Result<Vec<SyncOutcome>, SyncError> {
        let attempted = self.attempts.len();
        let mut outcomes = Vec::with_capacity(attempted);
        let mut failures = Vec::new();
        for attempt in self.attempts {
            match attempt.result {
                Ok(outcome) => outcomes.push(outcome),
                Err(error) => failures.push(BatchFailure {
                    project: attempt.project,
                    operation: attempt.operation,
                    error,
                }),
            }
        }
        if failures.is_empty() {
            Ok(outcomes)
        } else {
            Err(SyncError::BatchFailed {
                attempted,
                failures,
            })
        }
    }
}

/// Operations `sync-all` performs, in order.
///
/// Enabled projects only; pull for `pull`/`both`, then push for `push`/`both`
/// when `include_push` is set. Pull-only projects are never pushed in batch.
pub fn eligible(config: &Config, include_push: bool) -> Vec<(&Project, Operation)> {
    let mut plan = Vec::new();
    for project in config.projects.iter().filter(|p| p.enabled) {
        if project.mode.allows(Operation::Pull) {
            plan.push((project, Operation::Pull));
        }
        if include_push && project.mode.allows(Operation::Push) {
            plan.push((project, Operation::Push));
        }
    }
    plan
}

/// Attempt every eligible operation sequentially.
pub fn sync_all(orchestrator: &Orchestrator<'_>, include_push: bool) -> BatchReport {
    let mut report = BatchReport::default();
    for (project, operation) in eligible(orchestrator.config(), include_push) {
        let result = orchestrator.run_project(project, operation);
        if let Err(err) = &result {
            tracing::error!(project = %project.name, %operation, error = %err, "sync failed");
        }
        report.attempts.push(Attempt {
            project: project.name.clone(),
            operation,
            result,
        });
    }
    report
}

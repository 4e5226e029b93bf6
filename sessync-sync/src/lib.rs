//! # sessync-sync
//!
//! Staged, path-rewriting sync of session logs between a remote host and the
//! local machine.
//!
//! Call [`Orchestrator::run`] to pull or push one project, or
//! [`pipeline::sync_all`] to attempt every eligible project.

pub mod error;
pub mod gate;
pub mod orchestrator;
pub mod pipeline;
pub mod transport;
pub mod walker;

pub use error::{BatchFailure, SyncError};
pub use gate::{confirmation_for, Confirm, Confirmation, FixedAnswer, Prompt};
pub use orchestrator::{Orchestrator, SyncOptions, SyncOutcome, SyncReport};
pub use pipeline::{sync_all, BatchReport};
pub use transport::{Endpoint, RemoteShell, RsyncTransfer, SshShell, Transfer, TransferRequest};
pub use walker::{rewrite_tree, TransformResult};

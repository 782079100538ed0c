//! Link management module
//!
//! Link and unlink attach or detach existing records to an association of
//! a root record. Field names are resolved through the root's
//! `AssociationIndex`, so the handlers work for any mapped entity.

pub mod handlers;
pub mod outcome;

pub use handlers::{LinkTargets, RootLookup, group_targets, process};
pub use outcome::{LinkFailure, LinkFault, LinkOperation, LinkOutcome, LinkReport, OutcomeStatus};

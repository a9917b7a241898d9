//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::signup::SignupStep;

/// Domain errors represent business logic violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("organization has no records")]
    EmptyOrganization,

    #[error("organization has more than one root: {0}, {1}")]
    MultipleRoots(String, String),

    #[error("node {node_id} references unknown parent {parent_id}")]
    UnknownParent { node_id: String, parent_id: String },

    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("cycle detected in hierarchy at node: {0}")]
    CycleDetected(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("no free binary slot below sponsor: {0}")]
    NoBinarySlot(String),

    #[error("signup step {0} is not complete")]
    StepNotReady(SignupStep),

    #[error("token bundle '{category}' not found at {}", path.display())]
    TokenBundleNotFound { category: String, path: PathBuf },

    #[error("token bundle '{category}' is invalid: {message}")]
    TokenBundleInvalid { category: String, message: String },

    #[error("unable to resolve '{path}' (failed at '{segment}')")]
    TokenPath { path: String, segment: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

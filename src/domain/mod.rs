//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod organization;
pub mod signup;
pub mod status;
pub mod tokens;

pub use arena::{BinaryPosition, MemberData, OrgArena, Placement, TreeNode, TreeType};
pub use builder::{OrgTreeBuilder, OrganizationRecord};
pub use error::{DomainError, DomainResult};
pub use organization::{flatten, LevelNode, Levels, OrganizationNode};
pub use signup::{SignupStep, SignupStepper, StepOutcome, Term, TurnstileState};
pub use status::{OrganizationStatus, StatusStyle, StatusTone, DEFAULT_VAR_PREFIX};
pub use tokens::TokenBundle;

/// Expand `~`, `$VAR` and `${VAR}` in a path-like string.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem) but are themselves
//! concrete structs, not traits.

mod organization;
mod tokens;

pub use organization::{LevelSummary, OrganizationService};
pub use tokens::{TokenExports, TokenService};

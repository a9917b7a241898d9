//! Organization hierarchy tooling.
//!
//! The core is [`domain::flatten`], which turns a nested organization tree
//! into depth-indexed rows in breadth-first order. Around it sit the record
//! builder and member placement ([`domain::OrgArena`]), the signup flow, and
//! design token export.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{flatten, DomainError, LevelNode, Levels, OrganizationNode, OrganizationStatus};

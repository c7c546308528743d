//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the business logic for a specific CLI subcommand.

mod count;
mod diff;
mod filters;

pub use count::run_count;
pub use diff::{determine_exit_code, run_diff, version_labels};
pub use filters::{render_filters, run_filters};

// Re-export config types used by handlers
pub use crate::config::CompareConfig;

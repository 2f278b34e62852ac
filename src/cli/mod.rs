//! # CLI Module
//!
//! The `postforge` command line: `generate` renders one content type's model
//! to disk or stdout, `serve` runs the admin service.

mod cli;

pub use cli::{run_cli, Cli, Commands};

//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler builds a serializable report, prints it in the configured
//! format and returns the process exit code.

mod deps;
mod firmware;
mod git;
mod satisfies;

pub use deps::{check_dependencies, run_deps, DependencyReport, DependencyStatus};
pub use firmware::{inspect_firmware, run_firmware, FirmwareReport};
pub use git::GitDescribe;
pub use satisfies::{evaluate_requirements, run_satisfies, SatisfiesReport, SpecifierOutcome};

use crate::config::OutputFormat;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Process exit codes shared by all subcommands.
pub mod exit_codes {
    /// Every check passed
    pub const SUCCESS: i32 = 0;
    /// A requirement or minimum was not met
    pub const NOT_SATISFIED: i32 = 1;
    /// An error occurred
    pub const ERROR: i32 = 3;
}

/// Print `report` as JSON, or `text` otherwise.
fn emit<T: Serialize>(format: OutputFormat, report: &T, text: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, report)?;
            writeln!(stdout)?;
        }
        OutputFormat::Text => write!(stdout, "{text}")?,
    }
    Ok(())
}

const fn exit_code(ok: bool) -> i32 {
    if ok {
        exit_codes::SUCCESS
    } else {
        exit_codes::NOT_SATISFIED
    }
}

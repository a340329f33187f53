//! `git describe` as a firmware version source.

use crate::firmware::VersionSource;
use std::path::Path;
use std::process::Command;

/// Runs `git describe --tags --always --long --dirty` in the checkout.
#[derive(Debug, Clone)]
pub struct GitDescribe {
    program: String,
}

impl GitDescribe {
    #[must_use]
    pub fn new() -> Self {
        Self {
            program: "git".to_string(),
        }
    }

    /// Use a different git executable.
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for GitDescribe {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionSource for GitDescribe {
    fn describe(&self, path: &Path) -> Option<String> {
        let output = Command::new(&self.program)
            .args(["describe", "--tags", "--always", "--long", "--dirty"])
            .current_dir(path)
            .output();

        match output {
            Ok(output) if output.status.success() => {
                let describe = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
                (!describe.is_empty()).then_some(describe)
            }
            Ok(output) => {
                tracing::debug!(
                    "git describe failed in {}: {}",
                    path.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                );
                None
            }
            Err(e) => {
                tracing::debug!("Could not run {}: {e}", self.program);
                None
            }
        }
    }
}

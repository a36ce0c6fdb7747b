//! Explicit configuration for locating and calling the external tool.

use std::path::PathBuf;

/// Executable name used when none is configured; looked up on `PATH`.
pub const DEFAULT_EXECUTABLE: &str = "gdrive";

/// Default page size for `list` queries. The tool itself stops at 30.
pub const DEFAULT_MAX_RESULTS: u32 = 1000;

/// Where the `gdrive` executable lives and how to call it.
#[derive(Debug, Clone, PartialEq)]
pub struct GdriveConfig {
    pub executable: PathBuf,
    /// Passed as `-c <dir>`; the tool's own default is used when `None`.
    pub credential_dir: Option<PathBuf>,
    pub max_results: u32,
}

impl GdriveConfig {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            credential_dir: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_credential_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.credential_dir = Some(dir.into());
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }
}

impl Default for GdriveConfig {
    fn default() -> Self {
        Self::new(DEFAULT_EXECUTABLE)
    }
}

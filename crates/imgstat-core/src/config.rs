//! Run configuration built from command-line input.
//!
//! There is no config file: a [`RunConfig`] is assembled once from the CLI
//! arguments and read by every stage for the rest of the run.

use std::path::{Path, PathBuf};

use crate::report::OutputFormat;

/// Extension filter used when the user passes none.
pub const DEFAULT_FILTER: &str = "png jpg gif ico";

/// Directory matched when the user passes none.
pub const DEFAULT_DIRECTORY: &str = ".";

/// Read-only settings for a single run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directories to search, in the order given
    pub directories: Vec<PathBuf>,

    /// Normalized, case-sensitive extension list (empty means match anything)
    pub extensions: Vec<String>,

    /// Emit progress and timing lines
    pub verbose: bool,

    /// Report format
    pub output: OutputFormat,

    /// Directory display names are made relative to
    pub base: PathBuf,
}

impl RunConfig {
    /// Build a config from raw directory arguments and a filter string.
    ///
    /// An empty directory list falls back to the current directory, and a
    /// leading `~` in a directory is expanded.
    pub fn new<I, S>(directories: I, filter: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut directories: Vec<PathBuf> = directories
            .into_iter()
            .map(|d| PathBuf::from(shellexpand::tilde(d.as_ref()).into_owned()))
            .collect();
        if directories.is_empty() {
            directories.push(PathBuf::from(DEFAULT_DIRECTORY));
        }

        Self {
            directories,
            extensions: normalize_extensions(filter),
            verbose: false,
            output: OutputFormat::default(),
            base: PathBuf::from(DEFAULT_DIRECTORY),
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_output(mut self, output: OutputFormat) -> Self {
        self.output = output;
        self
    }

    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }

    /// True when the filter matches files of any extension.
    pub fn is_wildcard(&self) -> bool {
        self.extensions.is_empty() || self.extensions.iter().all(|e| e == "*")
    }

    /// Comma-joined extension list, or `*` for the wildcard filter.
    pub fn extension_list(&self) -> String {
        if self.is_wildcard() {
            "*".to_string()
        } else {
            self.extensions.join(",")
        }
    }

    /// Glob pattern applied beneath each directory.
    pub fn glob_pattern(&self) -> String {
        if self.is_wildcard() {
            return "**/*.*".to_string();
        }
        match self.extensions.as_slice() {
            [single] => format!("**/*.{single}"),
            many => format!("**/*.{{{}}}", many.join(",")),
        }
    }

    /// Full pattern for one directory, as shown in verbose output.
    pub fn pattern_for(&self, directory: &Path) -> String {
        directory.join(self.glob_pattern()).display().to_string()
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(Vec::<String>::new(), DEFAULT_FILTER)
    }
}

/// Split a filter on runs of commas and whitespace, dropping empty pieces.
///
/// Case is preserved. Duplicates are removed keeping the first occurrence.
pub fn normalize_extensions(filter: &str) -> Vec<String> {
    let mut extensions: Vec<String> = Vec::new();
    for piece in filter.split(|c: char| c == ',' || c.is_whitespace()) {
        let piece = piece.trim_start_matches('.');
        if !piece.is_empty() && !extensions.iter().any(|e| e == piece) {
            extensions.push(piece.to_string());
        }
    }
    extensions
}

//! imgstat core - find images under directories and report their metadata.
//!
//! # Architecture
//!
//! ```text
//! Directories → Match (per directory) → Dedupe → Probe (≤10 in flight) → Report
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use imgstat_core::{NativeInspector, OutputFormat, Reporter, RunConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> imgstat_core::Result<()> {
//!     let config = RunConfig::new(["./assets"], "png jpg");
//!     let mut reporter = Reporter::new(std::io::stdout(), std::io::stderr(), OutputFormat::Text, false);
//!     let summary = imgstat_core::run(&config, Arc::new(NativeInspector::new()), &mut reporter).await?;
//!     eprintln!("{} file(s)", summary.file_count);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod fanout;
pub mod inspect;
pub mod matcher;
pub mod probe;
pub mod report;
pub mod types;

use std::io::Write;
use std::sync::Arc;

pub use config::RunConfig;
pub use error::{ImgstatError, MatchError, ProbeError, ProbeResult, Result};
pub use fanout::{FanOut, MAX_IN_FLIGHT};
pub use inspect::{ImageInspector, NativeInspector};
pub use matcher::PathMatcher;
pub use probe::MetadataProber;
pub use report::{OutputFormat, Reporter};
pub use types::{Dimensions, FileRecord, RunSummary};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a full batch: match files, probe them, and report each record.
///
/// Matching fails the run before any probing starts. Records are written
/// as probes complete; the first failing probe stops the batch and no
/// timing line is emitted.
pub async fn run<W, S>(
    config: &RunConfig,
    inspector: Arc<dyn ImageInspector>,
    reporter: &mut Reporter<W, S>,
) -> Result<RunSummary>
where
    W: Write,
    S: Write,
{
    let matcher = PathMatcher::new(config)?;

    reporter.announce_lookup(config)?;
    for directory in &config.directories {
        reporter.announce_pattern(&config.pattern_for(directory))?;
    }

    let files = matcher.match_all(&config.directories).await?;
    if files.is_empty() {
        tracing::warn!(
            "No files matching {} found in {:?}",
            matcher.pattern(),
            config.directories
        );
    }
    reporter.announce_count(files.len(), config)?;

    let fanout = FanOut::new(MetadataProber::new(inspector, &config.base));
    let summary = fanout
        .run(files, |record| {
            reporter.record(&record).map_err(ImgstatError::from)
        })
        .await?;

    reporter.announce_done(&summary)?;
    reporter.flush()?;
    Ok(summary)
}

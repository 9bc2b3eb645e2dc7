//! imgstat - print image metadata for every matching file under directories.
//!
//! Walks each directory recursively, keeps files whose extension is in the
//! filter, and prints one line per image with its dimensions, color count,
//! bit depth, resolution, orientation, format and size.
//!
//! # Usage
//!
//! ```bash
//! # Current directory, default filter (png jpg gif ico)
//! imgstat
//!
//! # Several directories, only PNG and JPEG, with timing
//! imgstat ./assets ./static --filter "png,jpg" --verbose
//!
//! # Machine-readable output
//! imgstat ./assets --json
//! ```

use clap::Parser;
use std::io::Write;
use std::process::ExitCode;
use std::sync::Arc;

use imgstat_core::config::DEFAULT_FILTER;
use imgstat_core::{NativeInspector, OutputFormat, Reporter, RunConfig};

mod logging;

/// imgstat - print dimensions, depth, resolution and format of every image under a directory.
#[derive(Parser, Debug)]
#[command(name = "imgstat")]
#[command(author, version, about, long_about = None)]
#[command(override_usage = "imgstat [OPTIONS] [DIRECTORY]...")]
struct Cli {
    /// Directories to search (defaults to the current directory)
    #[arg(value_name = "DIRECTORY")]
    directories: Vec<String>,

    /// Filter by these file extensions (comma or space separated)
    #[arg(short, long, value_name = "EXTENSIONS", default_value = DEFAULT_FILTER)]
    filter: String,

    /// Print progress and timing, and enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit one JSON object per file instead of text lines
    #[arg(long)]
    json: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json_logs: bool,
}

impl Cli {
    /// Build the run configuration, resolving the working directory as base.
    fn run_config(&self) -> anyhow::Result<RunConfig> {
        let base = std::env::current_dir()
            .map_err(|e| anyhow::anyhow!("Cannot determine working directory: {e}"))?;
        let output = if self.json {
            OutputFormat::JsonLines
        } else {
            OutputFormat::Text
        };

        Ok(RunConfig::new(&self.directories, &self.filter)
            .with_verbose(self.verbose)
            .with_output(output)
            .with_base(base))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::init(cli.verbose, cli.json_logs) {
        eprintln!("{} {e:#}", console::style("error:").red().bold());
        return ExitCode::FAILURE;
    }

    tracing::debug!("imgstat v{}", imgstat_core::VERSION);

    match execute(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = std::io::stdout().flush();
            eprintln!("{} {e:#}", console::style("error:").red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.run_config()?;

    // Keep stdout clean for JSON output
    let status: Box<dyn Write> = match config.output {
        OutputFormat::Text => Box::new(std::io::stdout()),
        OutputFormat::JsonLines => Box::new(std::io::stderr()),
    };
    let mut reporter = Reporter::new(std::io::stdout(), status, config.output, config.verbose);

    let summary = imgstat_core::run(&config, Arc::new(NativeInspector::new()), &mut reporter)
        .await
        .map_err(|e| anyhow::Error::new(e).context("imgstat run failed"))?;

    tracing::debug!(
        "Reported {} of {} file(s)",
        reporter.records_written(),
        summary.file_count
    );
    Ok(())
}

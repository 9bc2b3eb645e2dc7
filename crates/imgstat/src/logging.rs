//! Diagnostics setup for the binary.
//!
//! Core events are emitted with `tracing` and written to stderr; stdout only
//! ever carries the report.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Directive used when `RUST_LOG` is unset.
///
/// `--verbose` turns on debug events from imgstat itself without pulling in
/// every dependency's debug output.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,imgstat=debug,imgstat_core=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber for this process.
///
/// `RUST_LOG` takes precedence over `verbose`. With `json_logs` each event is
/// a JSON object; otherwise a compact line without the module target.
pub fn init(verbose: bool, json_logs: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))?;

    // Exactly one of these is Some
    let json = json_logs.then(|| fmt::layer().json().with_writer(std::io::stderr));
    let text = (!json_logs).then(|| {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_ansi(console::colors_enabled_stderr())
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .try_init()?;
    Ok(())
}

//! Report output: one line per probed file plus verbose status lines.
//!
//! Records are written as text lines or JSON lines. Verbose status lines go
//! to a separate writer so JSON output on stdout stays machine-readable.

use console::style;
use std::io::{self, Write};
use std::time::Duration;

use crate::config::RunConfig;
use crate::types::{FileRecord, RunSummary};

/// Report format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable line per file
    #[default]
    Text,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// Writes records and, in verbose mode, progress and timing lines.
pub struct Reporter<W: Write, S: Write> {
    writer: W,
    status: S,
    format: OutputFormat,
    verbose: bool,
    records_written: usize,
}

impl<W: Write, S: Write> Reporter<W, S> {
    /// Create a reporter.
    ///
    /// * `writer` - Destination for records (usually stdout)
    /// * `status` - Destination for verbose lines
    pub fn new(writer: W, status: S, format: OutputFormat, verbose: bool) -> Self {
        Self {
            writer,
            status,
            format,
            verbose,
            records_written: 0,
        }
    }

    /// Write one record and flush it so lines appear as files complete.
    pub fn record(&mut self, record: &FileRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.writer, "{}", format_line(record))?,
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
                writeln!(self.writer)?;
            }
        }
        self.records_written += 1;
        self.writer.flush()
    }

    /// Pre-run line naming the pattern and filter.
    pub fn announce_lookup(&mut self, config: &RunConfig) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        let filter = if config.is_wildcard() {
            String::new()
        } else {
            format!(", filtered by {}", style(config.extension_list()).blue())
        };
        writeln!(
            self.status,
            "Looking up files matching {}{filter}...",
            config.glob_pattern()
        )
    }

    /// Per-directory pattern line.
    pub fn announce_pattern(&mut self, pattern: &str) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        writeln!(self.status, "Globbing {pattern}")
    }

    /// Line announcing how many files matched.
    pub fn announce_count(&mut self, count: usize, config: &RunConfig) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        writeln!(
            self.status,
            "Processing {} ({}) file(s)...",
            style(count).magenta(),
            style(config.extension_list()).blue()
        )
    }

    /// Post-run timing line.
    pub fn announce_done(&mut self, summary: &RunSummary) -> io::Result<()> {
        if !self.verbose {
            return Ok(());
        }
        let message = format!("done in {}.", humanize_duration(summary.elapsed));
        writeln!(self.status, "{}", style(message).green())?;
        self.status.flush()
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Flush both writers.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()?;
        self.status.flush()
    }

    /// Consume the reporter and return the record and status writers.
    pub fn into_inner(self) -> (W, S) {
        (self.writer, self.status)
    }
}

/// Format a record as a single report line.
///
/// `name: [WxH, r: RES] {c: 0xC, d: 0xD} <ORIENTATION> FORMAT (SIZE)`; the
/// resolution and orientation parts are omitted when empty or unknown.
pub fn format_line(record: &FileRecord) -> String {
    let resolution = if record.resolution.is_empty() {
        String::new()
    } else {
        format!(", r: {}", record.resolution)
    };
    let orientation = if record.orientation.eq_ignore_ascii_case("unknown") {
        String::new()
    } else {
        format!("<{}> ", record.orientation)
    };

    format!(
        "{}: [{}{}] {{c: 0x{:x}, d: 0x{:x}}} {}{} ({})",
        record.path,
        record.size,
        resolution,
        record.color,
        record.depth,
        orientation,
        record.format,
        filesize_number(&record.filesize)
    )
}

/// Leading numeric part of a human-readable size ("12.3Kb" -> "12.3").
pub fn filesize_number(filesize: &str) -> &str {
    let end = filesize
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(filesize.len());
    &filesize[..end]
}

/// Describe a duration the way people say it ("a few seconds", "2 minutes").
pub fn humanize_duration(elapsed: Duration) -> String {
    let seconds = elapsed.as_secs_f64().round();
    let minutes = (seconds / 60.0).round();
    let hours = (minutes / 60.0).round();
    let days = (hours / 24.0).round();
    let months = (days / 30.0).round();
    let years = (days / 365.0).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if seconds < 90.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if minutes < 90.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if hours < 36.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if days < 45.0 {
        "a month".to_string()
    } else if days < 320.0 {
        format!("{months} months")
    } else if days < 548.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Dimensions;

    fn sample_record() -> FileRecord {
        FileRecord {
            path: "imgs/a.png".to_string(),
            size: Dimensions {
                width: 64,
                height: 64,
            },
            format: "PNG".to_string(),
            color: 255,
            depth: 8,
            resolution: String::new(),
            filesize: "12.3Kb".to_string(),
            orientation: "Unknown".to_string(),
        }
    }

    fn plain(bytes: Vec<u8>) -> String {
        let text = String::from_utf8(bytes).unwrap();
        console::strip_ansi_codes(&text).into_owned()
    }

    #[test]
    fn test_format_line_minimal() {
        assert_eq!(
            format_line(&sample_record()),
            "imgs/a.png: [64x64] {c: 0xff, d: 0x8} PNG (12.3)"
        );
    }

    #[test]
    fn test_format_line_with_resolution_and_orientation() {
        let record = FileRecord {
            resolution: "72x72 ppi".to_string(),
            orientation: "RightTop".to_string(),
            format: "JPEG".to_string(),
            filesize: "1.5Mb".to_string(),
            ..sample_record()
        };
        assert_eq!(
            format_line(&record),
            "imgs/a.png: [64x64, r: 72x72 ppi] {c: 0xff, d: 0x8} <RightTop> JPEG (1.5)"
        );
    }

    #[test]
    fn test_unknown_orientation_is_case_insensitive() {
        for orientation in ["unknown", "UNKNOWN", "Unknown"] {
            let record = FileRecord {
                orientation: orientation.to_string(),
                ..sample_record()
            };
            assert!(!format_line(&record).contains('<'));
        }
    }

    #[test]
    fn test_filesize_number() {
        assert_eq!(filesize_number("12.3Kb"), "12.3");
        assert_eq!(filesize_number("512b"), "512");
        assert_eq!(filesize_number("7"), "7");
        assert_eq!(filesize_number("Kb"), "");
    }

    #[test]
    fn test_humanize_duration() {
        assert_eq!(humanize_duration(Duration::from_millis(300)), "a few seconds");
        assert_eq!(humanize_duration(Duration::from_secs(44)), "a few seconds");
        assert_eq!(humanize_duration(Duration::from_secs(60)), "a minute");
        assert_eq!(humanize_duration(Duration::from_secs(120)), "2 minutes");
        assert_eq!(humanize_duration(Duration::from_secs(60 * 60)), "an hour");
        assert_eq!(humanize_duration(Duration::from_secs(3 * 3600)), "3 hours");
        assert_eq!(humanize_duration(Duration::from_secs(30 * 3600)), "a day");
        assert_eq!(humanize_duration(Duration::from_secs(4 * 86400)), "4 days");
        assert_eq!(humanize_duration(Duration::from_secs(400 * 86400)), "a year");
    }

    #[test]
    fn test_record_text() {
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, io::sink(), OutputFormat::Text, false);
        reporter.record(&sample_record()).unwrap();
        reporter.record(&sample_record()).unwrap();
        assert_eq!(reporter.records_written(), 2);
        drop(reporter);

        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.starts_with("imgs/a.png: [64x64]"));
    }

    #[test]
    fn test_record_json_lines() {
        let mut out = Vec::new();
        let mut reporter = Reporter::new(&mut out, io::sink(), OutputFormat::JsonLines, false);
        reporter.record(&sample_record()).unwrap();
        drop(reporter);

        let text = String::from_utf8(out).unwrap();
        let parsed: FileRecord = serde_json::from_str(text.trim()).unwrap();
        assert_eq!(parsed, sample_record());
    }

    #[test]
    fn test_quiet_reporter_emits_no_status() {
        let config = RunConfig::default();
        let mut reporter = Reporter::new(io::sink(), Vec::new(), OutputFormat::Text, false);
        reporter.announce_lookup(&config).unwrap();
        reporter.announce_count(3, &config).unwrap();
        reporter
            .announce_done(&RunSummary {
                file_count: 3,
                elapsed: Duration::from_secs(1),
            })
            .unwrap();

        let (_, status) = reporter.into_inner();
        assert!(status.is_empty());
    }

    #[test]
    fn test_verbose_status_lines() {
        let config = RunConfig::new(["imgs"], "png jpg");
        let mut reporter = Reporter::new(io::sink(), Vec::new(), OutputFormat::Text, true);
        reporter.announce_lookup(&config).unwrap();
        reporter.announce_pattern("imgs/**/*.{png,jpg}").unwrap();
        reporter.announce_count(3, &config).unwrap();
        reporter
            .announce_done(&RunSummary {
                file_count: 3,
                elapsed: Duration::from_secs(2),
            })
            .unwrap();

        let (_, status) = reporter.into_inner();
        let text = plain(status);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Looking up files matching **/*.{png,jpg}, filtered by png,jpg...",
                "Globbing imgs/**/*.{png,jpg}",
                "Processing 3 (png,jpg) file(s)...",
                "done in a few seconds.",
            ]
        );
    }
}

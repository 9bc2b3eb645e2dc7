//! Core data types produced by a run.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Metadata for one successfully probed file.
///
/// Built once by the prober and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRecord {
    /// Display path, relative to the base directory when possible
    pub path: String,

    /// Pixel width and height
    pub size: Dimensions,

    /// Upper-case format identifier ("PNG", "JPEG", ...)
    pub format: String,

    /// Number of distinct colors
    pub color: u64,

    /// Bits per channel
    pub depth: u32,

    /// Resolution descriptor, empty when the file carries none
    pub resolution: String,

    /// Human-readable file size ("12.3Kb")
    pub filesize: String,

    /// EXIF-style orientation name, or "Unknown"
    pub orientation: String,
}

/// Totals for a completed batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of files probed
    pub file_count: usize,
    /// Wall-clock time from first dispatch to last completion
    pub elapsed: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_display() {
        let size = Dimensions {
            width: 64,
            height: 32,
        };
        assert_eq!(size.to_string(), "64x32");
    }

    #[test]
    fn test_file_record_serializes_named_fields() {
        let record = FileRecord {
            path: "imgs/a.png".to_string(),
            size: Dimensions {
                width: 64,
                height: 64,
            },
            format: "PNG".to_string(),
            color: 1,
            depth: 8,
            resolution: String::new(),
            filesize: "120b".to_string(),
            orientation: "Unknown".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"path\":\"imgs/a.png\""));
        assert!(json.contains("\"size\":{\"width\":64,\"height\":64}"));
        assert!(json.contains("\"depth\":8"));

        let back: FileRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}

//! Image inspection: the collaborator that answers per-file attribute requests.
//!
//! The prober only sees the [`ImageInspector`] trait. [`NativeInspector`] is
//! the shipped implementation, built on the `image` and `kamadak-exif` crates.

mod native;

pub use native::NativeInspector;

use async_trait::async_trait;
use std::path::Path;

use crate::error::ProbeResult;
use crate::types::Dimensions;

/// Orientation reported when a file carries no EXIF orientation.
pub const UNKNOWN_ORIENTATION: &str = "Unknown";

/// Source of per-file image attributes.
///
/// Uses `async_trait` so the prober can hold an `Arc<dyn ImageInspector>`.
/// Each request is independent; any of them may fail for an unreadable or
/// undecodable file.
#[async_trait]
pub trait ImageInspector: Send + Sync {
    /// Inspector name for logging.
    fn name(&self) -> &str;

    /// Pixel width and height.
    async fn size(&self, path: &Path) -> ProbeResult<Dimensions>;

    /// Upper-case format identifier ("PNG", "JPEG", ...).
    async fn format(&self, path: &Path) -> ProbeResult<String>;

    /// Number of distinct colors.
    async fn color(&self, path: &Path) -> ProbeResult<u64>;

    /// Bits per channel.
    async fn depth(&self, path: &Path) -> ProbeResult<u32>;

    /// Resolution descriptor, empty when absent.
    async fn resolution(&self, path: &Path) -> ProbeResult<String>;

    /// Human-readable file size.
    async fn filesize(&self, path: &Path) -> ProbeResult<String>;

    /// EXIF-style orientation name, or [`UNKNOWN_ORIENTATION`].
    async fn orientation(&self, path: &Path) -> ProbeResult<String>;
}

/// Format a byte count with base-1024 units ("512b", "12.3Kb", "1.5Mb").
pub fn human_filesize(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Kb", "Mb", "Gb", "Tb"];

    if bytes < 1024 {
        return format!("{bytes}b");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    // Step up on the printed value so 1023.96Kb reads 1.0Mb
    while (value * 10.0).round() >= 10240.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1}{}", UNITS[unit])
}

/// Map an EXIF orientation value (1-8) to its GraphicsMagick name.
pub fn orientation_name(value: u32) -> &'static str {
    match value {
        1 => "TopLeft",
        2 => "TopRight",
        3 => "BottomRight",
        4 => "BottomLeft",
        5 => "LeftTop",
        6 => "RightTop",
        7 => "RightBottom",
        8 => "LeftBottom",
        _ => UNKNOWN_ORIENTATION,
    }
}

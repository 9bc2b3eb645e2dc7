//! Metadata probing for a single file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ProbeResult;
use crate::inspect::ImageInspector;
use crate::matcher::clean_path;
use crate::types::FileRecord;

/// Builds a [`FileRecord`] for one file from an [`ImageInspector`].
#[derive(Clone)]
pub struct MetadataProber {
    inspector: Arc<dyn ImageInspector>,
    base: PathBuf,
}

impl MetadataProber {
    /// Create a prober whose display names are relative to `base`.
    pub fn new(inspector: Arc<dyn ImageInspector>, base: impl Into<PathBuf>) -> Self {
        Self {
            inspector,
            base: base.into(),
        }
    }

    /// Probe one file.
    ///
    /// All seven attribute requests run concurrently and must all succeed;
    /// the first failure becomes the probe's error.
    pub async fn probe(&self, path: &Path) -> ProbeResult<FileRecord> {
        let start = std::time::Instant::now();
        let inspector = self.inspector.as_ref();

        let (size, format, color, depth, resolution, filesize, orientation) = tokio::try_join!(
            inspector.size(path),
            inspector.format(path),
            inspector.color(path),
            inspector.depth(path),
            inspector.resolution(path),
            inspector.filesize(path),
            inspector.orientation(path),
        )?;

        let record = FileRecord {
            path: display_name(path, &self.base),
            size,
            format,
            color,
            depth,
            resolution,
            filesize,
            orientation,
        };

        tracing::trace!(
            "Probed {:?} via {} in {:?}",
            path,
            self.inspector.name(),
            start.elapsed()
        );
        Ok(record)
    }
}

/// Path shown for a file: relative to `base` when beneath it, otherwise as given.
///
/// Relative paths are already relative to the working directory and are
/// kept as given, minus any `.` components.
pub fn display_name(path: &Path, base: &Path) -> String {
    let path = clean_path(path);
    let base = clean_path(base);

    let relative = if path.is_absolute() && base.is_absolute() {
        path.strip_prefix(&base).map(Path::to_path_buf).ok()
    } else {
        None
    };

    relative
        .filter(|r| !r.as_os_str().is_empty())
        .unwrap_or(path)
        .display()
        .to_string()
}

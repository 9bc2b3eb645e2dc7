//! Image inspector backed by the `image` decoder and `kamadak-exif`.

use async_trait::async_trait;
use exif::{Exif, In, Reader, Tag, Value};
use image::{ImageDecoder, ImageFormat, ImageReader};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{human_filesize, orientation_name, ImageInspector, UNKNOWN_ORIENTATION};
use crate::error::{ProbeError, ProbeResult};
use crate::types::Dimensions;

/// Reads attributes straight from the file on disk.
///
/// Every request opens the file independently and runs its decoding on the
/// blocking thread pool. Format detection is by content, falling back to the
/// file extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeInspector;

impl NativeInspector {
    pub fn new() -> Self {
        Self
    }

    fn open(path: &Path) -> ProbeResult<ImageReader<BufReader<File>>> {
        ImageReader::open(path)
            .and_then(|reader| reader.with_guessed_format())
            .map_err(|source| ProbeError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    fn size_sync(path: &Path) -> ProbeResult<Dimensions> {
        let (width, height) = Self::open(path)?
            .into_dimensions()
            .map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn format_sync(path: &Path) -> ProbeResult<String> {
        let format = Self::open(path)?
            .format()
            .ok_or_else(|| ProbeError::UnknownFormat(path.to_path_buf()))?;
        Ok(format_to_string(format))
    }

    fn color_sync(path: &Path) -> ProbeResult<u64> {
        let image = Self::open(path)?
            .decode()
            .map_err(|e| decode_error(path, e))?;
        let colors: HashSet<[u16; 4]> = image.to_rgba16().pixels().map(|p| p.0).collect();
        Ok(colors.len() as u64)
    }

    fn depth_sync(path: &Path) -> ProbeResult<u32> {
        let decoder = Self::open(path)?
            .into_decoder()
            .map_err(|e| decode_error(path, e))?;
        let color_type = decoder.original_color_type();
        let channels = u32::from(color_type.channel_count().max(1));
        Ok(u32::from(color_type.bits_per_pixel()) / channels)
    }

    fn resolution_sync(path: &Path) -> ProbeResult<String> {
        let Some(exif) = read_exif(path)? else {
            return Ok(String::new());
        };

        let x = get_rational(&exif, Tag::XResolution);
        let y = get_rational(&exif, Tag::YResolution);
        let (Some(x), Some(y)) = (x, y) else {
            return Ok(String::new());
        };

        // ResolutionUnit: 2 = inches (default), 3 = centimeters
        let unit = match get_uint(&exif, Tag::ResolutionUnit) {
            Some(3) => "ppcm",
            _ => "ppi",
        };
        Ok(format!("{x}x{y} {unit}"))
    }

    fn orientation_sync(path: &Path) -> ProbeResult<String> {
        let name = read_exif(path)?
            .and_then(|exif| get_uint(&exif, Tag::Orientation))
            .map(orientation_name)
            .unwrap_or(UNKNOWN_ORIENTATION);
        Ok(name.to_string())
    }
}

#[async_trait]
impl ImageInspector for NativeInspector {
    fn name(&self) -> &str {
        "native"
    }

    async fn size(&self, path: &Path) -> ProbeResult<Dimensions> {
        blocking(path, Self::size_sync).await
    }

    async fn format(&self, path: &Path) -> ProbeResult<String> {
        blocking(path, Self::format_sync).await
    }

    async fn color(&self, path: &Path) -> ProbeResult<u64> {
        blocking(path, Self::color_sync).await
    }

    async fn depth(&self, path: &Path) -> ProbeResult<u32> {
        blocking(path, Self::depth_sync).await
    }

    async fn resolution(&self, path: &Path) -> ProbeResult<String> {
        blocking(path, Self::resolution_sync).await
    }

    async fn filesize(&self, path: &Path) -> ProbeResult<String> {
        let meta = tokio::fs::metadata(path)
            .await
            .map_err(|source| ProbeError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(human_filesize(meta.len()))
    }

    async fn orientation(&self, path: &Path) -> ProbeResult<String> {
        blocking(path, Self::orientation_sync).await
    }
}

/// Run a synchronous attribute reader on the blocking pool.
async fn blocking<T, F>(path: &Path, f: F) -> ProbeResult<T>
where
    T: Send + 'static,
    F: FnOnce(&Path) -> ProbeResult<T> + Send + 'static,
{
    let owned: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || f(&owned))
        .await
        .map_err(|e| ProbeError::Task {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
}

fn decode_error(path: &Path, err: image::ImageError) -> ProbeError {
    ProbeError::Decode {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Read EXIF data, treating a container without EXIF as `None`.
///
/// Only failing to open the file is an error.
fn read_exif(path: &Path) -> ProbeResult<Option<Exif>> {
    let file = File::open(path).map_err(|source| ProbeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);
    Ok(Reader::new().read_from_container(&mut reader).ok())
}

fn get_uint(exif: &Exif, tag: Tag) -> Option<u32> {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
}

fn get_rational(exif: &Exif, tag: Tag) -> Option<f64> {
    exif.get_field(tag, In::PRIMARY)
        .and_then(|f| match &f.value {
            Value::Rational(v) => v.first().map(|r| r.to_f64()),
            _ => None,
        })
}

/// Upper-case identifier for a detected format.
pub(crate) fn format_to_string(format: ImageFormat) -> String {
    let name = match format {
        ImageFormat::Jpeg => "JPEG",
        ImageFormat::Png => "PNG",
        ImageFormat::Gif => "GIF",
        ImageFormat::Ico => "ICO",
        ImageFormat::WebP => "WEBP",
        ImageFormat::Tiff => "TIFF",
        ImageFormat::Bmp => "BMP",
        ImageFormat::Pnm => "PNM",
        ImageFormat::Tga => "TGA",
        ImageFormat::Avif => "AVIF",
        ImageFormat::Qoi => "QOI",
        ImageFormat::Hdr => "HDR",
        ImageFormat::OpenExr => "EXR",
        ImageFormat::Dds => "DDS",
        ImageFormat::Farbfeld => "FARBFELD",
        _ => "UNKNOWN",
    };
    name.to_string()
}

use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use image::{ImageFormat, ImageReader, RgbaImage};
use tracing::debug;

use crate::viewport::Size;
use crate::{VecnaError, VecnaResult};

/// Formats accepted as input, in the order they are advertised.
pub const ALLOWED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Largest accepted input file.
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Largest accepted width or height of a decoded source.
pub const MAX_SOURCE_DIMENSION: u32 = 4000;

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a loaded source. Two loads of the same bytes get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A decoded bitmap together with its identity.
#[derive(Debug, Clone)]
pub struct ImageSource {
    id: SourceId,
    pixels: Arc<RgbaImage>,
}

impl ImageSource {
    /// Wrap an already decoded bitmap under a fresh identity.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self {
            id: SourceId::next(),
            pixels: Arc::new(pixels),
        }
    }

    /// Validate and decode an encoded image held in memory.
    pub fn from_bytes(bytes: &[u8]) -> VecnaResult<Self> {
        let format = validate_bytes(bytes)?;
        let decode_failed = |err: image::ImageError| {
            debug!(%err, "decode failed");
            VecnaError::Decode(err)
        };
        // header only, so oversized sources are rejected before any pixel is decoded
        let (width, height) = ImageReader::with_format(Cursor::new(bytes), format)
            .into_dimensions()
            .map_err(decode_failed)?;
        validate_dimensions(width, height)?;
        let decoded = ImageReader::with_format(Cursor::new(bytes), format)
            .decode()
            .map_err(decode_failed)?;
        debug!(width, height, ?format, "image loaded");
        Ok(Self::from_rgba(decoded.to_rgba8()))
    }

    /// Validate and decode an image file.
    pub fn open(path: impl AsRef<Path>) -> VecnaResult<Self> {
        let bytes = fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    pub fn id(&self) -> SourceId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Size {
        self.pixels.dimensions().into()
    }

    pub fn pixels(&self) -> &RgbaImage {
        self.pixels.as_ref()
    }

    pub(crate) fn shared_pixels(&self) -> Arc<RgbaImage> {
        Arc::clone(&self.pixels)
    }
}

fn allowed_list() -> String {
    ALLOWED_FORMATS
        .iter()
        .map(|f| f.to_mime_type())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check size and format of encoded input before decoding it.
pub fn validate_bytes(bytes: &[u8]) -> VecnaResult<ImageFormat> {
    if bytes.is_empty() {
        return Err(VecnaError::NoFile);
    }

    let format = image::guess_format(bytes)
        .ok()
        .filter(|f| ALLOWED_FORMATS.contains(f))
        .ok_or_else(|| VecnaError::UnsupportedFormat {
            allowed: allowed_list(),
        })?;

    if bytes.len() as u64 > MAX_FILE_SIZE_BYTES {
        return Err(VecnaError::FileTooLarge {
            max_mb: MAX_FILE_SIZE_BYTES / (1024 * 1024),
        });
    }

    Ok(format)
}

/// Reject decoded sources larger than [`MAX_SOURCE_DIMENSION`] on either axis.
pub fn validate_dimensions(width: u32, height: u32) -> VecnaResult<()> {
    if width > MAX_SOURCE_DIMENSION || height > MAX_SOURCE_DIMENSION {
        return Err(VecnaError::DimensionsTooLarge {
            max: MAX_SOURCE_DIMENSION,
            width,
            height,
        });
    }
    Ok(())
}

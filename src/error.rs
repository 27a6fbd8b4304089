use thiserror::Error;

/// Result type alias for operations that may fail with [`VecnaError`].
pub type VecnaResult<T> = std::result::Result<T, VecnaError>;

/// Error types that can occur while loading, vectorizing, or exporting an image.
///
/// Every variant is scoped to a single computation; none of them is fatal to
/// the session that produced it.
#[derive(Debug, Error)]
pub enum VecnaError {
    /// Nothing was provided, or the provided file is empty.
    #[error("No file provided.")]
    NoFile,
    /// The input is not one of the accepted image formats.
    #[error("Unsupported format. Use {allowed}.")]
    UnsupportedFormat { allowed: String },
    /// The input file exceeds the size limit.
    #[error("File too large. Maximum size is {max_mb}MB.")]
    FileTooLarge { max_mb: u64 },
    /// The decoded image exceeds the dimension limit.
    #[error("Image too large. Maximum dimension is {max}px (got {width}×{height}).")]
    DimensionsTooLarge { max: u32, width: u32, height: u32 },
    /// Pixel buffer length does not agree with its declared dimensions.
    #[error(
        "Invalid image data: dimensions {width}x{height} do not match data length (expected {expected}, got {found}). Try a different image."
    )]
    InvalidImageData {
        width: u32,
        height: u32,
        expected: usize,
        found: usize,
    },
    /// Image loading or decoding error.
    #[error("Could not load image. The file may be corrupted.")]
    Decode(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The tracing engine failed to bootstrap. Not cached; the next run retries.
    #[error("Failed to initialize vectorization: {0}")]
    EngineInit(String),
    /// The tracing engine rejected the input.
    #[error(
        "Vectorization failed (offset is out of bounds often means the image is too large or has unsupported dimensions). Try a smaller image or different format. Original error: {0}"
    )]
    Trace(String),
    /// The tracing engine returned something that is not SVG markup.
    #[error("Vectorization did not produce valid SVG.")]
    InvalidSvg,
    /// A pipeline step panicked or its task was aborted.
    #[error("Vectorization was interrupted: {0}")]
    Interrupted(#[from] tokio::task::JoinError),
    /// Both the system clipboard and the fallback mechanism failed.
    #[error("Failed to copy to clipboard")]
    Clipboard(String),
}

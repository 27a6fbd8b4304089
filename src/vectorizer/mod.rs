use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::config::VectorizeParams;
use crate::mapping::{EngineOptions, map_options};
use crate::preprocess::{PixelBuffer, binarize};
use crate::svg::is_valid_svg;
use crate::{VecnaError, VecnaResult};

/// A bitmap-to-vector tracer consumed as a black box.
///
/// Errors are plain messages; [`vectorize_image`] turns them into [`VecnaError`]s.
#[async_trait]
pub trait TracingEngine: Send + Sync {
    /// One-time bootstrap. Expensive; [`SharedEngine`] calls it at most once per success.
    async fn init(&self) -> Result<(), String>;

    /// Trace an RGBA buffer into SVG markup.
    async fn trace(&self, buffer: PixelBuffer, options: EngineOptions) -> Result<String, String>;
}

/// An engine plus its memoized initialization, shared by every caller.
pub struct SharedEngine {
    engine: Box<dyn TracingEngine>,
    ready: OnceCell<()>,
}

impl std::fmt::Debug for SharedEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedEngine")
            .field("initialized", &self.ready.initialized())
            .finish()
    }
}

impl SharedEngine {
    pub fn new(engine: impl TracingEngine + 'static) -> Arc<Self> {
        Arc::new(Self {
            engine: Box::new(engine),
            ready: OnceCell::new(),
        })
    }

    /// Initialize the engine if no earlier call has succeeded.
    ///
    /// Concurrent callers wait on the same attempt. A failure is not cached.
    pub async fn ensure_init(&self) -> VecnaResult<()> {
        self.ready
            .get_or_try_init(|| self.engine.init())
            .await
            .map(|_| ())
            .map_err(|msg| {
                warn!(error = %msg, "engine initialization failed");
                VecnaError::EngineInit(msg)
            })
    }

    pub fn is_initialized(&self) -> bool {
        self.ready.initialized()
    }

    async fn trace(&self, buffer: PixelBuffer, options: EngineOptions) -> Result<String, String> {
        self.engine.trace(buffer, options).await
    }
}

/// Validate, map, binarize if needed, and trace a prepared buffer.
///
/// Invalid buffers are rejected before the engine is touched.
pub async fn vectorize_image(
    engine: &SharedEngine,
    buffer: PixelBuffer,
    params: &VectorizeParams,
) -> VecnaResult<String> {
    debug!(
        width = buffer.width(),
        height = buffer.height(),
        data_len = buffer.data().len(),
        expected = buffer.expected_len(),
        "vectorize input"
    );
    buffer.validate()?;

    let mapped = map_options(params);
    engine.ensure_init().await?;

    let input = if mapped.engine.extract_colors {
        debug!("color mode: passing RGBA through");
        buffer
    } else {
        debug!(threshold = mapped.threshold, "binarizing");
        binarize(&buffer, mapped.threshold)
    };

    let (width, height) = input.dimensions();
    let svg = engine.trace(input, mapped.engine).await.map_err(|msg| {
        warn!(error = %msg, width, height, "engine rejected input");
        VecnaError::Trace(msg)
    })?;

    if !is_valid_svg(&svg) {
        return Err(VecnaError::InvalidSvg);
    }
    debug!(len = svg.len(), "trace complete");
    Ok(svg)
}

#[cfg(feature = "vectorizer-vtracer")]
pub mod vtracer;

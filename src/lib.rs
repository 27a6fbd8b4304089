pub mod config;
pub mod debounce;
pub mod error;
pub mod export;
pub mod mapping;
pub mod notify;
pub mod orchestrator;
pub mod preprocess;
pub mod session;
pub mod source;
pub mod svg;
pub mod vectorizer;
pub mod viewport;

pub use config::{
    CanvasBackground, MAX_VECTORIZE_DIMENSION, MIN_VECTORIZE_DIMENSION, ParamUpdate, ParamsStore,
    PipelineSettings, VECTORIZE_DEBOUNCE, VectorizeParams,
};
pub use error::{VecnaError, VecnaResult};
pub use export::{ClipboardSink, SVG_FILE_NAME, SVG_MIME, copy_svg, download_svg, write_svg};
#[cfg(feature = "clipboard")]
pub use export::{SelectionClipboard, SystemClipboard};
pub use mapping::{EngineOptions, MappedOptions, map_options};
pub use notify::{ChannelNotifier, LogNotifier, Notice, NoticeKind, Notifier};
pub use orchestrator::{Orchestrator, RESIZED_NOTICE, RunOutcome, Status, run_pipeline};
pub use preprocess::{FilterOptions, PixelBuffer, PreparedImage, binarize, prepare, resize_to_fit};
pub use session::Session;
pub use source::{ImageSource, SourceId};
pub use vectorizer::{SharedEngine, TracingEngine, vectorize_image};
#[cfg(feature = "vectorizer-vtracer")]
pub use vectorizer::vtracer::VtracerEngine;
pub use viewport::{PaneKind, Size};

use std::path::Path;

/// Load, prepare, and trace a single image file in one go.
///
/// This is the non-interactive path: no debounce, no panes, no stale runs.
pub async fn vectorize_file(
    engine: &SharedEngine,
    path: impl AsRef<Path>,
    params: &VectorizeParams,
    settings: &PipelineSettings,
    notifier: &dyn Notifier,
) -> VecnaResult<String> {
    let source = ImageSource::open(path)?;
    orchestrator::run_pipeline(engine, &source, params, settings, || {
        notifier.notify(Notice::success(orchestrator::RESIZED_NOTICE))
    })
    .await
}

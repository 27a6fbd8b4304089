use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::VecnaResult;
use crate::config::{PipelineSettings, VectorizeParams};
use crate::notify::{Notice, Notifier};
use crate::preprocess::{FilterOptions, prepare};
use crate::source::ImageSource;
use crate::vectorizer::{SharedEngine, vectorize_image};

pub const RESIZED_NOTICE: &str = "Image resized to fit maximum size for vectorization";

/// What the UI shows for the current image.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub is_vectorizing: bool,
    pub svg: Option<String>,
    pub error: Option<String>,
}

/// How a run ended, from the orchestrator's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Ready,
    Failed,
    /// A newer trigger superseded this run; its result was dropped.
    Discarded,
}

struct Inner {
    engine: Arc<SharedEngine>,
    settings: PipelineSettings,
    notifier: Arc<dyn Notifier>,
    generation: AtomicU64,
    status: Mutex<Status>,
    changes: watch::Sender<Status>,
}

impl Inner {
    /// Broadcast `status`; call with the status lock held so updates stay ordered.
    fn publish(&self, status: &Status) {
        self.changes.send_replace(status.clone());
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn run(&self, source: ImageSource, params: VectorizeParams, generation: u64) -> RunOutcome {
        let result = self.pipeline(source, params, generation).await;

        let mut status = self.status.lock();
        // checked under the lock so a concurrent trigger cannot interleave
        if !self.is_current(generation) {
            warn!(generation, "discarding stale vectorization result");
            return RunOutcome::Discarded;
        }
        status.is_vectorizing = false;
        match result {
            Ok(svg) => {
                debug!(generation, len = svg.len(), "vectorization ready");
                status.svg = Some(svg);
                status.error = None;
                self.publish(&status);
                RunOutcome::Ready
            }
            Err(err) => {
                let message = err.to_string();
                warn!(generation, error = %message, "vectorization failed");
                status.svg = None;
                status.error = Some(message.clone());
                self.publish(&status);
                drop(status);
                self.notifier.notify(Notice::error(message));
                RunOutcome::Failed
            }
        }
    }

    async fn pipeline(
        &self,
        source: ImageSource,
        params: VectorizeParams,
        generation: u64,
    ) -> VecnaResult<String> {
        run_pipeline(&self.engine, &source, &params, &self.settings, || {
            if self.is_current(generation) {
                self.notifier.notify(Notice::success(RESIZED_NOTICE));
            }
        })
        .await
    }
}

/// Preprocess `source` and trace it once. `on_resized` runs if the image had to be shrunk.
pub async fn run_pipeline(
    engine: &SharedEngine,
    source: &ImageSource,
    params: &VectorizeParams,
    settings: &PipelineSettings,
    on_resized: impl FnOnce(),
) -> VecnaResult<String> {
    let pixels = source.shared_pixels();
    let filters = FilterOptions {
        contrast: params.contrast,
        saturation: params.saturation,
    };
    let settings = settings.clone();
    let prepared =
        tokio::task::spawn_blocking(move || prepare(&pixels, filters, &settings)).await??;

    if prepared.was_resized {
        on_resized();
    }
    vectorize_image(engine, prepared.buffer, params).await
}

/// Runs the preprocess and trace pipeline, keeping only the newest outcome.
///
/// Superseded runs are not aborted; they finish and their results are thrown away.
#[derive(Clone)]
pub struct Orchestrator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("generation", &self.generation())
            .field("status", &*self.inner.status.lock())
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(
        engine: Arc<SharedEngine>,
        settings: PipelineSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                engine,
                settings,
                notifier,
                generation: AtomicU64::new(0),
                status: Mutex::new(Status::default()),
                changes: watch::Sender::new(Status::default()),
            }),
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.inner.settings
    }

    pub fn status(&self) -> Status {
        self.inner.status.lock().clone()
    }

    /// Receiver that observes every status change, starting from the current one.
    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.inner.changes.subscribe()
    }

    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::SeqCst)
    }

    /// Start a run for `source` with `params`, superseding any run in flight.
    ///
    /// The busy flag is raised and the previous error cleared before this
    /// returns; the previous SVG stays visible until the run resolves.
    pub fn trigger(&self, source: &ImageSource, params: VectorizeParams) -> JoinHandle<RunOutcome> {
        let generation = {
            let mut status = self.inner.status.lock();
            let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
            status.is_vectorizing = true;
            status.error = None;
            self.inner.publish(&status);
            generation
        };
        debug!(generation, source = ?source.id(), "vectorization triggered");

        let inner = Arc::clone(&self.inner);
        let source = source.clone();
        tokio::spawn(async move { inner.run(source, params, generation).await })
    }

    /// Invalidate any run in flight and drop the busy flag. The last result stays.
    pub fn cancel(&self) {
        let mut status = self.inner.status.lock();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        status.is_vectorizing = false;
        self.inner.publish(&status);
    }

    /// Invalidate any run in flight and forget the last result and error.
    pub fn clear(&self) {
        let mut status = self.inner.status.lock();
        self.inner.generation.fetch_add(1, Ordering::SeqCst);
        *status = Status::default();
        self.inner.publish(&status);
    }
}

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::config::{ParamUpdate, ParamsStore, PipelineSettings, VectorizeParams};
use crate::debounce::Debounced;
use crate::notify::Notifier;
use crate::orchestrator::{Orchestrator, RunOutcome, Status};
use crate::source::ImageSource;
use crate::svg;
use crate::vectorizer::SharedEngine;
use crate::viewport::{GestureSettings, Pane, PaneKind};

/// Everything one editing session owns: the image, its parameters, both panes,
/// and the pipeline producing the vector result.
///
/// Methods that may start work spawn tokio tasks and must be called from
/// within a runtime.
#[derive(Debug)]
pub struct Session {
    image: Arc<Mutex<Option<ImageSource>>>,
    params: ParamsStore,
    debounced: Debounced<VectorizeParams>,
    orchestrator: Orchestrator,
    raster: Pane,
    vector: Pane,
}

impl Session {
    pub fn new(
        engine: Arc<SharedEngine>,
        settings: PipelineSettings,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::with_gestures(engine, settings, notifier, GestureSettings::default())
    }

    pub fn with_gestures(
        engine: Arc<SharedEngine>,
        settings: PipelineSettings,
        notifier: Arc<dyn Notifier>,
        gestures: GestureSettings,
    ) -> Self {
        let debounced = Debounced::new(VectorizeParams::default(), settings.debounce);
        Self {
            image: Arc::new(Mutex::new(None)),
            params: ParamsStore::new(),
            debounced,
            orchestrator: Orchestrator::new(engine, settings, notifier),
            raster: Pane::new(PaneKind::Raster, gestures),
            vector: Pane::new(PaneKind::Vector, gestures),
        }
    }

    pub fn image(&self) -> Option<ImageSource> {
        self.image.lock().clone()
    }

    /// Live parameter values, as last edited.
    pub fn params(&self) -> VectorizeParams {
        self.params.params()
    }

    /// Parameter values the current vector result is computed from.
    pub fn debounced_params(&self) -> VectorizeParams {
        self.debounced.get()
    }

    pub fn status(&self) -> Status {
        self.orchestrator.status()
    }

    pub fn subscribe(&self) -> watch::Receiver<Status> {
        self.orchestrator.subscribe()
    }

    pub fn pane(&self, kind: PaneKind) -> &Pane {
        match kind {
            PaneKind::Raster => &self.raster,
            PaneKind::Vector => &self.vector,
        }
    }

    pub fn pane_mut(&mut self, kind: PaneKind) -> &mut Pane {
        match kind {
            PaneKind::Raster => &mut self.raster,
            PaneKind::Vector => &mut self.vector,
        }
    }

    /// Make `source` the active image and start vectorizing it with the settled parameters.
    ///
    /// Both panes go back to the default view when the identity changes.
    pub fn load_image(&mut self, source: ImageSource) -> JoinHandle<RunOutcome> {
        let changed = self
            .image
            .lock()
            .as_ref()
            .is_none_or(|current| current.id() != source.id());
        if changed {
            debug!(id = ?source.id(), width = source.width(), height = source.height(), "new image");
            for pane in [&mut self.raster, &mut self.vector] {
                pane.reset();
                pane.set_content(Some(source.size()));
            }
        }
        *self.image.lock() = Some(source.clone());
        self.orchestrator.trigger(&source, self.debounced.get())
    }

    /// Apply one parameter edit. A new run starts once edits settle, unless
    /// the settled values would trace the same as before.
    pub fn set_param(&mut self, update: ParamUpdate) -> JoinHandle<bool> {
        self.params.set(update);
        self.schedule()
    }

    /// Return every parameter to its default, through the same debounce as edits.
    pub fn reset_params(&mut self) -> JoinHandle<bool> {
        self.params.reset();
        self.schedule()
    }

    fn schedule(&self) -> JoinHandle<bool> {
        let image = Arc::clone(&self.image);
        let orchestrator = self.orchestrator.clone();
        self.debounced
            .set(self.params.params(), move |previous, current| {
                if !previous.affects_trace(&current) {
                    debug!("settled params trace the same; skipping run");
                    return;
                }
                if let Some(source) = image.lock().clone() {
                    // the run reports through the orchestrator status
                    drop(orchestrator.trigger(&source, current));
                }
            })
    }

    /// Forget the image and its result, reset both views and all parameters,
    /// and invalidate any run in flight.
    pub fn clear_canvas(&mut self) {
        debug!("clearing canvas");
        *self.image.lock() = None;
        for pane in [&mut self.raster, &mut self.vector] {
            pane.reset();
            pane.set_content(None);
        }
        self.params.reset();
        self.debounced.settle_now(self.params.params());
        self.orchestrator.clear();
    }

    /// Reset one pane to the default view.
    pub fn reset_view(&mut self, kind: PaneKind) {
        self.pane_mut(kind).reset();
    }

    /// The current vector result, if any.
    pub fn svg(&self) -> Option<String> {
        self.orchestrator.status().svg
    }

    /// The current result trimmed down to its `<svg` element, ready to render.
    pub fn display_svg(&self) -> Option<String> {
        let markup = self.svg()?;
        svg::sanitize(&markup).map(str::to_owned)
    }
}

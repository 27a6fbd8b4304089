use super::Size;
use super::fit::{FitTransform, RenderTransform, compute_fit};
use super::gesture::{GestureController, GestureSettings, PaneLayout, PointerButton};
use super::state::{ViewportState, ViewportStore};

/// Which side of the split view a pane sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneKind {
    Raster,
    Vector,
}

/// One independently zoomable preview: owns its viewport store and gesture controller.
#[derive(Debug, Clone)]
pub struct Pane {
    kind: PaneKind,
    store: ViewportStore,
    gestures: GestureController,
    viewport: Option<Size>,
    content: Option<Size>,
}

impl Pane {
    pub fn new(kind: PaneKind, settings: GestureSettings) -> Self {
        Self {
            kind,
            store: ViewportStore::new(),
            gestures: GestureController::new(settings),
            viewport: None,
            content: None,
        }
    }

    pub fn kind(&self) -> PaneKind {
        self.kind
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.store.state()
    }

    /// Record a new on-screen size, as reported by the layout engine.
    pub fn resize(&mut self, viewport: Size) {
        self.viewport = Some(viewport);
    }

    /// Record the natural size of the content, or `None` when the pane is empty.
    pub fn set_content(&mut self, content: Option<Size>) {
        self.content = content;
    }

    /// Layout usable by the gesture controller; absent until both sizes are known and positive.
    pub fn layout(&self) -> Option<PaneLayout> {
        let viewport = self.viewport.filter(|s| s.is_positive())?;
        let content = self.content.filter(|s| s.is_positive())?;
        Some(PaneLayout { viewport, content })
    }

    pub fn fit(&self) -> Option<FitTransform> {
        self.layout().map(|l| compute_fit(l.content, l.viewport))
    }

    /// Where the content should be drawn, or `None` when there is nothing to draw.
    pub fn render_transform(&self) -> Option<RenderTransform> {
        let fit = self.fit()?;
        let state = self.store.state();
        Some(RenderTransform::compose(fit, state.zoom, state.pan_x, state.pan_y))
    }

    pub fn set_zoom_pan(&mut self, zoom: f64, pan_x: f64, pan_y: f64) {
        self.store.set_zoom_pan(zoom, pan_x, pan_y);
    }

    pub fn reset(&mut self) {
        self.gestures.release();
        self.store.reset();
    }

    pub fn on_wheel(&mut self, x: f64, y: f64, delta_y: f64) {
        let layout = self.layout();
        self.gestures.wheel(&mut self.store, layout, x, y, delta_y);
    }

    pub fn on_pointer_down(&mut self, button: PointerButton, x: f64, y: f64) -> bool {
        self.gestures.press(&self.store, button, x, y)
    }

    /// Pointer moves are delivered globally while a drag is active.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        let layout = self.layout();
        self.gestures.drag_to(&mut self.store, layout, x, y);
    }

    pub fn on_pointer_up(&mut self) {
        self.gestures.release();
    }

    pub fn on_double_click(&mut self) {
        self.gestures.double_click(&mut self.store);
    }

    pub fn is_dragging(&self) -> bool {
        self.gestures.is_dragging()
    }
}

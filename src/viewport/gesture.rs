use super::Size;
use super::clamp::clamp_pan;
use super::fit::compute_fit;
use super::state::{ViewportStore, clamp_zoom};

/// Zoom change per unit of wheel delta.
pub const ZOOM_SENSITIVITY: f64 = 0.004;
/// Largest zoom change a single wheel event may produce.
pub const MAX_ZOOM_DELTA: f64 = 0.12;

/// Pointer buttons that matter to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Measured geometry of a pane: its on-screen size and the natural size of what it shows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaneLayout {
    pub viewport: Size,
    pub content: Size,
}

/// Controller behavior knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureSettings {
    /// Run the pan clamp after wheel zoom as well as after drags.
    ///
    /// Off by default, which keeps the point under the cursor fixed even near the edges.
    pub clamp_on_zoom: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragStart {
    x: f64,
    y: f64,
    pan_x: f64,
    pan_y: f64,
}

/// Turns wheel and drag input into zoom/pan updates for one pane.
#[derive(Debug, Clone, Default)]
pub struct GestureController {
    settings: GestureSettings,
    drag: Option<DragStart>,
}

/// Zoom factor produced by a wheel delta, before the result is clamped.
///
/// A non-finite delta yields 1 (no zoom).
pub fn wheel_zoom_factor(delta_y: f64) -> f64 {
    if !delta_y.is_finite() {
        return 1.0;
    }
    let zoom_delta = (-delta_y * ZOOM_SENSITIVITY).clamp(-MAX_ZOOM_DELTA, MAX_ZOOM_DELTA);
    1.0 + zoom_delta
}

impl GestureController {
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            drag: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Zoom around `(x, y)`, given in pane-relative coordinates.
    ///
    /// Ignored until the pane has a layout, and for non-finite input.
    pub fn wheel(
        &self,
        store: &mut ViewportStore,
        layout: Option<PaneLayout>,
        x: f64,
        y: f64,
        delta_y: f64,
    ) {
        let Some(layout) = layout else {
            return;
        };
        if !(x.is_finite() && y.is_finite() && delta_y.is_finite()) {
            return;
        }
        let fit = compute_fit(layout.content, layout.viewport);
        let current = store.state();

        let new_zoom = clamp_zoom(current.zoom * wheel_zoom_factor(delta_y));
        let ratio = new_zoom / current.zoom;
        let content_x = x - fit.offset_x - current.pan_x;
        let content_y = y - fit.offset_y - current.pan_y;
        let mut pan_x = x - content_x * ratio - fit.offset_x;
        let mut pan_y = y - content_y * ratio - fit.offset_y;

        if self.settings.clamp_on_zoom {
            (pan_x, pan_y) = clamp_pan(
                pan_x,
                pan_y,
                layout.viewport,
                fit,
                new_zoom,
                layout.content,
            );
        }

        store.set_zoom_pan(new_zoom, pan_x, pan_y);
    }

    /// Begin a drag. Only the primary button starts one; returns whether it did.
    pub fn press(&mut self, store: &ViewportStore, button: PointerButton, x: f64, y: f64) -> bool {
        if button != PointerButton::Primary {
            return false;
        }
        let state = store.state();
        self.drag = Some(DragStart {
            x,
            y,
            pan_x: state.pan_x,
            pan_y: state.pan_y,
        });
        true
    }

    /// Continue a drag to `(x, y)`. Coordinates may lie outside the pane.
    ///
    /// Without a layout the raw pan is committed unclamped.
    pub fn drag_to(&self, store: &mut ViewportStore, layout: Option<PaneLayout>, x: f64, y: f64) {
        let Some(start) = self.drag else {
            return;
        };
        let zoom = store.state().zoom;
        let raw_x = start.pan_x + (x - start.x);
        let raw_y = start.pan_y + (y - start.y);

        let (pan_x, pan_y) = match layout {
            Some(layout) => {
                let fit = compute_fit(layout.content, layout.viewport);
                clamp_pan(raw_x, raw_y, layout.viewport, fit, zoom, layout.content)
            }
            None => (raw_x, raw_y),
        };
        store.set_zoom_pan(zoom, pan_x, pan_y);
    }

    /// End the drag, wherever the pointer was released.
    pub fn release(&mut self) {
        self.drag = None;
    }

    pub fn double_click(&mut self, store: &mut ViewportStore) {
        self.drag = None;
        store.reset();
    }
}

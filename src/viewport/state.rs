/// Smallest zoom factor the store accepts.
pub const ZOOM_MIN: f64 = 0.1;
/// Largest zoom factor the store accepts.
pub const ZOOM_MAX: f64 = 10.0;
/// Zoom factor after a reset.
pub const ZOOM_DEFAULT: f64 = 1.0;

/// Zoom and pan of a single pane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            zoom: ZOOM_DEFAULT,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// Clamp a zoom factor into `[ZOOM_MIN, ZOOM_MAX]`.
pub fn clamp_zoom(zoom: f64) -> f64 {
    zoom.min(ZOOM_MAX).max(ZOOM_MIN)
}

/// Mutations accepted by [`ViewportStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportAction {
    SetZoomPan { zoom: f64, pan_x: f64, pan_y: f64 },
    Reset,
}

/// Single-writer holder of a pane's [`ViewportState`].
///
/// Only the zoom bound is enforced here; pan clamping is the caller's business.
#[derive(Debug, Clone, Default)]
pub struct ViewportStore {
    state: ViewportState,
}

impl ViewportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current zoom and pan.
    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn dispatch(&mut self, action: ViewportAction) {
        self.state = match action {
            ViewportAction::SetZoomPan { zoom, pan_x, pan_y } => ViewportState {
                zoom: clamp_zoom(zoom),
                pan_x,
                pan_y,
            },
            ViewportAction::Reset => ViewportState::default(),
        };
    }

    pub fn set_zoom_pan(&mut self, zoom: f64, pan_x: f64, pan_y: f64) {
        self.dispatch(ViewportAction::SetZoomPan { zoom, pan_x, pan_y });
    }

    pub fn reset(&mut self) {
        self.dispatch(ViewportAction::Reset);
    }
}

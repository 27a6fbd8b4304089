//! Pan/zoom geometry shared by the raster and vector preview panes.
//!
//! The pure pieces ([`compute_fit`], [`clamp_pan`]) run on every layout pass;
//! [`ViewportStore`] and [`GestureController`] hold the per-pane mutable state.

pub mod clamp;
pub mod fit;
pub mod gesture;
pub mod pane;
pub mod state;

pub use clamp::{PanBounds, clamp_pan};
pub use fit::{FitTransform, RenderTransform, compute_fit};
pub use gesture::{GestureController, GestureSettings, PaneLayout, PointerButton};
pub use pane::{Pane, PaneKind};
pub use state::{ViewportAction, ViewportState, ViewportStore, ZOOM_MAX, ZOOM_MIN};

/// Width and height in CSS-style pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl From<(u32, u32)> for Size {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f64, height as f64)
    }
}

use super::Size;
use super::fit::FitTransform;

/// Upper bound, in screen pixels, on the slice of content kept visible while panning.
pub const PAN_MARGIN: f64 = 60.0;

/// Fraction of the viewport used as the margin when the viewport is small.
pub const PAN_MARGIN_FRACTION: f64 = 0.15;

/// Inclusive pan range along both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanBounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl PanBounds {
    /// Compute the range that keeps at least a margin of the zoomed content on screen.
    ///
    /// An empty range (`min > max`) collapses to its midpoint.
    pub fn compute(viewport: Size, fit: FitTransform, zoom: f64, content: Size) -> Self {
        let scaled_w = content.width * fit.scale * zoom;
        let scaled_h = content.height * fit.scale * zoom;
        let margin_x = PAN_MARGIN.min(viewport.width * PAN_MARGIN_FRACTION);
        let margin_y = PAN_MARGIN.min(viewport.height * PAN_MARGIN_FRACTION);

        let (min_x, max_x) = collapse_if_empty(
            -fit.offset_x - scaled_w + margin_x,
            viewport.width - fit.offset_x - margin_x,
        );
        let (min_y, max_y) = collapse_if_empty(
            -fit.offset_y - scaled_h + margin_y,
            viewport.height - fit.offset_y - margin_y,
        );

        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Clamp a pan offset into these bounds.
    pub fn clamp(&self, pan_x: f64, pan_y: f64) -> (f64, f64) {
        (
            pan_x.min(self.max_x).max(self.min_x),
            pan_y.min(self.max_y).max(self.min_y),
        )
    }
}

fn collapse_if_empty(min: f64, max: f64) -> (f64, f64) {
    if min > max {
        let mid = (min + max) / 2.0;
        (mid, mid)
    } else {
        (min, max)
    }
}

/// Bound a proposed pan so the content cannot be dragged entirely off-screen.
pub fn clamp_pan(
    pan_x: f64,
    pan_y: f64,
    viewport: Size,
    fit: FitTransform,
    zoom: f64,
    content: Size,
) -> (f64, f64) {
    PanBounds::compute(viewport, fit, zoom, content).clamp(pan_x, pan_y)
}

use super::Size;

/// Scale and offset that fit content inside a viewport, centered, without upscaling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTransform {
    pub scale: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl FitTransform {
    /// The no-op transform used for degenerate layouts.
    pub const IDENTITY: FitTransform = FitTransform {
        scale: 1.0,
        offset_x: 0.0,
        offset_y: 0.0,
    };
}

impl Default for FitTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Compute the transform that fits `content` centered inside `viewport`.
///
/// Aspect ratio is preserved and the scale never exceeds 1. Any non-positive
/// dimension yields [`FitTransform::IDENTITY`], since this runs on every layout
/// pass including transient zero-size ones.
pub fn compute_fit(content: Size, viewport: Size) -> FitTransform {
    if !content.is_positive() || !viewport.is_positive() {
        return FitTransform::IDENTITY;
    }

    let scale_x = viewport.width / content.width;
    let scale_y = viewport.height / content.height;
    let scale = scale_x.min(scale_y).min(1.0);

    let offset_x = (viewport.width - content.width * scale) / 2.0;
    let offset_y = (viewport.height - content.height * scale) / 2.0;

    FitTransform {
        scale,
        offset_x,
        offset_y,
    }
}

/// Final placement of content on screen once zoom and pan are applied.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl RenderTransform {
    /// Compose a fit transform with the user's zoom and pan.
    pub fn compose(fit: FitTransform, zoom: f64, pan_x: f64, pan_y: f64) -> Self {
        Self {
            scale: fit.scale * zoom,
            translate_x: fit.offset_x + pan_x,
            translate_y: fit.offset_y + pan_y,
        }
    }

    /// Map a point in content space to screen space.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.translate_x + x * self.scale,
            self.translate_y + y * self.scale,
        )
    }
}

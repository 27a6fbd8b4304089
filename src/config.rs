use std::time::Duration;

use image::imageops::FilterType;

/// Delay a parameter edit must stay untouched before it triggers re-vectorization.
pub const VECTORIZE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Largest width or height handed to the tracing engine.
pub const MAX_VECTORIZE_DIMENSION: u32 = 1024;

/// Smallest usable dimension limit; downscaled sizes never go below this.
pub const MIN_VECTORIZE_DIMENSION: u32 = 2;

/// Backdrop shown behind both panes. Display only; never affects tracing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasBackground {
    #[default]
    Dark,
    Light,
    Mid,
}

/// User-facing tracing parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorizeParams {
    /// 0-255: pixels darker than this become black in single-color mode.
    pub threshold: u8,
    /// 0.5-2: higher means smoother curves.
    pub smoothness: f64,
    /// 1-20: higher suppresses more small shapes.
    pub detail_level: u32,
    /// 0.5-2: higher means rounder corners.
    pub corner_rounding: f64,
    /// 1 traces black and white; 2-8 asks the engine to extract colors.
    pub color_count: u8,
    /// CSS-style contrast factor applied before tracing (1 = unchanged).
    pub contrast: f64,
    /// CSS-style saturation factor applied before tracing (1 = unchanged).
    pub saturation: f64,
    pub canvas_background: CanvasBackground,
}

impl Default for VectorizeParams {
    fn default() -> Self {
        Self {
            threshold: 128,
            smoothness: 1.25,
            detail_level: 2,
            corner_rounding: 1.0,
            color_count: 1,
            contrast: 1.0,
            saturation: 1.0,
            canvas_background: CanvasBackground::Dark,
        }
    }
}

impl VectorizeParams {
    /// True when `other` would produce a different trace.
    ///
    /// The canvas background is ignored.
    pub fn affects_trace(&self, other: &VectorizeParams) -> bool {
        let strip = |p: &VectorizeParams| VectorizeParams {
            canvas_background: CanvasBackground::default(),
            ..*p
        };
        strip(self) != strip(other)
    }
}

/// A single-key edit, the unit of change accepted by [`ParamsStore`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    Threshold(u8),
    Smoothness(f64),
    DetailLevel(u32),
    CornerRounding(f64),
    ColorCount(u8),
    Contrast(f64),
    Saturation(f64),
    CanvasBackground(CanvasBackground),
}

/// Holder of the live parameter values.
#[derive(Debug, Clone, Default)]
pub struct ParamsStore {
    params: VectorizeParams,
}

impl ParamsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(&self) -> VectorizeParams {
        self.params
    }

    pub fn set(&mut self, update: ParamUpdate) {
        let p = &mut self.params;
        match update {
            ParamUpdate::Threshold(v) => p.threshold = v,
            ParamUpdate::Smoothness(v) => p.smoothness = v,
            ParamUpdate::DetailLevel(v) => p.detail_level = v,
            ParamUpdate::CornerRounding(v) => p.corner_rounding = v,
            ParamUpdate::ColorCount(v) => p.color_count = v,
            ParamUpdate::Contrast(v) => p.contrast = v,
            ParamUpdate::Saturation(v) => p.saturation = v,
            ParamUpdate::CanvasBackground(v) => p.canvas_background = v,
        }
    }

    pub fn reset(&mut self) {
        self.params = VectorizeParams::default();
    }
}

/// Knobs for the preprocessing and orchestration pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    /// How long parameter edits must settle before a new run starts.
    pub debounce: Duration,
    /// Largest width or height passed to the tracing engine.
    pub max_dimension: u32,
    /// Filter used when downscaling oversized sources.
    pub resize_filter: FilterType,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            debounce: VECTORIZE_DEBOUNCE,
            max_dimension: MAX_VECTORIZE_DIMENSION,
            resize_filter: FilterType::Triangle,
        }
    }
}

impl PipelineSettings {
    /// Set the settle time for parameter edits.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the engine's dimension limit. Values below [`MIN_VECTORIZE_DIMENSION`] are raised to it.
    pub fn with_max_dimension(mut self, max_dimension: u32) -> Self {
        self.max_dimension = max_dimension.max(MIN_VECTORIZE_DIMENSION);
        self
    }

    /// Set the resampling filter used when downscaling.
    pub fn with_resize_filter(mut self, filter: FilterType) -> Self {
        self.resize_filter = filter;
        self
    }
}

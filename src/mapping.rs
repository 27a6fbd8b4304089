use crate::config::VectorizeParams;

/// Potrace-style turn policy used to resolve ambiguous path turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPolicy {
    Black,
    White,
    Left,
    Right,
    Minority,
    Majority,
    Random,
}

/// How the engine reduces colors before separating layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterizeAlgorithm {
    Simple,
    Interpolation,
}

/// Color reduction requested from the engine in multi-color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posterize {
    pub levels: u8,
    pub algorithm: PosterizeAlgorithm,
}

/// Options in the tracing engine's native ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineOptions {
    /// Speckles up to this many pixels are suppressed.
    pub turd_size: u32,
    pub turn_policy: TurnPolicy,
    /// Corner threshold; larger values round more corners.
    pub alpha_max: f64,
    /// Whether curves are joined after fitting.
    pub opti_curve: bool,
    /// Error allowed when joining curves.
    pub opt_tolerance: f64,
    pub path_only: bool,
    pub extract_colors: bool,
    /// Present only when `extract_colors` is set.
    pub posterize: Option<Posterize>,
}

/// Everything derived from [`VectorizeParams`] for one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MappedOptions {
    /// Luminance cutoff used to binarize single-color input.
    pub threshold: u8,
    pub engine: EngineOptions,
}

/// Map user-facing parameters onto tracing engine options.
///
/// Out-of-range inputs are clamped; NaN falls back to the lower bound.
pub fn map_options(params: &VectorizeParams) -> MappedOptions {
    let opt_tolerance = clamp_f64(0.1 + params.smoothness * 0.2, 0.1, 0.5);
    let turd_size = params.detail_level.min(50);
    let alpha_max = clamp_f64(params.corner_rounding, 0.1, 2.0);
    let color_count = params.color_count.clamp(1, 8);
    let extract_colors = color_count > 1;
    // already inside the engine's 1-255 level range
    let levels = color_count;

    MappedOptions {
        threshold: params.threshold,
        engine: EngineOptions {
            turd_size,
            turn_policy: TurnPolicy::Minority,
            alpha_max,
            opti_curve: true,
            opt_tolerance,
            path_only: false,
            extract_colors,
            posterize: extract_colors.then_some(Posterize {
                levels,
                algorithm: PosterizeAlgorithm::Simple,
            }),
        },
    }
}

fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.clamp(min, max)
    }
}

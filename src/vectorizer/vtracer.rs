use async_trait::async_trait;
use tracing::debug;
use visioncortex::PathSimplifyMode;
use vtracer::{ColorImage, ColorMode, Config, Hierarchical, convert};

use crate::mapping::EngineOptions;
use crate::preprocess::PixelBuffer;

use super::TracingEngine;

/// VTracer's own defaults for knobs the engine options do not cover.
const MAX_ITERATIONS: usize = 10;
const SPLICE_THRESHOLD: i32 = 45;
const PATH_PRECISION: u32 = 2;
const BINARY_COLOR_PRECISION: i32 = 6;
const BINARY_LAYER_DIFFERENCE: i32 = 16;

/// Degrees of corner threshold per unit of `alpha_max`.
const DEGREES_PER_ALPHA: f64 = 60.0;

/// Tracing engine backed by VTracer.
///
/// VTracer is a plain library, so initialization has nothing to do. Tracing
/// runs on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct VtracerEngine;

#[async_trait]
impl TracingEngine for VtracerEngine {
    async fn init(&self) -> Result<(), String> {
        Ok(())
    }

    async fn trace(&self, buffer: PixelBuffer, options: EngineOptions) -> Result<String, String> {
        tokio::task::spawn_blocking(move || trace_buffer(buffer, &options))
            .await
            .map_err(|err| format!("tracing task failed: {err}"))?
    }
}

/// Trace an RGBA buffer synchronously.
pub fn trace_buffer(buffer: PixelBuffer, options: &EngineOptions) -> Result<String, String> {
    let (width, height) = buffer.dimensions();
    let img = ColorImage {
        pixels: buffer.into_data(),
        width: width as usize,
        height: height as usize,
    };
    let cfg = config_for(options);
    debug!(
        width,
        height,
        filter_speckle = cfg.filter_speckle,
        corner_threshold = cfg.corner_threshold,
        length_threshold = cfg.length_threshold,
        color_precision = cfg.color_precision,
        "vtracer convert"
    );
    let svg_file = convert(img, cfg)?;
    Ok(svg_file.to_string())
}

/// Translate engine options into a VTracer configuration.
///
/// VTracer has no turn policy; it is ignored.
pub fn config_for(options: &EngineOptions) -> Config {
    let (color_mode, color_precision, layer_difference) = match options.posterize {
        Some(posterize) if options.extract_colors => (
            ColorMode::Color,
            color_precision(posterize.levels),
            layer_difference(posterize.levels),
        ),
        _ => (
            ColorMode::Binary,
            BINARY_COLOR_PRECISION,
            BINARY_LAYER_DIFFERENCE,
        ),
    };

    Config {
        color_mode,
        hierarchical: Hierarchical::Stacked,
        mode: if options.opti_curve {
            PathSimplifyMode::Spline
        } else {
            PathSimplifyMode::Polygon
        },
        filter_speckle: options.turd_size as usize,
        color_precision,
        layer_difference,
        corner_threshold: corner_threshold(options.alpha_max),
        length_threshold: length_threshold(options.opt_tolerance),
        max_iterations: MAX_ITERATIONS,
        splice_threshold: SPLICE_THRESHOLD,
        path_precision: Some(PATH_PRECISION),
    }
}

fn corner_threshold(alpha_max: f64) -> i32 {
    (alpha_max * DEGREES_PER_ALPHA).round().clamp(0.0, 180.0) as i32
}

/// Maps the 0.1..=0.5 tolerance range onto VTracer's 3.5..=10 segment length.
fn length_threshold(opt_tolerance: f64) -> f64 {
    let t = ((opt_tolerance - 0.1) / 0.4).clamp(0.0, 1.0);
    3.5 + t * 6.5
}

/// Significant bits per channel needed to distinguish `levels` colors.
fn color_precision(levels: u8) -> i32 {
    let levels = levels.max(2) as u32;
    (u32::BITS - (levels - 1).leading_zeros()).clamp(1, 8) as i32
}

fn layer_difference(levels: u8) -> i32 {
    256 / levels.max(1) as i32
}

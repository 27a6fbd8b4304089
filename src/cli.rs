use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use image::imageops::FilterType;
use vecna::{CanvasBackground, MAX_VECTORIZE_DIMENSION, VectorizeParams};

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug)]
pub struct GlobalOptions {
    /// Log more (-v for debug output); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    /// Largest width or height handed to the tracer; bigger images are downscaled
    #[arg(
        long = "max-dimension",
        env = "VECNA_MAX_DIMENSION",
        default_value_t = MAX_VECTORIZE_DIMENSION,
        value_parser = clap::value_parser!(u32).range(2..),
        global = true
    )]
    pub max_dimension: u32,
    /// Filter used when downscaling oversized images
    #[arg(long = "resample-filter", value_enum, default_value_t = ResampleFilter::Triangle, global = true)]
    pub resample_filter: ResampleFilter,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trace an image and save the SVG
    Trace(TraceCommand),
    /// Trace an image and copy the SVG to the clipboard
    Copy(CopyCommand),
}

/// Resampling filters for image resizing.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ResampleFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for FilterType {
    fn from(value: ResampleFilter) -> Self {
        match value {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

#[derive(Args, Debug)]
pub struct TraceCommand {
    /// Input image path (JPEG, PNG, GIF or WebP)
    pub input: PathBuf,
    /// Output SVG path (defaults to `vectorized.svg` in the current directory)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub params: ParamArgs,
}

#[derive(Args, Debug)]
pub struct CopyCommand {
    /// Input image path (JPEG, PNG, GIF or WebP)
    pub input: PathBuf,
    #[command(flatten)]
    pub params: ParamArgs,
}

/// User-facing tracing parameters, with the same ranges as the settings panel.
#[derive(Args, Debug)]
pub struct ParamArgs {
    /// Luminance cutoff for black and white tracing (0-255)
    #[arg(short, long, default_value_t = 128)]
    pub threshold: u8,
    /// Curve smoothness (0.5-2)
    #[arg(long, default_value_t = 1.25, value_parser = parse_unit_range)]
    pub smoothness: f64,
    /// Suppress shapes smaller than this many pixels (1-20)
    #[arg(long = "detail", default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub detail_level: u32,
    /// Corner rounding (0.5-2)
    #[arg(long = "corners", default_value_t = 1.0, value_parser = parse_unit_range)]
    pub corner_rounding: f64,
    /// Number of colors; 1 traces black and white (1-8)
    #[arg(short, long = "colors", default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=8))]
    pub color_count: u8,
    /// Contrast factor applied before tracing (1 = unchanged)
    #[arg(long, default_value_t = 1.0, value_parser = parse_factor)]
    pub contrast: f64,
    /// Saturation factor applied before tracing (1 = unchanged)
    #[arg(long, default_value_t = 1.0, value_parser = parse_factor)]
    pub saturation: f64,
}

impl From<&ParamArgs> for VectorizeParams {
    fn from(args: &ParamArgs) -> Self {
        Self {
            threshold: args.threshold,
            smoothness: args.smoothness,
            detail_level: args.detail_level,
            corner_rounding: args.corner_rounding,
            color_count: args.color_count,
            contrast: args.contrast,
            saturation: args.saturation,
            canvas_background: CanvasBackground::default(),
        }
    }
}

fn parse_unit_range(value: &str) -> Result<f64, String> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| format!("expected a number between 0.5 and 2, got `{value}`"))?;
    if (0.5..=2.0).contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!("{value} is out of range; expected 0.5-2"))
    }
}

fn parse_factor(value: &str) -> Result<f64, String> {
    let parsed = value
        .parse::<f64>()
        .map_err(|_| format!("expected a non-negative number, got `{value}`"))?;
    if parsed.is_finite() && parsed >= 0.0 {
        Ok(parsed)
    } else {
        Err(format!("{value} is out of range; expected a non-negative number"))
    }
}

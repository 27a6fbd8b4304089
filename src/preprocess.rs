use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use imageproc::map::map_colors;
use tracing::debug;

use crate::config::{MIN_VECTORIZE_DIMENSION, PipelineSettings};
use crate::{VecnaError, VecnaResult};

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Row-major RGBA bytes plus the dimensions they claim to describe.
///
/// Unlike [`RgbaImage`], construction does not check the length; call
/// [`PixelBuffer::validate`] before trusting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Byte length implied by the declared dimensions.
    pub fn expected_len(&self) -> usize {
        self.pixel_count().saturating_mul(BYTES_PER_PIXEL)
    }

    /// Check that dimensions are non-zero and agree with the data length.
    pub fn validate(&self) -> VecnaResult<()> {
        let expected = self.expected_len();
        if self.width == 0 || self.height == 0 || self.data.len() != expected {
            return Err(VecnaError::InvalidImageData {
                width: self.width,
                height: self.height,
                expected,
                found: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new(image.into_raw(), width, height)
    }
}

/// Contrast and saturation applied while rasterizing the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterOptions {
    pub contrast: f64,
    pub saturation: f64,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            contrast: 1.0,
            saturation: 1.0,
        }
    }
}

impl FilterOptions {
    pub fn is_identity(&self) -> bool {
        self.contrast == 1.0 && self.saturation == 1.0
    }
}

/// Pixel buffer ready for the tracing engine, plus whether it had to be shrunk.
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub buffer: PixelBuffer,
    pub was_resized: bool,
}

/// Dimensions that fit within `max` on both axes, preserving aspect ratio.
///
/// Sizes already within the limit are returned unchanged. Downscaled sizes are
/// forced even (minimum 2) since the engine misbehaves on odd sizes near the limit.
/// A `max` below [`MIN_VECTORIZE_DIMENSION`] is treated as that minimum.
pub fn resize_to_fit(width: u32, height: u32, max: u32) -> (u32, u32) {
    let max = max.max(MIN_VECTORIZE_DIMENSION);
    if width <= max && height <= max {
        return (width, height);
    }
    let scale = (max as f64 / width as f64).min(max as f64 / height as f64);
    let w = (width as f64 * scale).round() as u32;
    let h = (height as f64 * scale).round() as u32;
    ((w & !1).max(2), (h & !1).max(2))
}

/// Rasterize `source` into a tracing-ready buffer: shrink to the engine limit and apply filters.
pub fn prepare(
    source: &RgbaImage,
    filters: FilterOptions,
    settings: &PipelineSettings,
) -> VecnaResult<PreparedImage> {
    let (src_w, src_h) = source.dimensions();
    if src_w == 0 || src_h == 0 {
        return Err(VecnaError::InvalidImageData {
            width: src_w,
            height: src_h,
            expected: 0,
            found: source.as_raw().len(),
        });
    }
    debug!(width = src_w, height = src_h, "preparing source image");

    let (w, h) = resize_to_fit(src_w, src_h, settings.max_dimension);
    let was_resized = w < src_w || h < src_h;
    let sized = if was_resized {
        debug!(width = w, height = h, "resized to fit max dimension");
        resize_rgba(source, w, h, settings.resize_filter)
    } else {
        source.clone()
    };

    let filtered = if filters.is_identity() {
        sized
    } else {
        apply_filters(&sized, filters)
    };

    Ok(PreparedImage {
        buffer: filtered.into(),
        was_resized,
    })
}

fn resize_rgba(source: &RgbaImage, width: u32, height: u32, filter: FilterType) -> RgbaImage {
    imageops::resize(source, width, height, filter)
}

/// Apply CSS-style `contrast()` then `saturate()` to every pixel. Alpha is untouched.
pub fn apply_filters(image: &RgbaImage, filters: FilterOptions) -> RgbaImage {
    let FilterOptions {
        contrast,
        saturation: s,
    } = filters;
    map_colors(image, |Rgba([r, g, b, a])| {
        let [r, g, b] = [r, g, b].map(|c| ((c as f64 / 255.0 - 0.5) * contrast + 0.5) * 255.0);
        let r2 = (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b;
        let g2 = (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b;
        let b2 = (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b;
        Rgba([to_channel(r2), to_channel(g2), to_channel(b2), a])
    })
}

fn to_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Luminance of an RGBA pixel, attenuated by its alpha.
pub fn luminance(r: u8, g: u8, b: u8, a: u8) -> f64 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) * (a as f64 / 255.0)
}

/// Black/white version of `buffer`: luminance below `threshold` becomes 0, the rest 255.
///
/// Walks pixel indices rather than bytes so a short or padded buffer never
/// reads past the declared pixel count; missing bytes read as opaque black.
pub fn binarize(buffer: &PixelBuffer, threshold: u8) -> PixelBuffer {
    let pixel_count = buffer.pixel_count();
    let data = buffer.data();
    let byte = |i: usize, default: u8| data.get(i).copied().unwrap_or(default);
    let mut out = vec![0u8; pixel_count * BYTES_PER_PIXEL];

    for (p, dst) in out.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let i = p * BYTES_PER_PIXEL;
        let lum = luminance(byte(i, 0), byte(i + 1, 0), byte(i + 2, 0), byte(i + 3, 255));
        let v = if lum < threshold as f64 { 0 } else { 255 };
        dst.copy_from_slice(&[v, v, v, 255]);
    }

    PixelBuffer::new(out, buffer.width(), buffer.height())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, px: [u8; 4]) -> PixelBuffer {
        RgbaImage::from_pixel(w, h, Rgba(px)).into()
    }

    mod resize_to_fit {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn within_limit_is_unchanged() {
                assert_eq!(resize_to_fit(1024, 1024, 1024), (1024, 1024));
                assert_eq!(resize_to_fit(333, 77, 1024), (333, 77));
            }

            #[test]
            fn landscape_over_limit() {
                assert_eq!(resize_to_fit(2000, 1000, 1024), (1024, 512));
            }

            #[test]
            fn four_by_three_over_limit() {
                assert_eq!(resize_to_fit(2000, 1500, 1024), (1024, 768));
            }

            #[test]
            fn odd_result_is_made_even() {
                // 1025 x 999 -> scale 0.99902..., 1024 x 998.02 -> 998
                let (w, h) = resize_to_fit(1025, 999, 1024);
                assert_eq!((w % 2, h % 2), (0, 0));
                // 3000 x 1001 -> 1024 x 341.67 -> 342
                assert_eq!(resize_to_fit(3000, 1001, 1024), (1024, 342));
            }

            #[test]
            fn extreme_aspect_floors_at_two() {
                assert_eq!(resize_to_fit(100_000, 1, 1024), (1024, 2));
            }

            #[test]
            fn limit_below_two_still_bounds_the_result() {
                for max in [0, 1] {
                    let (w, h) = resize_to_fit(300, 100, max);
                    assert_eq!((w, h), (2, 2));
                    assert!(w <= MIN_VECTORIZE_DIMENSION && h <= MIN_VECTORIZE_DIMENSION);
                }
                assert_eq!(resize_to_fit(2, 1, 1), (2, 1));
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// resize_to_fit: downscaled sizes fit, are even, and keep the aspect ratio
                #[test]
                fn downscaled_sizes_fit_and_are_even(
                    w in 1025u32..8000,
                    h in 2u32..8000
                ) {
                    let (rw, rh) = resize_to_fit(w, h, 1024);
                    prop_assert!(rw <= 1024 && rh <= 1024);
                    prop_assert_eq!(rw % 2, 0);
                    prop_assert_eq!(rh % 2, 0);

                    let scale = (1024.0 / w as f64).min(1024.0 / h as f64);
                    prop_assert!((rw as f64 - w as f64 * scale).abs() <= 2.0);
                    prop_assert!((rh as f64 - h as f64 * scale).abs() <= 2.0);
                }
            }
        }
    }

    mod binarize {
        use super::*;

        mod unit {
            use super::*;

            #[test]
            fn white_opaque_becomes_white() {
                let out = binarize(&solid(1, 1, [255, 255, 255, 255]), 128);
                assert_eq!(out.data(), &[255, 255, 255, 255]);
            }

            #[test]
            fn black_opaque_becomes_black() {
                let out = binarize(&solid(1, 1, [0, 0, 0, 255]), 128);
                assert_eq!(out.data(), &[0, 0, 0, 255]);
            }

            #[test]
            fn transparent_pixels_read_as_black() {
                let out = binarize(&solid(1, 1, [255, 255, 255, 0]), 1);
                assert_eq!(out.data(), &[0, 0, 0, 255]);
            }

            #[test]
            fn luminance_equal_to_threshold_is_white() {
                // 0.299*100 + 0.587*100 + 0.114*100 = 100
                let out = binarize(&solid(1, 1, [100, 100, 100, 255]), 100);
                assert_eq!(out.data()[0], 255);
            }

            #[test]
            fn green_weighs_more_than_blue() {
                let green = binarize(&solid(1, 1, [0, 255, 0, 255]), 128);
                let blue = binarize(&solid(1, 1, [0, 0, 255, 255]), 128);
                assert_eq!(green.data()[0], 255);
                assert_eq!(blue.data()[0], 0);
            }

            #[test]
            fn padded_buffer_is_not_read_past_pixel_count() {
                let mut data = vec![255u8; 2 * 4];
                data.extend_from_slice(&[0, 0, 0, 0, 9, 9]);
                let out = binarize(&PixelBuffer::new(data, 2, 1), 128);
                assert_eq!(out.data().len(), 8);
                assert_eq!(out.data(), &[255, 255, 255, 255, 255, 255, 255, 255]);
            }

            #[test]
            fn short_buffer_defaults_to_opaque_black() {
                let out = binarize(&PixelBuffer::new(vec![255, 255, 255, 255], 2, 1), 128);
                assert_eq!(out.data(), &[255, 255, 255, 255, 0, 0, 0, 255]);
            }
        }

        mod prop {
            use super::*;
            use proptest::prelude::*;

            proptest! {
                /// binarize: output channels are 0 or 255 and alpha is always 255
                #[test]
                fn output_is_binary_and_opaque(
                    pixels in proptest::collection::vec(proptest::num::u8::ANY, 4..400),
                    threshold in proptest::num::u8::ANY
                ) {
                    let width = (pixels.len() / 4) as u32;
                    let data = pixels[..width as usize * 4].to_vec();
                    let out = binarize(&PixelBuffer::new(data, width, 1), threshold);

                    prop_assert_eq!(out.data().len(), width as usize * 4);
                    for px in out.data().chunks_exact(4) {
                        prop_assert!(px[0] == 0 || px[0] == 255);
                        prop_assert_eq!(px[0], px[1]);
                        prop_assert_eq!(px[1], px[2]);
                        prop_assert_eq!(px[3], 255);
                    }
                }
            }
        }
    }

    mod validate {
        use super::*;

        #[test]
        fn matching_length_is_valid() {
            assert!(solid(3, 2, [1, 2, 3, 4]).validate().is_ok());
        }

        #[test]
        fn mismatched_length_is_rejected() {
            let err = PixelBuffer::new(vec![0; 10], 2, 2).validate().unwrap_err();
            match err {
                VecnaError::InvalidImageData {
                    expected, found, ..
                } => {
                    assert_eq!(expected, 16);
                    assert_eq!(found, 10);
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }

        #[test]
        fn zero_dimension_is_rejected() {
            assert!(PixelBuffer::new(Vec::new(), 0, 5).validate().is_err());
        }
    }

    mod filters {
        use super::*;

        #[test]
        fn identity_filters_leave_pixels_alone() {
            let img = RgbaImage::from_pixel(2, 2, Rgba([10, 120, 240, 200]));
            let out = apply_filters(&img, FilterOptions::default());
            assert_eq!(out, img);
        }

        #[test]
        fn zero_contrast_is_mid_gray() {
            let img = RgbaImage::from_pixel(1, 1, Rgba([0, 255, 30, 77]));
            let out = apply_filters(
                &img,
                FilterOptions {
                    contrast: 0.0,
                    saturation: 1.0,
                },
            );
            assert_eq!(out.get_pixel(0, 0).0, [128, 128, 128, 77]);
        }

        #[test]
        fn zero_saturation_is_grayscale() {
            let img = RgbaImage::from_pixel(1, 1, Rgba([200, 40, 90, 255]));
            let out = apply_filters(
                &img,
                FilterOptions {
                    contrast: 1.0,
                    saturation: 0.0,
                },
            );
            let [r, g, b, a] = out.get_pixel(0, 0).0;
            assert_eq!(r, g);
            assert_eq!(g, b);
            assert_eq!(a, 255);
        }
    }

    mod prepare {
        use super::*;

        #[test]
        fn oversized_source_is_shrunk_and_flagged() {
            let img = RgbaImage::from_pixel(2000, 1500, Rgba([0, 0, 0, 255]));
            let prepared = prepare(&img, FilterOptions::default(), &PipelineSettings::default())
                .unwrap();
            assert!(prepared.was_resized);
            assert_eq!(prepared.buffer.dimensions(), (1024, 768));
            assert!(prepared.buffer.validate().is_ok());
        }

        #[test]
        fn small_source_is_passed_through() {
            let img = RgbaImage::from_pixel(5, 3, Rgba([1, 2, 3, 4]));
            let prepared = prepare(&img, FilterOptions::default(), &PipelineSettings::default())
                .unwrap();
            assert!(!prepared.was_resized);
            assert_eq!(prepared.buffer.data(), img.as_raw().as_slice());
        }

        #[test]
        fn custom_limit_is_honored() {
            let img = RgbaImage::from_pixel(100, 50, Rgba([1, 2, 3, 4]));
            let settings = PipelineSettings::default().with_max_dimension(20);
            let prepared = prepare(&img, FilterOptions::default(), &settings).unwrap();
            assert_eq!(prepared.buffer.dimensions(), (20, 10));
        }

        #[test]
        fn empty_source_is_rejected() {
            let img = RgbaImage::new(0, 0);
            assert!(prepare(&img, FilterOptions::default(), &PipelineSettings::default()).is_err());
        }
    }
}

//! Background-to-alpha conversion.
//!
//! Turns background-coloured pixels of a cropped sprite into transparency.
//! Policies only ever touch the alpha channel; RGB values are left exactly
//! as they were, so a region with no background-matching pixel passes
//! through unchanged.

use image::{GrayImage, RgbaImage};
use imageproc::filter::gaussian_blur_f32;

use crate::config::{BackgroundRemoval, RemovalMethod};

/// Sigma of the alpha-channel blur that softens colour-key edges.
const EDGE_BLUR_SIGMA: f32 = 0.5;

/// Interchangeable background removal policies.
#[derive(Debug, Clone, PartialEq)]
pub enum AlphaPolicy {
    /// Pixels within a Manhattan-distance tolerance of the reference colour
    /// become transparent; the alpha channel is then lightly blurred to
    /// avoid jagged edges.
    ColorKey { color: [u8; 3], tolerance: u32 },

    /// Whiteness-graded transparency: min(R,G,B) at or above `high` is fully
    /// transparent, between `low` and `high` linearly interpolated, below
    /// `low` fully opaque.
    Graduated { low: u8, high: u8 },
}

impl AlphaPolicy {
    /// Resolve the configured removal method to an executable policy.
    ///
    /// Returns the policy and whether a fallback was taken. `matte` needs an
    /// external matting backend that is not linked into this build, so it
    /// resolves to colour keying, the first entry in its fallback order.
    pub fn from_config(background: &BackgroundRemoval) -> (Self, bool) {
        match background.method {
            RemovalMethod::ColorKey => (
                Self::ColorKey {
                    color: background.color_key,
                    tolerance: background.tolerance,
                },
                false,
            ),
            RemovalMethod::Graduated => (
                Self::Graduated {
                    low: background.graduated_low,
                    high: background.graduated_high,
                },
                false,
            ),
            RemovalMethod::Matte => (
                Self::ColorKey {
                    color: background.color_key,
                    tolerance: background.tolerance,
                },
                true,
            ),
        }
    }

    /// Apply the policy to a cropped sprite image in place.
    pub fn apply(&self, image: &mut RgbaImage) {
        match *self {
            Self::ColorKey { color, tolerance } => color_key(image, color, tolerance),
            Self::Graduated { low, high } => graduated(image, low, high),
        }
    }
}

fn color_key(image: &mut RgbaImage, color: [u8; 3], tolerance: u32) {
    let limit = tolerance * 3;
    let mut keyed = false;

    for pixel in image.pixels_mut() {
        let distance: u32 = (0..3)
            .map(|c| (pixel[c] as i32 - color[c] as i32).unsigned_abs())
            .sum();
        if distance <= limit {
            pixel[3] = 0;
            keyed = true;
        }
    }

    // Soften the hard cutoff. Skipped when nothing was keyed so an
    // untouched sprite stays bit-identical.
    if keyed {
        blur_alpha(image, EDGE_BLUR_SIGMA);
    }
}

fn graduated(image: &mut RgbaImage, low: u8, high: u8) {
    let span = (high - low) as f32;

    for pixel in image.pixels_mut() {
        let whiteness = pixel[0].min(pixel[1]).min(pixel[2]);
        if whiteness >= high {
            pixel[3] = 0;
        } else if whiteness >= low {
            let t = (whiteness - low) as f32 / span;
            pixel[3] = (255.0 * (1.0 - t)).round() as u8;
        }
    }
}

/// Gaussian-blur the alpha channel only, leaving RGB untouched.
fn blur_alpha(image: &mut RgbaImage, sigma: f32) {
    let (width, height) = image.dimensions();

    let mut alpha = GrayImage::new(width, height);
    for (a, p) in alpha.iter_mut().zip(image.pixels()) {
        *a = p[3];
    }

    let blurred = gaussian_blur_f32(&alpha, sigma);

    for (p, a) in image.pixels_mut().zip(blurred.iter()) {
        p[3] = *a;
    }
}

//! Foreground mask construction.
//!
//! Turns a raw sheet image into a binary mask (255 = foreground) by fusing
//! several independent cues with OR, so any one strong signal is enough to
//! mark a pixel. The fused mask is then closed (bridging gaps inside a
//! silhouette) and opened (dropping isolated noise). The whole stage is a
//! pure function: the same image and parameters always produce the same mask.

use image::{imageops, GrayImage, RgbaImage};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::{box_filter, gaussian_blur_f32};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use imageproc::morphology::{close, open};

/// Gaussian pre-blur sigmas for the edge cue. Sigma 0 is the unblurred
/// image; larger sigmas pick up softer, wider edges.
const EDGE_SCALES: [f32; 3] = [0.0, 1.0, 2.0];

/// Parameters for mask construction.
///
/// Defaults target the common case of dark sprites on a near-white sheet.
#[derive(Debug, Clone)]
pub struct MaskParams {
    /// Fixed luma cutoff: pixels at or below it are foreground.
    pub global_cutoff: u8,

    /// Radius of the local-mean window for adaptive thresholding.
    pub adaptive_radius: u32,

    /// How far below the local mean a pixel must be to count as foreground.
    pub adaptive_offset: u8,

    /// Reference background colour.
    pub background: [u8; 3],

    /// Per-channel colour tolerance; Manhattan distance above
    /// `3 * color_tolerance` marks a pixel foreground.
    pub color_tolerance: u32,

    /// Sobel gradient magnitude above which a pixel is an edge.
    pub edge_threshold: f32,

    /// Morphological gradient (local 3x3 max minus min) cutoff.
    pub gradient_threshold: u8,
}

impl Default for MaskParams {
    fn default() -> Self {
        Self {
            global_cutoff: 240,
            adaptive_radius: 5,
            adaptive_offset: 2,
            background: [255, 255, 255],
            color_tolerance: 30,
            edge_threshold: 320.0,
            gradient_threshold: 10,
        }
    }
}

impl MaskParams {
    /// Parameters for a specific background colour and keying tolerance.
    pub fn for_background(background: [u8; 3], tolerance: u32) -> Self {
        Self {
            background,
            color_tolerance: tolerance,
            ..Self::default()
        }
    }
}

/// Build a binary foreground mask for a sheet image.
pub fn build_mask(sheet: &RgbaImage, params: &MaskParams) -> GrayImage {
    let gray = imageops::grayscale(sheet);

    // Cue (a): fixed global threshold. BinaryInverted keeps everything at or
    // below the cutoff, i.e. anything darker than the background.
    let mut mask = threshold(&gray, params.global_cutoff, ThresholdType::BinaryInverted);

    // Cue (b): adaptive local threshold, robust to uneven lighting.
    or_assign(&mut mask, &adaptive_cue(&gray, params));

    // Cue (c): colour distance from the reference background.
    or_assign(&mut mask, &color_cue(sheet, params));

    // Cue (d): edge magnitude at multiple sensitivity scales.
    for sigma in EDGE_SCALES {
        let source = if sigma > 0.0 {
            gaussian_blur_f32(&gray, sigma)
        } else {
            gray.clone()
        };
        or_assign(&mut mask, &edge_cue(&source, params.edge_threshold));
    }

    // Cue (e): morphological gradient marks object boundaries.
    or_assign(&mut mask, &gradient_cue(&gray, params.gradient_threshold));

    // Close bridges small gaps inside a silhouette, open removes isolated
    // noise pixels. Order matters: closing first keeps thin limbs connected.
    let mask = close(&mask, Norm::LInf, 1);
    open(&mask, Norm::LInf, 1)
}

/// OR `src` into `dst`: any foreground pixel in either is foreground.
fn or_assign(dst: &mut GrayImage, src: &GrayImage) {
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        if *s > 0 {
            *d = 255;
        }
    }
}

/// Foreground where a pixel sits below its local mean by at least the
/// configured offset. The offset keeps near-uniform background areas out of
/// the mask, where a plain mean comparison would flicker.
fn adaptive_cue(gray: &GrayImage, params: &MaskParams) -> GrayImage {
    let means = box_filter(gray, params.adaptive_radius, params.adaptive_radius);
    let mut out = GrayImage::new(gray.width(), gray.height());

    for ((o, p), m) in out.iter_mut().zip(gray.iter()).zip(means.iter()) {
        if (*p as i16) < (*m as i16) - (params.adaptive_offset as i16) {
            *o = 255;
        }
    }

    out
}

/// Foreground where the Manhattan RGB distance from the background colour
/// exceeds the tolerance across all three channels.
fn color_cue(sheet: &RgbaImage, params: &MaskParams) -> GrayImage {
    let limit = params.color_tolerance * 3;
    let mut out = GrayImage::new(sheet.width(), sheet.height());

    for (o, p) in out.iter_mut().zip(sheet.pixels()) {
        let distance: u32 = (0..3)
            .map(|c| (p[c] as i32 - params.background[c] as i32).unsigned_abs())
            .sum();
        if distance > limit {
            *o = 255;
        }
    }

    out
}

/// Foreground where the Sobel gradient magnitude exceeds the threshold.
fn edge_cue(gray: &GrayImage, edge_threshold: f32) -> GrayImage {
    let gx = horizontal_sobel(gray);
    let gy = vertical_sobel(gray);
    let mut out = GrayImage::new(gray.width(), gray.height());

    for ((o, x), y) in out.iter_mut().zip(gx.iter()).zip(gy.iter()) {
        let magnitude = ((*x as f32).powi(2) + (*y as f32).powi(2)).sqrt();
        if magnitude > edge_threshold {
            *o = 255;
        }
    }

    out
}

/// Foreground where the local 3x3 max-minus-min exceeds the threshold.
fn gradient_cue(gray: &GrayImage, gradient_threshold: u8) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut out = GrayImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut lo = u8::MAX;
            let mut hi = u8::MIN;
            for dy in -1i64..=1 {
                for dx in -1i64..=1 {
                    let nx = x as i64 + dx;
                    let ny = y as i64 + dy;
                    if nx < 0 || ny < 0 || nx >= width as i64 || ny >= height as i64 {
                        continue;
                    }
                    let v = gray.get_pixel(nx as u32, ny as u32)[0];
                    lo = lo.min(v);
                    hi = hi.max(v);
                }
            }
            if hi - lo > gradient_threshold {
                out.put_pixel(x, y, image::Luma([255]));
            }
        }
    }

    out
}

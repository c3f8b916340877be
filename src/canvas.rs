//! Canvas normalization.
//!
//! Trims a background-free sprite to its opaque content, scales it to fit a
//! fixed output canvas without distorting its aspect ratio, and pastes it
//! centered horizontally and anchored to the canvas bottom. Bottom anchoring
//! keeps a character's feet on the same canvas row across all poses, which
//! is what makes on-screen placement consistent.

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Extra pixels kept around the opaque bounding box to avoid tight crops.
const TRIM_MARGIN: u32 = 5;

/// Normalize a sprite onto a transparent canvas of exactly `target_w` x
/// `target_h`. A fully transparent input yields an empty canvas.
pub fn normalize(sprite: &RgbaImage, target_w: u32, target_h: u32) -> RgbaImage {
    let mut canvas = RgbaImage::new(target_w, target_h);

    let Some((bx, by, bw, bh)) = opaque_bounds(sprite) else {
        return canvas;
    };

    // Expand by the trim margin, clamped to the source
    let x0 = bx.saturating_sub(TRIM_MARGIN);
    let y0 = by.saturating_sub(TRIM_MARGIN);
    let x1 = (bx + bw + TRIM_MARGIN).min(sprite.width());
    let y1 = (by + bh + TRIM_MARGIN).min(sprite.height());

    let cropped = imageops::crop_imm(sprite, x0, y0, x1 - x0, y1 - y0).to_image();

    // Uniform scale: fit inside the target without overflow in either axis
    let scale = (target_w as f32 / cropped.width() as f32)
        .min(target_h as f32 / cropped.height() as f32);

    let new_w = ((cropped.width() as f32 * scale).round() as u32).clamp(1, target_w);
    let new_h = ((cropped.height() as f32 * scale).round() as u32).clamp(1, target_h);

    let resized = imageops::resize(&cropped, new_w, new_h, FilterType::Lanczos3);

    // Center horizontally, anchor to the bottom
    let paste_x = (target_w - new_w) / 2;
    let paste_y = target_h - new_h;
    imageops::overlay(&mut canvas, &resized, paste_x as i64, paste_y as i64);

    canvas
}

/// Bounding box `(x, y, w, h)` of pixels with non-zero alpha, or `None`
/// when the image is fully transparent.
pub fn opaque_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut any = false;

    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] > 0 {
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            any = true;
        }
    }

    any.then(|| (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Transparent image with an opaque block at the given position.
    fn sprite_with_block(w: u32, h: u32, bx: u32, by: u32, bw: u32, bh: u32) -> RgbaImage {
        let mut img = RgbaImage::new(w, h);
        for y in by..by + bh {
            for x in bx..bx + bw {
                img.put_pixel(x, y, Rgba([120, 40, 40, 255]));
            }
        }
        img
    }

    #[test]
    fn test_opaque_bounds_block() {
        let img = sprite_with_block(50, 50, 10, 20, 15, 12);
        assert_eq!(opaque_bounds(&img), Some((10, 20, 15, 12)));
    }

    #[test]
    fn test_opaque_bounds_fully_transparent() {
        let img = RgbaImage::new(20, 20);
        assert_eq!(opaque_bounds(&img), None);
    }

    #[test]
    fn test_output_size_is_exact() {
        for (w, h) in [(10u32, 200u32), (200, 10), (64, 64), (1, 1)] {
            let sprite = sprite_with_block(w.max(8), h.max(8), 0, 0, w.max(8) / 2, h.max(8) / 2);
            let out = normalize(&sprite, 96, 96);
            assert_eq!(out.dimensions(), (96, 96));
        }
    }

    #[test]
    fn test_fully_transparent_input() {
        let out = normalize(&RgbaImage::new(32, 32), 96, 96);
        assert_eq!(out.dimensions(), (96, 96));
        assert!(out.pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        // Tall sprite with no transparent border, so the cropped box is the
        // whole image and the output bounds are crisp
        let sprite = sprite_with_block(30, 90, 0, 0, 30, 90);
        let out = normalize(&sprite, 96, 96);

        let (_, _, w, h) = opaque_bounds(&out).unwrap();
        let source_ratio = 30.0 / 90.0;
        let out_ratio = w as f32 / h as f32;
        assert!(
            (out_ratio - source_ratio).abs() / source_ratio < 0.01,
            "ratio drifted: {} vs {}",
            out_ratio,
            source_ratio
        );
    }

    #[test]
    fn test_bottom_anchored() {
        // Downscaled case: the trim margin shrinks with the sprite, so the
        // content bottom lands within the margin of the canvas bottom
        let sprite = sprite_with_block(300, 300, 50, 50, 200, 200);
        let out = normalize(&sprite, 96, 96);

        let (_, y, _, h) = opaque_bounds(&out).unwrap();
        let bottom_gap = 96 - (y + h);
        assert!(
            bottom_gap <= TRIM_MARGIN,
            "content floats {} px above bottom",
            bottom_gap
        );
    }

    #[test]
    fn test_horizontally_centered() {
        let sprite = sprite_with_block(30, 90, 0, 0, 30, 90);
        let out = normalize(&sprite, 96, 96);

        let (x, _, w, _) = opaque_bounds(&out).unwrap();
        let left_gap = x;
        let right_gap = 96 - (x + w);
        assert!(
            left_gap.abs_diff(right_gap) <= 1,
            "off-center: left {} right {}",
            left_gap,
            right_gap
        );
    }

    #[test]
    fn test_small_sprite_upscaled() {
        // A 10x10 block scales up to fill the target
        let sprite = sprite_with_block(20, 20, 5, 5, 10, 10);
        let out = normalize(&sprite, 96, 96);

        let (_, _, w, h) = opaque_bounds(&out).unwrap();
        assert!(w > 40 && h > 40, "expected upscaling, got {}x{}", w, h);
    }
}

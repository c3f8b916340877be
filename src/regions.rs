//! Candidate region detection and overlap filtering.
//!
//! Finds connected foreground components in a mask, computes their bounding
//! boxes and shape metrics, and filters out components that cannot be
//! sprites (too small, too large, too thin, too sparse, or spanning the
//! whole sheet). A second pass deduplicates regions that mutually overlap,
//! which happens when several mask cues fire on the same sprite.

use image::{GrayImage, Luma};
use imageproc::region_labelling::{connected_components, Connectivity};

/// A detected sprite candidate: bounding box plus shape metrics.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
    /// Foreground pixel count of the component.
    pub area: u32,
    /// Width over height.
    pub aspect_ratio: f32,
    /// Area over bounding-box area (fill ratio).
    pub extent: f32,
}

impl CandidateRegion {
    /// Intersection area with another region's bounding box.
    fn intersection(&self, other: &CandidateRegion) -> u32 {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = (self.x + self.w).min(other.x + other.w);
        let bottom = (self.y + self.h).min(other.y + other.h);

        if left >= right || top >= bottom {
            0
        } else {
            (right - left) * (bottom - top)
        }
    }

    /// Intersection area over the smaller of the two bounding-box areas.
    pub fn overlap_ratio(&self, other: &CandidateRegion) -> f32 {
        let intersection = self.intersection(other);
        let smaller = (self.w * self.h).min(other.w * other.h);
        if smaller == 0 {
            0.0
        } else {
            intersection as f32 / smaller as f32
        }
    }
}

/// Shape filters applied to detected components.
#[derive(Debug, Clone)]
pub struct RegionFilters {
    pub min_area: u32,
    pub max_area: u32,
    pub aspect_min: f32,
    pub aspect_max: f32,
    pub extent_min: f32,
    pub min_width: u32,
    pub min_height: u32,
    /// A region wider or taller than this fraction of the sheet is a
    /// whole-image false positive.
    pub max_frac: f32,
}

impl Default for RegionFilters {
    fn default() -> Self {
        Self {
            min_area: 800,
            max_area: 50_000,
            aspect_min: 0.2,
            aspect_max: 5.0,
            extent_min: 0.1,
            min_width: 30,
            min_height: 40,
            max_frac: 0.9,
        }
    }
}

/// Accumulated bounds for one component label.
struct ComponentAcc {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    area: u32,
}

/// Detect candidate regions in a binary mask.
///
/// Components are discovered in label order (raster order of their first
/// pixel); final ordering is a later concern of the overlap filter and grid
/// assignment.
pub fn detect_regions(mask: &GrayImage, filters: &RegionFilters) -> Vec<CandidateRegion> {
    let (width, height) = mask.dimensions();
    let labels = connected_components(mask, Connectivity::Eight, Luma([0u8]));

    let mut components: Vec<Option<ComponentAcc>> = Vec::new();

    for (x, y, label) in labels.enumerate_pixels() {
        let label = label[0] as usize;
        if label == 0 {
            continue;
        }
        if components.len() < label {
            components.resize_with(label, || None);
        }
        match &mut components[label - 1] {
            Some(acc) => {
                acc.min_x = acc.min_x.min(x);
                acc.min_y = acc.min_y.min(y);
                acc.max_x = acc.max_x.max(x);
                acc.max_y = acc.max_y.max(y);
                acc.area += 1;
            }
            slot => {
                *slot = Some(ComponentAcc {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                    area: 1,
                });
            }
        }
    }

    let max_w = (width as f32 * filters.max_frac) as u32;
    let max_h = (height as f32 * filters.max_frac) as u32;

    components
        .into_iter()
        .flatten()
        .filter_map(|acc| {
            let w = acc.max_x - acc.min_x + 1;
            let h = acc.max_y - acc.min_y + 1;
            let aspect_ratio = w as f32 / h as f32;
            let extent = acc.area as f32 / (w * h) as f32;

            let keep = acc.area >= filters.min_area
                && acc.area <= filters.max_area
                && aspect_ratio > filters.aspect_min
                && aspect_ratio < filters.aspect_max
                && extent > filters.extent_min
                && w > filters.min_width
                && h > filters.min_height
                && w < max_w
                && h < max_h;

            keep.then_some(CandidateRegion {
                x: acc.min_x,
                y: acc.min_y,
                w,
                h,
                area: acc.area,
                aspect_ratio,
                extent,
            })
        })
        .collect()
}

/// Deduplicate regions that mutually overlap.
///
/// Regions are walked in descending area order (stable, so discovery order
/// breaks ties) and greedily accepted unless their overlap ratio with an
/// already-accepted region exceeds 0.5, so the larger region wins.
pub fn filter_overlaps(mut regions: Vec<CandidateRegion>) -> Vec<CandidateRegion> {
    regions.sort_by(|a, b| b.area.cmp(&a.area));

    let mut accepted: Vec<CandidateRegion> = Vec::with_capacity(regions.len());

    for region in regions {
        let duplicate = accepted
            .iter()
            .any(|kept| region.overlap_ratio(kept) > 0.5);
        if !duplicate {
            accepted.push(region);
        }
    }

    accepted
}

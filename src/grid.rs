//! Grid inference and slot assignment.
//!
//! Clusters deduplicated regions into rows by vertical position, estimates
//! the sheet's row/column counts from the clusters, and assigns each region
//! a unique `(row, col)` slot. When the inferred layout disagrees with the
//! candidate count by more than 30%, the configured manual grid is used
//! instead.

use crate::regions::CandidateRegion;

/// Row/column counts of a sprite sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub rows: u32,
    pub cols: u32,
}

impl GridLayout {
    pub fn new(rows: u32, cols: u32) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells.
    pub fn cells(&self) -> u32 {
        self.rows * self.cols
    }
}

/// A region paired with its grid cell.
#[derive(Debug, Clone)]
pub struct SpriteSlot {
    pub region: CandidateRegion,
    pub row: u32,
    pub col: u32,
}

/// Maximum relative deviation between inferred cell count and candidate
/// count before the inferred layout is discarded.
const LAYOUT_DEVIATION: f32 = 0.3;

/// Infer a grid layout from region positions.
///
/// Regions are clustered into rows by grouping adjacent y-positions within
/// `row_tolerance` pixels. The column count is the modal cluster size, the
/// row count the number of clusters. Falls back to `fallback` when there are
/// no regions or the inferred layout misfits the candidate count.
pub fn infer_layout(
    regions: &[CandidateRegion],
    fallback: GridLayout,
    row_tolerance: u32,
) -> GridLayout {
    if regions.is_empty() {
        return fallback;
    }

    let clusters = cluster_rows(regions, row_tolerance);

    let rows = clusters.len() as u32;
    let cols = modal_size(&clusters);
    let inferred = GridLayout::new(rows, cols);

    let candidates = regions.len() as f32;
    let deviation = (inferred.cells() as f32 - candidates).abs();
    if deviation > candidates * LAYOUT_DEVIATION {
        fallback
    } else {
        inferred
    }
}

/// Assign each region a unique grid slot.
///
/// Regions are ordered by row cluster, then by x within the cluster. When
/// more candidates exist than cells, only the first `rows * cols` in that
/// order are kept; the rest are dropped by policy, not by accident.
pub fn assign_slots(
    regions: Vec<CandidateRegion>,
    layout: GridLayout,
    row_tolerance: u32,
) -> Vec<SpriteSlot> {
    let clusters = cluster_rows(&regions, row_tolerance);

    clusters
        .into_iter()
        .flatten()
        .take(layout.cells() as usize)
        .enumerate()
        .map(|(i, region)| SpriteSlot {
            region,
            row: i as u32 / layout.cols,
            col: i as u32 % layout.cols,
        })
        .collect()
}

/// Group regions into row clusters by y-position.
///
/// Output clusters are ordered top to bottom; each cluster is sorted by x.
/// A region joins the current cluster when its y is within `row_tolerance`
/// of the cluster's first region.
fn cluster_rows(regions: &[CandidateRegion], row_tolerance: u32) -> Vec<Vec<CandidateRegion>> {
    let mut sorted: Vec<CandidateRegion> = regions.to_vec();
    sorted.sort_by_key(|r| (r.y, r.x));

    let mut clusters: Vec<Vec<CandidateRegion>> = Vec::new();

    for region in sorted {
        match clusters.last_mut() {
            Some(cluster) if region.y.abs_diff(cluster[0].y) <= row_tolerance => {
                cluster.push(region);
            }
            _ => clusters.push(vec![region]),
        }
    }

    for cluster in &mut clusters {
        cluster.sort_by_key(|r| r.x);
    }

    clusters
}

/// Most frequent cluster size; ties go to the larger size.
fn modal_size(clusters: &[Vec<CandidateRegion>]) -> u32 {
    let mut best = (0usize, 0usize); // (count, size)

    for cluster in clusters {
        let size = cluster.len();
        let count = clusters.iter().filter(|c| c.len() == size).count();
        if (count, size) > best {
            best = (count, size);
        }
    }

    best.1 as u32
}

//! Sheet processing pipeline.
//!
//! Drives one character sheet through mask building, region detection,
//! overlap filtering, grid assignment, background removal, and canvas
//! normalization, yielding named sprites ready to write out. Batch mode
//! runs independent sheets in parallel and merges their results in a
//! single aggregation step, so one bad sheet never corrupts another's
//! output.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};
use rayon::prelude::*;
use walkdir::WalkDir;

use crate::alpha::AlphaPolicy;
use crate::canvas;
use crate::config::SliceConfig;
use crate::error::{Result, SheetError};
use crate::grid::{assign_slots, infer_layout, GridLayout};
use crate::mask::{build_mask, MaskParams};
use crate::naming::NamingTable;
use crate::regions::{detect_regions, filter_overlaps, RegionFilters};

/// A fully processed sprite: normalized pixels plus placement metadata.
#[derive(Debug, Clone)]
pub struct ExtractedSprite {
    /// Semantic name, e.g. `hero_walk_left`.
    pub name: String,

    /// RGBA pixels at exactly the configured sprite size.
    pub pixels: RgbaImage,

    /// Region bounds `[x, y, w, h]` on the source sheet, before padding.
    pub source_bounds: [u32; 4],

    /// Grid cell `(row, col)` the sprite was assigned.
    pub slot: (u32, u32),
}

/// One sheet that failed during batch processing.
#[derive(Debug)]
pub struct SheetFailure {
    pub path: PathBuf,
    pub error: SheetError,
}

/// Aggregated result of a batch run.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Extracted sprites per character, in character name order.
    pub characters: BTreeMap<String, Vec<ExtractedSprite>>,

    /// Sheets that could not be processed.
    pub failures: Vec<SheetFailure>,
}

impl BatchResult {
    /// Total sprite count across all characters.
    pub fn total_sprites(&self) -> usize {
        self.characters.values().map(Vec::len).sum()
    }
}

/// Load a sheet image as RGBA.
pub fn load_sheet(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).map_err(|e| SheetError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(image.to_rgba8())
}

/// Process one sheet into named sprites.
///
/// Returns an empty vector when no candidate region survives filtering;
/// a reportable condition, not an error.
pub fn process_sheet(
    sheet: &RgbaImage,
    character: &str,
    config: &SliceConfig,
) -> Result<Vec<ExtractedSprite>> {
    let table = NamingTable::from_config(&config.naming)?;
    let (policy, _) = AlphaPolicy::from_config(&config.background);

    let params = MaskParams::for_background(config.background.color_key, config.background.tolerance);
    let mask = build_mask(sheet, &params);

    let candidates = detect_regions(&mask, &RegionFilters::default());
    let candidates = filter_overlaps(candidates);

    let fallback = GridLayout::new(config.grid.manual_rows, config.grid.manual_cols);
    let layout = if config.grid.auto_detect {
        infer_layout(&candidates, fallback, config.grid.row_tolerance)
    } else {
        fallback
    };

    let slots = assign_slots(candidates, layout, config.grid.row_tolerance);

    let mut sprites = Vec::with_capacity(slots.len());
    for slot in slots {
        let r = &slot.region;

        // Pad the crop so anti-aliased fringes survive, clamped to the sheet
        let x0 = r.x.saturating_sub(config.padding);
        let y0 = r.y.saturating_sub(config.padding);
        let x1 = (r.x + r.w + config.padding).min(sheet.width());
        let y1 = (r.y + r.h + config.padding).min(sheet.height());

        let mut crop = imageops::crop_imm(sheet, x0, y0, x1 - x0, y1 - y0).to_image();
        policy.apply(&mut crop);

        let pixels = canvas::normalize(&crop, config.sprite_size[0], config.sprite_size[1]);

        sprites.push(ExtractedSprite {
            name: table.resolve(character, slot.row, slot.col),
            pixels,
            source_bounds: [r.x, r.y, r.w, r.h],
            slot: (slot.row, slot.col),
        });
    }

    Ok(sprites)
}

/// Process every sheet image found under a directory.
///
/// Sheets run as independent parallel jobs; results are merged here, on a
/// single thread, once all jobs finish. A failing sheet is recorded and the
/// rest continue.
pub fn process_batch(dir: &Path, config: &SliceConfig) -> Result<BatchResult> {
    if !dir.is_dir() {
        return Err(SheetError::Io {
            path: dir.to_path_buf(),
            message: "Not a directory".to_string(),
        });
    }

    let sheets = find_sheets(dir);

    let outcomes: Vec<(PathBuf, Result<Vec<ExtractedSprite>>)> = sheets
        .into_par_iter()
        .map(|path| {
            let outcome = load_sheet(&path)
                .and_then(|sheet| process_sheet(&sheet, &character_name(&path), config));
            (path, outcome)
        })
        .collect();

    let mut result = BatchResult::default();
    for (path, outcome) in outcomes {
        match outcome {
            Ok(sprites) => {
                result.characters.insert(character_name(&path), sprites);
            }
            Err(error) => result.failures.push(SheetFailure { path, error }),
        }
    }

    Ok(result)
}

/// Recursively find sheet images (png/jpg/jpeg, any case), sorted by path.
pub fn find_sheets(dir: &Path) -> Vec<PathBuf> {
    let mut sheets: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| {
                    let e = e.to_ascii_lowercase();
                    e == "png" || e == "jpg" || e == "jpeg"
                })
                .unwrap_or(false)
        })
        .collect();

    sheets.sort();
    sheets
}

/// Character name for a sheet: its file stem.
pub fn character_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("sheet")
        .to_string()
}

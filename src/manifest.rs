//! Asset manifest generation.
//!
//! After a batch run, one JSON manifest records every written sprite with
//! its output path, final size, source-sheet bounds, and grid cell, so a
//! game loader can index assets without rescanning the sheet images.
//! Characters and sprite names are kept in `BTreeMap`s so the file is
//! byte-identical across runs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Result, SheetError};
use crate::pipeline::ExtractedSprite;

/// Default manifest file name inside the output directory.
pub const MANIFEST_FILENAME: &str = "asset_manifest.json";

/// One written sprite.
#[derive(Debug, Clone, Serialize)]
pub struct SpriteEntry {
    /// Output path, relative to the manifest's directory.
    pub path: String,

    /// Final canvas size `[w, h]`.
    pub size: [u32; 2],

    /// Bounds `[x, y, w, h]` on the source sheet.
    pub original_bounds: [u32; 4],

    /// Grid cell `[row, col]`.
    pub grid_position: [u32; 2],
}

/// The full manifest: character -> sprite name -> entry.
#[derive(Debug, Serialize)]
pub struct AssetManifest {
    pub version: String,
    pub assets: BTreeMap<String, BTreeMap<String, SpriteEntry>>,
    pub sprite_size: [u32; 2],
    pub format: String,
}

impl AssetManifest {
    pub fn new(sprite_size: [u32; 2]) -> Self {
        Self {
            version: "1.0".to_string(),
            assets: BTreeMap::new(),
            sprite_size,
            format: "PNG".to_string(),
        }
    }

    /// Record one sprite under its character.
    pub fn add_sprite(&mut self, character: &str, sprite: &ExtractedSprite, path: String) {
        let entry = SpriteEntry {
            path,
            size: [sprite.pixels.width(), sprite.pixels.height()],
            original_bounds: sprite.source_bounds,
            grid_position: [sprite.slot.0, sprite.slot.1],
        };
        self.assets
            .entry(character.to_string())
            .or_default()
            .insert(sprite.name.clone(), entry);
    }

    /// Write the manifest as pretty-printed JSON.
    pub fn write(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(|e| SheetError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to serialize manifest: {e}"),
        })?;
        fs::write(path, json).map_err(|e| SheetError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

//! sheetcut - Character sheet sprite slicer
//!
//! A library for segmenting character-sheet images into background-free,
//! canvas-normalized, semantically named sprites, plus a JSON manifest
//! describing where each sprite came from.

pub mod alpha;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod error;
pub mod grid;
pub mod manifest;
pub mod mask;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod regions;

pub use alpha::AlphaPolicy;
pub use config::{BackgroundRemoval, GridDetection, NamingConfig, RemovalMethod, SliceConfig, CONFIG_FILENAME};
pub use error::{Result, SheetError};
pub use grid::{assign_slots, infer_layout, GridLayout, SpriteSlot};
pub use manifest::{AssetManifest, SpriteEntry, MANIFEST_FILENAME};
pub use mask::{build_mask, MaskParams};
pub use naming::{NamingTable, PRESET_NAMES};
pub use pipeline::{
    find_sheets, load_sheet, process_batch, process_sheet, BatchResult, ExtractedSprite,
    SheetFailure,
};
pub use regions::{detect_regions, filter_overlaps, CandidateRegion, RegionFilters};

//! Sprite naming tables.
//!
//! A `NamingTable` maps grid rows and columns to semantic labels and joins
//! them with a character name: `hero_walk_left`. Tables are pure data.
//! Built-in presets and config-driven tables go through exactly the same
//! code, so swapping a preset can never change extraction behaviour.

use crate::config::NamingConfig;
use crate::error::{Result, SheetError};

/// Built-in preset names, in display order.
pub const PRESET_NAMES: [&str; 4] = [
    "frame-direction",
    "direction-frame",
    "rpg",
    "frame-direction-alt",
];

/// Row/column label tables for sprite naming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingTable {
    row_labels: Vec<String>,
    col_labels: Vec<String>,
    col_first: bool,
}

impl NamingTable {
    pub fn new(row_labels: Vec<String>, col_labels: Vec<String>, col_first: bool) -> Self {
        Self {
            row_labels,
            col_labels,
            col_first,
        }
    }

    /// Look up a built-in preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        let (rows, cols): (&[&str], &[&str]) = match name {
            // Rows are animation frames, columns facing directions
            "frame-direction" => (
                &["idle", "walk", "jump", "fall"],
                &["down", "left", "right", "up"],
            ),
            // Rows are facing directions, columns animation frames
            "direction-frame" => (
                &["down", "left", "right", "up"],
                &["idle", "walk", "jump", "fall"],
            ),
            // RPG Maker style direction order
            "rpg" => (
                &["up", "right", "down", "left"],
                &["idle", "walk", "jump", "fall"],
            ),
            // Frame rows with the alternate direction order
            "frame-direction-alt" => (
                &["idle", "walk", "jump", "fall"],
                &["left", "right", "up", "down"],
            ),
            _ => return None,
        };

        Some(Self::new(
            rows.iter().map(|s| s.to_string()).collect(),
            cols.iter().map(|s| s.to_string()).collect(),
            false,
        ))
    }

    /// Build a table from configuration: a preset name when given,
    /// otherwise the explicit label lists.
    pub fn from_config(naming: &NamingConfig) -> Result<Self> {
        match &naming.preset {
            Some(name) => Self::preset(name).ok_or_else(|| SheetError::Config {
                message: format!("Unknown naming preset: {}", name),
                help: Some(format!("Available presets: {}", PRESET_NAMES.join(", "))),
            }),
            None => Ok(Self::new(
                naming.row_labels.clone(),
                naming.col_labels.clone(),
                naming.col_first,
            )),
        }
    }

    /// Label for a grid row; positions past the table get `rowN`.
    pub fn row_label(&self, row: u32) -> String {
        self.row_labels
            .get(row as usize)
            .cloned()
            .unwrap_or_else(|| format!("row{}", row))
    }

    /// Label for a grid column; positions past the table get `colN`.
    pub fn col_label(&self, col: u32) -> String {
        self.col_labels
            .get(col as usize)
            .cloned()
            .unwrap_or_else(|| format!("col{}", col))
    }

    /// Resolve the full sprite name for a grid slot.
    pub fn resolve(&self, character: &str, row: u32, col: u32) -> String {
        let (first, second) = if self.col_first {
            (self.col_label(col), self.row_label(row))
        } else {
            (self.row_label(row), self.col_label(col))
        };
        format!("{}_{}_{}", character, first, second)
    }
}

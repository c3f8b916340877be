//! Patterns command implementation.
//!
//! Prints the sprite names each naming preset would assign to a grid, so
//! the right preset can be picked before running an extraction.

use clap::Args;

use crate::error::{Result, SheetError};
use crate::naming::{NamingTable, PRESET_NAMES};
use crate::output::Printer;

/// Preview the sprite names each naming preset would produce
#[derive(Args, Debug)]
pub struct PatternsArgs {
    /// Character name used in the generated names
    #[arg(default_value = "hero")]
    pub character: String,

    /// Show a single preset instead of all of them
    #[arg(long)]
    pub preset: Option<String>,

    /// Grid rows to preview
    #[arg(long, default_value = "4")]
    pub rows: u32,

    /// Grid columns to preview
    #[arg(long, default_value = "4")]
    pub cols: u32,
}

pub fn run(args: PatternsArgs, printer: &Printer) -> Result<()> {
    let presets: Vec<&str> = match &args.preset {
        Some(name) => {
            if !PRESET_NAMES.contains(&name.as_str()) {
                return Err(SheetError::Config {
                    message: format!("Unknown naming preset '{}'", name),
                    help: Some(format!("Available presets: {}", PRESET_NAMES.join(", "))),
                });
            }
            vec![name.as_str()]
        }
        None => PRESET_NAMES.to_vec(),
    };

    for name in presets {
        // Presets listed in PRESET_NAMES always resolve
        let Some(table) = NamingTable::preset(name) else {
            continue;
        };

        printer.info("Preset", name);
        for row in 0..args.rows {
            let line: Vec<String> = (0..args.cols)
                .map(|col| table.resolve(&args.character, row, col))
                .collect();
            println!("  {}", line.join("  "));
        }
        println!();
    }

    Ok(())
}

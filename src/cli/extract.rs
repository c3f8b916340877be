//! Extract command implementation.
//!
//! Slices one sheet or a directory of sheets into named sprite PNGs and
//! writes the asset manifest next to them.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::config::{RemovalMethod, SliceConfig, CONFIG_FILENAME};
use crate::error::{Result, SheetError};
use crate::manifest::{AssetManifest, MANIFEST_FILENAME};
use crate::output::{display_path, plural, Printer};
use crate::pipeline::{character_name, load_sheet, process_batch, process_sheet, ExtractedSprite};

/// Extract sprites from character sheets
#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// Sheet image or directory of sheets (default: configured input directory)
    pub input: Option<PathBuf>,

    /// Config file (default: sheetcut.yaml if present)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Character name for single-sheet mode (default: file stem)
    #[arg(long)]
    pub character: Option<String>,

    /// Output directory (overrides the configured one)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

pub fn run(args: ExtractArgs, printer: &Printer) -> Result<()> {
    let config = load_config(args.config.as_deref(), printer)?;

    if matches!(config.background.method, RemovalMethod::Matte) {
        printer.warning(
            "Warning",
            "matte removal is not available, falling back to color-key",
        );
    }

    let input = args.input.unwrap_or_else(|| config.input_dir.clone());
    let output_dir = args.output.unwrap_or_else(|| config.output_dir.clone());

    let mut manifest = AssetManifest::new(config.sprite_size);
    let mut failed = 0usize;

    if input.is_file() {
        let character = args
            .character
            .unwrap_or_else(|| character_name(&input));

        printer.status("Slicing", &display_path(&input));
        let sheet = load_sheet(&input)?;
        let sprites = process_sheet(&sheet, &character, &config)?;
        write_character(&output_dir, &character, &sprites, &mut manifest, printer)?;
    } else {
        printer.status("Scanning", &display_path(&input));
        let result = process_batch(&input, &config)?;

        for failure in &result.failures {
            printer.error(
                "Failed",
                &format!("{}: {}", display_path(&failure.path), failure.error),
            );
        }
        failed = result.failures.len();

        for (character, sprites) in &result.characters {
            write_character(&output_dir, character, sprites, &mut manifest, printer)?;
        }
    }

    let manifest_path = output_dir.join(MANIFEST_FILENAME);
    manifest.write(&manifest_path)?;

    let total: usize = manifest
        .assets
        .values()
        .map(|sprites| sprites.len())
        .sum();
    let mut summary = format!(
        "{} from {}",
        plural(total, "sprite", "sprites"),
        plural(manifest.assets.len(), "character", "characters"),
    );
    if failed > 0 {
        summary.push_str(&format!(", {} failed", plural(failed, "sheet", "sheets")));
    }
    printer.success("Finished", &summary);

    Ok(())
}

/// Resolve the config: explicit path, then ./sheetcut.yaml, then defaults.
fn load_config(explicit: Option<&Path>, printer: &Printer) -> Result<SliceConfig> {
    if let Some(path) = explicit {
        return SliceConfig::load(path);
    }

    let default_path = Path::new(CONFIG_FILENAME);
    if default_path.exists() {
        SliceConfig::load(default_path)
    } else {
        printer.info("Config", "no sheetcut.yaml found, using defaults");
        Ok(SliceConfig::default())
    }
}

/// Write one character's sprites under `<output>/characters/<name>/` and
/// record them in the manifest.
///
/// A sprite that fails to write is reported and skipped; it is left out of
/// the manifest and the rest of the character continues.
fn write_character(
    output_dir: &Path,
    character: &str,
    sprites: &[ExtractedSprite],
    manifest: &mut AssetManifest,
    printer: &Printer,
) -> Result<()> {
    if sprites.is_empty() {
        printer.warning("Empty", &format!("{}: no sprites found", character));
        return Ok(());
    }

    let character_dir = output_dir.join("characters").join(character);
    fs::create_dir_all(&character_dir).map_err(|e| SheetError::Io {
        path: character_dir.clone(),
        message: format!("Failed to create output directory: {}", e),
    })?;

    let mut written = 0usize;
    for sprite in sprites {
        let filename = format!("{}.png", sprite.name);
        let path = character_dir.join(&filename);

        if let Err(e) = sprite.pixels.save(&path) {
            printer.error("Failed", &format!("{}: {}", display_path(&path), e));
            continue;
        }

        let relative = format!("characters/{}/{}", character, filename);
        manifest.add_sprite(character, sprite, relative);
        written += 1;
    }

    printer.status(
        "Extracted",
        &format!("{} ({})", character, plural(written, "sprite", "sprites")),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::tempdir;

    fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, px: Rgba<u8>) {
        for yy in y..y + h {
            for xx in x..x + w {
                img.put_pixel(xx, yy, px);
            }
        }
    }

    fn quadrant_sheet() -> RgbaImage {
        let mut sheet = RgbaImage::from_pixel(400, 400, Rgba([255, 255, 255, 255]));
        fill_rect(&mut sheet, 10, 10, 180, 180, Rgba([200, 40, 40, 255]));
        fill_rect(&mut sheet, 210, 10, 180, 180, Rgba([40, 160, 40, 255]));
        fill_rect(&mut sheet, 10, 210, 180, 180, Rgba([40, 60, 200, 255]));
        fill_rect(&mut sheet, 210, 210, 180, 180, Rgba([70, 70, 70, 255]));
        sheet
    }

    fn test_config_yaml() -> &'static str {
        "grid:\n  manual_rows: 2\n  manual_cols: 2\nbackground:\n  tolerance: 10\n"
    }

    #[test]
    fn test_extract_single_sheet() {
        let dir = tempdir().unwrap();
        let sheet_path = dir.path().join("hero.png");
        quadrant_sheet().save(&sheet_path).unwrap();

        let config_path = dir.path().join("sheetcut.yaml");
        fs::write(&config_path, test_config_yaml()).unwrap();

        let output = dir.path().join("assets");
        let args = ExtractArgs {
            input: Some(sheet_path),
            config: Some(config_path),
            character: None,
            output: Some(output.clone()),
        };

        run(args, &Printer::new()).unwrap();

        assert!(output.join("characters/hero/hero_idle_down.png").exists());
        assert!(output.join("characters/hero/hero_walk_left.png").exists());
        assert!(output.join(MANIFEST_FILENAME).exists());
    }

    #[test]
    fn test_extract_character_override() {
        let dir = tempdir().unwrap();
        let sheet_path = dir.path().join("sheet_final_v2.png");
        quadrant_sheet().save(&sheet_path).unwrap();

        let config_path = dir.path().join("sheetcut.yaml");
        fs::write(&config_path, test_config_yaml()).unwrap();

        let output = dir.path().join("assets");
        let args = ExtractArgs {
            input: Some(sheet_path),
            config: Some(config_path),
            character: Some("knight".to_string()),
            output: Some(output.clone()),
        };

        run(args, &Printer::new()).unwrap();

        assert!(output.join("characters/knight/knight_idle_down.png").exists());
    }

    #[test]
    fn test_extract_batch_directory() {
        let dir = tempdir().unwrap();
        let sheets = dir.path().join("sheets");
        fs::create_dir(&sheets).unwrap();
        quadrant_sheet().save(sheets.join("hero.png")).unwrap();
        quadrant_sheet().save(sheets.join("slime.png")).unwrap();

        let config_path = dir.path().join("sheetcut.yaml");
        fs::write(&config_path, test_config_yaml()).unwrap();

        let output = dir.path().join("assets");
        let args = ExtractArgs {
            input: Some(sheets),
            config: Some(config_path),
            character: None,
            output: Some(output.clone()),
        };

        run(args, &Printer::new()).unwrap();

        assert!(output.join("characters/hero/hero_idle_down.png").exists());
        assert!(output.join("characters/slime/slime_idle_down.png").exists());

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(output.join(MANIFEST_FILENAME)).unwrap())
                .unwrap();
        assert_eq!(manifest["assets"].as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_extract_missing_config_errors() {
        let args = ExtractArgs {
            input: None,
            config: Some(PathBuf::from("/no/such/sheetcut.yaml")),
            character: None,
            output: None,
        };

        assert!(run(args, &Printer::new()).is_err());
    }
}

pub mod extract;
pub mod init;
pub mod patterns;

use clap::{Parser, Subcommand};

/// sheetcut - Character sheet sprite slicer
#[derive(Parser, Debug)]
#[command(name = "sheetcut")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract sprites from character sheets
    Extract(extract::ExtractArgs),

    /// Initialize a sheetcut project (generates sheetcut.yaml)
    Init(init::InitArgs),

    /// Preview the sprite names each naming preset would produce
    Patterns(patterns::PatternsArgs),
}

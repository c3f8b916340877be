use clap::Parser;
use miette::Result;
use sheetcut::cli::{Cli, Commands};
use sheetcut::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Extract(args) => sheetcut::cli::extract::run(args, &printer)?,
        Commands::Init(args) => sheetcut::cli::init::run(args, &printer)?,
        Commands::Patterns(args) => sheetcut::cli::patterns::run(args, &printer)?,
    }

    Ok(())
}

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::*;
use tracing::info;

use entag::config::{ConfigLoader, LogLevel};
use entag::gazetteer;
use entag::prelude::*;

mod args;
mod output;

use args::{CheckGazetteerArgs, ExtractArgs};

#[derive(Parser)]
#[command(name = "entag-cli")]
#[command(about = "Entity extraction and tagging for plain-text documents", long_about = None)]
#[command(version = entag::VERSION)]
struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (debug level logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Quiet mode (errors only)
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract entities from a text file and write tagged text + sidecar JSON
    Extract(ExtractArgs),
    /// Validate gazetteer files without processing anything
    CheckGazetteer(CheckGazetteerArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut loader = ConfigLoader::new();
    loader.load_default_files();
    if let Some(path) = &cli.config {
        loader.load_file(path)?;
    }
    loader.load_env();
    let mut config = loader.extract()?;

    if cli.verbose {
        config.logging.level = LogLevel::Debug;
    } else if cli.quiet {
        config.logging.level = LogLevel::Error;
    }

    match cli.command {
        Commands::Extract(args) => extract(config, args),
        Commands::CheckGazetteer(args) => check_gazetteer(args),
    }
}

fn extract(mut config: EngineConfig, args: ExtractArgs) -> Result<()> {
    config.gazetteer.paths.extend(args.gazetteers.clone());
    if args.no_builtin_gazetteer {
        config.gazetteer.use_builtin = false;
    }
    if let Some(month) = args.fiscal_start {
        config.dates.fiscal_year_start_month = month;
    }
    if let Some(date) = args.reference_date {
        config.dates.reference_date = Some(date);
    }

    let context = entag::init(config)?;

    let text = std::fs::read_to_string(&args.input)?;
    let report = context.process_document(&text)?;

    let tagged_path = args
        .tagged_output
        .clone()
        .unwrap_or_else(|| sibling(&args.input, "tagged.txt"));
    std::fs::write(&tagged_path, &report.tagged_text)?;
    info!(path = %tagged_path.display(), "wrote tagged text");

    if !args.tagged_only {
        let report_path = args
            .output
            .clone()
            .unwrap_or_else(|| sibling(&args.input, "entities.json"));
        let json = if args.pretty {
            serde_json::to_string_pretty(&report)
        } else {
            serde_json::to_string(&report)
        }
        .map_err(|e| EntagError::Tagging(format!("report serialization failed: {e}")))?;
        std::fs::write(&report_path, json)?;
        info!(path = %report_path.display(), "wrote sidecar report");
    }

    output::print_summary(&report);
    Ok(())
}

fn check_gazetteer(args: CheckGazetteerArgs) -> Result<()> {
    let mut total = 0;
    for path in &args.files {
        let entries = gazetteer::load_entries(path)?;
        // Run the same validation the engine applies at startup.
        Gazetteer::new(entries.clone())?;
        println!(
            "{} {} ({} entries)",
            "ok:".green().bold(),
            path.display(),
            entries.len()
        );
        total += entries.len();
    }
    println!("{total} entries across {} files", args.files.len());
    Ok(())
}

/// Place a derived output file next to the input: `doc.txt` -> `doc.tagged.txt`.
fn sibling(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}.{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sibling_paths_keep_the_directory() {
        let path = sibling(Path::new("/docs/report.txt"), "entities.json");
        assert_eq!(path, PathBuf::from("/docs/report.entities.json"));
    }
}

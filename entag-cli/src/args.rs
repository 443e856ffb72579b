//! Command argument structures.

use std::path::PathBuf;

use clap::Args;

#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file to process
    pub input: PathBuf,

    /// Where to write the sidecar report (default: <input>.entities.json)
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Where to write the tagged text (default: <input>.tagged.txt)
    #[arg(long)]
    pub tagged_output: Option<PathBuf>,

    /// Additional gazetteer files (JSON arrays of entries)
    #[arg(long = "gazetteer", short = 'g')]
    pub gazetteers: Vec<PathBuf>,

    /// Skip the compiled-in default gazetteer
    #[arg(long)]
    pub no_builtin_gazetteer: bool,

    /// Fiscal-year start month, 1-12 (1 = calendar year)
    #[arg(long)]
    pub fiscal_start: Option<u32>,

    /// Fixed reference date for past/future classification (YYYY-MM-DD)
    #[arg(long)]
    pub reference_date: Option<chrono::NaiveDate>,

    /// Write only the tagged text, no sidecar report
    #[arg(long)]
    pub tagged_only: bool,

    /// Pretty-print the sidecar JSON
    #[arg(long, short)]
    pub pretty: bool,
}

#[derive(Args)]
pub struct CheckGazetteerArgs {
    /// Gazetteer files to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

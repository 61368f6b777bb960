pub mod dashboard;
pub mod export;
pub mod load;
pub mod status;
pub mod summary;

use clap::{Args, Parser, Subcommand};

use crate::error::Result;
use crate::filter::DateFilter;
use crate::loader::load_table;
use crate::models::SalesTable;
use crate::settings::{load_settings, DataSource};

#[derive(Parser)]
#[command(name = "vendas", about = "Sales dashboard for small shops.")]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive dashboard (default).
    Dashboard {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Print KPIs, insights and rankings as text.
    Summary {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Write the computed dashboard data as JSON.
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Output file (default: stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Show the configured data file and what it contains.
    Status {
        #[command(flatten)]
        source: SourceArgs,
    },
    /// Validate a spreadsheet and make it the default data file.
    Load {
        /// Path to an .xlsx/.xls/.ods/.csv file
        path: String,
        /// Worksheet name (default: first sheet)
        #[arg(long)]
        sheet: Option<String>,
    },
}

#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    /// Spreadsheet to read (default: from settings, else vendas.xlsx)
    #[arg(long)]
    pub file: Option<String>,
    /// Worksheet name (default: first sheet)
    #[arg(long)]
    pub sheet: Option<String>,
}

#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    /// Year filter: YYYY
    #[arg(long)]
    pub year: Option<i32>,
    /// Month filter: 1-12
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
    /// Day-of-month filter: 1-31
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=31))]
    pub day: Option<u32>,
    /// Category for the price ranking (default: first in the filtered data)
    #[arg(long)]
    pub category: Option<String>,
}

impl FilterArgs {
    pub fn date_filter(&self) -> DateFilter {
        DateFilter::new(self.year, self.month, self.day)
    }
}

/// Resolve the data source from flags and settings, then load it once.
pub(crate) fn open_source(args: &SourceArgs) -> Result<(DataSource, SalesTable)> {
    let source = load_settings().resolve(args.file.as_deref(), args.sheet.as_deref());
    let table = load_table(&source.path, source.sheet.as_deref())?;
    Ok((source, table))
}

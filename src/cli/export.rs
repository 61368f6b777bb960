use std::path::PathBuf;

use crate::cli::{open_source, FilterArgs, SourceArgs};
use crate::error::Result;
use crate::snapshot::Snapshot;

/// Serialize the dashboard data for an external charting front end.
pub fn run(source: &SourceArgs, filter: &FilterArgs, output: Option<String>) -> Result<()> {
    let (_, table) = open_source(source)?;
    let snapshot = Snapshot::compute(&table, &filter.date_filter(), filter.category.as_deref());
    let json = serde_json::to_string_pretty(&snapshot)?;

    match output {
        Some(path) => {
            let p = PathBuf::from(&path);
            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&p, format!("{json}\n"))?;
            println!("Wrote {}", p.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

use std::path::PathBuf;

use crate::error::Result;
use crate::loader::load_table;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(path: &str, sheet: Option<String>) -> Result<()> {
    let resolved = PathBuf::from(shellexpand_path(path));

    // Refuse to switch to a file that would fail at startup.
    let table = load_table(&resolved, sheet.as_deref())?;

    let mut settings = load_settings();
    settings.data_file = resolved.to_string_lossy().to_string();
    settings.sheet = sheet;
    save_settings(&settings)?;

    println!("Switched to {} ({} rows)", resolved.display(), table.len());
    Ok(())
}

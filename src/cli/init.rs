use std::path::PathBuf;

use crate::db::Database;
use crate::error::Result;
use crate::settings::{load_settings, save_settings, expand_data_dir};

pub fn run(data_dir: Option<String>) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = data_dir {
        settings.data_dir = expand_data_dir(&dir).to_string_lossy().into_owned();
    }
    save_settings(&settings)?;

    let resolved = PathBuf::from(&settings.data_dir);
    std::fs::create_dir_all(&resolved)?;
    let db = Database::new(settings.database_path());
    db.init()?;

    println!("Initialized ledgerline at {}", db.path().display());
    Ok(())
}

use std::path::Path;

use crate::db::Database;
use crate::error::Result;
use crate::ingest::FileIngestor;
use crate::models::TxFile;

pub fn run(db: &Database, file: &str, name: Option<&str>) -> Result<()> {
    db.init()?;
    let ingestor = FileIngestor::new(db, db, db);

    let report = if file == "-" {
        let tx_file = TxFile::new(name.unwrap_or("stdin"), "-", "stdin", 0);
        ingestor.ingest_reader(&tx_file, std::io::stdin().lock())?
    } else {
        let mut tx_file = TxFile::from_path(Path::new(file))?;
        if let Some(name) = name {
            tx_file.name = name.to_string();
        }
        ingestor.ingest_path(&tx_file)?
    };

    println!(
        "{} transactions stored ({} new users, {} new accounts)",
        report.transactions_persisted, report.users_created, report.accounts_created
    );
    Ok(())
}

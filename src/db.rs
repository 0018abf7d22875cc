use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{ffi, Connection};
use tracing::warn;

use crate::error::{Error, Result, StoreOp};

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS accounts (
    id TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL UNIQUE,
    balance REAL NOT NULL DEFAULT 0,
    active INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE TABLE IF NOT EXISTS transactions (
    id TEXT PRIMARY KEY,
    account_id TEXT NOT NULL,
    amount REAL NOT NULL CHECK (amount <> 0),
    operation TEXT NOT NULL CHECK (operation IN ('credit', 'debit')),
    date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    origin TEXT NOT NULL CHECK (origin <> ''),
    FOREIGN KEY (account_id) REFERENCES accounts(id)
);

CREATE INDEX IF NOT EXISTS idx_transactions_account ON transactions(account_id);
CREATE INDEX IF NOT EXISTS idx_transactions_origin ON transactions(origin);
";

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn get_connection(db_path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    Ok(conn)
}

/// Handle on the SQLite file backing all repositories.
///
/// Holds no open connection: each call to [`Database::run`] opens one,
/// wraps a single unit of work in its own transaction, and closes it again.
#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn init(&self) -> Result<()> {
        self.run(StoreOp::InitializingSchema, |tx| tx.execute_batch(SCHEMA))
    }

    /// Open, begin, run `work`, then commit, or roll back and report the
    /// failure as `op`. The connection is dropped on every path.
    pub(crate) fn run<T, F>(&self, op: StoreOp, work: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> rusqlite::Result<T>,
    {
        let mut conn = get_connection(&self.path).map_err(Error::OpeningDatabase)?;
        let tx = conn.transaction().map_err(Error::BeginningTransaction)?;
        match work(&tx) {
            Ok(value) => {
                tx.commit().map_err(Error::CommittingTransaction)?;
                Ok(value)
            }
            Err(source) => {
                if let Err(e) = tx.rollback() {
                    warn!(%op, error = %e, "rollback failed");
                }
                warn!(%op, error = %source, "statement failed, rolled back");
                Err(Error::Statement { op, source })
            }
        }
    }
}

fn constraint_code(err: &Error) -> Option<i32> {
    match err {
        Error::Statement {
            source: rusqlite::Error::SqliteFailure(e, _),
            ..
        } if e.code == rusqlite::ErrorCode::ConstraintViolation => Some(e.extended_code),
        _ => None,
    }
}

/// True when a statement was rejected by a PRIMARY KEY or UNIQUE constraint.
pub(crate) fn is_duplicate(err: &Error) -> bool {
    matches!(
        constraint_code(err),
        Some(ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE)
    )
}

pub(crate) fn is_missing_parent(err: &Error) -> bool {
    constraint_code(err) == Some(ffi::SQLITE_CONSTRAINT_FOREIGNKEY)
}

#[cfg(test)]
pub(crate) fn test_db() -> (tempfile::TempDir, Database) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(dir.path().join("test.db"));
    db.init().unwrap();
    (dir, db)
}

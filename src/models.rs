use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Placeholder identity for a user first seen in an ingested file.
    pub fn synthetic(id: i64) -> Self {
        Self::new(
            id,
            format!("User Name {id}"),
            format!("user.email{id}@amazingemail.com"),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub user_id: i64,
    pub balance: f64,
    pub active: bool,
}

impl Account {
    /// A fresh, empty and inactive account for `user_id`.
    pub fn new(user_id: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            balance: 0.0,
            active: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Credit,
    Debit,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: f64,
    pub operation: Operation,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub origin: String,
}

impl Transaction {
    /// Build a validated transaction. `date` is `None` when the caller has no
    /// usable date for the record.
    pub fn new(
        account_id: Uuid,
        amount: f64,
        date: Option<NaiveDate>,
        origin: &str,
    ) -> Result<Self> {
        if amount == 0.0 {
            return Err(Error::TransactionAmountIsZero);
        }
        if origin.is_empty() {
            return Err(Error::TransactionOriginIsEmpty);
        }
        let date = date.ok_or(Error::TransactionDateIsInvalid)?;
        let operation = if amount > 0.0 {
            Operation::Credit
        } else {
            Operation::Debit
        };
        Ok(Self {
            id: Uuid::new_v4(),
            account_id,
            amount,
            operation,
            date,
            created_at: Utc::now(),
            origin: origin.to_string(),
        })
    }
}

/// Identity of a file handed to the ingestion pipeline. Only `name` is
/// persisted, as the origin of every transaction the file produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxFile {
    pub name: String,
    pub path: PathBuf,
    pub hash: String,
    pub lines: u64,
}

impl TxFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, hash: impl Into<String>, lines: u64) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            hash: hash.into(),
            lines,
        }
    }

    /// Describe a local file: its file name, SHA-256 content digest and line count.
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.as_os_str().is_empty() {
            return Err(Error::FilePathIsEmpty);
        }
        let open = || File::open(path).map_err(Error::FileCouldNotBeOpened);
        let mut hasher = Sha256::new();
        io::copy(&mut open()?, &mut hasher)?;
        let hash = hex::encode(hasher.finalize());
        let lines = count_lines(BufReader::new(open()?))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self::new(name, path, hash, lines))
    }
}

/// Count lines the way `BufRead::lines` does, without requiring UTF-8.
fn count_lines<R: BufRead>(mut reader: R) -> Result<u64> {
    let mut lines = 0;
    let mut buf = Vec::new();
    while reader.read_until(b'\n', &mut buf)? > 0 {
        lines += 1;
        buf.clear();
    }
    Ok(lines)
}

pub mod accounts;
pub mod ingest;
pub mod init;
pub mod summary;
pub mod transactions;
pub mod users;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::db::Database;
use crate::settings::resolve_db_path;

#[derive(Parser)]
#[command(name = "ledgerline", about = "Ingest per-user ledger CSV files into a transaction store.")]
pub struct Cli {
    /// Database file (default: <data_dir>/ledgerline.db from settings)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn database(&self) -> Database {
        Database::new(resolve_db_path(self.db.as_deref()))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the database.
    Init {
        /// Path for ledger data (default: ~/Documents/ledgerline)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Ingest a `userID,month/day,amount` CSV file.
    Ingest {
        /// Path to the CSV file, or `-` for stdin
        file: String,
        /// Origin recorded on every transaction (default: the file name)
        #[arg(long, required_if_eq("file", "-"))]
        name: Option<String>,
    },
    /// Summarize a user's account.
    Summary {
        /// User id
        #[arg(long)]
        user: i64,
        /// Store the computed balance on the account
        #[arg(long)]
        sync: bool,
    },
    /// List accounts.
    Accounts,
    /// Look up or edit users.
    Users {
        #[command(subcommand)]
        command: UsersCommands,
    },
    /// Inspect stored transactions.
    Transactions {
        #[command(subcommand)]
        command: TransactionsCommands,
    },
}

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Show a user by id.
    Show { id: i64 },
    /// Find a user by email.
    Find {
        #[arg(long)]
        email: String,
    },
    /// Change a user's name and email.
    Update {
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
}

#[derive(Subcommand)]
pub enum TransactionsCommands {
    /// List the transactions a file produced.
    Origin {
        /// File name used as origin at ingestion
        name: String,
    },
    /// Show one transaction by id.
    Show { id: String },
}

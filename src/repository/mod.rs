//! Store interfaces consumed by the ingestion pipeline, and their SQLite
//! implementations on [`Database`](crate::db::Database).
//!
//! Every method is its own database transaction. Single-row lookups report
//! absence as `Error::NotFound`, never as an empty success.

mod accounts;
mod transactions;
mod users;

use uuid::Uuid;

use crate::error::Result;
use crate::models::{Account, Transaction, User};

pub trait UserStore {
    fn get_user(&self, id: i64) -> Result<User>;
    fn get_user_by_email(&self, email: &str) -> Result<User>;
    /// Fails with `AlreadyCreated(User)` when the id is taken.
    fn create_user(&self, user: &User) -> Result<()>;
    fn update_user(&self, user: &User) -> Result<()>;
}

pub trait AccountStore {
    fn get_account(&self, id: Uuid) -> Result<Account>;
    fn get_account_by_user(&self, user_id: i64) -> Result<Account>;
    fn list_accounts(&self) -> Result<Vec<Account>>;
    /// Fails with `AlreadyCreated(Account)` when the user already has one,
    /// and `NotFound(User)` when the owner does not exist.
    fn create_account(&self, account: &Account) -> Result<()>;
    fn update_account(&self, account: &Account) -> Result<()>;
}

pub trait TransactionStore {
    fn create_transaction(&self, tx: &Transaction) -> Result<()>;
    fn get_transaction(&self, id: Uuid) -> Result<Transaction>;
    fn list_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>>;
    fn list_credits(&self, account_id: Uuid) -> Result<Vec<Transaction>>;
    fn list_debits(&self, account_id: Uuid) -> Result<Vec<Transaction>>;
    fn list_by_origin(&self, origin: &str) -> Result<Vec<Transaction>>;
}

/// Map a TEXT column holding a UUID.
fn uuid_column(row: &rusqlite::Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

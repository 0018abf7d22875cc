use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use super::{uuid_column, TransactionStore};
use crate::db::{is_duplicate, is_missing_parent, Database};
use crate::error::{Entity, Error, Result, StoreOp};
use crate::models::{Operation, Transaction};

const SELECT_TRANSACTION: &str =
    "SELECT id, account_id, amount, operation, date, created_at, origin FROM transactions";

/// Dates are stored as `YYYY-MM-DD`; ingested dates carry year 0.
const DATE_FORMAT: &str = "%Y-%m-%d";

fn conversion_error(idx: usize, e: impl std::error::Error + Send + Sync + 'static) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn map_transaction(row: &rusqlite::Row<'_>) -> rusqlite::Result<Transaction> {
    let operation: String = row.get(3)?;
    let operation = Operation::from_key(&operation)
        .ok_or_else(|| rusqlite::Error::InvalidColumnType(3, "operation".to_string(), Type::Text))?;
    let date: String = row.get(4)?;
    let date = NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|e| conversion_error(4, e))?;
    let created_at: String = row.get(5)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| conversion_error(5, e))?
        .with_timezone(&Utc);
    Ok(Transaction {
        id: uuid_column(row, 0)?,
        account_id: uuid_column(row, 1)?,
        amount: row.get(2)?,
        operation,
        date,
        created_at,
        origin: row.get(6)?,
    })
}

impl Database {
    fn list_transactions(&self, op: StoreOp, clause: &str, param: String) -> Result<Vec<Transaction>> {
        self.run(op, |tx| {
            let mut stmt = tx.prepare(&format!(
                "{SELECT_TRANSACTION} WHERE {clause} ORDER BY date, created_at"
            ))?;
            let txns = stmt
                .query_map([param], map_transaction)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(txns)
        })
    }
}

impl TransactionStore for Database {
    fn create_transaction(&self, txn: &Transaction) -> Result<()> {
        self.run(StoreOp::CreatingTransaction, |tx| {
            tx.execute(
                "INSERT INTO transactions (id, account_id, amount, operation, date, created_at, origin) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    txn.id.to_string(),
                    txn.account_id.to_string(),
                    txn.amount,
                    txn.operation.as_str(),
                    txn.date.format(DATE_FORMAT).to_string(),
                    txn.created_at.to_rfc3339(),
                    txn.origin,
                ],
            )
            .map(|_| ())
        })
        .map_err(|e| {
            if is_duplicate(&e) {
                Error::AlreadyCreated(Entity::Transaction)
            } else if is_missing_parent(&e) {
                Error::NotFound(Entity::Account)
            } else {
                e
            }
        })
    }

    fn get_transaction(&self, id: Uuid) -> Result<Transaction> {
        self.run(StoreOp::QueryingTransactionById, |tx| {
            tx.query_row(
                &format!("{SELECT_TRANSACTION} WHERE id = ?1"),
                [id.to_string()],
                map_transaction,
            )
            .optional()
        })?
        .ok_or(Error::NotFound(Entity::Transaction))
    }

    fn list_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        self.list_transactions(
            StoreOp::QueryingTransactionsByAccountId,
            "account_id = ?1",
            account_id.to_string(),
        )
    }

    fn list_credits(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        self.list_transactions(
            StoreOp::QueryingCreditsByAccountId,
            "account_id = ?1 AND operation = 'credit'",
            account_id.to_string(),
        )
    }

    fn list_debits(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        self.list_transactions(
            StoreOp::QueryingDebitsByAccountId,
            "account_id = ?1 AND operation = 'debit'",
            account_id.to_string(),
        )
    }

    fn list_by_origin(&self, origin: &str) -> Result<Vec<Transaction>> {
        if origin.is_empty() {
            return Err(Error::TransactionOriginIsEmpty);
        }
        self.list_transactions(
            StoreOp::QueryingTransactionsByOrigin,
            "origin = ?1",
            origin.to_string(),
        )
    }
}

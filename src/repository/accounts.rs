use rusqlite::OptionalExtension;
use uuid::Uuid;

use super::{uuid_column, AccountStore};
use crate::db::{is_duplicate, is_missing_parent, Database};
use crate::error::{Entity, Error, Result, StoreOp};
use crate::models::Account;

const SELECT_ACCOUNT: &str = "SELECT id, user_id, balance, active FROM accounts";

fn map_account(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    Ok(Account {
        id: uuid_column(row, 0)?,
        user_id: row.get(1)?,
        balance: row.get(2)?,
        active: row.get(3)?,
    })
}

impl AccountStore for Database {
    fn get_account(&self, id: Uuid) -> Result<Account> {
        self.run(StoreOp::QueryingAccountById, |tx| {
            tx.query_row(
                &format!("{SELECT_ACCOUNT} WHERE id = ?1"),
                [id.to_string()],
                map_account,
            )
            .optional()
        })?
        .ok_or(Error::NotFound(Entity::Account))
    }

    fn get_account_by_user(&self, user_id: i64) -> Result<Account> {
        self.run(StoreOp::QueryingAccountByUserId, |tx| {
            tx.query_row(
                &format!("{SELECT_ACCOUNT} WHERE user_id = ?1"),
                [user_id],
                map_account,
            )
            .optional()
        })?
        .ok_or(Error::NotFound(Entity::Account))
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        self.run(StoreOp::QueryingAccounts, |tx| {
            let mut stmt = tx.prepare(&format!("{SELECT_ACCOUNT} ORDER BY user_id"))?;
            let accounts = stmt
                .query_map([], map_account)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(accounts)
        })
    }

    fn create_account(&self, account: &Account) -> Result<()> {
        self.run(StoreOp::CreatingAccount, |tx| {
            tx.execute(
                "INSERT INTO accounts (id, user_id, balance, active) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    account.id.to_string(),
                    account.user_id,
                    account.balance,
                    account.active,
                ],
            )
            .map(|_| ())
        })
        .map_err(|e| {
            if is_duplicate(&e) {
                Error::AlreadyCreated(Entity::Account)
            } else if is_missing_parent(&e) {
                Error::NotFound(Entity::User)
            } else {
                e
            }
        })
    }

    fn update_account(&self, account: &Account) -> Result<()> {
        let changed = self.run(StoreOp::UpdatingAccount, |tx| {
            tx.execute(
                "UPDATE accounts SET balance = ?1, active = ?2 WHERE id = ?3",
                rusqlite::params![account.balance, account.active, account.id.to_string()],
            )
        })?;
        if changed == 0 {
            return Err(Error::NotFound(Entity::Account));
        }
        Ok(())
    }
}

//! In-memory stores for exercising the pipeline without SQLite.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use uuid::Uuid;

use crate::error::{Entity, Error, Result, StoreOp};
use crate::models::{Account, Transaction, User};
use crate::repository::{AccountStore, TransactionStore, UserStore};

fn store_failure(op: StoreOp) -> Error {
    Error::Statement {
        op,
        source: rusqlite::Error::InvalidQuery,
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub users: RefCell<BTreeMap<i64, User>>,
    pub accounts: RefCell<BTreeMap<i64, Account>>,
    pub transactions: RefCell<Vec<Transaction>>,
    pub user_creates: Cell<usize>,
    pub account_creates: Cell<usize>,
    pub transaction_creates: Cell<usize>,
    /// Fail user lookups with a store error.
    pub fail_user_lookup: Cell<bool>,
    /// Report the next user lookup as not found, as if another writer
    /// inserted the row right after it.
    pub miss_next_user_lookup: Cell<bool>,
    /// Fail user creation with a store error.
    pub fail_user_create: Cell<bool>,
    /// Fail account lookups with a store error.
    pub fail_account_lookup: Cell<bool>,
    /// Fail account creation with a store error.
    pub fail_account_create: Cell<bool>,
    /// Accept account creation but keep returning not-found afterwards.
    pub lose_created_accounts: Cell<bool>,
    /// Fail the n-th (1-based) transaction create.
    pub fail_transaction_create_at: Cell<Option<usize>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryStore {
    fn get_user(&self, id: i64) -> Result<User> {
        if self.fail_user_lookup.get() {
            return Err(store_failure(StoreOp::QueryingUserById));
        }
        if self.miss_next_user_lookup.replace(false) {
            return Err(Error::NotFound(Entity::User));
        }
        self.users
            .borrow()
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound(Entity::User))
    }

    fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.users
            .borrow()
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(Error::NotFound(Entity::User))
    }

    fn create_user(&self, user: &User) -> Result<()> {
        self.user_creates.set(self.user_creates.get() + 1);
        if self.fail_user_create.get() {
            return Err(store_failure(StoreOp::CreatingUser));
        }
        let mut users = self.users.borrow_mut();
        if users.contains_key(&user.id) {
            return Err(Error::AlreadyCreated(Entity::User));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.borrow_mut();
        let stored = users.get_mut(&user.id).ok_or(Error::NotFound(Entity::User))?;
        *stored = user.clone();
        Ok(())
    }
}

impl AccountStore for MemoryStore {
    fn get_account(&self, id: Uuid) -> Result<Account> {
        self.accounts
            .borrow()
            .values()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(Error::NotFound(Entity::Account))
    }

    fn get_account_by_user(&self, user_id: i64) -> Result<Account> {
        if self.fail_account_lookup.get() {
            return Err(store_failure(StoreOp::QueryingAccountByUserId));
        }
        if self.lose_created_accounts.get() {
            return Err(Error::NotFound(Entity::Account));
        }
        self.accounts
            .borrow()
            .get(&user_id)
            .cloned()
            .ok_or(Error::NotFound(Entity::Account))
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.borrow().values().cloned().collect())
    }

    fn create_account(&self, account: &Account) -> Result<()> {
        self.account_creates.set(self.account_creates.get() + 1);
        if self.fail_account_create.get() {
            return Err(store_failure(StoreOp::CreatingAccount));
        }
        if !self.users.borrow().contains_key(&account.user_id) {
            return Err(Error::NotFound(Entity::User));
        }
        let mut accounts = self.accounts.borrow_mut();
        if accounts.contains_key(&account.user_id) {
            return Err(Error::AlreadyCreated(Entity::Account));
        }
        accounts.insert(account.user_id, account.clone());
        Ok(())
    }

    fn update_account(&self, account: &Account) -> Result<()> {
        let mut accounts = self.accounts.borrow_mut();
        let stored = accounts
            .get_mut(&account.user_id)
            .ok_or(Error::NotFound(Entity::Account))?;
        *stored = account.clone();
        Ok(())
    }
}

impl TransactionStore for MemoryStore {
    fn create_transaction(&self, tx: &Transaction) -> Result<()> {
        let attempt = self.transaction_creates.get() + 1;
        self.transaction_creates.set(attempt);
        if self.fail_transaction_create_at.get() == Some(attempt) {
            return Err(store_failure(StoreOp::CreatingTransaction));
        }
        self.transactions.borrow_mut().push(tx.clone());
        Ok(())
    }

    fn get_transaction(&self, id: Uuid) -> Result<Transaction> {
        self.transactions
            .borrow()
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or(Error::NotFound(Entity::Transaction))
    }

    fn list_by_account(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .borrow()
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect())
    }

    fn list_credits(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        Ok(self
            .list_by_account(account_id)?
            .into_iter()
            .filter(|t| t.amount > 0.0)
            .collect())
    }

    fn list_debits(&self, account_id: Uuid) -> Result<Vec<Transaction>> {
        Ok(self
            .list_by_account(account_id)?
            .into_iter()
            .filter(|t| t.amount < 0.0)
            .collect())
    }

    fn list_by_origin(&self, origin: &str) -> Result<Vec<Transaction>> {
        Ok(self
            .transactions
            .borrow()
            .iter()
            .filter(|t| t.origin == origin)
            .cloned()
            .collect())
    }
}

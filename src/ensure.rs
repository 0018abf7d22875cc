//! Get-or-create for the owner side of a ledger record.
//!
//! A missing entity is created and then re-fetched, so callers always hold
//! the stored row. A create that loses a race to another writer surfaces as
//! `AlreadyCreated` from the store and is treated like a successful create.

use tracing::{debug, info};

use crate::error::{Entity, Error, Result};
use crate::models::{Account, User};
use crate::repository::{AccountStore, UserStore};

#[derive(Debug, Clone, PartialEq)]
pub struct Ensured<T> {
    pub value: T,
    /// Whether this call inserted the row.
    pub created: bool,
}

pub fn ensure_user<U: UserStore + ?Sized>(users: &U, id: i64) -> Result<Ensured<User>> {
    match users.get_user(id) {
        Ok(user) => Ok(Ensured {
            value: user,
            created: false,
        }),
        Err(Error::NotFound(Entity::User)) => {
            let created = match users.create_user(&User::synthetic(id)) {
                Ok(()) => {
                    info!(user_id = id, "created user");
                    true
                }
                Err(Error::AlreadyCreated(Entity::User)) => {
                    debug!(user_id = id, "user created by another writer");
                    false
                }
                Err(e) => return Err(e),
            };
            Ok(Ensured {
                value: users.get_user(id)?,
                created,
            })
        }
        Err(e) => Err(e),
    }
}

pub fn ensure_account<A: AccountStore + ?Sized>(accounts: &A, user_id: i64) -> Result<Ensured<Account>> {
    match accounts.get_account_by_user(user_id) {
        Ok(account) => Ok(Ensured {
            value: account,
            created: false,
        }),
        Err(Error::NotFound(Entity::Account)) => {
            let created = match accounts.create_account(&Account::new(user_id)) {
                Ok(()) => {
                    info!(user_id, "created account");
                    true
                }
                Err(Error::AlreadyCreated(Entity::Account)) => {
                    debug!(user_id, "account created by another writer");
                    false
                }
                Err(e) => return Err(e),
            };
            Ok(Ensured {
                value: accounts.get_account_by_user(user_id)?,
                created,
            })
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db;
    use crate::error::StoreOp;
    use crate::testing::MemoryStore;

    #[test]
    fn test_creates_missing_user() {
        let store = MemoryStore::new();
        let ensured = ensure_user(&store, 4).unwrap();
        assert!(ensured.created);
        assert_eq!(ensured.value, User::synthetic(4));
        assert_eq!(store.user_creates.get(), 1);
    }

    #[test]
    fn test_existing_user_is_returned_unchanged() {
        let store = MemoryStore::new();
        store.create_user(&User::new(4, "Ada", "ada@example.com")).unwrap();
        let first = ensure_user(&store, 4).unwrap();
        let second = ensure_user(&store, 4).unwrap();
        assert!(!first.created && !second.created);
        assert_eq!(first.value, second.value);
        assert_eq!(first.value.name, "Ada");
        assert_eq!(store.user_creates.get(), 1);
    }

    #[test]
    fn test_user_lookup_failure_propagates() {
        let store = MemoryStore::new();
        store.fail_user_lookup.set(true);
        let err = ensure_user(&store, 1).unwrap_err();
        assert!(matches!(err, Error::Statement { op: StoreOp::QueryingUserById, .. }));
        assert_eq!(store.user_creates.get(), 0);
    }

    #[test]
    fn test_user_create_failure_propagates() {
        let store = MemoryStore::new();
        store.fail_user_create.set(true);
        let err = ensure_user(&store, 1).unwrap_err();
        assert!(matches!(err, Error::Statement { op: StoreOp::CreatingUser, .. }));
        assert_eq!(store.user_creates.get(), 1);
        assert!(store.users.borrow().is_empty());
    }

    #[test]
    fn test_creates_missing_account() {
        let store = MemoryStore::new();
        ensure_user(&store, 9).unwrap();
        let ensured = ensure_account(&store, 9).unwrap();
        assert!(ensured.created);
        assert_eq!(ensured.value.user_id, 9);
        assert_eq!(ensured.value.balance, 0.0);
        assert!(!ensured.value.active);
        let again = ensure_account(&store, 9).unwrap();
        assert!(!again.created);
        assert_eq!(again.value.id, ensured.value.id);
        assert_eq!(store.account_creates.get(), 1);
    }

    #[test]
    fn test_account_create_failure_propagates() {
        let store = MemoryStore::new();
        ensure_user(&store, 9).unwrap();
        store.fail_account_create.set(true);
        let err = ensure_account(&store, 9).unwrap_err();
        assert!(matches!(err, Error::Statement { op: StoreOp::CreatingAccount, .. }));
    }

    #[test]
    fn test_account_lookup_failure_propagates() {
        let store = MemoryStore::new();
        ensure_user(&store, 9).unwrap();
        store.fail_account_lookup.set(true);
        let err = ensure_account(&store, 9).unwrap_err();
        assert!(matches!(err, Error::Statement { op: StoreOp::QueryingAccountByUserId, .. }));
        assert_eq!(store.account_creates.get(), 0);
        assert!(store.accounts.borrow().is_empty());
    }

    #[test]
    fn test_account_refetch_failure_propagates() {
        let store = MemoryStore::new();
        ensure_user(&store, 9).unwrap();
        store.lose_created_accounts.set(true);
        let err = ensure_account(&store, 9).unwrap_err();
        assert!(matches!(err, Error::NotFound(Entity::Account)));
        assert_eq!(store.account_creates.get(), 1);
    }

    #[test]
    fn test_lost_create_race_refetches_winner() {
        let store = MemoryStore::new();
        store.create_user(&User::new(2, "Winner", "w@example.com")).unwrap();
        store.miss_next_user_lookup.set(true);
        let ensured = ensure_user(&store, 2).unwrap();
        assert!(!ensured.created);
        assert_eq!(ensured.value.name, "Winner");
        assert_eq!(store.user_creates.get(), 2);
    }

    #[test]
    fn test_sqlite_get_or_create() {
        let (_dir, db) = test_db();
        assert!(ensure_user(&db, 1).unwrap().created);
        assert!(ensure_account(&db, 1).unwrap().created);
        assert!(!ensure_user(&db, 1).unwrap().created);
        assert!(!ensure_account(&db, 1).unwrap().created);
        assert_eq!(db.list_accounts().unwrap().len(), 1);
    }
}

use std::fmt;

use thiserror::Error;

/// Stored entity an existence error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    User,
    Account,
    Transaction,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Account => "account",
            Self::Transaction => "transaction",
        })
    }
}

/// The statement a repository operation was running when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    QueryingUserById,
    QueryingUserByEmail,
    CreatingUser,
    UpdatingUser,
    QueryingAccountById,
    QueryingAccountByUserId,
    QueryingAccounts,
    CreatingAccount,
    UpdatingAccount,
    QueryingTransactionById,
    QueryingTransactionsByAccountId,
    QueryingCreditsByAccountId,
    QueryingDebitsByAccountId,
    QueryingTransactionsByOrigin,
    CreatingTransaction,
    InitializingSchema,
}

impl fmt::Display for StoreOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::QueryingUserById => "querying user by id",
            Self::QueryingUserByEmail => "querying user by email",
            Self::CreatingUser => "creating user",
            Self::UpdatingUser => "updating user",
            Self::QueryingAccountById => "querying account by id",
            Self::QueryingAccountByUserId => "querying account by user id",
            Self::QueryingAccounts => "querying accounts",
            Self::CreatingAccount => "creating account",
            Self::UpdatingAccount => "updating account",
            Self::QueryingTransactionById => "querying transaction by id",
            Self::QueryingTransactionsByAccountId => "querying transactions by account id",
            Self::QueryingCreditsByAccountId => "querying credits by account id",
            Self::QueryingDebitsByAccountId => "querying debits by account id",
            Self::QueryingTransactionsByOrigin => "querying transactions by origin",
            Self::CreatingTransaction => "creating transaction",
            Self::InitializingSchema => "initializing schema",
        })
    }
}

/// Coarse grouping used by callers to decide how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// The caller supplied a bad file or bad record.
    Input,
    /// A record parsed but does not describe a valid transaction.
    Validation,
    /// The store failed, or an entity was missing or duplicated.
    Persistence,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("file path is empty")]
    FilePathIsEmpty,

    #[error("file could not be opened: {0}")]
    FileCouldNotBeOpened(#[source] std::io::Error),

    #[error("file is empty")]
    FileIsEmpty,

    #[error("file could not be read: {0}")]
    FileCouldNotBeRead(#[source] csv::Error),

    #[error("file line {line} is invalid: {reason}")]
    FileLineInvalid { line: u64, reason: String },

    #[error("invalid {entity} id {raw:?}")]
    InvalidId { entity: Entity, raw: String },

    #[error("transaction amount is zero")]
    TransactionAmountIsZero,

    #[error("transaction origin is empty")]
    TransactionOriginIsEmpty,

    #[error("transaction date is invalid")]
    TransactionDateIsInvalid,

    #[error("{0} not found")]
    NotFound(Entity),

    #[error("{0} already created")]
    AlreadyCreated(Entity),

    #[error("error opening database: {0}")]
    OpeningDatabase(#[source] rusqlite::Error),

    #[error("error beginning transaction: {0}")]
    BeginningTransaction(#[source] rusqlite::Error),

    #[error("error committing transaction: {0}")]
    CommittingTransaction(#[source] rusqlite::Error),

    #[error("error {op}: {source}")]
    Statement {
        op: StoreOp,
        #[source]
        source: rusqlite::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl Error {
    pub fn category(&self) -> Category {
        match self {
            Self::FilePathIsEmpty
            | Self::FileCouldNotBeOpened(_)
            | Self::FileIsEmpty
            | Self::FileCouldNotBeRead(_)
            | Self::FileLineInvalid { .. }
            | Self::InvalidId { .. }
            | Self::Io(_) => Category::Input,
            Self::TransactionAmountIsZero
            | Self::TransactionOriginIsEmpty
            | Self::TransactionDateIsInvalid => Category::Validation,
            Self::NotFound(_)
            | Self::AlreadyCreated(_)
            | Self::OpeningDatabase(_)
            | Self::BeginningTransaction(_)
            | Self::CommittingTransaction(_)
            | Self::Statement { .. }
            | Self::Settings(_) => Category::Persistence,
        }
    }

    pub(crate) fn line_invalid(line: u64, reason: impl Into<String>) -> Self {
        Self::FileLineInvalid {
            line,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(Error::FileIsEmpty.category(), Category::Input);
        assert_eq!(Error::line_invalid(3, "bad amount").category(), Category::Input);
        assert_eq!(Error::TransactionAmountIsZero.category(), Category::Validation);
        let bad_id = Error::InvalidId {
            entity: Entity::Transaction,
            raw: "xyz".into(),
        };
        assert_eq!(bad_id.category(), Category::Input);
        assert_eq!(bad_id.to_string(), "invalid transaction id \"xyz\"");
        assert_eq!(Error::NotFound(Entity::User).category(), Category::Persistence);
    }

    #[test]
    fn test_messages_name_the_failing_step() {
        let err = Error::Statement {
            op: StoreOp::CreatingAccount,
            source: rusqlite::Error::QueryReturnedNoRows,
        };
        assert!(err.to_string().starts_with("error creating account"));
        assert_eq!(Error::NotFound(Entity::Account).to_string(), "account not found");
        assert_eq!(
            Error::line_invalid(4, "expected 3 fields, got 2").to_string(),
            "file line 4 is invalid: expected 3 fields, got 2"
        );
    }
}

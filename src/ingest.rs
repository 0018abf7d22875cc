use std::fs::File;
use std::io::{BufReader, Read};

use csv::StringRecord;
use tracing::{debug, error, info};

use crate::ensure::{ensure_account, ensure_user};
use crate::error::{Error, Result};
use crate::models::{Transaction, TxFile};
use crate::repository::{AccountStore, TransactionStore, UserStore};
use crate::validator::validate_record;

// ---------------------------------------------------------------------------
// File checks
// ---------------------------------------------------------------------------

/// Confirm a local file can be opened, handing back the unread handle.
pub fn check_file(file: &TxFile) -> Result<File> {
    if file.path.as_os_str().is_empty() {
        return Err(Error::FilePathIsEmpty);
    }
    File::open(&file.path).map_err(Error::FileCouldNotBeOpened)
}

// ---------------------------------------------------------------------------
// FileIngestor
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IngestReport {
    pub records: usize,
    pub users_created: usize,
    pub accounts_created: usize,
    pub transactions_persisted: usize,
}

/// Turns a `userID,month/day,amount` CSV stream into stored transactions.
///
/// Records are read and resolved one at a time: validate, ensure the user,
/// ensure the account, build the transaction. Any failure aborts the file
/// and drops the transactions built so far; users and accounts created for
/// earlier records stay. Once the whole file resolves, transactions are
/// persisted in file order, each in its own database transaction. A failed
/// create stops there and earlier creates stay committed.
pub struct FileIngestor<'a, U: ?Sized, A: ?Sized, T: ?Sized> {
    users: &'a U,
    accounts: &'a A,
    transactions: &'a T,
}

impl<'a, U, A, T> FileIngestor<'a, U, A, T>
where
    U: UserStore + ?Sized,
    A: AccountStore + ?Sized,
    T: TransactionStore + ?Sized,
{
    pub fn new(users: &'a U, accounts: &'a A, transactions: &'a T) -> Self {
        Self {
            users,
            accounts,
            transactions,
        }
    }

    /// Ingest a local file named by `file.path`.
    pub fn ingest_path(&self, file: &TxFile) -> Result<IngestReport> {
        let handle = check_file(file)?;
        self.ingest_reader(file, BufReader::new(handle))
    }

    /// Ingest an already-open stream. `file.name` becomes the origin of
    /// every transaction.
    pub fn ingest_reader<R: Read>(&self, file: &TxFile, reader: R) -> Result<IngestReport> {
        info!(file = %file.name, lines = file.lines, hash = %file.hash, "ingesting file");
        let mut report = IngestReport::default();
        let txns = match self.read_records(file, reader, &mut report) {
            Ok(txns) => txns,
            Err(e) => {
                error!(file = %file.name, error = %e, "aborting file");
                return Err(e);
            }
        };
        self.persist(&txns, &mut report)?;
        info!(
            file = %file.name,
            records = report.records,
            users_created = report.users_created,
            accounts_created = report.accounts_created,
            "file ingested"
        );
        Ok(report)
    }

    fn read_records<R: Read>(
        &self,
        file: &TxFile,
        reader: R,
        report: &mut IngestReport,
    ) -> Result<Vec<Transaction>> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut record = StringRecord::new();

        // The header's contents are not checked, only its presence.
        match rdr.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => return Err(Error::FileIsEmpty),
            Err(e) => return Err(Error::FileCouldNotBeRead(e)),
        }

        let mut txns = Vec::new();
        let mut line = 1u64;
        loop {
            line += 1;
            match rdr.read_record(&mut record) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => return Err(Error::FileCouldNotBeRead(e)),
            }
            if let Some(pos) = record.position() {
                line = pos.line();
            }
            debug!(line, "reading record");

            let valid = validate_record(record.iter(), line)?;
            let user = ensure_user(self.users, valid.user_id)?;
            let account = ensure_account(self.accounts, user.value.id)?;
            let txn = Transaction::new(account.value.id, valid.amount, Some(valid.date), &file.name)
                .inspect_err(|e| error!(line, error = %e, "invalid transaction"))?;

            report.records += 1;
            report.users_created += usize::from(user.created);
            report.accounts_created += usize::from(account.created);
            txns.push(txn);
        }
        Ok(txns)
    }

    fn persist(&self, txns: &[Transaction], report: &mut IngestReport) -> Result<()> {
        for txn in txns {
            if let Err(e) = self.transactions.create_transaction(txn) {
                error!(
                    persisted = report.transactions_persisted,
                    remaining = txns.len() - report.transactions_persisted,
                    error = %e,
                    "persisting stopped, earlier transactions stay committed"
                );
                return Err(e);
            }
            report.transactions_persisted += 1;
        }
        info!(count = report.transactions_persisted, "transactions persisted");
        Ok(())
    }
}

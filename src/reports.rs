use std::collections::BTreeMap;

use chrono::Datelike;

use crate::error::Result;
use crate::models::{Account, Transaction};
use crate::repository::{AccountStore, TransactionStore};

// ---------------------------------------------------------------------------
// Account summary
// ---------------------------------------------------------------------------

pub struct MonthCount {
    pub month: u32,
    pub count: usize,
}

pub struct AccountSummary {
    pub account: Account,
    pub balance: f64,
    pub credits: usize,
    pub debits: usize,
    pub average_credit: f64,
    pub average_debit: f64,
    pub by_month: Vec<MonthCount>,
}

fn average(txns: &[Transaction]) -> f64 {
    if txns.is_empty() {
        return 0.0;
    }
    let total: f64 = txns.iter().map(|t| t.amount).sum();
    total / txns.len() as f64
}

pub fn get_summary<A, T>(accounts: &A, transactions: &T, user_id: i64) -> Result<AccountSummary>
where
    A: AccountStore + ?Sized,
    T: TransactionStore + ?Sized,
{
    let account = accounts.get_account_by_user(user_id)?;
    let credits = transactions.list_credits(account.id)?;
    let debits = transactions.list_debits(account.id)?;

    let mut by_month: BTreeMap<u32, usize> = BTreeMap::new();
    for txn in credits.iter().chain(&debits) {
        *by_month.entry(txn.date.month()).or_default() += 1;
    }
    let balance: f64 = credits.iter().chain(&debits).map(|t| t.amount).sum();

    Ok(AccountSummary {
        balance,
        credits: credits.len(),
        debits: debits.len(),
        average_credit: average(&credits),
        average_debit: average(&debits),
        by_month: by_month
            .into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect(),
        account,
    })
}

/// Store the summed balance on the account and mark it active once it has
/// any transactions.
pub fn sync_balance<A: AccountStore + ?Sized>(accounts: &A, summary: &AccountSummary) -> Result<Account> {
    let mut account = summary.account.clone();
    account.balance = summary.balance;
    account.active = summary.credits + summary.debits > 0;
    accounts.update_account(&account)?;
    Ok(account)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::FileIngestor;
    use crate::models::TxFile;
    use crate::testing::MemoryStore;

    fn load(store: &MemoryStore, content: &str) {
        FileIngestor::new(store, store, store)
            .ingest_reader(&TxFile::new("s.csv", "uploaded", "", 0), content.as_bytes())
            .unwrap();
    }

    #[test]
    fn test_summary_totals() {
        let store = MemoryStore::new();
        load(&store, "h\n0,7/15,+60.5\n0,7/28,-10.3\n0,8/2,-20.46\n0,8/13,+10\n1,8/1,5\n");
        let summary = get_summary(&store, &store, 0).unwrap();
        assert!((summary.balance - 39.74).abs() < 1e-9);
        assert_eq!(summary.credits, 2);
        assert_eq!(summary.debits, 2);
        assert!((summary.average_credit - 35.25).abs() < 1e-9);
        assert!((summary.average_debit + 15.38).abs() < 1e-9);
        let months: Vec<(u32, usize)> = summary.by_month.iter().map(|m| (m.month, m.count)).collect();
        assert_eq!(months, vec![(7, 2), (8, 2)]);
    }

    #[test]
    fn test_summary_for_unknown_user() {
        let store = MemoryStore::new();
        assert!(get_summary(&store, &store, 3).is_err());
    }

    #[test]
    fn test_sync_balance() {
        let store = MemoryStore::new();
        load(&store, "h\n4,1/2,+100\n4,1/3,-40\n");
        let summary = get_summary(&store, &store, 4).unwrap();
        let account = sync_balance(&store, &summary).unwrap();
        assert_eq!(account.balance, 60.0);
        assert!(account.active);
        assert_eq!(store.get_account_by_user(4).unwrap().balance, 60.0);
    }
}

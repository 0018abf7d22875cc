use comfy_table::{Cell, Table};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{Entity, Error, Result};
use crate::fmt::{money, month_day};
use crate::repository::{AccountStore, TransactionStore};

pub fn by_origin(db: &Database, origin: &str) -> Result<()> {
    db.init()?;
    let txns = db.list_by_origin(origin)?;

    let mut table = Table::new();
    table.set_header(vec!["User", "Date", "Operation", "Amount"]);
    for txn in &txns {
        let account = db.get_account(txn.account_id)?;
        table.add_row(vec![
            Cell::new(account.user_id),
            Cell::new(month_day(txn.date)),
            Cell::new(txn.operation.as_str()),
            Cell::new(money(txn.amount)),
        ]);
    }
    println!("{} transactions from {origin}\n{table}", txns.len());
    Ok(())
}

pub fn show(db: &Database, id: &str) -> Result<()> {
    db.init()?;
    let id = Uuid::parse_str(id).map_err(|_| Error::InvalidId {
        entity: Entity::Transaction,
        raw: id.to_string(),
    })?;
    let txn = db.get_transaction(id)?;
    println!("id:         {}", txn.id);
    println!("account:    {}", txn.account_id);
    println!("date:       {}", month_day(txn.date));
    println!("operation:  {}", txn.operation.as_str());
    println!("amount:     {}", money(txn.amount));
    println!("origin:     {}", txn.origin);
    println!("created at: {}", txn.created_at.to_rfc3339());
    Ok(())
}

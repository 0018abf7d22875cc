use comfy_table::{Cell, Table};

use crate::db::Database;
use crate::error::Result;
use crate::fmt::money;
use crate::repository::AccountStore;

pub fn list(db: &Database) -> Result<()> {
    db.init()?;
    let accounts = db.list_accounts()?;

    let mut table = Table::new();
    table.set_header(vec!["User", "Account", "Balance", "Active"]);
    for account in accounts {
        table.add_row(vec![
            Cell::new(account.user_id),
            Cell::new(account.id),
            Cell::new(money(account.balance)),
            Cell::new(if account.active { "yes" } else { "no" }),
        ]);
    }
    println!("Accounts\n{table}");
    Ok(())
}

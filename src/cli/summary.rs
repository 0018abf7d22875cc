use comfy_table::{Cell, Table};

use crate::db::Database;
use crate::error::Result;
use crate::fmt::{money, month_name};
use crate::reports::{get_summary, sync_balance};

pub fn run(db: &Database, user_id: i64, sync: bool) -> Result<()> {
    db.init()?;
    let summary = get_summary(db, db, user_id)?;

    println!("Account {} (user {})", summary.account.id, user_id);
    println!("Total balance: {}", money(summary.balance));
    println!("Average credit amount: {}", money(summary.average_credit));
    println!("Average debit amount: {}", money(summary.average_debit));

    let mut table = Table::new();
    table.set_header(vec!["Month", "Transactions"]);
    for row in &summary.by_month {
        table.add_row(vec![Cell::new(month_name(row.month)), Cell::new(row.count)]);
    }
    println!("{table}");

    if sync {
        let account = sync_balance(db, &summary)?;
        println!("Stored balance {} on account", money(account.balance));
    }
    Ok(())
}

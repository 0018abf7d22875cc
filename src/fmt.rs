use chrono::{Datelike, NaiveDate};

/// Dollars with thousands grouping, sign in front: `-$1,234.56`.
pub fn money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();
    let head = match digits.len() % 3 {
        0 => 3,
        n => n,
    };
    let mut dollars = digits[..head].to_string();
    for group in digits.as_bytes()[head..].chunks(3) {
        dollars.push(',');
        dollars.extend(group.iter().map(|&b| b as char));
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${dollars}.{:02}", cents % 100)
}

/// Ledger dates have no year; show them the way they are written in files.
pub fn month_day(date: NaiveDate) -> String {
    format!("{}/{}", date.month(), date.day())
}

pub fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January", "February", "March", "April", "May", "June",
        "July", "August", "September", "October", "November", "December",
    ];
    month
        .checked_sub(1)
        .and_then(|i| NAMES.get(i as usize))
        .copied()
        .unwrap_or("Unknown")
}

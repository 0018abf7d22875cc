use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{Error, Result};

/// A record that passed validation: owning user, transaction date and amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidRecord {
    pub user_id: i64,
    pub date: NaiveDate,
    pub amount: f64,
}

fn amount_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[-+]*[0-9]+(\.[0-9]*)?$").expect("static amount pattern"))
}

/// Parse a `month/day` date. The year is 0.
pub fn parse_month_day(raw: &str) -> Option<NaiveDate> {
    let (month, day) = raw.split_once('/')?;
    let number = |s: &str| -> Option<u32> {
        if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        s.parse().ok()
    };
    NaiveDate::from_ymd_opt(0, number(month)?, number(day)?)
}

/// Parse an amount such as `100.48` or `-50`. Values too large for an `f64`
/// are rejected rather than saturating to infinity.
pub fn parse_amount(raw: &str) -> Option<f64> {
    if !amount_pattern().is_match(raw) {
        return None;
    }
    raw.parse::<f64>().ok().filter(|amount| amount.is_finite())
}

/// Validate one raw CSV row of `userID,month/day,amount`. `line` is only used
/// to label the error.
pub fn validate_record<'a, I>(fields: I, line: u64) -> Result<ValidRecord>
where
    I: IntoIterator<Item = &'a str>,
{
    let fields: Vec<&str> = fields.into_iter().collect();
    if fields.len() != 3 {
        return Err(Error::line_invalid(
            line,
            format!("expected 3 fields, got {}", fields.len()),
        ));
    }
    let user_id = fields[0]
        .parse::<i64>()
        .map_err(|_| Error::line_invalid(line, format!("bad user id {:?}", fields[0])))?;
    let date = parse_month_day(fields[1])
        .ok_or_else(|| Error::line_invalid(line, format!("bad date {:?}", fields[1])))?;
    let amount = parse_amount(fields[2])
        .ok_or_else(|| Error::line_invalid(line, format!("bad amount {:?}", fields[2])))?;
    Ok(ValidRecord {
        user_id,
        date,
        amount,
    })
}

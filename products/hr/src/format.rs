//! Display strings derived from stored values. Nothing here is persisted.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};

/// `Rp 5.000.000`: whole rupiah, `.` as the thousands separator.
pub fn format_rupiah(amount: Decimal) -> String {
    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = whole.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    if whole.is_sign_negative() && !whole.is_zero() {
        format!("Rp -{grouped}")
    } else {
        format!("Rp {grouped}")
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

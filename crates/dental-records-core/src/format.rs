//! Derived-field and display helpers shared by every front end.
//!
//! All functions are pure; "today" is always passed in.

use chrono::{Datelike, NaiveDate};

/// Placeholder shown for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Full years elapsed between `date_of_birth` and `today`.
///
/// One year is subtracted when the birthday has not come round yet this year.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Age for display, `"N/A"` without a date of birth.
pub fn display_age(date_of_birth: Option<NaiveDate>, today: NaiveDate) -> String {
    match date_of_birth {
        Some(dob) => age_on(dob, today).to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Keep only ASCII digits.
pub fn digits_only(text: &str) -> String {
    text.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// `(XXX) XXX-XXXX` when the text holds exactly ten digits, otherwise the
/// text unchanged. Blank input shows as `"N/A"`.
pub fn format_phone(phone: &str) -> String {
    if phone.trim().is_empty() {
        return NOT_AVAILABLE.to_string();
    }
    let digits = digits_only(phone);
    if digits.len() == 10 {
        format!("({}) {}-{}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        phone.to_string()
    }
}

/// Two-decimal amount with a currency symbol and thousands grouping,
/// e.g. `$1,100.00`.
pub fn format_currency(amount: f64, symbol: &str) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}{}{}.{:02}", sign, symbol, whole, cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Short calendar date, e.g. `Mar 15, 1985`; `"N/A"` when absent.
pub fn format_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Upper-case initials of a first and last name.
pub fn initials(first_name: &str, last_name: &str) -> String {
    first_name
        .chars()
        .next()
        .into_iter()
        .chain(last_name.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

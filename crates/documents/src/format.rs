//! French (`fr-FR`) number and date formatting.
//!
//! Formatting is applied on top of the exact figures returned by the pricing
//! engine; nothing here feeds back into a computation.

use chrono::NaiveDate;

use meublerp_purchasing::round_to;

/// Thousands separator used by `fr-FR` (narrow no-break space).
pub const GROUP_SEPARATOR: char = '\u{202f}';

pub const DECIMAL_SEPARATOR: char = ',';

/// Decimals shown for amounts (dinar amounts carry millimes).
pub const AMOUNT_DECIMALS: usize = 3;

/// `1234.5` → `"1 234,500"` (with [`AMOUNT_DECIMALS`]).
pub fn format_amount(value: f64) -> String {
    format_decimal(value, AMOUNT_DECIMALS)
}

/// Format with a fixed number of decimals, grouping the integer part by three.
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let rounded = round_to(value, decimals as u32);
    let fixed = format!("{:.*}", decimals, rounded.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(frac);
    }
    out
}

/// Quantities: no decimals when integral, otherwise up to three.
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 {
        return format_decimal(value, 0);
    }
    let formatted = format_decimal(value, 3);
    formatted
        .trim_end_matches('0')
        .trim_end_matches(DECIMAL_SEPARATOR)
        .to_string()
}

/// Discount percentages: up to two decimals, no unit sign.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        return format_decimal(value, 0);
    }
    format_decimal(value, 2)
        .trim_end_matches('0')
        .trim_end_matches(DECIMAL_SEPARATOR)
        .to_string()
}

/// `dd/mm/yyyy`, or an empty string when unknown.
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(ch);
    }
    out
}

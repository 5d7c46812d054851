//! Input Normalisers
//!
//! Canonical spellings applied to user input before validation.

use crate::types::CurrencyType;

/// Upper-case, single-spaced plate: `"34  abc 1234 "` → `"34 ABC 1234"`.
pub fn format_plate(plate: &str) -> String {
    plate
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Digits only, at most eleven.
pub fn format_tckn(tckn: &str) -> String {
    tckn.chars().filter(char::is_ascii_digit).take(11).collect()
}

/// Upper-case IBAN in groups of four: `"TR33 0006 1005 ..."`.
pub fn format_iban(iban: &str) -> String {
    let cleaned: Vec<char> = iban
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect();

    cleaned
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// `"5551234567"` → `"(555) 123 4567"`. Anything that is not ten digits is
/// returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 10 {
        format!("({}) {} {}", &digits[..3], &digits[3..6], &digits[6..])
    } else {
        phone.to_string()
    }
}

/// Amount with Turkish grouping: `1234.5` in lira → `"₺1.234,50"`.
pub fn format_currency(amount: f64, currency: CurrencyType) -> String {
    let symbol = match currency {
        CurrencyType::TL => "₺",
        CurrencyType::USD => "$",
    };

    let fixed = format!("{:.2}", amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{},{}", sign, symbol, grouped, fraction)
}

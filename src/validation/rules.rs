//! Field Rules
//!
//! Format and checksum checks for Turkish identifiers.

use once_cell::sync::Lazy;
use regex::Regex;

static IBAN_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"^TR[0-9]{2}[0-9]{5}0[0-9]{16}$").ok());

static PLATE_PATTERN: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?i)^(0[1-9]|[1-7][0-9]|8[01])\s?[A-Z]{1,3}\s?[0-9]{2,4}$").ok());

static POSTAL_CODE_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^[0-9]{5}$").ok());

fn matches(pattern: &Lazy<Option<Regex>>, value: &str) -> bool {
    let regex: &Option<Regex> = pattern;
    regex.as_ref().map_or(false, |re| re.is_match(value))
}

/// Turkish national identity number (TCKN).
///
/// Eleven digits, no leading zero. The tenth digit is
/// `(7 * (d1+d3+d5+d7+d9) - (d2+d4+d6+d8)) mod 10` and the eleventh is the
/// sum of the first ten mod 10.
pub fn validate_tckn(tckn: &str) -> bool {
    if tckn.len() != 11 || !tckn.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let digits: Vec<i32> = tckn.bytes().map(|b| i32::from(b - b'0')).collect();
    if digits[0] == 0 {
        return false;
    }

    let odd: i32 = digits[0..9].iter().step_by(2).sum();
    let even: i32 = digits[1..8].iter().step_by(2).sum();
    if (odd * 7 - even).rem_euclid(10) != digits[9] {
        return false;
    }

    digits[..10].iter().sum::<i32>() % 10 == digits[10]
}

/// Turkish IBAN: `TR`, two check digits, five-digit bank code, a reserved
/// zero and sixteen account digits, with a valid ISO 13616 checksum.
///
/// Whitespace is ignored and letters are case-insensitive.
pub fn validate_iban(iban: &str) -> bool {
    let cleaned: String = iban
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    if !matches(&IBAN_PATTERN, &cleaned) {
        return false;
    }

    let (head, tail) = cleaned.split_at(4);
    let mut remainder: u32 = 0;
    for c in tail.chars().chain(head.chars()) {
        let value = match c.to_digit(36) {
            Some(v) => v,
            None => return false,
        };
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }
    remainder == 1
}

/// Turkish licence plate: province code 01-81, one to three letters, two to
/// four digits, optionally space separated.
pub fn validate_plate(plate: &str) -> bool {
    matches(&PLATE_PATTERN, plate.trim())
}

/// Turkish mobile number: ten digits starting with 5 once punctuation is
/// stripped.
pub fn validate_phone(phone: &str) -> bool {
    let digits: String = phone.chars().filter(char::is_ascii_digit).collect();
    digits.len() == 10 && digits.starts_with('5')
}

/// Five-digit postal code.
pub fn validate_postal_code(code: &str) -> bool {
    matches(&POSTAL_CODE_PATTERN, code)
}

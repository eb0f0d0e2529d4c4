//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::sync::OnceLock;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use regex::Regex;

use crate::utils::errors::{KindergartenError, Result};

/// Phone numbers accepted from clients before normalization
const PHONE_PATTERN: &str = r"^\+?[0-9\s\-()]{10,20}$";

/// Mobile clients send the attendance day as a 10-digit Unix timestamp
const UNIX_TIMESTAMP_PATTERN: &str = r"^\d{10}$";

fn phone_regex() -> &'static Regex {
    static PHONE: OnceLock<Regex> = OnceLock::new();
    PHONE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is valid"))
}

fn timestamp_regex() -> &'static Regex {
    static TIMESTAMP: OnceLock<Regex> = OnceLock::new();
    TIMESTAMP.get_or_init(|| Regex::new(UNIX_TIMESTAMP_PATTERN).expect("timestamp pattern is valid"))
}

/// Validate phone number format (before normalization)
pub fn is_valid_phone(phone: &str) -> bool {
    phone_regex().is_match(phone)
}

/// Normalize a phone number into international form.
///
/// Separators (spaces, dashes, parentheses) are dropped, a leading `0`
/// gets `country_prefix` prepended, and a `+` is ensured in front.
pub fn normalize_phone(phone: &str, country_prefix: &str) -> String {
    let mut normalized: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();

    if normalized.starts_with('0') {
        normalized = format!("{}{}", country_prefix, normalized);
    }

    if !normalized.starts_with('+') {
        normalized.insert(0, '+');
    }

    normalized
}

/// Convert a Unix timestamp (seconds) into the UTC calendar day
pub fn timestamp_to_date(timestamp: i64) -> Result<NaiveDate> {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| KindergartenError::Validation(format!("Некоректна дата: {}", timestamp)))
}

/// Parse the `:date` path segment of the mobile endpoints
pub fn parse_unix_timestamp(raw: &str) -> Result<i64> {
    if !timestamp_regex().is_match(raw) {
        return Err(KindergartenError::Validation(
            "Дата має бути Unix timestamp з 10 цифр".to_string(),
        ));
    }

    raw.parse::<i64>()
        .map_err(|_| KindergartenError::Validation(format!("Некоректна дата: {}", raw)))
}

/// Today's calendar day, UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a billing month (`YYYY-MM` or `YYYY-MM-DD`) into its first day
pub fn parse_payment_month(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    let parsed = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{}-01", trimmed), "%Y-%m-%d"))
        .map_err(|_| {
            KindergartenError::Validation(format!("Некоректний місяць оплати: {}", raw))
        })?;

    Ok(first_day_of_month(parsed))
}

/// First day of the month containing `date`
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Ukrainian month name in the nominative case, `month` is 1-based
pub fn ukrainian_month_name(month: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "січень", "лютий", "березень", "квітень", "травень", "червень",
        "липень", "серпень", "вересень", "жовтень", "листопад", "грудень",
    ];

    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("")
}

/// "січень 2025 р." style label used in billing messages
pub fn format_payment_month(date: NaiveDate) -> String {
    format!("{} {} р.", ukrainian_month_name(date.month()), date.year())
}

/// Calculate pagination offset
pub fn calculate_offset(page: i64, page_size: i64) -> i64 {
    (page.max(1) - 1).saturating_mul(page_size)
}

/// Number of pages needed for `total_items`
pub fn total_pages(total_items: i64, page_size: i64) -> i64 {
    if page_size <= 0 {
        return 0;
    }
    (total_items + page_size - 1) / page_size
}

/// Trim a required text field, rejecting blanks and over-long values
pub fn require_text(value: &str, field: &str, max_len: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(KindergartenError::Validation(format!("Поле {} є обов'язковим", field)));
    }
    if trimmed.chars().count() > max_len {
        return Err(KindergartenError::Validation(format!(
            "Поле {} не може перевищувати {} символів",
            field, max_len
        )));
    }
    Ok(trimmed.to_string())
}

/// `require_text` for fields of a partial update
pub fn optional_text(value: Option<&str>, field: &str, max_len: usize) -> Result<Option<String>> {
    value.map(|v| require_text(v, field, max_len)).transpose()
}

/// Reject optional notes over the length limit
pub fn check_notes(notes: Option<&str>) -> Result<()> {
    if let Some(notes) = notes {
        if notes.chars().count() > 500 {
            return Err(KindergartenError::Validation(
                "Примітки не можуть перевищувати 500 символів".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("050 123-4567", "+38"), "+380501234567");
        assert_eq!(normalize_phone("(050) 123 45 67", "+38"), "+380501234567");
        assert_eq!(normalize_phone("380501234567", "+38"), "+380501234567");
        assert_eq!(normalize_phone("+380501234567", "+38"), "+380501234567");
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("050 123-4567"));
        assert!(is_valid_phone("+380501234567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("050-abc-4567"));
    }

    #[test]
    fn test_timestamp_to_date_uses_utc() {
        // 2024-03-10T23:30:00Z is already the 11th in Kyiv; the UTC day wins
        let date = timestamp_to_date(1_710_113_400).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }

    #[test]
    fn test_parse_unix_timestamp() {
        assert_eq!(parse_unix_timestamp("1710113400").unwrap(), 1_710_113_400);
        assert!(parse_unix_timestamp("171011340").is_err());
        assert!(parse_unix_timestamp("2024-03-10").is_err());
    }

    #[test]
    fn test_parse_payment_month() {
        let expected = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        assert_eq!(parse_payment_month("2025-01").unwrap(), expected);
        assert_eq!(parse_payment_month("2025-01-17").unwrap(), expected);
        assert!(parse_payment_month("January").is_err());
    }

    #[test]
    fn test_format_payment_month() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        assert_eq!(format_payment_month(date), "вересень 2025 р.");
    }

    #[test]
    fn test_pagination_math() {
        assert_eq!(calculate_offset(1, 16), 0);
        assert_eq!(calculate_offset(3, 10), 20);
        assert_eq!(calculate_offset(0, 10), 0);
        assert_eq!(calculate_offset(i64::MAX, 16), i64::MAX);
        assert_eq!(total_pages(0, 16), 0);
        assert_eq!(total_pages(16, 16), 1);
        assert_eq!(total_pages(17, 16), 2);
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("  Сонечко ", "group_name", 100).unwrap(), "Сонечко");
        assert!(require_text("   ", "group_name", 100).is_err());
        assert!(require_text(&"а".repeat(101), "group_name", 100).is_err());
        assert_eq!(optional_text(None, "group_name", 100).unwrap(), None);
        assert!(optional_text(Some(""), "group_name", 100).is_err());
    }

    proptest! {
        #[test]
        fn normalized_phone_is_plus_and_digits(digits in "[0-9]{9,12}", sep in "[ ()-]{0,3}") {
            let raw = format!("{}{}", sep, digits);
            let normalized = normalize_phone(&raw, "+38");
            prop_assert!(normalized.starts_with('+'));
            prop_assert!(normalized[1..].chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn normalize_phone_is_idempotent(digits in "0[0-9]{9}") {
            let once = normalize_phone(&digits, "+38");
            prop_assert_eq!(normalize_phone(&once, "+38"), once.clone());
        }
    }
}

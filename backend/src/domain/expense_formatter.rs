//! Display formatting for expenses.
//!
//! Turns dates and values into the short strings list rows show, so views do
//! not need their own date or currency logic.

use chrono::NaiveDate;

use crate::config::ExpenseTrackerConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFormatter {
    currency_code: String,
    decimal_places: usize,
}

impl Default for ExpenseFormatter {
    fn default() -> Self {
        Self::new("GBP")
    }
}

impl ExpenseFormatter {
    pub fn new(currency_code: &str) -> Self {
        let currency_code = currency_code.trim().to_uppercase();
        let decimal_places = match currency_code.as_str() {
            "JPY" | "KRW" => 0,
            _ => 2,
        };
        Self {
            currency_code,
            decimal_places,
        }
    }

    pub fn from_config(config: &ExpenseTrackerConfig) -> Self {
        Self::new(&config.currency_code)
    }

    pub fn currency_code(&self) -> &str {
        &self.currency_code
    }

    /// Abbreviated month and day, e.g. "Jan 5"
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format("%b %-d").to_string()
    }

    /// Value with currency symbol, sign in front: "£3.50", "-£2.00"
    pub fn format_value(&self, value: f64) -> String {
        let sign = if value < 0.0 { "-" } else { "" };
        let amount = format!("{:.*}", self.decimal_places, value.abs());
        match self.symbol() {
            Some(symbol) => format!("{}{}{}", sign, symbol, amount),
            None => format!("{}{} {}", sign, self.currency_code, amount),
        }
    }

    fn symbol(&self) -> Option<&'static str> {
        match self.currency_code.as_str() {
            "GBP" => Some("£"),
            "USD" | "CAD" | "AUD" | "NZD" => Some("$"),
            "EUR" => Some("€"),
            "JPY" => Some("¥"),
            "INR" => Some("₹"),
            "KRW" => Some("₩"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_value_in_pounds() {
        let formatter = ExpenseFormatter::default();
        assert_eq!(formatter.format_value(3.5), "£3.50");
        assert_eq!(formatter.format_value(900.0), "£900.00");
        assert_eq!(formatter.format_value(-2.0), "-£2.00");
        assert_eq!(formatter.format_value(0.0), "£0.00");
    }

    #[test]
    fn test_format_value_zero_decimal_currency() {
        let formatter = ExpenseFormatter::new("jpy");
        assert_eq!(formatter.currency_code(), "JPY");
        assert_eq!(formatter.format_value(1200.0), "¥1200");
    }

    #[test]
    fn test_unknown_currency_uses_code_prefix() {
        let formatter = ExpenseFormatter::new("CHF");
        assert_eq!(formatter.format_value(-4.25), "-CHF 4.25");
    }

    #[test]
    fn test_format_date_short_month_day() {
        let formatter = ExpenseFormatter::default();
        assert_eq!(formatter.format_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()), "Jan 5");
        assert_eq!(formatter.format_date(NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()), "Dec 25");
    }
}

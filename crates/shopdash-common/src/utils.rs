//! Display formatting helpers shared by the data and presentation crates.

use serde::{Deserialize, Serialize};

/// How monetary amounts are rendered in metric displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencyStyle {
    /// Symbol placed before the amount, separated by a space.
    pub symbol: String,
    /// Digit group separator for the integer part.
    pub thousands_separator: String,
    /// Separator between integer and fractional part.
    pub decimal_separator: String,
    /// Number of fractional digits.
    pub decimals: usize,
}

impl Default for CurrencyStyle {
    fn default() -> Self {
        Self {
            symbol: "AU$".to_string(),
            thousands_separator: ".".to_string(),
            decimal_separator: ",".to_string(),
            decimals: 2,
        }
    }
}

/// Formats an amount of money, e.g. `AU$ 1.234.567,89` with the default style.
pub fn format_currency(amount: f64, style: &CurrencyStyle) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let fixed = format!("{:.*}", style.decimals, amount.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut amount_text = group_digits(int_part, &style.thousands_separator);
    if let Some(frac) = frac_part {
        amount_text.push_str(&style.decimal_separator);
        amount_text.push_str(frac);
    }

    if style.symbol.is_empty() {
        format!("{sign}{amount_text}")
    } else {
        format!("{sign}{} {amount_text}", style.symbol)
    }
}

/// Inserts `separator` between every group of three digits, counting from the right.
pub fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push_str(separator);
        }
        grouped.push(ch);
    }
    grouped
}

/// Truncates a label to at most `max_chars` characters, ending with "..." when cut.
pub fn truncate_label(input: &str, max_chars: usize) -> String {
    if input.chars().count() <= max_chars {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Display label for a grouping key that may be missing.
pub fn key_label(key: Option<&str>) -> &str {
    key.unwrap_or("(unknown)")
}

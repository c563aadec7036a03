//! Number and text formatting for the price blocks.
//!
//! Prices follow en-US locale grouping: comma thousands separators, at most
//! three fraction digits, no trailing zeros.

const MAX_PRICE_FRACTION_DIGITS: usize = 3;

/// Class indicator attached to the change figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDirection {
    Positive,
    Negative,
}

impl ChangeDirection {
    pub fn of(change: f64) -> Self {
        // -0.0 >= 0.0 holds, so a signed zero reads as positive
        if change >= 0.0 {
            ChangeDirection::Positive
        } else {
            ChangeDirection::Negative
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            ChangeDirection::Positive => "positive",
            ChangeDirection::Negative => "negative",
        }
    }
}

/// Upper-cases the first character and leaves the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `9000` -> `9,000`, `10380.45` -> `10,380.45`, `0.12345` -> `0.123`.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return price.to_string();
    }

    let fixed = format!("{:.*}", MAX_PRICE_FRACTION_DIGITS, price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    let rounds_to_zero = int_part.bytes().all(|b| b == b'0') && frac_part.is_empty();
    if price < 0.0 && !rounds_to_zero {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

/// `1.5` -> `+1.50%`, `-0.32` -> `-0.32%`, `0` -> `+0.00%`.
pub fn format_change(change: f64) -> String {
    match ChangeDirection::of(change) {
        ChangeDirection::Positive => format!("+{:.2}%", change.abs()),
        ChangeDirection::Negative => format!("{:.2}%", change),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Escapes text for use inside element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

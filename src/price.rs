//! Pulls a numeric amount and an optional currency out of free-form price text
//! such as `"$1,299.99"`, `"1.299,99 €"` or `"EUR 12,50"`.

use once_cell::sync::Lazy;
use regex::Regex;

const SYMBOLS: &[&str] = &[
    "US$", "HK$", "NZ$", "C$", "A$", "R$", "$", "€", "£", "¥", "₹", "₽", "₩", "₺", "₪", "₫", "฿",
    "₴", "₱",
];

const CODES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "CNY", "CAD", "AUD", "NZD", "CHF", "INR", "RUB", "BRL", "PLN",
    "SEK", "NOK", "DKK", "CZK", "HUF", "TRY", "MXN", "zł", "Kč", "kr", "Ft", "lei", "руб",
];

static CURRENCY: Lazy<Regex> = Lazy::new(|| {
    let escape = |items: &[&str]| items.iter().map(|s| regex::escape(s)).collect::<Vec<_>>().join("|");
    Regex::new(&format!(r"(?:{})|\b(?:{})\b", escape(SYMBOLS), escape(CODES)))
        .expect("currency pattern is valid")
});

// Digits with optional space/apostrophe thousands groups and `.`/`,` parts,
// or a bare fraction such as `.99`.
static AMOUNT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:[ \x{A0}\x{202F}'’]\d{3}\b)*(?:[.,]\d+)*|[.,]\d+").expect("amount pattern is valid")
});

#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: Option<f64>,
    pub currency: Option<String>,
}

impl Price {
    pub fn from_text(text: &str) -> Self {
        let currency = CURRENCY.find(text).map(|m| m.as_str().to_string());
        let amount = AMOUNT.find(text).and_then(|m| normalize_amount(m.as_str()));
        Self { amount, currency }
    }
}

/// Renders an amount the way it reads in the store: `10.0`, `9.99`.
pub fn format_amount(value: f64) -> String {
    format!("{value:?}")
}

fn normalize_amount(raw: &str) -> Option<f64> {
    let digits: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'' && *c != '’')
        .collect();

    let canonical = match (digits.rfind('.'), digits.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, grouping) = if dot > comma { ('.', ',') } else { (',', '.') };
            digits.replace(grouping, "").replace(decimal, ".")
        }
        (Some(_), None) => single_separator(&digits, '.'),
        (None, Some(_)) => single_separator(&digits, ','),
        (None, None) => digits,
    };
    let canonical = if canonical.starts_with('.') { format!("0{canonical}") } else { canonical };
    canonical.parse().ok()
}

// With only one kind of separator, repeated use or exactly three trailing
// digits after a non-zero, non-empty integer part means thousands grouping.
fn single_separator(digits: &str, sep: char) -> String {
    let grouping = digits.matches(sep).count() > 1
        || digits
            .split_once(sep)
            .is_some_and(|(int, frac)| frac.len() == 3 && !int.is_empty() && int != "0");
    if grouping {
        digits.replace(sep, "")
    } else {
        digits.replace(sep, ".")
    }
}

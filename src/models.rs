use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TrackerError};

/// Tag/class pairs locating the price and, as a fallback, the currency symbol.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Selectors {
    pub price_tag_type: String,
    pub price_identifier: String,
    pub currency_tag_type: String,
    pub currency_identifier: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub name: String,
    pub url: String,
    #[serde(flatten)]
    pub selectors: Selectors,
    #[serde(deserialize_with = "number_or_text")]
    pub target_price: f64,
    #[serde(deserialize_with = "number_or_text")]
    pub current_price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
}

impl Product {
    /// New products start one unit above target so the first run always reports a change.
    pub fn new(name: String, url: String, selectors: Selectors, target_price: f64) -> Self {
        Self {
            name,
            url,
            selectors,
            target_price,
            current_price: target_price + 1.0,
            last_checked: None,
        }
    }

    pub fn field_value(&self, field: ProductField) -> String {
        match field {
            ProductField::Name => self.name.clone(),
            ProductField::Url => self.url.clone(),
            ProductField::PriceTagType => self.selectors.price_tag_type.clone(),
            ProductField::PriceIdentifier => self.selectors.price_identifier.clone(),
            ProductField::CurrencyTagType => self.selectors.currency_tag_type.clone(),
            ProductField::CurrencyIdentifier => self.selectors.currency_identifier.clone(),
            ProductField::TargetPrice => self.target_price.to_string(),
        }
    }

    pub fn apply(&mut self, edit: ProductEdit) {
        match edit {
            ProductEdit::Name(v) => self.name = v,
            ProductEdit::Url(v) => self.url = v,
            ProductEdit::PriceTagType(v) => self.selectors.price_tag_type = v,
            ProductEdit::PriceIdentifier(v) => self.selectors.price_identifier = v,
            ProductEdit::CurrencyTagType(v) => self.selectors.currency_tag_type = v,
            ProductEdit::CurrencyIdentifier(v) => self.selectors.currency_identifier = v,
            ProductEdit::TargetPrice(v) => self.target_price = v,
        }
    }
}

/// The user-editable fields. `current_price` is owned by the run routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Url,
    PriceTagType,
    PriceIdentifier,
    CurrencyTagType,
    CurrencyIdentifier,
    TargetPrice,
}

impl ProductField {
    pub const ALL: [Self; 7] = [
        Self::Name,
        Self::Url,
        Self::PriceTagType,
        Self::PriceIdentifier,
        Self::CurrencyTagType,
        Self::CurrencyIdentifier,
        Self::TargetPrice,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Url => "url",
            Self::PriceTagType => "price_tag_type",
            Self::PriceIdentifier => "price_identifier",
            Self::CurrencyTagType => "currency_tag_type",
            Self::CurrencyIdentifier => "currency_identifier",
            Self::TargetPrice => "target_price",
        }
    }
}

impl fmt::Display for ProductField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProductField {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim();
        Self::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| TrackerError::UnknownField(key.to_string()))
    }
}

/// A validated change to one field.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductEdit {
    Name(String),
    Url(String),
    PriceTagType(String),
    PriceIdentifier(String),
    CurrencyTagType(String),
    CurrencyIdentifier(String),
    TargetPrice(f64),
}

impl ProductEdit {
    pub fn parse(field: ProductField, value: &str) -> Result<Self> {
        let text = value.to_string();
        Ok(match field {
            ProductField::Name => Self::Name(text),
            ProductField::Url => Self::Url(text),
            ProductField::PriceTagType => Self::PriceTagType(text),
            ProductField::PriceIdentifier => Self::PriceIdentifier(text),
            ProductField::CurrencyTagType => Self::CurrencyTagType(text),
            ProductField::CurrencyIdentifier => Self::CurrencyIdentifier(text),
            ProductField::TargetPrice => Self::TargetPrice(parse_number(value)?),
        })
    }
}

/// Prices must be finite: JSON has no spelling for `inf` or `NaN`.
pub fn parse_number(input: &str) -> Result<f64> {
    let invalid = |source| TrackerError::InvalidNumber { input: input.to_string(), source };
    let value = input.trim().parse::<f64>().map_err(|e| invalid(Some(e)))?;
    if value.is_finite() { Ok(value) } else { Err(invalid(None)) }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    /// (index, name) pairs in catalog order.
    pub fn listing(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.products.iter().map(|p| p.name.as_str()).enumerate()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn check_index(&self, index: usize) -> Result<()> {
        if index < self.products.len() {
            Ok(())
        } else {
            Err(TrackerError::IndexOutOfRange { index, len: self.products.len() })
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<Product> {
        self.check_index(index)?;
        Ok(self.products.remove(index))
    }
}

// Older stores hold prices edited as text, e.g. "target_price": "25".
fn number_or_text<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => parse_number(&s).map_err(serde::de::Error::custom),
    }
}

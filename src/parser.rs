use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::{Result, TrackerError};
use crate::models::Selectors;
use crate::price::Price;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPrice {
    pub amount: f64,
    /// `None` when neither the price text nor the currency element carried a symbol.
    pub currency: Option<String>,
}

/// Finds the price on a product page.
///
/// Only the first element in document order matching the price tag/class is
/// read. When its text carries no currency symbol, the first element matching
/// the currency tag/class supplies one.
pub fn extract_price(html: &str, selectors: &Selectors) -> Result<ExtractedPrice> {
    let doc = Html::parse_document(html);

    let price_text = select_first_text(&doc, &selectors.price_tag_type, &selectors.price_identifier)?
        .ok_or_else(|| TrackerError::ElementNotFound {
            tag: selectors.price_tag_type.clone(),
            class: selectors.price_identifier.clone(),
        })?;

    let price = Price::from_text(&price_text);
    let amount = price
        .amount
        .ok_or_else(|| TrackerError::PriceNotFound { text: price_text.trim().to_string() })?;

    let currency = match price.currency {
        Some(symbol) => Some(symbol),
        None => select_first_text(&doc, &selectors.currency_tag_type, &selectors.currency_identifier)
            .unwrap_or_else(|e| {
                debug!("currency lookup skipped: {e}");
                None
            })
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty()),
    };

    Ok(ExtractedPrice { amount, currency })
}

/// Text of the first `<tag class="...">` element, or `None` if nothing matches.
pub fn select_first_text(doc: &Html, tag: &str, class: &str) -> Result<Option<String>> {
    let tag = tag.trim();
    let selector = Selector::parse(tag).map_err(|e| TrackerError::InvalidSelector {
        selector: tag.to_string(),
        reason: e.to_string(),
    })?;

    let mut matches = doc.select(&selector).filter(|el| has_class(el, class));
    let first = matches.next().map(|el| el.text().collect::<String>());
    if first.is_some() {
        let ignored = matches.count();
        if ignored > 0 {
            debug!(tag, class, ignored, "using first of several matching elements");
        }
    }
    Ok(first)
}

// Matches either the whole class attribute or any single class in it.
fn has_class(el: &ElementRef, class: &str) -> bool {
    let wanted = class.trim();
    el.value()
        .attr("class")
        .is_some_and(|attr| attr.trim() == wanted || attr.split_whitespace().any(|c| c == wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors(price: (&str, &str), currency: (&str, &str)) -> Selectors {
        Selectors {
            price_tag_type: price.0.into(),
            price_identifier: price.1.into(),
            currency_tag_type: currency.0.into(),
            currency_identifier: currency.1.into(),
        }
    }

    #[test]
    fn reads_price_with_embedded_symbol() {
        let html = r#"<html><body><span class="price">$1,049.00</span></body></html>"#;
        let got = extract_price(html, &selectors(("span", "price"), ("span", "cur"))).unwrap();
        assert_eq!(got, ExtractedPrice { amount: 1049.0, currency: Some("$".into()) });
    }

    #[test]
    fn falls_back_to_currency_element() {
        let html = r#"<div>
            <span class="a-price-symbol">€</span>
            <span class="a-price-whole big">24,99</span>
        </div>"#;
        let sel = selectors(("span", "a-price-whole"), ("span", "a-price-symbol"));
        let got = extract_price(html, &sel).unwrap();
        assert_eq!(got.amount, 24.99);
        assert_eq!(got.currency.as_deref(), Some("€"));
    }

    #[test]
    fn missing_currency_element_leaves_currency_empty() {
        let html = r#"<p class="cost">12.50</p>"#;
        let got = extract_price(html, &selectors(("p", "cost"), ("span", "symbol"))).unwrap();
        assert_eq!(got, ExtractedPrice { amount: 12.5, currency: None });
    }

    #[test]
    fn first_match_wins() {
        let html = r#"<span class="price">5.00</span><span class="price">7.00</span>"#;
        let got = extract_price(html, &selectors(("span", "price"), ("span", "cur"))).unwrap();
        assert_eq!(got.amount, 5.0);
    }

    #[test]
    fn tag_and_class_must_both_match() {
        let html = r#"<div class="price">5.00</div><span class="other">7.00</span>"#;
        let err = extract_price(html, &selectors(("span", "price"), ("span", "cur"))).unwrap_err();
        assert!(matches!(err, TrackerError::ElementNotFound { ref tag, ref class } if tag == "span" && class == "price"));
    }

    #[test]
    fn zero_matches_is_not_found() {
        let err = extract_price("<html></html>", &selectors(("span", "price"), ("span", "cur"))).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn element_without_digits() {
        let html = r#"<span class="price">Sold out</span>"#;
        let err = extract_price(html, &selectors(("span", "price"), ("span", "cur"))).unwrap_err();
        assert!(matches!(err, TrackerError::PriceNotFound { ref text } if text == "Sold out"));
    }

    #[test]
    fn bad_tag_is_invalid_selector() {
        let doc = Html::parse_document("<p class='x'>1</p>");
        let err = select_first_text(&doc, "", "x").unwrap_err();
        assert!(matches!(err, TrackerError::InvalidSelector { .. }));
    }
}

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Result, TrackerError};
use crate::fetcher::PageSource;
use crate::models::Catalog;
use crate::notifier::Notifier;
use crate::parser::extract_price;
use crate::price::format_amount;
use crate::store::CatalogStore;

#[derive(Debug, Default, PartialEq)]
pub struct CheckReport {
    pub body: String,
    pub price_changed: bool,
    pub failures: usize,
}

#[derive(Debug, PartialEq)]
pub struct RunOutcome {
    pub report: CheckReport,
    /// Id of the queued message, if one was sent.
    pub message_id: Option<String>,
}

/// Scrapes every product in order, updating `current_price` in place.
///
/// Fetch and extraction failures are written into the report body and never
/// stop the loop; the affected product keeps its stored price.
pub fn check_prices(catalog: &mut Catalog, pages: &dyn PageSource, default_currency: &str) -> CheckReport {
    let mut report = CheckReport::default();

    for product in &mut catalog.products {
        let html = match pages.fetch(&product.url) {
            Ok(html) => html,
            Err(e) => {
                warn!(product = %product.name, "{e}");
                report.body.push_str(&format!("Failed to get page {} for {}\n", product.url, product.name));
                report.failures += 1;
                continue;
            }
        };

        let extracted = match extract_price(&html, &product.selectors) {
            Ok(extracted) => extracted,
            Err(e) => {
                warn!(product = %product.name, "{e}");
                report.body.push_str(&format!("Could not get product info for {}.\n", product.name));
                report.failures += 1;
                continue;
            }
        };

        let old_price = product.current_price;
        if extracted.amount != old_price {
            info!(product = %product.name, old = old_price, new = extracted.amount, "price changed");
            report.price_changed = true;
            product.current_price = extracted.amount;
        }
        product.last_checked = Some(Utc::now());

        let currency = extracted.currency.as_deref().unwrap_or(default_currency);
        report.body.push_str(&format!(
            "{} costs {currency}{}. Old Price: {currency}{}\n\n",
            product.name,
            format_amount(extracted.amount),
            format_amount(old_price),
        ));
    }

    report
}

/// Load, scrape, save, then text the summary if anything moved or `force` is set.
pub fn run(
    store: &CatalogStore,
    pages: &dyn PageSource,
    notifier: &dyn Notifier,
    force: bool,
    default_currency: &str,
) -> Result<RunOutcome> {
    let mut catalog = store.load()?;
    let report = check_prices(&mut catalog, pages, default_currency);
    store.save(&catalog)?;

    let message_id = if force || report.price_changed {
        Some(notifier.send(&report.body)?)
    } else {
        info!("no price changes, not sending a message");
        None
    };

    Ok(RunOutcome { report, message_id })
}

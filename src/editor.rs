//! Interactive catalog maintenance: add, remove, edit and show.
//!
//! Prompts go to any `Write` and answers come from any `BufRead`, so the
//! binary wires in stdin/stdout while tests script the conversation.

use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::error::{Result, TrackerError};
use crate::models::{Catalog, Product, ProductEdit, ProductField, Selectors, parse_number};
use crate::price::format_amount;
use crate::store::CatalogStore;

pub struct Editor<'a, R, W> {
    store: &'a CatalogStore,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Editor<'a, R, W> {
    pub fn new(store: &'a CatalogStore, input: R, output: W) -> Self {
        Self { store, input, output }
    }

    fn prompt(&mut self, label: &str) -> Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input ended").into());
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn prompt_index(&mut self, label: &str) -> Result<usize> {
        let answer = self.prompt(label)?;
        answer
            .trim()
            .parse()
            .map_err(|source| TrackerError::InvalidIndex { input: answer.clone(), source })
    }

    /// Two-column index/name table.
    pub fn list(&mut self, catalog: &Catalog) -> Result<()> {
        writeln!(self.output, "{:<13}{}", "INDEX", "PRODUCT NAME")?;
        for (index, name) in catalog.listing() {
            writeln!(self.output, "{index:<13}{name}")?;
        }
        Ok(())
    }

    pub fn add(&mut self) -> Result<Product> {
        let name = self.prompt("Name of the Product: ")?;
        let url = self.prompt("URL of Product: ")?;
        let price_tag_type = self.prompt("Type of element holding the price? <div, span, etc>: ")?;
        let price_identifier = self.prompt("class=(without quotation marks): ")?;
        let currency_tag_type = self.prompt("Type of element holding the currency? <div, span, etc>: ")?;
        let currency_identifier = self.prompt("class=(without quotation marks): ")?;
        let target_price = parse_number(&self.prompt("Target price (Just whole number without commas etc) <=: ")?)?;

        let selectors = Selectors { price_tag_type, price_identifier, currency_tag_type, currency_identifier };
        let product = Product::new(name, url, selectors, target_price);

        let mut catalog = self.store.load_or_default()?;
        catalog.products.push(product.clone());
        self.store.save(&catalog)?;

        writeln!(self.output, "Successfully added \"{}\" to list of tracked products!", product.name)?;
        Ok(product)
    }

    pub fn remove(&mut self) -> Result<Product> {
        let mut catalog = self.store.load()?;
        self.list(&catalog)?;
        let index = self.prompt_index("\nIndex of product to remove: ")?;

        let removed = catalog.remove(index)?;
        self.store.save(&catalog)?;

        writeln!(self.output, "Successfully stopped tracking {}", removed.name)?;
        Ok(removed)
    }

    pub fn edit(&mut self) -> Result<ProductEdit> {
        let mut catalog = self.store.load()?;
        self.list(&catalog)?;
        let index = self.prompt_index("Index of product to update: ")?;
        catalog.check_index(index)?;

        writeln!(self.output, "PARAMETERS:")?;
        for field in ProductField::ALL {
            writeln!(self.output, "  {field}")?;
        }
        let field: ProductField = self.prompt("Parameter to change: ")?.parse()?;
        let old_value = catalog.products[index].field_value(field);
        writeln!(self.output, "Old parameter value: {old_value}")?;

        let edit = ProductEdit::parse(field, &self.prompt("New value for parameter: ")?)?;
        catalog.products[index].apply(edit.clone());
        self.store.save(&catalog)?;

        writeln!(self.output, "Successfully edited product information")?;
        Ok(edit)
    }

    /// Prints name, last price and target for every product.
    pub fn show(&mut self) -> Result<()> {
        let catalog = match self.store.load() {
            Ok(catalog) if !catalog.is_empty() => Some(catalog),
            Ok(_) => None,
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                warn!("cannot show products: {e}");
                None
            }
        };
        let Some(catalog) = catalog else {
            writeln!(self.output, "Not tracking any products. Run `price_tracker add`")?;
            return Ok(());
        };

        writeln!(self.output, "{:<16}{:<26}{}", "NAME", "LAST_PRICE", "TARGET_PRICE")?;
        for product in &catalog.products {
            let name: String = product.name.chars().take(12).collect();
            writeln!(
                self.output,
                "{name:<16}{:<26.2}{}",
                product.current_price,
                format_amount(product.target_price)
            )?;
        }
        Ok(())
    }
}

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::PipelineError;

/// A row of the invoice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRow {
    pub id: u32,
    pub customer_id: u32,
    pub invoice_date: NaiveDate,
}

/// A row of the customer table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    pub country_id: String,
}

/// A row of the product table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: u32,
    pub name: String,
    pub price: Decimal,
    pub vat: Decimal,
}

/// A row of the item table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub invoice_id: u32,
    /// Line number within the invoice.
    pub item: u32,
    pub product_id: u32,
    pub quantity: u32,
}

/// Provider of the four query shapes the repository needs.
///
/// `Ok(None)` from a by-id lookup means "no such row"; `Err` means the
/// source itself failed and should be reported as `ResourceFailure`.
pub trait RecordSource: Send + Sync {
    /// All invoices, in the source's iteration order.
    fn invoices(&self) -> Result<Vec<InvoiceRow>, PipelineError>;

    fn customer(&self, id: u32) -> Result<Option<CustomerRow>, PipelineError>;

    fn product(&self, id: u32) -> Result<Option<ProductRow>, PipelineError>;

    /// Items of one invoice, in stored order.
    fn items(&self, invoice_id: u32) -> Result<Vec<ItemRow>, PipelineError>;
}

impl<S: RecordSource + ?Sized> RecordSource for &S {
    fn invoices(&self) -> Result<Vec<InvoiceRow>, PipelineError> {
        (**self).invoices()
    }

    fn customer(&self, id: u32) -> Result<Option<CustomerRow>, PipelineError> {
        (**self).customer(id)
    }

    fn product(&self, id: u32) -> Result<Option<ProductRow>, PipelineError> {
        (**self).product(id)
    }

    fn items(&self, invoice_id: u32) -> Result<Vec<ItemRow>, PipelineError> {
        (**self).items(invoice_id)
    }
}

/// Serialized form of a whole database: one array per table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub customers: Vec<CustomerRow>,
    #[serde(default)]
    pub products: Vec<ProductRow>,
    #[serde(default)]
    pub invoices: Vec<InvoiceRow>,
    #[serde(default)]
    pub items: Vec<ItemRow>,
}

/// In-memory record source, loaded from a [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    customers: BTreeMap<u32, CustomerRow>,
    products: BTreeMap<u32, ProductRow>,
    invoices: Vec<InvoiceRow>,
    items: Vec<ItemRow>,
}

impl MemorySource {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            customers: dataset.customers.into_iter().map(|c| (c.id, c)).collect(),
            products: dataset.products.into_iter().map(|p| (p.id, p)).collect(),
            invoices: dataset.invoices,
            items: dataset.items,
        }
    }

    /// Parse a JSON dataset.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let dataset: Dataset = serde_json::from_str(json)
            .map_err(|e| PipelineError::resource(format!("invalid record data: {e}")))?;
        Ok(Self::new(dataset))
    }

    /// Read and parse a JSON dataset file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::resource(format!("cannot open record source {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }
}

impl RecordSource for MemorySource {
    fn invoices(&self) -> Result<Vec<InvoiceRow>, PipelineError> {
        Ok(self.invoices.clone())
    }

    fn customer(&self, id: u32) -> Result<Option<CustomerRow>, PipelineError> {
        Ok(self.customers.get(&id).cloned())
    }

    fn product(&self, id: u32) -> Result<Option<ProductRow>, PipelineError> {
        Ok(self.products.get(&id).cloned())
    }

    fn items(&self, invoice_id: u32) -> Result<Vec<ItemRow>, PipelineError> {
        Ok(self
            .items
            .iter()
            .filter(|i| i.invoice_id == invoice_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const JSON: &str = r#"{
        "customers": [
            {"id": 1, "first_name": "Bruno", "last_name": "Lowagie", "street": "Kerkstraat 1",
             "postal_code": "9000", "city": "Gent", "country_id": "BE"}
        ],
        "products": [
            {"id": 3, "name": "Pen", "price": "1.50", "vat": "21"}
        ],
        "invoices": [
            {"id": 2, "customer_id": 1, "invoice_date": "2015-01-04"},
            {"id": 1, "customer_id": 1, "invoice_date": "2015-01-03"}
        ],
        "items": [
            {"invoice_id": 1, "item": 2, "product_id": 3, "quantity": 4},
            {"invoice_id": 2, "item": 1, "product_id": 3, "quantity": 1},
            {"invoice_id": 1, "item": 1, "product_id": 3, "quantity": 2}
        ]
    }"#;

    #[test]
    fn loads_json_tables() {
        let src = MemorySource::from_json(JSON).unwrap();
        let customer = src.customer(1).unwrap().unwrap();
        assert_eq!(customer.city, "Gent");
        let product = src.product(3).unwrap().unwrap();
        assert_eq!(product.price, dec!(1.50));
        assert_eq!(product.vat, dec!(21));
    }

    #[test]
    fn missing_rows_are_none() {
        let src = MemorySource::from_json(JSON).unwrap();
        assert!(src.customer(99).unwrap().is_none());
        assert!(src.product(99).unwrap().is_none());
        assert!(src.items(99).unwrap().is_empty());
    }

    #[test]
    fn keeps_stored_order() {
        let src = MemorySource::from_json(JSON).unwrap();
        let ids: Vec<u32> = src.invoices().unwrap().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);
        let lines: Vec<u32> = src.items(1).unwrap().iter().map(|i| i.item).collect();
        assert_eq!(lines, vec![2, 1]);
    }

    #[test]
    fn malformed_json_is_resource_failure() {
        let err = MemorySource::from_json("{\"invoices\": 3}").unwrap_err();
        assert!(matches!(err, PipelineError::ResourceFailure(_)));
    }

    #[test]
    fn unreadable_file_is_resource_failure() {
        let err = MemorySource::open("/definitely/not/here.json").unwrap_err();
        assert!(!err.is_per_invoice());
    }
}

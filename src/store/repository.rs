use std::sync::Arc;

use tracing::debug;

use super::cache::EntityStore;
use super::source::{CustomerRow, InvoiceRow, ItemRow, ProductRow, RecordSource};
use crate::core::{Customer, Invoice, Item, PipelineError, Product};

/// Turns record-source rows into invoices sharing customer and product
/// instances through an [`EntityStore`].
///
/// Construct one per process and pass it by reference. The record source
/// is owned by the repository and released when the repository is dropped.
pub struct InvoiceRepository<S> {
    source: S,
    store: EntityStore,
}

impl<S: RecordSource> InvoiceRepository<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            store: EntityStore::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Hand back the record source, dropping the cache.
    pub fn into_source(self) -> S {
        self.source
    }

    /// The raw invoice rows, in record-source order.
    pub fn invoice_rows(&self) -> Result<Vec<InvoiceRow>, PipelineError> {
        self.source.invoices()
    }

    /// Assemble every invoice. Fails on the first invoice that cannot be
    /// assembled; use [`invoice_rows`](Self::invoice_rows) with
    /// [`get_invoice`](Self::get_invoice) to skip individual failures.
    pub fn list_invoices(&self) -> Result<Vec<Invoice>, PipelineError> {
        self.invoice_rows()?
            .iter()
            .map(|row| self.get_invoice(row))
            .collect()
    }

    /// Assemble one invoice from its row: customer, items ordered by line
    /// number, costs and total.
    ///
    /// A line number used twice fails with `DuplicateLine`; a cost or total
    /// that does not fit a `Decimal` fails with `Arithmetic`.
    pub fn get_invoice(&self, row: &InvoiceRow) -> Result<Invoice, PipelineError> {
        let customer = self.customer(row.customer_id)?;
        let mut item_rows = self.source.items(row.id)?;
        item_rows.sort_by_key(|item| item.item);
        if let Some(pair) = item_rows.windows(2).find(|w| w[0].item == w[1].item) {
            return Err(PipelineError::DuplicateLine {
                invoice: row.id,
                line: pair[0].item,
            });
        }
        let items = item_rows
            .iter()
            .map(|item| self.item(item))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(invoice_id = row.id, items = items.len(), "assembled invoice");
        Invoice::new(row.id, customer, items, row.invoice_date)
    }

    /// Shared customer instance for `id`.
    pub fn customer(&self, id: u32) -> Result<Arc<Customer>, PipelineError> {
        self.store
            .customers
            .get_or_load(id, |id| {
                debug!(customer_id = id, "customer cache miss");
                Ok::<_, PipelineError>(self.source.customer(id)?.map(customer_from_row))
            })?
            .ok_or(PipelineError::RecordNotFound {
                entity: "customer",
                id,
            })
    }

    /// Shared product instance for `id`.
    pub fn product(&self, id: u32) -> Result<Arc<Product>, PipelineError> {
        self.store
            .products
            .get_or_load(id, |id| {
                debug!(product_id = id, "product cache miss");
                Ok::<_, PipelineError>(self.source.product(id)?.map(product_from_row))
            })?
            .ok_or(PipelineError::RecordNotFound {
                entity: "product",
                id,
            })
    }

    /// Load every customer and product the invoices reference, one at a
    /// time, so that invoices can afterwards be assembled in parallel
    /// without contending on cache misses. Dangling ids are left for
    /// [`get_invoice`](Self::get_invoice) to report.
    pub fn warm_cache(&self) -> Result<(), PipelineError> {
        for row in self.invoice_rows()? {
            skip_missing(self.customer(row.customer_id))?;
            for item in self.source.items(row.id)? {
                skip_missing(self.product(item.product_id))?;
            }
        }
        debug!(
            customers = self.store.customers.len(),
            products = self.store.products.len(),
            "entity cache warmed"
        );
        Ok(())
    }

    fn item(&self, row: &ItemRow) -> Result<Item, PipelineError> {
        let product = self.product(row.product_id)?;
        Item::new(row.item, product, row.quantity)
    }
}

fn skip_missing<T>(result: Result<T, PipelineError>) -> Result<(), PipelineError> {
    match result {
        Ok(_) | Err(PipelineError::RecordNotFound { .. }) => Ok(()),
        Err(e) => Err(e),
    }
}

fn customer_from_row(row: CustomerRow) -> Customer {
    Customer {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        street: row.street,
        postal_code: row.postal_code,
        city: row.city,
        country_id: row.country_id,
    }
}

fn product_from_row(row: ProductRow) -> Product {
    Product {
        id: row.id,
        name: row.name,
        price: row.price,
        vat: row.vat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::source::{Dataset, MemorySource};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dataset() -> Dataset {
        Dataset {
            customers: vec![CustomerRow {
                id: 1,
                first_name: "Anna".into(),
                last_name: "Peeters".into(),
                street: "Veldstraat 10".into(),
                postal_code: "9000".into(),
                city: "Gent".into(),
                country_id: "BE".into(),
            }],
            products: vec![
                ProductRow {
                    id: 10,
                    name: "Notebook".into(),
                    price: dec!(10.00),
                    vat: dec!(19),
                },
                ProductRow {
                    id: 11,
                    name: "Stapler".into(),
                    price: dec!(7.35),
                    vat: dec!(7),
                },
            ],
            invoices: vec![
                InvoiceRow {
                    id: 1,
                    customer_id: 1,
                    invoice_date: date(2015, 1, 3),
                },
                InvoiceRow {
                    id: 2,
                    customer_id: 1,
                    invoice_date: date(2015, 1, 4),
                },
            ],
            items: vec![
                ItemRow {
                    invoice_id: 1,
                    item: 1,
                    product_id: 10,
                    quantity: 2,
                },
                ItemRow {
                    invoice_id: 1,
                    item: 2,
                    product_id: 11,
                    quantity: 3,
                },
                ItemRow {
                    invoice_id: 2,
                    item: 1,
                    product_id: 10,
                    quantity: 1,
                },
            ],
        }
    }

    /// Counts by-id lookups reaching the underlying source.
    struct Counting {
        inner: MemorySource,
        customer_hits: AtomicUsize,
        product_hits: AtomicUsize,
    }

    impl RecordSource for Counting {
        fn invoices(&self) -> Result<Vec<InvoiceRow>, PipelineError> {
            self.inner.invoices()
        }
        fn customer(&self, id: u32) -> Result<Option<CustomerRow>, PipelineError> {
            self.customer_hits.fetch_add(1, Ordering::SeqCst);
            self.inner.customer(id)
        }
        fn product(&self, id: u32) -> Result<Option<ProductRow>, PipelineError> {
            self.product_hits.fetch_add(1, Ordering::SeqCst);
            self.inner.product(id)
        }
        fn items(&self, invoice_id: u32) -> Result<Vec<ItemRow>, PipelineError> {
            self.inner.items(invoice_id)
        }
    }

    #[test]
    fn assembles_costs_and_totals() {
        let repo = InvoiceRepository::new(MemorySource::new(dataset()));
        let invoices = repo.list_invoices().unwrap();
        assert_eq!(invoices.len(), 2);
        let first = &invoices[0];
        assert_eq!(first.items[0].cost, dec!(20.00));
        assert_eq!(first.items[1].cost, dec!(22.05));
        assert_eq!(first.total, dec!(42.05));
        assert_eq!(invoices[1].total, dec!(10.00));
    }

    #[test]
    fn shares_instances_across_invoices() {
        let repo = InvoiceRepository::new(MemorySource::new(dataset()));
        let invoices = repo.list_invoices().unwrap();
        assert!(Arc::ptr_eq(&invoices[0].customer, &invoices[1].customer));
        assert!(Arc::ptr_eq(
            &invoices[0].items[0].product,
            &invoices[1].items[0].product
        ));
    }

    #[test]
    fn each_id_is_fetched_once() {
        let source = Counting {
            inner: MemorySource::new(dataset()),
            customer_hits: AtomicUsize::new(0),
            product_hits: AtomicUsize::new(0),
        };
        let repo = InvoiceRepository::new(source);
        repo.list_invoices().unwrap();
        repo.list_invoices().unwrap();
        assert_eq!(repo.source().customer_hits.load(Ordering::SeqCst), 1);
        assert_eq!(repo.source().product_hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dangling_customer_is_record_not_found() {
        let mut data = dataset();
        data.invoices[1].customer_id = 77;
        let repo = InvoiceRepository::new(MemorySource::new(data));
        let rows = repo.invoice_rows().unwrap();
        assert!(repo.get_invoice(&rows[0]).is_ok());
        let err = repo.get_invoice(&rows[1]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::RecordNotFound {
                entity: "customer",
                id: 77
            }
        ));
        assert!(repo.list_invoices().is_err());
    }

    #[test]
    fn dangling_product_is_record_not_found() {
        let mut data = dataset();
        data.items[2].product_id = 99;
        let repo = InvoiceRepository::new(MemorySource::new(data));
        let rows = repo.invoice_rows().unwrap();
        let err = repo.get_invoice(&rows[1]).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::RecordNotFound {
                entity: "product",
                id: 99
            }
        ));
    }

    #[test]
    fn items_follow_line_order() {
        let mut data = dataset();
        data.items.swap(0, 1);
        let repo = InvoiceRepository::new(MemorySource::new(data));
        let rows = repo.invoice_rows().unwrap();
        let invoice = repo.get_invoice(&rows[0]).unwrap();
        let lines: Vec<u32> = invoice.items.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![1, 2]);
        assert_eq!(invoice.items[0].product.name, "Notebook");
    }

    #[test]
    fn duplicate_line_number_is_rejected() {
        let mut data = dataset();
        data.items[1].item = 1;
        let repo = InvoiceRepository::new(MemorySource::new(data));
        let rows = repo.invoice_rows().unwrap();
        let err = repo.get_invoice(&rows[0]).unwrap_err();
        assert!(matches!(err, PipelineError::DuplicateLine { invoice: 1, line: 1 }));
        assert!(err.is_per_invoice());
        assert!(repo.get_invoice(&rows[1]).is_ok());
    }

    #[test]
    fn oversized_price_fails_the_invoice_only() {
        let mut data = dataset();
        data.products[0].price = rust_decimal::Decimal::MAX;
        let repo = InvoiceRepository::new(MemorySource::new(data));
        let rows = repo.invoice_rows().unwrap();
        let err = repo.get_invoice(&rows[0]).unwrap_err();
        assert!(matches!(err, PipelineError::Arithmetic(_)));
        assert!(err.is_per_invoice());
    }

    #[test]
    fn warm_cache_loads_references_and_tolerates_dangling_ids() {
        let mut data = dataset();
        data.items[2].product_id = 99;
        let repo = InvoiceRepository::new(MemorySource::new(data));
        repo.warm_cache().unwrap();
        assert_eq!(repo.store().customers.len(), 1);
        assert_eq!(repo.store().products.len(), 2);
    }

    #[test]
    fn parallel_assembly_after_warmup_shares_products() {
        let repo = InvoiceRepository::new(MemorySource::new(dataset()));
        repo.warm_cache().unwrap();
        let rows = repo.invoice_rows().unwrap();
        let invoices: Vec<Invoice> = std::thread::scope(|s| {
            let handles: Vec<_> = rows
                .iter()
                .map(|row| {
                    let repo = &repo;
                    s.spawn(move || repo.get_invoice(row).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(Arc::ptr_eq(
            &invoices[0].items[0].product,
            &invoices[1].items[0].product
        ));
    }
}

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::PipelineError;

/// A product row, shared by every item that references it.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: u32,
    pub name: String,
    /// Net unit price.
    pub price: Decimal,
    /// VAT rate in percent (19 means 19%).
    pub vat: Decimal,
}

/// A customer row, shared by every invoice that references it.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub postal_code: String,
    pub city: String,
    /// ISO 3166-1 alpha-2 country code.
    pub country_id: String,
}

/// One invoice line. Holds the product by reference, never owns it.
#[derive(Debug, Clone)]
pub struct Item {
    /// Line number, unique within the owning invoice.
    pub line: u32,
    pub product: Arc<Product>,
    pub quantity: u32,
    /// quantity * product.price, fixed at assembly time.
    pub cost: Decimal,
}

impl Item {
    /// Fails with `Arithmetic` when quantity * price does not fit a `Decimal`.
    pub fn new(line: u32, product: Arc<Product>, quantity: u32) -> Result<Self, PipelineError> {
        let cost = Decimal::from(quantity)
            .checked_mul(product.price)
            .ok_or_else(|| {
                PipelineError::Arithmetic(format!(
                    "line {line}: {quantity} x {} overflows",
                    product.price
                ))
            })?;
        Ok(Self {
            line,
            product,
            quantity,
            cost,
        })
    }
}

/// An assembled invoice. The total is computed once, when the invoice is
/// assembled; re-assemble to pick up changes to the underlying rows.
#[derive(Debug, Clone)]
pub struct Invoice {
    pub id: u32,
    pub customer: Arc<Customer>,
    pub items: Vec<Item>,
    pub invoice_date: NaiveDate,
    pub total: Decimal,
}

impl Invoice {
    pub fn new(
        id: u32,
        customer: Arc<Customer>,
        items: Vec<Item>,
        invoice_date: NaiveDate,
    ) -> Result<Self, PipelineError> {
        let total = items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.cost))
            .ok_or_else(|| PipelineError::Arithmetic(format!("invoice {id}: total overflows")))?;
        Ok(Self {
            id,
            customer,
            items,
            invoice_date,
            total,
        })
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "\t({})\t{}\t{}\u{20ac}\tvat {}%",
            self.id, self.name, self.price, self.vat
        )
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.id)?;
        writeln!(f, "    First Name: {}", self.first_name)?;
        writeln!(f, "    Last Name: {}", self.last_name)?;
        writeln!(f, "    Street: {}", self.street)?;
        write!(
            f,
            "    City: {} {} {}",
            self.country_id, self.postal_code, self.city
        )
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "  #{}{}\tQuantity: {}\tCost: {}\u{20ac}",
            self.line, self.product, self.quantity, self.cost
        )
    }
}

impl fmt::Display for Invoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Invoice id: {} Date: {} Total cost: {}\u{20ac}",
            self.id, self.invoice_date, self.total
        )?;
        writeln!(f, "Customer: {}", self.customer)?;
        for item in &self.items {
            writeln!(f, "{item}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn product(id: u32, price: Decimal) -> Arc<Product> {
        Arc::new(Product {
            id,
            name: format!("Product {id}"),
            price,
            vat: dec!(19),
        })
    }

    fn customer() -> Arc<Customer> {
        Arc::new(Customer {
            id: 1,
            first_name: "Bruno".into(),
            last_name: "Lowagie".into(),
            street: "Sint-Niklaasstraat 1".into(),
            postal_code: "9000".into(),
            city: "Gent".into(),
            country_id: "BE".into(),
        })
    }

    #[test]
    fn item_cost_is_quantity_times_price() {
        let item = Item::new(1, product(1, dec!(12.50)), 3).unwrap();
        assert_eq!(item.cost, dec!(37.50));
    }

    #[test]
    fn oversized_cost_is_arithmetic_error() {
        let err = Item::new(4, product(1, Decimal::MAX), 2).unwrap_err();
        assert!(matches!(err, PipelineError::Arithmetic(ref m) if m.starts_with("line 4:")));
    }

    #[test]
    fn oversized_total_is_arithmetic_error() {
        let items = vec![
            Item::new(1, product(1, Decimal::MAX), 1).unwrap(),
            Item::new(2, product(2, dec!(1)), 1).unwrap(),
        ];
        let err = Invoice::new(7, customer(), items, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
            .unwrap_err();
        assert!(matches!(err, PipelineError::Arithmetic(ref m) if m == "invoice 7: total overflows"));
    }

    #[test]
    fn invoice_total_sums_costs() {
        let p = product(1, dec!(10.00));
        let items = vec![
            Item::new(1, p.clone(), 2).unwrap(),
            Item::new(2, product(2, dec!(0.99)), 5).unwrap(),
        ];
        let inv = Invoice::new(4, customer(), items, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
            .unwrap();
        assert_eq!(inv.total, dec!(24.95));
    }

    #[test]
    fn empty_invoice_totals_zero() {
        let inv = Invoice::new(1, customer(), vec![], NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
            .unwrap();
        assert_eq!(inv.total, Decimal::ZERO);
    }

    #[test]
    fn dump_lists_every_item() {
        let items = vec![
            Item::new(1, product(1, dec!(10)), 2).unwrap(),
            Item::new(2, product(2, dec!(5)), 1).unwrap(),
        ];
        let inv = Invoice::new(9, customer(), items, NaiveDate::from_ymd_opt(2015, 3, 4).unwrap())
            .unwrap();
        let text = inv.to_string();
        assert!(text.starts_with("Invoice id: 9 Date: 2015-03-04 Total cost: 25\u{20ac}"));
        assert!(text.contains("Last Name: Lowagie"));
        assert!(text.contains("City: BE 9000 Gent"));
        assert!(text.contains("  #1\t(1)\tProduct 1\t10\u{20ac}\tvat 19%\tQuantity: 2\tCost: 20\u{20ac}"));
        assert!(text.contains("  #2\t(2)"));
    }
}

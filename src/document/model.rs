use chrono::NaiveDate;
use serde::Serialize;

use crate::profile::{LineDetail, MonetarySummation, PaymentMeans, PaymentTerms, ProfileKind, TaxRow};

/// Shown in a party's tax block when it has no registrations.
pub const NOT_APPLICABLE: &str = "Not applicable";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentModel {
    pub profile: ProfileKind,
    pub header: Header,
    pub seller: PartySection,
    pub buyer: PartySection,
    pub line_items: Vec<LineEntry>,
    pub tax_breakdown: TaxBreakdown,
    pub payment_terms: PaymentSection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub test_indicator: bool,
    pub guideline_id: String,
    pub id: String,
    pub name: String,
    pub type_code: String,
    pub issue_date: NaiveDate,
    pub delivery_date: NaiveDate,
    pub currency: String,
    pub notes: Vec<String>,
}

impl Header {
    /// Issue date as printed on the invoice, e.g. `Jan 03, 2015`.
    pub fn display_date(&self) -> String {
        self.issue_date.format("%b %d, %Y").to_string()
    }
}

/// Which side of the trade a party section describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PartyRole {
    Seller,
    Buyer,
}

impl PartyRole {
    /// Heading of the address block.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Seller => "From:",
            Self::Buyer => "To:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartySection {
    pub role: PartyRole,
    pub name: String,
    pub line_one: String,
    pub line_two: Option<String>,
    pub postcode: String,
    pub city: String,
    pub country_id: String,
    /// `{country}-{postcode} {city}`.
    pub locality: String,
    pub tax_ids: Vec<TaxId>,
    /// `{scheme}: {id}` per registration, or [`NOT_APPLICABLE`].
    pub tax_id_lines: Vec<String>,
}

impl PartySection {
    /// Address lines in print order, without the name.
    pub fn address_lines(&self) -> Vec<&str> {
        let mut lines = vec![self.line_one.as_str()];
        if let Some(two) = &self.line_two {
            lines.push(two);
        }
        lines.push(&self.locality);
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxId {
    pub scheme_id: String,
    pub id: String,
}

/// One invoice line. `detail` is present for Comfort only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineEntry {
    pub line_id: String,
    pub name: String,
    pub quantity: String,
    pub billed_quantity: String,
    pub unit_code: String,
    pub price: String,
    pub subtotal: String,
    pub vat_rate: String,
    pub total: String,
    pub detail: Option<LineDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaxBreakdown {
    pub rows: Vec<TaxRow>,
    /// Whether the rows carry their category code into the output.
    pub with_category: bool,
    pub summation: MonetarySummation,
    pub total_prepaid: Option<String>,
    pub due_payable: Option<String>,
}

/// Column-wise view of the tax rows. Every column has one entry per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxColumns<'a> {
    pub type_codes: Vec<&'a str>,
    pub category_codes: Vec<&'a str>,
    pub percentages: Vec<&'a str>,
    pub bases: Vec<&'a str>,
    pub taxes: Vec<&'a str>,
    pub totals: Vec<&'a str>,
    pub currencies: Vec<&'a str>,
}

impl TaxBreakdown {
    pub fn columns(&self) -> TaxColumns<'_> {
        let rows = self.rows.as_slice();
        TaxColumns {
            type_codes: column(rows, |r| r.type_code.as_str()),
            category_codes: column(rows, |r| r.category_code.as_str()),
            percentages: column(rows, |r| r.percentage.as_str()),
            bases: column(rows, |r| r.base.as_str()),
            taxes: column(rows, |r| r.tax.as_str()),
            totals: column(rows, |r| r.total.as_str()),
            currencies: column(rows, |r| r.currency.as_str()),
        }
    }
}

fn column<'a>(rows: &'a [TaxRow], f: impl Fn(&'a TaxRow) -> &'a str) -> Vec<&'a str> {
    rows.iter().map(f).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSection {
    pub reference: String,
    pub means_code: Option<String>,
    pub means_information: Option<String>,
    pub accounts: Vec<PaymentMeans>,
    pub terms: Option<PaymentTerms>,
    /// Wire instruction naming the payment reference.
    pub instruction: String,
    /// `BIC: {bic} - IBAN: {iban}` per account.
    pub account_lines: Vec<String>,
}

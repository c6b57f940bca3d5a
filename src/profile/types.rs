use chrono::NaiveDate;
use serde::Serialize;

/// Which profile an invoice is projected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Basic,
    Comfort,
}

impl ProfileKind {
    /// Guideline identifier written into the XML document context.
    pub fn guideline_id(&self) -> &'static str {
        match self {
            Self::Basic => "urn:ferd:CrossIndustryDocument:invoice:1p0:basic",
            Self::Comfort => "urn:ferd:CrossIndustryDocument:invoice:1p0:comfort",
        }
    }

    /// Conformance level declared in the PDF's XMP metadata.
    pub fn conformance_level(&self) -> &'static str {
        match self {
            Self::Basic => "BASIC",
            Self::Comfort => "COMFORT",
        }
    }

    /// Lower-case name, used for file prefixes.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Comfort => "comfort",
        }
    }
}

impl std::str::FromStr for ProfileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Self::Basic),
            "comfort" => Ok(Self::Comfort),
            other => Err(format!("unknown profile '{other}' (expected basic or comfort)")),
        }
    }
}

/// A validated, fully populated projection of one invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "profile", rename_all = "lowercase")]
pub enum Profile {
    Basic(BasicProfile),
    Comfort(ComfortProfile),
}

impl Profile {
    pub fn kind(&self) -> ProfileKind {
        match self {
            Self::Basic(_) => ProfileKind::Basic,
            Self::Comfort(_) => ProfileKind::Comfort,
        }
    }

    /// The fields every profile carries.
    pub fn basic(&self) -> &BasicProfile {
        match self {
            Self::Basic(b) => b,
            Self::Comfort(c) => &c.basic,
        }
    }

    pub fn comfort(&self) -> Option<&ComfortProfile> {
        match self {
            Self::Basic(_) => None,
            Self::Comfort(c) => Some(c),
        }
    }
}

/// The Basic field set. Amounts are display-ready strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasicProfile {
    pub test_indicator: bool,
    /// Document id, e.g. `I/00001`.
    pub id: String,
    pub name: String,
    pub type_code: String,
    pub date: NaiveDate,
    pub notes: Vec<String>,
    pub seller: TradeParty,
    pub buyer: TradeParty,
    pub delivery_date: NaiveDate,
    pub payment_reference: String,
    pub currency: String,
    pub payment_means: Vec<PaymentMeans>,
    pub tax_rows: Vec<TaxRow>,
    pub lines: Vec<LineItem>,
    pub summation: MonetarySummation,
}

/// Basic plus the Comfort-only blocks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComfortProfile {
    pub basic: BasicProfile,
    pub payment_means_code: String,
    pub payment_means_information: String,
    pub payment_terms: PaymentTerms,
    /// Per-line trade detail, index-aligned with `basic.lines`.
    pub line_details: Vec<LineDetail>,
    pub total_prepaid: String,
    pub due_payable: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeParty {
    pub name: String,
    pub line_one: String,
    /// Second address line; empty when the party has none.
    pub line_two: String,
    pub postcode: String,
    pub city: String,
    pub country_id: String,
    pub tax_registrations: Vec<TaxRegistration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxRegistration {
    pub scheme_id: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentMeans {
    pub iban: String,
    pub bic: String,
    pub institution: String,
}

/// One tax breakdown row: every item sharing a (type code, rate) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxRow {
    pub type_code: String,
    pub category_code: String,
    pub percentage: String,
    pub base: String,
    pub tax: String,
    /// round(base + tax), the value displayed in the row's total column.
    pub total: String,
    pub currency: String,
}

/// One invoice line as displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    pub line_id: String,
    pub name: String,
    /// Quantity as displayed in tables, e.g. `2`.
    pub quantity: String,
    /// Billed quantity with four decimals, e.g. `2.0000`.
    pub billed_quantity: String,
    pub unit_code: String,
    pub price: String,
    pub subtotal: String,
    pub vat_rate: String,
    pub total: String,
}

/// Comfort trade agreement and settlement detail for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineDetail {
    pub gross_price: String,
    pub net_price: String,
    pub tax_type_code: String,
    pub tax_category_code: String,
    pub tax_percentage: String,
    pub line_total: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonetarySummation {
    pub line_total: String,
    pub charge_total: String,
    pub allowance_total: String,
    pub tax_basis_total: String,
    pub tax_total: String,
    pub grand_total: String,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentTerms {
    pub description: String,
    pub due_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_profile_names() {
        assert_eq!("basic".parse::<ProfileKind>().unwrap(), ProfileKind::Basic);
        assert_eq!("Comfort".parse::<ProfileKind>().unwrap(), ProfileKind::Comfort);
        assert!("extended".parse::<ProfileKind>().is_err());
    }

    #[test]
    fn guideline_ids_differ() {
        assert_ne!(
            ProfileKind::Basic.guideline_id(),
            ProfileKind::Comfort.guideline_id()
        );
        assert!(ProfileKind::Comfort.guideline_id().ends_with(":comfort"));
    }
}

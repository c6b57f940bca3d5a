use serde::{Deserialize, Serialize};

/// Fixed, invoice-independent data the projector combines with each invoice:
/// who is selling, in which currency, under which tax codes, and how the
/// buyer is asked to pay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionSettings {
    /// Marks generated documents as test invoices.
    pub test_indicator: bool,
    /// Document name printed in the header.
    pub document_name: String,
    /// UNTDID 1001 document type code.
    pub type_code: String,
    pub notes: Vec<String>,
    pub seller: SellerSettings,
    /// ISO 4217 invoice currency.
    pub currency: String,
    /// UNTDID 5153 tax type applied to every line.
    pub tax_type_code: String,
    /// UNTDID 5305 tax category applied to every line.
    pub tax_category_code: String,
    /// Rec 20 unit for billed quantities.
    pub unit_code: String,
    pub payment: PaymentSettings,
}

/// The seller party. The record source has no seller table, so the seller
/// comes from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SellerSettings {
    pub name: String,
    pub line_one: String,
    pub line_two: String,
    pub postcode: String,
    pub city: String,
    pub country_id: String,
    pub tax_registrations: Vec<TaxRegistrationSetting>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRegistrationSetting {
    /// `FC` (fiscal number) or `VA` (VAT id).
    pub scheme: String,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentSettings {
    /// UNTDID 4461 payment means code (Comfort only).
    pub means_code: String,
    /// Free-text payment means information (Comfort only).
    pub means_information: String,
    pub accounts: Vec<BankAccount>,
    /// Days between invoice date and due date (Comfort only).
    pub terms_days: u32,
    /// Payment terms text; `{days}` is replaced by `terms_days`.
    pub terms_description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub iban: String,
    pub bic: String,
    pub institution: String,
}

impl Default for ProjectionSettings {
    fn default() -> Self {
        Self {
            test_indicator: true,
            document_name: "INVOICE".into(),
            type_code: "380".into(),
            notes: vec![
                "This is a test invoice.\nNothing on this invoice is real.\nThis invoice is part of a tutorial."
                    .into(),
            ],
            seller: SellerSettings::default(),
            currency: "EUR".into(),
            tax_type_code: "VAT".into(),
            tax_category_code: "S".into(),
            unit_code: "C62".into(),
            payment: PaymentSettings::default(),
        }
    }
}

impl Default for SellerSettings {
    fn default() -> Self {
        Self {
            name: "Das Company".into(),
            line_one: "ZUG Business Center".into(),
            line_two: "Highway 1".into(),
            postcode: "9000".into(),
            city: "Ghent".into(),
            country_id: "BE".into(),
            tax_registrations: vec![
                TaxRegistrationSetting {
                    scheme: "FC".into(),
                    id: "201/113/40209".into(),
                },
                TaxRegistrationSetting {
                    scheme: "VA".into(),
                    id: "BE123456789".into(),
                },
            ],
        }
    }
}

impl Default for PaymentSettings {
    fn default() -> Self {
        Self {
            means_code: "42".into(),
            means_information: "Payment to bank account".into(),
            accounts: vec![
                BankAccount {
                    iban: "BE 41 7360 0661 9710".into(),
                    bic: "KREDBEBB".into(),
                    institution: "KBC".into(),
                },
                BankAccount {
                    iban: "BE 56 0015 4298 7888".into(),
                    bic: "GEBABEBB".into(),
                    institution: "BNP Paribas".into(),
                },
            ],
            terms_days: 30,
            terms_description: "Payable within {days} days of the invoice date".into(),
        }
    }
}

impl PaymentSettings {
    /// The payment terms text with `{days}` filled in.
    pub fn terms_text(&self) -> String {
        self.terms_description
            .replace("{days}", &self.terms_days.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_tutorial_seller() {
        let s = ProjectionSettings::default();
        assert_eq!(s.seller.name, "Das Company");
        assert_eq!(s.seller.tax_registrations.len(), 2);
        assert_eq!(s.payment.accounts.len(), 2);
        assert_eq!(s.currency, "EUR");
    }

    #[test]
    fn terms_text_fills_days() {
        let p = PaymentSettings::default();
        assert_eq!(p.terms_text(), "Payable within 30 days of the invoice date");
    }
}

//! Static code tables used to validate profile data.
//!
//! Every table is sorted for binary search. Lookups are case-sensitive:
//! the ZUGFeRD schema only accepts the upper-case forms.

use super::error::PipelineError;

/// The code tables a profile field can be validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeList {
    /// ISO 3166-1 alpha-2 country codes.
    Country,
    /// ISO 4217 currency codes.
    Currency,
    /// UNTDID 5153 duty/tax/fee type codes.
    TaxType,
    /// UNTDID 5305 duty/tax/fee category codes.
    TaxCategory,
    /// Tax registration scheme identifiers (FC = fiscal number, VA = VAT id).
    TaxIdScheme,
    /// UN/CEFACT Rec 20 unit codes.
    Unit,
    /// UNTDID 4461 payment means codes.
    PaymentMeans,
}

impl CodeList {
    /// Every code in the table, sorted.
    pub fn codes(self) -> &'static [&'static str] {
        match self {
            Self::Country => COUNTRY_CODES,
            Self::Currency => CURRENCY_CODES,
            Self::TaxType => TAX_TYPE_CODES,
            Self::TaxCategory => TAX_CATEGORY_CODES,
            Self::TaxIdScheme => TAX_ID_SCHEMES,
            Self::Unit => UNIT_CODES,
            Self::PaymentMeans => PAYMENT_MEANS_CODES,
        }
    }

    /// Check whether `code` is in this table.
    pub fn contains(self, code: &str) -> bool {
        self.codes().binary_search(&code).is_ok()
    }

    /// Validate `value` for `field`, failing with `InvalidCode` when unknown.
    pub fn check(self, field: &str, value: &str) -> Result<(), PipelineError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(PipelineError::invalid_code(field, value))
        }
    }
}

static COUNTRY_CODES: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

static CURRENCY_CODES: &[&str] = &[
    "AUD", "BGN", "BRL", "CAD", "CHF", "CNY", "CZK", "DKK", "EUR", "GBP", "HKD", "HUF", "IDR",
    "ILS", "INR", "ISK", "JPY", "KRW", "MXN", "MYR", "NOK", "NZD", "PHP", "PLN", "RON", "RUB",
    "SEK", "SGD", "THB", "TRY", "USD", "ZAR",
];

static TAX_TYPE_CODES: &[&str] = &[
    "AAA", "AAB", "AAC", "AAD", "AAE", "ADD", "BOL", "CAP", "CAR", "COC", "CST", "CUD", "CVD",
    "ENV", "EXC", "EXP", "FET", "FRE", "GCN", "GST", "ILL", "IMP", "IND", "LAC", "LCN", "LDP",
    "LOC", "LST", "MCA", "MCD", "OTH", "PDB", "PDC", "PRF", "SCN", "SSS", "STT", "SUP", "SUR",
    "SWT", "TAC", "TOT", "TOX", "TTA", "VAD", "VAT",
];

static TAX_CATEGORY_CODES: &[&str] = &[
    "AE", // Reverse charge
    "E",  // Exempt
    "G",  // Free export item
    "K",  // Intra-community supply
    "L",  // Canary Islands
    "M",  // Ceuta and Melilla
    "O",  // Outside scope of tax
    "S",  // Standard rate
    "Z",  // Zero rated
];

static TAX_ID_SCHEMES: &[&str] = &["FC", "VA"];

static UNIT_CODES: &[&str] = &[
    "C62", // One (piece)
    "DAY", // Day
    "HUR", // Hour
    "KGM", // Kilogram
    "LTR", // Litre
    "MIN", // Minute
    "MON", // Month
    "MTK", // Square metre
    "MTR", // Metre
    "SET", // Set
    "TNE", // Tonne
    "WEE", // Week
];

static PAYMENT_MEANS_CODES: &[&str] = &[
    "1",  // Not defined
    "10", // Cash
    "20", // Cheque
    "30", // Credit transfer
    "31", // Debit transfer
    "42", // Payment to bank account
    "48", // Bank card
    "49", // Direct debit
    "57", // Standing agreement
    "58", // SEPA credit transfer
    "59", // SEPA direct debit
    "97", // Clearing between partners
];

use chrono::Days;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::settings::{ProjectionSettings, SellerSettings};
use super::types::*;
use crate::core::amount::{format2dec, format4dec, round2};
use crate::core::{CodeList, Customer, Invoice, PipelineError};

/// Project an assembled invoice into the requested profile.
///
/// Pure: reads only the invoice, the settings and the static code tables.
/// Fails on the first unknown code or missing mandatory field, so a
/// returned profile is always complete.
pub fn project(
    invoice: &Invoice,
    kind: ProfileKind,
    settings: &ProjectionSettings,
) -> Result<Profile, PipelineError> {
    let basic = project_basic(invoice, settings)?;
    match kind {
        ProfileKind::Basic => Ok(Profile::Basic(basic)),
        ProfileKind::Comfort => project_comfort(invoice, settings, basic).map(Profile::Comfort),
    }
}

fn project_basic(
    invoice: &Invoice,
    settings: &ProjectionSettings,
) -> Result<BasicProfile, PipelineError> {
    let seller = seller_party(&settings.seller)?;
    let buyer = buyer_party(&invoice.customer)?;

    let currency = required("currency", &settings.currency)?;
    CodeList::Currency.check("currency", &currency)?;
    let tax_type_code = required("tax_type_code", &settings.tax_type_code)?;
    CodeList::TaxType.check("tax_type_code", &tax_type_code)?;
    let category_code = required("tax_category_code", &settings.tax_category_code)?;
    CodeList::TaxCategory.check("tax_category_code", &category_code)?;
    let unit_code = required("unit_code", &settings.unit_code)?;
    CodeList::Unit.check("unit_code", &unit_code)?;

    let lines = invoice
        .items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            if item.quantity == 0 {
                return Err(PipelineError::incomplete(format!("lines[{i}].quantity")));
            }
            let name = required(&format!("lines[{i}].name"), &item.product.name)?;
            let vat = item
                .cost
                .checked_mul(item.product.vat)
                .ok_or_else(|| overflow(&format!("lines[{i}].tax")))?
                / dec!(100);
            let total = item
                .cost
                .checked_add(vat)
                .ok_or_else(|| overflow(&format!("lines[{i}].total")))?;
            Ok(LineItem {
                line_id: item.line.to_string(),
                name,
                quantity: item.quantity.to_string(),
                billed_quantity: format4dec(Decimal::from(item.quantity)),
                unit_code: unit_code.clone(),
                price: format2dec(item.product.price),
                subtotal: format2dec(item.cost),
                vat_rate: format2dec(item.product.vat),
                total: format2dec(total),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let groups = group_taxes(invoice, &tax_type_code)?;
    if groups.is_empty() {
        return Err(PipelineError::incomplete("tax_rows"));
    }

    let mut line_total = Decimal::ZERO;
    let mut tax_total = Decimal::ZERO;
    let mut tax_rows = Vec::with_capacity(groups.len());
    for (i, g) in groups.iter().enumerate() {
        let base = round2(g.base);
        let tax = round2(g.tax(i)?);
        let total = base
            .checked_add(tax)
            .ok_or_else(|| overflow(&format!("tax_rows[{i}].total")))?;
        line_total = line_total
            .checked_add(base)
            .ok_or_else(|| overflow("summation.line_total"))?;
        tax_total = tax_total
            .checked_add(tax)
            .ok_or_else(|| overflow("summation.tax_total"))?;
        tax_rows.push(TaxRow {
            type_code: g.type_code.clone(),
            category_code: category_code.clone(),
            percentage: format2dec(g.rate),
            base: format2dec(base),
            tax: format2dec(tax),
            total: format2dec(total),
            currency: currency.clone(),
        });
    }
    let grand_total = line_total
        .checked_add(tax_total)
        .ok_or_else(|| overflow("summation.grand_total"))?;

    let payment_reference = required("payment_reference", &format!("{:09}", invoice.id))?;
    let payment_means = settings
        .payment
        .accounts
        .iter()
        .enumerate()
        .map(|(i, account)| {
            Ok(PaymentMeans {
                iban: required(&format!("payment.accounts[{i}].iban"), &account.iban)?,
                bic: required(&format!("payment.accounts[{i}].bic"), &account.bic)?,
                institution: account.institution.clone(),
            })
        })
        .collect::<Result<Vec<_>, PipelineError>>()?;

    Ok(BasicProfile {
        test_indicator: settings.test_indicator,
        id: format!("I/{:05}", invoice.id),
        name: required("document_name", &settings.document_name)?,
        type_code: required("type_code", &settings.type_code)?,
        date: invoice.invoice_date,
        notes: settings.notes.clone(),
        seller,
        buyer,
        delivery_date: invoice.invoice_date,
        payment_reference,
        currency: currency.clone(),
        payment_means,
        tax_rows,
        lines,
        summation: MonetarySummation {
            line_total: format2dec(line_total),
            charge_total: format2dec(Decimal::ZERO),
            allowance_total: format2dec(Decimal::ZERO),
            tax_basis_total: format2dec(line_total),
            tax_total: format2dec(tax_total),
            grand_total: format2dec(grand_total),
            currency,
        },
    })
}

fn project_comfort(
    invoice: &Invoice,
    settings: &ProjectionSettings,
    basic: BasicProfile,
) -> Result<ComfortProfile, PipelineError> {
    let payment = &settings.payment;
    let means_code = required("payment.means_code", &payment.means_code)?;
    CodeList::PaymentMeans.check("payment.means_code", &means_code)?;
    let description = required("payment_terms.description", &payment.terms_text())?;
    let due_date = invoice
        .invoice_date
        .checked_add_days(Days::new(u64::from(payment.terms_days)))
        .ok_or_else(|| PipelineError::incomplete("payment_terms.due_date"))?;

    let groups = group_taxes(invoice, &settings.tax_type_code)?;
    for (i, (group, row)) in groups.iter().zip(&basic.tax_rows).enumerate() {
        check_tax_row(i, group, row)?;
    }

    let line_details = invoice
        .items
        .iter()
        .map(|item| LineDetail {
            gross_price: format2dec(item.product.price),
            net_price: format2dec(item.product.price),
            tax_type_code: settings.tax_type_code.clone(),
            tax_category_code: settings.tax_category_code.clone(),
            tax_percentage: format2dec(item.product.vat),
            line_total: format2dec(item.cost),
        })
        .collect();

    Ok(ComfortProfile {
        payment_means_code: means_code,
        payment_means_information: payment.means_information.clone(),
        payment_terms: PaymentTerms {
            description,
            due_date,
        },
        line_details,
        total_prepaid: format2dec(Decimal::ZERO),
        due_payable: basic.summation.grand_total.clone(),
        basic,
    })
}

/// Items sharing a (tax type, rate) pair. `base` is the exact, unrounded
/// sum of the item costs.
struct TaxGroup {
    type_code: String,
    rate: Decimal,
    base: Decimal,
}

impl TaxGroup {
    /// Exact tax on the unrounded base.
    fn tax(&self, index: usize) -> Result<Decimal, PipelineError> {
        self.base
            .checked_mul(self.rate)
            .map(|t| t / dec!(100))
            .ok_or_else(|| overflow(&format!("tax_rows[{index}].tax")))
    }
}

/// Group items by (tax type code, rate) in first-seen order.
fn group_taxes(invoice: &Invoice, type_code: &str) -> Result<Vec<TaxGroup>, PipelineError> {
    let mut groups: Vec<TaxGroup> = Vec::new();
    for item in &invoice.items {
        let rate = item.product.vat;
        match groups
            .iter_mut()
            .enumerate()
            .find(|(_, g)| g.type_code == type_code && g.rate == rate)
        {
            Some((i, group)) => {
                group.base = group
                    .base
                    .checked_add(item.cost)
                    .ok_or_else(|| overflow(&format!("tax_rows[{i}].base")))?;
            }
            None => groups.push(TaxGroup {
                type_code: type_code.to_string(),
                rate,
                base: item.cost,
            }),
        }
    }
    Ok(groups)
}

/// The displayed row total is built from a base and a tax rounded one by
/// one. It must stay within one cent of the exact group total rounded once.
/// Holds for every row `project_basic` builds; guards rows assembled any
/// other way.
fn check_tax_row(index: usize, group: &TaxGroup, row: &TaxRow) -> Result<(), PipelineError> {
    let exact = group
        .base
        .checked_add(group.tax(index)?)
        .ok_or_else(|| overflow(&format!("tax_rows[{index}].total")))?;
    let total = row.total.parse::<Decimal>().map_err(|_| {
        PipelineError::Arithmetic(format!(
            "tax_rows[{index}].total '{}' is not a number",
            row.total
        ))
    })?;
    if (round2(exact) - total).abs() > dec!(0.01) {
        return Err(PipelineError::Arithmetic(format!(
            "tax_rows[{index}]: total {} is more than 0.01 off {}",
            row.total,
            format2dec(exact)
        )));
    }
    Ok(())
}

fn overflow(field: &str) -> PipelineError {
    PipelineError::Arithmetic(format!("{field} overflows"))
}

fn seller_party(seller: &SellerSettings) -> Result<TradeParty, PipelineError> {
    let country_id = required("seller.country_id", &seller.country_id)?;
    let party = TradeParty {
        name: required("seller.name", &seller.name)?,
        line_one: required("seller.line_one", &seller.line_one)?,
        line_two: seller.line_two.clone(),
        postcode: required("seller.postcode", &seller.postcode)?,
        city: required("seller.city", &seller.city)?,
        country_id,
        tax_registrations: seller
            .tax_registrations
            .iter()
            .enumerate()
            .map(|(i, reg)| {
                let field = format!("seller.tax_registrations[{i}]");
                CodeList::TaxIdScheme.check(&format!("{field}.scheme"), &reg.scheme)?;
                Ok(TaxRegistration {
                    scheme_id: reg.scheme.clone(),
                    id: required(&format!("{field}.id"), &reg.id)?,
                })
            })
            .collect::<Result<Vec<_>, PipelineError>>()?,
    };
    CodeList::Country.check("seller.country_id", &party.country_id)?;
    Ok(party)
}

fn buyer_party(customer: &Customer) -> Result<TradeParty, PipelineError> {
    let party = TradeParty {
        name: required("buyer.name", &buyer_name(customer))?,
        line_one: required("buyer.line_one", &customer.street)?,
        line_two: String::new(),
        postcode: required("buyer.postcode", &customer.postal_code)?,
        city: required("buyer.city", &customer.city)?,
        country_id: required("buyer.country_id", &customer.country_id)?,
        tax_registrations: Vec::new(),
    };
    CodeList::Country.check("buyer.country_id", &party.country_id)?;
    Ok(party)
}

/// "Last, First", or whichever part is present.
fn buyer_name(customer: &Customer) -> String {
    let first = customer.first_name.trim();
    let last = customer.last_name.trim();
    match (last.is_empty(), first.is_empty()) {
        (false, false) => format!("{last}, {first}"),
        (false, true) => last.to_string(),
        (true, false) => first.to_string(),
        (true, true) => String::new(),
    }
}

fn required(field: &str, value: &str) -> Result<String, PipelineError> {
    if value.trim().is_empty() {
        Err(PipelineError::incomplete(field))
    } else {
        Ok(value.to_string())
    }
}

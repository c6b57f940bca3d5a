use super::model::*;
use crate::profile::{BasicProfile, Profile, TradeParty};

/// Build the document tree for a projected profile.
///
/// Performs no validation: every string is taken from the profile as is,
/// only the address locality line and the tax-ID and payment display
/// lines are composed here.
pub fn build(profile: &Profile) -> DocumentModel {
    let basic = profile.basic();
    let comfort = profile.comfort();
    let kind = profile.kind();

    let line_items = basic
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| LineEntry {
            line_id: line.line_id.clone(),
            name: line.name.clone(),
            quantity: line.quantity.clone(),
            billed_quantity: line.billed_quantity.clone(),
            unit_code: line.unit_code.clone(),
            price: line.price.clone(),
            subtotal: line.subtotal.clone(),
            vat_rate: line.vat_rate.clone(),
            total: line.total.clone(),
            detail: comfort.and_then(|c| c.line_details.get(i).cloned()),
        })
        .collect();

    DocumentModel {
        profile: kind,
        header: Header {
            test_indicator: basic.test_indicator,
            guideline_id: kind.guideline_id().to_string(),
            id: basic.id.clone(),
            name: basic.name.clone(),
            type_code: basic.type_code.clone(),
            issue_date: basic.date,
            delivery_date: basic.delivery_date,
            currency: basic.currency.clone(),
            notes: basic.notes.clone(),
        },
        seller: party(PartyRole::Seller, &basic.seller),
        buyer: party(PartyRole::Buyer, &basic.buyer),
        line_items,
        tax_breakdown: TaxBreakdown {
            rows: basic.tax_rows.clone(),
            with_category: comfort.is_some(),
            summation: basic.summation.clone(),
            total_prepaid: comfort.map(|c| c.total_prepaid.clone()),
            due_payable: comfort.map(|c| c.due_payable.clone()),
        },
        payment_terms: PaymentSection {
            reference: basic.payment_reference.clone(),
            means_code: comfort.map(|c| c.payment_means_code.clone()),
            means_information: comfort.map(|c| c.payment_means_information.clone()),
            accounts: basic.payment_means.clone(),
            terms: comfort.map(|c| c.payment_terms.clone()),
            instruction: instruction(basic),
            account_lines: basic
                .payment_means
                .iter()
                .map(|m| format!("BIC: {} - IBAN: {}", m.bic, m.iban))
                .collect(),
        },
    }
}

fn party(role: PartyRole, p: &TradeParty) -> PartySection {
    let tax_ids: Vec<TaxId> = p
        .tax_registrations
        .iter()
        .map(|r| TaxId {
            scheme_id: r.scheme_id.clone(),
            id: r.id.clone(),
        })
        .collect();
    let tax_id_lines = if tax_ids.is_empty() {
        vec![NOT_APPLICABLE.to_string()]
    } else {
        tax_ids
            .iter()
            .map(|t| format!("{}: {}", t.scheme_id, t.id))
            .collect()
    };
    PartySection {
        role,
        name: p.name.clone(),
        line_one: p.line_one.clone(),
        line_two: (!p.line_two.trim().is_empty()).then(|| p.line_two.clone()),
        postcode: p.postcode.clone(),
        city: p.city.clone(),
        country_id: p.country_id.clone(),
        locality: format!("{}-{} {}", p.country_id, p.postcode, p.city),
        tax_ids,
        tax_id_lines,
    }
}

fn instruction(basic: &BasicProfile) -> String {
    format!(
        "Please wire the amount due to our bank account using the following reference: {}",
        basic.payment_reference
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Customer, Invoice, Item, Product};
    use crate::profile::{ProfileKind, ProjectionSettings, project};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn invoice() -> Invoice {
        let customer = Arc::new(Customer {
            id: 4,
            first_name: "Jan".into(),
            last_name: "Janssens".into(),
            street: "Kerkstraat 1".into(),
            postal_code: "2000".into(),
            city: "Antwerpen".into(),
            country_id: "BE".into(),
        });
        let product = Arc::new(Product {
            id: 1,
            name: "Paper".into(),
            price: dec!(10.00),
            vat: dec!(19),
        });
        Invoice::new(
            12,
            customer,
            vec![Item::new(1, product, 2).unwrap()],
            NaiveDate::from_ymd_opt(2015, 1, 3).unwrap(),
        )
        .unwrap()
    }

    fn model(kind: ProfileKind) -> DocumentModel {
        let profile = project(&invoice(), kind, &ProjectionSettings::default()).unwrap();
        build(&profile)
    }

    #[test]
    fn buyer_without_registrations_is_not_applicable() {
        let m = model(ProfileKind::Basic);
        assert_eq!(m.buyer.tax_id_lines, vec![NOT_APPLICABLE.to_string()]);
        assert!(m.buyer.tax_ids.is_empty());
        assert_eq!(
            m.seller.tax_id_lines,
            vec!["FC: 201/113/40209".to_string(), "VA: BE123456789".to_string()]
        );
    }

    #[test]
    fn addresses_compose_locality() {
        let m = model(ProfileKind::Basic);
        assert_eq!(m.seller.locality, "BE-9000 Ghent");
        assert_eq!(m.buyer.locality, "BE-2000 Antwerpen");
        assert_eq!(m.buyer.line_two, None);
        assert_eq!(
            m.seller.address_lines(),
            vec!["ZUG Business Center", "Highway 1", "BE-9000 Ghent"]
        );
        assert_eq!(m.seller.role.label(), "From:");
        assert_eq!(m.buyer.role.label(), "To:");
    }

    #[test]
    fn header_and_payment_text() {
        let m = model(ProfileKind::Basic);
        assert_eq!(m.header.id, "I/00012");
        assert_eq!(m.header.display_date(), "Jan 03, 2015");
        assert!(m.payment_terms.instruction.ends_with("reference: 000000012"));
        assert_eq!(
            m.payment_terms.account_lines[0],
            "BIC: KREDBEBB - IBAN: BE 41 7360 0661 9710"
        );
        assert!(m.payment_terms.terms.is_none());
        assert!(m.line_items[0].detail.is_none());
    }

    #[test]
    fn comfort_sections_are_filled() {
        let m = model(ProfileKind::Comfort);
        assert_eq!(m.profile, ProfileKind::Comfort);
        assert!(m.tax_breakdown.with_category);
        assert_eq!(m.tax_breakdown.due_payable.as_deref(), Some("23.80"));
        assert_eq!(m.payment_terms.means_code.as_deref(), Some("42"));
        assert!(m.payment_terms.terms.is_some());
        assert!(m.line_items.iter().all(|l| l.detail.is_some()));
    }

    #[test]
    fn tax_columns_are_aligned() {
        let m = model(ProfileKind::Comfort);
        let cols = m.tax_breakdown.columns();
        let n = m.tax_breakdown.rows.len();
        for len in [
            cols.type_codes.len(),
            cols.category_codes.len(),
            cols.percentages.len(),
            cols.bases.len(),
            cols.taxes.len(),
            cols.totals.len(),
            cols.currencies.len(),
        ] {
            assert_eq!(len, n);
        }
        assert_eq!(cols.bases, vec!["20.00"]);
        assert_eq!(cols.taxes, vec!["3.80"]);
    }
}

use quick_xml::escape::escape;

use crate::document::{DocumentModel, PartySection};

/// Render the human-readable HTML invoice.
///
/// The page is unstyled; it mirrors the PDF's sections in table form.
pub fn to_html(model: &DocumentModel) -> String {
    let h = &model.header;
    let mut out = String::with_capacity(4096);
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    line(&mut out, &format!("<title>{} {}</title>", esc(&h.name), esc(&h.id)));
    out.push_str("</head>\n<body>\n");

    line(
        &mut out,
        &format!("<h1>{} {}</h1>", esc(&h.name), esc(&h.id)),
    );
    line(&mut out, &format!("<p class=\"date\">{}</p>", esc(&h.display_date())));
    for note in &h.notes {
        let text = note.lines().map(esc).collect::<Vec<_>>().join("<br>");
        line(&mut out, &format!("<p class=\"note\">{text}</p>"));
    }

    out.push_str("<table class=\"parties\">\n<tr>\n");
    party(&mut out, &model.seller);
    party(&mut out, &model.buyer);
    out.push_str("</tr>\n</table>\n");

    out.push_str("<table class=\"lines\">\n");
    line(
        &mut out,
        "<tr><th>Item</th><th>Price</th><th>Qty</th><th>Subtotal</th><th>VAT rate</th><th>Total</th></tr>",
    );
    for item in &model.line_items {
        line(
            &mut out,
            &format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}%</td><td>{}</td></tr>",
                esc(&item.name),
                esc(&item.price),
                esc(&item.quantity),
                esc(&item.subtotal),
                esc(&item.vat_rate),
                esc(&item.total),
            ),
        );
    }
    out.push_str("</table>\n");

    let tax = &model.tax_breakdown;
    out.push_str("<table class=\"tax\">\n");
    line(
        &mut out,
        "<tr><th>Base amount</th><th>VAT rate</th><th>VAT amount</th><th>Total</th><th>Currency</th></tr>",
    );
    for row in &tax.rows {
        line(
            &mut out,
            &format!(
                "<tr><td>{}</td><td>{}%</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                esc(&row.base),
                esc(&row.percentage),
                esc(&row.tax),
                esc(&row.total),
                esc(&row.currency),
            ),
        );
    }
    let s = &tax.summation;
    line(
        &mut out,
        &format!(
            "<tr class=\"sum\"><td>{}</td><td></td><td>{}</td><td>{}</td><td>{}</td></tr>",
            esc(&s.tax_basis_total),
            esc(&s.tax_total),
            esc(&s.grand_total),
            esc(&s.currency),
        ),
    );
    out.push_str("</table>\n");
    if let Some(due) = &tax.due_payable {
        line(
            &mut out,
            &format!("<p class=\"due\">Amount due: {} {}</p>", esc(due), esc(&s.currency)),
        );
    }

    let pay = &model.payment_terms;
    out.push_str("<div class=\"payment\">\n");
    line(&mut out, &format!("<p>{}</p>", esc(&pay.instruction)));
    for account in &pay.account_lines {
        line(&mut out, &format!("<p>{}</p>", esc(account)));
    }
    if let Some(terms) = &pay.terms {
        line(
            &mut out,
            &format!(
                "<p>{} (due {})</p>",
                esc(&terms.description),
                terms.due_date.format("%b %d, %Y")
            ),
        );
    }
    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn party(out: &mut String, p: &PartySection) {
    out.push_str("<td>\n");
    line(out, &format!("<p><strong>{}</strong></p>", esc(p.role.label())));
    let mut address = vec![esc(&p.name)];
    address.extend(p.address_lines().into_iter().map(esc));
    line(out, &format!("<p>{}</p>", address.join("<br>")));
    let tax_ids = p.tax_id_lines.iter().map(|t| esc(t)).collect::<Vec<_>>();
    line(out, &format!("<p>Tax ID(s):<br>{}</p>", tax_ids.join("<br>")));
    out.push_str("</td>\n");
}

fn esc(s: &str) -> String {
    escape(s).into_owned()
}

fn line(out: &mut String, s: &str) {
    out.push_str(s);
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Customer, Invoice, Item, Product};
    use crate::document::build;
    use crate::profile::{ProfileKind, ProjectionSettings, project};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    #[test]
    fn line_appends_newline() {
        let mut out = String::from("<table>\n");
        line(&mut out, "<tr><td>1</td></tr>");
        assert_eq!(out, "<table>\n<tr><td>1</td></tr>\n");
    }

    #[test]
    fn escapes_names_and_lists_sections() {
        let customer = Arc::new(Customer {
            id: 2,
            first_name: "Tom".into(),
            last_name: "Smith & Sons".into(),
            street: "Main <Street> 1".into(),
            postal_code: "1000".into(),
            city: "Brussels".into(),
            country_id: "BE".into(),
        });
        let product = Arc::new(Product {
            id: 3,
            name: "Glue".into(),
            price: dec!(4.50),
            vat: dec!(21),
        });
        let invoice = Invoice::new(
            2,
            customer,
            vec![Item::new(1, product, 3).unwrap()],
            NaiveDate::from_ymd_opt(2015, 3, 9).unwrap(),
        )
        .unwrap();
        let profile =
            project(&invoice, ProfileKind::Comfort, &ProjectionSettings::default()).unwrap();
        let html = to_html(&build(&profile));
        assert!(html.contains("Smith &amp; Sons, Tom"));
        assert!(html.contains("Main &lt;Street&gt; 1"));
        assert!(html.contains("Not applicable"));
        assert!(html.contains("BE-1000 Brussels"));
        assert!(html.contains("<td>13.50</td>"));
        assert!(html.contains("Amount due: 16.34 EUR"));
        assert!(html.contains("Mar 09, 2015"));
    }
}

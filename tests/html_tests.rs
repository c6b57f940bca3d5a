#![cfg(feature = "html")]

use zugferd_invoices::document::build;
use zugferd_invoices::profile::{ProfileKind, ProjectionSettings, project};
use zugferd_invoices::render::{OutputFormat, render, to_html};
use zugferd_invoices::store::{InvoiceRepository, MemorySource};

fn html_for(index: usize, kind: ProfileKind) -> String {
    let source = MemorySource::from_json(include_str!("fixtures/invoices.json")).unwrap();
    let repo = InvoiceRepository::new(source);
    let rows = repo.invoice_rows().unwrap();
    let invoice = repo.get_invoice(&rows[index]).unwrap();
    let profile = project(&invoice, kind, &ProjectionSettings::default()).unwrap();
    to_html(&build(&profile))
}

#[test]
fn comfort_html_lists_parties_lines_and_taxes() {
    let html = html_for(1, ProfileKind::Comfort);
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h1>INVOICE I/00002</h1>"));
    assert!(html.contains("From:"));
    assert!(html.contains("To:"));
    assert!(html.contains("DE-10115 Berlin"));
    assert!(html.contains("VA: BE123456789"));
    assert!(html.contains("Not applicable"));
    assert!(html.contains("<td>Coffee beans</td>"));
    assert_eq!(html.matches("<tr><td>").count(), 4 + 3);
    assert!(html.contains("Amount due: 67.91 EUR"));
    assert!(html.contains("BIC: GEBABEBB - IBAN: BE 56 0015 4298 7888"));
    assert!(html.contains("Payable within 30 days"));
}

#[test]
fn basic_html_has_no_terms() {
    let html = html_for(0, ProfileKind::Basic);
    assert!(!html.contains("Amount due"));
    assert!(!html.contains("Payable within"));
    assert!(html.contains("reference: 000000001"));
}

#[test]
fn render_dispatch_returns_utf8_html() {
    let source = MemorySource::from_json(include_str!("fixtures/invoices.json")).unwrap();
    let repo = InvoiceRepository::new(source);
    let rows = repo.invoice_rows().unwrap();
    let invoice = repo.get_invoice(&rows[1]).unwrap();
    let profile = project(&invoice, ProfileKind::Basic, &ProjectionSettings::default()).unwrap();
    let bytes = render(&build(&profile), OutputFormat::Html).unwrap();
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("Hauptstraße 5"));
}

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use zugferd_invoices::core::Invoice;
use zugferd_invoices::document::build;
use zugferd_invoices::profile::{ProfileKind, ProjectionSettings, project};
use zugferd_invoices::render::{OutputFormat, render};
use zugferd_invoices::store::{InvoiceRepository, MemorySource};

fn fixture_invoices() -> Vec<Invoice> {
    let source =
        MemorySource::from_json(include_str!("../tests/fixtures/invoices.json")).unwrap();
    let repo = InvoiceRepository::new(source);
    let rows = repo.invoice_rows().unwrap();
    // rows 0 and 1 are complete; the others exercise the error paths
    rows[..2].iter().map(|r| repo.get_invoice(r).unwrap()).collect()
}

fn bench_assemble(c: &mut Criterion) {
    let json = include_str!("../tests/fixtures/invoices.json");
    c.bench_function("load_and_assemble", |b| {
        b.iter(|| {
            let repo = InvoiceRepository::new(MemorySource::from_json(black_box(json)).unwrap());
            let rows = repo.invoice_rows().unwrap();
            black_box(repo.get_invoice(&rows[1]))
        });
    });
}

fn bench_project(c: &mut Criterion) {
    let invoices = fixture_invoices();
    let settings = ProjectionSettings::default();
    c.bench_function("project_comfort", |b| {
        b.iter(|| black_box(project(black_box(&invoices[1]), ProfileKind::Comfort, &settings)));
    });
}

fn bench_render(c: &mut Criterion) {
    let invoices = fixture_invoices();
    let settings = ProjectionSettings::default();
    let profile = project(&invoices[1], ProfileKind::Comfort, &settings).unwrap();
    let model = build(&profile);

    c.bench_function("render_xml", |b| {
        b.iter(|| black_box(render(black_box(&model), OutputFormat::Xml)));
    });
    c.bench_function("render_html", |b| {
        b.iter(|| black_box(render(black_box(&model), OutputFormat::Html)));
    });
    c.bench_function("render_pdf", |b| {
        b.iter(|| black_box(render(black_box(&model), OutputFormat::Pdf)));
    });
}

fn bench_full_pass(c: &mut Criterion) {
    let invoices = fixture_invoices();
    let settings = ProjectionSettings::default();
    c.bench_function("project_build_render_xml", |b| {
        b.iter(|| {
            for invoice in &invoices {
                let profile = project(invoice, ProfileKind::Basic, &settings).unwrap();
                black_box(render(&build(&profile), OutputFormat::Xml).unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_assemble, bench_project, bench_render, bench_full_pass);
criterion_main!(benches);

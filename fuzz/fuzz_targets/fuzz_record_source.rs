#![no_main]

use libfuzzer_sys::fuzz_target;
use zugferd_invoices::profile::{ProfileKind, ProjectionSettings, project};
use zugferd_invoices::store::{InvoiceRepository, MemorySource};

fuzz_target!(|data: &[u8]| {
    // Arbitrary JSON as a record source: loading and projecting must not panic.
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(source) = MemorySource::from_json(json) else {
        return;
    };
    let repo = InvoiceRepository::new(source);
    let Ok(rows) = repo.invoice_rows() else {
        return;
    };
    let settings = ProjectionSettings::default();
    for row in rows {
        if let Ok(invoice) = repo.get_invoice(&row) {
            let _ = project(&invoice, ProfileKind::Comfort, &settings);
        }
    }
});

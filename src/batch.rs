//! Batch driver: every invoice in the record source, through projection and
//! rendering, into a sink.
//!
//! Invoices that fail on their own data are skipped and reported; record
//! source and sink failures end the batch.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::core::PipelineError;
use crate::document;
use crate::profile::{self, ProfileKind, ProjectionSettings};
use crate::render::{self, OutputFormat};
use crate::store::{InvoiceRepository, RecordSource};

/// Receives rendered documents by file name.
pub trait RenderSink {
    fn write(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), PipelineError>;
}

/// Writes each document into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl RenderSink for DirectorySink {
    fn write(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), PipelineError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            PipelineError::resource(format!("cannot create {}: {e}", self.dir.display()))
        })?;
        let path = self.dir.join(file_name);
        fs::write(&path, bytes)
            .map_err(|e| PipelineError::resource(format!("cannot write {}: {e}", path.display())))
    }
}

/// Keeps documents in memory, keyed by file name.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub documents: BTreeMap<String, Vec<u8>>,
}

impl RenderSink for MemorySink {
    fn write(&mut self, file_name: &str, bytes: &[u8]) -> Result<(), PipelineError> {
        self.documents.insert(file_name.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// What to produce for each invoice.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub profile: ProfileKind,
    pub formats: Vec<OutputFormat>,
    /// File name prefix; defaults to the profile name.
    pub prefix: Option<String>,
}

impl BatchOptions {
    pub fn new(profile: ProfileKind, formats: Vec<OutputFormat>) -> Self {
        Self {
            profile,
            formats,
            prefix: None,
        }
    }

    fn prefix(&self) -> &str {
        self.prefix.as_deref().unwrap_or(self.profile.name())
    }
}

/// `{prefix}{id:05}.{ext}`, e.g. `comfort00001.xml`.
pub fn output_file_name(prefix: &str, invoice_id: u32, format: OutputFormat) -> String {
    format!("{prefix}{invoice_id:05}.{}", format.extension())
}

#[derive(Debug)]
pub struct SkippedInvoice {
    pub id: u32,
    pub reason: PipelineError,
}

#[derive(Debug, Default)]
pub struct BatchReport {
    /// File names handed to the sink, in order.
    pub rendered: Vec<String>,
    pub skipped: Vec<SkippedInvoice>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Run every invoice through project, build and render.
///
/// All formats of one invoice are rendered before any of them reaches the
/// sink, so a skipped invoice leaves no output behind.
pub fn run_batch<S, K>(
    repo: &InvoiceRepository<S>,
    settings: &ProjectionSettings,
    options: &BatchOptions,
    sink: &mut K,
) -> Result<BatchReport, PipelineError>
where
    S: RecordSource,
    K: RenderSink + ?Sized,
{
    let mut report = BatchReport::default();
    let rows = repo.invoice_rows().inspect_err(|e| {
        error!(error = %e, "cannot list invoices");
    })?;
    info!(invoices = rows.len(), profile = options.profile.name(), "batch started");

    for row in &rows {
        match render_invoice(repo, row, settings, options) {
            Ok(outputs) => {
                for (name, bytes) in outputs {
                    sink.write(&name, &bytes).inspect_err(|e| {
                        error!(invoice_id = row.id, file = %name, error = %e, "sink failed");
                    })?;
                    info!(invoice_id = row.id, file = %name, bytes = bytes.len(), "rendered");
                    report.rendered.push(name);
                }
            }
            Err(e) if e.is_per_invoice() => {
                warn!(invoice_id = row.id, error = %e, "invoice skipped");
                report.skipped.push(SkippedInvoice {
                    id: row.id,
                    reason: e,
                });
            }
            Err(e) => {
                error!(invoice_id = row.id, error = %e, "batch aborted");
                return Err(e);
            }
        }
    }

    info!(
        rendered = report.rendered.len(),
        skipped = report.skipped.len(),
        "batch finished"
    );
    Ok(report)
}

fn render_invoice<S: RecordSource>(
    repo: &InvoiceRepository<S>,
    row: &crate::store::InvoiceRow,
    settings: &ProjectionSettings,
    options: &BatchOptions,
) -> Result<Vec<(String, Vec<u8>)>, PipelineError> {
    let invoice = repo.get_invoice(row)?;
    let profile = profile::project(&invoice, options.profile, settings)?;
    let model = document::build(&profile);
    options
        .formats
        .iter()
        .map(|&format| {
            let bytes = render::render(&model, format)?;
            Ok((output_file_name(options.prefix(), invoice.id, format), bytes))
        })
        .collect()
}

//! PDF rendering with the XML invoice attached.
//!
//! The visible page is laid out from the document model; the canonical XML
//! is embedded as `ZUGFeRD-invoice.xml` together with the XMP metadata that
//! declares PDF/A-3 and the ZUGFeRD conformance level.

mod embed;
mod extract;
mod layout;
mod xmp;

pub use extract::extract_embedded_xml;

use crate::core::PipelineError;
use crate::document::DocumentModel;

/// Name of the attached XML file, as ZUGFeRD 1.0 prescribes.
pub const EMBEDDED_XML_FILENAME: &str = "ZUGFeRD-invoice.xml";

/// Render the invoice page and attach the XML rendering of the same model.
pub fn to_pdf(model: &DocumentModel) -> Result<Vec<u8>, PipelineError> {
    let xml = super::to_xml(model)?;
    let mut doc = layout::compose(model)?;
    embed::embed_xml(&mut doc, xml.as_bytes(), model)?;

    let mut output = Vec::new();
    doc.save_to(&mut output)
        .map_err(|e| PipelineError::resource(format!("failed to save PDF: {e}")))?;
    Ok(output)
}

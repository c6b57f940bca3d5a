//! Renderers turning a [`DocumentModel`] into output bytes.
//!
//! XML is the canonical, machine-readable form. HTML and PDF are human
//! readable; the PDF carries the XML as an embedded attachment.

#[cfg(feature = "html")]
mod html;
#[cfg(feature = "pdf")]
mod pdf;
mod xml;
mod xml_utils;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::PipelineError;
use crate::document::DocumentModel;

#[cfg(feature = "html")]
pub use html::to_html;
#[cfg(feature = "pdf")]
pub use pdf::{EMBEDDED_XML_FILENAME, extract_embedded_xml, to_pdf};
pub use xml::{NS_RAM, NS_RSM, NS_UDT, to_xml};

/// Output formats a document can be rendered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Xml,
    #[cfg(feature = "html")]
    Html,
    #[cfg(feature = "pdf")]
    Pdf,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xml => "xml",
            #[cfg(feature = "html")]
            Self::Html => "html",
            #[cfg(feature = "pdf")]
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xml" => Ok(Self::Xml),
            #[cfg(feature = "html")]
            "html" => Ok(Self::Html),
            #[cfg(feature = "pdf")]
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unsupported output format '{other}'")),
        }
    }
}

/// Render one document model in the given format.
pub fn render(model: &DocumentModel, format: OutputFormat) -> Result<Vec<u8>, PipelineError> {
    match format {
        OutputFormat::Xml => to_xml(model).map(String::into_bytes),
        #[cfg(feature = "html")]
        OutputFormat::Html => Ok(to_html(model).into_bytes()),
        #[cfg(feature = "pdf")]
        OutputFormat::Pdf => to_pdf(model),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("XML".parse::<OutputFormat>().unwrap(), OutputFormat::Xml);
        assert!("docx".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Xml.to_string(), "xml");
    }
}

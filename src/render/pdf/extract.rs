use lopdf::{Dictionary, Document, Object};

use super::EMBEDDED_XML_FILENAME;
use crate::core::PipelineError;

/// Read the attached ZUGFeRD XML back out of a PDF.
///
/// Looks in the `Names`/`EmbeddedFiles` tree first and falls back to the
/// catalog's `AF` array.
pub fn extract_embedded_xml(pdf_bytes: &[u8]) -> Result<String, PipelineError> {
    let doc = Document::load_mem(pdf_bytes)
        .map_err(|e| PipelineError::resource(format!("failed to load PDF: {e}")))?;

    via_names(&doc)
        .or_else(|_| via_af(&doc))
        .map_err(|e| PipelineError::resource(format!("no ZUGFeRD XML found in PDF: {e}")))
}

fn via_names(doc: &Document) -> Result<String, String> {
    let catalog = doc.catalog().map_err(|e| e.to_string())?;
    let names = resolve_dict(doc, catalog.get(b"Names").map_err(|e| e.to_string())?)?;
    let tree = resolve_dict(doc, names.get(b"EmbeddedFiles").map_err(|e| e.to_string())?)?;
    let entries = tree
        .get(b"Names")
        .and_then(Object::as_array)
        .map_err(|e| e.to_string())?;

    // [name1, filespec1, name2, filespec2, ...]
    for pair in entries.chunks_exact(2) {
        if obj_to_string(&pair[0]).is_some_and(|n| is_invoice_filename(&n)) {
            let spec = resolve_dict(doc, &pair[1])?;
            return read_filespec(doc, spec);
        }
    }
    Err(format!("{EMBEDDED_XML_FILENAME} not in EmbeddedFiles"))
}

fn via_af(doc: &Document) -> Result<String, String> {
    let catalog = doc.catalog().map_err(|e| e.to_string())?;
    let af = catalog
        .get(b"AF")
        .and_then(Object::as_array)
        .map_err(|e| e.to_string())?;

    for obj in af {
        let spec = resolve_dict(doc, obj)?;
        let name = spec
            .get(b"UF")
            .or_else(|_| spec.get(b"F"))
            .ok()
            .and_then(obj_to_string)
            .unwrap_or_default();
        if is_invoice_filename(&name) {
            return read_filespec(doc, spec);
        }
    }
    Err(format!("{EMBEDDED_XML_FILENAME} not in AF array"))
}

fn read_filespec(doc: &Document, spec: &Dictionary) -> Result<String, String> {
    let ef = resolve_dict(doc, spec.get(b"EF").map_err(|e| e.to_string())?)?;
    let file = resolve_obj(doc, ef.get(b"F").map_err(|e| e.to_string())?)?;
    let stream = file.as_stream().map_err(|e| e.to_string())?;
    // decompressed_content() fails on streams without a Filter
    let content = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());
    String::from_utf8(content).map_err(|e| e.to_string())
}

fn resolve_dict<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Dictionary, String> {
    match obj {
        Object::Reference(id) => doc.get_dictionary(*id).map_err(|e| e.to_string()),
        Object::Dictionary(d) => Ok(d),
        _ => Err("expected dictionary or reference".to_string()),
    }
}

fn resolve_obj<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, String> {
    match obj {
        Object::Reference(id) => doc.get_object(*id).map_err(|e| e.to_string()),
        other => Ok(other),
    }
}

fn obj_to_string(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

fn is_invoice_filename(name: &str) -> bool {
    name.eq_ignore_ascii_case(EMBEDDED_XML_FILENAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_pdf_input() {
        let err = extract_embedded_xml(b"not a pdf").unwrap_err();
        assert!(matches!(err, PipelineError::ResourceFailure(_)));
    }

    #[test]
    fn filename_match_ignores_case() {
        assert!(is_invoice_filename("zugferd-invoice.xml"));
        assert!(!is_invoice_filename("factur-x.xml"));
    }
}

use lopdf::{Document, Object, Stream, dictionary};

use super::EMBEDDED_XML_FILENAME;
use super::xmp;
use crate::core::PipelineError;
use crate::document::DocumentModel;

/// Attach the XML invoice to `doc` and mark the document as PDF/A-3.
pub(super) fn embed_xml(
    doc: &mut Document,
    xml_bytes: &[u8],
    model: &DocumentModel,
) -> Result<(), PipelineError> {
    let ef_stream = Stream::new(
        dictionary! {
            "Type" => "EmbeddedFile",
            "Subtype" => Object::Name(b"text#2Fxml".to_vec()),
            "Params" => dictionary! {
                "Size" => Object::Integer(xml_bytes.len() as i64),
            },
        },
        xml_bytes.to_vec(),
    )
    .with_compression(false);
    let ef_stream_id = doc.add_object(ef_stream);

    let filespec_id = doc.add_object(dictionary! {
        "Type" => "Filespec",
        "F" => Object::string_literal(EMBEDDED_XML_FILENAME),
        "UF" => Object::string_literal(EMBEDDED_XML_FILENAME),
        "Desc" => Object::string_literal(format!("ZUGFeRD invoice {}", model.header.id)),
        "AFRelationship" => Object::Name(b"Alternative".to_vec()),
        "EF" => dictionary! {
            "F" => Object::Reference(ef_stream_id),
            "UF" => Object::Reference(ef_stream_id),
        },
    });

    let name_tree_id = doc.add_object(dictionary! {
        "Names" => Object::Array(vec![
            Object::string_literal(EMBEDDED_XML_FILENAME),
            Object::Reference(filespec_id),
        ]),
    });
    let names_id = doc.add_object(dictionary! {
        "EmbeddedFiles" => Object::Reference(name_tree_id),
    });

    // XMP stays uncompressed for PDF/A
    let metadata_id = doc.add_object(
        Stream::new(
            dictionary! {
                "Type" => "Metadata",
                "Subtype" => "XML",
            },
            xmp::build_xmp(model).into_bytes(),
        )
        .with_compression(false),
    );

    let catalog = doc
        .catalog_mut()
        .map_err(|e| PipelineError::resource(format!("failed to get PDF catalog: {e}")))?;
    catalog.set("AF", Object::Array(vec![Object::Reference(filespec_id)]));
    catalog.set("Names", Object::Reference(names_id));
    catalog.set("Metadata", Object::Reference(metadata_id));
    catalog.set("MarkInfo", dictionary! { "Marked" => Object::Boolean(true) });
    Ok(())
}

use std::io::Cursor;

use chrono::NaiveDate;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::core::PipelineError;

fn xml_io(e: std::io::Error) -> PipelineError {
    PipelineError::resource(format!("XML write error: {e}"))
}

/// Indenting XML writer with chainable element helpers.
pub struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Result<Self, PipelineError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer })
    }

    pub fn into_string(self) -> Result<String, PipelineError> {
        let buf = self.writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| PipelineError::resource(format!("XML UTF-8 error: {e}")))
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, PipelineError> {
        self.start_element_with_attrs(name, &[])
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, PipelineError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, PipelineError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, PipelineError> {
        self.text_element_with_attrs(name, text, &[])
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, PipelineError> {
        self.start_element_with_attrs(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        self.end_element(name)
    }

    /// Amount with a `currencyID` attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: &str,
        currency: &str,
    ) -> Result<&mut Self, PipelineError> {
        self.text_element_with_attrs(name, amount, &[("currencyID", currency)])
    }

    /// `<name><udt:DateTimeString format="102">yyyyMMdd</udt:DateTimeString></name>`
    pub fn date_element(&mut self, name: &str, date: NaiveDate) -> Result<&mut Self, PipelineError> {
        self.start_element(name)?;
        self.text_element_with_attrs(
            "udt:DateTimeString",
            &date.format("%Y%m%d").to_string(),
            &[("format", "102")],
        )?;
        self.end_element(name)
    }

    /// `<outer><inner>text</inner></outer>`
    pub fn wrapped_text(
        &mut self,
        outer: &str,
        inner: &str,
        text: &str,
    ) -> Result<&mut Self, PipelineError> {
        self.start_element(outer)?;
        self.text_element(inner, text)?;
        self.end_element(outer)
    }
}

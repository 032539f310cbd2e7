//! XML writing helpers on top of `quick_xml`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{SamlError, SamlResult};

/// Thin element-oriented wrapper around `quick_xml::Writer`.
///
/// Every attribute value and text node is checked against the XML 1.0
/// `Char` production before it is written.
pub(crate) struct XmlWriter {
    writer: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// Creates a writer producing compact output.
    pub(crate) fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    /// Creates a writer producing indented output.
    pub(crate) fn indented() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 4),
        }
    }

    pub(crate) fn declaration(&mut self) -> SamlResult<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    pub(crate) fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> SamlResult<()> {
        let element = element(name, attrs)?;
        self.write(Event::Start(element))
    }

    pub(crate) fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> SamlResult<()> {
        let element = element(name, attrs)?;
        self.write(Event::Empty(element))
    }

    pub(crate) fn text(&mut self, text: &str) -> SamlResult<()> {
        ensure_xml_chars(text)?;
        self.write(Event::Text(BytesText::new(text)))
    }

    pub(crate) fn end(&mut self, name: &str) -> SamlResult<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    /// Writes `<name attrs>text</name>`.
    pub(crate) fn text_element(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
        text: &str,
    ) -> SamlResult<()> {
        self.start(name, attrs)?;
        self.text(text)?;
        self.end(name)
    }

    pub(crate) fn into_string(self) -> SamlResult<String> {
        String::from_utf8(self.writer.into_inner()).map_err(|e| SamlError::XmlWrite(e.to_string()))
    }

    fn write(&mut self, event: Event<'_>) -> SamlResult<()> {
        self.writer
            .write_event(event)
            .map_err(|e| SamlError::XmlWrite(e.to_string()))
    }
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> SamlResult<BytesStart<'a>> {
    let mut element = BytesStart::new(name);
    for &(key, value) in attrs {
        ensure_xml_chars(value)?;
        element.push_attribute((key, value));
    }
    Ok(element)
}

/// Rejects characters outside the XML 1.0 `Char` production.
///
/// Such characters cannot be represented in a well-formed document, not even
/// as character references.
pub(crate) fn ensure_xml_chars(value: &str) -> SamlResult<()> {
    match value.chars().find(|&c| !is_xml_char(c)) {
        Some(c) => Err(SamlError::XmlWrite(format!(
            "character U+{:04X} is not allowed in XML",
            u32::from(c)
        ))),
        None => Ok(()),
    }
}

const fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_escaped_content() {
        let mut writer = XmlWriter::new();
        writer
            .text_element("a", &[("b", "x\"y")], "1 < 2 & 3")
            .unwrap();
        let xml = writer.into_string().unwrap();

        assert_eq!(xml, r#"<a b="x&quot;y">1 &lt; 2 &amp; 3</a>"#);
    }

    #[test]
    fn rejects_control_characters() {
        assert!(ensure_xml_chars("tab\tnewline\n").is_ok());
        assert!(ensure_xml_chars("bell\u{7}").is_err());
        assert!(ensure_xml_chars("\u{FFFE}").is_err());

        let mut writer = XmlWriter::new();
        let err = writer.empty("a", &[("b", "\u{0}")]).unwrap_err();
        assert!(matches!(err, SamlError::XmlWrite(_)));
    }
}

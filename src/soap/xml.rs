use crate::utils::error::{PbmError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};

/// Owned XML element. Names are local (prefix stripped); attribute keys keep
/// their prefix so `type` and `xsi:type` stay distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<XmlElement>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Parses a document and returns its root element.
    pub fn parse(input: &str) -> Result<XmlElement> {
        let mut reader = Reader::from_str(input);
        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(PbmError::xml(format!(
                        "malformed XML at position {}: {}",
                        reader.buffer_position(),
                        e
                    )))
                }
            };

            match event {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| PbmError::xml("unbalanced closing tag"))?;
                    if !element.children.is_empty() && element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        let value = text
                            .unescape()
                            .map_err(|e| PbmError::xml(format!("bad text content: {}", e)))?;
                        current.text.push_str(&value);
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(PbmError::xml(format!(
                "document ended inside <{}>",
                open.name
            )));
        }

        root.ok_or_else(|| PbmError::xml("document has no root element"))
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Local part of the `xsi:type` attribute, whatever prefix the server bound.
    pub fn xsi_type(&self) -> Option<&str> {
        self.qualified_xsi_type().map(local_part)
    }

    /// `xsi:type` value as written, e.g. `xsd:int`.
    pub fn qualified_xsi_type(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.ends_with(":type"))
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    pub fn first_child(&self) -> Option<&XmlElement> {
        self.children.first()
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|c| c.text.as_str())
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

pub fn local_part(qualified: &str) -> &str {
    qualified
        .rsplit_once(':')
        .map(|(_, local)| local)
        .unwrap_or(qualified)
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr =
            attr.map_err(|e| PbmError::xml(format!("bad attribute on <{}>: {}", name, e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| PbmError::xml(format!("bad attribute value on <{}>: {}", name, e)))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Streaming writer for request bodies.
pub struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl Default for XmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl XmlBuilder {
    pub fn new() -> Self {
        Self {
            writer: Writer::new(Vec::new()),
        }
    }

    pub fn declaration(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    pub fn start(&mut self, name: &str, attributes: &[(&str, &str)]) -> Result<()> {
        let mut start = BytesStart::new(name);
        for attribute in attributes {
            start.push_attribute(*attribute);
        }
        self.write(Event::Start(start))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub fn text(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.write(Event::Text(BytesText::new(text)))
    }

    pub fn element<F>(&mut self, name: &str, attributes: &[(&str, &str)], body: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.start(name, attributes)?;
        body(self)?;
        self.end(name)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.element(name, &[], |xml| xml.text(text))
    }

    /// Writes `<name xsi:type="...">text</name>`.
    pub fn typed_text_element(&mut self, name: &str, xsi_type: &str, text: &str) -> Result<()> {
        self.element(name, &[("xsi:type", xsi_type)], |xml| xml.text(text))
    }

    /// Writes a parsed tree back out, under `name` instead of its own name.
    pub fn tree(&mut self, name: &str, element: &XmlElement) -> Result<()> {
        let attributes: Vec<(&str, &str)> = element
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        self.element(name, &attributes, |xml| {
            xml.text(&element.text)?;
            for child in &element.children {
                xml.tree(&child.name, child)?;
            }
            Ok(())
        })
    }

    pub fn into_string(self) -> Result<String> {
        String::from_utf8(self.writer.into_inner())
            .map_err(|e| PbmError::xml(format!("writer produced invalid UTF-8: {}", e)))
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| PbmError::xml(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strips_element_prefixes_and_keeps_attribute_keys() {
        let doc = r#"<?xml version="1.0"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"
    xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <soapenv:Body>
    <returnval type="PbmProfileProfileManager">ProfileManager</returnval>
    <value xsi:type="xsd:int">3</value>
  </soapenv:Body>
</soapenv:Envelope>"#;

        let root = XmlElement::parse(doc).unwrap();
        assert_eq!(root.name, "Envelope");
        assert!(root.text.is_empty());

        let body = root.child("Body").unwrap();
        let moref = body.child("returnval").unwrap();
        assert_eq!(moref.attribute("type"), Some("PbmProfileProfileManager"));
        assert_eq!(moref.xsi_type(), None);
        assert_eq!(moref.text, "ProfileManager");

        let value = body.child("value").unwrap();
        assert_eq!(value.xsi_type(), Some("int"));
        assert_eq!(value.text, "3");
    }

    #[test]
    fn test_parse_unescapes_entities() {
        let root = XmlElement::parse("<name>Gold &amp; Silver &lt;tier&gt;</name>").unwrap();
        assert_eq!(root.text, "Gold & Silver <tier>");
    }

    #[test]
    fn test_parse_rejects_truncated_document() {
        assert!(XmlElement::parse("<a><b>text</b>").is_err());
        assert!(XmlElement::parse("").is_err());
    }

    #[test]
    fn test_builder_escapes_text_and_attributes() {
        let mut xml = XmlBuilder::new();
        xml.element("profile", &[("note", "a\"b")], |xml| {
            xml.text_element("name", "R&D <gold>")
        })
        .unwrap();
        let out = xml.into_string().unwrap();

        let parsed = XmlElement::parse(&out).unwrap();
        assert_eq!(parsed.attribute("note"), Some("a\"b"));
        assert_eq!(parsed.child_text("name"), Some("R&D <gold>"));
        assert!(out.contains("R&amp;D &lt;gold&gt;"));
    }

    #[test]
    fn test_tree_writes_renamed_copy() {
        let original = XmlElement::new("hubsToSearch")
            .with_child(XmlElement::new("hubType").with_text("Datastore"))
            .with_child(XmlElement::new("hubId").with_text("datastore-12"));

        let mut xml = XmlBuilder::new();
        xml.tree("returnval", &original).unwrap();
        let parsed = XmlElement::parse(&xml.into_string().unwrap()).unwrap();

        assert_eq!(parsed.name, "returnval");
        assert_eq!(parsed.children, original.children);
    }
}

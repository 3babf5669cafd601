use crate::soap::xml::{XmlBuilder, XmlElement};
use crate::utils::error::{PbmError, Result};
use chrono::{DateTime, SecondsFormat, Utc};

/// Serializes a value as the element `name`.
pub trait ToXml {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()>;
}

/// Decodes a value from an element, whatever the element is called.
pub trait FromXml: Sized {
    fn from_xml(element: &XmlElement) -> Result<Self>;
}

impl ToXml for str {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.text_element(name, self)
    }
}

impl ToXml for String {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        self.as_str().write_xml(xml, name)
    }
}

impl ToXml for bool {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.text_element(name, if *self { "true" } else { "false" })
    }
}

impl ToXml for i32 {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.text_element(name, &self.to_string())
    }
}

impl ToXml for i64 {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.text_element(name, &self.to_string())
    }
}

impl ToXml for DateTime<Utc> {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.text_element(name, &self.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl<T: ToXml> ToXml for Option<T> {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        match self {
            Some(value) => value.write_xml(xml, name),
            None => Ok(()),
        }
    }
}

impl<T: ToXml> ToXml for [T] {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        for value in self {
            value.write_xml(xml, name)?;
        }
        Ok(())
    }
}

impl<T: ToXml> ToXml for Vec<T> {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        self.as_slice().write_xml(xml, name)
    }
}

impl<T: ToXml + ?Sized> ToXml for &T {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        (**self).write_xml(xml, name)
    }
}

impl FromXml for String {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(element.text.clone())
    }
}

impl FromXml for bool {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        parse_bool(&element.name, element.text.trim())
    }
}

impl FromXml for i32 {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        element.text.trim().parse().map_err(|e| {
            PbmError::decode(format!("<{}> is not an int: {}", element.name, e))
        })
    }
}

impl FromXml for i64 {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        element.text.trim().parse().map_err(|e| {
            PbmError::decode(format!("<{}> is not a long: {}", element.name, e))
        })
    }
}

impl FromXml for DateTime<Utc> {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        DateTime::parse_from_rfc3339(element.text.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| {
                PbmError::decode(format!(
                    "<{}> is not an xsd:dateTime ('{}'): {}",
                    element.name, element.text, e
                ))
            })
    }
}

pub fn parse_bool(field: &str, raw: &str) -> Result<bool> {
    match raw {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(PbmError::decode(format!(
            "<{}> is not a boolean: '{}'",
            field, other
        ))),
    }
}

/// Decodes the child `name`, failing if it is absent.
pub fn required<T: FromXml>(parent: &XmlElement, name: &str) -> Result<T> {
    let child = parent.child(name).ok_or_else(|| {
        PbmError::decode(format!("<{}> is missing required <{}>", parent.name, name))
    })?;
    T::from_xml(child)
}

pub fn optional<T: FromXml>(parent: &XmlElement, name: &str) -> Result<Option<T>> {
    parent.child(name).map(T::from_xml).transpose()
}

pub fn repeated<T: FromXml>(parent: &XmlElement, name: &str) -> Result<Vec<T>> {
    parent.children_named(name).map(T::from_xml).collect()
}

/// Optional boolean that defaults to `false` when absent.
pub fn flag(parent: &XmlElement, name: &str) -> Result<bool> {
    Ok(optional::<bool>(parent, name)?.unwrap_or(false))
}

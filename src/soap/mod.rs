// SOAP/XML codec: element tree, envelope framing and the PBM type bindings.

pub mod bindings;
pub mod codec;
pub mod envelope;
pub mod xml;

pub use codec::{FromXml, ToXml};
pub use xml::{XmlBuilder, XmlElement};

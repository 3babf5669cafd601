use crate::core::operations::Operation;
use crate::domain::model::{ManagedObjectReference, PBM_NAMESPACE};
use crate::fault::decode_fault;
use crate::soap::codec::ToXml;
use crate::soap::xml::{XmlBuilder, XmlElement};
use crate::utils::error::{PbmError, Result};

pub const SOAP_ENVELOPE_NS: &str = "http://schemas.xmlsoap.org/soap/envelope/";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema";
pub const XSI_NS: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Builds a SOAP 1.1 request for `operation` against the managed object
/// `this`. `params` writes the operation's parameters in schema order.
pub fn build_request<F>(operation: Operation, this: &ManagedObjectReference, params: F) -> Result<String>
where
    F: FnOnce(&mut XmlBuilder) -> Result<()>,
{
    let mut xml = XmlBuilder::new();
    xml.declaration()?;
    xml.element(
        "soapenv:Envelope",
        &[
            ("xmlns:soapenv", SOAP_ENVELOPE_NS),
            ("xmlns:xsd", XSD_NS),
            ("xmlns:xsi", XSI_NS),
        ],
        |xml| {
            xml.element("soapenv:Body", &[], |xml| {
                xml.element(
                    operation.request_element(),
                    &[("xmlns", PBM_NAMESPACE)],
                    |xml| {
                        this.write_xml(xml, "_this")?;
                        params(xml)
                    },
                )
            })
        },
    )?;
    xml.into_string()
}

/// True when `document` parses as XML rooted at a SOAP `Envelope`.
pub fn is_soap_envelope(document: &str) -> bool {
    matches!(XmlElement::parse(document), Ok(root) if root.name == "Envelope")
}

/// Extracts the `returnval` elements of `operation`'s response. A SOAP fault
/// in the body is decoded and returned as `PbmError::Remote`.
pub fn parse_response(operation: Operation, document: &str) -> Result<Vec<XmlElement>> {
    let envelope = XmlElement::parse(document)?;
    if envelope.name != "Envelope" {
        return Err(PbmError::decode(format!(
            "expected a SOAP Envelope, got <{}>",
            envelope.name
        )));
    }

    let body = envelope
        .child("Body")
        .ok_or_else(|| PbmError::decode("SOAP envelope has no Body"))?;
    let payload = body
        .first_child()
        .ok_or_else(|| PbmError::decode("SOAP body is empty"))?;

    if payload.name == "Fault" {
        let fault = decode_fault(payload);
        tracing::warn!(
            operation = operation.request_element(),
            fault = %fault.kind,
            "PBM call failed: {}",
            fault.message()
        );
        return Err(PbmError::Remote(fault));
    }

    if payload.name != operation.response_element() {
        return Err(PbmError::decode(format!(
            "expected <{}>, got <{}>",
            operation.response_element(),
            payload.name
        )));
    }

    Ok(payload.children_named("returnval").cloned().collect())
}

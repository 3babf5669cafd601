use crate::fault::catalog::FaultKind;
use crate::soap::xml::XmlElement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A fault raised by the PBM service, decoded from a SOAP fault or from a
/// `LocalizedMethodFault` embedded in a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteFault {
    pub kind: FaultKind,
    /// Element tag (or `xsi:type` for embedded faults) the kind was resolved from.
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault_string: Option<String>,
    pub detail: FaultDetail,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaultDetail {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<LocalizableMessage>,
    /// Leaf fields of the payload, e.g. `invalidProperty` on `InvalidArgument`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<Box<RemoteFault>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<XmlElement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizableMessage {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<(String, String)>,
}

impl RemoteFault {
    /// Best human-readable text: the fault string, then the first localized
    /// message, then the kind name.
    pub fn message(&self) -> String {
        if let Some(text) = self.fault_string.as_deref().filter(|s| !s.is_empty()) {
            return text.to_string();
        }
        self.detail
            .messages
            .iter()
            .find_map(|m| m.message.clone())
            .unwrap_or_else(|| self.kind.name().to_string())
    }
}

impl FaultDetail {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    fn from_payload(element: &XmlElement) -> Self {
        let mut detail = FaultDetail {
            type_name: element.xsi_type().map(str::to_string),
            raw: Some(element.clone()),
            ..Default::default()
        };

        for child in &element.children {
            match child.name.as_str() {
                "faultMessage" => detail.messages.push(decode_message(child)),
                "faultCause" => detail.cause = Some(Box::new(decode_inline_fault(child))),
                _ if child.is_leaf() => detail
                    .properties
                    .entry(child.name.clone())
                    .or_default()
                    .push(child.text.clone()),
                _ => {}
            }
        }

        detail
    }
}

impl fmt::Display for RemoteFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "remote fault {}: {}", self.kind, self.message())
    }
}

impl std::error::Error for RemoteFault {}

/// Decodes a SOAP 1.1 `<Fault>` element. Never fails: faults without a
/// detail, or with a tag outside the catalog, come back as
/// `FaultKind::Unrecognized` with whatever payload was present.
pub fn decode_fault(fault: &XmlElement) -> RemoteFault {
    let fault_code = fault.child_text("faultcode").map(str::to_string);
    let fault_string = fault.child_text("faultstring").map(str::to_string);

    match fault.child("detail").and_then(XmlElement::first_child) {
        Some(payload) => {
            let kind = resolve_kind(&payload.name, payload.xsi_type());
            tracing::debug!(tag = %payload.name, kind = %kind, "decoded SOAP fault");
            RemoteFault {
                kind,
                tag: payload.name.clone(),
                fault_code,
                fault_string,
                detail: FaultDetail::from_payload(payload),
            }
        }
        None => {
            let tag = fault_code.clone().unwrap_or_else(|| fault.name.clone());
            RemoteFault {
                kind: FaultKind::Unrecognized(tag.clone()),
                tag,
                fault_code,
                fault_string,
                detail: FaultDetail::default(),
            }
        }
    }
}

/// Decodes a fault carried as data, either a `LocalizedMethodFault`
/// (`<fault xsi:type=".."/>` plus `<localizedMessage>`) or a bare typed
/// `MethodFault`.
pub fn decode_inline_fault(element: &XmlElement) -> RemoteFault {
    let (payload, localized) = match element.child("fault") {
        Some(inner) => (
            inner,
            element.child_text("localizedMessage").map(str::to_string),
        ),
        None => (element, None),
    };

    let tag = payload
        .xsi_type()
        .map(str::to_string)
        .unwrap_or_else(|| payload.name.clone());
    let kind = FaultKind::from_name(&tag)
        .or_else(|| FaultKind::from_element_name(&tag))
        .unwrap_or_else(|| FaultKind::Unrecognized(tag.clone()));

    RemoteFault {
        kind,
        tag,
        fault_code: None,
        fault_string: localized,
        detail: FaultDetail::from_payload(payload),
    }
}

fn resolve_kind(tag: &str, xsi_type: Option<&str>) -> FaultKind {
    FaultKind::from_element_name(tag)
        .or_else(|| xsi_type.and_then(FaultKind::from_name))
        .unwrap_or_else(|| FaultKind::Unrecognized(tag.to_string()))
}

fn decode_message(element: &XmlElement) -> LocalizableMessage {
    LocalizableMessage {
        key: element.child_text("key").unwrap_or_default().to_string(),
        message: element.child_text("message").map(str::to_string),
        args: element
            .children_named("arg")
            .map(|arg| {
                (
                    arg.child_text("key").unwrap_or_default().to_string(),
                    arg.child_text("value").unwrap_or_default().to_string(),
                )
            })
            .collect(),
    }
}

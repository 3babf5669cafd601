//! In-memory transport for unit tests.

use crate::domain::ports::Transport;
use crate::utils::error::{PbmError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const SERVICE_CONTENT: &str = r#"<returnval>
 <aboutInfo><name>PBM</name><version>8.0</version><instanceUuid>6a3d2c1e-pbm</instanceUuid></aboutInfo>
 <sessionManager type="PbmSessionManager">SessionManager</sessionManager>
 <capabilityMetadataManager type="PbmCapabilityMetadataManager">CapabilityMetadataManager</capabilityMetadataManager>
 <profileManager type="PbmProfileProfileManager">ProfileManager</profileManager>
 <complianceManager type="PbmComplianceManager">complianceManager</complianceManager>
 <placementSolver type="PbmPlacementSolver">placementSolver</placementSolver>
 <replicationManager type="PbmReplicationManager">ReplicationManager</replicationManager>
</returnval>"#;

/// Wraps `payload` in a `{element}Response` SOAP envelope.
pub fn soap_response(request_element: &str, payload: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:xsd="http://www.w3.org/2001/XMLSchema">
<soapenv:Body><{request_element}Response xmlns="urn:pbm">{payload}</{request_element}Response></soapenv:Body>
</soapenv:Envelope>"#
    )
}

pub fn soap_fault(code: &str, message: &str, detail: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<soapenv:Body><soapenv:Fault><faultcode>{code}</faultcode><faultstring>{message}</faultstring><detail>{detail}</detail></soapenv:Fault></soapenv:Body>
</soapenv:Envelope>"#
    )
}

/// Replays canned response documents in order and records every request.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<String>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the script with a service content response.
    pub fn with_service_content() -> Self {
        let transport = Self::new();
        transport.push(soap_response("PbmRetrieveServiceContent", SERVICE_CONTENT));
        transport
    }

    pub fn push(&self, document: impl Into<String>) {
        self.responses.lock().unwrap().push_back(document.into());
    }

    pub fn reply(&self, request_element: &str, payload: &str) {
        self.push(soap_response(request_element, payload));
    }

    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> String {
        self.requests
            .lock()
            .unwrap()
            .last()
            .map(|(_, body)| body.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn round_trip(&self, operation: &str, envelope: String) -> Result<String> {
        self.requests
            .lock()
            .unwrap()
            .push((operation.to_string(), envelope));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PbmError::decode(format!("no scripted response for {}", operation)))
    }
}

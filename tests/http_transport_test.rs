use anyhow::Result;
use httpmock::prelude::*;
use pbm_client::app::commands::build_create_spec;
use pbm_client::domain::model::{PbmProfileCategory, PbmProfileId, PbmProfileResourceType, PbmServerObjectRef};
use pbm_client::fault::FaultKind;
use pbm_client::{ConnectionSettings, HttpTransport, PbmClient, PbmError};
use std::time::{Duration, Instant};

const SERVICE_CONTENT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/">
 <soapenv:Body>
  <PbmRetrieveServiceContentResponse xmlns="urn:pbm">
   <returnval>
    <aboutInfo><name>VMware Profile-Driven Storage Service</name><version>8.0.2</version><instanceUuid>0c2a6b3e-91d2</instanceUuid></aboutInfo>
    <sessionManager type="PbmSessionManager">SessionManager</sessionManager>
    <capabilityMetadataManager type="PbmCapabilityMetadataManager">CapabilityMetadataManager</capabilityMetadataManager>
    <profileManager type="PbmProfileProfileManager">ProfileManager</profileManager>
    <complianceManager type="PbmComplianceManager">complianceManager</complianceManager>
    <placementSolver type="PbmPlacementSolver">placementSolver</placementSolver>
    <replicationManager type="PbmReplicationManager">ReplicationManager</replicationManager>
   </returnval>
  </PbmRetrieveServiceContentResponse>
 </soapenv:Body>
</soapenv:Envelope>"#;

fn settings_for(server: &MockServer) -> ConnectionSettings {
    ConnectionSettings::new(server.url("/pbm/sdk"))
        .with_session_cookie("vmware_soap_session=52f1")
        .with_retry(0, 1)
}

fn fault_body(detail: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
 <soapenv:Body>
  <soapenv:Fault>
   <faultcode>ServerFaultCode</faultcode>
   <faultstring>Operation failed</faultstring>
   <detail>{detail}</detail>
  </soapenv:Fault>
 </soapenv:Body>
</soapenv:Envelope>"#
    )
}

#[tokio::test]
async fn test_requests_carry_soap_headers_and_session_cookie() -> Result<()> {
    let server = MockServer::start_async().await;

    let content_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pbm/sdk")
                .header("SOAPAction", "urn:pbm/8.0")
                .header("Content-Type", "text/xml; charset=utf-8")
                .header("vcSessionCookie", "vmware_soap_session=52f1")
                .body_contains(r#"<PbmRetrieveServiceContent xmlns="urn:pbm">"#)
                .body_contains(r#"<_this type="PbmServiceInstance">ServiceInstance</_this>"#);
            then.status(200)
                .header("content-type", "text/xml; charset=utf-8")
                .body(SERVICE_CONTENT);
        })
        .await;

    let query_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/pbm/sdk")
                .header("vcSessionCookie", "vmware_soap_session=52f1")
                .body_contains(r#"<PbmQueryProfile xmlns="urn:pbm">"#)
                .body_contains(r#"<_this type="PbmProfileProfileManager">ProfileManager</_this>"#)
                .body_contains("<profileCategory>REQUIREMENT</profileCategory>");
            then.status(200).body(
                r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/"><soapenv:Body>
<PbmQueryProfileResponse xmlns="urn:pbm">
 <returnval><uniqueId>aa6d5a82-1c88-45da-85d3-3d74b91a5bad</uniqueId></returnval>
 <returnval><uniqueId>f4e5bade-15a2-4805-bf8e-52318c4ce443</uniqueId></returnval>
</PbmQueryProfileResponse></soapenv:Body></soapenv:Envelope>"#,
            );
        })
        .await;

    let client = PbmClient::new(HttpTransport::new(&settings_for(&server))?);
    let content = client.service_content().await?;
    assert_eq!(content.about_info.version, "8.0.2");

    let ids = client
        .query_profile(&PbmProfileResourceType::storage(), Some(PbmProfileCategory::Requirement))
        .await?;
    assert_eq!(ids.len(), 2);
    assert_eq!(ids[0], PbmProfileId::new("aa6d5a82-1c88-45da-85d3-3d74b91a5bad"));

    content_mock.assert_async().await;
    query_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_http_500_fault_is_decoded() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).body_contains("PbmRetrieveServiceContent");
            then.status(200).body(SERVICE_CONTENT);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).body_contains("PbmCheckCompliance");
            then.status(500).body(fault_body(
                r#"<InvalidArgumentFault xmlns="urn:pbm" xsi:type="InvalidArgument"><invalidProperty>entities</invalidProperty></InvalidArgumentFault>"#,
            ));
        })
        .await;

    let client = PbmClient::new(HttpTransport::new(&settings_for(&server))?);
    let err = client
        .check_compliance(&[PbmServerObjectRef::virtual_machine("vm-404")], None)
        .await
        .unwrap_err();

    let fault = err.remote_fault().expect("fault should be decoded");
    assert_eq!(fault.kind, FaultKind::InvalidArgument);
    assert_eq!(fault.fault_code.as_deref(), Some("ServerFaultCode"));
    assert_eq!(fault.detail.property("invalidProperty"), Some("entities"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_fault_keeps_raw_payload() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).body_contains("PbmRetrieveServiceContent");
            then.status(500).body(fault_body(
                r#"<PbmBrandNewFault xmlns="urn:pbm"><reason>not yet in the catalog</reason></PbmBrandNewFault>"#,
            ));
        })
        .await;

    let client = PbmClient::new(HttpTransport::new(&settings_for(&server))?);
    let err = client.retrieve_service_content().await.unwrap_err();

    let fault = err.remote_fault().expect("fault should be decoded");
    assert_eq!(fault.kind, FaultKind::Unrecognized("PbmBrandNewFault".to_string()));
    let raw = fault.detail.raw.as_ref().expect("raw payload kept");
    assert_eq!(raw.child_text("reason"), Some("not yet in the catalog"));
    Ok(())
}

#[tokio::test]
async fn test_gateway_errors_are_retried() -> Result<()> {
    let server = MockServer::start_async().await;
    let unavailable = server
        .mock_async(|when, then| {
            when.method(POST).path("/pbm/sdk");
            then.status(503).body("Service Unavailable");
        })
        .await;

    let settings = settings_for(&server).with_retry(2, 1);
    let client = PbmClient::new(HttpTransport::new(&settings)?);
    let err = client.retrieve_service_content().await.unwrap_err();

    assert!(matches!(err, PbmError::HttpStatus { status: 503, .. }));
    assert_eq!(unavailable.hits_async().await, 3);
    Ok(())
}

#[tokio::test]
async fn test_client_errors_are_not_retried() -> Result<()> {
    let server = MockServer::start_async().await;
    let forbidden = server
        .mock_async(|when, then| {
            when.method(POST).path("/pbm/sdk");
            then.status(403).body("Forbidden");
        })
        .await;

    let settings = settings_for(&server).with_retry(3, 1);
    let client = PbmClient::new(HttpTransport::new(&settings)?);
    let err = client.retrieve_service_content().await.unwrap_err();

    assert!(matches!(err, PbmError::HttpStatus { status: 403, .. }));
    assert!(err.recovery_suggestion().contains("session cookie"));
    assert_eq!(forbidden.hits_async().await, 1);
    Ok(())
}

async fn mock_service_content(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(POST).body_contains("PbmRetrieveServiceContent");
            then.status(200).body(SERVICE_CONTENT);
        })
        .await;
}

#[tokio::test]
async fn test_soap_faults_are_not_retried() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_service_content(&server).await;
    let fault = server
        .mock_async(|when, then| {
            when.method(POST).body_contains("PbmQueryProfile");
            then.status(500).body(fault_body(
                r#"<NotFoundFault xmlns="urn:pbm" xsi:type="NotFound"/>"#,
            ));
        })
        .await;

    let settings = settings_for(&server).with_retry(3, 1);
    let client = PbmClient::new(HttpTransport::new(&settings)?);
    let err = client
        .query_profile(&PbmProfileResourceType::storage(), None)
        .await
        .unwrap_err();

    assert_eq!(err.remote_fault().map(|f| f.kind.clone()), Some(FaultKind::NotFound));
    assert_eq!(fault.hits_async().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_html_500_keeps_http_status() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/pbm/sdk");
            then.status(500)
                .header("content-type", "text/html")
                .body("<html><body><h1>500 Internal Server Error</h1></body></html>");
        })
        .await;

    let client = PbmClient::new(HttpTransport::new(&settings_for(&server))?);
    let err = client.retrieve_service_content().await.unwrap_err();

    match &err {
        PbmError::HttpStatus { status, body } => {
            assert_eq!(*status, 500);
            assert!(body.contains("Internal Server Error"));
        }
        other => panic!("expected HttpStatus, got {:?}", other),
    }
    assert!(!err.recovery_suggestion().contains("API version"));
    Ok(())
}

#[tokio::test]
async fn test_timed_out_create_is_sent_once() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_service_content(&server).await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).body_contains("PbmCreate");
            then.status(200).delay(Duration::from_millis(1500));
        })
        .await;

    let mut settings = settings_for(&server).with_retry(2, 1);
    settings.timeout_seconds = 1;
    let client = PbmClient::new(HttpTransport::new(&settings)?);
    let spec = build_create_spec("Gold", None, &["VSAN.hostFailuresToTolerate=1".to_string()])?;
    let err = client.create(&spec).await.unwrap_err();

    assert!(matches!(&err, PbmError::Http(e) if e.is_timeout()));
    assert_eq!(create.hits_async().await, 1);
    Ok(())
}

#[tokio::test]
async fn test_timed_out_query_is_retried() -> Result<()> {
    let server = MockServer::start_async().await;
    mock_service_content(&server).await;
    let query = server
        .mock_async(|when, then| {
            when.method(POST).body_contains("PbmQueryProfile");
            then.status(200).delay(Duration::from_millis(1500));
        })
        .await;

    let mut settings = settings_for(&server).with_retry(1, 1);
    settings.timeout_seconds = 1;
    let client = PbmClient::new(HttpTransport::new(&settings)?);
    let err = client
        .query_profile(&PbmProfileResourceType::storage(), None)
        .await
        .unwrap_err();

    assert!(matches!(&err, PbmError::Http(e) if e.is_timeout()));
    assert_eq!(query.hits_async().await, 2);
    Ok(())
}

#[tokio::test]
async fn test_connection_refused_is_retried_with_backoff() -> Result<()> {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        listener.local_addr()?.port()
    };
    let settings =
        ConnectionSettings::new(format!("http://127.0.0.1:{}/pbm/sdk", port)).with_retry(2, 100);
    let client = PbmClient::new(HttpTransport::new(&settings)?);

    let started = Instant::now();
    let err = client.retrieve_service_content().await.unwrap_err();

    assert!(matches!(&err, PbmError::Http(e) if e.is_connect()));
    // Two backoff sleeps: 100ms then 200ms.
    assert!(started.elapsed() >= Duration::from_millis(300));
    Ok(())
}

#[test]
fn test_invalid_endpoint_is_rejected() {
    let settings = ConnectionSettings::new("not a url");
    assert!(HttpTransport::new(&settings).is_err());
}

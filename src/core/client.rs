use crate::core::operations::Operation;
use crate::domain::model::*;
use crate::domain::ports::Transport;
use crate::soap::codec::{FromXml, ToXml};
use crate::soap::envelope::{build_request, parse_response};
use crate::soap::xml::{XmlBuilder, XmlElement};
use crate::utils::error::{PbmError, Result};
use tokio::sync::OnceCell;
use tracing::debug;

/// Typed client for the PBM SOAP service. Manager references come from the
/// service content, fetched on first use and cached for the client's life.
pub struct PbmClient<T: Transport> {
    transport: T,
    content: OnceCell<PbmServiceInstanceContent>,
}

impl<T: Transport> PbmClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            content: OnceCell::new(),
        }
    }

    /// Skips the initial `PbmRetrieveServiceContent` round trip.
    pub fn with_service_content(transport: T, content: PbmServiceInstanceContent) -> Self {
        Self {
            transport,
            content: OnceCell::new_with(Some(content)),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub async fn service_content(&self) -> Result<&PbmServiceInstanceContent> {
        self.content
            .get_or_try_init(|| self.retrieve_service_content())
            .await
    }

    async fn this_for(&self, operation: Operation) -> Result<ManagedObjectReference> {
        let manager = operation.manager();
        let content = self.service_content().await?;
        manager.reference(content).ok_or_else(|| {
            PbmError::decode(format!(
                "PBM service does not expose a {:?} for {}",
                manager, operation
            ))
        })
    }

    /// Calls a manager method, resolving `_this` from the service content.
    async fn invoke<F>(&self, operation: Operation, params: F) -> Result<Vec<XmlElement>>
    where
        F: FnOnce(&mut XmlBuilder) -> Result<()>,
    {
        let this = self.this_for(operation).await?;
        self.send(operation, &this, params).await
    }

    async fn send<F>(
        &self,
        operation: Operation,
        this: &ManagedObjectReference,
        params: F,
    ) -> Result<Vec<XmlElement>>
    where
        F: FnOnce(&mut XmlBuilder) -> Result<()>,
    {
        let envelope = build_request(operation, this, params)?;
        debug!(operation = %operation, this = %this.value, bytes = envelope.len(), "Sending PBM request");

        let document = self
            .transport
            .round_trip(operation.request_element(), envelope)
            .await?;
        let values = parse_response(operation, &document)?;
        debug!(operation = %operation, returnvals = values.len(), "PBM call completed");
        Ok(values)
    }

    // ---- ServiceInstance ----

    pub async fn retrieve_service_content(&self) -> Result<PbmServiceInstanceContent> {
        let this = ManagedObjectReference::service_instance();
        let values = self
            .send(Operation::RetrieveServiceContent, &this, |_| Ok(()))
            .await?;
        decode_one(Operation::RetrieveServiceContent, &values)
    }

    // ---- ProfileManager ----

    pub async fn assign_default_requirement_profile(
        &self,
        profile: &PbmProfileId,
        datastores: &[PbmPlacementHub],
    ) -> Result<()> {
        self.invoke(Operation::AssignDefaultRequirementProfile, |xml| {
            profile.write_xml(xml, "profile")?;
            datastores.write_xml(xml, "datastores")
        })
        .await?;
        Ok(())
    }

    pub async fn create(&self, create_spec: &PbmCapabilityProfileCreateSpec) -> Result<PbmProfileId> {
        let values = self
            .invoke(Operation::Create, |xml| create_spec.write_xml(xml, "createSpec"))
            .await?;
        decode_one(Operation::Create, &values)
    }

    pub async fn delete(&self, profile_ids: &[PbmProfileId]) -> Result<Vec<PbmProfileOperationOutcome>> {
        let values = self
            .invoke(Operation::Delete, |xml| profile_ids.write_xml(xml, "profileId"))
            .await?;
        decode_all(&values)
    }

    pub async fn fetch_capability_metadata(
        &self,
        resource_type: Option<&PbmProfileResourceType>,
        vendor_uuid: Option<&str>,
    ) -> Result<Vec<PbmCapabilityMetadataPerCategory>> {
        let values = self
            .invoke(Operation::FetchCapabilityMetadata, |xml| {
                resource_type.write_xml(xml, "resourceType")?;
                vendor_uuid.write_xml(xml, "vendorUuid")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn fetch_capability_schema(
        &self,
        vendor_uuid: Option<&str>,
        line_of_service: &[String],
    ) -> Result<Vec<PbmCapabilitySchema>> {
        let values = self
            .invoke(Operation::FetchCapabilitySchema, |xml| {
                vendor_uuid.write_xml(xml, "vendorUuid")?;
                line_of_service.write_xml(xml, "lineOfService")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn fetch_resource_type(&self) -> Result<Vec<PbmProfileResourceType>> {
        let values = self.invoke(Operation::FetchResourceType, |_| Ok(())).await?;
        decode_all(&values)
    }

    pub async fn fetch_vendor_info(
        &self,
        resource_type: Option<&PbmProfileResourceType>,
    ) -> Result<Vec<PbmCapabilityVendorResourceTypeInfo>> {
        let values = self
            .invoke(Operation::FetchVendorInfo, |xml| {
                resource_type.write_xml(xml, "resourceType")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn find_applicable_default_profile(
        &self,
        datastores: &[PbmPlacementHub],
    ) -> Result<Vec<PbmProfile>> {
        let values = self
            .invoke(Operation::FindApplicableDefaultProfile, |xml| {
                datastores.write_xml(xml, "datastores")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn query_associated_entities(
        &self,
        profiles: &[PbmProfileId],
    ) -> Result<Vec<PbmQueryProfileResult>> {
        let values = self
            .invoke(Operation::QueryAssociatedEntities, |xml| {
                profiles.write_xml(xml, "profiles")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn query_associated_entity(
        &self,
        profile: &PbmProfileId,
        entity_type: Option<&str>,
    ) -> Result<Vec<PbmServerObjectRef>> {
        let values = self
            .invoke(Operation::QueryAssociatedEntity, |xml| {
                profile.write_xml(xml, "profile")?;
                entity_type.write_xml(xml, "entityType")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn query_associated_profile(&self, entity: &PbmServerObjectRef) -> Result<Vec<PbmProfileId>> {
        let values = self
            .invoke(Operation::QueryAssociatedProfile, |xml| entity.write_xml(xml, "entity"))
            .await?;
        decode_all(&values)
    }

    pub async fn query_associated_profiles(
        &self,
        entities: &[PbmServerObjectRef],
    ) -> Result<Vec<PbmQueryProfileResult>> {
        let values = self
            .invoke(Operation::QueryAssociatedProfiles, |xml| {
                entities.write_xml(xml, "entities")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn query_default_requirement_profile(
        &self,
        hub: &PbmPlacementHub,
    ) -> Result<Option<PbmProfileId>> {
        let values = self
            .invoke(Operation::QueryDefaultRequirementProfile, |xml| hub.write_xml(xml, "hub"))
            .await?;
        values.first().map(PbmProfileId::from_xml).transpose()
    }

    pub async fn query_default_requirement_profiles(
        &self,
        datastores: &[PbmPlacementHub],
    ) -> Result<Vec<PbmDefaultProfileInfo>> {
        let values = self
            .invoke(Operation::QueryDefaultRequirementProfiles, |xml| {
                datastores.write_xml(xml, "datastores")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn query_profile(
        &self,
        resource_type: &PbmProfileResourceType,
        profile_category: Option<PbmProfileCategory>,
    ) -> Result<Vec<PbmProfileId>> {
        let values = self
            .invoke(Operation::QueryProfile, |xml| {
                resource_type.write_xml(xml, "resourceType")?;
                profile_category.write_xml(xml, "profileCategory")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn query_space_stats_for_storage_container(
        &self,
        datastore: &PbmServerObjectRef,
        capability_profile_ids: &[PbmProfileId],
    ) -> Result<Vec<PbmDatastoreSpaceStatistics>> {
        let values = self
            .invoke(Operation::QuerySpaceStatsForStorageContainer, |xml| {
                datastore.write_xml(xml, "datastore")?;
                capability_profile_ids.write_xml(xml, "capabilityProfileId")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn reset_default_requirement_profile(&self, profile: Option<&PbmProfileId>) -> Result<()> {
        self.invoke(Operation::ResetDefaultRequirementProfile, |xml| {
            profile.write_xml(xml, "profile")
        })
        .await?;
        Ok(())
    }

    pub async fn reset_vsan_default_profile(&self) -> Result<()> {
        self.invoke(Operation::ResetVSanDefaultProfile, |_| Ok(())).await?;
        Ok(())
    }

    pub async fn retrieve_content(&self, profile_ids: &[PbmProfileId]) -> Result<Vec<PbmProfile>> {
        let values = self
            .invoke(Operation::RetrieveContent, |xml| profile_ids.write_xml(xml, "profileIds"))
            .await?;
        decode_all(&values)
    }

    pub async fn update(
        &self,
        profile_id: &PbmProfileId,
        update_spec: &PbmCapabilityProfileUpdateSpec,
    ) -> Result<()> {
        self.invoke(Operation::Update, |xml| {
            profile_id.write_xml(xml, "profileId")?;
            update_spec.write_xml(xml, "updateSpec")
        })
        .await?;
        Ok(())
    }

    // ---- ComplianceManager ----

    pub async fn check_compliance(
        &self,
        entities: &[PbmServerObjectRef],
        profile: Option<&PbmProfileId>,
    ) -> Result<Vec<PbmComplianceResult>> {
        let values = self
            .invoke(Operation::CheckCompliance, |xml| {
                entities.write_xml(xml, "entities")?;
                profile.write_xml(xml, "profile")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn check_rollup_compliance(
        &self,
        entities: &[PbmServerObjectRef],
    ) -> Result<Vec<PbmRollupComplianceResult>> {
        let values = self
            .invoke(Operation::CheckRollupCompliance, |xml| entities.write_xml(xml, "entity"))
            .await?;
        decode_all(&values)
    }

    pub async fn fetch_compliance_result(
        &self,
        entities: &[PbmServerObjectRef],
        profile: Option<&PbmProfileId>,
    ) -> Result<Vec<PbmComplianceResult>> {
        let values = self
            .invoke(Operation::FetchComplianceResult, |xml| {
                entities.write_xml(xml, "entities")?;
                profile.write_xml(xml, "profile")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn fetch_rollup_compliance_result(
        &self,
        entities: &[PbmServerObjectRef],
    ) -> Result<Vec<PbmRollupComplianceResult>> {
        let values = self
            .invoke(Operation::FetchRollupComplianceResult, |xml| {
                entities.write_xml(xml, "entity")
            })
            .await?;
        decode_all(&values)
    }

    /// `status` is one of the `compliance_status` values.
    pub async fn query_by_rollup_compliance_status(&self, status: &str) -> Result<Vec<PbmServerObjectRef>> {
        let values = self
            .invoke(Operation::QueryByRollupComplianceStatus, |xml| {
                status.write_xml(xml, "status")
            })
            .await?;
        decode_all(&values)
    }

    // ---- PlacementSolver ----

    pub async fn check_compatibility(
        &self,
        hubs_to_search: &[PbmPlacementHub],
        profile: &PbmProfileId,
    ) -> Result<Vec<PbmPlacementCompatibilityResult>> {
        let values = self
            .invoke(Operation::CheckCompatibility, |xml| {
                hubs_to_search.write_xml(xml, "hubsToSearch")?;
                profile.write_xml(xml, "profile")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn check_compatibility_with_spec(
        &self,
        hubs_to_search: &[PbmPlacementHub],
        profile_spec: &PbmCapabilityProfileCreateSpec,
    ) -> Result<Vec<PbmPlacementCompatibilityResult>> {
        let values = self
            .invoke(Operation::CheckCompatibilityWithSpec, |xml| {
                hubs_to_search.write_xml(xml, "hubsToSearch")?;
                profile_spec.write_xml(xml, "profileSpec")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn check_requirements(
        &self,
        hubs_to_search: &[PbmPlacementHub],
        placement_subject_ref: Option<&PbmServerObjectRef>,
        placement_subject_requirement: &[PbmPlacementRequirement],
    ) -> Result<Vec<PbmPlacementCompatibilityResult>> {
        let values = self
            .invoke(Operation::CheckRequirements, |xml| {
                hubs_to_search.write_xml(xml, "hubsToSearch")?;
                placement_subject_ref.write_xml(xml, "placementSubjectRef")?;
                placement_subject_requirement.write_xml(xml, "placementSubjectRequirement")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn query_matching_hub(
        &self,
        hubs_to_search: &[PbmPlacementHub],
        profile: &PbmProfileId,
    ) -> Result<Vec<PbmPlacementHub>> {
        let values = self
            .invoke(Operation::QueryMatchingHub, |xml| {
                hubs_to_search.write_xml(xml, "hubsToSearch")?;
                profile.write_xml(xml, "profile")
            })
            .await?;
        decode_all(&values)
    }

    pub async fn query_matching_hub_with_spec(
        &self,
        hubs_to_search: &[PbmPlacementHub],
        create_spec: &PbmCapabilityProfileCreateSpec,
    ) -> Result<Vec<PbmPlacementHub>> {
        let values = self
            .invoke(Operation::QueryMatchingHubWithSpec, |xml| {
                hubs_to_search.write_xml(xml, "hubsToSearch")?;
                create_spec.write_xml(xml, "createSpec")
            })
            .await?;
        decode_all(&values)
    }

    // ---- ReplicationManager ----

    pub async fn query_replication_groups(
        &self,
        entities: &[PbmServerObjectRef],
    ) -> Result<Vec<PbmQueryReplicationGroupResult>> {
        let values = self
            .invoke(Operation::QueryReplicationGroups, |xml| {
                entities.write_xml(xml, "entities")
            })
            .await?;
        decode_all(&values)
    }
}

fn decode_all<R: FromXml>(values: &[XmlElement]) -> Result<Vec<R>> {
    values.iter().map(R::from_xml).collect()
}

fn decode_one<R: FromXml>(operation: Operation, values: &[XmlElement]) -> Result<R> {
    let value = values.first().ok_or_else(|| {
        PbmError::decode(format!("{} returned no returnval", operation.response_element()))
    })?;
    R::from_xml(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::{soap_fault, ScriptedTransport};
    use crate::fault::FaultKind;

    const COMPLIANT_VM: &str = r#"<returnval>
  <checkTime>2024-05-01T10:00:00Z</checkTime>
  <entity><objectType>virtualMachine</objectType><key>vm-42</key></entity>
  <profile><uniqueId>gold-1</uniqueId></profile>
  <complianceTaskStatus>success</complianceTaskStatus>
  <complianceStatus>compliant</complianceStatus>
  <mismatch>false</mismatch>
</returnval>"#;

    #[tokio::test]
    async fn test_service_content_is_fetched_once() {
        let transport = ScriptedTransport::with_service_content();
        transport.reply("PbmFetchResourceType", "<returnval><resourceType>STORAGE</resourceType></returnval>");
        transport.reply("PbmFetchResourceType", "");
        let client = PbmClient::new(transport.clone());

        let types = client.fetch_resource_type().await.unwrap();
        assert_eq!(types, vec![PbmProfileResourceType::storage()]);
        assert!(client.fetch_resource_type().await.unwrap().is_empty());

        let requests = transport.requests();
        let actions: Vec<&str> = requests.iter().map(|(a, _)| a.as_str()).collect();
        assert_eq!(
            actions,
            vec!["PbmRetrieveServiceContent", "PbmFetchResourceType", "PbmFetchResourceType"]
        );
        assert!(requests[0]
            .1
            .contains(r#"<_this type="PbmServiceInstance">ServiceInstance</_this>"#));

        let content = client.service_content().await.unwrap();
        assert_eq!(content.about_info.version, "8.0");
        assert_eq!(content.profile_manager.value, "ProfileManager");
    }

    #[tokio::test]
    async fn test_query_profile_addresses_profile_manager() {
        let transport = ScriptedTransport::with_service_content();
        transport.reply(
            "PbmQueryProfile",
            "<returnval><uniqueId>gold-1</uniqueId></returnval><returnval><uniqueId>silver-2</uniqueId></returnval>",
        );
        let client = PbmClient::new(transport.clone());

        let ids = client
            .query_profile(&PbmProfileResourceType::storage(), Some(PbmProfileCategory::Requirement))
            .await
            .unwrap();
        assert_eq!(ids, vec![PbmProfileId::new("gold-1"), PbmProfileId::new("silver-2")]);

        let request = transport.last_request();
        assert!(request.contains(r#"<PbmQueryProfile xmlns="urn:pbm">"#));
        assert!(request.contains(r#"<_this type="PbmProfileProfileManager">ProfileManager</_this>"#));
        assert!(request.contains("<resourceType><resourceType>STORAGE</resourceType></resourceType>"));
        assert!(request.contains("<profileCategory>REQUIREMENT</profileCategory>"));
    }

    #[tokio::test]
    async fn test_check_compliance_decodes_results() {
        let transport = ScriptedTransport::with_service_content();
        transport.reply("PbmCheckCompliance", COMPLIANT_VM);
        let client = PbmClient::new(transport.clone());

        let results = client
            .check_compliance(&[PbmServerObjectRef::virtual_machine("vm-42")], None)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_compliant());
        assert!(!results[0].is_in_progress());
        assert_eq!(results[0].entity.key, "vm-42");

        let request = transport.last_request();
        assert!(request.contains(r#"<_this type="PbmComplianceManager">complianceManager</_this>"#));
        assert!(request.contains("<entities><objectType>virtualMachine</objectType><key>vm-42</key></entities>"));
        assert!(!request.contains("<profile>"));
    }

    #[tokio::test]
    async fn test_create_returns_new_profile_id() {
        let transport = ScriptedTransport::with_service_content();
        transport.reply("PbmCreate", "<returnval><uniqueId>new-profile</uniqueId></returnval>");
        let client = PbmClient::new(transport.clone());

        let spec = PbmCapabilityProfileCreateSpec {
            name: "Gold".to_string(),
            description: Some("Replicated storage".to_string()),
            category: Some(PbmProfileCategory::Requirement),
            resource_type: PbmProfileResourceType::storage(),
            constraints: PbmCapabilitySubProfileConstraints {
                sub_profiles: vec![PbmCapabilitySubProfile {
                    name: "rules".to_string(),
                    capability: vec![PbmCapabilityInstance::single(
                        "VSAN",
                        "hostFailuresToTolerate",
                        PropertyValue::Int(1),
                    )],
                    force_provision: None,
                }],
            },
        };
        let id = client.create(&spec).await.unwrap();
        assert_eq!(id.unique_id, "new-profile");
        assert!(transport.last_request().contains("<createSpec>"));
    }

    #[tokio::test]
    async fn test_remote_fault_is_surfaced() {
        let transport = ScriptedTransport::with_service_content();
        transport.push(soap_fault(
            "ServerFaultCode",
            "Profile not found",
            r#"<PbmFaultNotFoundFault xmlns="urn:pbm" xsi:type="PbmFaultNotFound"/>"#,
        ));
        let client = PbmClient::new(transport);

        let err = client.delete(&[PbmProfileId::new("missing")]).await.unwrap_err();
        let fault = err.remote_fault().expect("remote fault");
        assert_eq!(fault.kind, FaultKind::PbmFaultNotFound);
        assert_eq!(fault.message(), "Profile not found");
    }

    #[tokio::test]
    async fn test_missing_replication_manager_is_an_error() {
        let transport = ScriptedTransport::new();
        let content = PbmServiceInstanceContent {
            about_info: PbmAboutInfo {
                name: "PBM".to_string(),
                version: "6.0".to_string(),
                instance_uuid: "legacy".to_string(),
            },
            session_manager: ManagedObjectReference::new("PbmSessionManager", "SessionManager"),
            capability_metadata_manager: ManagedObjectReference::new(
                "PbmCapabilityMetadataManager",
                "CapabilityMetadataManager",
            ),
            profile_manager: ManagedObjectReference::new("PbmProfileProfileManager", "ProfileManager"),
            compliance_manager: ManagedObjectReference::new("PbmComplianceManager", "complianceManager"),
            placement_solver: ManagedObjectReference::new("PbmPlacementSolver", "placementSolver"),
            replication_manager: None,
        };
        let client = PbmClient::with_service_content(transport.clone(), content);

        let err = client
            .query_replication_groups(&[PbmServerObjectRef::virtual_machine("vm-1")])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("ReplicationManager"));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_void_operations_accept_empty_response() {
        let transport = ScriptedTransport::with_service_content();
        transport.reply("PbmUpdate", "");
        transport.reply("PbmResetVSanDefaultProfile", "");
        let client = PbmClient::new(transport.clone());

        let update = PbmCapabilityProfileUpdateSpec {
            description: Some("renamed".to_string()),
            ..Default::default()
        };
        client.update(&PbmProfileId::new("gold-1"), &update).await.unwrap();
        client.reset_vsan_default_profile().await.unwrap();
        assert!(transport.requests()[1].1.contains("<updateSpec><description>renamed</description></updateSpec>"));
    }
}

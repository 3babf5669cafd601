//! XML bindings for the PBM data model. Element names are the schema's and
//! must match the wire byte for byte.

use crate::domain::model::*;
use crate::fault::{decode_inline_fault, RemoteFault};
use crate::soap::codec::{flag, optional, repeated, required, FromXml, ToXml};
use crate::soap::xml::{XmlBuilder, XmlElement};
use crate::utils::error::{PbmError, Result};

const SUB_PROFILE_CONSTRAINTS: &str = "PbmCapabilitySubProfileConstraints";
const PROFILE_REQUIREMENT: &str = "PbmPlacementCapabilityProfileRequirement";
const CONSTRAINTS_REQUIREMENT: &str = "PbmPlacementCapabilityConstraintsRequirement";

impl ToXml for ManagedObjectReference {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[("type", self.type_.as_str())], |xml| xml.text(&self.value))
    }
}

impl FromXml for ManagedObjectReference {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        let type_ = element.attribute("type").ok_or_else(|| {
            PbmError::decode(format!(
                "<{}> is a managed object reference without a type attribute",
                element.name
            ))
        })?;
        Ok(ManagedObjectReference::new(type_, element.text.trim()))
    }
}

impl ToXml for PbmServerObjectRef {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.object_type.write_xml(xml, "objectType")?;
            self.key.write_xml(xml, "key")?;
            self.server_uuid.write_xml(xml, "serverUuid")
        })
    }
}

impl FromXml for PbmServerObjectRef {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmServerObjectRef {
            object_type: required(element, "objectType")?,
            key: required(element, "key")?,
            server_uuid: optional(element, "serverUuid")?,
        })
    }
}

impl ToXml for PbmProfileId {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| self.unique_id.write_xml(xml, "uniqueId"))
    }
}

impl FromXml for PbmProfileId {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmProfileId {
            unique_id: required(element, "uniqueId")?,
        })
    }
}

impl ToXml for PbmProfileResourceType {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.resource_type.write_xml(xml, "resourceType")
        })
    }
}

impl FromXml for PbmProfileResourceType {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmProfileResourceType {
            resource_type: required(element, "resourceType")?,
        })
    }
}

impl ToXml for PbmProfileCategory {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.text_element(name, self.as_str())
    }
}

impl FromXml for PbmProfileCategory {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        PbmProfileCategory::parse(element.text.trim()).ok_or_else(|| {
            PbmError::decode(format!("unknown profile category '{}'", element.text))
        })
    }
}

impl ToXml for PbmCapabilityMetadataUniqueId {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.namespace.write_xml(xml, "namespace")?;
            self.id.write_xml(xml, "id")
        })
    }
}

impl FromXml for PbmCapabilityMetadataUniqueId {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityMetadataUniqueId {
            namespace: required(element, "namespace")?,
            id: required(element, "id")?,
        })
    }
}

impl ToXml for PropertyValue {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        match self {
            PropertyValue::Int(v) => xml.typed_text_element(name, "xsd:int", &v.to_string()),
            PropertyValue::Long(v) => xml.typed_text_element(name, "xsd:long", &v.to_string()),
            PropertyValue::Bool(v) => {
                xml.typed_text_element(name, "xsd:boolean", if *v { "true" } else { "false" })
            }
            PropertyValue::String(v) => xml.typed_text_element(name, "xsd:string", v),
            PropertyValue::Other { type_name, element } => {
                xml.element(name, &[("xsi:type", type_name.as_str())], |xml| {
                    xml.text(&element.text)?;
                    for child in &element.children {
                        xml.tree(&child.name, child)?;
                    }
                    Ok(())
                })
            }
        }
    }
}

impl FromXml for PropertyValue {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        let text = element.text.trim();
        match element.xsi_type() {
            Some("int") | Some("short") | Some("byte") => {
                Ok(PropertyValue::Int(i32::from_xml(element)?))
            }
            Some("long") => Ok(PropertyValue::Long(i64::from_xml(element)?)),
            Some("boolean") => Ok(PropertyValue::Bool(bool::from_xml(element)?)),
            Some("string") => Ok(PropertyValue::String(element.text.clone())),
            None if element.is_leaf() => Ok(PropertyValue::String(text.to_string())),
            _ => Ok(PropertyValue::Other {
                type_name: element.qualified_xsi_type().unwrap_or_default().to_string(),
                element: element.clone(),
            }),
        }
    }
}

impl ToXml for PbmCapabilityPropertyInstance {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.id.write_xml(xml, "id")?;
            self.operator.write_xml(xml, "operator")?;
            self.value.write_xml(xml, "value")
        })
    }
}

impl FromXml for PbmCapabilityPropertyInstance {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityPropertyInstance {
            id: required(element, "id")?,
            operator: optional(element, "operator")?,
            value: required(element, "value")?,
        })
    }
}

impl ToXml for PbmCapabilityConstraintInstance {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.property_instance.write_xml(xml, "propertyInstance")
        })
    }
}

impl FromXml for PbmCapabilityConstraintInstance {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityConstraintInstance {
            property_instance: repeated(element, "propertyInstance")?,
        })
    }
}

impl ToXml for PbmCapabilityInstance {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.id.write_xml(xml, "id")?;
            self.constraint.write_xml(xml, "constraint")
        })
    }
}

impl FromXml for PbmCapabilityInstance {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityInstance {
            id: required(element, "id")?,
            constraint: repeated(element, "constraint")?,
        })
    }
}

impl ToXml for PbmCapabilitySubProfile {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.name.write_xml(xml, "name")?;
            self.capability.write_xml(xml, "capability")?;
            self.force_provision.write_xml(xml, "forceProvision")
        })
    }
}

impl FromXml for PbmCapabilitySubProfile {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilitySubProfile {
            name: required(element, "name")?,
            capability: repeated(element, "capability")?,
            force_provision: optional(element, "forceProvision")?,
        })
    }
}

impl ToXml for PbmCapabilitySubProfileConstraints {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[("xsi:type", SUB_PROFILE_CONSTRAINTS)], |xml| {
            self.sub_profiles.write_xml(xml, "subProfiles")
        })
    }
}

impl FromXml for PbmCapabilitySubProfileConstraints {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilitySubProfileConstraints {
            sub_profiles: repeated(element, "subProfiles")?,
        })
    }
}

/// Other constraint types (vendor-specific rule sets) are left undecoded.
fn sub_profile_constraints(parent: &XmlElement) -> Result<Option<PbmCapabilitySubProfileConstraints>> {
    match parent.child("constraints") {
        Some(el) if matches!(el.xsi_type(), None | Some(SUB_PROFILE_CONSTRAINTS)) => {
            PbmCapabilitySubProfileConstraints::from_xml(el).map(Some)
        }
        _ => Ok(None),
    }
}

impl FromXml for PbmProfile {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmProfile {
            profile_id: required(element, "profileId")?,
            name: required(element, "name")?,
            description: optional(element, "description")?,
            creation_time: optional(element, "creationTime")?,
            created_by: optional(element, "createdBy")?,
            last_updated_time: optional(element, "lastUpdatedTime")?,
            last_updated_by: optional(element, "lastUpdatedBy")?,
            profile_category: optional(element, "profileCategory")?,
            resource_type: optional(element, "resourceType")?,
            constraints: sub_profile_constraints(element)?,
            generation_id: optional(element, "generationId")?,
            is_default: optional(element, "isDefault")?,
            system_created_profile_type: optional(element, "systemCreatedProfileType")?,
        })
    }
}

impl ToXml for PbmCapabilityProfileCreateSpec {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.name.write_xml(xml, "name")?;
            self.description.write_xml(xml, "description")?;
            self.category.write_xml(xml, "category")?;
            self.resource_type.write_xml(xml, "resourceType")?;
            self.constraints.write_xml(xml, "constraints")
        })
    }
}

impl FromXml for PbmCapabilityProfileCreateSpec {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityProfileCreateSpec {
            name: required(element, "name")?,
            description: optional(element, "description")?,
            category: optional(element, "category")?,
            resource_type: required(element, "resourceType")?,
            constraints: sub_profile_constraints(element)?.ok_or_else(|| {
                PbmError::decode("create spec is missing sub-profile constraints")
            })?,
        })
    }
}

impl ToXml for PbmCapabilityProfileUpdateSpec {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.name.write_xml(xml, "name")?;
            self.description.write_xml(xml, "description")?;
            self.constraints.write_xml(xml, "constraints")
        })
    }
}

impl FromXml for RemoteFault {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(decode_inline_fault(element))
    }
}

impl FromXml for PbmProfileOperationOutcome {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmProfileOperationOutcome {
            profile_id: required(element, "profileId")?,
            fault: optional(element, "fault")?,
        })
    }
}

impl FromXml for PbmCompliancePolicyStatus {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCompliancePolicyStatus {
            expected_value: optional(element, "expectedValue")?,
            current_value: optional(element, "currentValue")?,
        })
    }
}

impl FromXml for PbmComplianceOperationalStatus {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmComplianceOperationalStatus {
            healthy: optional(element, "healthy")?,
            operation_eta: optional(element, "operationETA")?,
            operation_progress: optional(element, "operationProgress")?,
            transitional: optional(element, "transitional")?,
        })
    }
}

impl FromXml for PbmComplianceResult {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmComplianceResult {
            check_time: required(element, "checkTime")?,
            entity: required(element, "entity")?,
            profile: optional(element, "profile")?,
            compliance_task_status: optional(element, "complianceTaskStatus")?,
            compliance_status: required(element, "complianceStatus")?,
            mismatch: flag(element, "mismatch")?,
            violated_policies: repeated(element, "violatedPolicies")?,
            error_cause: repeated(element, "errorCause")?,
            operational_status: optional(element, "operationalStatus")?,
        })
    }
}

impl FromXml for PbmRollupComplianceResult {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmRollupComplianceResult {
            oldest_check_time: required(element, "oldestCheckTime")?,
            entity: required(element, "entity")?,
            overall_compliance_status: required(element, "overallComplianceStatus")?,
            overall_compliance_task_status: optional(element, "overallComplianceTaskStatus")?,
            result: repeated(element, "result")?,
            error_cause: repeated(element, "errorCause")?,
            profile_mismatch: flag(element, "profileMismatch")?,
        })
    }
}

impl ToXml for PbmPlacementHub {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        xml.element(name, &[], |xml| {
            self.hub_type.write_xml(xml, "hubType")?;
            self.hub_id.write_xml(xml, "hubId")
        })
    }
}

impl FromXml for PbmPlacementHub {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmPlacementHub {
            hub_type: required(element, "hubType")?,
            hub_id: required(element, "hubId")?,
        })
    }
}

impl ToXml for PbmPlacementRequirement {
    fn write_xml(&self, xml: &mut XmlBuilder, name: &str) -> Result<()> {
        match self {
            PbmPlacementRequirement::CapabilityProfile(profile_id) => {
                xml.element(name, &[("xsi:type", PROFILE_REQUIREMENT)], |xml| {
                    profile_id.write_xml(xml, "profileId")
                })
            }
            PbmPlacementRequirement::CapabilityConstraints(constraints) => {
                xml.element(name, &[("xsi:type", CONSTRAINTS_REQUIREMENT)], |xml| {
                    constraints.write_xml(xml, "constraints")
                })
            }
        }
    }
}

impl FromXml for PbmPlacementRequirement {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        match element.xsi_type() {
            Some(PROFILE_REQUIREMENT) => Ok(PbmPlacementRequirement::CapabilityProfile(
                required(element, "profileId")?,
            )),
            Some(CONSTRAINTS_REQUIREMENT) => Ok(PbmPlacementRequirement::CapabilityConstraints(
                required(element, "constraints")?,
            )),
            other => Err(PbmError::decode(format!(
                "unsupported placement requirement type {:?}",
                other
            ))),
        }
    }
}

impl FromXml for PbmPlacementCompatibilityResult {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmPlacementCompatibilityResult {
            hub: required(element, "hub")?,
            how_many: optional(element, "howMany")?,
            warning: repeated(element, "warning")?,
            error: repeated(element, "error")?,
        })
    }
}

impl FromXml for PbmExtendedElementDescription {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmExtendedElementDescription {
            label: required(element, "label")?,
            summary: required(element, "summary")?,
            key: optional(element, "key")?,
        })
    }
}

impl FromXml for PbmCapabilityPropertyMetadata {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        let type_name = match element.child("type") {
            Some(type_info) => optional(type_info, "typeName")?,
            None => None,
        };
        Ok(PbmCapabilityPropertyMetadata {
            id: required(element, "id")?,
            summary: optional(element, "summary")?,
            mandatory: flag(element, "mandatory")?,
            type_name,
            default_value: optional(element, "defaultValue")?,
            requirements_type_hint: optional(element, "requirementsTypeHint")?,
        })
    }
}

impl FromXml for PbmCapabilityMetadata {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityMetadata {
            id: required(element, "id")?,
            summary: optional(element, "summary")?,
            mandatory: optional(element, "mandatory")?,
            hint: optional(element, "hint")?,
            key_id: optional(element, "keyId")?,
            allow_multiple_constraints: optional(element, "allowMultipleConstraints")?,
            property_metadata: repeated(element, "propertyMetadata")?,
        })
    }
}

impl FromXml for PbmCapabilityMetadataPerCategory {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityMetadataPerCategory {
            sub_category: required(element, "subCategory")?,
            capability_metadata: repeated(element, "capabilityMetadata")?,
        })
    }
}

impl FromXml for PbmCapabilityVendorInfo {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityVendorInfo {
            vendor_uuid: required(element, "vendorUuid")?,
            info: optional(element, "info")?,
        })
    }
}

impl FromXml for PbmCapabilityNamespaceInfo {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityNamespaceInfo {
            version: required(element, "version")?,
            namespace: required(element, "namespace")?,
            info: optional(element, "info")?,
        })
    }
}

impl FromXml for PbmCapabilityVendorNamespaceInfo {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityVendorNamespaceInfo {
            vendor_info: required(element, "vendorInfo")?,
            namespace_info: required(element, "namespaceInfo")?,
        })
    }
}

impl FromXml for PbmCapabilityVendorResourceTypeInfo {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilityVendorResourceTypeInfo {
            resource_type: required(element, "resourceType")?,
            vendor_namespace_info: repeated(element, "vendorNamespaceInfo")?,
        })
    }
}

impl FromXml for PbmLineOfServiceInfo {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmLineOfServiceInfo {
            line_of_service: required(element, "lineOfService")?,
            name: optional(element, "name")?,
        })
    }
}

impl FromXml for PbmCapabilitySchema {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmCapabilitySchema {
            vendor_info: required(element, "vendorInfo")?,
            namespace_info: required(element, "namespaceInfo")?,
            line_of_service: optional(element, "lineOfService")?,
            capability_metadata_per_category: repeated(element, "capabilityMetadataPerCategory")?,
        })
    }
}

impl FromXml for PbmQueryProfileResult {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmQueryProfileResult {
            object: required(element, "object")?,
            profile_id: repeated(element, "profileId")?,
            fault: optional(element, "fault")?,
        })
    }
}

impl FromXml for PbmReplicationGroupId {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        let nested_id = |name: &str| -> Result<String> {
            let wrapper = element.child(name).ok_or_else(|| {
                PbmError::decode(format!("<{}> is missing required <{}>", element.name, name))
            })?;
            required(wrapper, "id")
        };
        Ok(PbmReplicationGroupId {
            fault_domain_id: nested_id("faultDomainId")?,
            device_group_id: nested_id("deviceGroupId")?,
        })
    }
}

impl FromXml for PbmQueryReplicationGroupResult {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmQueryReplicationGroupResult {
            object: required(element, "object")?,
            replication_group_id: optional(element, "replicationGroupId")?,
            fault: optional(element, "fault")?,
        })
    }
}

impl FromXml for PbmDatastoreSpaceStatistics {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmDatastoreSpaceStatistics {
            profile_id: optional(element, "profileId")?,
            physical_total_in_mb: required(element, "physicalTotalInMB")?,
            physical_free_in_mb: required(element, "physicalFreeInMB")?,
            physical_used_in_mb: required(element, "physicalUsedInMB")?,
            logical_limit_in_mb: optional(element, "logicalLimitInMB")?,
            logical_free_in_mb: required(element, "logicalFreeInMB")?,
            logical_used_in_mb: required(element, "logicalUsedInMB")?,
        })
    }
}

impl FromXml for PbmDefaultProfileInfo {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmDefaultProfileInfo {
            datastores: repeated(element, "datastores")?,
            default_profile: optional(element, "defaultProfile")?,
        })
    }
}

impl FromXml for PbmAboutInfo {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmAboutInfo {
            name: required(element, "name")?,
            version: required(element, "version")?,
            instance_uuid: required(element, "instanceUuid")?,
        })
    }
}

impl FromXml for PbmServiceInstanceContent {
    fn from_xml(element: &XmlElement) -> Result<Self> {
        Ok(PbmServiceInstanceContent {
            about_info: required(element, "aboutInfo")?,
            session_manager: required(element, "sessionManager")?,
            capability_metadata_manager: required(element, "capabilityMetadataManager")?,
            profile_manager: required(element, "profileManager")?,
            compliance_manager: required(element, "complianceManager")?,
            placement_solver: required(element, "placementSolver")?,
            replication_manager: optional(element, "replicationManager")?,
        })
    }
}

use crate::fault::RemoteFault;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// XML namespace of every PBM request, response and fault element.
pub const PBM_NAMESPACE: &str = "urn:pbm";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedObjectReference {
    #[serde(rename = "type")]
    pub type_: String,
    pub value: String,
}

impl ManagedObjectReference {
    pub fn new(type_: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            type_: type_.into(),
            value: value.into(),
        }
    }

    pub fn service_instance() -> Self {
        Self::new("PbmServiceInstance", "ServiceInstance")
    }
}

/// Object kinds accepted in `PbmServerObjectRef.objectType`.
pub mod object_type {
    pub const VIRTUAL_MACHINE: &str = "virtualMachine";
    pub const VIRTUAL_MACHINE_AND_DISKS: &str = "virtualMachineAndDisks";
    pub const VIRTUAL_DISK_ID: &str = "virtualDiskId";
    pub const VIRTUAL_DISK_UUID: &str = "virtualDiskUUID";
    pub const DATASTORE: &str = "datastore";
    pub const VSAN_OBJECT_ID: &str = "vsanObjectId";
    pub const FILE_SHARE_ID: &str = "fileShareId";
    pub const UNKNOWN: &str = "unknown";
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmServerObjectRef {
    pub object_type: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_uuid: Option<String>,
}

impl PbmServerObjectRef {
    pub fn new(object_type: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            key: key.into(),
            server_uuid: None,
        }
    }

    pub fn virtual_machine(moid: impl Into<String>) -> Self {
        Self::new(object_type::VIRTUAL_MACHINE, moid)
    }

    pub fn datastore(moid: impl Into<String>) -> Self {
        Self::new(object_type::DATASTORE, moid)
    }

    /// Disk keys are `<vm moid>:<device key>`.
    pub fn virtual_disk(vm_moid: &str, device_key: i32) -> Self {
        Self::new(object_type::VIRTUAL_DISK_ID, format!("{}:{}", vm_moid, device_key))
    }

    pub fn with_server_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.server_uuid = Some(uuid.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmProfileId {
    pub unique_id: String,
}

impl PbmProfileId {
    pub fn new(unique_id: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmProfileResourceType {
    pub resource_type: String,
}

impl PbmProfileResourceType {
    pub fn storage() -> Self {
        Self {
            resource_type: "STORAGE".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PbmProfileCategory {
    Requirement,
    Resource,
    DataServicePolicy,
}

impl PbmProfileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PbmProfileCategory::Requirement => "REQUIREMENT",
            PbmProfileCategory::Resource => "RESOURCE",
            PbmProfileCategory::DataServicePolicy => "DATA_SERVICE_POLICY",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "REQUIREMENT" => Some(PbmProfileCategory::Requirement),
            "RESOURCE" => Some(PbmProfileCategory::Resource),
            "DATA_SERVICE_POLICY" => Some(PbmProfileCategory::DataServicePolicy),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityMetadataUniqueId {
    pub namespace: String,
    pub id: String,
}

impl PbmCapabilityMetadataUniqueId {
    pub fn new(namespace: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            id: id.into(),
        }
    }
}

/// An `xsd:anyType` capability value. Values with no scalar mapping keep
/// their schema type and raw element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum PropertyValue {
    Int(i32),
    Long(i64),
    Bool(bool),
    String(String),
    Other {
        type_name: String,
        element: crate::soap::xml::XmlElement,
    },
}

impl PropertyValue {
    /// Guesses a scalar type from command-line text.
    pub fn infer(raw: &str) -> Self {
        if let Ok(value) = raw.parse::<i32>() {
            PropertyValue::Int(value)
        } else if let Ok(value) = raw.parse::<i64>() {
            PropertyValue::Long(value)
        } else if raw == "true" || raw == "false" {
            PropertyValue::Bool(raw == "true")
        } else {
            PropertyValue::String(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityPropertyInstance {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    pub value: PropertyValue,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityConstraintInstance {
    pub property_instance: Vec<PbmCapabilityPropertyInstance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityInstance {
    pub id: PbmCapabilityMetadataUniqueId,
    pub constraint: Vec<PbmCapabilityConstraintInstance>,
}

impl PbmCapabilityInstance {
    /// A capability with one constraint holding one property whose id is the
    /// capability id, which is how single-valued vSAN and tag rules are shaped.
    pub fn single(namespace: &str, id: &str, value: PropertyValue) -> Self {
        Self {
            id: PbmCapabilityMetadataUniqueId::new(namespace, id),
            constraint: vec![PbmCapabilityConstraintInstance {
                property_instance: vec![PbmCapabilityPropertyInstance {
                    id: id.to_string(),
                    operator: None,
                    value,
                }],
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilitySubProfile {
    pub name: String,
    pub capability: Vec<PbmCapabilityInstance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub force_provision: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilitySubProfileConstraints {
    pub sub_profiles: Vec<PbmCapabilitySubProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmProfile {
    pub profile_id: PbmProfileId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<PbmProfileResourceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<PbmCapabilitySubProfileConstraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_created_profile_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityProfileCreateSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<PbmProfileCategory>,
    pub resource_type: PbmProfileResourceType,
    pub constraints: PbmCapabilitySubProfileConstraints,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityProfileUpdateSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<PbmCapabilitySubProfileConstraints>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmProfileOperationOutcome {
    pub profile_id: PbmProfileId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<RemoteFault>,
}

/// Values of `complianceStatus` and `overallComplianceStatus`.
pub mod compliance_status {
    pub const COMPLIANT: &str = "compliant";
    pub const NON_COMPLIANT: &str = "nonCompliant";
    pub const UNKNOWN: &str = "unknown";
    pub const NOT_APPLICABLE: &str = "notApplicable";
    pub const OUT_OF_DATE: &str = "outOfDate";
}

/// Values of `complianceTaskStatus`.
pub mod compliance_task_status {
    pub const IN_PROGRESS: &str = "inProgress";
    pub const SUCCESS: &str = "success";
    pub const FAILED: &str = "failed";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCompliancePolicyStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_value: Option<PbmCapabilityInstance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<PbmCapabilityInstance>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmComplianceOperationalStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthy: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_eta: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_progress: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transitional: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmComplianceResult {
    pub check_time: DateTime<Utc>,
    pub entity: PbmServerObjectRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<PbmProfileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_task_status: Option<String>,
    pub compliance_status: String,
    pub mismatch: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub violated_policies: Vec<PbmCompliancePolicyStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_cause: Vec<RemoteFault>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operational_status: Option<PbmComplianceOperationalStatus>,
}

impl PbmComplianceResult {
    pub fn is_in_progress(&self) -> bool {
        self.compliance_task_status.as_deref() == Some(compliance_task_status::IN_PROGRESS)
    }

    pub fn is_compliant(&self) -> bool {
        self.compliance_status == compliance_status::COMPLIANT
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmRollupComplianceResult {
    pub oldest_check_time: DateTime<Utc>,
    pub entity: PbmServerObjectRef,
    pub overall_compliance_status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_compliance_task_status: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub result: Vec<PbmComplianceResult>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error_cause: Vec<RemoteFault>,
    pub profile_mismatch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmPlacementHub {
    pub hub_type: String,
    pub hub_id: String,
}

impl PbmPlacementHub {
    pub fn datastore(moid: impl Into<String>) -> Self {
        Self {
            hub_type: "Datastore".to_string(),
            hub_id: moid.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PbmPlacementRequirement {
    CapabilityProfile(PbmProfileId),
    CapabilityConstraints(PbmCapabilitySubProfileConstraints),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmPlacementCompatibilityResult {
    pub hub: PbmPlacementHub,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how_many: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warning: Vec<RemoteFault>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub error: Vec<RemoteFault>,
}

impl PbmPlacementCompatibilityResult {
    pub fn is_compatible(&self) -> bool {
        self.error.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmExtendedElementDescription {
    pub label: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityPropertyMetadata {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<PbmExtendedElementDescription>,
    pub mandatory: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<PropertyValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements_type_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityMetadata {
    pub id: PbmCapabilityMetadataUniqueId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<PbmExtendedElementDescription>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandatory: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multiple_constraints: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_metadata: Vec<PbmCapabilityPropertyMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityMetadataPerCategory {
    pub sub_category: String,
    pub capability_metadata: Vec<PbmCapabilityMetadata>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityVendorInfo {
    pub vendor_uuid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<PbmExtendedElementDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityNamespaceInfo {
    pub version: String,
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<PbmExtendedElementDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityVendorNamespaceInfo {
    pub vendor_info: PbmCapabilityVendorInfo,
    pub namespace_info: PbmCapabilityNamespaceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilityVendorResourceTypeInfo {
    pub resource_type: String,
    pub vendor_namespace_info: Vec<PbmCapabilityVendorNamespaceInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmLineOfServiceInfo {
    pub line_of_service: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<PbmExtendedElementDescription>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmCapabilitySchema {
    pub vendor_info: PbmCapabilityVendorInfo,
    pub namespace_info: PbmCapabilityNamespaceInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_of_service: Option<PbmLineOfServiceInfo>,
    pub capability_metadata_per_category: Vec<PbmCapabilityMetadataPerCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmQueryProfileResult {
    pub object: PbmServerObjectRef,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub profile_id: Vec<PbmProfileId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<RemoteFault>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmReplicationGroupId {
    pub fault_domain_id: String,
    pub device_group_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmQueryReplicationGroupResult {
    pub object: PbmServerObjectRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_group_id: Option<PbmReplicationGroupId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fault: Option<RemoteFault>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmDatastoreSpaceStatistics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<String>,
    pub physical_total_in_mb: i64,
    pub physical_free_in_mb: i64,
    pub physical_used_in_mb: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_limit_in_mb: Option<i64>,
    pub logical_free_in_mb: i64,
    pub logical_used_in_mb: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmDefaultProfileInfo {
    pub datastores: Vec<PbmPlacementHub>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<PbmProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmAboutInfo {
    pub name: String,
    pub version: String,
    pub instance_uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PbmServiceInstanceContent {
    pub about_info: PbmAboutInfo,
    pub session_manager: ManagedObjectReference,
    pub capability_metadata_manager: ManagedObjectReference,
    pub profile_manager: ManagedObjectReference,
    pub compliance_manager: ManagedObjectReference,
    pub placement_solver: ManagedObjectReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replication_manager: Option<ManagedObjectReference>,
}

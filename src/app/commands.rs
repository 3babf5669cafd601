use crate::config::{Command, ConnectionSettings};
use crate::core::compliance::{ComplianceMonitor, ComplianceSummary};
use crate::core::operations::Operation;
use crate::core::PbmClient;
use crate::domain::model::*;
use crate::domain::ports::Transport;
use crate::utils::error::{PbmError, Result};
use crate::utils::validation::parse_key_value;
use serde_json::{json, Value};

/// Executes one CLI subcommand and returns its output document.
pub async fn run_command<T: Transport>(
    client: &PbmClient<T>,
    settings: &ConnectionSettings,
    command: &Command,
) -> Result<Value> {
    match command {
        Command::About => {
            let content = client.service_content().await?;
            Ok(serde_json::to_value(&content.about_info)?)
        }
        Command::Profiles { category } => {
            let category = category.as_deref().map(parse_category).transpose()?;
            let ids = client
                .query_profile(&PbmProfileResourceType::storage(), category)
                .await?;
            tracing::info!("Found {} profiles", ids.len());
            Ok(serde_json::to_value(ids)?)
        }
        Command::ProfileContent { ids } => {
            let ids: Vec<PbmProfileId> = ids.iter().map(PbmProfileId::new).collect();
            Ok(serde_json::to_value(client.retrieve_content(&ids).await?)?)
        }
        Command::CreateProfile {
            name,
            description,
            capabilities,
        } => {
            let spec = build_create_spec(name, description.as_deref(), capabilities)?;
            let id = client.create(&spec).await?;
            tracing::info!("Created profile {} ({})", name, id.unique_id);
            Ok(serde_json::to_value(id)?)
        }
        Command::DeleteProfile { ids } => {
            let ids: Vec<PbmProfileId> = ids.iter().map(PbmProfileId::new).collect();
            let outcomes = client.delete(&ids).await?;
            for outcome in outcomes.iter().filter(|o| o.fault.is_some()) {
                tracing::warn!("Profile {} was not deleted", outcome.profile_id.unique_id);
            }
            Ok(serde_json::to_value(outcomes)?)
        }
        Command::CheckCompliance { vms, profile, wait } => {
            let entities = vm_refs(vms);
            let profile = profile.as_ref().map(PbmProfileId::new);
            let results = if *wait {
                ComplianceMonitor::new(
                    client,
                    settings.compliance_poll_interval(),
                    settings.compliance_timeout(),
                )
                .check_and_wait(&entities, profile.as_ref())
                .await?
            } else {
                client.check_compliance(&entities, profile.as_ref()).await?
            };
            let summary = ComplianceSummary::from_results(&results);
            Ok(json!({ "summary": summary, "results": results }))
        }
        Command::RollupCompliance { vms } => {
            let results = client.check_rollup_compliance(&vm_refs(vms)).await?;
            Ok(serde_json::to_value(results)?)
        }
        Command::MatchingHubs {
            profile,
            datastores,
        } => {
            let hubs: Vec<PbmPlacementHub> = datastores.iter().map(PbmPlacementHub::datastore).collect();
            let matching = client
                .query_matching_hub(&hubs, &PbmProfileId::new(profile))
                .await?;
            Ok(serde_json::to_value(matching)?)
        }
        Command::CapabilityMetadata { vendor_uuid } => {
            let metadata = client
                .fetch_capability_metadata(
                    Some(&PbmProfileResourceType::storage()),
                    vendor_uuid.as_deref(),
                )
                .await?;
            Ok(serde_json::to_value(metadata)?)
        }
        Command::VendorInfo => {
            let info = client
                .fetch_vendor_info(Some(&PbmProfileResourceType::storage()))
                .await?;
            Ok(serde_json::to_value(info)?)
        }
        Command::ReplicationGroups { vms } => {
            let groups = client.query_replication_groups(&vm_refs(vms)).await?;
            Ok(serde_json::to_value(groups)?)
        }
        Command::AssociatedProfiles { vms } => {
            let results = client.query_associated_profiles(&vm_refs(vms)).await?;
            Ok(serde_json::to_value(results)?)
        }
        Command::Operations => Ok(operation_table()),
    }
}

fn vm_refs(vms: &[String]) -> Vec<PbmServerObjectRef> {
    vms.iter().map(PbmServerObjectRef::virtual_machine).collect()
}

fn parse_category(raw: &str) -> Result<PbmProfileCategory> {
    PbmProfileCategory::parse(&raw.to_ascii_uppercase()).ok_or_else(|| PbmError::InvalidConfigValueError {
        field: "category".to_string(),
        value: raw.to_string(),
        reason: "Expected REQUIREMENT, RESOURCE or DATA_SERVICE_POLICY".to_string(),
    })
}

/// One sub-profile holding a capability per `NAMESPACE.ID=VALUE` rule. The id
/// is the text after the last dot, so namespaces may contain dots.
pub fn build_create_spec(
    name: &str,
    description: Option<&str>,
    capabilities: &[String],
) -> Result<PbmCapabilityProfileCreateSpec> {
    let mut capability = Vec::with_capacity(capabilities.len());
    for raw in capabilities {
        let (key, value) = parse_key_value("capability", raw)?;
        let (namespace, id) = key.rsplit_once('.').ok_or_else(|| PbmError::InvalidConfigValueError {
            field: "capability".to_string(),
            value: raw.clone(),
            reason: "Expected NAMESPACE.ID=VALUE".to_string(),
        })?;
        capability.push(PbmCapabilityInstance::single(
            namespace,
            id,
            PropertyValue::infer(&value),
        ));
    }

    Ok(PbmCapabilityProfileCreateSpec {
        name: name.to_string(),
        description: description.map(str::to_string),
        category: Some(PbmProfileCategory::Requirement),
        resource_type: PbmProfileResourceType::storage(),
        constraints: PbmCapabilitySubProfileConstraints {
            sub_profiles: vec![PbmCapabilitySubProfile {
                name: format!("{} rules", name),
                capability,
                force_provision: None,
            }],
        },
    })
}

fn operation_table() -> Value {
    Value::Array(
        Operation::ALL
            .iter()
            .map(|op| {
                json!({
                    "request": op.request_element(),
                    "response": op.response_element(),
                    "manager": op.manager(),
                    "idempotent": op.is_idempotent(),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::ScriptedTransport;

    #[test]
    fn test_create_spec_from_rules() {
        let spec = build_create_spec(
            "Gold",
            Some("two failures"),
            &[
                "VSAN.hostFailuresToTolerate=2".to_string(),
                "VSAN.proportionalCapacity=50".to_string(),
                "com.vmware.storage.tag.Tier=gold".to_string(),
            ],
        )
        .unwrap();

        let capabilities = &spec.constraints.sub_profiles[0].capability;
        assert_eq!(capabilities.len(), 3);
        assert_eq!(capabilities[0].id.namespace, "VSAN");
        assert_eq!(capabilities[0].id.id, "hostFailuresToTolerate");
        assert_eq!(
            capabilities[0].constraint[0].property_instance[0].value,
            PropertyValue::Int(2)
        );
        assert_eq!(capabilities[2].id.namespace, "com.vmware.storage.tag");
        assert_eq!(capabilities[2].id.id, "Tier");
        assert_eq!(
            capabilities[2].constraint[0].property_instance[0].value,
            PropertyValue::String("gold".to_string())
        );

        assert!(build_create_spec("Bad", None, &["noNamespace=1".to_string()]).is_err());
    }

    #[test]
    fn test_category_parsing_is_case_insensitive() {
        assert_eq!(parse_category("requirement").unwrap(), PbmProfileCategory::Requirement);
        assert!(parse_category("gold").is_err());
    }

    #[tokio::test]
    async fn test_operations_command_needs_no_server() {
        let transport = ScriptedTransport::new();
        let client = PbmClient::new(transport.clone());
        let settings = ConnectionSettings::new("https://vc.example.com/pbm/sdk");

        let output = run_command(&client, &settings, &Command::Operations).await.unwrap();
        let rows = output.as_array().unwrap();
        assert_eq!(rows.len(), Operation::ALL.len());
        assert_eq!(rows[0]["request"], "PbmRetrieveServiceContent");
        assert_eq!(rows[0]["manager"], "ServiceInstance");
        assert_eq!(rows[0]["idempotent"], true);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_check_compliance_reports_summary() {
        let transport = ScriptedTransport::with_service_content();
        transport.reply(
            "PbmCheckCompliance",
            "<returnval><checkTime>2024-05-01T10:00:00Z</checkTime>\
             <entity><objectType>virtualMachine</objectType><key>vm-7</key></entity>\
             <complianceStatus>nonCompliant</complianceStatus><mismatch>true</mismatch></returnval>",
        );
        let client = PbmClient::new(transport);
        let settings = ConnectionSettings::new("https://vc.example.com/pbm/sdk");
        let command = Command::CheckCompliance {
            vms: vec!["vm-7".to_string()],
            profile: None,
            wait: false,
        };

        let output = run_command(&client, &settings, &command).await.unwrap();
        assert_eq!(output["summary"]["nonCompliant"], 1);
        assert_eq!(output["results"][0]["entity"]["key"], "vm-7");
        assert_eq!(output["results"][0]["mismatch"], true);
    }
}

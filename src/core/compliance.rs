use crate::core::client::PbmClient;
use crate::domain::model::{compliance_status, PbmComplianceResult, PbmProfileId, PbmServerObjectRef};
use crate::domain::ports::Transport;
use crate::utils::error::{PbmError, Result};
use serde::Serialize;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

/// Runs a compliance check and polls until the server has settled every
/// entity's result.
pub struct ComplianceMonitor<'a, T: Transport> {
    client: &'a PbmClient<T>,
    poll_interval: Duration,
    timeout: Duration,
}

impl<'a, T: Transport> ComplianceMonitor<'a, T> {
    pub fn new(client: &'a PbmClient<T>, poll_interval: Duration, timeout: Duration) -> Self {
        Self {
            client,
            poll_interval,
            timeout,
        }
    }

    pub async fn check_and_wait(
        &self,
        entities: &[PbmServerObjectRef],
        profile: Option<&PbmProfileId>,
    ) -> Result<Vec<PbmComplianceResult>> {
        let deadline = Instant::now() + self.timeout;
        let mut results = self.client.check_compliance(entities, profile).await?;

        loop {
            let pending: Vec<PbmServerObjectRef> = results
                .iter()
                .filter(|r| r.is_in_progress())
                .map(|r| r.entity.clone())
                .collect();
            if pending.is_empty() {
                info!(entities = results.len(), "Compliance check settled");
                return Ok(results);
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(PbmError::Timeout {
                    message: format!(
                        "{} entities still checking compliance after {:?}",
                        pending.len(),
                        self.timeout
                    ),
                });
            }

            debug!(pending = pending.len(), "Compliance check in progress, polling again");
            sleep(self.poll_interval).await;

            let refreshed = self.client.fetch_compliance_result(&pending, profile).await?;
            merge_results(&mut results, refreshed, profile.is_some());
        }
    }
}

/// Replaces results for entities that were refetched. Entities the server no
/// longer reports keep their previous result. Without a profile filter the
/// server may report a different profile (or none) on refetch, so results
/// are matched on the entity alone.
fn merge_results(
    results: &mut Vec<PbmComplianceResult>,
    refreshed: Vec<PbmComplianceResult>,
    profile_filtered: bool,
) {
    for update in refreshed {
        let same_slot = |r: &&mut PbmComplianceResult| {
            r.entity == update.entity
                && (!profile_filtered || update.profile.is_none() || r.profile == update.profile)
        };
        match results.iter_mut().find(same_slot) {
            Some(slot) => *slot = update,
            None => results.push(update),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceSummary {
    pub total: usize,
    pub compliant: usize,
    pub non_compliant: usize,
    pub unknown: usize,
    pub not_applicable: usize,
    pub out_of_date: usize,
    pub in_progress: usize,
}

impl ComplianceSummary {
    pub fn from_results(results: &[PbmComplianceResult]) -> Self {
        let mut summary = ComplianceSummary {
            total: results.len(),
            ..Default::default()
        };
        for result in results {
            if result.is_in_progress() {
                summary.in_progress += 1;
            }
            match result.compliance_status.as_str() {
                compliance_status::COMPLIANT => summary.compliant += 1,
                compliance_status::NON_COMPLIANT => summary.non_compliant += 1,
                compliance_status::NOT_APPLICABLE => summary.not_applicable += 1,
                compliance_status::OUT_OF_DATE => summary.out_of_date += 1,
                _ => summary.unknown += 1,
            }
        }
        summary
    }

    pub fn all_compliant(&self) -> bool {
        self.total > 0 && self.compliant == self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::ScriptedTransport;

    fn result_xml(vm: &str, task: &str, status: &str) -> String {
        format!(
            "<returnval><checkTime>2024-05-01T10:00:00Z</checkTime>\
             <entity><objectType>virtualMachine</objectType><key>{vm}</key></entity>\
             <complianceTaskStatus>{task}</complianceTaskStatus>\
             <complianceStatus>{status}</complianceStatus><mismatch>false</mismatch></returnval>"
        )
    }

    #[tokio::test]
    async fn test_polls_only_pending_entities() {
        let transport = ScriptedTransport::with_service_content();
        let initial = format!(
            "{}{}",
            result_xml("vm-1", "success", "compliant"),
            result_xml("vm-2", "inProgress", "unknown")
        );
        transport.reply("PbmCheckCompliance", &initial);
        transport.reply("PbmFetchComplianceResult", &result_xml("vm-2", "inProgress", "unknown"));
        transport.reply("PbmFetchComplianceResult", &result_xml("vm-2", "success", "nonCompliant"));

        let client = PbmClient::new(transport.clone());
        let monitor = ComplianceMonitor::new(&client, Duration::from_millis(5), Duration::from_secs(5));
        let entities = [
            PbmServerObjectRef::virtual_machine("vm-1"),
            PbmServerObjectRef::virtual_machine("vm-2"),
        ];

        let results = monitor.check_and_wait(&entities, None).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].entity.key, "vm-2");
        assert_eq!(results[1].compliance_status, "nonCompliant");

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[2].0, "PbmFetchComplianceResult");
        assert!(!requests[2].1.contains("vm-1"));
        assert!(requests[2].1.contains("vm-2"));

        let summary = ComplianceSummary::from_results(&results);
        assert_eq!(summary.compliant, 1);
        assert_eq!(summary.non_compliant, 1);
        assert!(!summary.all_compliant());
    }

    #[tokio::test]
    async fn test_times_out_when_check_never_settles() {
        let transport = ScriptedTransport::with_service_content();
        transport.reply("PbmCheckCompliance", &result_xml("vm-1", "inProgress", "unknown"));
        for _ in 0..20 {
            transport.reply("PbmFetchComplianceResult", &result_xml("vm-1", "inProgress", "unknown"));
        }

        let client = PbmClient::new(transport);
        let monitor = ComplianceMonitor::new(&client, Duration::from_millis(10), Duration::from_millis(25));
        let err = monitor
            .check_and_wait(&[PbmServerObjectRef::virtual_machine("vm-1")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, PbmError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_refetch_without_profile_replaces_entity_result() {
        let transport = ScriptedTransport::with_service_content();
        transport.reply(
            "PbmCheckCompliance",
            "<returnval><checkTime>2024-05-01T10:00:00Z</checkTime>\
             <entity><objectType>virtualMachine</objectType><key>vm-3</key></entity>\
             <profile><uniqueId>gold-1</uniqueId></profile>\
             <complianceTaskStatus>inProgress</complianceTaskStatus>\
             <complianceStatus>unknown</complianceStatus><mismatch>false</mismatch></returnval>",
        );
        transport.reply("PbmFetchComplianceResult", &result_xml("vm-3", "success", "compliant"));

        let client = PbmClient::new(transport);
        let monitor = ComplianceMonitor::new(&client, Duration::from_millis(5), Duration::from_secs(5));
        let results = monitor
            .check_and_wait(&[PbmServerObjectRef::virtual_machine("vm-3")], None)
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].compliance_status, "compliant");
        assert!(!results[0].is_in_progress());
    }

    #[test]
    fn test_summary_counts_unrecognized_status_as_unknown() {
        let results: Vec<PbmComplianceResult> = ["compliant", "outOfDate", "somethingNew"]
            .iter()
            .map(|status| PbmComplianceResult {
                check_time: chrono::Utc::now(),
                entity: PbmServerObjectRef::virtual_machine("vm-9"),
                profile: None,
                compliance_task_status: None,
                compliance_status: status.to_string(),
                mismatch: false,
                violated_policies: vec![],
                error_cause: vec![],
                operational_status: None,
            })
            .collect();

        let summary = ComplianceSummary::from_results(&results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.compliant, 1);
        assert_eq!(summary.out_of_date, 1);
        assert_eq!(summary.unknown, 1);
        assert!(!ComplianceSummary::default().all_compliant());
    }
}

use crate::domain::model::{ManagedObjectReference, PbmServiceInstanceContent};
use serde::Serialize;

/// Managed objects that service PBM calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Manager {
    ServiceInstance,
    ProfileManager,
    ComplianceManager,
    PlacementSolver,
    ReplicationManager,
}

impl Manager {
    /// Reference used as `_this`. `None` when the server does not expose the
    /// manager (replication on older releases).
    pub fn reference(&self, content: &PbmServiceInstanceContent) -> Option<ManagedObjectReference> {
        match self {
            Manager::ServiceInstance => Some(ManagedObjectReference::service_instance()),
            Manager::ProfileManager => Some(content.profile_manager.clone()),
            Manager::ComplianceManager => Some(content.compliance_manager.clone()),
            Manager::PlacementSolver => Some(content.placement_solver.clone()),
            Manager::ReplicationManager => content.replication_manager.clone(),
        }
    }
}

/// Whether resending a call can repeat a side effect on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Effect {
    Idempotent,
    Mutating,
}

/// Builds `Operation` from one table row per PBM method. Request elements
/// are `Pbm<Variant>`; responses append `Response`.
macro_rules! operations {
    ($( $variant:ident => $manager:ident : $effect:ident ),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Operation {
            $( $variant, )*
        }

        impl Operation {
            pub const ALL: &'static [Operation] = &[$( Operation::$variant ),*];

            pub fn request_element(&self) -> &'static str {
                match self {
                    $( Operation::$variant => concat!("Pbm", stringify!($variant)), )*
                }
            }

            pub fn response_element(&self) -> &'static str {
                match self {
                    $( Operation::$variant => concat!("Pbm", stringify!($variant), "Response"), )*
                }
            }

            pub fn manager(&self) -> Manager {
                match self {
                    $( Operation::$variant => Manager::$manager, )*
                }
            }

            pub fn effect(&self) -> Effect {
                match self {
                    $( Operation::$variant => Effect::$effect, )*
                }
            }
        }
    };
}

operations! {
    RetrieveServiceContent => ServiceInstance: Idempotent,

    AssignDefaultRequirementProfile => ProfileManager: Mutating,
    Create => ProfileManager: Mutating,
    Delete => ProfileManager: Mutating,
    FetchCapabilityMetadata => ProfileManager: Idempotent,
    FetchCapabilitySchema => ProfileManager: Idempotent,
    FetchResourceType => ProfileManager: Idempotent,
    FetchVendorInfo => ProfileManager: Idempotent,
    FindApplicableDefaultProfile => ProfileManager: Idempotent,
    QueryAssociatedEntities => ProfileManager: Idempotent,
    QueryAssociatedEntity => ProfileManager: Idempotent,
    QueryAssociatedProfile => ProfileManager: Idempotent,
    QueryAssociatedProfiles => ProfileManager: Idempotent,
    QueryDefaultRequirementProfile => ProfileManager: Idempotent,
    QueryDefaultRequirementProfiles => ProfileManager: Idempotent,
    QueryProfile => ProfileManager: Idempotent,
    QuerySpaceStatsForStorageContainer => ProfileManager: Idempotent,
    ResetDefaultRequirementProfile => ProfileManager: Mutating,
    ResetVSanDefaultProfile => ProfileManager: Mutating,
    RetrieveContent => ProfileManager: Idempotent,
    Update => ProfileManager: Mutating,

    CheckCompliance => ComplianceManager: Idempotent,
    CheckRollupCompliance => ComplianceManager: Idempotent,
    FetchComplianceResult => ComplianceManager: Idempotent,
    FetchRollupComplianceResult => ComplianceManager: Idempotent,
    QueryByRollupComplianceStatus => ComplianceManager: Idempotent,

    CheckCompatibility => PlacementSolver: Idempotent,
    CheckCompatibilityWithSpec => PlacementSolver: Idempotent,
    CheckRequirements => PlacementSolver: Idempotent,
    QueryMatchingHub => PlacementSolver: Idempotent,
    QueryMatchingHubWithSpec => PlacementSolver: Idempotent,

    QueryReplicationGroups => ReplicationManager: Idempotent,
}

impl Operation {
    /// Resolves a request element name such as `PbmCheckCompliance`.
    pub fn from_name(name: &str) -> Option<Operation> {
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.request_element() == name)
    }

    /// Safe to resend after the request may already have reached the server.
    pub fn is_idempotent(&self) -> bool {
        self.effect() == Effect::Idempotent
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.request_element())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_element_names_are_exact() {
        assert_eq!(Operation::CheckCompliance.request_element(), "PbmCheckCompliance");
        assert_eq!(
            Operation::CheckCompliance.response_element(),
            "PbmCheckComplianceResponse"
        );
        assert_eq!(Operation::ResetVSanDefaultProfile.request_element(), "PbmResetVSanDefaultProfile");
        assert_eq!(
            Operation::QuerySpaceStatsForStorageContainer.request_element(),
            "PbmQuerySpaceStatsForStorageContainer"
        );
        assert_eq!(Operation::QueryReplicationGroups.manager(), Manager::ReplicationManager);
    }

    #[test]
    fn test_table_is_complete_and_unique() {
        assert_eq!(Operation::ALL.len(), 32);
        let names: HashSet<&str> = Operation::ALL.iter().map(|op| op.request_element()).collect();
        assert_eq!(names.len(), Operation::ALL.len());

        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.request_element()), Some(*op));
            assert_eq!(
                op.response_element(),
                format!("{}Response", op.request_element())
            );
        }
        assert_eq!(Operation::from_name("PbmNoSuchCall"), None);
    }

    #[test]
    fn test_profile_writes_are_not_idempotent() {
        let mutating: Vec<&str> = Operation::ALL
            .iter()
            .filter(|op| !op.is_idempotent())
            .map(|op| op.request_element())
            .collect();
        assert_eq!(
            mutating,
            vec![
                "PbmAssignDefaultRequirementProfile",
                "PbmCreate",
                "PbmDelete",
                "PbmResetDefaultRequirementProfile",
                "PbmResetVSanDefaultProfile",
                "PbmUpdate",
            ]
        );
        assert!(Operation::CheckCompliance.is_idempotent());
        assert!(Operation::RetrieveServiceContent.is_idempotent());
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Builds `FaultKind` from the list of schema fault type names. The wire
/// element for a fault is its type name followed by `Fault`.
macro_rules! fault_catalog {
    ($( $variant:ident ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum FaultKind {
            $( $variant, )*
            /// A fault element that is not in the catalog, keeping the raw tag.
            Unrecognized(String),
        }

        impl FaultKind {
            /// Every fault type name in the catalog, in declaration order.
            pub const NAMES: &'static [&'static str] = &[$( stringify!($variant) ),*];

            /// Resolves a fault type name (`InvalidArgument`, not `InvalidArgumentFault`).
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $( stringify!($variant) => Some(FaultKind::$variant), )*
                    _ => None,
                }
            }

            /// Type name for known kinds, the raw tag for unrecognized ones.
            pub fn name(&self) -> &str {
                match self {
                    $( FaultKind::$variant => stringify!($variant), )*
                    FaultKind::Unrecognized(tag) => tag,
                }
            }
        }
    };
}

fault_catalog! {
    // PBM service faults
    PbmFault,
    PbmAlreadyExists,
    PbmCapabilityProfilePropertyMismatchFault,
    PbmCompatibilityCheckFault,
    PbmDefaultProfileAppliesFault,
    PbmDuplicateName,
    PbmFaultInvalidLogin,
    PbmFaultNoPermission,
    PbmFaultNotFound,
    PbmFaultProfileStorageFault,
    PbmIncompatibleVendorSpecificRuleSet,
    PbmLegacyHubsNotSupported,
    PbmNonExistentHubs,
    PbmPropertyMismatchFault,
    PbmResourceInUse,
    // vim25 faults the PBM schema imports
    ActiveDirectoryFault,
    ActiveVMsBlockingEVC,
    AdminDisabled,
    AdminNotDisabled,
    AffinityConfigured,
    AgentInstallFailed,
    AlreadyBeingManaged,
    AlreadyConnected,
    AlreadyExists,
    AlreadyUpgraded,
    AnswerFileUpdateFailed,
    ApplicationQuiesceFault,
    AuthMinimumAdminPermission,
    BackupBlobReadFailure,
    BackupBlobWriteFailure,
    BlockedByFirewall,
    CAMServerRefusedConnection,
    CannotAccessFile,
    CannotAccessLocalSource,
    CannotAccessNetwork,
    CannotAccessVmComponent,
    CannotAccessVmConfig,
    CannotAccessVmDevice,
    CannotAccessVmDisk,
    CannotAddHostWithFTVmAsStandalone,
    CannotAddHostWithFTVmToDifferentCluster,
    CannotAddHostWithFTVmToNonHACluster,
    CannotChangeDrsBehaviorForFtSecondary,
    CannotChangeHaSettingsForFtSecondary,
    CannotChangeVsanClusterUuid,
    CannotChangeVsanNodeUuid,
    CannotComputeFTCompatibleHosts,
    CannotCreateFile,
    CannotDecryptPasswords,
    CannotDeleteFile,
    CannotDisableDrsOnClustersWithVApps,
    CannotDisableSnapshot,
    CannotDisconnectHostWithFaultToleranceVm,
    CannotEnableVmcpForCluster,
    CannotModifyConfigCpuRequirements,
    CannotMoveFaultToleranceVm,
    CannotMoveHostWithFaultToleranceVm,
    CannotMoveVmWithDeltaDisk,
    CannotMoveVmWithNativeDeltaDisk,
    CannotMoveVsanEnabledHost,
    CannotPlaceWithoutPrerequisiteMoves,
    CannotPowerOffVmInCluster,
    CannotReconfigureVsanWhenHaEnabled,
    CannotUseNetwork,
    ClockSkew,
    CloneFromSnapshotNotSupported,
    CollectorAddressUnset,
    ConcurrentAccess,
    ConflictingConfiguration,
    ConflictingDatastoreFound,
    ConnectedIso,
    CpuCompatibilityUnknown,
    CpuHotPlugNotSupported,
    CpuIncompatible,
    CpuIncompatible1ECX,
    CpuIncompatible81EDX,
    CustomizationFault,
    CustomizationPending,
    DasConfigFault,
    DatabaseError,
    DatacenterMismatch,
    DatastoreNotWritableOnHost,
    DeltaDiskFormatNotSupported,
    DestinationSwitchFull,
    DestinationVsanDisabled,
    DeviceBackingNotSupported,
    DeviceControllerNotSupported,
    DeviceHotPlugNotSupported,
    DeviceNotFound,
    DeviceNotSupported,
    DeviceUnsupportedForVmPlatform,
    DeviceUnsupportedForVmVersion,
    DigestNotSupported,
    DirectoryNotEmpty,
    DisableAdminNotSupported,
    DisallowedChangeByService,
    DisallowedDiskModeChange,
    DisallowedMigrationDeviceAttached,
    DisallowedOperationOnFailoverHost,
    DisconnectedHostsBlockingEVC,
    DiskHasPartitions,
    DiskIsLastRemainingNonSSD,
    DiskIsNonLocal,
    DiskIsUSB,
    DiskMoveTypeNotSupported,
    DiskNotSupported,
    DiskTooSmall,
    DomainNotFound,
    DrsDisabledOnVm,
    DrsVmotionIncompatibleFault,
    DuplicateDisks,
    DuplicateIpDetected,
    DuplicateName,
    DuplicateVsanNetworkInterface,
    DvsApplyOperationFault,
    DvsFault,
    DvsNotAuthorized,
    DvsOperationBulkFault,
    DvsScopeViolated,
    EightHostLimitViolated,
    EVCAdmissionFailed,
    EVCAdmissionFailedCPUFeaturesForMode,
    EVCAdmissionFailedCPUModel,
    EVCAdmissionFailedCPUModelForMode,
    EVCAdmissionFailedCPUVendor,
    EVCAdmissionFailedCPUVendorUnknown,
    EVCAdmissionFailedHostDisconnected,
    EVCAdmissionFailedHostSoftware,
    EVCAdmissionFailedHostSoftwareForMode,
    EVCAdmissionFailedVmActive,
    EVCConfigFault,
    EVCModeIllegalByVendor,
    EVCModeUnsupportedByHosts,
    EVCUnsupportedByHostHardware,
    EVCUnsupportedByHostSoftware,
    ExpiredAddonLicense,
    ExpiredEditionLicense,
    ExpiredFeatureLicense,
    ExtendedFault,
    FailToEnableSPBM,
    FailToLockFaultToleranceVMs,
    FaultToleranceAntiAffinityViolated,
    FaultToleranceCannotEditMem,
    FaultToleranceCpuIncompatible,
    FaultToleranceNeedsThickDisk,
    FaultToleranceNotLicensed,
    FaultToleranceNotSameBuild,
    FaultTolerancePrimaryPowerOnNotAttempted,
    FaultToleranceVmNotDasProtected,
    FcoeFault,
    FcoeFaultPnicHasNoPortSet,
    FeatureRequirementsNotMet,
    FileAlreadyExists,
    FileBackedPortNotSupported,
    FileFault,
    FileLocked,
    FileNameTooLong,
    FileNotFound,
    FileNotWritable,
    FilesystemQuiesceFault,
    FileTooLarge,
    FilterInUse,
    FtIssuesOnHost,
    FullStorageVMotionNotSupported,
    GatewayConnectFault,
    GatewayHostNotReachable,
    GatewayNotFound,
    GatewayNotReachable,
    GatewayOperationRefused,
    GatewayToHostAuthFault,
    GatewayToHostConnectFault,
    GatewayToHostTrustVerifyFault,
    GenericDrsFault,
    GenericVmConfigFault,
    GuestAuthenticationChallenge,
    GuestComponentsOutOfDate,
    GuestMultipleMappings,
    GuestOperationsFault,
    GuestOperationsUnavailable,
    GuestPermissionDenied,
    GuestProcessNotFound,
    GuestRegistryFault,
    GuestRegistryKeyAlreadyExists,
    GuestRegistryKeyFault,
    GuestRegistryKeyHasSubkeys,
    GuestRegistryKeyInvalid,
    GuestRegistryKeyParentVolatile,
    GuestRegistryValueFault,
    GuestRegistryValueNotFound,
    HAErrorsAtDest,
    HeterogenousHostsBlockingEVC,
    HostAccessRestrictedToManagementServer,
    HostCommunication,
    HostConfigFailed,
    HostConfigFault,
    HostConnectFault,
    HostHasComponentFailure,
    HostIncompatibleForFaultTolerance,
    HostIncompatibleForRecordReplay,
    HostInDomain,
    HostInventoryFull,
    HostNotConnected,
    HostNotReachable,
    HostPowerOpFailed,
    HostSpecificationOperationFailed,
    HotSnapshotMoveNotSupported,
    HttpFault,
    IDEDiskNotSupported,
    ImportHostAddFailure,
    ImportOperationBulkFault,
    InaccessibleDatastore,
    InaccessibleFTMetadataDatastore,
    InaccessibleVFlashSource,
    IncompatibleDefaultDevice,
    IncompatibleHostForFtSecondary,
    IncompatibleHostForVmReplication,
    IncompatibleSetting,
    IncorrectFileType,
    IncorrectHostInformation,
    IndependentDiskVMotionNotSupported,
    InsufficientAgentVmsDeployed,
    InsufficientCpuResourcesFault,
    InsufficientDisks,
    InsufficientFailoverResourcesFault,
    InsufficientGraphicsResourcesFault,
    InsufficientHostCapacityFault,
    InsufficientHostCpuCapacityFault,
    InsufficientHostMemoryCapacityFault,
    InsufficientMemoryResourcesFault,
    InsufficientNetworkCapacity,
    InsufficientNetworkResourcePoolCapacity,
    InsufficientPerCpuCapacity,
    InsufficientResourcesFault,
    InsufficientStandbyCpuResource,
    InsufficientStandbyMemoryResource,
    InsufficientStandbyResource,
    InsufficientStorageIops,
    InsufficientStorageSpace,
    InsufficientVFlashResourcesFault,
    InUseFeatureManipulationDisallowed,
    InvalidAffinitySettingFault,
    InvalidArgument,
    InvalidBmcRole,
    InvalidBundle,
    InvalidCAMCertificate,
    InvalidCAMServer,
    InvalidClientCertificate,
    InvalidCollectorVersion,
    InvalidController,
    InvalidDasConfigArgument,
    InvalidDasRestartPriorityForFtVm,
    InvalidDatastore,
    InvalidDatastorePath,
    InvalidDatastoreState,
    InvalidDeviceBacking,
    InvalidDeviceOperation,
    InvalidDeviceSpec,
    InvalidDiskFormat,
    InvalidDrsBehaviorForFtVm,
    InvalidEditionLicense,
    InvalidEvent,
    InvalidFolder,
    InvalidFormat,
    InvalidGuestLogin,
    InvalidHostConnectionState,
    InvalidHostName,
    InvalidHostState,
    InvalidIndexArgument,
    InvalidIpfixConfig,
    InvalidIpmiLoginInfo,
    InvalidIpmiMacAddress,
    InvalidLicense,
    InvalidLocale,
    InvalidLogin,
    InvalidName,
    InvalidNasCredentials,
    InvalidNetworkInType,
    InvalidNetworkResource,
    InvalidOperationOnSecondaryVm,
    InvalidPowerState,
    InvalidPrivilege,
    InvalidProfileReferenceHost,
    InvalidProperty,
    InvalidPropertyType,
    InvalidPropertyValue,
    InvalidRequest,
    InvalidResourcePoolStructureFault,
    InvalidSnapshotFormat,
    InvalidState,
    InvalidType,
    InvalidVmConfig,
    InvalidVmState,
    InventoryHasStandardAloneHosts,
    IORMNotSupportedHostOnDatastore,
    IpHostnameGeneratorError,
    IscsiFault,
    IscsiFaultInvalidVnic,
    IscsiFaultPnicInUse,
    IscsiFaultVnicAlreadyBound,
    IscsiFaultVnicHasActivePaths,
    IscsiFaultVnicHasMultipleUplinks,
    IscsiFaultVnicHasNoUplinks,
    IscsiFaultVnicHasWrongUplink,
    IscsiFaultVnicInUse,
    IscsiFaultVnicIsLastPath,
    IscsiFaultVnicNotBound,
    IscsiFaultVnicNotFound,
    KeyNotFound,
    LargeRDMConversionNotSupported,
    LargeRDMNotSupportedOnDatastore,
    LegacyNetworkInterfaceInUse,
    LicenseAssignmentFailed,
    LicenseDowngradeDisallowed,
    LicenseEntityNotFound,
    LicenseExpired,
    LicenseKeyEntityMismatch,
    LicenseRestricted,
    LicenseServerUnavailable,
    LicenseSourceUnavailable,
    LimitExceeded,
    LinuxVolumeNotClean,
    LogBundlingFailed,
    MaintenanceModeFileMove,
    ManagedObjectNotFound,
    MemoryFileFormatNotSupportedByDatastore,
    MemoryHotPlugNotSupported,
    MemorySizeNotRecommended,
    MemorySizeNotSupported,
    MemorySizeNotSupportedByDatastore,
    MemorySnapshotOnIndependentDisk,
    MethodAlreadyDisabledFault,
    MethodDisabled,
    MethodFault,
    MethodNotFound,
    MigrationDisabled,
    MigrationFault,
    MigrationFeatureNotSupported,
    MigrationNotReady,
    MismatchedBundle,
    MismatchedNetworkPolicies,
    MismatchedVMotionNetworkNames,
    MissingBmcSupport,
    MissingController,
    MissingIpPool,
    MissingLinuxCustResources,
    MissingNetworkIpConfig,
    MissingPowerOffConfiguration,
    MissingPowerOnConfiguration,
    MissingWindowsCustResources,
    MksConnectionLimitReached,
    MountError,
    MultipleCertificatesVerifyFault,
    MultipleSnapshotsNotSupported,
    MultiWriterNotSupported,
    NamespaceFull,
    NamespaceLimitReached,
    NamespaceWriteProtected,
    NasConfigFault,
    NasConnectionLimitReached,
    NasSessionCredentialConflict,
    NasVolumeNotMounted,
    NetworkCopyFault,
    NetworkDisruptedAndConfigRolledBack,
    NetworkInaccessible,
    NetworksMayNotBeTheSame,
    NicSettingMismatch,
    NoActiveHostInCluster,
    NoAvailableIp,
    NoClientCertificate,
    NoCompatibleDatastore,
    NoCompatibleHardAffinityHost,
    NoCompatibleHost,
    NoCompatibleHostWithAccessToDevice,
    NoCompatibleSoftAffinityHost,
    NoConnectedDatastore,
    NoDiskFound,
    NoDiskSpace,
    NoDisksToCustomize,
    NoGateway,
    NoGuestHeartbeat,
    NoHost,
    NoHostSuitableForFtSecondary,
    NoLicenseServerConfigured,
    NonADUserRequired,
    NonHomeRDMVMotionNotSupported,
    NonPersistentDisksNotSupported,
    NonVmwareOuiMacNotSupportedHost,
    NoPeerHostFound,
    NoPermission,
    NoPermissionOnAD,
    NoPermissionOnHost,
    NoPermissionOnNasVolume,
    NoSubjectName,
    NotADirectory,
    NotAFile,
    NotAuthenticated,
    NotEnoughCpus,
    NotEnoughLicenses,
    NotEnoughLogicalCpus,
    NotFound,
    NotImplemented,
    NotSupported,
    NotSupportedDeviceForFT,
    NotSupportedHost,
    NotSupportedHostForChecksum,
    NotSupportedHostForVFlash,
    NotSupportedHostForVmcp,
    NotSupportedHostForVmemFile,
    NotSupportedHostForVsan,
    NotSupportedHostInCluster,
    NotSupportedHostInDvs,
    NotSupportedHostInHACluster,
    NotUserConfigurableProperty,
    NoVcManagedIpConfigured,
    NoVirtualNic,
    NoVmInVApp,
    NumVirtualCoresPerSocketNotSupported,
    NumVirtualCpusExceedsLimit,
    NumVirtualCpusIncompatible,
    NumVirtualCpusNotSupported,
    OperationDisabledByGuest,
    OperationDisallowedOnHost,
    OperationNotSupportedByGuest,
    OutOfBounds,
    OvfAttribute,
    OvfConnectedDevice,
    OvfConnectedDeviceFloppy,
    OvfConnectedDeviceIso,
    OvfConstraint,
    OvfConsumerCallbackFault,
    OvfConsumerCommunicationError,
    OvfConsumerFault,
    OvfConsumerInvalidSection,
    OvfConsumerPowerOnFault,
    OvfConsumerUndeclaredSection,
    OvfConsumerUndefinedPrefix,
    OvfConsumerValidationFault,
    OvfCpuCompatibility,
    OvfCpuCompatibilityCheckNotSupported,
    OvfDiskMappingNotFound,
    OvfDiskOrderConstraint,
    OvfDuplicatedElementBoundary,
    OvfDuplicatedPropertyIdExport,
    OvfDuplicatedPropertyIdImport,
    OvfDuplicateElement,
    OvfElement,
    OvfElementInvalidValue,
    OvfExport,
    OvfExportFailed,
    OvfFault,
    OvfHardwareCheck,
    OvfHardwareExport,
    OvfHostResourceConstraint,
    OvfHostValueNotParsed,
    OvfImport,
    OvfImportFailed,
    OvfInternalError,
    OvfInvalidPackage,
    OvfInvalidValue,
    OvfInvalidValueConfiguration,
    OvfInvalidValueEmpty,
    OvfInvalidValueFormatMalformed,
    OvfInvalidValueReference,
    OvfInvalidVmName,
    OvfMappedOsId,
    OvfMissingAttribute,
    OvfMissingElement,
    OvfMissingElementNormalBoundary,
    OvfMissingHardware,
    OvfNetworkMappingNotSupported,
    OvfNoHostNic,
    OvfNoSpaceOnController,
    OvfNoSupportedHardwareFamily,
    OvfProperty,
    OvfPropertyExport,
    OvfPropertyNetwork,
    OvfPropertyNetworkExport,
    OvfPropertyQualifier,
    OvfPropertyQualifierDuplicate,
    OvfPropertyQualifierIgnored,
    OvfPropertyType,
    OvfPropertyValue,
    OvfSystemFault,
    OvfToXmlUnsupportedElement,
    OvfUnableToExportDisk,
    OvfUnexpectedElement,
    OvfUnknownDevice,
    OvfUnknownDeviceBacking,
    OvfUnknownEntity,
    OvfUnsupportedAttribute,
    OvfUnsupportedAttributeValue,
    OvfUnsupportedDeviceBackingInfo,
    OvfUnsupportedDeviceBackingOption,
    OvfUnsupportedDeviceExport,
    OvfUnsupportedDiskProvisioning,
    OvfUnsupportedElement,
    OvfUnsupportedElementValue,
    OvfUnsupportedPackage,
    OvfUnsupportedSection,
    OvfUnsupportedSubType,
    OvfUnsupportedType,
    OvfWrongElement,
    OvfWrongNamespace,
    OvfXmlFormat,
    PasswordExpired,
    PatchAlreadyInstalled,
    PatchBinariesNotFound,
    PatchInstallFailed,
    PatchIntegrityError,
    PatchMetadataCorrupted,
    PatchMetadataInvalid,
    PatchMetadataNotFound,
    PatchMissingDependencies,
    PatchNotApplicable,
    PatchSuperseded,
    PhysCompatRDMNotSupported,
    PlatformConfigFault,
    PowerOnFtSecondaryFailed,
    PowerOnFtSecondaryTimedout,
    ProfileUpdateFailed,
    QuarantineModeFault,
    QuestionPending,
    QuiesceDatastoreIOForHAFailed,
    RawDiskNotSupported,
    RDMConversionNotSupported,
    RDMNotPreserved,
    RDMNotSupported,
    RDMNotSupportedOnDatastore,
    RDMPointsToInaccessibleDisk,
    ReadHostResourcePoolTreeFailed,
    ReadOnlyDisksWithLegacyDestination,
    RebootRequired,
    RecordReplayDisabled,
    RemoteDeviceNotSupported,
    RemoveFailed,
    ReplicationConfigFault,
    ReplicationDiskConfigFault,
    ReplicationFault,
    ReplicationIncompatibleWithFT,
    ReplicationInvalidOptions,
    ReplicationNotSupportedOnHost,
    ReplicationVmConfigFault,
    ReplicationVmFault,
    ReplicationVmInProgressFault,
    RequestCanceled,
    ResourceInUse,
    ResourceNotAvailable,
    RestrictedByAdministrator,
    RestrictedVersion,
    RollbackFailure,
    RuleViolation,
    RuntimeFault,
    SecondaryVmAlreadyDisabled,
    SecondaryVmAlreadyEnabled,
    SecondaryVmAlreadyRegistered,
    SecondaryVmNotRegistered,
    SecurityError,
    SharedBusControllerNotSupported,
    ShrinkDiskFault,
    SnapshotCloneNotSupported,
    SnapshotCopyNotSupported,
    SnapshotDisabled,
    SnapshotFault,
    SnapshotIncompatibleDeviceInVm,
    SnapshotLocked,
    SnapshotMoveFromNonHomeNotSupported,
    SnapshotMoveNotSupported,
    SnapshotMoveToNonHomeNotSupported,
    SnapshotNoChange,
    SnapshotRevertIssue,
    SoftRuleVioCorrectionDisallowed,
    SoftRuleVioCorrectionImpact,
    SolutionUserRequired,
    SsdDiskNotAvailable,
    SSLDisabledFault,
    SSLVerifyFault,
    SSPIChallenge,
    StorageDrsCannotMoveDiskInMultiWriterMode,
    StorageDrsCannotMoveFTVm,
    StorageDrsCannotMoveIndependentDisk,
    StorageDrsCannotMoveManuallyPlacedSwapFile,
    StorageDrsCannotMoveManuallyPlacedVm,
    StorageDrsCannotMoveSharedDisk,
    StorageDrsCannotMoveTemplate,
    StorageDrsCannotMoveVmInUserFolder,
    StorageDrsCannotMoveVmWithMountedCDROM,
    StorageDrsCannotMoveVmWithNoFilesInLayout,
    StorageDrsDatacentersCannotShareDatastore,
    StorageDrsDisabledOnVm,
    StorageDrsHbrDiskNotMovable,
    StorageDrsHmsMoveInProgress,
    StorageDrsHmsUnreachable,
    StorageDrsIolbDisabledInternally,
    StorageDrsRelocateDisabled,
    StorageDrsStaleHmsCollection,
    StorageDrsUnableToMoveFiles,
    StorageVmotionIncompatible,
    StorageVMotionNotSupported,
    SuspendedRelocateNotSupported,
    SwapDatastoreNotWritableOnHost,
    SwapDatastoreUnset,
    SwapPlacementOverrideNotSupported,
    SwitchIpUnset,
    SwitchNotInUpgradeMode,
    SystemError,
    TaskInProgress,
    ThirdPartyLicenseAssignmentFailed,
    Timedout,
    ToolsAlreadyUpgraded,
    ToolsAutoUpgradeNotSupported,
    ToolsImageCopyFailed,
    ToolsImageNotAvailable,
    ToolsImageSignatureCheckFailed,
    ToolsInstallationInProgress,
    ToolsUnavailable,
    ToolsUpgradeCancelled,
    TooManyConcurrentNativeClones,
    TooManyConsecutiveOverrides,
    TooManyDevices,
    TooManyDisksOnLegacyHost,
    TooManyGuestLogons,
    TooManyHosts,
    TooManyNativeCloneLevels,
    TooManyNativeClonesOnFile,
    TooManySnapshotLevels,
    UncommittedUndoableDisk,
    UnconfiguredPropertyValue,
    UncustomizableGuest,
    UnexpectedCustomizationFault,
    UnexpectedFault,
    UnrecognizedHost,
    UnsharedSwapVMotionNotSupported,
    UnsupportedDatastore,
    UnSupportedDatastoreForVFlash,
    UnsupportedGuest,
    UnsupportedVimApiVersion,
    UnsupportedVmxLocation,
    UnusedVirtualDiskBlocksNotScrubbed,
    UserNotFound,
    VAppConfigFault,
    VAppNotRunning,
    VAppOperationInProgress,
    VAppPropertyFault,
    VAppTaskInProgress,
    VFlashCacheHotConfigNotSupported,
    VFlashModuleNotSupported,
    VFlashModuleVersionIncompatible,
    VimFault,
    VirtualDiskBlocksNotFullyProvisioned,
    VirtualDiskModeNotSupported,
    VirtualEthernetCardNotSupported,
    VirtualHardwareCompatibilityIssue,
    VirtualHardwareVersionNotSupported,
    VmAlreadyExistsInDatacenter,
    VmConfigFault,
    VmConfigIncompatibleForFaultTolerance,
    VmConfigIncompatibleForRecordReplay,
    VmFaultToleranceConfigIssue,
    VmFaultToleranceConfigIssueWrapper,
    VmFaultToleranceInvalidFileBacking,
    VmFaultToleranceIssue,
    VmFaultToleranceOpIssuesList,
    VmFaultToleranceTooManyFtVcpusOnHost,
    VmFaultToleranceTooManyVMsOnHost,
    VmfsAlreadyMounted,
    VmfsAmbiguousMount,
    VmfsMountFault,
    VmHostAffinityRuleViolation,
    VMINotSupported,
    VmLimitLicense,
    VmMetadataManagerFault,
    VmMonitorIncompatibleForFaultTolerance,
    VMOnConflictDVPort,
    VMOnVirtualIntranet,
    VMotionAcrossNetworkNotSupported,
    VMotionInterfaceIssue,
    VmotionInterfaceNotEnabled,
    VMotionLinkCapacityLow,
    VMotionLinkDown,
    VMotionNotConfigured,
    VMotionNotLicensed,
    VMotionNotSupported,
    VMotionProtocolIncompatible,
    VmPowerOnDisabled,
    VmSmpFaultToleranceTooManyVMsOnHost,
    VmToolsUpgradeFault,
    VmValidateMaxDevice,
    VmWwnConflict,
    VolumeEditorError,
    VramLimitLicense,
    VsanClusterUuidMismatch,
    VsanDiskFault,
    VsanFault,
    VsanIncompatibleDiskMapping,
    VspanDestPortConflict,
    VspanPortConflict,
    VspanPortgroupPromiscChangeFault,
    VspanPortgroupTypeChangeFault,
    VspanPortMoveFault,
    VspanPortPromiscChangeFault,
    VspanPromiscuousPortNotSupported,
    VspanSameSessionPortConflict,
    WakeOnLanNotSupported,
    WakeOnLanNotSupportedByVmotionNIC,
    WillLoseHAProtection,
    WillModifyConfigCpuRequirements,
    WillResetSnapshotDirectory,
    WipeDiskFault,
}

impl FaultKind {
    pub fn known() -> impl Iterator<Item = FaultKind> {
        Self::NAMES.iter().filter_map(|name| Self::from_name(name))
    }

    /// Local name of the detail element carrying this fault, e.g. `NotFoundFault`.
    pub fn element_name(&self) -> String {
        match self {
            FaultKind::Unrecognized(tag) => tag.clone(),
            known => format!("{}Fault", known.name()),
        }
    }

    /// Resolves a detail element tag by stripping one trailing `Fault`.
    pub fn from_element_name(tag: &str) -> Option<Self> {
        tag.strip_suffix("Fault").and_then(Self::from_name)
    }

    pub fn is_pbm(&self) -> bool {
        !self.is_unrecognized() && self.name().starts_with("Pbm")
    }

    pub fn is_unrecognized(&self) -> bool {
        matches!(self, FaultKind::Unrecognized(_))
    }

    /// Faults that mean the session or credentials are not good enough.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            FaultKind::InvalidLogin
                | FaultKind::NotAuthenticated
                | FaultKind::NoPermission
                | FaultKind::SecurityError
                | FaultKind::NoClientCertificate
                | FaultKind::PbmFaultInvalidLogin
                | FaultKind::PbmFaultNoPermission
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            FaultKind::NotFound
                | FaultKind::ManagedObjectNotFound
                | FaultKind::FileNotFound
                | FaultKind::UserNotFound
                | FaultKind::PbmFaultNotFound
                | FaultKind::PbmNonExistentHubs
        )
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FaultKind::Unrecognized(tag) => write!(f, "unrecognized fault <{}>", tag),
            known => f.write_str(known.name()),
        }
    }
}

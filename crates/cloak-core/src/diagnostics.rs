//! Diagnostic (audit/telemetry) configuration and event emission.
//!
//! Events go through `tracing` under the `cloak::audit` target so hosts
//! subscribe with their normal tracing stack; there is no separate
//! telemetry pipeline in-tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Cloud, DataBoundary};

/// Target used for every audit event emitted by the SDK.
pub const AUDIT_TARGET: &str = "cloak::audit";

/// Custom diagnostic configuration (not commonly changed).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticConfiguration {
    /// Ping network status on a background thread before uploads.
    pub is_network_detection_enabled: bool,
    /// Cache unsent events on disk.
    pub is_local_caching_enabled: bool,
    /// Only send telemetry required for service operation.
    pub is_minimal_telemetry_enabled: bool,
    /// Upload audit events immediately instead of batching.
    pub is_audit_priority_enhanced: bool,
    /// Cloud scoping for sovereign deployments.
    pub cloud: Cloud,
    pub data_boundary: DataBoundary,
    /// Event/property names whose values must be masked before upload.
    #[serde(default)]
    pub masked_properties: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub custom_settings: BTreeMap<String, String>,
}

impl Default for DiagnosticConfiguration {
    fn default() -> Self {
        Self {
            is_network_detection_enabled: true,
            is_local_caching_enabled: true,
            is_minimal_telemetry_enabled: false,
            is_audit_priority_enhanced: false,
            cloud: Cloud::default(),
            data_boundary: DataBoundary::default(),
            masked_properties: BTreeMap::new(),
            custom_settings: BTreeMap::new(),
        }
    }
}

/// Logfile limits for default logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggerConfiguration {
    pub max_log_file_size_mb: i32,
    pub max_log_file_count: i32,
    /// Allow user identifiers in log lines; masked when false.
    pub is_pii_allowed: bool,
}

impl Default for LoggerConfiguration {
    fn default() -> Self {
        Self {
            max_log_file_size_mb: 20,
            max_log_file_count: 2,
            is_pii_allowed: true,
        }
    }
}

/// An auditable SDK action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    LabelApplied,
    LabelRemoved,
    ProtectionApplied,
    ProtectionRemoved,
    ContentAccessed,
    CommitSucceeded,
}

impl AuditAction {
    fn as_str(self) -> &'static str {
        match self {
            AuditAction::LabelApplied => "label_applied",
            AuditAction::LabelRemoved => "label_removed",
            AuditAction::ProtectionApplied => "protection_applied",
            AuditAction::ProtectionRemoved => "protection_removed",
            AuditAction::ContentAccessed => "content_accessed",
            AuditAction::CommitSucceeded => "commit_succeeded",
        }
    }
}

/// Emit an audit event for `action` on `content_name`.
///
/// `masked_properties` from the active [`DiagnosticConfiguration`] are the
/// caller's responsibility; what is passed here is what gets logged.
pub fn audit_event(action: AuditAction, content_name: &str, detail: &str) {
    tracing::info!(
        target: AUDIT_TARGET,
        action = action.as_str(),
        content = content_name,
        detail,
        "audit"
    );
}

//! Common value types shared across the SDK surface.

use serde::{Deserialize, Serialize};

/// Identity of the application consuming the SDK, sent with every service
/// interaction for auditing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationInfo {
    /// Registered application id (a GUID).
    pub application_id: String,
    pub application_name: String,
    pub application_version: String,
}

impl ApplicationInfo {
    /// All three fields are required by the service side.
    pub fn validate(&self) -> crate::Result<()> {
        if self.application_id.is_empty() {
            return Err(crate::SdkError::BadInput("no application id".into()));
        }
        if self.application_name.is_empty() {
            return Err(crate::SdkError::BadInput("no application name".into()));
        }
        if self.application_version.is_empty() {
            return Err(crate::SdkError::BadInput("no application version".into()));
        }
        Ok(())
    }
}

/// A user identity, usually an email address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: String,
    /// Display name, if different from the email.
    #[serde(default)]
    pub name: String,
}

impl Identity {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: String::new(),
        }
    }
}

/// How a label was applied to content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentMethod {
    /// Set by a normal user action.
    Standard,
    /// Set by an admin or privileged process; wins over standard labels.
    Privileged,
    /// Set automatically by classification.
    Auto,
}

/// What drove a labeling action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionSource {
    Manual,
    Automatic,
    Recommended,
    Default,
}

/// Where the content is while it is being worked on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataState {
    Rest,
    Motion,
    Use,
}

/// Target cloud for service requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cloud {
    #[default]
    Unknown,
    Commercial,
    Germany,
    UsDod,
    UsGcc,
    UsGccHigh,
    UsSec,
    UsNat,
    China01,
    /// Endpoint base URLs supplied explicitly by the application.
    Custom,
}

/// Regional boundary controlling where audit/telemetry events are stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataBoundary {
    #[default]
    Default,
    EuropeanUnion,
    UnitedStates,
}

/// Backing store for SDK caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CacheStorageType {
    #[default]
    InMemory,
    OnDisk,
    OnDiskEncrypted,
}

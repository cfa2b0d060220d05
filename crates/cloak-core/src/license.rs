//! License payloads and the rights information parsed out of them.
//!
//! The license bodies themselves are opaque byte buffers produced and
//! consumed by a rights-management service; the SDK only moves them
//! around and exposes the metadata that travels with them.

use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::descriptor::ProtectionType;
use crate::watermark::DynamicWatermark;

/// Serialization format of a pre-license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PreLicenseFormat {
    /// XACML-era XML, the widely accepted default.
    Xml,
    Json,
}

/// The publishing license attached to protected content, plus an optional
/// pre-license that allows consumption without a service round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishingLicenseInfo {
    serialized_publishing_license: Vec<u8>,
    serialized_pre_license: Option<Vec<u8>>,
}

impl PublishingLicenseInfo {
    pub fn new(serialized_publishing_license: Vec<u8>) -> Self {
        Self {
            serialized_publishing_license,
            serialized_pre_license: None,
        }
    }

    pub fn with_pre_license(
        serialized_pre_license: Vec<u8>,
        serialized_publishing_license: Vec<u8>,
    ) -> Self {
        Self {
            serialized_publishing_license,
            serialized_pre_license: Some(serialized_pre_license),
        }
    }

    pub fn serialized_publishing_license(&self) -> &[u8] {
        &self.serialized_publishing_license
    }

    pub fn serialized_pre_license(&self) -> Option<&[u8]> {
        self.serialized_pre_license.as_deref()
    }

    pub fn has_pre_license(&self) -> bool {
        self.serialized_pre_license.is_some()
    }

    /// Base64 form for embedding the license in text formats or logs.
    pub fn publishing_license_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.serialized_publishing_license)
    }
}

/// Rights info resolved for a label without creating a handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseInfo {
    pub user_rights: Vec<String>,
    pub dynamic_watermark: Option<DynamicWatermark>,
}

/// A license created on behalf of another user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelegationLicense {
    user: String,
    serialized_license: Vec<u8>,
    format: PreLicenseFormat,
}

impl DelegationLicense {
    pub fn new(user: impl Into<String>, serialized_license: Vec<u8>, format: PreLicenseFormat) -> Self {
        Self {
            user: user.into(),
            serialized_license,
            format,
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn serialized_license(&self) -> &[u8] {
        &self.serialized_license
    }

    pub fn format(&self) -> PreLicenseFormat {
        self.format
    }
}

/// Kind of directory entity a license grants rights to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectoryObjectType {
    Unknown,
    /// Anyone inside the issuing tenant.
    Internal,
    User,
    Group,
}

/// A directory entity referenced by a license.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryObject {
    pub object_type: DirectoryObjectType,
    pub email: String,
    pub object_id: String,
    pub puid: String,
}

/// A directory entity and the rights it was granted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryObjectRights {
    pub object: DirectoryObject,
    pub rights: Vec<String>,
}

/// The rights-related content of a publishing license.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseRightsData {
    protection_type: ProtectionType,
    directory_object_rights: Vec<DirectoryObjectRights>,
    content_valid_until: Option<DateTime<Utc>>,
}

impl LicenseRightsData {
    pub fn new(
        protection_type: ProtectionType,
        directory_object_rights: Vec<DirectoryObjectRights>,
        content_valid_until: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            protection_type,
            directory_object_rights,
            content_valid_until,
        }
    }

    pub fn protection_type(&self) -> ProtectionType {
        self.protection_type
    }

    pub fn directory_object_rights(&self) -> &[DirectoryObjectRights] {
        &self.directory_object_rights
    }

    pub fn does_content_expire(&self) -> bool {
        self.content_valid_until.is_some()
    }

    pub fn content_valid_until(&self) -> Option<DateTime<Utc>> {
        self.content_valid_until
    }
}

//! Protection descriptors: what protection is (or should be) applied to a
//! piece of content, and the builder that assembles one.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, SdkError};
use crate::rights;
use crate::watermark::DynamicWatermark;

/// Whether protection came from a tenant template or was defined ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtectionType {
    TemplateBased,
    Custom,
}

/// Label identity recorded with template or ad-hoc protection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelInfo {
    pub label_id: String,
    pub tenant_id: String,
}

/// A group of users and the rights they share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRights {
    pub users: Vec<String>,
    pub rights: Vec<String>,
}

impl UserRights {
    pub fn new(users: Vec<String>, rights: Vec<String>) -> Self {
        Self { users, rights }
    }
}

/// A group of users and the roles they share. Roles bundle rights on the
/// service side; the SDK passes them through opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRoles {
    pub users: Vec<String>,
    pub roles: Vec<String>,
}

impl UserRoles {
    pub fn new(users: Vec<String>, roles: Vec<String>) -> Self {
        Self { users, roles }
    }
}

/// Specialized license shapes with well-known default rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LicenseType {
    DoNotForward,
    EncryptOnly,
}

/// Description of protection associated with a piece of content.
///
/// Immutable once built; use [`ProtectionDescriptorBuilder`] to assemble
/// one or to derive a modified copy from an existing descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionDescriptor {
    protection_type: ProtectionType,
    owner: String,
    name: String,
    description: String,
    template_id: String,
    label_info: LabelInfo,
    content_id: String,
    user_rights: Vec<UserRights>,
    user_roles: Vec<UserRoles>,
    content_valid_until: Option<DateTime<Utc>>,
    allow_offline_access: bool,
    referrer: Option<String>,
    encrypted_app_data: BTreeMap<String, String>,
    signed_app_data: BTreeMap<String, String>,
    double_key_url: String,
    serialized_template: Option<Vec<u8>>,
    dynamic_watermark: Option<DynamicWatermark>,
}

impl ProtectionDescriptor {
    pub fn protection_type(&self) -> ProtectionType {
        self.protection_type
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Template id, empty for ad-hoc protection.
    pub fn template_id(&self) -> &str {
        &self.template_id
    }

    pub fn label_info(&self) -> &LabelInfo {
        &self.label_info
    }

    pub fn label_id(&self) -> &str {
        &self.label_info.label_id
    }

    /// Unique id stamped on the publishing license for tracking.
    pub fn content_id(&self) -> &str {
        &self.content_id
    }

    pub fn user_rights(&self) -> &[UserRights] {
        &self.user_rights
    }

    pub fn user_roles(&self) -> &[UserRoles] {
        &self.user_roles
    }

    pub fn does_content_expire(&self) -> bool {
        self.content_valid_until.is_some()
    }

    pub fn content_valid_until(&self) -> Option<DateTime<Utc>> {
        self.content_valid_until
    }

    pub fn does_allow_offline_access(&self) -> bool {
        self.allow_offline_access
    }

    /// Contact URI shown to users who request access.
    pub fn referrer(&self) -> Option<&str> {
        self.referrer.as_deref()
    }

    pub fn encrypted_app_data(&self) -> &BTreeMap<String, String> {
        &self.encrypted_app_data
    }

    pub fn signed_app_data(&self) -> &BTreeMap<String, String> {
        &self.signed_app_data
    }

    pub fn double_key_url(&self) -> &str {
        &self.double_key_url
    }

    pub fn serialized_template(&self) -> Option<&[u8]> {
        self.serialized_template.as_deref()
    }

    pub fn dynamic_watermark(&self) -> Option<&DynamicWatermark> {
        self.dynamic_watermark.as_ref()
    }
}

/// Assembles a [`ProtectionDescriptor`].
#[derive(Debug, Clone)]
pub struct ProtectionDescriptorBuilder {
    protection_type: ProtectionType,
    owner: String,
    name: String,
    description: String,
    template_id: String,
    label_info: LabelInfo,
    user_rights: Vec<UserRights>,
    user_roles: Vec<UserRoles>,
    content_valid_until: Option<DateTime<Utc>>,
    allow_offline_access: bool,
    referrer: Option<String>,
    encrypted_app_data: BTreeMap<String, String>,
    signed_app_data: BTreeMap<String, String>,
    double_key_url: String,
    serialized_template: Option<Vec<u8>>,
    dynamic_watermark: Option<DynamicWatermark>,
}

impl ProtectionDescriptorBuilder {
    fn empty(protection_type: ProtectionType) -> Self {
        Self {
            protection_type,
            owner: String::new(),
            name: String::new(),
            description: String::new(),
            template_id: String::new(),
            label_info: LabelInfo::default(),
            user_rights: Vec::new(),
            user_roles: Vec::new(),
            content_valid_until: None,
            allow_offline_access: true,
            referrer: None,
            encrypted_app_data: BTreeMap::new(),
            signed_app_data: BTreeMap::new(),
            double_key_url: String::new(),
            serialized_template: None,
            dynamic_watermark: None,
        }
    }

    /// Access permissions defined by users-to-rights mappings.
    pub fn from_user_rights(users_and_rights: Vec<UserRights>) -> Self {
        let mut builder = Self::empty(ProtectionType::Custom);
        builder.user_rights = users_and_rights;
        builder
    }

    /// Access permissions defined by users-to-roles mappings.
    pub fn from_user_roles(users_and_roles: Vec<UserRoles>) -> Self {
        let mut builder = Self::empty(ProtectionType::Custom);
        builder.user_roles = users_and_roles;
        builder
    }

    /// Access permissions defined by a tenant protection template.
    pub fn from_template(template_id: impl Into<String>) -> Self {
        let mut builder = Self::empty(ProtectionType::TemplateBased);
        builder.template_id = template_id.into();
        builder
    }

    /// Access permissions defined by an already-serialized template.
    pub fn from_serialized_template(serialized_template: Vec<u8>) -> Self {
        let mut builder = Self::empty(ProtectionType::TemplateBased);
        builder.serialized_template = Some(serialized_template);
        builder
    }

    /// A specialized license with its default right set, plus optional
    /// additional users-to-rights mappings.
    pub fn from_license_type(
        license_type: LicenseType,
        users_with_default_rights: Vec<String>,
        additional_users_and_rights: Vec<UserRights>,
    ) -> Self {
        let defaults = match license_type {
            LicenseType::DoNotForward => rights::do_not_forward_defaults(),
            LicenseType::EncryptOnly => rights::encrypt_only_defaults(),
        };
        let mut users_and_rights = vec![UserRights::new(users_with_default_rights, defaults)];
        users_and_rights.extend(additional_users_and_rights);
        Self::from_user_rights(users_and_rights)
    }

    /// Start from an existing descriptor, e.g. to tweak expiry on
    /// republish.
    pub fn from_descriptor(descriptor: &ProtectionDescriptor) -> Self {
        Self {
            protection_type: descriptor.protection_type,
            owner: descriptor.owner.clone(),
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            template_id: descriptor.template_id.clone(),
            label_info: descriptor.label_info.clone(),
            user_rights: descriptor.user_rights.clone(),
            user_roles: descriptor.user_roles.clone(),
            content_valid_until: descriptor.content_valid_until,
            allow_offline_access: descriptor.allow_offline_access,
            referrer: descriptor.referrer.clone(),
            encrypted_app_data: descriptor.encrypted_app_data.clone(),
            signed_app_data: descriptor.signed_app_data.clone(),
            double_key_url: descriptor.double_key_url.clone(),
            serialized_template: descriptor.serialized_template.clone(),
            dynamic_watermark: descriptor.dynamic_watermark.clone(),
        }
    }

    pub fn set_owner(&mut self, value: impl Into<String>) -> &mut Self {
        self.owner = value.into();
        self
    }

    pub fn set_name(&mut self, value: impl Into<String>) -> &mut Self {
        self.name = value.into();
        self
    }

    pub fn set_description(&mut self, value: impl Into<String>) -> &mut Self {
        self.description = value.into();
        self
    }

    pub fn set_content_valid_until(&mut self, value: DateTime<Utc>) -> &mut Self {
        self.content_valid_until = Some(value);
        self
    }

    pub fn set_allow_offline_access(&mut self, value: bool) -> &mut Self {
        self.allow_offline_access = value;
        self
    }

    pub fn set_referrer(&mut self, uri: impl Into<String>) -> &mut Self {
        self.referrer = Some(uri.into());
        self
    }

    pub fn set_encrypted_app_data(&mut self, value: BTreeMap<String, String>) -> &mut Self {
        self.encrypted_app_data = value;
        self
    }

    pub fn set_signed_app_data(&mut self, value: BTreeMap<String, String>) -> &mut Self {
        self.signed_app_data = value;
        self
    }

    pub fn set_double_key_url(&mut self, url: impl Into<String>) -> &mut Self {
        self.double_key_url = url.into();
        self
    }

    pub fn set_label_info(&mut self, value: LabelInfo) -> &mut Self {
        self.label_info = value;
        self
    }

    pub fn set_dynamic_watermark(&mut self, value: DynamicWatermark) -> &mut Self {
        self.dynamic_watermark = Some(value);
        self
    }

    /// Validate and produce the descriptor, stamping a fresh content id.
    ///
    /// # Errors
    /// `BadInput` when a template descriptor has no template, or a custom
    /// descriptor grants nothing (no user or no right in every mapping).
    pub fn build(&self) -> Result<ProtectionDescriptor> {
        match self.protection_type {
            ProtectionType::TemplateBased => {
                if self.template_id.is_empty() && self.serialized_template.is_none() {
                    return Err(SdkError::BadInput(
                        "template protection requires a template id or serialized template".into(),
                    ));
                }
            }
            ProtectionType::Custom => {
                let grants_right = self
                    .user_rights
                    .iter()
                    .any(|ur| !ur.users.is_empty() && !ur.rights.is_empty());
                let grants_role = self
                    .user_roles
                    .iter()
                    .any(|ur| !ur.users.is_empty() && !ur.roles.is_empty());
                if !grants_right && !grants_role {
                    return Err(SdkError::BadInput(
                        "custom protection requires at least one user with at least one right or role"
                            .into(),
                    ));
                }
            }
        }

        let content_id = format!("{{{}}}", Uuid::new_v4());
        tracing::debug!(
            target: "cloak::descriptor",
            protection_type = ?self.protection_type,
            content_id = %content_id,
            "built protection descriptor"
        );

        Ok(ProtectionDescriptor {
            protection_type: self.protection_type,
            owner: self.owner.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            template_id: self.template_id.clone(),
            label_info: self.label_info.clone(),
            content_id,
            user_rights: self.user_rights.clone(),
            user_roles: self.user_roles.clone(),
            content_valid_until: self.content_valid_until,
            allow_offline_access: self.allow_offline_access,
            referrer: self.referrer.clone(),
            encrypted_app_data: self.encrypted_app_data.clone(),
            signed_app_data: self.signed_app_data.clone(),
            double_key_url: self.double_key_url.clone(),
            serialized_template: self.serialized_template.clone(),
            dynamic_watermark: self.dynamic_watermark.clone(),
        })
    }
}

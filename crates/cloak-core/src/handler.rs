//! The protection handler contract: cryptographic operations scoped to a
//! single protected document.
//!
//! A handler is created by a [`ProtectionEngine`](crate::engine::ProtectionEngine)
//! either for publishing (protecting new content under a descriptor) or
//! for consumption (decrypting content from its publishing license). The
//! cipher work happens behind this trait; nothing in this crate
//! implements it.

use std::sync::Arc;

use crate::descriptor::ProtectionDescriptor;
use crate::engine::{ObserverContext, ProtectionCommonSettings};
use crate::error::{Result, SdkError};
use crate::license::{PreLicenseFormat, PublishingLicenseInfo};
use crate::stream::Stream;

/// Block cipher configuration of the protected content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherMode {
    /// AES-CBC over 4K blocks, the current default.
    Cbc4k,
    /// AES-CBC over 512-byte blocks without padding.
    Cbc512NoPadding,
    /// AES-ECB, deprecated and kept for old content only.
    Ecb,
}

/// Settings used to create a handler that consumes existing content.
#[derive(Debug, Clone)]
pub struct ConsumptionSettings {
    pub common: ProtectionCommonSettings,
    pub license_info: PublishingLicenseInfo,
    /// Set when the authenticated user acts on behalf of another user.
    pub delegated_user_email: Option<String>,
    /// Name to register with document tracking; an already-registered
    /// name is not changed.
    pub content_name: Option<String>,
    /// Capabilities passed to the service when fetching usage rights;
    /// these win over capabilities configured on the engine.
    pub capabilities: Vec<String>,
}

impl ConsumptionSettings {
    pub fn new(license_info: PublishingLicenseInfo) -> Self {
        Self {
            common: ProtectionCommonSettings::default(),
            license_info,
            delegated_user_email: None,
            content_name: None,
            capabilities: Vec::new(),
        }
    }

    pub fn add_capability(&mut self, capability: impl Into<String>) {
        self.capabilities.push(capability.into());
    }

    pub fn remove_capability(&mut self, capability: &str) -> bool {
        let before = self.capabilities.len();
        self.capabilities.retain(|c| c != capability);
        self.capabilities.len() != before
    }
}

/// Settings used to create a handler that protects new content.
#[derive(Clone)]
pub struct PublishingSettings {
    pub common: ProtectionCommonSettings,
    pub descriptor: Arc<ProtectionDescriptor>,
    /// Original license when republishing already-protected content.
    pub republishing_license: Option<Vec<u8>>,
    /// Original handler for offline republishing.
    pub republishing_handler: Option<Arc<dyn ProtectionHandler>>,
    /// Allow non-SDK-aware applications to open the content, audited.
    pub is_audited_extraction_allowed: bool,
    /// Prefer the deprecated ECB cipher for backwards compatibility.
    pub is_deprecated_algorithm_preferred: bool,
    /// Emit the publishing license as JSON instead of the default XML.
    pub is_publishing_format_json: bool,
    /// Regenerate the content key and id when republishing.
    pub regenerate_content_key: bool,
    pub delegated_user_email: Option<String>,
    /// Also produce a pre-license bound to this user.
    pub pre_license_user_email: Option<String>,
}

impl PublishingSettings {
    pub fn new(descriptor: Arc<ProtectionDescriptor>) -> Self {
        Self {
            common: ProtectionCommonSettings::default(),
            descriptor,
            republishing_license: None,
            republishing_handler: None,
            is_audited_extraction_allowed: false,
            is_deprecated_algorithm_preferred: false,
            is_publishing_format_json: false,
            regenerate_content_key: false,
            delegated_user_email: None,
            pre_license_user_email: None,
        }
    }

    pub fn for_republishing(descriptor: Arc<ProtectionDescriptor>, license: Vec<u8>) -> Self {
        let mut settings = Self::new(descriptor);
        settings.republishing_license = Some(license);
        settings
    }
}

/// Callbacks for async handler creation.
#[allow(unused_variables)]
pub trait ProtectionHandlerObserver: Send + Sync {
    fn on_create_handler_success(
        &self,
        handler: Arc<dyn ProtectionHandler>,
        context: ObserverContext,
    ) {
    }
    fn on_create_handler_failure(&self, error: SdkError, context: ObserverContext) {}
}

/// Cryptographic operations over one protected document.
pub trait ProtectionHandler: Send + Sync {
    /// Wrap `backing` so reads and writes transparently decrypt and
    /// encrypt the protected byte range starting at `content_start`.
    fn create_protected_stream(
        &self,
        backing: Box<dyn Stream>,
        content_start: i64,
        content_size: i64,
    ) -> Result<Box<dyn Stream>>;

    /// Encrypt a buffer at `offset` into `output`; `is_final` marks the
    /// last block. Returns bytes written.
    fn encrypt_buffer(
        &self,
        offset: i64,
        input: &[u8],
        output: &mut [u8],
        is_final: bool,
    ) -> Result<i64>;

    /// Decrypt a buffer at `offset` into `output`; `is_final` marks the
    /// last block. Returns bytes written.
    fn decrypt_buffer(
        &self,
        offset: i64,
        input: &[u8],
        output: &mut [u8],
        is_final: bool,
    ) -> Result<i64>;

    /// Size of `unprotected_length` bytes once protected.
    fn protected_content_length(&self, unprotected_length: i64, includes_final_block: bool) -> i64;

    fn block_size(&self) -> i64;

    /// Rights the current user holds on this content.
    fn rights(&self) -> Vec<String>;

    /// Whether the current user holds `right`.
    fn access_check(&self, right: &str) -> bool;

    fn issued_to(&self) -> String;

    fn owner(&self) -> String;

    fn is_issued_to_owner(&self) -> bool;

    fn protection_descriptor(&self) -> Arc<ProtectionDescriptor>;

    fn content_id(&self) -> String;

    fn uses_deprecated_algorithms(&self) -> bool;

    fn uses_application_defined_padding(&self) -> bool;

    fn is_audited_extract_allowed(&self) -> bool;

    fn serialized_publishing_license(&self) -> Vec<u8>;

    fn serialized_pre_license(&self, format: PreLicenseFormat) -> Vec<u8>;

    fn cipher_mode(&self) -> CipherMode;
}

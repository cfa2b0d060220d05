//! The protection engine contract.
//!
//! An engine is scoped to one user identity and fronts the
//! rights-management service: template listing, rights resolution, and
//! handler creation. No implementation lives in this crate; consumers
//! plug in a service-backed engine and the rest of the SDK (and the
//! sample CLI) work against these traits.
//!
//! Async operations follow the observer pattern: the caller passes an
//! observer plus an opaque context value, and exactly one of the paired
//! `on_*_success` / `on_*_failure` callbacks fires with that context.

use std::any::Any;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delegates::AuthDelegate;
use crate::error::{Result, SdkError};
use crate::handler::{
    ConsumptionSettings, ProtectionHandler, ProtectionHandlerObserver, PublishingSettings,
};
use crate::license::{DelegationLicense, LicenseInfo, LicenseRightsData};
use crate::types::{Cloud, DataBoundary, Identity};

/// Opaque caller state forwarded unchanged to observer callbacks.
pub type ObserverContext = Arc<dyn Any + Send + Sync>;

/// Handle to a pending async operation.
pub trait AsyncControl: Send + Sync {
    /// Request cancellation. Returns true if the operation had not
    /// completed yet; a cancelled operation reports
    /// `SdkError::OperationCancelled` through its failure callback.
    fn cancel(&self) -> bool;
}

/// Shared cancel flag for engine implementations to hand out.
#[derive(Debug, Default)]
pub struct CancellationToken {
    cancelled: AtomicBool,
    completed: AtomicBool,
}

impl CancellationToken {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Mark the operation finished; later cancels become no-ops.
    pub fn complete(&self) {
        self.completed.store(true, Ordering::Release);
    }
}

impl AsyncControl for CancellationToken {
    fn cancel(&self) -> bool {
        if self.completed.load(Ordering::Acquire) {
            return false;
        }
        self.cancelled.store(true, Ordering::Release);
        true
    }
}

/// Settings common to every protection operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtectionCommonSettings {
    /// Correlation id the application can set to tie client and server logs
    /// together.
    #[serde(default)]
    pub application_scenario_id: Option<String>,
    /// When set, the operation must be served from cache; a `Network`
    /// error with the `Offline` category is reported if it cannot.
    #[serde(default)]
    pub is_offline_only: bool,
    /// Name/value pairs used for feature gating and testing.
    #[serde(default)]
    pub custom_settings: Vec<(String, String)>,
}

/// Settings for template listing.
#[derive(Debug, Clone, Default)]
pub struct GetTemplatesSettings {
    pub common: ProtectionCommonSettings,
    /// Set when the authenticated user acts on behalf of another user.
    pub delegated_user_email: Option<String>,
    /// Ignore a cached response and refetch.
    pub force_refresh: bool,
    /// Allow the response to be cached. On by default.
    pub enable_caching: bool,
}

impl GetTemplatesSettings {
    pub fn new() -> Self {
        Self {
            enable_caching: true,
            ..Default::default()
        }
    }
}

/// Settings for delegation-license creation.
#[derive(Debug, Clone)]
pub struct DelegationLicenseSettings {
    pub common: ProtectionCommonSettings,
    /// Publishing license of the content being delegated.
    pub serialized_publishing_license: Vec<u8>,
    /// Users the licenses are created for.
    pub users: Vec<String>,
    /// Also acquire end-user licenses, not just delegation ones.
    pub acquire_end_user_licenses: bool,
}

/// Configuration an engine is created with.
#[derive(Clone)]
pub struct EngineSettings {
    /// Unique engine id; generated when the application does not pass one
    /// to reuse cached state.
    pub engine_id: String,
    pub identity: Identity,
    /// Opaque application data persisted with the engine.
    pub client_data: String,
    /// BCP 47 locale for service-provided strings.
    pub locale: String,
    /// Correlation id for this engine's service sessions.
    pub session_id: String,
    pub cloud: Cloud,
    pub data_boundary: DataBoundary,
    /// Base URL for all service requests when `cloud` is `Custom`.
    pub cloud_endpoint_base_url: Option<String>,
    pub auth_delegate: Option<Arc<dyn AuthDelegate>>,
    /// How often cached templates are considered fresh.
    pub template_refresh_interval: Duration,
    /// Templates requested per batch when listing.
    pub template_batch_size: usize,
    /// Client capabilities passed to the service when fetching usage
    /// rights.
    pub capabilities: Vec<String>,
}

impl EngineSettings {
    pub fn new(identity: Identity) -> Self {
        Self {
            engine_id: format!("{{{}}}", uuid::Uuid::new_v4()),
            identity,
            client_data: String::new(),
            locale: "en-US".into(),
            session_id: format!("{{{}}}", uuid::Uuid::new_v4()),
            cloud: Cloud::default(),
            data_boundary: DataBoundary::default(),
            cloud_endpoint_base_url: None,
            auth_delegate: None,
            template_refresh_interval: Duration::from_secs(7 * 24 * 60 * 60),
            template_batch_size: 25,
            capabilities: Vec::new(),
        }
    }

    /// # Errors
    /// `BadInput` when `Custom` cloud is selected without a base URL.
    pub fn validate(&self) -> Result<()> {
        if self.cloud == Cloud::Custom && self.cloud_endpoint_base_url.is_none() {
            return Err(SdkError::BadInput(
                "custom cloud requires a cloud endpoint base url".into(),
            ));
        }
        Ok(())
    }
}

/// A protection template available to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// Tenant configuration resolved from the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantInformation {
    pub issuer_name: String,
    pub extranet_url: String,
    pub intranet_url: String,
    pub tenant_id: String,
}

/// Service features an engine implementation may or may not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureId {
    PreLicensing,
    DoubleKey,
    DynamicWatermarking,
    DelegationLicenses,
    TrackingAndRevocation,
}

/// Callbacks for the engine's async operations.
///
/// Default bodies are no-ops so an observer only overrides the pairs it
/// cares about.
#[allow(unused_variables)]
pub trait ProtectionEngineObserver: Send + Sync {
    fn on_get_templates_success(
        &self,
        templates: Vec<TemplateDescriptor>,
        context: ObserverContext,
    ) {
    }
    fn on_get_templates_failure(&self, error: SdkError, context: ObserverContext) {}

    fn on_get_rights_for_label_id_success(&self, rights: Vec<String>, context: ObserverContext) {}
    fn on_get_rights_for_label_id_failure(&self, error: SdkError, context: ObserverContext) {}

    fn on_load_user_cert_success(&self, context: ObserverContext) {}
    fn on_load_user_cert_failure(&self, error: SdkError, context: ObserverContext) {}

    fn on_register_content_for_tracking_success(&self, context: ObserverContext) {}
    fn on_register_content_for_tracking_failure(&self, error: SdkError, context: ObserverContext) {}

    fn on_revoke_content_success(&self, context: ObserverContext) {}
    fn on_revoke_content_failure(&self, error: SdkError, context: ObserverContext) {}

    fn on_create_delegation_licenses_success(
        &self,
        licenses: Vec<DelegationLicense>,
        context: ObserverContext,
    ) {
    }
    fn on_create_delegation_licenses_failure(&self, error: SdkError, context: ObserverContext) {}

    fn on_get_tenant_information_success(
        &self,
        tenant: TenantInformation,
        context: ObserverContext,
    ) {
    }
    fn on_get_tenant_information_failure(&self, error: SdkError, context: ObserverContext) {}

    fn on_get_license_rights_data_success(
        &self,
        data: LicenseRightsData,
        context: ObserverContext,
    ) {
    }
    fn on_get_license_rights_data_failure(&self, error: SdkError, context: ObserverContext) {}
}

/// The engine contract. Implemented outside this crate by a
/// service-backed component.
pub trait ProtectionEngine: Send + Sync {
    fn settings(&self) -> &EngineSettings;

    /// Whether the backing implementation supports `feature`.
    fn is_feature_supported(&self, feature: FeatureId) -> bool;

    fn get_templates(&self, settings: &GetTemplatesSettings) -> Result<Vec<TemplateDescriptor>>;

    fn get_templates_async(
        &self,
        settings: GetTemplatesSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;

    /// Rights granted to the user for content labeled `label_id`.
    fn get_rights_for_label_id(
        &self,
        document_id: &str,
        label_id: &str,
        owner_email: Option<&str>,
        delegated_user_email: Option<&str>,
        settings: &ProtectionCommonSettings,
    ) -> Result<Vec<String>>;

    fn get_rights_for_label_id_async(
        &self,
        document_id: String,
        label_id: String,
        owner_email: Option<String>,
        delegated_user_email: Option<String>,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;

    /// Rights plus watermark info for a label, without creating a handler.
    fn get_license_info_for_label_id(
        &self,
        label_id: &str,
        owner_email: Option<&str>,
        settings: &ProtectionCommonSettings,
    ) -> Result<LicenseInfo>;

    fn create_protection_handler_for_publishing(
        &self,
        settings: PublishingSettings,
    ) -> Result<Arc<dyn ProtectionHandler>>;

    fn create_protection_handler_for_publishing_async(
        &self,
        settings: PublishingSettings,
        observer: Arc<dyn ProtectionHandlerObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;

    fn create_protection_handler_for_consumption(
        &self,
        settings: ConsumptionSettings,
    ) -> Result<Arc<dyn ProtectionHandler>>;

    fn create_protection_handler_for_consumption_async(
        &self,
        settings: ConsumptionSettings,
        observer: Arc<dyn ProtectionHandlerObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;

    /// Pre-fetch the user certificate so later publishing calls avoid a
    /// service round-trip.
    fn load_user_cert(&self, settings: &ProtectionCommonSettings) -> Result<()>;

    fn load_user_cert_async(
        &self,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;

    fn register_content_for_tracking_and_revocation(
        &self,
        serialized_publishing_license: &[u8],
        content_name: &str,
        is_owner_notified: bool,
        settings: &ProtectionCommonSettings,
    ) -> Result<()>;

    fn register_content_for_tracking_and_revocation_async(
        &self,
        serialized_publishing_license: Vec<u8>,
        content_name: String,
        is_owner_notified: bool,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;

    fn revoke_content(
        &self,
        serialized_publishing_license: &[u8],
        settings: &ProtectionCommonSettings,
    ) -> Result<()>;

    fn revoke_content_async(
        &self,
        serialized_publishing_license: Vec<u8>,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;

    fn create_delegation_licenses(
        &self,
        settings: DelegationLicenseSettings,
    ) -> Result<Vec<DelegationLicense>>;

    fn create_delegation_licenses_async(
        &self,
        settings: DelegationLicenseSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;

    fn get_tenant_information(
        &self,
        settings: &ProtectionCommonSettings,
    ) -> Result<TenantInformation>;

    fn get_tenant_information_async(
        &self,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;

    /// Parse the rights data out of a publishing license via the service.
    fn get_license_rights_data(
        &self,
        serialized_publishing_license: &[u8],
        settings: &ProtectionCommonSettings,
    ) -> Result<LicenseRightsData>;

    fn get_license_rights_data_async(
        &self,
        serialized_publishing_license: Vec<u8>,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancellation_token_flips_once() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert!(token.cancel());
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_after_completion_is_refused() {
        let token = CancellationToken::new();
        token.complete();
        assert!(!token.cancel());
        assert!(!token.is_cancelled());
    }

    #[test]
    fn engine_settings_default_shape() {
        let settings = EngineSettings::new(Identity::new("alice@contoso.com"));
        assert!(settings.engine_id.starts_with('{'));
        assert_eq!(settings.locale, "en-US");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn custom_cloud_requires_base_url() {
        let mut settings = EngineSettings::new(Identity::new("alice@contoso.com"));
        settings.cloud = Cloud::Custom;
        assert!(settings.validate().is_err());

        settings.cloud_endpoint_base_url = Some("https://rms.contoso.com".into());
        assert!(settings.validate().is_ok());
    }
}

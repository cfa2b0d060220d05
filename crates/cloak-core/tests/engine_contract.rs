//! Exercises the engine/handler contracts end to end with an in-memory
//! test double standing in for the service-backed implementation.

use std::sync::{Arc, Mutex};

use cloak_core::descriptor::{ProtectionDescriptor, ProtectionDescriptorBuilder, UserRights};
use cloak_core::engine::{
    AsyncControl, CancellationToken, DelegationLicenseSettings, EngineSettings, FeatureId,
    GetTemplatesSettings, ObserverContext, ProtectionCommonSettings, ProtectionEngine,
    ProtectionEngineObserver, TemplateDescriptor, TenantInformation,
};
use cloak_core::handler::{
    CipherMode, ConsumptionSettings, ProtectionHandler, ProtectionHandlerObserver,
    PublishingSettings,
};
use cloak_core::license::{
    DelegationLicense, LicenseInfo, LicenseRightsData, PreLicenseFormat, PublishingLicenseInfo,
};
use cloak_core::rights;
use cloak_core::stream::buffer::BufferStream;
use cloak_core::stream::Stream;
use cloak_core::types::Identity;
use cloak_core::{Result, SdkError};

struct FakeHandler {
    descriptor: Arc<ProtectionDescriptor>,
    issued_to: String,
    rights: Vec<String>,
    license: Vec<u8>,
}

impl ProtectionHandler for FakeHandler {
    fn create_protected_stream(
        &self,
        backing: Box<dyn Stream>,
        _content_start: i64,
        _content_size: i64,
    ) -> Result<Box<dyn Stream>> {
        Ok(backing)
    }

    fn encrypt_buffer(
        &self,
        _offset: i64,
        input: &[u8],
        output: &mut [u8],
        _is_final: bool,
    ) -> Result<i64> {
        if output.len() < input.len() {
            return Err(SdkError::InsufficientBuffer {
                needed: input.len(),
                provided: output.len(),
            });
        }
        output[..input.len()].copy_from_slice(input);
        Ok(input.len() as i64)
    }

    fn decrypt_buffer(
        &self,
        offset: i64,
        input: &[u8],
        output: &mut [u8],
        is_final: bool,
    ) -> Result<i64> {
        self.encrypt_buffer(offset, input, output, is_final)
    }

    fn protected_content_length(&self, unprotected_length: i64, _includes_final_block: bool) -> i64 {
        unprotected_length
    }

    fn block_size(&self) -> i64 {
        4096
    }

    fn rights(&self) -> Vec<String> {
        self.rights.clone()
    }

    fn access_check(&self, right: &str) -> bool {
        self.rights.iter().any(|r| r == right)
    }

    fn issued_to(&self) -> String {
        self.issued_to.clone()
    }

    fn owner(&self) -> String {
        self.descriptor.owner().to_owned()
    }

    fn is_issued_to_owner(&self) -> bool {
        self.issued_to == self.descriptor.owner()
    }

    fn protection_descriptor(&self) -> Arc<ProtectionDescriptor> {
        self.descriptor.clone()
    }

    fn content_id(&self) -> String {
        self.descriptor.content_id().to_owned()
    }

    fn uses_deprecated_algorithms(&self) -> bool {
        false
    }

    fn uses_application_defined_padding(&self) -> bool {
        false
    }

    fn is_audited_extract_allowed(&self) -> bool {
        false
    }

    fn serialized_publishing_license(&self) -> Vec<u8> {
        self.license.clone()
    }

    fn serialized_pre_license(&self, _format: PreLicenseFormat) -> Vec<u8> {
        Vec::new()
    }

    fn cipher_mode(&self) -> CipherMode {
        CipherMode::Cbc4k
    }
}

struct FakeEngine {
    settings: EngineSettings,
    templates: Vec<TemplateDescriptor>,
}

impl FakeEngine {
    fn new() -> Self {
        Self {
            settings: EngineSettings::new(Identity::new("alice@contoso.com")),
            templates: vec![TemplateDescriptor {
                id: "tmpl-1".into(),
                name: "Confidential".into(),
                description: "All employees".into(),
            }],
        }
    }

    fn handler_for(&self, descriptor: Arc<ProtectionDescriptor>, license: Vec<u8>) -> FakeHandler {
        let user = self.settings.identity.email.clone();
        let rights = descriptor
            .user_rights()
            .iter()
            .filter(|ur| ur.users.iter().any(|u| u == &user))
            .flat_map(|ur| ur.rights.iter().cloned())
            .collect();
        FakeHandler {
            descriptor,
            issued_to: user,
            rights,
            license,
        }
    }

    fn finished() -> Arc<dyn AsyncControl> {
        let token = CancellationToken::new();
        token.complete();
        token
    }
}

impl ProtectionEngine for FakeEngine {
    fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    fn is_feature_supported(&self, feature: FeatureId) -> bool {
        !matches!(feature, FeatureId::DoubleKey)
    }

    fn get_templates(&self, _settings: &GetTemplatesSettings) -> Result<Vec<TemplateDescriptor>> {
        Ok(self.templates.clone())
    }

    fn get_templates_async(
        &self,
        settings: GetTemplatesSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.get_templates(&settings) {
            Ok(templates) => observer.on_get_templates_success(templates, context),
            Err(error) => observer.on_get_templates_failure(error, context),
        }
        Self::finished()
    }

    fn get_rights_for_label_id(
        &self,
        _document_id: &str,
        label_id: &str,
        _owner_email: Option<&str>,
        _delegated_user_email: Option<&str>,
        _settings: &ProtectionCommonSettings,
    ) -> Result<Vec<String>> {
        if label_id == "known-label" {
            Ok(vec![rights::VIEW.into(), rights::EDIT.into()])
        } else {
            Err(SdkError::LabelNotFound(label_id.into()))
        }
    }

    fn get_rights_for_label_id_async(
        &self,
        document_id: String,
        label_id: String,
        owner_email: Option<String>,
        delegated_user_email: Option<String>,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.get_rights_for_label_id(
            &document_id,
            &label_id,
            owner_email.as_deref(),
            delegated_user_email.as_deref(),
            &settings,
        ) {
            Ok(rights) => observer.on_get_rights_for_label_id_success(rights, context),
            Err(error) => observer.on_get_rights_for_label_id_failure(error, context),
        }
        Self::finished()
    }

    fn get_license_info_for_label_id(
        &self,
        label_id: &str,
        owner_email: Option<&str>,
        settings: &ProtectionCommonSettings,
    ) -> Result<LicenseInfo> {
        Ok(LicenseInfo {
            user_rights: self.get_rights_for_label_id("", label_id, owner_email, None, settings)?,
            dynamic_watermark: None,
        })
    }

    fn create_protection_handler_for_publishing(
        &self,
        settings: PublishingSettings,
    ) -> Result<Arc<dyn ProtectionHandler>> {
        let license = format!("pl:{}", settings.descriptor.content_id()).into_bytes();
        Ok(Arc::new(self.handler_for(settings.descriptor, license)))
    }

    fn create_protection_handler_for_publishing_async(
        &self,
        settings: PublishingSettings,
        observer: Arc<dyn ProtectionHandlerObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.create_protection_handler_for_publishing(settings) {
            Ok(handler) => observer.on_create_handler_success(handler, context),
            Err(error) => observer.on_create_handler_failure(error, context),
        }
        Self::finished()
    }

    fn create_protection_handler_for_consumption(
        &self,
        settings: ConsumptionSettings,
    ) -> Result<Arc<dyn ProtectionHandler>> {
        let descriptor = Arc::new(
            ProtectionDescriptorBuilder::from_user_rights(vec![UserRights::new(
                vec![self.settings.identity.email.clone()],
                vec![rights::VIEW.into()],
            )])
            .build()?,
        );
        let license = settings.license_info.serialized_publishing_license().to_vec();
        Ok(Arc::new(self.handler_for(descriptor, license)))
    }

    fn create_protection_handler_for_consumption_async(
        &self,
        settings: ConsumptionSettings,
        observer: Arc<dyn ProtectionHandlerObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.create_protection_handler_for_consumption(settings) {
            Ok(handler) => observer.on_create_handler_success(handler, context),
            Err(error) => observer.on_create_handler_failure(error, context),
        }
        Self::finished()
    }

    fn load_user_cert(&self, _settings: &ProtectionCommonSettings) -> Result<()> {
        Ok(())
    }

    fn load_user_cert_async(
        &self,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.load_user_cert(&settings) {
            Ok(()) => observer.on_load_user_cert_success(context),
            Err(error) => observer.on_load_user_cert_failure(error, context),
        }
        Self::finished()
    }

    fn register_content_for_tracking_and_revocation(
        &self,
        serialized_publishing_license: &[u8],
        _content_name: &str,
        _is_owner_notified: bool,
        _settings: &ProtectionCommonSettings,
    ) -> Result<()> {
        if serialized_publishing_license.is_empty() {
            return Err(SdkError::BadInput("empty publishing license".into()));
        }
        Ok(())
    }

    fn register_content_for_tracking_and_revocation_async(
        &self,
        serialized_publishing_license: Vec<u8>,
        content_name: String,
        is_owner_notified: bool,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.register_content_for_tracking_and_revocation(
            &serialized_publishing_license,
            &content_name,
            is_owner_notified,
            &settings,
        ) {
            Ok(()) => observer.on_register_content_for_tracking_success(context),
            Err(error) => observer.on_register_content_for_tracking_failure(error, context),
        }
        Self::finished()
    }

    fn revoke_content(
        &self,
        serialized_publishing_license: &[u8],
        _settings: &ProtectionCommonSettings,
    ) -> Result<()> {
        if serialized_publishing_license.is_empty() {
            return Err(SdkError::LicenseNotRegistered);
        }
        Ok(())
    }

    fn revoke_content_async(
        &self,
        serialized_publishing_license: Vec<u8>,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.revoke_content(&serialized_publishing_license, &settings) {
            Ok(()) => observer.on_revoke_content_success(context),
            Err(error) => observer.on_revoke_content_failure(error, context),
        }
        Self::finished()
    }

    fn create_delegation_licenses(
        &self,
        settings: DelegationLicenseSettings,
    ) -> Result<Vec<DelegationLicense>> {
        Ok(settings
            .users
            .iter()
            .map(|user| {
                DelegationLicense::new(
                    user.clone(),
                    settings.serialized_publishing_license.clone(),
                    PreLicenseFormat::Xml,
                )
            })
            .collect())
    }

    fn create_delegation_licenses_async(
        &self,
        settings: DelegationLicenseSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.create_delegation_licenses(settings) {
            Ok(licenses) => observer.on_create_delegation_licenses_success(licenses, context),
            Err(error) => observer.on_create_delegation_licenses_failure(error, context),
        }
        Self::finished()
    }

    fn get_tenant_information(
        &self,
        _settings: &ProtectionCommonSettings,
    ) -> Result<TenantInformation> {
        Ok(TenantInformation {
            issuer_name: "Contoso".into(),
            extranet_url: "https://rms.contoso.com".into(),
            intranet_url: String::new(),
            tenant_id: "11111111-2222-3333-4444-555555555555".into(),
        })
    }

    fn get_tenant_information_async(
        &self,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.get_tenant_information(&settings) {
            Ok(tenant) => observer.on_get_tenant_information_success(tenant, context),
            Err(error) => observer.on_get_tenant_information_failure(error, context),
        }
        Self::finished()
    }

    fn get_license_rights_data(
        &self,
        serialized_publishing_license: &[u8],
        _settings: &ProtectionCommonSettings,
    ) -> Result<LicenseRightsData> {
        if serialized_publishing_license.is_empty() {
            return Err(SdkError::BadInput("empty publishing license".into()));
        }
        Ok(LicenseRightsData::new(
            cloak_core::descriptor::ProtectionType::Custom,
            vec![],
            None,
        ))
    }

    fn get_license_rights_data_async(
        &self,
        serialized_publishing_license: Vec<u8>,
        settings: ProtectionCommonSettings,
        observer: Arc<dyn ProtectionEngineObserver>,
        context: ObserverContext,
    ) -> Arc<dyn AsyncControl> {
        match self.get_license_rights_data(&serialized_publishing_license, &settings) {
            Ok(data) => observer.on_get_license_rights_data_success(data, context),
            Err(error) => observer.on_get_license_rights_data_failure(error, context),
        }
        Self::finished()
    }
}

#[derive(Default)]
struct RecordingObserver {
    templates: Mutex<Vec<TemplateDescriptor>>,
    failures: Mutex<Vec<String>>,
    contexts: Mutex<Vec<String>>,
}

impl ProtectionEngineObserver for RecordingObserver {
    fn on_get_templates_success(
        &self,
        templates: Vec<TemplateDescriptor>,
        context: ObserverContext,
    ) {
        self.templates.lock().unwrap().extend(templates);
        if let Some(tag) = context.downcast_ref::<String>() {
            self.contexts.lock().unwrap().push(tag.clone());
        }
    }

    fn on_get_rights_for_label_id_failure(&self, error: SdkError, _context: ObserverContext) {
        self.failures.lock().unwrap().push(error.to_string());
    }
}

#[test]
fn async_templates_deliver_through_observer_with_context() {
    let engine = FakeEngine::new();
    let observer = Arc::new(RecordingObserver::default());
    let context: ObserverContext = Arc::new("call-42".to_owned());

    let control = engine.get_templates_async(
        GetTemplatesSettings::new(),
        observer.clone(),
        context,
    );

    assert_eq!(observer.templates.lock().unwrap().len(), 1);
    assert_eq!(observer.contexts.lock().unwrap()[0], "call-42");
    // operation already completed, so cancellation is refused
    assert!(!control.cancel());
}

#[test]
fn async_failure_reaches_failure_callback() {
    let engine = FakeEngine::new();
    let observer = Arc::new(RecordingObserver::default());
    let context: ObserverContext = Arc::new(());

    engine.get_rights_for_label_id_async(
        "doc-1".into(),
        "missing-label".into(),
        None,
        None,
        ProtectionCommonSettings::default(),
        observer.clone(),
        context,
    );

    let failures = observer.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("missing-label"));
}

#[test]
fn publishing_handler_reflects_descriptor_rights() {
    let engine = FakeEngine::new();
    let descriptor = Arc::new(
        ProtectionDescriptorBuilder::from_user_rights(vec![
            UserRights::new(
                vec!["alice@contoso.com".into()],
                vec![rights::VIEW.into(), rights::EXPORT.into()],
            ),
            UserRights::new(vec!["owner@contoso.com".into()], vec![rights::OWNER.into()]),
        ])
        .build()
        .unwrap(),
    );

    let handler = engine
        .create_protection_handler_for_publishing(PublishingSettings::new(descriptor.clone()))
        .unwrap();

    assert_eq!(handler.issued_to(), "alice@contoso.com");
    assert!(handler.access_check(rights::VIEW));
    assert!(handler.access_check(rights::EXPORT));
    assert!(!handler.access_check(rights::OWNER));
    assert!(!handler.is_issued_to_owner());
    assert_eq!(handler.content_id(), descriptor.content_id());
    assert!(!handler.serialized_publishing_license().is_empty());
}

#[test]
fn consumption_handler_round_trips_license_bytes() {
    let engine = FakeEngine::new();
    let license = PublishingLicenseInfo::new(b"serialized-pl".to_vec());
    let handler = engine
        .create_protection_handler_for_consumption(ConsumptionSettings::new(license))
        .unwrap();

    assert_eq!(handler.serialized_publishing_license(), b"serialized-pl");
    assert_eq!(handler.cipher_mode(), CipherMode::Cbc4k);

    // the protected stream wraps the backing stream
    let backing = Box::new(BufferStream::new(b"protected-bytes".to_vec()));
    let mut stream = handler.create_protected_stream(backing, 0, 15).unwrap();
    let mut buf = [0u8; 9];
    assert_eq!(stream.read(&mut buf), 9);
    assert_eq!(&buf, b"protected");
}

#[test]
fn encrypt_buffer_enforces_output_capacity() {
    let engine = FakeEngine::new();
    let descriptor = Arc::new(
        ProtectionDescriptorBuilder::from_user_rights(vec![UserRights::new(
            vec!["alice@contoso.com".into()],
            vec![rights::VIEW.into()],
        )])
        .build()
        .unwrap(),
    );
    let handler = engine
        .create_protection_handler_for_publishing(PublishingSettings::new(descriptor))
        .unwrap();

    let mut small = [0u8; 2];
    let err = handler
        .encrypt_buffer(0, b"payload", &mut small, true)
        .unwrap_err();
    assert!(matches!(err, SdkError::InsufficientBuffer { needed: 7, provided: 2 }));
}

#[test]
fn delegation_licenses_cover_all_users() {
    let engine = FakeEngine::new();
    let licenses = engine
        .create_delegation_licenses(DelegationLicenseSettings {
            common: ProtectionCommonSettings::default(),
            serialized_publishing_license: b"pl".to_vec(),
            users: vec!["a@contoso.com".into(), "b@contoso.com".into()],
            acquire_end_user_licenses: false,
        })
        .unwrap();
    assert_eq!(licenses.len(), 2);
    assert_eq!(licenses[0].user(), "a@contoso.com");
}

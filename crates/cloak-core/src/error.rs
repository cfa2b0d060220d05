//! Unified SDK error codes and error type.
//!
//! Every failure surfaced by the SDK carries a stable numeric code that can
//! go into logs, CLI messages, or across the C ABI to explain *why* an
//! operation failed.

use core::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, SdkError>;

/// Stable numeric error codes.
///
/// Layout idea:
///   1xxx = bad input / content
///   2xxx = auth / access
///   3xxx = service / network
///   9xxx = generic internal
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // 1xxx: bad input / content
    BadInput = 1001,
    InsufficientBuffer = 1002,
    TemplateNotFound = 1003,
    TemplateArchived = 1004,
    LabelNotFound = 1005,
    LabelDisabled = 1006,
    ContentFormatNotSupported = 1007,
    LicenseNotRegistered = 1008,

    // 2xxx: auth / access
    AccessDenied = 2001,
    NoPermissions = 2002,
    NoAuthToken = 2003,
    PrivilegedRequired = 2004,
    ConsentDenied = 2005,

    // 3xxx: service / network
    Network = 3001,
    ProxyAuthentication = 3002,
    ServiceDisabled = 3003,
    NoPolicy = 3004,
    OperationCancelled = 3005,
    AdhocProtectionRequired = 3006,
    DeprecatedApi = 3007,

    // 9xxx: generic
    Internal = 9000,
    NotSupported = 9001,
    FileIo = 9002,
    Serialization = 9003,
}

impl ErrorCode {
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Short human-readable description.
    pub fn description(self) -> &'static str {
        match self {
            // 1xxx
            ErrorCode::BadInput => "invalid input",
            ErrorCode::InsufficientBuffer => "provided buffer too small",
            ErrorCode::TemplateNotFound => "protection template not found",
            ErrorCode::TemplateArchived => "protection template archived",
            ErrorCode::LabelNotFound => "label not found",
            ErrorCode::LabelDisabled => "label disabled",
            ErrorCode::ContentFormatNotSupported => "content format not supported",
            ErrorCode::LicenseNotRegistered => "license not registered for tracking",

            // 2xxx
            ErrorCode::AccessDenied => "access denied",
            ErrorCode::NoPermissions => "user has no rights to the content",
            ErrorCode::NoAuthToken => "auth delegate provided no token",
            ErrorCode::PrivilegedRequired => "privileged assignment method required",
            ErrorCode::ConsentDenied => "consent was rejected",

            // 3xxx
            ErrorCode::Network => "network failure",
            ErrorCode::ProxyAuthentication => "proxy authentication required",
            ErrorCode::ServiceDisabled => "service disabled for this scope",
            ErrorCode::NoPolicy => "no policy configured for tenant",
            ErrorCode::OperationCancelled => "operation cancelled",
            ErrorCode::AdhocProtectionRequired => "label requires ad-hoc protection",
            ErrorCode::DeprecatedApi => "API is deprecated",

            // 9xxx
            ErrorCode::Internal => "internal SDK error",
            ErrorCode::NotSupported => "operation not supported",
            ErrorCode::FileIo => "file I/O failure",
            ErrorCode::Serialization => "serialization failure",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_u16(), self.description())
    }
}

/// Network failure classification, reported alongside [`SdkError::Network`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkCategory {
    FailureResponseCode,
    BadResponse,
    UnexpectedResponse,
    NoConnection,
    Proxy,
    Tls,
    Timeout,
    Offline,
    Throttled,
    Cancelled,
}

/// Why a user has no permissions to content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPermissionsCategory {
    UserNotFound,
    AccessDenied,
    AccessExpired,
    InvalidEmail,
    Unknown,
}

/// Scope at which a service was disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceDisabledExtent {
    User,
    Device,
    Platform,
    Tenant,
}

/// Why no policy is available for the tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoPolicyCategory {
    SyncFile,
    LabelsDisabled,
}

/// Errors reported (returned) from the SDK surface.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("bad input: {0}")]
    BadInput(String),

    #[error("insufficient buffer: need {needed} bytes, got {provided}")]
    InsufficientBuffer { needed: usize, provided: usize },

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("template archived: {0}")]
    TemplateArchived(String),

    #[error("label not found: {0}")]
    LabelNotFound(String),

    #[error("label disabled: {0}")]
    LabelDisabled(String),

    #[error("content format not supported: {0}")]
    ContentFormatNotSupported(String),

    #[error("license not registered for tracking")]
    LicenseNotRegistered,

    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("no permissions ({category:?}): {message}")]
    NoPermissions {
        category: NoPermissionsCategory,
        message: String,
        /// Contact URI or email for requesting access, when known.
        referrer: Option<String>,
        /// Content owner, when known.
        owner: Option<String>,
    },

    #[error("no auth token provided")]
    NoAuthToken,

    #[error("privileged assignment method required: {0}")]
    PrivilegedRequired(String),

    #[error("consent denied for {url}")]
    ConsentDenied { url: String },

    #[error("network failure ({category:?}): {message}")]
    Network {
        category: NetworkCategory,
        message: String,
    },

    #[error("proxy authentication required for {0}")]
    ProxyAuthentication(String),

    #[error("service disabled at {extent:?} scope: {message}")]
    ServiceDisabled {
        extent: ServiceDisabledExtent,
        message: String,
    },

    #[error("no policy ({category:?}) for tenant")]
    NoPolicy { category: NoPolicyCategory },

    #[error("operation cancelled: {0}")]
    OperationCancelled(String),

    #[error("label requires ad-hoc protection to be set")]
    AdhocProtectionRequired,

    #[error("deprecated API: {0}")]
    DeprecatedApi(String),

    #[error("not supported: {0}")]
    NotSupported(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("file I/O error: {0}")]
    FileIo(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SdkError {
    /// The stable numeric code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SdkError::BadInput(_) => ErrorCode::BadInput,
            SdkError::InsufficientBuffer { .. } => ErrorCode::InsufficientBuffer,
            SdkError::TemplateNotFound(_) => ErrorCode::TemplateNotFound,
            SdkError::TemplateArchived(_) => ErrorCode::TemplateArchived,
            SdkError::LabelNotFound(_) => ErrorCode::LabelNotFound,
            SdkError::LabelDisabled(_) => ErrorCode::LabelDisabled,
            SdkError::ContentFormatNotSupported(_) => ErrorCode::ContentFormatNotSupported,
            SdkError::LicenseNotRegistered => ErrorCode::LicenseNotRegistered,
            SdkError::AccessDenied(_) => ErrorCode::AccessDenied,
            SdkError::NoPermissions { .. } => ErrorCode::NoPermissions,
            SdkError::NoAuthToken => ErrorCode::NoAuthToken,
            SdkError::PrivilegedRequired(_) => ErrorCode::PrivilegedRequired,
            SdkError::ConsentDenied { .. } => ErrorCode::ConsentDenied,
            SdkError::Network { .. } => ErrorCode::Network,
            SdkError::ProxyAuthentication(_) => ErrorCode::ProxyAuthentication,
            SdkError::ServiceDisabled { .. } => ErrorCode::ServiceDisabled,
            SdkError::NoPolicy { .. } => ErrorCode::NoPolicy,
            SdkError::OperationCancelled(_) => ErrorCode::OperationCancelled,
            SdkError::AdhocProtectionRequired => ErrorCode::AdhocProtectionRequired,
            SdkError::DeprecatedApi(_) => ErrorCode::DeprecatedApi,
            SdkError::NotSupported(_) => ErrorCode::NotSupported,
            SdkError::Internal(_) => ErrorCode::Internal,
            SdkError::FileIo(_) => ErrorCode::FileIo,
            SdkError::Json(_) => ErrorCode::Serialization,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(ErrorCode::BadInput.as_u16(), 1001);
        assert_eq!(ErrorCode::NoPermissions.as_u16(), 2002);
        assert_eq!(ErrorCode::Network.as_u16(), 3001);
        assert_eq!(ErrorCode::NotSupported.as_u16(), 9001);
    }

    #[test]
    fn error_maps_to_code() {
        let e = SdkError::BadInput("position must not be less than zero".into());
        assert_eq!(e.code(), ErrorCode::BadInput);

        let e = SdkError::NoPermissions {
            category: NoPermissionsCategory::AccessDenied,
            message: "a minimum right of EXPORT is required".into(),
            referrer: None,
            owner: Some("owner@contoso.com".into()),
        };
        assert_eq!(e.code(), ErrorCode::NoPermissions);
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let e = SdkError::from(io);
        assert_eq!(e.code(), ErrorCode::FileIo);
    }
}

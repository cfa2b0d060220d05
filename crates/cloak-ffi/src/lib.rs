//! C ABI over the cloak value types.
//!
//! Conventions, shared by every function here:
//! - objects cross the boundary as opaque handles created by `*_create`
//!   functions and destroyed by the matching `*_release`;
//! - strings come back through the two-call pattern: a `*_size` call
//!   reports the needed capacity (including the NUL terminator), then the
//!   getter fills a caller-provided buffer;
//! - every function is null-safe and reports failures through
//!   [`CloakResult`], never by unwinding across the boundary.

use std::os::raw::c_char;

pub mod descriptor;
pub mod license;
pub mod watermark;

use cloak_core::error::ErrorCode;
use cloak_core::SdkError;

/// Status of a C ABI call.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloakResult {
    Success = 0,
    BadInput = 1,
    InsufficientBuffer = 2,
    NotSupported = 3,
    Failure = 4,
}

impl From<&SdkError> for CloakResult {
    fn from(error: &SdkError) -> Self {
        match error.code() {
            ErrorCode::BadInput => CloakResult::BadInput,
            ErrorCode::InsufficientBuffer => CloakResult::InsufficientBuffer,
            ErrorCode::NotSupported => CloakResult::NotSupported,
            _ => CloakResult::Failure,
        }
    }
}

/// Borrow a UTF-8 C string; `BadInput` for null or invalid bytes.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string.
pub(crate) unsafe fn str_arg<'a>(ptr: *const c_char) -> Result<&'a str, CloakResult> {
    if ptr.is_null() {
        return Err(CloakResult::BadInput);
    }
    std::ffi::CStr::from_ptr(ptr)
        .to_str()
        .map_err(|_| CloakResult::BadInput)
}

/// Report the buffer size `value` needs, including the NUL terminator.
pub(crate) unsafe fn write_size(value: &str, size: *mut usize) -> CloakResult {
    if size.is_null() {
        return CloakResult::BadInput;
    }
    *size = value.len() + 1;
    CloakResult::Success
}

/// Copy `value` into `buffer` with a NUL terminator.
///
/// `actual` (optional) receives the needed size, so a caller that guessed
/// a capacity can retry after `InsufficientBuffer`.
pub(crate) unsafe fn write_string(
    value: &str,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if !actual.is_null() {
        *actual = value.len() + 1;
    }
    if buffer.is_null() {
        return CloakResult::BadInput;
    }
    if capacity < value.len() + 1 {
        return CloakResult::InsufficientBuffer;
    }
    std::ptr::copy_nonoverlapping(value.as_ptr(), buffer.cast::<u8>(), value.len());
    *buffer.add(value.len()) = 0;
    CloakResult::Success
}

/// Drop a handle previously produced by `Box::into_raw`. Null is a no-op.
pub(crate) unsafe fn release<T>(handle: *mut T) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

//! Dynamic watermark over the C ABI.

use std::os::raw::c_char;

use chrono::Utc;

use cloak_core::watermark::{DynamicWatermark, WatermarkContext};

use crate::{release, str_arg, write_size, write_string, CloakResult};

/// Opaque watermark handle.
pub struct CloakDynamicWatermark(DynamicWatermark);

/// # Safety
/// `format_string` must be a valid C string; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_dynamic_watermark_create(
    format_string: *const c_char,
    out: *mut *mut CloakDynamicWatermark,
) -> CloakResult {
    if out.is_null() {
        return CloakResult::BadInput;
    }
    match str_arg(format_string) {
        Ok(s) => {
            *out = Box::into_raw(Box::new(CloakDynamicWatermark(DynamicWatermark::new(s))));
            CloakResult::Success
        }
        Err(r) => r,
    }
}

/// # Safety
/// `watermark` must be a live watermark handle; `size` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_dynamic_watermark_format_string_size(
    watermark: *const CloakDynamicWatermark,
    size: *mut usize,
) -> CloakResult {
    if watermark.is_null() {
        return CloakResult::BadInput;
    }
    write_size((*watermark).0.format_string(), size)
}

/// # Safety
/// `watermark` must be a live watermark handle; `buffer` must hold
/// `capacity` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn cloak_dynamic_watermark_format_string(
    watermark: *const CloakDynamicWatermark,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if watermark.is_null() {
        return CloakResult::BadInput;
    }
    write_string((*watermark).0.format_string(), buffer, capacity, actual)
}

/// Resolve the watermark text for `principal_name` at the current time.
///
/// # Safety
/// `watermark` must be a live watermark handle; `principal_name` a valid
/// C string; `buffer` must hold `capacity` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn cloak_dynamic_watermark_text(
    watermark: *const CloakDynamicWatermark,
    principal_name: *const c_char,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if watermark.is_null() {
        return CloakResult::BadInput;
    }
    let principal = match str_arg(principal_name) {
        Ok(s) => s,
        Err(r) => return r,
    };
    let context = WatermarkContext::new(principal, Utc::now());
    let text = (*watermark).0.text(&context);
    write_string(&text, buffer, capacity, actual)
}

/// # Safety
/// `watermark` must be null or a handle this module produced.
#[no_mangle]
pub unsafe extern "C" fn cloak_dynamic_watermark_release(watermark: *mut CloakDynamicWatermark) {
    release(watermark);
}

//! License info over the C ABI.

use std::os::raw::c_char;

use cloak_core::license::LicenseInfo;

use crate::{release, str_arg, write_string, CloakResult};

/// Opaque license-info handle.
pub struct CloakLicenseInfo(LicenseInfo);

/// Build a license-info handle from a rights array.
///
/// # Safety
/// `rights` must point to `right_count` valid C strings; `out` must be
/// writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_license_info_create(
    rights: *const *const c_char,
    right_count: usize,
    out: *mut *mut CloakLicenseInfo,
) -> CloakResult {
    if out.is_null() || (right_count > 0 && rights.is_null()) {
        return CloakResult::BadInput;
    }
    let mut user_rights = Vec::with_capacity(right_count);
    for i in 0..right_count {
        match str_arg(*rights.add(i)) {
            Ok(s) => user_rights.push(s.to_owned()),
            Err(r) => return r,
        }
    }
    let info = LicenseInfo {
        user_rights,
        dynamic_watermark: None,
    };
    *out = Box::into_raw(Box::new(CloakLicenseInfo(info)));
    CloakResult::Success
}

/// # Safety
/// `info` must be a live license-info handle; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_license_info_right_count(
    info: *const CloakLicenseInfo,
    out: *mut usize,
) -> CloakResult {
    if info.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    *out = (*info).0.user_rights.len();
    CloakResult::Success
}

/// # Safety
/// `info` must be a live license-info handle; `buffer` must hold
/// `capacity` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn cloak_license_info_right(
    info: *const CloakLicenseInfo,
    index: usize,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if info.is_null() {
        return CloakResult::BadInput;
    }
    match (&(*info).0.user_rights).get(index) {
        Some(right) => write_string(right, buffer, capacity, actual),
        None => CloakResult::BadInput,
    }
}

/// # Safety
/// `info` must be null or a handle this module produced.
#[no_mangle]
pub unsafe extern "C" fn cloak_license_info_release(info: *mut CloakLicenseInfo) {
    release(info);
}

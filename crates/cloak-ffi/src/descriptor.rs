//! Protection descriptor and builder over the C ABI.

use std::os::raw::c_char;

use chrono::{DateTime, Utc};

use cloak_core::descriptor::{
    ProtectionDescriptor, ProtectionDescriptorBuilder, ProtectionType, UserRights,
};

use crate::{release, str_arg, write_size, write_string, CloakResult};

/// Opaque builder handle.
pub struct CloakDescriptorBuilder(ProtectionDescriptorBuilder);

/// Opaque descriptor handle.
pub struct CloakProtectionDescriptor(ProtectionDescriptor);

/// Opaque snapshot of a descriptor's users-to-rights mappings.
pub struct CloakUserRightsResult(Vec<UserRights>);

/// One users-to-rights mapping passed in from C.
#[repr(C)]
pub struct CloakUserRightsInput {
    pub users: *const *const c_char,
    pub user_count: usize,
    pub rights: *const *const c_char,
    pub right_count: usize,
}

unsafe fn collect_strings(
    items: *const *const c_char,
    count: usize,
) -> Result<Vec<String>, CloakResult> {
    if count > 0 && items.is_null() {
        return Err(CloakResult::BadInput);
    }
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        out.push(str_arg(*items.add(i))?.to_owned());
    }
    Ok(out)
}

/// Create a builder whose permissions come from a protection template.
///
/// # Safety
/// `template_id` must be a valid C string; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_descriptor_builder_create_from_template(
    template_id: *const c_char,
    out: *mut *mut CloakDescriptorBuilder,
) -> CloakResult {
    if out.is_null() {
        return CloakResult::BadInput;
    }
    let template_id = match str_arg(template_id) {
        Ok(s) => s,
        Err(r) => return r,
    };
    let builder = ProtectionDescriptorBuilder::from_template(template_id);
    *out = Box::into_raw(Box::new(CloakDescriptorBuilder(builder)));
    CloakResult::Success
}

/// Create a builder whose permissions come from users-to-rights mappings.
///
/// # Safety
/// `mappings` must point to `mapping_count` valid entries whose string
/// arrays hold valid C strings; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_descriptor_builder_create_from_user_rights(
    mappings: *const CloakUserRightsInput,
    mapping_count: usize,
    out: *mut *mut CloakDescriptorBuilder,
) -> CloakResult {
    if out.is_null() || (mapping_count > 0 && mappings.is_null()) {
        return CloakResult::BadInput;
    }
    let mut users_and_rights = Vec::with_capacity(mapping_count);
    for i in 0..mapping_count {
        let mapping = &*mappings.add(i);
        let users = match collect_strings(mapping.users, mapping.user_count) {
            Ok(v) => v,
            Err(r) => return r,
        };
        let rights = match collect_strings(mapping.rights, mapping.right_count) {
            Ok(v) => v,
            Err(r) => return r,
        };
        users_and_rights.push(UserRights::new(users, rights));
    }
    let builder = ProtectionDescriptorBuilder::from_user_rights(users_and_rights);
    *out = Box::into_raw(Box::new(CloakDescriptorBuilder(builder)));
    CloakResult::Success
}

/// # Safety
/// `builder` must be a live builder handle; `value` a valid C string.
#[no_mangle]
pub unsafe extern "C" fn cloak_descriptor_builder_set_name(
    builder: *mut CloakDescriptorBuilder,
    value: *const c_char,
) -> CloakResult {
    if builder.is_null() {
        return CloakResult::BadInput;
    }
    match str_arg(value) {
        Ok(s) => {
            (*builder).0.set_name(s);
            CloakResult::Success
        }
        Err(r) => r,
    }
}

/// # Safety
/// `builder` must be a live builder handle; `value` a valid C string.
#[no_mangle]
pub unsafe extern "C" fn cloak_descriptor_builder_set_description(
    builder: *mut CloakDescriptorBuilder,
    value: *const c_char,
) -> CloakResult {
    if builder.is_null() {
        return CloakResult::BadInput;
    }
    match str_arg(value) {
        Ok(s) => {
            (*builder).0.set_description(s);
            CloakResult::Success
        }
        Err(r) => r,
    }
}

/// # Safety
/// `builder` must be a live builder handle; `uri` a valid C string.
#[no_mangle]
pub unsafe extern "C" fn cloak_descriptor_builder_set_referrer(
    builder: *mut CloakDescriptorBuilder,
    uri: *const c_char,
) -> CloakResult {
    if builder.is_null() {
        return CloakResult::BadInput;
    }
    match str_arg(uri) {
        Ok(s) => {
            (*builder).0.set_referrer(s);
            CloakResult::Success
        }
        Err(r) => r,
    }
}

/// Set content expiry as seconds since the Unix epoch.
///
/// # Safety
/// `builder` must be a live builder handle.
#[no_mangle]
pub unsafe extern "C" fn cloak_descriptor_builder_set_content_valid_until(
    builder: *mut CloakDescriptorBuilder,
    epoch_seconds: i64,
) -> CloakResult {
    if builder.is_null() {
        return CloakResult::BadInput;
    }
    match DateTime::<Utc>::from_timestamp(epoch_seconds, 0) {
        Some(when) => {
            (*builder).0.set_content_valid_until(when);
            CloakResult::Success
        }
        None => CloakResult::BadInput,
    }
}

/// # Safety
/// `builder` must be a live builder handle.
#[no_mangle]
pub unsafe extern "C" fn cloak_descriptor_builder_set_allow_offline_access(
    builder: *mut CloakDescriptorBuilder,
    value: bool,
) -> CloakResult {
    if builder.is_null() {
        return CloakResult::BadInput;
    }
    (*builder).0.set_allow_offline_access(value);
    CloakResult::Success
}

/// Validate the builder and produce a descriptor handle.
///
/// # Safety
/// `builder` must be a live builder handle; `out` must be writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_descriptor_builder_build(
    builder: *const CloakDescriptorBuilder,
    out: *mut *mut CloakProtectionDescriptor,
) -> CloakResult {
    if builder.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    match (*builder).0.build() {
        Ok(descriptor) => {
            *out = Box::into_raw(Box::new(CloakProtectionDescriptor(descriptor)));
            CloakResult::Success
        }
        Err(e) => CloakResult::from(&e),
    }
}

/// # Safety
/// `builder` must be null or a handle this module produced.
#[no_mangle]
pub unsafe extern "C" fn cloak_descriptor_builder_release(builder: *mut CloakDescriptorBuilder) {
    release(builder);
}

/// 0 = template-based, 1 = custom.
///
/// # Safety
/// `descriptor` must be a live descriptor handle; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_protection_type(
    descriptor: *const CloakProtectionDescriptor,
    out: *mut i32,
) -> CloakResult {
    if descriptor.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    *out = match (*descriptor).0.protection_type() {
        ProtectionType::TemplateBased => 0,
        ProtectionType::Custom => 1,
    };
    CloakResult::Success
}

/// # Safety
/// `descriptor` must be a live descriptor handle; `size` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_name_size(
    descriptor: *const CloakProtectionDescriptor,
    size: *mut usize,
) -> CloakResult {
    if descriptor.is_null() {
        return CloakResult::BadInput;
    }
    write_size((*descriptor).0.name(), size)
}

/// # Safety
/// `descriptor` must be a live descriptor handle; `buffer` must hold
/// `capacity` writable bytes.
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_name(
    descriptor: *const CloakProtectionDescriptor,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if descriptor.is_null() {
        return CloakResult::BadInput;
    }
    write_string((*descriptor).0.name(), buffer, capacity, actual)
}

/// # Safety
/// `descriptor` must be a live descriptor handle; `size` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_owner_size(
    descriptor: *const CloakProtectionDescriptor,
    size: *mut usize,
) -> CloakResult {
    if descriptor.is_null() {
        return CloakResult::BadInput;
    }
    write_size((*descriptor).0.owner(), size)
}

/// # Safety
/// See [`cloak_protection_descriptor_name`].
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_owner(
    descriptor: *const CloakProtectionDescriptor,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if descriptor.is_null() {
        return CloakResult::BadInput;
    }
    write_string((*descriptor).0.owner(), buffer, capacity, actual)
}

/// # Safety
/// See [`cloak_protection_descriptor_name`].
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_content_id(
    descriptor: *const CloakProtectionDescriptor,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if descriptor.is_null() {
        return CloakResult::BadInput;
    }
    write_string((*descriptor).0.content_id(), buffer, capacity, actual)
}

/// # Safety
/// See [`cloak_protection_descriptor_name`].
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_template_id(
    descriptor: *const CloakProtectionDescriptor,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if descriptor.is_null() {
        return CloakResult::BadInput;
    }
    write_string((*descriptor).0.template_id(), buffer, capacity, actual)
}

/// # Safety
/// `descriptor` must be a live descriptor handle; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_does_content_expire(
    descriptor: *const CloakProtectionDescriptor,
    out: *mut bool,
) -> CloakResult {
    if descriptor.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    *out = (*descriptor).0.does_content_expire();
    CloakResult::Success
}

/// Expiry as seconds since the Unix epoch; `BadInput` when the content
/// does not expire.
///
/// # Safety
/// `descriptor` must be a live descriptor handle; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_content_valid_until(
    descriptor: *const CloakProtectionDescriptor,
    out: *mut i64,
) -> CloakResult {
    if descriptor.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    match (*descriptor).0.content_valid_until() {
        Some(when) => {
            *out = when.timestamp();
            CloakResult::Success
        }
        None => CloakResult::BadInput,
    }
}

/// # Safety
/// `descriptor` must be a live descriptor handle; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_does_allow_offline_access(
    descriptor: *const CloakProtectionDescriptor,
    out: *mut bool,
) -> CloakResult {
    if descriptor.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    *out = (*descriptor).0.does_allow_offline_access();
    CloakResult::Success
}

/// Snapshot the users-to-rights mappings into a result handle.
///
/// # Safety
/// `descriptor` must be a live descriptor handle; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_user_rights(
    descriptor: *const CloakProtectionDescriptor,
    out: *mut *mut CloakUserRightsResult,
) -> CloakResult {
    if descriptor.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    let snapshot = (*descriptor).0.user_rights().to_vec();
    *out = Box::into_raw(Box::new(CloakUserRightsResult(snapshot)));
    CloakResult::Success
}

/// # Safety
/// `descriptor` must be null or a handle this module produced.
#[no_mangle]
pub unsafe extern "C" fn cloak_protection_descriptor_release(
    descriptor: *mut CloakProtectionDescriptor,
) {
    release(descriptor);
}

/// # Safety
/// `result` must be a live result handle; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_user_rights_result_count(
    result: *const CloakUserRightsResult,
    out: *mut usize,
) -> CloakResult {
    if result.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    *out = (*result).0.len();
    CloakResult::Success
}

/// # Safety
/// `result` must be a live result handle; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_user_rights_result_user_count(
    result: *const CloakUserRightsResult,
    mapping: usize,
    out: *mut usize,
) -> CloakResult {
    if result.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    match (&(*result).0).get(mapping) {
        Some(ur) => {
            *out = ur.users.len();
            CloakResult::Success
        }
        None => CloakResult::BadInput,
    }
}

/// # Safety
/// `result` must be a live result handle; `buffer` must hold `capacity`
/// writable bytes.
#[no_mangle]
pub unsafe extern "C" fn cloak_user_rights_result_user(
    result: *const CloakUserRightsResult,
    mapping: usize,
    index: usize,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if result.is_null() {
        return CloakResult::BadInput;
    }
    match (&(*result).0).get(mapping).and_then(|ur| ur.users.get(index)) {
        Some(user) => write_string(user, buffer, capacity, actual),
        None => CloakResult::BadInput,
    }
}

/// # Safety
/// `result` must be a live result handle; `out` writable.
#[no_mangle]
pub unsafe extern "C" fn cloak_user_rights_result_right_count(
    result: *const CloakUserRightsResult,
    mapping: usize,
    out: *mut usize,
) -> CloakResult {
    if result.is_null() || out.is_null() {
        return CloakResult::BadInput;
    }
    match (&(*result).0).get(mapping) {
        Some(ur) => {
            *out = ur.rights.len();
            CloakResult::Success
        }
        None => CloakResult::BadInput,
    }
}

/// # Safety
/// See [`cloak_user_rights_result_user`].
#[no_mangle]
pub unsafe extern "C" fn cloak_user_rights_result_right(
    result: *const CloakUserRightsResult,
    mapping: usize,
    index: usize,
    buffer: *mut c_char,
    capacity: usize,
    actual: *mut usize,
) -> CloakResult {
    if result.is_null() {
        return CloakResult::BadInput;
    }
    match (&(*result).0).get(mapping).and_then(|ur| ur.rights.get(index)) {
        Some(right) => write_string(right, buffer, capacity, actual),
        None => CloakResult::BadInput,
    }
}

/// # Safety
/// `result` must be null or a handle this module produced.
#[no_mangle]
pub unsafe extern "C" fn cloak_user_rights_result_release(result: *mut CloakUserRightsResult) {
    release(result);
}

//! C string helpers for the FFI layer
//!
//! Strings returned to C are owned by the caller and released with
//! [`crate::ffi::listmatch_free_error`]. Null pointers are always tolerated.

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

/// Message used when an error message itself contains a NUL byte
const FALLBACK_MESSAGE: &str = "unknown error";

/// Convert `msg` into an owned C string, substituting a fixed message if it
/// contains interior NUL bytes.
pub fn owned_message(msg: &str) -> *mut c_char {
    CString::new(msg)
        .or_else(|_| CString::new(FALLBACK_MESSAGE))
        .map(CString::into_raw)
        .unwrap_or(std::ptr::null_mut())
}

/// Release a string created by [`owned_message`]. No-op for null.
///
/// # Safety
/// `ptr` must come from [`owned_message`] (or `CString::into_raw`) or be null,
/// and must not be used afterwards.
pub unsafe fn free_message(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}

/// Borrow a fragment from a C string, naming `what` in the error.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that outlives `'a`.
pub unsafe fn fragment<'a>(ptr: *const c_char, what: &str) -> Result<&'a str, String> {
    if ptr.is_null() {
        return Err(format!("null {} pointer", what));
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map_err(|_| format!("invalid UTF-8 in {}", what))
}

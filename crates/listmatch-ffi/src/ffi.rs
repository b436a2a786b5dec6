//! C-compatible FFI interface for the list item matcher
//!
//! # Memory Ownership Rules
//!
//! - `listmatch_matcher_new()` / `listmatch_matcher_default()` allocate on the
//!   Rust heap; the caller owns the pointer
//! - `listmatch_matcher_free()` must be called to deallocate it
//! - Error strings in result structs are owned by the caller and released
//!   with `listmatch_free_error()`
//! - Fragments passed in are borrowed for the duration of the call only
//!
//! # Work Limits
//!
//! Fragments over `MAX_FRAGMENT_BYTES` are rejected. Matchers created here
//! skip similarity scoring for pairs over `MAX_SCORED_CHARS` combined
//! codepoints and decide on the linear prefix/suffix checks alone;
//! `listmatch_similarity` rejects such pairs.

use std::os::raw::c_char;
use std::ptr;

use listmatch_core::text::char_len;
use listmatch_core::{
    similar_text, CharAffixFinder, LcsScorer, MatchStrategy, MatcherConfig, TagStripper,
};
use tracing::debug;

use crate::cstr::{fragment, free_message, owned_message};
use crate::Matcher;

// Safety limits
const MAX_FRAGMENT_BYTES: usize = 64 * 1024;
const MAX_SCORED_CHARS: usize = 4_000;

/// C-compatible result of creating a matcher
#[repr(C)]
pub struct ListMatchResultC {
    pub success: bool,
    pub error_msg: *mut c_char,
    pub matcher: *mut Matcher,
}

/// C-compatible result of a match decision
#[repr(C)]
pub struct ListMatchBoolC {
    pub success: bool,
    pub error_msg: *mut c_char,
    pub value: bool,
}

impl ListMatchResultC {
    fn error(msg: &str) -> Self {
        Self {
            success: false,
            error_msg: owned_message(msg),
            matcher: ptr::null_mut(),
        }
    }
}

impl ListMatchBoolC {
    fn error(msg: &str) -> Self {
        Self {
            success: false,
            error_msg: owned_message(msg),
            value: false,
        }
    }

    fn ok(value: bool) -> Self {
        Self {
            success: true,
            error_msg: ptr::null_mut(),
            value,
        }
    }
}

/// Borrow and size-check both fragments.
///
/// # Safety
/// Both pointers must be null or valid NUL-terminated strings.
unsafe fn fragments<'a>(a: *const c_char, b: *const c_char) -> Result<(&'a str, &'a str), String> {
    let a = unsafe { fragment(a, "fragment a") }?;
    let b = unsafe { fragment(b, "fragment b") }?;
    if a.len() > MAX_FRAGMENT_BYTES || b.len() > MAX_FRAGMENT_BYTES {
        return Err("fragment exceeds maximum length".to_string());
    }
    Ok((a, b))
}

fn capped_matcher(config: MatcherConfig) -> Matcher {
    Matcher::with_capabilities(
        config,
        TagStripper,
        LcsScorer::with_max_chars(MAX_SCORED_CHARS),
        CharAffixFinder,
    )
}

// ============================================================================
// Matcher Lifecycle
// ============================================================================

#[no_mangle]
pub extern "C" fn listmatch_init_logger() {
    crate::init_logger();
}

/// Create a matcher with custom thresholds. Fails if either is not a finite
/// value in `[0.0, 1.0]`.
#[no_mangle]
pub extern "C" fn listmatch_matcher_new(
    length_ratio_threshold: f64,
    common_text_ratio_threshold: f64,
) -> ListMatchResultC {
    let config = MatcherConfig::new(length_ratio_threshold, common_text_ratio_threshold);
    if let Err(e) = config.validate() {
        return ListMatchResultC::error(&e.to_string());
    }

    debug!(?config, "Created list item matcher");
    ListMatchResultC {
        success: true,
        error_msg: ptr::null_mut(),
        matcher: Box::into_raw(Box::new(capped_matcher(config))),
    }
}

/// Create a matcher with the default thresholds.
#[no_mangle]
pub extern "C" fn listmatch_matcher_default() -> *mut Matcher {
    Box::into_raw(Box::new(capped_matcher(MatcherConfig::default())))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn listmatch_matcher_free(matcher: *mut Matcher) {
    if !matcher.is_null() {
        unsafe {
            let _ = Box::from_raw(matcher);
        }
    }
}

// ============================================================================
// Matching
// ============================================================================

/// Decide whether two fragments are the same item.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn listmatch_is_match(
    matcher: *const Matcher,
    a: *const c_char,
    b: *const c_char,
) -> ListMatchBoolC {
    if matcher.is_null() {
        return ListMatchBoolC::error("null matcher pointer");
    }
    let matcher = unsafe { &*matcher };

    match unsafe { fragments(a, b) } {
        Ok((a, b)) => ListMatchBoolC::ok(matcher.is_match(a, b)),
        Err(e) => ListMatchBoolC::error(&e),
    }
}

/// Similarity percentage of two raw fragments, or `-1.0` on invalid input or
/// when the pair is over `MAX_SCORED_CHARS` combined codepoints.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn listmatch_similarity(a: *const c_char, b: *const c_char) -> f64 {
    match unsafe { fragments(a, b) } {
        Ok((a, b)) if char_len(a) + char_len(b) > MAX_SCORED_CHARS => {
            debug!(
                len_a = char_len(a),
                len_b = char_len(b),
                "Rejected similarity request above scoring limit"
            );
            -1.0
        }
        Ok((a, b)) => similar_text(a, b).percent,
        Err(e) => {
            debug!(error = %e, "Rejected similarity request");
            -1.0
        }
    }
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn listmatch_free_error(error_msg: *mut c_char) {
    unsafe { free_message(error_msg) };
}

/// Version of this library as a static C string.
#[no_mangle]
pub extern "C" fn listmatch_version() -> *const c_char {
    concat!(env!("CARGO_PKG_VERSION"), "\0").as_ptr() as *const c_char
}

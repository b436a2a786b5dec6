//! listmatch C interface
//!
//! Exposes [`listmatch_core::ListItemMatchStrategy`] through a C ABI so a diff
//! engine written in another language can ask whether two list items match.
//!
//! ## Usage from C
//!
//! ```c
//! ListMatchResultC created = listmatch_matcher_new(0.1, 0.6);
//! if (!created.success) { ...; listmatch_free_error(created.error_msg); }
//!
//! ListMatchBoolC r = listmatch_is_match(created.matcher, "<b>a</b>", "<i>a</i>");
//! listmatch_free_error(r.error_msg);
//! listmatch_matcher_free(created.matcher);
//! ```

pub mod cstr;
pub mod ffi;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

/// Install the tracing subscriber once.
///
/// The level is controlled by `RUST_LOG`, e.g. `RUST_LOG=listmatch_core=trace`.
pub fn init_logger() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let installed = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(true)
            .try_init()
            .is_ok();
        if installed {
            tracing::debug!("listmatch FFI logging initialized");
        }
    });
}

/// Matcher type handed across the C boundary
pub type Matcher = listmatch_core::ListItemMatchStrategy;

pub use ffi::{ListMatchBoolC, ListMatchResultC};

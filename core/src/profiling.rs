//! Profiling support via Tracy.
//!
//! Instrumentation is enabled with the `profiling` Cargo feature:
//!
//! ```bash
//! cargo run -p tinted-demos --features profiling
//! ```
//!
//! Without the feature every macro expands to nothing.
//!
//! ```ignore
//! use tinted_core::{frame_mark, profile_scope};
//!
//! fn compose_program() {
//!     profile_scope!("compose_program");
//!     // ...
//! }
//!
//! loop {
//!     // ... render frame ...
//!     frame_mark!();
//! }
//! ```

#[cfg(feature = "profiling")]
pub use tracy_client::{self, frame_mark as tracy_frame_mark, span};

/// Mark the end of a frame for Tracy's frame analysis.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! frame_mark {
    () => {
        $crate::profiling::tracy_frame_mark()
    };
}

/// Mark the end of a frame (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! frame_mark {
    () => {};
}

/// Create a profiling span that ends with the enclosing scope.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_scope {
    ($name:expr) => {
        let _profile_span = $crate::profiling::span!($name);
    };
}

/// Create a profiling span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_scope {
    ($name:expr) => {};
}

/// Create a profiling span named after the enclosing function.
#[macro_export]
#[cfg(feature = "profiling")]
macro_rules! profile_function {
    () => {
        let _profile_span = $crate::profiling::span!();
    };
}

/// Create a function span (no-op when profiling disabled).
#[macro_export]
#[cfg(not(feature = "profiling"))]
macro_rules! profile_function {
    () => {};
}

pub use frame_mark;
pub use profile_function;
pub use profile_scope;

/// Returns `true` when the crate was built with the `profiling` feature.
pub const fn is_enabled() -> bool {
    cfg!(feature = "profiling")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macros_expand_in_any_configuration() {
        profile_function!();
        profile_scope!("test_scope");
        frame_mark!();
        assert_eq!(is_enabled(), cfg!(feature = "profiling"));
    }
}

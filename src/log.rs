//! Logging macros.
//!
//! `debug!` and `warn!` are the `tracing` macros when the `tracing` feature
//! is on and expand to nothing otherwise. `insufficient!` records a
//! calculator answering with placeholders.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};

/// `insufficient!(kind, missing)` where `missing` is an `InsufficientData`.
macro_rules! insufficient {
    ($kind:expr, $missing:expr) => {{
        let _missing: &$crate::errors::InsufficientData = &$missing;
        $crate::log::debug!(
            kind = %$kind,
            field = _missing.field,
            "insufficient data, answering with placeholders"
        );
    }};
}

pub(crate) use insufficient;

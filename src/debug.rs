//! Feature-gated tracing for the audio thread.
//!
//! `ol_log!` compiles to nothing unless the `debug` feature is enabled. With the
//! feature on, messages go to the `log` facade (installed by the nih-plug wrapper)
//! with allocation permitted, so the macro may be used inside `process`.

use std::fmt;

#[cfg(feature = "debug")]
pub(crate) fn ol_log_inner(args: fmt::Arguments) {
    assert_no_alloc::permit_alloc(|| log::debug!("{}", args));
}

#[cfg(not(feature = "debug"))]
pub(crate) fn ol_log_inner(_args: fmt::Arguments) {}

#[macro_export]
macro_rules! ol_log {
    ($($arg:tt)*) => {
        $crate::debug::ol_log_inner(format_args!($($arg)*))
    };
}

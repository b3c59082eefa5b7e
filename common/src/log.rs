//! Terminal status macros.
//!
//! These forward to `tracing` under dedicated targets so the CLI formatter can
//! pick a symbol for them. Libraries that only need diagnostics should use
//! `tracing` directly.

pub const STATUS_TARGET: &str = "sshprobe::status";
pub const SUCCESS_TARGET: &str = "sshprobe::success";
pub const PRINT_TARGET: &str = "sshprobe::print";

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sshprobe::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sshprobe::status", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!(target: "sshprobe::status", $($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!(target: "sshprobe::status", $($arg)*)
    };
}

//! Printing macros for [`Message`](super::Message) values.
//!
//! Output is routed by mode. When `DONEDAY_DEBUG` or `RUST_LOG` is set the
//! macros emit `tracing` events at the matching level, otherwise they write
//! to stdout (errors to stderr):
//!
//! ```text
//! msg_success!(m) ──▶ debug mode? ──yes──▶ tracing::info!("✅ {m}")
//!                          └───────no───▶ println!("✅ {m}")
//! ```
//!
//! | macro               | prefix | normal mode | debug mode        |
//! |---------------------|--------|-------------|-------------------|
//! | `msg_print!`        |        | stdout      | `tracing::info!`  |
//! | `msg_success!`      | ✅     | stdout      | `tracing::info!`  |
//! | `msg_info!`         | ℹ️     | stdout      | `tracing::info!`  |
//! | `msg_warning!`      | ⚠️     | stdout      | `tracing::warn!`  |
//! | `msg_error!`        | ❌     | stderr      | `tracing::error!` |
//! | `msg_debug!`        | 🔍     | nothing     | `tracing::debug!` |
//!
//! Passing `true` as a second argument surrounds the line with blank lines.
//!
//! ```rust
//! use doneday::libs::messages::Message;
//! use doneday::{msg_print, msg_success};
//!
//! msg_print!(Message::TasksHeader("2024-01-05".to_string()), true);
//! msg_success!(Message::ConfigSaved);
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Whether messages go to `tracing` instead of the terminal. Read once per process.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("DONEDAY_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("{}", $msg);
        } else {
            println!("{}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n{}\n", $msg);
        } else {
            println!("\n{}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("✅ {}", $msg);
        } else {
            println!("✅ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\n✅ {}\n", $msg);
        } else {
            println!("\n✅ {}\n", $msg);
        }
    };
}

/// Errors go to stderr so they stay out of piped output.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("❌ {}", $msg);
        } else {
            eprintln!("❌ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::error!("\n❌ {}\n", $msg);
        } else {
            eprintln!("\n❌ {}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("⚠️ {}", $msg);
        } else {
            println!("⚠️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::warn!("\n⚠️ {}\n", $msg);
        } else {
            println!("\n⚠️ {}\n", $msg);
        }
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("ℹ️ {}", $msg);
        } else {
            println!("ℹ️ {}", $msg);
        }
    };
    ($msg:expr, true) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::info!("\nℹ️ {}\n", $msg);
        } else {
            println!("\nℹ️ {}\n", $msg);
        }
    };
}

/// Silent unless debug mode is on.
#[macro_export]
macro_rules! msg_debug {
    ($msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::debug!("🔍 {}", $msg);
        }
    };
}

/// Builds an `anyhow::Error` from a message.
///
/// ```rust
/// use doneday::libs::messages::Message;
/// use doneday::msg_error_anyhow;
///
/// let err = msg_error_anyhow!(Message::TaskNotFound("3f2a".to_string()));
/// assert_eq!(err.to_string(), "❌ No task matches id '3f2a'");
/// ```
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}

/// Returns early with an `anyhow::Error` built from a message.
#[macro_export]
macro_rules! msg_bail_anyhow {
    ($msg:expr) => {
        anyhow::bail!("❌ {}", $msg)
    };
}

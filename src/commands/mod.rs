//! CLI commands for kbsync

pub mod config;
pub mod dispatch;
pub mod init;
pub mod status;
pub mod sync;
pub mod watch;

use serde::Serialize;

use kbsync_core::error::Result;
use kbsync_core::sync::CancelToken;

/// Print a value as pretty JSON on stdout
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Trip `cancel` on Ctrl-C; the running pass stops before its next document
pub fn cancel_on_interrupt(cancel: &CancelToken) {
    let cancel = cancel.clone();
    let _ = ctrlc::set_handler(move || {
        cancel.cancel();
    });
}

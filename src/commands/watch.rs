//! `kbsync watch` command - periodic sync while auto-sync is enabled
//!
//! Settings are re-read before every pass, so disabling auto-sync or
//! changing the interval from another shell takes effect at the next tick.
//! A failed pass is reported and the loop keeps going.

use std::thread;
use std::time::{Duration, Instant};

use crate::cli::{OutputFormat, WatchArgs};
use crate::commands::dispatch::CommandContext;
use crate::commands::sync::{run_pass, summary_line};
use crate::commands::cancel_on_interrupt;
use kbsync_core::error::{KbsyncError, Result};
use kbsync_core::sync::{CancelToken, SyncEngine};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

fn interval_of(engine: &SyncEngine) -> Duration {
    Duration::from_secs(u64::from(engine.config().sync_interval) * 60)
}

/// Sleep for `duration`, returning false if cancelled first
fn wait(duration: Duration, cancel: &CancelToken) -> bool {
    let deadline = Instant::now() + duration;
    while Instant::now() < deadline {
        if cancel.is_cancelled() {
            return false;
        }
        thread::sleep(POLL_INTERVAL.min(deadline.saturating_duration_since(Instant::now())));
    }
    !cancel.is_cancelled()
}

/// Execute the watch command
pub fn execute(ctx: &CommandContext, args: &WatchArgs) -> Result<()> {
    let cli = ctx.cli;
    let engine = ctx.open_engine()?;
    let config = engine.config();
    if !config.auto_sync {
        return Err(KbsyncError::UsageError(
            "auto sync is disabled (enable it with `kbsync config set auto-sync true`)".to_string(),
        ));
    }
    config.validate()?;

    let cancel = CancelToken::new();
    cancel_on_interrupt(&cancel);

    if !cli.quiet && cli.format == OutputFormat::Human {
        eprintln!(
            "Watching {} every {} min (Ctrl-C to stop)",
            ctx.root.display(),
            config.sync_interval
        );
    }

    let mut interval = interval_of(&engine);
    drop(engine);

    if !args.now && !wait(interval, &cancel) {
        return Ok(());
    }

    let mut passes = 0u32;
    loop {
        let mut engine = ctx.open_engine()?;
        if !engine.config().auto_sync {
            tracing::info!("Auto sync disabled, stopping watch");
            break;
        }
        interval = interval_of(&engine);

        match run_pass(cli, &mut engine, &cancel) {
            Ok(report) => match cli.format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string(&report)?);
                }
                OutputFormat::Human => {
                    println!(
                        "{} ({})",
                        summary_line(&report),
                        report.completed_at.format("%H:%M:%S")
                    );
                }
            },
            Err(KbsyncError::Interrupted) => break,
            Err(e) if e.is_configuration_error() => return Err(e),
            Err(e) => {
                tracing::warn!(error = %e, "Watch pass failed");
                match cli.format {
                    OutputFormat::Json => eprintln!("{}", e.to_json()),
                    OutputFormat::Human => eprintln!("Sync failed: {}", e),
                }
            }
        }

        passes += 1;
        if args.max_passes.is_some_and(|max| passes >= max) {
            break;
        }
        if !wait(interval, &cancel) {
            break;
        }
    }

    Ok(())
}

//! `kbsync status` command - preview what the next sync would upload

use crate::cli::Cli;
use crate::commands::print_json;
use crate::output_by_format_result;
use kbsync_core::error::Result;
use kbsync_core::sync::SyncEngine;

/// Execute the status command
pub fn execute(cli: &Cli, engine: &SyncEngine) -> Result<()> {
    let config = engine.config();
    let files = engine.preview()?;
    let pending: Vec<_> = files.iter().filter(|f| f.status.needs_sync()).collect();
    let unchanged = files.len() - pending.len();
    let last_sync = engine.last_sync_time();

    output_by_format_result!(cli.format,
        json => print_json(&serde_json::json!({
            "vault": engine.vault().root().display().to_string(),
            "last_pass": engine.last_pass(),
            "dataset_id": config.dataset_id,
            "folders": config.folders,
            "auto_sync": config.auto_sync,
            "sync_interval": config.sync_interval,
            "last_sync_time": last_sync,
            "tracked": engine.ledger().len(),
            "pending": pending.len(),
            "unchanged": unchanged,
            "files": pending,
        })),
        human => {
            if !cli.quiet {
                println!("Vault: {}", engine.vault().root().display());
                if config.dataset_id.is_empty() {
                    println!("Dataset: (not set)");
                } else {
                    println!("Dataset: {}", config.dataset_id);
                }
                if config.folders.is_empty() {
                    println!("Scope: whole vault");
                } else {
                    println!("Scope: {}", config.folders.join(", "));
                }
                match last_sync {
                    Some(time) => println!("Last sync: {}", time.to_rfc3339()),
                    None => println!("Last sync: never"),
                }
                if let Some(last) = engine.last_pass() {
                    match &last.error {
                        Some(error) => println!(
                            "Last pass: failed at {} ({})",
                            last.finished_at.to_rfc3339(),
                            error
                        ),
                        None => println!("Last pass: completed at {}", last.finished_at.to_rfc3339()),
                    }
                }
                if config.auto_sync {
                    println!("Auto sync: every {} min", config.sync_interval);
                } else {
                    println!("Auto sync: off");
                }
                println!();
            }

            for file in &pending {
                println!("  {:<16} {}", file.status.as_str(), file.path);
            }
            println!("{} pending, {} unchanged", pending.len(), unchanged);
        }
    )
}

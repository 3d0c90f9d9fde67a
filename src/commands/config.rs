//! `kbsync config` command - read and change sync settings

use crate::cli::{Cli, ConfigCommands};
use crate::commands::dispatch::CommandContext;
use crate::commands::print_json;
use crate::output_by_format_result;
use kbsync_core::bail_invalid;
use kbsync_core::config::{normalize_folder, Settings, SyncConfig};
use kbsync_core::error::Result;
use kbsync_core::vault::Vault;

/// Execute a config subcommand
pub fn execute(ctx: &CommandContext, command: &ConfigCommands) -> Result<()> {
    let (vault, mut settings) = ctx.settings()?;

    match command {
        ConfigCommands::Show => show(ctx.cli, &settings.effective()),
        ConfigCommands::Set { key, value } => {
            settings.config.set_value(key, value)?;
            settings.save()?;
            report_change(ctx.cli, &settings, &format!("Set {}", key))
        }
        ConfigCommands::AddFolder { folder } => {
            let folder = normalize_folder(folder);
            if !folder.is_empty() && !vault.resolve(&folder).is_dir() {
                bail_invalid!("folder", folder);
            }
            let message = if settings.config.add_folder(&folder) {
                settings.save()?;
                format!("Added folder {}", folder)
            } else {
                format!("Folder {} already in scope", folder)
            };
            report_change(ctx.cli, &settings, &message)
        }
        ConfigCommands::RemoveFolder { folder } => {
            let message = if settings.config.remove_folder(folder) {
                settings.save()?;
                format!("Removed folder {}", normalize_folder(folder))
            } else {
                format!("Folder {} was not in scope", normalize_folder(folder))
            };
            report_change(ctx.cli, &settings, &message)
        }
        ConfigCommands::ClearFolders => {
            settings.config.folders.clear();
            settings.save()?;
            report_change(ctx.cli, &settings, "Syncing the whole vault")
        }
        ConfigCommands::Folders => folders(ctx.cli, &vault, &settings.config),
    }
}

fn config_json(config: &SyncConfig) -> serde_json::Value {
    serde_json::json!({
        "api_url": config.api_url,
        "api_key": config.masked_api_key(),
        "dataset_id": config.dataset_id,
        "folders": config.folders,
        "auto_sync": config.auto_sync,
        "sync_interval": config.sync_interval,
        "timeout_seconds": config.timeout_seconds(),
        "last_sync_time": config.last_sync_time,
        "last_pass": config.last_pass,
    })
}

fn show(cli: &Cli, config: &SyncConfig) -> Result<()> {
    output_by_format_result!(cli.format,
        json => print_json(&config_json(config)),
        human => {
            let or_unset = |value: &str| {
                if value.is_empty() {
                    "(not set)".to_string()
                } else {
                    value.to_string()
                }
            };
            println!("api-url        {}", or_unset(&config.api_url));
            println!("api-key        {}", or_unset(&config.masked_api_key()));
            println!("dataset-id     {}", or_unset(&config.dataset_id));
            println!("auto-sync      {}", config.auto_sync);
            println!("sync-interval  {} min", config.sync_interval);
            println!("timeout        {} s", config.timeout_seconds());
            if config.folders.is_empty() {
                println!("folders        (whole vault)");
            } else {
                println!("folders        {}", config.folders.join(", "));
            }
            match config.last_sync_time {
                Some(time) => println!("last-sync      {}", time.to_rfc3339()),
                None => println!("last-sync      never"),
            }
        }
    )
}

fn report_change(cli: &Cli, settings: &Settings, message: &str) -> Result<()> {
    output_by_format_result!(cli.format,
        json => print_json(&serde_json::json!({
            "status": "ok",
            "message": message,
            "config": config_json(&settings.config),
        })),
        human => {
            if !cli.quiet {
                println!("{}", message);
            }
        }
    )
}

fn folders(cli: &Cli, vault: &Vault, config: &SyncConfig) -> Result<()> {
    let selected = |folder: &str| {
        config
            .folders
            .iter()
            .any(|f| normalize_folder(f) == folder)
    };
    let folders = vault.folders()?;

    output_by_format_result!(cli.format,
        json => {
            let entries: Vec<_> = folders
                .iter()
                .map(|f| serde_json::json!({"path": f, "selected": selected(f)}))
                .collect();
            print_json(&entries)
        },
        human => {
            for folder in &folders {
                let mark = if selected(folder) { "*" } else { " " };
                println!("{} {}", mark, folder);
            }
        }
    )
}

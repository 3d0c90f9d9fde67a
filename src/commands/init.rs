//! `kbsync init` command - create or update vault settings
//!
//! Idempotent: re-running keeps existing values and applies only the flags
//! given on the command line.

use std::path::Path;

use crate::cli::{Cli, InitArgs};
use crate::commands::print_json;
use crate::output_by_format_result;
use kbsync_core::config::{Settings, SyncConfig};
use kbsync_core::error::Result;
use kbsync_core::vault::Vault;

/// Execute the init command
pub fn execute(cli: &Cli, root: &Path, args: &InitArgs) -> Result<()> {
    let vault = Vault::open(root)?;
    let existed = Settings::path_for(&vault).exists();

    let mut config = if existed {
        Settings::load(&vault)?.config
    } else {
        SyncConfig::default()
    };

    if let Some(url) = &args.api_url {
        config.set_value("api-url", url)?;
    }
    if let Some(key) = &args.api_key {
        config.set_value("api-key", key)?;
    }
    if let Some(dataset) = &args.dataset_id {
        config.set_value("dataset-id", dataset)?;
    }
    for folder in &args.folders {
        config.add_folder(folder);
    }

    let settings = Settings::create(&vault, config)?;
    let missing = settings.config.validate().err();

    tracing::info!(path = %settings.path().display(), existed, "Settings written");

    output_by_format_result!(cli.format,
        json => print_json(&serde_json::json!({
            "status": "ok",
            "settings": settings.path().display().to_string(),
            "created": !existed,
            "configured": missing.is_none(),
        })),
        human => {
            if existed {
                println!("Updated kbsync settings at {}", settings.path().display());
            } else {
                println!("Initialized kbsync settings at {}", settings.path().display());
            }
            if let Some(missing) = missing {
                if !cli.quiet {
                    println!();
                    println!("Not ready to sync yet: {}.", missing);
                    println!("Set it with `kbsync config set <key> <value>`.");
                }
            }
        }
    )
}

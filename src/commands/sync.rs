//! `kbsync sync` command - run one sync pass

use crate::cli::{Cli, OutputFormat};
use crate::commands::{cancel_on_interrupt, print_json};
use crate::output_by_format_result;
use kbsync_core::error::Result;
use kbsync_core::remote::HttpKnowledgeBase;
use kbsync_core::sync::{CancelToken, SyncEngine, SyncReport};
use kbsync_core::vault::VaultFile;

/// Human summary line for a finished pass
pub fn summary_line(report: &SyncReport) -> String {
    format!(
        "Synced {} files, skipped {}",
        report.summary.synced, report.summary.skipped
    )
}

/// Run one pass with progress on stderr (human mode only)
pub fn run_pass(cli: &Cli, engine: &mut SyncEngine, cancel: &CancelToken) -> Result<SyncReport> {
    let config = engine.config();
    config.validate()?;
    let remote = HttpKnowledgeBase::new(&config);

    let mut print_progress = |current: usize, total: usize, file: &VaultFile| {
        eprintln!("[{}/{}] {}", current, total, file.path);
    };
    let progress: Option<&mut dyn FnMut(usize, usize, &VaultFile)> =
        if cli.format == OutputFormat::Human && !cli.quiet {
            Some(&mut print_progress)
        } else {
            None
        };

    engine.sync(&remote, cancel, progress)
}

/// Execute the sync command
pub fn execute(cli: &Cli, engine: &mut SyncEngine) -> Result<()> {
    let cancel = CancelToken::new();
    cancel_on_interrupt(&cancel);

    let report = run_pass(cli, engine, &cancel)?;

    output_by_format_result!(cli.format,
        json => print_json(&serde_json::json!({
            "status": "ok",
            "report": report,
        })),
        human => {
            println!("{}", summary_line(&report));
            if let Some(error) = &report.persist_error {
                eprintln!("warning: sync results not saved: {}", error);
            }
        }
    )
}

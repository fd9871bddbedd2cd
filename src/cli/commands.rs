//! CLI command implementations
//!
//! Each command builds a registry over a recording store so the clear calls
//! it would issue can be printed. The audit trail lives in a file-backed
//! session store and carries over between runs.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cachebust::CacheBust;
use crate::cli::{
    config::CliConfig,
    errors::{CliError, CliResult},
    output::{
        DispatchReport, format_audit, format_dispatches, format_list, format_patterns,
        format_sweep, format_tiers, print_output,
    },
};
use crate::registry::catalog::ActionDomain;
use crate::registry::clock::ManualClock;
use crate::registry::config::{BuildMode, RegistryConfig};
use crate::registry::dispatch::patterns::lookup_patterns;
use crate::registry::dispatch::{InvalidateOptions, action_types};
use crate::registry::error::RegistryError;
use crate::registry::session::FileSessionStore;
use crate::registry::store::ClearRecorder;
use crate::registry::visibility::{ManualVisibility, PageVisibility, StalenessTier, VisibilityOptions};

#[derive(Debug)]
pub enum Commands {
    Actions { domain: Option<String> },
    Patterns { action: String },
    Invalidate { actions: Vec<String>, debug: bool },
    Audit,
    Simulate { hidden_ms: u64 },
    Tiers,
    Config,
}

/// Execute a CLI command
pub fn execute_command(command: Commands, config: CliConfig) -> CliResult<()> {
    let (cli_config, registry_config) = config.load_and_merge()?;
    let format = &cli_config.output_format;

    let output = match command {
        Commands::Actions { domain } => {
            let actions = match domain {
                Some(domain) => ActionDomain::from_prefix(&domain)
                    .ok_or_else(|| {
                        CliError::ArgumentError(format!("unknown action domain '{}'", domain))
                    })?
                    .actions()
                    .into_iter()
                    .map(|action| action.id())
                    .collect(),
                None => action_types(),
            };
            format_list(&actions, format)
        }

        Commands::Patterns { action } => {
            format_patterns(&lookup_patterns(&action), format)
        }

        Commands::Invalidate { actions, debug } => {
            if actions.is_empty() {
                return Err(CliError::ArgumentError(
                    "at least one action is required".to_string(),
                ));
            }
            // Reject the batch before anything is cleared or persisted
            if registry_config.build_mode == BuildMode::Development
                && let Some(unknown) = actions.iter().find(|a| lookup_patterns(a).is_none())
            {
                return Err(RegistryError::unknown_action(unknown.as_str()).into());
            }
            let recorder = Arc::new(ClearRecorder::new());
            let cache = recording_registry(
                &recorder,
                cli_config.session_path(),
                registry_config,
            )?;

            let options = InvalidateOptions { debug };
            let mut reports = Vec::with_capacity(actions.len());
            for action in actions {
                let dispatched = cache.invalidate_for_with(&action, options)?;
                reports.push(DispatchReport {
                    action,
                    dispatched,
                    clears: recorder.take(),
                });
            }
            format_dispatches(&reports, format)
        }

        Commands::Audit => {
            let recorder = Arc::new(ClearRecorder::new());
            let cache = recording_registry(
                &recorder,
                cli_config.session_path(),
                registry_config,
            )?;
            let report = cache.audit_log();
            format_audit(&report.events, &report.stats, format)
        }

        Commands::Simulate { hidden_ms } => {
            let (tier, cleared) = simulate_hidden(hidden_ms, registry_config)?;
            format_sweep(hidden_ms, tier, &cleared, format)
        }

        Commands::Tiers => format_tiers(&registry_config.thresholds, format),

        Commands::Config => registry_config.to_toml_string()?,
    };

    print_output(&output, format, cli_config.quiet);
    Ok(())
}

/// Registry over `recorder` whose audit tail is mirrored to `session_file`
fn recording_registry(
    recorder: &Arc<ClearRecorder>,
    session_file: PathBuf,
    mut config: RegistryConfig,
) -> CliResult<CacheBust> {
    // Each run appends to the tail written by earlier runs
    config.restore_audit_on_start = true;
    let cache = CacheBust::builder()
        .config(config)
        .store(recorder.clone())
        .session_store(Arc::new(FileSessionStore::new(session_file)))
        .build()?;
    Ok(cache)
}

/// Hide the page for `hidden_ms` on a manual clock, then show it again
fn simulate_hidden(
    hidden_ms: u64,
    config: RegistryConfig,
) -> CliResult<(Option<StalenessTier>, Vec<String>)> {
    let recorder = Arc::new(ClearRecorder::new());
    let clock = Arc::new(ManualClock::new(0));
    let cache = CacheBust::builder()
        .config(config)
        .store(recorder.clone())
        .clock(clock.clone())
        .build()?;

    let observed = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&observed);
    let _registration = cache.on_visibility_change("cli", move |tier, _elapsed| {
        *sink.lock() = tier;
    });

    let source = ManualVisibility::new();
    cache.init_visibility_handler(&source, VisibilityOptions::default());
    source.emit(PageVisibility::Hidden);
    clock.advance(hidden_ms);
    source.emit(PageVisibility::Visible);

    let tier = *observed.lock();
    Ok((tier, recorder.patterns()))
}

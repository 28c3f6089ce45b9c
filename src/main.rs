//! Boss Module Manager - command-line host.
//!
//! # Overview
//!
//! Loads the cached ignore table, refreshes it from the module feed and prints
//! the ignore lists of the modules named on the command line:
//!
//! ```text
//! bossmodules "Forget Me Not" "Simon's Stages"
//! bossmodules --ids MemoryV2
//! ```
//!
//! # Execution Flow
//!
//! 1. Load `BossModules.yaml` (optional) and `BOSSMODULES_*` overrides
//! 2. Initialize logging → <log_dir>/bossmodules.<date>
//! 3. Create tokio runtime with 2 worker threads
//! 4. Start the manager: load `<data_dir>/Modsettings/BossModules.json`, begin a refresh
//! 5. Wait for the refresh attempt to complete (unless `--no-refresh`)
//! 6. Print each requested ignore list
//! 7. Shutdown tokio runtime with 5s timeout

use anyhow::Result;
use bossmodules::config::service::SERVICE_CONFIG_FILE;
use bossmodules::{
    APP_NAME, BossModuleManager, BossModuleService, HttpTransport, ServiceConfig, SettingsStore,
    VERSION,
};
use camino::Utf8PathBuf;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "bossmodules", version, about = "Look up which modules a boss module ignores")]
struct Cli {
    /// Host configuration file
    #[arg(long, default_value = SERVICE_CONFIG_FILE)]
    config: Utf8PathBuf,

    /// Data directory holding Modsettings/BossModules.json
    #[arg(long)]
    data_dir: Option<Utf8PathBuf>,

    /// Print module IDs instead of display names
    #[arg(long)]
    ids: bool,

    /// Answer from the cached table without contacting the feed
    #[arg(long)]
    no_refresh: bool,

    /// Display names or module IDs to look up
    modules: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ServiceConfig::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }

    let _log_guard = bossmodules::logging::setup_logging(
        &config.log_dir,
        "bossmodules",
        config.debug_mode,
        config.console_output,
    )?;

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .worker_threads(2)
        .thread_name("bossmodules-worker")
        .build()?;

    let transport = {
        let _enter = runtime.enter();
        HttpTransport::new(config.request_timeout())?
    };
    let store = SettingsStore::in_data_dir(&config.data_dir);

    let manager = if cli.no_refresh {
        BossModuleManager::new(store, transport, runtime.handle().clone())
    } else {
        let manager = BossModuleManager::start(store, transport, runtime.handle().clone());
        runtime.block_on(manager.wait_until_loaded());
        manager
    };

    for module in &cli.modules {
        let ignored = if cli.ids {
            manager.get_ignored_module_ids(module)
        } else {
            manager.get_ignored_modules(module)
        };

        match ignored {
            Some(list) => println!("{} => {}", module, list.join(", ")),
            None => println!("{} => not found", module),
        }
    }

    manager.metrics().log_summary();

    runtime.shutdown_timeout(Duration::from_secs(5));

    tracing::info!("Shutdown complete");
    Ok(())
}

// Copyright (c) 2024-2025 Jesse Morgan / Morgan Forge
// SPDX-License-Identifier: AGPL-3.0-or-later

//! podrun binary: resolve dependencies, start pods, launch the app.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use podrun::config::{self, LauncherConfig, DEFAULT_CONFIG_FILE};
use podrun::fetch::{FetchCoordinator, DEFAULT_POOL_SIZE};
use podrun::launch::LaunchComposer;
use podrun::pods::PodRegistry;
use podrun::progress::ProgressBus;

#[derive(Parser, Debug)]
#[command(name = "podrun", version, about = "Bootstrap launcher: fetch jars, start pods, run the app")]
struct Cli {
    /// Properties file declaring repositories, dependencies, jarname,
    /// appname, and pods
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Install directory override (default: platform app-data dir)
    #[arg(long)]
    install_dir: Option<PathBuf>,

    /// Number of concurrent fetches
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE)]
    pool_size: usize,

    /// Resolve artifacts only; do not spawn the application
    #[arg(long)]
    no_launch: bool,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "podrun=warn",
        1 => "podrun=info",
        _ => "podrun=debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = LauncherConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let install = config::install_dir(cli.install_dir.as_deref())
        .context("failed to resolve install directory")?;
    let cache = config::cache_dir(&install).context("failed to create cache directory")?;

    let bus = Arc::new(ProgressBus::new());
    let registry = PodRegistry::with_builtins();
    registry.spawn_all(&config.pods, &bus);

    // Show progress bars when nothing else is listening and a human is
    // watching.
    if config.pods.is_empty() && std::io::stderr().is_terminal() {
        registry.spawn_all(&["console".to_string()], &bus);
    }

    let coordinator =
        FetchCoordinator::with_pool_size(bus.clone(), config.repositories.clone(), cli.pool_size);
    let classpath_entries = coordinator
        .fetch_all(&config.dependencies, &cache)
        .await
        .context("failed to prepare cache directories")?;

    if cli.no_launch {
        println!("{}", LaunchComposer::build_classpath(&classpath_entries));
        return Ok(());
    }

    let composer = LaunchComposer::new(&install, &config.app_name, &config.jar_name);
    let config_dir = cli
        .config
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let main_jar = composer
        .ensure_main_jar(&config_dir)
        .context("failed to install the main jar")?;

    let classpath = LaunchComposer::build_classpath(&classpath_entries);
    composer
        .launch(&classpath, &main_jar)
        .context("failed to spawn the application")?;

    Ok(())
}

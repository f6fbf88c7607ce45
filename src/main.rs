// WolPanel - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading and logging initialisation (debug mode support)
// 3. Relay client, log store and controller construction
// 4. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use wolpanel::app;

pub use wolpanel::core;
pub use wolpanel::platform;
pub use wolpanel::ui;
pub use wolpanel::util;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// WolPanel - administration panel for a Wake-on-LAN relay.
///
/// Edits the relay's client list and follows its activity log.
#[derive(Parser, Debug)]
#[command(name = "WolPanel", version, about)]
struct Cli {
    /// Relay base URL (overrides [server] base_url in config.toml).
    #[arg(short = 's', long = "server")]
    server: Option<String>,

    /// Directory for the local activity log store.
    #[arg(long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // Resolve platform paths and load config before logging so the
    // configured level and file apply from the first line.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings) = platform::config::load_config(&platform_paths.config_dir);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "WolPanel starting"
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
    }

    // CLI override > config.toml > default
    let server_url = match cli.server.as_deref() {
        Some(raw) => match platform::config::normalise_server_url(raw) {
            Some(url) => url,
            None => {
                eprintln!("Error: --server must be an http:// or https:// URL (got '{raw}')");
                std::process::exit(2);
            }
        },
        None => config.server_url.clone(),
    };

    let api = match app::api::HttpRelayApi::new(
        server_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build HTTP client");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    let store_path = match cli.data_dir {
        Some(ref dir) => dir.join(util::constants::LOG_STORE_FILE_NAME),
        None => platform_paths.log_store_path(),
    };
    let store = app::log_store::LogStore::new(store_path, config.max_stored_logs);
    let logs = app::log_manager::LogManager::new(store);

    let mut state = app::state::AppState::new(logs, server_url.clone(), cli.debug);
    state.dark_mode = config.dark_mode;
    state.font_size = config.font_size;
    state.show_config_warnings(&config_warnings);

    let controller = app::controller::Controller::new(
        state,
        Arc::new(api),
        Duration::from_millis(config.poll_interval_ms),
    );

    tracing::info!(server = %server_url, "Ready to launch GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([800.0, 480.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::WolPanelApp::new(controller)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch WolPanel GUI: {e}");
        std::process::exit(1);
    }
}

//! relay-console
//!
//! Operator console for a live-video HLS relay. Edits the relay config,
//! polls its health, and plays the stream at a configured delay.

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info};

use relay_console::api::RelayClient;
use relay_console::config::Settings;
use relay_console::console::ConsoleApp;
use relay_console::logging;
use relay_console::player::{create_player_engine, PlayerManager};
use relay_console::sync::{ControlCommand, StatusPoller, SyncController, ViewEvent};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let mut server_override: Option<String> = None;
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "--server" => match args.next() {
                Some(url) => server_override = Some(url),
                None => {
                    eprintln!("--server requires a URL");
                    print_help();
                    std::process::exit(1);
                }
            },
            other => {
                eprintln!("Unknown option: {}", other);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // Initialize logging
    let _guard = logging::init_logging()?;

    info!("relay-console starting...");
    if let Ok(log_dir) = logging::get_log_dir() {
        info!("Logging to {:?}", log_dir);
    }

    // Load settings, then apply overrides: file < environment < flag
    let mut settings = Settings::load()?;
    info!("Settings loaded from {:?}", settings.settings_path()?);
    settings.apply_env_overrides();
    if let Some(url) = server_override {
        settings.server.base_url = url;
    }

    let api = match RelayClient::new(&settings.server.base_url) {
        Ok(api) => api,
        Err(e) => {
            error!("{}", e);
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    info!("Relay server: {}", settings.server.base_url);

    // Create channels for communication between components
    let (cmd_tx, cmd_rx) = mpsc::channel::<ControlCommand>(32);
    let (view_tx, view_rx) = broadcast::channel::<ViewEvent>(16);

    // Wire the player and controller
    let engine = create_player_engine(&settings.player);
    let player = PlayerManager::new(engine, api.manifest_url());
    let controller = SyncController::new(api.clone(), player, cmd_rx, view_tx.clone());

    // Run the controller in a background task
    let controller_handle = tokio::spawn(async move {
        if let Err(e) = controller.run().await {
            error!("Controller error: {}", e);
        }
    });

    // Background status refresh
    let poller_handle = StatusPoller::new(api, view_tx).spawn();

    // Run the console on the main task (blocks until quit)
    let console = ConsoleApp::new(cmd_tx, view_rx);
    console.run().await?;

    // Cleanup - stop polling, then let the controller tear the player down
    poller_handle.abort();
    let _ = controller_handle.await;

    info!("relay-console shutting down");

    Ok(())
}

fn print_help() {
    println!("relay-console - Operator console for a live-video HLS relay");
    println!();
    println!("USAGE:");
    println!("    relay-console [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help            Print this help message");
    println!("    --server <url>        Relay server base URL (overrides settings)");
    println!();
    println!("ENVIRONMENT:");
    println!("    RELAY_CONSOLE_SERVER      Relay server base URL");
    println!("    RELAY_CONSOLE_LOG         Set log level (e.g., debug, info, warn)");
    println!("    RELAY_CONSOLE_LOG_PATH    Override the log directory");
    println!();
    println!("For more information, visit: https://github.com/streamweb/relay-console");
}

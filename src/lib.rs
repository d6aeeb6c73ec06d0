//! Hexmac desktop shell.
//!
//! Wires the core bridge to Tauri: the macOS permission provider, the main
//! window as capture surface, and the IPC commands the UI calls.

pub mod commands;
pub mod permissions;
pub mod window;

use hexmac_core::config::WindowConfig;
use hexmac_core::{load_config, AppConfig, CaptureVisibilityController, MessageRouter};
use tauri::{AppHandle, Manager};
use tokio::sync::RwLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use window::WindowSurface;

pub struct AppState {
    pub config: RwLock<AppConfig>,
}

pub struct BridgeState {
    pub router: MessageRouter,
}

fn init_logging(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Attach the visibility controller to the configured window and register the router
fn setup_bridge(app: &AppHandle, window_config: &WindowConfig) -> Result<(), Box<dyn std::error::Error>> {
    let window = app
        .get_webview_window(&window_config.label)
        .ok_or_else(|| format!("Window '{}' not found", window_config.label))?;

    window.set_always_on_top(window_config.always_on_top)?;
    window.set_visible_on_all_workspaces(window_config.visible_on_all_workspaces)?;

    let (visibility, actor) = CaptureVisibilityController::new(WindowSurface::new(window));
    tauri::async_runtime::spawn(actor.run());

    if window_config.start_hidden {
        let controller = visibility.clone();
        tauri::async_runtime::spawn(async move {
            if let Err(e) = controller.set_hidden(true).await {
                tracing::error!("Failed to hide window from capture at startup: {}", e);
            }
        });
    }

    app.manage(BridgeState {
        router: MessageRouter::new(permissions::system_provider(), visibility),
    });
    tracing::info!("Bridge ready on window '{}'", window_config.label);
    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    let (config, config_error) = match load_config() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&config.logging.filter);
    tracing::info!("Starting Hexmac v{}", env!("CARGO_PKG_VERSION"));
    if let Some(e) = config_error {
        tracing::warn!("Failed to load config, using defaults: {}", e);
    }

    let window_config = config.window.clone();

    tauri::Builder::default()
        .manage(AppState {
            config: RwLock::new(config),
        })
        .invoke_handler(tauri::generate_handler![
            commands::bridge::invoke_method,
            commands::config::get_config,
            commands::config::save_config,
        ])
        .setup(move |app| setup_bridge(app.handle(), &window_config))
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;

use backoffice_business::{AuthUser, BusinessConfig, IdentityToolkitProvider, SessionContext};
use backoffice_ui::{BackofficeApp, state::State};
use log::{info, warn};

fn main() -> eframe::Result {
    // Log to stderr (if you run with `RUST_LOG=debug`).
    env_logger::Builder::from_env(env_logger::Env::default()).init();

    // Commands and flag updates are spawned onto this runtime from the UI thread.
    let runtime = tokio::runtime::Runtime::new().expect("Failed to start tokio runtime");
    let _guard = runtime.enter();

    let config = BusinessConfig::init().unwrap_or_else(|err| {
        warn!("Falling back to built-in configuration: {err}");
        BusinessConfig::default()
    });
    info!("Using api at {}", config.api_url());

    let uid = std::env::var("SESSION_UID").unwrap_or_default();
    let mut provider = IdentityToolkitProvider::new(&config);
    if uid.is_empty() {
        warn!("SESSION_UID is not set, password changes will fail");
    } else {
        provider = provider.with_user(AuthUser {
            uid: uid.clone(),
            email: std::env::var("SESSION_EMAIL").ok(),
            id_token: None,
        });
    }

    let mut state = State::new(config, SessionContext::new(uid), Arc::new(provider));
    // Invoice ids are passed as arguments; flags start cleared.
    for id in std::env::args().skip(1) {
        state.add_invoice(&id, false, false, false);
    }

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 480.0])
            .with_min_inner_size([360.0, 240.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Back office",
        native_options,
        Box::new(move |_cc| Ok(Box::new(BackofficeApp::new(state)))),
    )
}

//! Zeytin AI: olive leaf disease classifier.
//!
//! Core modules (always built):
//!   - upload/: file validation + base64 encoding
//!   - llm/: prompt, schema and the Gemini classify call
//!   - session.rs: Idle → Loading → Success | Error state machine
//!   - view.rs: pure state → view model rendering
//!   - config.rs: startup configuration (env, .env files, keychain)
//!
//! With the `desktop` feature, `run()` wires them into a Tauri app.
//! No business logic lives in the shell: only state management and the
//! command registry.

pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod upload;
pub mod view;

#[cfg(feature = "desktop")]
mod commands;

/// The session type managed by the desktop shell.
pub type DesktopSession = session::AnalysisSession<llm::GeminiClient>;

/// Entry point, called by the desktop binary.
#[cfg(feature = "desktop")]
#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    use tauri::{Emitter, Manager};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let project_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    config::load_env_files(project_root);

    let app_config = config::AppConfig::from_env();
    app_config.log_summary();

    tauri::Builder::default()
        .plugin(tauri_plugin_dialog::init())
        .invoke_handler(tauri::generate_handler![
            commands::get_view,
            commands::select_image_path,
            commands::reset_analysis,
            commands::cancel_analysis,
        ])
        .setup(move |app| {
            log::info!("[STARTUP] Zeytin AI starting up");

            let client = llm::GeminiClient::new(&app_config)?;
            let handle = app.handle().clone();
            let session = DesktopSession::new(client, app_config.request_timeout).with_listener(
                move |snapshot| {
                    if let Err(e) = handle.emit("analysis-state", view::render(snapshot)) {
                        log::warn!("[SESSION] Failed to emit state: {}", e);
                    }
                },
            );
            app.manage(session);

            log::info!("[STARTUP] Ready for uploads");
            Ok(())
        })
        .run(tauri::generate_context!())
        .expect("Error running Zeytin AI");
}

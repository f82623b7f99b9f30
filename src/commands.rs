//! Tauri command handlers.
//!
//! Thin wrappers that bridge frontend invoke() calls to the session.
//! Every command answers with the freshly rendered view so the frontend
//! can redraw without waiting for the `analysis-state` event.

use crate::session::SelectOutcome;
use crate::view::{self, View};
use crate::DesktopSession;
use tauri::State;

/// Tauri command: current view. Called by the window on load.
#[tauri::command]
pub fn get_view(session: State<'_, DesktopSession>) -> View {
    view::render(&session.snapshot())
}

/// Tauri command: analyze an image picked in the file dialog or dropped
/// on the window.
///
/// Resolves after the analysis finishes. Ignored unless the upload prompt is showing.
#[tauri::command]
pub async fn select_image_path(
    session: State<'_, DesktopSession>,
    path: String,
) -> Result<View, String> {
    match session.select_path(&path).await {
        SelectOutcome::Ignored => log::info!("[UPLOAD] Not idle, dropped {}", path),
        SelectOutcome::Rejected(e) => log::info!("[UPLOAD] Rejected {}: {}", path, e),
        SelectOutcome::Completed(status) => log::info!("[UPLOAD] {} → {:?}", path, status),
        SelectOutcome::Cancelled => log::info!("[UPLOAD] {} cancelled", path),
    }
    Ok(view::render(&session.snapshot()))
}

/// Tauri command: back to the upload screen.
#[tauri::command]
pub fn reset_analysis(session: State<'_, DesktopSession>) -> View {
    session.reset();
    view::render(&session.snapshot())
}

/// Tauri command: abandon the running analysis.
#[tauri::command]
pub fn cancel_analysis(session: State<'_, DesktopSession>) -> View {
    session.cancel();
    view::render(&session.snapshot())
}

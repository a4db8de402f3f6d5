// chat-overlay-translator/src/overlay/commands.rs

// ============================================================================
// PROCESSAMENTO DE COMANDOS DO OVERLAY
// ============================================================================

use crate::app_state::{AppCommand, OverlayCommand};
use crate::overlay::OverlayApp;

/// Processa comandos pendentes enviados para a thread principal.
pub fn process_pending_commands(ctx: &eframe::egui::Context, app: &mut OverlayApp) {
    // Controles (hotkeys / tray)
    while let Ok(command) = app.app_commands.try_recv() {
        match command {
            AppCommand::OpenRegionSelector => app.open_selector(),
            AppCommand::Quit => {
                info!("👋 Encerrando...");
                ctx.send_viewport_cmd(eframe::egui::ViewportCommand::Close);
            }
        }
    }

    // Scheduler
    while let Ok(command) = app.overlay_commands.try_recv() {
        apply_overlay_command(&mut app.text, &mut app.hidden_for_capture, command);
    }
}

/// Atualiza texto/visibilidade a partir de um comando do scheduler
fn apply_overlay_command(text: &mut Option<String>, hidden: &mut bool, command: OverlayCommand) {
    match command {
        OverlayCommand::Show(new_text) => {
            *text = Some(new_text);
            *hidden = false;
        }
        OverlayCommand::Hide => *hidden = true,
        OverlayCommand::Restore => *hidden = false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_cycle_hides_then_restores_previous_text() {
        let mut text = Some("Hello".to_string());
        let mut hidden = false;

        apply_overlay_command(&mut text, &mut hidden, OverlayCommand::Hide);
        assert!(hidden);
        apply_overlay_command(&mut text, &mut hidden, OverlayCommand::Restore);
        assert!(!hidden);
        assert_eq!(text.as_deref(), Some("Hello"));

        apply_overlay_command(&mut text, &mut hidden, OverlayCommand::Hide);
        apply_overlay_command(&mut text, &mut hidden, OverlayCommand::Show("Bye".to_string()));
        assert!(!hidden);
        assert_eq!(text.as_deref(), Some("Bye"));
    }
}

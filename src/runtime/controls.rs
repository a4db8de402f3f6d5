// chat-overlay-translator/src/runtime/controls.rs

// ============================================================================
// SUPERFÍCIE DE CONTROLE - usada pelas hotkeys e pelo tray
// ============================================================================

use crossbeam_channel::Sender;
use std::thread;

use crate::app_state::{AppCommand, FontMode, OverlayCommand, Session};
use crate::hotkey::HotkeyAction;
use crate::logging;

/// Texto mostrado pelo "testar overlay"
pub const TEST_OVERLAY_TEXT: &str =
    "Overlay test: this box shows where translations will appear.";

#[derive(Clone)]
pub struct Controls {
    session: Session,
    overlay: Sender<OverlayCommand>,
    commands: Sender<AppCommand>,
}

impl Controls {
    pub fn new(session: Session, overlay: Sender<OverlayCommand>, commands: Sender<AppCommand>) -> Self {
        Controls {
            session,
            overlay,
            commands,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn send_command(&self, command: AppCommand) {
        if let Err(e) = self.commands.send(command) {
            error!("❌ Erro ao enviar comando: {}", e);
        }
    }

    fn show_text(&self, text: String) {
        if self.session.capture_region().is_none() {
            info!("⚠️  Nenhuma região definida, nada para mostrar");
            return;
        }
        if self.overlay.send(OverlayCommand::Show(text)).is_err() {
            warn!("⚠️  Overlay fechado");
        }
    }

    pub fn toggle_enabled(&self) -> bool {
        self.session.toggle_enabled()
    }

    pub fn set_scan_interval(&self, index: usize) -> bool {
        self.session.set_scan_interval_index(index)
    }

    pub fn next_scan_interval(&self) {
        self.session.next_scan_interval();
    }

    pub fn set_font_mode(&self, mode: FontMode) {
        self.session.set_font_mode(mode);
    }

    pub fn next_font_size(&self) {
        self.session.next_font_mode();
    }

    pub fn snap_back(&self) {
        self.session.snap_back();
    }

    pub fn reselect_region(&self) {
        info!("");
        info!("🎯 ============================================");
        info!("🎯 SOLICITANDO ABERTURA DO SELETOR DE REGIÃO");
        info!("🎯 ============================================");
        self.send_command(AppCommand::OpenRegionSelector);
    }

    pub fn test_overlay(&self) {
        info!("🧪 Testando overlay");
        self.show_text(TEST_OVERLAY_TEXT.to_string());
    }

    pub fn show_last_error(&self) {
        let message = self
            .session
            .last_error()
            .unwrap_or_else(|| "Nenhum erro registrado".to_string());
        info!("🩺 Último erro: {}", message);
        self.show_text(message);
    }

    /// Abre o logs.txt no visualizador padrão do sistema
    #[cfg_attr(not(windows), allow(dead_code))]
    pub fn view_logs(&self) {
        let path = logging::log_file_path();
        info!("📝 Abrindo logs: {}", path.display());

        match logging::opener_command(&path).spawn() {
            Ok(mut child) => {
                // Só para não deixar zumbi
                let _ = thread::Builder::new()
                    .name("log-viewer".to_string())
                    .spawn(move || child.wait());
            }
            Err(e) => error!("❌ Não foi possível abrir os logs: {}", e),
        }
    }

    pub fn quit(&self) {
        self.send_command(AppCommand::Quit);
    }

    /// Executa a ação de uma hotkey
    pub fn apply(&self, action: HotkeyAction) {
        match action {
            HotkeyAction::ToggleEnabled => {
                self.toggle_enabled();
            }
            HotkeyAction::ReselectRegion => self.reselect_region(),
            HotkeyAction::SnapBack => self.snap_back(),
            HotkeyAction::NextScanInterval => self.next_scan_interval(),
            HotkeyAction::NextFontSize => self.next_font_size(),
            HotkeyAction::ShowLastError => self.show_last_error(),
            HotkeyAction::TestOverlay => self.test_overlay(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::CaptureRegion;
    use crate::config::AppConfig;
    use crate::errors::CycleError;
    use crossbeam_channel::{unbounded, Receiver};
    use std::time::Duration;

    fn controls() -> (Controls, Receiver<OverlayCommand>, Receiver<AppCommand>) {
        let (overlay_tx, overlay_rx) = unbounded();
        let (command_tx, command_rx) = unbounded();
        let session = Session::new(&AppConfig::default());
        (Controls::new(session, overlay_tx, command_tx), overlay_rx, command_rx)
    }

    #[test]
    fn hotkeys_mutate_session() {
        let (controls, _, _) = controls();
        controls.apply(HotkeyAction::ToggleEnabled);
        assert!(!controls.session().enabled());
        controls.apply(HotkeyAction::NextScanInterval);
        assert_eq!(controls.session().scan_interval(), Duration::from_secs(4));
        controls.apply(HotkeyAction::NextFontSize);
        assert_eq!(controls.session().font_mode(), FontMode::Fixed(16.0));
    }

    #[test]
    fn reselect_and_quit_go_to_gui_thread() {
        let (controls, _, commands) = controls();
        controls.apply(HotkeyAction::ReselectRegion);
        controls.quit();
        assert_eq!(commands.try_recv(), Ok(AppCommand::OpenRegionSelector));
        assert_eq!(commands.try_recv(), Ok(AppCommand::Quit));
    }

    #[test]
    fn diagnostics_use_the_render_path() {
        let (controls, overlay, _) = controls();

        // Sem região não há onde mostrar
        controls.apply(HotkeyAction::TestOverlay);
        assert!(overlay.try_recv().is_err());

        controls
            .session()
            .set_region(CaptureRegion::new(100, 100, 400, 300).unwrap());
        controls.apply(HotkeyAction::TestOverlay);
        assert_eq!(
            overlay.try_recv(),
            Ok(OverlayCommand::Show(TEST_OVERLAY_TEXT.to_string()))
        );

        controls.apply(HotkeyAction::ShowLastError);
        assert_eq!(
            overlay.try_recv(),
            Ok(OverlayCommand::Show("Nenhum erro registrado".to_string()))
        );

        controls
            .session()
            .record_error(&CycleError::Capture("display".to_string()));
        controls.apply(HotkeyAction::ShowLastError);
        match overlay.try_recv() {
            Ok(OverlayCommand::Show(text)) => assert!(text.contains("CaptureFailure")),
            other => panic!("esperava Show, veio {:?}", other),
        }
    }

    #[test]
    fn invalid_interval_index_is_rejected() {
        let (controls, _, _) = controls();
        assert!(!controls.set_scan_interval(99));
        assert!(controls.set_scan_interval(0));
        assert_eq!(controls.session().scan_interval(), Duration::from_secs(1));
    }
}

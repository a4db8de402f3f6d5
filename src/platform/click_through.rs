// chat-overlay-translator/src/platform/click_through.rs

// ============================================================================
// CONTROLE CLICK-THROUGH DA JANELA OVERLAY
// ============================================================================
//
// Modo mover INATIVO -> janela ignora o mouse (cliques vão para o jogo)
// Modo mover ATIVO   -> janela recebe o mouse (arrastar para mover)
//
// O click-through é um estilo da janela no SO, não estado da aplicação:
// quando a janela é recriada (escondida e mostrada de novo) ele se perde,
// então o controller reaplica sempre que a superfície volta, e também
// periodicamente.
//
// ============================================================================

use std::time::{Duration, Instant};

use crate::errors::CycleError;

/// Título da janela do overlay (usado para achar o HWND no Windows)
pub const OVERLAY_WINDOW_TITLE: &str = "Chat Overlay Translator";

/// Intervalo de reaplicação periódica
const REAPPLY_EVERY: Duration = Duration::from_millis(500);

/// Capacidade de ligar/desligar o click-through numa janela
pub trait ClickThroughCapability {
    fn set_click_through(&mut self, enabled: bool) -> Result<(), CycleError>;
}

/// Click-through desejado para o modo de interação
pub fn passthrough_for(interaction_mode: bool) -> bool {
    !interaction_mode
}

pub struct ClickThroughController {
    capability: Box<dyn ClickThroughCapability>,
    /// Último valor aplicado com sucesso (None = precisa aplicar)
    applied: Option<bool>,
    last_apply: Option<Instant>,
    reapply_every: Duration,
}

impl ClickThroughController {
    pub fn new(capability: Box<dyn ClickThroughCapability>) -> Self {
        Self::with_reapply_interval(capability, REAPPLY_EVERY)
    }

    pub fn with_reapply_interval(
        capability: Box<dyn ClickThroughCapability>,
        reapply_every: Duration,
    ) -> Self {
        ClickThroughController {
            capability,
            applied: None,
            last_apply: None,
            reapply_every,
        }
    }

    /// A janela foi recriada/mostrada de novo: o estilo antigo não vale mais
    pub fn surface_recreated(&mut self) {
        self.applied = None;
    }

    /// Força um valor (ex: seletor de região precisa receber o mouse)
    pub fn force(&mut self, enabled: bool) -> Result<(), CycleError> {
        self.apply(enabled)
    }

    /// Aplica o click-through correspondente ao modo, se necessário.
    /// Retorna true se aplicou neste chamado.
    pub fn sync(&mut self, interaction_mode: bool) -> Result<bool, CycleError> {
        let wanted = passthrough_for(interaction_mode);
        let stale = self
            .last_apply
            .map_or(true, |at| at.elapsed() >= self.reapply_every);

        if self.applied == Some(wanted) && !stale {
            return Ok(false);
        }

        let changed = self.applied.is_some() && self.applied != Some(wanted);
        self.apply(wanted)?;
        if changed {
            debug!(
                "🖱️  Click-through: {}",
                if wanted { "✅ ligado" } else { "❌ desligado" }
            );
        }
        Ok(true)
    }

    fn apply(&mut self, enabled: bool) -> Result<(), CycleError> {
        match self.capability.set_click_through(enabled) {
            Ok(()) => {
                self.applied = Some(enabled);
                self.last_apply = Some(Instant::now());
                Ok(())
            }
            Err(e) => {
                // Janela sumiu: tenta de novo no próximo frame
                self.applied = None;
                Err(e)
            }
        }
    }
}

/// Implementação da plataforma atual
pub fn platform_capability(ctx: &eframe::egui::Context) -> Box<dyn ClickThroughCapability> {
    #[cfg(windows)]
    {
        let _ = ctx;
        Box::new(WindowsClickThrough::new(OVERLAY_WINDOW_TITLE))
    }

    #[cfg(not(windows))]
    {
        Box::new(ViewportClickThrough::new(ctx.clone()))
    }
}

// ============================================================================
// PORTÁVEL (egui / winit)
// ============================================================================

/// Usa o comando de viewport do egui (hittest do winit)
pub struct ViewportClickThrough {
    ctx: eframe::egui::Context,
}

impl ViewportClickThrough {
    pub fn new(ctx: eframe::egui::Context) -> Self {
        ViewportClickThrough { ctx }
    }
}

impl ClickThroughCapability for ViewportClickThrough {
    fn set_click_through(&mut self, enabled: bool) -> Result<(), CycleError> {
        self.ctx
            .send_viewport_cmd(eframe::egui::ViewportCommand::MousePassthrough(enabled));
        Ok(())
    }
}

// ============================================================================
// WINDOWS (estilos WS_EX_LAYERED | WS_EX_TRANSPARENT)
// ============================================================================

#[cfg(windows)]
pub struct WindowsClickThrough {
    title: Vec<u16>,
}

#[cfg(windows)]
impl WindowsClickThrough {
    pub fn new(title: &str) -> Self {
        WindowsClickThrough {
            title: title.encode_utf16().chain(std::iter::once(0)).collect(),
        }
    }
}

#[cfg(windows)]
impl ClickThroughCapability for WindowsClickThrough {
    fn set_click_through(&mut self, enabled: bool) -> Result<(), CycleError> {
        use winapi::um::winuser::{
            FindWindowW, GetWindowLongW, SetWindowLongW, GWL_EXSTYLE, WS_EX_LAYERED,
            WS_EX_TRANSPARENT,
        };

        unsafe {
            let hwnd = FindWindowW(std::ptr::null(), self.title.as_ptr());
            if hwnd.is_null() {
                return Err(CycleError::Render(
                    "janela do overlay não encontrada para click-through".to_string(),
                ));
            }

            let ex_style = GetWindowLongW(hwnd, GWL_EXSTYLE);
            let new_style = if enabled {
                ex_style | WS_EX_LAYERED as i32 | WS_EX_TRANSPARENT as i32
            } else {
                (ex_style | WS_EX_LAYERED as i32) & !(WS_EX_TRANSPARENT as i32)
            };
            if new_style != ex_style {
                SetWindowLongW(hwnd, GWL_EXSTYLE, new_style);
                trace!("✅ Estilo da janela atualizado (click-through: {})", enabled);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Registra cada chamada; pode simular janela inexistente
    struct Recorder {
        calls: Arc<Mutex<Vec<bool>>>,
        fail: Arc<Mutex<bool>>,
    }

    impl ClickThroughCapability for Recorder {
        fn set_click_through(&mut self, enabled: bool) -> Result<(), CycleError> {
            if *self.fail.lock().unwrap() {
                return Err(CycleError::Render("sem janela".to_string()));
            }
            self.calls.lock().unwrap().push(enabled);
            Ok(())
        }
    }

    fn controller() -> (ClickThroughController, Arc<Mutex<Vec<bool>>>, Arc<Mutex<bool>>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let fail = Arc::new(Mutex::new(false));
        let recorder = Recorder {
            calls: calls.clone(),
            fail: fail.clone(),
        };
        (
            ClickThroughController::with_reapply_interval(Box::new(recorder), Duration::from_secs(3600)),
            calls,
            fail,
        )
    }

    #[test]
    fn passthrough_follows_interaction_mode() {
        assert!(passthrough_for(false));
        assert!(!passthrough_for(true));
    }

    #[test]
    fn applies_only_on_change() {
        let (mut ctl, calls, _) = controller();
        assert!(ctl.sync(false).unwrap());
        assert!(!ctl.sync(false).unwrap());
        assert!(ctl.sync(true).unwrap());
        assert!(ctl.sync(false).unwrap());
        assert_eq!(*calls.lock().unwrap(), vec![true, false, true]);
    }

    #[test]
    fn reapplies_after_surface_recreation() {
        let (mut ctl, calls, _) = controller();
        ctl.sync(false).unwrap();
        ctl.surface_recreated();
        assert!(ctl.sync(false).unwrap());
        assert_eq!(*calls.lock().unwrap(), vec![true, true]);
    }

    #[test]
    fn failure_is_retried_next_time() {
        let (mut ctl, calls, fail) = controller();
        *fail.lock().unwrap() = true;
        assert!(matches!(ctl.sync(false), Err(CycleError::Render(_))));
        *fail.lock().unwrap() = false;
        assert!(ctl.sync(false).unwrap());
        assert_eq!(*calls.lock().unwrap(), vec![true]);
    }

    #[test]
    fn periodic_reapply() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let recorder = Recorder {
            calls: calls.clone(),
            fail: Arc::new(Mutex::new(false)),
        };
        let mut ctl = ClickThroughController::with_reapply_interval(Box::new(recorder), Duration::ZERO);
        ctl.sync(false).unwrap();
        assert!(ctl.sync(false).unwrap());
        assert_eq!(calls.lock().unwrap().len(), 2);
    }
}

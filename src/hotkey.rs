// chat-overlay-translator/src/hotkey.rs

// ============================================================================
// MÓDULO HOTKEY - Gerenciamento de hotkeys usando device_query
// ============================================================================
//
// - Ctrl+Alt SEGURADO = modo mover (overlay recebe o mouse)
// - Ctrl+Alt+<tecla>  = ação (dispara uma vez por pressionamento)
//
// ============================================================================

use device_query::{DeviceQuery, DeviceState, Keycode};
use std::collections::HashSet;

use crate::config::HotkeyConfig;

/// Ações disparadas por hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    ToggleEnabled,
    ReselectRegion,
    SnapBack,
    NextScanInterval,
    NextFontSize,
    ShowLastError,
    TestOverlay,
}

/// Resultado de uma leitura do teclado
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyPoll {
    /// Ctrl+Alt está segurado
    pub move_mode: bool,
    /// Hotkeys que acabaram de ser pressionadas
    pub actions: Vec<HotkeyAction>,
}

/// Converte o nome da tecla do config ("T", "F5", "7") para Keycode
pub fn parse_key(name: &str) -> Option<Keycode> {
    let key = match name.trim().to_uppercase().as_str() {
        "A" => Keycode::A,
        "B" => Keycode::B,
        "C" => Keycode::C,
        "D" => Keycode::D,
        "E" => Keycode::E,
        "F" => Keycode::F,
        "G" => Keycode::G,
        "H" => Keycode::H,
        "I" => Keycode::I,
        "J" => Keycode::J,
        "K" => Keycode::K,
        "L" => Keycode::L,
        "M" => Keycode::M,
        "N" => Keycode::N,
        "O" => Keycode::O,
        "P" => Keycode::P,
        "Q" => Keycode::Q,
        "R" => Keycode::R,
        "S" => Keycode::S,
        "T" => Keycode::T,
        "U" => Keycode::U,
        "V" => Keycode::V,
        "W" => Keycode::W,
        "X" => Keycode::X,
        "Y" => Keycode::Y,
        "Z" => Keycode::Z,
        "0" => Keycode::Key0,
        "1" => Keycode::Key1,
        "2" => Keycode::Key2,
        "3" => Keycode::Key3,
        "4" => Keycode::Key4,
        "5" => Keycode::Key5,
        "6" => Keycode::Key6,
        "7" => Keycode::Key7,
        "8" => Keycode::Key8,
        "9" => Keycode::Key9,
        "F1" => Keycode::F1,
        "F2" => Keycode::F2,
        "F3" => Keycode::F3,
        "F4" => Keycode::F4,
        "F5" => Keycode::F5,
        "F6" => Keycode::F6,
        "F7" => Keycode::F7,
        "F8" => Keycode::F8,
        "F9" => Keycode::F9,
        "F10" => Keycode::F10,
        "F11" => Keycode::F11,
        "F12" => Keycode::F12,
        _ => return None,
    };
    Some(key)
}

/// Lógica das hotkeys sem acesso ao teclado (testável)
#[derive(Debug, Clone)]
pub struct HotkeyMatcher {
    bindings: Vec<(Keycode, HotkeyAction)>,
    /// Teclas de ação que estavam pressionadas na leitura anterior
    held: HashSet<Keycode>,
}

impl HotkeyMatcher {
    pub fn new(config: &HotkeyConfig) -> Self {
        let entries = [
            (&config.toggle_enabled, HotkeyAction::ToggleEnabled),
            (&config.reselect_region, HotkeyAction::ReselectRegion),
            (&config.snap_back, HotkeyAction::SnapBack),
            (&config.next_scan_interval, HotkeyAction::NextScanInterval),
            (&config.next_font_size, HotkeyAction::NextFontSize),
            (&config.show_last_error, HotkeyAction::ShowLastError),
            (&config.test_overlay, HotkeyAction::TestOverlay),
        ];

        let mut bindings = Vec::new();
        for (name, action) in entries {
            match parse_key(name) {
                Some(key) => bindings.push((key, action)),
                None => warn!("⚠️  Tecla '{}' inválida para {:?}, hotkey desativada", name, action),
            }
        }

        HotkeyMatcher {
            bindings,
            held: HashSet::new(),
        }
    }

    pub fn bindings(&self) -> &[(Keycode, HotkeyAction)] {
        &self.bindings
    }

    /// Processa o conjunto de teclas pressionadas agora
    pub fn process(&mut self, keys: &[Keycode]) -> KeyPoll {
        let ctrl = keys.contains(&Keycode::LControl) || keys.contains(&Keycode::RControl);
        let alt = keys.contains(&Keycode::LAlt) || keys.contains(&Keycode::RAlt);
        let move_mode = ctrl && alt;

        let mut actions = Vec::new();
        let mut held = HashSet::new();

        for (key, action) in &self.bindings {
            if !keys.contains(key) {
                continue;
            }
            held.insert(*key);
            // Borda de subida: só dispara quando a tecla acabou de descer
            if move_mode && !self.held.contains(key) {
                actions.push(*action);
            }
        }

        self.held = held;
        KeyPoll { move_mode, actions }
    }
}

/// Estrutura que gerencia hotkeys
pub struct HotkeyManager {
    device_state: DeviceState,
    matcher: HotkeyMatcher,
}

impl HotkeyManager {
    /// Cria um novo gerenciador de hotkeys
    pub fn new(config: &HotkeyConfig) -> Self {
        info!("⌨️  Configurando detecção de teclas...");

        let matcher = HotkeyMatcher::new(config);
        for (key, action) in matcher.bindings() {
            info!("   Ctrl+Alt+{:?} = {:?}", key, action);
        }
        info!("   Ctrl+Alt segurado = mover o overlay");

        HotkeyManager {
            device_state: DeviceState::new(),
            matcher,
        }
    }

    /// Lê o teclado e retorna o estado das hotkeys
    pub fn poll(&mut self) -> KeyPoll {
        let keys = self.device_state.get_keys();
        self.matcher.process(&keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> HotkeyMatcher {
        HotkeyMatcher::new(&HotkeyConfig::default())
    }

    #[test]
    fn parses_config_key_names() {
        assert_eq!(parse_key("t"), Some(Keycode::T));
        assert_eq!(parse_key(" F5 "), Some(Keycode::F5));
        assert_eq!(parse_key("7"), Some(Keycode::Key7));
        assert_eq!(parse_key("Shift"), None);
    }

    #[test]
    fn ctrl_alt_held_is_move_mode() {
        let mut m = matcher();
        assert!(m.process(&[Keycode::LControl, Keycode::RAlt]).move_mode);
        assert!(!m.process(&[Keycode::LControl]).move_mode);
        assert!(!m.process(&[]).move_mode);
    }

    #[test]
    fn action_fires_once_per_press() {
        let mut m = matcher();
        let combo = [Keycode::LControl, Keycode::LAlt, Keycode::T];

        assert_eq!(m.process(&combo).actions, vec![HotkeyAction::ToggleEnabled]);
        // Tecla continua segurada: não repete
        assert!(m.process(&combo).actions.is_empty());
        // Solta e aperta de novo
        m.process(&[Keycode::LControl, Keycode::LAlt]);
        assert_eq!(m.process(&combo).actions, vec![HotkeyAction::ToggleEnabled]);
    }

    #[test]
    fn key_without_modifiers_does_nothing() {
        let mut m = matcher();
        assert!(m.process(&[Keycode::T]).actions.is_empty());
        // Segurar T antes do Ctrl+Alt não dispara
        assert!(m.process(&[Keycode::T, Keycode::LControl, Keycode::LAlt]).actions.is_empty());
    }

    #[test]
    fn invalid_binding_is_skipped() {
        let config = HotkeyConfig {
            toggle_enabled: "???".to_string(),
            ..HotkeyConfig::default()
        };
        let m = HotkeyMatcher::new(&config);
        assert_eq!(m.bindings().len(), 6);
    }
}

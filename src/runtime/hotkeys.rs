// chat-overlay-translator/src/runtime/hotkeys.rs

// ============================================================================
// THREAD DE HOTKEYS (roda em background)
// ============================================================================

use std::thread;
use std::time::Duration;

use crate::config::HotkeyConfig;
use crate::hotkey::HotkeyManager;
use crate::runtime::controls::Controls;

/// Intervalo de leitura do teclado
const POLL_INTERVAL: Duration = Duration::from_millis(30);

pub fn start_hotkey_thread(controls: Controls, config: HotkeyConfig) {
    let spawned = thread::Builder::new()
        .name("hotkeys".to_string())
        .spawn(move || {
            info!("⌨️  Thread de hotkeys iniciada");

            let mut hotkey_manager = HotkeyManager::new(&config);

            loop {
                let poll = hotkey_manager.poll();

                // Ctrl+Alt segurado liga o modo mover; a GUI reaplica o click-through
                controls.session().set_interaction_mode(poll.move_mode);

                for action in poll.actions {
                    debug!("⌨️  Hotkey: {:?}", action);
                    controls.apply(action);
                }

                thread::sleep(POLL_INTERVAL);
            }
        });

    if let Err(e) = spawned {
        error!("❌ Erro ao iniciar thread de hotkeys: {}", e);
    }
}

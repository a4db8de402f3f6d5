// chat-overlay-translator/src/runtime.rs

// ============================================================================
// THREADS DE CONTROLE (hotkeys, tray)
// ============================================================================

pub mod controls;
pub mod hotkeys;
#[cfg(windows)]
pub mod tray;

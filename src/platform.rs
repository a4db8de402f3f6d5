// chat-overlay-translator/src/platform.rs

// ============================================================================
// INTEGRAÇÃO COM O SISTEMA OPERACIONAL
// ============================================================================

pub mod click_through;

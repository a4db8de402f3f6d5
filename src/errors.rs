// chat-overlay-translator/src/errors.rs

// ============================================================================
// FALHAS DE UM CICLO
// ============================================================================
// Nenhuma delas é fatal: o ciclo registra, guarda como "último erro" e o
// loop segue para o próximo intervalo.
// ============================================================================

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CycleError {
    /// Screenshot não pôde ser tirada (região inválida, API do display)
    #[error("Falha na captura: {0}")]
    Capture(String),

    /// OCR passou do limite e foi abandonado
    #[error("OCR excedeu o limite de {0:?}")]
    OcrTimeout(Duration),

    /// OCR falhou por outro motivo
    #[error("Falha no OCR: {0}")]
    Ocr(String),

    /// Tradução remota falhou
    #[error("Falha na tradução: {0}")]
    Translation(String),

    /// Mutação da janela do overlay falhou
    #[error("Falha no overlay: {0}")]
    Render(String),

    /// Pânico capturado dentro de um ciclo
    #[error("Erro inesperado no ciclo: {0}")]
    Unexpected(String),
}

impl CycleError {
    /// Nome curto usado nos logs
    pub fn kind(&self) -> &'static str {
        match self {
            CycleError::Capture(_) => "CaptureFailure",
            CycleError::OcrTimeout(_) => "OcrTimeout",
            CycleError::Ocr(_) => "OcrFailure",
            CycleError::Translation(_) => "TranslationFailure",
            CycleError::Render(_) => "RenderFailure",
            CycleError::Unexpected(_) => "Unexpected",
        }
    }
}

// chat-overlay-translator/src/config.rs

// ============================================================================
// MÓDULO CONFIG - Configurações da aplicação
// ============================================================================
//
// O config.json é só LIDO na inicialização. Mudanças feitas em tempo de
// execução (tray/hotkeys) não são gravadas de volta: cada execução começa
// com os valores do arquivo (ou os padrões, se o arquivo não existir).
//
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Conjunto padrão de intervalos de scan (segundos)
pub const DEFAULT_SCAN_INTERVALS: [u64; 5] = [1, 2, 4, 6, 10];

/// Limite rígido do OCR (segundos)
pub const OCR_TIMEOUT_SECS: u64 = 3;

/// Configuração do loop de captura
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Intervalos disponíveis em segundos (ex: [1, 2, 4, 6, 10] ou [1, 2, 5, 10, 30])
    pub intervals_secs: Vec<u64>,
    /// Índice do intervalo inicial
    pub default_index: usize,
    /// Espera depois de esconder o overlay e antes de capturar
    pub settle_ms: u64,
    /// Tempo máximo do OCR
    pub ocr_timeout_secs: u64,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            intervals_secs: DEFAULT_SCAN_INTERVALS.to_vec(),
            default_index: 1,
            settle_ms: 80,
            ocr_timeout_secs: OCR_TIMEOUT_SECS,
        }
    }
}

/// Configuração do motor de OCR
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// "windows" (OCR nativo) ou "tesseract" (CLI externo)
    pub engine: String,
    /// Idiomas passados ao Tesseract
    pub languages: String,
    /// Caminho do executável do Tesseract
    pub tesseract_path: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            engine: if cfg!(windows) {
                "windows".to_string()
            } else {
                "tesseract".to_string()
            },
            languages: "rus+eng".to_string(),
            tesseract_path: if cfg!(windows) {
                r"C:\Program Files\Tesseract-OCR\tesseract.exe".to_string()
            } else {
                "tesseract".to_string()
            },
        }
    }
}

/// Configuração de tradução (o par de idiomas é fixo: ru -> en)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    /// Provedor: "google" ou "deepl"
    pub provider: String,
    /// API key do DeepL
    pub deepl_api_key: String,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            provider: "google".to_string(),
            deepl_api_key: String::new(),
        }
    }
}

/// Configuração visual do overlay
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Tamanhos oferecidos no menu/hotkey
    pub font_sizes: Vec<f32>,
    pub default_font_size: f32,
    /// Começa no modo "auto-fit" (fonte ajustada à região)
    pub auto_fit: bool,
    pub min_font_size: f32,
    pub max_font_size: f32,
    /// Desenha uma borda em volta do overlay
    pub show_border: bool,
    /// Mostra um cabeçalho com status quando o modo mover está ativo
    pub show_header: bool,
    pub background_color: [u8; 4],
    pub text_color: [u8; 4],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        OverlayConfig {
            font_sizes: vec![9.0, 12.0, 16.0],
            default_font_size: 12.0,
            auto_fit: false,
            min_font_size: 8.0,
            max_font_size: 32.0,
            show_border: false,
            show_header: true,
            background_color: [0, 0, 0, 180],
            text_color: [255, 255, 0, 255],
        }
    }
}

/// Teclas das hotkeys (sempre combinadas com Ctrl+Alt)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    pub toggle_enabled: String,
    pub reselect_region: String,
    pub snap_back: String,
    pub next_scan_interval: String,
    pub next_font_size: String,
    pub show_last_error: String,
    pub test_overlay: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        HotkeyConfig {
            toggle_enabled: "T".to_string(),
            reselect_region: "R".to_string(),
            snap_back: "S".to_string(),
            next_scan_interval: "I".to_string(),
            next_font_size: "F".to_string(),
            show_last_error: "E".to_string(),
            test_overlay: "O".to_string(),
        }
    }
}

/// Estrutura principal de configuração
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scan: ScanConfig,
    pub ocr: OcrConfig,
    pub translation: TranslationConfig,
    pub overlay: OverlayConfig,
    pub hotkeys: HotkeyConfig,
}

impl AppConfig {
    /// Caminho do arquivo de configuração
    const CONFIG_FILE: &'static str = "config.json";

    /// Carrega configurações do arquivo (ou usa os padrões se não existir)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(Self::CONFIG_FILE))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        info!("📋 Carregando configurações...");

        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Falha ao ler {}", path.display()))?;
            let config = Self::from_json(&contents)
                .with_context(|| format!("Falha ao parsear {}", path.display()))?;
            info!("✅ Configurações carregadas de {}", path.display());
            config
        } else {
            info!("⚠️  {} não encontrado, usando valores padrão", path.display());
            AppConfig::default()
        };

        // API key: prioriza config.json, fallback pra variável de ambiente
        if config.translation.deepl_api_key.is_empty() {
            if let Ok(key) = env::var("DEEPL_API_KEY") {
                config.translation.deepl_api_key = key;
            }
        }

        info!(
            "   ⏱️  Intervalos: {:?} (inicial: {}s)",
            config.scan.intervals_secs, config.scan.intervals_secs[config.scan.default_index]
        );
        info!(
            "   🔍 OCR: {} | 🌐 Tradução: {}",
            config.ocr.engine, config.translation.provider
        );

        Ok(config)
    }

    /// Parseia e valida um JSON de configuração
    pub fn from_json(contents: &str) -> Result<Self> {
        let mut config: AppConfig = serde_json::from_str(contents)?;
        config.validate();
        Ok(config)
    }

    /// Corrige valores inválidos em vez de falhar
    fn validate(&mut self) {
        self.scan.intervals_secs.retain(|secs| *secs > 0);
        if self.scan.intervals_secs.is_empty() {
            warn!("⚠️  Lista de intervalos vazia, usando padrão");
            self.scan.intervals_secs = DEFAULT_SCAN_INTERVALS.to_vec();
        }
        if self.scan.default_index >= self.scan.intervals_secs.len() {
            self.scan.default_index = self.scan.intervals_secs.len() - 1;
        }
        if self.scan.ocr_timeout_secs == 0 {
            self.scan.ocr_timeout_secs = OCR_TIMEOUT_SECS;
        }

        self.overlay.font_sizes.retain(|size| *size > 0.0);
        if self.overlay.font_sizes.is_empty() {
            self.overlay.font_sizes = OverlayConfig::default().font_sizes;
        }
        if self.overlay.default_font_size <= 0.0 {
            self.overlay.default_font_size = OverlayConfig::default().default_font_size;
        }
        if self.overlay.min_font_size > self.overlay.max_font_size {
            std::mem::swap(
                &mut self.overlay.min_font_size,
                &mut self.overlay.max_font_size,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable_without_config_file() {
        let config = AppConfig::default();
        assert_eq!(config.scan.intervals_secs, vec![1, 2, 4, 6, 10]);
        assert_eq!(config.scan.intervals_secs[config.scan.default_index], 2);
        assert_eq!(config.scan.settle_ms, 80);
        assert_eq!(config.scan.ocr_timeout_secs, 3);
        assert_eq!(config.overlay.default_font_size, 12.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = AppConfig::from_json(r#"{ "scan": { "intervals_secs": [1, 2, 5, 10, 30] } }"#)
            .unwrap();
        assert_eq!(config.scan.intervals_secs, vec![1, 2, 5, 10, 30]);
        assert_eq!(config.scan.default_index, 1);
        assert_eq!(config.translation.provider, "google");
    }

    #[test]
    fn invalid_values_are_corrected() {
        let config = AppConfig::from_json(
            r#"{ "scan": { "intervals_secs": [], "default_index": 9, "ocr_timeout_secs": 0 },
                 "overlay": { "min_font_size": 40, "max_font_size": 10 } }"#,
        )
        .unwrap();
        assert_eq!(config.scan.intervals_secs, DEFAULT_SCAN_INTERVALS.to_vec());
        assert_eq!(config.scan.default_index, 4);
        assert_eq!(config.scan.ocr_timeout_secs, 3);
        assert_eq!(config.overlay.min_font_size, 10.0);
        assert_eq!(config.overlay.max_font_size, 40.0);
    }

    #[test]
    fn missing_file_uses_defaults() {
        let config = AppConfig::load_from(Path::new("definitely-not-here.json")).unwrap();
        assert_eq!(config.scan.default_index, 1);
    }
}

// chat-overlay-translator/src/translator.rs

// ============================================================================
// MÓDULO TRANSLATOR - Tradução russo -> inglês
// ============================================================================
//
// Provedores suportados:
// - Google Translate (grátis, sem API key) - padrão
// - DeepL (requer API key)
//
// Sem retry aqui dentro: se falhar (inclusive rate limit), o próximo ciclo
// do scheduler tenta de novo naturalmente.
//
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::TranslationConfig;

/// Par de idiomas fixo
pub const SOURCE_LANG: &str = "ru";
pub const TARGET_LANG: &str = "en";

/// Prefixo mostrado no overlay quando a tradução falha
pub const ERROR_MARKER: &str = "[Erro de tradução]";

/// Tempo máximo de uma requisição HTTP
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Texto visível no overlay quando a tradução falhou
pub fn error_marker(message: &str) -> String {
    format!("{} {}", ERROR_MARKER, message)
}

/// Tradutor bloqueante (chamado da thread do scheduler)
pub trait Translate: Send + Sync {
    fn translate(&self, text: &str) -> Result<String>;

    fn name(&self) -> &'static str;
}

/// Cria o tradutor configurado
pub fn translator_from_config(config: &TranslationConfig) -> Result<Box<dyn Translate>> {
    let http = HttpBackend::new()?;
    match config.provider.to_lowercase().as_str() {
        "deepl" if !config.deepl_api_key.is_empty() => Ok(Box::new(DeepLTranslator {
            http,
            api_key: config.deepl_api_key.clone(),
        })),
        "deepl" => {
            warn!("⚠️  DeepL API key não configurada! Usando Google");
            Ok(Box::new(GoogleTranslator { http }))
        }
        "google" => Ok(Box::new(GoogleTranslator { http })),
        other => {
            warn!("⚠️  Provedor '{}' não reconhecido, usando Google", other);
            Ok(Box::new(GoogleTranslator { http }))
        }
    }
}

// ============================================================================
// HTTP - reqwest dentro de um runtime tokio próprio
// ============================================================================

struct HttpBackend {
    runtime: tokio::runtime::Runtime,
    client: reqwest::Client,
}

impl HttpBackend {
    fn new() -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("Falha ao criar runtime tokio")?;
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .context("Falha ao criar cliente HTTP")?;
        Ok(HttpBackend { runtime, client })
    }
}

// ============================================================================
// GOOGLE TRANSLATE (GRÁTIS, SEM API KEY)
// ============================================================================

pub struct GoogleTranslator {
    http: HttpBackend,
}

impl Translate for GoogleTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        let url = format!(
            "https://translate.googleapis.com/translate_a/single?client=gtx&sl={}&tl={}&dt=t&q={}",
            SOURCE_LANG,
            TARGET_LANG,
            urlencoding::encode(text)
        );

        let response_text = self.http.runtime.block_on(async {
            let response = self
                .http
                .client
                .get(&url)
                .send()
                .await
                .context("Falha ao enviar requisição para Google Translate")?;

            let status = response.status();
            if !status.is_success() {
                anyhow::bail!("Google Translate erro: {}", status);
            }

            response
                .text()
                .await
                .context("Falha ao ler resposta do Google Translate")
        })?;

        parse_google_response(&response_text)
    }

    fn name(&self) -> &'static str {
        "Google"
    }
}

/// Parseia a resposta JSON do Google Translate
/// O formato é um array aninhado: [[["texto traduzido","texto original",...],...],...]
fn parse_google_response(response: &str) -> Result<String> {
    let json: serde_json::Value =
        serde_json::from_str(response).context("Falha ao parsear resposta do Google")?;

    let translated: String = json
        .get(0)
        .and_then(|sentences| sentences.as_array())
        .map(|sentences| {
            sentences
                .iter()
                .filter_map(|sentence| sentence.get(0).and_then(|text| text.as_str()))
                .collect()
        })
        .unwrap_or_default();

    if translated.trim().is_empty() {
        anyhow::bail!("Não foi possível extrair tradução da resposta");
    }

    Ok(translated)
}

// ============================================================================
// DeepL
// ============================================================================

#[derive(Debug, Serialize)]
struct DeepLRequest<'a> {
    text: [&'a str; 1],
    source_lang: &'a str,
    target_lang: &'a str,
}

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
}

pub struct DeepLTranslator {
    http: HttpBackend,
    api_key: String,
}

impl Translate for DeepLTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        let request_body = DeepLRequest {
            text: [text],
            source_lang: "RU",
            target_lang: "EN-US",
        };

        let deepl_response: DeepLResponse = self.http.runtime.block_on(async {
            let response = self
                .http
                .client
                .post("https://api-free.deepl.com/v2/translate")
                .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
                .json(&request_body)
                .send()
                .await
                .context("Falha ao enviar requisição para DeepL")?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response.text().await.unwrap_or_default();
                anyhow::bail!("DeepL API erro {}: {}", status, error_text);
            }

            response
                .json()
                .await
                .context("Falha ao parsear resposta DeepL")
        })?;

        deepl_response
            .translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .context("DeepL não retornou tradução")
    }

    fn name(&self) -> &'static str {
        "DeepL"
    }
}

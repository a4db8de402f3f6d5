// chat-overlay-translator/src/main.rs

// ============================================================================
// CHAT OVERLAY TRANSLATOR - Traduz o chat do jogo (RU -> EN) em tempo real
// ============================================================================
//
// Threads:
//   main      -> janela do overlay (eframe) + seletor de região
//   scheduler -> captura -> OCR -> tradução -> OverlayCommand
//   hotkeys   -> Ctrl+Alt+<tecla> e modo mover
//   tray      -> cliques no menu da bandeja (Windows)
//
// ============================================================================

#[macro_use]
extern crate log;

// ============================================================================
// DECLARAÇÃO DE MÓDULOS
// ============================================================================
mod app_state;
mod change_filter;
mod config;
mod errors;
mod hotkey;
mod logging;
mod ocr;
mod overlay;
mod platform;
mod processing;
mod runtime;
mod screenshot;
mod translator;

#[cfg(test)]
mod tests;

// ============================================================================
// IMPORTS
// ============================================================================
use anyhow::{Context, Result};
use crossbeam_channel::unbounded;
use std::sync::Arc;
use std::time::Duration;

use app_state::{AppCommand, OverlayCommand, Session};
use config::AppConfig;
use ocr::TextExtractor;
use overlay::OverlayApp;
use platform::click_through::OVERLAY_WINDOW_TITLE;
use processing::RefreshScheduler;
use runtime::controls::Controls;
use screenshot::DisplayGrabber;

// ============================================================================
// FUNÇÃO PRINCIPAL
// ============================================================================
fn main() -> Result<()> {
    logging::init();

    info!("💬 ============================================");
    info!("💬 CHAT OVERLAY TRANSLATOR - Chat RU → EN");
    info!("💬 ============================================");
    info!("📝 Log: {}", logging::log_file_path().display());
    info!("");

    info!("⚙️  Configurando sistema...");

    // Carrega configurações
    let config = AppConfig::load()?;

    // Estado compartilhado + canais para a main thread
    let session = Session::new(&config);
    let (command_sender, command_receiver) = unbounded::<AppCommand>();
    let (overlay_sender, overlay_receiver) = unbounded::<OverlayCommand>();

    // ========================================================================
    // PIPELINE (thread do scheduler)
    // ========================================================================
    let extractor = TextExtractor::new(
        Arc::new(DisplayGrabber),
        ocr::recognizer_from_config(&config.ocr),
        Duration::from_secs(config.scan.ocr_timeout_secs),
    );
    let translator = translator::translator_from_config(&config.translation)?;
    info!("🌐 Tradutor: {}", translator.name());

    let scheduler = RefreshScheduler::new(
        session.clone(),
        extractor,
        translator,
        Arc::new(overlay_sender.clone()),
        Duration::from_millis(config.scan.settle_ms),
    );
    processing::start_scheduler_thread(scheduler).context("Falha ao iniciar o scheduler")?;

    // ========================================================================
    // CONTROLES (hotkeys + tray)
    // ========================================================================
    let controls = Controls::new(session.clone(), overlay_sender, command_sender);
    runtime::hotkeys::start_hotkey_thread(controls.clone(), config.hotkeys.clone());

    #[cfg(windows)]
    let _tray = match runtime::tray::create_tray(controls.clone()) {
        Ok(tray) => Some(tray),
        Err(e) => {
            warn!("⚠️  Bandeja indisponível: {:#}", e);
            warn!("   Use as hotkeys (Ctrl+Alt+...)");
            None
        }
    };

    info!("✅ Sistema pronto!");
    info!("");
    info!("🎯 Selecione a região do chat para começar");
    info!("🎯 Segure Ctrl+Alt para mover o overlay");
    info!("");

    // ========================================================================
    // INICIA OVERLAY NA MAIN THREAD
    // ========================================================================
    // Começa escondido (1x1); o overlay se posiciona quando houver texto
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title(OVERLAY_WINDOW_TITLE)
            .with_inner_size([1.0, 1.0])
            .with_position([0.0, 0.0])
            .with_always_on_top()
            .with_decorations(false)
            .with_resizable(false)
            .with_transparent(true)
            .with_taskbar(false),

        ..Default::default()
    };

    let overlay_config = config.overlay.clone();

    eframe::run_native(
        OVERLAY_WINDOW_TITLE,
        options,
        Box::new(move |cc| {
            Ok(Box::new(OverlayApp::new(
                cc,
                session,
                overlay_config,
                command_receiver,
                overlay_receiver,
            )) as Box<dyn eframe::App>)
        }),
    )
    .map_err(|e| anyhow::anyhow!("Falha na janela do overlay: {}", e))?;

    info!("👋 Até mais!");
    Ok(())
}

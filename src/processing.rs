// chat-overlay-translator/src/processing.rs

// ============================================================================
// MÓDULO PROCESSING - Loop de captura -> OCR -> tradução -> overlay
// ============================================================================
//
// Um ciclo por intervalo de scan, sempre em sequência (nunca dois OCRs ao
// mesmo tempo):
//
//   1. Desativado? esconde o overlay e dorme
//   2. Esconde o overlay, espera ~80ms, captura + OCR (limite de 3s)
//   3. Texto vazio? nada a fazer
//   4. Mesmo fingerprint do ciclo anterior? mantém o que está na tela
//   5. Traduz e manda para o overlay
//
// A thread do scheduler NUNCA mexe na janela: só envia OverlayCommand para
// a main thread.
//
// ============================================================================

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::app_state::{OverlayCommand, OverlaySink, Session};
use crate::change_filter::{has_changed, Change};
use crate::errors::CycleError;
use crate::ocr::TextExtractor;
use crate::translator::{error_marker, Translate};

/// Resultado de um ciclo (usado nos logs e nos testes)
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Overlay + tradução desativados
    Disabled,
    /// Seletor de região aberto
    Selecting,
    /// Nenhuma região definida ainda
    NoRegion,
    /// OCR não achou texto
    NoText,
    /// Texto igual ao do ciclo anterior
    Unchanged,
    /// Nova tradução enviada ao overlay
    Displayed(String),
    /// A região mudou durante o ciclo; resultado descartado
    Stale,
    /// Falha registrada (o loop continua)
    Failed(CycleError),
}

pub struct RefreshScheduler {
    session: Session,
    extractor: TextExtractor,
    translator: Box<dyn Translate>,
    overlay: Arc<dyn OverlaySink>,
    settle: Duration,
}

impl RefreshScheduler {
    pub fn new(
        session: Session,
        extractor: TextExtractor,
        translator: Box<dyn Translate>,
        overlay: Arc<dyn OverlaySink>,
        settle: Duration,
    ) -> Self {
        RefreshScheduler {
            session,
            extractor,
            translator,
            overlay,
            settle,
        }
    }

    /// Executa um ciclo completo
    pub fn run_cycle(&self) -> CycleOutcome {
        if !self.session.enabled() {
            self.overlay.dispatch(OverlayCommand::Hide);
            return CycleOutcome::Disabled;
        }

        // O seletor ocupa a tela inteira: capturar agora pegaria ele
        if self.session.selecting_region() {
            return CycleOutcome::Selecting;
        }

        let Some((region, generation)) = self.session.region_snapshot() else {
            return CycleOutcome::NoRegion;
        };

        // ====================================================================
        // CAPTURA (overlay escondido para não capturar a si mesmo)
        // ====================================================================
        self.overlay.dispatch(OverlayCommand::Hide);
        thread::sleep(self.settle);

        let extracted = self.extractor.try_extract(&region);
        self.overlay.dispatch(OverlayCommand::Restore);

        let text = match extracted {
            Ok(text) => text,
            Err(e) => {
                self.session.record_error(&e);
                return CycleOutcome::Failed(e);
            }
        };

        // ====================================================================
        // FILTRO DE MUDANÇA
        // ====================================================================
        let fingerprint = match has_changed(&text, self.session.last_fingerprint()) {
            Change::NoSignal => return CycleOutcome::NoText,
            Change::Unchanged => return CycleOutcome::Unchanged,
            Change::Changed(fingerprint) => fingerprint,
        };

        debug!("📝 Texto novo ({} caracteres): {}", text.chars().count(), text);

        // ====================================================================
        // TRADUÇÃO
        // ====================================================================
        match self.translator.translate(&text) {
            Ok(translated) if !translated.trim().is_empty() => {
                // Só grava se a região não mudou no meio do ciclo
                if !self.session.commit_fingerprint(fingerprint, generation) {
                    debug!("🔄 Região trocada durante o ciclo, tradução descartada");
                    return CycleOutcome::Stale;
                }
                info!("🌐 [{}] {}", self.translator.name(), translated);
                self.overlay.dispatch(OverlayCommand::Show(translated.clone()));
                CycleOutcome::Displayed(translated)
            }
            result => {
                let message = match result {
                    Err(e) => format!("{:#}", e),
                    Ok(_) => "tradução vazia".to_string(),
                };
                let error = CycleError::Translation(message.clone());
                self.session.record_error(&error);

                // Sem gravar o fingerprint: o próximo ciclo tenta de novo
                if self.session.region_generation() == generation {
                    self.overlay.dispatch(OverlayCommand::Show(error_marker(&message)));
                }
                CycleOutcome::Failed(error)
            }
        }
    }

    /// Ciclo protegido: um pânico vira erro registrado
    pub fn run_guarded_cycle(&self) -> CycleOutcome {
        panic::catch_unwind(AssertUnwindSafe(|| self.run_cycle())).unwrap_or_else(|payload| {
            let error = CycleError::Unexpected(panic_message(payload.as_ref()));
            self.session.record_error(&error);
            self.overlay.dispatch(OverlayCommand::Restore);
            CycleOutcome::Failed(error)
        })
    }

    /// Loop infinito; só termina com o processo
    pub fn run(self) {
        info!("🔄 Scheduler iniciado (intervalo: {:?})", self.session.scan_interval());

        loop {
            let outcome = self.run_guarded_cycle();
            trace!("🔄 Ciclo: {:?}", outcome);

            // Mudanças de intervalo valem a partir daqui
            self.session.sleep(self.session.scan_interval());
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "pânico sem mensagem".to_string()
    }
}

/// Inicia a thread do scheduler
pub fn start_scheduler_thread(scheduler: RefreshScheduler) -> std::io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("scheduler".to_string())
        .spawn(move || scheduler.run())
}

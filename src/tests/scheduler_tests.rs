// chat-overlay-translator/src/tests/scheduler_tests.rs

use anyhow::Result;
use crossbeam_channel::{unbounded, Receiver};
use image::DynamicImage;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::app_state::{CaptureRegion, OverlayCommand, Session};
use crate::config::AppConfig;
use crate::errors::CycleError;
use crate::ocr::{TextExtractor, TextRecognizer};
use crate::processing::{CycleOutcome, RefreshScheduler};
use crate::screenshot::ScreenGrabber;
use crate::translator::{Translate, ERROR_MARKER};

// ============================================================================
// FALSOS
// ============================================================================

struct FakeScreen;

impl ScreenGrabber for FakeScreen {
    fn grab(&self, region: &CaptureRegion) -> Result<DynamicImage> {
        Ok(DynamicImage::new_rgba8(region.width() as u32, region.height() as u32))
    }
}

/// Devolve os textos da fila; quando acaba, repete o último
struct ScriptedOcr {
    texts: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl ScriptedOcr {
    fn new(texts: &[&str], delay: Duration) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let ocr = ScriptedOcr {
            texts: Mutex::new(texts.iter().map(|t| t.to_string()).collect()),
            last: Mutex::new(String::new()),
            delay,
            calls: Arc::clone(&calls),
        };
        (ocr, calls)
    }
}

impl TextRecognizer for ScriptedOcr {
    fn recognize(&self, _image: &DynamicImage) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.delay);
        let mut last = self.last.lock().unwrap();
        if let Some(next) = self.texts.lock().unwrap().pop_front() {
            *last = next;
        }
        Ok(last.clone())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

#[derive(Clone, Copy, PartialEq)]
enum TranslatorMode {
    Ok,
    Fail,
    Panic,
}

/// "Привет" -> "Hello"; o resto vira "EN(...)"
struct CountingTranslator {
    calls: Arc<AtomicUsize>,
    mode: Arc<Mutex<TranslatorMode>>,
    /// Troca a região no meio da tradução
    switch_region: Option<(Session, CaptureRegion)>,
}

impl Translate for CountingTranslator {
    fn translate(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some((session, region)) = &self.switch_region {
            session.set_region(*region);
        }
        let mode = *self.mode.lock().unwrap();
        match mode {
            TranslatorMode::Ok => Ok(match text {
                "Привет" => "Hello".to_string(),
                other => format!("EN({})", other),
            }),
            TranslatorMode::Fail => anyhow::bail!("serviço fora do ar"),
            TranslatorMode::Panic => panic!("tradutor explodiu"),
        }
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}

struct Harness {
    scheduler: RefreshScheduler,
    session: Session,
    overlay: Receiver<OverlayCommand>,
    ocr_calls: Arc<AtomicUsize>,
    translate_calls: Arc<AtomicUsize>,
    mode: Arc<Mutex<TranslatorMode>>,
}

impl Harness {
    fn commands(&self) -> Vec<OverlayCommand> {
        self.overlay.try_iter().collect()
    }

    fn shown(&self) -> Vec<String> {
        self.commands()
            .into_iter()
            .filter_map(|command| match command {
                OverlayCommand::Show(text) => Some(text),
                _ => None,
            })
            .collect()
    }
}

fn region() -> CaptureRegion {
    CaptureRegion::new(100, 100, 500, 300).unwrap()
}

fn other_region() -> CaptureRegion {
    CaptureRegion::new(600, 100, 900, 400).unwrap()
}

fn build(texts: &[&str], ocr_delay: Duration, timeout: Duration, switch_region: bool) -> Harness {
    let session = Session::new(&AppConfig::default());

    let (ocr, ocr_calls) = ScriptedOcr::new(texts, ocr_delay);
    let extractor = TextExtractor::new(Arc::new(FakeScreen), Arc::new(ocr), timeout);

    let translate_calls = Arc::new(AtomicUsize::new(0));
    let mode = Arc::new(Mutex::new(TranslatorMode::Ok));
    let translator = CountingTranslator {
        calls: Arc::clone(&translate_calls),
        mode: Arc::clone(&mode),
        switch_region: switch_region.then(|| (session.clone(), other_region())),
    };

    let (sender, overlay) = unbounded();
    let scheduler = RefreshScheduler::new(
        session.clone(),
        extractor,
        Box::new(translator),
        Arc::new(sender),
        Duration::ZERO,
    );

    Harness {
        scheduler,
        session,
        overlay,
        ocr_calls,
        translate_calls,
        mode,
    }
}

fn harness(texts: &[&str]) -> Harness {
    let h = build(texts, Duration::ZERO, Duration::from_secs(3), false);
    h.session.set_region(region());
    h
}

// ============================================================================
// CENÁRIOS
// ============================================================================

#[test]
fn same_chat_text_is_translated_once() {
    let h = harness(&["Привет", "Привет"]);

    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::Displayed("Hello".to_string()));
    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::Unchanged);

    assert_eq!(h.translate_calls.load(Ordering::SeqCst), 1);
    assert_eq!(h.shown(), vec!["Hello".to_string()]);
}

#[test]
fn overlay_is_hidden_during_capture_and_restored_after() {
    let h = harness(&["Привет"]);
    h.scheduler.run_cycle();

    assert_eq!(
        h.commands(),
        vec![
            OverlayCommand::Hide,
            OverlayCommand::Restore,
            OverlayCommand::Show("Hello".to_string()),
        ]
    );
}

#[test]
fn new_text_replaces_the_overlay() {
    let h = harness(&["Привет", "Пока"]);
    h.scheduler.run_cycle();
    assert_eq!(
        h.scheduler.run_cycle(),
        CycleOutcome::Displayed("EN(Пока)".to_string())
    );
    assert_eq!(h.translate_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn slow_ocr_is_abandoned_and_recorded() {
    let h = build(
        &["Привет"],
        Duration::from_secs(10),
        Duration::from_millis(200),
        false,
    );
    h.session.set_region(region());

    let started = Instant::now();
    let outcome = h.scheduler.run_guarded_cycle();
    assert!(started.elapsed() < Duration::from_secs(3));

    assert_eq!(
        outcome,
        CycleOutcome::Failed(CycleError::OcrTimeout(Duration::from_millis(200)))
    );
    assert!(h.session.last_error().unwrap().contains("OcrTimeout"));
    assert_eq!(h.translate_calls.load(Ordering::SeqCst), 0);
    // O overlay volta mesmo com falha
    assert_eq!(h.commands(), vec![OverlayCommand::Hide, OverlayCommand::Restore]);
}

#[test]
fn disabled_session_hides_without_capturing() {
    let h = harness(&["Привет"]);
    h.session.set_enabled(false);

    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::Disabled);
    assert_eq!(h.commands(), vec![OverlayCommand::Hide]);
    assert_eq!(h.ocr_calls.load(Ordering::SeqCst), 0);

    // Reativado: volta a traduzir no ciclo seguinte
    h.session.set_enabled(true);
    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::Displayed("Hello".to_string()));
}

#[test]
fn no_region_and_selection_skip_the_cycle() {
    let h = build(&["Привет"], Duration::ZERO, Duration::from_secs(3), false);
    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::NoRegion);

    h.session.set_region(region());
    h.session.set_selecting_region(true);
    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::Selecting);
    assert_eq!(h.ocr_calls.load(Ordering::SeqCst), 0);
    assert!(h.commands().is_empty());
}

#[test]
fn empty_ocr_result_is_not_fingerprinted() {
    let h = harness(&["   \n  ", "Привет"]);

    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::NoText);
    assert_eq!(h.session.last_fingerprint(), None);
    assert_eq!(h.translate_calls.load(Ordering::SeqCst), 0);

    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::Displayed("Hello".to_string()));
}

#[test]
fn reselecting_the_region_forgets_the_last_text() {
    let h = harness(&["Привет", "Привет"]);
    h.scheduler.run_cycle();

    h.session.set_region(other_region());
    assert_eq!(h.session.last_fingerprint(), None);

    // Mesmo texto na região nova: traduz de novo
    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::Displayed("Hello".to_string()));
    assert_eq!(h.translate_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn result_for_an_old_region_is_discarded() {
    let h = build(&["Привет"], Duration::ZERO, Duration::from_secs(3), true);
    h.session.set_region(region());

    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::Stale);
    assert!(h.shown().is_empty());
    assert_eq!(h.session.last_fingerprint(), None);
    assert_eq!(h.session.capture_region(), Some(other_region()));
}

#[test]
fn translation_failure_shows_marker_and_retries() {
    let h = harness(&["Привет", "Привет"]);
    *h.mode.lock().unwrap() = TranslatorMode::Fail;

    match h.scheduler.run_cycle() {
        CycleOutcome::Failed(CycleError::Translation(message)) => {
            assert!(message.contains("serviço fora do ar"))
        }
        other => panic!("esperava falha de tradução, veio {:?}", other),
    }
    let shown = h.shown();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].starts_with(ERROR_MARKER));
    assert!(h.session.last_error().unwrap().contains("TranslationFailure"));

    // Serviço voltou: o mesmo texto é traduzido no próximo ciclo
    *h.mode.lock().unwrap() = TranslatorMode::Ok;
    assert_eq!(h.scheduler.run_cycle(), CycleOutcome::Displayed("Hello".to_string()));
    assert_eq!(h.translate_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn panic_inside_a_cycle_is_contained() {
    let h = harness(&["Привет", "Привет"]);
    *h.mode.lock().unwrap() = TranslatorMode::Panic;

    match h.scheduler.run_guarded_cycle() {
        CycleOutcome::Failed(CycleError::Unexpected(message)) => {
            assert!(message.contains("tradutor explodiu"))
        }
        other => panic!("esperava erro inesperado, veio {:?}", other),
    }
    assert!(h.session.last_error().unwrap().contains("Unexpected"));
    assert_eq!(h.commands().last(), Some(&OverlayCommand::Restore));

    // O scheduler segue funcionando
    *h.mode.lock().unwrap() = TranslatorMode::Ok;
    assert_eq!(
        h.scheduler.run_guarded_cycle(),
        CycleOutcome::Displayed("Hello".to_string())
    );
}

#[test]
fn loop_resumes_within_one_interval_after_reenabling() {
    let Harness {
        scheduler,
        session,
        overlay,
        ocr_calls,
        ..
    } = harness(&["Привет"]);
    assert!(session.set_scan_interval_index(0));
    assert_eq!(session.scan_interval(), Duration::from_secs(1));
    session.set_enabled(false);

    // O loop nunca termina: a thread fica solta até o fim do processo
    thread::spawn(move || scheduler.run());

    // Desativado: só esconde, sem captura
    assert_eq!(
        overlay.recv_timeout(Duration::from_secs(2)),
        Ok(OverlayCommand::Hide)
    );
    thread::sleep(Duration::from_millis(300));
    assert_eq!(ocr_calls.load(Ordering::SeqCst), 0);
    while overlay.try_recv().is_ok() {}

    let reenabled = Instant::now();
    session.set_enabled(true);

    let deadline = reenabled + Duration::from_millis(1500);
    let shown = loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match overlay.recv_timeout(remaining) {
            Ok(OverlayCommand::Show(text)) => break text,
            Ok(_) => continue,
            Err(_) => panic!("loop não voltou a traduzir depois de reativado"),
        }
    };
    assert_eq!(shown, "Hello");
    assert!(reenabled.elapsed() < Duration::from_millis(1500));
    assert_eq!(ocr_calls.load(Ordering::SeqCst), 1);
}

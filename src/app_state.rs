// chat-overlay-translator/src/app_state.rs

// ============================================================================
// MÓDULO APP STATE - Estado compartilhado da aplicação
// ============================================================================
// Contém o estado que é compartilhado entre threads:
// - Session: flags, região, posicionamento, fingerprint, último erro
// - CaptureRegion / PixelRect: retângulos em pixels físicos
// - ScanInterval / FontMode: escolhas do usuário
// - AppCommand / OverlayCommand: mensagens para a main thread (GUI)
//
// Região + posicionamento ficam atrás do MESMO lock, para nunca usar um
// retângulo velho com um posicionamento novo (ou vice-versa).
// ============================================================================

use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::change_filter::Fingerprint;
use crate::config::AppConfig;
use crate::errors::CycleError;
use crate::overlay::position::{OverlayPlacement, OverlayPositionState};

// ============================================================================
// COMANDOS ENTRE THREADS
// ============================================================================

/// Comandos de controle enviados (hotkeys/tray) para a main thread
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Abre o seletor de região
    OpenRegionSelector,
    /// Fecha a aplicação
    Quit,
}

/// Mutações da superfície do overlay. Só a main thread executa.
#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    /// Troca o texto e mostra o overlay
    Show(String),
    /// Esconde o overlay (antes da captura, ou quando desativado)
    Hide,
    /// Mostra de novo o último texto, se houver
    Restore,
}

/// Destino dos comandos do overlay (fire-and-forget)
pub trait OverlaySink: Send + Sync {
    fn dispatch(&self, command: OverlayCommand);
}

impl OverlaySink for Sender<OverlayCommand> {
    fn dispatch(&self, command: OverlayCommand) {
        // Se a GUI já fechou não há o que fazer
        if self.send(command).is_err() {
            trace!("Overlay fechado, comando descartado");
        }
    }
}

// ============================================================================
// ESTRUTURAS DE GEOMETRIA
// ============================================================================

/// Retângulo em pixels físicos (origem + tamanho)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

/// Região da tela que é capturada: (x1, y1) canto superior esquerdo,
/// (x2, y2) canto inferior direito, sempre com x1 < x2 e y1 < y2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
}

impl CaptureRegion {
    /// Cria a região; retorna None se o retângulo for degenerado
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Option<Self> {
        if x1 < x2 && y1 < y2 {
            Some(CaptureRegion { x1, y1, x2, y2 })
        } else {
            None
        }
    }

    /// Cria a região a partir de dois cantos quaisquer (arrasto do mouse)
    pub fn from_corners(a: (i32, i32), b: (i32, i32)) -> Option<Self> {
        Self::new(a.0.min(b.0), a.1.min(b.1), a.0.max(b.0), a.1.max(b.1))
    }

    pub fn x1(&self) -> i32 {
        self.x1
    }

    pub fn y1(&self) -> i32 {
        self.y1
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn rect(&self) -> PixelRect {
        PixelRect {
            x: self.x1,
            y: self.y1,
            w: self.width(),
            h: self.height(),
        }
    }
}

impl std::fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}) {}x{}",
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.width(),
            self.height()
        )
    }
}

// ============================================================================
// ESCOLHAS DO USUÁRIO
// ============================================================================

/// Intervalo de scan: um valor de um conjunto fixo
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanInterval {
    options: Vec<u64>,
    index: usize,
}

impl ScanInterval {
    pub fn new(options: Vec<u64>, index: usize) -> Self {
        let options = if options.is_empty() {
            crate::config::DEFAULT_SCAN_INTERVALS.to_vec()
        } else {
            options
        };
        let index = index.min(options.len() - 1);
        ScanInterval { options, index }
    }

    pub fn current(&self) -> Duration {
        Duration::from_secs(self.options[self.index])
    }

    pub fn options(&self) -> &[u64] {
        &self.options
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Seleciona pelo índice. Índices fora do conjunto são rejeitados.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.options.len() {
            self.index = index;
            true
        } else {
            false
        }
    }

    /// Avança para o próximo valor (volta ao primeiro depois do último)
    pub fn advance(&mut self) -> Duration {
        self.index = (self.index + 1) % self.options.len();
        self.current()
    }
}

/// Política do tamanho da fonte
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FontMode {
    /// Tamanho fixo escolhido pelo usuário
    Fixed(f32),
    /// Maior tamanho que cabe na região
    AutoFit,
}

impl std::fmt::Display for FontMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontMode::Fixed(size) => write!(f, "{}", size),
            FontMode::AutoFit => write!(f, "auto-fit"),
        }
    }
}

/// Região + posicionamento, sempre lidos/escritos juntos
#[derive(Debug, Clone, Default)]
struct OverlayGeometry {
    region: Option<CaptureRegion>,
    position: OverlayPositionState,
    /// Incrementado a cada nova região
    generation: u64,
}

// ============================================================================
// ESTADO COMPARTILHADO
// ============================================================================

/// Estado compartilhado entre a GUI, a thread do scheduler e as threads
/// de controle (hotkeys, tray)
#[derive(Clone)]
pub struct Session {
    enabled: Arc<AtomicBool>,
    interaction_mode: Arc<AtomicBool>,
    selecting_region: Arc<AtomicBool>,
    geometry: Arc<Mutex<OverlayGeometry>>,
    scan_interval: Arc<Mutex<ScanInterval>>,
    font_mode: Arc<Mutex<FontMode>>,
    font_sizes: Arc<Vec<f32>>,
    last_fingerprint: Arc<Mutex<Option<Fingerprint>>>,
    last_error: Arc<Mutex<Option<String>>>,
    wake_sender: Sender<()>,
    wake_receiver: Receiver<()>,
}

/// Lock que sobrevive a uma thread que entrou em pânico segurando o mutex
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Session {
    pub fn new(config: &AppConfig) -> Self {
        let font_mode = if config.overlay.auto_fit {
            FontMode::AutoFit
        } else {
            FontMode::Fixed(config.overlay.default_font_size)
        };
        let (wake_sender, wake_receiver) = bounded(1);

        Session {
            enabled: Arc::new(AtomicBool::new(true)),
            interaction_mode: Arc::new(AtomicBool::new(false)),
            selecting_region: Arc::new(AtomicBool::new(false)),
            geometry: Arc::new(Mutex::new(OverlayGeometry::default())),
            scan_interval: Arc::new(Mutex::new(ScanInterval::new(
                config.scan.intervals_secs.clone(),
                config.scan.default_index,
            ))),
            font_mode: Arc::new(Mutex::new(font_mode)),
            font_sizes: Arc::new(config.overlay.font_sizes.clone()),
            last_fingerprint: Arc::new(Mutex::new(None)),
            last_error: Arc::new(Mutex::new(None)),
            wake_sender,
            wake_receiver,
        }
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        let previous = self.enabled.swap(enabled, Ordering::SeqCst);
        if previous != enabled {
            info!(
                "🔁 Overlay + tradução: {}",
                if enabled { "✅ ATIVADO" } else { "❌ DESATIVADO" }
            );
            self.wake();
        }
    }

    /// Inverte o flag e retorna o novo valor
    pub fn toggle_enabled(&self) -> bool {
        let enabled = !self.enabled();
        self.set_enabled(enabled);
        enabled
    }

    pub fn interaction_mode(&self) -> bool {
        self.interaction_mode.load(Ordering::SeqCst)
    }

    /// Retorna true se o modo mudou
    pub fn set_interaction_mode(&self, active: bool) -> bool {
        let previous = self.interaction_mode.swap(active, Ordering::SeqCst);
        if previous != active {
            debug!(
                "🖱️  Modo mover: {}",
                if active { "ATIVO" } else { "inativo (click-through)" }
            );
            if !active {
                // Soltou Ctrl+Alt no meio do arrasto
                lock(&self.geometry).position.end_drag();
            }
        }
        previous != active
    }

    pub fn selecting_region(&self) -> bool {
        self.selecting_region.load(Ordering::SeqCst)
    }

    pub fn set_selecting_region(&self, selecting: bool) {
        self.selecting_region.store(selecting, Ordering::SeqCst);
        if !selecting {
            self.wake();
        }
    }

    // ------------------------------------------------------------------
    // Região e posicionamento
    // ------------------------------------------------------------------

    pub fn capture_region(&self) -> Option<CaptureRegion> {
        lock(&self.geometry).region
    }

    /// Região atual junto com sua geração
    pub fn region_snapshot(&self) -> Option<(CaptureRegion, u64)> {
        let geometry = lock(&self.geometry);
        geometry.region.map(|region| (region, geometry.generation))
    }

    /// Substitui a região: volta a ancorar e invalida o fingerprint
    pub fn set_region(&self, region: CaptureRegion) {
        {
            let mut geometry = lock(&self.geometry);
            geometry.region = Some(region);
            geometry.position.snap_back();
            geometry.generation += 1;
        }
        *lock(&self.last_fingerprint) = None;
        info!("📍 Região definida: {}", region);
        self.wake();
    }

    pub fn placement(&self) -> OverlayPlacement {
        lock(&self.geometry).position.placement()
    }

    /// Realinha o overlay com a região. Retorna false se não há região.
    pub fn snap_back(&self) -> bool {
        let mut geometry = lock(&self.geometry);
        match geometry.region {
            Some(region) => {
                geometry.position.snap_back();
                info!("📌 Overlay realinhado com a região ({}, {})", region.x1(), region.y1());
                true
            }
            None => {
                info!("📌 Snap back ignorado: nenhuma região definida");
                false
            }
        }
    }

    /// Início de arrasto. Só vale no modo mover.
    pub fn begin_drag(&self, grab: (i32, i32), content: Option<(i32, i32)>) -> bool {
        if !self.interaction_mode() {
            return false;
        }
        let mut geometry = lock(&self.geometry);
        let Some(region) = geometry.region else {
            return false;
        };
        geometry.position.begin_drag(&region, content, grab);
        true
    }

    /// Ponteiro se moveu durante o arrasto. Retorna a nova origem.
    pub fn drag_to(&self, pointer: (i32, i32)) -> Option<(i32, i32)> {
        if !self.interaction_mode() {
            return None;
        }
        lock(&self.geometry).position.drag_to(pointer)
    }

    pub fn end_drag(&self) {
        if let Some((x, y)) = lock(&self.geometry).position.end_drag() {
            info!("🖱️  Overlay movido para ({}, {})", x, y);
        }
    }

    /// Retângulo do overlay (região e posicionamento lidos juntos)
    pub fn overlay_rect(&self, content: Option<(i32, i32)>) -> Option<PixelRect> {
        let geometry = lock(&self.geometry);
        geometry
            .region
            .map(|region| geometry.position.current_rect(&region, content))
    }

    // ------------------------------------------------------------------
    // Intervalo e fonte
    // ------------------------------------------------------------------

    pub fn scan_interval(&self) -> Duration {
        lock(&self.scan_interval).current()
    }

    pub fn scan_interval_options(&self) -> Vec<u64> {
        lock(&self.scan_interval).options().to_vec()
    }

    pub fn set_scan_interval_index(&self, index: usize) -> bool {
        let mut interval = lock(&self.scan_interval);
        if interval.select(index) {
            info!("⏱️  Intervalo de scan: {:?}", interval.current());
            drop(interval);
            self.wake();
            true
        } else {
            warn!("⚠️  Intervalo de scan inválido: índice {}", index);
            false
        }
    }

    pub fn next_scan_interval(&self) -> Duration {
        let current = lock(&self.scan_interval).advance();
        info!("⏱️  Intervalo de scan: {:?}", current);
        self.wake();
        current
    }

    pub fn font_mode(&self) -> FontMode {
        *lock(&self.font_mode)
    }

    pub fn set_font_mode(&self, mode: FontMode) {
        *lock(&self.font_mode) = mode;
        info!("🔤 Fonte: {}", mode);
    }

    /// Percorre os tamanhos fixos e depois o auto-fit
    pub fn next_font_mode(&self) -> FontMode {
        let next = match self.font_mode() {
            FontMode::AutoFit => self
                .font_sizes
                .first()
                .map(|size| FontMode::Fixed(*size))
                .unwrap_or(FontMode::AutoFit),
            FontMode::Fixed(current) => self
                .font_sizes
                .iter()
                .find(|size| **size > current)
                .map(|size| FontMode::Fixed(*size))
                .unwrap_or(FontMode::AutoFit),
        };
        self.set_font_mode(next);
        next
    }

    pub fn font_sizes(&self) -> &[f32] {
        &self.font_sizes
    }

    // ------------------------------------------------------------------
    // Fingerprint
    // ------------------------------------------------------------------

    pub fn last_fingerprint(&self) -> Option<Fingerprint> {
        *lock(&self.last_fingerprint)
    }

    /// Grava o fingerprint só se a região ainda é a mesma do início do ciclo.
    pub fn commit_fingerprint(&self, fingerprint: Fingerprint, generation: u64) -> bool {
        let geometry = lock(&self.geometry);
        if geometry.generation != generation {
            return false;
        }
        *lock(&self.last_fingerprint) = Some(fingerprint);
        true
    }

    pub fn region_generation(&self) -> u64 {
        lock(&self.geometry).generation
    }

    // ------------------------------------------------------------------
    // Diagnóstico
    // ------------------------------------------------------------------

    /// Registra a falha no log e guarda como último erro
    pub fn record_error(&self, error: &CycleError) {
        match error {
            CycleError::OcrTimeout(_) => warn!("⏳ [{}] {}", error.kind(), error),
            _ => error!("❌ [{}] {}", error.kind(), error),
        }
        *lock(&self.last_error) = Some(format!("[{}] {}", error.kind(), error));
    }

    pub fn last_error(&self) -> Option<String> {
        lock(&self.last_error).clone()
    }

    // ------------------------------------------------------------------
    // Sono do scheduler
    // ------------------------------------------------------------------

    /// Acorda o scheduler antes do fim do intervalo
    pub fn wake(&self) {
        let _ = self.wake_sender.try_send(());
    }

    /// Dorme até `duration` ou até alguém chamar `wake()`.
    /// Retorna true se foi acordado.
    pub fn sleep(&self, duration: Duration) -> bool {
        self.wake_receiver.recv_timeout(duration).is_ok()
    }
}

// chat-overlay-translator/src/overlay.rs

// ============================================================================
// MÓDULO OVERLAY - Janela transparente sobre a região do chat
// ============================================================================
//
// Roda na main thread (eframe). É o ÚNICO lugar que mexe na janela:
// o scheduler e as threads de controle só mandam comandos por canal.
//
// Visível quando: ativado + não escondido para captura + tem texto + tem região
//
// ============================================================================

pub mod commands;
pub mod fonts;
pub mod position;
pub mod render;
pub mod selector;

use crossbeam_channel::Receiver;
use eframe::egui;
use std::time::Duration;

use crate::app_state::{AppCommand, OverlayCommand, PixelRect, Session};
use crate::config::OverlayConfig;
use crate::errors::CycleError;
use crate::platform::click_through::{platform_capability, ClickThroughController};
use fonts::PADDING;
use render::OverlayStyle;
use selector::{RegionSelector, SelectorOutcome};

/// Frequência com que a GUI verifica os canais
const POLL_INTERVAL: Duration = Duration::from_millis(30);

pub struct OverlayApp {
    session: Session,
    config: OverlayConfig,
    style: OverlayStyle,
    app_commands: Receiver<AppCommand>,
    overlay_commands: Receiver<OverlayCommand>,

    /// Última tradução recebida
    text: Option<String>,
    /// Escondido pelo scheduler durante a captura
    hidden_for_capture: bool,

    selector: Option<RegionSelector>,
    click_through: ClickThroughController,

    /// Retângulo atual da janela (None = escondida)
    placed_rect: Option<PixelRect>,
    /// Evita repetir o mesmo erro de janela a cada frame
    render_failed: bool,
}

impl OverlayApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        session: Session,
        config: OverlayConfig,
        app_commands: Receiver<AppCommand>,
        overlay_commands: Receiver<OverlayCommand>,
    ) -> Self {
        let click_through = ClickThroughController::new(platform_capability(&cc.egui_ctx));

        let mut app = OverlayApp {
            session,
            style: OverlayStyle::from_config(&config),
            config,
            app_commands,
            overlay_commands,
            text: None,
            hidden_for_capture: false,
            selector: None,
            click_through,
            placed_rect: None,
            render_failed: false,
        };

        // Primeira execução: precisa de uma região
        if app.session.capture_region().is_none() {
            app.open_selector();
        }
        app
    }

    fn open_selector(&mut self) {
        if self.selector.is_some() {
            return;
        }
        self.session.set_selecting_region(true);
        self.selector = Some(RegionSelector::new());
        self.placed_rect = None;

        // O seletor precisa receber o mouse
        if let Err(e) = self.click_through.force(false) {
            self.session.record_error(&e);
        }
    }

    /// Desenha o seletor se estiver aberto. Retorna true se o frame foi dele.
    fn update_selector(&mut self, ctx: &egui::Context) -> bool {
        let Some(selector) = self.selector.as_mut() else {
            return false;
        };

        match selector.show(ctx) {
            SelectorOutcome::Pending => {
                ctx.request_repaint();
                return true;
            }
            SelectorOutcome::Selected(region) => {
                self.text = None;
                self.session.set_region(region);
            }
            SelectorOutcome::Cancelled => {
                if self.session.capture_region().is_none() {
                    info!("👋 Nenhuma região selecionada, encerrando");
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                } else {
                    info!("📍 Mantendo a região anterior");
                }
            }
        }

        self.selector = None;
        self.session.set_selecting_region(false);
        self.click_through.surface_recreated();
        render::hide_surface(ctx);
        true
    }

    fn hide(&mut self, ctx: &egui::Context) {
        if self.placed_rect.take().is_some() {
            render::hide_surface(ctx);
        } else {
            render::paint_empty(ctx);
        }
    }

    fn record_render_failure(&mut self, error: &CycleError) {
        if !self.render_failed {
            self.session.record_error(error);
            self.render_failed = true;
        }
        // Considera a janela perdida: o próximo frame reposiciona e reaplica
        self.placed_rect = None;
    }

    /// Arrasto no modo mover (coordenadas convertidas para pixels físicos)
    fn handle_drag(&mut self, ctx: &egui::Context, response: &egui::Response, content: (i32, i32)) {
        let ppp = ctx.pixels_per_point();
        let to_px = |pos: egui::Pos2| ((pos.x * ppp).round() as i32, (pos.y * ppp).round() as i32);

        if response.drag_started() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.session.begin_drag(to_px(pos), Some(content));
            }
        } else if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                if self.session.drag_to(to_px(pos)).is_some() {
                    // Move já neste frame para o próximo evento vir na posição nova
                    if let Some(rect) = self.session.overlay_rect(Some(content)) {
                        render::place_surface(ctx, rect);
                        self.placed_rect = Some(rect);
                    }
                }
            }
        }

        if response.drag_stopped() {
            self.session.end_drag();
        }
    }

    fn render_overlay(&mut self, ctx: &egui::Context) {
        let visible = self.session.enabled() && !self.hidden_for_capture;
        let (Some(text), true) = (self.text.clone(), visible) else {
            self.hide(ctx);
            return;
        };
        let Some(region) = self.session.capture_region() else {
            self.hide(ctx);
            return;
        };

        // ====================================================================
        // JANELA (re)aparecendo: click-through precisa ser reaplicado
        // ====================================================================
        if self.placed_rect.is_none() {
            self.click_through.surface_recreated();
        }
        let interaction = self.session.interaction_mode();
        match self.click_through.sync(interaction) {
            Ok(_) => self.render_failed = false,
            Err(e) => self.record_render_failure(&e),
        }

        // ====================================================================
        // FONTE + TAMANHO DO CONTEÚDO
        // ====================================================================
        let ppp = ctx.pixels_per_point();
        let region_size = egui::vec2(region.width() as f32 / ppp, region.height() as f32 / ppp);
        let font_size = fonts::resolve_font_size(
            ctx,
            self.session.font_mode(),
            &text,
            region_size,
            self.config.min_font_size,
            self.config.max_font_size,
        );
        let measured = fonts::measure_text(ctx, &text, font_size, region_size.x - PADDING * 2.0);
        let content = (
            ((measured.x + PADDING * 2.0) * ppp).ceil() as i32,
            ((measured.y + PADDING * 2.0) * ppp).ceil() as i32,
        );

        // Região e posicionamento lidos juntos
        let Some(rect) = self.session.overlay_rect(Some(content)) else {
            self.hide(ctx);
            return;
        };
        if self.placed_rect != Some(rect) {
            render::place_surface(ctx, rect);
            self.placed_rect = Some(rect);
        }

        let header = interaction
            .then(|| format!("✥ Arraste para mover | fonte {}", self.session.font_mode()));
        let response = render::render_translation(ctx, &text, font_size, &self.style, header.as_deref());

        if interaction {
            self.handle_drag(ctx, &response, content);
        }
    }
}

impl eframe::App for OverlayApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        commands::process_pending_commands(ctx, self);

        if !self.update_selector(ctx) {
            self.render_overlay(ctx);
        }

        ctx.request_repaint_after(POLL_INTERVAL);
    }

    /// Fundo da janela totalmente transparente
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0, 0.0, 0.0, 0.0]
    }
}

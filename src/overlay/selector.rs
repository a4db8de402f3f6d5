// chat-overlay-translator/src/overlay/selector.rs

// ============================================================================
// SELETOR DE REGIÃO - desenhado dentro da própria janela do overlay
// ============================================================================
//
// 1. Esconde o overlay e espera um pouco (para não sair no screenshot)
// 2. Captura o monitor principal e ocupa a tela inteira com ele (escurecido)
// 3. Clique e arraste desenha o retângulo; soltar confirma; ESC cancela
//
// ============================================================================

use eframe::egui;
use std::time::{Duration, Instant};

use crate::app_state::CaptureRegion;
use crate::screenshot;

/// Espera entre esconder o overlay e capturar o fundo
const PREPARE_DELAY: Duration = Duration::from_millis(150);

/// Lado mínimo da região (pixels físicos)
const MIN_REGION_SIDE: i32 = 8;

/// Resultado de um frame do seletor
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorOutcome {
    /// Usuário ainda está selecionando
    Pending,
    Selected(CaptureRegion),
    Cancelled,
}

enum Phase {
    /// Overlay escondido, aguardando para capturar o fundo
    Preparing(Instant),
    /// Tela inteira com o screenshot de fundo
    Active {
        background: egui::TextureHandle,
        /// Origem do monitor (pixels físicos)
        origin: (i32, i32),
        /// Tamanho do monitor (pixels físicos)
        size: (u32, u32),
        placed: bool,
    },
}

pub struct RegionSelector {
    phase: Phase,
    start_pos: Option<egui::Pos2>,
    current_pos: Option<egui::Pos2>,
}

impl RegionSelector {
    pub fn new() -> Self {
        info!("🎯 Abrindo seletor de região...");
        RegionSelector {
            phase: Phase::Preparing(Instant::now()),
            start_pos: None,
            current_pos: None,
        }
    }

    /// Retângulo sendo arrastado (pontos, relativo à janela)
    fn current_rect(&self) -> Option<egui::Rect> {
        Some(egui::Rect::from_two_pos(self.start_pos?, self.current_pos?))
    }

    /// Desenha um frame do seletor
    pub fn show(&mut self, ctx: &egui::Context) -> SelectorOutcome {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            info!("❌ Seleção cancelada");
            return SelectorOutcome::Cancelled;
        }

        if let Phase::Preparing(since) = self.phase {
            // Janela fora do caminho enquanto espera
            super::render::hide_surface(ctx);
            if since.elapsed() < PREPARE_DELAY {
                ctx.request_repaint_after(Duration::from_millis(20));
                return SelectorOutcome::Pending;
            }

            match screenshot::capture_primary_screen() {
                Ok((image, origin)) => {
                    let rgba = image.to_rgba8();
                    let size = (rgba.width(), rgba.height());
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [size.0 as usize, size.1 as usize],
                        rgba.as_raw(),
                    );
                    let background =
                        ctx.load_texture("selector_background", color_image, egui::TextureOptions::default());
                    self.phase = Phase::Active {
                        background,
                        origin,
                        size,
                        placed: false,
                    };
                }
                Err(e) => {
                    error!("❌ Erro no seletor: {:#}", e);
                    return SelectorOutcome::Cancelled;
                }
            }
        }

        let Phase::Active {
            background,
            origin,
            size,
            placed,
        } = &mut self.phase
        else {
            return SelectorOutcome::Pending;
        };
        let origin = *origin;
        let ppp = ctx.pixels_per_point();

        // Ocupa o monitor inteiro (coordenadas do egui são pontos lógicos)
        if !*placed {
            ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
                origin.0 as f32 / ppp,
                origin.1 as f32 / ppp,
            )));
            ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
                size.0 as f32 / ppp,
                size.1 as f32 / ppp,
            )));
            ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
            *placed = true;
        }
        let texture_id = background.id();

        let mut outcome = SelectorOutcome::Pending;

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                // ============================================================
                // FUNDO (screenshot escurecido)
                // ============================================================
                let full = ui.max_rect();
                ui.painter().image(
                    texture_id,
                    full,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
                ui.painter()
                    .rect_filled(full, 0.0, egui::Color32::from_rgba_unmultiplied(0, 0, 0, 100));

                // ============================================================
                // INSTRUÇÕES
                // ============================================================
                ui.painter().text(
                    egui::pos2(20.0, 30.0),
                    egui::Align2::LEFT_TOP,
                    "🎯 SELEÇÃO DE REGIÃO",
                    egui::FontId::proportional(24.0),
                    egui::Color32::WHITE,
                );
                ui.painter().text(
                    egui::pos2(20.0, 60.0),
                    egui::Align2::LEFT_TOP,
                    "Clique e arraste para selecionar a área do chat",
                    egui::FontId::proportional(16.0),
                    egui::Color32::LIGHT_GRAY,
                );
                ui.painter().text(
                    egui::pos2(20.0, 85.0),
                    egui::Align2::LEFT_TOP,
                    "Pressione ESC para cancelar",
                    egui::FontId::proportional(14.0),
                    egui::Color32::GRAY,
                );

                // ============================================================
                // MOUSE
                // ============================================================
                let response = ui.interact(
                    full,
                    egui::Id::new("region_selector"),
                    egui::Sense::click_and_drag(),
                );

                if response.drag_started() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.start_pos = Some(pos);
                        self.current_pos = Some(pos);
                    }
                }

                if response.dragged() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        self.current_pos = Some(pos);
                    }
                }

                if response.drag_stopped() {
                    if let Some(rect) = self.current_rect() {
                        match to_physical_region(rect, origin, ppp) {
                            Some(region) => outcome = SelectorOutcome::Selected(region),
                            None => {
                                warn!("⚠️  Região pequena demais, selecione de novo");
                                self.start_pos = None;
                                self.current_pos = None;
                            }
                        }
                    }
                }

                // ============================================================
                // RETÂNGULO + TAMANHO EM PIXELS
                // ============================================================
                if let Some(rect) = self.current_rect() {
                    ui.painter()
                        .rect_filled(rect, 0.0, egui::Color32::from_rgba_unmultiplied(0, 150, 255, 50));
                    ui.painter().rect_stroke(
                        rect,
                        0.0,
                        egui::Stroke::new(3.0, egui::Color32::from_rgb(0, 200, 255)),
                    );
                    ui.painter().text(
                        rect.center(),
                        egui::Align2::CENTER_CENTER,
                        format!(
                            "{}x{}",
                            (rect.width() * ppp).round() as i32,
                            (rect.height() * ppp).round() as i32
                        ),
                        egui::FontId::proportional(20.0),
                        egui::Color32::WHITE,
                    );
                }
            });

        outcome
    }
}

/// Converte o retângulo (pontos, relativo à janela) para pixels físicos da tela
pub fn to_physical_region(rect: egui::Rect, origin: (i32, i32), ppp: f32) -> Option<CaptureRegion> {
    let to_px = |value: f32| (value * ppp).round() as i32;

    let region = CaptureRegion::from_corners(
        (origin.0 + to_px(rect.min.x), origin.1 + to_px(rect.min.y)),
        (origin.0 + to_px(rect.max.x), origin.1 + to_px(rect.max.y)),
    )?;

    if region.width() < MIN_REGION_SIDE || region.height() < MIN_REGION_SIDE {
        return None;
    }
    Some(region)
}

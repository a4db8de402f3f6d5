// chat-overlay-translator/src/overlay/render.rs

// ============================================================================
// RENDERIZAÇÃO DO OVERLAY
// ============================================================================

use eframe::egui;

use crate::app_state::PixelRect;
use crate::config::OverlayConfig;
use crate::overlay::fonts::{translation_font_id, PADDING};

/// Altura da faixa de status mostrada no modo mover
const HEADER_HEIGHT: f32 = 18.0;

/// Cores e opções visuais (copiadas do config uma vez)
#[derive(Debug, Clone)]
pub struct OverlayStyle {
    pub background: egui::Color32,
    pub text: egui::Color32,
    pub show_border: bool,
    pub show_header: bool,
}

impl OverlayStyle {
    pub fn from_config(config: &OverlayConfig) -> Self {
        let [r, g, b, a] = config.background_color;
        let [tr, tg, tb, ta] = config.text_color;
        OverlayStyle {
            background: egui::Color32::from_rgba_unmultiplied(r, g, b, a),
            text: egui::Color32::from_rgba_unmultiplied(tr, tg, tb, ta),
            show_border: config.show_border,
            show_header: config.show_header,
        }
    }
}

/// Esconde a janela sem fechar: 1x1 pixel no canto superior esquerdo
pub fn hide_surface(ctx: &egui::Context) {
    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(1.0, 1.0)));
    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(0.0, 0.0)));
    paint_empty(ctx);
}

/// Painel vazio e completamente transparente
pub fn paint_empty(ctx: &egui::Context) {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::TRANSPARENT))
        .show(ctx, |_ui| {});
}

/// Move/redimensiona a janela para o retângulo (pixels físicos)
pub fn place_surface(ctx: &egui::Context, rect: PixelRect) {
    let ppp = ctx.pixels_per_point();
    ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(egui::pos2(
        rect.x as f32 / ppp,
        rect.y as f32 / ppp,
    )));
    ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(egui::vec2(
        rect.w as f32 / ppp,
        rect.h as f32 / ppp,
    )));
}

/// Desenha a tradução. Retorna a resposta da área (para o arrasto).
pub fn render_translation(
    ctx: &egui::Context,
    text: &str,
    font_size: f32,
    style: &OverlayStyle,
    header: Option<&str>,
) -> egui::Response {
    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(egui::Color32::TRANSPARENT))
        .show(ctx, |ui| {
            let rect = ui.max_rect();

            // ───────────────────────────────────────────────────
            // FUNDO SEMI-TRANSPARENTE
            // ───────────────────────────────────────────────────
            ui.painter().rect_filled(rect, 0.0, style.background);

            if style.show_border {
                ui.painter().rect_stroke(
                    rect.shrink(0.5),
                    0.0,
                    egui::Stroke::new(1.0, egui::Color32::from_gray(160)),
                );
            }

            // ───────────────────────────────────────────────────
            // TEXTO (quebra na largura da janela)
            // ───────────────────────────────────────────────────
            let wrap_width = (rect.width() - PADDING * 2.0).max(1.0);
            let galley = ui.painter().layout(
                text.to_owned(),
                translation_font_id(font_size),
                style.text,
                wrap_width,
            );
            ui.painter().galley(
                rect.min + egui::vec2(PADDING, PADDING),
                galley,
                style.text,
            );

            // ───────────────────────────────────────────────────
            // CABEÇALHO (só no modo mover)
            // ───────────────────────────────────────────────────
            if let Some(header) = header.filter(|_| style.show_header) {
                let strip = egui::Rect::from_min_size(
                    rect.min,
                    egui::vec2(rect.width(), HEADER_HEIGHT.min(rect.height())),
                );
                ui.painter()
                    .rect_filled(strip, 0.0, egui::Color32::from_rgba_unmultiplied(0, 90, 160, 200));
                ui.painter().text(
                    strip.left_center() + egui::vec2(4.0, 0.0),
                    egui::Align2::LEFT_CENTER,
                    header,
                    egui::FontId::proportional(11.0),
                    egui::Color32::WHITE,
                );
            }

            ui.interact(rect, egui::Id::new("overlay_drag"), egui::Sense::drag())
        })
        .inner
}

// chat-overlay-translator/src/overlay/fonts.rs

// ============================================================================
// TAMANHO DA FONTE E MEDIDA DO TEXTO
// ============================================================================

use eframe::egui;

use crate::app_state::FontMode;

/// Margem interna do overlay (pontos)
pub const PADDING: f32 = 6.0;

/// Espaço mínimo de quebra de linha (pontos)
const MIN_WRAP_WIDTH: f32 = 40.0;

/// Fonte usada na tradução
pub fn translation_font_id(size: f32) -> egui::FontId {
    egui::FontId::proportional(size)
}

/// Tamanho do texto já quebrado na largura `wrap_width`
pub fn measure_text(ctx: &egui::Context, text: &str, size: f32, wrap_width: f32) -> egui::Vec2 {
    let galley = ctx.fonts(|fonts| {
        fonts.layout(
            text.to_owned(),
            translation_font_id(size),
            egui::Color32::WHITE,
            wrap_width.max(MIN_WRAP_WIDTH),
        )
    });
    galley.rect.size()
}

/// Maior tamanho inteiro em [min, max] cujo texto cabe em `available`.
/// Se nem o mínimo cabe, usa o mínimo.
pub fn fit_font_size(
    min: f32,
    max: f32,
    available: egui::Vec2,
    measure: impl Fn(f32) -> egui::Vec2,
) -> f32 {
    let min = min.max(1.0).round() as u32;
    let max = (max.round() as u32).max(min);

    // O texto só cresce com a fonte: busca binária
    let fits = |size: u32| {
        let measured = measure(size as f32);
        measured.x <= available.x && measured.y <= available.y
    };

    if !fits(min) {
        return min as f32;
    }

    let (mut low, mut high) = (min, max);
    while low < high {
        let mid = (low + high + 1) / 2;
        if fits(mid) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    low as f32
}

/// Resolve o tamanho final da fonte para o texto e a região (pontos)
pub fn resolve_font_size(
    ctx: &egui::Context,
    mode: FontMode,
    text: &str,
    region_size: egui::Vec2,
    min: f32,
    max: f32,
) -> f32 {
    match mode {
        FontMode::Fixed(size) => size,
        FontMode::AutoFit => {
            let inner = region_size - egui::vec2(PADDING * 2.0, PADDING * 2.0);
            fit_font_size(min, max, inner, |size| measure_text(ctx, text, size, inner.x))
        }
    }
}

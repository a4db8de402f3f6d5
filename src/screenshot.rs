// chat-overlay-translator/src/screenshot.rs

// ============================================================================
// MÓDULO SCREENSHOT - Captura de tela
// ============================================================================
//
// Coordenadas em pixels FÍSICOS da tela (as mesmas da CaptureRegion).
// Em setups com vários monitores, usa o monitor que contém o ponto
// (x1, y1) da região; a região não pode atravessar monitores.
//
// ============================================================================

use anyhow::{Context, Result};
use image::{DynamicImage, ImageBuffer, Rgba};
use screenshots::Screen;

use crate::app_state::CaptureRegion;

/// Fonte das capturas (o scheduler recebe isto, os testes usam um fake)
pub trait ScreenGrabber: Send + Sync {
    fn grab(&self, region: &CaptureRegion) -> Result<DynamicImage>;
}

/// Implementação real usando o crate `screenshots`
pub struct DisplayGrabber;

impl ScreenGrabber for DisplayGrabber {
    fn grab(&self, region: &CaptureRegion) -> Result<DynamicImage> {
        capture_region(region)
    }
}

// ============================================================================
// CAPTURA DE REGIÃO (MEMÓRIA)
// ============================================================================

/// Captura exatamente a região pedida e devolve a imagem em memória
pub fn capture_region(region: &CaptureRegion) -> Result<DynamicImage> {
    trace!("📸 Capturando região {}", region);

    let screen = Screen::from_point(region.x1(), region.y1())
        .context("Nenhum monitor contém a região")?;
    let info = screen.display_info;

    // Coordenadas relativas ao monitor
    let local_x = region.x1() - info.x;
    let local_y = region.y1() - info.y;

    let (width, height) = (region.width() as u32, region.height() as u32);
    if local_x + region.width() > info.width as i32 || local_y + region.height() > info.height as i32 {
        anyhow::bail!(
            "Região {} está fora dos limites do monitor ({}x{})",
            region,
            info.width,
            info.height
        );
    }

    let buffer = screen
        .capture_area(local_x, local_y, width, height)
        .context("Falha ao capturar tela")?;

    buffer_to_image(&buffer)
}

// ============================================================================
// CAPTURA DO MONITOR PRINCIPAL (fundo do seletor de região)
// ============================================================================

/// Captura o monitor principal inteiro
pub fn capture_primary_screen() -> Result<(DynamicImage, (i32, i32))> {
    info!("📸 Capturando tela inteira (memória)...");

    let screens = Screen::all().context("Falha ao listar monitores")?;
    let screen = screens
        .iter()
        .find(|s| s.display_info.is_primary)
        .or_else(|| screens.first())
        .context("Nenhum monitor encontrado")?;

    info!(
        "   Monitor: {}x{} (escala {:.2})",
        screen.display_info.width, screen.display_info.height, screen.display_info.scale_factor
    );

    let buffer = screen.capture().context("Falha ao capturar tela")?;
    let origin = (screen.display_info.x, screen.display_info.y);

    Ok((buffer_to_image(&buffer)?, origin))
}

// ============================================================================
// FUNÇÃO AUXILIAR - Converte buffer para imagem
// ============================================================================

fn buffer_to_image(buffer: &screenshots::Image) -> Result<DynamicImage> {
    let img_buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(buffer.width(), buffer.height(), buffer.rgba().to_vec())
            .context("Falha ao criar ImageBuffer")?;

    Ok(DynamicImage::ImageRgba8(img_buffer))
}

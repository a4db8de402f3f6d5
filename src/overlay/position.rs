// chat-overlay-translator/src/overlay/position.rs

// ============================================================================
// POSICIONAMENTO DO OVERLAY (ANCORADO / LIVRE)
// ============================================================================
//
// Ancorado: o overlay cobre exatamente a região de captura.
// Livre: o usuário arrastou o overlay; a origem é dele e o tamanho vem do
// conteúdo (texto medido). "Snap back" ou uma nova região voltam a ancorar.
//
// Todas as coordenadas aqui são pixels físicos da tela.
// ============================================================================

use crate::app_state::{CaptureRegion, PixelRect};

/// Onde o overlay está sendo desenhado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayPlacement {
    /// Segue a região de captura
    Anchored,
    /// Posicionado manualmente pelo usuário
    Free { x: i32, y: i32 },
}

/// Máquina de estados do posicionamento
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayPositionState {
    placement: OverlayPlacement,
    /// Ponto (relativo à janela) onde o ponteiro "pegou" o overlay
    grab: Option<(i32, i32)>,
}

impl Default for OverlayPositionState {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayPositionState {
    pub fn new() -> Self {
        OverlayPositionState {
            placement: OverlayPlacement::Anchored,
            grab: None,
        }
    }

    pub fn placement(&self) -> OverlayPlacement {
        self.placement
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    /// Início do arrasto: congela a origem atual na tela como origem livre.
    pub fn begin_drag(
        &mut self,
        region: &CaptureRegion,
        content: Option<(i32, i32)>,
        grab: (i32, i32),
    ) {
        let current = self.current_rect(region, content);
        self.placement = OverlayPlacement::Free {
            x: current.x,
            y: current.y,
        };
        self.grab = Some(grab);
    }

    /// Ponteiro se moveu (coordenadas relativas à janela).
    /// Retorna a nova origem, ou None se não há arrasto em andamento.
    pub fn drag_to(&mut self, pointer: (i32, i32)) -> Option<(i32, i32)> {
        let (grab_x, grab_y) = self.grab?;
        match &mut self.placement {
            OverlayPlacement::Free { x, y } => {
                *x += pointer.0 - grab_x;
                *y += pointer.1 - grab_y;
                Some((*x, *y))
            }
            OverlayPlacement::Anchored => None,
        }
    }

    /// Fim do arrasto. A posição livre continua valendo.
    pub fn end_drag(&mut self) -> Option<(i32, i32)> {
        self.grab.take()?;
        match self.placement {
            OverlayPlacement::Free { x, y } => Some((x, y)),
            OverlayPlacement::Anchored => None,
        }
    }

    /// Volta a seguir a região (descarta a origem livre)
    pub fn snap_back(&mut self) {
        self.placement = OverlayPlacement::Anchored;
        self.grab = None;
    }

    /// Retângulo atual do overlay.
    /// `content` é o tamanho medido do texto; só é usado no modo livre.
    pub fn current_rect(&self, region: &CaptureRegion, content: Option<(i32, i32)>) -> PixelRect {
        match self.placement {
            OverlayPlacement::Anchored => region.rect(),
            OverlayPlacement::Free { x, y } => {
                let (w, h) = content.unwrap_or((region.width(), region.height()));
                PixelRect {
                    x,
                    y,
                    w: w.max(1),
                    h: h.max(1),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region() -> CaptureRegion {
        CaptureRegion::new(100, 100, 400, 300).unwrap()
    }

    #[test]
    fn anchored_rect_equals_region() {
        let state = OverlayPositionState::new();
        for r in [
            region(),
            CaptureRegion::new(0, 0, 1, 1).unwrap(),
            CaptureRegion::new(-1920, 10, -100, 900).unwrap(),
        ] {
            assert_eq!(state.current_rect(&r, Some((50, 20))), r.rect());
        }
    }

    #[test]
    fn drag_moves_origin_and_ignores_region() {
        let mut state = OverlayPositionState::new();
        state.begin_drag(&region(), None, (10, 10));
        assert_eq!(state.placement(), OverlayPlacement::Free { x: 100, y: 100 });

        // O ponteiro andou 30px pra direita e 5px pra baixo
        assert_eq!(state.drag_to((40, 15)), Some((130, 105)));
        // A janela já foi movida, então o ponteiro volta ao ponto de pega
        assert_eq!(state.drag_to((10, 10)), Some((130, 105)));
        assert_eq!(state.end_drag(), Some((130, 105)));

        let other = CaptureRegion::new(500, 500, 900, 700).unwrap();
        let rect = state.current_rect(&other, Some((200, 40)));
        assert_eq!(rect, PixelRect { x: 130, y: 105, w: 200, h: 40 });
    }

    #[test]
    fn drag_without_begin_is_ignored() {
        let mut state = OverlayPositionState::new();
        assert_eq!(state.drag_to((50, 50)), None);
        assert_eq!(state.end_drag(), None);
        assert_eq!(state.placement(), OverlayPlacement::Anchored);
    }

    #[test]
    fn snap_back_restores_region_exactly() {
        let mut state = OverlayPositionState::new();
        state.begin_drag(&region(), None, (0, 0));
        state.drag_to((300, 300));
        state.end_drag();
        state.snap_back();
        assert_eq!(state.placement(), OverlayPlacement::Anchored);
        assert_eq!(state.current_rect(&region(), Some((10, 10))), region().rect());
    }

    #[test]
    fn free_mode_without_content_uses_region_size() {
        let mut state = OverlayPositionState::new();
        state.begin_drag(&region(), None, (0, 0));
        let rect = state.current_rect(&region(), None);
        assert_eq!((rect.w, rect.h), (300, 200));
    }
}

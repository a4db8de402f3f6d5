// chat-overlay-translator/src/runtime/tray.rs

// ============================================================================
// SYSTEM TRAY (ícone perto do relógio)
// ============================================================================
//
// Overlay     -> Ativar/Desativar, Realinhar com a região, Fonte
// Região      -> Selecionar de novo
// Scan        -> intervalos
// Diagnóstico -> Ver logs, Último erro, Testar overlay
// Sair
//
// O ícone precisa ser criado na main thread (antes do eframe); os cliques
// chegam pelo canal global do menu e são tratados numa thread própria.
//
// ============================================================================

use anyhow::{Context, Result};
use std::thread;
use tray_icon::menu::{Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem, Submenu};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

use crate::app_state::FontMode;
use crate::runtime::controls::Controls;

/// Ação associada a um item do menu
#[derive(Debug, Clone, Copy, PartialEq)]
enum TrayAction {
    ToggleEnabled,
    SnapBack,
    Font(FontMode),
    Reselect,
    ScanInterval(usize),
    ViewLogs,
    ShowLastError,
    TestOverlay,
    Exit,
}

/// Mantém o ícone vivo enquanto a aplicação roda
pub struct AppTray {
    _tray_icon: TrayIcon,
}

/// Cria o ícone e inicia a thread que trata os cliques
pub fn create_tray(controls: Controls) -> Result<AppTray> {
    info!("🖱️  Criando ícone na bandeja...");

    let mut actions: Vec<(MenuId, TrayAction)> = Vec::new();
    let mut item = |text: &str, action: TrayAction| {
        let menu_item = MenuItem::new(text, true, None);
        actions.push((menu_item.id().clone(), action));
        menu_item
    };

    // ── Overlay ──
    let overlay_menu = Submenu::new("Overlay", true);
    overlay_menu.append(&item("Ativar/Desativar", TrayAction::ToggleEnabled))?;
    overlay_menu.append(&item("Realinhar com a região", TrayAction::SnapBack))?;
    let font_menu = Submenu::new("Fonte", true);
    for size in controls.session().font_sizes() {
        font_menu.append(&item(&format!("{}", size), TrayAction::Font(FontMode::Fixed(*size))))?;
    }
    font_menu.append(&item("Auto-fit", TrayAction::Font(FontMode::AutoFit)))?;
    overlay_menu.append(&font_menu)?;

    // ── Scan ──
    let scan_menu = Submenu::new("Intervalo de scan", true);
    for (index, secs) in controls.session().scan_interval_options().iter().enumerate() {
        scan_menu.append(&item(&format!("{} s", secs), TrayAction::ScanInterval(index)))?;
    }

    // ── Diagnóstico ──
    let diagnostics_menu = Submenu::new("Diagnóstico", true);
    diagnostics_menu.append(&item("Ver logs", TrayAction::ViewLogs))?;
    diagnostics_menu.append(&item("Mostrar último erro", TrayAction::ShowLastError))?;
    diagnostics_menu.append(&item("Testar overlay", TrayAction::TestOverlay))?;

    let reselect = item("Selecionar região", TrayAction::Reselect);
    let exit = item("Sair", TrayAction::Exit);

    let menu = Menu::new();
    menu.append_items(&[
        &overlay_menu,
        &reselect,
        &scan_menu,
        &diagnostics_menu,
        &PredefinedMenuItem::separator(),
        &exit,
    ])?;

    let tray_icon = TrayIconBuilder::new()
        .with_menu(Box::new(menu))
        .with_tooltip("Chat Overlay Translator (RU → EN)")
        .with_icon(create_icon()?)
        .build()
        .context("Falha ao criar ícone na bandeja")?;

    thread::Builder::new()
        .name("tray".to_string())
        .spawn(move || {
            while let Ok(event) = MenuEvent::receiver().recv() {
                let action = actions
                    .iter()
                    .find(|(id, _)| *id == event.id)
                    .map(|(_, action)| *action);
                if let Some(action) = action {
                    debug!("🖱️  Tray: {:?}", action);
                    handle_action(&controls, action);
                }
            }
        })
        .context("Falha ao iniciar thread do tray")?;

    info!("✅ Ícone na bandeja pronto");
    Ok(AppTray {
        _tray_icon: tray_icon,
    })
}

fn handle_action(controls: &Controls, action: TrayAction) {
    match action {
        TrayAction::ToggleEnabled => {
            controls.toggle_enabled();
        }
        TrayAction::SnapBack => controls.snap_back(),
        TrayAction::Font(mode) => controls.set_font_mode(mode),
        TrayAction::Reselect => controls.reselect_region(),
        TrayAction::ScanInterval(index) => {
            controls.set_scan_interval(index);
        }
        TrayAction::ViewLogs => controls.view_logs(),
        TrayAction::ShowLastError => controls.show_last_error(),
        TrayAction::TestOverlay => controls.test_overlay(),
        TrayAction::Exit => controls.quit(),
    }
}

/// Ícone 16x16 gerado em memória: "T" amarelo sobre fundo escuro
fn create_icon() -> Result<Icon> {
    const SIZE: u32 = 16;
    let mut rgba: Vec<u8> = Vec::with_capacity((SIZE * SIZE * 4) as usize);

    for y in 0..SIZE {
        for x in 0..SIZE {
            let border = x == 0 || y == 0 || x == SIZE - 1 || y == SIZE - 1;
            let bar = (3..=4).contains(&y) && (3..=12).contains(&x);
            let stem = (7..=8).contains(&x) && (3..=12).contains(&y);
            let letter = bar || stem;
            let pixel = if letter {
                [255, 220, 0, 255]
            } else if border {
                [200, 200, 200, 255]
            } else {
                [20, 20, 30, 230]
            };
            rgba.extend_from_slice(&pixel);
        }
    }

    Icon::from_rgba(rgba, SIZE, SIZE).context("Falha ao criar ícone")
}

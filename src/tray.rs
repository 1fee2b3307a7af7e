//! System tray icon
//!
//! Menu: a disabled label naming the summon chord, a separator, "Show" and
//! "Exit". Clicks are read on a listener thread and posted to the UI queue.

use anyhow::{Context, Result};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem},
    Icon, TrayIcon, TrayIconBuilder,
};

use crate::logging;
use crate::overlay::{UiMessage, UiSender};

/// Price tag glyph (32x32)
const LOGO_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32" viewBox="0 0 32 32">
  <path fill="#FFC600" d="M3 5a2 2 0 0 1 2-2h9.2a2 2 0 0 1 1.4.6l12.8 12.8a2 2 0 0 1 0 2.8l-9.2 9.2a2 2 0 0 1-2.8 0L3.6 15.6A2 2 0 0 1 3 14.2V5Zm6 2.5a2.5 2.5 0 1 0 0 5 2.5 2.5 0 0 0 0-5Z"/>
</svg>"#;

const FALLBACK_ICON_SIZE: u32 = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    Show,
    Exit,
}

/// Menu item ids, detached from the (non-`Send`) tray so the listener
/// thread can match events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMenuIds {
    show_id: String,
    exit_id: String,
}

impl TrayMenuIds {
    /// Matches a menu event id to a TrayMenuAction
    pub fn action_for(&self, id: &str) -> Option<TrayMenuAction> {
        if id == self.show_id {
            Some(TrayMenuAction::Show)
        } else if id == self.exit_id {
            Some(TrayMenuAction::Exit)
        } else {
            None
        }
    }

    pub fn match_menu_event(&self, event: &MenuEvent) -> Option<TrayMenuAction> {
        self.action_for(&event.id.0)
    }
}

/// Manages the system tray icon and menu. Dropping it removes the icon.
pub struct TrayManager {
    #[allow(dead_code)]
    tray_icon: TrayIcon,
    ids: TrayMenuIds,
}

impl TrayManager {
    /// `label` is the disabled first line, e.g. "ARC Raiders Market (Ctrl+F)".
    pub fn new(label: &str) -> Result<Self> {
        let icon = match create_icon_from_svg() {
            Ok(icon) => icon,
            Err(e) => {
                logging::log("TRAY", &format!("Icon render failed, using plain icon: {:#}", e));
                fallback_icon()?
            }
        };
        let (menu, ids) = create_menu(label)?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(icon)
            .with_tooltip(label)
            .with_menu(Box::new(menu))
            .build()
            .context("Failed to create tray icon")?;

        logging::log("TRAY", "Tray icon created");
        Ok(Self { tray_icon, ids })
    }

    pub fn ids(&self) -> TrayMenuIds {
        self.ids.clone()
    }
}

/// Renders the embedded SVG into RGBA bytes.
fn render_svg_rgba() -> Result<(Vec<u8>, u32, u32)> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_str(LOGO_SVG, &opts).context("Failed to parse SVG")?;

    let size = tree.size();
    let width = size.width() as u32;
    let height = size.height() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height).context("Failed to create pixmap")?;
    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok((pixmap.take(), width, height))
}

fn create_icon_from_svg() -> Result<Icon> {
    let (rgba, width, height) = render_svg_rgba()?;
    Icon::from_rgba(rgba, width, height).context("Failed to create icon from RGBA data")
}

fn fallback_rgba() -> Vec<u8> {
    vec![0xFF; (FALLBACK_ICON_SIZE * FALLBACK_ICON_SIZE * 4) as usize]
}

/// Plain white square.
fn fallback_icon() -> Result<Icon> {
    Icon::from_rgba(fallback_rgba(), FALLBACK_ICON_SIZE, FALLBACK_ICON_SIZE)
        .context("Failed to create fallback icon")
}

fn create_menu(label: &str) -> Result<(Menu, TrayMenuIds)> {
    let menu = Menu::new();

    let label_item = MenuItem::new(label, false, None);
    let show_item = MenuItem::new("Show", true, None);
    let exit_item = MenuItem::new("Exit", true, None);

    let ids = TrayMenuIds {
        show_id: show_item.id().0.clone(),
        exit_id: exit_item.id().0.clone(),
    };

    menu.append(&label_item).context("Failed to add label item")?;
    menu.append(&PredefinedMenuItem::separator())
        .context("Failed to add separator")?;
    menu.append(&show_item).context("Failed to add Show item")?;
    menu.append(&exit_item).context("Failed to add Exit item")?;

    Ok((menu, ids))
}

/// Forward menu clicks to the UI queue until Exit is chosen or the queue
/// closes.
pub fn start_tray_listener(ids: TrayMenuIds, queue: UiSender) {
    let spawned = std::thread::Builder::new()
        .name("tray-listener".to_string())
        .spawn(move || {
            while let Ok(event) = MenuEvent::receiver().recv() {
                let Some(action) = ids.match_menu_event(&event) else {
                    continue;
                };
                logging::log("TRAY", &format!("Menu action: {:?}", action));
                let msg = match action {
                    TrayMenuAction::Show => UiMessage::Show,
                    TrayMenuAction::Exit => UiMessage::Exit,
                };
                if !queue.post(msg) || action == TrayMenuAction::Exit {
                    break;
                }
            }
            logging::log("TRAY", "Tray listener stopped");
        });

    if let Err(e) = spawned {
        logging::log_error("TRAY", &e.to_string(), Some("starting tray listener"));
    }
}

//! Cartridge browser: the boot screen listing images found on storage.

use crate::display::{Display, Rect};
use crate::engine::Cartridge;
use crate::input::NavigationEvent;
use crate::list::{truncate_to_width, ListView};
use crate::storage::FileEntry;
use crate::style::UiColors;
use crate::ui::{self, ITEM_HEIGHT};

const LIST_X: i32 = 10;
const LIST_Y: i32 = 32;
const TEXT_X: i32 = 14;

/// Rows that fit between the bars and the window box.
pub fn page_size_for(display_height: i32) -> usize {
    ((display_height - 56) / ITEM_HEIGHT).max(1) as usize
}

#[derive(Debug)]
pub struct FileBrowser {
    items: Vec<FileEntry>,
    view: ListView,
}

impl FileBrowser {
    pub fn open(items: Vec<FileEntry>, display: &impl Display) -> Self {
        let view = ListView::new(items.len(), page_size_for(display.height()));
        log::info!(
            "Browsing {} cartridges, {} per page",
            items.len(),
            view.page_size()
        );
        FileBrowser { items, view }
    }

    pub fn items(&self) -> &[FileEntry] {
        &self.items
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    /// Apply one event. Returns the chosen cartridge on a valid confirm, after
    /// which the browser holds no items.
    pub fn handle(&mut self, event: NavigationEvent) -> Option<Cartridge> {
        match event {
            NavigationEvent::Up => self.view.move_up(),
            NavigationEvent::Down => self.view.move_down(),
            NavigationEvent::Confirm => return self.take_selected(),
            NavigationEvent::Left | NavigationEvent::Right => {}
        }
        None
    }

    fn take_selected(&mut self) -> Option<Cartridge> {
        let idx = self.view.selected()?;
        let mut items = std::mem::take(&mut self.items);
        self.view = ListView::new(0, self.view.page_size());
        let entry = items.swap_remove(idx);
        log::info!("Selected {}", entry.name);
        Some(Cartridge::new(entry.path))
    }

    /// Full screen: bars, window box and the list.
    pub fn draw(&mut self, display: &mut impl Display, colors: &UiColors, title: &str) {
        display.clear(colors.background);
        let (w, h) = (display.width(), display.height());
        ui::draw_window_box(display, colors, Rect::new(2, 20, w - 4, h - 40), title);
        ui::draw_bars(display, colors, title, ui::BROWSER_HINTS);
        self.view.invalidate();
        self.draw_list(display, colors);
    }

    /// Repaint the list area if the selection moved. Returns whether anything
    /// was drawn.
    pub fn draw_list(&mut self, display: &mut impl Display, colors: &UiColors) -> bool {
        if !self.view.is_dirty() {
            return false;
        }
        let (w, h) = (display.width(), display.height());
        display.fill_rect(Rect::new(LIST_X, LIST_Y, w - 20, h - 64), colors.background);

        let max_width = w - 28;
        let selected = self.view.selected();
        let first = self.view.scroll_offset();
        for idx in self.view.visible() {
            let label = truncate_to_width(&self.items[idx].name, max_width, |s| {
                display.text_width(s)
            });
            let y = (idx - first) as i32 * ITEM_HEIGHT + LIST_Y;
            let color = if Some(idx) == selected {
                colors.selected_text
            } else {
                colors.text
            };
            display.draw_text(&label, TEXT_X, y, color);
        }
        self.view.mark_drawn();
        true
    }
}

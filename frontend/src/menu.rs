//! Modal overlay menu drawn over the paused game.
//!
//! A [`Menu`] is a fixed list of items grouped into bordered sections. The
//! sections are only visual: navigation runs linearly over all items and
//! wraps at both ends. Disabled items are stepped over.
//!
//! Drawing is split in two. [`Menu::draw`] paints the whole overlay when it is
//! opened or restored; [`Menu::draw_selection`] is called every frame and only
//! repaints the two rows whose highlight changed.

use crate::display::{Display, Rect};
use crate::input::NavigationEvent;
use crate::style::UiColors;
use crate::ui::{self, ITEM_HEIGHT, TEXT_PADDING};

pub const WINDOW_W: i32 = 124;
pub const WINDOW_H: i32 = 104;
pub const WINDOW_Y: i32 = 16;

#[derive(Debug, Clone)]
pub struct MenuItem<A> {
    pub label: String,
    pub section: usize,
    pub enabled: bool,
    pub action: A,
}

impl<A> MenuItem<A> {
    pub fn new(label: impl Into<String>, section: usize, action: A) -> Self {
        MenuItem {
            label: label.into(),
            section,
            enabled: true,
            action,
        }
    }

    pub fn enabled_if(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuPhase {
    Idle,
    Active,
}

#[derive(Debug)]
pub struct Menu<A> {
    tab: &'static str,
    items: Vec<MenuItem<A>>,
    selected: usize,
    drawn_selected: Option<usize>,
    phase: MenuPhase,
    rows: Option<Vec<i32>>,
}

impl<A: Copy> Menu<A> {
    pub fn new(tab: &'static str, items: Vec<MenuItem<A>>) -> Self {
        assert!(!items.is_empty(), "menu needs at least one item");
        Menu {
            tab,
            items,
            selected: 0,
            drawn_selected: None,
            phase: MenuPhase::Idle,
            rows: None,
        }
    }

    /// Pin the top of every row instead of stacking rows inside their
    /// section borders.
    pub fn with_rows(mut self, rows: &[i32]) -> Self {
        assert_eq!(rows.len(), self.items.len(), "one row per item");
        self.rows = Some(rows.to_vec());
        self
    }

    /// Enter `Active` with the first item selected.
    pub fn open(&mut self) {
        self.phase = MenuPhase::Active;
        self.selected = 0;
        if !self.items[0].enabled {
            self.move_down();
        }
        self.drawn_selected = None;
    }

    pub fn close(&mut self) {
        self.phase = MenuPhase::Idle;
    }

    pub fn phase(&self) -> MenuPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == MenuPhase::Active
    }

    pub fn items(&self) -> &[MenuItem<A>] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_action(&self) -> A {
        self.items[self.selected].action
    }

    pub fn set_label(&mut self, idx: usize, label: String) {
        self.items[idx].label = label;
    }

    // A disabled landing spot is stepped over once in the same direction.
    // Two disabled neighbours in a row are not expected.
    pub fn move_up(&mut self) {
        let n = self.items.len();
        self.selected = (self.selected + n - 1) % n;
        if !self.items[self.selected].enabled {
            self.selected = (self.selected + n - 1) % n;
        }
    }

    pub fn move_down(&mut self) {
        let n = self.items.len();
        self.selected = (self.selected + 1) % n;
        if !self.items[self.selected].enabled {
            self.selected = (self.selected + 1) % n;
        }
    }

    /// Handle Up/Down. Returns false for events the menu does not navigate on.
    pub fn navigate(&mut self, event: NavigationEvent) -> bool {
        match event {
            NavigationEvent::Up => self.move_up(),
            NavigationEvent::Down => self.move_down(),
            _ => return false,
        }
        log::debug!("{} menu -> {}", self.tab, self.items[self.selected].label);
        true
    }

    fn window_x(display: &impl Display) -> i32 {
        display.width() - WINDOW_W
    }

    /// Border rectangle of every section, top to bottom. A menu with a single
    /// section is framed by one border inset 8px into the window.
    fn section_rects(&self, wx: i32) -> Vec<(Rect, usize)> {
        let single = self.items.iter().all(|i| i.section == self.items[0].section);
        if single {
            return vec![(Rect::new(wx + 8, WINDOW_Y + 8, WINDOW_W - 16, WINDOW_H - 16), 0)];
        }
        let mut out: Vec<(Rect, usize)> = Vec::new();
        let mut y = WINDOW_Y + 8;
        let mut start = 0;
        while start < self.items.len() {
            let section = self.items[start].section;
            let count = self.items[start..]
                .iter()
                .take_while(|i| i.section == section)
                .count();
            let h = count as i32 * ITEM_HEIGHT + 8;
            out.push((Rect::new(wx + 8, y, WINDOW_W - 16, h), start));
            y += h - 1;
            start += count;
        }
        out
    }

    /// Top of each item row.
    pub fn item_rows(&self, display: &impl Display) -> Vec<i32> {
        if let Some(rows) = &self.rows {
            return rows.clone();
        }
        let mut rows = vec![0; self.items.len()];
        for (rect, start) in self.section_rects(Self::window_x(display)) {
            let section = self.items[start].section;
            for (k, item) in self.items[start..].iter().enumerate() {
                if item.section != section {
                    break;
                }
                rows[start + k] = rect.y + 4 + k as i32 * ITEM_HEIGHT;
            }
        }
        rows
    }

    /// Paint the whole overlay: bars, tab, window, section borders and rows.
    pub fn draw(&mut self, display: &mut impl Display, colors: &UiColors, title: &str, hints: &[(&str, &str)]) {
        ui::draw_bars(display, colors, title, hints);
        ui::draw_tab(display, colors, self.tab);

        let wx = Self::window_x(display);
        display.fill_rect(Rect::new(wx, WINDOW_Y, WINDOW_W, WINDOW_H), colors.bar);
        for (r, _) in self.section_rects(wx) {
            display.draw_rect(r, colors.ink);
            display.draw_rect(Rect::new(r.x + 1, r.y, r.w, r.h), colors.ink);
        }
        for idx in 0..self.items.len() {
            self.draw_row(display, colors, idx);
        }
        self.drawn_selected = Some(self.selected);
    }

    /// Move the highlight if the selection changed since the last draw.
    pub fn draw_selection(&mut self, display: &mut impl Display, colors: &UiColors) -> bool {
        match self.drawn_selected {
            Some(prev) if prev == self.selected => false,
            prev => {
                if let Some(prev) = prev {
                    self.draw_row(display, colors, prev);
                }
                self.draw_row(display, colors, self.selected);
                self.drawn_selected = Some(self.selected);
                true
            }
        }
    }

    /// Repaint one row with the styling its selection state calls for.
    pub fn draw_row(&self, display: &mut impl Display, colors: &UiColors, idx: usize) {
        let wx = Self::window_x(display);
        let y = self.item_rows(display)[idx];
        let bg = if idx == self.selected {
            colors.selected_bg
        } else {
            colors.bar
        };
        display.fill_rect(Rect::new(wx + 10, y, WINDOW_W - 19, ITEM_HEIGHT), bg);
        let item = &self.items[idx];
        ui::draw_label(display, colors, &item.label, wx + 12, y + TEXT_PADDING, item.enabled);
    }
}

//! Screen chrome shared by every modal context: the two bars, the window
//! box around the file list, the context tab and menu labels.

use crate::display::{Display, Rect};
use crate::style::UiColors;

pub const BAR_HEIGHT: i32 = 16;
pub const ITEM_HEIGHT: i32 = 12;
pub const TEXT_HEIGHT: i32 = 8;
pub const TEXT_PADDING: i32 = (ITEM_HEIGHT - TEXT_HEIGHT) / 2;

pub const BROWSER_HINTS: &[(&str, &str)] = &[("Up/Down", " Move   "), ("A", " Select")];
pub const MENU_HINTS: &[(&str, &str)] = &[("Up/Down", " Move   "), ("A", " Choose")];
pub const SETTINGS_HINTS: &[(&str, &str)] = &[("Up/Down", " Move   "), ("L/R", " Change")];

/// Top bar with the centered title and bottom bar with key hints. Hint keys
/// are drawn in the accent color, their descriptions in ink.
pub fn draw_bars(display: &mut impl Display, colors: &UiColors, title: &str, hints: &[(&str, &str)]) {
    let w = display.width();
    let h = display.height();

    display.fill_rect(Rect::new(0, 0, w, BAR_HEIGHT), colors.bar);
    let x = (w - display.text_width(title)) / 2;
    display.draw_text(title, x, 4, colors.ink);

    display.fill_rect(Rect::new(0, h - BAR_HEIGHT, w, BAR_HEIGHT), colors.bar);
    let y = h - 12;
    let mut x = 4;
    for (key, what) in hints {
        display.draw_text(key, x, y, colors.accent);
        x += display.text_width(key);
        display.draw_text(what, x, y, colors.ink);
        x += display.text_width(what);
    }
}

/// Double outline with a caption centered on the top edge.
pub fn draw_window_box(display: &mut impl Display, colors: &UiColors, r: Rect, caption: &str) {
    display.draw_rect(r, colors.border);
    display.draw_rect(Rect::new(r.x + 1, r.y, r.w - 2, r.h), colors.border);
    display.draw_rect(Rect::new(r.x + 4, r.y + 3, r.w - 8, r.h - 7), colors.border);
    display.draw_rect(Rect::new(r.x + 5, r.y + 3, r.w - 10, r.h - 7), colors.border);

    let caption = format!(" {} ", caption);
    let tw = display.text_width(&caption);
    let x = (display.width() - tw) / 2;
    display.fill_rect(Rect::new(x, r.y, tw, TEXT_HEIGHT), colors.background);
    display.draw_text(&caption, x, r.y, colors.text);
}

/// Highlighted tab at the right end of the top bar naming the open overlay.
pub fn draw_tab(display: &mut impl Display, colors: &UiColors, label: &str) {
    let tw = display.text_width(label);
    let x = display.width() - tw - 12;
    display.fill_rect(Rect::new(x - 4, 0, tw + 8, BAR_HEIGHT), colors.selected_bg);
    draw_label(display, colors, label, x, 4, true);
}

/// Menu label: ink with an accent initial, or all disabled color.
pub fn draw_label(display: &mut impl Display, colors: &UiColors, text: &str, x: i32, y: i32, enabled: bool) {
    if !enabled {
        display.draw_text(text, x, y, colors.disabled);
        return;
    }
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return;
    };
    let first = first.to_string();
    display.draw_text(&first, x, y, colors.accent);
    let rest = chars.as_str();
    if !rest.is_empty() {
        display.draw_text(rest, x + display.text_width(&first), y, colors.ink);
    }
}

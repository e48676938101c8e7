//! Windowed selection over a list longer than the screen.

use std::ops::Range;

pub const ELLIPSIS: &str = "...";

/// Selection, scroll window and redraw bookkeeping for one list.
///
/// While the list is non-empty `scroll_offset <= selected < scroll_offset +
/// page_size` and `selected < len` hold after every move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    len: usize,
    page_size: usize,
    selected: usize,
    scroll_offset: usize,
    drawn_selected: Option<usize>,
}

impl ListView {
    pub fn new(len: usize, page_size: usize) -> Self {
        ListView {
            len,
            page_size: page_size.max(1),
            selected: 0,
            scroll_offset: 0,
            drawn_selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Index of the highlighted item, `None` for an empty list.
    pub fn selected(&self) -> Option<usize> {
        (self.selected < self.len).then_some(self.selected)
    }

    pub fn visible(&self) -> Range<usize> {
        let end = (self.scroll_offset + self.page_size).min(self.len);
        self.scroll_offset.min(end)..end
    }

    pub fn move_up(&mut self) {
        if self.len == 0 {
            return;
        }
        if self.selected == 0 {
            // wrap to the bottom and show the last page
            self.selected = self.len - 1;
            self.scroll_offset = (self.selected + 1).saturating_sub(self.page_size);
        } else {
            self.selected -= 1;
            if self.selected < self.scroll_offset {
                self.scroll_offset = self.selected;
            }
        }
        self.clamp_scroll();
    }

    pub fn move_down(&mut self) {
        if self.len == 0 {
            return;
        }
        if self.selected + 1 >= self.len {
            self.selected = 0;
            self.scroll_offset = 0;
        } else {
            self.selected += 1;
            if self.selected >= self.scroll_offset + self.page_size {
                self.scroll_offset = self.selected + 1 - self.page_size;
            }
        }
        self.clamp_scroll();
    }

    fn clamp_scroll(&mut self) {
        self.scroll_offset = self.scroll_offset.min(self.len.saturating_sub(1));
    }

    /// True when the selection moved since the last draw (or nothing was
    /// drawn yet).
    pub fn is_dirty(&self) -> bool {
        self.drawn_selected != Some(self.selected)
    }

    pub fn mark_drawn(&mut self) {
        self.drawn_selected = Some(self.selected);
    }

    /// Force the next draw to repaint the whole list.
    pub fn invalidate(&mut self) {
        self.drawn_selected = None;
    }
}

/// Fit `text` into `max_width` pixels as measured by `measure`. Text that does
/// not fit is cut to the longest fitting prefix whose last three characters
/// are then replaced by [`ELLIPSIS`].
pub fn truncate_to_width(text: &str, max_width: i32, measure: impl Fn(&str) -> i32) -> String {
    if measure(text) <= max_width {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    // longest prefix that fits (binary search, widths grow with length)
    let mut lo = 0usize;
    let mut hi = chars.len();
    while lo < hi {
        let mid = (lo + hi + 1) / 2;
        let cand: String = chars.iter().take(mid).collect();
        if measure(&cand) <= max_width {
            lo = mid;
        } else {
            hi = mid - 1;
        }
    }
    let kept: String = chars.iter().take(lo.saturating_sub(ELLIPSIS.len())).collect();
    kept + ELLIPSIS
}

//! Property tests for list windowing, menu navigation, text fitting and the
//! input cooldown.

mod common;

use std::time::{Duration, Instant};

use common::narrow_i_width;
use handheld_shell::input::{Button, Buttons, Debouncer, NavigationEvent, REARM_DELAY};
use handheld_shell::list::{truncate_to_width, ListView};
use handheld_shell::menu::{Menu, MenuItem};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Move {
    Up,
    Down,
}

fn arb_moves() -> impl Strategy<Value = Vec<Move>> {
    prop::collection::vec(prop_oneof![Just(Move::Up), Just(Move::Down)], 0..64)
}

fn apply(view: &mut ListView, m: Move) {
    match m {
        Move::Up => view.move_up(),
        Move::Down => view.move_down(),
    }
}

/// Enabled flags where no two cyclic neighbours are both disabled and at
/// least one item is enabled.
fn arb_enabled() -> impl Strategy<Value = Vec<bool>> {
    prop::collection::vec(prop::bool::weighted(0.7), 3..9).prop_filter(
        "no adjacent disabled items",
        |flags| {
            let n = flags.len();
            (0..n).all(|i| flags[i] || flags[(i + 1) % n])
        },
    )
}

proptest! {
    #[test]
    fn selection_stays_inside_window(len in 1usize..40, page in 1usize..12, moves in arb_moves()) {
        let mut view = ListView::new(len, page);
        for m in moves {
            apply(&mut view, m);
            let sel = view.selected().unwrap();
            prop_assert!(sel < len);
            prop_assert!(view.scroll_offset() <= sel);
            prop_assert!(sel < view.scroll_offset() + page);
            let visible = view.visible();
            prop_assert!(visible.contains(&sel));
            prop_assert!(visible.len() <= page);
        }
    }

    #[test]
    fn scroll_moves_only_when_selection_leaves_window(len in 1usize..40, page in 1usize..12, moves in arb_moves()) {
        let mut view = ListView::new(len, page);
        for m in moves {
            let before = view.scroll_offset();
            let prev = view.selected().unwrap();
            apply(&mut view, m);
            let sel = view.selected().unwrap();
            let wrapped = match m {
                Move::Up => prev == 0,
                Move::Down => prev + 1 == len,
            };
            if !wrapped && (before..before + page).contains(&sel) {
                prop_assert_eq!(view.scroll_offset(), before);
            }
        }
    }

    #[test]
    fn downs_count_modulo_length(len in 1usize..40, page in 1usize..12, n in 0usize..100) {
        let mut view = ListView::new(len, page);
        for _ in 0..n {
            view.move_down();
        }
        prop_assert_eq!(view.selected(), Some(n % len));
    }

    #[test]
    fn up_then_down_restores_selection(len in 1usize..40, page in 1usize..12, moves in arb_moves()) {
        let mut view = ListView::new(len, page);
        for m in moves {
            apply(&mut view, m);
        }
        let sel = view.selected();
        view.move_up();
        view.move_down();
        prop_assert_eq!(view.selected(), sel);
    }

    #[test]
    fn menu_never_lands_on_disabled_item(enabled in arb_enabled(), moves in arb_moves()) {
        let items = enabled
            .iter()
            .enumerate()
            .map(|(i, on)| MenuItem::new(format!("item {}", i), 0, i).enabled_if(*on))
            .collect();
        let mut menu = Menu::new("Test", items);
        menu.open();
        prop_assert!(enabled[menu.selected()]);
        for m in moves {
            let event = match m {
                Move::Up => NavigationEvent::Up,
                Move::Down => NavigationEvent::Down,
            };
            prop_assert!(menu.navigate(event));
            prop_assert!(enabled[menu.selected()]);
        }
    }

    #[test]
    fn truncation_keeps_longest_fitting_prefix(text in "[a-z il.]{0,80}", max in 24i32..300) {
        let out = truncate_to_width(&text, max, narrow_i_width);
        if narrow_i_width(&text) <= max {
            prop_assert_eq!(out, text);
            return Ok(());
        }
        let chars: Vec<char> = text.chars().collect();
        let fit = (0..=chars.len())
            .rev()
            .find(|&n| narrow_i_width(&chars[..n].iter().collect::<String>()) <= max)
            .unwrap();
        prop_assert!(out.ends_with("..."));
        prop_assert_eq!(out.chars().count(), fit.saturating_sub(3) + 3);
        prop_assert!(text.starts_with(&out[..out.len() - 3]));
    }

    #[test]
    fn uniform_glyphs_always_fit(text in "[a-hj-km-z0-9 ]{0,80}", max in 24i32..300) {
        let out = truncate_to_width(&text, max, narrow_i_width);
        prop_assert!(narrow_i_width(&out) <= max);
    }

    #[test]
    fn accepted_events_respect_cooldown(gaps in prop::collection::vec(0u64..400, 1..60)) {
        let mut debouncer = Debouncer::default();
        let held = Buttons::NONE.with(Button::Left);
        let mut now = Instant::now();
        let mut last: Option<Instant> = None;
        for gap in gaps {
            now += Duration::from_millis(gap);
            if debouncer.poll(&held, now).is_some() {
                if let Some(prev) = last {
                    prop_assert!(now - prev >= REARM_DELAY);
                }
                last = Some(now);
            }
        }
    }
}

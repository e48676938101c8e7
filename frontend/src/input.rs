//! Logical buttons and the shared-cooldown debouncer.

use std::time::{Duration, Instant};

/// Cooldown between two accepted events.
pub const REARM_DELAY: Duration = Duration::from_millis(250);
/// Cooldown after entering a modal context, so the press that opened it does
/// not immediately trigger something inside it.
pub const INITIAL_DELAY: Duration = Duration::from_millis(500);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    Confirm,
}

impl Button {
    /// Polling priority when several buttons are held at once.
    pub const ALL: [Button; 5] = [
        Button::Up,
        Button::Down,
        Button::Left,
        Button::Right,
        Button::Confirm,
    ];

    const fn bit(self) -> u8 {
        match self {
            Button::Up => 0x01,
            Button::Down => 0x02,
            Button::Left => 0x04,
            Button::Right => 0x08,
            Button::Confirm => 0x10,
        }
    }

    pub fn from_name(name: &str) -> Option<Button> {
        match name.to_ascii_lowercase().as_str() {
            "up" => Some(Button::Up),
            "down" => Some(Button::Down),
            "left" => Some(Button::Left),
            "right" => Some(Button::Right),
            "confirm" | "a" => Some(Button::Confirm),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationEvent {
    Up,
    Down,
    Left,
    Right,
    Confirm,
}

impl From<Button> for NavigationEvent {
    fn from(b: Button) -> Self {
        match b {
            Button::Up => NavigationEvent::Up,
            Button::Down => NavigationEvent::Down,
            Button::Left => NavigationEvent::Left,
            Button::Right => NavigationEvent::Right,
            Button::Confirm => NavigationEvent::Confirm,
        }
    }
}

/// Per-button asserted state, independent of the physical controller.
pub trait ButtonSource {
    fn is_down(&self, button: Button) -> bool;
}

/// One frame's worth of sampled button state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);

    pub fn sample(source: &impl ButtonSource) -> Self {
        let mut b = Buttons::NONE;
        for button in Button::ALL {
            b.set(button, source.is_down(button));
        }
        b
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        if pressed {
            self.0 |= button.bit();
        } else {
            self.0 &= !button.bit();
        }
    }

    pub fn with(mut self, button: Button) -> Self {
        self.set(button, true);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl ButtonSource for Buttons {
    fn is_down(&self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }
}

/// Turns held buttons into rate-limited navigation events.
///
/// The cooldown is shared by every button, so alternating presses are
/// throttled just like a held one. A held button keeps producing one event per
/// cooldown window until it is released.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    ready_at: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Debouncer::new(REARM_DELAY)
    }
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Debouncer {
            delay,
            ready_at: None,
        }
    }

    /// Block input for `initial` from `now`. Called when a modal context opens.
    pub fn rearm(&mut self, now: Instant, initial: Duration) {
        self.ready_at = Some(now + initial);
    }

    pub fn poll(&mut self, buttons: &impl ButtonSource, now: Instant) -> Option<NavigationEvent> {
        if let Some(ready_at) = self.ready_at {
            if now < ready_at {
                return None;
            }
        }
        let button = Button::ALL.into_iter().find(|b| buttons.is_down(*b))?;
        self.ready_at = Some(now + self.delay);
        Some(button.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn first_press_is_accepted_immediately() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        let held = Buttons::NONE.with(Button::Down);
        assert_eq!(d.poll(&held, t0), Some(NavigationEvent::Down));
    }

    #[test]
    fn held_button_repeats_once_per_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        let held = Buttons::NONE.with(Button::Up);
        assert!(d.poll(&held, t0).is_some());
        assert!(d.poll(&held, t0 + ms(100)).is_none());
        assert!(d.poll(&held, t0 + ms(249)).is_none());
        assert_eq!(d.poll(&held, t0 + ms(250)), Some(NavigationEvent::Up));
        assert!(d.poll(&held, t0 + ms(260)).is_none());
    }

    #[test]
    fn cooldown_is_shared_between_buttons() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        assert!(d.poll(&Buttons::NONE.with(Button::Up), t0).is_some());
        assert!(d.poll(&Buttons::NONE.with(Button::Down), t0 + ms(50)).is_none());
        assert!(d.poll(&Buttons::NONE.with(Button::Confirm), t0 + ms(200)).is_none());
        assert_eq!(
            d.poll(&Buttons::NONE.with(Button::Confirm), t0 + ms(300)),
            Some(NavigationEvent::Confirm)
        );
    }

    #[test]
    fn released_buttons_do_not_consume_the_window() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        assert!(d.poll(&Buttons::NONE, t0).is_none());
        assert!(d.poll(&Buttons::NONE.with(Button::Left), t0 + ms(1)).is_some());
    }

    #[test]
    fn rearm_applies_the_initial_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        d.rearm(t0, INITIAL_DELAY);
        let held = Buttons::NONE.with(Button::Confirm);
        assert!(d.poll(&held, t0 + ms(300)).is_none());
        assert!(d.poll(&held, t0 + ms(499)).is_none());
        assert!(d.poll(&held, t0 + ms(500)).is_some());
    }

    #[test]
    fn priority_follows_button_order() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        let held = Buttons::NONE.with(Button::Confirm).with(Button::Down);
        assert_eq!(d.poll(&held, t0), Some(NavigationEvent::Down));
    }

    #[test]
    fn buttons_sample_and_clear() {
        let mut b = Buttons::NONE.with(Button::Left).with(Button::Right);
        assert!(b.is_down(Button::Left));
        b.set(Button::Left, false);
        assert!(!b.is_down(Button::Left));
        assert_eq!(Buttons::sample(&b), b);
        assert_eq!(Button::from_name("CONFIRM"), Some(Button::Confirm));
        assert_eq!(Button::from_name("start"), None);
    }
}

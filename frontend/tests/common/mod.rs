#![allow(dead_code)]

use std::time::{Duration, Instant};

use handheld_shell::backlight::Backlight;
use handheld_shell::display::{Color, Display, Rect};
use handheld_shell::engine::{Cartridge, Engine};
use handheld_shell::input::{Button, Buttons};
use handheld_shell::settings::Palette;
use handheld_shell::shell::{Shell, ShellOptions};
use handheld_shell::storage::MemStorage;

#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Clear(Color),
    Fill(Rect, Color),
    Outline(Rect, Color),
    Text(String, i32, i32, Color),
    Present,
}

/// Display that records every call. Glyphs are 6px wide except `i` and `l`,
/// which are 2px, so text fitting is not plain character counting.
pub struct RecordingDisplay {
    pub width: i32,
    pub height: i32,
    pub ops: Vec<Op>,
}

impl RecordingDisplay {
    pub fn new(width: i32, height: i32) -> Self {
        RecordingDisplay {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Display whose browser page holds `rows` entries.
    pub fn with_page(rows: i32) -> Self {
        RecordingDisplay::new(320, rows * 12 + 56)
    }

    pub fn take_ops(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    /// Drawing calls since the last `take_ops`, `Present` excluded.
    pub fn draw_count(&self) -> usize {
        self.ops.iter().filter(|op| **op != Op::Present).count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Text(t, ..) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn text_colored(&self, text: &str) -> Option<Color> {
        self.ops.iter().rev().find_map(|op| match op {
            Op::Text(t, _, _, c) if t == text => Some(*c),
            _ => None,
        })
    }
}

impl Display for RecordingDisplay {
    fn width(&self) -> i32 {
        self.width
    }

    fn height(&self) -> i32 {
        self.height
    }

    fn clear(&mut self, color: Color) {
        self.ops.push(Op::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(Op::Fill(rect, color));
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.ops.push(Op::Outline(rect, color));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
        self.ops.push(Op::Text(text.to_string(), x, y, color));
    }

    fn text_width(&self, text: &str) -> i32 {
        narrow_i_width(text)
    }

    fn present(&mut self) {
        self.ops.push(Op::Present);
    }
}

pub fn narrow_i_width(text: &str) -> i32 {
    text.chars()
        .map(|c| if c == 'i' || c == 'l' { 2 } else { 6 })
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    Load(String),
    Reset,
    SaveState,
    LoadState,
    Volume(u8),
    Palette(Palette),
    Suspend,
    Resume,
}

#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub calls: Vec<EngineCall>,
}

impl RecordingEngine {
    pub fn last_volume(&self) -> Option<u8> {
        self.calls.iter().rev().find_map(|c| match c {
            EngineCall::Volume(v) => Some(*v),
            _ => None,
        })
    }

    pub fn last_palette(&self) -> Option<Palette> {
        self.calls.iter().rev().find_map(|c| match c {
            EngineCall::Palette(p) => Some(*p),
            _ => None,
        })
    }
}

impl Engine for RecordingEngine {
    fn load(&mut self, cartridge: Cartridge) {
        self.calls.push(EngineCall::Load(cartridge.name()));
    }

    fn reset(&mut self) {
        self.calls.push(EngineCall::Reset);
    }

    fn save_state(&mut self) {
        self.calls.push(EngineCall::SaveState);
    }

    fn load_state(&mut self) {
        self.calls.push(EngineCall::LoadState);
    }

    fn set_volume(&mut self, volume: u8) {
        self.calls.push(EngineCall::Volume(volume));
    }

    fn set_palette(&mut self, palette: Palette) {
        self.calls.push(EngineCall::Palette(palette));
    }

    fn suspend(&mut self) {
        self.calls.push(EngineCall::Suspend);
    }

    fn resume(&mut self) {
        self.calls.push(EngineCall::Resume);
    }
}

#[derive(Debug)]
pub struct RecordingBacklight {
    pub dimmable: bool,
    pub duties: Vec<u32>,
}

impl RecordingBacklight {
    pub fn dimmable() -> Self {
        RecordingBacklight {
            dimmable: true,
            duties: Vec::new(),
        }
    }

    pub fn fixed() -> Self {
        RecordingBacklight {
            dimmable: false,
            duties: Vec::new(),
        }
    }
}

impl Backlight for RecordingBacklight {
    fn is_dimmable(&self) -> bool {
        self.dimmable
    }

    fn max_duty(&self) -> u32 {
        255
    }

    fn write_duty(&mut self, duty: u32) {
        self.duties.push(duty);
    }
}

pub type TestShell = Shell<RecordingDisplay, MemStorage, RecordingEngine, RecordingBacklight>;

pub fn rom_names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("game{:02}.nes", i)).collect()
}

pub fn shell_with(storage: MemStorage, page: i32, backlight: RecordingBacklight) -> TestShell {
    shell_with_options(storage, page, backlight, ShellOptions::default())
}

pub fn shell_with_options(
    storage: MemStorage,
    page: i32,
    backlight: RecordingBacklight,
    options: ShellOptions,
) -> TestShell {
    Shell::new(
        RecordingDisplay::with_page(page),
        storage,
        RecordingEngine::default(),
        backlight,
        options,
    )
}

/// Drives a shell through `tick` with a simulated clock, one button press per
/// call, spaced beyond every cooldown.
pub struct Driver {
    pub shell: TestShell,
    pub now: Instant,
}

impl Driver {
    pub fn start(mut shell: TestShell) -> Self {
        let now = Instant::now();
        shell.start(now);
        Driver { shell, now }
    }

    pub fn advance(&mut self, ms: u64) {
        self.now += Duration::from_millis(ms);
    }

    pub fn press(&mut self, button: Button) -> Option<handheld_shell::shell::TerminalAction> {
        self.advance(600);
        self.shell.tick(Buttons::NONE.with(button), self.now)
    }

    pub fn idle(&mut self) -> Option<handheld_shell::shell::TerminalAction> {
        self.advance(16);
        self.shell.tick(Buttons::NONE, self.now)
    }

    pub fn pause(&mut self) {
        self.advance(16);
        self.shell.pause(self.now);
    }

    pub fn display(&mut self) -> &mut RecordingDisplay {
        self.shell.display_mut()
    }
}

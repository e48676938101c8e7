//! Interactive shell of a handheld console emulator: cartridge browser,
//! pause and settings overlays, debounced input and persisted settings.

pub mod backlight;
pub mod browser;
pub mod config;
pub mod display;
pub mod emu;
pub mod engine;
pub mod error;
pub mod input;
pub mod list;
pub mod menu;
pub mod pause_menu;
#[cfg(feature = "sdl")]
pub mod sdl;
pub mod settings;
pub mod settings_menu;
pub mod shell;
pub mod storage;
pub mod style;
pub mod ui;

pub use error::{Result, ShellError};

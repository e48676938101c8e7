//! Top-level state machine of the device UI.
//!
//! ```text
//! Browsing --confirm--> Running --pause()--> Paused --Settings--> Settings
//!                          ^                  |  ^                  |
//!                          +--Resume/Reset/---+  +--Save & Return---+
//!                             QuickSave/QuickLoad
//! Paused --Save and Quit--> Restarting (host reboots into Browsing)
//! ```
//!
//! The host owns the frame loop. While `Running` it advances the engine and
//! calls [`Shell::pause`] on the pause button; in every other state it calls
//! [`Shell::tick`] once per frame and leaves the display to the shell.
//! The engine is suspended on pause and resumed only when the overlay hands
//! control back to the game.

use std::time::Instant;

use crate::backlight::{self, Backlight};
use crate::browser::FileBrowser;
use crate::display::Display;
use crate::engine::Engine;
use crate::input::{Buttons, Debouncer, NavigationEvent, INITIAL_DELAY};
use crate::pause_menu::{PauseMenu, PauseOutcome};
use crate::settings::{Settings, SettingsStore};
use crate::settings_menu::{apply_to_engine, SettingsContext, SettingsMenu};
use crate::storage::Storage;
use crate::style::UiColors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Browsing,
    Running,
    Paused,
    Settings,
    /// Save and Quit was chosen; nothing more happens until the host reboots.
    Restarting,
}

/// Frame results the host has to act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalAction {
    /// A cartridge went to the engine; start emulating.
    Launched,
    /// The overlay closed; continue emulating.
    Resumed,
    /// Restart the device.
    Restart,
}

#[derive(Debug, Clone)]
pub struct ShellOptions {
    pub title: String,
    pub extension: String,
    pub settings_record: String,
    pub colors: UiColors,
}

impl Default for ShellOptions {
    fn default() -> Self {
        ShellOptions {
            title: "HANDHELD".to_string(),
            extension: "nes".to_string(),
            settings_record: "settings.bin".to_string(),
            colors: UiColors::default(),
        }
    }
}

pub struct Shell<D, S, E, B> {
    display: D,
    storage: S,
    engine: E,
    backlight: B,
    options: ShellOptions,
    store: SettingsStore,
    settings: Settings,
    state: ShellState,
    debouncer: Debouncer,
    browser: FileBrowser,
    pause_menu: PauseMenu,
    settings_menu: SettingsMenu,
}

impl<D, S, E, B> Shell<D, S, E, B>
where
    D: Display,
    S: Storage,
    E: Engine,
    B: Backlight,
{
    /// Boot: load (or create) settings, push them to the hardware and the
    /// engine, and enumerate cartridges for the browser.
    pub fn new(display: D, mut storage: S, mut engine: E, mut backlight: B, options: ShellOptions) -> Self {
        let store = SettingsStore::new(options.settings_record.clone());
        let settings = store.initialize(&mut storage);
        backlight::set_brightness(&mut backlight, settings.brightness);
        apply_to_engine(&settings, &mut engine);

        let files = storage.list(&options.extension).unwrap_or_else(|e| {
            log::warn!("Failed to list cartridges: {}", e);
            Vec::new()
        });
        let browser = FileBrowser::open(files, &display);
        let settings_menu = SettingsMenu::new(backlight.is_dimmable());

        Shell {
            display,
            storage,
            engine,
            backlight,
            options,
            store,
            settings,
            state: ShellState::Browsing,
            debouncer: Debouncer::default(),
            browser,
            pause_menu: PauseMenu::new(),
            settings_menu,
        }
    }

    /// Paint the browser and start accepting input.
    pub fn start(&mut self, now: Instant) {
        self.browser
            .draw(&mut self.display, &self.options.colors, &self.options.title);
        self.display.present();
        self.debouncer.rearm(now, INITIAL_DELAY);
    }

    /// One UI frame: poll input, act on it, repaint what changed.
    pub fn tick(&mut self, buttons: Buttons, now: Instant) -> Option<TerminalAction> {
        if matches!(self.state, ShellState::Running | ShellState::Restarting) {
            return None;
        }
        let action = match self.debouncer.poll(&buttons, now) {
            Some(event) => self.handle(event, now),
            None => None,
        };
        self.redraw();
        self.display.present();
        action
    }

    /// Dispatch one debounced event to the active modal context.
    pub fn handle(&mut self, event: NavigationEvent, now: Instant) -> Option<TerminalAction> {
        match self.state {
            ShellState::Browsing => {
                let cartridge = self.browser.handle(event)?;
                log::info!("Launching {}", cartridge.name());
                self.engine.load(cartridge);
                self.display.clear(self.options.colors.screen);
                self.state = ShellState::Running;
                Some(TerminalAction::Launched)
            }
            ShellState::Paused => {
                let outcome =
                    self.pause_menu
                        .handle(event, &mut self.engine, &mut self.display, &self.options.colors)?;
                match outcome {
                    PauseOutcome::OpenSettings => {
                        self.state = ShellState::Settings;
                        self.settings_menu.open(
                            &self.settings,
                            &mut self.display,
                            &self.options.colors,
                            &self.options.title,
                        );
                        self.debouncer.rearm(now, INITIAL_DELAY);
                        None
                    }
                    PauseOutcome::Resume => {
                        self.engine.resume();
                        self.state = ShellState::Running;
                        log::info!("Resuming emulation");
                        Some(TerminalAction::Resumed)
                    }
                    PauseOutcome::Restart => {
                        self.state = ShellState::Restarting;
                        log::info!("Restart requested");
                        Some(TerminalAction::Restart)
                    }
                }
            }
            ShellState::Settings => {
                let ctx = SettingsContext {
                    settings: &mut self.settings,
                    store: &self.store,
                    storage: &mut self.storage,
                    engine: &mut self.engine,
                    backlight: &mut self.backlight,
                };
                let closed = self
                    .settings_menu
                    .handle(event, ctx, &mut self.display, &self.options.colors);
                if closed {
                    self.state = ShellState::Paused;
                    self.pause_menu
                        .draw(&mut self.display, &self.options.colors, &self.options.title);
                    self.debouncer.rearm(now, INITIAL_DELAY);
                }
                None
            }
            ShellState::Running | ShellState::Restarting => None,
        }
    }

    /// Open the pause overlay over a running game. Ignored in other states.
    pub fn pause(&mut self, now: Instant) {
        if self.state != ShellState::Running {
            return;
        }
        log::info!("Paused");
        self.engine.suspend();
        self.state = ShellState::Paused;
        self.pause_menu
            .open(&mut self.display, &self.options.colors, &self.options.title);
        self.display.present();
        self.debouncer.rearm(now, INITIAL_DELAY);
    }

    fn redraw(&mut self) {
        let colors = &self.options.colors;
        match self.state {
            ShellState::Browsing => {
                self.browser.draw_list(&mut self.display, colors);
            }
            ShellState::Paused => {
                self.pause_menu.draw_selection(&mut self.display, colors);
            }
            ShellState::Settings => {
                self.settings_menu.draw_selection(&mut self.display, colors);
            }
            ShellState::Running | ShellState::Restarting => {}
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        matches!(self.state, ShellState::Paused | ShellState::Settings)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn browser(&self) -> &FileBrowser {
        &self.browser
    }

    pub fn pause_menu(&self) -> &PauseMenu {
        &self.pause_menu
    }

    pub fn settings_menu(&self) -> &SettingsMenu {
        &self.settings_menu
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn backlight(&self) -> &B {
        &self.backlight
    }

    /// Hand the collaborators back, e.g. to rebuild the shell on restart.
    pub fn into_parts(self) -> (D, S, E, B) {
        (self.display, self.storage, self.engine, self.backlight)
    }
}

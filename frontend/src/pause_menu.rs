use crate::display::Display;
use crate::engine::Engine;
use crate::input::NavigationEvent;
use crate::menu::{Menu, MenuItem};
use crate::style::UiColors;
use crate::ui;

const ROWS: [i32; 6] = [28, 40, 52, 72, 84, 102];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseAction {
    Resume,
    Settings,
    Reset,
    QuickSaveState,
    QuickLoadState,
    SaveAndQuit,
}

/// What the shell has to do after a pause menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    Resume,
    OpenSettings,
    Restart,
}

#[derive(Debug)]
pub struct PauseMenu {
    menu: Menu<PauseAction>,
}

impl Default for PauseMenu {
    fn default() -> Self {
        PauseMenu::new()
    }
}

impl PauseMenu {
    pub fn new() -> Self {
        let items = vec![
            MenuItem::new("Resume", 0, PauseAction::Resume),
            MenuItem::new("Settings", 0, PauseAction::Settings),
            MenuItem::new("Reset", 0, PauseAction::Reset),
            MenuItem::new("Quick Save State", 1, PauseAction::QuickSaveState),
            MenuItem::new("Quick Load State", 1, PauseAction::QuickLoadState),
            MenuItem::new("Save and Quit", 2, PauseAction::SaveAndQuit),
        ];
        PauseMenu {
            menu: Menu::new("Pause", items).with_rows(&ROWS),
        }
    }

    pub fn menu(&self) -> &Menu<PauseAction> {
        &self.menu
    }

    pub fn open(&mut self, display: &mut impl Display, colors: &UiColors, title: &str) {
        self.menu.open();
        self.draw(display, colors, title);
    }

    /// Repaint everything at the current selection, e.g. after the settings
    /// overlay covered it.
    pub fn draw(&mut self, display: &mut impl Display, colors: &UiColors, title: &str) {
        self.menu.draw(display, colors, title, ui::MENU_HINTS);
    }

    pub fn draw_selection(&mut self, display: &mut impl Display, colors: &UiColors) -> bool {
        self.menu.draw_selection(display, colors)
    }

    pub fn handle(
        &mut self,
        event: NavigationEvent,
        engine: &mut impl Engine,
        display: &mut impl Display,
        colors: &UiColors,
    ) -> Option<PauseOutcome> {
        if event != NavigationEvent::Confirm {
            self.menu.navigate(event);
            return None;
        }
        let action = self.menu.selected_action();
        log::info!("Pause menu: {:?}", action);
        let outcome = match action {
            PauseAction::Resume => {
                display.clear(colors.screen);
                PauseOutcome::Resume
            }
            PauseAction::Settings => return Some(PauseOutcome::OpenSettings),
            PauseAction::Reset => {
                engine.reset();
                PauseOutcome::Resume
            }
            PauseAction::QuickSaveState => {
                engine.save_state();
                display.clear(colors.screen);
                PauseOutcome::Resume
            }
            PauseAction::QuickLoadState => {
                engine.load_state();
                display.clear(colors.screen);
                PauseOutcome::Resume
            }
            PauseAction::SaveAndQuit => PauseOutcome::Restart,
        };
        self.menu.close();
        Some(outcome)
    }
}

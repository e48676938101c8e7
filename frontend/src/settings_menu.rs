use crate::backlight::{self, Backlight};
use crate::display::Display;
use crate::engine::Engine;
use crate::input::NavigationEvent;
use crate::menu::{Menu, MenuItem};
use crate::settings::{step_down, step_up, Settings, SettingsStore};
use crate::storage::Storage;
use crate::style::UiColors;
use crate::ui;

const ROWS: [i32; 4] = [30, 42, 54, 66];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    Volume,
    Brightness,
    Palette,
    SaveAndReturn,
}

/// Everything a settings change touches.
pub struct SettingsContext<'a, S, E, B> {
    pub settings: &'a mut Settings,
    pub store: &'a SettingsStore,
    pub storage: &'a mut S,
    pub engine: &'a mut E,
    pub backlight: &'a mut B,
}

/// Copy the audio/video settings into the engine.
pub fn apply_to_engine(settings: &Settings, engine: &mut impl Engine) {
    engine.set_palette(settings.palette);
    engine.set_volume(settings.volume);
}

fn label_for(item: SettingsItem, s: &Settings) -> String {
    match item {
        SettingsItem::Volume => format!("Volume: {}%", s.volume),
        SettingsItem::Brightness => format!("Brightness: {}%", s.brightness),
        SettingsItem::Palette => format!("Palette: {}", s.palette.name()),
        SettingsItem::SaveAndReturn => "Save & Return".to_string(),
    }
}

#[derive(Debug)]
pub struct SettingsMenu {
    menu: Menu<SettingsItem>,
}

impl SettingsMenu {
    /// `dimmable` enables the brightness row.
    pub fn new(dimmable: bool) -> Self {
        let s = Settings::default();
        let items = [
            SettingsItem::Volume,
            SettingsItem::Brightness,
            SettingsItem::Palette,
            SettingsItem::SaveAndReturn,
        ]
        .into_iter()
        .map(|item| {
            MenuItem::new(label_for(item, &s), 0, item)
                .enabled_if(item != SettingsItem::Brightness || dimmable)
        })
        .collect();
        SettingsMenu {
            menu: Menu::new("Settings", items).with_rows(&ROWS),
        }
    }

    pub fn menu(&self) -> &Menu<SettingsItem> {
        &self.menu
    }

    pub fn open(&mut self, settings: &Settings, display: &mut impl Display, colors: &UiColors, title: &str) {
        self.refresh_labels(settings);
        self.menu.open();
        self.menu.draw(display, colors, title, ui::SETTINGS_HINTS);
    }

    fn refresh_labels(&mut self, settings: &Settings) {
        for idx in 0..self.menu.items().len() {
            let item = self.menu.items()[idx].action;
            self.menu.set_label(idx, label_for(item, settings));
        }
    }

    pub fn draw_selection(&mut self, display: &mut impl Display, colors: &UiColors) -> bool {
        self.menu.draw_selection(display, colors)
    }

    /// Apply one event. Returns true when the menu closed.
    pub fn handle<S, E, B>(
        &mut self,
        event: NavigationEvent,
        ctx: SettingsContext<'_, S, E, B>,
        display: &mut impl Display,
        colors: &UiColors,
    ) -> bool
    where
        S: Storage,
        E: Engine,
        B: Backlight,
    {
        let item = self.menu.selected_action();
        match event {
            NavigationEvent::Up | NavigationEvent::Down => {
                self.menu.navigate(event);
            }
            NavigationEvent::Left | NavigationEvent::Right => {
                let right = event == NavigationEvent::Right;
                let s = ctx.settings;
                match item {
                    SettingsItem::Volume => {
                        s.volume = if right { step_up(s.volume) } else { step_down(s.volume) };
                    }
                    SettingsItem::Brightness => {
                        s.brightness = if right {
                            step_up(s.brightness)
                        } else {
                            step_down(s.brightness)
                        };
                        backlight::set_brightness(ctx.backlight, s.brightness);
                    }
                    SettingsItem::Palette => {
                        s.palette = if right { s.palette.next() } else { s.palette.prev() };
                    }
                    SettingsItem::SaveAndReturn => return false,
                }
                log::debug!("Settings now {:?}", s);
                let idx = self.menu.selected();
                self.menu.set_label(idx, label_for(item, s));
                self.menu.draw_row(display, colors, idx);
            }
            NavigationEvent::Confirm => {
                if item == SettingsItem::SaveAndReturn {
                    apply_to_engine(ctx.settings, ctx.engine);
                    ctx.store.save(ctx.storage, ctx.settings);
                    self.menu.close();
                    return true;
                }
            }
        }
        false
    }
}

//! SDL2 implementations of the display and input collaborators.

use crate::display::{Color, Display, Rect};
use crate::error::{Result, ShellError};
use crate::input::{Button, ButtonSource};
use sdl2::controller::{Button as CButton, GameController};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::{self, PixelFormatEnum};
use sdl2::rect;
use sdl2::render::{TextureCreator, WindowCanvas};
use sdl2::surface::Surface;
use sdl2::ttf::Font;
use sdl2::video::WindowContext;
use std::collections::{HashMap, HashSet};

pub const SCREEN_W: u32 = 320;
pub const SCREEN_H: u32 = 240;

fn sdl_color(c: Color) -> pixels::Color {
    pixels::Color::RGB(c.r, c.g, c.b)
}

fn sdl_rect(r: Rect) -> Option<rect::Rect> {
    (r.w > 0 && r.h > 0).then(|| rect::Rect::new(r.x, r.y, r.w as u32, r.h as u32))
}

/// Draws into a persistent 320x240 frame and scales it onto the window on
/// `present`. The frame survives between presents, so partial redraws work.
pub struct SdlDisplay<'ttf> {
    canvas: WindowCanvas,
    creator: TextureCreator<WindowContext>,
    frame: Surface<'static>,
    font: Font<'ttf, 'static>,
}

impl<'ttf> SdlDisplay<'ttf> {
    pub fn new(canvas: WindowCanvas, font: Font<'ttf, 'static>) -> Result<Self> {
        let frame = Surface::new(SCREEN_W, SCREEN_H, PixelFormatEnum::RGB888).map_err(ShellError::Sdl)?;
        let creator = canvas.texture_creator();
        Ok(SdlDisplay {
            canvas,
            creator,
            frame,
            font,
        })
    }
}

impl Display for SdlDisplay<'_> {
    fn width(&self) -> i32 {
        SCREEN_W as i32
    }

    fn height(&self) -> i32 {
        SCREEN_H as i32
    }

    fn clear(&mut self, color: Color) {
        if let Err(e) = self.frame.fill_rect(None, sdl_color(color)) {
            log::debug!("Clear failed: {}", e);
        }
    }

    fn fill_rect(&mut self, r: Rect, color: Color) {
        if let Some(r) = sdl_rect(r) {
            if let Err(e) = self.frame.fill_rect(r, sdl_color(color)) {
                log::debug!("Fill {:?} failed: {}", r, e);
            }
        }
    }

    fn draw_rect(&mut self, r: Rect, color: Color) {
        let edges = [
            Rect::new(r.x, r.y, r.w, 1),
            Rect::new(r.x, r.y + r.h - 1, r.w, 1),
            Rect::new(r.x, r.y, 1, r.h),
            Rect::new(r.x + r.w - 1, r.y, 1, r.h),
        ];
        for e in edges {
            self.fill_rect(e, color);
        }
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, color: Color) {
        if text.is_empty() {
            return;
        }
        match self.font.render(text).blended(sdl_color(color)) {
            Ok(surf) => {
                let dst = rect::Rect::new(x, y, surf.width(), surf.height());
                if let Err(e) = surf.blit(None, &mut self.frame, dst) {
                    log::debug!("Text blit failed: {}", e);
                }
            }
            Err(e) => log::debug!("Text render failed: {}", e),
        }
    }

    fn text_width(&self, text: &str) -> i32 {
        self.font.size_of(text).map(|(w, _)| w as i32).unwrap_or(0)
    }

    fn present(&mut self) {
        match self.creator.create_texture_from_surface(&self.frame) {
            Ok(tex) => {
                if let Err(e) = self.canvas.copy(&tex, None, None) {
                    log::debug!("Frame copy failed: {}", e);
                }
                self.canvas.present();
            }
            Err(e) => log::warn!("Failed to upload frame: {}", e),
        }
    }
}

fn default_keys() -> HashMap<Button, Keycode> {
    HashMap::from([
        (Button::Up, Keycode::Up),
        (Button::Down, Keycode::Down),
        (Button::Left, Keycode::Left),
        (Button::Right, Keycode::Right),
        (Button::Confirm, Keycode::Return),
    ])
}

fn controller_button(button: Button) -> CButton {
    match button {
        Button::Up => CButton::DPadUp,
        Button::Down => CButton::DPadDown,
        Button::Left => CButton::DPadLeft,
        Button::Right => CButton::DPadRight,
        Button::Confirm => CButton::A,
    }
}

/// Keyboard and game controller state, tracked from the event stream.
pub struct SdlInput {
    keys: HashMap<Button, Keycode>,
    pause_key: Keycode,
    held_keys: HashSet<Keycode>,
    held_buttons: HashSet<CButton>,
    // opened controllers must stay alive to keep delivering events
    controllers: Attached<GameController>,
}

/// Open device handles keyed by SDL instance id. Dropping a handle closes
/// the device.
struct Attached<T> {
    devices: Vec<(u32, T)>,
}

impl<T> Attached<T> {
    fn new() -> Self {
        Attached {
            devices: Vec::new(),
        }
    }

    /// False (and `device` dropped) when the id is already open.
    fn insert(&mut self, id: u32, device: T) -> bool {
        if self.devices.iter().any(|(i, _)| *i == id) {
            return false;
        }
        self.devices.push((id, device));
        true
    }

    fn remove(&mut self, id: u32) -> Option<T> {
        let pos = self.devices.iter().position(|(i, _)| *i == id)?;
        Some(self.devices.remove(pos).1)
    }

    fn len(&self) -> usize {
        self.devices.len()
    }
}

impl SdlInput {
    /// `overrides` maps logical names ("up", "confirm", "pause", ...) to SDL
    /// key names.
    pub fn new(overrides: Option<&HashMap<String, String>>) -> Self {
        let mut keys = default_keys();
        let mut pause_key = Keycode::Escape;
        for (action, key_name) in overrides.into_iter().flatten() {
            let Some(key) = Keycode::from_name(key_name) else {
                log::warn!("Unknown key name {:?} for {}", key_name, action);
                continue;
            };
            if action.eq_ignore_ascii_case("pause") {
                pause_key = key;
            } else if let Some(button) = Button::from_name(action) {
                keys.insert(button, key);
            } else {
                log::warn!("Unknown action {:?} in controller_map", action);
            }
        }
        SdlInput {
            keys,
            pause_key,
            held_keys: HashSet::new(),
            held_buttons: HashSet::new(),
            controllers: Attached::new(),
        }
    }

    pub fn attach(&mut self, controller: GameController) {
        let name = controller.name();
        if self.controllers.insert(controller.instance_id(), controller) {
            log::info!("Opened controller: {}", name);
        }
    }

    /// Close a controller by instance id after SDL reported its removal.
    pub fn detach(&mut self, instance_id: u32) {
        if let Some(c) = self.controllers.remove(instance_id) {
            log::info!("Controller removed: {}", c.name());
            // buttons held on the pad never see their release
            self.held_buttons.clear();
        }
        log::debug!("{} controller(s) open", self.controllers.len());
    }

    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::KeyDown {
                keycode: Some(k), ..
            } => {
                self.held_keys.insert(*k);
            }
            Event::KeyUp {
                keycode: Some(k), ..
            } => {
                self.held_keys.remove(k);
            }
            Event::ControllerButtonDown { button, .. } => {
                self.held_buttons.insert(*button);
            }
            Event::ControllerButtonUp { button, .. } => {
                self.held_buttons.remove(button);
            }
            _ => {}
        }
    }

    /// Whether `event` is a fresh press of the pause button.
    pub fn is_pause(&self, event: &Event) -> bool {
        match event {
            Event::KeyDown {
                keycode: Some(k),
                repeat: false,
                ..
            } => *k == self.pause_key,
            Event::ControllerButtonDown { button, .. } => {
                matches!(button, CButton::Start | CButton::Guide)
            }
            _ => false,
        }
    }
}

impl ButtonSource for SdlInput {
    fn is_down(&self, button: Button) -> bool {
        let key = self.keys.get(&button).is_some_and(|k| self.held_keys.contains(k));
        key || self.held_buttons.contains(&controller_button(button))
    }
}

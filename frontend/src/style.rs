use crate::config::config_dir;
use crate::display::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Colors used by the browser and the overlays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiColors {
    pub background: Color,
    pub bar: Color,
    pub text: Color,
    pub accent: Color,
    pub selected_text: Color,
    pub selected_bg: Color,
    pub border: Color,
    pub ink: Color,
    pub disabled: Color,
    /// Fill of the game area when an overlay closes.
    pub screen: Color,
}

impl Default for UiColors {
    fn default() -> Self {
        UiColors {
            background: Color::from_rgb565(0x0015),
            bar: Color::from_rgb565(0xad55),
            text: Color::from_rgb565(0xffff),
            accent: Color::from_rgb565(0xa800),
            selected_text: Color::from_rgb565(0x57ca),
            selected_bg: Color::from_rgb565(0x0560),
            border: Color::WHITE,
            ink: Color::BLACK,
            disabled: Color::from_rgb565(0x7bef),
            screen: Color::BLACK,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct StyleConfig {
    pub background: Option<[u8; 3]>,
    pub bar: Option<[u8; 3]>,
    pub text: Option<[u8; 3]>,
    pub accent: Option<[u8; 3]>,
    pub selected_text: Option<[u8; 3]>,
    pub selected_bg: Option<[u8; 3]>,
    pub border: Option<[u8; 3]>,
    pub ink: Option<[u8; 3]>,
    pub disabled: Option<[u8; 3]>,
    pub screen: Option<[u8; 3]>,
}

impl StyleConfig {
    /// Overlay the configured colors onto `base`.
    pub fn apply(&self, base: UiColors) -> UiColors {
        let pick = |o: Option<[u8; 3]>, d: Color| o.map(Color::from).unwrap_or(d);
        UiColors {
            background: pick(self.background, base.background),
            bar: pick(self.bar, base.bar),
            text: pick(self.text, base.text),
            accent: pick(self.accent, base.accent),
            selected_text: pick(self.selected_text, base.selected_text),
            selected_bg: pick(self.selected_bg, base.selected_bg),
            border: pick(self.border, base.border),
            ink: pick(self.ink, base.ink),
            disabled: pick(self.disabled, base.disabled),
            screen: pick(self.screen, base.screen),
        }
    }
}

pub fn user_style_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("style.toml"))
}

fn write_default_style(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, include_str!("../style.sample.toml").as_bytes())?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Read a style file; a missing or unparsable file yields the defaults.
pub fn load_style_from(path: &Path) -> UiColors {
    let defaults = UiColors::default();
    let Ok(contents) = std::fs::read_to_string(path) else {
        return defaults;
    };
    match toml::from_str::<StyleConfig>(&contents) {
        Ok(parsed) => parsed.apply(defaults),
        Err(e) => {
            log::warn!("Failed to parse style at {}: {}", path.display(), e);
            defaults
        }
    }
}

pub fn load_style() -> UiColors {
    match user_style_path() {
        Some(p) => {
            if !p.exists() {
                if let Err(e) = write_default_style(&p) {
                    log::warn!("Failed to write default style: {}", e);
                }
            }
            load_style_from(&p)
        }
        None => UiColors::default(),
    }
}

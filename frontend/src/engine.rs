use crate::settings::Palette;
use std::path::{Path, PathBuf};

/// A cartridge image chosen in the browser. Ownership moves from the browser
/// to the shell and then into the engine.
#[derive(Debug, PartialEq, Eq)]
pub struct Cartridge {
    path: PathBuf,
}

impl Cartridge {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Cartridge { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The emulation core as seen from the shell.
pub trait Engine {
    fn load(&mut self, cartridge: Cartridge);
    fn reset(&mut self);
    fn save_state(&mut self);
    fn load_state(&mut self);
    fn set_volume(&mut self, volume: u8);
    fn set_palette(&mut self, palette: Palette);

    /// Halt emulation while an overlay owns the screen and input.
    fn suspend(&mut self) {}

    /// Continue after `suspend`. A no-op when not suspended.
    fn resume(&mut self) {}
}

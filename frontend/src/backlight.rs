use crate::error::{Result, ShellError};
use std::path::PathBuf;

pub const DEFAULT_MAX_DUTY: u32 = 255;

/// Panel backlight intensity control.
pub trait Backlight {
    fn is_dimmable(&self) -> bool;
    fn max_duty(&self) -> u32;
    fn write_duty(&mut self, duty: u32);
}

/// Percentage (0..=100) to a rounded hardware duty value.
pub fn duty_for(percent: u8, max_duty: u32) -> u32 {
    (u32::from(percent) * max_duty + 50) / 100
}

pub fn set_brightness(backlight: &mut impl Backlight, percent: u8) {
    if backlight.is_dimmable() {
        let duty = duty_for(percent, backlight.max_duty());
        log::debug!("Backlight {}% -> duty {}", percent, duty);
        backlight.write_duty(duty);
    }
}

impl<T: Backlight + ?Sized> Backlight for Box<T> {
    fn is_dimmable(&self) -> bool {
        (**self).is_dimmable()
    }

    fn max_duty(&self) -> u32 {
        (**self).max_duty()
    }

    fn write_duty(&mut self, duty: u32) {
        (**self).write_duty(duty)
    }
}

/// Panels without a dimmable backlight.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBacklight;

impl Backlight for NoBacklight {
    fn is_dimmable(&self) -> bool {
        false
    }

    fn max_duty(&self) -> u32 {
        0
    }

    fn write_duty(&mut self, _duty: u32) {}
}

/// Backlight driven by writing the duty value into a file, as sysfs
/// brightness nodes expect.
#[derive(Debug, Clone)]
pub struct FileBacklight {
    path: PathBuf,
    max_duty: u32,
}

impl FileBacklight {
    pub fn new(path: impl Into<PathBuf>, max_duty: u32) -> Self {
        FileBacklight {
            path: path.into(),
            max_duty,
        }
    }

    fn write(&self, duty: u32) -> Result<()> {
        std::fs::write(&self.path, format!("{}\n", duty)).map_err(|e| ShellError::io(&self.path, e))
    }
}

impl Backlight for FileBacklight {
    fn is_dimmable(&self) -> bool {
        true
    }

    fn max_duty(&self) -> u32 {
        self.max_duty
    }

    fn write_duty(&mut self, duty: u32) {
        if let Err(e) = self.write(duty) {
            log::warn!("Backlight write failed: {}", e);
        }
    }
}

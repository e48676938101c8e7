//! Engine adapter for an emulator that runs as a separate process.

use crate::config::{CmdTemplate, EmulatorConfig};
use crate::engine::{Cartridge, Engine};
use crate::error::{Result, ShellError};
use crate::settings::Palette;
use std::ffi::OsString;
use std::path::Path;
use std::process::{Child, Command};
use std::time::{Duration, Instant};

/// Expand `{rom}`, `{volume}` and `{palette}` in the template arguments.
pub fn expand_args(tmpl: &CmdTemplate, rom: &Path, volume: u8, palette: Palette) -> Vec<OsString> {
    tmpl.args
        .iter()
        .map(|a| match a.as_str() {
            "{rom}" => rom.as_os_str().to_owned(),
            _ => OsString::from(
                a.replace("{volume}", &volume.to_string())
                    .replace("{palette}", &palette.index().to_string()),
            ),
        })
        .collect()
}

pub struct ProcessEngine {
    config: EmulatorConfig,
    cartridge: Option<Cartridge>,
    child: Option<Child>,
    volume: u8,
    palette: Palette,
    suspended: bool,
}

/// Stop or continue the emulator process while the shell owns the screen.
#[cfg(unix)]
fn signal_child(child: &Child, stop: bool) -> Result<()> {
    use nix::sys::signal::{kill, Signal};
    let sig = if stop { Signal::SIGSTOP } else { Signal::SIGCONT };
    kill(nix::unistd::Pid::from_raw(child.id() as i32), sig)
        .map_err(|e| ShellError::Signal(std::io::Error::from(e)))
}

#[cfg(not(unix))]
fn signal_child(_child: &Child, _stop: bool) -> Result<()> {
    Ok(())
}

impl ProcessEngine {
    pub fn new(config: EmulatorConfig) -> Self {
        ProcessEngine {
            config,
            cartridge: None,
            child: None,
            volume: 0,
            palette: Palette::default(),
            suspended: false,
        }
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    fn spawn(&mut self) -> Result<()> {
        let Some(cart) = self.cartridge.as_ref() else {
            return Ok(());
        };
        let tmpl = &self.config.launch;
        let args = expand_args(tmpl, cart.path(), self.volume, self.palette);
        let child = Command::new(&tmpl.program)
            .args(&args)
            .spawn()
            .map_err(|e| ShellError::Spawn {
                program: tmpl.program.clone(),
                source: e,
            })?;
        log::info!("Launched {} with pid={}", tmpl.program, child.id());
        self.child = Some(child);
        self.suspended = false;
        Ok(())
    }

    // hooks talk to a live emulator, so it is continued first
    fn run_hook(&mut self, hook: Option<&CmdTemplate>, what: &str) {
        self.resume();
        let (Some(tmpl), Some(cart)) = (hook, self.cartridge.as_ref()) else {
            log::warn!("No {} hook configured", what);
            return;
        };
        let args = expand_args(tmpl, cart.path(), self.volume, self.palette);
        match Command::new(&tmpl.program).args(&args).status() {
            Ok(status) if status.success() => log::info!("{} done", what),
            Ok(status) => log::warn!("{} hook exited with {}", what, status),
            Err(e) => log::warn!("{} hook failed to start: {}", what, e),
        }
    }

    /// True once the emulator process has exited by itself.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn has_exited(&mut self) -> bool {
        let Some(c) = self.child.as_mut() else {
            return false;
        };
        match c.try_wait() {
            Ok(Some(status)) => {
                log::info!("Emulator exited with {}", status);
                self.child = None;
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("Child try_wait error: {}", e);
                self.child = None;
                true
            }
        }
    }

    /// Kill the emulator and wait up to a second for it to go away.
    pub fn stop(&mut self) {
        self.resume();
        let Some(mut c) = self.child.take() else {
            return;
        };
        if let Err(e) = c.kill() {
            log::warn!("Failed to kill emulator: {}", e);
            return;
        }
        let start = Instant::now();
        loop {
            match c.try_wait() {
                Ok(Some(status)) => {
                    log::info!("Emulator stopped ({})", status);
                    return;
                }
                Ok(None) if start.elapsed() < Duration::from_secs(1) => {
                    std::thread::sleep(Duration::from_millis(50));
                }
                Ok(None) => {
                    log::warn!("Emulator kill signalled, still running");
                    return;
                }
                Err(e) => {
                    log::warn!("Error waiting for emulator: {}", e);
                    return;
                }
            }
        }
    }
}

impl Drop for ProcessEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

impl Engine for ProcessEngine {
    fn load(&mut self, cartridge: Cartridge) {
        self.stop();
        self.cartridge = Some(cartridge);
        if let Err(e) = self.spawn() {
            log::warn!("{}", e);
        }
    }

    fn reset(&mut self) {
        self.stop();
        if let Err(e) = self.spawn() {
            log::warn!("{}", e);
        }
    }

    fn save_state(&mut self) {
        let hook = self.config.save_state.clone();
        self.run_hook(hook.as_ref(), "Quick save");
    }

    fn load_state(&mut self) {
        let hook = self.config.load_state.clone();
        self.run_hook(hook.as_ref(), "Quick load");
    }

    // Volume and palette are passed on the command line, so they take effect
    // at the next launch or reset.
    fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
    }

    fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    fn suspend(&mut self) {
        let Some(c) = self.child.as_ref() else {
            return;
        };
        if self.suspended {
            return;
        }
        match signal_child(c, true) {
            Ok(()) => {
                log::debug!("Emulator pid={} suspended", c.id());
                self.suspended = true;
            }
            Err(e) => log::warn!("Failed to suspend emulator: {}", e),
        }
    }

    fn resume(&mut self) {
        if !self.suspended {
            return;
        }
        self.suspended = false;
        let Some(c) = self.child.as_ref() else {
            return;
        };
        match signal_child(c, false) {
            Ok(()) => log::debug!("Emulator pid={} resumed", c.id()),
            Err(e) => log::warn!("Failed to resume emulator: {}", e),
        }
    }
}

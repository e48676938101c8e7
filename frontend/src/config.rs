use crate::error::{Result, ShellError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "handheld_shell";

/// External command with `{rom}`, `{volume}` and `{palette}` placeholders.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CmdTemplate {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct EmulatorConfig {
    pub launch: CmdTemplate,
    pub save_state: Option<CmdTemplate>,
    pub load_state: Option<CmdTemplate>,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        EmulatorConfig {
            launch: CmdTemplate {
                program: "fceux".to_string(),
                args: vec!["{rom}".to_string()],
            },
            save_state: None,
            load_state: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct BacklightConfig {
    /// File that accepts the raw duty value, e.g. a sysfs brightness node.
    pub path: String,
    pub max_duty: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Default, PartialEq)]
pub struct ConfigFile {
    pub default_roms_path: Option<String>,
    pub extension: Option<String>,
    pub settings_record: Option<String>,
    pub title: Option<String>,
    pub font_path: Option<String>,
    pub font_size: Option<u16>,
    pub scale: Option<u32>,
    pub emulator: Option<EmulatorConfig>,
    pub backlight: Option<BacklightConfig>,
    pub controller_map: Option<HashMap<String, String>>,
}

impl ConfigFile {
    pub fn with_defaults() -> Self {
        ConfigFile {
            default_roms_path: Some("./roms".to_string()),
            extension: Some("nes".to_string()),
            settings_record: Some("settings.bin".to_string()),
            title: Some("HANDHELD".to_string()),
            font_path: None,
            font_size: Some(10),
            scale: Some(3),
            emulator: Some(EmulatorConfig::default()),
            backlight: None,
            controller_map: None,
        }
    }

    /// Take every field the user set, keep the current value otherwise.
    pub fn merge(&mut self, parsed: ConfigFile) {
        if parsed.default_roms_path.is_some() {
            self.default_roms_path = parsed.default_roms_path;
        }
        if parsed.extension.is_some() {
            self.extension = parsed.extension;
        }
        if parsed.settings_record.is_some() {
            self.settings_record = parsed.settings_record;
        }
        if parsed.title.is_some() {
            self.title = parsed.title;
        }
        if parsed.font_path.is_some() {
            self.font_path = parsed.font_path;
        }
        if parsed.font_size.is_some() {
            self.font_size = parsed.font_size;
        }
        if parsed.scale.is_some() {
            self.scale = parsed.scale;
        }
        if parsed.emulator.is_some() {
            self.emulator = parsed.emulator;
        }
        if parsed.backlight.is_some() {
            self.backlight = parsed.backlight;
        }
        if parsed.controller_map.is_some() {
            self.controller_map = parsed.controller_map;
        }
    }

    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or("nes")
    }

    pub fn settings_record(&self) -> &str {
        self.settings_record.as_deref().unwrap_or("settings.bin")
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("HANDHELD")
    }
}

pub fn config_dir() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg).join(APP_DIR))
    } else {
        dirs::home_dir().map(|home| home.join(".config").join(APP_DIR))
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

fn write_default_config(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, include_str!("../config.sample.toml").as_bytes())?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Parse a config file and merge it onto the defaults.
pub fn load_config_from(path: &Path) -> Result<ConfigFile> {
    let mut cfg = ConfigFile::with_defaults();
    let contents = std::fs::read_to_string(path).map_err(|e| ShellError::io(path, e))?;
    let parsed = toml::from_str::<ConfigFile>(&contents).map_err(|e| ShellError::ConfigParse {
        path: path.to_path_buf(),
        details: e.to_string(),
    })?;
    cfg.merge(parsed);
    Ok(cfg)
}

/// Load the user config, writing the sample on first run. Problems are logged
/// and the defaults are used.
pub fn load_config() -> ConfigFile {
    let Some(p) = user_config_path() else {
        return ConfigFile::with_defaults();
    };
    if !p.exists() {
        if let Err(e) = write_default_config(&p) {
            log::warn!("Failed to write default config: {}", e);
        }
    }
    match load_config_from(&p) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("{}", e);
            ConfigFile::with_defaults()
        }
    }
}

pub fn write_config_to(cfg: &ConfigFile, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ShellError::io(parent, e))?;
    }
    let s = toml::to_string_pretty(cfg).map_err(|e| ShellError::ConfigWrite(e.to_string()))?;
    let tmp = path.with_extension("toml.tmp");
    std::fs::write(&tmp, s.as_bytes()).map_err(|e| ShellError::io(&tmp, e))?;
    std::fs::rename(&tmp, path).map_err(|e| ShellError::io(path, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_config_parses() {
        let parsed: ConfigFile = toml::from_str(include_str!("../config.sample.toml")).unwrap();
        let mut cfg = ConfigFile::with_defaults();
        cfg.merge(parsed);
        assert_eq!(cfg.extension(), "nes");
        assert_eq!(cfg.settings_record(), "settings.bin");
        assert!(cfg.emulator.is_some());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "extension = \"NES\"\ntitle = \"MY NES\"\n").unwrap();
        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.extension(), "NES");
        assert_eq!(cfg.title(), "MY NES");
        assert_eq!(cfg.default_roms_path.as_deref(), Some("./roms"));
        assert_eq!(cfg.scale, Some(3));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "scale = \"big\"").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ShellError::ConfigParse { .. })
        ));
    }

    #[test]
    fn written_config_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut cfg = ConfigFile::with_defaults();
        cfg.backlight = Some(BacklightConfig {
            path: "/sys/class/backlight/panel/brightness".to_string(),
            max_duty: Some(1023),
        });
        write_config_to(&cfg, &path).unwrap();
        assert!(!path.with_extension("toml.tmp").exists());
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }
}

//! Persisted user settings and the store that keeps them valid.

use crate::storage::Storage;
use serde::{Deserialize, Serialize};

pub const STEP: u8 = 5;
pub const MAX_LEVEL: u8 = 100;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Palette {
    #[default]
    Ntsc565,
    Pal565,
    Ntsc222,
    Pal222,
}

impl Palette {
    pub const ALL: [Palette; 4] = [
        Palette::Ntsc565,
        Palette::Pal565,
        Palette::Ntsc222,
        Palette::Pal222,
    ];
    pub const COUNT: usize = Palette::ALL.len();

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Palette {
        Palette::ALL[i % Palette::COUNT]
    }

    pub fn name(self) -> &'static str {
        match self {
            Palette::Ntsc565 => "NTSC 565",
            Palette::Pal565 => "PAL 565",
            Palette::Ntsc222 => "NTSC 222",
            Palette::Pal222 => "PAL 222",
        }
    }

    pub fn next(self) -> Palette {
        Palette::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Palette {
        Palette::from_index(self.index() + Palette::COUNT - 1)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    pub volume: u8,
    pub brightness: u8,
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            volume: 50,
            brightness: 100,
            palette: Palette::Ntsc565,
        }
    }
}

impl Settings {
    pub fn is_valid(&self) -> bool {
        self.volume <= MAX_LEVEL && self.brightness <= MAX_LEVEL
    }

    /// Encoded size of every record this build writes.
    pub fn record_size() -> u64 {
        bincode::serialized_size(&Settings::default()).unwrap_or(0)
    }

    pub fn encode(&self) -> crate::error::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// `None` unless `data` is exactly one well-formed, in-range record.
    pub fn decode(data: &[u8]) -> Option<Settings> {
        if data.len() as u64 != Settings::record_size() {
            return None;
        }
        bincode::deserialize::<Settings>(data)
            .ok()
            .filter(Settings::is_valid)
    }
}

/// One step up, saturating at 100.
pub fn step_up(level: u8) -> u8 {
    if level <= MAX_LEVEL - STEP {
        level + STEP
    } else {
        level
    }
}

/// One step down, saturating at 0.
pub fn step_down(level: u8) -> u8 {
    if level >= STEP {
        level - STEP
    } else {
        level
    }
}

/// Loads and saves [`Settings`] as a single fixed-size record.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    record: String,
}

impl SettingsStore {
    pub fn new(record: impl Into<String>) -> Self {
        SettingsStore {
            record: record.into(),
        }
    }

    pub fn record(&self) -> &str {
        &self.record
    }

    /// Boot-time load: a missing record is created with defaults first.
    pub fn initialize(&self, storage: &mut impl Storage) -> Settings {
        if let Ok(None) = storage.read_record(&self.record) {
            log::info!("No settings record, writing defaults to {}", self.record);
            self.save(storage, &Settings::default());
        }
        self.load(storage)
    }

    /// Read the record. Anything that is not a valid record of the current
    /// layout is replaced on storage by the defaults, which are returned.
    pub fn load(&self, storage: &mut impl Storage) -> Settings {
        let data = match storage.read_record(&self.record) {
            Ok(Some(data)) => data,
            Ok(None) => return Settings::default(),
            Err(e) => {
                log::warn!("Failed to read settings: {}", e);
                return Settings::default();
            }
        };
        match Settings::decode(&data) {
            Some(settings) => {
                log::info!("Loaded settings {:?}", settings);
                settings
            }
            None => {
                log::warn!(
                    "Settings record {} is {} bytes (expected {}) or invalid, resetting",
                    self.record,
                    data.len(),
                    Settings::record_size()
                );
                let defaults = Settings::default();
                self.save(storage, &defaults);
                defaults
            }
        }
    }

    /// Rewrite the whole record. Failures are logged and otherwise ignored.
    pub fn save(&self, storage: &mut impl Storage, settings: &Settings) {
        let data = match settings.encode() {
            Ok(d) => d,
            Err(e) => {
                log::warn!("{}", e);
                return;
            }
        };
        match storage.write_record(&self.record, &data) {
            Ok(()) => log::info!("Saved settings {:?}", settings),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, ShellError};
    use crate::storage::{FileEntry, MemStorage};

    struct ReadOnly(MemStorage);

    impl Storage for ReadOnly {
        fn list(&self, extension: &str) -> Result<Vec<FileEntry>> {
            self.0.list(extension)
        }
        fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>> {
            self.0.read_record(name)
        }
        fn write_record(&mut self, name: &str, _data: &[u8]) -> Result<()> {
            Err(ShellError::io(
                name,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "card locked"),
            ))
        }
    }

    #[test]
    fn record_size_is_fixed() {
        let loud = Settings {
            volume: 100,
            brightness: 0,
            palette: Palette::Pal222,
        };
        assert_eq!(loud.encode().unwrap().len() as u64, Settings::record_size());
        assert_eq!(
            Settings::default().encode().unwrap().len() as u64,
            Settings::record_size()
        );
    }

    #[test]
    fn first_run_writes_defaults() {
        let mut storage = MemStorage::default();
        let store = SettingsStore::new("settings.bin");
        assert_eq!(store.initialize(&mut storage), Settings::default());
        assert_eq!(
            storage.records["settings.bin"],
            Settings::default().encode().unwrap()
        );
    }

    #[test]
    fn save_then_load() {
        let mut storage = MemStorage::default();
        let store = SettingsStore::new("settings.bin");
        let s = Settings {
            volume: 35,
            brightness: 80,
            palette: Palette::Ntsc222,
        };
        store.save(&mut storage, &s);
        assert_eq!(store.load(&mut storage), s);
        assert_eq!(store.initialize(&mut storage), s);
    }

    #[test]
    fn wrong_length_record_is_reset() {
        let mut storage = MemStorage::default();
        storage.records.insert("settings.bin".into(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
        let store = SettingsStore::new("settings.bin");
        assert_eq!(store.load(&mut storage), Settings::default());
        assert_eq!(
            storage.records["settings.bin"],
            Settings::default().encode().unwrap()
        );
    }

    #[test]
    fn out_of_range_record_is_reset() {
        let mut storage = MemStorage::default();
        let mut data = Settings::default().encode().unwrap();
        data[0] = 200;
        storage.records.insert("settings.bin".into(), data);
        let store = SettingsStore::new("settings.bin");
        assert_eq!(store.load(&mut storage), Settings::default());
    }

    #[test]
    fn bad_palette_tag_is_reset() {
        let mut storage = MemStorage::default();
        let mut data = Settings::default().encode().unwrap();
        let last = data.len() - 4;
        data[last] = 9;
        storage.records.insert("settings.bin".into(), data);
        let store = SettingsStore::new("settings.bin");
        assert_eq!(store.load(&mut storage), Settings::default());
    }

    #[test]
    fn failed_write_is_absorbed() {
        let mut inner = MemStorage::default();
        let old = Settings {
            volume: 10,
            ..Settings::default()
        };
        inner
            .records
            .insert("settings.bin".into(), old.encode().unwrap());
        let mut storage = ReadOnly(inner);
        let store = SettingsStore::new("settings.bin");
        store.save(&mut storage, &Settings::default());
        assert_eq!(store.load(&mut storage), old);
    }

    #[test]
    fn levels_saturate_in_steps_of_five() {
        let mut v = 0;
        for _ in 0..20 {
            v = step_up(v);
            assert_eq!(v % STEP, 0);
        }
        assert_eq!(v, 100);
        assert_eq!(step_up(v), 100);
        for _ in 0..20 {
            v = step_down(v);
        }
        assert_eq!(v, 0);
        assert_eq!(step_down(v), 0);
    }

    #[test]
    fn palette_cycles_both_ways() {
        for p in Palette::ALL {
            let mut q = p;
            for _ in 0..Palette::COUNT {
                q = q.next();
            }
            assert_eq!(q, p);
            assert_eq!(p.next().prev(), p);
        }
        assert_eq!(Palette::Ntsc565.prev(), Palette::Pal222);
        assert_eq!(Palette::Pal222.name(), "PAL 222");
    }
}

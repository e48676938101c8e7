//! Removable storage: cartridge enumeration and the settings record.

use crate::error::{Result, ShellError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A cartridge image found on storage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
}

impl FileEntry {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        FileEntry {
            name: name.into(),
            path: path.into(),
        }
    }
}

pub trait Storage {
    /// Files (not directories) whose name ends in `.extension`, in
    /// enumeration order.
    fn list(&self, extension: &str) -> Result<Vec<FileEntry>>;
    /// `None` when the record does not exist.
    fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>>;
    /// Replace the whole record.
    fn write_record(&mut self, name: &str, data: &[u8]) -> Result<()>;
}

pub fn has_extension(name: &str, extension: &str) -> bool {
    let name = name.to_lowercase();
    let ext = extension.trim_start_matches('.').to_lowercase();
    name.len() > ext.len() + 1 && name.ends_with(&format!(".{}", ext))
}

/// Flat directory on the host filesystem, standing in for the card root.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FsStorage { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Storage for FsStorage {
    fn list(&self, extension: &str) -> Result<Vec<FileEntry>> {
        let entries = self
            .root
            .read_dir()
            .map_err(|e| ShellError::io(&self.root, e))?;
        let mut files = Vec::new();
        for e in entries.flatten() {
            match e.file_type() {
                Ok(ft) if ft.is_file() => {}
                _ => continue,
            }
            let Some(name) = e.file_name().to_str().map(str::to_string) else {
                continue;
            };
            if has_extension(&name, extension) {
                files.push(FileEntry::new(name, e.path()));
            }
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        log::info!(
            "Found {} .{} files in {}",
            files.len(),
            extension,
            self.root.display()
        );
        Ok(files)
    }

    fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let path = self.root.join(name);
        match std::fs::read(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ShellError::io(path, e)),
        }
    }

    fn write_record(&mut self, name: &str, data: &[u8]) -> Result<()> {
        // Write beside and rename so a failed write never leaves half a record.
        let path = self.root.join(name);
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, data).map_err(|e| ShellError::io(&tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| ShellError::io(&path, e))?;
        Ok(())
    }
}

/// Storage kept entirely in memory.
#[derive(Debug, Default, Clone)]
pub struct MemStorage {
    pub files: Vec<String>,
    pub records: BTreeMap<String, Vec<u8>>,
}

impl MemStorage {
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MemStorage {
            files: files.into_iter().map(Into::into).collect(),
            records: BTreeMap::new(),
        }
    }
}

impl Storage for MemStorage {
    fn list(&self, extension: &str) -> Result<Vec<FileEntry>> {
        Ok(self
            .files
            .iter()
            .filter(|f| has_extension(f, extension))
            .map(|f| FileEntry::new(f.clone(), Path::new("/").join(f)))
            .collect())
    }

    fn read_record(&self, name: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.records.get(name).cloned())
    }

    fn write_record(&mut self, name: &str, data: &[u8]) -> Result<()> {
        self.records.insert(name.to_string(), data.to_vec());
        Ok(())
    }
}

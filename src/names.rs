//! Personal-name lookup for the word filter.
//!
//! Names come from plain-text lists (one name per line), either a single
//! file or every file in a directory, such as an unpacked names corpus.
//! Words matching any loaded name are excluded from the dataset.

use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use tracing::{info, warn};

use crate::error::{HintError, Result};

/// Global name list (loaded once, reused)
static NAMES: OnceLock<NameList> = OnceLock::new();

#[derive(Debug, Clone, Default)]
pub struct NameList {
    names: HashSet<String>,
}

impl NameList {
    /// Load from a file or from all files in a directory.
    pub fn load(path: &Path) -> Result<Self> {
        let io_err = |source| HintError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut list = NameList::default();
        if path.is_dir() {
            let mut files: Vec<_> = fs::read_dir(path)
                .map_err(io_err)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file())
                .collect();
            files.sort();
            for file in files {
                list.extend_from_file(&file);
            }
        } else {
            let content = fs::read_to_string(path).map_err(io_err)?;
            list.extend_from_str(&content);
        }
        Ok(list)
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = NameList::default();
        for name in names {
            list.insert(name.as_ref());
        }
        list
    }

    /// Files that are not valid UTF-8 are skipped.
    fn extend_from_file(&mut self, file: &Path) {
        match fs::read_to_string(file) {
            Ok(content) => self.extend_from_str(&content),
            Err(e) => warn!("Skipping name list {}: {}", file.display(), e),
        }
    }

    fn extend_from_str(&mut self, content: &str) {
        for line in content.lines() {
            if !line.trim_start().starts_with('#') {
                self.insert(line);
            }
        }
    }

    fn insert(&mut self, name: &str) {
        let name = name.trim();
        if !name.is_empty() {
            self.names.insert(name.to_lowercase());
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.names.contains(&word.trim().to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Install the process-wide name list. Returns the number of names
/// available; a second call keeps the first list.
pub fn init_names(path: &Path) -> Result<usize> {
    if let Some(existing) = NAMES.get() {
        warn!("Name list already initialized ({} names)", existing.len());
        return Ok(existing.len());
    }

    let list = NameList::load(path)?;
    let count = list.len();
    match NAMES.set(list) {
        Ok(()) => {
            info!("Loaded {} names from {}", count, path.display());
            Ok(count)
        }
        Err(_) => Ok(NAMES.get().map_or(0, NameList::len)),
    }
}

/// Check the process-wide list; `false` when none is loaded.
pub fn is_known_name(word: &str) -> bool {
    NAMES.get().is_some_and(|names| names.contains(word))
}

pub fn global_names() -> Option<&'static NameList> {
    NAMES.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_single_file_lowercased() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# female names").unwrap();
        writeln!(file, "Abigail").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  Bonnie  ").unwrap();

        let list = NameList::load(file.path()).unwrap();
        assert_eq!(list.len(), 2);
        assert!(list.contains("abigail"));
        assert!(list.contains("BONNIE"));
        assert!(!list.contains("glacier"));
    }

    #[test]
    fn loads_every_file_in_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("female.txt"), "Alice\nBeth\n").unwrap();
        fs::write(dir.path().join("male.txt"), "Carl\nalice\n").unwrap();
        fs::write(dir.path().join("binary.bin"), [0xff, 0xfe, 0x00]).unwrap();

        let list = NameList::load(dir.path()).unwrap();
        assert_eq!(list.len(), 3);
        assert!(list.contains("carl"));
    }

    #[test]
    fn missing_path_is_an_error() {
        let err = NameList::load(Path::new("/nonexistent/names.txt")).unwrap_err();
        assert!(matches!(err, HintError::Io { .. }));
    }
}

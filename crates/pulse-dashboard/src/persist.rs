#![forbid(unsafe_code)]

//! Key-value persistence ports.
//!
//! The port carries a fire-and-forget contract: reads yield `None` when
//! nothing usable is stored, writes are best effort, and failures are
//! logged rather than returned. Side-effect subscribers built on it (theme
//! write-back) never observe an error.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use ahash::AHashMap;

/// String key-value port, the browser-storage analogue.
pub trait Persistence {
    /// Stored value for `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`. Best effort.
    fn set(&self, key: &str, value: &str);
}

/// In-memory persistence for tests and demos.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    entries: RefCell<AHashMap<String, String>>,
}

impl MemoryPersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Persistence for MemoryPersistence {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// File-per-key persistence rooted at a directory.
///
/// Keys are flattened to a safe file name, so a key can never address a
/// path outside the root.
#[derive(Debug, Clone)]
pub struct DirPersistence {
    root: PathBuf,
}

impl DirPersistence {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(safe)
    }
}

impl Persistence for DirPersistence {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Some(contents.trim_end_matches('\n').to_string()),
            Err(error) if error.kind() == ErrorKind::NotFound => None,
            Err(error) => {
                tracing::warn!(key, %error, "persistence read failed");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(error) = fs::create_dir_all(&self.root) {
            tracing::warn!(key, %error, "persistence root unavailable");
            return;
        }
        if let Err(error) = fs::write(self.path_for(key), value) {
            tracing::warn!(key, %error, "persistence write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_roundtrip() {
        let store = MemoryPersistence::new();
        assert!(store.is_empty());
        assert_eq!(store.get("theme"), None);

        store.set("theme", "dark");
        assert_eq!(store.get("theme"), Some(String::from("dark")));
        assert_eq!(store.len(), 1);

        store.set("theme", "light");
        assert_eq!(store.get("theme"), Some(String::from("light")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn dir_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DirPersistence::new(dir.path());

        assert_eq!(store.get("theme"), None);
        store.set("theme", "dark");
        assert_eq!(store.get("theme"), Some(String::from("dark")));

        // A second handle over the same root sees the value.
        let reopened = DirPersistence::new(dir.path());
        assert_eq!(reopened.get("theme"), Some(String::from("dark")));
    }

    #[test]
    fn dir_keys_cannot_escape_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = DirPersistence::new(dir.path());

        store.set("../escape", "nope");
        assert_eq!(store.get("../escape"), Some(String::from("nope")));

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("read_dir")
            .map(|entry| entry.expect("entry").file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(".._escape")]);
    }

    #[test]
    fn dir_get_trims_trailing_newline() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("theme"), "dark\n").expect("write");
        let store = DirPersistence::new(dir.path());
        assert_eq!(store.get("theme"), Some(String::from("dark")));
    }
}

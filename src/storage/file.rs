//! File-based state storage for Mnemosyne.
//!
//! The library lives in `words.json` and the stats in `stats.json` under
//! the Mnemosyne home directory. Writes go to a temp file that is renamed
//! into place.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::mnemosyne_home;
use crate::core::Word;
use crate::error::{MnemoError, Result};
use crate::stats::UserStats;
use crate::storage::StateStore;

const WORDS_FILE: &str = "words.json";
const STATS_FILE: &str = "stats.json";

/// File-based state storage.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Create a store in the default home directory.
    ///
    /// Uses `~/.mnemosyne/` or `$MNEMOSYNE_HOME`.
    pub fn new() -> Result<Self> {
        let dir = mnemosyne_home().ok_or_else(|| {
            MnemoError::config("Could not determine state directory (no home directory)")
        })?;
        Self::with_dir(dir)
    }

    /// Create a store in a custom directory, creating it if needed.
    pub fn with_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|e| MnemoError::storage(&dir, e))?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn words_path(&self) -> PathBuf {
        self.dir.join(WORDS_FILE)
    }

    pub fn stats_path(&self) -> PathBuf {
        self.dir.join(STATS_FILE)
    }

    fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(|e| MnemoError::storage(path, e))?;
        let value = serde_json::from_str(&content)
            .map_err(|e| MnemoError::serde(format!("{}: {}", path.display(), e)))?;
        Ok(Some(value))
    }

    /// Write `value` as pretty JSON using temp file + rename.
    fn atomic_write<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<()> {
        let final_path = self.dir.join(file_name);
        let temp_path = self.dir.join(format!(".{}.tmp", file_name));

        let json = serde_json::to_string_pretty(value)?;

        {
            let mut file =
                fs::File::create(&temp_path).map_err(|e| MnemoError::storage(&temp_path, e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| MnemoError::storage(&temp_path, e))?;
            file.sync_all()
                .map_err(|e| MnemoError::storage(&temp_path, e))?;
        }

        // Atomic on POSIX
        fs::rename(&temp_path, &final_path).map_err(|e| MnemoError::storage(&final_path, e))?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load_words(&self) -> Result<Option<Vec<Word>>> {
        Self::read_json(&self.words_path())
    }

    fn save_words(&self, words: &[Word]) -> Result<()> {
        self.atomic_write(WORDS_FILE, words)
    }

    fn load_stats(&self) -> Result<Option<UserStats>> {
        Self::read_json(&self.stats_path())
    }

    fn save_stats(&self, stats: &UserStats) -> Result<()> {
        self.atomic_write(STATS_FILE, stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::seed_library;
    use crate::storage::traits::tests::test_state_store_roundtrip;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_store() -> (FileStateStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::with_dir(dir.path()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_file_state_store_roundtrip() {
        let (store, _dir) = create_test_store();
        test_state_store_roundtrip(&store);
    }

    #[test]
    fn test_with_dir_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("nested").join("state");
        assert!(!nested.exists());

        let store = FileStateStore::with_dir(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(store.dir(), nested);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let (store, dir) = create_test_store();
        store.save_words(&seed_library()).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["words.json".to_string()]);
    }

    #[test]
    fn test_words_file_uses_camel_case() {
        let (store, _dir) = create_test_store();
        store.save_words(&seed_library()).unwrap();

        let raw = fs::read_to_string(store.words_path()).unwrap();
        assert!(raw.contains("\"hookL1\""));
        assert!(raw.contains("\"errorCount\""));
        assert!(raw.contains("\"status\": \"new\""));
    }

    #[test]
    fn test_corrupt_words_file_is_serde_error() {
        let (store, _dir) = create_test_store();
        fs::write(store.words_path(), "[{ not json").unwrap();

        let result = store.load_words();
        assert!(matches!(result, Err(MnemoError::Serde { .. })));
    }

    #[test]
    fn test_stats_file_format() {
        let (store, _dir) = create_test_store();
        fs::write(
            store.stats_path(),
            r#"{"todayDuration":60,"todayCount":3,"totalMastered":0,"streak":1}"#,
        )
        .unwrap();

        let stats = store.load_stats().unwrap().unwrap();
        assert_eq!(stats.today_duration, 60);
        assert_eq!(stats.streak, 1);
    }

    #[test]
    #[serial]
    fn test_new_uses_home_env() {
        let dir = TempDir::new().unwrap();
        std::env::set_var("MNEMOSYNE_HOME", dir.path());

        let store = FileStateStore::new().unwrap();
        assert_eq!(store.words_path(), dir.path().join("words.json"));

        std::env::remove_var("MNEMOSYNE_HOME");
    }
}

use crate::journal::JournalLog;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub const STORAGE_KEY: &str = "mindful_journal_logs_v1";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to serialize journal logs: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable string-keyed storage the log store snapshots into.
pub trait StoragePort {
    /// `Ok(None)` when nothing was ever stored under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    /// Moves an unusable value out of the way so the next write cannot clobber it.
    fn quarantine(&mut self, key: &str) -> Result<(), StoreError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    fn corrupt_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json.corrupt"))
    }
}

/// Renames `from` over `to`, removing `to` first on platforms that refuse.
fn replace_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            if to.exists() {
                fs::remove_file(to)?;
                fs::rename(from, to)
            } else {
                Err(rename_err)
            }
        }
    }
}

impl StoragePort for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let final_path = self.key_path(key);
        let tmp_path = self.dir.join(format!("{key}.json.tmp"));

        fs::write(&tmp_path, value)?;
        replace_file(&tmp_path, &final_path)?;
        Ok(())
    }

    fn quarantine(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(());
        }
        let corrupt = self.corrupt_path(key);
        replace_file(&path, &corrupt)?;
        warn!(
            from = %path.display(),
            to = %corrupt.display(),
            "moved unreadable journal storage aside"
        );
        Ok(())
    }
}

#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut storage = Self::default();
        storage.entries.insert(key.to_string(), value.to_string());
        storage
    }
}

#[cfg(test)]
impl StoragePort for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn quarantine(&mut self, key: &str) -> Result<(), StoreError> {
        if let Some(value) = self.entries.remove(key) {
            self.entries.insert(format!("{key}.corrupt"), value);
        }
        Ok(())
    }
}

/// In-memory journal logs, snapshotted to storage after every change.
pub struct LogStore<S: StoragePort> {
    storage: S,
    logs: Vec<JournalLog>,
}

impl<S: StoragePort> LogStore<S> {
    /// Loads stored logs and guarantees an entry for `today`.
    ///
    /// Missing or corrupt data starts an empty journal rather than failing.
    /// Data that cannot be read or parsed is quarantined before the seeded
    /// journal is written over it.
    pub fn initialize(mut storage: S, today: NaiveDate) -> Self {
        let loaded = match storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => parse_logs(&raw),
            Ok(None) => Some(Vec::new()),
            Err(err) => {
                warn!("failed to read journal storage: {err}");
                None
            }
        };
        let mut logs = match loaded {
            Some(logs) => logs,
            None => {
                if let Err(err) = storage.quarantine(STORAGE_KEY) {
                    warn!("failed to set aside unreadable journal storage: {err}");
                }
                Vec::new()
            }
        };

        if !logs.iter().any(|log| log.date == today) {
            logs.push(JournalLog::new(today));
        }

        info!(count = logs.len(), %today, "journal initialized");
        let mut store = Self { storage, logs };
        store.persist();
        store
    }

    pub fn logs(&self) -> &[JournalLog] {
        &self.logs
    }

    /// Logs newest first, for the history list.
    pub fn history(&self) -> Vec<&JournalLog> {
        let mut sorted: Vec<&JournalLog> = self.logs.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }

    pub fn find(&self, date: NaiveDate) -> Option<&JournalLog> {
        self.logs.iter().find(|log| log.date == date)
    }

    /// Applies `change` to the log for `date` and persists. Returns `false`
    /// without touching storage when no such log exists.
    pub fn update(&mut self, date: NaiveDate, change: impl FnOnce(&mut JournalLog)) -> bool {
        let Some(log) = self.logs.iter_mut().find(|log| log.date == date) else {
            return false;
        };
        change(log);
        self.persist();
        true
    }

    fn persist(&mut self) {
        if self.logs.is_empty() {
            return;
        }

        let result = serde_json::to_string(&self.logs)
            .map_err(StoreError::from)
            .and_then(|raw| self.storage.write(STORAGE_KEY, &raw));
        if let Err(err) = result {
            warn!("failed to persist journal logs: {err}");
        }
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }
}

/// `None` when `raw` is not a journal collection at all.
fn parse_logs(raw: &str) -> Option<Vec<JournalLog>> {
    let parsed: Vec<JournalLog> = match serde_json::from_str(raw) {
        Ok(logs) => logs,
        Err(err) => {
            warn!("stored journal data is unreadable, starting fresh: {err}");
            return None;
        }
    };

    let mut seen = HashSet::new();
    let mut logs = Vec::with_capacity(parsed.len());
    for log in parsed {
        if seen.insert(log.date) {
            logs.push(log);
        } else {
            warn!(date = %log.date, "dropping duplicate stored journal log");
        }
    }
    Some(logs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::ChatMessage;
    use pretty_assertions::assert_eq;

    fn date(raw: &str) -> NaiveDate {
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").expect("fixture date should parse")
    }

    fn stored_logs(storage: &MemoryStorage) -> Vec<JournalLog> {
        let raw = storage
            .read(STORAGE_KEY)
            .expect("memory storage read should succeed")
            .expect("logs should be persisted");
        serde_json::from_str(&raw).expect("persisted logs should parse")
    }

    #[test]
    fn initialize_seeds_today_when_storage_is_empty() {
        let today = date("2024-01-15");
        let store = LogStore::initialize(MemoryStorage::default(), today);

        assert_eq!(store.logs(), &[JournalLog::new(today)]);
        assert_eq!(stored_logs(store.storage()), vec![JournalLog::new(today)]);
    }

    #[test]
    fn initialize_treats_corrupt_data_as_empty() {
        let today = date("2024-01-15");
        let storage = MemoryStorage::with_entry(STORAGE_KEY, "{ not json");
        let store = LogStore::initialize(storage, today);

        assert_eq!(store.logs(), &[JournalLog::new(today)]);
        let set_aside = store
            .storage()
            .read(&format!("{STORAGE_KEY}.corrupt"))
            .expect("memory storage read should succeed");
        assert_eq!(set_aside.as_deref(), Some("{ not json"));
    }

    #[test]
    fn initialize_keeps_existing_logs_and_appends_today() {
        let mut older = JournalLog::new(date("2024-01-10"));
        older.completed = true;
        older.sections.gratitude = "friends".to_string();
        let raw = serde_json::to_string(&vec![older.clone()]).expect("fixture should serialize");

        let today = date("2024-01-15");
        let store = LogStore::initialize(MemoryStorage::with_entry(STORAGE_KEY, &raw), today);

        assert_eq!(store.logs(), &[older, JournalLog::new(today)]);
    }

    #[test]
    fn initialize_does_not_duplicate_an_existing_today() {
        let today = date("2024-01-15");
        let mut existing = JournalLog::new(today);
        existing.sections.happy = "already here".to_string();
        let raw = serde_json::to_string(&vec![existing.clone()]).expect("fixture should serialize");

        let store = LogStore::initialize(MemoryStorage::with_entry(STORAGE_KEY, &raw), today);
        assert_eq!(store.logs(), &[existing]);
    }

    #[test]
    fn initialize_collapses_duplicate_dates() {
        let day = date("2024-01-15");
        let mut first = JournalLog::new(day);
        first.sections.happy = "first".to_string();
        let mut second = JournalLog::new(day);
        second.sections.happy = "second".to_string();
        let raw = serde_json::to_string(&vec![first.clone(), second]).expect("fixture should serialize");

        let store = LogStore::initialize(MemoryStorage::with_entry(STORAGE_KEY, &raw), day);
        assert_eq!(store.logs(), &[first]);
    }

    #[test]
    fn update_persists_and_ignores_unknown_dates() {
        let today = date("2024-01-15");
        let mut store = LogStore::initialize(MemoryStorage::default(), today);

        assert!(store.update(today, |log| log.chat_history.push(ChatMessage::user("hi"))));
        assert_eq!(stored_logs(store.storage())[0].chat_history, vec![ChatMessage::user("hi")]);

        let before = store.logs().to_vec();
        assert!(!store.update(date("2020-01-01"), |log| log.completed = true));
        assert_eq!(store.logs(), before.as_slice());
    }

    #[test]
    fn history_is_newest_first() {
        let raw = serde_json::to_string(&vec![
            JournalLog::new(date("2024-01-12")),
            JournalLog::new(date("2024-01-14")),
        ])
        .expect("fixture should serialize");
        let store = LogStore::initialize(
            MemoryStorage::with_entry(STORAGE_KEY, &raw),
            date("2024-01-13"),
        );

        let dates: Vec<NaiveDate> = store.history().iter().map(|log| log.date).collect();
        assert_eq!(
            dates,
            vec![date("2024-01-14"), date("2024-01-13"), date("2024-01-12")]
        );
    }

    #[test]
    fn stored_collection_round_trips() {
        let mut analyzed = JournalLog::new(date("2024-01-15"));
        analyzed.sections.reflection = "slow down".to_string();
        analyzed.is_analyzed = true;
        analyzed.completed = true;
        analyzed.chat_history = vec![
            ChatMessage::model("Great day!"),
            ChatMessage::user("tell me more"),
            ChatMessage::model("Sure!"),
        ];
        let collection = vec![analyzed, JournalLog::new(date("2024-01-16"))];

        let raw = serde_json::to_string(&collection).expect("collection should serialize");
        let parsed: Vec<JournalLog> = serde_json::from_str(&raw).expect("collection should parse");
        assert_eq!(parsed, collection);
        assert_eq!(serde_json::to_string(&parsed).expect("reserialize"), raw);
    }

    #[test]
    fn file_storage_writes_atomically_and_reads_back() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let mut storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.read(STORAGE_KEY).expect("missing file is not an error"), None);
        storage.write(STORAGE_KEY, "[]").expect("first write should succeed");
        storage.write(STORAGE_KEY, "[1]").expect("overwrite should succeed");

        let stored = storage.read(STORAGE_KEY).expect("read should succeed");
        assert_eq!(stored.as_deref(), Some("[1]"));
        assert!(!dir
            .path()
            .join("nested")
            .join(format!("{STORAGE_KEY}.json.tmp"))
            .exists());
    }

    #[test]
    fn file_backed_store_survives_restart() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let today = date("2024-01-15");

        let mut store = LogStore::initialize(FileStorage::new(dir.path()), today);
        store.update(today, |log| log.sections.happy = "sunshine".to_string());
        drop(store);

        let reopened = LogStore::initialize(FileStorage::new(dir.path()), today);
        assert_eq!(reopened.logs().len(), 1);
        assert_eq!(reopened.logs()[0].sections.happy, "sunshine");
    }

    #[test]
    fn hand_edit_typo_is_kept_beside_the_reseeded_journal() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let today = date("2024-01-15");
        let broken = r#"[{ "date": "2024-01-10", "sections": { "happy": "trip" }, }]"#;
        fs::write(dir.path().join(format!("{STORAGE_KEY}.json")), broken)
            .expect("fixture should be written");

        let store = LogStore::initialize(FileStorage::new(dir.path()), today);
        assert_eq!(store.logs(), &[JournalLog::new(today)]);

        let kept = fs::read_to_string(dir.path().join(format!("{STORAGE_KEY}.json.corrupt")))
            .expect("unreadable journal should be moved aside");
        assert_eq!(kept, broken);

        let reopened = LogStore::initialize(FileStorage::new(dir.path()), today);
        assert_eq!(reopened.logs(), &[JournalLog::new(today)]);
    }

    #[test]
    fn unreadable_bytes_are_quarantined_instead_of_overwritten() {
        let dir = tempfile::tempdir().expect("temp dir should be created");
        let path = dir.path().join(format!("{STORAGE_KEY}.json"));
        let garbage = [0xff_u8, 0xfe, 0x00, 0x5b];
        fs::write(&path, garbage).expect("fixture should be written");

        let storage = FileStorage::new(dir.path());
        assert!(matches!(storage.read(STORAGE_KEY), Err(StoreError::Io(_))));

        let today = date("2024-01-15");
        let store = LogStore::initialize(storage, today);
        assert_eq!(store.logs(), &[JournalLog::new(today)]);

        let kept = fs::read(dir.path().join(format!("{STORAGE_KEY}.json.corrupt")))
            .expect("unreadable journal should be moved aside");
        assert_eq!(kept, garbage);
        assert!(fs::read_to_string(&path)
            .expect("seeded journal should be written")
            .contains("2024-01-15"));
    }
}

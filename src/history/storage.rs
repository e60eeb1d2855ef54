//! Storage operations for the translation history
//!
//! The whole history is one JSON array under [`HISTORY_KEY`], newest first.

use crate::store::{CollectionRead, DurableStore, Result};

use super::models::TranslationRecord;

pub const HISTORY_KEY: &str = "vocabuilder-history";

/// Storage manager for translation history
#[derive(Clone)]
pub struct HistoryStorage {
    store: DurableStore,
}

impl HistoryStorage {
    pub fn new(store: DurableStore) -> Self {
        Self { store }
    }

    /// Read the history, telling a corrupted value apart from an empty one
    pub fn load(&self) -> Result<CollectionRead<TranslationRecord>> {
        self.store.read_collection(HISTORY_KEY)
    }

    /// List all saved translations, newest first.
    ///
    /// A corrupted history reads as empty.
    pub fn list(&self) -> Result<Vec<TranslationRecord>> {
        Ok(self.load()?.or_empty())
    }

    /// Translations whose word or translation contains `query`, ignoring case.
    /// An empty query matches everything.
    pub fn search(&self, query: &str) -> Result<Vec<TranslationRecord>> {
        let history = self.list()?;
        if query.is_empty() {
            return Ok(history);
        }

        let query = query.to_lowercase();
        Ok(history
            .into_iter()
            .filter(|t| {
                t.word.to_lowercase().contains(&query)
                    || t.translation.to_lowercase().contains(&query)
            })
            .collect())
    }

    /// The first `limit` translations
    pub fn recent(&self, limit: usize) -> Result<Vec<TranslationRecord>> {
        let mut history = self.list()?;
        history.truncate(limit);
        Ok(history)
    }

    pub fn find_by_word(&self, word: &str) -> Result<Option<TranslationRecord>> {
        Ok(self.list()?.into_iter().find(|t| t.word == word))
    }

    /// Save a translation at the front of the history, replacing any older
    /// translation of the same word.
    ///
    /// Returns `false` without writing when the stored history is corrupted.
    pub fn save(&self, record: &TranslationRecord) -> Result<bool> {
        let Some(history) = self.load()?.into_readable() else {
            log::warn!(
                "Not saving translation of \"{}\": history is unreadable",
                record.word
            );
            return Ok(false);
        };

        let mut updated = Vec::with_capacity(history.len() + 1);
        updated.push(record.clone());
        updated.extend(history.into_iter().filter(|t| t.word != record.word));

        self.store.write_collection(HISTORY_KEY, &updated)?;
        Ok(true)
    }

    /// Delete a translation by id.
    ///
    /// Returns `false` without writing when the stored history is corrupted.
    pub fn delete_by_id(&self, id: &str) -> Result<bool> {
        let Some(mut history) = self.load()?.into_readable() else {
            log::warn!("Not deleting translation {}: history is unreadable", id);
            return Ok(false);
        };

        history.retain(|t| t.id != id);

        self.store.write_collection(HISTORY_KEY, &history)?;
        Ok(true)
    }

    /// Remove the whole history
    pub fn clear(&self) -> Result<()> {
        self.store.remove_key(HISTORY_KEY)?;
        log::info!("Cleared translation history");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::{FileStore, KeyValueStore, MemoryStore};

    fn create_test_storage() -> (HistoryStorage, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let storage = HistoryStorage::new(DurableStore::new(backend.clone()));
        (storage, backend)
    }

    fn record(id: &str, word: &str, translation: &str) -> TranslationRecord {
        TranslationRecord {
            id: id.to_string(),
            word: word.to_string(),
            translation: translation.to_string(),
            part_of_speech: "noun".to_string(),
            example: String::new(),
            example_translation: String::new(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_save_and_list() {
        let (storage, _backend) = create_test_storage();
        let cat = record("1", "cat", "кіт");

        assert!(storage.save(&cat).unwrap());

        let history = storage.list().unwrap();
        assert_eq!(history, vec![cat]);
    }

    #[test]
    fn test_save_prepends_newest() {
        let (storage, _backend) = create_test_storage();
        storage.save(&record("1", "cat", "кіт")).unwrap();
        storage.save(&record("2", "dog", "пес")).unwrap();

        let words: Vec<_> = storage.list().unwrap().into_iter().map(|t| t.word).collect();
        assert_eq!(words, vec!["dog", "cat"]);
    }

    #[test]
    fn test_save_replaces_same_word() {
        let (storage, _backend) = create_test_storage();
        storage.save(&record("1", "cat", "кіт")).unwrap();
        storage.save(&record("2", "dog", "пес")).unwrap();
        let newer = record("3", "cat", "кішка");
        storage.save(&newer).unwrap();

        let history = storage.list().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0], newer);
        assert_eq!(history.iter().filter(|t| t.word == "cat").count(), 1);
    }

    #[test]
    fn test_list_is_idempotent() {
        let (storage, _backend) = create_test_storage();
        storage.save(&record("1", "cat", "кіт")).unwrap();
        storage.save(&record("2", "dog", "пес")).unwrap();

        assert_eq!(storage.list().unwrap(), storage.list().unwrap());
    }

    #[test]
    fn test_recent_and_find() {
        let (storage, _backend) = create_test_storage();
        for (i, word) in ["a", "b", "c"].iter().enumerate() {
            storage.save(&record(&i.to_string(), word, "x")).unwrap();
        }

        let recent: Vec<_> = storage.recent(2).unwrap().into_iter().map(|t| t.word).collect();
        assert_eq!(recent, vec!["c", "b"]);
        assert_eq!(storage.find_by_word("a").unwrap().map(|t| t.id), Some("0".to_string()));
        assert!(storage.find_by_word("z").unwrap().is_none());
    }

    #[test]
    fn test_search() {
        let (storage, _backend) = create_test_storage();
        storage.save(&record("1", "Cat", "кіт")).unwrap();
        storage.save(&record("2", "dog", "Пес")).unwrap();
        storage.save(&record("3", "catalog", "каталог")).unwrap();

        let words = |query: &str| -> Vec<String> {
            storage.search(query).unwrap().into_iter().map(|t| t.word).collect()
        };

        assert_eq!(words("CAT"), vec!["catalog", "Cat"]);
        assert_eq!(words("пес"), vec!["dog"]);
        assert_eq!(words("кат"), vec!["catalog"]);
        assert_eq!(words(""), vec!["catalog", "dog", "Cat"]);
        assert!(words("zebra").is_empty());
    }

    #[test]
    fn test_load_reports_corruption() {
        let (storage, backend) = create_test_storage();
        assert!(storage.load().unwrap().is_readable());

        backend.set(HISTORY_KEY, "not json").unwrap();
        assert!(!storage.load().unwrap().is_readable());
        assert!(storage.list().unwrap().is_empty());
    }

    #[test]
    fn test_file_backed_history_survives_interrupted_write() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let backend = Arc::new(FileStore::new(temp_dir.path().to_path_buf()));
        let storage = HistoryStorage::new(DurableStore::new(backend.clone()));
        for (i, word) in ["a", "b", "c", "d", "e"].iter().enumerate() {
            storage.save(&record(&i.to_string(), word, "x")).unwrap();
        }

        // Leftover of a write that never reached the rename
        std::fs::write(temp_dir.path().join("vocabuilder-history.json.tmp"), "").unwrap();

        assert!(storage.save(&record("5", "f", "x")).unwrap());
        assert_eq!(storage.list().unwrap().len(), 6);
        assert_eq!(backend.get("vocabuilder-history-corrupt-backup").unwrap(), None);
    }

    #[test]
    fn test_delete_by_id() {
        let (storage, _backend) = create_test_storage();
        storage.save(&record("1", "cat", "кіт")).unwrap();
        storage.save(&record("2", "dog", "пес")).unwrap();

        assert!(storage.delete_by_id("1").unwrap());
        let history = storage.list().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, "2");

        // Unknown id still succeeds
        assert!(storage.delete_by_id("missing").unwrap());
    }

    #[test]
    fn test_clear() {
        let (storage, backend) = create_test_storage();
        storage.save(&record("1", "cat", "кіт")).unwrap();

        storage.clear().unwrap();
        assert!(storage.list().unwrap().is_empty());
        assert_eq!(backend.get(HISTORY_KEY).unwrap(), None);

        storage.clear().unwrap();
    }

    #[test]
    fn test_corrupted_history_refuses_writes() {
        let (storage, backend) = create_test_storage();
        let corrupted = r#"[{"id":"1","word":"cat""#;
        backend.set(HISTORY_KEY, corrupted).unwrap();

        assert!(storage.list().unwrap().is_empty());
        assert!(!storage.save(&record("2", "dog", "пес")).unwrap());
        assert!(!storage.delete_by_id("1").unwrap());

        assert_eq!(backend.get(HISTORY_KEY).unwrap().as_deref(), Some(corrupted));
        assert_eq!(
            backend.get("vocabuilder-history-corrupt-backup").unwrap().as_deref(),
            Some(corrupted)
        );
    }

    #[test]
    fn test_wrong_shape_is_corruption() {
        let (storage, backend) = create_test_storage();
        backend.set(HISTORY_KEY, r#"{"not":"an array"}"#).unwrap();

        assert!(!storage.save(&record("1", "cat", "кіт")).unwrap());
        assert_eq!(
            backend.get(HISTORY_KEY).unwrap().as_deref(),
            Some(r#"{"not":"an array"}"#)
        );
    }
}

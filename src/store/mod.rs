//! In-memory folder collection
//!
//! The store applies folder and card mutations and persists each one before
//! reporting success. When the save fails the mutation is undone, so memory
//! is never ahead of disk. Mode checks live in the navigator; the mutating
//! methods here are crate-private so nothing can bypass them.

use tracing::{error, info};

use crate::error::{IndexKind, Result, StudyError};
use crate::model::{Card, CardFilter, Folder};
use crate::session::ScoreEntry;
use crate::storage::{SkippedFolder, StorageManager};

/// Folder collection plus the active card filter
#[derive(Debug)]
pub struct FolderStore {
    folders: Vec<Folder>,
    filter: CardFilter,
    storage: StorageManager,
}

impl FolderStore {
    /// Wrap an already loaded collection
    pub fn new(folders: Vec<Folder>, storage: StorageManager) -> Self {
        Self { folders, filter: CardFilter::All, storage }
    }

    /// Load the collection from storage, returning the units that were dropped
    pub fn load(storage: StorageManager) -> Result<(Self, Vec<SkippedFolder>)> {
        let loaded = storage.read_folders()?;
        for skipped in &loaded.skipped {
            info!("Folder '{}' was not loaded: {}", skipped.name, skipped.reason);
        }
        Ok((Self::new(loaded.folders, storage), loaded.skipped))
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn storage(&self) -> &StorageManager {
        &self.storage
    }

    /// Folder at an index, or an index error
    pub fn folder(&self, index: usize) -> Result<&Folder> {
        self.folders.get(index).ok_or(StudyError::IndexOutOfRange {
            kind: IndexKind::Folder,
            index,
            len: self.folders.len(),
        })
    }

    pub fn filter(&self) -> &CardFilter {
        &self.filter
    }

    pub(crate) fn set_filter(&mut self, filter: CardFilter) {
        self.filter = filter;
    }

    /// The displayed card list of a folder
    pub fn filtered_cards(&self, folder: usize) -> Result<Vec<&Card>> {
        Ok(self.filter.apply(self.folder(folder)?.cards()))
    }

    /// Resolve an index into the displayed card list
    pub fn filtered_card(&self, folder: usize, index: usize) -> Result<Card> {
        let view = self.filtered_cards(folder)?;
        view.get(index).map(|card| (*card).clone()).ok_or(StudyError::IndexOutOfRange {
            kind: IndexKind::Card,
            index,
            len: view.len(),
        })
    }

    pub(crate) fn add_folder(&mut self, folder: Folder) -> Result<usize> {
        if self.folders.iter().any(|f| f.name() == folder.name()) {
            return Err(StudyError::DuplicateFolder(folder.name().to_string()));
        }
        self.mutate_collection(|folders| {
            folders.push(folder);
            Ok(folders.len() - 1)
        })
    }

    pub(crate) fn delete_folder(&mut self, index: usize) -> Result<Folder> {
        self.folder(index)?;
        self.mutate_collection(|folders| Ok(folders.remove(index)))
    }

    pub(crate) fn rename_folder(&mut self, index: usize, name: &str) -> Result<()> {
        self.folder(index)?;
        let mut renamed = self.folders[index].clone();
        renamed.rename(name)?;

        let taken = self
            .folders
            .iter()
            .enumerate()
            .any(|(i, f)| i != index && f.name() == renamed.name());
        if taken {
            return Err(StudyError::DuplicateFolder(renamed.name().to_string()));
        }

        self.mutate_collection(|folders| {
            folders[index] = renamed;
            Ok(())
        })
    }

    pub(crate) fn add_card(&mut self, folder: usize, card: Card) -> Result<()> {
        self.mutate_folder(folder, |f| f.add_card(card))
    }

    pub(crate) fn delete_card(&mut self, folder: usize, card: &Card) -> Result<()> {
        self.mutate_folder(folder, |f| f.remove_card(card).map(|_| ()))
    }

    pub(crate) fn set_card(&mut self, folder: usize, old: &Card, new: Card) -> Result<()> {
        self.mutate_folder(folder, |f| f.replace_card(old, new))
    }

    /// Store each attempted card's result as its last score
    pub(crate) fn record_scores(&mut self, folder: usize, entries: &[ScoreEntry]) -> Result<()> {
        self.mutate_folder(folder, |f| {
            for entry in entries {
                let Some(current) =
                    f.cards().iter().find(|c| c.same_content(&entry.card)).cloned()
                else {
                    continue;
                };
                let score = if entry.correct { 1.0 } else { 0.0 };
                f.replace_card(&current, current.with_last_score(score))?;
            }
            Ok(())
        })
    }

    /// Persist a folder's current contents
    pub fn commit_folder(&self, folder: usize) -> Result<()> {
        let target = self.folder(folder)?;
        self.storage.save_folder(target, folder)
    }

    fn mutate_folder<T>(
        &mut self,
        index: usize,
        apply: impl FnOnce(&mut Folder) -> Result<T>,
    ) -> Result<T> {
        self.folder(index)?;
        let before = self.folders[index].clone();

        let result = apply(&mut self.folders[index])
            .and_then(|value| self.storage.save_folder(&self.folders[index], index).map(|_| value));
        if let Err(e) = &result {
            if e.is_storage_failure() {
                error!("Failed to save folder '{}', reverting: {}", before.name(), e);
            }
            self.folders[index] = before;
        }
        result
    }

    fn mutate_collection<T>(
        &mut self,
        apply: impl FnOnce(&mut Vec<Folder>) -> Result<T>,
    ) -> Result<T> {
        let before = self.folders.clone();

        let result = apply(&mut self.folders)
            .and_then(|value| self.storage.save_folders(&self.folders).map(|_| value));
        if let Err(e) = &result {
            if e.is_storage_failure() {
                error!("Failed to save folder collection, reverting: {}", e);
            }
            self.folders = before;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn card(q: &str, a: &str) -> Card {
        Card::new(q, a).unwrap()
    }

    fn store_in(dir: &TempDir) -> FolderStore {
        let folders = vec![
            Folder::with_cards("Capitals", vec![card("France?", "Paris"), card("Japan?", "Tokyo")])
                .unwrap(),
            Folder::new("Empty").unwrap(),
        ];
        FolderStore::new(folders, StorageManager::new(dir.path()))
    }

    /// Store whose storage directory is a regular file, so every save fails
    fn broken_store(dir: &TempDir) -> FolderStore {
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let folders = vec![Folder::with_cards("Capitals", vec![card("France?", "Paris")]).unwrap()];
        FolderStore::new(folders, StorageManager::new(blocker))
    }

    #[test]
    fn add_card_persists_folder() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.add_card(1, card("q", "a")).unwrap();

        let loaded = store.storage().read_folders().unwrap();
        let empty = loaded.folders.iter().find(|f| f.name() == "Empty").unwrap();
        assert_eq!(empty.len(), 1);
    }

    #[test]
    fn failed_save_rolls_back_card_mutation() {
        let dir = TempDir::new().unwrap();
        let mut store = broken_store(&dir);

        let err = store.add_card(0, card("q", "a")).unwrap_err();
        assert!(err.is_storage_failure());
        assert_eq!(store.folders()[0].len(), 1);

        assert!(store.delete_card(0, &card("France?", "Paris")).is_err());
        assert_eq!(store.folders()[0].len(), 1);
    }

    #[test]
    fn failed_save_rolls_back_collection_mutation() {
        let dir = TempDir::new().unwrap();
        let mut store = broken_store(&dir);

        assert!(store.add_folder(Folder::new("New").unwrap()).is_err());
        assert!(store.delete_folder(0).is_err());
        assert!(store.rename_folder(0, "Renamed").is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(store.folders()[0].name(), "Capitals");
    }

    #[test]
    fn re_adding_a_scored_card_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let entries = [ScoreEntry { card: card("France?", "Paris"), correct: true }];
        store.record_scores(0, &entries).unwrap();

        let err = store.add_card(0, card("France?", "Paris")).unwrap_err();
        assert!(matches!(err, StudyError::InvalidCard(_)));
        assert_eq!(store.folders()[0].len(), 2);
    }

    #[test]
    fn failed_collection_save_keeps_every_saved_folder_on_disk() {
        let dir = TempDir::new().unwrap();
        let storage = StorageManager::new(dir.path());
        let folders: Vec<Folder> = ["A", "B", "C"]
            .iter()
            .map(|name| Folder::with_cards(*name, vec![card("q", name)]).unwrap())
            .collect();
        storage.save_folders(&folders).unwrap();
        fs::remove_file(storage.folder_path("B")).unwrap();
        fs::create_dir(storage.folder_path("B")).unwrap();

        let mut store = FolderStore::new(folders, storage);
        let err = store.add_folder(Folder::new("D").unwrap()).unwrap_err();
        assert!(err.is_storage_failure());
        assert_eq!(store.len(), 3);

        let names: Vec<String> = store
            .storage()
            .read_folders()
            .unwrap()
            .folders
            .iter()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn duplicate_folder_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let err = store.add_folder(Folder::new("Capitals").unwrap()).unwrap_err();
        assert!(matches!(err, StudyError::DuplicateFolder(_)));

        let err = store.rename_folder(1, "Capitals").unwrap_err();
        assert!(matches!(err, StudyError::DuplicateFolder(_)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn rename_to_same_name_is_allowed() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.rename_folder(0, "Capitals").unwrap();
        assert_eq!(store.folders()[0].name(), "Capitals");
    }

    #[test]
    fn filtered_card_resolves_against_view() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.set_filter(CardFilter::keywords(["japan"]));

        assert_eq!(store.filtered_card(0, 0).unwrap().answer(), "Tokyo");
        let err = store.filtered_card(0, 1).unwrap_err();
        assert!(matches!(err, StudyError::IndexOutOfRange { kind: IndexKind::Card, len: 1, .. }));
    }

    #[test]
    fn record_scores_updates_last_score() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        let entries = vec![
            ScoreEntry { card: card("France?", "Paris"), correct: true },
            ScoreEntry { card: card("Japan?", "Tokyo"), correct: false },
        ];
        store.record_scores(0, &entries).unwrap();

        let cards = store.folders()[0].cards();
        assert_eq!(cards[0].last_score(), Some(1.0));
        assert_eq!(cards[1].last_score(), Some(0.0));
    }
}

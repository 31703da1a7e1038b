//! Folder persistence
//!
//! Every folder is stored as its own JSON file under one directory. Loading
//! tolerates broken files: each unreadable unit is skipped and reported while
//! the rest of the collection loads normally.

pub mod json_folder;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

pub use json_folder::is_folder_storage_file;
use json_folder::{
    FILE_EXTENSION, StagedFile, read_folder_file, stage_folder_file, write_folder_file,
};

use crate::error::{Result, StudyError};
use crate::model::Folder;

/// A folder file that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFolder {
    /// Folder name as far as it can be told (the file stem)
    pub name: String,
    /// File that failed
    pub path: PathBuf,
    /// Human readable cause
    pub reason: String,
}

/// Result of reading the whole collection
#[derive(Debug, Default)]
pub struct LoadedFolders {
    /// Folders that loaded, in collection order
    pub folders: Vec<Folder>,
    /// Units that were dropped
    pub skipped: Vec<SkippedFolder>,
}

impl LoadedFolders {
    /// Names of the dropped folders, for reporting upward
    pub fn skipped_names(&self) -> Vec<&str> {
        self.skipped.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Reads and writes folder files in one directory
#[derive(Debug, Clone)]
pub struct StorageManager {
    folders_dir: PathBuf,
}

impl StorageManager {
    pub fn new(folders_dir: impl Into<PathBuf>) -> Self {
        Self { folders_dir: folders_dir.into() }
    }

    pub fn folders_dir(&self) -> &Path {
        &self.folders_dir
    }

    /// Path of the file holding the named folder
    pub fn folder_path(&self, name: &str) -> PathBuf {
        self.folders_dir.join(format!("{}.{}", name, FILE_EXTENSION))
    }

    /// Load every folder file
    ///
    /// Only a directory that exists but cannot be listed is an error. A
    /// missing directory is an empty collection.
    pub fn read_folders(&self) -> Result<LoadedFolders> {
        let mut loaded = LoadedFolders::default();

        if !self.folders_dir.exists() {
            debug!("Folders directory {:?} does not exist yet", self.folders_dir);
            return Ok(loaded);
        }

        let mut paths: Vec<PathBuf> = self
            .entries()?
            .into_iter()
            .filter(|path| path.is_file() && path.extension().is_some_and(|e| e == FILE_EXTENSION))
            .collect();
        paths.sort();

        let mut positioned = Vec::new();
        let mut seen = HashSet::new();

        for path in paths {
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();

            debug!("Attempting to read data from file: {:?}", path);
            let result = read_folder_file(&path)
                .and_then(|file| Ok((file.position, file.into_folder()?)));

            match result {
                Ok((_, folder)) if seen.contains(folder.name()) => {
                    warn!("Skipping {:?}: folder '{}' is already loaded", path, folder.name());
                    loaded.skipped.push(SkippedFolder {
                        name: stem,
                        reason: format!("duplicate folder name '{}'", folder.name()),
                        path,
                    });
                }
                Ok((position, folder)) => {
                    seen.insert(folder.name().to_string());
                    positioned.push((position, folder));
                }
                Err(e) => {
                    warn!("Skipping unreadable folder file {:?}: {}", path, e);
                    loaded.skipped.push(SkippedFolder { name: stem, reason: e.to_string(), path });
                }
            }
        }

        positioned.sort_by(|(a_pos, a), (b_pos, b)| a_pos.cmp(b_pos).then(a.name().cmp(b.name())));
        loaded.folders = positioned.into_iter().map(|(_, folder)| folder).collect();

        info!(
            "Loaded {} folders from {:?} ({} skipped)",
            loaded.folders.len(),
            self.folders_dir,
            loaded.skipped.len()
        );
        Ok(loaded)
    }

    /// Write one folder to its file
    pub fn save_folder(&self, folder: &Folder, position: usize) -> Result<()> {
        self.ensure_dir()?;
        let path = self.folder_path(folder.name());
        debug!("Attempting to write to data file: {:?}", path);
        write_folder_file(&path, folder, position)
    }

    /// Rewrite the whole collection
    ///
    /// Every folder is staged next to its file before anything on disk
    /// changes. Only when all of them are written are stale folder files
    /// (renamed or deleted folders) removed and the staged files moved into
    /// place. A failure while staging leaves the previous files as they were.
    /// Files that fail [`is_folder_storage_file`] are never touched.
    pub fn save_folders(&self, folders: &[Folder]) -> Result<()> {
        self.ensure_dir()?;

        let mut staged: Vec<StagedFile> = Vec::with_capacity(folders.len());
        for (position, folder) in folders.iter().enumerate() {
            match stage_folder_file(&self.folder_path(folder.name()), folder, position) {
                Ok(file) => staged.push(file),
                Err(e) => {
                    discard_all(staged);
                    return Err(e);
                }
            }
        }

        if let Err(e) = self.remove_stale_files(&staged) {
            discard_all(staged);
            return Err(e);
        }

        let mut pending = staged.into_iter();
        while let Some(file) = pending.next() {
            if let Err(e) = file.commit() {
                discard_all(pending.collect());
                return Err(e);
            }
        }

        info!("Saved {} folders to {:?}", folders.len(), self.folders_dir);
        Ok(())
    }

    /// Delete folder files that are not part of the collection being saved
    fn remove_stale_files(&self, keep: &[StagedFile]) -> Result<()> {
        for path in self.entries()? {
            let kept = keep.iter().any(|file| file.target() == path.as_path());
            if kept || !is_folder_storage_file(&path) {
                continue;
            }
            debug!("Removing stale folder file {:?}", path);
            fs::remove_file(&path).map_err(|e| StudyError::io(&path, e))?;
        }
        Ok(())
    }

    /// Paths of the top-level entries of the folders directory
    fn entries(&self) -> Result<Vec<PathBuf>> {
        let entries =
            fs::read_dir(&self.folders_dir).map_err(|e| StudyError::io(&self.folders_dir, e))?;

        Ok(entries
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry.path()),
                Err(e) => {
                    warn!("Skipping unreadable entry in {:?}: {}", self.folders_dir, e);
                    None
                }
            })
            .collect())
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.folders_dir).map_err(|e| StudyError::io(&self.folders_dir, e))
    }
}

fn discard_all(staged: Vec<StagedFile>) {
    for file in staged {
        file.discard();
    }
}

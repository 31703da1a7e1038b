//! On-disk JSON format for a single folder

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, StudyError};
use crate::model::{Card, Folder};

/// Extension of folder storage files
pub const FILE_EXTENSION: &str = "json";

/// Folder file as written
#[derive(Serialize)]
struct FolderFileRef<'a> {
    folder_name: &'a str,
    position: usize,
    cards: &'a [Card],
}

/// Folder file as read back
#[derive(Debug, Deserialize)]
pub struct FolderFile {
    pub folder_name: String,
    #[serde(default)]
    pub position: usize,
    pub cards: Vec<Card>,
}

impl FolderFile {
    /// Turn the raw file into a validated folder
    pub fn into_folder(self) -> Result<Folder> {
        Folder::with_cards(self.folder_name, self.cards)
    }
}

/// Read and parse a folder file
pub fn read_folder_file(path: &Path) -> Result<FolderFile> {
    let contents = fs::read_to_string(path).map_err(|e| StudyError::io(path, e))?;
    serde_json::from_str(&contents)
        .map_err(|source| StudyError::DataConversion { path: path.to_path_buf(), source })
}

/// Write a folder file, replacing any previous version in one step
///
/// The content goes to a hidden sibling first and is renamed over the target,
/// so an interrupted write leaves the old file intact.
pub fn write_folder_file(path: &Path, folder: &Folder, position: usize) -> Result<()> {
    let staged = stage_folder_file(path, folder, position)?;
    staged.commit()
}

/// Folder content written next to its target but not yet in place
#[derive(Debug)]
pub struct StagedFile {
    tmp: PathBuf,
    target: PathBuf,
}

impl StagedFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Rename the staged content over the target
    pub fn commit(self) -> Result<()> {
        fs::rename(&self.tmp, &self.target).map_err(|e| {
            let _ = fs::remove_file(&self.tmp);
            StudyError::io(&self.target, e)
        })
    }

    /// Drop the staged content, leaving the target untouched
    pub fn discard(self) {
        if let Err(e) = fs::remove_file(&self.tmp) {
            debug!("Could not remove staged file {:?}: {}", self.tmp, e);
        }
    }
}

/// Write a folder's content to a hidden sibling of `path`
///
/// Fails with [`StudyError::ForeignFile`] when `path` already holds something
/// that is not a folder file.
pub fn stage_folder_file(path: &Path, folder: &Folder, position: usize) -> Result<StagedFile> {
    ensure_replaceable(path)?;

    let file = FolderFileRef { folder_name: folder.name(), position, cards: folder.cards() };
    let contents = serde_json::to_string_pretty(&file)
        .map_err(|source| StudyError::DataConversion { path: path.to_path_buf(), source })?;

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(StudyError::io(&tmp, e));
    }
    Ok(StagedFile { tmp, target: path.to_path_buf() })
}

/// A save target must be absent or one of our own files
fn ensure_replaceable(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(StudyError::io(path, e)),
        Ok(_) if is_folder_storage_file(path) => Ok(()),
        Ok(_) => Err(StudyError::ForeignFile(path.to_path_buf())),
    }
}

/// Whether a file is one of ours and may be deleted when the collection is rewritten
///
/// Requires the `.json` extension and a JSON object carrying a string
/// `folder_name` and an array `cards`. Anything else, including malformed
/// JSON, is treated as a user file and left alone.
pub fn is_folder_storage_file(path: &Path) -> bool {
    if !path.is_file() || path.extension().is_none_or(|ext| ext != FILE_EXTENSION) {
        return false;
    }

    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(&contents) else {
        return false;
    };

    value.get("folder_name").is_some_and(serde_json::Value::is_string)
        && value.get("cards").is_some_and(serde_json::Value::is_array)
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

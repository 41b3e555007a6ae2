use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    DocumentBookmark, DocumentBookmarkManager, DocumentId, DocumentNote, DocumentNoteManager,
    ReadingPositions,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingPosition {
    pub page: u32,
    pub page_count: u32,
    pub last_read: DateTime<Utc>,
}

/// Notes, bookmarks and reading positions in one JSON file.
///
/// Every save rewrites the file. An ephemeral library never touches disk.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct JsonLibrary {
    #[serde(default)]
    notes: HashMap<DocumentId, DocumentNote>,
    #[serde(default)]
    bookmarks: Vec<DocumentBookmark>,
    #[serde(default)]
    positions: HashMap<DocumentId, ReadingPosition>,
    #[serde(default)]
    next_bookmark_id: u64,
    #[serde(skip)]
    file_path: Option<PathBuf>,
}

impl JsonLibrary {
    pub fn ephemeral() -> Self {
        Self::default()
    }

    pub fn with_file(file_path: &Path) -> Self {
        Self {
            file_path: Some(file_path.to_path_buf()),
            ..Self::default()
        }
    }

    pub fn load_or_ephemeral(file_path: Option<&Path>) -> Self {
        match file_path {
            Some(path) => Self::load_from_file(path).unwrap_or_else(|e| {
                log::error!("Failed to load library from {}: {e:#}", path.display());
                Self::with_file(path)
            }),
            None => Self::ephemeral(),
        }
    }

    pub fn load_from_file(file_path: &Path) -> anyhow::Result<Self> {
        if !file_path.exists() {
            return Ok(Self::with_file(file_path));
        }
        let content = fs::read_to_string(file_path)
            .with_context(|| format!("reading {}", file_path.display()))?;
        let mut library: Self = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", file_path.display()))?;
        library.file_path = Some(file_path.to_path_buf());
        Ok(library)
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    fn persist(&self) -> anyhow::Result<()> {
        let Some(path) = &self.file_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

impl DocumentNoteManager for JsonLibrary {
    fn get_new(&self, doc_id: &DocumentId, text: &str) -> DocumentNote {
        DocumentNote {
            doc_id: doc_id.clone(),
            text: text.to_string(),
            updated_at: Utc::now(),
        }
    }

    fn load(&self, doc_id: &DocumentId) -> DocumentNote {
        self.notes
            .get(doc_id)
            .cloned()
            .unwrap_or_else(|| DocumentNoteManager::get_new(self, doc_id, ""))
    }

    fn save(&mut self, note: &DocumentNote) -> anyhow::Result<()> {
        let mut note = note.clone();
        note.updated_at = Utc::now();
        self.notes.insert(note.doc_id.clone(), note);
        self.persist()
    }
}

impl DocumentBookmarkManager for JsonLibrary {
    fn get_new(&self, doc_id: &DocumentId, name: &str, page: u32) -> DocumentBookmark {
        let max_stored = self.bookmarks.iter().map(|b| b.id).max().unwrap_or(0);
        DocumentBookmark {
            id: self.next_bookmark_id.max(max_stored) + 1,
            doc_id: doc_id.clone(),
            name: name.to_string(),
            page,
            created_at: Utc::now(),
        }
    }

    fn load_list(&self, doc_id: &DocumentId) -> Vec<DocumentBookmark> {
        let mut list: Vec<DocumentBookmark> = self
            .bookmarks
            .iter()
            .filter(|b| &b.doc_id == doc_id)
            .cloned()
            .collect();
        list.sort_by_key(|b| (b.page, b.id));
        list
    }

    fn save(&mut self, bookmark: &DocumentBookmark) -> anyhow::Result<()> {
        match self.bookmarks.iter_mut().find(|b| b.id == bookmark.id) {
            Some(existing) => *existing = bookmark.clone(),
            None => self.bookmarks.push(bookmark.clone()),
        }
        self.next_bookmark_id = self.next_bookmark_id.max(bookmark.id);
        self.persist()
    }

    fn delete(&mut self, id: u64) -> anyhow::Result<()> {
        let before = self.bookmarks.len();
        self.bookmarks.retain(|b| b.id != id);
        if self.bookmarks.len() == before {
            log::debug!("No bookmark with id {id} to delete");
            return Ok(());
        }
        self.persist()
    }
}

impl ReadingPositions for JsonLibrary {
    fn last_page(&self, doc_id: &DocumentId) -> Option<u32> {
        self.positions.get(doc_id).map(|p| p.page)
    }

    fn remember(&mut self, doc_id: &DocumentId, page: u32, page_count: u32) -> anyhow::Result<()> {
        if self.positions.get(doc_id).is_some_and(|p| p.page == page) {
            return Ok(());
        }
        self.positions.insert(
            doc_id.clone(),
            ReadingPosition {
                page,
                page_count,
                last_read: Utc::now(),
            },
        );
        self.persist()
    }
}

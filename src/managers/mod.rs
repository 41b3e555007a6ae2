//! Persistence of per-document notes, bookmarks and reading positions

mod library;

pub use library::JsonLibrary;

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable key for a document: MD5 of its path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn from_path(path: &Path) -> Self {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let digest = md5::compute(canonical.to_string_lossy().as_bytes());
        Self(format!("{digest:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNote {
    pub doc_id: DocumentId,
    pub text: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentBookmark {
    pub id: u64,
    pub doc_id: DocumentId,
    pub name: String,
    pub page: u32,
    pub created_at: DateTime<Utc>,
}

pub trait DocumentNoteManager {
    /// A new, unsaved note
    fn get_new(&self, doc_id: &DocumentId, text: &str) -> DocumentNote;

    /// The stored note, or a new empty one
    fn load(&self, doc_id: &DocumentId) -> DocumentNote;

    fn save(&mut self, note: &DocumentNote) -> anyhow::Result<()>;
}

pub trait DocumentBookmarkManager {
    /// A new, unsaved bookmark with a fresh id
    fn get_new(&self, doc_id: &DocumentId, name: &str, page: u32) -> DocumentBookmark;

    /// Bookmarks of one document, ordered by page
    fn load_list(&self, doc_id: &DocumentId) -> Vec<DocumentBookmark>;

    /// Insert, or replace the bookmark with the same id
    fn save(&mut self, bookmark: &DocumentBookmark) -> anyhow::Result<()>;

    fn delete(&mut self, id: u64) -> anyhow::Result<()>;
}

pub trait ReadingPositions {
    fn last_page(&self, doc_id: &DocumentId) -> Option<u32>;

    fn remember(&mut self, doc_id: &DocumentId, page: u32, page_count: u32)
    -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_is_stable_per_path() {
        let a = DocumentId::from_path(Path::new("/tmp/does-not-exist/a.pdf"));
        let b = DocumentId::from_path(Path::new("/tmp/does-not-exist/a.pdf"));
        let c = DocumentId::from_path(Path::new("/tmp/does-not-exist/c.pdf"));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), 32);
    }
}

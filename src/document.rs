//! Document session contract
//!
//! A document session owns the decoded document and the authoritative
//! current page. The viewer only reads it and, after a completed page turn,
//! writes the current page back.

use std::fs;
use std::path::Path;

use log::{debug, info};

/// Lines per page when a text file has no form feeds
const TEXT_LINES_PER_PAGE: usize = 60;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("document has no pages")]
    Empty,

    #[error("document is not loaded")]
    NotLoaded,

    #[error("page {page} is out of range 1..={page_count}")]
    PageOutOfRange { page: u32, page_count: u32 },
}

/// What the viewer needs from a loaded document.
///
/// Page numbers are 1-based. `current_page` is 0 until the first page has
/// been shown.
pub trait DocumentSession {
    fn open(&mut self, name: &str, path: &Path) -> Result<(), DocumentError>;

    fn close(&mut self);

    fn is_loaded(&self) -> bool;

    fn name(&self) -> &str;

    fn page_count(&self) -> u32;

    fn current_page(&self) -> u32;

    fn set_current_page(&mut self, page: u32);

    /// Plain text of one page, used as the page's rendering
    fn page_text(&self, page: u32) -> Result<String, DocumentError>;
}

impl<T: DocumentSession + ?Sized> DocumentSession for Box<T> {
    fn open(&mut self, name: &str, path: &Path) -> Result<(), DocumentError> {
        (**self).open(name, path)
    }

    fn close(&mut self) {
        (**self).close();
    }

    fn is_loaded(&self) -> bool {
        (**self).is_loaded()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn page_count(&self) -> u32 {
        (**self).page_count()
    }

    fn current_page(&self) -> u32 {
        (**self).current_page()
    }

    fn set_current_page(&mut self, page: u32) {
        (**self).set_current_page(page);
    }

    fn page_text(&self, page: u32) -> Result<String, DocumentError> {
        (**self).page_text(page)
    }
}

/// Document whose pages are held in memory.
///
/// Used for plain-text files and in tests.
#[derive(Debug, Default)]
pub struct InMemoryDocument {
    name: String,
    pages: Vec<String>,
    current_page: u32,
    loaded: bool,
}

impl InMemoryDocument {
    /// A loaded document with the given pages
    pub fn with_pages(name: impl Into<String>, pages: Vec<String>) -> Self {
        let loaded = !pages.is_empty();
        Self {
            name: name.into(),
            pages,
            current_page: 0,
            loaded,
        }
    }

    /// A loaded document of `count` numbered pages
    pub fn numbered(count: u32) -> Self {
        let pages = (1..=count).map(|n| format!("Page {n}")).collect();
        Self::with_pages("numbered", pages)
    }

    /// Split text into pages at form feeds, or every
    /// `TEXT_LINES_PER_PAGE` lines when there are none
    pub fn split_pages(text: &str) -> Vec<String> {
        if text.contains('\x0c') {
            return text
                .split('\x0c')
                .map(|p| p.trim_matches('\n').to_string())
                .filter(|p| !p.trim().is_empty())
                .collect();
        }

        let lines: Vec<&str> = text.lines().collect();
        lines
            .chunks(TEXT_LINES_PER_PAGE)
            .map(|chunk| chunk.join("\n"))
            .collect()
    }
}

impl DocumentSession for InMemoryDocument {
    fn open(&mut self, name: &str, path: &Path) -> Result<(), DocumentError> {
        let text = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let pages = Self::split_pages(&text);
        if pages.is_empty() {
            return Err(DocumentError::Empty);
        }
        info!("Opened text document {name} with {} pages", pages.len());
        self.name = name.to_string();
        self.pages = pages;
        self.current_page = 0;
        self.loaded = true;
        Ok(())
    }

    fn close(&mut self) {
        if self.loaded {
            debug!("Closing document {}", self.name);
        }
        self.loaded = false;
        self.current_page = 0;
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> u32 {
        if self.loaded {
            self.pages.len() as u32
        } else {
            0
        }
    }

    fn current_page(&self) -> u32 {
        self.current_page
    }

    fn set_current_page(&mut self, page: u32) {
        self.current_page = page;
    }

    fn page_text(&self, page: u32) -> Result<String, DocumentError> {
        if !self.loaded {
            return Err(DocumentError::NotLoaded);
        }
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(DocumentError::PageOutOfRange { page, page_count });
        }
        Ok(self.pages[(page - 1) as usize].clone())
    }
}

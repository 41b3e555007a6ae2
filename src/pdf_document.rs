//! MuPDF-backed document session

use std::path::Path;

use log::{debug, info, warn};
use mupdf::Document;

use crate::document::{DocumentError, DocumentSession};

/// A PDF opened through MuPDF
#[derive(Default)]
pub struct PdfDocument {
    name: String,
    doc: Option<Document>,
    page_count: u32,
    current_page: u32,
}

impl PdfDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Title from the document metadata, if it has one
    pub fn title(&self) -> Option<String> {
        self.doc
            .as_ref()?
            .metadata(mupdf::MetadataName::Title)
            .ok()
            .filter(|t| !t.trim().is_empty())
    }
}

impl DocumentSession for PdfDocument {
    fn open(&mut self, name: &str, path: &Path) -> Result<(), DocumentError> {
        let doc = Document::open(path.to_string_lossy().as_ref())?;
        let page_count = doc.page_count()?.max(0) as u32;
        if page_count == 0 {
            return Err(DocumentError::Empty);
        }

        info!("Opened PDF {name} ({page_count} pages)");
        self.name = name.to_string();
        self.doc = Some(doc);
        self.page_count = page_count;
        self.current_page = 0;

        if let Some(title) = self.title() {
            debug!("PDF title: {title}");
        }
        Ok(())
    }

    fn close(&mut self) {
        if self.doc.take().is_some() {
            debug!("Closed PDF {}", self.name);
        }
        self.page_count = 0;
        self.current_page = 0;
    }

    fn is_loaded(&self) -> bool {
        self.doc.is_some()
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn current_page(&self) -> u32 {
        self.current_page
    }

    fn set_current_page(&mut self, page: u32) {
        self.current_page = page;
    }

    fn page_text(&self, page: u32) -> Result<String, DocumentError> {
        let doc = self.doc.as_ref().ok_or(DocumentError::NotLoaded)?;
        if page == 0 || page > self.page_count {
            return Err(DocumentError::PageOutOfRange {
                page,
                page_count: self.page_count,
            });
        }
        let text = doc
            .load_page((page - 1) as i32)?
            .to_text_page(mupdf::TextPageFlags::empty())?
            .to_text()?;
        if text.trim().is_empty() {
            warn!("Page {page} of {} has no extractable text", self.name);
        }
        Ok(text)
    }
}

// Export modules for use in tests
pub mod app;
pub mod chrome;
pub mod coordinator;
pub mod document;
pub mod event_source;
pub mod flipper;
pub mod inputs;
pub mod managers;
pub mod page_view;
pub mod panic_handler;
#[cfg(feature = "pdf")]
pub mod pdf_document;
pub mod settings;
pub mod theme;
pub mod viewer;
pub mod widget;
pub mod zoom;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use app::{App, AppAction, run_app_with_event_source};
pub use document::{DocumentError, DocumentSession, InMemoryDocument};
pub use viewer::DocumentViewer;

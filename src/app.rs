//! Application shell: routes keys and mouse events to the viewer and the
//! popups, and runs the event loop.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::KeyEventKind;
use log::{debug, error, info};
use ratatui::{Frame, Terminal, layout::Rect};

use crate::chrome::ToolbarAction;
use crate::document::{DocumentError, DocumentSession};
use crate::event_source::{
    Event, EventSource, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crate::flipper::{NavigationDirection, NavigationOrientation};
use crate::inputs::KeySeq;
use crate::managers::{
    DocumentBookmarkManager, DocumentId, DocumentNoteManager, JsonLibrary, ReadingPositions,
};
use crate::settings::Settings;
use crate::viewer::DocumentViewer;
use crate::widget::{
    BookmarksAction, BookmarksPopup, GoToPageAction, GoToPagePopup, HelpPopup, HelpPopupAction,
    HudMessage, NoteAction, NotePopup, ThumbsAction, ThumbsPopup,
};
use crate::zoom::ScrollDirection;

/// Input poll timeout while a page turn is animating
const ANIMATION_TICK: Duration = Duration::from_millis(16);
/// Input poll timeout otherwise
const IDLE_TICK: Duration = Duration::from_millis(50);
/// Events handled before the next frame is drawn
const MAX_EVENTS_PER_FRAME: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    Quit,
}

pub enum Popup {
    GoToPage(GoToPagePopup),
    Bookmarks(BookmarksPopup),
    Note(NotePopup),
    Thumbs(ThumbsPopup),
    Help(HelpPopup),
}

pub struct App {
    viewer: DocumentViewer<Box<dyn DocumentSession>>,
    library: JsonLibrary,
    doc_id: DocumentId,
    settings: Settings,
    popup: Option<Popup>,
    hud: Option<HudMessage>,
    key_seq: KeySeq,
    remembered_page: u32,
}

impl App {
    /// Open `path` with `document` and show the remembered page
    pub fn open(
        document: Box<dyn DocumentSession>,
        path: &Path,
        library: JsonLibrary,
        settings: Settings,
    ) -> Result<Self, DocumentError> {
        let mut viewer = DocumentViewer::new(document, &settings);
        viewer.load(path)?;
        Self::start(viewer, DocumentId::from_path(path), library, settings)
    }

    /// Wrap an already loaded document
    pub fn with_document(
        document: Box<dyn DocumentSession>,
        doc_id: DocumentId,
        library: JsonLibrary,
        settings: Settings,
    ) -> Result<Self, DocumentError> {
        let viewer = DocumentViewer::new(document, &settings);
        Self::start(viewer, doc_id, library, settings)
    }

    fn start(
        mut viewer: DocumentViewer<Box<dyn DocumentSession>>,
        doc_id: DocumentId,
        library: JsonLibrary,
        settings: Settings,
    ) -> Result<Self, DocumentError> {
        let resume = library.last_page(&doc_id);
        viewer.show_initial_page(resume)?;
        let remembered_page = viewer.current_page();
        if let Some(page) = resume {
            info!("Resuming {doc_id} at page {page}");
        }
        Ok(Self {
            viewer,
            library,
            doc_id,
            settings,
            popup: None,
            hud: None,
            key_seq: KeySeq::new(),
            remembered_page,
        })
    }

    pub fn viewer(&self) -> &DocumentViewer<Box<dyn DocumentSession>> {
        &self.viewer
    }

    pub fn library(&self) -> &JsonLibrary {
        &self.library
    }

    pub fn doc_id(&self) -> &DocumentId {
        &self.doc_id
    }

    pub fn popup(&self) -> Option<&Popup> {
        self.popup.as_ref()
    }

    pub fn has_active_popup(&self) -> bool {
        self.popup.is_some()
    }

    pub fn hud_message(&self) -> Option<&str> {
        self.hud.as_ref().map(|h| h.message.as_str())
    }

    pub fn is_animating(&self) -> bool {
        self.viewer.is_animating()
    }

    fn show_info(&mut self, message: impl Into<String>) {
        self.hud = Some(HudMessage::info(message));
    }

    fn show_error(&mut self, context: &str, err: &anyhow::Error) {
        error!("{context}: {err:#}");
        self.hud = Some(HudMessage::error(format!("{context}: {err}")));
    }

    pub fn handle_event(&mut self, event: Event) -> Option<AppAction> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Mouse(mouse) => {
                self.handle_mouse_event(mouse);
                None
            }
            Event::Resize(width, height) => {
                self.viewer.resize(Rect::new(0, 0, width, height));
                None
            }
            _ => None,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(AppAction::Quit);
        }
        if self.popup.is_some() {
            self.handle_popup_key(key);
            return None;
        }

        if self.viewer.is_slider_dragging() {
            match key.code {
                KeyCode::Enter => {
                    self.viewer.slider_release();
                    return None;
                }
                KeyCode::Esc => {
                    self.viewer.slider_cancel();
                    return None;
                }
                _ => {}
            }
        }

        let shift = key.modifiers.contains(KeyModifiers::SHIFT);
        match key.code {
            KeyCode::Char('q') => return Some(AppAction::Quit),
            KeyCode::Char('g') => {
                if self.key_seq.handle_key('g') == "gg" {
                    self.key_seq.clear();
                    self.perform(ToolbarAction::FirstPage);
                }
                return None;
            }
            KeyCode::Left if shift => self.viewer.pan(ScrollDirection::Left),
            KeyCode::Right if shift => self.viewer.pan(ScrollDirection::Right),
            KeyCode::Home => self.perform(ToolbarAction::FirstPage),
            KeyCode::Char('G') | KeyCode::End => self.perform(ToolbarAction::LastPage),
            KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
                self.perform(ToolbarAction::PriorPage);
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown | KeyCode::Char(' ') => {
                self.perform(ToolbarAction::NextPage);
            }
            KeyCode::Char('j') | KeyCode::Down => self.viewer.pan(ScrollDirection::Down),
            KeyCode::Char('k') | KeyCode::Up => self.viewer.pan(ScrollDirection::Up),
            KeyCode::Char('+') | KeyCode::Char('=') => self.perform(ToolbarAction::ZoomIn),
            KeyCode::Char('-') => self.perform(ToolbarAction::ZoomOut),
            KeyCode::Char('p') | KeyCode::Char(':') => self.perform(ToolbarAction::GoToPage),
            KeyCode::Char('n') => self.perform(ToolbarAction::Note),
            KeyCode::Char('b') => self.perform(ToolbarAction::Bookmarks),
            KeyCode::Char('t') => self.perform(ToolbarAction::Thumbs),
            KeyCode::Char(',') => self.viewer.slider_nudge(-1),
            KeyCode::Char('.') => self.viewer.slider_nudge(1),
            KeyCode::Char('?') => self.popup = Some(Popup::Help(HelpPopup::new())),
            KeyCode::Esc => {
                if self.viewer.abandon_transition() {
                    debug!("Page turn cancelled");
                }
            }
            _ => {}
        }
        self.key_seq.clear();
        None
    }

    /// Toolbar buttons and their keyboard equivalents
    pub fn perform(&mut self, action: ToolbarAction) {
        if matches!(
            action,
            ToolbarAction::GoToPage
                | ToolbarAction::Note
                | ToolbarAction::Bookmarks
                | ToolbarAction::Thumbs
        ) {
            // Popups work on the page that is on screen
            self.viewer.finish_transition();
        }
        match action {
            ToolbarAction::FirstPage => {
                self.viewer.open_first_page();
            }
            ToolbarAction::PriorPage => {
                self.viewer.open_prior_page();
            }
            ToolbarAction::NextPage => {
                self.viewer.open_next_page();
            }
            ToolbarAction::LastPage => {
                self.viewer.open_last_page();
            }
            ToolbarAction::GoToPage => {
                self.popup = Some(Popup::GoToPage(GoToPagePopup::new(
                    self.viewer.page_count(),
                )));
            }
            ToolbarAction::ZoomIn => {
                self.viewer.zoom_in();
            }
            ToolbarAction::ZoomOut => {
                self.viewer.zoom_out();
            }
            ToolbarAction::Note if self.settings.note_btn_visible => {
                let note = DocumentNoteManager::load(&self.library, &self.doc_id);
                self.popup = Some(Popup::Note(NotePopup::new(&note.text)));
            }
            ToolbarAction::Bookmarks if self.settings.bookmarks_btn_visible => {
                let list = self.library.load_list(&self.doc_id);
                self.popup = Some(Popup::Bookmarks(BookmarksPopup::new(
                    list,
                    self.viewer.current_page(),
                )));
            }
            ToolbarAction::Thumbs if self.settings.thumbs_btn_visible => {
                self.popup = Some(Popup::Thumbs(ThumbsPopup::new(
                    self.viewer.page_count(),
                    self.viewer.current_page(),
                )));
            }
            ToolbarAction::Note | ToolbarAction::Bookmarks | ToolbarAction::Thumbs => {
                debug!("{action:?} is disabled");
            }
        }
    }

    fn handle_popup_key(&mut self, key: KeyEvent) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };
        match popup {
            Popup::GoToPage(goto) => match goto.handle_key(key) {
                Some(GoToPageAction::Open(page)) => {
                    self.popup = None;
                    self.viewer.open_page(page);
                }
                Some(GoToPageAction::Close) => self.popup = None,
                None => {}
            },
            Popup::Bookmarks(bookmarks) => match bookmarks.handle_key(key) {
                Some(BookmarksAction::Open(page)) => {
                    self.popup = None;
                    self.viewer.open_page(page);
                }
                Some(BookmarksAction::Add) => self.add_bookmark(),
                Some(BookmarksAction::Delete(id)) => self.delete_bookmark(id),
                Some(BookmarksAction::Close) => self.popup = None,
                None => {}
            },
            Popup::Note(note) => match note.handle_key(key) {
                Some(NoteAction::Save(text)) => {
                    self.popup = None;
                    self.save_note(text);
                }
                Some(NoteAction::Cancel) => self.popup = None,
                None => {}
            },
            Popup::Thumbs(thumbs) => match thumbs.handle_key(key) {
                Some(ThumbsAction::Open(page)) => {
                    self.popup = None;
                    self.viewer.open_page(page);
                }
                Some(ThumbsAction::Close) => self.popup = None,
                None => {}
            },
            Popup::Help(help) => {
                if let Some(HelpPopupAction::Close) = help.handle_key(key, &mut self.key_seq) {
                    self.popup = None;
                }
            }
        }
    }

    fn add_bookmark(&mut self) {
        let page = self.viewer.current_page();
        let bookmark = DocumentBookmarkManager::get_new(
            &self.library,
            &self.doc_id,
            &format!("Page {page}"),
            page,
        );
        match DocumentBookmarkManager::save(&mut self.library, &bookmark) {
            Ok(()) => self.show_info(format!("Bookmarked page {page}")),
            Err(e) => self.show_error("Failed to save bookmark", &e),
        }
        self.refresh_bookmarks();
    }

    fn delete_bookmark(&mut self, id: u64) {
        if let Err(e) = self.library.delete(id) {
            self.show_error("Failed to delete bookmark", &e);
        }
        self.refresh_bookmarks();
    }

    fn refresh_bookmarks(&mut self) {
        let list = self.library.load_list(&self.doc_id);
        if let Some(Popup::Bookmarks(popup)) = self.popup.as_mut() {
            popup.set_bookmarks(list);
        }
    }

    fn save_note(&mut self, text: String) {
        let mut note = DocumentNoteManager::load(&self.library, &self.doc_id);
        note.text = text;
        match DocumentNoteManager::save(&mut self.library, &note) {
            Ok(()) => self.show_info("Note saved"),
            Err(e) => self.show_error("Failed to save note", &e),
        }
    }

    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);

        if let Some(Popup::Thumbs(thumbs)) = self.popup.as_ref() {
            if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                if let Some(page) = thumbs.page_at(column, row) {
                    self.popup = None;
                    self.viewer.open_page(page);
                }
            }
            return;
        }
        if self.popup.is_some() {
            return;
        }

        match mouse.kind {
            MouseEventKind::ScrollDown => {
                self.viewer.turn(NavigationDirection::Forward);
            }
            MouseEventKind::ScrollUp => {
                self.viewer.turn(NavigationDirection::Reverse);
            }
            MouseEventKind::ScrollRight
                if self.settings.page_navigation_orientation == NavigationOrientation::Horizontal =>
            {
                self.viewer.turn(NavigationDirection::Forward);
            }
            MouseEventKind::ScrollLeft
                if self.settings.page_navigation_orientation == NavigationOrientation::Horizontal =>
            {
                self.viewer.turn(NavigationDirection::Reverse);
            }
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(action) = self.viewer.toolbar_action_at(column, row) {
                    self.perform(action);
                } else if self.viewer.slider_contains(column, row) {
                    self.viewer.slider_drag_to_column(column);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) if self.viewer.is_slider_dragging() => {
                self.viewer.slider_drag_to_column(column);
            }
            MouseEventKind::Up(MouseButton::Left) if self.viewer.is_slider_dragging() => {
                self.viewer.slider_release();
            }
            MouseEventKind::Moved => self.viewer.hover(column, row),
            _ => {}
        }
    }

    /// Advance animations, expire the HUD and remember the reading
    /// position. Returns true when the screen needs redrawing.
    pub fn tick(&mut self) -> bool {
        let mut changed = self.viewer.tick();
        if self.hud.as_ref().is_some_and(HudMessage::is_expired) {
            self.hud = None;
            changed = true;
        }
        self.remember_position();
        changed
    }

    fn remember_position(&mut self) {
        let page = self.viewer.current_page();
        if page == 0 || page == self.remembered_page {
            return;
        }
        self.remembered_page = page;
        let page_count = self.viewer.page_count();
        if let Err(e) = self.library.remember(&self.doc_id, page, page_count) {
            self.show_error("Failed to save reading position", &e);
        }
    }

    /// Finish any running turn so the saved position is the requested one
    pub fn shutdown(&mut self) {
        self.viewer.finish_transition();
        self.remember_position();
        info!(
            "Closing {} at page {}",
            self.viewer.document().name(),
            self.viewer.current_page()
        );
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        self.viewer.render(f, area);

        match self.popup.as_mut() {
            Some(Popup::GoToPage(popup)) => popup.render(f, area),
            Some(Popup::Bookmarks(popup)) => popup.render(f, area),
            Some(Popup::Note(popup)) => popup.render(f, area),
            Some(Popup::Thumbs(popup)) => popup.render(f, area),
            Some(Popup::Help(popup)) => popup.render(f, area),
            None => {}
        }

        if let Some(hud) = &self.hud {
            hud.render(f, self.viewer.layout().page_area);
        }
    }
}

pub fn run_app_with_event_source<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    event_source: &mut dyn EventSource,
) -> Result<()>
where
    B::Error: Send + Sync + 'static,
{
    let mut needs_redraw = true;
    loop {
        if needs_redraw {
            terminal.draw(|f| app.draw(f))?;
            needs_redraw = false;
        }

        let timeout = if app.is_animating() {
            ANIMATION_TICK
        } else {
            IDLE_TICK
        };

        let mut should_quit = false;
        if event_source.poll(timeout)? {
            let mut events_processed = 0;
            loop {
                let event = event_source.read()?;
                events_processed += 1;
                if app.handle_event(event) == Some(AppAction::Quit) {
                    should_quit = true;
                    break;
                }
                if events_processed >= MAX_EVENTS_PER_FRAME
                    || !event_source.poll(Duration::ZERO)?
                {
                    break;
                }
            }
            needs_redraw = true;
        }

        if should_quit {
            app.shutdown();
            return Ok(());
        }

        if app.tick() {
            needs_redraw = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::InMemoryDocument;
    use crate::event_source::SimulatedEventSource;
    use std::path::Path;

    fn app(page_count: u32, settings: Settings) -> App {
        App::with_document(
            Box::new(InMemoryDocument::numbered(page_count)),
            DocumentId::from_path(Path::new("numbered.txt")),
            JsonLibrary::ephemeral(),
            settings,
        )
        .unwrap()
    }

    fn press(app: &mut App, c: char) -> Option<AppAction> {
        app.handle_event(SimulatedEventSource::char_key(c))
    }

    #[test]
    fn next_key_turns_and_position_follows_completion() {
        let mut app = app(10, Settings::default());
        press(&mut app, 'l');
        assert_eq!(app.viewer().current_page(), 1);
        while app.is_animating() {
            app.tick();
        }
        assert_eq!(app.viewer().current_page(), 2);
        assert_eq!(app.library().last_page(app.doc_id()), Some(2));
    }

    #[test]
    fn double_g_goes_to_first_page() {
        let mut app = app(10, Settings::default());
        press(&mut app, 'G');
        app.shutdown();
        assert_eq!(app.viewer().current_page(), 10);
        press(&mut app, 'g');
        assert_eq!(app.viewer().displayed_pages(), vec![Some(10)]);
        press(&mut app, 'g');
        app.shutdown();
        assert_eq!(app.viewer().current_page(), 1);
    }

    #[test]
    fn disabled_popups_do_not_open() {
        let settings = Settings {
            note_btn_visible: false,
            bookmarks_btn_visible: false,
            thumbs_btn_visible: false,
            ..Settings::default()
        };
        let mut app = app(10, settings);
        for c in ['n', 'b', 't'] {
            press(&mut app, c);
            assert!(!app.has_active_popup(), "{c}");
        }
        press(&mut app, '?');
        assert!(matches!(app.popup(), Some(Popup::Help(_))));
    }

    #[test]
    fn popups_swallow_navigation_keys() {
        let mut app = app(10, Settings::default());
        press(&mut app, 't');
        press(&mut app, 'l');
        assert!(!app.is_animating());
        assert!(matches!(app.popup(), Some(Popup::Thumbs(_))));
    }

    #[test]
    fn bookmark_added_from_popup() {
        let mut app = app(10, Settings::default());
        press(&mut app, 'b');
        press(&mut app, 'a');
        assert_eq!(app.hud_message(), Some("Bookmarked page 1"));
        let list = app.library().load_list(app.doc_id());
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].page, 1);
    }

    #[test]
    fn note_saved_with_ctrl_s() {
        let mut app = app(10, Settings::default());
        press(&mut app, 'n');
        for c in "hi".chars() {
            press(&mut app, c);
        }
        app.handle_event(SimulatedEventSource::ctrl_char_key('s'));
        assert!(!app.has_active_popup());
        let note = DocumentNoteManager::load(app.library(), app.doc_id());
        assert_eq!(note.text, "hi");
    }

    #[test]
    fn quit_key_and_ctrl_c() {
        let mut app = app(3, Settings::default());
        assert_eq!(press(&mut app, 'q'), Some(AppAction::Quit));
        assert_eq!(
            app.handle_event(SimulatedEventSource::ctrl_char_key('c')),
            Some(AppAction::Quit)
        );
    }

    #[test]
    fn escape_cancels_running_turn() {
        let mut app = app(10, Settings::default());
        press(&mut app, 'l');
        app.handle_event(SimulatedEventSource::key_event(
            KeyCode::Esc,
            KeyModifiers::empty(),
        ));
        assert!(!app.is_animating());
        assert_eq!(app.viewer().displayed_pages(), vec![Some(1)]);
        assert_eq!(app.viewer().current_page(), 1);
    }
}

use std::fs::File;
use std::io::stdout;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info, warn};
use ratatui::{Terminal, backend::CrosstermBackend};
use simplelog::{Config, LevelFilter, WriteLogger};

use leafturn::event_source::KeyboardEventSource;
use leafturn::managers::JsonLibrary;
use leafturn::panic_handler::initialize_panic_handler;
use leafturn::settings::{self, APP_NAME};
use leafturn::theme::{ThemeId, set_theme};
use leafturn::{App, DocumentSession, InMemoryDocument, run_app_with_event_source};

/// Page-turning document viewer for the terminal
#[derive(Parser, Debug)]
#[command(name = "leafturn", version, about)]
struct Args {
    /// Document to open (PDF or plain text)
    file: PathBuf,

    /// Show two pages side by side
    #[arg(long)]
    dual_page: bool,

    /// Hide the toolbar
    #[arg(long)]
    no_toolbar: bool,

    /// Hide the bottom bar with the page slider
    #[arg(long)]
    no_bottom_bar: bool,

    /// Settings file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Library file with notes, bookmarks and reading positions
    #[arg(long, value_name = "PATH")]
    library: Option<PathBuf>,

    /// Keep notes, bookmarks and positions in memory only
    #[arg(long)]
    ephemeral: bool,

    /// Log file
    #[arg(long, value_name = "PATH", default_value = "leafturn.log")]
    log_file: PathBuf,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn default_library_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_NAME).join("library.json"))
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

fn new_document(path: &Path) -> Box<dyn DocumentSession> {
    #[cfg(feature = "pdf")]
    {
        if is_pdf(path) {
            return Box::new(leafturn::pdf_document::PdfDocument::new());
        }
    }
    #[cfg(not(feature = "pdf"))]
    {
        if is_pdf(path) {
            warn!("Built without PDF support, reading {} as text", path.display());
        }
    }
    Box::new(InMemoryDocument::default())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(
        level,
        Config::default(),
        File::create(&args.log_file)
            .with_context(|| format!("creating log file {}", args.log_file.display()))?,
    )?;
    info!("Starting {APP_NAME} {}", env!("CARGO_PKG_VERSION"));

    match &args.config {
        Some(path) => settings::load_settings_from_path(path),
        None => settings::load_settings(),
    }
    settings::apply_overrides(|s| {
        if args.dual_page {
            s.dual_page = true;
        }
        if args.no_toolbar {
            s.toolbar_visible = false;
        }
        if args.no_bottom_bar {
            s.bottombar_visible = false;
        }
    });
    let settings = settings::current();
    match ThemeId::from_name(&settings.theme) {
        Some(theme) => set_theme(theme),
        None => warn!("Unknown theme {:?}, using the default", settings.theme),
    }

    let library_path = if args.ephemeral {
        None
    } else {
        args.library.clone().or_else(default_library_path)
    };
    let library = JsonLibrary::load_or_ephemeral(library_path.as_deref());

    // Load before touching the terminal so errors print normally
    let document = new_document(&args.file);
    let mut app = App::open(document, &args.file, library, settings)
        .with_context(|| format!("opening {}", args.file.display()))?;

    initialize_panic_handler();

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut event_source = KeyboardEventSource;
    let res = run_app_with_event_source(&mut terminal, &mut app, &mut event_source);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Application error: {err:?}");
        eprintln!("{err:?}");
    }

    info!("Shutting down {APP_NAME}");
    Ok(())
}

use anchornotes_config::Config;
use anchornotes_engine::{EditorSession, NoteFile, SerializeOptions, SessionOptions, io};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, info};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

mod styled;

struct App {
    notes_path: PathBuf,
    options: SessionOptions,
    notes: Vec<NoteFile>,
    list_state: ListState,
    content: Vec<Line<'static>>,
}

impl App {
    fn new(notes_path: PathBuf, options: SessionOptions) -> Result<Self> {
        let notes = io::scan_notes(&notes_path)?;
        info!("found {} notes in {}", notes.len(), notes_path.display());

        let mut app = Self {
            notes_path,
            options,
            notes,
            list_state: ListState::default(),
            content: Vec::new(),
        };

        if !app.notes.is_empty() {
            app.list_state.select(Some(0));
            app.load_selected();
        }

        Ok(app)
    }

    fn next_note(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1) % self.notes.len(),
            None => 0,
        };
        self.list_state.select(Some(i));
        self.load_selected();
    }

    fn previous_note(&mut self) {
        if self.notes.is_empty() {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => self.notes.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
        self.load_selected();
    }

    fn load_selected(&mut self) {
        let Some(note) = self
            .list_state
            .selected()
            .and_then(|index| self.notes.get(index))
        else {
            return;
        };

        debug!("loading {}", note.relative_path());
        self.content = match io::read_file(note.relative_path(), &self.notes_path) {
            Ok(markdown) => {
                let session = EditorSession::from_markdown(&markdown, self.options);
                styled::styled_lines(session.buffer())
            }
            Err(e) => vec![Line::from(format!("Error reading note: {e}"))],
        };
    }
}

fn session_options(config: Option<&Config>) -> SessionOptions {
    let Some(config) = config else {
        return SessionOptions::default();
    };
    SessionOptions {
        continue_checklists: config.editor.continue_checklists,
        serialize: SerializeOptions {
            split_at_newlines: config.formatting.split_spans_at_newlines,
        },
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    // Notes path from CLI args, else the config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) if args.len() == 2 => {
            eprintln!("Warning: ignoring config file: {e}");
            None
        }
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Usage: {} <notes-folder-path>", args[0]);
            process::exit(1);
        }
    };

    let (notes_path, from_config) = match (args.len(), &config) {
        (2, _) => (PathBuf::from(&args[1]), false),
        (1, Some(config)) => (config.notes_path.clone(), true),
        (1, None) => {
            eprintln!("Error: No notes path provided and no config file found");
            eprintln!("Usage: {} <notes-folder-path>", args[0]);
            eprintln!("Or create a config file at {}", config_path.display());
            process::exit(1);
        }
        _ => {
            eprintln!("Usage: {} [notes-folder-path]", args[0]);
            process::exit(1);
        }
    };

    if let Err(e) = io::validate_notes_dir(&notes_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Notes path '{}'{} is invalid: {e}",
            notes_path.display(),
            source
        );
        process::exit(1);
    }

    let mut app = App::new(notes_path, session_options(config.as_ref()))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_note(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_note(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(rows[0]);

    let items: Vec<ListItem> = app
        .notes
        .iter()
        .map(|note| {
            let label = match note.folder() {
                Some(folder) => format!("{folder}/{}", note.title()),
                None => note.title().to_string(),
            };
            ListItem::new(label)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Notes"))
        .highlight_style(Style::default().bg(Color::Yellow).fg(Color::Black));
    f.render_stateful_widget(list, panes[0], &mut app.list_state);

    let content = if app.content.is_empty() {
        vec![Line::from("Select a note to view it")]
    } else {
        app.content.clone()
    };
    let content = Paragraph::new(content)
        .block(Block::default().borders(Borders::ALL).title("Note"))
        .wrap(Wrap { trim: false });
    f.render_widget(content, panes[1]);

    let help = Paragraph::new(Line::from("q: Quit | ↑/k: Previous | ↓/j: Next"));
    f.render_widget(help, rows[1]);
}

mod app;

use anyhow::Result;
use app::{App, Focus};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pilcrow_config::{Config, EditorConfig};
use pilcrow_engine::{Block as DocBlock, Kind, KindRegistry, io};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::{
    env,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
};

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    // Determine documents path from CLI args or config file
    let args: Vec<String> = env::args().collect();
    let config_path = Config::config_path();

    let documents_path;
    let editor_config;
    let from_config;

    if args.len() == 2 {
        documents_path = PathBuf::from(&args[1]);
        // editor tuning still comes from the config file when there is one
        editor_config = match Config::load() {
            Ok(Some(config)) => config.editor,
            _ => EditorConfig::default(),
        };
        from_config = false;
    } else if args.len() == 1 {
        match Config::load() {
            Ok(Some(config)) => {
                documents_path = config.documents_path;
                editor_config = config.editor;
                from_config = true;
            }
            Ok(None) => {
                eprintln!("Error: No documents path provided and no config file found");
                eprintln!("Usage: {} <documents-folder-path>", args[0]);
                eprintln!("Or create a config file at {}", config_path.display());
                process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: Failed to load config file: {e}");
                eprintln!("Usage: {} <documents-folder-path>", args[0]);
                process::exit(1);
            }
        }
    } else {
        eprintln!("Usage: {} [documents-folder-path]", args[0]);
        process::exit(1);
    };

    if let Err(e) = io::validate_documents_dir(&documents_path) {
        let source = if from_config {
            format!(" from config file '{}'", config_path.display())
        } else {
            String::new()
        };
        eprintln!(
            "Error: Documents path '{}'{} is invalid: {e}",
            documents_path.display(),
            source
        );
        process::exit(1);
    }

    let mut app = App::new(documents_path, editor_config)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.focus {
            Focus::Files => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_file(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_file(),
                KeyCode::Enter => report(app, App::open_selected_file),
                KeyCode::Char('n') => report(app, App::new_document),
                KeyCode::Tab if app.open.is_some() => app.focus = Focus::Blocks,
                _ => {}
            },
            Focus::Blocks => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next_block(),
                KeyCode::Up | KeyCode::Char('k') => app.previous_block(),
                KeyCode::Char('J') => app.move_selected_down(),
                KeyCode::Char('K') => app.move_selected_up(),
                KeyCode::Char(' ') => app.toggle_completion(),
                KeyCode::Char('t') => app.cycle_kind(),
                KeyCode::Char('a') => app.append_new(),
                KeyCode::Char('d') => app.delete_selected(),
                KeyCode::Char('s') => report(app, App::save),
                KeyCode::Char('i') | KeyCode::Enter => app.focus = Focus::Insert,
                KeyCode::Tab | KeyCode::Esc => app.focus = Focus::Files,
                _ => {}
            },
            Focus::Insert => match key.code {
                KeyCode::Esc => app.focus = Focus::Blocks,
                KeyCode::Enter => app.insert_newline(),
                KeyCode::Backspace => app.backspace(),
                KeyCode::Char(c) => app.type_char(c),
                _ => {}
            },
        }
    }
}

/// Run a fallible action, surfacing failure in the status line
fn report(app: &mut App, action: fn(&mut App) -> Result<()>) {
    if let Err(e) = action(app) {
        log::error!("{e:#}");
        app.status = format!("Error: {e}");
    }
}

fn block_line<'a>(block: &'a DocBlock, registry: &KindRegistry) -> Line<'a> {
    let content = Span::raw(block.content.as_str());
    let kind = &block.kind;

    if *kind == Kind::HEADING {
        Line::from(vec![
            Span::raw("# "),
            content.style(Style::default().add_modifier(Modifier::BOLD)),
        ])
    } else if *kind == Kind::QUOTE {
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::DarkGray)),
            content.style(Style::default().add_modifier(Modifier::ITALIC)),
        ])
    } else if *kind == Kind::TODO {
        let (marker, style) = if block.is_completed() {
            ("[x] ", Style::default().add_modifier(Modifier::CROSSED_OUT))
        } else {
            ("[ ] ", Style::default())
        };
        Line::from(vec![Span::raw(marker), content.style(style)])
    } else if *kind == Kind::LIST_ITEM {
        let marker = match (block.get("type"), block.get("index")) {
            (Some("numbered"), Some(index)) => format!("{index}. "),
            _ => "• ".to_string(),
        };
        Line::from(vec![Span::raw(marker), content])
    } else if *kind == Kind::DIVIDER {
        Line::from(Span::styled(
            "────────────────",
            Style::default().fg(Color::DarkGray),
        ))
    } else if kind.is_paragraph() {
        Line::from(content)
    } else {
        Line::from(vec![
            Span::styled(
                format!("[{}] ", registry.title(kind)),
                Style::default().fg(Color::Cyan),
            ),
            content,
        ])
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)].as_ref())
        .split(f.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .margin(1)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
        .split(rows[0]);

    let highlight = |focused: bool| {
        if focused {
            Style::default().bg(Color::Yellow).fg(Color::Black)
        } else {
            Style::default().add_modifier(Modifier::REVERSED)
        }
    };

    // File list panel
    let file_items: Vec<ListItem> = app
        .library
        .files()
        .map(|file| ListItem::new(Line::from(format!("📄 {}", file.display_name()))))
        .collect();

    let files_list = List::new(file_items)
        .block(Block::default().borders(Borders::ALL).title("Documents"))
        .highlight_style(highlight(app.focus == Focus::Files));

    f.render_stateful_widget(files_list, chunks[0], &mut app.file_list_state);

    // Block panel
    let title = match &app.open {
        Some(open) if open.dirty => format!("{} *", open.file.display_name()),
        Some(open) => open.file.display_name().to_string(),
        None => "No document".to_string(),
    };
    let panel = Block::default().borders(Borders::ALL).title(title);

    match &app.open {
        Some(open) => {
            let registry = open.editor.registry();
            let block_items: Vec<ListItem> = open
                .editor
                .document()
                .iter()
                .map(|block| ListItem::new(block_line(block, registry)))
                .collect();
            let blocks_list = List::new(block_items)
                .block(panel)
                .highlight_style(highlight(app.focus != Focus::Files));
            f.render_stateful_widget(blocks_list, chunks[1], &mut app.block_list_state);
        }
        None => {
            let hint = Paragraph::new("Select a document and press Enter, or n for a new one")
                .block(panel);
            f.render_widget(hint, chunks[1]);
        }
    }

    // Instructions
    let help = match app.focus {
        Focus::Files => "q: Quit | ↑/k ↓/j: Move | Enter: Open | n: New | Tab: Blocks",
        Focus::Blocks => {
            "q: Quit | ↑/k ↓/j: Move | J/K: Reorder | i: Edit | Space: Toggle | t: Kind | a: Append | d: Delete | s: Save | Tab: Files"
        }
        Focus::Insert => "Esc: Done | Enter: New block | Backspace: Delete",
    };
    let status = Line::from(vec![
        Span::styled(app.status.as_str(), Style::default().fg(Color::Green)),
    ]);

    f.render_widget(Paragraph::new(vec![Line::from(help), status]), rows[1]);
}

use std::io;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use fixture_delta::config::{self, Config};
use fixture_delta::state::{AppState, Delta, RenderCommand, apply_delta, spawn_render_worker};
use fixture_delta::table::{ComparisonTable, PointsCell, PointsTier};

struct App {
    state: AppState,
    should_quit: bool,
    club: String,
    cmd_tx: mpsc::Sender<RenderCommand>,
}

impl App {
    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('e') | KeyCode::Char('E') => {
                let cmd = self.state.toggle_exclude_promoted();
                self.send(cmd);
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let cmd = self.state.request_render();
                self.send(cmd);
            }
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            _ => {}
        }
    }

    fn send(&mut self, cmd: RenderCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            self.state.loading = false;
            self.state.status = Some("render worker stopped".to_string());
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_env();
    config::init_file_logging()?;
    config.apply_cache_dir();
    let changes = config.league_changes()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    let club = config.club.clone();
    let exclude_promoted = config.exclude_promoted;
    spawn_render_worker(config, changes, tx, cmd_rx);

    let mut app = App {
        state: AppState::new(exclude_promoted),
        should_quit: false,
        club,
        cmd_tx,
    };
    let first = app.state.request_render();
    app.send(first);

    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(app))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    app.state
        .set_visible_rows(chunks[1].height.saturating_sub(2) as usize);
    match app.state.table.as_ref() {
        Some(table) => render_table(frame, chunks[1], table, app.state.scroll),
        None => {
            let text = if app.state.loading {
                "Loading fixtures..."
            } else {
                "No table rendered"
            };
            let empty = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, chunks[1]);
        }
    }

    let console: Vec<Line> = app
        .state
        .logs
        .iter()
        .rev()
        .take(3)
        .rev()
        .map(|l| Line::from(l.as_str()))
        .collect();
    let console = Paragraph::new(console)
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::TOP).title("Console"));
    frame.render_widget(console, chunks[2]);

    let footer = Paragraph::new(footer_text(&app.state))
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);
}

fn header_text(app: &App) -> String {
    let filter = if app.state.shown_exclude_promoted {
        "promoted teams excluded"
    } else {
        "all fixtures"
    };
    let mut title = format!("FIXTURE DELTA | {} | {filter}", app.club.to_uppercase());
    if app.state.loading {
        title.push_str(" | loading");
    }
    if let Some(status) = app.state.status.as_deref() {
        title.push_str(&format!(" | error: {status}"));
    }
    title
}

fn footer_text(state: &AppState) -> String {
    format!(
        "e {} | r Reload | j/k/↑/↓ Scroll | q Quit",
        state.toggle_label()
    )
}

fn table_columns() -> [Constraint; 3] {
    [
        Constraint::Min(28),
        Constraint::Length(36),
        Constraint::Length(16),
    ]
}

fn render_table(frame: &mut Frame, area: Rect, table: &ComparisonTable, scroll: usize) {
    if area.height < 3 {
        return;
    }
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let header_area = Rect { height: 1, ..area };
    render_row(
        frame,
        header_area,
        [
            Span::styled(table.header[0].as_str(), bold),
            Span::styled(table.header[1].as_str(), bold),
            Span::styled(table.header[2].as_str(), bold),
        ],
    );

    let [label, placeholder, delta] = table.aggregate_row();
    let aggregate_area = Rect {
        y: area.y + 1,
        height: 1,
        ..area
    };
    render_row(
        frame,
        aggregate_area,
        [
            Span::styled(label, bold),
            Span::styled(placeholder, bold),
            Span::styled(delta, bold.fg(delta_color(delta))),
        ],
    );

    let visible = (area.height - 2) as usize;
    for (i, row) in table.rows.iter().skip(scroll).take(visible).enumerate() {
        let row_area = Rect {
            y: area.y + 2 + i as u16,
            height: 1,
            ..area
        };
        render_row(
            frame,
            row_area,
            [
                Span::raw(row.fixture.as_str()),
                points_span(&row.previous),
                points_span(&row.current),
            ],
        );
    }
}

fn render_row(frame: &mut Frame, area: Rect, cells: [Span; 3]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(table_columns())
        .split(area);
    for (col, cell) in cols.iter().zip(cells) {
        frame.render_widget(Paragraph::new(Line::from(cell)), *col);
    }
}

fn points_span(cell: &PointsCell) -> Span<'static> {
    let text = match cell.note.as_deref() {
        Some(note) => format!("{} ({note})", cell.text),
        None => cell.text.clone(),
    };
    let style = match cell.tier {
        Some(PointsTier::Win) => Style::default().fg(Color::Green),
        Some(PointsTier::Draw) => Style::default().fg(Color::Yellow),
        Some(PointsTier::Loss) => Style::default().fg(Color::Red),
        None => Style::default().fg(Color::DarkGray),
    };
    Span::styled(text, style)
}

fn delta_color(delta: &str) -> Color {
    if delta.starts_with('+') {
        Color::Green
    } else if delta.starts_with('-') {
        Color::Red
    } else {
        Color::White
    }
}

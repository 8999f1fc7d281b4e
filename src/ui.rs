use anyhow::Result;
use bikeshare_explorer::report::{format_duration, row_cells, ROW_HEADERS};
use bikeshare_explorer::{month_name, FilterSpec, Paginator, StatsSummary, TripRecord, Window};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame, Terminal,
};
use std::io;

pub struct App<'a> {
    pub spec: FilterSpec,
    pub summary: StatsSummary,
    pages: Paginator<'a>,
    /// Window currently on screen: (start index, rows)
    pub current: Option<(usize, &'a [TripRecord])>,
    pub exhausted: bool,
}

impl<'a> App<'a> {
    pub fn new(spec: FilterSpec, records: &'a [TripRecord], summary: StatsSummary) -> Self {
        let mut app = Self {
            spec,
            summary,
            pages: Paginator::new(records),
            current: None,
            exhausted: false,
        };
        app.next_window();
        app
    }

    pub fn total(&self) -> usize {
        self.pages.total()
    }

    /// Advance to the next five rows; the last window stays on screen once exhausted
    pub fn next_window(&mut self) {
        match self.pages.next_window() {
            Window::Rows { start, rows } => {
                self.current = Some((start, rows));
                self.exhausted = self.pages.is_exhausted();
            }
            Window::Exhausted => self.exhausted = true,
        }
    }

    pub fn restart(&mut self) {
        self.pages.reset();
        self.exhausted = false;
        self.current = None;
        self.next_window();
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char(' ') | KeyCode::Char('n') | KeyCode::Down => app.next_window(),
                KeyCode::Char('r') | KeyCode::Home => app.restart(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Header
            Constraint::Length(14), // Statistics
            Constraint::Min(0),     // Raw rows
            Constraint::Length(3),  // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_stats(f, chunks[1], app);
    render_rows(f, chunks[2], app);
    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let spans = vec![
        Span::styled(
            app.spec.region.title(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Month: {}  Day: {}", app.spec.month, app.spec.day),
            Style::default().fg(Color::Cyan),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Trips: {}", app.total()),
            Style::default().fg(Color::White),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(header, area);
}

fn stat_line(label: &str, value: Option<String>) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {label:<22}"), Style::default().fg(Color::DarkGray)),
        match value {
            Some(v) => Span::styled(v, Style::default().fg(Color::White)),
            None => Span::styled("No data available.", Style::default().fg(Color::Red)),
        },
    ])
}

fn render_stats(f: &mut Frame, area: Rect, app: &App) {
    let s = &app.summary;

    let user_types = s
        .users
        .user_types
        .iter()
        .map(|c| format!("{} {}", c.value, c.count))
        .collect::<Vec<_>>()
        .join(", ");
    let gender = s.users.gender.as_ref().map(|counts| {
        counts
            .iter()
            .map(|c| format!("{} {}", c.value, c.count))
            .collect::<Vec<_>>()
            .join(", ")
    });

    let lines = vec![
        stat_line("Most common month", s.time.common_month.map(|m| month_name(m).to_string())),
        stat_line("Most common day", s.time.common_day.clone()),
        stat_line("Most common hour", s.time.common_hour.map(|h| format!("{h:02}:00"))),
        stat_line("Start station", s.stations.common_start.clone()),
        stat_line("End station", s.stations.common_end.clone()),
        stat_line("Trip", s.stations.common_trip.clone()),
        stat_line("Total travel time", Some(format_duration(s.duration.total))),
        stat_line("Mean travel time", s.duration.mean.map(format_duration)),
        stat_line("User types", (!user_types.is_empty()).then_some(user_types)),
        stat_line("Gender", gender.filter(|g| !g.is_empty())),
        stat_line(
            "Birth years",
            s.users.birth_year.map(|y| {
                format!(
                    "earliest {}, most recent {}, most common {}",
                    y.earliest, y.most_recent, y.most_common
                )
            }),
        ),
    ];

    let stats = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Statistics "),
    );

    f.render_widget(stats, area);
}

fn render_rows(f: &mut Frame, area: Rect, app: &App) {
    let header_cells = ROW_HEADERS.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows: Vec<Row> = match app.current {
        Some((start, window)) => window
            .iter()
            .enumerate()
            .map(|(offset, trip)| Row::new(row_cells(start + offset, trip)).height(1))
            .collect(),
        None => Vec::new(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(7),
            Constraint::Length(20),
            Constraint::Length(20),
            Constraint::Length(9),
            Constraint::Length(31),
            Constraint::Length(31),
            Constraint::Length(11),
            Constraint::Length(7),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Trips "),
    );

    f.render_widget(table, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let position = match app.current {
        Some((start, rows)) => format!(" Rows {}-{} of {} ", start + 1, start + rows.len(), app.total()),
        None => format!(" Rows 0 of {} ", app.total()),
    };

    let mut status_spans = vec![Span::styled(position, Style::default().fg(Color::Cyan))];

    if app.exhausted || app.current.is_none() {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            "No more data to display.",
            Style::default().fg(Color::Red),
        ));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Space", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Next 5 | "));
    status_spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Restart | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

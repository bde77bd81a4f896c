use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::widgets::{
    Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph,
    Wrap,
};

use padel_terminal::aggregate::{Analysis, BreakdownRow};
use padel_terminal::analysis_export::export_analysis;
use padel_terminal::dataset::load_configured;
use padel_terminal::settings::Settings;
use padel_terminal::state::{AppState, FilterSection};

const CORNFLOWER: Color = Color::Rgb(100, 149, 237);
const ROYAL_BLUE: Color = Color::Rgb(65, 105, 225);

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(settings: &Settings) -> Self {
        let mut state = AppState::new(settings.match_info.clone(), settings.export_path.clone());
        match load_configured(settings) {
            Ok(dataset) => state.load_dataset(dataset),
            Err(err) => {
                state.load_failed(&err);
                if !settings.demo {
                    state.push_log("[INFO] Set PADEL_DEMO=1 or pass --demo to explore a demo match");
                }
            }
        }
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.state.next_section(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.state.prev_section(),
            KeyCode::Char('j') | KeyCode::Down => self.state.cursor_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.cursor_up(),
            KeyCode::Char(' ') | KeyCode::Enter => self.state.toggle_at_cursor(),
            KeyCode::Char('a') => self.state.select_all_in_section(),
            KeyCode::Char('n') => self.state.clear_section(),
            KeyCode::Char('i') | KeyCode::Char('I') => self.state.toggle_invert(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.state.toggle_results(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.state.toggle_playstyle(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn export(&mut self) {
        let path = self.state.export_path.clone();
        let result = export_analysis(
            &path,
            &self.state.analysis,
            &self.state.filter_spec(),
            &self.state.match_info,
        );
        match result {
            Ok(report) => self.state.push_log(format!(
                "[INFO] Exported {} balls and {} games to {}",
                report.momentum_rows,
                report.group_rows,
                path.display()
            )),
            Err(err) => self.state.push_log(format!("[ERROR] Export failed: {err:#}")),
        }
    }
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut settings = Settings::from_env();
    if let Some(arg) = std::env::args().nth(1) {
        if arg == "--demo" {
            settings.demo = true;
        } else {
            settings.csv_path = PathBuf::from(arg);
        }
    }
    let mut app = App::new(&settings);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
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

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_body(frame, chunks[1], &app.state);

    let footer = Paragraph::new(footer_text()).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[2]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let analysis = &state.analysis;
    let line1 = format!(
        "  PADEL ANALYTICS | {} | POV: {}",
        state.match_info.heading(),
        state.perspective().label()
    );
    let line2 = format!(
        "  Balls {}/{} | Won {} Lost {} | Net {:+}",
        analysis.momentum.len(),
        state.dataset.len(),
        analysis.points_won(),
        analysis.points_lost(),
        analysis.final_net()
    );
    format!("{line1}\n{line2}")
}

fn footer_text() -> String {
    "Tab/←/→ Section | j/k/↑/↓ Move | Space Toggle | a All | n None | i POV | r Result | p Playstyle | e Export | ? Help | q Quit".to_string()
}

fn render_body(frame: &mut Frame, area: Rect, state: &AppState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(28), Constraint::Min(30)])
        .split(area);

    render_sidebar(frame, columns[0], state);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(5)])
        .split(columns[1]);

    render_views(frame, rows[0], state);

    let console = Paragraph::new(console_text(state))
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, rows[1]);
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    let sections = [
        FilterSection::Sets,
        FilterSection::Games,
        FilterSection::Servers,
        FilterSection::Perspective,
    ];
    for (idx, section) in sections.into_iter().enumerate() {
        if idx > 0 {
            lines.push(Line::raw(""));
        }
        let focused = section == state.section;
        let title_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        lines.push(Line::styled(section.title(), title_style));

        for (row_idx, row) in state.section_rows(section).into_iter().enumerate() {
            let under_cursor = focused && row_idx == state.cursor;
            let prefix = if under_cursor { "> " } else { "  " };
            let mark = if row.checked { "[x]" } else { "[ ]" };
            let style = if under_cursor {
                Style::default().fg(Color::White).bg(Color::DarkGray)
            } else {
                Style::default()
            };
            lines.push(Line::styled(format!("{prefix}{mark} {}", row.label), style));
        }
    }

    let sidebar = Paragraph::new(lines)
        .block(Block::default().title("Filters").borders(Borders::ALL));
    frame.render_widget(sidebar, area);
}

fn render_views(frame: &mut Frame, area: Rect, state: &AppState) {
    if let Some(err) = &state.load_error {
        let msg = Paragraph::new(err.as_str())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: true })
            .block(Block::default().title("Match log").borders(Borders::ALL));
        frame.render_widget(msg, area);
        return;
    }

    if !state.show_results && !state.show_playstyle {
        let empty = Paragraph::new("Press r for the Result view or p for the Playstyle view")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    if state.analysis.momentum.is_empty() {
        let empty = Paragraph::new("No balls match the current filters")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    }

    let constraints = match (state.show_results, state.show_playstyle) {
        (true, true) => vec![Constraint::Percentage(50), Constraint::Percentage(50)],
        _ => vec![Constraint::Percentage(100)],
    };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let mut next = 0;
    if state.show_results {
        render_momentum(frame, rows[next], &state.analysis);
        next += 1;
    }
    if state.show_playstyle {
        render_playstyle(frame, rows[next], &state.analysis);
    }
}

/// One vertical bar per ball, from the zero line to +1 (won) or -1 (lost).
fn ball_bars(analysis: &Analysis) -> Vec<(bool, [(f64, f64); 2])> {
    analysis
        .momentum
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let x = (idx + 1) as f64;
            let y = if p.won { 1.0 } else { -1.0 };
            (p.won, [(x, 0.0), (x, y)])
        })
        .collect()
}

fn render_momentum(frame: &mut Frame, area: Rect, analysis: &Analysis) {
    let total = analysis.momentum.len() as f64;
    let bars = ball_bars(analysis);
    let net: Vec<(f64, f64)> = analysis
        .momentum
        .iter()
        .enumerate()
        .map(|(idx, p)| ((idx + 1) as f64, f64::from(p.net)))
        .collect();
    let zero = [(0.0, 0.0), (total + 1.0, 0.0)];

    let max_net = analysis.momentum.iter().map(|p| p.net).max().unwrap_or(0).max(1);
    let min_net = analysis.momentum.iter().map(|p| p.net).min().unwrap_or(0).min(-1);
    let y_bounds = [f64::from(min_net) - 1.0, f64::from(max_net) + 1.0];

    let mut datasets = vec![
        Dataset::default()
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Gray))
            .data(&zero),
    ];
    // Legend entry only on the first bar of each colour.
    let (mut won_named, mut lost_named) = (false, false);
    for (won, bar) in &bars {
        let (named, label, color) = if *won {
            (&mut won_named, "won", Color::Green)
        } else {
            (&mut lost_named, "lost", Color::Red)
        };
        let mut dataset = Dataset::default()
            .marker(symbols::Marker::HalfBlock)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(color))
            .data(bar);
        if !*named {
            dataset = dataset.name(label);
            *named = true;
        }
        datasets.push(dataset);
    }
    datasets.push(
        Dataset::default()
            .name("net")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&net),
    );

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title("Result for each ball in the game")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("ball")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, total + 1.0])
                .labels(vec![Span::raw("1"), Span::raw(format!("{}", total as usize))]),
        )
        .y_axis(
            Axis::default()
                .title("net won")
                .style(Style::default().fg(Color::Gray))
                .bounds(y_bounds)
                .labels(vec![
                    Span::raw(format!("{}", y_bounds[0])),
                    Span::raw("0"),
                    Span::raw(format!("{}", y_bounds[1])),
                ]),
        );
    frame.render_widget(chart, area);
}

fn render_playstyle(frame: &mut Frame, area: Rect, analysis: &Analysis) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let rows = analysis.breakdown.rows();

    let cause = breakdown_chart(
        legend_title(
            "Cause of win",
            &[
                ("normal play", Color::Gray),
                ("unforced error", Color::Red),
                ("strike", Color::Green),
            ],
        ),
        &rows,
        |row| {
            [
                (row.play, Color::Gray),
                (row.unforced, Color::Red),
                (row.strike, Color::Green),
            ]
        },
    );
    frame.render_widget(cause, columns[0]);

    let shot = breakdown_chart(
        legend_title(
            "Final type of shot",
            &[
                ("base", Color::Gray),
                ("volley", CORNFLOWER),
                ("overhead", ROYAL_BLUE),
            ],
        ),
        &rows,
        |row| {
            [
                (row.base, Color::Gray),
                (row.volley, CORNFLOWER),
                (row.overhead, ROYAL_BLUE),
            ]
        },
    );
    frame.render_widget(shot, columns[1]);
}

fn legend_title(title: &str, entries: &[(&str, Color)]) -> Line<'static> {
    let mut spans = vec![Span::raw(format!("{title} "))];
    for (label, color) in entries {
        spans.push(Span::styled(
            format!("■ {label} "),
            Style::default().fg(*color),
        ));
    }
    Line::from(spans)
}

fn breakdown_chart(
    title: Line<'static>,
    rows: &[BreakdownRow],
    bars_for: impl Fn(&BreakdownRow) -> [(u32, Color); 3],
) -> BarChart<'static> {
    let mut chart = BarChart::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .bar_width(2)
        .bar_gap(0)
        .group_gap(2);

    for row in rows {
        let bars: Vec<Bar> = bars_for(row)
            .into_iter()
            .map(|(value, color)| {
                Bar::default()
                    .value(u64::from(value))
                    .text_value(value.to_string())
                    .style(Style::default().fg(color))
                    .value_style(Style::default().fg(Color::Black).bg(color))
            })
            .collect();
        chart = chart.data(
            BarGroup::default()
                .label(Line::from(row.set_game.to_string()))
                .bars(&bars),
        );
    }
    chart
}

fn console_text(state: &AppState) -> String {
    if state.logs.is_empty() {
        return "No messages yet".to_string();
    }
    state
        .logs
        .iter()
        .rev()
        .take(3)
        .cloned()
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Padel Analytics - Help",
        "",
        "Filters:",
        "  Tab / ← / →  Switch section",
        "  j/k or ↑/↓   Move cursor",
        "  Space        Toggle value",
        "  a / n        Select all / none",
        "  i            Flip point of view",
        "",
        "Views:",
        "  r            Result view (momentum)",
        "  p            Playstyle view",
        "  e            Export to xlsx",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use padel_terminal::aggregate::analyze;
    use padel_terminal::decode::decode_all;
    use padel_terminal::demo_match::demo_match;
    use padel_terminal::filter::FilterSpec;
    use ratatui::backend::TestBackend;

    fn demo_analysis() -> Analysis {
        let events = decode_all(&demo_match(7)).expect("demo decodes");
        analyze(&events, &FilterSpec::default())
    }

    #[test]
    fn each_ball_gets_one_bar_from_zero() {
        let analysis = demo_analysis();
        let bars = ball_bars(&analysis);
        assert_eq!(bars.len(), analysis.momentum.len());
        for (idx, ((won, [base, tip]), point)) in bars.iter().zip(&analysis.momentum).enumerate() {
            let x = (idx + 1) as f64;
            assert_eq!(*won, point.won);
            assert_eq!(*base, (x, 0.0));
            assert_eq!(*tip, (x, if point.won { 1.0 } else { -1.0 }));
        }
    }

    #[test]
    fn momentum_chart_draws_with_and_without_balls() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("test terminal");
        let analysis = demo_analysis();
        terminal
            .draw(|frame| render_momentum(frame, frame.size(), &analysis))
            .expect("draw momentum");
        terminal
            .draw(|frame| render_momentum(frame, frame.size(), &Analysis::default()))
            .expect("draw empty momentum");
    }
}

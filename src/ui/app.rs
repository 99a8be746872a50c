use std::mem;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use tracing::info;

use crate::error::RosterError;
use crate::models::StudentRecord;
use crate::roster::{DerivedView, QueryState, RosterQueryEngine, SortMode};
use crate::source::{PendingLoad, RosterSource};

use super::helpers::{card_window, centered_rect, marks_bar, surface_error, tier_color};
use super::screens::{RosterScreen, Screen};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per student card.
const CARD_HEIGHT: u16 = 5;
/// Rows used by the page header (title and tagline).
const HEADER_HEIGHT: u16 = 2;
/// Bordered box holding the controls line and the active filter tags.
const CONTROLS_HEIGHT: u16 = 4;
/// Bordered row of statistics cards.
const STATS_HEIGHT: u16 = 3;

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    source: Arc<dyn RosterSource>,
    screen: Screen,
    status: Option<StatusMessage>,
}

impl App {
    /// Start loading from `source` right away; the first frames show the
    /// loading panel until [`App::poll_load`] sees the result.
    pub fn new(source: Arc<dyn RosterSource>) -> Self {
        let load = PendingLoad::spawn(Arc::clone(&source));
        Self {
            source,
            screen: Screen::Loading(load),
            status: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.screen, Screen::Loading(_))
    }

    /// Move out of the loading screen once the background load has finished.
    pub fn poll_load(&mut self) -> Result<()> {
        let finished = match &self.screen {
            Screen::Loading(load) => load.try_finish(),
            _ => return Ok(()),
        };
        let Some(result) = finished else {
            return Ok(());
        };

        let mut engine = RosterQueryEngine::new();
        match engine.complete_load(result) {
            Ok(()) => {
                let roster = RosterScreen::new(engine)?;
                let count = roster.view()?.total_count;
                self.set_status(
                    format!("Loaded {count} students from the {}.", self.source.describe()),
                    StatusKind::Info,
                );
                self.screen = Screen::Roster(roster);
            }
            Err(err) => {
                let reason = match err {
                    RosterError::LoadFailed(cause) => cause.to_string(),
                    other => other.to_string(),
                };
                self.set_status(format!("Failed to load roster: {reason}"), StatusKind::Error);
                self.screen = Screen::LoadFailed { reason };
            }
        }
        Ok(())
    }

    /// Returns `true` when the application should exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match self.screen {
            Screen::Loading(_) => Ok(self.handle_loading_key(code)),
            Screen::LoadFailed { .. } => Ok(self.handle_failed_key(code)),
            Screen::Roster(_) => Ok(self.handle_roster_key(code)),
        }
    }

    /// Abandon an in-flight load. The roster screen never appears for it.
    pub fn cancel_load(&mut self) {
        let previous = mem::replace(
            &mut self.screen,
            Screen::LoadFailed {
                reason: "Loading was cancelled.".to_string(),
            },
        );
        match previous {
            Screen::Loading(load) => load.cancel(),
            other => self.screen = other,
        }
    }

    fn handle_loading_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.cancel_load();
                true
            }
            _ => false,
        }
    }

    fn handle_failed_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => true,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                info!(source = %self.source.describe(), "retrying roster load");
                self.screen = Screen::Loading(PendingLoad::spawn(Arc::clone(&self.source)));
                self.set_status("Retrying...", StatusKind::Info);
                false
            }
            _ => false,
        }
    }

    fn handle_roster_key(&mut self, code: KeyCode) -> bool {
        let Screen::Roster(roster) = &mut self.screen else {
            return false;
        };

        let mut cleared = false;
        let mut selected = None;
        let result = match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('c') => roster.step_course(1),
            KeyCode::Char('C') => roster.step_course(-1),
            KeyCode::Char('h') | KeyCode::Char('H') => roster.toggle_high_performers(),
            KeyCode::Char('s') | KeyCode::Char('S') => roster.cycle_sort(),
            KeyCode::Char('x') | KeyCode::Char('X') => {
                cleared = true;
                roster.clear_filters()
            }
            KeyCode::Up => roster.move_selection(-1),
            KeyCode::Down => roster.move_selection(1),
            KeyCode::PageUp => roster.move_selection(-5),
            KeyCode::PageDown => roster.move_selection(5),
            KeyCode::Home => {
                roster.select_first();
                Ok(())
            }
            KeyCode::End => roster.select_last(),
            KeyCode::Enter => {
                selected = roster.current_record().map(|s| format!("Selected {s}."));
                Ok(())
            }
            _ => Ok(()),
        };

        match result {
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            Ok(()) if cleared => self.set_status("Filters cleared.", StatusKind::Info),
            Ok(()) => {
                if let Some(text) = selected {
                    self.set_status(text, StatusKind::Info);
                }
            }
        }
        false
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let footer_height = FOOTER_HEIGHT.min(area.height);

        let (content_area, footer_area) = if area.height > footer_height {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
                .split(area);
            (chunks[0], chunks[1])
        } else {
            (area, area)
        };

        match &self.screen {
            Screen::Loading(load) => self.draw_loading(frame, content_area, load),
            Screen::LoadFailed { reason } => self.draw_load_failed(frame, content_area, reason),
            Screen::Roster(roster) => self.draw_roster(frame, content_area, roster),
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area);
        }
    }

    fn draw_loading(&self, frame: &mut Frame, area: Rect, load: &PendingLoad) {
        let popup = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup);
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                "Loading student data...",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                load.description().to_string(),
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Student Roster"));
        frame.render_widget(paragraph, popup);
    }

    fn draw_load_failed(&self, frame: &mut Frame, area: Rect, reason: &str) {
        let popup = centered_rect(70, 40, area);
        frame.render_widget(Clear, popup);
        let paragraph = Paragraph::new(vec![
            Line::from(Span::styled(
                "Could not load student data",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(reason.to_string()),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Load Failed")
                .style(Style::default().fg(Color::Red)),
        );
        frame.render_widget(paragraph, popup);
    }

    fn draw_roster(&self, frame: &mut Frame, area: Rect, roster: &RosterScreen) {
        let Ok(view) = roster.view() else {
            return;
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Length(CONTROLS_HEIGHT),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(STATS_HEIGHT),
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        self.draw_controls(frame, chunks[1], roster.engine.query());

        let count = Paragraph::new(Line::from(vec![
            Span::raw("Showing "),
            Span::styled(
                view.visible_count.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" of "),
            Span::styled(
                view.total_count.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" students"),
        ]))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));
        frame.render_widget(count, chunks[2]);

        if view.visible_records.is_empty() {
            let message = Paragraph::new(vec![
                Line::from(Span::styled(
                    "No students found",
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from("Try adjusting your filters to see more results."),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Students"));
            frame.render_widget(message, chunks[3]);
        } else {
            self.render_student_cards(frame, chunks[3], &view.visible_records, roster.selected);
        }

        self.draw_statistics(frame, chunks[4], view);
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let header = Paragraph::new(vec![
            Line::from(Span::styled(
                "Student Management System",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Manage and filter student records efficiently",
                Style::default().fg(Color::Gray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(header, area);
    }

    fn draw_controls(&self, frame: &mut Frame, area: Rect, query: &QueryState) {
        let label_style = Style::default().fg(Color::Gray);
        let value_style = Style::default().add_modifier(Modifier::BOLD);
        let performance_style = if query.high_performers_only() {
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let sort_suffix = match query.sort_mode() {
            SortMode::None => " (Default)".to_string(),
            mode => format!(" ({})", mode.label()),
        };

        let controls = Line::from(vec![
            Span::styled("Course: ", label_style),
            Span::styled(
                query.course_filter().unwrap_or("All Courses").to_string(),
                value_style,
            ),
            Span::raw("   "),
            Span::styled("Performance: ", label_style),
            Span::styled("High Performers (80+)", performance_style),
            Span::raw("   "),
            Span::styled("Sort by Marks", value_style),
            Span::raw(sort_suffix),
        ]);

        let active = query.active_filters();
        let tags = if active.is_empty() {
            Line::from(Span::styled("No active filters", label_style))
        } else {
            let mut spans = vec![Span::styled("Active filters: ", label_style)];
            for (idx, tag) in active.into_iter().enumerate() {
                if idx > 0 {
                    spans.push(Span::raw(" "));
                }
                spans.push(Span::styled(
                    format!("[{tag}]"),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Line::from(spans)
        };

        let paragraph = Paragraph::new(vec![controls, tags])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Filters"));
        frame.render_widget(paragraph, area);
    }

    fn render_student_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        students: &[StudentRecord],
        selected: usize,
    ) {
        if students.is_empty() || area.height == 0 {
            return;
        }

        let capacity = (area.height / CARD_HEIGHT) as usize;
        let (start, end) = card_window(selected, students.len(), capacity);
        let constraints: Vec<Constraint> = (start..end)
            .map(|_| Constraint::Length(CARD_HEIGHT))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (chunk, index) in rows.iter().zip(start..end) {
            if chunk.height == 0 {
                continue;
            }
            let student = &students[index];
            let is_selected = index == selected;
            let mut block = Block::default().borders(Borders::ALL);
            if is_selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }
            let inner_width = block.inner(*chunk).width as usize;
            frame.render_widget(
                Paragraph::new(student_card_lines(student, is_selected, inner_width)).block(block),
                *chunk,
            );
        }
    }

    fn draw_statistics(&self, frame: &mut Frame, area: Rect, view: &DerivedView) {
        let stats = [
            ("Total Students", view.total_count.to_string(), Color::Blue),
            ("High Performers", view.high_performer_count.to_string(), Color::Green),
            ("Average Marks", view.average_marks.to_string(), Color::Cyan),
            ("Courses", view.distinct_course_count.to_string(), Color::Yellow),
        ];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);

        for ((title, value, color), column) in stats.into_iter().zip(columns.iter()) {
            let card = Paragraph::new(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(color)),
            );
            frame.render_widget(card, *column);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.screen {
            Screen::Loading(_) => Line::from(vec![
                Span::styled("[q]", key_style),
                Span::raw(" Cancel & Quit"),
            ]),
            Screen::LoadFailed { .. } => Line::from(vec![
                Span::styled("[r]", key_style),
                Span::raw(" Retry   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
            Screen::Roster(_) => Line::from(vec![
                Span::styled("[c/C]", key_style),
                Span::raw(" Course   "),
                Span::styled("[h]", key_style),
                Span::raw(" High Performers   "),
                Span::styled("[s]", key_style),
                Span::raw(" Sort   "),
                Span::styled("[x]", key_style),
                Span::raw(" Clear   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Details   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }
}

/// Three card lines: name with id and marks badge, course with the optional
/// high performer badge, then the progress bar.
fn student_card_lines(student: &StudentRecord, selected: bool, width: usize) -> Vec<Line<'static>> {
    let tier_style = Style::default().fg(tier_color(student.tier()));
    let name = if selected {
        format!("▶ {}", student.name)
    } else {
        student.name.clone()
    };

    let mut course_line = vec![
        Span::styled("Course: ", Style::default().fg(Color::Gray)),
        Span::raw(student.course.clone()),
    ];
    if student.is_high_performer() {
        course_line.push(Span::raw("   "));
        course_line.push(Span::styled(
            "★ High Performer",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
    }

    vec![
        Line::from(vec![
            Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(format!("  ID: {}", student.id), Style::default().fg(Color::Gray)),
            Span::raw("  "),
            Span::styled(
                format!("{}%", student.marks),
                tier_style.add_modifier(Modifier::BOLD | Modifier::REVERSED),
            ),
        ]),
        Line::from(course_line),
        Line::from(Span::styled(marks_bar(student.marks, width), tier_style)),
    ]
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::error::LoadError;
    use crate::source::{JsonFileRoster, SampleRoster};

    struct Broken;

    impl RosterSource for Broken {
        fn describe(&self) -> String {
            "broken source".to_string()
        }

        fn load(&self) -> Result<Vec<StudentRecord>, LoadError> {
            Err(LoadError::Unavailable("storage offline".to_string()))
        }
    }

    fn settle(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.is_loading() && Instant::now() < deadline {
            app.poll_load().unwrap();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 60)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn sample_load_reaches_the_roster_screen() {
        let mut app = App::new(Arc::new(SampleRoster));
        settle(&mut app);
        assert!(matches!(app.screen, Screen::Roster(_)));

        let screen = render(&app);
        assert!(screen.contains("Showing 12 of 12 students"));
        assert!(screen.contains("Anjali"));
        assert!(screen.contains("No active filters"));
    }

    #[test]
    fn keys_drive_the_query() {
        let mut app = App::new(Arc::new(SampleRoster));
        settle(&mut app);

        assert!(!app.handle_key(KeyCode::Char('c')).unwrap());
        assert!(!app.handle_key(KeyCode::Char('h')).unwrap());
        assert!(!app.handle_key(KeyCode::Char('s')).unwrap());

        let Screen::Roster(roster) = &app.screen else {
            panic!("roster screen expected");
        };
        let names: Vec<&str> = roster
            .view()
            .unwrap()
            .visible_records
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Sneha", "Anjali"]);
        assert!(render(&app).contains("[Course: Python]"));

        app.handle_key(KeyCode::Char('x')).unwrap();
        assert!(render(&app).contains("Showing 12 of 12 students"));
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn enter_reports_the_selected_student() {
        let mut app = App::new(Arc::new(SampleRoster));
        settle(&mut app);
        app.handle_key(KeyCode::Char('s')).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(
            app.status.as_ref().map(|s| s.text.as_str()),
            Some("Selected Kavya (Java, 94%).")
        );
    }

    #[test]
    fn unknown_course_shows_no_results() {
        let mut app = App::new(Arc::new(SampleRoster));
        settle(&mut app);
        if let Screen::Roster(roster) = &mut app.screen {
            roster.engine.set_course_filter(Some("Haskell".into())).unwrap();
        }
        let screen = render(&app);
        assert!(screen.contains("No students found"));
        assert!(screen.contains("Showing 0 of 12 students"));
    }

    #[test]
    fn failed_load_shows_reason_and_retries() {
        let mut app = App::new(Arc::new(Broken));
        settle(&mut app);
        match &app.screen {
            Screen::LoadFailed { reason } => assert!(reason.contains("storage offline")),
            _ => panic!("load failure expected"),
        }
        assert!(render(&app).contains("Could not load student data"));

        assert!(!app.handle_key(KeyCode::Char('r')).unwrap());
        assert!(app.is_loading());
        settle(&mut app);
        assert!(matches!(app.screen, Screen::LoadFailed { .. }));
    }

    #[test]
    fn missing_file_is_a_load_failure() {
        let mut app = App::new(Arc::new(JsonFileRoster::new("/definitely/not/here.json")));
        settle(&mut app);
        match &app.screen {
            Screen::LoadFailed { reason } => assert!(reason.contains("here.json")),
            _ => panic!("load failure expected"),
        }
    }

    #[test]
    fn quitting_while_loading_cancels() {
        let mut app = App::new(Arc::new(SampleRoster));
        app.cancel_load();
        assert!(!app.is_loading());
        app.poll_load().unwrap();
        assert!(matches!(app.screen, Screen::LoadFailed { .. }));
    }

    #[test]
    fn card_lines_carry_badge_and_bar() {
        let lines = student_card_lines(&StudentRecord::new(7, "Sneha", "Python", 92), true, 10);
        let text: Vec<String> = lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(text[0], "▶ Sneha  ID: 7  92%");
        assert_eq!(text[1], "Course: Python   ★ High Performer");
        assert_eq!(text[2], "█████████░");

        let lines = student_card_lines(&StudentRecord::new(8, "Edge", "Java", 80), false, 4);
        let course: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(course, "Course: Java");
    }
}

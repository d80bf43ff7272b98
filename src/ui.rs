// 🖥️ Record browser - read-only terminal view over clinic snapshots
//
// Three pages (Doctors, Patients, Appointments), each with its own
// selection. The data is copied out of the clinic when the browser opens,
// so nothing here can change a record.

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use rust_decimal::Decimal;
use std::io;

use crate::clinic::Clinic;
use crate::entities::{Appointment, AppointmentStatus, Bill, Doctor, Patient, Specialization};

const PAGE_JUMP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Doctors,
    Patients,
    Appointments,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Doctors, Page::Patients, Page::Appointments];

    pub fn next(&self) -> Self {
        match self {
            Page::Doctors => Page::Patients,
            Page::Patients => Page::Appointments,
            Page::Appointments => Page::Doctors,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Doctors => Page::Appointments,
            Page::Patients => Page::Doctors,
            Page::Appointments => Page::Patients,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Page::Doctors => "Doctors",
            Page::Patients => "Patients",
            Page::Appointments => "Appointments",
        }
    }
}

pub struct App {
    pub doctors: Vec<Doctor>,
    pub visible_doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub tax_rate: Decimal,
    pub current_page: Page,
    pub doctor_state: TableState,
    pub patient_state: TableState,
    pub appointment_state: TableState,
    pub show_detail: bool,
    pub specialization_filter: Option<Specialization>,
}

impl App {
    pub fn new(
        doctors: Vec<Doctor>,
        patients: Vec<Patient>,
        appointments: Vec<Appointment>,
        tax_rate: Decimal,
    ) -> Self {
        let mut app = Self {
            visible_doctors: doctors.clone(),
            doctors,
            patients,
            appointments,
            tax_rate,
            current_page: Page::Doctors,
            doctor_state: TableState::default(),
            patient_state: TableState::default(),
            appointment_state: TableState::default(),
            show_detail: false,
            specialization_filter: None,
        };
        for page in Page::ALL {
            app.current_page = page;
            app.home();
        }
        app.current_page = Page::Doctors;
        app
    }

    /// Snapshot everything currently in the clinic.
    pub fn from_clinic(clinic: &Clinic) -> Self {
        Self::new(
            clinic.doctors.get_all_doctors(),
            clinic.patients.get_all_patients(),
            clinic.appointments.get_all_appointments(),
            clinic.appointments.tax_rate(),
        )
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    // ========================================================================
    // SPECIALIZATION FILTER (Doctors page)
    // ========================================================================

    /// None -> first specialization -> ... -> last -> None.
    pub fn cycle_filter(&mut self) {
        let next = match self.specialization_filter {
            None => Specialization::ALL.first().copied(),
            Some(current) => Specialization::ALL
                .iter()
                .skip_while(|s| **s != current)
                .nth(1)
                .copied(),
        };
        self.apply_filter(next);
    }

    pub fn clear_filter(&mut self) {
        self.apply_filter(None);
    }

    fn apply_filter(&mut self, filter: Option<Specialization>) {
        self.specialization_filter = filter;
        self.visible_doctors = match filter {
            None => self.doctors.clone(),
            Some(spec) => self
                .doctors
                .iter()
                .filter(|d| d.specialization == Some(spec))
                .cloned()
                .collect(),
        };

        let first = if self.visible_doctors.is_empty() { None } else { Some(0) };
        self.doctor_state.select(first);
    }

    // ========================================================================
    // NAVIGATION (acts on the current page)
    // ========================================================================

    pub fn page_len(&self) -> usize {
        match self.current_page {
            Page::Doctors => self.visible_doctors.len(),
            Page::Patients => self.patients.len(),
            Page::Appointments => self.appointments.len(),
        }
    }

    fn state_mut(&mut self) -> &mut TableState {
        match self.current_page {
            Page::Doctors => &mut self.doctor_state,
            Page::Patients => &mut self.patient_state,
            Page::Appointments => &mut self.appointment_state,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        match self.current_page {
            Page::Doctors => self.doctor_state.selected(),
            Page::Patients => self.patient_state.selected(),
            Page::Appointments => self.appointment_state.selected(),
        }
    }

    pub fn next(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        let i = match self.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state_mut().select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        let i = match self.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state_mut().select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.page_len();
        if len == 0 {
            return;
        }
        let i = self
            .selected()
            .map(|i| (i + PAGE_JUMP).min(len - 1))
            .unwrap_or(0);
        self.state_mut().select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.page_len() == 0 {
            return;
        }
        let i = self.selected().map(|i| i.saturating_sub(PAGE_JUMP)).unwrap_or(0);
        self.state_mut().select(Some(i));
    }

    pub fn home(&mut self) {
        let first = if self.page_len() == 0 { None } else { Some(0) };
        self.state_mut().select(first);
    }

    pub fn end(&mut self) {
        let last = self.page_len().checked_sub(1);
        self.state_mut().select(last);
    }

    pub fn selected_doctor(&self) -> Option<&Doctor> {
        self.doctor_state
            .selected()
            .and_then(|i| self.visible_doctors.get(i))
    }

    pub fn selected_patient(&self) -> Option<&Patient> {
        self.patient_state.selected().and_then(|i| self.patients.get(i))
    }

    pub fn selected_appointment(&self) -> Option<&Appointment> {
        self.appointment_state
            .selected()
            .and_then(|i| self.appointments.get(i))
    }

    /// Apply one key press. Returns false when the browser should close.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return false,
            KeyCode::Enter => self.toggle_detail(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    self.previous_page();
                } else {
                    self.next_page();
                }
            }
            KeyCode::Char('s') if self.current_page == Page::Doctors => self.cycle_filter(),
            KeyCode::Char('c') => self.clear_filter(),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::PageDown => self.page_down(),
            KeyCode::PageUp => self.page_up(),
            KeyCode::Home => self.home(),
            KeyCode::End => self.end(),
            _ => {}
        }
        true
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

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            // Windows reports releases too
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if !app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with page tabs
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let (table_area, detail_area) = if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);
        (content_chunks[0], Some(content_chunks[1]))
    } else {
        (chunks[1], None)
    };

    match app.current_page {
        Page::Doctors => render_doctors(f, table_area, app),
        Page::Patients => render_patients(f, table_area, app),
        Page::Appointments => render_appointments(f, table_area, app),
    }
    if let Some(area) = detail_area {
        render_detail_panel(f, area, app);
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        tab_spans.push(Span::styled(page.title(), style));
    }

    let pending = app
        .appointments
        .iter()
        .filter(|a| a.status() == AppointmentStatus::Pending)
        .count();

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!(
            "{} doctors, {} patients, {} appointments",
            app.doctors.len(),
            app.patients.len(),
            app.appointments.len()
        ),
        Style::default().fg(Color::White),
    ));
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("{} pending", pending),
        Style::default().fg(Color::Yellow),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" MediTrack "),
    );
    f.render_widget(header, area);
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });
    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn table_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(title)
}

fn highlight() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

fn render_doctors(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.visible_doctors.iter().map(|d| {
        Row::new(vec![
            Cell::from(d.id.to_string()),
            Cell::from(truncate(&d.name, 28)),
            Cell::from(d.age.to_string()),
            Cell::from(d.specialization.map(|s| s.as_str()).unwrap_or("-")),
            Cell::from(format!("{:.2}", d.consultation_fee)),
        ])
    });

    let title = match app.specialization_filter {
        Some(spec) => format!(" Doctors - {} ", spec),
        None => " Doctors ".to_string(),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(30),
            Constraint::Length(5),
            Constraint::Length(18),
            Constraint::Length(10),
        ],
    )
    .header(header_row(&["ID", "Name", "Age", "Specialization", "Fee"]))
    .block(table_block(title))
    .highlight_style(highlight())
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.doctor_state);
}

fn render_patients(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.patients.iter().map(|p| {
        Row::new(vec![
            Cell::from(p.id.to_string()),
            Cell::from(truncate(&p.name, 28)),
            Cell::from(p.age.to_string()),
            Cell::from(truncate(&p.disease, 30)),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(30),
            Constraint::Length(5),
            Constraint::Length(32),
        ],
    )
    .header(header_row(&["ID", "Name", "Age", "Disease"]))
    .block(table_block(" Patients ".to_string()))
    .highlight_style(highlight())
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.patient_state);
}

fn status_color(status: AppointmentStatus) -> Color {
    match status {
        AppointmentStatus::Pending => Color::Yellow,
        AppointmentStatus::Confirmed => Color::Green,
        AppointmentStatus::Cancelled => Color::Red,
    }
}

fn render_appointments(f: &mut Frame, area: Rect, app: &mut App) {
    let rows = app.appointments.iter().map(|a| {
        Row::new(vec![
            Cell::from(a.id.to_string()),
            Cell::from(a.date.to_string()),
            Cell::from(truncate(&a.patient.name, 22)),
            Cell::from(truncate(&a.doctor.name, 22)),
            Cell::from(a.status().as_str())
                .style(Style::default().fg(status_color(a.status()))),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(12),
            Constraint::Length(24),
            Constraint::Length(24),
            Constraint::Length(11),
        ],
    )
    .header(header_row(&["ID", "Date", "Patient", "Doctor", "Status"]))
    .block(table_block(" Appointments ".to_string()))
    .highlight_style(highlight())
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.appointment_state);
}

fn field(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {}: ", label),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(value),
    ])
}

fn detail_lines(app: &App) -> Option<Vec<Line<'static>>> {
    let lines = match app.current_page {
        Page::Doctors => {
            let d = app.selected_doctor()?;
            vec![
                field("ID", d.id.to_string()),
                field("Name", d.name.clone()),
                field("Age", d.age.to_string()),
                field(
                    "Specialization",
                    d.specialization
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
                field("Fee", format!("{:.2}", d.consultation_fee)),
            ]
        }
        Page::Patients => {
            let p = app.selected_patient()?;
            vec![
                field("ID", p.id.to_string()),
                field("Name", p.name.clone()),
                field("Age", p.age.to_string()),
                field("Disease", p.disease.clone()),
            ]
        }
        Page::Appointments => {
            let a = app.selected_appointment()?;
            let total = Bill::from_appointment(a)
                .and_then(|bill| bill.generate_summary(app.tax_rate))
                .map(|summary| format!("{:.2}", summary.total_amount()))
                .unwrap_or_else(|err| err.to_string());
            vec![
                field("ID", a.id.to_string()),
                field("Date", a.date.to_string()),
                field("Status", a.status().to_string()),
                Line::from(""),
                field("Patient", format!("{} (ID {})", a.patient.name, a.patient.id)),
                field("Disease", a.patient.disease.clone()),
                field("Doctor", format!("{} (ID {})", a.doctor.name, a.doctor.id)),
                field("Fee", format!("{:.2}", a.doctor.consultation_fee)),
                field("Bill total", total),
            ]
        }
    };
    Some(lines)
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Details ");

    let paragraph = match detail_lines(app) {
        Some(lines) => Paragraph::new(lines).block(block),
        None => Paragraph::new("Nothing selected").block(block),
    };
    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.selected().map(|i| i + 1).unwrap_or(0);

    let mut status_spans = vec![Span::styled(
        format!(" Row: {}/{} ", selected, app.page_len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(spec) = app.specialization_filter {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(
            format!("Filter: {}", spec),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw(" ("));
        status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" clear)"));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("s", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Specialization | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );
    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;

    fn sample_app() -> App {
        let smith = Doctor::new(1, "Smith", 40, Some(Specialization::Cardiology), 100.0);
        let grey = Doctor::new(2, "Grey", 38, Some(Specialization::Neurology), 80.0);
        let house = Doctor::new(3, "House", 50, None, 200.0);
        let jones = Patient::new(4, "Jones", 30, "Flu");
        let appointment = Appointment::new(
            5,
            jones.clone(),
            smith.clone(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        App::new(
            vec![smith, grey, house],
            vec![jones],
            vec![appointment],
            Decimal::new(10, 2),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn screen_text(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_pages_cycle_both_ways() {
        let mut app = sample_app();
        assert!(app.handle_key(key(KeyCode::Tab)));
        assert_eq!(app.current_page, Page::Patients);
        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.current_page, Page::Appointments);
        app.handle_key(KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT));
        assert_eq!(app.current_page, Page::Patients);
    }

    #[test]
    fn test_navigation_wraps_and_clamps() {
        let mut app = sample_app();
        assert_eq!(app.selected(), Some(0));

        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.selected(), Some(2));
        app.handle_key(key(KeyCode::Char('j')));
        assert_eq!(app.selected(), Some(0));

        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.selected(), Some(2));
        app.handle_key(key(KeyCode::PageUp));
        assert_eq!(app.selected(), Some(0));
        app.handle_key(key(KeyCode::End));
        assert_eq!(app.selected_doctor().map(|d| d.id), Some(3));
        app.handle_key(key(KeyCode::Home));
        assert_eq!(app.selected(), Some(0));
    }

    #[test]
    fn test_each_page_keeps_its_selection() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::End));
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.selected(), Some(0));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.selected(), Some(2));
    }

    #[test]
    fn test_empty_page_has_no_selection() {
        let mut app = App::new(vec![], vec![], vec![], Decimal::ZERO);
        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::End));
        assert_eq!(app.selected(), None);
        assert!(app.selected_doctor().is_none());
    }

    #[test]
    fn test_specialization_filter_cycles_then_clears() {
        let mut app = sample_app();

        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.specialization_filter, Some(Specialization::Cardiology));
        assert_eq!(app.visible_doctors.len(), 1);

        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.specialization_filter, Some(Specialization::Dermatology));
        assert!(app.visible_doctors.is_empty());
        assert_eq!(app.selected(), None);

        app.handle_key(key(KeyCode::Char('c')));
        assert_eq!(app.specialization_filter, None);
        assert_eq!(app.visible_doctors.len(), 3);
    }

    #[test]
    fn test_filter_wraps_back_to_none() {
        let mut app = sample_app();
        for _ in 0..Specialization::ALL.len() {
            app.cycle_filter();
        }
        assert_eq!(app.specialization_filter, Some(Specialization::GeneralMedicine));
        app.cycle_filter();
        assert_eq!(app.specialization_filter, None);
    }

    #[test]
    fn test_filter_key_only_on_doctors_page() {
        let mut app = sample_app();
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('s')));
        assert_eq!(app.specialization_filter, None);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = sample_app();
        assert!(!app.handle_key(key(KeyCode::Char('q'))));
        assert!(!app.handle_key(key(KeyCode::Esc)));
    }

    #[test]
    fn test_render_doctor_table() {
        let mut app = sample_app();
        let text = screen_text(&mut app);
        assert!(text.contains("Smith"));
        assert!(text.contains("CARDIOLOGY"));
        assert!(text.contains("Row: 1/3"));
    }

    #[test]
    fn test_render_appointment_detail_with_bill() {
        let mut app = sample_app();
        app.current_page = Page::Appointments;
        app.handle_key(key(KeyCode::Enter));
        let text = screen_text(&mut app);
        assert!(text.contains("PENDING"));
        assert!(text.contains("110.00"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long name", 8), "a ver...");
        assert_eq!(truncate("ñññññññ", 5), "ññ...");
    }
}

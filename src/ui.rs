use anyhow::Result;
use course_registry::{
    CourseForm, CourseTypeForm, FormError, RegistrationForm, RelationalStore,
};
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
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame, Terminal,
};
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    CourseTypes,
    Courses,
    Registrations,
}

impl Page {
    pub const ALL: [Page; 4] = [
        Page::Dashboard,
        Page::CourseTypes,
        Page::Courses,
        Page::Registrations,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::Dashboard => Page::CourseTypes,
            Page::CourseTypes => Page::Courses,
            Page::Courses => Page::Registrations,
            Page::Registrations => Page::Dashboard,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Dashboard => Page::Registrations,
            Page::CourseTypes => Page::Dashboard,
            Page::Courses => Page::CourseTypes,
            Page::Registrations => Page::Courses,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::CourseTypes => "Course Types",
            Page::Courses => "Courses",
            Page::Registrations => "Registrations",
        }
    }

    /// Form fields shown on this page, top to bottom
    fn fields(&self) -> &'static [Field] {
        match self {
            Page::Dashboard => &[],
            Page::CourseTypes => &[Field::Text],
            Page::Courses => &[Field::Text, Field::TypeSelect],
            Page::Registrations => &[Field::Text, Field::TypeSelect, Field::CourseSelect],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Text,
    TypeSelect,
    CourseSelect,
}

/// Step through `[None, options...]`, wrapping at both ends
fn cycle(current: Option<&str>, options: &[String], forward: bool) -> Option<String> {
    if options.is_empty() {
        return None;
    }

    let len = options.len() + 1;
    let pos = current
        .and_then(|id| options.iter().position(|o| o == id))
        .map(|i| i + 1)
        .unwrap_or(0);
    let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };

    if next == 0 {
        None
    } else {
        Some(options[next - 1].clone())
    }
}

pub struct App {
    pub store: RelationalStore,
    pub current_page: Page,
    pub focus: usize,
    pub editing: bool,
    pub course_type_form: CourseTypeForm,
    pub course_form: CourseForm,
    pub registration_form: RegistrationForm,
    pub status: Option<Result<String, String>>,
}

impl App {
    pub fn new(store: RelationalStore) -> Self {
        Self {
            store,
            current_page: Page::Dashboard,
            focus: 0,
            editing: false,
            course_type_form: CourseTypeForm::default(),
            course_form: CourseForm::default(),
            registration_form: RegistrationForm::default(),
            status: None,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
        self.focus = 0;
        self.editing = false;
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
        self.focus = 0;
        self.editing = false;
    }

    pub fn focused_field(&self) -> Option<Field> {
        self.current_page.fields().get(self.focus).copied()
    }

    pub fn focus_next(&mut self) {
        let len = self.current_page.fields().len();
        if len > 0 {
            self.focus = (self.focus + 1) % len;
        }
    }

    pub fn focus_previous(&mut self) {
        let len = self.current_page.fields().len();
        if len > 0 {
            self.focus = (self.focus + len - 1) % len;
        }
    }

    fn text_mut(&mut self) -> Option<&mut String> {
        match self.current_page {
            Page::Dashboard => None,
            Page::CourseTypes => Some(&mut self.course_type_form.name),
            Page::Courses => Some(&mut self.course_form.name),
            Page::Registrations => Some(&mut self.registration_form.student_name),
        }
    }

    pub fn type_option_ids(&self) -> Vec<String> {
        self.store
            .list_course_types()
            .into_iter()
            .map(|t| t.id)
            .collect()
    }

    pub fn course_option_ids(&self) -> Vec<String> {
        if !self.registration_form.course_selection_enabled() {
            return Vec::new();
        }
        self.registration_form
            .course_options(&self.store)
            .into_iter()
            .map(|view| view.course.id)
            .collect()
    }

    /// Cycle the focused selector
    pub fn cycle_selection(&mut self, forward: bool) {
        match (self.current_page, self.focused_field()) {
            (Page::Courses, Some(Field::TypeSelect)) => {
                let options = self.type_option_ids();
                self.course_form.type_id =
                    cycle(self.course_form.type_id.as_deref(), &options, forward);
            }
            (Page::Registrations, Some(Field::TypeSelect)) => {
                let options = self.type_option_ids();
                let next = cycle(
                    self.registration_form.type_filter.as_deref(),
                    &options,
                    forward,
                );
                self.registration_form.set_type_filter(&self.store, next);
            }
            (Page::Registrations, Some(Field::CourseSelect)) => {
                let options = self.course_option_ids();
                self.registration_form.course_id = cycle(
                    self.registration_form.course_id.as_deref(),
                    &options,
                    forward,
                );
            }
            _ => {}
        }
    }

    pub fn submit(&mut self) {
        let result: Result<String, FormError> = match self.current_page {
            Page::Dashboard => return,
            Page::CourseTypes => self
                .course_type_form
                .submit(&self.store)
                .map(|t| format!("Added course type {}", t.name)),
            Page::Courses => self
                .course_form
                .submit(&self.store)
                .map(|c| format!("Added course {}", c.name)),
            Page::Registrations => self
                .registration_form
                .submit(&self.store)
                .map(|r| format!("Registered {}", r.student_name)),
        };

        if result.is_ok() {
            self.focus = 0;
            self.editing = false;
        }
        self.status = Some(result.map_err(|e| e.to_string()));
    }

    /// Apply one key press; returns true when the app should quit
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.editing {
            match key.code {
                KeyCode::Esc => self.editing = false,
                KeyCode::Enter => self.submit(),
                KeyCode::Backspace => {
                    if let Some(text) = self.text_mut() {
                        text.pop();
                    }
                }
                KeyCode::Char(c) => {
                    if let Some(text) = self.text_mut() {
                        text.push(c);
                    }
                }
                _ => {}
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.next_page(),
            KeyCode::BackTab => self.previous_page(),
            KeyCode::Char('i') if self.focused_field() == Some(Field::Text) => {
                self.editing = true;
            }
            KeyCode::Down | KeyCode::Char('j') => self.focus_next(),
            KeyCode::Up | KeyCode::Char('k') => self.focus_previous(),
            KeyCode::Right | KeyCode::Char('l') => self.cycle_selection(true),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_selection(false),
            KeyCode::Enter => self.submit(),
            _ => {}
        }
        false
    }

    fn type_name(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.store.resolve_course_type(id))
            .map(|t| t.name)
            .unwrap_or_else(|| "Select Course Type".to_string())
    }

    fn course_label(&self, id: Option<&str>) -> String {
        id.and_then(|id| {
            self.registration_form
                .course_options(&self.store)
                .into_iter()
                .find(|view| view.course.id == id)
        })
        .map(|view| view.label())
        .unwrap_or_else(|| "Select Course".to_string())
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Ok(());
            }
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Dashboard => render_dashboard(f, chunks[1], app),
        _ => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(chunks[1]);

            render_form(f, content_chunks[0], app);
            render_list(f, content_chunks[1], app);
        }
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![Span::styled(
        "Course Management System  ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

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

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    let header = Paragraph::new(vec![Line::from(tab_spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, area: Rect, app: &App) {
    let stats = app.store.stats();
    let cards = [
        (Page::CourseTypes, stats.course_types, Color::Blue),
        (Page::Courses, stats.courses, Color::Green),
        (Page::Registrations, stats.registrations, Color::Magenta),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for ((page, count, color), column) in cards.into_iter().zip(columns.iter()) {
        let content = vec![
            Line::from(""),
            Line::from(Span::styled(
                count.to_string(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("Tab to manage", Style::default().fg(Color::DarkGray))),
        ];

        let card = Paragraph::new(content)
            .alignment(ratatui::layout::Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color))
                    .title(format!(" {} ", page.title())),
            );

        f.render_widget(card, *column);
    }
}

fn field_line(app: &App, field: Field, label: &str, value: String, enabled: bool) -> Line<'static> {
    let focused = app.focused_field() == Some(field);
    let marker = if focused { "→ " } else { "  " };

    let value_style = if !enabled {
        Style::default().fg(Color::DarkGray)
    } else if focused && app.editing {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if focused {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    let shown = if field == Field::Text && focused && app.editing {
        format!("{}_", value)
    } else if field == Field::Text {
        value
    } else {
        format!("◀ {} ▶", value)
    };

    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{:<14}", label), Style::default().fg(Color::Cyan)),
        Span::styled(shown, value_style),
    ])
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from("")];

    match app.current_page {
        Page::Dashboard => {}
        Page::CourseTypes => {
            lines.push(field_line(
                app,
                Field::Text,
                "Course Type",
                app.course_type_form.name.clone(),
                true,
            ));
        }
        Page::Courses => {
            lines.push(field_line(
                app,
                Field::Text,
                "Course Name",
                app.course_form.name.clone(),
                true,
            ));
            lines.push(field_line(
                app,
                Field::TypeSelect,
                "Course Type",
                app.type_name(app.course_form.type_id.as_deref()),
                true,
            ));
        }
        Page::Registrations => {
            let form = &app.registration_form;
            lines.push(field_line(
                app,
                Field::Text,
                "Student Name",
                form.student_name.clone(),
                true,
            ));
            lines.push(field_line(
                app,
                Field::TypeSelect,
                "Course Type",
                app.type_name(form.type_filter.as_deref()),
                true,
            ));
            lines.push(field_line(
                app,
                Field::CourseSelect,
                "Course",
                app.course_label(form.course_id.as_deref()),
                form.course_selection_enabled(),
            ));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Enter to submit",
        Style::default().fg(Color::Green),
    )));

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Add {} ", app.current_page.title())),
    );

    f.render_widget(form, area);
}

fn render_list(f: &mut Frame, area: Rect, app: &App) {
    let labels: Vec<String> = match app.current_page {
        Page::Dashboard => Vec::new(),
        Page::CourseTypes => app
            .store
            .list_course_types()
            .into_iter()
            .map(|t| t.name)
            .collect(),
        Page::Courses => app
            .store
            .joined_course_view()
            .iter()
            .map(|view| view.label())
            .collect(),
        Page::Registrations => app
            .store
            .joined_registration_view()
            .iter()
            .map(|view| view.label())
            .collect(),
    };

    let items: Vec<ListItem> = labels.into_iter().map(ListItem::new).collect();
    let count = items.len();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" {} ({}) ", app.current_page.title(), count)),
    );

    f.render_widget(list, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    match &app.status {
        Some(Ok(message)) => {
            status_spans.push(Span::styled(format!(" ✓ {} ", message), Style::default().fg(Color::Green)));
            status_spans.push(Span::raw("|"));
        }
        Some(Err(message)) => {
            status_spans.push(Span::styled(format!(" ✗ {} ", message), Style::default().fg(Color::Red)));
            status_spans.push(Span::raw("|"));
        }
        None => {}
    }

    if app.editing {
        status_spans.push(Span::raw(" Typing | "));
        status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Submit | "));
        status_spans.push(Span::styled("Esc", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Done"));
    } else {
        status_spans.push(Span::raw(" "));
        status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Page | "));
        status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Field | "));
        status_spans.push(Span::styled("i", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Edit | "));
        status_spans.push(Span::styled("←/→", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Select | "));
        status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
        status_spans.push(Span::raw(" Quit"));
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

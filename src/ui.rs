use crate::check_in::{CheckIn, CheckInDraft, Mood, FACTOR_TAGS};
use crate::history::TrendField;
use crate::journal::{Journal, SubmitOutcome};
use crate::classifier::ClassificationSource;
use crate::safety::CrisisResource;
use crate::screening::{Screening, QUESTIONS};
use crate::sentiment::ScoreBand;
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Sparkline, Wrap},
    Frame, Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub enum Action {
    Write,
    View,
    Screening,
    Quit,
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    cursor_position: usize,
    cursor_visible: bool,
    last_cursor_update: Instant,
}

fn title(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
}

fn instructions(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

/// Cuts `text` to at most `width` terminal columns, the trailing `…`
/// included.
fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    if width > 0 {
        out.push('…');
    }
    out
}

fn byte_index(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn crisis_lines(resources: &[CrisisResource]) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        "You're not alone. Reach out to someone you trust, or contact:",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        resources
            .iter()
            .map(|r| Line::from(format!("  • {}: {}", r.name, r.contact))),
    );
    lines
}

fn render_crisis_banner(f: &mut Frame, area: Rect, resources: &[CrisisResource]) {
    let banner = Paragraph::new(crisis_lines(resources))
        .style(Style::default().fg(Color::Red))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Support is available"),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(banner, area);
}

fn entry_item(entry: &CheckIn, width: usize) -> ListItem<'static> {
    let badge = entry
        .sentiment
        .as_ref()
        .map(|s| {
            let b = s.sentiment.badge();
            format!("{} {}", b.emoji, b.label)
        })
        .unwrap_or_else(|| "…".to_string());
    let mismatch = match &entry.mood_match {
        Some(m) if !m.matches => " ≠",
        _ => "",
    };
    let header = format!(
        "[{}] {} · {}{}",
        entry.timestamp.format("%Y-%m-%d %H:%M"),
        entry.selected_mood,
        badge,
        mismatch
    );
    ListItem::new(vec![
        Line::from(Span::raw(header)),
        Line::from(Span::raw(format!(
            "  {}",
            truncate_to_width(entry.headline(), width.saturating_sub(4))
        ))),
        Line::from(Span::styled(
            format!("  Factors: {}", entry.factors.join(", ")),
            Style::default().fg(Color::DarkGray),
        )),
    ])
}

fn average_line(label: &str, average: Option<f64>) -> Line<'static> {
    match average {
        Some(avg) => Line::from(format!(
            "{label}: {avg:.1} ({})",
            ScoreBand::from_score(avg).label()
        )),
        None => Line::from(format!("{label}: -")),
    }
}

fn render_trends(f: &mut Frame, area: Rect, journal: &Journal) {
    let series = journal.series();
    let mood: Vec<u64> = series.iter().map(|p| u64::from(p.mood_score)).collect();
    let text: Vec<u64> = series
        .iter()
        .map(|p| u64::from(p.text_score.unwrap_or(0)))
        .collect();
    let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(4),
            Constraint::Min(4),
            Constraint::Length(5),
        ])
        .split(area);

    let mood_line = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title("How you said you felt"))
        .data(&mood)
        .max(10)
        .style(Style::default().fg(Color::Magenta));
    f.render_widget(mood_line, chunks[0]);

    let text_line = Sparkline::default()
        .block(Block::default().borders(Borders::ALL).title("What your words said"))
        .data(&text)
        .max(10)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(text_line, chunks[1]);

    let stats = Paragraph::new(vec![
        Line::from(labels.join(" ")),
        average_line("Mood average", journal.average(TrendField::MoodScore)),
        average_line("Text average", journal.average(TrendField::TextScore)),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Last {} check-ins", journal.trend_window())),
    );
    f.render_widget(stats, chunks[2]);
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI {
            terminal,
            cursor_position: 0,
            cursor_visible: true,
            last_cursor_update: Instant::now(),
        })
    }

    pub fn display(&mut self, journal: &Journal) -> Result<()> {
        self.terminal.draw(|f| {
            let alerting = journal.alert().is_alerting();
            let banner_height = if alerting {
                journal.crisis_resources().len() as u16 + 3
            } else {
                0
            };
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(banner_height),
                    Constraint::Min(0),
                    Constraint::Length(3),
                ])
                .split(f.area());

            f.render_widget(title("Mood Journal"), chunks[0]);
            if alerting {
                render_crisis_banner(f, chunks[1], journal.crisis_resources());
            }

            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[2]);

            let width = body[0].width as usize;
            let entries: Vec<ListItem> = journal
                .history()
                .entries()
                .iter()
                .rev()
                .map(|entry| entry_item(entry, width))
                .collect();
            let analysis = if journal.is_remote() {
                "Check-ins (online analysis)"
            } else {
                "Check-ins (offline analysis)"
            };
            let entries_list =
                List::new(entries).block(Block::default().borders(Borders::ALL).title(analysis));
            f.render_widget(entries_list, body[0]);

            render_trends(f, body[1], journal);

            let key = |k: &'static str| Span::styled(k, Style::default().add_modifier(Modifier::BOLD));
            let mut controls = vec![Span::raw("Press "), key("w"), Span::raw(" to check in, ")];
            if !journal.history().is_empty() {
                controls.extend([key("v"), Span::raw(" to view, ")]);
            }
            controls.extend([
                key("s"),
                Span::raw(" for wellness screening, "),
                key("q"),
                Span::raw(" to quit"),
            ]);
            let controls_paragraph = Paragraph::new(Line::from(controls))
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            f.render_widget(controls_paragraph, chunks[3]);
        })?;

        Ok(())
    }

    pub fn handle_input(&self, journal: &Journal) -> Result<Option<Action>> {
        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('w') => Ok(Some(Action::Write)),
                KeyCode::Char('s') => Ok(Some(Action::Screening)),
                KeyCode::Char('q') => Ok(Some(Action::Quit)),
                KeyCode::Char('v') if !journal.history().is_empty() => Ok(Some(Action::View)),
                _ => Ok(None),
            }
        } else {
            Ok(None)
        }
    }

    /// Walks through mood, factors and journal text. `None` when cancelled.
    pub fn get_new_check_in(&mut self) -> Result<Option<CheckInDraft>> {
        let Some(mood) = self.select_mood()? else {
            return Ok(None);
        };
        let Some(factors) = self.select_factors()? else {
            return Ok(None);
        };
        let content = self.edit_text()?;
        Ok(Some(CheckInDraft::new(mood, content).with_factors(factors)))
    }

    fn select_mood(&mut self) -> Result<Option<Mood>> {
        let mut selected = 2;
        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("How are you feeling today?"), chunks[0]);

                let spans: Vec<Span> = Mood::ALL
                    .iter()
                    .enumerate()
                    .map(|(i, mood)| {
                        let style = if i == selected {
                            Style::default()
                                .fg(Color::Magenta)
                                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                        } else {
                            Style::default().fg(Color::Gray)
                        };
                        Span::styled(format!("  {}  ", mood.label()), style)
                    })
                    .collect();
                let moods = Paragraph::new(Line::from(spans))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(moods, chunks[1]);

                f.render_widget(
                    instructions("Left/Right: Choose, Enter: Next, Esc: Cancel"),
                    chunks[3],
                );
            })?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Left => selected = selected.saturating_sub(1),
                    KeyCode::Right => selected = (selected + 1).min(Mood::ALL.len() - 1),
                    KeyCode::Enter => return Ok(Some(Mood::ALL[selected])),
                    KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
        }
    }

    fn select_factors(&mut self) -> Result<Option<Vec<String>>> {
        let mut cursor = 0;
        let mut chosen = vec![false; FACTOR_TAGS.len()];
        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(0),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("What's affecting you?"), chunks[0]);

                let spans: Vec<Span> = FACTOR_TAGS
                    .iter()
                    .enumerate()
                    .map(|(i, tag)| {
                        let mark = if chosen[i] { "[x]" } else { "[ ]" };
                        let mut style = Style::default();
                        if chosen[i] {
                            style = style.fg(Color::Magenta);
                        }
                        if i == cursor {
                            style = style.add_modifier(Modifier::REVERSED);
                        }
                        Span::styled(format!(" {mark} {tag} "), style)
                    })
                    .collect();
                let tags = Paragraph::new(Line::from(spans))
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(tags, chunks[1]);

                f.render_widget(
                    instructions("Left/Right: Move, Space: Toggle, Enter: Next, Esc: Cancel"),
                    chunks[3],
                );
            })?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Left => cursor = cursor.saturating_sub(1),
                    KeyCode::Right => cursor = (cursor + 1).min(FACTOR_TAGS.len() - 1),
                    KeyCode::Char(' ') => chosen[cursor] = !chosen[cursor],
                    KeyCode::Enter => {
                        let factors = FACTOR_TAGS
                            .iter()
                            .zip(&chosen)
                            .filter(|(_, on)| **on)
                            .map(|(tag, _)| tag.to_string())
                            .collect();
                        return Ok(Some(factors));
                    }
                    KeyCode::Esc => return Ok(None),
                    _ => {}
                }
            }
        }
    }

    fn edit_text(&mut self) -> Result<String> {
        let mut content = String::new();
        self.cursor_position = 0;
        let mut last_content_update = Instant::now();

        loop {
            let now = Instant::now();
            let should_update_cursor =
                now.duration_since(self.last_cursor_update) >= Duration::from_millis(500);
            let should_redraw = should_update_cursor
                || now.duration_since(last_content_update) < Duration::from_millis(50);

            if should_redraw {
                self.terminal.draw(|f| {
                    let chunks = Layout::default()
                        .direction(Direction::Vertical)
                        .margin(1)
                        .constraints([
                            Constraint::Length(3),
                            Constraint::Min(10),
                            Constraint::Length(3),
                        ])
                        .split(f.area());

                    f.render_widget(title("Write it out"), chunks[0]);

                    let content_with_cursor = if self.cursor_visible {
                        let mut content_clone = content.clone();
                        content_clone.insert(byte_index(&content, self.cursor_position), '|');
                        content_clone
                    } else {
                        content.clone()
                    };
                    let content_input = Paragraph::new(content_with_cursor)
                        .wrap(Wrap { trim: false })
                        .block(Block::default().borders(Borders::ALL).title("Journal"));
                    f.render_widget(content_input, chunks[1]);

                    f.render_widget(instructions("Press Esc to finish"), chunks[2]);
                })?;

                if should_update_cursor {
                    self.cursor_visible = !self.cursor_visible;
                    self.last_cursor_update = now;
                }
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    let len = content.chars().count();
                    match key.code {
                        KeyCode::Esc => break,
                        KeyCode::Char(c) => {
                            content.insert(byte_index(&content, self.cursor_position), c);
                            self.cursor_position += 1;
                        }
                        KeyCode::Enter => {
                            content.insert(byte_index(&content, self.cursor_position), '\n');
                            self.cursor_position += 1;
                        }
                        KeyCode::Backspace if self.cursor_position > 0 => {
                            self.cursor_position -= 1;
                            content.remove(byte_index(&content, self.cursor_position));
                        }
                        KeyCode::Delete if self.cursor_position < len => {
                            content.remove(byte_index(&content, self.cursor_position));
                        }
                        KeyCode::Left => {
                            self.cursor_position = self.cursor_position.saturating_sub(1);
                        }
                        KeyCode::Right => {
                            self.cursor_position = (self.cursor_position + 1).min(len);
                        }
                        _ => continue,
                    }
                    last_content_update = Instant::now();
                }
            }
        }

        Ok(content)
    }

    pub fn show_outcome(&mut self, outcome: &SubmitOutcome, resources: &[CrisisResource]) -> Result<()> {
        loop {
            self.terminal.draw(|f| {
                let alerting = outcome.alert.is_alerting();
                let banner_height = if alerting { resources.len() as u16 + 3 } else { 0 };
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(8),
                        Constraint::Length(banner_height),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("Check-in saved"), chunks[0]);

                let badge = outcome.sentiment.sentiment.badge();
                let verdict_style = if outcome.verdict.matches {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Yellow)
                };
                let source = match &outcome.source {
                    ClassificationSource::Remote => "Analysed online".to_string(),
                    ClassificationSource::EmptyInput => "Nothing written to analyse".to_string(),
                    ClassificationSource::Fallback(reason) => format!("Analysed offline ({reason})"),
                };
                let mood = outcome.check_in.selected_mood;
                let mut lines = vec![
                    Line::from(format!("Sentiment: {} {}", badge.emoji, badge.label)),
                    Line::from(format!(
                        "You chose {mood} (expects {}), your words read {}",
                        mood.expected_sentiment(),
                        outcome.sentiment.sentiment
                    )),
                    Line::from(format!(
                        "Mood score {} / text score {}",
                        outcome.verdict.mood_score, outcome.verdict.text_score
                    )),
                    Line::from(""),
                    Line::from(Span::styled(outcome.verdict.message.clone(), verdict_style)),
                    Line::from(""),
                    Line::from(Span::styled(source, Style::default().fg(Color::DarkGray))),
                ];
                if badge.needs_support && !alerting {
                    lines.insert(
                        4,
                        Line::from("Be gentle with yourself today. Talking to someone can help."),
                    );
                }
                let body = Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL));
                f.render_widget(body, chunks[1]);

                if alerting {
                    render_crisis_banner(f, chunks[2], resources);
                }

                f.render_widget(instructions("Press any key to continue"), chunks[3]);
            })?;

            if let Event::Key(_) = event::read()? {
                break;
            }
        }

        Ok(())
    }

    /// Shown when a check-in could not be saved; nothing was recorded.
    pub fn show_error(&mut self, message: &str) -> Result<()> {
        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(5),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("Check-in not saved"), chunks[0]);
                let body = Paragraph::new(vec![
                    Line::from(Span::styled(message.to_string(), Style::default().fg(Color::Red))),
                    Line::from(""),
                    Line::from("Nothing was recorded. You can try writing it again."),
                ])
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
                f.render_widget(body, chunks[1]);
                f.render_widget(instructions("Press any key to continue"), chunks[2]);
            })?;

            if let Event::Key(_) = event::read()? {
                break;
            }
        }

        Ok(())
    }

    pub fn view_entries(&mut self, journal: &Journal) -> Result<()> {
        let entries = journal.history().entries();
        let mut selected_index = entries.len().saturating_sub(1);

        loop {
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Min(10),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                f.render_widget(title("View Check-ins"), chunks[0]);

                let width = chunks[1].width as usize;
                let items: Vec<ListItem> = entries.iter().map(|e| entry_item(e, width)).collect();

                let entries_list = List::new(items)
                    .block(Block::default().borders(Borders::ALL).title("Check-ins"))
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");

                f.render_stateful_widget(
                    entries_list,
                    chunks[1],
                    &mut ListState::default().with_selected(Some(selected_index)),
                );

                f.render_widget(
                    instructions("Up/Down: Navigate, Enter: View full entry, Esc: Back"),
                    chunks[2],
                );
            })?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                    KeyCode::Down => {
                        if selected_index + 1 < entries.len() {
                            selected_index += 1;
                        }
                    }
                    KeyCode::Enter => {
                        if let Some(entry) = entries.get(selected_index) {
                            self.view_full_entry(entry)?;
                        }
                    }
                    KeyCode::Esc => break,
                    _ => {}
                }
            }
        }

        Ok(())
    }

    fn view_full_entry(&mut self, entry: &CheckIn) -> Result<()> {
        self.terminal.draw(|f| {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(10),
                    Constraint::Length(4),
                    Constraint::Length(3),
                ])
                .split(f.area());

            let heading = format!(
                "{} check-in from {}",
                entry.selected_mood,
                entry.timestamp.format("%Y-%m-%d %H:%M"),
            );
            f.render_widget(title(&heading), chunks[0]);

            let content = Paragraph::new(entry.journal_text.clone())
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title("Journal"));
            f.render_widget(content, chunks[1]);

            let verdict = entry
                .mood_match
                .as_ref()
                .map(|m| m.message.clone())
                .unwrap_or_default();
            let sentiment = entry
                .sentiment
                .as_ref()
                .map(|s| s.sentiment.badge().label)
                .unwrap_or("Not analysed");
            let details = Paragraph::new(vec![Line::from(sentiment), Line::from(verdict)])
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(details, chunks[2]);

            f.render_widget(instructions("Press any key to go back"), chunks[3]);
        })?;

        loop {
            if let Event::Key(_) = event::read()? {
                break;
            }
        }

        Ok(())
    }

    pub fn run_screening(&mut self, resources: &[CrisisResource]) -> Result<()> {
        let mut screening = Screening::new();
        let mut selected = 0;

        while let Some(question) = screening.current_question() {
            let number = screening.answered() + 1;
            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(4),
                        Constraint::Min(6),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                let heading = format!("Wellness Screening {number}/{}", QUESTIONS.len());
                f.render_widget(title(&heading), chunks[0]);

                let prompt = Paragraph::new(question.prompt)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::ALL).title("In the past 7 days"));
                f.render_widget(prompt, chunks[1]);

                let options: Vec<ListItem> =
                    question.options.iter().map(|o| ListItem::new(*o)).collect();
                let list = List::new(options)
                    .block(Block::default().borders(Borders::ALL))
                    .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                    .highlight_symbol("> ");
                f.render_stateful_widget(
                    list,
                    chunks[2],
                    &mut ListState::default().with_selected(Some(selected)),
                );

                f.render_widget(
                    instructions("Up/Down: Choose, Enter: Answer, Esc: Leave"),
                    chunks[3],
                );
            })?;

            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Up => selected = selected.saturating_sub(1),
                    KeyCode::Down => selected = (selected + 1).min(question.options.len() - 1),
                    KeyCode::Enter => {
                        screening.answer(selected)?;
                        selected = 0;
                    }
                    KeyCode::Esc => return Ok(()),
                    _ => {}
                }
            }
        }

        let Some(result) = screening.result() else {
            return Ok(());
        };

        self.terminal.draw(|f| {
            let banner_height = if result.high_risk { resources.len() as u16 + 3 } else { 0 };
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(5),
                    Constraint::Length(banner_height),
                    Constraint::Length(3),
                ])
                .split(f.area());

            f.render_widget(title("Screening Complete"), chunks[0]);

            let summary = if result.high_risk {
                "Your answers suggest you may benefit from speaking with a healthcare provider."
            } else {
                "Your score is in the low range. Keep checking in with yourself."
            };
            let body = Paragraph::new(vec![
                Line::from(format!("Score: {} / 30", result.total)),
                Line::from(""),
                Line::from(summary),
            ])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(body, chunks[1]);

            if result.high_risk {
                render_crisis_banner(f, chunks[2], resources);
            }

            f.render_widget(instructions("Press any key to go back"), chunks[3]);
        })?;

        loop {
            if let Event::Key(_) = event::read()? {
                break;
            }
        }

        Ok(())
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = stdout().execute(LeaveAlternateScreen);
    }
}

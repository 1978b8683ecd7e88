use crate::app::App;
use crate::diary_entry::{DiaryEntry, Mood};
use crate::notify::ToastKind;
use crate::session::AuthField;
use crate::view::View;
use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn ui(f: &mut Frame, app: &App) {
    match app.view() {
        View::Auth => render_auth(f, app),
        View::Composer => render_composer(f, app),
        View::List => render_list(f, app),
    }
    render_toasts(f, app);
}

fn clamp_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn title(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
}

fn instructions(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
}

fn mood_color(mood: Mood) -> Color {
    match mood {
        Mood::Positive => Color::Green,
        Mood::Neutral => Color::Gray,
        Mood::Negative => Color::Red,
    }
}

fn mood_badge(mood: Mood) -> Span<'static> {
    let face = if mood == Mood::Negative { ":(" } else { ":)" };
    Span::styled(
        format!(" {face} {} ", mood.label()),
        Style::default()
            .fg(Color::Black)
            .bg(mood_color(mood))
            .add_modifier(Modifier::BOLD),
    )
}

fn render_auth(f: &mut Frame, app: &App) {
    let form = &app.auth_form;
    let mut constraints = vec![Constraint::Length(2), Constraint::Length(2)];
    constraints.extend(form.fields().iter().map(|field| {
        if field.is_text() {
            Constraint::Length(3)
        } else {
            Constraint::Length(1)
        }
    }));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(f.area());

    f.render_widget(title("AI Diary"), chunks[0]);
    f.render_widget(
        Paragraph::new("Document your journey with AI").alignment(Alignment::Center),
        chunks[1],
    );

    for (i, field) in form.fields().into_iter().enumerate() {
        let area = chunks[i + 2];
        let focused = form.focus == field;
        let highlight = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        match field {
            AuthField::Name | AuthField::Email | AuthField::Password => {
                let (label, value) = match field {
                    AuthField::Name => ("Full Name", form.name.clone()),
                    AuthField::Email => ("Email", form.email.clone()),
                    _ => ("Password", "*".repeat(form.password.chars().count())),
                };
                let input = Paragraph::new(value.clone()).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(label)
                        .border_style(highlight),
                );
                f.render_widget(input, area);
                if focused {
                    f.set_cursor_position((area.x + 1 + value.width() as u16, area.y + 1));
                }
            }
            _ => {
                let text = match field {
                    AuthField::Submit if app.is_authenticating() => "Please wait...",
                    AuthField::Submit if form.sign_up => "Sign Up",
                    AuthField::Submit => "Login",
                    AuthField::Google => "Continue with Google",
                    AuthField::Guest => "Continue as Guest",
                    _ if form.sign_up => "Already have an account? Login",
                    _ => "Don't have an account? Sign Up",
                };
                let style = if app.is_authenticating() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    highlight
                };
                let marker = if focused { "> " } else { "  " };
                f.render_widget(
                    Paragraph::new(format!("{marker}{text}"))
                        .style(style)
                        .alignment(Alignment::Center),
                    area,
                );
            }
        }
    }

    let last = chunks.len() - 1;
    f.render_widget(
        instructions("Tab/Up/Down: Move, Enter: Select, Esc: Quit"),
        chunks[last],
    );
}

fn render_composer(f: &mut Frame, app: &App) {
    let editor = app.editor();
    let insights = app.insights();

    let mut constraints = vec![
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Min(5),
    ];
    if insights.is_some() {
        constraints.push(Constraint::Length(5));
    }
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(f.area());

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            "New Entry",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::raw(Local::now().format("%A, %B %-d, %Y").to_string()),
            Span::raw("  "),
            mood_badge(editor.mood()),
        ]),
    ])
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    let status = if app.is_saving() {
        "Saving...".to_string()
    } else if let Some(saved) = app.last_saved() {
        format!("Last saved {}", saved.format("%H:%M:%S"))
    } else {
        String::new()
    };
    f.render_widget(
        Paragraph::new(status)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        chunks[1],
    );

    let body = if editor.content().is_empty() {
        Paragraph::new(Span::styled(
            "Dear Diary...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Paragraph::new(editor.content())
    };
    let (line, col) = editor.cursor_line_col();
    let line_text = editor.content().split('\n').nth(line).unwrap_or("");
    let col_width: usize = line_text.chars().take(col).filter_map(|c| c.width()).sum();

    // Scroll just far enough to keep the cursor inside the borders.
    let inner_height = usize::from(chunks[2].height.saturating_sub(2)).max(1);
    let inner_width = usize::from(chunks[2].width.saturating_sub(2)).max(1);
    let scroll_y = line.saturating_sub(inner_height - 1);
    let scroll_x = col_width.saturating_sub(inner_width - 1);
    f.render_widget(
        body.block(Block::default().borders(Borders::ALL).title("Content"))
            .scroll((clamp_u16(scroll_y), clamp_u16(scroll_x))),
        chunks[2],
    );
    f.set_cursor_position((
        chunks[2].x + 1 + clamp_u16(col_width - scroll_x),
        chunks[2].y + 1 + clamp_u16(line - scroll_y),
    ));

    let mut next = 3;
    if let Some(insights) = insights {
        let panel = Paragraph::new(vec![
            Line::from(vec![
                Span::raw("Emotional Tone: "),
                Span::styled(
                    insights.tone.label(),
                    Style::default().fg(mood_color(insights.tone)),
                ),
            ]),
            Line::from(format!("Reading Time: {} min", insights.reading_minutes)),
            Line::from(format!("Word Count: {}", insights.word_count)),
        ])
        .block(Block::default().borders(Borders::ALL).title("AI Insights"));
        f.render_widget(panel, chunks[next]);
        next += 1;
    }

    let analyze = if app.is_analyzing() {
        "Analyzing..."
    } else {
        "Analyze with AI"
    };
    let export = if app.is_exporting() {
        "Exporting..."
    } else {
        "Export"
    };
    f.render_widget(
        instructions(&format!(
            "Ctrl-S: Save, Ctrl-A: {analyze}, Ctrl-E: {export}, Esc: Close"
        )),
        chunks[next],
    );
}

fn entry_item(entry: &DiaryEntry, width: usize) -> ListItem<'static> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            entry.date.format("%b %-d, %Y").to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        mood_badge(entry.mood),
    ])];
    lines.extend(
        entry
            .content
            .lines()
            .filter(|l| !l.trim().is_empty())
            .take(2)
            .map(|l| Line::from(truncate(l, width))),
    );
    lines.push(Line::from(Span::styled(
        format!(
            "{} words • {} min read",
            entry.word_count(),
            entry.reading_minutes()
        ),
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    ListItem::new(lines)
}

/// Cut `text` to at most `width` terminal columns.
fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn render_list(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    f.render_widget(title("AI Diary"), chunks[0]);

    let entries = app.entries().get_entries();
    if entries.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(Span::styled(
                "No entries yet",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from("Start writing your thoughts..."),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Entries"));
        f.render_widget(empty, chunks[1]);
        f.render_widget(instructions("n: New entry, q: Quit"), chunks[2]);
        return;
    }

    let width = chunks[1].width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = entries.iter().map(|e| entry_item(e, width)).collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Entries ({})", entries.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");
    f.render_stateful_widget(
        list,
        chunks[1],
        &mut ListState::default().with_selected(Some(app.selected)),
    );

    f.render_widget(
        instructions("Up/Down: Navigate, Enter: Open, n: New entry, d: Delete, q: Quit"),
        chunks[2],
    );
}

fn render_toasts(f: &mut Frame, app: &App) {
    if app.toasts.is_empty() {
        return;
    }
    let lines: Vec<Line> = app
        .toasts
        .iter()
        .map(|t| {
            let color = match t.kind {
                ToastKind::Success => Color::Green,
                ToastKind::Error => Color::Red,
            };
            Line::from(Span::styled(t.message.clone(), Style::default().fg(color)))
        })
        .collect();

    let area = f.area();
    let width = lines
        .iter()
        .map(|l| l.width() as u16 + 4)
        .max()
        .unwrap_or(0)
        .min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = Rect::new(area.x + area.width - width, area.y, width, height);

    f.render_widget(Clear, rect);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL)),
        rect,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::diary_state::DiaryState;
    use crate::services::Services;
    use ratatui::{backend::TestBackend, Terminal};

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with(entries: DiaryState) -> App {
        let config = Config::default();
        App::new(&config, Services::simulated(&config), entries).0
    }

    #[tokio::test(start_paused = true)]
    async fn auth_screen_shows_login_buttons() {
        let app = app_with(DiaryState::new());
        let text = screen(&app);
        assert!(text.contains("AI Diary"));
        assert!(text.contains("Continue with Google"));
        assert!(text.contains("Continue as Guest"));
        assert!(text.contains("Don't have an account? Sign Up"));
    }

    #[tokio::test(start_paused = true)]
    async fn empty_list_shows_placeholder() {
        let mut app = app_with(DiaryState::new());
        app.login_as_guest().unwrap();
        let text = screen(&app);
        assert!(text.contains("No entries yet"));
        assert!(text.contains("Welcome, Guest!"));
    }

    #[tokio::test(start_paused = true)]
    async fn list_shows_preview_and_stats() {
        let mut store = DiaryState::new();
        store
            .add_entry(DiaryEntry::new("Hello world".into(), Mood::Neutral))
            .unwrap();
        let mut app = app_with(store);
        app.login_as_guest().unwrap();

        let text = screen(&app);
        assert!(text.contains("Hello world"));
        assert!(text.contains("Neutral"));
        assert!(text.contains("2 words • 1 min read"));
    }

    #[tokio::test(start_paused = true)]
    async fn composer_shows_insights_after_analysis() {
        let config = Config::default();
        let (mut app, mut rx) =
            App::new(&config, Services::simulated(&config), DiaryState::new());
        app.login_as_guest().unwrap();
        app.start_new_entry().unwrap();
        assert!(screen(&app).contains("Dear Diary..."));

        app.editor_mut().set_content("a few words here");
        app.analyze().unwrap();
        assert!(screen(&app).contains("Analyzing..."));
        let completion = rx.recv().await.unwrap();
        app.apply(completion);

        let text = screen(&app);
        assert!(text.contains("AI Insights"));
        assert!(text.contains("Word Count: 4"));
        assert!(text.contains("Emotional Tone: Neutral"));
    }

    #[tokio::test(start_paused = true)]
    async fn long_entry_scrolls_to_keep_cursor_visible() {
        let mut app = app_with(DiaryState::new());
        app.login_as_guest().unwrap();
        app.start_new_entry().unwrap();
        let lines: Vec<_> = (0..40).map(|i| format!("line{i}")).collect();
        app.editor_mut().set_content(lines.join("\n"));

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| ui(f, &app)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("line39"));
        assert!(!text.contains("line0 "));

        let cursor = terminal.get_cursor_position().unwrap();
        assert!(cursor.y < 30);
        let row: String = (0..80)
            .map(|x| terminal.backend().buffer()[(x, cursor.y)].symbol())
            .collect();
        assert!(row.contains("line39"));
        assert_eq!(cursor.x, 2 + "line39".len() as u16);
    }

    #[tokio::test(start_paused = true)]
    async fn reopened_entry_uses_new_entry_heading() {
        let mut store = DiaryState::new();
        let id = store
            .add_entry(DiaryEntry::new("from before".into(), Mood::Positive))
            .unwrap();
        let mut app = app_with(store);
        app.login_as_guest().unwrap();
        app.open_entry(&id).unwrap();

        let text = screen(&app);
        assert!(text.contains("New Entry"));
        assert!(!text.contains("Diary Entry"));
        assert!(text.contains("from before"));
    }

    #[test]
    fn truncate_respects_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("日本語テキスト", 5), "日本…");
    }
}

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, Focus, Screen};
use crate::history::HistoryState;
use crate::ingest::Status;
use crate::session::Role;
use crate::strings;
use crate::theme::Theme;
use crate::welcome::{IngestTab, WelcomePanel};

const TYPING_FRAMES: [&str; 3] = ["●··", "·●·", "··●"];

pub fn render(frame: &mut Frame, app: &App) {
    let theme = Theme::for_mode(app.theme);

    // Whole-frame background carries the light/dark choice
    frame.render_widget(Block::default().style(theme.base), frame.area());

    match app.screen {
        Screen::Chat => render_chat(frame, app, &theme),
        Screen::History => render_history(frame, app, &theme),
    }
}

fn render_chat(frame: &mut Frame, app: &App, theme: &Theme) {
    let layout = Layout::default()
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Transcript / welcome
            Constraint::Length(3), // Question input
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, app, theme, layout[0]);

    let body = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border);
    let inner = body.inner(layout[1]);
    frame.render_widget(body, layout[1]);

    if app.welcome_visible() {
        render_welcome(frame, app, theme, inner);
    } else {
        render_transcript(frame, app, theme, inner);
    }

    render_input(frame, app, theme, layout[2]);
    render_footer(frame, app, theme, layout[3]);
}

fn render_header(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(format!(" {} ", strings::APP_TITLE))
        .title_style(theme.title);

    let mut spans = vec![
        Span::styled(strings::APP_SUBTITLE, theme.normal),
        Span::raw("   "),
        Span::styled(" Ctrl+T ", theme.key_hint),
        Span::styled(app.theme.label(), theme.muted),
    ];
    if !app.session.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(" Ctrl+N ", theme.key_hint));
        spans.push(Span::styled(strings::NEW_CONVERSATION, theme.muted));
    }

    let header = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(header, area);
}

fn render_welcome(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let layout = Layout::default()
        .constraints([
            Constraint::Length(4), // Greeting
            Constraint::Length(6), // Sample questions
            Constraint::Min(6),    // Ingestion
        ])
        .split(area);

    let greeting = Paragraph::new(vec![
        Line::from(Span::styled(strings::WELCOME_TITLE, theme.title)),
        Line::from(Span::styled(strings::WELCOME_BODY, theme.normal)),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(greeting, layout[0]);

    // Sample questions
    let focused = app.focus == Focus::Samples;
    let mut items = vec![ListItem::new(Line::from(Span::styled(
        strings::SAMPLE_QUESTIONS_TITLE,
        theme.muted,
    )))];
    items.extend(
        WelcomePanel::samples()
            .iter()
            .enumerate()
            .map(|(i, question)| {
                let is_current = i == app.welcome.sample_index;
                let prefix = if is_current { "▸ " } else { "  " };
                let style = if is_current && focused {
                    theme.selected
                } else {
                    theme.normal
                };
                ListItem::new(format!("{}{}", prefix, question)).style(style)
            }),
    );
    frame.render_widget(List::new(items), layout[1]);

    render_ingest(frame, app, theme, layout[2]);
}

fn render_ingest(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let focused = app.focus == Focus::Ingest;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { theme.title } else { theme.border });
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .constraints([
            Constraint::Length(1), // Tabs
            Constraint::Length(1), // Hint
            Constraint::Min(1),    // Widget body
            Constraint::Length(1), // Status
        ])
        .split(inner);

    let tabs = Tabs::new(vec![IngestTab::Text.label(), IngestTab::File.label()])
        .select(app.welcome.tab.index())
        .style(theme.muted)
        .highlight_style(theme.title);
    frame.render_widget(tabs, layout[0]);

    let (hint, body, status) = match app.welcome.tab {
        IngestTab::Text => {
            let widget = &app.welcome.text;
            let body = if widget.input.is_empty() {
                Paragraph::new(Span::styled(
                    strings::TEXT_PLACEHOLDER,
                    theme.muted,
                ))
            } else {
                // Locked while the backend processes it
                let style = if widget.is_uploading() {
                    theme.muted
                } else {
                    theme.normal
                };
                let mut lines: Vec<Line> = widget
                    .input
                    .split('\n')
                    .map(|l| Line::from(Span::styled(l.to_string(), style)))
                    .collect();
                lines.push(Line::from(Span::styled(
                    strings::char_count(widget.char_count()),
                    theme.muted,
                )));
                Paragraph::new(lines).wrap(Wrap { trim: false })
            };
            (strings::TEXT_HINT, body, widget.status())
        }
        IngestTab::File => {
            let widget = &app.welcome.file;
            let mut lines = vec![Line::from(vec![
                Span::styled("Ruta: ", theme.muted),
                Span::styled(
                    format!("{}▏", widget.path_input),
                    if widget.is_uploading() { theme.muted } else { theme.normal },
                ),
            ])];
            if let Some(file) = widget.selected() {
                lines.push(Line::from(vec![
                    Span::styled("Archivo seleccionado: ", theme.muted),
                    Span::styled(file.name.clone(), theme.title),
                ]));
            }
            (strings::FILE_HINT, Paragraph::new(lines), widget.status())
        }
    };

    frame.render_widget(Paragraph::new(Span::styled(hint, theme.muted)), layout[1]);
    frame.render_widget(body, layout[2]);
    if let Some(status) = status {
        frame.render_widget(
            Paragraph::new(Span::styled(status.text(), status_style(status, theme))),
            layout[3],
        );
    }
}

fn render_transcript(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let lines = transcript_lines(app, theme, area.width as usize);

    let offset = tail_offset(lines.len(), area.height, app.scroll_back);
    frame.render_widget(Paragraph::new(lines).scroll((offset, 0)), area);
}

/// Follow the tail unless the user scrolled back
fn tail_offset(total: usize, height: u16, scroll_back: u16) -> u16 {
    let total = u16::try_from(total).unwrap_or(u16::MAX);
    let max_back = total.saturating_sub(height);
    max_back - scroll_back.min(max_back)
}

fn transcript_lines(app: &App, theme: &Theme, width: usize) -> Vec<Line<'static>> {
    let session = &app.session;
    let mut lines = Vec::new();

    for message in session.messages() {
        let marker = if app.selected_message == Some(message.id) {
            "▌ "
        } else {
            "  "
        };
        let (who, who_style) = match message.role {
            Role::User => ("Tú", theme.user),
            Role::Assistant => (strings::APP_TITLE, theme.assistant),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}{}", marker, who), who_style),
            Span::styled(format!("  {}", message.time_label()), theme.muted),
        ]));

        let body_style = if message.is_error {
            theme.danger
        } else {
            theme.normal
        };
        for line in wrap_text(&message.content, width.saturating_sub(2)) {
            lines.push(Line::from(Span::styled(format!("  {}", line), body_style)));
        }

        if message.has_sources() {
            let expanded = session.sources_expanded(message.id);
            let toggle = if expanded {
                format!("  ▾ {}", strings::HIDE_SOURCES)
            } else {
                format!("  ▸ {} ({})", strings::SHOW_SOURCES, message.sources.len())
            };
            lines.push(Line::from(Span::styled(toggle, theme.key_hint)));

            if expanded {
                for source in &message.sources {
                    let snippet = format!("{} {}", strings::SNIPPET_LABEL, source.content_snippet);
                    for line in wrap_text(&snippet, width.saturating_sub(4)) {
                        lines.push(Line::from(Span::styled(format!("    {}", line), theme.normal)));
                    }
                    lines.push(Line::from(Span::styled(
                        format!("    {} {}", strings::SIMILARITY_LABEL, source.score_label()),
                        theme.muted,
                    )));
                }
            }
        }

        lines.push(Line::raw(""));
    }

    if session.is_awaiting() {
        let dots = TYPING_FRAMES[(app.tick / 3) as usize % TYPING_FRAMES.len()];
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", strings::APP_TITLE), theme.assistant),
            Span::styled(format!("  {}", dots), theme.muted),
        ]));
    }

    lines
}

fn render_input(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let focused = app.focus == Focus::Question;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused { theme.title } else { theme.border })
        .title(" Pregunta ")
        .title_style(theme.muted);

    let content = if !app.input_enabled() {
        Line::from(Span::styled(strings::AWAITING_ANSWER, theme.muted))
    } else if app.input.is_empty() {
        Line::from(Span::styled(strings::QUESTION_PLACEHOLDER, theme.muted))
    } else {
        Line::from(vec![
            Span::styled(app.input.clone(), theme.normal),
            Span::styled(if focused { "▏" } else { "" }, theme.title),
        ])
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn render_footer(frame: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    if let Some(notice) = &app.notice {
        let p = Paragraph::new(Span::styled(notice.text(), status_style(notice, theme)))
            .alignment(Alignment::Center);
        frame.render_widget(p, area);
        return;
    }

    let mut spans = vec![
        Span::styled(" Enter ", theme.key_hint),
        Span::styled("Enviar", theme.muted),
        Span::raw("  "),
    ];
    if app.welcome_visible() {
        spans.push(Span::styled(" Tab ", theme.key_hint));
        spans.push(Span::styled("Cambiar panel", theme.muted));
    } else {
        spans.push(Span::styled(" Ctrl+O ", theme.key_hint));
        spans.push(Span::styled("Fuentes", theme.muted));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(" Ctrl+↑/↓ ", theme.key_hint));
        spans.push(Span::styled("Mensaje", theme.muted));
    }
    spans.extend([
        Span::raw("  "),
        Span::styled(" Ctrl+R ", theme.key_hint),
        Span::styled(strings::HISTORY_TITLE, theme.muted),
        Span::raw("  "),
        Span::styled(" Ctrl+C ", theme.key_hint),
        Span::styled("Salir", theme.muted),
    ]);

    frame.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

fn render_history(frame: &mut Frame, app: &App, theme: &Theme) {
    let area = frame.area();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border)
        .title(format!(" 🕘 {} ", strings::HISTORY_TITLE))
        .title_style(theme.title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .constraints([
            Constraint::Min(3),    // Entries
            Constraint::Length(1), // Footer
        ])
        .split(inner);

    match &app.history.state {
        HistoryState::Loaded(entries) if !entries.is_empty() => {
            let width = layout[0].width as usize;
            let mut lines = Vec::new();
            for entry in entries {
                let style = if entry.role == "user" {
                    theme.user
                } else {
                    theme.assistant
                };
                lines.push(Line::from(Span::styled(entry.role.clone(), style)));
                for line in wrap_text(&entry.content, width.saturating_sub(2)) {
                    lines.push(Line::from(Span::styled(format!("  {}", line), theme.normal)));
                }
                lines.push(Line::raw(""));
            }
            frame.render_widget(
                Paragraph::new(lines).scroll((app.history.scroll, 0)),
                layout[0],
            );
        }
        state => {
            let (msg, style) = match state {
                HistoryState::Loading => (strings::HISTORY_LOADING.to_string(), theme.muted),
                HistoryState::Failed(err) => (err.clone(), theme.danger),
                _ => (strings::HISTORY_EMPTY.to_string(), theme.muted),
            };
            let p = Paragraph::new(msg)
                .style(style)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(p, layout[0]);
        }
    }

    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" ↑/↓ ", theme.key_hint),
        Span::styled("Desplazar", theme.muted),
        Span::raw("  "),
        Span::styled(" r ", theme.key_hint),
        Span::styled("Recargar", theme.muted),
        Span::raw("  "),
        Span::styled(" Esc ", theme.key_hint),
        Span::styled("Volver", theme.muted),
    ]))
    .alignment(Alignment::Center);
    frame.render_widget(footer, layout[1]);
}

fn status_style(status: &Status, theme: &Theme) -> Style {
    match status {
        Status::Info(_) => theme.muted,
        Status::Success(_) => theme.success,
        Status::Error(_) => theme.danger,
    }
}

// Helper: greedy word wrap by character count
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for raw in text.split('\n') {
        let mut line = String::new();
        let mut len = 0;

        for word in raw.split_whitespace() {
            let word_len = word.chars().count();
            if len > 0 && len + 1 + word_len > width {
                out.push(std::mem::take(&mut line));
                len = 0;
            }
            if word_len > width {
                for c in word.chars() {
                    if len == width {
                        out.push(std::mem::take(&mut line));
                        len = 0;
                    }
                    line.push(c);
                    len += 1;
                }
                continue;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            line.push_str(word);
            len += word_len;
        }
        out.push(line);
    }
    out
}

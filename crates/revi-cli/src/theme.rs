use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

/// UI preference held for the whole process
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Light => "☀ Claro",
            ThemeMode::Dark => "☾ Oscuro",
        }
    }
}

/// Theme tokens for consistent styling across the TUI
pub struct Theme {
    pub base: Style,
    pub title: Style,
    pub border: Style,
    pub selected: Style,
    pub normal: Style,
    pub muted: Style,
    pub user: Style,
    pub assistant: Style,
    pub danger: Style,
    pub success: Style,
    pub key_hint: Style,
}

impl Theme {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Light => Self::light(),
        }
    }

    fn dark() -> Self {
        Self {
            base: Style::default().fg(Color::White).bg(Color::Black),
            title: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::DarkGray),
            selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            normal: Style::default().fg(Color::White),
            muted: Style::default().fg(Color::DarkGray),
            user: Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::BOLD),
            assistant: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            danger: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            success: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            key_hint: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        }
    }

    fn light() -> Self {
        Self {
            base: Style::default().fg(Color::Black).bg(Color::White),
            title: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            border: Style::default().fg(Color::Gray),
            selected: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            normal: Style::default().fg(Color::Black),
            muted: Style::default().fg(Color::Gray),
            user: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            assistant: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            danger: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            success: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            key_hint: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        }
    }
}

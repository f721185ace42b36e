use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::{App, Focus, Screen};
use crate::welcome::IngestTab;

const PAGE: u16 = 5;

/// Poll for keyboard events with timeout
pub fn poll_event(timeout_ms: u64) -> anyhow::Result<Option<Event>> {
    if event::poll(Duration::from_millis(timeout_ms))? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle keyboard input, returns true if a backend request was dispatched
pub fn handle_event(app: &mut App, event: Event) -> anyhow::Result<bool> {
    if let Event::Key(key) = event {
        // Only handle key press events (not release)
        if key.kind != KeyEventKind::Press {
            return Ok(false);
        }
        app.notice = None;

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                app.should_quit = true;
                return Ok(false);
            }
            KeyCode::Char('t') if ctrl => {
                app.toggle_theme();
                return Ok(false);
            }
            _ => {}
        }

        match app.screen {
            Screen::Chat => Ok(handle_chat(app, key)),
            Screen::History => Ok(handle_history(app, key.code)),
        }
    } else {
        // Resize handled by ratatui automatically
        Ok(false)
    }
}

fn handle_chat(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('n') if ctrl => {
            app.new_conversation();
            return false;
        }
        KeyCode::Char('r') if ctrl => {
            app.open_history();
            return true;
        }
        KeyCode::Char('o') if ctrl => {
            app.toggle_selected_sources();
            return false;
        }
        KeyCode::Up if ctrl => {
            app.select_previous_message();
            return false;
        }
        KeyCode::Down if ctrl => {
            app.select_next_message();
            return false;
        }
        KeyCode::PageUp => {
            app.scroll_up(PAGE);
            return false;
        }
        KeyCode::PageDown => {
            app.scroll_down(PAGE);
            return false;
        }
        KeyCode::Tab => {
            app.next_focus();
            return false;
        }
        KeyCode::Esc => {
            // Only Ctrl+C quits
            app.focus = Focus::Question;
            return false;
        }
        _ => {}
    }

    match app.focus {
        Focus::Question => handle_question(app, key),
        Focus::Samples => handle_samples(app, key.code),
        Focus::Ingest => handle_ingest(app, key),
    }
}

fn handle_question(app: &mut App, key: KeyEvent) -> bool {
    if !app.input_enabled() {
        return false;
    }

    match key.code {
        KeyCode::Enter => app.send_question(),
        KeyCode::Backspace => {
            app.input.pop();
            false
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.input.push(c);
            false
        }
        _ => false,
    }
}

fn handle_samples(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Up | KeyCode::Char('k') => app.welcome.sample_up(),
        KeyCode::Down | KeyCode::Char('j') => app.welcome.sample_down(),
        KeyCode::Enter => app.choose_sample(),
        _ => {}
    }
    false
}

fn handle_ingest(app: &mut App, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('s') if ctrl => return app.submit_ingest(),
        KeyCode::Char('l') if ctrl => {
            match app.welcome.tab {
                IngestTab::Text => app.welcome.text.clear(),
                IngestTab::File => app.welcome.file.clear(),
            }
            return false;
        }
        KeyCode::Left | KeyCode::Right => {
            app.welcome.switch_tab();
            return false;
        }
        _ => {}
    }

    match app.welcome.tab {
        IngestTab::Text => match key.code {
            KeyCode::Enter => app.welcome.text.push('\n'),
            KeyCode::Backspace => app.welcome.text.backspace(),
            KeyCode::Char(c) if !ctrl => app.welcome.text.push(c),
            _ => {}
        },
        IngestTab::File => match key.code {
            KeyCode::Enter => {
                app.welcome.file.select_input();
            }
            KeyCode::Backspace => app.welcome.file.backspace(),
            KeyCode::Char(c) if !ctrl => app.welcome.file.push(c),
            _ => {}
        },
    }
    false
}

fn handle_history(app: &mut App, code: KeyCode) -> bool {
    match code {
        KeyCode::Char('r') => {
            app.load_history();
            true
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.history.scroll_up(1);
            false
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.history.scroll_down(1);
            false
        }
        KeyCode::PageUp => {
            app.history.scroll_up(PAGE);
            false
        }
        KeyCode::PageDown => {
            app.history.scroll_down(PAGE);
            false
        }
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q') => {
            app.go_back();
            false
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockBackend;
    use crate::theme::ThemeMode;
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(Arc::new(MockBackend::new()), tx, ThemeMode::Dark)
    }

    #[test]
    fn test_typing_and_blank_enter() {
        let mut app = app();
        for c in "  ".chars() {
            handle_event(&mut app, press(KeyCode::Char(c))).unwrap();
        }
        assert!(!handle_event(&mut app, press(KeyCode::Enter)).unwrap());
        assert!(app.session.is_empty());

        handle_event(&mut app, press(KeyCode::Backspace)).unwrap();
        assert_eq!(app.input, " ");
    }

    #[test]
    fn test_global_shortcuts() {
        let mut app = app();
        handle_event(&mut app, ctrl('t')).unwrap();
        assert_eq!(app.theme, ThemeMode::Light);

        handle_event(&mut app, ctrl('c')).unwrap();
        assert!(app.should_quit);
    }

    #[test]
    fn test_sample_selection_via_keys() {
        let mut app = app();
        handle_event(&mut app, press(KeyCode::Tab)).unwrap();
        handle_event(&mut app, press(KeyCode::Down)).unwrap();
        handle_event(&mut app, press(KeyCode::Down)).unwrap();
        handle_event(&mut app, press(KeyCode::Enter)).unwrap();

        assert_eq!(app.input, "¿El producto tiene problemas de durabilidad?");
        assert_eq!(app.focus, Focus::Question);
        assert!(app.session.is_empty());
    }

    #[test]
    fn test_ingest_tab_switch_and_file_pick() {
        let mut app = app();
        app.focus = Focus::Ingest;

        handle_event(&mut app, press(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.welcome.text.input, "a");

        handle_event(&mut app, press(KeyCode::Right)).unwrap();
        assert_eq!(app.welcome.tab, IngestTab::File);
        for c in "reviews.pdf".chars() {
            handle_event(&mut app, press(KeyCode::Char(c))).unwrap();
        }
        handle_event(&mut app, press(KeyCode::Enter)).unwrap();
        assert!(app.welcome.file.selected().is_none());

        handle_event(&mut app, press(KeyCode::Left)).unwrap();
        assert_eq!(app.welcome.text.input, "a");
    }

    #[test]
    fn test_empty_paste_rejected_without_request() {
        let mut app = app();
        app.focus = Focus::Ingest;
        assert!(!handle_event(&mut app, ctrl('s')).unwrap());
        assert!(app.welcome.text.status().unwrap().is_error());
    }

    #[test]
    fn test_esc_returns_focus_and_never_quits() {
        let mut app = app();
        app.focus = Focus::Samples;
        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert_eq!(app.focus, Focus::Question);
        assert!(!app.should_quit);

        app.input = "borrador".into();
        handle_event(&mut app, press(KeyCode::Esc)).unwrap();
        assert!(!app.should_quit);
        assert_eq!(app.input, "borrador");
    }
}

use std::sync::Arc;

use revi_client::{ClientError, HistoryEntry, QuestionResponse, ReviewBackend, UploadAck};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

use crate::history::HistoryView;
use crate::ingest::{self, IngestEvent, IngestKind, Status};
use crate::session::{ChatSession, MessageId, Role, SubmitRejection, Ticket};
use crate::strings;
use crate::theme::ThemeMode;
use crate::welcome::{IngestTab, WelcomePanel};

/// Screen states for the TUI state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Screen {
    Chat,
    History,
}

/// Which part of the chat screen receives keystrokes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Question,
    Samples,
    Ingest,
}

/// Results of spawned backend calls, delivered back to the UI loop
#[derive(Debug)]
pub enum BackendEvent {
    Answer {
        ticket: Ticket,
        outcome: Result<QuestionResponse, ClientError>,
    },
    History {
        request: u64,
        outcome: Result<Vec<HistoryEntry>, ClientError>,
    },
    Upload {
        kind: IngestKind,
        outcome: Result<UploadAck, ClientError>,
    },
}

/// Application state
pub struct App {
    pub screen: Screen,
    pub focus: Focus,
    pub should_quit: bool,
    pub theme: ThemeMode,

    // Chat
    pub session: ChatSession,
    pub input: String,
    pub selected_message: Option<MessageId>,
    pub scroll_back: u16,
    seen_revision: u64,

    pub welcome: WelcomePanel,
    pub history: HistoryView,

    /// One-line notice in the footer, cleared on the next keystroke
    pub notice: Option<Status>,
    pub tick: u64,

    backend: Arc<dyn ReviewBackend>,
    events: UnboundedSender<BackendEvent>,
}

impl App {
    pub fn new(
        backend: Arc<dyn ReviewBackend>,
        events: UnboundedSender<BackendEvent>,
        theme: ThemeMode,
    ) -> Self {
        Self {
            screen: Screen::Chat,
            focus: Focus::Question,
            should_quit: false,
            theme,
            session: ChatSession::new(),
            input: String::new(),
            selected_message: None,
            scroll_back: 0,
            seen_revision: 0,
            welcome: WelcomePanel::default(),
            history: HistoryView::default(),
            notice: None,
            tick: 0,
            backend,
            events,
        }
    }

    pub fn welcome_visible(&self) -> bool {
        self.session.is_empty()
    }

    /// Input is locked while an answer is pending
    pub fn input_enabled(&self) -> bool {
        !self.session.is_awaiting()
    }

    // --- Chat ---

    pub fn send_question(&mut self) -> bool {
        match self.session.submit(&self.input) {
            Ok(pending) => {
                self.input.clear();
                self.focus = Focus::Question;

                let backend = Arc::clone(&self.backend);
                let events = self.events.clone();
                tokio::spawn(async move {
                    let outcome = backend.ask(&pending.question).await;
                    let _ = events.send(BackendEvent::Answer {
                        ticket: pending.ticket,
                        outcome,
                    });
                });
                true
            }
            Err(SubmitRejection::Blank) => false,
            Err(SubmitRejection::Busy) => {
                debug!("Send ignored while awaiting answer");
                false
            }
        }
    }

    pub fn new_conversation(&mut self) {
        if self.session.is_empty() && !self.session.is_awaiting() {
            return;
        }
        info!("Starting a new conversation");
        self.session.clear();
        self.selected_message = None;
        self.scroll_back = 0;
        self.focus = Focus::Question;
    }

    /// Assistant messages with a source list, oldest first
    fn source_messages(&self) -> Vec<MessageId> {
        self.session
            .messages()
            .iter()
            .filter(|m| m.role == Role::Assistant && m.has_sources())
            .map(|m| m.id)
            .collect()
    }

    pub fn select_previous_message(&mut self) {
        let ids = self.source_messages();
        self.selected_message = match self.selected_message.and_then(|id| ids.iter().position(|x| *x == id)) {
            Some(0) => ids.first().copied(),
            Some(pos) => ids.get(pos - 1).copied(),
            None => ids.last().copied(),
        };
    }

    pub fn select_next_message(&mut self) {
        let ids = self.source_messages();
        self.selected_message = match self.selected_message.and_then(|id| ids.iter().position(|x| *x == id)) {
            Some(pos) if pos + 1 < ids.len() => ids.get(pos + 1).copied(),
            Some(_) => ids.last().copied(),
            None => ids.last().copied(),
        };
    }

    /// Toggle the selected message's sources, defaulting to the newest one
    pub fn toggle_selected_sources(&mut self) {
        let target = self
            .selected_message
            .or_else(|| self.source_messages().last().copied());
        if let Some(id) = target {
            self.selected_message = Some(id);
            self.session.toggle_sources(id);
        }
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_add(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll_back = self.scroll_back.saturating_sub(lines);
    }

    /// Jump back to the newest entry whenever the transcript changed
    pub fn sync_scroll(&mut self) {
        let revision = self.session.revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            self.scroll_back = 0;
        }
    }

    // --- Welcome panel ---

    pub fn next_focus(&mut self) {
        self.focus = if !self.welcome_visible() {
            Focus::Question
        } else {
            match self.focus {
                Focus::Question => Focus::Samples,
                Focus::Samples => Focus::Ingest,
                Focus::Ingest => Focus::Question,
            }
        };
    }

    /// Copy the highlighted sample into the question box without sending it
    pub fn choose_sample(&mut self) {
        self.input = self.welcome.selected_sample().to_string();
        self.focus = Focus::Question;
    }

    pub fn submit_ingest(&mut self) -> bool {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();

        match self.welcome.tab {
            IngestTab::Text => {
                let Some(text) = self.welcome.text.begin_submit() else {
                    return false;
                };
                tokio::spawn(async move {
                    let outcome = backend.upload_text(&text).await;
                    let _ = events.send(BackendEvent::Upload {
                        kind: IngestKind::Text,
                        outcome,
                    });
                });
            }
            IngestTab::File => {
                let Some(path) = self.welcome.file.begin_upload() else {
                    return false;
                };
                tokio::spawn(async move {
                    let outcome = ingest::read_and_upload(backend.as_ref(), path).await;
                    let _ = events.send(BackendEvent::Upload {
                        kind: IngestKind::File,
                        outcome,
                    });
                });
            }
        }
        true
    }

    // --- History ---

    pub fn open_history(&mut self) {
        self.screen = Screen::History;
        self.load_history();
    }

    pub fn load_history(&mut self) {
        let request = self.history.begin_load();
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = backend.history().await;
            let _ = events.send(BackendEvent::History { request, outcome });
        });
    }

    pub fn go_back(&mut self) {
        self.screen = Screen::Chat;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        debug!("Theme switched to {:?}", self.theme);
    }

    // --- Backend results ---

    pub fn apply(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Answer { ticket, outcome } => {
                self.session.resolve(ticket, outcome);
            }
            BackendEvent::History { request, outcome } => {
                self.history.finish_load(request, outcome);
            }
            BackendEvent::Upload { kind, outcome } => {
                if let Some(event) = self.welcome.finish_upload(kind, outcome) {
                    self.on_ingested(event);
                }
            }
        }
    }

    fn on_ingested(&mut self, event: IngestEvent) {
        match event {
            IngestEvent::Uploaded { kind, ack } => {
                info!("Ingestion finished ({:?}): {}", kind, ack.message().unwrap_or("-"));
                let text = match kind {
                    IngestKind::Text => strings::TEXT_UPLOADED,
                    IngestKind::File => strings::FILE_UPLOADED,
                };
                self.notice = Some(Status::Success(text.to_string()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ack, answer, source, MockBackend};
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    fn app_with(backend: MockBackend) -> (App, UnboundedReceiver<BackendEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (App::new(Arc::new(backend), tx, ThemeMode::Dark), rx)
    }

    #[tokio::test]
    async fn test_send_question_round_trip() {
        let mut backend = MockBackend::new();
        backend
            .expect_ask()
            .times(1)
            .returning(|_| Ok(answer("Buena batería", vec![source("d1", 0.7)])));
        let (mut app, mut rx) = app_with(backend);

        app.input = "¿Y la batería?".into();
        assert!(app.send_question());
        assert!(app.input.is_empty());
        assert_eq!(app.session.messages().len(), 1);
        assert!(!app.input_enabled());

        // Second send while waiting does nothing
        app.input = "otra".into();
        assert!(!app.send_question());
        assert_eq!(app.session.messages().len(), 1);

        let event = rx.recv().await.unwrap();
        app.apply(event);

        assert_eq!(app.session.messages().len(), 2);
        assert_eq!(app.session.last_message().unwrap().content, "Buena batería");
        assert!(app.input_enabled());
    }

    #[tokio::test]
    async fn test_new_conversation_drops_late_answer() {
        let mut backend = MockBackend::new();
        backend
            .expect_ask()
            .returning(|_| Ok(answer("tarde", vec![])));
        let (mut app, mut rx) = app_with(backend);

        app.input = "pregunta".into();
        app.send_question();
        app.new_conversation();
        assert!(app.welcome_visible());

        let event = rx.recv().await.unwrap();
        app.apply(event);

        assert!(app.session.is_empty());
    }

    #[tokio::test]
    async fn test_text_ingest_emits_notice() {
        let mut backend = MockBackend::new();
        backend
            .expect_upload_text()
            .times(1)
            .returning(|_| Ok(ack("Docs loaded successfully.")));
        let (mut app, mut rx) = app_with(backend);

        app.welcome.text.input = "Gran producto".into();
        assert!(app.submit_ingest());
        assert!(!app.submit_ingest());

        let event = rx.recv().await.unwrap();
        app.apply(event);

        assert_eq!(
            app.notice,
            Some(Status::Success(strings::TEXT_UPLOADED.to_string()))
        );
        assert!(app.welcome.text.input.is_empty());
    }

    #[tokio::test]
    async fn test_history_screen() {
        let mut backend = MockBackend::new();
        backend.expect_history().times(1).returning(|| Ok(vec![]));
        let (mut app, mut rx) = app_with(backend);

        app.open_history();
        assert_eq!(app.screen, Screen::History);

        let event = rx.recv().await.unwrap();
        app.apply(event);
        assert_eq!(app.history.state, crate::history::HistoryState::Loaded(vec![]));
        assert!(app.session.is_empty());

        app.go_back();
        assert_eq!(app.screen, Screen::Chat);
    }

    #[test]
    fn test_choose_sample_does_not_send() {
        let (mut app, _rx) = app_with(MockBackend::new());
        app.focus = Focus::Samples;
        app.welcome.sample_down();

        app.choose_sample();

        assert_eq!(app.input, strings::SAMPLE_QUESTIONS[1]);
        assert_eq!(app.focus, Focus::Question);
        assert!(app.session.is_empty());
    }

    #[test]
    fn test_focus_cycle_only_on_welcome() {
        let (mut app, _rx) = app_with(MockBackend::new());
        app.next_focus();
        assert_eq!(app.focus, Focus::Samples);
        app.next_focus();
        assert_eq!(app.focus, Focus::Ingest);
        app.next_focus();
        assert_eq!(app.focus, Focus::Question);

        let pending = app.session.submit("hola").unwrap();
        app.session.resolve(pending.ticket, Ok(answer("hola", vec![])));
        app.next_focus();
        assert_eq!(app.focus, Focus::Question);
    }

    #[test]
    fn test_toggle_defaults_to_newest_sourced_message() {
        let (mut app, _rx) = app_with(MockBackend::new());
        for (q, a) in [("a", "ra"), ("b", "rb")] {
            let pending = app.session.submit(q).unwrap();
            app.session
                .resolve(pending.ticket, Ok(answer(a, vec![source("d", 0.5)])));
        }
        let newest = app.session.last_message().unwrap().id;

        app.toggle_selected_sources();
        assert_eq!(app.selected_message, Some(newest));
        assert!(app.session.sources_expanded(newest));

        app.select_previous_message();
        assert_ne!(app.selected_message, Some(newest));
        app.select_next_message();
        assert_eq!(app.selected_message, Some(newest));
    }

    #[test]
    fn test_scroll_follows_new_messages() {
        let (mut app, _rx) = app_with(MockBackend::new());
        app.scroll_up(5);
        app.sync_scroll();
        assert_eq!(app.scroll_back, 5);

        app.session.submit("hola").unwrap();
        app.sync_scroll();
        assert_eq!(app.scroll_back, 0);
    }
}

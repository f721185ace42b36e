use std::collections::HashSet;

use chrono::{DateTime, Local};
use revi_client::{ClientError, QuestionResponse, ReviewBackend, Source};
use tracing::{debug, warn};

use crate::strings;

pub type MessageId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One entry of the transcript. Never modified after it is appended.
#[derive(Clone, Debug)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
    pub sources: Vec<Source>,
    pub is_error: bool,
}

impl Message {
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    pub fn has_sources(&self) -> bool {
        self.role == Role::Assistant && !self.sources.is_empty()
    }
}

/// Identifies the single question in flight. A ticket from an older epoch
/// (issued before the last `clear`) is never honoured.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket {
    epoch: u64,
    seq: u64,
}

#[derive(Clone, Debug)]
pub struct PendingQuestion {
    pub ticket: Ticket,
    pub question: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitRejection {
    Blank,
    Busy,
}

/// Conversation state for one chat: the transcript, which source lists are
/// expanded, and the question currently awaiting an answer.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    expanded: HashSet<MessageId>,
    in_flight: Option<Ticket>,
    next_id: MessageId,
    next_seq: u64,
    epoch: u64,
    revision: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn is_awaiting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Bumped on every transcript change; the UI uses it to follow the tail.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn sources_expanded(&self, id: MessageId) -> bool {
        self.expanded.contains(&id)
    }

    /// First half of a send: validates, appends the user message and takes the
    /// in-flight slot. The caller performs the request and hands the outcome
    /// to [`ChatSession::resolve`].
    pub fn submit(&mut self, text: &str) -> Result<PendingQuestion, SubmitRejection> {
        let question = text.trim();
        if question.is_empty() {
            return Err(SubmitRejection::Blank);
        }
        if self.in_flight.is_some() {
            debug!("Question rejected: previous one still in flight");
            return Err(SubmitRejection::Busy);
        }

        let ticket = Ticket {
            epoch: self.epoch,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        self.in_flight = Some(ticket);

        self.push(Role::User, question.to_string(), Vec::new(), false);

        Ok(PendingQuestion {
            ticket,
            question: question.to_string(),
        })
    }

    /// Second half of a send. Returns false when the ticket is stale (session
    /// cleared meanwhile) and the outcome was dropped.
    pub fn resolve(
        &mut self,
        ticket: Ticket,
        outcome: Result<QuestionResponse, ClientError>,
    ) -> bool {
        if self.in_flight != Some(ticket) {
            debug!(
                "Dropping answer for stale ticket (epoch {}, seq {})",
                ticket.epoch, ticket.seq
            );
            return false;
        }
        self.in_flight = None;

        match outcome {
            Ok(response) => {
                self.push(Role::Assistant, response.answer, response.results, false);
            }
            Err(e) => {
                warn!("Question failed: {}", e);
                self.push(
                    Role::Assistant,
                    strings::ANSWER_APOLOGY.to_string(),
                    Vec::new(),
                    true,
                );
            }
        }
        true
    }

    /// Submit, ask the backend, and record the answer.
    pub async fn send_question<B: ReviewBackend + ?Sized>(
        &mut self,
        backend: &B,
        text: &str,
    ) -> Result<(), SubmitRejection> {
        let pending = self.submit(text)?;
        let outcome = backend.ask(&pending.question).await;
        self.resolve(pending.ticket, outcome);
        Ok(())
    }

    pub fn toggle_sources(&mut self, id: MessageId) {
        let Some(message) = self.messages.iter().find(|m| m.id == id) else {
            return;
        };
        if !message.has_sources() {
            return;
        }

        if !self.expanded.remove(&id) {
            self.expanded.insert(id);
        }
    }

    /// Start a new conversation. An answer still in flight is orphaned.
    pub fn clear(&mut self) {
        if self.in_flight.take().is_some() {
            debug!("Clearing session with a question in flight");
        }
        self.messages.clear();
        self.expanded.clear();
        self.epoch += 1;
        self.revision += 1;
    }

    fn push(&mut self, role: Role, content: String, sources: Vec<Source>, is_error: bool) {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message {
            id,
            role,
            content,
            timestamp: Local::now(),
            sources,
            is_error,
        });
        self.revision += 1;
    }
}

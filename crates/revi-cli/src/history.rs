use revi_client::{ClientError, HistoryEntry, ReviewBackend};
use tracing::warn;

use crate::strings;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum HistoryState {
    #[default]
    Idle,
    Loading,
    Loaded(Vec<HistoryEntry>),
    Failed(String),
}

/// Backend-persisted transcript, shown on its own screen. Never merged into
/// the live session.
#[derive(Debug, Default)]
pub struct HistoryView {
    pub state: HistoryState,
    pub scroll: u16,
    request: u64,
}

impl HistoryView {
    /// Returns the id the response must carry to be accepted.
    pub fn begin_load(&mut self) -> u64 {
        self.request += 1;
        self.state = HistoryState::Loading;
        self.scroll = 0;
        self.request
    }

    /// Responses to superseded requests are ignored.
    pub fn finish_load(
        &mut self,
        request: u64,
        outcome: Result<Vec<HistoryEntry>, ClientError>,
    ) -> bool {
        if request != self.request {
            return false;
        }

        self.state = match outcome {
            Ok(entries) => HistoryState::Loaded(entries),
            Err(e) => {
                warn!("History fetch failed: {}", e);
                let reason = e
                    .backend_detail()
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string());
                HistoryState::Failed(format!("{}: {}", strings::HISTORY_FAILED, reason))
            }
        };
        true
    }

    pub async fn load<B: ReviewBackend + ?Sized>(&mut self, backend: &B) {
        let request = self.begin_load();
        let outcome = backend.history().await;
        self.finish_load(request, outcome);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines);
    }
}

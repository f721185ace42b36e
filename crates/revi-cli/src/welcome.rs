use revi_client::{ClientError, UploadAck};

use crate::ingest::{FileIngest, IngestEvent, IngestKind, TextIngest};
use crate::strings;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IngestTab {
    #[default]
    Text,
    File,
}

impl IngestTab {
    pub fn label(&self) -> &'static str {
        match self {
            IngestTab::Text => strings::TEXT_TAB,
            IngestTab::File => strings::FILE_TAB,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            IngestTab::Text => 0,
            IngestTab::File => 1,
        }
    }

    pub fn other(self) -> Self {
        match self {
            IngestTab::Text => IngestTab::File,
            IngestTab::File => IngestTab::Text,
        }
    }
}

/// Landing panel shown while the transcript is empty: sample questions plus
/// the two ingestion widgets behind a tab selector.
#[derive(Debug, Default)]
pub struct WelcomePanel {
    pub sample_index: usize,
    pub tab: IngestTab,
    pub text: TextIngest,
    pub file: FileIngest,
}

impl WelcomePanel {
    pub fn samples() -> &'static [&'static str] {
        &strings::SAMPLE_QUESTIONS
    }

    pub fn selected_sample(&self) -> &'static str {
        strings::SAMPLE_QUESTIONS[self.sample_index]
    }

    pub fn sample_up(&mut self) {
        if self.sample_index > 0 {
            self.sample_index -= 1;
        }
    }

    pub fn sample_down(&mut self) {
        if self.sample_index < strings::SAMPLE_QUESTIONS.len() - 1 {
            self.sample_index += 1;
        }
    }

    /// Widget inputs survive the switch.
    pub fn switch_tab(&mut self) {
        self.tab = self.tab.other();
    }

    pub fn finish_upload(
        &mut self,
        kind: IngestKind,
        outcome: Result<UploadAck, ClientError>,
    ) -> Option<IngestEvent> {
        match kind {
            IngestKind::Text => self.text.finish(outcome),
            IngestKind::File => self.file.finish(outcome),
        }
    }
}

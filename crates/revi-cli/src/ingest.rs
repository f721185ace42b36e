//! Review ingestion widgets: pasted text and file upload.
//!
//! Each widget owns its own input and status line. A successful upload is
//! reported to the owner as an [`IngestEvent`]; failures stay inside the
//! widget as a status message.

use std::path::{Path, PathBuf};

use revi_client::{ClientError, ReviewBackend, UploadAck, UploadFile};
use tracing::{info, warn};

use crate::strings;

const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "csv"];
const ALLOWED_MIME_TYPES: [&str; 3] = ["text/plain", "text/csv", "application/csv"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IngestKind {
    Text,
    File,
}

#[derive(Clone, Debug, PartialEq)]
pub enum IngestEvent {
    Uploaded { kind: IngestKind, ack: UploadAck },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Success(String),
    Error(String),
}

impl Status {
    pub fn text(&self) -> &str {
        match self {
            Status::Info(s) | Status::Success(s) | Status::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error(_))
    }
}

// ===== TEXT =====

#[derive(Debug, Default)]
pub struct TextIngest {
    pub input: String,
    uploading: bool,
    status: Option<Status>,
}

impl TextIngest {
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    pub fn push(&mut self, c: char) {
        if !self.uploading {
            self.input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.uploading {
            self.input.pop();
        }
    }

    pub fn clear(&mut self) {
        if !self.uploading {
            self.input.clear();
            self.status = None;
        }
    }

    /// Validate and mark the widget busy. Returns the text to send.
    pub fn begin_submit(&mut self) -> Option<String> {
        if self.uploading {
            return None;
        }
        if self.input.trim().is_empty() {
            self.status = Some(Status::Error(strings::TEXT_EMPTY.to_string()));
            return None;
        }

        self.uploading = true;
        self.status = Some(Status::Info(strings::TEXT_UPLOADING.to_string()));
        Some(self.input.clone())
    }

    pub fn finish(&mut self, outcome: Result<UploadAck, ClientError>) -> Option<IngestEvent> {
        self.uploading = false;

        match outcome {
            Ok(ack) => {
                info!("Pasted reviews accepted by backend");
                self.input.clear();
                let msg = ack.message().unwrap_or(strings::TEXT_UPLOADED).to_string();
                self.status = Some(Status::Success(msg));
                Some(IngestEvent::Uploaded {
                    kind: IngestKind::Text,
                    ack,
                })
            }
            Err(e) => {
                warn!("Text upload failed: {}", e);
                let msg = match &e {
                    ClientError::Backend { .. } => e
                        .backend_detail()
                        .unwrap_or(strings::TEXT_BACKEND_FAILED)
                        .to_string(),
                    other => format!("{}: {}", strings::TEXT_UPLOAD_FAILED, other),
                };
                self.status = Some(Status::Error(msg));
                None
            }
        }
    }

    pub async fn submit<B: ReviewBackend + ?Sized>(&mut self, backend: &B) -> Option<IngestEvent> {
        let text = self.begin_submit()?;
        let outcome = backend.upload_text(&text).await;
        self.finish(outcome)
    }
}

// ===== FILE =====

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Default)]
pub struct FileIngest {
    pub path_input: String,
    selected: Option<SelectedFile>,
    uploading: bool,
    status: Option<Status>,
}

/// Client-side type check only; the backend does its own validation.
pub fn is_allowed_file(path: &Path) -> bool {
    let by_extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false);

    by_extension
        || mime_guess::from_path(path)
            .iter_raw()
            .any(|mime| ALLOWED_MIME_TYPES.contains(&mime))
}

impl FileIngest {
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn push(&mut self, c: char) {
        if !self.uploading {
            self.path_input.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if !self.uploading {
            self.path_input.pop();
        }
    }

    pub fn clear(&mut self) {
        if !self.uploading {
            self.path_input.clear();
            self.selected = None;
            self.status = None;
        }
    }

    /// Pick a file. Disallowed types clear the selection.
    pub fn select<P: AsRef<Path>>(&mut self, path: P) -> bool {
        if self.uploading {
            return false;
        }
        let path = path.as_ref();

        if !is_allowed_file(path) {
            self.selected = None;
            self.status = Some(Status::Error(strings::FILE_WRONG_TYPE.to_string()));
            return false;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        self.selected = Some(SelectedFile {
            path: path.to_path_buf(),
            name,
        });
        self.status = None;
        true
    }

    pub fn select_input(&mut self) -> bool {
        let raw = self.path_input.trim().to_string();
        if raw.is_empty() {
            return false;
        }
        self.select(raw)
    }

    /// Mark the widget busy. Returns the path to read and send.
    pub fn begin_upload(&mut self) -> Option<PathBuf> {
        if self.uploading {
            return None;
        }
        let Some(file) = &self.selected else {
            self.status = Some(Status::Error(strings::FILE_NOT_SELECTED.to_string()));
            return None;
        };

        let path = file.path.clone();
        self.uploading = true;
        self.status = Some(Status::Info(strings::FILE_UPLOADING.to_string()));
        Some(path)
    }

    pub fn finish(&mut self, outcome: Result<UploadAck, ClientError>) -> Option<IngestEvent> {
        self.uploading = false;

        match outcome {
            Ok(ack) => {
                info!("Review file accepted by backend");
                self.selected = None;
                self.path_input.clear();
                self.status = Some(Status::Success(strings::FILE_UPLOADED.to_string()));
                Some(IngestEvent::Uploaded {
                    kind: IngestKind::File,
                    ack,
                })
            }
            Err(e) => {
                warn!("File upload failed: {}", e);
                let reason = match &e {
                    ClientError::Backend { .. } => e
                        .backend_detail()
                        .unwrap_or(strings::TRY_AGAIN)
                        .to_string(),
                    ClientError::FileTooLarge { .. } => strings::FILE_TOO_LARGE.to_string(),
                    other => other.to_string(),
                };
                self.status = Some(Status::Error(format!(
                    "{}{}",
                    strings::FILE_UPLOAD_FAILED,
                    reason
                )));
                None
            }
        }
    }

    pub async fn upload<B: ReviewBackend + ?Sized>(&mut self, backend: &B) -> Option<IngestEvent> {
        let path = self.begin_upload()?;
        let outcome = read_and_upload(backend, path).await;
        self.finish(outcome)
    }
}

pub async fn read_and_upload<B: ReviewBackend + ?Sized>(
    backend: &B,
    path: PathBuf,
) -> Result<UploadAck, ClientError> {
    let file = UploadFile::read(&path).await?;
    backend.upload_file(file).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ack, backend_error, MockBackend};
    use std::io::Write;

    #[test]
    fn test_empty_text_rejected_locally() {
        let mut widget = TextIngest::default();
        widget.input = "   \n  ".into();

        assert!(widget.begin_submit().is_none());
        assert_eq!(
            widget.status(),
            Some(&Status::Error(strings::TEXT_EMPTY.to_string()))
        );
        assert!(!widget.is_uploading());
    }

    #[tokio::test]
    async fn test_text_success_clears_and_emits_event() {
        let mut backend = MockBackend::new();
        backend.expect_upload_text().times(1).returning(|reviews| {
            assert_eq!(reviews.to_string(), "Muy bueno\nMuy malo");
            Ok(ack("Docs loaded successfully."))
        });

        let mut widget = TextIngest::default();
        widget.input = "Muy bueno\nMuy malo".into();
        let event = widget.submit(&backend).await;

        assert_eq!(
            event,
            Some(IngestEvent::Uploaded {
                kind: IngestKind::Text,
                ack: ack("Docs loaded successfully."),
            })
        );
        assert!(widget.input.is_empty());
        assert!(!widget.is_uploading());
    }

    #[tokio::test]
    async fn test_text_failure_shows_backend_detail() {
        let mut backend = MockBackend::new();
        backend
            .expect_upload_text()
            .returning(|_| Err(backend_error(Some("String can't be empty."))));

        let mut widget = TextIngest::default();
        widget.input = "x".into();
        assert!(widget.submit(&backend).await.is_none());

        assert_eq!(widget.status().unwrap().text(), "String can't be empty.");
        assert_eq!(widget.input, "x");
    }

    #[tokio::test]
    async fn test_text_failure_without_detail_is_generic() {
        let mut backend = MockBackend::new();
        backend
            .expect_upload_text()
            .returning(|_| Err(backend_error(None)));

        let mut widget = TextIngest::default();
        widget.input = "x".into();
        widget.submit(&backend).await;

        assert_eq!(widget.status().unwrap().text(), strings::TEXT_BACKEND_FAILED);
    }

    #[test]
    fn test_text_local_failure_is_localized() {
        let mut widget = TextIngest::default();
        widget.input = "x".into();
        widget.begin_submit().unwrap();

        let err = ClientError::Io(std::io::Error::other("connection reset"));
        assert!(widget.finish(Err(err)).is_none());

        let text = widget.status().unwrap().text();
        assert!(text.starts_with(strings::TEXT_UPLOAD_FAILED));
        assert!(text.contains("connection reset"));
        assert!(!widget.is_uploading());
    }

    #[test]
    fn test_text_busy_rejects_second_submit() {
        let mut widget = TextIngest::default();
        widget.input = "reseña".into();
        assert!(widget.begin_submit().is_some());
        assert!(widget.begin_submit().is_none());

        widget.push('x');
        widget.clear();
        assert_eq!(widget.input, "reseña");
    }

    #[test]
    fn test_select_pdf_rejected() {
        let mut widget = FileIngest::default();
        assert!(!widget.select("reviews.pdf"));
        assert!(widget.selected().is_none());
        assert_eq!(widget.status().unwrap().text(), strings::FILE_WRONG_TYPE);
    }

    #[test]
    fn test_select_csv_accepted() {
        let mut widget = FileIngest::default();
        assert!(widget.select("reviews.csv"));
        assert_eq!(widget.selected().unwrap().name, "reviews.csv");
        assert!(widget.status().is_none());

        // A bad pick afterwards drops the previous selection
        assert!(!widget.select("photo.PNG"));
        assert!(widget.selected().is_none());
    }

    #[test]
    fn test_allowed_file_types() {
        assert!(is_allowed_file(Path::new("a.txt")));
        assert!(is_allowed_file(Path::new("A.CSV")));
        assert!(is_allowed_file(Path::new("/tmp/dir/reviews.csv")));
        assert!(!is_allowed_file(Path::new("reviews")));
        assert!(!is_allowed_file(Path::new("reviews.docx")));
    }

    #[test]
    fn test_upload_without_selection() {
        let mut widget = FileIngest::default();
        assert!(widget.begin_upload().is_none());
        assert_eq!(widget.status().unwrap().text(), strings::FILE_NOT_SELECTED);
    }

    #[tokio::test]
    async fn test_file_upload_success_resets_selection() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "Excelente calidad").unwrap();

        let mut backend = MockBackend::new();
        backend.expect_upload_file().times(1).returning(|upload| {
            assert!(upload.file_name.ends_with(".txt"));
            assert_eq!(upload.mime, "text/plain");
            Ok(ack("ok"))
        });

        let mut widget = FileIngest::default();
        widget.path_input = file.path().display().to_string();
        assert!(widget.select_input());

        let event = widget.upload(&backend).await;
        assert!(matches!(
            event,
            Some(IngestEvent::Uploaded {
                kind: IngestKind::File,
                ..
            })
        ));
        assert!(widget.selected().is_none());
        assert!(widget.path_input.is_empty());
        assert_eq!(widget.status().unwrap().text(), strings::FILE_UPLOADED);
    }

    #[tokio::test]
    async fn test_file_upload_failure_message() {
        let file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();

        let mut backend = MockBackend::new();
        backend
            .expect_upload_file()
            .returning(|_| Err(backend_error(Some("Invalid CSV"))));

        let mut widget = FileIngest::default();
        widget.select(file.path());
        assert!(widget.upload(&backend).await.is_none());

        let status = widget.status().unwrap();
        assert!(status.is_error());
        assert_eq!(status.text(), "Error al subir el archivo. Invalid CSV");
        assert!(widget.selected().is_some());
    }

    #[tokio::test]
    async fn test_file_upload_missing_file_never_reaches_backend() {
        let mut backend = MockBackend::new();
        backend.expect_upload_file().never();

        let mut widget = FileIngest::default();
        widget.select("/definitely/not/here/reviews.txt");
        assert!(widget.upload(&backend).await.is_none());

        assert!(widget
            .status()
            .unwrap()
            .text()
            .starts_with(strings::FILE_UPLOAD_FAILED));
    }
}

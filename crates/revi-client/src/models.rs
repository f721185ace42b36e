use serde::{Deserialize, Serialize};

// ===== REQUEST MODELS =====

#[derive(Debug, Serialize)]
pub struct QuestionRequest<'a> {
    pub question: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TextUploadRequest<'a> {
    pub reviews: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SearchRequest<'a> {
    pub query: &'a str,
}

// ===== RESPONSE MODELS =====

/// Review snippet cited as evidence for an answer.
///
/// Kept in the order the backend returned it; the client never re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub document_id: String,
    pub content_snippet: String,
    pub similarity_score: f64,
}

impl Source {
    /// Score as shown next to a snippet (three decimals)
    pub fn score_label(&self) -> String {
        format!("{:.3}", self.similarity_score)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct QuestionResponse {
    pub answer: String,
    #[serde(default)]
    pub results: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Source>,
}

/// Backend acknowledgment for an ingestion call. The shape is backend-defined,
/// so the raw JSON is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadAck(pub serde_json::Value);

impl UploadAck {
    /// The `message` field, when the backend sends one
    pub fn message(&self) -> Option<&str> {
        self.0.get("message").and_then(|m| m.as_str())
    }
}

/// Error body produced by the backend on non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// `detail` may be a plain string or a structured validation list
    pub(crate) fn detail_text(self) -> Option<String> {
        match self.detail? {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            serde_json::Value::String(_) | serde_json::Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_response_without_results() {
        let resp: QuestionResponse =
            serde_json::from_str(r#"{"answer": "No reviews found for that question."}"#).unwrap();
        assert!(resp.results.is_empty());
    }

    #[test]
    fn test_source_score_label() {
        let source = Source {
            document_id: "d1".into(),
            content_snippet: "...".into(),
            similarity_score: 0.92,
        };
        assert_eq!(source.score_label(), "0.920");
    }

    #[test]
    fn test_error_body_detail() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "String can't be empty."}"#).unwrap();
        assert_eq!(body.detail_text().as_deref(), Some("String can't be empty."));

        let body: ErrorBody = serde_json::from_str(r#"{"detail": ""}"#).unwrap();
        assert_eq!(body.detail_text(), None);

        let body: ErrorBody = serde_json::from_str(r#"{"error": "x"}"#).unwrap();
        assert_eq!(body.detail_text(), None);
    }

    #[test]
    fn test_upload_ack_message() {
        let ack = UploadAck(serde_json::json!({"message": "Docs loaded successfully."}));
        assert_eq!(ack.message(), Some("Docs loaded successfully."));
        assert_eq!(UploadAck(serde_json::json!({})).message(), None);
    }
}

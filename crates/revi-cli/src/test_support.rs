use async_trait::async_trait;
use mockall::mock;
use revi_client::{
    ClientError, HistoryEntry, QuestionResponse, ReviewBackend, Source, UploadAck, UploadFile,
};

mock! {
    pub Backend {}

    #[async_trait]
    impl ReviewBackend for Backend {
        async fn ask(&self, question: &str) -> Result<QuestionResponse, ClientError>;
        async fn history(&self) -> Result<Vec<HistoryEntry>, ClientError>;
        async fn upload_file(&self, file: UploadFile) -> Result<UploadAck, ClientError>;
        async fn upload_text(&self, reviews: &str) -> Result<UploadAck, ClientError>;
        async fn search(&self, query: &str) -> Result<Vec<Source>, ClientError>;
    }
}

pub fn answer(text: &str, results: Vec<Source>) -> QuestionResponse {
    QuestionResponse {
        answer: text.to_string(),
        results,
    }
}

pub fn source(document_id: &str, score: f64) -> Source {
    Source {
        document_id: document_id.to_string(),
        content_snippet: format!("snippet of {}", document_id),
        similarity_score: score,
    }
}

pub fn ack(message: &str) -> UploadAck {
    UploadAck(serde_json::json!({ "message": message }))
}

pub fn backend_error(detail: Option<&str>) -> ClientError {
    ClientError::Backend {
        status: 500,
        detail: detail.map(str::to_string),
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::ClientError;
use crate::models::{
    ErrorBody, HistoryEntry, HistoryResponse, QuestionRequest, QuestionResponse, SearchRequest,
    SearchResponse, Source, TextUploadRequest, UploadAck,
};
use crate::upload::UploadFile;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// The question-answering backend as seen by the client.
///
/// Every call is a single request: no retries, no pagination.
#[async_trait]
pub trait ReviewBackend: Send + Sync {
    /// POST `/app/questions/`
    async fn ask(&self, question: &str) -> Result<QuestionResponse, ClientError>;

    /// GET `/app/history/`
    async fn history(&self) -> Result<Vec<HistoryEntry>, ClientError>;

    /// POST `/app/upload/` as multipart, field `file`
    async fn upload_file(&self, file: UploadFile) -> Result<UploadAck, ClientError>;

    /// POST `/upload-text/`
    async fn upload_text(&self, reviews: &str) -> Result<UploadAck, ClientError>;

    /// POST `/app/search`
    async fn search(&self, query: &str) -> Result<Vec<Source>, ClientError>;
}

#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ReviewBackend for HttpBackend {
    async fn ask(&self, question: &str) -> Result<QuestionResponse, ClientError> {
        debug!("Asking backend ({} chars)", question.chars().count());

        let response = self
            .client
            .post(self.url("/app/questions/"))
            .json(&QuestionRequest { question })
            .send()
            .await?;

        let answer: QuestionResponse = decode(response).await?;
        debug!("Answer received with {} sources", answer.results.len());
        Ok(answer)
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ClientError> {
        let response = self.client.get(self.url("/app/history/")).send().await?;
        let body: HistoryResponse = decode(response).await?;
        Ok(body.history)
    }

    async fn upload_file(&self, file: UploadFile) -> Result<UploadAck, ClientError> {
        debug!("Uploading {} ({})", file.file_name, file.size_human());

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.mime)?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/app/upload/"))
            .multipart(form)
            .send()
            .await?;

        decode_ack(response).await
    }

    async fn upload_text(&self, reviews: &str) -> Result<UploadAck, ClientError> {
        debug!("Uploading pasted reviews ({} chars)", reviews.chars().count());

        let response = self
            .client
            .post(self.url("/upload-text/"))
            .json(&TextUploadRequest { reviews })
            .send()
            .await?;

        decode_ack(response).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Source>, ClientError> {
        let response = self
            .client
            .post(self.url("/app/search"))
            .json(&SearchRequest { query })
            .send()
            .await?;

        let body: SearchResponse = decode(response).await?;
        Ok(body.results)
    }
}

// --- Helpers ---

async fn error_for_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::detail_text);

    warn!("Backend returned {}: {}", status, detail.as_deref().unwrap_or("<no detail>"));
    Err(ClientError::Backend {
        status: status.as_u16(),
        detail,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let response = error_for_status(response).await?;
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
}

async fn decode_ack(response: Response) -> Result<UploadAck, ClientError> {
    let response = error_for_status(response).await?;
    let body = response.text().await?;

    if body.trim().is_empty() {
        return Ok(UploadAck(serde_json::Value::Null));
    }
    serde_json::from_str(&body)
        .map(UploadAck)
        .map_err(|e| ClientError::Decode(e.to_string()))
}

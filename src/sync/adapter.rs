//! Sync adapter
//!
//! Persists newly created comments without blocking the owner of the
//! annotation state. Each submission runs on its own task; its outcome is sent
//! back over a channel and applied by the owner, so engine state only ever
//! changes on one thread.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use super::types::{AnnotationPayload, PersistedAnnotation, SubmitResponse, SyncError, SyncOutcome};
use crate::annotations::Comment;
use crate::config::SyncConfig;
use crate::document::DocumentKey;

/// Backend that accepts and lists annotations
#[async_trait]
pub trait AnnotationSink: Send + Sync {
    /// Store one annotation, returning the id the backend assigned
    async fn submit(&self, payload: &AnnotationPayload) -> Result<String, SyncError>;

    /// List stored annotations for a document
    async fn fetch(&self, document: &DocumentKey) -> Result<Vec<PersistedAnnotation>, SyncError>;
}

/// HTTP backend client
pub struct HttpSink {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSink {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(&config.endpoint)
    }

    fn url(&self, segments: &[&str]) -> Result<reqwest::Url, SyncError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| SyncError::Endpoint(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| SyncError::Endpoint(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl AnnotationSink for HttpSink {
    async fn submit(&self, payload: &AnnotationPayload) -> Result<String, SyncError> {
        let url = self.url(&["annotations"])?;

        let response = self
            .client
            .post(url)
            .json(payload)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Status { status, body });
        }

        let created: SubmitResponse = response
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))?;
        Ok(created.id)
    }

    async fn fetch(&self, document: &DocumentKey) -> Result<Vec<PersistedAnnotation>, SyncError> {
        let url = self.url(&[
            "annotations",
            document.instance_id.as_str(),
            document.agent_id.as_str(),
        ])?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Status { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| SyncError::Decode(e.to_string()))
    }
}

/// Hands comments to a sink in the background
#[derive(Clone)]
pub struct SyncAdapter {
    sink: Arc<dyn AnnotationSink>,
    outcomes: mpsc::UnboundedSender<SyncOutcome>,
    runtime: Handle,
}

/// Receiving end for persistence outcomes
pub struct SyncOutcomes {
    rx: mpsc::UnboundedReceiver<SyncOutcome>,
}

impl SyncAdapter {
    /// Create an adapter bound to the current tokio runtime
    pub fn new(sink: Arc<dyn AnnotationSink>) -> Result<(Self, SyncOutcomes), SyncError> {
        let runtime = Handle::try_current().map_err(|_| SyncError::NoRuntime)?;
        let (tx, rx) = mpsc::unbounded_channel();

        Ok((
            Self {
                sink,
                outcomes: tx,
                runtime,
            },
            SyncOutcomes { rx },
        ))
    }

    /// Submit a comment; the outcome arrives on `SyncOutcomes`
    ///
    /// No deduplication, no retry, no timeout.
    pub fn persist(&self, document: &DocumentKey, comment: &Comment) {
        let payload = AnnotationPayload::for_comment(document, comment);
        let sink = Arc::clone(&self.sink);
        let outcomes = self.outcomes.clone();
        let document = document.clone();
        let comment_id = comment.id.clone();

        tracing::debug!("Persisting comment {} on {}", comment_id, document);

        self.runtime.spawn(async move {
            let result = sink.submit(&payload).await.map_err(|e| {
                tracing::warn!("Failed to persist comment {}: {}", comment_id, e);
                e.to_string()
            });

            let outcome = SyncOutcome {
                document,
                comment_id,
                result,
            };
            if outcomes.send(outcome).is_err() {
                tracing::debug!("Sync outcome dropped, receiver closed");
            }
        });
    }

    /// Read stored annotations for a document
    pub async fn fetch(&self, document: &DocumentKey) -> Result<Vec<PersistedAnnotation>, SyncError> {
        self.sink.fetch(document).await
    }
}

impl SyncOutcomes {
    /// Next outcome if one is ready
    pub fn try_next(&mut self) -> Option<SyncOutcome> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next outcome
    pub async fn next(&mut self) -> Option<SyncOutcome> {
        self.rx.recv().await
    }
}

//! Mock transport for testing.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use crate::client::{Transport, TransportError, TransportRequest};

/// A recorded request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// The request as it would have been sent.
    pub request: TransportRequest,
    /// When the request reached the transport.
    pub timestamp: Instant,
}

/// Mock implementation of the Transport trait.
///
/// Responses are replayed in the order they were queued. Once the queue is
/// empty the default body is returned, or `EmptyBody` if none is set.
///
/// # Example
///
/// ```rust,ignore
/// use moderngov_core::testing::{fixtures, MockTransport};
///
/// let transport = Arc::new(MockTransport::new());
/// transport.push_body(fixtures::COMMITTEES_XML).await;
///
/// let client = ModernGovClient::with_transport(transport.clone(), &config, resolver);
/// let committees = client.committees("https://democracy.leeds.gov.uk").await?;
///
/// let requests = transport.recorded_requests().await;
/// assert_eq!(requests[0].request.url.path(), "/mgWebService.asmx/GetCommittees");
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    /// Queued responses, consumed front to back.
    responses: Arc<RwLock<VecDeque<Result<String, TransportError>>>>,
    /// Returned when the queue is empty.
    default_body: Arc<RwLock<Option<String>>>,
    /// Every request received.
    requests: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock that answers every request with `body`.
    pub fn with_default_body(body: &str) -> Self {
        Self {
            default_body: Arc::new(RwLock::new(Some(body.to_string()))),
            ..Self::default()
        }
    }

    /// Queue a successful response body.
    pub async fn push_body(&self, body: &str) {
        self.responses
            .write()
            .await
            .push_back(Ok(body.to_string()));
    }

    /// Queue a transport failure.
    pub async fn push_error(&self, error: TransportError) {
        self.responses.write().await.push_back(Err(error));
    }

    pub async fn set_default_body(&self, body: &str) {
        *self.default_body.write().await = Some(body.to_string());
    }

    /// Get recorded requests.
    pub async fn recorded_requests(&self) -> Vec<RecordedRequest> {
        self.requests.read().await.clone()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<TransportRequest> {
        self.requests
            .read()
            .await
            .last()
            .map(|r| r.request.clone())
    }

    /// Get the number of requests received.
    pub async fn request_count(&self) -> usize {
        self.requests.read().await.len()
    }

    /// Clear recorded requests.
    pub async fn clear_recorded(&self) {
        self.requests.write().await.clear();
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: &TransportRequest) -> Result<String, TransportError> {
        self.requests.write().await.push(RecordedRequest {
            request: request.clone(),
            timestamp: Instant::now(),
        });

        if let Some(response) = self.responses.write().await.pop_front() {
            return response;
        }

        self.default_body
            .read()
            .await
            .clone()
            .ok_or(TransportError::EmptyBody)
    }
}

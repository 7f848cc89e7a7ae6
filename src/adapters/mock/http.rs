//! Mock HTTP client for testing.
//!
//! Provides a configurable mock transport that can replay a response body as
//! a fixed sequence of chunks, fail the request, fail mid-stream, or stall.

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TransportError;
use crate::traits::{ByteStream, Headers, HttpClient};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: String,
}

impl RecordedRequest {
    /// Parse the recorded body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Deliver these chunks, then end the body
    Stream(Vec<Bytes>),
    /// Deliver these chunks, then fail the body stream
    StreamThenError(Vec<Bytes>, TransportError),
    /// Deliver these chunks, then never yield again
    StreamThenStall(Vec<Bytes>),
    /// Reject the request itself
    Error(TransportError),
}

impl MockResponse {
    /// Body chunks from string slices.
    pub fn chunks<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockResponse::Stream(
            chunks
                .into_iter()
                .map(|c| Bytes::from(c.into()))
                .collect(),
        )
    }
}

/// Mock HTTP client for testing.
///
/// Responses are matched by exact URL first, then by URL prefix, then the
/// default response. Every call is recorded.
///
/// # Example
///
/// ```ignore
/// use interview_chat::adapters::mock::{MockHttpClient, MockResponse};
///
/// let client = MockHttpClient::new();
/// client.set_default_response(MockResponse::chunks(["data: [DONE]\n"]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockHttpClient {
    /// Configured responses by URL pattern
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Default response when no specific match
    default_response: Arc<Mutex<Option<MockResponse>>>,
    /// Recorded requests for verification
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a client that answers every URL with `response`.
    pub fn with_default(response: MockResponse) -> Self {
        let client = Self::new();
        client.set_default_response(response);
        client
    }

    /// Set a response for a specific URL.
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.responses.lock().insert(url.to_string(), response);
    }

    /// Set a default response for URLs without specific matches.
    pub fn set_default_response(&self, response: MockResponse) {
        *self.default_response.lock() = Some(response);
    }

    /// Get all recorded requests.
    pub fn get_requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Clear all recorded requests.
    pub fn clear_requests(&self) {
        self.requests.lock().clear();
    }

    fn record_request(&self, url: &str, headers: &Headers, body: &str) {
        self.requests.lock().push(RecordedRequest {
            url: url.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
    }

    fn get_response(&self, url: &str) -> Option<MockResponse> {
        {
            let responses = self.responses.lock();

            if let Some(response) = responses.get(url) {
                return Some(response.clone());
            }

            for (pattern, response) in responses.iter() {
                if url.starts_with(pattern) {
                    return Some(response.clone());
                }
            }
        }

        self.default_response.lock().clone()
    }
}

fn chunk_stream(chunks: Vec<Bytes>) -> impl futures::Stream<Item = Result<Bytes, TransportError>> {
    stream::iter(chunks.into_iter().map(Ok))
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, TransportError> {
        self.record_request(url, headers, body);

        match self.get_response(url) {
            Some(MockResponse::Stream(chunks)) => Ok(Box::pin(chunk_stream(chunks))),
            Some(MockResponse::StreamThenError(chunks, err)) => Ok(Box::pin(
                chunk_stream(chunks).chain(stream::once(async move { Err::<Bytes, _>(err) })),
            )),
            Some(MockResponse::StreamThenStall(chunks)) => {
                Ok(Box::pin(chunk_stream(chunks).chain(stream::pending::<
                    Result<Bytes, TransportError>,
                >())))
            }
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(TransportError::Other(format!(
                "No mock response for URL: {}",
                url
            ))),
        }
    }
}

//! HTTP client trait abstraction.
//!
//! The session only ever needs one primitive: POST a JSON body and read the
//! response body as a stream of byte chunks. Keeping it behind a trait lets
//! tests script the body chunk by chunk.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;

use crate::error::TransportError;

/// HTTP headers represented as a key-value map.
pub type Headers = HashMap<String, String>;

/// A response body delivered chunk by chunk.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Trait for the streaming transport.
///
/// # Example
///
/// ```ignore
/// use interview_chat::traits::{HttpClient, Headers};
///
/// async fn first_chunk<C: HttpClient>(client: &C) -> Option<bytes::Bytes> {
///     use futures_util::StreamExt;
///     let mut body = client.post_stream("https://host/chat", "{}", &Headers::new()).await.ok()?;
///     body.next().await?.ok()
/// }
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a POST request and return the body as a stream.
    ///
    /// # Arguments
    /// * `url` - The URL to request
    /// * `body` - Request body as a string
    /// * `headers` - Request headers
    ///
    /// # Returns
    /// The body stream, or an error if the request was rejected, the status
    /// was not a success, or there is no body to stream.
    async fn post_stream(
        &self,
        url: &str,
        body: &str,
        headers: &Headers,
    ) -> Result<ByteStream, TransportError>;
}

//! Test transports beyond the in-crate mock.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use interview_chat::error::TransportError;
use interview_chat::traits::{ByteStream, Headers, HttpClient};
use tokio::sync::mpsc;

type BodyItem = Result<Bytes, TransportError>;

/// Transport whose single response body is fed by the test, chunk by chunk.
pub struct ChannelHttpClient {
    body: Mutex<Option<mpsc::UnboundedReceiver<BodyItem>>>,
}

/// Test-side handle that pushes chunks into a [`ChannelHttpClient`] body.
pub struct BodyFeeder {
    tx: mpsc::UnboundedSender<BodyItem>,
}

impl ChannelHttpClient {
    pub fn new() -> (Self, BodyFeeder) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                body: Mutex::new(Some(rx)),
            },
            BodyFeeder { tx },
        )
    }
}

impl BodyFeeder {
    pub fn push(&self, chunk: impl Into<String>) {
        let _ = self.tx.send(Ok(Bytes::from(chunk.into())));
    }

    pub fn fail(&self, err: TransportError) {
        let _ = self.tx.send(Err(err));
    }

    /// Close the body (transport exhaustion).
    pub fn finish(self) {}
}

#[async_trait]
impl HttpClient for ChannelHttpClient {
    async fn post_stream(
        &self,
        _url: &str,
        _body: &str,
        _headers: &Headers,
    ) -> Result<ByteStream, TransportError> {
        let rx = self
            .body
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| TransportError::Other("body already consumed".to_string()))?;

        let stream = futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        });
        Ok(Box::pin(stream))
    }
}

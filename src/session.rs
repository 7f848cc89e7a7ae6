//! Streaming chat session.
//!
//! [`ChatSession`] runs one exchange at a time: it appends the user turn,
//! POSTs the history, and folds the streamed reply into the conversation as
//! it arrives. Callers watch the conversation through [`ChatSession::subscribe`]
//! or read [`ChatSession::snapshot`] at any time.
//!
//! Failures never escape as errors. A failed exchange leaves exactly one
//! apology turn in the transcript (after whatever had already streamed) and
//! reports the technical cause only in the returned [`ExchangeOutcome`] and
//! in the logs.

use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::StreamExt;
use parking_lot::Mutex;
use tokio::sync::{watch, Notify};
use tokio_util::sync::CancellationToken;

use crate::config::ChatConfig;
use crate::conversation::Conversation;
use crate::error::ExchangeError;
use crate::models::{ChatRequest, InterviewMode, Message};
use crate::sse::{decode_line, extract_delta, LineFramer, StreamFrame};
use crate::traits::HttpClient;

/// Assistant turn recorded when an exchange fails.
pub const APOLOGY_MESSAGE: &str =
    "I apologize, but I encountered an error. Could you please try again?";

/// First user turn sent by [`ChatSession::start_interview`].
pub const OPENING_PROMPT: &str = "Start the interview";

/// Where the session is in its current (or last) exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Idle,
    /// User turn recorded, request not yet sent
    UserAppended,
    /// Request sent, waiting for the response body
    Requesting,
    /// Folding fragments from the body
    Streaming,
    Completed,
    Failed,
    Cancelled,
}

impl SessionPhase {
    /// Whether an exchange is in progress.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SessionPhase::UserAppended | SessionPhase::Requesting | SessionPhase::Streaming
        )
    }
}

/// Why a message was not sent at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Another exchange is still requesting or streaming
    Busy,
    /// The text was empty after trimming
    BlankInput,
}

/// Result of one [`ChatSession::send_message`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The stream ended (sentinel or closure) and the reply is sealed
    Completed,
    /// The exchange failed; the apology turn has been recorded
    Failed(ExchangeError),
    /// The exchange was cancelled; folded fragments were kept
    Cancelled,
    /// Nothing was sent and the conversation is unchanged
    Rejected(RejectReason),
}

impl ExchangeOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, ExchangeOutcome::Completed)
    }
}

/// Cancellation handle of one exchange.
///
/// `id` increases with every claimed exchange, so a handle outliving its
/// exchange can be told apart from the current one.
#[derive(Debug, Clone, Default)]
struct ExchangeTicket {
    id: u64,
    token: CancellationToken,
}

/// Owner of one interview conversation and its streaming exchanges.
///
/// Methods take `&self`, so a session can be shared behind an `Arc` between
/// the task sending messages and the task that cancels or resets it.
pub struct ChatSession<C: HttpClient> {
    client: C,
    config: ChatConfig,
    mode: Mutex<InterviewMode>,
    phase: Mutex<SessionPhase>,
    conversation: watch::Sender<Conversation>,
    in_flight: AtomicBool,
    /// Signalled whenever an exchange releases the session
    released: Notify,
    /// Ticket of the current (or last) exchange
    cancel: Mutex<ExchangeTicket>,
}

impl<C: HttpClient> ChatSession<C> {
    pub fn new(client: C, config: ChatConfig) -> Self {
        let mode = config.mode;
        let (conversation, _) = watch::channel(Conversation::new());
        Self {
            client,
            config,
            mode: Mutex::new(mode),
            phase: Mutex::new(SessionPhase::Idle),
            conversation,
            in_flight: AtomicBool::new(false),
            released: Notify::new(),
            cancel: Mutex::new(ExchangeTicket::default()),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    /// Copy of the current conversation.
    pub fn snapshot(&self) -> Conversation {
        self.conversation.borrow().clone()
    }

    /// Receiver notified after every change to the conversation.
    pub fn subscribe(&self) -> watch::Receiver<Conversation> {
        self.conversation.subscribe()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.conversation.borrow().messages().to_vec()
    }

    pub fn is_loading(&self) -> bool {
        self.conversation.borrow().is_loading()
    }

    pub fn phase(&self) -> SessionPhase {
        *self.phase.lock()
    }

    /// Whether an exchange currently holds the session.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn mode(&self) -> InterviewMode {
        *self.mode.lock()
    }

    /// Change the interview mode used by the next request.
    pub fn set_mode(&self, mode: InterviewMode) {
        let mut current = self.mode.lock();
        if *current != mode {
            tracing::info!("Interview mode changed: {} -> {}", *current, mode);
            *current = mode;
        }
    }

    /// Send one user turn and stream the reply into the conversation.
    ///
    /// Resolves when the exchange completes, fails or is cancelled. Blank
    /// text and calls made while another exchange is in flight are rejected
    /// without touching the conversation.
    pub async fn send_message(&self, text: impl Into<String>) -> ExchangeOutcome {
        let text = text.into();
        if text.trim().is_empty() {
            tracing::debug!("Ignoring blank message");
            return ExchangeOutcome::Rejected(RejectReason::BlankInput);
        }

        let ticket = {
            let mut current = self.cancel.lock();
            if self
                .in_flight
                .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                tracing::warn!("Rejecting message: an exchange is already in flight");
                return ExchangeOutcome::Rejected(RejectReason::Busy);
            }
            current.id += 1;
            current.token = CancellationToken::new();
            current.clone()
        };

        let mut guard = ExchangeGuard {
            session: self,
            ticket,
            finished: false,
        };
        let outcome = self.run_exchange(text, &guard.ticket.token).await;
        guard.finished = true;
        outcome
    }

    /// Stop the in-flight exchange, if any.
    ///
    /// No further reads or conversation updates happen for that exchange.
    /// Fragments already folded stay in place and `loading` is cleared.
    /// Returns `false` when nothing was in flight.
    pub fn cancel(&self) -> bool {
        let ticket = {
            let current = self.cancel.lock();
            if !self.is_busy() {
                return false;
            }
            current.clone()
        };
        self.stop_exchange(&ticket);
        tracing::info!("Exchange cancelled");
        true
    }

    /// Wait until no exchange holds the session.
    ///
    /// A cancelled exchange lets go once its task observes the cancellation.
    /// The task driving that `send_message` must keep being polled, or this
    /// never resolves.
    pub async fn wait_idle(&self) {
        loop {
            let released = self.released.notified();
            tokio::pin!(released);
            released.as_mut().enable();
            if !self.is_busy() {
                return;
            }
            released.await;
        }
    }

    /// Cancel any in-flight exchange and clear the conversation.
    ///
    /// A cancelled exchange releases the session once its task observes the
    /// cancellation, so a `send_message` right after `reset` may be rejected
    /// as busy. Await [`ChatSession::wait_idle`] first, as
    /// [`ChatSession::start_interview`] does.
    pub fn reset(&self) {
        self.cancel();
        self.conversation.send_modify(Conversation::clear);
        *self.phase.lock() = SessionPhase::Idle;
        tracing::debug!("Conversation reset");
    }

    /// Clear the conversation and send the opening prompt.
    ///
    /// An exchange still in flight is cancelled and its release awaited
    /// before the prompt goes out.
    pub async fn start_interview(&self) -> ExchangeOutcome {
        self.reset();
        self.wait_idle().await;
        tracing::info!("Starting {} interview", self.mode());
        self.send_message(OPENING_PROMPT).await
    }

    /// Stop any in-flight exchange and clear the conversation.
    pub fn end_interview(&self) {
        self.reset();
        tracing::info!("Interview ended");
    }

    async fn run_exchange(&self, text: String, token: &CancellationToken) -> ExchangeOutcome {
        let mut history = Vec::new();
        let appended = self.publish(token, |c| {
            c.push_user(text);
            c.set_loading(true);
            history = c.messages().to_vec();
        });
        if !appended {
            return ExchangeOutcome::Cancelled;
        }
        self.set_phase(token, SessionPhase::UserAppended);

        let mode = self.mode();
        let body = match ChatRequest::new(history, mode).to_json() {
            Ok(body) => body,
            Err(e) => return self.fail(token, e.into()),
        };

        self.set_phase(token, SessionPhase::Requesting);
        tracing::info!("Sending chat request (mode: {})", mode);

        let headers = self.config.headers();
        let response = tokio::select! {
            biased;
            _ = token.cancelled() => return ExchangeOutcome::Cancelled,
            response = self.client.post_stream(&self.config.endpoint, &body, &headers) => response,
        };
        let mut body_stream = match response {
            Ok(stream) => stream,
            Err(e) => return self.fail(token, ExchangeError::Request(e)),
        };

        self.set_phase(token, SessionPhase::Streaming);

        let mut framer = LineFramer::new();
        let mut fragments = 0usize;
        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => return ExchangeOutcome::Cancelled,
                next = body_stream.next() => next,
            };

            match next {
                Some(Ok(chunk)) => {
                    framer.push_bytes(&chunk);
                    while let Some(line) = framer.next_line() {
                        let frame = decode_line(&line);
                        tracing::trace!("Decoded {} frame", frame.kind_name());
                        match frame {
                            StreamFrame::Data(payload) => {
                                let Some(fragment) = extract_delta(&payload) else {
                                    continue;
                                };
                                if !self.publish(token, |c| c.fold(&fragment)) {
                                    return ExchangeOutcome::Cancelled;
                                }
                                fragments += 1;
                            }
                            StreamFrame::End => {
                                tracing::debug!("Received end-of-stream sentinel");
                                return self.complete(token, &mut framer, fragments);
                            }
                            StreamFrame::Comment => {}
                        }
                    }
                }
                Some(Err(e)) => return self.fail(token, ExchangeError::Stream(e)),
                None => return self.complete(token, &mut framer, fragments),
            }
        }
    }

    fn complete(
        &self,
        token: &CancellationToken,
        framer: &mut LineFramer,
        fragments: usize,
    ) -> ExchangeOutcome {
        if let Some(tail) = framer.finish() {
            tracing::debug!("Discarding unterminated tail: {:?}", tail);
        }
        if !self.publish(token, |c| c.set_loading(false)) {
            return ExchangeOutcome::Cancelled;
        }
        self.set_phase(token, SessionPhase::Completed);
        tracing::info!("Exchange completed ({} fragments)", fragments);
        ExchangeOutcome::Completed
    }

    fn fail(&self, token: &CancellationToken, err: ExchangeError) -> ExchangeOutcome {
        tracing::warn!(
            "Exchange failed: {} (retryable: {}, during stream: {})",
            err,
            err.is_retryable(),
            err.during_stream()
        );
        let recorded = self.publish(token, |c| {
            c.push_assistant(APOLOGY_MESSAGE);
            c.set_loading(false);
        });
        if !recorded {
            return ExchangeOutcome::Cancelled;
        }
        self.set_phase(token, SessionPhase::Failed);
        ExchangeOutcome::Failed(err)
    }

    /// Apply `update` and notify subscribers, unless `token` was cancelled.
    ///
    /// The check runs under the channel's write lock, so an update can never
    /// land after `cancel`/`reset` has taken effect.
    fn publish(&self, token: &CancellationToken, update: impl FnOnce(&mut Conversation)) -> bool {
        self.conversation.send_if_modified(|conversation| {
            if token.is_cancelled() {
                return false;
            }
            update(conversation);
            true
        })
    }

    fn set_phase(&self, token: &CancellationToken, phase: SessionPhase) {
        let mut current = self.phase.lock();
        if !token.is_cancelled() {
            *current = phase;
        }
    }

    /// Cancel `ticket` and, if it is still the current exchange, settle the
    /// phase and clear `loading`.
    ///
    /// Holds the ticket lock throughout so no new exchange can be claimed
    /// between the check and the updates.
    fn stop_exchange(&self, ticket: &ExchangeTicket) {
        let current = self.cancel.lock();
        ticket.token.cancel();
        if current.id != ticket.id {
            tracing::debug!("Exchange {} already replaced by {}", ticket.id, current.id);
            return;
        }
        {
            let mut phase = self.phase.lock();
            if phase.is_active() {
                *phase = SessionPhase::Cancelled;
            }
        }
        self.conversation.send_if_modified(|conversation| {
            let was_loading = conversation.is_loading();
            conversation.set_loading(false);
            was_loading
        });
    }
}

/// Releases the session when an exchange ends, including when the
/// `send_message` future is dropped before finishing.
struct ExchangeGuard<'a, C: HttpClient> {
    session: &'a ChatSession<C>,
    ticket: ExchangeTicket,
    finished: bool,
}

impl<C: HttpClient> Drop for ExchangeGuard<'_, C> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("Exchange dropped before finishing");
            self.session.stop_exchange(&self.ticket);
        }
        self.session.in_flight.store(false, Ordering::Release);
        self.session.released.notify_waiters();
    }
}

//! Correlation of renderer completions with pending render requests.
//!
//! Every request registers a [`PendingCompletion`] under its fingerprint before
//! submitting to the renderer. [`CompletionRouter::dispatch`] delivers an
//! inbound message to every listener registered for the message's fingerprint
//! and removes them; a listener that is dropped without having been resolved
//! removes itself. Messages from an untrusted origin, or for a fingerprint
//! nobody is waiting on, are ignored.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::{mpsc, oneshot};

use super::RenderError;
use super::protocol::{CompletionMessage, RenderOutcome};

#[derive(Debug)]
struct Listener {
    id: u64,
    sender: oneshot::Sender<RenderOutcome>,
}

/// Routes completion messages to pending requests by fingerprint.
///
/// Cloning is cheap; clones share the same registry.
#[derive(Debug, Clone)]
pub struct CompletionRouter {
    origin: Arc<str>,
    listeners: Arc<DashMap<String, Vec<Listener>>>,
    next_id: Arc<AtomicU64>,
}

impl CompletionRouter {
    /// Create a router accepting messages from `origin` only.
    pub fn new(origin: impl Into<String>) -> Self {
        Self {
            origin: Arc::from(origin.into()),
            listeners: Arc::new(DashMap::new()),
            next_id: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The trusted origin.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Register a listener for one completion of `fingerprint`.
    #[must_use]
    pub fn register(&self, fingerprint: &str) -> PendingCompletion {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();
        self.listeners.entry(fingerprint.to_string()).or_default().push(Listener {
            id,
            sender,
        });

        PendingCompletion {
            fingerprint: fingerprint.to_string(),
            id,
            receiver,
            router: self.clone(),
        }
    }

    /// Deliver a message to every listener waiting on its fingerprint.
    ///
    /// Returns the number of listeners resolved.
    pub fn dispatch(&self, message: CompletionMessage) -> usize {
        if message.origin != *self.origin {
            tracing::warn!(
                origin = %message.origin,
                expected = %self.origin,
                "ignoring completion from untrusted origin"
            );
            return 0;
        }

        let Some((_, listeners)) = self.listeners.remove(&message.fingerprint) else {
            tracing::debug!(
                fingerprint = %message.fingerprint,
                "ignoring completion with no pending request"
            );
            return 0;
        };

        let mut delivered = 0;
        for listener in listeners {
            if listener.sender.send(message.outcome.clone()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Feed messages from a channel into [`dispatch`](Self::dispatch) until it closes.
    pub async fn listen(&self, mut messages: mpsc::UnboundedReceiver<CompletionMessage>) {
        while let Some(message) = messages.recv().await {
            self.dispatch(message);
        }
        tracing::debug!("completion channel closed");
    }

    /// Number of listeners currently waiting on `fingerprint`.
    #[must_use]
    pub fn pending(&self, fingerprint: &str) -> usize {
        self.listeners.get(fingerprint).map_or(0, |entry| entry.len())
    }

    fn deregister(&self, fingerprint: &str, id: u64) {
        if let Some(mut entry) = self.listeners.get_mut(fingerprint) {
            entry.retain(|listener| listener.id != id);
        }
        self.listeners.remove_if(fingerprint, |_, listeners| listeners.is_empty());
    }
}

/// A registered listener awaiting one completion.
///
/// Dropping it deregisters the listener.
#[derive(Debug)]
pub struct PendingCompletion {
    fingerprint: String,
    id: u64,
    receiver: oneshot::Receiver<RenderOutcome>,
    router: CompletionRouter,
}

impl PendingCompletion {
    #[must_use]
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Wait for the completion. There is no timeout.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::RendererUnavailable`] if the listener was removed
    /// without being resolved.
    pub async fn wait(mut self) -> Result<RenderOutcome, RenderError> {
        (&mut self.receiver).await.map_err(|_| RenderError::RendererUnavailable {
            reason: format!("completion for {} was never delivered", self.fingerprint),
        })
    }
}

impl Drop for PendingCompletion {
    fn drop(&mut self) {
        self.router.deregister(&self.fingerprint, self.id);
    }
}

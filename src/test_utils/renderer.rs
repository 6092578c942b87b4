//! In-process stand-in for the external renderer.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;

use crate::render::{CompletionMessage, CompletionRouter, PlotRequest, RenderError, Renderer};

/// How a [`FakeRenderer`] answers each submission.
#[derive(Debug, Clone)]
pub enum FakeMode {
    /// Reply with these image bytes
    Succeed(Bytes),
    /// Reply with this error message
    Fail(String),
    /// Never reply
    Silent,
    /// Refuse the submission itself
    Unavailable,
}

/// A [`Renderer`] that answers through a [`CompletionRouter`] from a spawned task.
///
/// Replies are dispatched asynchronously, after an optional delay, so they
/// arrive the way a real renderer's would: later and on another task. Clones
/// share counters and the request log.
#[derive(Debug, Clone)]
pub struct FakeRenderer {
    router: CompletionRouter,
    origin: String,
    mode: FakeMode,
    delay: Option<Duration>,
    submissions: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<PlotRequest>>>,
}

impl FakeRenderer {
    pub fn new(router: &CompletionRouter, mode: FakeMode) -> Self {
        Self {
            router: router.clone(),
            origin: router.origin().to_string(),
            mode,
            delay: None,
            submissions: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding(router: &CompletionRouter, image: Bytes) -> Self {
        Self::new(router, FakeMode::Succeed(image))
    }

    pub fn failing(router: &CompletionRouter, message: impl Into<String>) -> Self {
        Self::new(router, FakeMode::Fail(message.into()))
    }

    /// Wait this long before replying.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Reply from a different origin than the router trusts.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Number of requests submitted so far.
    pub fn submissions(&self) -> usize {
        self.submissions.load(Ordering::SeqCst)
    }

    /// Requests received so far, in submission order.
    pub fn requests(&self) -> Vec<PlotRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Renderer for FakeRenderer {
    async fn submit(&self, request: PlotRequest) -> Result<(), RenderError> {
        if matches!(self.mode, FakeMode::Unavailable) {
            return Err(RenderError::RendererUnavailable {
                reason: "fake renderer offline".to_string(),
            });
        }

        self.submissions.fetch_add(1, Ordering::SeqCst);
        let fingerprint = request.fingerprint.clone();
        self.requests.lock().unwrap().push(request);

        let message = match &self.mode {
            FakeMode::Succeed(image) => {
                CompletionMessage::success(&self.origin, fingerprint, image.clone())
            }
            FakeMode::Fail(message) => {
                CompletionMessage::error(&self.origin, fingerprint, message.clone())
            }
            FakeMode::Silent | FakeMode::Unavailable => return Ok(()),
        };

        let router = self.router.clone();
        let delay = self.delay;
        tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            router.dispatch(message);
        });
        Ok(())
    }
}

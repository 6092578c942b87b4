//! Cache-aware rendering through an external renderer
//!
//! The renderer runs outside this process (typically in a sandboxed widget)
//! and is reached only through the [`Renderer`] trait: a [`PlotRequest`] goes
//! out, and some time later a [`CompletionMessage`] comes back through the
//! [`CompletionRouter`]. Responses are neither ordered nor addressed, so they
//! are correlated by the graph's fingerprint.
//!
//! # Request lifecycle
//!
//! ```text
//! Requested → CacheCheck ─┬─ hit ──────────────────────────────→ Done
//!                         └─ miss → Rendering ─┬─ Succeeded → Populating → Done
//!                                              └─ Failed ─────────────────→ Done
//! ```
//!
//! The cache check always finishes before a render is submitted, and a hit
//! never reaches the renderer. Concurrent requests for the same cold
//! fingerprint are not deduplicated: each submits its own render, and a
//! completion resolves every request waiting on that fingerprint. There is no
//! timeout; a request whose completion never arrives waits until it is
//! dropped, which also deregisters it.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use plotmark::cache::CacheService;
//! use plotmark::config::Settings;
//! use plotmark::dsl::parse;
//! use plotmark::render::{ChannelRenderer, CompletionRouter, RenderCoordinator};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let settings = Settings::default();
//! let (renderer, mut requests) = ChannelRenderer::channel();
//! let router = CompletionRouter::new(&settings.renderer.origin);
//! let cache = CacheService::new(settings.cache.clone(), &settings.file_prefix);
//! let coordinator = RenderCoordinator::new(renderer, cache, router.clone());
//!
//! // The host forwards `requests` to the renderer and feeds its replies to
//! // `router.dispatch` (or `router.listen`).
//! let spec = parse("y=x^2|red")?;
//! let rendered = coordinator.render(&spec, Path::new("/vault")).await?;
//! println!("{} bytes", rendered.image.len());
//! # Ok(())
//! # }
//! ```

pub mod protocol;
mod router;

pub use protocol::{
    Bounds, CompletionMessage, LineStyle, PlotCommand, PlotRequest, PointStyle, RenderOutcome,
};
pub use router::{CompletionRouter, PendingCompletion};

use std::path::Path;

use bytes::Bytes;
use futures::future::join_all;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::cache::{CacheBackend, CacheError, CacheService};
use crate::core::display_chain;
use crate::dsl::Spec;

/// Failure to produce an image for a spec.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The renderer reported an error; its message is passed through verbatim.
    #[error("Renderer failed for graph {fingerprint}: {message}")]
    RenderFailed {
        fingerprint: String,
        message: String,
    },

    /// The renderer could not be reached or stopped answering.
    #[error("Renderer unavailable: {reason}")]
    RendererUnavailable {
        reason: String,
    },
}

/// The external rendering surface.
#[allow(async_fn_in_trait)]
pub trait Renderer {
    /// Hand a request to the renderer. Completion arrives separately through
    /// the [`CompletionRouter`].
    async fn submit(&self, request: PlotRequest) -> Result<(), RenderError>;
}

/// A [`Renderer`] that forwards requests over a channel to the host, which owns
/// the transport to the actual rendering surface.
#[derive(Debug, Clone)]
pub struct ChannelRenderer {
    requests: mpsc::UnboundedSender<PlotRequest>,
}

impl ChannelRenderer {
    /// Create the renderer and the receiving end the host drains.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PlotRequest>) {
        let (requests, receiver) = mpsc::unbounded_channel();
        (
            Self {
                requests,
            },
            receiver,
        )
    }
}

impl Renderer for ChannelRenderer {
    async fn submit(&self, request: PlotRequest) -> Result<(), RenderError> {
        self.requests.send(request).map_err(|_| RenderError::RendererUnavailable {
            reason: "request channel closed".to_string(),
        })
    }
}

/// Where a rendered image came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderSource {
    Cache,
    Renderer,
}

/// A successfully produced image.
#[derive(Debug)]
pub struct Rendered {
    /// PNG bytes
    pub image: Bytes,
    pub source: RenderSource,
    /// Set when the image could not be written to the cache.
    ///
    /// The image is still valid; hosts typically show this as a notice.
    pub cache_warning: Option<CacheError>,
}

/// Orchestrates cache lookup, external rendering and cache population.
#[derive(Debug)]
pub struct RenderCoordinator<R> {
    renderer: R,
    cache: CacheService,
    router: CompletionRouter,
}

impl<R: Renderer> RenderCoordinator<R> {
    pub fn new(renderer: R, cache: CacheService, router: CompletionRouter) -> Self {
        Self {
            renderer,
            cache,
            router,
        }
    }

    #[must_use]
    pub fn cache(&self) -> &CacheService {
        &self.cache
    }

    #[must_use]
    pub fn router(&self) -> &CompletionRouter {
        &self.router
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Produce the image for `spec`, from the cache when possible.
    ///
    /// `root` anchors a relative filesystem cache directory.
    ///
    /// # Errors
    ///
    /// - [`RenderError::RenderFailed`] when the renderer reports an error; the
    ///   cache is left untouched.
    /// - [`RenderError::RendererUnavailable`] when the request cannot be
    ///   submitted or its completion is lost.
    ///
    /// Cache failures never surface as errors: unreadable entries count as
    /// misses and write failures are reported in [`Rendered::cache_warning`].
    pub async fn render(&self, spec: &Spec, root: &Path) -> Result<Rendered, RenderError> {
        let fingerprint = spec.fingerprint();
        let store = self.cache.is_enabled().then(|| self.cache.store_for(root));

        if let Some(store) = &store {
            if let Some(image) = store.lookup(fingerprint).await {
                tracing::debug!(fingerprint, "cache hit");
                return Ok(Rendered {
                    image,
                    source: RenderSource::Cache,
                    cache_warning: None,
                });
            }
        }

        // Listen before submitting so a fast completion cannot be missed.
        let pending = self.router.register(fingerprint);
        tracing::debug!(fingerprint, equations = spec.equations().len(), "submitting render");
        self.renderer.submit(PlotRequest::from(spec)).await?;

        let image = match pending.wait().await? {
            RenderOutcome::Success(image) => image,
            RenderOutcome::Error(message) => {
                tracing::debug!(fingerprint, %message, "renderer reported an error");
                return Err(RenderError::RenderFailed {
                    fingerprint: fingerprint.to_string(),
                    message,
                });
            }
        };

        let mut cache_warning = None;
        if let Some(store) = &store {
            if let Err(error) = store.store(fingerprint, image.clone()).await {
                tracing::warn!("Failed to cache graph {fingerprint}: {}", display_chain(&error));
                cache_warning = Some(error);
            }
        }

        Ok(Rendered {
            image,
            source: RenderSource::Renderer,
            cache_warning,
        })
    }

    /// Render several specs concurrently, e.g. every graph block of a page.
    ///
    /// Results are returned in input order; one failure does not affect the others.
    pub async fn render_all(
        &self,
        specs: &[Spec],
        root: &Path,
    ) -> Vec<Result<Rendered, RenderError>> {
        join_all(specs.iter().map(|spec| self.render(spec, root))).await
    }
}

//! # Lifecycle Controller (View)
//!
//! A [`View`] is the element hosting one navigable page. It owns the mount
//! sequence:
//!
//! 1. acquire the initial payload from its [`DataSource`]
//! 2. knit it into the first model
//! 3. render the first paint
//! 4. emit the hydration signal
//!
//! Steps run strictly in this order. If any of them fails, the signal is not
//! emitted; the failure goes to the view's [`ErrorBoundary`] and the view
//! enters [`Status::Failed`]. Later server pushes re-enter the knitter
//! through [`View::push`] or [`View::listen`].
//!
//! # Cancellation
//!
//! [`View::disconnected`] bumps the mount generation. An acquisition that
//! completes for an older generation is discarded without rendering.
//! Each mount owns its hydration signal; a mount that is superseded or
//! detached never fires the signal of the mount that replaced it.
//!
//! # Example
//!
//! ```rust,ignore
//! let view = View::builder(ProfilePage, DiffTemplate, MemoryDom::new(), source).build()?;
//!
//! match view.connected().await {
//!     MountOutcome::Hydrated => reveal(&view),
//!     MountOutcome::Degraded => show_error_page(&view),
//!     MountOutcome::Detached => {}
//! }
//! ```

use crate::{
    boundaries::LoggingBoundary,
    config::MountConfig,
    hydration::{HydrationSignal, Subscription},
    instance::{Instance, InstanceStats},
};
use futures::{FutureExt, Stream, StreamExt, future::BoxFuture};
use parking_lot::{Mutex, MutexGuard};
use purl_core::{
    AcquisitionError, DataSource, Element, ElementId, ErrorBoundary, Hydrated, PatchReport,
    Payload, PurlError, Template, is_valid_custom_element_name,
};
use std::{pin::pin, sync::Arc};
use tracing::Instrument;

/// Observable lifecycle status of a view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Never connected.
    Idle,
    /// Mount in flight.
    Loading,
    /// Hydrated and up to date.
    Ready,
    /// Hydrated, but the latest update failed. The last good DOM is shown.
    Degraded(String),
    /// The mount failed; the view never hydrated.
    Failed(String),
    /// Disconnected from the document.
    Detached,
}

impl Status {
    /// Whether the view is mounted and hydrated.
    pub fn is_live(&self) -> bool {
        matches!(self, Status::Ready | Status::Degraded(_))
    }
}

/// Result of [`View::connected`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    /// Rendered and hydrated.
    Hydrated,
    /// The mount failed and was reported; no hydration.
    Degraded,
    /// The view was disconnected (or remounted) before the mount finished.
    Detached,
}

/// Result of a server push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The model changed and the DOM was patched.
    Rendered(PatchReport),
    /// Nothing changed.
    Unchanged,
    /// The push could not be applied and was reported.
    Failed,
    /// The mount is in flight; the push is held until hydration.
    Pending,
    /// The view is not mounted; the push was dropped.
    Ignored,
}

struct Lifecycle {
    generation: u64,
    detachments: u64,
    status: Status,
    /// The current degradation came from a failed patch, so a later
    /// successful repaint clears it.
    render_fault: bool,
    signal: Arc<HydrationSignal>,
    /// The signal belongs to the mount at `generation`.
    claimed: bool,
    pending: Option<Payload>,
}

impl Lifecycle {
    /// Hand the signal to a new mount. A signal that already fired, or that a
    /// superseded mount may still emit, is replaced.
    fn claim_signal(&mut self) {
        if self.claimed || self.signal.is_hydrated() {
            self.signal = Arc::new(HydrationSignal::new());
        }
        self.claimed = true;
    }

    /// Detach the signal from the mount that owned it.
    fn release_signal(&mut self) {
        if self.claimed {
            self.signal = Arc::new(HydrationSignal::new());
            self.claimed = false;
        }
    }

    fn settle(&mut self) {
        self.status = Status::Ready;
        self.render_fault = false;
    }
}

struct ViewInner<E: Element, T: Template, S> {
    id: ElementId,
    instance: Mutex<Instance<E, T>>,
    lifecycle: Mutex<Lifecycle>,
    source: S,
    boundary: Box<dyn ErrorBoundary>,
    config: MountConfig,
}

/// A page-level element with a data-driven mount sequence.
///
/// Cloning a `View` yields another handle to the same element.
pub struct View<E: Element, T: Template, S> {
    inner: Arc<ViewInner<E, T, S>>,
}

impl<E: Element, T: Template, S> Clone for View<E, T, S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Builder for [`View`].
pub struct ViewBuilder<E: Element, T: Template, S> {
    element: E,
    template: T,
    root: T::Root,
    source: S,
    attributes: E::Attributes,
    boundary: Box<dyn ErrorBoundary>,
    config: MountConfig,
}

impl<E: Element, T: Template, S: DataSource> ViewBuilder<E, T, S> {
    /// Initial attributes. Defaults to `E::Attributes::default()`.
    pub fn attributes(mut self, attributes: E::Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Where failures are reported. Defaults to [`LoggingBoundary`].
    pub fn boundary(mut self, boundary: impl ErrorBoundary) -> Self {
        self.boundary = Box::new(boundary);
        self
    }

    /// Lifecycle configuration.
    pub fn config(mut self, config: MountConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the view.
    ///
    /// Fails with [`PurlError::InvalidName`] if `E::TAG` is not a valid
    /// custom element name.
    pub fn build(self) -> Result<View<E, T, S>, PurlError> {
        if !is_valid_custom_element_name(E::TAG) {
            return Err(PurlError::InvalidName(E::TAG.to_string()));
        }
        #[cfg(not(feature = "timeout"))]
        if self.config.acquire_timeout.is_some() {
            tracing::warn!(tag = E::TAG, "acquire_timeout ignored: the `timeout` feature is disabled");
        }

        let instance = Instance::new(self.element, self.template, self.root, self.attributes);
        Ok(View {
            inner: Arc::new(ViewInner {
                id: instance.id().clone(),
                instance: Mutex::new(instance),
                lifecycle: Mutex::new(Lifecycle {
                    generation: 0,
                    detachments: 0,
                    status: Status::Idle,
                    render_fault: false,
                    signal: Arc::new(HydrationSignal::new()),
                    claimed: false,
                    pending: None,
                }),
                source: self.source,
                boundary: self.boundary,
                config: self.config,
            }),
        })
    }
}

impl<E: Element, T: Template, S: DataSource> View<E, T, S> {
    /// Start building a view.
    pub fn builder(element: E, template: T, root: T::Root, source: S) -> ViewBuilder<E, T, S> {
        ViewBuilder {
            element,
            template,
            root,
            source,
            attributes: E::Attributes::default(),
            boundary: Box::new(LoggingBoundary),
            config: MountConfig::default(),
        }
    }

    /// This view's id.
    pub fn id(&self) -> &ElementId {
        &self.inner.id
    }

    /// Run the mount sequence. Call when the element is attached.
    ///
    /// Calling it again (for instance after a failed mount) starts a new
    /// mount and supersedes any mount still in flight.
    pub async fn connected(&self) -> MountOutcome {
        let generation = self.attach();
        let span = tracing::info_span!("view_mount", element = %self.inner.id, generation);
        self.mount(generation).instrument(span).await
    }

    fn attach(&self) -> u64 {
        let mut lifecycle = self.inner.lifecycle.lock();
        lifecycle.generation += 1;
        lifecycle.status = Status::Loading;
        lifecycle.render_fault = false;
        lifecycle.pending = None;
        lifecycle.claim_signal();
        lifecycle.generation
    }

    async fn mount(&self, generation: u64) -> MountOutcome {
        let acquired = self.acquire().await;

        let mut lifecycle = self.inner.lifecycle.lock();
        if lifecycle.generation != generation {
            tracing::debug!("mount superseded, acquired payload discarded");
            return MountOutcome::Detached;
        }

        let failure = match acquired {
            Err(err) => Some(PurlError::from(err)),
            Ok(payload) => {
                let mut instance = self.inner.instance.lock();
                match instance.knit(&payload) {
                    Err(err) => Some(err.into()),
                    Ok(_) => instance.render().err().map(PurlError::from),
                }
            }
        };

        if let Some(error) = failure {
            lifecycle.status = Status::Failed(error.to_string());
            drop(lifecycle);
            tracing::warn!(%error, "mount failed, view not hydrated");
            self.inner.boundary.report(&self.inner.id, &error);
            return MountOutcome::Degraded;
        }

        lifecycle.settle();
        let signal = lifecycle.signal.clone();
        let pending = lifecycle.pending.take();
        drop(lifecycle);

        signal.emit(Hydrated {
            element: self.inner.id.clone(),
        });
        tracing::info!("view hydrated");

        if let Some(payload) = pending {
            self.push(payload);
        }
        MountOutcome::Hydrated
    }

    async fn acquire(&self) -> Result<Payload, AcquisitionError> {
        #[cfg(feature = "timeout")]
        if let Some(limit) = self.inner.config.acquire_timeout {
            return crate::sources::with_timeout(&self.inner.source, limit).await;
        }
        self.inner.source.acquire().await
    }

    /// Detach the view. Call when the element is removed from the document.
    ///
    /// Any mount in flight is cancelled, the model is discarded and state is
    /// reset to its defaults. The DOM root keeps its last content.
    pub fn disconnected(&self) {
        let mut lifecycle = self.inner.lifecycle.lock();
        lifecycle.generation += 1;
        lifecycle.detachments += 1;
        lifecycle.status = Status::Detached;
        lifecycle.render_fault = false;
        lifecycle.pending = None;
        lifecycle.release_signal();
        self.inner.instance.lock().reset();
        tracing::debug!(element = %self.inner.id, "view detached");
    }

    /// Apply a server push.
    pub fn push(&self, payload: Payload) -> PushOutcome {
        let mut lifecycle = self.inner.lifecycle.lock();
        if !lifecycle.status.is_live() {
            if lifecycle.status != Status::Loading || !self.inner.config.hold_pending_pushes {
                return PushOutcome::Ignored;
            }
            if lifecycle.pending.replace(payload).is_some() {
                tracing::debug!(element = %self.inner.id, "pending push superseded");
            }
            return PushOutcome::Pending;
        }

        let degraded = matches!(lifecycle.status, Status::Degraded(_));
        let result = {
            let mut instance = self.inner.instance.lock();
            match instance.apply(&payload) {
                // A degraded view may show a stale DOM; give it a chance to heal.
                Ok(None) if degraded => instance
                    .render()
                    .map(|report| Some(report).filter(|r| !r.is_noop()))
                    .map_err(PurlError::from),
                other => other,
            }
        };

        match result {
            Ok(report) => {
                lifecycle.settle();
                report.map_or(PushOutcome::Unchanged, PushOutcome::Rendered)
            }
            Err(error) => {
                self.degrade(lifecycle, error);
                PushOutcome::Failed
            }
        }
    }

    /// Report a failed push acquisition. A live view degrades but keeps its
    /// model and DOM.
    pub fn push_error(&self, error: AcquisitionError) {
        let lifecycle = self.inner.lifecycle.lock();
        let error = PurlError::from(error);
        if lifecycle.status.is_live() {
            self.degrade(lifecycle, error);
        } else {
            drop(lifecycle);
            self.inner.boundary.report(&self.inner.id, &error);
        }
    }

    /// Drive a stream of server pushes until it ends or the view is
    /// disconnected.
    ///
    /// Pushes that are ready together (up to `push_batch`) collapse to the
    /// newest payload, so only the most recent one is knitted.
    pub async fn listen<St>(&self, pushes: St)
    where
        St: Stream<Item = Result<Payload, AcquisitionError>>,
    {
        let detachments = self.inner.lifecycle.lock().detachments;
        let mut batches = pin!(pushes.ready_chunks(self.inner.config.push_batch.max(1)));

        while let Some(batch) = batches.next().await {
            if self.inner.lifecycle.lock().detachments != detachments {
                tracing::debug!(element = %self.inner.id, "view detached, push stream dropped");
                return;
            }

            let mut latest = None;
            let mut trailing_error = None;
            for item in batch {
                match item {
                    Ok(payload) => {
                        if let Some(err) = trailing_error.take() {
                            self.push_error(err);
                        }
                        if latest.replace(payload).is_some() {
                            tracing::trace!(element = %self.inner.id, "push superseded in batch");
                        }
                    }
                    Err(err) => {
                        if let Some(earlier) = trailing_error.replace(err) {
                            self.push_error(earlier);
                        }
                    }
                }
            }
            if let Some(payload) = latest {
                self.push(payload);
            }
            if let Some(err) = trailing_error {
                self.push_error(err);
            }
        }
    }

    /// Mutate local state and re-render. Never knits.
    ///
    /// Before hydration the state is updated without rendering. Returns the
    /// patch report when a render happened.
    pub fn update_state(&self, f: impl FnOnce(&mut E::State)) -> Option<PatchReport> {
        let lifecycle = self.inner.lifecycle.lock();
        let mut instance = self.inner.instance.lock();
        if !lifecycle.status.is_live() {
            instance.mutate_state(f);
            return None;
        }
        let ((), result) = instance.update_state(f);
        drop(instance);
        self.rendered(lifecycle, result.map_err(PurlError::from))
    }

    /// Replace the attributes handed down by the parent and re-render.
    ///
    /// Before hydration the attributes are stored without rendering and
    /// `None` is returned.
    pub fn set_attributes(&self, attributes: E::Attributes) -> Option<PatchReport> {
        let lifecycle = self.inner.lifecycle.lock();
        let mut instance = self.inner.instance.lock();
        let changed = instance.replace_attributes(attributes);
        if !lifecycle.status.is_live() {
            return None;
        }
        if !changed {
            return Some(PatchReport::default());
        }
        let result = instance.render().map_err(PurlError::from);
        drop(instance);
        self.rendered(lifecycle, result)
    }

    fn rendered(
        &self,
        mut lifecycle: MutexGuard<'_, Lifecycle>,
        result: Result<PatchReport, PurlError>,
    ) -> Option<PatchReport> {
        match result {
            Ok(report) => {
                if lifecycle.render_fault {
                    tracing::debug!(element = %self.inner.id, "repaint succeeded, view recovered");
                    lifecycle.settle();
                }
                Some(report)
            }
            Err(error) => {
                self.degrade(lifecycle, error);
                None
            }
        }
    }

    fn degrade(&self, mut lifecycle: MutexGuard<'_, Lifecycle>, error: PurlError) {
        lifecycle.status = Status::Degraded(error.to_string());
        lifecycle.render_fault = matches!(error, PurlError::Render(_));
        drop(lifecycle);
        tracing::warn!(element = %self.inner.id, %error, "view degraded");
        self.inner.boundary.report(&self.inner.id, &error);
    }

    /// Current lifecycle status.
    pub fn status(&self) -> Status {
        self.inner.lifecycle.lock().status.clone()
    }

    /// Whether the current mount has hydrated. Idempotent; safe to poll from
    /// observers that subscribed too late to receive the event.
    pub fn is_hydrated(&self) -> bool {
        let lifecycle = self.inner.lifecycle.lock();
        lifecycle.status.is_live() && lifecycle.signal.is_hydrated()
    }

    /// Subscribe to the current mount's hydration event.
    pub fn on_hydrated<F>(&self, listener: F) -> Subscription
    where
        F: FnOnce(&Hydrated) + Send + 'static,
    {
        self.inner.lifecycle.lock().signal.subscribe(listener)
    }

    /// A future resolving once the current mount hydrates.
    ///
    /// Resolves immediately if it already has.
    pub fn hydrated(&self) -> BoxFuture<'static, Option<Hydrated>> {
        self.inner.lifecycle.lock().signal.wait().boxed()
    }

    /// The current mount's hydration signal.
    pub fn hydration_signal(&self) -> Arc<HydrationSignal> {
        self.inner.lifecycle.lock().signal.clone()
    }

    /// Current model snapshot.
    pub fn model(&self) -> Option<Arc<E::Model>> {
        self.inner.instance.lock().model().cloned()
    }

    /// Counters for this view.
    pub fn stats(&self) -> InstanceStats {
        self.inner.instance.lock().stats()
    }

    /// Read the underlying instance (DOM root, state, ...).
    pub fn inspect<R>(&self, f: impl FnOnce(&Instance<E, T>) -> R) -> R {
        f(&self.inner.instance.lock())
    }
}

//! Testing utilities for Purl.
//!
//! This module provides utilities to make testing views and components easier.
//!
//! # Features
//!
//! - [`ScriptedSource`]: A data source with programmable results that can be
//!   held in flight
//! - [`RecordingBoundary`]: An error boundary that records every report
//! - [`FailingTemplate`]: A template wrapper that fails on demand

use futures::{
    FutureExt,
    channel::oneshot,
    future::Shared,
};
use parking_lot::Mutex;
use purl_core::{
    AcquisitionError, DataSource, ElementId, ErrorBoundary, Node, PatchReport, Payload,
    PurlError, RenderError, Template,
};
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

// ============================================================================
// Scripted Source
// ============================================================================

enum Scripted {
    Payload(Payload),
    Status(u16),
}

#[derive(Default)]
struct Script {
    queue: VecDeque<Scripted>,
    fallback: Option<Payload>,
    calls: usize,
    gate: Option<Shared<oneshot::Receiver<()>>>,
    opener: Option<oneshot::Sender<()>>,
}

/// A data source that replays scripted results.
///
/// Results are consumed in order; once the script is exhausted the last
/// scripted payload is repeated, or [`AcquisitionError::Closed`] is returned if
/// there never was one.
///
/// # Example
///
/// ```rust,ignore
/// let source = ScriptedSource::new().ok(json!({ "name": "Ada" }));
/// source.hold();               // keep the next acquisition in flight
/// // ... mount, disconnect ...
/// source.release();
/// ```
#[derive(Clone, Default)]
pub struct ScriptedSource {
    script: Arc<Mutex<Script>>,
}

impl ScriptedSource {
    /// An empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful acquisition.
    pub fn ok(self, payload: Payload) -> Self {
        self.script.lock().queue.push_back(Scripted::Payload(payload));
        self
    }

    /// Queue a server error.
    pub fn fail(self, status: u16) -> Self {
        self.script.lock().queue.push_back(Scripted::Status(status));
        self
    }

    /// Hold acquisitions in flight until [`release`](Self::release).
    pub fn hold(&self) {
        let (opener, gate) = oneshot::channel();
        let mut script = self.script.lock();
        script.gate = Some(gate.shared());
        script.opener = Some(opener);
    }

    /// Let held acquisitions complete.
    pub fn release(&self) {
        let opener = {
            let mut script = self.script.lock();
            script.gate = None;
            script.opener.take()
        };
        if let Some(opener) = opener {
            let _ = opener.send(());
        }
    }

    /// Number of acquisitions started.
    pub fn calls(&self) -> usize {
        self.script.lock().calls
    }
}

impl DataSource for ScriptedSource {
    async fn acquire(&self) -> Result<Payload, AcquisitionError> {
        let gate = {
            let mut script = self.script.lock();
            script.calls += 1;
            script.gate.clone()
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let mut script = self.script.lock();
        match script.queue.pop_front() {
            Some(Scripted::Payload(payload)) => {
                script.fallback = Some(payload.clone());
                Ok(payload)
            }
            Some(Scripted::Status(status)) => Err(AcquisitionError::Server { status }),
            None => script.fallback.clone().ok_or(AcquisitionError::Closed),
        }
    }
}

// ============================================================================
// Recording Boundary
// ============================================================================

/// An error boundary that records every report.
#[derive(Clone, Default)]
pub struct RecordingBoundary {
    reports: Arc<Mutex<Vec<(ElementId, String)>>>,
}

impl RecordingBoundary {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded `(element, message)` pairs.
    pub fn reports(&self) -> Vec<(ElementId, String)> {
        self.reports.lock().clone()
    }

    /// Number of recorded reports.
    pub fn count(&self) -> usize {
        self.reports.lock().len()
    }

    /// Clear all recorded reports.
    pub fn clear(&self) {
        self.reports.lock().clear();
    }
}

impl ErrorBoundary for RecordingBoundary {
    fn report(&self, element: &ElementId, error: &PurlError) {
        self.reports.lock().push((element.clone(), error.to_string()));
    }
}

// ============================================================================
// Failing Template
// ============================================================================

/// Error injected by [`FailingTemplate`].
#[derive(Debug, Clone)]
pub struct InjectedFailure;

impl std::fmt::Display for InjectedFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "injected template failure")
    }
}

impl std::error::Error for InjectedFailure {}

/// Wraps a template and fails patches while armed.
///
/// The inner template is not called while armed, so the root is untouched.
pub struct FailingTemplate<T> {
    inner: T,
    armed: Arc<AtomicBool>,
}

/// Arms and disarms a [`FailingTemplate`] from outside the element.
#[derive(Clone)]
pub struct FailSwitch {
    armed: Arc<AtomicBool>,
}

impl FailSwitch {
    /// Make every patch fail.
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Let patches through again.
    pub fn disarm(&self) {
        self.armed.store(false, Ordering::SeqCst);
    }
}

impl<T> FailingTemplate<T> {
    /// Wrap `inner`, returning the switch that controls it.
    pub fn new(inner: T) -> (Self, FailSwitch) {
        let armed = Arc::new(AtomicBool::new(false));
        (
            Self {
                inner,
                armed: armed.clone(),
            },
            FailSwitch { armed },
        )
    }
}

impl<T: Template> Template for FailingTemplate<T> {
    type Root = T::Root;

    fn patch(&mut self, root: &mut T::Root, description: &Node) -> Result<PatchReport, RenderError> {
        if self.armed.load(Ordering::SeqCst) {
            return Err(RenderError::Template(Box::new(InjectedFailure)));
        }
        self.inner.patch(root, description)
    }
}

//! Single-shot hydration signal.
//!
//! A [`HydrationSignal`] fires at most once. Listeners registered before (or
//! during) emission are called exactly once; listeners registered afterwards
//! are not called and learn about it from [`Subscription::Missed`]. Late
//! observers should use [`HydrationSignal::is_hydrated`] or await
//! [`HydrationSignal::wait`], which resolves immediately once fired.

use futures::{
    FutureExt,
    channel::oneshot,
    future::{Future, Shared},
};
use parking_lot::Mutex;
use purl_core::Hydrated;
use std::mem;

type Listener = Box<dyn FnOnce(&Hydrated) + Send>;

/// Result of [`HydrationSignal::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscription {
    /// The listener will be called when the signal fires.
    Pending,
    /// The signal already fired; the listener was dropped without being called.
    Missed,
}

enum Phase {
    Waiting,
    Emitting(Hydrated),
    Fired(Hydrated),
}

struct SignalState {
    phase: Phase,
    listeners: Vec<Listener>,
    sender: Option<oneshot::Sender<Hydrated>>,
}

/// Fires once when a view has rendered and become interactive.
pub struct HydrationSignal {
    state: Mutex<SignalState>,
    receiver: Shared<oneshot::Receiver<Hydrated>>,
}

impl HydrationSignal {
    /// A signal that has not fired.
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel();
        Self {
            state: Mutex::new(SignalState {
                phase: Phase::Waiting,
                listeners: Vec::new(),
                sender: Some(sender),
            }),
            receiver: receiver.shared(),
        }
    }

    /// Register a listener for the event.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: FnOnce(&Hydrated) + Send + 'static,
    {
        let mut state = self.state.lock();
        match state.phase {
            Phase::Waiting | Phase::Emitting(_) => {
                state.listeners.push(Box::new(listener));
                Subscription::Pending
            }
            Phase::Fired(_) => Subscription::Missed,
        }
    }

    /// Fire the signal. Returns `false` if it had already fired.
    pub fn emit(&self, event: Hydrated) -> bool {
        let sender = {
            let mut state = self.state.lock();
            if !matches!(state.phase, Phase::Waiting) {
                return false;
            }
            state.phase = Phase::Emitting(event.clone());
            state.sender.take()
        };

        // Listeners may subscribe more listeners while we dispatch.
        loop {
            let batch = {
                let mut state = self.state.lock();
                let batch = mem::take(&mut state.listeners);
                if batch.is_empty() {
                    state.phase = Phase::Fired(event.clone());
                }
                batch
            };
            if batch.is_empty() {
                break;
            }
            for listener in batch {
                listener(&event);
            }
        }

        if let Some(sender) = sender {
            let _ = sender.send(event);
        }
        true
    }

    /// Whether the signal has fired (or is firing).
    pub fn is_hydrated(&self) -> bool {
        !matches!(self.state.lock().phase, Phase::Waiting)
    }

    /// The emitted event, once fired.
    pub fn event(&self) -> Option<Hydrated> {
        match &self.state.lock().phase {
            Phase::Waiting => None,
            Phase::Emitting(event) | Phase::Fired(event) => Some(event.clone()),
        }
    }

    /// A future resolving to the event.
    ///
    /// Resolves immediately if the signal already fired, and to `None` if the
    /// signal is dropped without firing.
    pub fn wait(&self) -> impl Future<Output = Option<Hydrated>> + Send + use<> {
        let receiver = self.receiver.clone();
        async move { receiver.await.ok() }
    }
}

impl Default for HydrationSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HydrationSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HydrationSignal")
            .field("hydrated", &self.is_hydrated())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use purl_core::ElementId;
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    fn event() -> Hydrated {
        Hydrated {
            element: ElementId::new("user-page"),
        }
    }

    #[test]
    fn test_fires_once() {
        let signal = HydrationSignal::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        assert_eq!(
            signal.subscribe(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            }),
            Subscription::Pending
        );

        assert!(!signal.is_hydrated());
        assert!(signal.emit(event()));
        assert!(!signal.emit(event()));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(signal.is_hydrated());
    }

    #[test]
    fn test_late_listener_is_missed() {
        let signal = HydrationSignal::new();
        signal.emit(event());

        let called = Arc::new(AtomicUsize::new(0));
        let c = called.clone();
        let sub = signal.subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(sub, Subscription::Missed);
        assert_eq!(called.load(Ordering::SeqCst), 0);
        assert!(signal.event().is_some());
    }

    #[test]
    fn test_listener_added_during_emission_is_called() {
        let signal = Arc::new(HydrationSignal::new());
        let count = Arc::new(AtomicUsize::new(0));

        let inner_signal = signal.clone();
        let inner_count = count.clone();
        signal.subscribe(move |_| {
            let c = inner_count.clone();
            let sub = inner_signal.subscribe(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
            });
            assert_eq!(sub, Subscription::Pending);
        });

        signal.emit(event());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_wait_before_and_after() {
        let signal = HydrationSignal::new();
        let early = signal.wait();
        let fired = event();
        signal.emit(fired.clone());

        assert_eq!(early.await, Some(fired.clone()));
        assert_eq!(signal.wait().await, Some(fired));
    }

    #[tokio::test]
    async fn test_wait_resolves_none_when_dropped() {
        let signal = HydrationSignal::new();
        let waiter = signal.wait();
        drop(signal);
        assert_eq!(waiter.await, None);
    }
}

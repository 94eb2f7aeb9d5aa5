//! Observer pattern for charge accumulators
//!
//! Every state transition and threshold crossing is pushed to subscribers
//! synchronously, inside the call that caused it. Subscribers are keyed by
//! [`SubscriptionId`], so removing one never disturbs the others.

use std::fmt;

/// Notification emitted by a charge accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ChargeEvent {
    /// Charging began.
    Started,
    /// Charging stopped, either explicitly or as part of a release.
    Stopped,
    /// The accumulator was forced idle.
    Reset,
    /// The charge crossed the ready threshold.
    ReadyToRelease { charge: f32 },
    /// The charge reached the maximum.
    FullyCharged { charge: f32 },
    /// The charge was released with the given magnitude.
    Released { charge: f32 },
}

/// Payload-free discriminant of a [`ChargeEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChargeEventKind {
    Started,
    Stopped,
    Reset,
    ReadyToRelease,
    FullyCharged,
    Released,
}

impl ChargeEvent {
    pub fn kind(&self) -> ChargeEventKind {
        match self {
            Self::Started => ChargeEventKind::Started,
            Self::Stopped => ChargeEventKind::Stopped,
            Self::Reset => ChargeEventKind::Reset,
            Self::ReadyToRelease { .. } => ChargeEventKind::ReadyToRelease,
            Self::FullyCharged { .. } => ChargeEventKind::FullyCharged,
            Self::Released { .. } => ChargeEventKind::Released,
        }
    }

    /// Charge carried by the event, if any.
    pub fn charge(&self) -> Option<f32> {
        match *self {
            Self::ReadyToRelease { charge }
            | Self::FullyCharged { charge }
            | Self::Released { charge } => Some(charge),
            Self::Started | Self::Stopped | Self::Reset => None,
        }
    }
}

impl fmt::Display for ChargeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Started => write!(f, "charging started"),
            Self::Stopped => write!(f, "charging stopped"),
            Self::Reset => write!(f, "charge reset"),
            Self::ReadyToRelease { charge } => write!(f, "ready to release {charge:.2}"),
            Self::FullyCharged { charge } => write!(f, "fully charged {charge:.2}"),
            Self::Released { charge } => write!(f, "charge released {charge:.2}"),
        }
    }
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Observer that receives charge events
///
/// `Send + Sync` so one observer can be shared with code on other threads
/// (a render thread, a channel consumer) even though the accumulator that
/// drives it stays on the host thread. Observers with mutable state need
/// interior locking.
pub trait ChargeObserver: Send + Sync {
    /// Called when a charge event occurs
    fn on_event(&self, event: ChargeEvent);
}

/// Function-based observer for simple cases
pub struct FnObserver<F: Fn(ChargeEvent) + Send + Sync>(pub F);

impl<F: Fn(ChargeEvent) + Send + Sync> ChargeObserver for FnObserver<F> {
    fn on_event(&self, event: ChargeEvent) {
        (self.0)(event);
    }
}

/// Channel-based observer - sends events to a channel
pub struct ChannelObserver {
    sender: std::sync::mpsc::Sender<ChargeEvent>,
}

impl ChannelObserver {
    pub fn new(sender: std::sync::mpsc::Sender<ChargeEvent>) -> Self {
        Self { sender }
    }
}

impl ChargeObserver for ChannelObserver {
    fn on_event(&self, event: ChargeEvent) {
        let _ = self.sender.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::sync::mpsc;

    #[test]
    fn test_kind_and_charge() {
        let event = ChargeEvent::Released { charge: 3.5 };
        assert_eq!(event.kind(), ChargeEventKind::Released);
        assert_eq!(event.charge(), Some(3.5));
        assert_eq!(ChargeEvent::Stopped.charge(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(ChargeEvent::FullyCharged { charge: 5.0 }.to_string(), "fully charged 5.00");
        assert_eq!(ChargeEvent::Started.to_string(), "charging started");
    }

    #[test]
    fn test_fn_observer() {
        let count = AtomicUsize::new(0);
        let observer = FnObserver(|_| {
            count.fetch_add(1, Ordering::Relaxed);
        });
        observer.on_event(ChargeEvent::Started);
        observer.on_event(ChargeEvent::Stopped);
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_channel_observer() {
        let (tx, rx) = mpsc::channel();
        let observer = ChannelObserver::new(tx);
        observer.on_event(ChargeEvent::Reset);
        assert_eq!(rx.try_recv().unwrap(), ChargeEvent::Reset);
    }

    #[test]
    fn test_observer_shared_across_threads() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let observer: Arc<dyn ChargeObserver> = Arc::new(FnObserver(move |_| {
            counter.fetch_add(1, Ordering::Relaxed);
        }));

        let remote = observer.clone();
        std::thread::spawn(move || remote.on_event(ChargeEvent::Started))
            .join()
            .unwrap();
        observer.on_event(ChargeEvent::Stopped);
        assert_eq!(count.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_channel_observer_ignores_closed_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        ChannelObserver::new(tx).on_event(ChargeEvent::Started);
    }
}

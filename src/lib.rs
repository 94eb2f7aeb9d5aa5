//! Charge Up - a value that builds while a trigger is held
//!
//! Hold to charge, let go to stop, fire to release. Nothing is polled for
//! thresholds: crossing "ready" or "full" is a deferred callback scheduled
//! when the charge starts, fired by the host's tick.
//!
//! # Core Types
//!
//! - **ChargeAccumulator**: The state machine (Idle / Charging) with derived charge
//! - **ChargeConfig**: Start value, maximum, rate, ready fraction, auto-release
//! - **ChargeEvent**: Notifications pushed to every subscribed observer
//!
//! # Architecture: Input / Accumulator / Display
//!
//! 1. **InputBinding** - polls edge signals each tick and issues commands
//! 2. **ChargeAccumulator** - owns timing and fires notifications
//! 3. **ChargeDisplay** - an observer that turns notifications into colour and text
//!
//! Neither adapter is required; any [`ChargeObserver`] can subscribe and any
//! code holding the accumulator can issue commands.
//!
//! # Notifications
//!
//! | Event | Emitted when |
//! |---|---|
//! | `Started` | `start_charging` succeeds |
//! | `Stopped` | `stop_charging` succeeds, or after a release |
//! | `Reset` | `reset_charge` is called |
//! | `ReadyToRelease` | the ready callback fires |
//! | `FullyCharged` | the full callback fires |
//! | `Released` | `release_charge` succeeds |
//!
//! With auto-release, `FullyCharged` reaches every observer before the
//! resulting `Released` and `Stopped`, all inside the same tick.
//!
//! # Example
//!
//! ```rust
//! use charge_up::{ChargeAccumulator, ChargeConfig, ChargeEvent, FnObserver, ManualClock};
//! use std::sync::{Arc, Mutex};
//!
//! let clock = ManualClock::new();
//! let config = ChargeConfig::new(0.0, 5.0, 0.1, 0.5); // 50 s to full, ready at 25 s
//! let mut charge = ChargeAccumulator::new(config, clock.clone()).unwrap();
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let log = seen.clone();
//! charge.subscribe(Arc::new(FnObserver(move |event| log.lock().unwrap().push(event))));
//!
//! charge.start_charging();
//! charge.release_charge(); // not ready yet: ignored
//!
//! clock.set(30.0);
//! charge.tick(); // fires ReadyToRelease
//! charge.release_charge();
//!
//! let seen = seen.lock().unwrap();
//! assert_eq!(seen.len(), 4);
//! assert!(matches!(seen[1], ChargeEvent::ReadyToRelease { .. }));
//! assert!(matches!(seen[2], ChargeEvent::Released { charge } if charge > 2.9));
//! assert_eq!(seen[3], ChargeEvent::Stopped);
//! assert!(!charge.is_charging());
//! ```

mod accumulator;
mod clock;
mod config;
mod display;
mod error;
mod input;
mod observer;
mod scheduler;

pub use accumulator::ChargeAccumulator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ChargeConfig;
pub use display::{ChargeDisplay, Color, DisplayFrame, Palette};
pub use error::{ConfigError, ScriptError};
pub use input::{InputBinding, InputFrame, InputSource, ScriptedInput};
pub use observer::{
    ChannelObserver, ChargeEvent, ChargeEventKind, ChargeObserver, FnObserver, SubscriptionId,
};
pub use scheduler::Scheduler;

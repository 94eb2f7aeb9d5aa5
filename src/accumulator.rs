//! Charge accumulator - the charge-up state machine
//!
//! Charge builds linearly while charging. Two one-shot callbacks are
//! scheduled when a cycle starts, one at the ready offset and one at the full
//! offset, and fire from [`ChargeAccumulator::tick`] once the clock reaches
//! them. Stopping, releasing or resetting cancels both.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::clock::Clock;
use crate::config::ChargeConfig;
use crate::error::ConfigError;
use crate::observer::{ChargeEvent, ChargeObserver, SubscriptionId};
use crate::scheduler::Scheduler;

/// Deferred callbacks owned by one charge cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Deferred {
    ReachedReady,
    ReachedFull,
}

/// An active charge cycle, with the configuration it was started under.
#[derive(Clone, Debug)]
struct Cycle {
    started_at: f32,
    config: ChargeConfig,
    /// The ready callback has fired.
    ready_reached: bool,
    /// The full callback has fired.
    full_reached: bool,
}

/// Accumulates charge over time while a trigger is held.
///
/// Idle until [`start_charging`](Self::start_charging); charging until it is
/// stopped, released, reset, or auto-released at the maximum. Commands that
/// make no sense in the current state are ignored.
pub struct ChargeAccumulator<C: Clock> {
    config: ChargeConfig,
    clock: C,
    cycle: Option<Cycle>,
    scheduler: Scheduler<Deferred>,
    observers: BTreeMap<SubscriptionId, Arc<dyn ChargeObserver>>,
    next_subscription: u64,
}

impl<C: Clock> ChargeAccumulator<C> {
    /// Create an idle accumulator. Fails if the configuration is invalid.
    pub fn new(config: ChargeConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            clock,
            cycle: None,
            scheduler: Scheduler::new(),
            observers: BTreeMap::new(),
            next_subscription: 0,
        })
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Begin a charge cycle. Ignored while already charging.
    pub fn start_charging(&mut self) {
        if self.cycle.is_some() {
            trace!("start ignored: already charging");
            return;
        }

        let now = self.clock.now();
        let config = self.config.clone();
        self.scheduler
            .schedule(now + config.time_to_reach_ready_from_start(), Deferred::ReachedReady);
        self.scheduler
            .schedule(now + config.time_to_reach_maximum_from_start(), Deferred::ReachedFull);
        debug!(
            now,
            ready_in = config.time_to_reach_ready_from_start(),
            full_in = config.time_to_reach_maximum_from_start(),
            "charging started"
        );
        self.cycle = Some(Cycle {
            started_at: now,
            config,
            ready_reached: false,
            full_reached: false,
        });
        self.emit(ChargeEvent::Started);
    }

    /// End the charge cycle without releasing. Ignored while idle.
    pub fn stop_charging(&mut self) {
        if self.cycle.is_none() {
            trace!("stop ignored: not charging");
            return;
        }

        let cancelled = self.scheduler.cancel_all();
        self.cycle = None;
        debug!(cancelled, "charging stopped");
        self.emit(ChargeEvent::Stopped);
    }

    /// Release the charge, then stop. Ignored unless the charge is ready.
    pub fn release_charge(&mut self) {
        if !self.is_ready() {
            trace!(charge = self.current_charge(), "release ignored: not ready");
            return;
        }

        let charge = self.current_charge();
        debug!(charge, "charge released");
        self.emit(ChargeEvent::Released { charge });
        self.stop_charging();
    }

    /// Force the accumulator idle. Valid in any state.
    pub fn reset_charge(&mut self) {
        let cancelled = self.scheduler.cancel_all();
        self.cycle = None;
        debug!(cancelled, "charge reset");
        self.emit(ChargeEvent::Reset);
    }

    // =========================================================================
    // TIME ADVANCEMENT
    // =========================================================================

    /// Fire every deferred callback that is due. Call once per host tick.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        while let Some((fire_at, deferred)) = self.scheduler.pop_due(now) {
            debug!(?deferred, fire_at, now, "deferred callback due");
            match deferred {
                Deferred::ReachedReady => self.reached_ready(),
                Deferred::ReachedFull => self.reached_full(),
            }
        }
    }

    fn reached_ready(&mut self) {
        if let Some(cycle) = self.cycle.as_mut() {
            cycle.ready_reached = true;
        }
        let charge = self.current_charge();
        self.emit(ChargeEvent::ReadyToRelease { charge });
    }

    fn reached_full(&mut self) {
        if let Some(cycle) = self.cycle.as_mut() {
            cycle.ready_reached = true;
            cycle.full_reached = true;
        }
        let charge = self.current_charge();
        self.emit(ChargeEvent::FullyCharged { charge });
        let auto_release = self
            .cycle
            .as_ref()
            .is_some_and(|cycle| cycle.config.auto_release_at_maximum);
        if auto_release {
            self.release_charge();
        }
    }

    // =========================================================================
    // SUBSCRIPTIONS
    // =========================================================================

    /// Register an observer for every notification.
    pub fn subscribe(&mut self, observer: Arc<dyn ChargeObserver>) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.insert(id, observer);
        id
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    fn emit(&self, event: ChargeEvent) {
        trace!(%event, subscribers = self.observers.len(), "dispatch");
        let observers: Vec<_> = self.observers.values().cloned().collect();
        for observer in observers {
            observer.on_event(event);
        }
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    /// Configuration used by the next cycle.
    pub fn config(&self) -> &ChargeConfig {
        &self.config
    }

    /// Change the maximum charge. Takes effect on the next cycle.
    pub fn set_maximum_charge(&mut self, maximum_charge: f32) -> Result<(), ConfigError> {
        self.update_config(|config| config.maximum_charge = maximum_charge)
    }

    /// Change the ready fraction. Takes effect on the next cycle.
    pub fn set_ready_at(&mut self, ready_at: f32) -> Result<(), ConfigError> {
        self.update_config(|config| config.ready_at = ready_at)
    }

    fn update_config(&mut self, update: impl FnOnce(&mut ChargeConfig)) -> Result<(), ConfigError> {
        let mut config = self.config.clone();
        update(&mut config);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    // =========================================================================
    // STATE
    // =========================================================================

    pub fn is_charging(&self) -> bool {
        self.cycle.is_some()
    }

    /// Seconds since the cycle started, 0 while idle.
    pub fn elapsed_time(&self) -> f32 {
        match &self.cycle {
            Some(cycle) => self.clock.now() - cycle.started_at,
            None => 0.0,
        }
    }

    /// Charge at the current time, clamped to `[0, maximum]`. 0 while idle.
    ///
    /// Never below a threshold whose callback has already fired, so the
    /// derived charge cannot round back under what observers were told.
    pub fn current_charge(&self) -> f32 {
        let Some(cycle) = &self.cycle else {
            return 0.0;
        };
        let maximum = cycle.config.maximum_charge;
        if cycle.full_reached {
            return maximum;
        }
        let fraction = self.elapsed_time() / cycle.config.time_to_reach_maximum_from_start();
        let charge = (fraction * maximum).clamp(0.0, maximum);
        if cycle.ready_reached {
            charge.max(cycle.config.ready_threshold())
        } else {
            charge
        }
    }

    pub fn is_full(&self) -> bool {
        self.cycle.as_ref().is_some_and(|cycle| {
            cycle.full_reached || self.current_charge() >= cycle.config.maximum_charge
        })
    }

    pub fn is_ready(&self) -> bool {
        self.cycle.as_ref().is_some_and(|cycle| {
            cycle.ready_reached || self.current_charge() >= cycle.config.ready_threshold()
        })
    }

    /// Deferred callbacks still waiting to fire.
    pub fn pending_callbacks(&self) -> usize {
        self.scheduler.len()
    }

    /// Fire time of the next deferred callback.
    pub fn next_callback_at(&self) -> Option<f32> {
        self.scheduler.next_fire_at()
    }
}

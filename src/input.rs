//! Input binding - maps per-tick edge signals onto accumulator commands

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::accumulator::ChargeAccumulator;
use crate::clock::Clock;
use crate::error::ScriptError;

/// Edge signals observed during one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    /// Charge button went down.
    pub engage: bool,
    /// Charge button went up.
    pub disengage: bool,
    /// Fire button went down.
    pub trigger: bool,
}

impl InputFrame {
    pub fn is_idle(&self) -> bool {
        !(self.engage || self.disengage || self.trigger)
    }

    fn merge(&mut self, other: Self) {
        self.engage |= other.engage;
        self.disengage |= other.disengage;
        self.trigger |= other.trigger;
    }
}

/// Something that can be polled once per tick for input edges.
pub trait InputSource {
    fn poll(&mut self) -> InputFrame;
}

/// Drives an accumulator from an input source.
pub struct InputBinding<S: InputSource> {
    source: S,
}

impl<S: InputSource> InputBinding<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Poll the source and forward the edges. Call once per tick.
    ///
    /// Engage wins over disengage within one frame; the trigger is handled
    /// after either.
    pub fn update<C: Clock>(&mut self, accumulator: &mut ChargeAccumulator<C>) -> InputFrame {
        let frame = self.source.poll();
        if frame.engage {
            accumulator.start_charging();
        } else if frame.disengage {
            accumulator.stop_charging();
        }
        if frame.trigger {
            accumulator.release_charge();
        }
        frame
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

/// Input replayed from a fixed timeline of tick indices.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    timeline: BTreeMap<u64, InputFrame>,
    tick: u64,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an edge at the given tick.
    pub fn at(mut self, tick: u64, frame: InputFrame) -> Self {
        self.timeline.entry(tick).or_default().merge(frame);
        self
    }

    /// Tick index of the last scripted edge.
    pub fn last_tick(&self) -> Option<u64> {
        self.timeline.keys().next_back().copied()
    }

    /// Ticks polled so far.
    pub fn ticks(&self) -> u64 {
        self.tick
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> InputFrame {
        let frame = self.timeline.get(&self.tick).copied().unwrap_or_default();
        self.tick += 1;
        frame
    }
}

/// Parses `"0:engage,250:trigger,300:disengage"`.
impl FromStr for ScriptedInput {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut script = Self::new();
        for entry in s.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
            let invalid = || ScriptError(entry.to_string());
            let (tick, action) = entry.split_once(':').ok_or_else(invalid)?;
            let tick: u64 = tick.trim().parse().map_err(|_| invalid())?;
            let frame = match action.trim() {
                "engage" => InputFrame { engage: true, ..InputFrame::default() },
                "disengage" => InputFrame { disengage: true, ..InputFrame::default() },
                "trigger" => InputFrame { trigger: true, ..InputFrame::default() },
                _ => return Err(invalid()),
            };
            script = script.at(tick, frame);
        }
        Ok(script)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::config::ChargeConfig;

    const ENGAGE: InputFrame = InputFrame { engage: true, disengage: false, trigger: false };
    const DISENGAGE: InputFrame = InputFrame { engage: false, disengage: true, trigger: false };
    const TRIGGER: InputFrame = InputFrame { engage: false, disengage: false, trigger: true };

    fn accumulator(clock: &ManualClock) -> ChargeAccumulator<ManualClock> {
        ChargeAccumulator::new(ChargeConfig::new(0.0, 2.0, 1.0, 0.5), clock.clone()).unwrap()
    }

    #[test]
    fn test_parse_script() {
        let mut script: ScriptedInput = "0:engage, 2:trigger,2:disengage".parse().unwrap();
        assert_eq!(script.last_tick(), Some(2));
        assert_eq!(script.poll(), ENGAGE);
        assert!(script.poll().is_idle());
        assert_eq!(script.poll(), InputFrame { engage: false, disengage: true, trigger: true });
        assert!(script.poll().is_idle());
        assert_eq!(script.ticks(), 4);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("engage".parse::<ScriptedInput>().is_err());
        assert!("x:engage".parse::<ScriptedInput>().is_err());
        assert!("3:jump".parse::<ScriptedInput>().is_err());
        assert!("".parse::<ScriptedInput>().unwrap().last_tick().is_none());
    }

    #[test]
    fn test_engage_and_disengage() {
        let clock = ManualClock::new();
        let mut accumulator = accumulator(&clock);
        let mut binding = InputBinding::new(ScriptedInput::new().at(0, ENGAGE).at(1, DISENGAGE));

        binding.update(&mut accumulator);
        assert!(accumulator.is_charging());
        binding.update(&mut accumulator);
        assert!(!accumulator.is_charging());
    }

    #[test]
    fn test_engage_wins_over_disengage() {
        let clock = ManualClock::new();
        let mut accumulator = accumulator(&clock);
        let both = InputFrame { engage: true, disengage: true, trigger: false };
        let mut binding = InputBinding::new(ScriptedInput::new().at(0, both));

        binding.update(&mut accumulator);
        assert!(accumulator.is_charging());
    }

    #[test]
    fn test_trigger_releases_when_ready() {
        let clock = ManualClock::new();
        let mut accumulator = accumulator(&clock);
        let mut binding =
            InputBinding::new(ScriptedInput::new().at(0, ENGAGE).at(1, TRIGGER).at(2, TRIGGER));

        binding.update(&mut accumulator);
        clock.advance(0.5);
        binding.update(&mut accumulator);
        assert!(accumulator.is_charging(), "early trigger must be ignored");

        clock.advance(1.0);
        binding.update(&mut accumulator);
        assert!(!accumulator.is_charging());
        assert_eq!(binding.source().ticks(), 3);
    }
}

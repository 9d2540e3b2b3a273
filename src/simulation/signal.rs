//! Traffic light state machine
//!
//! Each intersection owns one light. The cycle is data: every state maps to
//! the number of ticks it lasts and the state that follows it.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalState {
    Red,
    Green,
    Yellow,
}

impl SignalState {
    fn index(self) -> usize {
        match self {
            SignalState::Red => 0,
            SignalState::Green => 1,
            SignalState::Yellow => 2,
        }
    }
}

impl fmt::Display for SignalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalState::Red => "RED",
            SignalState::Green => "GREEN",
            SignalState::Yellow => "YELLOW",
        };
        f.write_str(name)
    }
}

/// How long a state lasts and where it goes next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Phase {
    pub threshold: u32,
    pub next: SignalState,
}

/// Default number of ticks a light stays red
pub const DEFAULT_RED_TICKS: u32 = 10;
/// Default number of ticks a light stays green
pub const DEFAULT_GREEN_TICKS: u32 = 10;
/// Default number of ticks a light stays yellow
pub const DEFAULT_YELLOW_TICKS: u32 = 5;

/// Transition table, indexed by state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalTiming {
    phases: [Phase; 3],
}

impl Default for SignalTiming {
    fn default() -> Self {
        Self::new(DEFAULT_RED_TICKS, DEFAULT_GREEN_TICKS, DEFAULT_YELLOW_TICKS)
    }
}

impl SignalTiming {
    /// Durations are clamped to at least one tick
    pub fn new(red: u32, green: u32, yellow: u32) -> Self {
        Self {
            phases: [
                Phase {
                    threshold: red.max(1),
                    next: SignalState::Green,
                },
                Phase {
                    threshold: green.max(1),
                    next: SignalState::Yellow,
                },
                Phase {
                    threshold: yellow.max(1),
                    next: SignalState::Red,
                },
            ],
        }
    }

    pub fn phase(&self, state: SignalState) -> Phase {
        self.phases[state.index()]
    }

    /// Length of one full RED -> GREEN -> YELLOW cycle
    pub fn cycle_length(&self) -> u32 {
        self.phases.iter().map(|phase| phase.threshold).sum()
    }
}

/// A traffic light at one intersection
///
/// `advance` must be called exactly once per simulated tick. Calling it twice
/// in the same tick advances the light twice; the light does not guard
/// against that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficLight {
    state: SignalState,
    /// Ticks since the last transition, always below the current threshold
    counter: u32,
    timing: SignalTiming,
}

impl Default for TrafficLight {
    fn default() -> Self {
        Self::new(SignalTiming::default())
    }
}

impl TrafficLight {
    /// A new light starts red with a zero counter
    pub fn new(timing: SignalTiming) -> Self {
        Self {
            state: SignalState::Red,
            counter: 0,
            timing,
        }
    }

    /// Advance one tick, returns true if the light changed state
    pub fn advance(&mut self) -> bool {
        self.counter += 1;
        let phase = self.timing.phase(self.state);
        if self.counter >= phase.threshold {
            self.state = phase.next;
            self.counter = 0;
            true
        } else {
            false
        }
    }

    pub fn state(&self) -> SignalState {
        self.state
    }

    pub fn counter(&self) -> u32 {
        self.counter
    }

    pub fn timing(&self) -> &SignalTiming {
        &self.timing
    }

    /// Ticks left before the next transition
    pub fn ticks_remaining(&self) -> u32 {
        self.timing.phase(self.state).threshold - self.counter
    }
}

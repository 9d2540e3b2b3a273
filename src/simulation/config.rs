//! Simulation tuning knobs

use super::signal::SignalTiming;

/// Highest congestion level the tracker stores by default
pub const DEFAULT_MAX_CONGESTION_LEVEL: u64 = 10;

/// Level at which vehicles routed through an intersection are re-routed
pub const DEFAULT_REROUTE_THRESHOLD: u64 = 8;

/// Number of intersections listed in each tick report
pub const DEFAULT_REPORT_TOP: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Durations of the RED, GREEN and YELLOW phases
    pub signal_timing: SignalTiming,
    /// Extra cost per congestion level at a road's destination, 0 routes
    /// without looking at congestion
    pub congestion_penalty: u64,
    /// Raw observations are capped at this level before they are stored
    pub max_congestion_level: u64,
    /// Crossing this level marks routes through the intersection stale,
    /// 0 disables congestion re-routing
    pub reroute_threshold: u64,
    /// Vehicles wait while the light at their intersection is red
    pub respect_signals: bool,
    /// How many of the most congested intersections each tick reports
    pub report_top: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            signal_timing: SignalTiming::default(),
            congestion_penalty: 0,
            max_congestion_level: DEFAULT_MAX_CONGESTION_LEVEL,
            reroute_threshold: DEFAULT_REROUTE_THRESHOLD,
            respect_signals: true,
            report_top: DEFAULT_REPORT_TOP,
        }
    }
}

impl SimConfig {
    /// Normalize a raw observation into a stored congestion level
    pub fn normalize_level(&self, raw: u64) -> u64 {
        raw.min(self.max_congestion_level)
    }

    /// True when moving from `previous` to `level` crosses the re-route threshold upward
    pub fn crosses_reroute_threshold(&self, previous: u64, level: u64) -> bool {
        self.reroute_threshold > 0 && previous < self.reroute_threshold && level >= self.reroute_threshold
    }
}

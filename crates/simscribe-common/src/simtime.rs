//! ---
//! ssc_section: "01-core-types"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Shared core types for the SimScribe workspace."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Resolution units understood by the sim-time column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Fs,
    Ps,
    Ns,
    Us,
    Ms,
    Sec,
}

impl TimeUnit {
    /// Search order used when extracting a unit from a sim-time template.
    pub const ALL: [TimeUnit; 6] = [
        TimeUnit::Fs,
        TimeUnit::Ps,
        TimeUnit::Ns,
        TimeUnit::Us,
        TimeUnit::Ms,
        TimeUnit::Sec,
    ];

    /// Suffix spelling as it appears inside templates.
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Fs => "fs",
            TimeUnit::Ps => "ps",
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::Sec => "sec",
        }
    }

    /// Femtoseconds per step of this unit.
    pub fn femtos(&self) -> f64 {
        match self {
            TimeUnit::Fs => 1.0,
            TimeUnit::Ps => 1e3,
            TimeUnit::Ns => 1e6,
            TimeUnit::Us => 1e9,
            TimeUnit::Ms => 1e12,
            TimeUnit::Sec => 1e15,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl std::str::FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fs" => Ok(TimeUnit::Fs),
            "ps" => Ok(TimeUnit::Ps),
            "ns" => Ok(TimeUnit::Ns),
            "us" => Ok(TimeUnit::Us),
            "ms" => Ok(TimeUnit::Ms),
            "sec" => Ok(TimeUnit::Sec),
            other => Err(format!("unknown time unit: {}", other)),
        }
    }
}

/// Source of the current simulated time.
///
/// The formatter queries this once per rendered line when any column carries
/// a `simtime` field. Implementations are expected to be cheap and
/// lock-free; the reference implementation is [`ManualSimClock`].
pub trait SimTimeSource: Send + Sync + std::fmt::Debug {
    /// Current simulated time expressed in `unit`.
    fn now(&self, unit: TimeUnit) -> f64;
}

/// Manually advanced simulation clock backed by a femtosecond counter.
///
/// The hosting simulator advances the counter from its scheduler; readers
/// convert to the requested resolution on the fly.
#[derive(Debug, Default)]
pub struct ManualSimClock {
    femtos: AtomicU64,
}

impl ManualSimClock {
    /// Clock starting at simulated time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock pre-positioned at the given femtosecond count.
    pub fn starting_at(femtos: u64) -> Self {
        Self {
            femtos: AtomicU64::new(femtos),
        }
    }

    /// Advance the clock by `femtos` femtoseconds.
    pub fn advance(&self, femtos: u64) {
        self.femtos.fetch_add(femtos, Ordering::Relaxed);
    }

    /// Jump the clock to an absolute femtosecond count.
    pub fn set(&self, femtos: u64) {
        self.femtos.store(femtos, Ordering::Relaxed);
    }

    /// Raw femtosecond count.
    pub fn femtos(&self) -> u64 {
        self.femtos.load(Ordering::Relaxed)
    }
}

impl SimTimeSource for ManualSimClock {
    fn now(&self, unit: TimeUnit) -> f64 {
        self.femtos() as f64 / unit.femtos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_suffixes_round_trip() {
        for unit in TimeUnit::ALL {
            assert_eq!(unit.suffix().parse::<TimeUnit>(), Ok(unit));
        }
    }

    #[test]
    fn manual_clock_converts_between_units() {
        let clock = ManualSimClock::starting_at(12_345_000);
        assert_eq!(clock.now(TimeUnit::Fs), 12_345_000.0);
        assert_eq!(clock.now(TimeUnit::Ps), 12_345.0);
        assert_eq!(clock.now(TimeUnit::Ns), 12.345);
        clock.advance(655_000);
        assert_eq!(clock.now(TimeUnit::Ns), 13.0);
        clock.set(2_000_000_000);
        assert_eq!(clock.now(TimeUnit::Us), 2.0);
    }
}

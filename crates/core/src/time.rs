use std::time::Duration;

/// Q32.32 fixed-point time duration in microseconds.
///
/// Storage: `u64` with 32 integer bits + 32 fractional bits.
/// Base unit: microseconds (1 second = 1,000,000 us).
/// Range: 0 to ~4294 seconds with sub-microsecond precision.
///
/// With the `serde` feature, durations are written as whole milliseconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "MillisRepr", into = "MillisRepr")
)]
pub struct Micros(u64);

impl Micros {
    const FRAC_BITS: u32 = 32;
    const MICROS_PER_SEC: u64 = 1_000_000;

    pub const ZERO: Self = Self(0);

    /// Create from whole seconds.
    pub const fn from_secs(secs: u32) -> Self {
        Self((secs as u64 * Self::MICROS_PER_SEC) << Self::FRAC_BITS)
    }

    /// Create from whole milliseconds.
    pub const fn from_millis(millis: u32) -> Self {
        Self((millis as u64 * 1_000) << Self::FRAC_BITS)
    }

    /// Largest whole-millisecond value the integer part can hold.
    pub const MAX_MILLIS: u64 = u32::MAX as u64 / 1_000;

    /// Create from whole milliseconds, or `None` past [`Self::MAX_MILLIS`].
    pub const fn checked_from_millis(millis: u64) -> Option<Self> {
        if millis > Self::MAX_MILLIS {
            return None;
        }
        Some(Self((millis * 1_000) << Self::FRAC_BITS))
    }

    /// Create from whole microseconds.
    pub const fn from_micros(micros: u32) -> Self {
        Self((micros as u64) << Self::FRAC_BITS)
    }

    /// Whole milliseconds, truncated.
    pub const fn as_millis(self) -> u64 {
        (self.0 >> Self::FRAC_BITS) / 1_000
    }

    /// Convert to tick count at the given tick rate.
    ///
    /// Formula: ticks = (micros * tick_hz) / MICROS_PER_SEC
    /// This uses 128-bit intermediate to avoid overflow.
    pub const fn to_ticks(self, tick_hz: u32) -> u64 {
        let numer = self.0 as u128 * tick_hz as u128;
        let denom = Self::MICROS_PER_SEC << Self::FRAC_BITS;
        (numer / denom as u128) as u64
    }

    /// Returns the raw Q32.32 value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl core::ops::Add for Micros {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl core::ops::Sub for Micros {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl core::ops::Mul<u32> for Micros {
    type Output = Self;
    fn mul(self, rhs: u32) -> Self {
        Self(self.0 * rhs as u64)
    }
}

impl core::ops::Div<u32> for Micros {
    type Output = Self;
    fn div(self, rhs: u32) -> Self {
        Self(self.0 / rhs as u64)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
struct MillisRepr(u64);

/// A millisecond count too large for [`Micros`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DurationOutOfRange {
    pub millis: u64,
}

impl core::fmt::Display for DurationOutOfRange {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "duration of {} ms exceeds the maximum of {} ms",
            self.millis,
            Micros::MAX_MILLIS
        )
    }
}

impl std::error::Error for DurationOutOfRange {}

#[cfg(feature = "serde")]
impl TryFrom<MillisRepr> for Micros {
    type Error = DurationOutOfRange;

    fn try_from(repr: MillisRepr) -> Result<Self, Self::Error> {
        Micros::checked_from_millis(repr.0).ok_or(DurationOutOfRange { millis: repr.0 })
    }
}

#[cfg(feature = "serde")]
impl From<Micros> for MillisRepr {
    fn from(m: Micros) -> Self {
        MillisRepr(m.as_millis())
    }
}

/// Fixed-timestep accumulator.
///
/// Converts variable frame times from a presentation loop into a whole
/// number of simulation ticks so the simulation always advances in steps of
/// exactly `1 / tick_hz`. Leftover time carries over to the next frame.
#[derive(Clone, Debug)]
pub struct FixedStep {
    step: Duration,
    accumulated: Duration,
    max_steps_per_frame: u32,
}

impl FixedStep {
    pub fn new(tick_hz: u32) -> Self {
        Self {
            step: Duration::from_nanos(1_000_000_000 / tick_hz.max(1) as u64),
            accumulated: Duration::ZERO,
            max_steps_per_frame: 8,
        }
    }

    /// Caps how many ticks a single long frame may produce. Excess time is dropped.
    pub fn with_max_steps(mut self, max_steps_per_frame: u32) -> Self {
        self.max_steps_per_frame = max_steps_per_frame.max(1);
        self
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    /// Add elapsed frame time and return how many ticks should run now.
    pub fn push(&mut self, frame_time: Duration) -> u32 {
        self.accumulated += frame_time;

        let mut ticks = 0;
        while self.accumulated >= self.step && ticks < self.max_steps_per_frame {
            self.accumulated -= self.step;
            ticks += 1;
        }

        if ticks == self.max_steps_per_frame && self.accumulated >= self.step {
            self.accumulated = Duration::ZERO;
        }

        ticks
    }

    /// Fraction of a tick currently buffered, in `[0, 1)`. Useful for interpolation.
    pub fn alpha(&self) -> f64 {
        self.accumulated.as_secs_f64() / self.step.as_secs_f64()
    }
}

//! Rational time values and half-open time ranges
//!
//! A [`RationalTime`] counts ticks of `1 / rate` seconds. Arithmetic between
//! times of different rates never rounds: the result lands on one of the
//! operand rates when it is exactly representable there, and on the least
//! common multiple of both rates otherwise. All arithmetic is checked and
//! reports overflow as [`Error::TimeOverflow`].

use crate::{Error, Result};
use std::cmp::Ordering;
use std::fmt;

/// Rate used by [`RationalTime::default`] and by empty accumulators
pub const DEFAULT_RATE: i64 = 1;

/// A point in time or a duration, expressed as `value / rate` seconds
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawRationalTime"))]
pub struct RationalTime {
    value: i64,
    rate: i64,
}

/// Unvalidated wire form of a [`RationalTime`]
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawRationalTime {
    value: i64,
    rate: i64,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRationalTime> for RationalTime {
    type Error = Error;

    fn try_from(raw: RawRationalTime) -> Result<Self> {
        Self::try_new(raw.value, raw.rate)
    }
}

impl RationalTime {
    /// Creates a new time of `value` ticks at `rate` ticks per second
    ///
    /// # Panics
    ///
    /// Panics if `rate` is not positive. Use [`try_new`](Self::try_new) for
    /// rates that come from outside the program.
    pub fn new(value: i64, rate: i64) -> Self {
        assert!(rate > 0, "rate must be positive, got {rate}");
        Self { value, rate }
    }

    /// Creates a new time, rejecting rates that are not positive
    pub fn try_new(value: i64, rate: i64) -> Result<Self> {
        if rate <= 0 {
            return Err(Error::InvalidRate { rate });
        }
        Ok(Self { value, rate })
    }

    /// Creates a zero time at the given rate
    pub fn zero(rate: i64) -> Self {
        Self::new(0, rate)
    }

    /// Number of ticks
    pub fn value(&self) -> i64 {
        self.value
    }

    /// Ticks per second, always positive
    pub fn rate(&self) -> i64 {
        self.rate
    }

    /// Returns true if this time is exactly zero
    pub fn is_zero(&self) -> bool {
        self.value == 0
    }

    /// Converts this time to seconds
    pub fn to_seconds(&self) -> f64 {
        self.value as f64 / self.rate as f64
    }

    /// Returns the value this time would have at another rate
    pub fn value_rescaled_to(&self, rate: i64) -> f64 {
        if rate == self.rate {
            return self.value as f64;
        }
        self.value as f64 * rate as f64 / self.rate as f64
    }

    /// Checked addition, `None` on overflow
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.combine(rhs, i64::checked_add)
    }

    /// Checked subtraction, `None` on overflow
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.combine(rhs, i64::checked_sub)
    }

    /// Adds two times, reporting overflow as an error
    pub fn try_add(self, rhs: Self) -> Result<Self> {
        self.checked_add(rhs)
            .ok_or(Error::TimeOverflow { lhs: self, rhs })
    }

    /// Subtracts two times, reporting overflow as an error
    pub fn try_sub(self, rhs: Self) -> Result<Self> {
        self.checked_sub(rhs)
            .ok_or(Error::TimeOverflow { lhs: self, rhs })
    }

    /// Sums an iterator of times, starting from [`RationalTime::default`]
    pub fn try_sum<I: IntoIterator<Item = Self>>(times: I) -> Result<Self> {
        times
            .into_iter()
            .try_fold(Self::default(), |total, time| total.try_add(time))
    }

    fn combine(self, rhs: Self, op: fn(i64, i64) -> Option<i64>) -> Option<Self> {
        if self.rate == rhs.rate {
            return Some(Self::new(op(self.value, rhs.value)?, self.rate));
        }

        let rate = checked_lcm(self.rate, rhs.rate)?;
        let lhs_value = self.value.checked_mul(rate / self.rate)?;
        let rhs_value = rhs.value.checked_mul(rate / rhs.rate)?;
        let combined = Self::new(op(lhs_value, rhs_value)?, rate);
        Some(combined.reduced(self.rate.max(rhs.rate), self.rate.min(rhs.rate)))
    }

    /// Moves a result at an lcm rate back onto `preferred` or `fallback` when exact
    fn reduced(self, preferred: i64, fallback: i64) -> Self {
        for rate in [preferred, fallback] {
            // `rate` divides `self.rate`, so this is exact whenever the remainder is zero
            let step = self.rate / rate;
            if self.value % step == 0 {
                return Self::new(self.value / step, rate);
            }
        }
        self
    }

    /// Cross-multiplied comparison key, exact for any pair of positive rates
    fn cross(&self, other: &Self) -> (i128, i128) {
        (
            self.value as i128 * other.rate as i128,
            other.value as i128 * self.rate as i128,
        )
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::zero(DEFAULT_RATE)
    }
}

impl PartialEq for RationalTime {
    fn eq(&self, other: &Self) -> bool {
        let (lhs, rhs) = self.cross(other);
        lhs == rhs
    }
}

impl Eq for RationalTime {}

impl PartialOrd for RationalTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RationalTime {
    fn cmp(&self, other: &Self) -> Ordering {
        let (lhs, rhs) = self.cross(other);
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.value, self.rate)
    }
}

/// A half-open range `[start_time, start_time + duration)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeRange {
    /// First instant inside the range
    pub start_time: RationalTime,
    /// Length of the range
    pub duration: RationalTime,
}

impl TimeRange {
    /// Creates a new range from a start time and a duration
    pub fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self {
            start_time,
            duration,
        }
    }

    /// Creates a range of `duration` starting at zero
    pub fn from_duration(duration: RationalTime) -> Self {
        Self::new(RationalTime::zero(duration.rate), duration)
    }

    /// Creates a range covering `[start_time, end_time_exclusive)`
    pub fn from_start_end_time(
        start_time: RationalTime,
        end_time_exclusive: RationalTime,
    ) -> Result<Self> {
        Ok(Self::new(start_time, end_time_exclusive.try_sub(start_time)?))
    }

    /// Returns the first instant after the range
    pub fn end_time_exclusive(&self) -> Result<RationalTime> {
        self.start_time.try_add(self.duration)
    }

    /// Checks if the given instant lies inside this range
    pub fn contains_time(&self, time: RationalTime) -> Result<bool> {
        Ok(time >= self.start_time && time < self.end_time_exclusive()?)
    }

    /// Checks if two ranges share any instant
    ///
    /// Ranges that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> Result<bool> {
        Ok(self.start_time < other.end_time_exclusive()?
            && other.start_time < self.end_time_exclusive()?)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end_time_exclusive() {
            Ok(end) => write!(f, "[{}, {})", self.start_time, end),
            Err(_) => write!(f, "[{}, +{})", self.start_time, self.duration),
        }
    }
}

fn gcd(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.abs()
}

/// Least common multiple of two positive rates, `None` on overflow
fn checked_lcm(a: i64, b: i64) -> Option<i64> {
    (a / gcd(a, b)).checked_mul(b)
}

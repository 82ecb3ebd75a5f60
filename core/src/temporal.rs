//! Timestamp sampling over a configured date window.
//!
//! Dates are uniform over the span; the time of day is overridden by a
//! weighted draw over four bands so that hours skew toward business
//! hours while low-weight anomalous-hour timestamps remain possible.

use crate::{
    error::{SimError, SimResult},
    rng::StreamRng,
};
use chrono::{Duration, NaiveDateTime, NaiveTime};

/// Time-of-day bands as (start_hour, end_hour_exclusive) with weights.
const TIME_BANDS: &[((u32, u32), f64)] = &[
    ((9, 18), 5.0), // business hours
    ((0, 6), 1.0),  // overnight
    ((6, 9), 2.0),  // morning
    ((18, 24), 2.0), // evening
];

/// Draw a second-precision time of day from the weighted bands.
fn weighted_time(rng: &mut StreamRng) -> NaiveTime {
    let &(start_hour, end_hour) = rng.weighted_pick(TIME_BANDS);
    let hour = rng.int_between(start_hour as i64, end_hour as i64 - 1) as u32;
    let minute = rng.int_between(0, 59) as u32;
    let second = rng.int_between(0, 59) as u32;
    NaiveTime::from_hms_opt(hour, minute, second).expect("band hours are in range")
}

/// Samples independent timestamps within a window. No ordering
/// guarantee between draws; batches that need chronological order are
/// sorted by their generator.
#[derive(Debug, Clone)]
pub struct WindowSampler {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl WindowSampler {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> SimResult<Self> {
        if start >= end {
            return Err(SimError::EmptyWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Uniform instant over the span, then the time of day replaced by
    /// a weighted-band draw.
    pub fn sample(&self, rng: &mut StreamRng) -> NaiveDateTime {
        let total_seconds = (self.end - self.start).num_seconds();
        let offset = rng.int_between(0, total_seconds);
        let instant = self.start + Duration::seconds(offset);
        instant.date().and_time(weighted_time(rng))
    }
}

/// Samples strictly increasing timestamps within a window. A draw on a
/// spent window is an explicit error, never a wrapped timestamp.
#[derive(Debug, Clone)]
pub struct MonotonicSampler {
    end: NaiveDateTime,
    last: NaiveDateTime,
}

impl MonotonicSampler {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> SimResult<Self> {
        if start >= end {
            return Err(SimError::EmptyWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { end, last: start })
    }

    /// Advance by a random increment of at least one second, then apply
    /// the weighted time-of-day override when it preserves ordering.
    pub fn next(&mut self, rng: &mut StreamRng) -> SimResult<NaiveDateTime> {
        let remaining = (self.end - self.last).num_seconds();
        if remaining <= 0 {
            return Err(SimError::RangeExhausted {
                last: self.last.to_string(),
            });
        }

        let stepped = self.last + Duration::seconds(rng.int_between(1, remaining));
        let candidate = stepped.date().and_time(weighted_time(rng));

        // The override must not step backwards past `last` or beyond the
        // window end; otherwise keep the raw increment.
        let chosen = if candidate > self.last && candidate <= self.end {
            candidate
        } else {
            stepped.min(self.end)
        };
        self.last = chosen;
        Ok(chosen)
    }
}

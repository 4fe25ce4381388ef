//! Integer parameter that can never leave its bounds.
//!
//! Shutter duration and gain are adjusted multiplicatively (brightness
//! feedback), additively, or by direct assignment (mode defaults). Every one
//! of those paths clamps afterwards, so repeated adjustments at a bound are
//! no-ops.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bounded {
    value: i64,
    min: i64,
    max: i64,
}

impl Bounded {
    /// Create a bounded value, clamping `value` into `[min, max]`.
    ///
    /// Reversed bounds are swapped.
    pub fn new(value: i64, min: i64, max: i64) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn is_at_min(&self) -> bool {
        self.value == self.min
    }

    pub fn is_at_max(&self) -> bool {
        self.value == self.max
    }

    /// Assign a new value. Returns the value actually stored.
    pub fn set(&mut self, value: i64) -> i64 {
        self.value = value.clamp(self.min, self.max);
        self.value
    }

    /// Multiply by `factor`, truncating toward zero. Non-finite results leave the value alone.
    pub fn scale(&mut self, factor: f64) -> i64 {
        let scaled = self.value as f64 * factor;
        if scaled.is_finite() {
            // `as` saturates at the i64 range before the clamp
            self.set(scaled as i64)
        } else {
            self.value
        }
    }

    /// Add `delta` (may be negative).
    pub fn offset(&mut self, delta: i64) -> i64 {
        self.set(self.value.saturating_add(delta))
    }

    pub fn to_min(&mut self) -> i64 {
        self.set(self.min)
    }
}

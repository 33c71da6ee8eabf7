//! Side-effect seams for time and randomness.
//!
//! # Responsibility
//! - Keep roster transitions deterministic by passing the date and random
//!   draws in from the outside.
//! - Define the message handed to the celebration renderer after a pick.
//!
//! # Invariants
//! - `uniform_index` is unbiased for every non-zero length.

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::model::student::StudentId;

/// Source of the current calendar day.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Source of uniformly distributed 64-bit values.
pub trait RandomSource {
    fn next_u64(&self) -> u64;
}

/// Production effects: local wall clock and OS entropy.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEffects;

impl Clock for SystemEffects {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

// Low 62 bits of a v4 UUID's second half sit below the variant bits; the top
// two bits of the first half sit above the version nibble. Both are random.
const LOW_RANDOM_MASK: u64 = (1 << 62) - 1;

impl RandomSource for SystemEffects {
    fn next_u64(&self) -> u64 {
        let (high, low) = Uuid::new_v4().as_u64_pair();
        (high & !LOW_RANDOM_MASK) | (low & LOW_RANDOM_MASK)
    }
}

/// Draws an index in `0..len` without modulo bias.
///
/// Returns `None` when `len == 0`.
pub fn uniform_index<R: RandomSource + ?Sized>(rng: &R, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let bound = len as u64;
    // Values below `2^64 mod bound` would over-represent the low indices.
    let threshold = bound.wrapping_neg() % bound;
    loop {
        let draw = rng.next_u64();
        if draw >= threshold {
            return Some((draw % bound) as usize);
        }
    }
}

/// Message for the random-pick celebration renderer. Has no state impact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickSignal {
    pub student_id: StudentId,
    pub trigger: bool,
}

impl PickSignal {
    pub fn fire(student_id: StudentId) -> Self {
        Self {
            student_id,
            trigger: true,
        }
    }
}

#![allow(dead_code)]

use chrono::NaiveDate;
use rollcall_core::{Clock, RandomSource};
use std::cell::Cell;

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

/// Deterministic clock and random source for service tests.
pub struct FixedEffects {
    pub today: Cell<NaiveDate>,
    draws: Vec<u64>,
    cursor: Cell<usize>,
}

impl FixedEffects {
    pub fn new(today: NaiveDate) -> Self {
        Self::with_draws(today, vec![0])
    }

    pub fn with_draws(today: NaiveDate, draws: Vec<u64>) -> Self {
        Self {
            today: Cell::new(today),
            draws,
            cursor: Cell::new(0),
        }
    }
}

impl Clock for FixedEffects {
    fn today(&self) -> NaiveDate {
        self.today.get()
    }
}

impl RandomSource for FixedEffects {
    fn next_u64(&self) -> u64 {
        let index = self.cursor.get();
        self.cursor.set(index + 1);
        self.draws[index % self.draws.len()]
    }
}

/// Linear congruential generator for statistical tests.
pub struct Lcg(Cell<u64>);

impl Lcg {
    pub fn seeded(seed: u64) -> Self {
        Self(Cell::new(seed))
    }
}

impl RandomSource for Lcg {
    fn next_u64(&self) -> u64 {
        let next = self
            .0
            .get()
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0.set(next);
        next ^ (next >> 33)
    }
}

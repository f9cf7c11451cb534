use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::db::models::Exercise;
use crate::error::ForgeError;

pub const DEFAULT_EXERCISES_PER_GROUP: usize = 2;

/// Chooses which of the candidate exercises for a muscle group go into a day.
pub trait ExerciseSelector {
    fn select<'c>(&mut self, muscle_group: &str, candidates: &[&'c Exercise]) -> Vec<&'c Exercise>;
}

/// Takes the first `n` candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FirstN(pub usize);

impl Default for FirstN {
    fn default() -> Self {
        FirstN(DEFAULT_EXERCISES_PER_GROUP)
    }
}

impl ExerciseSelector for FirstN {
    fn select<'c>(&mut self, _muscle_group: &str, candidates: &[&'c Exercise]) -> Vec<&'c Exercise> {
        candidates.iter().take(self.0).copied().collect()
    }
}

/// Takes the first two or three candidates, the count drawn from a seeded generator.
#[derive(Debug, Clone)]
pub struct Seeded {
    rng: StdRng,
}

impl Seeded {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ExerciseSelector for Seeded {
    fn select<'c>(&mut self, _muscle_group: &str, candidates: &[&'c Exercise]) -> Vec<&'c Exercise> {
        let count = self.rng.random_range(2..=3);
        candidates.iter().take(count).copied().collect()
    }
}

/// Configured selection behaviour, turned into a fresh selector per generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionPolicy {
    First(usize),
    Seeded(u64),
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::First(DEFAULT_EXERCISES_PER_GROUP)
    }
}

impl SelectionPolicy {
    pub fn selector(&self) -> Box<dyn ExerciseSelector + Send> {
        match *self {
            SelectionPolicy::First(n) => Box::new(FirstN(n)),
            SelectionPolicy::Seeded(seed) => Box::new(Seeded::new(seed)),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionPolicy::First(n) if *n == DEFAULT_EXERCISES_PER_GROUP => write!(f, "first"),
            SelectionPolicy::First(n) => write!(f, "first:{}", n),
            SelectionPolicy::Seeded(seed) => write!(f, "seeded:{}", seed),
        }
    }
}

/// Parses `first`, `first:<n>` or `seeded:<u64>`.
impl FromStr for SelectionPolicy {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let invalid = || ForgeError::Validation(format!("Unknown exercise selection policy: {}", s));
        match s.split_once(':') {
            None if s == "first" => Ok(SelectionPolicy::default()),
            Some(("first", n)) => match n.parse::<usize>() {
                Ok(n) if n > 0 => Ok(SelectionPolicy::First(n)),
                _ => Err(invalid()),
            },
            Some(("seeded", seed)) => seed
                .parse::<u64>()
                .map(SelectionPolicy::Seeded)
                .map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }
}

//! Exercise catalog snapshot and lookups.
//!
//! The catalog is read from the `exercises` table; when the table cannot be read
//! the bundled list compiled into the library is served instead.

pub mod targets;

pub use targets::{derive_target_muscles, target_muscles_for};

use std::collections::BTreeSet;

use crate::db::models::Exercise;
use crate::error::Result;

const BUNDLED_EXERCISES_JSON: &str = include_str!("../../data/exercises.json");

/// The exercise list shipped with the library.
pub fn bundled_exercises() -> Result<Vec<Exercise>> {
    Ok(serde_json::from_str(BUNDLED_EXERCISES_JSON)?)
}

/// Read access to exercises, as needed by workout day generation.
pub trait ExerciseLookup {
    fn exercise(&self, id: &str) -> Option<&Exercise>;

    /// Exercises suitable for `muscle_group`, best matches first.
    fn candidates_for(&self, muscle_group: &str) -> Vec<&Exercise>;
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    exercises: Vec<Exercise>,
}

impl Catalog {
    pub fn new(exercises: Vec<Exercise>) -> Self {
        Self {
            exercises: exercises
                .into_iter()
                .map(targets::with_target_muscles)
                .collect(),
        }
    }

    pub fn bundled() -> Result<Self> {
        Ok(Self::new(bundled_exercises()?))
    }

    pub fn all(&self) -> &[Exercise] {
        &self.exercises
    }

    pub fn into_exercises(self) -> Vec<Exercise> {
        self.exercises
    }

    pub fn get(&self, id: &str) -> Option<&Exercise> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn muscle_groups(&self) -> BTreeSet<String> {
        self.exercises
            .iter()
            .map(|e| e.primary_muscle_group.clone())
            .collect()
    }

    pub fn by_muscle_group(&self, muscle_group: &str) -> Vec<&Exercise> {
        let wanted = muscle_group.trim().to_lowercase();
        self.exercises
            .iter()
            .filter(|e| e.primary_muscle_group.to_lowercase() == wanted)
            .collect()
    }
}

impl ExerciseLookup for Catalog {
    fn exercise(&self, id: &str) -> Option<&Exercise> {
        self.get(id)
    }

    /// Exercises whose primary group matches come first, in catalog order. Otherwise
    /// exercises that list the group among their target muscles, ordered by how
    /// early the group appears in that list.
    fn candidates_for(&self, muscle_group: &str) -> Vec<&Exercise> {
        let primary = self.by_muscle_group(muscle_group);
        if !primary.is_empty() {
            return primary;
        }

        let wanted = muscle_group.trim().to_lowercase();
        let mut ranked: Vec<(usize, &Exercise)> = self
            .exercises
            .iter()
            .filter_map(|e| {
                target_muscles_for(e)
                    .iter()
                    .position(|m| m.to_lowercase() == wanted)
                    .map(|pos| (pos, e))
            })
            .collect();
        ranked.sort_by_key(|(pos, _)| *pos);
        ranked.into_iter().map(|(_, e)| e).collect()
    }
}

//! In-progress workout state: the planned sets of each exercise and the feedback gate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::db::models::{Exercise, NewSetLog, SetLog};
use crate::error::{ForgeError, Result};

pub const DEFAULT_TARGET_SETS: i64 = 3;
pub const DEFAULT_RIR: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetInput {
    pub weight: f64,
    pub reps: i64,
    pub rir: i64,
}

impl Default for SetInput {
    fn default() -> Self {
        Self {
            weight: 0.0,
            reps: 0,
            rir: DEFAULT_RIR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedSet {
    pub input: SetInput,
    pub log_id: Option<String>,
}

impl TrackedSet {
    pub fn pending(input: SetInput) -> Self {
        Self {
            input,
            log_id: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.log_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseProgress {
    pub exercise_id: String,
    pub name: String,
    pub muscle_group: String,
    pub sets: Vec<TrackedSet>,
}

impl ExerciseProgress {
    pub fn is_complete(&self) -> bool {
        self.sets.iter().all(TrackedSet::is_completed)
    }
}

/// Result of logging one set.
#[derive(Debug, Clone, PartialEq)]
pub struct LogOutcome {
    pub log: SetLog,
    /// Set when this log finished every exercise of a muscle group.
    pub feedback_request: Option<String>,
    /// True when this log was the last set of the workout and no feedback is owed.
    pub workout_complete: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTracker {
    pub session_id: String,
    pub day_id: String,
    pub exercises: Vec<ExerciseProgress>,
    pending_feedback: Option<String>,
    feedback_given: HashSet<String>,
}

impl WorkoutTracker {
    /// Plans `target_sets` pending sets per exercise, falling back to `default_sets`.
    pub fn new(
        session_id: impl Into<String>,
        day_id: impl Into<String>,
        exercises: &[Exercise],
        default_sets: i64,
    ) -> Self {
        let exercises = exercises
            .iter()
            .map(|e| {
                let count = e.target_sets.filter(|n| *n > 0).unwrap_or(default_sets).max(1);
                ExerciseProgress {
                    exercise_id: e.id.clone(),
                    name: e.name.clone(),
                    muscle_group: e.primary_muscle_group.clone(),
                    sets: (0..count)
                        .map(|_| TrackedSet::pending(SetInput::default()))
                        .collect(),
                }
            })
            .collect();
        Self {
            session_id: session_id.into(),
            day_id: day_id.into(),
            exercises,
            pending_feedback: None,
            feedback_given: HashSet::new(),
        }
    }

    pub fn pending_feedback(&self) -> Option<&str> {
        self.pending_feedback.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.exercises.iter().all(ExerciseProgress::is_complete)
    }

    fn exercise_mut(&mut self, exercise_id: &str) -> Result<&mut ExerciseProgress> {
        self.exercises
            .iter_mut()
            .find(|e| e.exercise_id == exercise_id)
            .ok_or_else(|| ForgeError::not_found("Exercise in workout", exercise_id))
    }

    fn set_mut(&mut self, exercise_id: &str, index: usize) -> Result<&mut TrackedSet> {
        self.exercise_mut(exercise_id)?
            .sets
            .get_mut(index)
            .ok_or_else(|| ForgeError::not_found("Set", format!("{}#{}", exercise_id, index + 1)))
    }

    /// Edits a pending set. Logged sets are immutable.
    pub fn update_set(&mut self, exercise_id: &str, index: usize, input: SetInput) -> Result<()> {
        let set = self.set_mut(exercise_id, index)?;
        if set.is_completed() {
            return Err(ForgeError::Validation(format!(
                "Set {} has already been logged",
                index + 1
            )));
        }
        set.input = input;
        Ok(())
    }

    /// Checks a set can be logged and builds the row to persist. Nothing changes
    /// until [`WorkoutTracker::mark_logged`] is called with the stored row.
    pub fn prepare_log(&mut self, exercise_id: &str, index: usize) -> Result<NewSetLog> {
        if let Some(group) = &self.pending_feedback {
            return Err(ForgeError::FeedbackPending(group.clone()));
        }
        let session_id = self.session_id.clone();
        let set = self.set_mut(exercise_id, index)?;
        if set.is_completed() {
            return Err(ForgeError::Validation(format!(
                "Set {} has already been logged",
                index + 1
            )));
        }
        let SetInput { weight, reps, rir } = set.input;
        if !weight.is_finite() || weight <= 0.0 || reps <= 0 {
            return Err(ForgeError::InvalidInput(
                "Enter a weight and reps greater than zero".to_string(),
            ));
        }
        if rir < 0 {
            return Err(ForgeError::InvalidInput(
                "Reps in reserve cannot be negative".to_string(),
            ));
        }
        Ok(NewSetLog {
            session_id: Some(session_id),
            exercise_id: exercise_id.to_string(),
            weight,
            reps,
            rir,
        })
    }

    /// Marks the set completed after its log row was written.
    pub fn mark_logged(&mut self, index: usize, log: SetLog) -> Result<LogOutcome> {
        let set = self.set_mut(&log.exercise_id, index)?;
        set.log_id = Some(log.id.clone());

        let group = self
            .exercises
            .iter()
            .find(|e| e.exercise_id == log.exercise_id)
            .map(|e| e.muscle_group.clone())
            .unwrap_or_default();
        let group_done = self
            .exercises
            .iter()
            .filter(|e| e.muscle_group == group)
            .all(ExerciseProgress::is_complete);

        let feedback_request = if group_done && !self.feedback_given.contains(&group) {
            self.pending_feedback = Some(group.clone());
            Some(group)
        } else {
            None
        };
        let workout_complete = feedback_request.is_none() && self.is_complete();
        Ok(LogOutcome {
            log,
            feedback_request,
            workout_complete,
        })
    }

    /// Appends a pending set seeded from the exercise's last set.
    pub fn add_set(&mut self, exercise_id: &str) -> Result<usize> {
        let exercise = self.exercise_mut(exercise_id)?;
        let seed = exercise
            .sets
            .last()
            .map(|s| s.input)
            .unwrap_or_default();
        exercise.sets.push(TrackedSet::pending(seed));
        Ok(exercise.sets.len() - 1)
    }

    /// Checks feedback for `muscle_group` is expected now.
    pub fn check_feedback(&self, muscle_group: &str) -> Result<()> {
        match &self.pending_feedback {
            Some(pending) if pending.eq_ignore_ascii_case(muscle_group) => Ok(()),
            Some(pending) => Err(ForgeError::FeedbackPending(pending.clone())),
            None => Err(ForgeError::Validation(format!(
                "No feedback requested for {}",
                muscle_group
            ))),
        }
    }

    /// Lifts the feedback gate. Returns true when the workout is finished.
    pub fn record_feedback(&mut self, muscle_group: &str) -> bool {
        if let Some(pending) = self.pending_feedback.take() {
            self.feedback_given.insert(pending);
        }
        self.feedback_given.insert(muscle_group.to_string());
        self.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn exercise(id: &str, group: &str, target_sets: Option<i64>) -> Exercise {
        Exercise {
            id: id.into(),
            name: id.into(),
            primary_muscle_group: group.into(),
            equipment: String::new(),
            instructions: String::new(),
            video_url: None,
            target_sets,
            target_muscles: None,
            owner_user_id: None,
        }
    }

    fn stored(new: NewSetLog, id: &str) -> SetLog {
        SetLog {
            id: id.into(),
            user_id: "u".into(),
            session_id: new.session_id,
            exercise_id: new.exercise_id,
            weight: new.weight,
            reps: new.reps,
            rir: new.rir,
            completed: true,
            logged_at: Utc::now(),
        }
    }

    fn log(tracker: &mut WorkoutTracker, exercise_id: &str, index: usize) -> Result<LogOutcome> {
        tracker.update_set(
            exercise_id,
            index,
            SetInput {
                weight: 100.0,
                reps: 8,
                rir: 2,
            },
        )?;
        let new = tracker.prepare_log(exercise_id, index)?;
        tracker.mark_logged(index, stored(new, &format!("{}-{}", exercise_id, index)))
    }

    fn tracker() -> WorkoutTracker {
        WorkoutTracker::new(
            "s1",
            "d1",
            &[
                exercise("bench", "Chest", Some(2)),
                exercise("fly", "Chest", Some(1)),
                exercise("row", "Back", None),
            ],
            DEFAULT_TARGET_SETS,
        )
    }

    #[test]
    fn plans_target_sets_with_seed_values() {
        let tracker = tracker();
        let counts: Vec<_> = tracker.exercises.iter().map(|e| e.sets.len()).collect();
        assert_eq!(counts, vec![2, 1, 3]);
        assert_eq!(tracker.exercises[2].sets[0].input, SetInput::default());
        assert_eq!(tracker.exercises[2].sets[0].input.rir, 2);
    }

    #[test]
    fn zero_weight_or_reps_leaves_set_pending() {
        let mut tracker = tracker();
        assert!(matches!(
            tracker.prepare_log("bench", 0),
            Err(ForgeError::InvalidInput(_))
        ));
        tracker
            .update_set("bench", 0, SetInput { weight: 60.0, reps: 0, rir: 1 })
            .unwrap();
        assert!(matches!(
            tracker.prepare_log("bench", 0),
            Err(ForgeError::InvalidInput(_))
        ));
        assert!(!tracker.exercises[0].sets[0].is_completed());
    }

    #[test]
    fn finishing_a_group_gates_on_feedback() {
        let mut tracker = tracker();
        assert_eq!(log(&mut tracker, "bench", 0).unwrap().feedback_request, None);
        assert_eq!(log(&mut tracker, "bench", 1).unwrap().feedback_request, None);
        let outcome = log(&mut tracker, "fly", 0).unwrap();
        assert_eq!(outcome.feedback_request.as_deref(), Some("Chest"));

        assert!(matches!(
            log(&mut tracker, "row", 0),
            Err(ForgeError::FeedbackPending(group)) if group == "Chest"
        ));
        assert!(matches!(
            tracker.check_feedback("Back"),
            Err(ForgeError::FeedbackPending(_))
        ));

        tracker.check_feedback("chest").unwrap();
        assert!(!tracker.record_feedback("Chest"));
        for index in 0..3 {
            log(&mut tracker, "row", index).unwrap();
        }
        assert_eq!(tracker.pending_feedback(), Some("Back"));
        assert!(tracker.record_feedback("Back"));
    }

    #[test]
    fn extra_set_after_feedback_completes_the_workout() {
        let mut tracker = tracker();
        log(&mut tracker, "bench", 0).unwrap();
        log(&mut tracker, "bench", 1).unwrap();
        log(&mut tracker, "fly", 0).unwrap();
        assert!(!tracker.record_feedback("Chest"));

        let extra = tracker.add_set("bench").unwrap();
        for index in 0..3 {
            log(&mut tracker, "row", index).unwrap();
        }
        assert!(!tracker.record_feedback("Back"));

        let outcome = log(&mut tracker, "bench", extra).unwrap();
        assert_eq!(outcome.feedback_request, None);
        assert!(outcome.workout_complete);
        assert!(tracker.is_complete());
    }

    #[test]
    fn logged_sets_are_immutable() {
        let mut tracker = tracker();
        log(&mut tracker, "row", 0).unwrap();
        let result = tracker.update_set("row", 0, SetInput::default());
        assert!(matches!(result, Err(ForgeError::Validation(_))));
        assert!(matches!(
            tracker.prepare_log("row", 0),
            Err(ForgeError::Validation(_))
        ));
    }

    #[test]
    fn added_sets_copy_the_previous_one() {
        let mut tracker = tracker();
        tracker
            .update_set("row", 2, SetInput { weight: 80.0, reps: 10, rir: 1 })
            .unwrap();
        let index = tracker.add_set("row").unwrap();
        assert_eq!(index, 3);
        assert_eq!(
            tracker.exercises[2].sets[3].input,
            SetInput { weight: 80.0, reps: 10, rir: 1 }
        );
        assert!(tracker.add_set("missing").is_err());
    }
}

//! Workout flow: starting a day, logging sets, feedback and completion.

use chrono::NaiveDate;
use log::{debug, info, warn};

use crate::db::operations;
use crate::error::{ForgeError, Result};
use crate::session::Session;
use crate::workout::{
    self, FeedbackOutcome, LogOutcome, MuscleGroupFeedback, PerformanceTarget, PreviousPerformance,
    SetInput, Workload, WorkoutTracker,
};

fn no_workout() -> ForgeError {
    ForgeError::Validation("No workout in progress".to_string())
}

impl Session {
    /// Opens a workout session for `day_id` and plans its sets.
    pub async fn start_workout(&self, day_id: &str, session_date: NaiveDate) -> Result<WorkoutTracker> {
        let day = self
            .get_workout_day(day_id)
            .await?
            .ok_or_else(|| ForgeError::not_found("Workout day", day_id))?;

        let catalog = self.catalog().await?;
        let exercises: Vec<_> = day
            .exercise_ids
            .iter()
            .filter_map(|id| {
                let found = catalog.get(id).cloned();
                if found.is_none() {
                    warn!("Workout day {} references unknown exercise {}", day.id, id);
                }
                found
            })
            .collect();

        let mut current = self.workout.lock().await;
        if let Some(previous) = current.as_ref() {
            warn!(
                "Replacing unfinished workout session {} on day {}",
                previous.session_id, previous.day_id
            );
            operations::set_workout_day_session(&self.db_pool, &previous.day_id, None).await?;
            *current = None;
        }

        let session = operations::start_workout_session(
            &self.db_pool,
            &self.user.user_id,
            &day.id,
            session_date,
        )
        .await?;
        let tracker = WorkoutTracker::new(
            session.id,
            day.id,
            &exercises,
            self.config.default_target_sets,
        );
        info!(
            "Started workout session {} with {} exercises",
            tracker.session_id,
            tracker.exercises.len()
        );
        *current = Some(tracker.clone());
        Ok(tracker)
    }

    pub async fn update_set(&self, exercise_id: &str, index: usize, input: SetInput) -> Result<()> {
        let mut current = self.workout.lock().await;
        current
            .as_mut()
            .ok_or_else(no_workout)?
            .update_set(exercise_id, index, input)
    }

    pub async fn add_set(&self, exercise_id: &str) -> Result<usize> {
        let mut current = self.workout.lock().await;
        current.as_mut().ok_or_else(no_workout)?.add_set(exercise_id)
    }

    /// Validates and persists one set. The set only turns completed once its log row
    /// is stored.
    pub async fn log_set(&self, exercise_id: &str, index: usize) -> Result<LogOutcome> {
        let _submission = self.begin_submission()?;
        let mut current = self.workout.lock().await;
        let tracker = current.as_mut().ok_or_else(no_workout)?;

        let new_log = tracker.prepare_log(exercise_id, index)?;
        let log = operations::add_set_log(&self.db_pool, &self.user.user_id, &new_log).await?;
        debug!("Logged set {}", log);
        let outcome = tracker.mark_logged(index, log)?;

        if outcome.workout_complete {
            operations::set_workout_day_session(&self.db_pool, &tracker.day_id, None).await?;
            info!("Workout session {} complete", tracker.session_id);
            *current = None;
        }
        Ok(outcome)
    }

    /// Stores the ratings for the group whose sets were just finished. Completes the
    /// workout when nothing is left to log.
    pub async fn submit_feedback(
        &self,
        muscle_group: &str,
        feedback: MuscleGroupFeedback,
    ) -> Result<FeedbackOutcome> {
        let _submission = self.begin_submission()?;
        let mut current = self.workout.lock().await;
        let tracker = current.as_mut().ok_or_else(no_workout)?;
        tracker.check_feedback(muscle_group)?;

        operations::upsert_muscle_group_feedback(
            &self.db_pool,
            &tracker.session_id,
            muscle_group,
            feedback.joint_pain.value(),
            feedback.pump.value(),
            feedback.workload.value(),
        )
        .await?;

        let workout_complete = tracker.record_feedback(muscle_group);
        if workout_complete {
            operations::set_workout_day_session(&self.db_pool, &tracker.day_id, None).await?;
            info!("Workout session {} complete", tracker.session_id);
            *current = None;
        }
        Ok(FeedbackOutcome {
            muscle_group: muscle_group.to_string(),
            workout_complete,
        })
    }

    /// Ends the workout in progress, whether or not every set was logged.
    pub async fn complete_workout(&self) -> Result<()> {
        let mut current = self.workout.lock().await;
        let tracker = current.take().ok_or_else(no_workout)?;
        let cleared = operations::set_workout_day_session(&self.db_pool, &tracker.day_id, None).await;
        if let Err(e) = cleared {
            *current = Some(tracker);
            return Err(e);
        }
        info!("Workout session {} ended", tracker.session_id);
        Ok(())
    }

    /// Next working weight for `exercise_id` from its last logged set and the workload
    /// reported for that set's muscle group. `None` without history.
    pub async fn recommend_weight(
        &self,
        exercise_id: &str,
        target: PerformanceTarget,
    ) -> Result<Option<f64>> {
        let logs =
            operations::get_set_logs_for_exercise(&self.db_pool, &self.user.user_id, exercise_id)
                .await?;
        let Some(last) = logs.last() else {
            return Ok(None);
        };

        let group = self
            .get_exercise_by_id(exercise_id)
            .await?
            .map(|e| e.primary_muscle_group);
        let mut workload = Workload::PrettyGood;
        if let (Some(session_id), Some(group)) = (&last.session_id, group) {
            let reported = operations::get_feedback_for_session(&self.db_pool, session_id)
                .await?
                .into_iter()
                .find(|f| f.muscle_group.eq_ignore_ascii_case(&group));
            if let Some(feedback) = reported {
                workload = Workload::try_from(feedback.workload)?;
            }
        }

        let previous = PreviousPerformance {
            weight: last.weight,
            reps: last.reps,
            rir: last.rir,
        };
        Ok(Some(workout::recommended_weight(previous, target, workload)))
    }
}

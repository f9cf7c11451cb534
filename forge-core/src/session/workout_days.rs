use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use log::info;

use crate::db::models::{NewWorkoutDay, WorkoutDay};
use crate::db::operations;
use crate::error::{ForgeError, Result};
use crate::session::Session;

fn validate_days(days: &[NewWorkoutDay]) -> Result<()> {
    let mut seen = HashSet::new();
    for day in days {
        if !(1..=7).contains(&day.day_of_week) {
            return Err(ForgeError::Validation(format!(
                "Day of week {} is outside 1-7",
                day.day_of_week
            )));
        }
        if !seen.insert(day.day_of_week) {
            return Err(ForgeError::Validation(format!(
                "{} is scheduled more than once",
                day.day_name
            )));
        }
    }
    Ok(())
}

impl Session {
    pub async fn get_workout_days(&self, meso_id: &str) -> Result<Vec<WorkoutDay>> {
        self.mesocycle_for_read(meso_id).await?;
        operations::get_workout_days_for_mesocycle(&self.db_pool, meso_id).await
    }

    /// Replaces every workout day of the mesocycle in one transaction.
    pub async fn save_workout_days(
        &self,
        meso_id: &str,
        days: &[NewWorkoutDay],
    ) -> Result<Vec<WorkoutDay>> {
        self.mesocycle_for_write(meso_id).await?;
        validate_days(days)?;
        let saved = operations::save_workout_days(&self.db_pool, meso_id, days).await?;
        info!("Saved {} workout days for mesocycle {}", saved.len(), meso_id);
        Ok(saved)
    }

    pub async fn delete_workout_days(&self, meso_id: &str) -> Result<()> {
        self.mesocycle_for_write(meso_id).await?;
        operations::delete_workout_days_for_mesocycle(&self.db_pool, meso_id).await?;
        Ok(())
    }

    /// `None` for missing days and for days of other users' mesocycles.
    pub async fn get_workout_day(&self, day_id: &str) -> Result<Option<WorkoutDay>> {
        let Some(day) = operations::get_workout_day(&self.db_pool, day_id).await? else {
            return Ok(None);
        };
        Ok(self.get_mesocycle(&day.meso_id).await?.map(|_| day))
    }

    /// The day of `meso_id` scheduled on the weekday of `today`.
    pub async fn get_workout_for_today(
        &self,
        meso_id: &str,
        today: NaiveDate,
    ) -> Result<Option<WorkoutDay>> {
        let weekday = today.weekday().number_from_monday() as u8;
        Ok(self
            .get_workout_days(meso_id)
            .await?
            .into_iter()
            .find(|d| d.day_of_week == weekday))
    }
}

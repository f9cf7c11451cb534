use std::collections::BTreeSet;

use log::{info, warn};

use crate::catalog::Catalog;
use crate::db::models::{Exercise, NewExercise};
use crate::db::operations::{self, new_id};
use crate::error::{ForgeError, Result};
use crate::session::Session;

impl Session {
    /// The shared catalog plus this user's custom exercises. Falls back to the
    /// bundled list when the database cannot be read.
    pub async fn catalog(&self) -> Result<Catalog> {
        match operations::get_all_exercises(&self.db_pool, Some(&self.user.user_id)).await {
            Ok(exercises) => Ok(Catalog::new(exercises)),
            Err(e) => {
                warn!("Failed to read exercises, serving bundled catalog: {}", e);
                Catalog::bundled()
            }
        }
    }

    pub async fn list_exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.catalog().await?.into_exercises())
    }

    /// `None` for ids that are not in this user's catalog.
    pub async fn get_exercise_by_id(&self, exercise_id: &str) -> Result<Option<Exercise>> {
        Ok(self.catalog().await?.get(exercise_id).cloned())
    }

    pub async fn get_muscle_groups(&self) -> Result<BTreeSet<String>> {
        Ok(self.catalog().await?.muscle_groups())
    }

    pub async fn get_exercises_by_muscle_group(&self, muscle_group: &str) -> Result<Vec<Exercise>> {
        Ok(self
            .catalog()
            .await?
            .by_muscle_group(muscle_group)
            .into_iter()
            .cloned()
            .collect())
    }

    async fn insert_exercise(&self, fields: NewExercise, owner: Option<String>) -> Result<Exercise> {
        fields.validate()?;
        let exercise = Exercise {
            id: new_id(),
            name: fields.name.trim().to_string(),
            primary_muscle_group: fields.primary_muscle_group.trim().to_string(),
            equipment: fields.equipment,
            instructions: fields.instructions,
            video_url: fields.video_url,
            target_sets: fields.target_sets,
            target_muscles: fields.target_muscles,
            owner_user_id: owner,
        };
        operations::insert_exercise(&self.db_pool, &exercise).await?;
        info!("Created exercise {} ({})", exercise.name, exercise.id);
        Ok(crate::catalog::targets::with_target_muscles(exercise))
    }

    pub async fn create_custom_exercise(&self, fields: NewExercise) -> Result<Exercise> {
        self.insert_exercise(fields, Some(self.user.user_id.clone()))
            .await
    }

    /// Adds a shared entry visible to every user.
    pub async fn create_catalog_exercise(&self, fields: NewExercise) -> Result<Exercise> {
        self.user.require_admin()?;
        self.insert_exercise(fields, None).await
    }

    /// Loads an exercise the caller may change: their own, or any for an admin.
    async fn exercise_for_write(&self, exercise_id: &str) -> Result<Exercise> {
        let exercise = operations::get_exercise(&self.db_pool, exercise_id)
            .await?
            .ok_or_else(|| ForgeError::not_found("Exercise", exercise_id))?;

        let owned = exercise.owner_user_id.as_deref() == Some(self.user.user_id.as_str());
        if owned || self.user.is_admin() {
            return Ok(exercise);
        }
        if exercise.is_custom() {
            // Another user's exercise is invisible to this one.
            return Err(ForgeError::not_found("Exercise", exercise_id));
        }
        Err(ForgeError::Forbidden(
            "catalog exercises are read-only".to_string(),
        ))
    }

    pub async fn update_custom_exercise(
        &self,
        exercise_id: &str,
        fields: NewExercise,
    ) -> Result<Exercise> {
        fields.validate()?;
        let existing = self.exercise_for_write(exercise_id).await?;
        operations::update_exercise(&self.db_pool, exercise_id, &fields).await?;
        Ok(crate::catalog::targets::with_target_muscles(Exercise {
            id: existing.id,
            name: fields.name.trim().to_string(),
            primary_muscle_group: fields.primary_muscle_group.trim().to_string(),
            equipment: fields.equipment,
            instructions: fields.instructions,
            video_url: fields.video_url,
            target_sets: fields.target_sets,
            target_muscles: fields.target_muscles,
            owner_user_id: existing.owner_user_id,
        }))
    }

    pub async fn delete_custom_exercise(&self, exercise_id: &str) -> Result<()> {
        self.exercise_for_write(exercise_id).await?;
        operations::delete_exercise(&self.db_pool, exercise_id).await?;
        info!("Deleted exercise {}", exercise_id);
        Ok(())
    }
}

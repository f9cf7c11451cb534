use chrono::NaiveDate;
use log::{info, warn};

use crate::db::models::{Mesocycle, MesocycleUpdate, WorkoutDay};
use crate::db::operations::{self, name_key};
use crate::draft::{MesocycleForm, PlanMode};
use crate::error::{ForgeError, Result};
use crate::generator::{self, GenerationRequest, find_template};
use crate::mesocycle::{suggest_mesocycle_name, validate_duration, validate_name};
use crate::session::Session;

/// A mesocycle together with the workout days generated for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedMesocycle {
    pub mesocycle: Mesocycle,
    pub days: Vec<WorkoutDay>,
}

impl Session {
    /// `None` both for missing ids and for other users' mesocycles.
    pub async fn get_mesocycle(&self, meso_id: &str) -> Result<Option<Mesocycle>> {
        Ok(operations::get_mesocycle(&self.db_pool, meso_id)
            .await?
            .filter(|m| m.user_id == self.user.user_id))
    }

    pub(crate) async fn mesocycle_for_read(&self, meso_id: &str) -> Result<Mesocycle> {
        self.get_mesocycle(meso_id)
            .await?
            .ok_or_else(|| ForgeError::not_found("Mesocycle", meso_id))
    }

    pub(crate) async fn mesocycle_for_write(&self, meso_id: &str) -> Result<Mesocycle> {
        let meso = operations::get_mesocycle(&self.db_pool, meso_id)
            .await?
            .ok_or_else(|| ForgeError::not_found("Mesocycle", meso_id))?;
        if meso.user_id != self.user.user_id {
            return Err(ForgeError::Forbidden(
                "this mesocycle belongs to another user".to_string(),
            ));
        }
        Ok(meso)
    }

    pub async fn list_mesocycles(&self) -> Result<Vec<Mesocycle>> {
        operations::get_mesocycles_for_user(&self.db_pool, &self.user.user_id).await
    }

    pub async fn get_active_mesocycle(&self) -> Result<Option<Mesocycle>> {
        operations::get_active_mesocycle(&self.db_pool, &self.user.user_id).await
    }

    async fn ensure_name_free(&self, name: &str, excluding: Option<&str>) -> Result<()> {
        let clash = operations::find_mesocycle_by_name_key(
            &self.db_pool,
            &self.user.user_id,
            &name_key(name),
            excluding,
        )
        .await?;
        match clash {
            Some(existing) => Err(ForgeError::DuplicateName(existing.name)),
            None => Ok(()),
        }
    }

    /// Creates the mesocycle as the user's only active one.
    pub async fn create_mesocycle(
        &self,
        name: &str,
        duration_weeks: i64,
        start_date: NaiveDate,
    ) -> Result<Mesocycle> {
        let name = validate_name(name)?;
        validate_duration(duration_weeks)?;
        self.ensure_name_free(&name, None).await?;

        let meso = operations::create_mesocycle(
            &self.db_pool,
            &self.user.user_id,
            &name,
            start_date,
            duration_weeks,
        )
        .await?;
        info!("Created mesocycle {} ({})", meso.name, meso.id);
        Ok(meso)
    }

    pub async fn update_mesocycle(&self, meso_id: &str, update: MesocycleUpdate) -> Result<Mesocycle> {
        self.mesocycle_for_write(meso_id).await?;

        let name = update.name.as_deref().map(validate_name).transpose()?;
        if let Some(weeks) = update.duration_weeks {
            validate_duration(weeks)?;
        }
        if let Some(name) = &name {
            self.ensure_name_free(name, Some(meso_id)).await?;
        }

        operations::update_mesocycle(
            &self.db_pool,
            meso_id,
            name.as_deref(),
            update.duration_weeks,
            update.start_date,
        )
        .await?;
        self.mesocycle_for_read(meso_id).await
    }

    pub async fn set_active_mesocycle(&self, meso_id: &str) -> Result<()> {
        self.mesocycle_for_write(meso_id).await?;
        operations::set_active_mesocycle(&self.db_pool, &self.user.user_id, meso_id).await?;
        info!("Activated mesocycle {}", meso_id);
        Ok(())
    }

    pub async fn delete_mesocycle(&self, meso_id: &str) -> Result<()> {
        self.mesocycle_for_write(meso_id).await?;
        operations::delete_mesocycle(&self.db_pool, meso_id).await?;
        info!("Deleted mesocycle {}", meso_id);
        Ok(())
    }

    pub async fn suggest_mesocycle_name(&self, desired: &str) -> Result<String> {
        let existing: Vec<String> = self
            .list_mesocycles()
            .await?
            .into_iter()
            .map(|m| m.name)
            .collect();
        Ok(suggest_mesocycle_name(desired, &existing))
    }

    /// Creates a mesocycle from a submitted form, generates and saves its days and
    /// clears the draft.
    ///
    /// When the days cannot be produced or saved the new mesocycle is removed again and
    /// the previously active one restored, so resubmitting the same form does not hit
    /// `DuplicateName`.
    pub async fn create_mesocycle_from_form(
        &self,
        form: &MesocycleForm,
        today: NaiveDate,
    ) -> Result<CreatedMesocycle> {
        let _submission = self.begin_submission()?;

        let template = match &form.mode {
            PlanMode::Preset { template } => Some(find_template(template).ok_or_else(|| {
                ForgeError::Validation(format!("Unknown workout template: {}", template))
            })?),
            PlanMode::Custom => None,
        };
        let request = match &template {
            Some(template) => GenerationRequest::Preset {
                template,
                start_day: form.start_day(),
            },
            None => GenerationRequest::Custom {
                days: &form.planner.days,
            },
        };

        let previous_active = self.get_active_mesocycle().await?;
        let mesocycle = self
            .create_mesocycle(
                &form.name,
                form.duration_weeks,
                form.resolve_start_date(today),
            )
            .await?;

        let days = match self.generate_and_save_days(&mesocycle, &request).await {
            Ok(days) => days,
            Err(e) => {
                warn!(
                    "Rolling back mesocycle {} after failed day generation: {}",
                    mesocycle.id, e
                );
                if let Err(cleanup) = operations::delete_mesocycle(&self.db_pool, &mesocycle.id).await
                {
                    warn!("Failed to remove mesocycle {}: {}", mesocycle.id, cleanup);
                }
                if let Some(previous) = previous_active {
                    if let Err(restore) = operations::set_active_mesocycle(
                        &self.db_pool,
                        &self.user.user_id,
                        &previous.id,
                    )
                    .await
                    {
                        warn!("Failed to reactivate mesocycle {}: {}", previous.id, restore);
                    }
                }
                return Err(e);
            }
        };

        self.clear_draft().await;
        Ok(CreatedMesocycle { mesocycle, days })
    }

    async fn generate_and_save_days(
        &self,
        mesocycle: &Mesocycle,
        request: &GenerationRequest<'_>,
    ) -> Result<Vec<WorkoutDay>> {
        let catalog = self.catalog().await?;
        let mut selector = self.config.selection.selector();
        let days = generator::generate_workout_days(mesocycle, request, &catalog, selector.as_mut())?;
        operations::save_workout_days(&self.db_pool, &mesocycle.id, &days).await
    }
}

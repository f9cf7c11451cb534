//! Blocking session surface for the mobile shell. Every call runs the async core on
//! the global runtime.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use chrono::{Local, Weekday};
use log::debug;

use crate::auth;
use crate::config::Config;
use crate::db;
use crate::db::models::MesocycleUpdate;
use crate::draft::MesocycleForm;
use crate::error::{ForgeError, Result as ForgeResult};
use crate::generator::parse_weekday;
use crate::runtime::global_runtime;
use crate::session::Session;
use crate::uniffi_interface::errors::ForgeFfiError;
use crate::uniffi_interface::objects::{
    CreatedMesocycleRecord, DraftRecord, ExerciseRecord, FeedbackOutcomeRecord, FeedbackRecord,
    LogOutcomeRecord, MesocycleRecord, NewExerciseRecord, PersonalRecordRecord, UnitPreference,
    UserRecord, WeeklyEstimateRecord, WorkoutDayRecord, WorkoutRecord, parse_date,
};
use crate::workout::{PerformanceTarget, SetInput};

type FfiResult<T> = std::result::Result<T, ForgeFfiError>;

fn block_on<T>(future: impl Future<Output = ForgeResult<T>>) -> FfiResult<T> {
    let rt = global_runtime()?;
    Ok(rt.block_on(future)?)
}

fn run<T>(future: impl Future<Output = T>) -> FfiResult<T> {
    let rt = global_runtime()?;
    Ok(rt.block_on(future))
}

fn parse_day(raw: &str) -> FfiResult<Weekday> {
    parse_weekday(raw).ok_or_else(|| ForgeFfiError::invalid(format!("{} is not a weekday", raw)))
}

fn parse_form(form_json: &str) -> FfiResult<MesocycleForm> {
    serde_json::from_str(form_json).map_err(ForgeFfiError::invalid)
}

/// Creates an account in the database at `db_path`.
#[uniffi::export]
pub fn signup(
    db_path: String,
    email: String,
    password: String,
    display_name: String,
) -> FfiResult<UserRecord> {
    debug!("Signing up {}", email);
    block_on(async {
        let pool = db::open_pool(&db_path).await?;
        let user = auth::signup(&pool, &email, &password, &display_name).await?;
        Ok::<_, ForgeError>(user)
    })
    .map(Into::into)
}

#[derive(uniffi::Object)]
pub struct ForgeSession {
    inner: Session,
}

#[uniffi::export]
impl ForgeSession {
    #[uniffi::constructor]
    pub fn login(db_path: String, email: String, password: String) -> FfiResult<Arc<Self>> {
        let mut config = Config::from_env();
        config.db_path = db_path;
        let inner = block_on(Session::login(config, &email, &password))?;
        Ok(Arc::new(Self { inner }))
    }

    pub fn user_id(&self) -> String {
        self.inner.user().user_id.clone()
    }

    pub fn is_admin(&self) -> bool {
        self.inner.user().is_admin()
    }

    pub fn current_user(&self) -> FfiResult<UserRecord> {
        block_on(self.inner.current_user()).map(Into::into)
    }

    pub fn update_unit_preference(&self, unit: UnitPreference) -> FfiResult<()> {
        block_on(self.inner.update_unit_preference(unit.into()))
    }

    pub fn list_users(&self) -> FfiResult<Vec<UserRecord>> {
        block_on(self.inner.list_users()).map(|users| users.into_iter().map(Into::into).collect())
    }

    pub fn reset_password(&self, user_id: String, new_password: String) -> FfiResult<()> {
        block_on(self.inner.reset_password(&user_id, &new_password))
    }

    // Catalog
    pub fn list_exercises(&self) -> FfiResult<Vec<ExerciseRecord>> {
        block_on(self.inner.list_exercises()).map(|list| list.into_iter().map(Into::into).collect())
    }

    pub fn get_exercise_by_id(&self, exercise_id: String) -> FfiResult<Option<ExerciseRecord>> {
        block_on(self.inner.get_exercise_by_id(&exercise_id)).map(|e| e.map(Into::into))
    }

    pub fn get_muscle_groups(&self) -> FfiResult<Vec<String>> {
        block_on(self.inner.get_muscle_groups()).map(|groups| groups.into_iter().collect())
    }

    pub fn get_exercises_by_muscle_group(&self, muscle_group: String) -> FfiResult<Vec<ExerciseRecord>> {
        block_on(self.inner.get_exercises_by_muscle_group(&muscle_group))
            .map(|list| list.into_iter().map(Into::into).collect())
    }

    pub fn create_custom_exercise(&self, fields: NewExerciseRecord) -> FfiResult<ExerciseRecord> {
        block_on(self.inner.create_custom_exercise(fields.into())).map(Into::into)
    }

    pub fn update_custom_exercise(
        &self,
        exercise_id: String,
        fields: NewExerciseRecord,
    ) -> FfiResult<ExerciseRecord> {
        block_on(self.inner.update_custom_exercise(&exercise_id, fields.into())).map(Into::into)
    }

    pub fn delete_custom_exercise(&self, exercise_id: String) -> FfiResult<()> {
        block_on(self.inner.delete_custom_exercise(&exercise_id))
    }

    // Mesocycles
    pub fn list_mesocycles(&self) -> FfiResult<Vec<MesocycleRecord>> {
        block_on(self.inner.list_mesocycles()).map(|list| list.into_iter().map(Into::into).collect())
    }

    pub fn get_active_mesocycle(&self) -> FfiResult<Option<MesocycleRecord>> {
        block_on(self.inner.get_active_mesocycle()).map(|m| m.map(Into::into))
    }

    pub fn create_mesocycle(
        &self,
        name: String,
        duration_weeks: i64,
        start_date: String,
    ) -> FfiResult<MesocycleRecord> {
        let start_date = parse_date(&start_date)?;
        block_on(self.inner.create_mesocycle(&name, duration_weeks, start_date)).map(Into::into)
    }

    pub fn update_mesocycle(
        &self,
        meso_id: String,
        name: Option<String>,
        duration_weeks: Option<i64>,
        start_date: Option<String>,
    ) -> FfiResult<MesocycleRecord> {
        let update = MesocycleUpdate {
            name,
            duration_weeks,
            start_date: start_date.as_deref().map(parse_date).transpose()?,
        };
        block_on(self.inner.update_mesocycle(&meso_id, update)).map(Into::into)
    }

    pub fn set_active_mesocycle(&self, meso_id: String) -> FfiResult<()> {
        block_on(self.inner.set_active_mesocycle(&meso_id))
    }

    pub fn delete_mesocycle(&self, meso_id: String) -> FfiResult<()> {
        block_on(self.inner.delete_mesocycle(&meso_id))
    }

    pub fn suggest_mesocycle_name(&self, desired: String) -> FfiResult<String> {
        block_on(self.inner.suggest_mesocycle_name(&desired))
    }

    /// Submits a mesocycle form given as JSON, the same shape the draft stores.
    pub fn create_mesocycle_from_form(&self, form_json: String) -> FfiResult<CreatedMesocycleRecord> {
        let form = parse_form(&form_json)?;
        let today = Local::now().date_naive();
        block_on(self.inner.create_mesocycle_from_form(&form, today)).map(Into::into)
    }

    // Drafts
    pub fn get_draft(&self) -> FfiResult<Option<DraftRecord>> {
        let Some(draft) = run(self.inner.get_draft())? else {
            return Ok(None);
        };
        let form_json =
            serde_json::to_string(&draft.form).map_err(|e| ForgeFfiError::Backend(e.to_string()))?;
        Ok(Some(DraftRecord {
            form_json,
            updated_at: draft.updated_at.to_rfc3339(),
        }))
    }

    pub fn set_draft(&self, form_json: String) -> FfiResult<()> {
        let form = parse_form(&form_json)?;
        run(self.inner.set_draft(&form))
    }

    pub fn clear_draft(&self) -> FfiResult<()> {
        run(self.inner.clear_draft())
    }

    /// A fresh form for the creation screen, with the catalog's muscle groups.
    pub fn new_form_json(&self, start_day: String) -> FfiResult<String> {
        let start_day = parse_day(&start_day)?;
        let groups = block_on(self.inner.get_muscle_groups())?;
        let mut form = MesocycleForm::new(groups.into_iter().collect());
        form.planner.set_start_day(start_day);
        serde_json::to_string(&form).map_err(|e| ForgeFfiError::Backend(e.to_string()))
    }

    // Workout days
    pub fn get_workout_days(&self, meso_id: String) -> FfiResult<Vec<WorkoutDayRecord>> {
        block_on(self.inner.get_workout_days(&meso_id))
            .map(|days| days.into_iter().map(Into::into).collect())
    }

    pub fn get_workout_day(&self, day_id: String) -> FfiResult<Option<WorkoutDayRecord>> {
        block_on(self.inner.get_workout_day(&day_id)).map(|d| d.map(Into::into))
    }

    pub fn get_workout_for_today(&self, meso_id: String) -> FfiResult<Option<WorkoutDayRecord>> {
        let today = Local::now().date_naive();
        block_on(self.inner.get_workout_for_today(&meso_id, today)).map(|d| d.map(Into::into))
    }

    // Workout flow
    pub fn start_workout(&self, day_id: String) -> FfiResult<WorkoutRecord> {
        let today = Local::now().date_naive();
        block_on(self.inner.start_workout(&day_id, today)).map(Into::into)
    }

    pub fn current_workout(&self) -> FfiResult<Option<WorkoutRecord>> {
        run(self.inner.get_workout_tracker()).map(|t| t.map(Into::into))
    }

    pub fn update_set(
        &self,
        exercise_id: String,
        index: u32,
        weight: f64,
        reps: i64,
        rir: i64,
    ) -> FfiResult<()> {
        let input = SetInput { weight, reps, rir };
        block_on(self.inner.update_set(&exercise_id, index as usize, input))
    }

    pub fn add_set(&self, exercise_id: String) -> FfiResult<u32> {
        block_on(self.inner.add_set(&exercise_id)).map(|i| i as u32)
    }

    pub fn log_set(&self, exercise_id: String, index: u32) -> FfiResult<LogOutcomeRecord> {
        block_on(self.inner.log_set(&exercise_id, index as usize)).map(Into::into)
    }

    pub fn submit_feedback(
        &self,
        muscle_group: String,
        feedback: FeedbackRecord,
    ) -> FfiResult<FeedbackOutcomeRecord> {
        let feedback = feedback.try_into()?;
        block_on(self.inner.submit_feedback(&muscle_group, feedback)).map(Into::into)
    }

    pub fn complete_workout(&self) -> FfiResult<()> {
        block_on(self.inner.complete_workout())
    }

    pub fn recommend_weight(
        &self,
        exercise_id: String,
        target_reps: i64,
        target_rir: i64,
    ) -> FfiResult<Option<f64>> {
        let target = PerformanceTarget {
            reps: target_reps,
            rir: target_rir,
        };
        block_on(self.inner.recommend_weight(&exercise_id, target))
    }

    // Progress
    pub fn estimate_one_rep_max(&self, exercise_id: String) -> FfiResult<Vec<WeeklyEstimateRecord>> {
        run(self.inner.weekly_one_rep_max(&exercise_id))
            .map(|weeks| weeks.into_iter().map(Into::into).collect())
    }

    pub fn average_sets_by_muscle_group(&self) -> FfiResult<HashMap<String, f64>> {
        run(self.inner.average_sets_by_muscle_group())
            .map(|averages| averages.into_iter().collect())
    }

    pub fn personal_records(&self) -> FfiResult<Vec<PersonalRecordRecord>> {
        run(self.inner.personal_records())
            .map(|records| records.into_iter().map(Into::into).collect())
    }
}

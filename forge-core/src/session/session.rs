use log::debug;
use sqlx::SqlitePool;
use tokio::sync::{Mutex, MutexGuard};

use crate::auth::{self, UserContext};
use crate::config::Config;
use crate::db;
use crate::error::{ForgeError, Result};
use crate::workout::WorkoutTracker;

pub struct Session {
    pub(crate) db_pool: SqlitePool,
    pub(crate) user: UserContext,
    pub(crate) config: Config,
    pub(crate) workout: Mutex<Option<WorkoutTracker>>,
    submission: Mutex<()>,
}

impl Session {
    pub fn new(db_pool: SqlitePool, user: UserContext, config: Config) -> Self {
        Self {
            db_pool,
            user,
            config,
            workout: Mutex::new(None),
            submission: Mutex::new(()),
        }
    }

    /// Opens the configured database and checks the credentials.
    pub async fn login(config: Config, email: &str, password: &str) -> Result<Self> {
        let pool = db::open_pool(&config.db_path).await?;
        let user = auth::login(&pool, email, password).await?;
        debug!("Session opened for user {}", user.user_id);
        Ok(Self::new(pool, user, config))
    }

    pub fn user(&self) -> &UserContext {
        &self.user
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db_pool
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Holds the submission slot for the lifetime of the guard. A second critical
    /// submission while one is running fails with `SubmissionPending`.
    pub(crate) fn begin_submission(&self) -> Result<MutexGuard<'_, ()>> {
        self.submission
            .try_lock()
            .map_err(|_| ForgeError::SubmissionPending)
    }

    pub async fn get_workout_tracker(&self) -> Option<WorkoutTracker> {
        self.workout.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;
    use crate::draft::{MesocycleForm, PlanMode};
    use crate::generator::DayPlan;

    async fn session(dir: &TempDir) -> Session {
        let path = dir.path().join("forge.db");
        let path = path.to_string_lossy().into_owned();
        let pool = db::open_pool(&path).await.unwrap();
        let user = auth::signup(&pool, "busy@example.com", "correct horse", "Busy")
            .await
            .unwrap();
        Session::new(pool, UserContext::from(&user), Config::with_db_path(path))
    }

    fn form() -> MesocycleForm {
        let mut form = MesocycleForm::default();
        form.name = "Block".to_string();
        form.mode = PlanMode::Custom;
        form.planner.days = vec![DayPlan {
            day_name: "Monday".to_string(),
            enabled: true,
            muscle_groups: Vec::new(),
            exercise_ids: vec!["barbell-bench-press".to_string()],
        }];
        form
    }

    #[tokio::test]
    async fn second_submission_is_refused_while_one_runs() {
        let dir = TempDir::new().unwrap();
        let session = session(&dir).await;
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

        let guard = session.begin_submission().unwrap();
        let err = session
            .create_mesocycle_from_form(&form(), today)
            .await
            .unwrap_err();
        assert!(matches!(err, ForgeError::SubmissionPending));
        let err = session.log_set("barbell-bench-press", 0).await.unwrap_err();
        assert!(matches!(err, ForgeError::SubmissionPending));
        assert!(session.list_mesocycles().await.unwrap().is_empty());
        drop(guard);

        let created = session.create_mesocycle_from_form(&form(), today).await.unwrap();
        assert_eq!(created.days.len(), 1);
    }
}

//! The mesocycle creation form and its autosaved draft.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc, Weekday};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};
use crate::generator::{DayPlan, DayPlanner, offset_from};
use crate::session::{CreatedMesocycle, Session};

pub const DEFAULT_DURATION_WEEKS: i64 = 4;
pub const DEFAULT_TEMPLATE: &str = "3-Day Full Body";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanMode {
    Preset { template: String },
    Custom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MesocycleForm {
    pub name: String,
    pub duration_weeks: i64,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub mode: PlanMode,
    pub planner: DayPlanner,
}

impl MesocycleForm {
    pub fn new(muscle_groups: Vec<String>) -> Self {
        Self {
            name: String::new(),
            duration_weeks: DEFAULT_DURATION_WEEKS,
            start_date: None,
            mode: PlanMode::Preset {
                template: DEFAULT_TEMPLATE.to_string(),
            },
            planner: DayPlanner::with_default_days(muscle_groups),
        }
    }

    pub fn start_day(&self) -> Weekday {
        self.planner.start_day
    }

    /// The explicit start date, else the first `start_day` on or after `today`.
    pub fn resolve_start_date(&self, today: NaiveDate) -> NaiveDate {
        self.start_date
            .unwrap_or_else(|| first_training_date(today, self.start_day()))
    }
}

impl Default for MesocycleForm {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

pub fn first_training_date(today: NaiveDate, start_day: Weekday) -> NaiveDate {
    today + Duration::days(offset_from(today.weekday(), start_day) as i64)
}

/// A stored form with the time it was last written.
#[derive(Debug, Clone, PartialEq)]
pub struct MesoDraft {
    pub form: MesocycleForm,
    pub updated_at: DateTime<Utc>,
}

/// Edits a form on behalf of a session, persisting the draft after every change.
///
/// The stored draft is loaded at most once, and always before the first edit, so a
/// slow draft read can never overwrite an exercise selection handed back by another
/// screen.
pub struct MesocycleFormEditor<'s> {
    session: &'s Session,
    form: MesocycleForm,
    draft_loaded: bool,
}

impl<'s> MesocycleFormEditor<'s> {
    pub fn new(session: &'s Session, form: MesocycleForm) -> Self {
        Self {
            session,
            form,
            draft_loaded: false,
        }
    }

    pub fn form(&self) -> &MesocycleForm {
        &self.form
    }

    /// Replaces the form with the stored draft, once. Returns true if a draft was restored.
    pub async fn ensure_draft_loaded(&mut self) -> bool {
        if self.draft_loaded {
            return false;
        }
        self.draft_loaded = true;
        match self.session.get_draft().await {
            Some(draft) => {
                debug!("Restored mesocycle draft saved at {}", draft.updated_at);
                self.form = draft.form;
                true
            }
            None => false,
        }
    }

    async fn edit<R>(&mut self, change: impl FnOnce(&mut MesocycleForm) -> Result<R>) -> Result<R> {
        self.ensure_draft_loaded().await;
        let result = change(&mut self.form)?;
        self.session.set_draft(&self.form).await;
        Ok(result)
    }

    pub async fn set_name(&mut self, name: &str) -> Result<()> {
        self.edit(|form| {
            form.name = name.to_string();
            Ok(())
        })
        .await
    }

    pub async fn set_duration_weeks(&mut self, weeks: i64) -> Result<()> {
        self.edit(|form| {
            if weeks < 1 {
                return Err(ForgeError::Validation(
                    "Duration must be at least one week".to_string(),
                ));
            }
            form.duration_weeks = weeks;
            Ok(())
        })
        .await
    }

    pub async fn set_start_date(&mut self, start_date: Option<NaiveDate>) -> Result<()> {
        self.edit(|form| {
            form.start_date = start_date;
            Ok(())
        })
        .await
    }

    pub async fn set_start_day(&mut self, start_day: Weekday) -> Result<()> {
        self.edit(|form| {
            form.planner.set_start_day(start_day);
            Ok(())
        })
        .await
    }

    pub async fn select_preset(&mut self, template: &str) -> Result<()> {
        self.edit(|form| {
            form.mode = PlanMode::Preset {
                template: template.to_string(),
            };
            Ok(())
        })
        .await
    }

    pub async fn use_custom_days(&mut self) -> Result<()> {
        self.edit(|form| {
            form.mode = PlanMode::Custom;
            Ok(())
        })
        .await
    }

    pub async fn add_day(&mut self) -> Result<DayPlan> {
        self.edit(|form| form.planner.add_day().cloned()).await
    }

    pub async fn remove_day(&mut self, index: usize) -> Result<DayPlan> {
        self.edit(|form| form.planner.remove_day(index)).await
    }

    pub async fn toggle_day(&mut self, index: usize) -> Result<bool> {
        self.edit(|form| form.planner.toggle_day(index)).await
    }

    pub async fn toggle_muscle_group(&mut self, index: usize, muscle_group: &str) -> Result<bool> {
        self.edit(|form| form.planner.toggle_muscle_group(index, muscle_group))
            .await
    }

    /// Applies the exercises picked for `day_name` on the selection screen.
    pub async fn apply_exercise_selection(
        &mut self,
        day_name: &str,
        exercise_ids: Vec<String>,
    ) -> Result<()> {
        self.edit(|form| form.planner.set_exercises(day_name, exercise_ids))
            .await
    }

    pub async fn submit(&mut self, today: NaiveDate) -> Result<CreatedMesocycle> {
        self.ensure_draft_loaded().await;
        self.session.create_mesocycle_from_form(&self.form, today).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_survives_json() {
        let mut form = MesocycleForm::new(vec!["Back".into(), "Chest".into()]);
        form.name = "Push Pull Legs".into();
        form.mode = PlanMode::Custom;
        form.planner.days[0].exercise_ids = vec!["pull-up".into()];

        let json = serde_json::to_string(&form).unwrap();
        assert!(json.contains("\"kind\":\"custom\""));
        let back: MesocycleForm = serde_json::from_str(&json).unwrap();
        assert_eq!(back, form);
    }

    #[test]
    fn start_date_defaults_to_next_start_day() {
        // 2026-10-16 is a Friday.
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let mut form = MesocycleForm::default();
        assert_eq!(
            form.resolve_start_date(today),
            NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
        );
        form.planner.set_start_day(Weekday::Fri);
        assert_eq!(form.resolve_start_date(today), today);

        let explicit = NaiveDate::from_ymd_opt(2026, 11, 2).unwrap();
        form.start_date = Some(explicit);
        assert_eq!(form.resolve_start_date(today), explicit);
    }
}

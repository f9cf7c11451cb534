//! Plain records handed to the mobile shell. Dates travel as `YYYY-MM-DD` strings.

use chrono::NaiveDate;

use crate::db::models;
use crate::progress::{PersonalRecord, WeeklyEstimate};
use crate::session::CreatedMesocycle;
use crate::uniffi_interface::errors::ForgeFfiError;
use crate::workout::{self, FeedbackOutcome, LogOutcome, WorkoutTracker};

const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ForgeFfiError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| ForgeFfiError::invalid(format!("{} is not a date: {}", raw, e)))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

#[derive(Debug, Clone, uniffi::Enum)]
pub enum UnitPreference {
    Kg,
    Lbs,
}

impl From<models::UnitPreference> for UnitPreference {
    fn from(u: models::UnitPreference) -> Self {
        match u {
            models::UnitPreference::Kg => UnitPreference::Kg,
            models::UnitPreference::Lbs => UnitPreference::Lbs,
        }
    }
}

impl From<UnitPreference> for models::UnitPreference {
    fn from(u: UnitPreference) -> Self {
        match u {
            UnitPreference::Kg => models::UnitPreference::Kg,
            UnitPreference::Lbs => models::UnitPreference::Lbs,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub unit_preference: UnitPreference,
    pub is_admin: bool,
}

impl From<models::User> for UserRecord {
    fn from(u: models::User) -> Self {
        UserRecord {
            id: u.id,
            email: u.email,
            display_name: u.display_name,
            unit_preference: u.unit_preference.into(),
            is_admin: u.role == models::Role::Admin,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct ExerciseRecord {
    pub id: String,
    pub name: String,
    pub primary_muscle_group: String,
    pub equipment: String,
    pub instructions: String,
    pub video_url: Option<String>,
    pub target_sets: Option<i64>,
    pub target_muscles: Vec<String>,
    pub is_custom: bool,
}

impl From<models::Exercise> for ExerciseRecord {
    fn from(e: models::Exercise) -> Self {
        let target_muscles = crate::catalog::target_muscles_for(&e);
        ExerciseRecord {
            is_custom: e.is_custom(),
            id: e.id,
            name: e.name,
            primary_muscle_group: e.primary_muscle_group,
            equipment: e.equipment,
            instructions: e.instructions,
            video_url: e.video_url,
            target_sets: e.target_sets,
            target_muscles,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct NewExerciseRecord {
    pub name: String,
    pub primary_muscle_group: String,
    pub equipment: String,
    pub instructions: String,
    pub video_url: Option<String>,
    pub target_sets: Option<i64>,
    pub target_muscles: Option<Vec<String>>,
}

impl From<NewExerciseRecord> for models::NewExercise {
    fn from(r: NewExerciseRecord) -> Self {
        models::NewExercise {
            name: r.name,
            primary_muscle_group: r.primary_muscle_group,
            equipment: r.equipment,
            instructions: r.instructions,
            video_url: r.video_url,
            target_sets: r.target_sets,
            target_muscles: r.target_muscles,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct MesocycleRecord {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub duration_weeks: i64,
    pub is_active: bool,
}

impl From<models::Mesocycle> for MesocycleRecord {
    fn from(m: models::Mesocycle) -> Self {
        MesocycleRecord {
            id: m.id,
            name: m.name,
            start_date: format_date(m.start_date),
            duration_weeks: m.duration_weeks,
            is_active: m.is_active,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct WorkoutDayRecord {
    pub id: String,
    pub meso_id: String,
    pub day_name: String,
    pub day_of_week: u8,
    pub exercise_ids: Vec<String>,
    pub session_id: Option<String>,
}

impl From<models::WorkoutDay> for WorkoutDayRecord {
    fn from(d: models::WorkoutDay) -> Self {
        WorkoutDayRecord {
            id: d.id,
            meso_id: d.meso_id,
            day_name: d.day_name,
            day_of_week: d.day_of_week,
            exercise_ids: d.exercise_ids,
            session_id: d.session_id,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct CreatedMesocycleRecord {
    pub mesocycle: MesocycleRecord,
    pub days: Vec<WorkoutDayRecord>,
}

impl From<CreatedMesocycle> for CreatedMesocycleRecord {
    fn from(c: CreatedMesocycle) -> Self {
        CreatedMesocycleRecord {
            mesocycle: c.mesocycle.into(),
            days: c.days.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct DraftRecord {
    pub form_json: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct SetRecord {
    pub weight: f64,
    pub reps: i64,
    pub rir: i64,
    pub completed: bool,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct ExerciseProgressRecord {
    pub exercise_id: String,
    pub name: String,
    pub muscle_group: String,
    pub sets: Vec<SetRecord>,
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct WorkoutRecord {
    pub session_id: String,
    pub day_id: String,
    pub exercises: Vec<ExerciseProgressRecord>,
    pub pending_feedback: Option<String>,
}

impl From<WorkoutTracker> for WorkoutRecord {
    fn from(t: WorkoutTracker) -> Self {
        let pending_feedback = t.pending_feedback().map(str::to_string);
        WorkoutRecord {
            session_id: t.session_id,
            day_id: t.day_id,
            exercises: t
                .exercises
                .into_iter()
                .map(|e| ExerciseProgressRecord {
                    exercise_id: e.exercise_id,
                    name: e.name,
                    muscle_group: e.muscle_group,
                    sets: e
                        .sets
                        .iter()
                        .map(|s| SetRecord {
                            weight: s.input.weight,
                            reps: s.input.reps,
                            rir: s.input.rir,
                            completed: s.is_completed(),
                        })
                        .collect(),
                })
                .collect(),
            pending_feedback,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct LogOutcomeRecord {
    pub log_id: String,
    pub feedback_request: Option<String>,
    pub workout_complete: bool,
}

impl From<LogOutcome> for LogOutcomeRecord {
    fn from(o: LogOutcome) -> Self {
        LogOutcomeRecord {
            log_id: o.log.id,
            feedback_request: o.feedback_request,
            workout_complete: o.workout_complete,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FeedbackRecord {
    pub joint_pain: i64,
    pub pump: i64,
    pub workload: i64,
}

impl TryFrom<FeedbackRecord> for workout::MuscleGroupFeedback {
    type Error = ForgeFfiError;
    fn try_from(r: FeedbackRecord) -> Result<Self, ForgeFfiError> {
        Ok(workout::MuscleGroupFeedback::from_values(
            r.joint_pain,
            r.pump,
            r.workload,
        )?)
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct FeedbackOutcomeRecord {
    pub muscle_group: String,
    pub workout_complete: bool,
}

impl From<FeedbackOutcome> for FeedbackOutcomeRecord {
    fn from(o: FeedbackOutcome) -> Self {
        FeedbackOutcomeRecord {
            muscle_group: o.muscle_group,
            workout_complete: o.workout_complete,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct WeeklyEstimateRecord {
    pub week_start: String,
    pub one_rep_max: f64,
}

impl From<WeeklyEstimate> for WeeklyEstimateRecord {
    fn from(w: WeeklyEstimate) -> Self {
        WeeklyEstimateRecord {
            week_start: format_date(w.week_start),
            one_rep_max: w.one_rep_max,
        }
    }
}

#[derive(Debug, Clone, uniffi::Record)]
pub struct PersonalRecordRecord {
    pub exercise_id: String,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i64,
    pub achieved_on: String,
}

impl From<PersonalRecord> for PersonalRecordRecord {
    fn from(p: PersonalRecord) -> Self {
        PersonalRecordRecord {
            exercise_id: p.exercise_id,
            exercise_name: p.exercise_name,
            weight: p.weight,
            reps: p.reps,
            achieved_on: format_date(p.achieved_on),
        }
    }
}

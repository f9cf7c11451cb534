use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::error::{ForgeError, Result};

// User models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitPreference {
    Kg,
    Lbs,
}

impl UnitPreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitPreference::Kg => "kg",
            UnitPreference::Lbs => "lbs",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" => Ok(UnitPreference::Kg),
            "lbs" | "lb" => Ok(UnitPreference::Lbs),
            _ => Err(ForgeError::Validation(format!("Unknown unit: {}", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(ForgeError::Validation(format!("Unknown role: {}", s))),
        }
    }
}

#[derive(FromRow, Debug, Clone)]
pub struct UserRow {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub unit_preference: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub unit_preference: UnitPreference,
    pub role: Role,
}

impl TryFrom<UserRow> for User {
    type Error = ForgeError;
    fn try_from(row: UserRow) -> Result<Self> {
        Ok(User {
            id: row.id,
            email: row.email,
            display_name: row.display_name,
            unit_preference: UnitPreference::parse(&row.unit_preference)?,
            role: Role::parse(&row.role)?,
        })
    }
}

// Exercise models
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub primary_muscle_group: String,
    pub equipment: String,
    pub instructions: String,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub target_sets: Option<i64>,
    #[serde(default)]
    pub target_muscles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<String>,
}

impl Exercise {
    pub fn is_custom(&self) -> bool {
        self.owner_user_id.is_some()
    }
}

#[derive(FromRow, Debug, Clone)]
pub struct ExerciseRow {
    pub id: String,
    pub name: String,
    pub primary_muscle_group: String,
    pub equipment: String,
    pub instructions: String,
    pub video_url: Option<String>,
    pub target_sets: Option<i64>,
    pub target_muscles: Option<String>,
    pub owner_user_id: Option<String>,
}

impl TryFrom<ExerciseRow> for Exercise {
    type Error = ForgeError;
    fn try_from(row: ExerciseRow) -> Result<Self> {
        let target_muscles = match row.target_muscles.as_deref() {
            Some(raw) if !raw.trim().is_empty() => Some(serde_json::from_str(raw)?),
            _ => None,
        };
        Ok(Exercise {
            id: row.id,
            name: row.name,
            primary_muscle_group: row.primary_muscle_group,
            equipment: row.equipment,
            instructions: row.instructions,
            video_url: row.video_url,
            target_sets: row.target_sets,
            target_muscles,
            owner_user_id: row.owner_user_id,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewExercise {
    pub name: String,
    pub primary_muscle_group: String,
    pub equipment: String,
    pub instructions: String,
    pub video_url: Option<String>,
    pub target_sets: Option<i64>,
    pub target_muscles: Option<Vec<String>>,
}

impl NewExercise {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ForgeError::Validation(
                "Please enter a name for the exercise".to_string(),
            ));
        }
        if self.primary_muscle_group.trim().is_empty() {
            return Err(ForgeError::Validation(
                "Please choose a primary muscle group".to_string(),
            ));
        }
        if matches!(self.target_sets, Some(n) if n < 1) {
            return Err(ForgeError::Validation(
                "Target sets must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// Mesocycle models
#[derive(FromRow, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mesocycle {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub start_date: NaiveDate,
    pub duration_weeks: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MesocycleUpdate {
    pub name: Option<String>,
    pub duration_weeks: Option<i64>,
    pub start_date: Option<NaiveDate>,
}

// Workout day models
#[derive(FromRow, Debug, Clone)]
pub struct WorkoutDayRow {
    pub id: String,
    pub meso_id: String,
    pub day_name: String,
    pub day_of_week: i64,
    pub exercise_ids: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub id: String,
    pub meso_id: String,
    pub day_name: String,
    pub day_of_week: u8,
    pub exercise_ids: Vec<String>,
    pub session_id: Option<String>,
}

impl TryFrom<WorkoutDayRow> for WorkoutDay {
    type Error = ForgeError;
    fn try_from(row: WorkoutDayRow) -> Result<Self> {
        Ok(WorkoutDay {
            id: row.id,
            meso_id: row.meso_id,
            day_name: row.day_name,
            day_of_week: row.day_of_week as u8,
            exercise_ids: serde_json::from_str(&row.exercise_ids)?,
            session_id: row.session_id,
        })
    }
}

/// A day produced by the generator, not yet bound to a stored id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWorkoutDay {
    pub day_name: String,
    pub day_of_week: u8,
    pub exercise_ids: Vec<String>,
}

// Session and set models
#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct WorkoutSession {
    pub id: String,
    pub user_id: String,
    pub day_id: String,
    pub session_date: NaiveDate,
}

#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct SetLog {
    pub id: String,
    pub user_id: String,
    pub session_id: Option<String>,
    pub exercise_id: String,
    pub weight: f64,
    pub reps: i64,
    pub rir: i64,
    pub completed: bool,
    pub logged_at: DateTime<Utc>,
}

impl fmt::Display for SetLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:.1} x {} reps @{} RIR",
            self.exercise_id, self.weight, self.reps, self.rir
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSetLog {
    pub session_id: Option<String>,
    pub exercise_id: String,
    pub weight: f64,
    pub reps: i64,
    pub rir: i64,
}

#[derive(FromRow, Debug, Clone, PartialEq)]
pub struct FeedbackRecord {
    pub id: String,
    pub session_id: String,
    pub muscle_group: String,
    pub joint_pain: i64,
    pub pump: i64,
    pub workload: i64,
}

// Draft models
#[derive(FromRow, Debug, Clone)]
pub struct MesoDraftRow {
    pub user_id: String,
    pub draft: String,
    pub updated_at: DateTime<Utc>,
}

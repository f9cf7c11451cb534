use chrono::{NaiveDate, Utc};
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::db::models::{
    Exercise, ExerciseRow, FeedbackRecord, MesoDraftRow, Mesocycle, NewExercise, NewSetLog,
    NewWorkoutDay, SetLog, UserRow, WorkoutDay, WorkoutDayRow, WorkoutSession,
};
use crate::error::{ForgeError, Result};

const EXERCISE_COLUMNS: &str = "id, name, primary_muscle_group, equipment, instructions, \
     video_url, target_sets, target_muscles, owner_user_id";
const MESOCYCLE_COLUMNS: &str = "id, user_id, name, start_date, duration_weeks, is_active";
const WORKOUT_DAY_COLUMNS: &str = "id, meso_id, day_name, day_of_week, exercise_ids, session_id";
const SET_LOG_COLUMNS: &str =
    "id, user_id, session_id, exercise_id, weight, reps, rir, completed, logged_at";

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Lowercased, trimmed form used for case-insensitive name comparisons.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn encode_list(list: &Option<Vec<String>>) -> Result<Option<String>> {
    list.as_ref()
        .map(|l| serde_json::to_string(l))
        .transpose()
        .map_err(Into::into)
}

// Users
pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    display_name: &str,
    role: &str,
) -> Result<UserRow> {
    sqlx::query_as::<_, UserRow>(
        "INSERT INTO users (id, email, password_hash, display_name, role)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id, email, password_hash, display_name, unit_preference, role",
    )
    .bind(new_id())
    .bind(email.trim())
    .bind(password_hash)
    .bind(display_name.trim())
    .bind(role)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ForgeError::Validation("An account with this email already exists".to_string())
        } else {
            e.into()
        }
    })
}

pub async fn get_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, display_name, unit_preference, role
         FROM users WHERE lower(email) = lower(?1)",
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

pub async fn get_user(pool: &SqlitePool, user_id: &str) -> Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, display_name, unit_preference, role
         FROM users WHERE id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

pub async fn get_all_users(pool: &SqlitePool) -> Result<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        "SELECT id, email, password_hash, display_name, unit_preference, role
         FROM users ORDER BY created_at, email",
    )
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

pub async fn update_password_hash(
    pool: &SqlitePool,
    user_id: &str,
    password_hash: &str,
) -> Result<u64> {
    let result = sqlx::query("UPDATE users SET password_hash = ?2 WHERE id = ?1")
        .bind(user_id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn update_unit_preference(pool: &SqlitePool, user_id: &str, unit: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE users SET unit_preference = ?2 WHERE id = ?1")
        .bind(user_id)
        .bind(unit)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// Exercises
/// Shared catalog rows plus the custom rows owned by `user_id`, in insertion order.
pub async fn get_all_exercises(pool: &SqlitePool, user_id: Option<&str>) -> Result<Vec<Exercise>> {
    let rows = sqlx::query_as::<_, ExerciseRow>(&format!(
        "SELECT {} FROM exercises
         WHERE owner_user_id IS NULL OR owner_user_id = ?1
         ORDER BY rowid",
        EXERCISE_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Exercise::try_from).collect()
}

pub async fn get_exercise(pool: &SqlitePool, exercise_id: &str) -> Result<Option<Exercise>> {
    let row = sqlx::query_as::<_, ExerciseRow>(&format!(
        "SELECT {} FROM exercises WHERE id = ?1",
        EXERCISE_COLUMNS
    ))
    .bind(exercise_id)
    .fetch_optional(pool)
    .await?;
    row.map(Exercise::try_from).transpose()
}

pub async fn insert_exercise<'e, E>(executor: E, exercise: &Exercise) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO exercises (id, name, primary_muscle_group, equipment, instructions,
                                video_url, target_sets, target_muscles, owner_user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(&exercise.id)
    .bind(exercise.name.trim())
    .bind(exercise.primary_muscle_group.trim())
    .bind(&exercise.equipment)
    .bind(&exercise.instructions)
    .bind(&exercise.video_url)
    .bind(exercise.target_sets)
    .bind(encode_list(&exercise.target_muscles)?)
    .bind(&exercise.owner_user_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn update_exercise(
    pool: &SqlitePool,
    exercise_id: &str,
    fields: &NewExercise,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE exercises
         SET name = ?2, primary_muscle_group = ?3, equipment = ?4, instructions = ?5,
             video_url = ?6, target_sets = ?7, target_muscles = ?8
         WHERE id = ?1",
    )
    .bind(exercise_id)
    .bind(fields.name.trim())
    .bind(fields.primary_muscle_group.trim())
    .bind(&fields.equipment)
    .bind(&fields.instructions)
    .bind(&fields.video_url)
    .bind(fields.target_sets)
    .bind(encode_list(&fields.target_muscles)?)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_exercise(pool: &SqlitePool, exercise_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM exercises WHERE id = ?1")
        .bind(exercise_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// Mesocycles
pub async fn get_mesocycles_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Mesocycle>> {
    sqlx::query_as::<_, Mesocycle>(&format!(
        "SELECT {} FROM mesocycles WHERE user_id = ?1 ORDER BY created_at, rowid",
        MESOCYCLE_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

pub async fn get_mesocycle(pool: &SqlitePool, meso_id: &str) -> Result<Option<Mesocycle>> {
    sqlx::query_as::<_, Mesocycle>(&format!(
        "SELECT {} FROM mesocycles WHERE id = ?1",
        MESOCYCLE_COLUMNS
    ))
    .bind(meso_id)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

pub async fn get_active_mesocycle(pool: &SqlitePool, user_id: &str) -> Result<Option<Mesocycle>> {
    sqlx::query_as::<_, Mesocycle>(&format!(
        "SELECT {} FROM mesocycles WHERE user_id = ?1 AND is_active = 1",
        MESOCYCLE_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

/// Finds a mesocycle of `user_id` whose normalized name equals `key`, ignoring `excluding`.
pub async fn find_mesocycle_by_name_key(
    pool: &SqlitePool,
    user_id: &str,
    key: &str,
    excluding: Option<&str>,
) -> Result<Option<Mesocycle>> {
    sqlx::query_as::<_, Mesocycle>(&format!(
        "SELECT {} FROM mesocycles
         WHERE user_id = ?1 AND name_key = ?2 AND (?3 IS NULL OR id <> ?3)",
        MESOCYCLE_COLUMNS
    ))
    .bind(user_id)
    .bind(key)
    .bind(excluding)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

/// Inserts the mesocycle as the user's only active one. The sibling deactivation
/// and the insert commit together.
pub async fn create_mesocycle(
    pool: &SqlitePool,
    user_id: &str,
    name: &str,
    start_date: NaiveDate,
    duration_weeks: i64,
) -> Result<Mesocycle> {
    let mut tx = pool.begin().await?;

    sqlx::query("UPDATE mesocycles SET is_active = 0 WHERE user_id = ?1 AND is_active = 1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let created = sqlx::query_as::<_, Mesocycle>(&format!(
        "INSERT INTO mesocycles (id, user_id, name, name_key, start_date, duration_weeks, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)
         RETURNING {}",
        MESOCYCLE_COLUMNS
    ))
    .bind(new_id())
    .bind(user_id)
    .bind(name.trim())
    .bind(name_key(name))
    .bind(start_date)
    .bind(duration_weeks)
    .fetch_one(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ForgeError::DuplicateName(name.trim().to_string())
        } else {
            e.into()
        }
    })?;

    tx.commit().await?;
    Ok(created)
}

pub async fn update_mesocycle(
    pool: &SqlitePool,
    meso_id: &str,
    name: Option<&str>,
    duration_weeks: Option<i64>,
    start_date: Option<NaiveDate>,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE mesocycles
         SET name = COALESCE(?2, name),
             name_key = COALESCE(?3, name_key),
             duration_weeks = COALESCE(?4, duration_weeks),
             start_date = COALESCE(?5, start_date)
         WHERE id = ?1",
    )
    .bind(meso_id)
    .bind(name.map(str::trim))
    .bind(name.map(name_key))
    .bind(duration_weeks)
    .bind(start_date)
    .execute(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ForgeError::DuplicateName(name.unwrap_or_default().trim().to_string())
        } else {
            e.into()
        }
    })?;
    Ok(result.rows_affected())
}

/// Flips the active flag of every mesocycle of `user_id` in one statement so that
/// exactly `meso_id` ends up active.
pub async fn set_active_mesocycle(pool: &SqlitePool, user_id: &str, meso_id: &str) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE mesocycles
         SET is_active = CASE WHEN id = ?2 THEN 1 ELSE 0 END
         WHERE user_id = ?1",
    )
    .bind(user_id)
    .bind(meso_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn delete_mesocycle(pool: &SqlitePool, meso_id: &str) -> Result<u64> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM workout_days WHERE meso_id = ?1")
        .bind(meso_id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM mesocycles WHERE id = ?1")
        .bind(meso_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected())
}

// Workout days
pub async fn get_workout_days_for_mesocycle(
    pool: &SqlitePool,
    meso_id: &str,
) -> Result<Vec<WorkoutDay>> {
    let rows = sqlx::query_as::<_, WorkoutDayRow>(&format!(
        "SELECT {} FROM workout_days WHERE meso_id = ?1 ORDER BY rowid",
        WORKOUT_DAY_COLUMNS
    ))
    .bind(meso_id)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(WorkoutDay::try_from).collect()
}

pub async fn get_workout_day(pool: &SqlitePool, day_id: &str) -> Result<Option<WorkoutDay>> {
    let row = sqlx::query_as::<_, WorkoutDayRow>(&format!(
        "SELECT {} FROM workout_days WHERE id = ?1",
        WORKOUT_DAY_COLUMNS
    ))
    .bind(day_id)
    .fetch_optional(pool)
    .await?;
    row.map(WorkoutDay::try_from).transpose()
}

/// Replaces every workout day of the mesocycle with `days`.
pub async fn save_workout_days(
    pool: &SqlitePool,
    meso_id: &str,
    days: &[NewWorkoutDay],
) -> Result<Vec<WorkoutDay>> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM workout_days WHERE meso_id = ?1")
        .bind(meso_id)
        .execute(&mut *tx)
        .await?;

    let mut saved = Vec::with_capacity(days.len());
    for day in days {
        let row = sqlx::query_as::<_, WorkoutDayRow>(&format!(
            "INSERT INTO workout_days (id, meso_id, day_name, day_of_week, exercise_ids)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {}",
            WORKOUT_DAY_COLUMNS
        ))
        .bind(new_id())
        .bind(meso_id)
        .bind(&day.day_name)
        .bind(i64::from(day.day_of_week))
        .bind(serde_json::to_string(&day.exercise_ids)?)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ForgeError::Validation(format!(
                    "{} is scheduled more than once",
                    day.day_name
                ))
            } else {
                e.into()
            }
        })?;
        saved.push(WorkoutDay::try_from(row)?);
    }

    tx.commit().await?;
    Ok(saved)
}

pub async fn delete_workout_days_for_mesocycle(pool: &SqlitePool, meso_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM workout_days WHERE meso_id = ?1")
        .bind(meso_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

pub async fn set_workout_day_session(
    pool: &SqlitePool,
    day_id: &str,
    session_id: Option<&str>,
) -> Result<u64> {
    let result = sqlx::query("UPDATE workout_days SET session_id = ?2 WHERE id = ?1")
        .bind(day_id)
        .bind(session_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

// Workout sessions
/// Creates the session row and points the workout day at it.
pub async fn start_workout_session(
    pool: &SqlitePool,
    user_id: &str,
    day_id: &str,
    session_date: NaiveDate,
) -> Result<WorkoutSession> {
    let mut tx = pool.begin().await?;
    let session = sqlx::query_as::<_, WorkoutSession>(
        "INSERT INTO workout_sessions (id, user_id, day_id, session_date)
         VALUES (?1, ?2, ?3, ?4)
         RETURNING id, user_id, day_id, session_date",
    )
    .bind(new_id())
    .bind(user_id)
    .bind(day_id)
    .bind(session_date)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE workout_days SET session_id = ?2 WHERE id = ?1")
        .bind(day_id)
        .bind(&session.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(session)
}

// Set logs
pub async fn add_set_log(pool: &SqlitePool, user_id: &str, set: &NewSetLog) -> Result<SetLog> {
    sqlx::query_as::<_, SetLog>(&format!(
        "INSERT INTO set_logs (id, user_id, session_id, exercise_id, weight, reps, rir, completed, logged_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)
         RETURNING {}",
        SET_LOG_COLUMNS
    ))
    .bind(new_id())
    .bind(user_id)
    .bind(&set.session_id)
    .bind(&set.exercise_id)
    .bind(set.weight)
    .bind(set.reps)
    .bind(set.rir)
    .bind(Utc::now())
    .fetch_one(pool)
    .await
    .map_err(Into::into)
}

pub async fn get_set_logs_for_exercise(
    pool: &SqlitePool,
    user_id: &str,
    exercise_id: &str,
) -> Result<Vec<SetLog>> {
    sqlx::query_as::<_, SetLog>(&format!(
        "SELECT {} FROM set_logs
         WHERE user_id = ?1 AND exercise_id = ?2 AND completed = 1
         ORDER BY logged_at, rowid",
        SET_LOG_COLUMNS
    ))
    .bind(user_id)
    .bind(exercise_id)
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

pub async fn get_completed_set_logs(pool: &SqlitePool, user_id: &str) -> Result<Vec<SetLog>> {
    sqlx::query_as::<_, SetLog>(&format!(
        "SELECT {} FROM set_logs WHERE user_id = ?1 AND completed = 1 ORDER BY logged_at, rowid",
        SET_LOG_COLUMNS
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

// Feedback
pub async fn upsert_muscle_group_feedback(
    pool: &SqlitePool,
    session_id: &str,
    muscle_group: &str,
    joint_pain: i64,
    pump: i64,
    workload: i64,
) -> Result<FeedbackRecord> {
    sqlx::query_as::<_, FeedbackRecord>(
        "INSERT INTO muscle_group_feedback (id, session_id, muscle_group, joint_pain, pump, workload)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT (session_id, muscle_group) DO UPDATE
         SET joint_pain = excluded.joint_pain, pump = excluded.pump, workload = excluded.workload
         RETURNING id, session_id, muscle_group, joint_pain, pump, workload",
    )
    .bind(new_id())
    .bind(session_id)
    .bind(muscle_group)
    .bind(joint_pain)
    .bind(pump)
    .bind(workload)
    .fetch_one(pool)
    .await
    .map_err(Into::into)
}

pub async fn get_feedback_for_session(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Vec<FeedbackRecord>> {
    sqlx::query_as::<_, FeedbackRecord>(
        "SELECT id, session_id, muscle_group, joint_pain, pump, workload
         FROM muscle_group_feedback WHERE session_id = ?1 ORDER BY rowid",
    )
    .bind(session_id)
    .fetch_all(pool)
    .await
    .map_err(Into::into)
}

// Drafts
pub async fn get_draft(pool: &SqlitePool, user_id: &str) -> Result<Option<MesoDraftRow>> {
    sqlx::query_as::<_, MesoDraftRow>(
        "SELECT user_id, draft, updated_at FROM meso_drafts WHERE user_id = ?1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(Into::into)
}

pub async fn upsert_draft(pool: &SqlitePool, user_id: &str, draft_json: &str) -> Result<()> {
    sqlx::query(
        "INSERT INTO meso_drafts (user_id, draft, updated_at) VALUES (?1, ?2, ?3)
         ON CONFLICT (user_id) DO UPDATE SET draft = excluded.draft, updated_at = excluded.updated_at",
    )
    .bind(user_id)
    .bind(draft_json)
    .bind(Utc::now())
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn delete_draft(pool: &SqlitePool, user_id: &str) -> Result<u64> {
    let result = sqlx::query("DELETE FROM meso_drafts WHERE user_id = ?1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

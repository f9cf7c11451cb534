//! Aggregations over completed set logs.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};
use serde::Serialize;

use crate::db::models::{Exercise, SetLog};

/// The Brzycki formula breaks down at and past this many reps.
const BRZYCKI_REP_LIMIT: i64 = 37;

/// Brzycki one-rep-max estimate, `None` for reps the formula cannot handle.
pub fn brzycki(weight: f64, reps: i64) -> Option<f64> {
    if reps <= 0 || reps >= BRZYCKI_REP_LIMIT || weight <= 0.0 {
        return None;
    }
    Some(weight * 36.0 / (BRZYCKI_REP_LIMIT - reps) as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyEstimate {
    /// Monday of the ISO week.
    pub week_start: NaiveDate,
    pub one_rep_max: f64,
}

/// Best estimated 1RM per ISO week, oldest week first.
pub fn weekly_one_rep_max(logs: &[SetLog]) -> Vec<WeeklyEstimate> {
    let mut best: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for log in logs.iter().filter(|l| l.completed) {
        let Some(estimate) = brzycki(log.weight, log.reps) else {
            continue;
        };
        let week = log.logged_at.date_naive().iso_week();
        best.entry((week.year(), week.week()))
            .and_modify(|v| *v = v.max(estimate))
            .or_insert(estimate);
    }

    best.into_iter()
        .filter_map(|((year, week), one_rep_max)| {
            NaiveDate::from_isoywd_opt(year, week, Weekday::Mon).map(|week_start| WeeklyEstimate {
                week_start,
                one_rep_max,
            })
        })
        .collect()
}

pub fn estimate_one_rep_max(logs: &[SetLog]) -> Vec<f64> {
    weekly_one_rep_max(logs)
        .into_iter()
        .map(|w| w.one_rep_max)
        .collect()
}

/// Whole weeks from `first` to `as_of`, counting the first week.
pub fn elapsed_weeks(first: NaiveDate, as_of: NaiveDate) -> i64 {
    ((as_of - first).num_days().max(0) / 7) + 1
}

/// Completed sets per primary muscle group divided by the weeks since the first log.
pub fn average_sets_by_muscle_group(
    logs: &[SetLog],
    exercises: &[Exercise],
    as_of: DateTime<Utc>,
) -> BTreeMap<String, f64> {
    let groups: HashMap<&str, &str> = exercises
        .iter()
        .map(|e| (e.id.as_str(), e.primary_muscle_group.as_str()))
        .collect();
    let completed: Vec<&SetLog> = logs.iter().filter(|l| l.completed).collect();

    let Some(first) = completed.iter().map(|l| l.logged_at).min() else {
        return BTreeMap::new();
    };
    let weeks = elapsed_weeks(first.date_naive(), as_of.date_naive()) as f64;

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for log in completed {
        if let Some(group) = groups.get(log.exercise_id.as_str()) {
            *counts.entry(group.to_string()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .map(|(group, count)| (group, count as f64 / weeks))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalRecord {
    pub exercise_id: String,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i64,
    pub achieved_on: NaiveDate,
}

/// Heaviest completed set per exercise, more reps breaking ties, earliest date
/// breaking the rest. Sorted by exercise name.
pub fn personal_records(logs: &[SetLog], exercises: &[Exercise]) -> Vec<PersonalRecord> {
    let mut best: HashMap<&str, &SetLog> = HashMap::new();
    for log in logs.iter().filter(|l| l.completed) {
        best.entry(log.exercise_id.as_str())
            .and_modify(|current| {
                let better = log.weight > current.weight
                    || (log.weight == current.weight && log.reps > current.reps);
                if better {
                    *current = log;
                }
            })
            .or_insert(log);
    }

    let mut records: Vec<PersonalRecord> = best
        .into_values()
        .map(|log| PersonalRecord {
            exercise_id: log.exercise_id.clone(),
            exercise_name: exercises
                .iter()
                .find(|e| e.id == log.exercise_id)
                .map(|e| e.name.clone())
                .unwrap_or_else(|| log.exercise_id.clone()),
            weight: log.weight,
            reps: log.reps,
            achieved_on: log.logged_at.date_naive(),
        })
        .collect();
    records.sort_by(|a, b| a.exercise_name.cmp(&b.exercise_name));
    records
}

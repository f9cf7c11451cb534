//! Expansion of preset templates and custom day lists into workout days.

pub mod planner;
pub mod selection;
pub mod templates;

pub use planner::{DayPlan, DayPlanner, MuscleGroupToggle};
pub use selection::{ExerciseSelector, FirstN, Seeded, SelectionPolicy};
pub use templates::{WorkoutTemplate, bundled_templates, find_template};

use std::collections::HashSet;

use chrono::Weekday;
use log::debug;

use crate::catalog::ExerciseLookup;
use crate::db::models::{Mesocycle, NewWorkoutDay};
use crate::error::{ForgeError, Result};

pub enum GenerationRequest<'a> {
    Preset {
        template: &'a WorkoutTemplate,
        start_day: Weekday,
    },
    Custom {
        days: &'a [DayPlan],
    },
}

/// Parses a weekday name such as "Monday" or "mon", ignoring case.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    name.trim().parse::<Weekday>().ok()
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Monday = 1 through Sunday = 7.
pub fn day_of_week(day: Weekday) -> u8 {
    day.number_from_monday() as u8
}

/// The weekday `offset` days after `start`, wrapping around the week.
pub fn weekday_after(start: Weekday, offset: usize) -> Weekday {
    (0..offset % 7).fold(start, |day, _| day.succ())
}

/// Days from `start` forward to `day`, in `0..7`.
pub fn offset_from(start: Weekday, day: Weekday) -> usize {
    (7 + day.num_days_from_monday() as usize - start.num_days_from_monday() as usize) % 7
}

/// Produces the workout days of `mesocycle` for `request`.
///
/// Preset days are placed on consecutive weekdays from the start day. Custom days keep
/// the weekday named by their label and only enabled days are produced.
pub fn generate_workout_days(
    mesocycle: &Mesocycle,
    request: &GenerationRequest<'_>,
    catalog: &dyn ExerciseLookup,
    selector: &mut dyn ExerciseSelector,
) -> Result<Vec<NewWorkoutDay>> {
    let days = match request {
        GenerationRequest::Preset {
            template,
            start_day,
        } => generate_preset(template, *start_day, catalog, selector)?,
        GenerationRequest::Custom { days } => generate_custom(days, catalog)?,
    };
    debug!(
        "Generated {} workout days for mesocycle {}",
        days.len(),
        mesocycle.id
    );
    Ok(days)
}

fn generate_preset(
    template: &WorkoutTemplate,
    start_day: Weekday,
    catalog: &dyn ExerciseLookup,
    selector: &mut dyn ExerciseSelector,
) -> Result<Vec<NewWorkoutDay>> {
    if template.days.len() > 7 {
        return Err(ForgeError::Validation(format!(
            "Template {} has more than seven days",
            template.name
        )));
    }

    let mut days = Vec::with_capacity(template.days.len());
    for (index, template_day) in template.days.iter().enumerate() {
        let mut chosen: Vec<String> = Vec::new();
        for group in &template_day.muscle_groups {
            let candidates: Vec<_> = catalog
                .candidates_for(group)
                .into_iter()
                .filter(|e| !chosen.contains(&e.id))
                .collect();
            if candidates.is_empty() {
                debug!("No exercises available for {} on {}", group, template_day.label);
                continue;
            }
            chosen.extend(
                selector
                    .select(group, &candidates)
                    .into_iter()
                    .map(|e| e.id.clone()),
            );
        }

        days.push(NewWorkoutDay {
            day_name: template_day.label.clone(),
            day_of_week: day_of_week(weekday_after(start_day, index)),
            exercise_ids: chosen,
        });
    }
    Ok(days)
}

fn generate_custom(plans: &[DayPlan], catalog: &dyn ExerciseLookup) -> Result<Vec<NewWorkoutDay>> {
    let mut seen = HashSet::new();
    let mut days = Vec::new();

    for plan in plans.iter().filter(|p| p.enabled) {
        let weekday = parse_weekday(&plan.day_name).ok_or_else(|| {
            ForgeError::Validation(format!("{} is not a day of the week", plan.day_name))
        })?;
        if !seen.insert(weekday) {
            return Err(ForgeError::Validation(format!(
                "{} is scheduled more than once",
                weekday_name(weekday)
            )));
        }

        let mut exercise_ids: Vec<String> = Vec::with_capacity(plan.exercise_ids.len());
        for id in &plan.exercise_ids {
            if catalog.exercise(id).is_none() {
                return Err(ForgeError::Validation(format!(
                    "Unknown exercise {} on {}",
                    id,
                    weekday_name(weekday)
                )));
            }
            if !exercise_ids.contains(id) {
                exercise_ids.push(id.clone());
            }
        }

        days.push(NewWorkoutDay {
            day_name: weekday_name(weekday).to_string(),
            day_of_week: day_of_week(weekday),
            exercise_ids,
        });
    }
    Ok(days)
}

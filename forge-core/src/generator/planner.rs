//! In-memory editing of the custom day list before a mesocycle is submitted.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{offset_from, parse_weekday, weekday_after, weekday_name};
use crate::error::{ForgeError, Result};

const DEFAULT_ENABLED_GROUPS: &[&str] = &["Chest", "Back", "Legs"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleGroupToggle {
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub day_name: String,
    pub enabled: bool,
    #[serde(default)]
    pub muscle_groups: Vec<MuscleGroupToggle>,
    #[serde(default)]
    pub exercise_ids: Vec<String>,
}

impl DayPlan {
    pub fn new(day: Weekday, muscle_groups: &[String], enabled_groups: &[&str]) -> Self {
        DayPlan {
            day_name: weekday_name(day).to_string(),
            enabled: true,
            muscle_groups: muscle_groups
                .iter()
                .map(|name| MuscleGroupToggle {
                    name: name.clone(),
                    enabled: enabled_groups.iter().any(|g| g.eq_ignore_ascii_case(name)),
                })
                .collect(),
            exercise_ids: Vec::new(),
        }
    }

    pub fn weekday(&self) -> Option<Weekday> {
        parse_weekday(&self.day_name)
    }

    pub fn enabled_muscle_groups(&self) -> impl Iterator<Item = &str> {
        self.muscle_groups
            .iter()
            .filter(|g| g.enabled)
            .map(|g| g.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlanner {
    pub start_day: Weekday,
    pub days: Vec<DayPlan>,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
}

impl DayPlanner {
    pub fn new(start_day: Weekday, muscle_groups: Vec<String>) -> Self {
        Self {
            start_day,
            days: Vec::new(),
            muscle_groups,
        }
    }

    /// Monday, Wednesday and Friday with chest, back and legs switched on.
    pub fn with_default_days(muscle_groups: Vec<String>) -> Self {
        let days = [Weekday::Mon, Weekday::Wed, Weekday::Fri]
            .into_iter()
            .map(|day| DayPlan::new(day, &muscle_groups, DEFAULT_ENABLED_GROUPS))
            .collect();
        Self {
            start_day: Weekday::Mon,
            days,
            muscle_groups,
        }
    }

    fn sort_key(&self, plan: &DayPlan) -> usize {
        plan.weekday()
            .map(|day| offset_from(self.start_day, day))
            .unwrap_or(usize::MAX)
    }

    fn sort_days(&mut self) {
        let mut days = std::mem::take(&mut self.days);
        days.sort_by_key(|d| self.sort_key(d));
        self.days = days;
    }

    fn day_mut(&mut self, index: usize) -> Result<&mut DayPlan> {
        let len = self.days.len();
        self.days
            .get_mut(index)
            .ok_or_else(|| ForgeError::Validation(format!("No day at position {} of {}", index, len)))
    }

    /// Adds the first weekday not yet planned, scanning forward from the start day.
    pub fn add_day(&mut self) -> Result<&DayPlan> {
        let used: Vec<Weekday> = self.days.iter().filter_map(DayPlan::weekday).collect();
        let next = (0..7)
            .map(|offset| weekday_after(self.start_day, offset))
            .find(|day| !used.contains(day))
            .ok_or(ForgeError::NoDaysAvailable)?;

        let plan = DayPlan::new(next, &self.muscle_groups, &[]);
        self.days.push(plan);
        self.sort_days();

        let name = weekday_name(next);
        self.days
            .iter()
            .find(|d| d.day_name == name)
            .ok_or(ForgeError::NoDaysAvailable)
    }

    pub fn remove_day(&mut self, index: usize) -> Result<DayPlan> {
        self.day_mut(index)?;
        Ok(self.days.remove(index))
    }

    pub fn toggle_day(&mut self, index: usize) -> Result<bool> {
        let day = self.day_mut(index)?;
        day.enabled = !day.enabled;
        Ok(day.enabled)
    }

    pub fn toggle_muscle_group(&mut self, index: usize, muscle_group: &str) -> Result<bool> {
        let day = self.day_mut(index)?;
        match day
            .muscle_groups
            .iter_mut()
            .find(|g| g.name.eq_ignore_ascii_case(muscle_group))
        {
            Some(toggle) => {
                toggle.enabled = !toggle.enabled;
                Ok(toggle.enabled)
            }
            None => {
                day.muscle_groups.push(MuscleGroupToggle {
                    name: muscle_group.to_string(),
                    enabled: true,
                });
                Ok(true)
            }
        }
    }

    /// Moves the plan to a new start day. Each day keeps its distance from the first
    /// day; days whose label is not a weekday are left alone.
    pub fn set_start_day(&mut self, start_day: Weekday) {
        if let Some(anchor) = self.days.first().and_then(DayPlan::weekday) {
            for day in &mut self.days {
                if let Some(current) = day.weekday() {
                    let moved = weekday_after(start_day, offset_from(anchor, current));
                    day.day_name = weekday_name(moved).to_string();
                }
            }
        }
        self.start_day = start_day;
        self.sort_days();
    }

    /// Replaces the exercise list of the day labelled `day_name`.
    pub fn set_exercises(&mut self, day_name: &str, exercise_ids: Vec<String>) -> Result<()> {
        let day = self
            .days
            .iter_mut()
            .find(|d| d.day_name.eq_ignore_ascii_case(day_name.trim()))
            .ok_or_else(|| ForgeError::not_found("Workout day", day_name))?;
        day.exercise_ids = exercise_ids;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups() -> Vec<String> {
        ["Arms", "Back", "Chest", "Legs", "Shoulders"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn names(planner: &DayPlanner) -> Vec<&str> {
        planner.days.iter().map(|d| d.day_name.as_str()).collect()
    }

    #[test]
    fn default_days_enable_big_three() {
        let planner = DayPlanner::with_default_days(groups());
        assert_eq!(names(&planner), vec!["Monday", "Wednesday", "Friday"]);
        let enabled: Vec<_> = planner.days[0].enabled_muscle_groups().collect();
        assert_eq!(enabled, vec!["Back", "Chest", "Legs"]);
    }

    #[test]
    fn add_day_wraps_past_sunday() {
        let mut planner = DayPlanner::new(Weekday::Sat, groups());
        planner.days.push(DayPlan::new(Weekday::Sat, &groups(), &[]));
        planner.days.push(DayPlan::new(Weekday::Sun, &groups(), &[]));

        let added = planner.add_day().unwrap();
        assert_eq!(added.day_name, "Monday");
        assert_eq!(names(&planner), vec!["Saturday", "Sunday", "Monday"]);
    }

    #[test]
    fn add_day_fills_gaps_in_order() {
        let mut planner = DayPlanner::with_default_days(groups());
        planner.add_day().unwrap();
        assert_eq!(
            names(&planner),
            vec!["Monday", "Tuesday", "Wednesday", "Friday"]
        );
    }

    #[test]
    fn add_day_fails_when_week_is_full() {
        let mut planner = DayPlanner::new(Weekday::Mon, groups());
        for _ in 0..7 {
            planner.add_day().unwrap();
        }
        assert!(matches!(planner.add_day(), Err(ForgeError::NoDaysAvailable)));
        assert_eq!(planner.days.len(), 7);
    }

    #[test]
    fn start_day_change_keeps_offsets() {
        let mut planner = DayPlanner::with_default_days(groups());
        planner.set_start_day(Weekday::Tue);
        assert_eq!(names(&planner), vec!["Tuesday", "Thursday", "Saturday"]);

        planner.set_start_day(Weekday::Sat);
        assert_eq!(names(&planner), vec!["Saturday", "Monday", "Wednesday"]);
    }

    #[test]
    fn toggles_and_removal() {
        let mut planner = DayPlanner::with_default_days(groups());
        assert!(!planner.toggle_day(1).unwrap());
        assert!(planner.toggle_muscle_group(0, "shoulders").unwrap());
        assert!(!planner.toggle_muscle_group(0, "Chest").unwrap());
        assert!(planner.toggle_day(9).is_err());

        let removed = planner.remove_day(2).unwrap();
        assert_eq!(removed.day_name, "Friday");
        assert!(planner.remove_day(2).is_err());
    }

    #[test]
    fn set_exercises_targets_named_day() {
        let mut planner = DayPlanner::with_default_days(groups());
        planner
            .set_exercises("wednesday", vec!["pull-up".into()])
            .unwrap();
        assert_eq!(planner.days[1].exercise_ids, vec!["pull-up"]);
        assert!(matches!(
            planner.set_exercises("Sunday", Vec::new()),
            Err(ForgeError::NotFound { .. })
        ));
    }
}

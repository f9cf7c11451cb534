use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDay {
    pub label: String,
    pub muscle_groups: Vec<String>,
}

/// An ordered list of labelled days, each naming the muscle groups it trains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub name: String,
    pub days: Vec<TemplateDay>,
}

fn day(label: &str, muscle_groups: &[&str]) -> TemplateDay {
    TemplateDay {
        label: label.to_string(),
        muscle_groups: muscle_groups.iter().map(|g| g.to_string()).collect(),
    }
}

pub fn bundled_templates() -> Vec<WorkoutTemplate> {
    vec![
        WorkoutTemplate {
            name: "3-Day Full Body".to_string(),
            days: vec![
                day("Day 1", &["Chest", "Back", "Legs"]),
                day("Day 2", &["Shoulders", "Arms"]),
                day("Day 3", &["Chest", "Back", "Legs"]),
            ],
        },
        WorkoutTemplate {
            name: "4-Day Upper/Lower".to_string(),
            days: vec![
                day("Upper 1", &["Chest", "Shoulders", "Triceps"]),
                day("Lower 1", &["Quads", "Hamstrings", "Calves"]),
                day("Upper 2", &["Back", "Biceps"]),
                day("Lower 2", &["Quads", "Hamstrings", "Glutes"]),
            ],
        },
    ]
}

/// Looks a bundled template up by name, ignoring case.
pub fn find_template(name: &str) -> Option<WorkoutTemplate> {
    let wanted = name.trim().to_lowercase();
    bundled_templates()
        .into_iter()
        .find(|t| t.name.to_lowercase() == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_templates_fit_in_a_week() {
        for template in bundled_templates() {
            assert!(!template.days.is_empty());
            assert!(template.days.len() <= 7, "{} too long", template.name);
        }
    }

    #[test]
    fn find_is_case_insensitive() {
        let template = find_template("4-day upper/lower").unwrap();
        assert_eq!(template.days.len(), 4);
        assert_eq!(template.days[1].label, "Lower 1");
        assert!(find_template("5x5").is_none());
    }
}

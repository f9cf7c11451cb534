//! Colloquial target-muscle inference for exercises that do not store their own list.

use crate::db::models::Exercise;

struct KeywordRule {
    keywords: &'static [&'static str],
    muscles: &'static [&'static str],
}

struct GroupRules {
    groups: &'static [&'static str],
    rules: &'static [KeywordRule],
    default: &'static [&'static str],
}

const fn rule(
    keywords: &'static [&'static str],
    muscles: &'static [&'static str],
) -> KeywordRule {
    KeywordRule { keywords, muscles }
}

// Rules are scanned in order; the first keyword hit wins.
const TARGET_RULES: &[GroupRules] = &[
    GroupRules {
        groups: &["chest"],
        rules: &[
            rule(&["incline"], &["upper chest", "front delts"]),
            rule(&["decline", "dip"], &["lower chest", "triceps"]),
            rule(&["fly", "flye", "pec deck", "crossover"], &["chest"]),
            rule(&["push-up", "push up", "pushup"], &["chest", "triceps", "front delts"]),
        ],
        default: &["chest", "triceps", "front delts"],
    },
    GroupRules {
        groups: &["back"],
        rules: &[
            rule(&["pull-up", "pullup", "chin-up", "chinup", "pulldown"], &["lats", "biceps"]),
            rule(&["row"], &["upper back", "lats", "rear delts"]),
            rule(&["deadlift"], &["lower back", "glutes", "hamstrings"]),
            rule(&["shrug"], &["traps"]),
        ],
        default: &["lats", "upper back"],
    },
    GroupRules {
        groups: &["legs"],
        rules: &[
            rule(&["deadlift", "good morning"], &["hamstrings", "glutes", "lower back"]),
            rule(&["squat", "leg press", "lunge"], &["quads", "glutes"]),
            rule(&["curl"], &["hamstrings"]),
            rule(&["extension"], &["quads"]),
            rule(&["calf"], &["calves"]),
            rule(&["hip thrust", "bridge"], &["glutes", "hamstrings"]),
        ],
        default: &["quads", "hamstrings", "glutes"],
    },
    GroupRules {
        groups: &["shoulders", "delts"],
        rules: &[
            rule(&["lateral", "upright"], &["side delts"]),
            rule(&["front raise", "front"], &["front delts"]),
            rule(&["face pull", "reverse", "rear"], &["rear delts", "upper back"]),
            rule(&["press"], &["front delts", "side delts", "triceps"]),
        ],
        default: &["front delts", "side delts"],
    },
    GroupRules {
        groups: &["arms"],
        rules: &[
            rule(&["hammer"], &["brachialis", "forearms"]),
            rule(&["curl"], &["biceps"]),
            rule(
                &["tricep", "pushdown", "skull", "diamond", "dip", "kickback"],
                &["triceps"],
            ),
        ],
        default: &["biceps", "triceps"],
    },
    GroupRules {
        groups: &["biceps"],
        rules: &[rule(&["hammer"], &["brachialis", "forearms"])],
        default: &["biceps"],
    },
    GroupRules {
        groups: &["triceps"],
        rules: &[],
        default: &["triceps"],
    },
    GroupRules {
        groups: &["quads"],
        rules: &[],
        default: &["quads"],
    },
    GroupRules {
        groups: &["hamstrings"],
        rules: &[rule(&["deadlift"], &["hamstrings", "glutes", "lower back"])],
        default: &["hamstrings"],
    },
    GroupRules {
        groups: &["glutes"],
        rules: &[],
        default: &["glutes"],
    },
    GroupRules {
        groups: &["calves"],
        rules: &[],
        default: &["calves"],
    },
    GroupRules {
        groups: &["core", "abs"],
        rules: &[rule(&["oblique", "twist", "side"], &["obliques"])],
        default: &["abs"],
    },
];

fn to_owned_list(muscles: &[&str]) -> Vec<String> {
    muscles.iter().map(|m| m.to_string()).collect()
}

/// Derives target muscles from a primary group and an exercise name.
///
/// Matching is case-insensitive. The first keyword rule of the group that matches
/// the name wins; otherwise the group's default applies; an unknown group yields
/// the group itself.
pub fn derive_target_muscles(primary_muscle_group: &str, name: &str) -> Vec<String> {
    let group = primary_muscle_group.trim().to_lowercase();
    let name = name.to_lowercase();

    let Some(group_rules) = TARGET_RULES.iter().find(|g| g.groups.contains(&group.as_str()))
    else {
        return vec![primary_muscle_group.trim().to_string()];
    };

    group_rules
        .rules
        .iter()
        .find(|r| r.keywords.iter().any(|k| name.contains(k)))
        .map(|r| to_owned_list(r.muscles))
        .unwrap_or_else(|| to_owned_list(group_rules.default))
}

/// Stored target muscles when present, derived ones otherwise.
pub fn target_muscles_for(exercise: &Exercise) -> Vec<String> {
    match &exercise.target_muscles {
        Some(list) if !list.is_empty() => list.clone(),
        _ => derive_target_muscles(&exercise.primary_muscle_group, &exercise.name),
    }
}

/// Fills in `target_muscles` when the record lacks them.
pub fn with_target_muscles(mut exercise: Exercise) -> Exercise {
    if exercise.target_muscles.as_ref().is_none_or(|l| l.is_empty()) {
        exercise.target_muscles = Some(derive_target_muscles(
            &exercise.primary_muscle_group,
            &exercise.name,
        ));
    }
    exercise
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incline_chest_targets_upper_chest() {
        assert_eq!(
            derive_target_muscles("Chest", "Incline Dumbbell Press"),
            vec!["upper chest", "front delts"]
        );
    }

    #[test]
    fn deadlift_in_legs_targets_posterior_chain() {
        assert_eq!(
            derive_target_muscles("Legs", "Romanian Deadlift"),
            vec!["hamstrings", "glutes", "lower back"]
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        // "incline" comes before "fly" in the chest rules.
        assert_eq!(
            derive_target_muscles("chest", "Incline Cable Fly"),
            vec!["upper chest", "front delts"]
        );
    }

    #[test]
    fn falls_back_to_group_default_then_group() {
        assert_eq!(
            derive_target_muscles("Back", "Mystery Machine"),
            vec!["lats", "upper back"]
        );
        assert_eq!(derive_target_muscles("Neck", "Neck Curl"), vec!["Neck"]);
    }

    #[test]
    fn derivation_is_deterministic() {
        let first = derive_target_muscles("Shoulders", "Face Pull");
        let second = derive_target_muscles("Shoulders", "Face Pull");
        assert_eq!(first, second);
        assert_eq!(first, vec!["rear delts", "upper back"]);
    }

    #[test]
    fn stored_list_takes_precedence() {
        let exercise = Exercise {
            id: "x".into(),
            name: "Incline Dumbbell Press".into(),
            primary_muscle_group: "Chest".into(),
            equipment: "Dumbbell".into(),
            instructions: String::new(),
            video_url: None,
            target_sets: None,
            target_muscles: Some(vec!["clavicular pec".into()]),
            owner_user_id: None,
        };
        assert_eq!(target_muscles_for(&exercise), vec!["clavicular pec"]);
        assert_eq!(
            with_target_muscles(exercise).target_muscles,
            Some(vec!["clavicular pec".to_string()])
        );
    }
}

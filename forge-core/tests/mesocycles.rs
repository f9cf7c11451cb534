mod common;

use chrono::Weekday;

use common::{Fixture, date};
use forge::draft::{MesocycleForm, MesocycleFormEditor, PlanMode};
use forge::error::ForgeError;
use forge::generator::DayPlan;

fn custom_day(day: &str, exercise_ids: &[&str]) -> DayPlan {
    DayPlan {
        day_name: day.to_string(),
        enabled: true,
        muscle_groups: Vec::new(),
        exercise_ids: exercise_ids.iter().map(|id| id.to_string()).collect(),
    }
}

fn push_pull_legs() -> MesocycleForm {
    let mut form = MesocycleForm::default();
    form.name = "Push Pull Legs".to_string();
    form.mode = PlanMode::Custom;
    form.start_date = Some(date(2026, 10, 19));
    form.planner.days = vec![
        custom_day("Monday", &["barbell-bench-press", "overhead-press"]),
        custom_day("Wednesday", &["barbell-row", "pull-up"]),
        custom_day("Friday", &["barbell-squat", "romanian-deadlift"]),
    ];
    form
}

#[tokio::test]
async fn custom_form_creates_scheduled_days() {
    let fixture = Fixture::new();
    let session = fixture.session("ppl@example.com").await;

    let created = session
        .create_mesocycle_from_form(&push_pull_legs(), date(2026, 10, 16))
        .await
        .unwrap();
    assert!(created.mesocycle.is_active);
    assert_eq!(created.mesocycle.start_date, date(2026, 10, 19));

    let mut days = session
        .get_workout_days(&created.mesocycle.id)
        .await
        .unwrap();
    days.sort_by_key(|d| d.day_of_week);
    let weekdays: Vec<u8> = days.iter().map(|d| d.day_of_week).collect();
    assert_eq!(weekdays, vec![1, 3, 5]);
    assert!(days.iter().all(|d| d.exercise_ids.len() == 2));
    assert_eq!(days[1].day_name, "Wednesday");
    assert_eq!(days[1].exercise_ids, vec!["barbell-row", "pull-up"]);

    let monday = session
        .get_workout_for_today(&created.mesocycle.id, date(2026, 10, 19))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(monday.day_of_week, 1);
    let tuesday = session
        .get_workout_for_today(&created.mesocycle.id, date(2026, 10, 20))
        .await
        .unwrap();
    assert!(tuesday.is_none());
}

#[tokio::test]
async fn preset_form_fills_consecutive_days() {
    let fixture = Fixture::new();
    let session = fixture.session("preset@example.com").await;

    let mut form = MesocycleForm::default();
    form.name = "Full Body".to_string();
    form.planner.set_start_day(Weekday::Fri);

    // 2026-10-16 is a Friday, so the block starts today.
    let created = session
        .create_mesocycle_from_form(&form, date(2026, 10, 16))
        .await
        .unwrap();
    assert_eq!(created.mesocycle.start_date, date(2026, 10, 16));

    let mut days = created.days;
    days.sort_by_key(|d| d.day_of_week);
    let summary: Vec<(u8, &str, usize)> = days
        .iter()
        .map(|d| (d.day_of_week, d.day_name.as_str(), d.exercise_ids.len()))
        .collect();
    assert_eq!(
        summary,
        vec![(5, "Day 1", 6), (6, "Day 2", 4), (7, "Day 3", 6)]
    );
}

#[tokio::test]
async fn unknown_preset_is_rejected_before_anything_is_stored() {
    let fixture = Fixture::new();
    let session = fixture.session("nopreset@example.com").await;

    let mut form = push_pull_legs();
    form.mode = PlanMode::Preset {
        template: "6-Day Bro Split".to_string(),
    };
    let err = session
        .create_mesocycle_from_form(&form, date(2026, 10, 16))
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));
    assert!(session.list_mesocycles().await.unwrap().is_empty());
}

#[tokio::test]
async fn names_are_unique_per_user_ignoring_case() {
    let fixture = Fixture::new();
    let session = fixture.session("names@example.com").await;
    let other = fixture.session("other@example.com").await;

    session
        .create_mesocycle("Hypertrophy Block", 6, date(2026, 10, 19))
        .await
        .unwrap();

    let err = session
        .create_mesocycle("  hypertrophy block ", 4, date(2026, 11, 2))
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::DuplicateName(ref name) if name == "Hypertrophy Block"));
    assert_eq!(
        session
            .suggest_mesocycle_name("hypertrophy block")
            .await
            .unwrap(),
        "Hypertrophy Block (2)"
    );

    // Another user may reuse the name.
    other
        .create_mesocycle("Hypertrophy Block", 4, date(2026, 10, 19))
        .await
        .unwrap();

    let err = session
        .create_mesocycle("   ", 4, date(2026, 10, 19))
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));
    let err = session
        .create_mesocycle("Zero", 0, date(2026, 10, 19))
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));
}

#[tokio::test]
async fn only_the_newest_mesocycle_is_active() {
    let fixture = Fixture::new();
    let session = fixture.session("active@example.com").await;

    let first = session
        .create_mesocycle("Block A", 4, date(2026, 10, 19))
        .await
        .unwrap();
    let second = session
        .create_mesocycle("Block B", 4, date(2026, 11, 16))
        .await
        .unwrap();

    let active = session.get_active_mesocycle().await.unwrap().unwrap();
    assert_eq!(active.id, second.id);

    session.set_active_mesocycle(&first.id).await.unwrap();
    let all = session.list_mesocycles().await.unwrap();
    assert_eq!(all.iter().filter(|m| m.is_active).count(), 1);
    assert_eq!(
        session.get_active_mesocycle().await.unwrap().unwrap().id,
        first.id
    );

    session.delete_mesocycle(&first.id).await.unwrap();
    assert!(session.get_mesocycle(&first.id).await.unwrap().is_none());
    assert!(session.get_active_mesocycle().await.unwrap().is_none());
}

#[tokio::test]
async fn failed_generation_rolls_back() {
    let fixture = Fixture::new();
    let session = fixture.session("rollback@example.com").await;

    let previous = session
        .create_mesocycle("Old Block", 4, date(2026, 9, 7))
        .await
        .unwrap();

    let mut form = push_pull_legs();
    form.planner.days[0].exercise_ids = vec!["no-such-exercise".to_string()];
    let err = session
        .create_mesocycle_from_form(&form, date(2026, 10, 16))
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));

    let all = session.list_mesocycles().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(
        session.get_active_mesocycle().await.unwrap().unwrap().id,
        previous.id
    );

    // The same name is free again once the form is fixed.
    let created = session
        .create_mesocycle_from_form(&push_pull_legs(), date(2026, 10, 16))
        .await
        .unwrap();
    assert_eq!(created.days.len(), 3);
}

#[tokio::test]
async fn draft_round_trips_and_clears_on_submit() {
    let fixture = Fixture::new();
    let session = fixture.session("draft@example.com").await;
    assert!(session.get_draft().await.is_none());

    let form = push_pull_legs();
    session.set_draft(&form).await;
    let draft = session.get_draft().await.unwrap();
    assert_eq!(draft.form, form);

    session
        .create_mesocycle_from_form(&form, date(2026, 10, 16))
        .await
        .unwrap();
    assert!(session.get_draft().await.is_none());
}

#[tokio::test]
async fn editor_restores_draft_before_applying_a_selection() {
    let fixture = Fixture::new();
    let session = fixture.session("editor@example.com").await;

    let mut saved = MesocycleForm::default();
    saved.name = "Saved Block".to_string();
    session.set_draft(&saved).await;

    let mut editor = MesocycleFormEditor::new(&session, MesocycleForm::default());
    editor
        .apply_exercise_selection("monday", vec!["pull-up".to_string()])
        .await
        .unwrap();
    assert_eq!(editor.form().name, "Saved Block");
    assert_eq!(editor.form().planner.days[0].exercise_ids, vec!["pull-up"]);

    // The draft is only ever read once.
    assert!(!editor.ensure_draft_loaded().await);

    let stored = session.get_draft().await.unwrap().form;
    assert_eq!(stored.name, "Saved Block");
    assert_eq!(stored.planner.days[0].exercise_ids, vec!["pull-up"]);

    editor.set_name("Custom Block").await.unwrap();
    editor.use_custom_days().await.unwrap();
    let err = editor.set_duration_weeks(0).await.unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));

    let created = editor.submit(date(2026, 10, 16)).await.unwrap();
    assert_eq!(created.mesocycle.name, "Custom Block");
    assert_eq!(created.mesocycle.duration_weeks, 4);
    // Only Monday had exercises picked; Wednesday and Friday are empty days.
    let monday = created.days.iter().find(|d| d.day_of_week == 1).unwrap();
    assert_eq!(monday.exercise_ids, vec!["pull-up"]);
    assert!(session.get_draft().await.is_none());
}

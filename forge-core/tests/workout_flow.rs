mod common;

use common::{Fixture, date};
use forge::draft::{MesocycleForm, PlanMode};
use forge::error::ForgeError;
use forge::generator::DayPlan;
use forge::session::Session;
use forge::workout::{JointPain, MuscleGroupFeedback, PerformanceTarget, Pump, SetInput, Workload};

const BENCH: &str = "barbell-bench-press";
const FLY: &str = "cable-fly";
const ROW: &str = "barbell-row";

async fn monday_day(session: &Session) -> String {
    let mut form = MesocycleForm::default();
    form.name = "Upper".to_string();
    form.mode = PlanMode::Custom;
    form.planner.days = vec![DayPlan {
        day_name: "Monday".to_string(),
        enabled: true,
        muscle_groups: Vec::new(),
        exercise_ids: vec![BENCH.to_string(), FLY.to_string(), ROW.to_string()],
    }];
    let created = session
        .create_mesocycle_from_form(&form, date(2026, 10, 16))
        .await
        .unwrap();
    created.days[0].id.clone()
}

async fn monday_and_wednesday(session: &Session) -> (String, String) {
    let mut form = MesocycleForm::default();
    form.name = "Split".to_string();
    form.mode = PlanMode::Custom;
    form.planner.days = ["Monday", "Wednesday"]
        .iter()
        .map(|day| DayPlan {
            day_name: day.to_string(),
            enabled: true,
            muscle_groups: Vec::new(),
            exercise_ids: vec![BENCH.to_string()],
        })
        .collect();
    let created = session
        .create_mesocycle_from_form(&form, date(2026, 10, 16))
        .await
        .unwrap();
    let day = |dow: u8| {
        created
            .days
            .iter()
            .find(|d| d.day_of_week == dow)
            .map(|d| d.id.clone())
            .unwrap()
    };
    (day(1), day(3))
}

async fn day_session(session: &Session, day_id: &str) -> Option<String> {
    session
        .get_workout_day(day_id)
        .await
        .unwrap()
        .unwrap()
        .session_id
}

async fn log_all(session: &Session, exercise_id: &str, weight: f64) -> Option<String> {
    let mut last = None;
    for index in 0..3 {
        session
            .update_set(
                exercise_id,
                index,
                SetInput {
                    weight,
                    reps: 8,
                    rir: 2,
                },
            )
            .await
            .unwrap();
        last = session.log_set(exercise_id, index).await.unwrap().feedback_request;
    }
    last
}

fn feedback() -> MuscleGroupFeedback {
    MuscleGroupFeedback {
        joint_pain: JointPain::None,
        pump: Pump::Amazing,
        workload: Workload::PushedLimits,
    }
}

#[tokio::test]
async fn feedback_gates_logging_until_the_workout_completes() {
    let fixture = Fixture::new();
    let session = fixture.session("lifter@example.com").await;
    let day_id = monday_day(&session).await;

    let tracker = session
        .start_workout(&day_id, date(2026, 10, 19))
        .await
        .unwrap();
    assert_eq!(tracker.exercises.len(), 3);
    assert!(tracker.exercises.iter().all(|e| e.sets.len() == 3));

    // Untouched sets carry no weight.
    let err = session.log_set(BENCH, 0).await.unwrap_err();
    assert!(matches!(err, ForgeError::InvalidInput(_)));

    assert_eq!(log_all(&session, BENCH, 100.0).await, None);
    let err = session
        .update_set(BENCH, 0, SetInput::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));

    assert_eq!(log_all(&session, FLY, 20.0).await.as_deref(), Some("Chest"));

    session
        .update_set(
            ROW,
            0,
            SetInput {
                weight: 80.0,
                reps: 10,
                rir: 1,
            },
        )
        .await
        .unwrap();
    let err = session.log_set(ROW, 0).await.unwrap_err();
    assert!(matches!(err, ForgeError::FeedbackPending(ref g) if g == "Chest"));
    let err = session.submit_feedback("Back", feedback()).await.unwrap_err();
    assert!(matches!(err, ForgeError::FeedbackPending(_)));

    let outcome = session.submit_feedback("Chest", feedback()).await.unwrap();
    assert!(!outcome.workout_complete);

    assert_eq!(log_all(&session, ROW, 80.0).await.as_deref(), Some("Back"));
    let outcome = session.submit_feedback("Back", feedback()).await.unwrap();
    assert!(outcome.workout_complete);
    assert!(session.get_workout_tracker().await.is_none());

    let err = session.log_set(ROW, 0).await.unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));

    let records = session.personal_records().await;
    let bench = records.iter().find(|r| r.exercise_id == BENCH).unwrap();
    assert_eq!(bench.weight, 100.0);
    assert_eq!(bench.reps, 8);

    let averages = session.average_sets_by_muscle_group().await;
    assert_eq!(averages.get("Chest"), Some(&6.0));
    assert_eq!(averages.get("Back"), Some(&3.0));

    let estimates = session.estimate_one_rep_max(BENCH).await;
    assert_eq!(estimates.len(), 1);
    assert!(estimates[0] > 100.0);

    // 8 reps against a target of 10 backs the weight off.
    let target = PerformanceTarget { reps: 10, rir: 2 };
    let next = session.recommend_weight(BENCH, target).await.unwrap();
    assert!((next.unwrap() - 95.0).abs() < 1e-9);
    let target = PerformanceTarget { reps: 6, rir: 2 };
    let next = session.recommend_weight(BENCH, target).await.unwrap();
    assert!((next.unwrap() - 105.0).abs() < 1e-9);
}

#[tokio::test]
async fn extra_sets_copy_the_last_one() {
    let fixture = Fixture::new();
    let session = fixture.session("extra@example.com").await;
    let day_id = monday_day(&session).await;
    session
        .start_workout(&day_id, date(2026, 10, 19))
        .await
        .unwrap();

    let input = SetInput {
        weight: 60.0,
        reps: 12,
        rir: 3,
    };
    session.update_set(FLY, 2, input).await.unwrap();
    let index = session.add_set(FLY).await.unwrap();
    assert_eq!(index, 3);

    let tracker = session.get_workout_tracker().await.unwrap();
    let fly = tracker
        .exercises
        .iter()
        .find(|e| e.exercise_id == FLY)
        .unwrap();
    assert_eq!(fly.sets[3].input, input);
    assert!(!fly.sets[3].is_completed());

    session.complete_workout().await.unwrap();
    assert!(session.get_workout_tracker().await.is_none());
    let err = session.complete_workout().await.unwrap_err();
    assert!(matches!(err, ForgeError::Validation(_)));
}

#[tokio::test]
async fn progress_is_empty_without_history() {
    let fixture = Fixture::new();
    let session = fixture.session("fresh@example.com").await;

    assert!(session.personal_records().await.is_empty());
    assert!(session.average_sets_by_muscle_group().await.is_empty());
    assert!(session.weekly_one_rep_max(BENCH).await.is_empty());
    let target = PerformanceTarget { reps: 10, rir: 2 };
    assert_eq!(session.recommend_weight(BENCH, target).await.unwrap(), None);
}

#[tokio::test]
async fn extra_set_logged_after_all_feedback_completes_the_workout() {
    let fixture = Fixture::new();
    let session = fixture.session("extra-last@example.com").await;
    let day_id = monday_day(&session).await;
    session
        .start_workout(&day_id, date(2026, 10, 19))
        .await
        .unwrap();
    assert!(day_session(&session, &day_id).await.is_some());

    log_all(&session, BENCH, 100.0).await;
    assert_eq!(log_all(&session, FLY, 20.0).await.as_deref(), Some("Chest"));
    session.submit_feedback("Chest", feedback()).await.unwrap();

    let extra = session.add_set(BENCH).await.unwrap();
    assert_eq!(log_all(&session, ROW, 80.0).await.as_deref(), Some("Back"));
    let outcome = session.submit_feedback("Back", feedback()).await.unwrap();
    assert!(!outcome.workout_complete);

    session
        .update_set(
            BENCH,
            extra,
            SetInput {
                weight: 90.0,
                reps: 10,
                rir: 1,
            },
        )
        .await
        .unwrap();
    let outcome = session.log_set(BENCH, extra).await.unwrap();
    assert_eq!(outcome.feedback_request, None);
    assert!(outcome.workout_complete);
    assert!(session.get_workout_tracker().await.is_none());
    assert!(day_session(&session, &day_id).await.is_none());
}

#[tokio::test]
async fn starting_another_day_releases_the_abandoned_one() {
    let fixture = Fixture::new();
    let session = fixture.session("switch@example.com").await;
    let (monday, wednesday) = monday_and_wednesday(&session).await;

    session
        .start_workout(&monday, date(2026, 10, 19))
        .await
        .unwrap();
    assert!(day_session(&session, &monday).await.is_some());

    let tracker = session
        .start_workout(&wednesday, date(2026, 10, 21))
        .await
        .unwrap();
    assert_eq!(tracker.day_id, wednesday);
    assert!(day_session(&session, &monday).await.is_none());
    assert_eq!(
        day_session(&session, &wednesday).await,
        Some(tracker.session_id.clone())
    );

    session.complete_workout().await.unwrap();
    assert!(day_session(&session, &monday).await.is_none());
    assert!(day_session(&session, &wednesday).await.is_none());
}

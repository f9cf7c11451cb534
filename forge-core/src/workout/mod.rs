pub mod feedback;
pub mod tracker;

pub use feedback::{
    JointPain, MuscleGroupFeedback, PerformanceTarget, PreviousPerformance, Pump, Workload,
    recommended_weight,
};
pub use tracker::{
    DEFAULT_RIR, DEFAULT_TARGET_SETS, ExerciseProgress, LogOutcome, SetInput, TrackedSet,
    WorkoutTracker,
};

/// Result of submitting muscle-group feedback.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackOutcome {
    pub muscle_group: String,
    pub workout_complete: bool,
}

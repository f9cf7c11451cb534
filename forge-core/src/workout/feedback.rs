//! Per-muscle-group ratings collected after a group's sets are done, and the load
//! progression rule that reads them.

use serde::{Deserialize, Serialize};

use crate::error::{ForgeError, Result};

/// Declares a rating enum and its integer conversions from one variant list.
macro_rules! rating_scale {
    ($ty:ident, $label:literal, [$($variant:ident = $value:literal),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $ty {
            $($variant = $value,)+
        }

        impl $ty {
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            pub fn value(self) -> i64 {
                self as i64
            }
        }

        impl TryFrom<i64> for $ty {
            type Error = ForgeError;
            fn try_from(value: i64) -> Result<Self> {
                match value {
                    $($value => Ok($ty::$variant),)+
                    other => Err(ForgeError::InvalidInput(format!(
                        "{} rating {} is out of range",
                        $label, other
                    ))),
                }
            }
        }
    };
}

rating_scale!(JointPain, "Joint pain", [None = 1, Low = 2, Moderate = 3, High = 4]);
rating_scale!(Pump, "Pump", [Low = 1, Moderate = 2, Amazing = 3]);
rating_scale!(
    Workload,
    "Workload",
    [Easy = 1, PrettyGood = 2, PushedLimits = 3, TooMuch = 4]
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuscleGroupFeedback {
    pub joint_pain: JointPain,
    pub pump: Pump,
    pub workload: Workload,
}

impl MuscleGroupFeedback {
    pub fn from_values(joint_pain: i64, pump: i64, workload: i64) -> Result<Self> {
        Ok(Self {
            joint_pain: JointPain::try_from(joint_pain)?,
            pump: Pump::try_from(pump)?,
            workload: Workload::try_from(workload)?,
        })
    }
}

impl Default for MuscleGroupFeedback {
    fn default() -> Self {
        Self {
            joint_pain: JointPain::None,
            pump: Pump::Moderate,
            workload: Workload::PrettyGood,
        }
    }
}

/// What the lifter did last time on an exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviousPerformance {
    pub weight: f64,
    pub reps: i64,
    pub rir: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerformanceTarget {
    pub reps: i64,
    pub rir: i64,
}

/// Next working weight from the previous performance and the reported workload.
///
/// Too much workload backs off 10%. Beating the rep target at or under the target
/// RIR adds 5%. Missing either target drops 5%. Anything else keeps the weight.
pub fn recommended_weight(
    previous: PreviousPerformance,
    target: PerformanceTarget,
    workload: Workload,
) -> f64 {
    if workload == Workload::TooMuch {
        return previous.weight * 0.9;
    }
    if previous.reps > target.reps && previous.rir <= target.rir {
        return previous.weight * 1.05;
    }
    if previous.reps == target.reps && previous.rir == target.rir && workload == Workload::PrettyGood
    {
        return previous.weight;
    }
    if previous.reps < target.reps || previous.rir > target.rir {
        return previous.weight * 0.95;
    }
    previous.weight
}

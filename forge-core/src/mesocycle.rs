//! Mesocycle naming rules.

use crate::db::operations::name_key;
use crate::error::{ForgeError, Result};

/// Trims `name` and rejects it when nothing is left.
pub fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ForgeError::Validation(
            "Please enter a mesocycle name".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_duration(duration_weeks: i64) -> Result<()> {
    if duration_weeks < 1 {
        return Err(ForgeError::Validation(
            "Duration must be at least one week".to_string(),
        ));
    }
    Ok(())
}

/// Suggests a name that does not collide with any of `existing`.
///
/// A free name is returned trimmed. On a collision the existing spelling is the base
/// and numbered suffixes are tried from `(2)` upwards.
pub fn suggest_mesocycle_name(desired: &str, existing: &[String]) -> String {
    let desired = desired.trim();
    let taken = |candidate: &str| existing.iter().any(|n| name_key(n) == name_key(candidate));

    let Some(base) = existing.iter().find(|n| name_key(n) == name_key(desired)) else {
        return desired.to_string();
    };
    let base = base.trim();

    (2..)
        .map(|n| format!("{} ({})", base, n))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| desired.to_string())
}

use std::collections::BTreeMap;

use chrono::Utc;
use log::warn;

use crate::db::operations;
use crate::progress::{self, PersonalRecord, WeeklyEstimate};
use crate::session::Session;

// Progress views never fail: a storage error is logged and reads as "no data yet".
impl Session {
    pub async fn weekly_one_rep_max(&self, exercise_id: &str) -> Vec<WeeklyEstimate> {
        match operations::get_set_logs_for_exercise(&self.db_pool, &self.user.user_id, exercise_id)
            .await
        {
            Ok(logs) => progress::weekly_one_rep_max(&logs),
            Err(e) => {
                warn!("Failed to load sets for {}: {}", exercise_id, e);
                Vec::new()
            }
        }
    }

    pub async fn estimate_one_rep_max(&self, exercise_id: &str) -> Vec<f64> {
        self.weekly_one_rep_max(exercise_id)
            .await
            .into_iter()
            .map(|w| w.one_rep_max)
            .collect()
    }

    pub async fn average_sets_by_muscle_group(&self) -> BTreeMap<String, f64> {
        let logs = match operations::get_completed_set_logs(&self.db_pool, &self.user.user_id).await
        {
            Ok(logs) => logs,
            Err(e) => {
                warn!("Failed to load set history: {}", e);
                return BTreeMap::new();
            }
        };
        match self.catalog().await {
            Ok(catalog) => progress::average_sets_by_muscle_group(&logs, catalog.all(), Utc::now()),
            Err(e) => {
                warn!("Failed to load exercises for set averages: {}", e);
                BTreeMap::new()
            }
        }
    }

    pub async fn personal_records(&self) -> Vec<PersonalRecord> {
        let logs = match operations::get_completed_set_logs(&self.db_pool, &self.user.user_id).await
        {
            Ok(logs) => logs,
            Err(e) => {
                warn!("Failed to load set history: {}", e);
                return Vec::new();
            }
        };
        match self.catalog().await {
            Ok(catalog) => progress::personal_records(&logs, catalog.all()),
            Err(e) => {
                warn!("Failed to load exercises for personal records: {}", e);
                progress::personal_records(&logs, &[])
            }
        }
    }
}

use log::{debug, warn};

use crate::db::operations;
use crate::draft::{MesoDraft, MesocycleForm};
use crate::session::Session;

// Draft storage is best effort: failures are logged and never reach the caller.
impl Session {
    pub async fn get_draft(&self) -> Option<MesoDraft> {
        let row = match operations::get_draft(&self.db_pool, &self.user.user_id).await {
            Ok(row) => row?,
            Err(e) => {
                warn!("Failed to load mesocycle draft: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<MesocycleForm>(&row.draft) {
            Ok(form) => Some(MesoDraft {
                form,
                updated_at: row.updated_at,
            }),
            Err(e) => {
                warn!("Discarding unreadable mesocycle draft: {}", e);
                None
            }
        }
    }

    pub async fn set_draft(&self, form: &MesocycleForm) {
        let json = match serde_json::to_string(form) {
            Ok(json) => json,
            Err(e) => {
                warn!("Failed to serialize mesocycle draft: {}", e);
                return;
            }
        };
        match operations::upsert_draft(&self.db_pool, &self.user.user_id, &json).await {
            Ok(()) => debug!("Saved mesocycle draft for {}", self.user.user_id),
            Err(e) => warn!("Failed to save mesocycle draft: {}", e),
        }
    }

    pub async fn clear_draft(&self) {
        if let Err(e) = operations::delete_draft(&self.db_pool, &self.user.user_id).await {
            warn!("Failed to clear mesocycle draft: {}", e);
        }
    }
}

use log::info;

use crate::auth::{hash_password, validate_password};
use crate::db::models::{UnitPreference, User};
use crate::db::operations;
use crate::error::{ForgeError, Result};
use crate::session::Session;

impl Session {
    pub async fn current_user(&self) -> Result<User> {
        operations::get_user(&self.db_pool, &self.user.user_id)
            .await?
            .ok_or_else(|| ForgeError::not_found("User", &self.user.user_id))
            .and_then(User::try_from)
    }

    pub async fn update_unit_preference(&self, unit: UnitPreference) -> Result<()> {
        operations::update_unit_preference(&self.db_pool, &self.user.user_id, unit.as_str()).await?;
        Ok(())
    }

    /// Every account, for the admin console.
    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user.require_admin()?;
        operations::get_all_users(&self.db_pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    pub async fn reset_password(&self, user_id: &str, new_password: &str) -> Result<()> {
        self.user.require_admin()?;
        validate_password(new_password)?;
        let hash = hash_password(new_password)?;
        if operations::update_password_hash(&self.db_pool, user_id, &hash).await? == 0 {
            return Err(ForgeError::not_found("User", user_id));
        }
        info!("Password reset for user {}", user_id);
        Ok(())
    }
}

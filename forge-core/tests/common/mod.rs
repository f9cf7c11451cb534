#![allow(dead_code)]

use chrono::NaiveDate;
use tempfile::TempDir;

use forge::auth;
use forge::config::Config;
use forge::db;
use forge::db::models::Role;
use forge::session::Session;

pub const PASSWORD: &str = "correct horse";

/// A database in a temporary directory. The directory lives as long as the fixture.
pub struct Fixture {
    pub dir: TempDir,
    pub config: Config,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("forge.db");
        let config = Config::with_db_path(path.to_string_lossy().to_string());
        Self { dir, config }
    }

    pub async fn session_with_role(&self, email: &str, role: Role) -> Session {
        let pool = db::open_pool(&self.config.db_path).await.unwrap();
        auth::signup_with_role(&pool, email, PASSWORD, "Tester", role)
            .await
            .unwrap();
        Session::login(self.config.clone(), email, PASSWORD)
            .await
            .unwrap()
    }

    pub async fn session(&self, email: &str) -> Session {
        self.session_with_role(email, Role::User).await
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

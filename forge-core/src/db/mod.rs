pub mod models;
pub mod operations;

use log::{debug, info};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::time::Duration;

use crate::catalog;
use crate::error::{ForgeError, Result};

/// Opens (creating if missing) the database file and applies pending migrations.
pub async fn open_pool(db_path: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(5000))
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await?;
    debug!("Opened database at {}", db_path);

    init_database(&pool).await?;
    Ok(pool)
}

struct Migration {
    name: &'static str,
    up_sql: &'static str,
}

const MIGRATION_2026_10_01_000000_SETUP_TABLES: &str =
    include_str!("../../../migrations/2026-10-01-000000_setup_tables/up.sql");

const MIGRATIONS: &[Migration] = &[Migration {
    name: "2026-10-01-000000_setup_tables",
    up_sql: MIGRATION_2026_10_01_000000_SETUP_TABLES,
}];

async fn init_migrations_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS _migrations (
            id INTEGER NOT NULL PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at INTEGER NOT NULL DEFAULT (CAST(strftime('%s','now') AS INTEGER))
        )",
    )
    .execute(pool)
    .await?;
    Ok(())
}

async fn is_migration_applied(pool: &SqlitePool, migration_name: &str) -> Result<bool> {
    let result =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _migrations WHERE name = ?1")
            .bind(migration_name)
            .fetch_one(pool)
            .await?;
    Ok(result > 0)
}

fn parse_sql_statements(sql: &str) -> Vec<String> {
    sql.lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with("--")
        })
        .collect::<Vec<_>>()
        .join("\n")
        .split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Applies every migration not yet recorded, each inside its own transaction,
/// then seeds the shared catalog when it is empty.
pub async fn init_database(pool: &SqlitePool) -> Result<()> {
    init_migrations_table(pool).await?;

    for migration in MIGRATIONS {
        if is_migration_applied(pool, migration.name).await? {
            debug!("Migration {} already applied, skipping", migration.name);
            continue;
        }

        info!("Applying migration: {}", migration.name);
        let mut tx = pool.begin().await?;
        for statement in parse_sql_statements(migration.up_sql) {
            sqlx::query(&statement).execute(&mut *tx).await.map_err(|e| {
                log::error!(
                    "Failed to execute migration statement in {}: {} - Error: {}",
                    migration.name,
                    statement,
                    e
                );
                ForgeError::Backend(e)
            })?;
        }
        sqlx::query("INSERT INTO _migrations (name) VALUES (?1)")
            .bind(migration.name)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        info!("Migration {} applied successfully", migration.name);
    }

    seed_default_exercises(pool).await
}

async fn seed_default_exercises(pool: &SqlitePool) -> Result<()> {
    let existing = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM exercises")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(());
    }

    let defaults = catalog::bundled_exercises()?;
    let mut tx = pool.begin().await?;
    for exercise in &defaults {
        operations::insert_exercise(&mut *tx, exercise).await?;
    }
    tx.commit().await?;
    info!("Seeded {} default exercises", defaults.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_statements_and_skips_comments() {
        let sql = "-- header\nCREATE TABLE a (x INTEGER);\n\n-- more\nCREATE INDEX i ON a (x);\n";
        let statements = parse_sql_statements(sql);
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE a (x INTEGER)".to_string(),
                "CREATE INDEX i ON a (x)".to_string()
            ]
        );
    }

    #[test]
    fn bundled_migration_has_every_table() {
        let statements = parse_sql_statements(MIGRATION_2026_10_01_000000_SETUP_TABLES);
        for table in [
            "users",
            "exercises",
            "mesocycles",
            "workout_days",
            "workout_sessions",
            "set_logs",
            "muscle_group_feedback",
            "meso_drafts",
        ] {
            let needle = format!("CREATE TABLE {} ", table);
            assert!(
                statements.iter().any(|s| s.starts_with(&needle)),
                "missing table {}",
                table
            );
        }
    }
}

//! # Settings Repository
//!
//! The singleton terminal settings row: last logged-in user, last role,
//! selected theme. Permissions are never read from here.

use sqlx::SqlitePool;

use crate::error::DbResult;
use dukkan_core::{Role, StoreSettings};

/// Repository for the settings singleton.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    /// Creates a new SettingsRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Saves the settings row (id is always 1).
    pub async fn save(&self, user_name: &str, role: Role, theme: &str) -> DbResult<()> {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO settings (id, user_name, last_login_role, theme)
            VALUES (1, ?1, ?2, ?3)
            "#,
        )
        .bind(user_name)
        .bind(role)
        .bind(theme)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Loads the settings row, if one has been saved.
    pub async fn load(&self) -> DbResult<Option<StoreSettings>> {
        let settings = sqlx::query_as::<_, StoreSettings>(
            "SELECT user_name, last_login_role, theme FROM settings WHERE id = 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let repo = Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .settings();

        assert!(repo.load().await.unwrap().is_none());

        repo.save("alice", Role::Seller, "dark").await.unwrap();
        let settings = repo.load().await.unwrap().unwrap();
        assert_eq!(settings.user_name.as_deref(), Some("alice"));
        assert_eq!(settings.last_login_role, Some(Role::Seller));
        assert_eq!(settings.theme, "dark");

        // Saving again replaces the singleton, never adds a second row.
        repo.save("bob", Role::Manager, "light").await.unwrap();
        let settings = repo.load().await.unwrap().unwrap();
        assert_eq!(settings.user_name.as_deref(), Some("bob"));
    }
}

use crate::models::User;
use crate::pool::DbPool;
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

pub struct UserRepository {
    pool: DbPool,
}

impl UserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Find a user by external id, creating one on first sight
    pub async fn get_or_create(&self, external_id: &str) -> Result<User> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        if let Some(row) = client
            .query_opt(
                "SELECT * FROM users WHERE external_id = $1",
                &[&external_id],
            )
            .await
            .context("Failed to look up user")?
        {
            return self.row_to_user(row);
        }

        let id = Uuid::new_v4();
        let now = Utc::now();
        let row = client
            .query_one(
                r#"
            INSERT INTO users (id, external_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (external_id) DO UPDATE SET external_id = EXCLUDED.external_id
            RETURNING *
            "#,
                &[&id, &external_id, &now],
            )
            .await
            .context("Failed to create user")?;

        debug!("Created user {} for external id {}", id, external_id);
        self.row_to_user(row)
    }

    /// Find a user by external id
    pub async fn get_by_external_id(&self, external_id: &str) -> Result<Option<User>> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        let row = client
            .query_opt(
                "SELECT * FROM users WHERE external_id = $1",
                &[&external_id],
            )
            .await
            .context("Failed to look up user")?;

        row.map(|r| self.row_to_user(r)).transpose()
    }

    // Helper function to convert database row to User
    fn row_to_user(&self, row: tokio_postgres::Row) -> Result<User> {
        Ok(User {
            id: row.get("id"),
            external_id: row.get("external_id"),
            name: row.get("name"),
            email: row.get("email"),
            created_at: row.get("created_at"),
        })
    }
}

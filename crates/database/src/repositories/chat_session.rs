use crate::models::{ChatMessage, ChatSession, SessionWithMessages};
use crate::pool::DbPool;
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

pub struct ChatSessionRepository {
    pool: DbPool,
}

impl ChatSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a new session for a user and company
    pub async fn create(&self, user_id: Uuid, company_id: &str) -> Result<ChatSession> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = client
            .query_one(
                r#"
            INSERT INTO chat_sessions (id, user_id, company_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            RETURNING *
            "#,
                &[&id, &user_id, &company_id, &now],
            )
            .await
            .context("Failed to create chat session")?;

        debug!("Created chat session {} for user {}", id, user_id);
        self.row_to_session(row)
    }

    /// Fetch a session by id
    pub async fn get(&self, session_id: Uuid) -> Result<Option<ChatSession>> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        let row = client
            .query_opt("SELECT * FROM chat_sessions WHERE id = $1", &[&session_id])
            .await
            .context("Failed to look up chat session")?;

        row.map(|r| self.row_to_session(r)).transpose()
    }

    /// Sessions for a user, most recently updated first, with messages
    pub async fn history_for_user(
        &self,
        user_id: Uuid,
        company_id: Option<&str>,
        limit: i64,
    ) -> Result<Vec<SessionWithMessages>> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        let rows = match company_id {
            Some(company_id) => {
                client
                    .query(
                        r#"
                    SELECT * FROM chat_sessions
                    WHERE user_id = $1 AND company_id = $2
                    ORDER BY updated_at DESC
                    LIMIT $3
                    "#,
                        &[&user_id, &company_id, &limit],
                    )
                    .await
            }
            None => {
                client
                    .query(
                        r#"
                    SELECT * FROM chat_sessions
                    WHERE user_id = $1
                    ORDER BY updated_at DESC
                    LIMIT $2
                    "#,
                        &[&user_id, &limit],
                    )
                    .await
            }
        }
        .context("Failed to list chat sessions")?;

        let mut history = Vec::with_capacity(rows.len());
        for row in rows {
            let session = self.row_to_session(row)?;
            let messages = self.messages(session.id).await?;
            history.push(SessionWithMessages { session, messages });
        }
        Ok(history)
    }

    /// Messages for a session in chronological order
    pub async fn messages(&self, session_id: Uuid) -> Result<Vec<ChatMessage>> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        let rows = client
            .query(
                r#"
            SELECT * FROM chat_messages
            WHERE session_id = $1
            ORDER BY created_at ASC
            "#,
                &[&session_id],
            )
            .await
            .context("Failed to list chat messages")?;

        rows.into_iter().map(|r| self.row_to_message(r)).collect()
    }

    /// Append a message to a session and bump its updated_at
    pub async fn append_message(
        &self,
        session_id: Uuid,
        role: &str,
        content: &str,
    ) -> Result<ChatMessage> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = client
            .query_one(
                r#"
            INSERT INTO chat_messages (id, session_id, role, content, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
                &[&id, &session_id, &role, &content, &now],
            )
            .await
            .context("Failed to append chat message")?;

        client
            .execute(
                "UPDATE chat_sessions SET updated_at = $1 WHERE id = $2",
                &[&now, &session_id],
            )
            .await
            .context("Failed to touch chat session")?;

        self.row_to_message(row)
    }

    // Helper function to convert database row to ChatSession
    fn row_to_session(&self, row: tokio_postgres::Row) -> Result<ChatSession> {
        Ok(ChatSession {
            id: row.get("id"),
            user_id: row.get("user_id"),
            company_id: row.get("company_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    // Helper function to convert database row to ChatMessage
    fn row_to_message(&self, row: tokio_postgres::Row) -> Result<ChatMessage> {
        Ok(ChatMessage {
            id: row.get("id"),
            session_id: row.get("session_id"),
            role: row.get("role"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        })
    }
}

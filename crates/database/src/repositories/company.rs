use crate::models::Company;
use crate::pool::DbPool;
use crate::seed;
use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

pub struct CompanyRepository {
    pool: DbPool,
}

impl CompanyRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// List all companies
    pub async fn list(&self) -> Result<Vec<Company>> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        let rows = client
            .query("SELECT * FROM companies ORDER BY name ASC", &[])
            .await
            .context("Failed to list companies")?;

        rows.into_iter().map(|r| self.row_to_company(r)).collect()
    }

    /// Fetch one company by its external company id
    pub async fn get(&self, company_id: &str) -> Result<Option<Company>> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        let row = client
            .query_opt(
                "SELECT * FROM companies WHERE company_id = $1",
                &[&company_id],
            )
            .await
            .context("Failed to look up company")?;

        row.map(|r| self.row_to_company(r)).transpose()
    }

    /// Insert or update company metadata
    pub async fn upsert(
        &self,
        company_id: &str,
        name: &str,
        short_summary: &str,
        long_summary: &str,
        suggested_questions: &serde_json::Value,
    ) -> Result<Company> {
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
            INSERT INTO companies (
                id, company_id, name, short_summary, long_summary,
                suggested_questions, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (company_id) DO UPDATE SET
                name = EXCLUDED.name,
                short_summary = EXCLUDED.short_summary,
                long_summary = EXCLUDED.long_summary,
                suggested_questions = EXCLUDED.suggested_questions
            RETURNING *
            "#,
                &[
                    &id,
                    &company_id,
                    &name,
                    &short_summary,
                    &long_summary,
                    &suggested_questions,
                    &now,
                ],
            )
            .await
            .context("Failed to upsert company")?;

        debug!("Upserted company metadata for {}", company_id);
        self.row_to_company(row)
    }

    /// Seed the demo company narratives if the table is empty
    pub async fn seed_demo_companies(&self) -> Result<()> {
        let client = self
            .pool
            .get()
            .await
            .context("Failed to get database connection")?;

        let row = client
            .query_one("SELECT COUNT(*) FROM companies", &[])
            .await
            .context("Failed to count companies")?;
        let existing: i64 = row.get(0);
        if existing > 0 {
            info!("Company metadata already seeded ({} companies)", existing);
            return Ok(());
        }

        let demos = seed::demo_companies();
        let count = demos.len();
        for demo in demos {
            self.upsert(
                demo.company_id,
                demo.name,
                demo.short_summary,
                demo.long_summary,
                &serde_json::json!(demo.suggested_questions),
            )
            .await?;
        }

        info!("Seeded {} demo companies", count);
        Ok(())
    }

    // Helper function to convert database row to Company
    fn row_to_company(&self, row: tokio_postgres::Row) -> Result<Company> {
        Ok(Company {
            id: row.get("id"),
            company_id: row.get("company_id"),
            name: row.get("name"),
            short_summary: row.get("short_summary"),
            long_summary: row.get("long_summary"),
            suggested_questions: row.get("suggested_questions"),
            created_at: row.get("created_at"),
        })
    }
}

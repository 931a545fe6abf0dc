//! SQLite backend — the production store.
//!
//! A single database file with four tables:
//! - `guests`    — anonymous visitor identities
//! - `questions` — append-only question log, indexed by guest and time
//! - `answers`   — 0-or-1 answer per question
//! - `policies`  — externally-ingested policy catalog
//!
//! `record_turn` writes the question and its answer inside one
//! transaction, so a reader can never observe a half-written turn.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use tracing::{debug, info};

use youthdesk_core::conversation::{Answer, GuestId, GuestIdentity, Question, QuestionId};
use youthdesk_core::error::StoreError;
use youthdesk_core::policy::PolicyRecord;
use youthdesk_core::store::{HistoryStore, PolicyCatalog};

/// A SQLite store for guest history and the policy catalog.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store from a file path.
    ///
    /// The database and all tables/indexes are created automatically.
    pub async fn new(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(path)
            .map_err(|e| StoreError::Storage(format!("Invalid SQLite path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON");

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await
            .map_err(|e| StoreError::Storage(format!("Failed to open SQLite: {e}")))?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!("SQLite store initialized at {path}");
        Ok(store)
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run schema migrations.
    async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guests (
                id         TEXT PRIMARY KEY,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("guests table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id         TEXT PRIMARY KEY,
                guest_id   TEXT NOT NULL REFERENCES guests(id),
                content    TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("questions table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS answers (
                question_id TEXT PRIMARY KEY REFERENCES questions(id),
                content     TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("answers table: {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS policies (
                id                    TEXT PRIMARY KEY,
                title                 TEXT NOT NULL,
                description           TEXT NOT NULL DEFAULT '',
                keywords              TEXT NOT NULL DEFAULT '',
                region                TEXT NOT NULL DEFAULT '',
                marital_status        TEXT NOT NULL DEFAULT '',
                age_min               INTEGER,
                age_max               INTEGER,
                education_requirement TEXT NOT NULL DEFAULT '',
                major_requirement     TEXT NOT NULL DEFAULT '',
                employment_status     TEXT NOT NULL DEFAULT '',
                specialization        TEXT NOT NULL DEFAULT '',
                application_period    TEXT NOT NULL DEFAULT '',
                url                   TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("policies table: {e}")))?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_questions_guest_created
             ON questions(guest_id, created_at DESC)",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::MigrationFailed(format!("questions index: {e}")))?;

        debug!("SQLite migrations complete");
        Ok(())
    }

    fn row_to_question(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StoreError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
        let guest_id: String = row
            .try_get("guest_id")
            .map_err(|e| StoreError::QueryFailed(format!("guest_id column: {e}")))?;
        let content: String = row
            .try_get("content")
            .map_err(|e| StoreError::QueryFailed(format!("content column: {e}")))?;
        let created_at_str: String = row
            .try_get("created_at")
            .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(Question {
            id: QuestionId(id),
            guest_id: GuestId(guest_id),
            content,
            created_at,
        })
    }

    fn row_to_policy(row: &sqlx::sqlite::SqliteRow) -> Result<PolicyRecord, StoreError> {
        let get_text = |name: &str| -> Result<String, StoreError> {
            row.try_get(name)
                .map_err(|e| StoreError::QueryFailed(format!("{name} column: {e}")))
        };
        let get_age = |name: &str| -> Result<Option<u32>, StoreError> {
            let value: Option<i64> = row
                .try_get(name)
                .map_err(|e| StoreError::QueryFailed(format!("{name} column: {e}")))?;
            Ok(value.and_then(|v| u32::try_from(v).ok()))
        };

        Ok(PolicyRecord {
            id: get_text("id")?,
            title: get_text("title")?,
            description: get_text("description")?,
            keywords: get_text("keywords")?,
            region: get_text("region")?,
            marital_status: get_text("marital_status")?,
            age_min: get_age("age_min")?,
            age_max: get_age("age_max")?,
            education_requirement: get_text("education_requirement")?,
            major_requirement: get_text("major_requirement")?,
            employment_status: get_text("employment_status")?,
            specialization: get_text("specialization")?,
            application_period: get_text("application_period")?,
            url: get_text("url")?,
        })
    }
}

#[async_trait]
impl HistoryStore for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn resolve_guest(&self, token: Option<&str>) -> Result<GuestIdentity, StoreError> {
        match token {
            Some(token) => {
                let row = sqlx::query("SELECT id, created_at FROM guests WHERE id = ?1")
                    .bind(token)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| StoreError::QueryFailed(format!("guest lookup: {e}")))?;

                let row = row.ok_or_else(|| StoreError::UnknownGuest(token.to_string()))?;
                let id: String = row
                    .try_get("id")
                    .map_err(|e| StoreError::QueryFailed(format!("id column: {e}")))?;
                let created_at_str: String = row
                    .try_get("created_at")
                    .map_err(|e| StoreError::QueryFailed(format!("created_at column: {e}")))?;
                let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
                    .map(|dt| dt.with_timezone(&Utc))
                    .unwrap_or_else(|_| Utc::now());

                Ok(GuestIdentity {
                    id: GuestId(id),
                    created_at,
                })
            }
            None => {
                let guest = GuestIdentity::new();
                sqlx::query("INSERT INTO guests (id, created_at) VALUES (?1, ?2)")
                    .bind(&guest.id.0)
                    .bind(guest.created_at.to_rfc3339())
                    .execute(&self.pool)
                    .await
                    .map_err(|e| StoreError::Storage(format!("guest insert: {e}")))?;
                debug!("Created guest {}", guest.id);
                Ok(guest)
            }
        }
    }

    async fn recent_questions(
        &self,
        guest: &GuestId,
        limit: usize,
    ) -> Result<Vec<Question>, StoreError> {
        // rowid breaks ties between questions created in the same instant
        let rows = sqlx::query(
            r#"
            SELECT id, guest_id, content, created_at
            FROM questions
            WHERE guest_id = ?1
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
        )
        .bind(&guest.0)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::QueryFailed(format!("recent questions: {e}")))?;

        rows.iter().map(Self::row_to_question).collect()
    }

    async fn answer_for(&self, question: &QuestionId) -> Result<Option<Answer>, StoreError> {
        let row = sqlx::query("SELECT content FROM answers WHERE question_id = ?1")
            .bind(&question.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("answer lookup: {e}")))?;

        match row {
            Some(row) => {
                let content: String = row
                    .try_get("content")
                    .map_err(|e| StoreError::QueryFailed(format!("content column: {e}")))?;
                Ok(Some(Answer::new(question.clone(), content)))
            }
            None => Ok(None),
        }
    }

    async fn record_turn(
        &self,
        guest: &GuestId,
        question_text: &str,
        answer_text: &str,
    ) -> Result<Question, StoreError> {
        let question = Question::new(guest.clone(), question_text);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::Storage(format!("begin transaction: {e}")))?;

        sqlx::query(
            "INSERT INTO questions (id, guest_id, content, created_at) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&question.id.0)
        .bind(&question.guest_id.0)
        .bind(&question.content)
        .bind(question.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| StoreError::Storage(format!("question insert: {e}")))?;

        sqlx::query("INSERT INTO answers (question_id, content) VALUES (?1, ?2)")
            .bind(&question.id.0)
            .bind(answer_text)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::Storage(format!("answer insert: {e}")))?;

        tx.commit()
            .await
            .map_err(|e| StoreError::Storage(format!("commit turn: {e}")))?;

        debug!("Recorded turn {} for guest {}", question.id, guest);
        Ok(question)
    }
}

#[async_trait]
impl PolicyCatalog for SqliteStore {
    async fn records(&self) -> Result<Vec<PolicyRecord>, StoreError> {
        let rows = sqlx::query("SELECT * FROM policies ORDER BY rowid")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::QueryFailed(format!("policy scan: {e}")))?;

        rows.iter().map(Self::row_to_policy).collect()
    }

    async fn upsert_policy(&self, record: PolicyRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO policies (
                id, title, description, keywords, region, marital_status,
                age_min, age_max, education_requirement, major_requirement,
                employment_status, specialization, application_period, url
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                keywords = excluded.keywords,
                region = excluded.region,
                marital_status = excluded.marital_status,
                age_min = excluded.age_min,
                age_max = excluded.age_max,
                education_requirement = excluded.education_requirement,
                major_requirement = excluded.major_requirement,
                employment_status = excluded.employment_status,
                specialization = excluded.specialization,
                application_period = excluded.application_period,
                url = excluded.url
            "#,
        )
        .bind(&record.id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.keywords)
        .bind(&record.region)
        .bind(&record.marital_status)
        .bind(record.age_min.map(|v| v as i64))
        .bind(record.age_max.map(|v| v as i64))
        .bind(&record.education_requirement)
        .bind(&record.major_requirement)
        .bind(&record.employment_status)
        .bind(&record.specialization)
        .bind(&record.application_period)
        .bind(&record.url)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::Storage(format!("policy upsert: {e}")))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// In-memory SQLite needs a single connection — each new connection
    /// would otherwise see its own empty database.
    async fn test_store() -> SqliteStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .unwrap();
        SqliteStore::from_pool(pool).await.unwrap()
    }

    #[tokio::test]
    async fn guest_roundtrip() {
        let store = test_store().await;
        let guest = store.resolve_guest(None).await.unwrap();
        let again = store.resolve_guest(Some(&guest.id.0)).await.unwrap();
        assert_eq!(guest.id, again.id);
    }

    #[tokio::test]
    async fn unknown_token_is_fatal() {
        let store = test_store().await;
        let err = store.resolve_guest(Some("missing")).await.unwrap_err();
        assert!(matches!(err, StoreError::UnknownGuest(_)));
    }

    #[tokio::test]
    async fn turns_are_recorded_atomically_and_ordered() {
        let store = test_store().await;
        let guest = store.resolve_guest(None).await.unwrap();

        for i in 1..=4 {
            store
                .record_turn(&guest.id, &format!("질문 {i}"), &format!("답변 {i}"))
                .await
                .unwrap();
        }

        let recent = store.recent_questions(&guest.id, 3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].content, "질문 4");

        let answer = store.answer_for(&recent[0].id).await.unwrap().unwrap();
        assert_eq!(answer.content, "답변 4");
    }

    #[tokio::test]
    async fn missing_answer_is_none_not_error() {
        let store = test_store().await;
        let absent = store
            .answer_for(&QuestionId("no-such-question".into()))
            .await
            .unwrap();
        assert!(absent.is_none());
    }

    #[tokio::test]
    async fn policy_upsert_and_scan() {
        let store = test_store().await;
        let record = PolicyRecord {
            id: "P-001".into(),
            title: "청년 월세 지원".into(),
            description: "서울 거주 청년 대상 월세 지원".into(),
            keywords: "주거,월세".into(),
            region: "서울특별시".into(),
            marital_status: "제한없음".into(),
            age_min: Some(19),
            age_max: Some(34),
            education_requirement: "제한없음".into(),
            major_requirement: "제한없음".into(),
            employment_status: "제한없음".into(),
            specialization: "제한없음".into(),
            application_period: "상시".into(),
            url: "https://example.org/p-001".into(),
        };

        store.upsert_policy(record.clone()).await.unwrap();
        store.upsert_policy(record).await.unwrap(); // idempotent

        let records = store.records().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].age_max, Some(34));
    }
}

//! Annotation database operations

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::document::DocumentKey;
use crate::error::{AppError, Result};
use crate::sync::{AnnotationPayload, PersistedAnnotation};

/// Annotation row
#[derive(Debug, Clone, sqlx::FromRow)]
struct AnnotationRow {
    id: String,
    instance_id: String,
    agent_id: String,
    annotator_id: String,
    comment_text: String,
    selection_text: String,
    start_offset: i64,
    end_offset: i64,
    created_at: String,
}

impl TryFrom<AnnotationRow> for PersistedAnnotation {
    type Error = AppError;

    fn try_from(row: AnnotationRow) -> Result<Self> {
        let offset = |value: i64| {
            usize::try_from(value)
                .map_err(|_| AppError::Internal(format!("Invalid offset {} in {}", value, row.id)))
        };
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| AppError::Internal(format!("Invalid timestamp in {}: {}", row.id, e)))?
            .with_timezone(&Utc);

        Ok(Self {
            payload: AnnotationPayload {
                instance_id: row.instance_id.clone(),
                agent_id: row.agent_id.clone(),
                annotator_id: row.annotator_id.clone(),
                comment_text: row.comment_text.clone(),
                selection_text: row.selection_text.clone(),
                start_offset: offset(row.start_offset)?,
                end_offset: offset(row.end_offset)?,
            },
            id: row.id,
            created_at,
        })
    }
}

/// Annotation repository
pub struct AnnotationRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnnotationRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Store an annotation, registering its annotator if unknown
    pub async fn create(&self, data: &AnnotationPayload) -> Result<PersistedAnnotation> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now();
        let start = to_column(data.start_offset)?;
        let end = to_column(data.end_offset)?;

        let mut tx = self.pool.begin().await?;

        let registered = sqlx::query("INSERT OR IGNORE INTO annotators (id, name) VALUES (?, ?)")
            .bind(&data.annotator_id)
            .bind(&data.annotator_id)
            .execute(&mut *tx)
            .await?;
        if registered.rows_affected() > 0 {
            tracing::info!("Registered annotator {}", data.annotator_id);
        }

        sqlx::query(
            r#"
            INSERT INTO annotations (id, instance_id, agent_id, annotator_id, comment_text,
                                     selection_text, start_offset, end_offset, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&data.instance_id)
        .bind(&data.agent_id)
        .bind(&data.annotator_id)
        .bind(&data.comment_text)
        .bind(&data.selection_text)
        .bind(start)
        .bind(end)
        .bind(created_at.to_rfc3339_opts(SecondsFormat::Micros, true))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(PersistedAnnotation {
            id,
            payload: data.clone(),
            created_at,
        })
    }

    /// List annotations for a document, ordered by position then creation
    pub async fn list_for_document(&self, document: &DocumentKey) -> Result<Vec<PersistedAnnotation>> {
        let rows = sqlx::query_as::<_, AnnotationRow>(
            r#"
            SELECT id, instance_id, agent_id, annotator_id, comment_text,
                   selection_text, start_offset, end_offset, created_at
            FROM annotations
            WHERE instance_id = ? AND agent_id = ?
            ORDER BY start_offset ASC, created_at ASC, rowid ASC
            "#,
        )
        .bind(&document.instance_id)
        .bind(&document.agent_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(PersistedAnnotation::try_from).collect()
    }
}

fn to_column(offset: usize) -> Result<i64> {
    i64::try_from(offset).map_err(|_| AppError::BadRequest(format!("Offset out of range: {}", offset)))
}

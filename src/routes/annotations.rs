//! Annotation API routes
//!
//! - `POST /`: store one annotation
//! - `GET /:instance_id/:agent_id`: list a document's annotations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::db::AnnotationRepository;
use crate::document::DocumentKey;
use crate::error::{AppError, Result};
use crate::state::AppState;
use crate::sync::{AnnotationPayload, PersistedAnnotation, SubmitResponse};

/// Create the annotations router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_annotation))
        .route("/:instance_id/:agent_id", get(list_annotations))
}

/// Store a new annotation
async fn create_annotation(
    State(state): State<AppState>,
    Json(data): Json<AnnotationPayload>,
) -> Result<(StatusCode, Json<SubmitResponse>)> {
    validate(&data)?;

    let repo = AnnotationRepository::new(state.db());
    let stored = repo.create(&data).await?;
    tracing::debug!(
        "Stored annotation {} on {}/{} [{}, {})",
        stored.id,
        data.instance_id,
        data.agent_id,
        data.start_offset,
        data.end_offset
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            message: "Annotation saved successfully".to_string(),
            id: stored.id,
        }),
    ))
}

/// List annotations for one (instance, agent) transcript
async fn list_annotations(
    State(state): State<AppState>,
    Path((instance_id, agent_id)): Path<(String, String)>,
) -> Result<Json<Vec<PersistedAnnotation>>> {
    let repo = AnnotationRepository::new(state.db());
    let annotations = repo
        .list_for_document(&DocumentKey::new(&instance_id, &agent_id))
        .await?;
    Ok(Json(annotations))
}

fn validate(data: &AnnotationPayload) -> Result<()> {
    if data.instance_id.trim().is_empty() || data.agent_id.trim().is_empty() {
        return Err(AppError::BadRequest("instance_id and agent_id are required".into()));
    }
    if data.annotator_id.trim().is_empty() {
        return Err(AppError::BadRequest("annotator_id is required".into()));
    }
    if data.comment_text.trim().is_empty() {
        return Err(AppError::BadRequest("comment_text is empty".into()));
    }
    if data.start_offset >= data.end_offset {
        return Err(AppError::BadRequest(format!(
            "Invalid range [{}, {})",
            data.start_offset, data.end_offset
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_test::TestServer;
    use serde_json::json;

    use crate::db::memory_pool;

    async fn server() -> TestServer {
        let state = AppState::new(memory_pool().await);
        TestServer::new(crate::routes::app(state)).unwrap()
    }

    fn body(start: usize, end: usize) -> serde_json::Value {
        json!({
            "instance_id": "inst-1",
            "agent_id": "agent-1",
            "annotator_id": "alice",
            "comment_text": "nice adjective",
            "selection_text": "brave",
            "start_offset": start,
            "end_offset": end,
        })
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let server = server().await;

        let response = server.post("/annotations").json(&body(6, 11)).await;
        response.assert_status(StatusCode::CREATED);
        let created: SubmitResponse = response.json();
        assert_eq!(created.message, "Annotation saved successfully");

        server.post("/annotations").json(&body(0, 5)).await;

        let response = server.get("/annotations/inst-1/agent-1").await;
        response.assert_status_ok();
        let listed: Vec<PersistedAnnotation> = response.json();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].payload.start_offset, 0);
        assert_eq!(listed[1].id, created.id);
        assert_eq!(listed[1].payload.selection_text, "brave");
    }

    #[tokio::test]
    async fn test_rejects_invalid_payloads() {
        let server = server().await;

        let response = server.post("/annotations").json(&body(11, 6)).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: serde_json::Value = response.json();
        assert_eq!(error["error"], "bad_request");

        let mut empty_comment = body(6, 11);
        empty_comment["comment_text"] = json!("   ");
        server
            .post("/annotations")
            .json(&empty_comment)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let mut no_annotator = body(6, 11);
        no_annotator["annotator_id"] = json!("");
        server
            .post("/annotations")
            .json(&no_annotator)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        let listed: Vec<PersistedAnnotation> = server.get("/annotations/inst-1/agent-1").await.json();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let server = server().await;
        let response = server.get("/health").await;
        response.assert_status_ok();
        let health: serde_json::Value = response.json();
        assert_eq!(health["status"], "healthy");
    }
}

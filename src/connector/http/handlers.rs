use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::connector::api::Container;
use crate::domain::{ChatAnswer, DeletionReport, StoreStats};

use super::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct IngestRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default, alias = "top_k")]
    pub top_k: Option<usize>,
}

fn parse_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn ingest(
    State(container): State<Arc<Container>>,
    payload: Result<Json<IngestRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let request = parse_body(payload)?;
    let text = request.text.unwrap_or_default();

    let inserted = container
        .ingest_use_case()
        .execute(&text, request.source.as_deref())
        .await?;

    Ok(Json(json!({ "inserted": inserted })))
}

pub async fn chat(
    State(container): State<Arc<Container>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatAnswer>, ApiError> {
    let request = parse_body(payload)?;
    let question = request.question.unwrap_or_default();

    let answer = container
        .answer_use_case()
        .execute(&question, request.top_k)
        .await?;

    Ok(Json(answer))
}

pub async fn delete_source(
    State(container): State<Arc<Container>>,
    Path(source): Path<String>,
) -> Result<Json<DeletionReport>, ApiError> {
    let report = container
        .delete_use_case()
        .execute(&source)
        .await
        .map_err(|e| ApiError::from(e).with_source(source.trim()))?;

    Ok(Json(report))
}

pub async fn stats(State(container): State<Arc<Container>>) -> Result<Json<StoreStats>, ApiError> {
    let stats = container.stats_use_case().execute().await?;
    Ok(Json(stats))
}

use artsim_core::types::{Article, ArticleId};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateArticleRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleResponse {
    pub id: ArticleId,
    pub content: String,
    pub duplicate_article_ids: Vec<ArticleId>,
}

impl From<Article> for ArticleResponse {
    fn from(article: Article) -> Self {
        Self { id: article.id, content: article.content, duplicate_article_ids: article.duplicate_ids }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ArticleList {
    pub articles: Vec<ArticleResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DuplicateGroupList {
    pub duplicate_groups: Vec<Vec<ArticleId>>,
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn article_routes() -> Router<AppState> {
    Router::new()
        .route("/articles", get(list_articles).post(create_article))
        .route("/articles/{id}", get(get_article))
}

pub fn group_routes() -> Router<AppState> {
    Router::new().route("/duplicate_groups", get(list_duplicate_groups))
}

/// Run `fut` under the request deadline. `fut` is dropped when the deadline
/// fires, so multi-step writes must not be passed in directly.
async fn with_deadline<T, F>(state: &AppState, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = artsim_core::Result<T>>,
{
    match tokio::time::timeout(state.request_timeout, fut).await {
        Ok(result) => result.map_err(ApiError::from),
        Err(_) => {
            warn!(timeout_ms = state.request_timeout.as_millis() as u64, "request deadline exceeded");
            Err(ApiError::timeout())
        }
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_secs": state.start_time.elapsed().as_secs(),
    }))
}

async fn create_article(
    State(state): State<AppState>,
    payload: Result<Json<CreateArticleRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ArticleResponse>), ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;
    if req.content.is_empty() {
        return Err(ApiError::bad_request("content must not be empty"));
    }
    // Creation runs on its own task so a missed deadline never interrupts
    // it between the article write and its membership row.
    let service = Arc::clone(&state.service);
    let task = tokio::spawn(async move { service.create_article(&req.content).await });
    let article = with_deadline(&state, async move { task.await.map_err(anyhow::Error::from)? }).await?;
    Ok((StatusCode::CREATED, Json(article.into())))
}

async fn get_article(
    State(state): State<AppState>,
    id: Result<Path<u64>, PathRejection>,
) -> Result<Json<ArticleResponse>, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let article = with_deadline(&state, state.service.article_by_id(ArticleId(id))).await?;
    Ok(Json(article.into()))
}

/// Articles whose stored uniqueness flag is set.
async fn list_articles(State(state): State<AppState>) -> Result<Json<ArticleList>, ApiError> {
    let articles = with_deadline(&state, state.service.unique_articles()).await?;
    Ok(Json(ArticleList { articles: articles.into_iter().map(ArticleResponse::from).collect() }))
}

/// Groups with at least two members, ordered by group id.
async fn list_duplicate_groups(State(state): State<AppState>) -> Result<Json<DuplicateGroupList>, ApiError> {
    let groups = with_deadline(&state, state.service.duplicate_groups()).await?;
    let duplicate_groups = groups.into_values().filter(|members| members.len() >= 2).collect();
    Ok(Json(DuplicateGroupList { duplicate_groups }))
}

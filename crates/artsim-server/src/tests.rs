use crate::routes::{ArticleList, ArticleResponse, DuplicateGroupList};
use crate::{app, state::AppState};
use artsim_cluster::ArticleService;
use artsim_core::config::{ArtsimConfig, StorageBackend};
use artsim_core::error::{ArtsimError, Result};
use artsim_core::types::{Article, ArticleId, DuplicateGroup, DuplicateGroupId};
use artsim_similarity::{DuplicateDetector, IrregularVerbs, Normalizer, Similarity};
use artsim_storage::{MemoryStorage, Storage};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn test_state() -> AppState {
    let normalizer = Normalizer::default().with_verbs(IrregularVerbs::bundled().unwrap());
    let detector = DuplicateDetector::new(0.95, normalizer).unwrap();
    let service = ArticleService::new(Arc::new(MemoryStorage::new()), Arc::new(detector));
    AppState::new(service, Duration::from_secs(5))
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn create(state: &AppState, content: &str) -> ArticleResponse {
    let (status, body) = send(app(state.clone()), post_json("/articles", json!({ "content": content }))).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    serde_json::from_value(body).unwrap()
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(test_state()), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["uptime_secs"].is_u64());
}

// ========== Articles ==========

#[tokio::test]
async fn test_create_articles_scenario() {
    let state = test_state();

    let first = create(&state, "hello world").await;
    assert_eq!(first.id, ArticleId(1));
    assert!(first.duplicate_article_ids.is_empty());

    let second = create(&state, "Hello a world!").await;
    assert_eq!(second.id, ArticleId(2));
    assert_eq!(second.duplicate_article_ids, vec![ArticleId(1)]);
    assert_eq!(second.content, "Hello a world!");

    let third = create(&state, "unique").await;
    assert_eq!(third.id, ArticleId(3));
    assert!(third.duplicate_article_ids.is_empty());
}

#[tokio::test]
async fn test_create_response_shape() {
    let (status, body) = send(app(test_state()), post_json("/articles", json!({ "content": "hello world" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "id": 1, "content": "hello world", "duplicate_article_ids": [] }));
}

#[tokio::test]
async fn test_create_rejects_empty_or_missing_content() {
    let state = test_state();
    for payload in [json!({ "content": "" }), json!({})] {
        let (status, body) = send(app(state.clone()), post_json("/articles", payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "bad_request");
    }

    let req = Request::builder()
        .method("POST")
        .uri("/articles")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _) = send(app(state.clone()), req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // nothing was stored
    let (_, body) = send(app(state), get("/articles")).await;
    assert_eq!(body["articles"], json!([]));
}

#[tokio::test]
async fn test_get_article_by_id() {
    let state = test_state();
    create(&state, "Get article by id.").await;
    create(&state, "Get the article by an id.").await;
    create(&state, "Get article by id").await;

    let (status, body) = send(app(state.clone()), get("/articles/1")).await;
    assert_eq!(status, StatusCode::OK);
    let first: ArticleResponse = serde_json::from_value(body).unwrap();
    // stored as unique, so later duplicates are not linked back
    assert!(first.duplicate_article_ids.is_empty());

    let (_, body) = send(app(state), get("/articles/2")).await;
    let second: ArticleResponse = serde_json::from_value(body).unwrap();
    assert_eq!(second.duplicate_article_ids, vec![ArticleId(1), ArticleId(3)]);
}

#[tokio::test]
async fn test_get_article_not_found() {
    let (status, body) = send(app(test_state()), get("/articles/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_get_article_bad_id() {
    let (status, body) = send(app(test_state()), get("/articles/abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn test_list_unique_articles() {
    let state = test_state();
    create(&state, "hello world").await;
    create(&state, "hello the world").await;
    create(&state, "goodbye moon").await;

    let (status, body) = send(app(state), get("/articles")).await;
    assert_eq!(status, StatusCode::OK);
    let list: ArticleList = serde_json::from_value(body).unwrap();
    let ids: Vec<ArticleId> = list.articles.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![ArticleId(1), ArticleId(3)]);
}

// ========== Duplicate groups ==========

#[tokio::test]
async fn test_duplicate_groups_hide_singletons() {
    let state = test_state();
    create(&state, "unique").await;
    create(&state, "hello world").await;
    create(&state, "Hello a world!").await;
    create(&state, "another story").await;
    create(&state, "another story.").await;
    create(&state, "hello, world").await;

    let (status, body) = send(app(state), get("/duplicate_groups")).await;
    assert_eq!(status, StatusCode::OK);
    let groups: DuplicateGroupList = serde_json::from_value(body).unwrap();
    assert_eq!(
        groups.duplicate_groups,
        vec![
            vec![ArticleId(2), ArticleId(3), ArticleId(6)],
            vec![ArticleId(4), ArticleId(5)],
        ]
    );
}

#[tokio::test]
async fn test_duplicate_groups_empty() {
    let (status, body) = send(app(test_state()), get("/duplicate_groups")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "duplicate_groups": [] }));
}

// ========== Deadline ==========

/// Similarity that stalls every comparison.
struct SlowSimilarity;

impl Similarity for SlowSimilarity {
    fn score(&self, _a: ArticleId, _content_a: &str, _b: ArticleId, _content_b: &str) -> f64 {
        std::thread::sleep(Duration::from_millis(200));
        0.0
    }

    fn threshold(&self) -> f64 {
        0.95
    }
}

#[tokio::test]
async fn test_request_deadline_returns_500() {
    let storage = Arc::new(MemoryStorage::new());
    let svc = ArticleService::new(storage.clone(), Arc::new(SlowSimilarity));
    let state = AppState::new(svc, Duration::from_millis(20));

    create(&state, "first").await;
    let (status, body) = send(app(state), post_json("/articles", json!({ "content": "second" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "timeout");
    // id allocated before the deadline fired is not reused
    assert_eq!(storage.snapshot().article_counter, 2);
}

/// Memory storage whose membership row write takes longer than the deadline.
struct SlowGroupStorage {
    inner: MemoryStorage,
}

#[async_trait]
impl Storage for SlowGroupStorage {
    async fn next_article_id(&self) -> Result<ArticleId> {
        self.inner.next_article_id().await
    }

    async fn create_article(&self, article: &Article) -> Result<()> {
        self.inner.create_article(article).await
    }

    async fn update_duplicate_ids(&self, id: ArticleId, duplicate_ids: &[ArticleId]) -> Result<()> {
        self.inner.update_duplicate_ids(id, duplicate_ids).await
    }

    async fn article_by_id(&self, id: ArticleId) -> Result<Article> {
        self.inner.article_by_id(id).await
    }

    async fn all_articles(&self) -> Result<Vec<Article>> {
        self.inner.all_articles().await
    }

    async fn unique_articles(&self) -> Result<Vec<Article>> {
        self.inner.unique_articles().await
    }

    async fn next_duplicate_group_id(&self) -> Result<DuplicateGroupId> {
        self.inner.next_duplicate_group_id().await
    }

    async fn create_duplicate_group(&self, group_id: DuplicateGroupId, article_id: ArticleId) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.inner.create_duplicate_group(group_id, article_id).await
    }

    async fn all_duplicate_groups(&self) -> Result<Vec<DuplicateGroup>> {
        self.inner.all_duplicate_groups().await
    }
}

#[tokio::test]
async fn test_deadline_does_not_split_article_from_membership_row() {
    let storage = Arc::new(SlowGroupStorage { inner: MemoryStorage::new() });
    let detector = DuplicateDetector::new(0.95, Normalizer::default()).unwrap();
    let svc = ArticleService::new(storage.clone(), Arc::new(detector));
    let state = AppState::new(svc, Duration::from_millis(20));

    let (status, body) = send(app(state), post_json("/articles", json!({ "content": "hello world" }))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "timeout");

    // creation finishes in the background
    tokio::time::sleep(Duration::from_millis(300)).await;
    let snapshot = storage.inner.snapshot();
    assert_eq!(snapshot.articles.len(), 1);
    for id in snapshot.articles.keys() {
        let rows = snapshot.groups.iter().filter(|row| row.article_id == *id).count();
        assert_eq!(rows, 1, "article {id} has {rows} membership rows");
    }
}

// ========== Errors ==========

#[test]
fn test_error_mapping() {
    use crate::error::ApiError;
    let not_found = ApiError::from(ArtsimError::NotFound { id: ArticleId(3) });
    assert_eq!(not_found.status, StatusCode::NOT_FOUND);
    let storage = ApiError::from(ArtsimError::storage("disk full"));
    assert_eq!(storage.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(storage.message.contains("disk full"));
}

#[test]
fn test_article_response_from_article() {
    let article = Article::new(ArticleId(4), "text", vec![ArticleId(1)], 2.into());
    let resp = ArticleResponse::from(article);
    assert_eq!(resp.duplicate_article_ids, vec![ArticleId(1)]);
}

// ========== State ==========

#[tokio::test]
async fn test_state_from_config_file_backend() -> Result<()> {
    let dir = tempfile::TempDir::new()?;
    let mut config = ArtsimConfig::default();
    config.storage.backend = StorageBackend::File;
    config.storage.data_dir = dir.path().to_path_buf();

    let state = AppState::from_config(&config).await?;
    create(&state, "persisted article").await;
    assert!(dir.path().join("artsim.json").exists());

    let reopened = AppState::from_config(&config).await?;
    let (status, body) = send(app(reopened), get("/articles/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "persisted article");
    Ok(())
}

#[tokio::test]
async fn test_state_from_config_rejects_bad_threshold() {
    let mut config = ArtsimConfig::default();
    config.similarity.threshold = 1.5;
    assert!(AppState::from_config(&config).await.is_err());
}

#[tokio::test]
async fn test_state_from_config_missing_verb_table() {
    let mut config = ArtsimConfig::default();
    config.similarity.irregular_verbs_path = Some("/nonexistent/verbs.csv".into());
    let err = AppState::from_config(&config).await.err().unwrap();
    assert!(matches!(err, ArtsimError::Config(_)));
}

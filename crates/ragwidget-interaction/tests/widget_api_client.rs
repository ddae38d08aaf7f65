use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use futures::StreamExt;
use ragwidget_core::backend::{
    BulkScrapeRequest, QueryRequest, ScrapeRequest, UploadEvent, UploadFile, WidgetBackend,
};
use ragwidget_core::identity::InMemoryCredentialStore;
use ragwidget_core::knowledge::KnowledgeStatus;
use ragwidget_interaction::WidgetApiClient;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct Recorded {
    bodies: Arc<Mutex<Vec<Value>>>,
    auth: Arc<Mutex<Vec<Option<String>>>>,
    upload_fields: Arc<Mutex<Vec<(String, usize)>>>,
}

impl Recorded {
    fn record(&self, headers: &HeaderMap, body: Value) {
        self.bodies.lock().unwrap().push(body);
        self.auth.lock().unwrap().push(
            headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        );
    }
}

async fn query(State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    rec.record(&headers, body);
    Json(json!({
        "query": "What is the capital?",
        "answer": "Paris is the capital",
        "sources": [{"url": "https://x", "title": "France", "relevance_score": 0.9}],
        "has_sources": true
    }))
}

async fn scrape(
    State(rec): State<Recorded>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let url = body["url"].as_str().unwrap_or_default().to_string();
    rec.record(&headers, body);
    if url.contains("broken") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": "Scraping failed: timeout"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({"status": "success", "title": "Home", "content_length": 1234, "method_used": "playwright"})),
    )
}

async fn bulk_scrape(State(rec): State<Recorded>, headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    rec.record(&headers, body);
    Json(json!({"status": "started", "discovered_urls_count": 12, "estimated_time": "24 seconds"}))
}

async fn stats() -> Json<Value> {
    Json(json!({"document_count": 42, "status": "ready", "last_updated": "2024-05-01T12:00:00"}))
}

async fn clear() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({"detail": [{"loc": ["body"], "msg": "field required"}]})),
    )
}

async fn upload(State(rec): State<Recorded>, mut multipart: Multipart) -> Json<Value> {
    let mut filename = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            filename = field.file_name().unwrap_or_default().to_string();
        }
        let data = field.bytes().await.unwrap();
        rec.upload_fields.lock().unwrap().push((name, data.len()));
    }
    Json(json!({"filename": filename, "format": "text", "content_length": 10, "stored_in_knowledge": true}))
}

async fn spawn_server() -> (String, Recorded) {
    let recorded = Recorded::default();
    let app = Router::new()
        .route("/api/rag-widget/widget/query", post(query))
        .route("/api/rag-widget/widget/scrape", post(scrape))
        .route("/api/rag-widget/widget/bulk-scrape", post(bulk_scrape))
        .route("/api/rag-widget/widget/knowledge-stats", get(stats))
        .route("/api/rag-widget/widget/clear-knowledge", delete(clear))
        .route("/api/rag-widget/widget/upload-file", post(upload))
        .with_state(recorded.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/rag-widget/widget", addr), recorded)
}

#[tokio::test]
async fn test_query_sends_wire_fields_and_parses_answer() {
    let (endpoint, recorded) = spawn_server().await;
    let client = WidgetApiClient::new(endpoint);

    let answer = client
        .query(&QueryRequest {
            query: "What is the capital?".to_string(),
            max_results: 5,
            include_sources: true,
        })
        .await
        .expect("query should succeed");

    assert_eq!(answer.answer.as_deref(), Some("Paris is the capital"));
    let sources = answer.sources.unwrap();
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].relevance_score, 0.9);

    let bodies = recorded.bodies.lock().unwrap();
    assert_eq!(
        bodies[0],
        json!({"query": "What is the capital?", "max_results": 5, "include_sources": true})
    );
}

#[tokio::test]
async fn test_bearer_token_is_attached_when_present() {
    let (endpoint, recorded) = spawn_server().await;
    let client = WidgetApiClient::new(endpoint)
        .with_credential_store(Arc::new(InMemoryCredentialStore::with_token("tok-123")));

    client
        .bulk_scrape(&BulkScrapeRequest {
            base_url: "https://docs.example.com".to_string(),
            max_depth: 2,
            max_urls: 50,
            auto_store: true,
        })
        .await
        .unwrap();

    assert_eq!(
        recorded.auth.lock().unwrap()[0].as_deref(),
        Some("Bearer tok-123")
    );
    assert_eq!(
        recorded.bodies.lock().unwrap()[0],
        json!({"base_url": "https://docs.example.com", "max_depth": 2, "max_urls": 50, "auto_store": true})
    );
}

#[tokio::test]
async fn test_scrape_error_keeps_backend_detail() {
    let (endpoint, _) = spawn_server().await;
    let client = WidgetApiClient::new(endpoint);

    let ok = client
        .scrape(&ScrapeRequest {
            url: "https://example.com".to_string(),
            store_in_knowledge: true,
        })
        .await
        .unwrap();
    assert_eq!(ok.title, "Home");
    assert_eq!(ok.content_length, 1234);

    let err = client
        .scrape(&ScrapeRequest {
            url: "https://broken.example.com".to_string(),
            store_in_knowledge: true,
        })
        .await
        .unwrap_err();
    assert!(err.is_backend());
    assert_eq!(err.detail(), Some("Scraping failed: timeout"));
}

#[tokio::test]
async fn test_stats_and_structured_error_detail() {
    let (endpoint, _) = spawn_server().await;
    let client = WidgetApiClient::new(endpoint);

    let stats = client.knowledge_stats().await.unwrap();
    assert_eq!(stats.document_count, 42);
    assert_eq!(stats.status, KnowledgeStatus::Ready);

    let err = client.clear_knowledge().await.unwrap_err();
    assert!(err.is_backend());
    assert!(err.detail().unwrap().contains("field required"));
}

#[tokio::test]
async fn test_upload_reports_progress_then_completion() {
    let (endpoint, recorded) = spawn_server().await;
    let client = WidgetApiClient::new(endpoint);

    let file = UploadFile::new("notes.txt", vec![b'a'; 100 * 1024]);
    let events: Vec<UploadEvent> = client.upload_file(file).collect().await;

    let (last, progress) = events.split_last().unwrap();
    match last {
        UploadEvent::Completed(receipt) => {
            assert_eq!(receipt.filename, "notes.txt");
            assert_eq!(receipt.format, "text");
        }
        other => panic!("Expected completion, got {:?}", other),
    }

    let percents: Vec<u8> = progress
        .iter()
        .map(|e| match e {
            UploadEvent::Progress(p) => *p,
            other => panic!("Unexpected event before completion: {:?}", other),
        })
        .collect();
    assert_eq!(percents.first(), Some(&0));
    assert_eq!(percents.last(), Some(&100));
    assert!(percents.windows(2).all(|w| w[0] < w[1]));

    let fields = recorded.upload_fields.lock().unwrap();
    assert!(fields.contains(&("file".to_string(), 100 * 1024)));
    assert!(fields.iter().any(|(name, _)| name == "store_in_knowledge"));
}

#[tokio::test]
async fn test_unreachable_backend_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = WidgetApiClient::new(format!("http://{}/api/rag-widget/widget", addr));
    let err = client.knowledge_stats().await.unwrap_err();
    assert!(err.is_transport());

    let events: Vec<UploadEvent> = client
        .upload_file(UploadFile::new("a.txt", b"hello".to_vec()))
        .collect()
        .await;
    assert!(matches!(events.last(), Some(UploadEvent::Failed(None))));
}

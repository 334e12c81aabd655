use std::sync::Arc;

use axum::{
    Json, Router,
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Query, RawQuery, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::api::{AttachResponse, HealthResponse, IfExists, SingleFileQuery};
use crate::config::Config;
use crate::db::{BookmarkStore, QueueStore};
use crate::error::BridgeError;
use crate::multipart::{boundary_from_content_type, parse_multipart, sanitize_filename};
use crate::notify::{Notifier, shorten_url};
use crate::upstream::{PassthroughReply, UpstreamClient};

#[derive(Clone)]
pub struct AppState {
    pub cfg: Arc<Config>,
    pub upstream: Arc<UpstreamClient>,
    pub bookmarks: Arc<BookmarkStore>,
    pub queue: Arc<QueueStore>,
    pub notifier: Arc<Notifier>,
}

impl AppState {
    pub fn from_config(cfg: Arc<Config>) -> anyhow::Result<Self> {
        let upstream = Arc::new(UpstreamClient::new(
            &cfg.upstream_base_url,
            cfg.request_timeout,
        )?);
        let bookmarks = Arc::new(BookmarkStore::new(
            cfg.bookmarks_db_path.clone(),
            cfg.db_busy_timeout_ms,
        ));
        let queue = Arc::new(QueueStore::new(
            cfg.queue_db_path.clone(),
            cfg.db_busy_timeout_ms,
        ));
        let notifier = Arc::new(Notifier::new(
            cfg.pushover_token.clone(),
            cfg.pushover_user.clone(),
        ));
        Ok(Self {
            cfg,
            upstream,
            bookmarks,
            queue,
            notifier,
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/healthz", get(healthcheck))
        .route("/", post(singlefile))
        .route("/api/v1/bookmarks/singlefile", post(singlefile))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(state.cfg.max_request_size_bytes()))
        .with_state(state)
}

pub async fn healthcheck(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        max_asset_size_mb: state.cfg.max_asset_size_mb,
        max_request_size_mb: state.cfg.max_request_size_mb,
    })
}

pub async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "Not Found" })),
    )
        .into_response()
}

pub async fn singlefile(
    State(state): State<AppState>,
    Query(query): Query<SingleFileQuery>,
    RawQuery(raw_query): RawQuery,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    match handle_singlefile(&state, query, raw_query, &headers, body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn handle_singlefile(
    state: &AppState,
    query: SingleFileQuery,
    raw_query: Option<String>,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<Response, BridgeError> {
    let auth_header = bearer_header(headers)?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("multipart/form-data")
    {
        return Err(BridgeError::UnsupportedMediaType(
            "Content-Type must be multipart/form-data".into(),
        ));
    }
    let boundary = boundary_from_content_type(content_type)
        .ok_or_else(|| BridgeError::BadRequest("missing multipart boundary".into()))?;

    if let Some(declared) = declared_length(headers) {
        if declared != body.len() as u64 {
            return Err(BridgeError::BadRequest(format!(
                "request body truncated: declared {} bytes, read {}",
                declared,
                body.len()
            )));
        }
    }

    let form = parse_multipart(&body, &boundary)?;

    // Repeated fields: the last non-empty url wins, the first non-empty title.
    let source_url = form
        .fields
        .iter()
        .filter(|(k, v)| k.as_str() == "url" && !v.trim().is_empty())
        .map(|(_, v)| v.trim().to_string())
        .last()
        .ok_or_else(|| BridgeError::BadRequest("Missing url field".into()))?;
    let title = form
        .fields
        .iter()
        .find(|(k, v)| k.as_str() == "title" && !v.trim().is_empty())
        .map(|(_, v)| v.trim().to_string());

    let filename = sanitize_filename(&form.file.filename);
    let file_size = form.file.bytes.len() as u64;

    // The capture is spilled to a private temp file and streamed from there;
    // dropping the handle removes the file on every exit path.
    let temp = tempfile::NamedTempFile::new()
        .map_err(|e| BridgeError::Internal(anyhow::anyhow!("failed to create temp file: {e}")))?;
    tokio::fs::write(temp.path(), &form.file.bytes)
        .await
        .map_err(|e| BridgeError::Internal(anyhow::anyhow!("failed to spill capture: {e}")))?;

    if file_size <= state.cfg.max_asset_size_bytes() {
        tracing::info!(url = %source_url, file_size, "forwarding capture to native endpoint");
        let reply = state
            .upstream
            .forward_singlefile(
                &auth_header,
                &form.fields,
                temp.path(),
                file_size,
                &filename,
                raw_query.as_deref(),
            )
            .await?;
        return Ok(relay(reply));
    }

    let mode = IfExists::parse(query.ifexists.as_deref());
    tracing::info!(url = %source_url, file_size, ?mode, "capture exceeds asset limit, using attach path");

    let bookmark = match state
        .upstream
        .create_link_bookmark(&auth_header, &source_url, title.as_deref())
        .await
    {
        Ok(bookmark) => bookmark,
        Err(e) => {
            alert(
                &state.notifier,
                format!("large capture failed: {}\ncause: {}", shorten_url(&source_url), e),
            );
            return Err(e);
        }
    };

    if bookmark.already_exists && mode == IfExists::Skip {
        tracing::info!(bookmark_id = %bookmark.id, "bookmark already exists, skipping upload");
        return Ok((
            StatusCode::OK,
            Json(AttachResponse {
                status: "already_exists_skip",
                url: source_url,
                bookmark_id: bookmark.id,
                already_exists: true,
                asset_id: None,
                asset_size_bytes: Some(file_size),
                removed_crawler_tasks: None,
            }),
        )
            .into_response());
    }

    let asset_id = match state
        .upstream
        .upload_asset(&auth_header, temp.path(), file_size, &filename)
        .await
    {
        Ok(asset_id) => asset_id,
        Err(e) => {
            alert(
                &state.notifier,
                format!("large capture failed: {}\ncause: {}", shorten_url(&source_url), e),
            );
            return Err(e);
        }
    };

    if let Err(e) = state
        .bookmarks
        .attach_full_page_archive(&bookmark.id, &asset_id, mode.keeps_existing_archive())
        .await
    {
        alert(
            &state.notifier,
            format!("large capture failed: {}\ncause: {}", shorten_url(&source_url), e),
        );
        return Err(e);
    }

    let removed_crawler_tasks = if bookmark.already_exists {
        match state.queue.remove_recrawl_tasks(&bookmark.id).await {
            Ok(removed) => removed,
            Err(e) => {
                // The archive is attached at this point; the caller gets the
                // error anyway so the partial result can be reconciled.
                alert(
                    &state.notifier,
                    format!(
                        "large capture attached but cleanup failed: {}\ncause: {}",
                        shorten_url(&source_url),
                        e
                    ),
                );
                return Err(e);
            }
        }
    } else {
        0
    };

    alert(
        &state.notifier,
        format!(
            "large capture attached: {}\nbookmark {} asset {} ({} bytes)",
            shorten_url(&source_url),
            bookmark.id,
            asset_id,
            file_size
        ),
    );

    Ok((
        StatusCode::CREATED,
        Json(AttachResponse {
            status: "fullpage_archive_attached",
            url: source_url,
            bookmark_id: bookmark.id,
            already_exists: bookmark.already_exists,
            asset_id: Some(asset_id),
            asset_size_bytes: Some(file_size),
            removed_crawler_tasks: Some(removed_crawler_tasks),
        }),
    )
        .into_response())
}

fn bearer_header(headers: &HeaderMap) -> Result<String, BridgeError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .trim();
    if !value.to_ascii_lowercase().starts_with("bearer ") {
        return Err(BridgeError::Unauthorized("Missing Bearer token".into()));
    }
    Ok(value.to_string())
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}

fn relay(reply: PassthroughReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut response = Response::new(Body::from(reply.body));
    *response.status_mut() = status;
    if let Ok(value) = HeaderValue::from_str(&reply.content_type) {
        response.headers_mut().insert(header::CONTENT_TYPE, value);
    }
    response
}

/// Alerts never block or fail the request.
fn alert(notifier: &Arc<Notifier>, message: String) {
    if !notifier.enabled() {
        return;
    }
    let notifier = notifier.clone();
    tokio::spawn(async move {
        notifier.send(&message).await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{ASSET_TYPE_FULL_PAGE, ASSET_TYPE_PRECRAWLED, ASSET_TYPE_UNKNOWN};
    use axum::body::to_bytes;
    use axum::http::Request;
    use serde_json::{Value, json};
    use std::path::{Path, PathBuf};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BOUNDARY: &str = "bridgetestboundary";

    #[derive(Clone)]
    struct MockUpstream {
        already_exists: bool,
        create_calls: Arc<AtomicUsize>,
        upload_calls: Arc<AtomicUsize>,
        forward_calls: Arc<AtomicUsize>,
    }

    async fn mock_create(State(s): State<MockUpstream>) -> Json<Value> {
        s.create_calls.fetch_add(1, Ordering::SeqCst);
        Json(json!({ "id": "b1", "alreadyExists": s.already_exists }))
    }

    async fn mock_upload(State(s): State<MockUpstream>, _body: Bytes) -> Json<Value> {
        s.upload_calls.fetch_add(1, Ordering::SeqCst);
        Json(json!({ "assetId": "a1" }))
    }

    async fn mock_forward(State(s): State<MockUpstream>, _body: Bytes) -> impl IntoResponse {
        s.forward_calls.fetch_add(1, Ordering::SeqCst);
        (
            StatusCode::CREATED,
            [("content-type", "application/json")],
            r#"{"native":true}"#,
        )
    }

    struct Fixture {
        router: Router,
        mock: MockUpstream,
        bookmarks_db: PathBuf,
        queue_db: PathBuf,
        _dir: TempDir,
    }

    async fn seed_assets(path: &Path, rows: &[(&str, Option<&str>, &str)]) {
        let db = libsql::Builder::new_local(path).build().await.unwrap();
        let conn = db.connect().unwrap();
        conn.execute(
            "CREATE TABLE assets (id TEXT PRIMARY KEY, bookmarkId TEXT, assetType TEXT NOT NULL)",
            (),
        )
        .await
        .unwrap();
        for (id, bookmark_id, asset_type) in rows {
            conn.execute(
                "INSERT INTO assets (id, bookmarkId, assetType) VALUES (?, ?, ?)",
                libsql::params![*id, *bookmark_id, *asset_type],
            )
            .await
            .unwrap();
        }
    }

    async fn seed_tasks(path: &Path, rows: &[(&str, &str)]) {
        let db = libsql::Builder::new_local(path).build().await.unwrap();
        let conn = db.connect().unwrap();
        conn.execute(
            "CREATE TABLE tasks_table (id INTEGER PRIMARY KEY AUTOINCREMENT, queue TEXT NOT NULL, payload TEXT NOT NULL)",
            (),
        )
        .await
        .unwrap();
        for (queue, payload) in rows {
            conn.execute(
                "INSERT INTO tasks_table (queue, payload) VALUES (?, ?)",
                libsql::params![*queue, *payload],
            )
            .await
            .unwrap();
        }
    }

    async fn full_page_archives(path: &Path, bookmark_id: &str) -> Vec<String> {
        let db = libsql::Builder::new_local(path).build().await.unwrap();
        let conn = db.connect().unwrap();
        let mut rows = conn
            .query(
                "SELECT id FROM assets WHERE bookmarkId = ? AND assetType = ? ORDER BY id",
                libsql::params![bookmark_id, ASSET_TYPE_FULL_PAGE],
            )
            .await
            .unwrap();
        let mut out = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            out.push(row.get::<String>(0).unwrap());
        }
        out
    }

    /// Boots a mock bookmark service on an ephemeral port and wires the
    /// bridge router at a 1 MiB asset threshold.
    async fn fixture(already_exists: bool) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let bookmarks_db = dir.path().join("bookmarks.db");
        let queue_db = dir.path().join("queue.db");
        seed_assets(&bookmarks_db, &[("a1", None, ASSET_TYPE_UNKNOWN)]).await;

        let mock = MockUpstream {
            already_exists,
            create_calls: Arc::new(AtomicUsize::new(0)),
            upload_calls: Arc::new(AtomicUsize::new(0)),
            forward_calls: Arc::new(AtomicUsize::new(0)),
        };
        let upstream_app = Router::new()
            .route("/api/v1/bookmarks", post(mock_create))
            .route("/api/v1/assets", post(mock_upload))
            .route("/api/v1/bookmarks/singlefile", post(mock_forward))
            .with_state(mock.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        tokio::spawn(async move {
            axum::serve(listener, upstream_app).await.unwrap();
        });

        let cfg = Arc::new(Config {
            max_asset_size_mb: 1,
            max_request_size_mb: 64,
            upstream_base_url: base_url,
            listen_host: "127.0.0.1".into(),
            listen_port: 0,
            request_timeout: Duration::from_secs(5),
            bookmarks_db_path: bookmarks_db.clone(),
            queue_db_path: Some(queue_db.clone()),
            db_busy_timeout_ms: 5000,
            pushover_token: None,
            pushover_user: None,
        });
        let state = AppState::from_config(cfg).unwrap();

        Fixture {
            router: router(state),
            mock,
            bookmarks_db,
            queue_db,
            _dir: dir,
        }
    }

    fn multipart_body(url: Option<&str>, file: Option<&[u8]>) -> Vec<u8> {
        let mut body = Vec::new();
        if let Some(url) = url {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"url\"\r\n\r\n{url}\r\n"
                )
                .as_bytes(),
            );
        }
        if let Some(file) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"page.html\"\r\nContent-Type: text/html\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(file);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn post_request(path_and_query: &str, body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(path_and_query)
            .header("authorization", "Bearer test-token")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_configured_limits() {
        let fx = fixture(false).await;
        let response = fx
            .router
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["maxAssetSizeMb"], 1);
        assert_eq!(body["maxRequestSizeMb"], 64);
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let fx = fixture(false).await;
        let response = fx
            .router
            .oneshot(
                Request::builder()
                    .uri("/nowhere")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn missing_bearer_token_is_401() {
        let fx = fixture(false).await;
        let body = multipart_body(Some("https://example.com"), Some(b"<html/>"));
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/bookmarks/singlefile")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        let response = fx.router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn wrong_content_type_is_415() {
        let fx = fixture(false).await;
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/bookmarks/singlefile")
            .header("authorization", "Bearer t")
            .header("content-type", "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = fx.router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn missing_url_is_400_with_no_upstream_calls() {
        let fx = fixture(false).await;
        let body = multipart_body(None, Some(b"<html/>"));
        let response = fx
            .router
            .oneshot(post_request("/api/v1/bookmarks/singlefile", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(fx.mock.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.mock.forward_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_file_is_400_with_no_upstream_calls() {
        let fx = fixture(false).await;
        let body = multipart_body(Some("https://example.com"), None);
        let response = fx
            .router
            .oneshot(post_request("/api/v1/bookmarks/singlefile", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Missing file field");
        assert_eq!(fx.mock.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.mock.forward_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn declared_length_mismatch_is_400() {
        let fx = fixture(false).await;
        let body = multipart_body(Some("https://example.com"), Some(b"<html/>"));
        let declared = body.len() as u64 + 7;
        let request = Request::builder()
            .method("POST")
            .uri("/")
            .header("authorization", "Bearer t")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header("content-length", declared.to_string())
            .body(Body::from(body))
            .unwrap();
        let response = fx.router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("truncated"));
    }

    #[tokio::test]
    async fn file_at_threshold_takes_passthrough_and_relays_reply() {
        let fx = fixture(false).await;
        let file = vec![b'x'; 1024 * 1024]; // exactly the 1 MiB threshold
        let body = multipart_body(Some("https://example.com/a"), Some(&file));
        let response = fx
            .router
            .oneshot(post_request("/api/v1/bookmarks/singlefile", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"native":true}"#);
        assert_eq!(fx.mock.forward_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fx.mock.create_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fx.mock.upload_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oversized_file_runs_the_attach_flow() {
        let fx = fixture(false).await;
        let file = vec![b'x'; 1024 * 1024 + 1];
        let body = multipart_body(Some("https://example.com/a"), Some(&file));
        let response = fx
            .router
            .oneshot(post_request("/api/v1/bookmarks/singlefile", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "fullpage_archive_attached");
        assert_eq!(body["bookmarkId"], "b1");
        assert_eq!(body["assetId"], "a1");
        assert_eq!(body["alreadyExists"], false);
        assert_eq!(body["assetSizeBytes"], 1024 * 1024 + 1);
        assert_eq!(body["removedCrawlerTasks"], 0);

        assert_eq!(fx.mock.upload_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            full_page_archives(&fx.bookmarks_db, "b1").await,
            vec!["a1".to_string()]
        );
    }

    #[tokio::test]
    async fn existing_bookmark_with_skip_mode_uploads_nothing() {
        let fx = fixture(true).await;
        let file = vec![b'x'; 1024 * 1024 + 1];
        let body = multipart_body(Some("https://example.com/a"), Some(&file));
        let response = fx
            .router
            .oneshot(post_request("/api/v1/bookmarks/singlefile?ifexists=skip", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "already_exists_skip");
        assert_eq!(body["bookmarkId"], "b1");
        assert_eq!(fx.mock.upload_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn overwrite_on_existing_bookmark_replaces_archive_and_cleans_queues() {
        let fx = fixture(true).await;
        seed_tasks(
            &fx.queue_db,
            &[
                ("crawler_queue", r#"{"bookmarkId":"b1"}"#),
                ("crawler_queue", r#"{"bookmarkId":"b9"}"#),
            ],
        )
        .await;
        // Give the existing bookmark a stale archive pair to detach.
        {
            let db = libsql::Builder::new_local(&fx.bookmarks_db)
                .build()
                .await
                .unwrap();
            let conn = db.connect().unwrap();
            conn.execute(
                "INSERT INTO assets (id, bookmarkId, assetType) VALUES (?, ?, ?), (?, ?, ?)",
                libsql::params![
                    "a-old",
                    "b1",
                    ASSET_TYPE_FULL_PAGE,
                    "a-pre",
                    "b1",
                    ASSET_TYPE_PRECRAWLED
                ],
            )
            .await
            .unwrap();
        }

        let file = vec![b'x'; 1024 * 1024 + 1];
        let body = multipart_body(Some("https://example.com/a"), Some(&file));
        let response = fx
            .router
            .oneshot(post_request(
                "/api/v1/bookmarks/singlefile?ifexists=overwrite",
                body,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["status"], "fullpage_archive_attached");
        assert_eq!(body["alreadyExists"], true);
        assert_eq!(body["removedCrawlerTasks"], 1);
        assert_eq!(
            full_page_archives(&fx.bookmarks_db, "b1").await,
            vec!["a1".to_string()]
        );
    }
}

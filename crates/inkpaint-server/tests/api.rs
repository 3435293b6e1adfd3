use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use inkpaint_core::api::RegisterRequest;
use inkpaint_core::{DrawingStore, HttpStore, StorageError};
use inkpaint_server::auth::{Claims, sign};
use inkpaint_server::{AppStateInner, Config, Database, router};
use serde_json::{Value, json};
use tower::ServiceExt;

const SECRET: &str = "test-secret";

async fn app() -> Router {
    app_with_static(None).await
}

async fn app_with_static(static_dir: Option<std::path::PathBuf>) -> Router {
    let db = Database::in_memory().await.unwrap();
    let config = Config {
        jwt_secret: SECRET.to_string(),
        static_dir,
        ..Config::default()
    };
    router(AppStateInner::new(db, config))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn register(app: &Router, username: &str) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": "secret1",
        })),
    )
    .await
}

async fn login(app: &Router, username: &str) -> String {
    register(app, username).await;
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": username, "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn save(app: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/drawings",
        Some(token),
        Some(json!({"name": name, "data": "data:image/png;base64,iVBORw0KGgo="})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Drawing saved");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn register_returns_id() {
    let app = app().await;
    let (status, body) = register(&app, "ana").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User created successfully");
    assert!(body["id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn register_rejects_duplicates() {
    let app = app().await;
    register(&app, "ana").await;

    let (status, body) = register(&app, "ana").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username or email already exists");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"username": "other", "email": "ana@example.com", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn register_validates_input() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"username": "ana", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"username": "ana", "email": "", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "All fields are required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({"username": "ana", "email": "ana@example.com", "password": "12345"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let app = app().await;
    register(&app, "ana").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "ana", "password": "wrong-password"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "nobody", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "ana"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_token_is_accepted_by_verify() {
    let app = app().await;
    register(&app, "ana").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({"username": "ana", "password": "secret1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "ana");
    assert_eq!(body["user"]["email"], "ana@example.com");
    assert!(body["user"].get("password").is_none());

    let token = body["token"].as_str().unwrap();
    let (status, user) = send(&app, Method::GET, "/api/auth/verify", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["id"], body["user"]["id"]);
    assert_eq!(user["username"], "ana");
}

#[tokio::test]
async fn verify_unknown_user_is_not_found() {
    let app = app().await;
    let token = sign(SECRET, &Claims::new(404, "ghost")).unwrap();
    let (status, body) = send(&app, Method::GET, "/api/auth/verify", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/drawings", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token required");

    let request = Request::builder()
        .uri("/api/drawings")
        .header(header::AUTHORIZATION, "Bearer")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn bad_tokens_are_forbidden() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/drawings", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid or expired token");

    let forged = sign("another-secret", &Claims::new(1, "ana")).unwrap();
    let (status, _) = send(&app, Method::GET, "/api/drawings", Some(&forged), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut claims = Claims::new(1, "ana");
    claims.iat -= 8 * 24 * 3600;
    claims.exp = claims.iat + 7 * 24 * 3600;
    let expired = sign(SECRET, &claims).unwrap();
    let (status, _) = send(&app, Method::GET, "/api/drawings", Some(&expired), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn drawing_lifecycle() {
    let app = app().await;
    let token = login(&app, "ana").await;

    let first = save(&app, &token, "first").await;
    let second = save(&app, &token, "second").await;

    let (status, list) = send(&app, Method::GET, "/api/drawings", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = list.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], second);
    assert_eq!(entries[1]["id"], first);
    assert!(entries[0].get("data").is_none());
    assert!(entries[0]["created_at"].is_string());

    let (status, drawing) = send(
        &app,
        Method::GET,
        &format!("/api/drawings/{}", first),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drawing["name"], "first");
    assert_eq!(drawing["data"], "data:image/png;base64,iVBORw0KGgo=");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/drawings/{}", first),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Drawing deleted");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/drawings/{}", first),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Drawing not found");

    let (_, list) = send(&app, Method::GET, "/api/drawings", Some(&token), None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn save_requires_name_and_data() {
    let app = app().await;
    let token = login(&app, "ana").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/drawings",
        Some(&token),
        Some(json!({"name": "", "data": "data:image/png;base64,AAAA"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name and data are required");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/drawings",
        Some(&token),
        Some(json!({"name": "x"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn drawings_are_private() {
    let app = app().await;
    let ana = login(&app, "ana").await;
    let bea = login(&app, "bea").await;

    let id = save(&app, &ana, "ana's").await;

    let (_, list) = send(&app, Method::GET, "/api/drawings", Some(&bea), None).await;
    assert!(list.as_array().unwrap().is_empty());

    let uri = format!("/api/drawings/{}", id);
    let (status, _) = send(&app, Method::GET, &uri, Some(&bea), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&bea), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, drawing) = send(&app, Method::GET, &uri, Some(&ana), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(drawing["name"], "ana's");
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let app = app().await;
    let token = login(&app, "ana").await;
    let (status, _) = send(&app, Method::GET, "/api/drawings/abc", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn large_payload_is_accepted() {
    let app = app().await;
    let token = login(&app, "ana").await;
    let data = format!("data:image/png;base64,{}", "A".repeat(5 * 1024 * 1024));

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/drawings",
        Some(&token),
        Some(json!({"name": "big", "data": data})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn static_files_fall_back_to_index() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), "<h1>InkPaint</h1>").unwrap();
    std::fs::write(dir.path().join("app.css"), "body {}").unwrap();
    let app = app_with_static(Some(dir.path().to_path_buf())).await;

    for (uri, expected) in [
        ("/app.css", "body {}"),
        ("/", "<h1>InkPaint</h1>"),
        ("/gallery/42", "<h1>InkPaint</h1>"),
    ] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{}", uri);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes, expected.as_bytes(), "{}", uri);
    }
}

#[tokio::test]
async fn http_store_against_running_server() {
    let app = app().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let store = HttpStore::new(format!("http://{}/api", addr));
    let registered = store
        .register(&RegisterRequest::new("ana", "ana@example.com", "secret1"))
        .await
        .unwrap();

    assert!(matches!(store.list().await, Err(StorageError::Unauthorized(_))));

    let login = store.login("ana", "secret1").await.unwrap();
    assert_eq!(login.user.id, registered.id);
    assert_eq!(store.verify().await.unwrap().username, "ana");

    let id = store.save("sketch", "data:image/png;base64,iVBORw0KGgo=").await.unwrap();
    let list = store.list().await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].name, "sketch");

    let drawing = store.load(id).await.unwrap();
    assert_eq!(drawing.user_id, registered.id);

    store.delete(id).await.unwrap();
    assert!(matches!(store.load(id).await, Err(StorageError::NotFound(_))));
    assert!(matches!(store.delete(id).await, Err(StorageError::NotFound(_))));

    store.set_token(Some("garbage".to_string()));
    let err = store.list().await.unwrap_err();
    assert!(err.needs_login());
    assert!(matches!(err, StorageError::Forbidden(msg) if msg == "Invalid or expired token"));

    let duplicate = store
        .register(&RegisterRequest::new("ana", "ana@example.com", "secret1"))
        .await;
    assert!(matches!(duplicate, Err(StorageError::Conflict(_))));
}

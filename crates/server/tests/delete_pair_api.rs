use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use server::router;
use server::state::AppState;

fn seed_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("pairs-1.json"),
        r#"[["A0","B0"],["A1","B1"],["A2","B2"],["A3","B3"],["A4","B4"]]"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("manifest.json"),
        r#"["pairs-1.json", {"name": "Food", "file": "pairs-2.json"}]"#,
    )
    .unwrap();
    dir
}

fn app(dir: &tempfile::TempDir) -> Router {
    router(AppState::new(dir.path()))
}

fn delete_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/delete-pair")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn pairs_on_disk(dir: &tempfile::TempDir) -> Vec<Value> {
    let text = std::fs::read_to_string(dir.path().join("pairs-1.json")).unwrap();
    match serde_json::from_str(&text).unwrap() {
        Value::Array(rows) => rows,
        other => panic!("expected array, got {other}"),
    }
}

#[tokio::test]
async fn delete_pair_removes_exactly_one_element() {
    let dir = seed_dir();
    let response = app(&dir)
        .oneshot(delete_request(r#"{"filename":"pairs-1.json","index":1}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let rows = pairs_on_disk(&dir);
    assert_eq!(rows.len(), 4);
    // The element at position 1 is gone; later elements shifted down.
    assert_eq!(rows[1][0], "A2");
    assert_eq!(rows[3][0], "A4");
}

#[tokio::test]
async fn out_of_range_index_is_rejected() {
    let dir = seed_dir();
    let app = app(&dir);

    let ok = app
        .clone()
        .oneshot(delete_request(r#"{"filename":"pairs-1.json","index":1}"#))
        .await
        .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    // The file now has 4 elements, so 10 is out of range.
    let bad = app
        .oneshot(delete_request(r#"{"filename":"pairs-1.json","index":10}"#))
        .await
        .unwrap();
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    assert_eq!(pairs_on_disk(&dir).len(), 4);
}

#[tokio::test]
async fn negative_index_is_rejected() {
    let dir = seed_dir();
    let response = app(&dir)
        .oneshot(delete_request(r#"{"filename":"pairs-1.json","index":-1}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_fields_are_rejected() {
    let dir = seed_dir();
    let app = app(&dir);

    let no_index = app
        .clone()
        .oneshot(delete_request(r#"{"filename":"pairs-1.json"}"#))
        .await
        .unwrap();
    assert_eq!(no_index.status(), StatusCode::BAD_REQUEST);

    let empty = app.oneshot(delete_request("{}")).await.unwrap();
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn traversal_filenames_are_forbidden() {
    let dir = seed_dir();
    let app = app(&dir);

    for filename in ["../pairs-1.json", "secrets.txt", "a/b.json"] {
        let response = app
            .clone()
            .oneshot(delete_request(&format!(
                r#"{{"filename":"{filename}","index":0}}"#
            )))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::FORBIDDEN,
            "filename {filename} should be forbidden"
        );
    }
}

#[tokio::test]
async fn missing_file_is_an_internal_error() {
    let dir = seed_dir();
    let response = app(&dir)
        .oneshot(delete_request(r#"{"filename":"absent.json","index":0}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn non_post_method_is_rejected() {
    let dir = seed_dir();
    let response = app(&dir)
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/delete-pair")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn manifest_and_pair_files_are_served() {
    let dir = seed_dir();
    let app = app(&dir);

    let manifest = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/manifest")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(manifest.status(), StatusCode::OK);

    let file = app
        .oneshot(
            Request::builder()
                .uri("/pairs-1.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(file.status(), StatusCode::OK);
}

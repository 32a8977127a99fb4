use api_client::{ApiClient, PhotoUpdate, RebuildState};
use httpmock::prelude::*;
use std::io::Write;

#[tokio::test]
async fn test_list_albums_roundtrip() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/photos");
        then.status(200).json_body(serde_json::json!([
            {
                "year": "2025",
                "photos": [{
                    "filename": "DSC_0001.jpg",
                    "year": "2025",
                    "date": "2025-03-14",
                    "width": 6000,
                    "height": 4000,
                    "is_hidden": false
                }]
            },
            {
                "year": "2024",
                "photos": [{
                    "filename": "DSC_0002.jpg",
                    "year": "2024",
                    "date": "2024-07-01",
                    "width": 3000,
                    "height": 2000,
                    "is_hidden": true
                }]
            }
        ]));
    });

    let client = ApiClient::new(server.url(""));
    let albums = client.list_albums().await.unwrap();
    assert_eq!(albums.len(), 2);
    assert_eq!(albums[1].photos[0].filename, "DSC_0002.jpg");
    assert!(albums[1].photos[0].is_hidden);
    mock.assert();
}

#[tokio::test]
async fn test_update_photo_sends_partial_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PUT)
            .path("/api/photos/DSC_0001.jpg")
            .json_body(serde_json::json!({
                "alt": "New alt",
                "is_hidden": true,
                "Subject": ["tag1", "tag2"]
            }));
        then.status(200)
            .json_body(serde_json::json!({ "status": "success" }));
    });

    let client = ApiClient::new(server.url(""));
    let update = PhotoUpdate {
        alt: Some("New alt".into()),
        is_hidden: Some(true),
        subject: Some(vec!["tag1".into(), "tag2".into()]),
    };
    client.update_photo("DSC_0001.jpg", &update).await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_delete_photo() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE).path("/api/photos/DSC_0001.jpg");
        then.status(200)
            .json_body(serde_json::json!({ "status": "success" }));
    });

    let client = ApiClient::new(server.url(""));
    client.delete_photo("DSC_0001.jpg").await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_batch_set_hidden_body() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/photos/batch")
            .json_body(serde_json::json!({
                "filenames": ["a.jpg", "b.jpg"],
                "updates": { "is_hidden": true }
            }));
        then.status(200)
            .json_body(serde_json::json!({ "status": "success" }));
    });

    let client = ApiClient::new(server.url(""));
    let filenames = vec!["a.jpg".to_string(), "b.jpg".to_string()];
    client.batch_set_hidden(&filenames, true).await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn test_upload_photo_multipart() {
    let mut file = tempfile::Builder::new().suffix(".jpg").tempfile().unwrap();
    writeln!(file, "not really a jpeg").unwrap();
    let path = file.path().to_path_buf();
    let filename = path.file_name().unwrap().to_string_lossy().to_string();

    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/photos/upload")
            .body_contains("not really a jpeg");
        then.status(200).json_body(serde_json::json!({
            "status": "success",
            "filename": filename,
            "year": "2025"
        }));
    });

    let client = ApiClient::new(server.url(""));
    let resp = client.upload_photo(&path).await.unwrap();
    assert_eq!(resp.year, "2025");
    mock.assert();
}

#[tokio::test]
async fn test_rebuild_conflict_is_error() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/rebuild");
        then.status(409).body("Rebuild is already running");
    });

    let client = ApiClient::new(server.url(""));
    let err = client.start_rebuild().await.unwrap_err();
    assert!(err.to_string().contains("already running"));
    mock.assert();
}

#[tokio::test]
async fn test_rebuild_status_poll() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/rebuild/status");
        then.status(200).json_body(serde_json::json!({
            "status": "completed",
            "progress": 100,
            "message": "Rebuild completed successfully",
            "logs": ["done"]
        }));
    });

    let client = ApiClient::new(server.url(""));
    let status = client.rebuild_status().await.unwrap();
    assert_eq!(status.status, RebuildState::Completed);
    assert_eq!(status.progress, 100);
    mock.assert();
}

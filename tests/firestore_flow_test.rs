use anyhow::Result;
use content_admin::core::Collection;
use content_admin::{
    AdminError, BlogDraft, BlogPost, CloudinaryUploader, CollectionAdapter, ContentService,
    FirebaseAuth, FirestoreStore, SessionHandle, SessionManager, UploadFile,
};
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;

const DOCS: &str = "/v1/projects/blog-admin/databases/(default)/documents";

async fn sign_in(server: &MockServer, session: &SessionHandle) -> Result<()> {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/accounts:signInWithPassword");
            then.status(200).json_body(json!({
                "localId": "uid-1",
                "email": "admin@example.com",
                "idToken": "id-token-1"
            }));
        })
        .await;

    let manager = SessionManager::new(
        FirebaseAuth::new(server.base_url(), "web-key"),
        session.clone(),
    );
    manager.sign_in("admin@example.com", "pw").await?;
    Ok(())
}

fn service(
    server: &MockServer,
    session: &SessionHandle,
) -> ContentService<FirestoreStore, CloudinaryUploader> {
    let store = FirestoreStore::new(server.url("/v1"), "blog-admin", "(default)", session.clone())
        .with_api_key("web-key");
    let uploader = CloudinaryUploader::new(server.base_url(), "demo-cloud", "preset");
    ContentService::new(Arc::new(store), Arc::new(uploader), session.clone())
}

#[tokio::test]
async fn test_publish_blog_uploads_then_commits() -> Result<()> {
    let server = MockServer::start_async().await;
    let session = SessionHandle::new();
    sign_in(&server, &session).await?;

    let upload_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1_1/demo-cloud/image/upload");
            then.status(200).json_body(json!({
                "secure_url": "https://res.cloudinary.com/demo-cloud/image/upload/v1/cover.png",
                "original_filename": "cover",
                "format": "png",
                "bytes": 3,
                "created_at": "2024-06-01T00:00:00Z"
            }));
        })
        .await;

    let commit_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path(format!("{}:commit", DOCS))
                .header("authorization", "Bearer id-token-1")
                .body_contains("/documents/blogs/")
                .body_contains(
                    "\"imageUrl\":{\"stringValue\":\"https://res.cloudinary.com/demo-cloud/image/upload/v1/cover.png\"}",
                )
                .body_contains(
                    "\"hashtags\":{\"arrayValue\":{\"values\":[{\"stringValue\":\"a\"},{\"stringValue\":\"b\"}]}}",
                );
            then.status(200).json_body(json!({
                "writeResults": [{ "updateTime": "2024-06-01T00:00:01Z" }],
                "commitTime": "2024-06-01T00:00:01Z"
            }));
        })
        .await;

    let mut draft = BlogDraft::new("T", "S", "C");
    draft.add_hashtag("a");
    draft.add_hashtag("b");
    let image = UploadFile::new("cover.png", vec![1, 2, 3]);

    service(&server, &session)
        .create_blog(draft, Some(&image))
        .await?;

    upload_mock.assert_async().await;
    commit_mock.assert_async().await;
    Ok(())
}

#[tokio::test]
async fn test_failed_upload_never_reaches_the_store() -> Result<()> {
    let server = MockServer::start_async().await;
    let session = SessionHandle::new();
    sign_in(&server, &session).await?;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1_1/demo-cloud/image/upload");
            then.status(200).json_body(json!({ "bytes": 3 }));
        })
        .await;
    let commit_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("{}:commit", DOCS));
            then.status(200).json_body(json!({}));
        })
        .await;

    let err = service(&server, &session)
        .create_blog(
            BlogDraft::new("T", "S", "C"),
            Some(&UploadFile::new("cover.png", vec![1])),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::Upload));
    commit_mock.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_delete_then_refetch_reflects_removal() -> Result<()> {
    let server = MockServer::start_async().await;
    let session = SessionHandle::new();
    sign_in(&server, &session).await?;

    server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path(format!("{}/blogs/b2", DOCS))
                .query_param("currentDocument.exists", "true");
            then.status(200).json_body(json!({}));
        })
        .await;
    let query_mock = server
        .mock_async(|when, then| {
            when.method(POST).path(format!("{}:runQuery", DOCS));
            then.status(200).json_body(json!([{
                "document": {
                    "name": "projects/blog-admin/databases/(default)/documents/blogs/b1",
                    "fields": {
                        "title": { "stringValue": "Remaining" },
                        "createdAt": { "timestampValue": "2024-06-01T00:00:00Z" }
                    }
                }
            }]));
        })
        .await;

    let service = service(&server, &session);
    let adapter: CollectionAdapter<FirestoreStore, BlogPost> = service.adapter();
    let state = service.delete_and_refresh(&adapter, "b2").await?;

    query_mock.assert_async().await;
    assert_eq!(state.records.len(), 1);
    assert_eq!(state.records[0].title, "Remaining");
    assert_eq!(state.records[0].created_at.to_string(), "June 1, 2024");
    Ok(())
}

#[tokio::test]
async fn test_read_failure_is_reported_as_empty_list() -> Result<()> {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path(format!("{}:runQuery", DOCS));
            then.status(500).body("internal");
        })
        .await;

    let state = service(&server, &SessionHandle::new())
        .adapter::<BlogPost>()
        .fetch_all()
        .await;

    assert!(state.records.is_empty());
    assert!(!state.loading);
    Ok(())
}

#[tokio::test]
async fn test_delete_of_missing_message_surfaces_failure() -> Result<()> {
    let server = MockServer::start_async().await;
    let session = SessionHandle::new();
    sign_in(&server, &session).await?;

    server
        .mock_async(|when, then| {
            when.method(DELETE).path(format!("{}/messages/gone", DOCS));
            then.status(404).json_body(json!({
                "error": { "code": 404, "message": "No document to update: gone", "status": "NOT_FOUND" }
            }));
        })
        .await;

    let err = service(&server, &session)
        .delete(Collection::Messages, "gone")
        .await
        .unwrap_err();

    assert!(matches!(err, AdminError::NotFound { .. }));
    assert_eq!(
        err.user_message(),
        "That record no longer exists. Nothing was deleted."
    );
    Ok(())
}

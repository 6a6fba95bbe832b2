// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Client integration tests with wiremock.

use isyourday_client::{
    ApiClient, ApiConfig, ApiError, EmailHistoryQuery, EmailHistorySearchType, EmailReceiverType,
    EventPublic, FilePart, FileRangeRole, LoginForm, SendEmail, Session, Token, UploadFiles,
    VirtualUserPublic, cancelable,
};
use serde_json::json;
use wiremock::matchers::{
    body_json, body_string_contains, header, header_regex, method, path, query_param,
};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: &str = "7d0b6f8e-2f52-4c4a-9f0e-4c0d4a5e8c11";

fn virtual_user() -> serde_json::Value {
    json!({
        "id": USER_ID,
        "real_name": "Alice",
        "sex": 2,
        "birthday": "1990-05-01T00:00:00",
        "tel": "123456",
        "prompt": null,
        "location": "Shanghai",
        "QQ": "10001",
        "wechat": null,
        "identify": null,
        "is_active": true,
        "email": "alice@example.com",
        "updated_at": "2025-06-01T10:20:30",
        "created_at": "2025-06-01T10:20:30"
    })
}

fn logged_in_session() -> Session {
    let session = Session::in_memory();
    session
        .store_token(&Token {
            access_token: "abc".to_string(),
            token_type: "bearer".to_string(),
        })
        .expect("Failed to store token");
    session
}

fn client(server: &MockServer, session: Session) -> ApiClient {
    ApiClient::new(ApiConfig::new(server.uri()), session).expect("Failed to create client")
}

#[tokio::test]
#[ignore = "require network"]
async fn client_get_virtual_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/isyourday/user/{USER_ID}")))
        .and(header("Authorization", "bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(virtual_user()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let user = client
        .virtual_users()
        .get(USER_ID)
        .await
        .expect("Failed to get user");
    assert_eq!(user.real_name, "Alice");
    assert_eq!(user.qq.as_deref(), Some("10001"));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_omits_authorization_without_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/isyourday/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, Session::in_memory());
    let page = client
        .virtual_users()
        .list_all()
        .await
        .expect("Failed to list users");
    assert!(page.items.is_empty());

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
#[ignore = "require network"]
async fn client_list_virtual_users_paginated() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/isyourday/users"))
        .and(query_param("skip", "10"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [virtual_user()],
            "pagination": {
                "skip": 10, "limit": 10, "total": 11, "page": 2,
                "total_pages": 2, "has_next": false, "has_prev": true
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let page = client
        .virtual_users()
        .list(10, 10)
        .await
        .expect("Failed to list users");
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total(), 11);
    assert!(!page.has_next());
}

#[tokio::test]
#[ignore = "require network"]
async fn client_delete_virtual_users_sends_id_array() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/isyourday/users/batch"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!(["id1", "id2"])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "成功删除用户"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let msg = client
        .virtual_users()
        .delete_batch(&["id1", "id2"])
        .await
        .expect("Failed to delete users");
    assert_eq!(msg.message, "成功删除用户");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_update_forwards_payload_unchanged() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/isyourday/user/{USER_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(virtual_user()))
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path(format!("/isyourday/user/{USER_ID}")))
        .and(body_json(json!({
            "real_name": "Alice",
            "sex": 2,
            "birthday": "1990-05-01T00:00:00",
            "tel": "123456",
            "location": "Shanghai",
            "QQ": "10001",
            "email": "alice@example.com"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(virtual_user()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let users = client.virtual_users();
    let user = users.get(USER_ID).await.expect("Failed to get user");
    let updated = users
        .update(USER_ID, &VirtualUserPublic::from(&user))
        .await
        .expect("Failed to update user");
    assert_eq!(updated, user);
}

#[tokio::test]
#[ignore = "require network"]
async fn client_create_event() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(format!("/isyourday/user/{USER_ID}/events")))
        .and(body_json(json!({"title": "Birthday"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "0b7e8d1c-3a4b-4c5d-8e9f-0a1b2c3d4e5f",
            "user_id": USER_ID,
            "title": "Birthday",
            "description": null,
            "prompt": null,
            "start_time": null,
            "end_time": null,
            "created_at": "2025-06-01T10:20:30"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let event = client
        .events()
        .create(
            USER_ID,
            &EventPublic {
                title: "Birthday".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to create event");
    assert_eq!(event.title, "Birthday");
    assert_eq!(event.user_id.to_string(), USER_ID);
}

#[tokio::test]
#[ignore = "require network"]
async fn client_upload_is_multipart() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/file/upload"))
        .and(header("Authorization", "bearer abc"))
        .and(body_string_contains("name=\"files\"; filename=\"hello.txt\""))
        .and(body_string_contains("hello world"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "summary": {
                "total_files": 1, "uploaded_count": 1,
                "failed_count": 0, "skipped_count": 0
            },
            "uploaded_files": [{
                "id": "0b7e8d1c-3a4b-4c5d-8e9f-0a1b2c3d4e5f",
                "name": "hello.txt",
                "md5": "5eb63bbbe01eeed093cb22bb8f5acdc3",
                "is_public": false,
                "path": "files/user",
                "size": 11,
                "uploader_id": USER_ID,
                "upload_time": "2025-06-01T10:20:30"
            }],
            "failed_files": [],
            "skipped_files": []
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let report = client
        .files()
        .upload(UploadFiles::new(vec![FilePart::new(
            "hello.txt",
            b"hello world".to_vec(),
        )]))
        .await
        .expect("Failed to upload");
    assert_eq!(report.summary.uploaded_count, 1);
    assert_eq!(report.uploaded_files[0].name, "hello.txt");

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|a| a.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_list_files_in_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/file/list/private"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let page = client
        .files()
        .list(FileRangeRole::Private, 0, 10)
        .await
        .expect("Failed to list files");
    assert!(page.items.is_empty());
}

#[tokio::test]
#[ignore = "require network"]
async fn client_chunked_upload_shares_file_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/file/upload/chunk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chunk_index": 2,
            "uploaded": true,
            "uploaded_chunks": 3,
            "total_chunks": 3,
            "is_complete": true
        })))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let receipt = client
        .files()
        .upload_chunked("data.bin", &[0u8; 10], 4, false)
        .await
        .expect("Failed to upload chunks");
    assert!(receipt.is_complete);

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    let bodies: Vec<String> = requests
        .iter()
        .map(|a| String::from_utf8_lossy(&a.body).into_owned())
        .collect();
    for (i, body) in bodies.iter().enumerate() {
        assert!(body.contains("name=\"total_chunks\"\r\n\r\n3\r\n"));
        assert!(body.contains(&format!("name=\"chunk_index\"\r\n\r\n{i}\r\n")));
    }
    let file_id = |body: &str| {
        body.split("name=\"file_id\"\r\n\r\n")
            .nth(1)
            .and_then(|a| a.split("\r\n").next())
            .map(str::to_string)
    };
    assert!(file_id(&bodies[0]).is_some());
    assert_eq!(file_id(&bodies[0]), file_id(&bodies[2]));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_download_sends_range_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/file/f1/download"))
        .and(header("Range", "bytes=0-3"))
        .respond_with(ResponseTemplate::new(206).set_body_bytes(b"abcd".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let bytes = client
        .files()
        .download(
            "f1",
            Some(isyourday_client::ByteRange {
                start: 0,
                end: Some(3),
            }),
        )
        .await
        .expect("Failed to download");
    assert_eq!(bytes, b"abcd");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_login_stores_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok",
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .and(header("Authorization", "bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "username": "alice",
            "email": "alice@example.com",
            "avatar_id": null,
            "active": true,
            "is_superuser": false,
            "is_stuff": false
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, Session::in_memory());
    assert!(!client.session().is_authenticated());

    client
        .auth()
        .login(&LoginForm::new("alice", "secret"))
        .await
        .expect("Failed to login");
    assert!(client.session().is_authenticated());

    let me = client.auth().me().await.expect("Failed to get current user");
    assert_eq!(me.username, "alice");

    client.auth().logout().expect("Failed to logout");
    assert!(!client.session().is_authenticated());
}

#[tokio::test]
#[ignore = "require network"]
async fn client_delete_accounts_repeats_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/auth/delete/batch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    client
        .auth()
        .delete_batch(&["a", "b"])
        .await
        .expect("Failed to delete accounts");

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    assert_eq!(requests[0].url.query(), Some("user_pk=a&user_pk=b"));
}

#[tokio::test]
#[ignore = "require network"]
async fn client_send_email_to_virtual_users() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/send-email/isyourday"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("<p>Hi</p>"))
        .and(body_string_contains(r#"name="files_in_store""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "queued",
            "email_history_id": "h1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let mut email = SendEmail::new(vec![USER_ID.to_string()], "Hello", "<p>Hi</p>");
    email.files_in_store.push("f1".to_string());
    let queued = client
        .email()
        .send(EmailReceiverType::IsYourDay, email)
        .await
        .expect("Failed to send email");
    assert_eq!(queued.email_history_id, "h1");

    let requests = mock_server
        .received_requests()
        .await
        .expect("Failed to record requests");
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
#[ignore = "require network"]
async fn client_search_email_history() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/send-email/history/subject_search"))
        .and(query_param("q", "Hello"))
        .and(query_param("skip", "0"))
        .and(query_param("limit", "10"))
        .and(query_param("global_search", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let query = EmailHistoryQuery {
        q: Some("Hello".to_string()),
        ..EmailHistoryQuery::default()
    };
    let page = client
        .email()
        .history(EmailHistorySearchType::Subject, &query)
        .await
        .expect("Failed to search history");
    assert!(page.items.is_empty());
}

#[tokio::test]
#[ignore = "require network"]
async fn client_surfaces_validation_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/isyourday/user"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{
                "loc": ["body", 0, "email"],
                "msg": "field required",
                "type": "missing"
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let err = client
        .virtual_users()
        .create(&[VirtualUserPublic::default()])
        .await
        .expect_err("Expected validation error");
    match err {
        ApiError::Validation(e) => {
            assert_eq!(e.detail.len(), 1);
            assert_eq!(e.to_string(), "body.0.email: field required");
        }
        other => panic!("Expected validation error, got {other:?}"),
    }
}

#[tokio::test]
#[ignore = "require network"]
async fn client_surfaces_server_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/isyourday/user/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "用户不存在"})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let err = client
        .virtual_users()
        .get("missing")
        .await
        .expect_err("Expected not found");
    assert_eq!(err.status().map(|a| a.as_u16()), Some(404));
    assert_eq!(err.to_string(), "Request failed with 404 Not Found: 用户不存在");
}

#[tokio::test]
#[ignore = "require network"]
async fn client_call_can_be_cancelled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/me"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, logged_in_session());
    let auth = client.auth();
    let (call, handle) = cancelable(auth.me());
    handle.cancel();
    assert!(matches!(call.await, Err(ApiError::Cancelled)));
}

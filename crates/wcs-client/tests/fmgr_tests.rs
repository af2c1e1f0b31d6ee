//! File management client against a mock management host

use wcs_client::{Auth, Fmgr, FmgrOptions, FmgrTask, Settings};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings_for(server: &MockServer) -> Settings {
    Settings {
        access_key: "AK".to_string(),
        secret_key: "SK".to_string(),
        mgr_url: server.uri(),
        connection_retries: 0,
        connection_timeout: 5,
        ..Default::default()
    }
}

#[tokio::test]
async fn test_move_is_signed_form_post() {
    let server = MockServer::start().await;
    let body = "fops=resource%2Fa";
    let token = Auth::new("AK", "SK")
        .management_token(&format!("{}/fmgr/move", server.uri()), body)
        .unwrap();

    Mock::given(method("POST"))
        .and(path("/fmgr/move"))
        .and(header("Authorization", token.as_str()))
        .and(header("Content-Type", "application/x-www-form-urlencoded"))
        .and(body_string(body))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"persistentId":"task-1"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let fmgr = Fmgr::new(&settings_for(&server)).unwrap();
    let response = fmgr.fmgr_move("resource/a", FmgrOptions::new()).await.unwrap();

    assert!(response.is_success());
    let task: FmgrTask = response.json().unwrap();
    assert_eq!(task.persistent_id, "task-1");
}

#[tokio::test]
async fn test_notify_url_and_separate_forwarded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fmgr/copy"))
        .and(body_string(
            "fops=f&notifyURL=aHR0cDovL2EuY29tL2NiP3g9MQ%3D%3D&separate=1",
        ))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let fmgr = Fmgr::new(&settings_for(&server)).unwrap();
    let options = FmgrOptions::new()
        .with_notify_url("http://a.com/cb?x=1")
        .with_separate("1");
    let response = fmgr.fmgr_copy("f", options).await.unwrap();
    assert_eq!(response.status, 200);
}

#[tokio::test]
async fn test_each_operation_hits_its_endpoint() {
    let server = MockServer::start().await;
    for endpoint in ["fetch", "delete", "deletem3u8", "deletePrefix"] {
        Mock::given(method("POST"))
            .and(path(format!("/fmgr/{}", endpoint)))
            .respond_with(ResponseTemplate::new(200).set_body_string(endpoint))
            .expect(1)
            .mount(&server)
            .await;
    }

    let fmgr = Fmgr::new(&settings_for(&server)).unwrap();
    let fetch = fmgr
        .fmgr_fetch("f", FmgrOptions::new().with_force("1"))
        .await
        .unwrap();
    assert_eq!(fetch.body, "fetch");
    assert_eq!(fmgr.fmgr_delete("f", FmgrOptions::new()).await.unwrap().body, "delete");
    assert_eq!(fmgr.m3u8_delete("f", FmgrOptions::new()).await.unwrap().body, "deletem3u8");
    assert_eq!(fmgr.prefix_delete("bucket=b&prefix=p").await.unwrap().body, "deletePrefix");
}

#[tokio::test]
async fn test_status_is_plain_get() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/fmgr/status"))
        .and(query_param("persistentId", "task 1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"code":3}"#))
        .expect(1)
        .mount(&server)
        .await;

    let fmgr = Fmgr::new(&settings_for(&server)).unwrap();
    let response = fmgr.status("task 1").await.unwrap();
    assert_eq!(response.body, r#"{"code":3}"#);
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/fmgr/delete"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let fmgr = Fmgr::new(&settings_for(&server)).unwrap();
    let response = fmgr.fmgr_delete("f", FmgrOptions::new()).await.unwrap();
    assert_eq!(response.status, 401);
    assert!(!response.is_success());
    assert_eq!(response.body, "bad token");
}

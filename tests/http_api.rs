//! `HttpApi` against a wiremock server mounted under the default base path.

use adminw::api::{AdminApi, ApiError, HttpApi};
use adminw::model::{ExecutionStatus, NewUser, ResultStatus};
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE_PATH: &str = "/openliberty-demo/api";

fn api(server: &MockServer) -> HttpApi {
    let base = format!("{}{BASE_PATH}", server.uri());
    HttpApi::new(base.parse().unwrap()).unwrap()
}

fn api_path(rest: &str) -> String {
    format!("{BASE_PATH}{rest}")
}

#[tokio::test]
async fn health_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/health")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "UP",
            "service": "user-service",
            "version": "1.0.0"
        })))
        .mount(&server)
        .await;

    let health = api(&server).health().await.unwrap();
    assert!(health.is_up());
    assert_eq!(health.service.as_deref(), Some("user-service"));
}

#[tokio::test]
async fn list_users_tolerates_null_full_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/users")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "username": "john_doe", "email": "john@example.com", "fullName": "John Doe"},
            {"id": 2, "username": "ghost", "email": "ghost@example.com", "fullName": null}
        ])))
        .mount(&server)
        .await;

    let users = api(&server).list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].display_name(), "John Doe");
    assert_eq!(users[1].full_name, "");
    assert_eq!(users[1].display_name(), "No name");
}

#[tokio::test]
async fn create_user_posts_camel_case_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("/users")))
        .and(body_json(json!({
            "username": "ann",
            "email": "ann@example.com",
            "fullName": "Ann Lee"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let user = NewUser {
        username: "ann".to_string(),
        email: "ann@example.com".to_string(),
        full_name: "Ann Lee".to_string(),
    };
    api(&server).create_user(&user).await.unwrap();
}

#[tokio::test]
async fn create_user_failure_is_a_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("/users")))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = api(&server).create_user(&NewUser::default()).await.unwrap_err();
    assert!(matches!(err, ApiError::Status(StatusCode::CONFLICT)), "got {err:?}");
}

#[tokio::test]
async fn delete_user_targets_id() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(api_path("/users/42")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api(&server).delete_user(42).await.unwrap();
}

#[tokio::test]
async fn search_sends_username_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/users/search")))
        .and(query_param("username", "bob smith"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(
            {"id": 3, "username": "bob smith", "email": "bob@example.com", "fullName": "Bob"}
        )))
        .mount(&server)
        .await;

    let user = api(&server).find_user("bob smith").await.unwrap();
    assert_eq!(user.id, 3);
}

#[tokio::test]
async fn search_miss_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/users/search")))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = api(&server).find_user("nobody").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn available_tests_decodes_class_map() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/tests/available")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "testClasses": {
                "UserServiceTest": ["testCreateUser", "testGetAllUsers"],
                "UserResourceIT": ["testHealthEndpoint"]
            }
        })))
        .mount(&server)
        .await;

    let available = api(&server).available_tests().await.unwrap();
    let classes: Vec<&String> = available.test_classes.keys().collect();
    assert_eq!(classes, ["UserResourceIT", "UserServiceTest"]);
    assert_eq!(available.methods("UserServiceTest").len(), 2);
}

#[tokio::test]
async fn run_all_returns_execution_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("/tests/run")))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "executionId": "5b1f0c2e-aaaa-bbbb-cccc-000000000001",
            "status": "STARTED",
            "message": "Test execution started"
        })))
        .mount(&server)
        .await;

    let started = api(&server).run_all().await.unwrap();
    assert_eq!(started.execution_id, "5b1f0c2e-aaaa-bbbb-cccc-000000000001");
}

#[tokio::test]
async fn run_one_puts_class_and_method_in_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(api_path("/tests/run/UserServiceTest/testCreateUser")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"executionId": "e-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let started = api(&server)
        .run_one("UserServiceTest", "testCreateUser")
        .await
        .unwrap();
    assert_eq!(started.execution_id, "e-1");
}

#[tokio::test]
async fn execution_decodes_results() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/tests/execution/e-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "e-1",
            "status": "COMPLETED",
            "startTime": "2024-06-01T10:00:00.123",
            "endTime": "2024-06-01T10:00:02",
            "output": "Running UserService tests...\nTests completed.\n",
            "results": [
                {"testClass": "UserServiceTest", "testMethod": "testCreateUser",
                 "status": "PASSED", "duration": 15, "timestamp": "2024-06-01T10:00:01"},
                {"testClass": "UserServiceTest", "testMethod": "testDeleteUser",
                 "status": "FAILED", "message": "expected 204", "duration": 7,
                 "stackTrace": "java.lang.AssertionError: expected 204"}
            ]
        })))
        .mount(&server)
        .await;

    let execution = api(&server).execution("e-1").await.unwrap();
    assert_eq!(execution.status, ExecutionStatus::Completed);
    assert_eq!(execution.results.len(), 2);
    assert_eq!(execution.results[1].status, ResultStatus::Failed);
    assert_eq!(execution.status_message(), "Completed: 1/2 tests passed");
}

#[tokio::test]
async fn executions_missing_output_defaults_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/tests/executions")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "e-2", "status": "RUNNING", "output": null, "results": null},
            {"id": "e-1", "status": "SOMETHING_NEW"}
        ])))
        .mount(&server)
        .await;

    let executions = api(&server).executions().await.unwrap();
    assert_eq!(executions[0].output, "");
    assert!(executions[0].results.is_empty());
    assert_eq!(executions[1].status, ExecutionStatus::Unknown);
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(api_path("/tests/execution/e-1")))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = api(&server).execution("e-1").await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)), "got {err:?}");
}

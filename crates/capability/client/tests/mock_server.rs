use axum::extract::{Path, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use chrono::{TimeZone, Utc};
use domain::{
    Material, PermissionDiff, PermissionMap, ReportDraft, Tank, TaxonomyError, ValidationError,
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use wine_client::{ApiClient, ApiError, REQUEST_ID_HEADER, WineApi};

#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    authorization: Option<String>,
    request_id: Option<String>,
}

#[derive(Clone, Default)]
struct Recorder {
    requests: Arc<Mutex<Vec<Recorded>>>,
    bodies: Arc<Mutex<Vec<Value>>>,
}

impl Recorder {
    fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    fn last_body(&self) -> Option<Value> {
        self.bodies.lock().unwrap().last().cloned()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

async fn record(State(recorder): State<Recorder>, request: Request, next: Next) -> Response {
    let recorded = Recorded {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        authorization: header(request.headers(), "authorization"),
        request_id: header(request.headers(), REQUEST_ID_HEADER),
    };
    recorder.requests.lock().unwrap().push(recorded);
    next.run(request).await
}

fn message(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "message": text }))).into_response()
}

async fn capture(State(recorder): State<Recorder>, Json(body): Json<Value>) -> Response {
    recorder.bodies.lock().unwrap().push(body);
    message(StatusCode::OK, "ok")
}

async fn login(Path(system_id): Path<i64>, Json(body): Json<Value>) -> Response {
    if body["systemId"] != json!(system_id) || body["password"] != json!("secret") {
        return message(StatusCode::UNAUTHORIZED, "Invalid password");
    }
    Json(json!({ "token": "token-abc" })).into_response()
}

async fn my_name(headers: HeaderMap) -> Response {
    match headers.get("authorization").and_then(|value| value.to_str().ok()) {
        Some("Bearer token-abc") => Json(json!("maria")).into_response(),
        _ => message(StatusCode::UNAUTHORIZED, "Unauthorized"),
    }
}

async fn spawn() -> (WineApi, Recorder) {
    let recorder = Recorder::default();
    let app = Router::new()
        .route(
            "/systems",
            get(|| async { Json(json!([{"id": 1, "name": "Bodega", "year": 2025}])) })
                .post(|| async { message(StatusCode::BAD_REQUEST, "duplicate key") }),
        )
        .route(
            "/systems/:id",
            get(|| async { (StatusCode::BAD_GATEWAY, "<html>upstream down</html>") }),
        )
        .route("/systems/:id/login", post(login))
        .route(
            "/systems/:id/users",
            get(|| async {
                Json(json!([{"id": 2, "name": "maria", "role_id": 1, "is_enabled": true}]))
            })
            .post(capture),
        )
        .route("/users/me/name", get(my_name))
        .route(
            "/users/me/password",
            put(|| async { message(StatusCode::BAD_REQUEST, "password mismatch") }),
        )
        .route("/roles/:id", patch(capture))
        .route(
            "/works",
            get(|| async { Json(json!([{"id": 1, "name": "Harvest"}, {"id": 2, "name": "Cellar"}])) }),
        )
        .route(
            "/operations",
            get(|| async {
                Json(json!([
                    {"id": 1, "name": "Pressing", "work_id": 1},
                    {"id": 9, "name": "Racking", "work_id": 2},
                    {"id": 13, "name": "Analysis", "work_id": 2}
                ]))
            }),
        )
        .route(
            "/features",
            get(|| async { Json(json!([{"id": 1, "name": "Density", "unit": "g/L"}])) }),
        )
        .route(
            "/systems/:id/reports",
            get(|| async {
                Json(json!([{
                    "id": 7,
                    "date": "2025-09-14T08:30:00.000Z",
                    "user_id": 2,
                    "work_id": 2,
                    "operation_id": 13,
                    "kind_id": 5,
                    "feature_id": 1,
                    "value": 1.5,
                    "note": "",
                    "username": "maria"
                }]))
            })
            .post(capture),
        )
        .route(
            "/backups",
            get(|| async { Json(json!({"backups": ["b1.sql", "b2.sql"]})) }).put(capture),
        )
        .route(
            "/backups/:filename",
            delete(|| async { StatusCode::NO_CONTENT }),
        )
        .layer(middleware::from_fn_with_state(recorder.clone(), record))
        .with_state(recorder.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });

    let client = ApiClient::new(&format!("http://{addr}")).expect("client");
    (WineApi::new(client), recorder)
}

#[tokio::test]
async fn bearer_header_only_when_token_is_set() {
    let (api, recorder) = spawn().await;
    api.systems().await.expect("systems");

    let mut api = api;
    api.client_mut().set_token("token-abc");
    let name = api.my_name().await.expect("name");
    assert_eq!(name, "maria");

    let requests = recorder.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].authorization, None);
    assert_eq!(requests[1].authorization.as_deref(), Some("Bearer token-abc"));
    assert!(requests.iter().all(|request| request.request_id.is_some()));
}

#[tokio::test]
async fn login_never_sends_bearer() {
    let (api, recorder) = spawn().await;
    let api = WineApi::new(api.client().clone().with_token("stale"));

    let token = api.login(1, 2, "secret").await.expect("login");
    assert_eq!(token, "token-abc");
    let requests = recorder.requests();
    assert_eq!(requests[0].path, "/systems/1/login");
    assert_eq!(requests[0].authorization, None);

    let err = api.login(1, 2, "wrong").await.expect_err("rejected");
    assert_eq!(err.alert().title, "401");
    assert_eq!(err.alert().message, "Invalid password");
}

#[tokio::test]
async fn non_json_error_falls_back_to_reason() {
    let (api, _) = spawn().await;
    let err = api.system(1).await.expect_err("bad gateway");
    assert!(matches!(
        err,
        ApiError::Status { status: 502, ref message } if message == "Bad Gateway"
    ));
}

#[tokio::test]
async fn screen_specific_messages_replace_400() {
    let (api, _) = spawn().await;
    let request = api_contract::CreateSystemRequest {
        name: "Bodega".to_string(),
        year: 2025,
        owner_name: "admin".to_string(),
        password: "1234".to_string(),
    };
    let err = api.create_system(&request, "1234").await.expect_err("taken");
    assert_eq!(err.alert().message, "The system name already exists.");

    let err = api
        .change_password("old", "newpass", "newpass")
        .await
        .expect_err("incorrect");
    assert_eq!(err.alert().message, "The password you entered is incorrect.");
}

#[tokio::test]
async fn validation_failures_never_reach_the_network() {
    let (api, recorder) = spawn().await;
    let request = api_contract::CreateUserRequest {
        name: "  ".to_string(),
        password: "abc".to_string(),
        role_id: 1,
        is_enabled: true,
    };
    let err = api.create_user(1, &request, "abd").await.expect_err("invalid");
    let ApiError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert!(errors.contains(&ValidationError::Required("username")));
    assert!(errors.contains(&ValidationError::PasswordTooShort { min: 4 }));
    assert!(errors.contains(&ValidationError::PasswordMismatch));

    assert!(api.login(1, 2, "").await.is_err());
    assert!(recorder.requests().is_empty());
}

#[tokio::test]
async fn role_update_sends_diff() {
    let (api, recorder) = spawn().await;
    let old: PermissionMap = [(1, 1), (1, 2)].into_iter().collect();
    let new: PermissionMap = [(1, 2), (1, 3), (2, 1)].into_iter().collect();
    let diff = PermissionDiff::compute(&old, &new);

    api.update_role(4, " Cellar ", &diff).await.expect("update");
    assert_eq!(
        recorder.last_body(),
        Some(json!({
            "name": "Cellar",
            "inserts": [
                {"resource_id": 1, "action_ids": [3]},
                {"resource_id": 2, "action_ids": [1]}
            ],
            "deletes": [{"resource_id": 1, "action_ids": [1]}]
        }))
    );
    assert_eq!(recorder.requests()[0].method, "PATCH");
}

#[tokio::test]
async fn reports_are_validated_then_submitted() {
    let (api, recorder) = spawn().await;
    let taxonomy = api.taxonomy().await.expect("taxonomy");
    let materials = vec![Material {
        id: 3,
        name: "Tempranillo".to_string(),
        note: String::new(),
    }];
    let tanks = vec![Tank {
        id: 5,
        name: "T5".to_string(),
        note: String::new(),
        material_id: Some(3),
    }];
    let draft = ReportDraft {
        date: Utc.with_ymd_and_hms(2025, 9, 14, 8, 30, 0).unwrap(),
        user_id: 2,
        work_id: 2,
        operation_id: 13,
        kind_id: 5,
        feature_id: Some(1),
        value: Some(1.5),
        note: None,
    };

    let missing_value = ReportDraft {
        value: None,
        ..draft.clone()
    };
    let err = api
        .create_report(1, &taxonomy, missing_value, &materials, &tanks)
        .await
        .expect_err("value required");
    assert!(matches!(err, ApiError::Taxonomy(TaxonomyError::ValueRequired)));
    let before = recorder.requests().len();

    api.create_report(1, &taxonomy, draft, &materials, &tanks)
        .await
        .expect("submit");
    assert_eq!(recorder.requests().len(), before + 1);
    assert_eq!(
        recorder.last_body(),
        Some(json!({
            "date": "2025-09-14T08:30:00Z",
            "user_id": 2,
            "work_id": 2,
            "operation_id": 13,
            "kind_id": 5,
            "feature_id": 1,
            "value": 1.5,
            "note": ""
        }))
    );

    let reports = api.reports(1).await.expect("reports");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].note, None);
    assert_eq!(reports[0].names.username.as_deref(), Some("maria"));
}

#[tokio::test]
async fn backups_list_restore_and_delete() {
    let (api, recorder) = spawn().await;
    assert_eq!(api.backups().await.expect("list"), vec!["b1.sql", "b2.sql"]);

    api.restore_backup("b1.sql").await.expect("restore");
    assert_eq!(recorder.last_body(), Some(json!({"filename": "b1.sql"})));

    api.delete_backup("b 2.sql").await.expect("delete");
    let last = recorder.requests().pop().expect("request");
    assert_eq!(last.method, "DELETE");
    assert_eq!(last.path, "/backups/b%202.sql");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = WineApi::new(ApiClient::new(&format!("http://{addr}")).expect("client"));
    let err = api.systems().await.expect_err("refused");
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.alert().title, "Network Error");
}

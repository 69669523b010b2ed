//! End-to-end router tests: OTP flow, report submission, admin triage and
//! the PDF download, all against one in-memory application state.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use civicserver::build_app;
use civicserver::config::AppConfig;
use civicserver::shared::state::AppState;

const BOUNDARY: &str = "civic-test-boundary";

fn test_app() -> Router {
    build_app(Arc::new(AppState::new(AppConfig::for_tests())))
}

fn json_request(uri: &str, method: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn upload_request(filename: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"evidence\"; filename=\"{filename}\"\r\n\
         Content-Type: image/jpeg\r\n\r\n\
         not-a-real-image\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/api/tickets")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request")
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

async fn unlock_citizen(app: &Router) {
    let response = app
        .clone()
        .oneshot(json_request(
            "/api/auth/otp/request",
            "POST",
            json!({ "phone": "9876543210" }),
        ))
        .await
        .expect("otp request");
    assert_eq!(response.status(), StatusCode::OK);
    let issued = body_json(response).await;
    let code = issued["code"].as_str().expect("code").to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/auth/otp/verify",
            "POST",
            json!({ "phone": "9876543210", "code": code }),
        ))
        .await
        .expect("otp verify");
    assert_eq!(response.status(), StatusCode::OK);
}

async fn unlock_admin(app: &Router) {
    let response = app
        .clone()
        .oneshot(json_request(
            "/api/auth/admin/login",
            "POST",
            json!({ "username": "admin", "password": "admin" }),
        ))
        .await
        .expect("admin login");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let app = test_app();
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn locked_gates_reject_both_portals() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(upload_request("pothole.jpg"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::get("/api/tickets")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_phone_is_a_bad_request() {
    let app = test_app();
    let response = app
        .oneshot(json_request(
            "/api/auth/otp/request",
            "POST",
            json!({ "phone": "12345" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some());
}

#[tokio::test]
async fn wrong_otp_is_rejected() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/auth/otp/request",
            "POST",
            json!({ "phone": "9876543210" }),
        ))
        .await
        .expect("response");
    let code = body_json(response).await["code"]
        .as_str()
        .expect("code")
        .to_string();
    let wrong = if code == "1000" { "1001" } else { "1000" };

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/auth/otp/verify",
            "POST",
            json!({ "phone": "9876543210", "code": wrong }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // The gate stayed locked.
    let response = app
        .oneshot(upload_request("pothole.jpg"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn report_submission_classifies_by_filename() {
    let app = test_app();
    unlock_citizen(&app).await;

    let response = app
        .clone()
        .oneshot(upload_request("garbage_pile_03.jpg"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::CREATED);
    let ticket = body_json(response).await;
    assert_eq!(ticket["category"], "waste_accumulation");
    assert_eq!(ticket["priority"], "medium");
    assert_eq!(ticket["status"], "open");
    assert!(ticket["id"].as_str().expect("id").starts_with("TKT-"));

    let response = app
        .oneshot(upload_request("IMG_2024.png"))
        .await
        .expect("response");
    let ticket = body_json(response).await;
    assert_eq!(ticket["category"], "unclassified");
    assert_eq!(ticket["priority"], "low");
}

#[tokio::test]
async fn submission_without_a_file_is_a_bad_request() {
    let app = test_app();
    unlock_citizen(&app).await;

    let body = format!("--{BOUNDARY}--\r\n");
    let request = Request::builder()
        .method("POST")
        .uri("/api/tickets")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_triage_flow() {
    let app = test_app();
    unlock_citizen(&app).await;
    unlock_admin(&app).await;

    let response = app
        .clone()
        .oneshot(upload_request("pothole_7th_cross.jpg"))
        .await
        .expect("response");
    let id = body_json(response).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/tickets")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let tickets = body_json(response).await;
    assert_eq!(tickets.as_array().expect("array").len(), 1);

    let response = app
        .clone()
        .oneshot(json_request(
            &format!("/api/tickets/{id}/status"),
            "PUT",
            json!({ "status": "resolved" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "resolved");

    let response = app
        .clone()
        .oneshot(json_request(
            "/api/tickets/TKT-00000/status",
            "PUT",
            json!({ "status": "rejected" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // The failed update left the queue untouched.
    let response = app
        .clone()
        .oneshot(
            Request::get("/api/tickets")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let tickets = body_json(response).await;
    let tickets = tickets.as_array().expect("array");
    assert_eq!(tickets.len(), 1);
    assert_eq!(tickets[0]["status"], "resolved");
}

#[tokio::test]
async fn pdf_report_downloads_for_a_known_ticket() {
    let app = test_app();
    unlock_citizen(&app).await;
    unlock_admin(&app).await;

    let response = app
        .clone()
        .oneshot(upload_request("water_main_break.jpg"))
        .await
        .expect("response");
    let id = body_json(response).await["id"]
        .as_str()
        .expect("id")
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::get(format!("/api/tickets/{id}/report"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/pdf"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .expect("header")
        .to_string();
    assert_eq!(
        disposition,
        format!("attachment; filename=\"Report_{id}.pdf\"")
    );
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    assert!(bytes.starts_with(b"%PDF"));

    let response = app
        .oneshot(
            Request::get("/api/tickets/TKT-00000/report")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

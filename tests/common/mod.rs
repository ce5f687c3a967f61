//! A stand-in store API and helpers for driving the admin router.

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Query, State},
    http::{header, HeaderMap, Request, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use jap_admin::config::Config;
use jap_admin::AppState;

pub const ADMIN_EMAIL: &str = "admin@jap.example";
pub const ADMIN_PASSWORD: &str = "secret";
pub const ADMIN_TOKEN: &str = "admin-token";
pub const STAFF_TOKEN: &str = "staff-token";
/// Passes the profile check, then is refused by every other endpoint
pub const EXPIRING_TOKEN: &str = "expiring-token";
pub const COOKIE: &str = "japAccessToken";

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn unauthenticated() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Unauthenticated." })),
    )
        .into_response()
}

fn login(fields: &BTreeMap<String, String>) -> Response {
    let email = fields.get("email").map(String::as_str).unwrap_or_default();
    let password = fields.get("password").map(String::as_str).unwrap_or_default();

    if email == "locked@jap.example" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The given data was invalid.",
                "errors": { "email": ["This account is locked.", "Contact support."] }
            })),
        )
            .into_response();
    }
    if email == ADMIN_EMAIL && password == ADMIN_PASSWORD {
        return Json(json!({ "message": "Login successful", "token": ADMIN_TOKEN })).into_response();
    }
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "message": "Invalid credentials" })),
    )
        .into_response()
}

fn profile(headers: &HeaderMap) -> Response {
    let role = match bearer(headers) {
        Some(ADMIN_TOKEN) | Some(EXPIRING_TOKEN) => "Super-Admin",
        Some(STAFF_TOKEN) => "Staff",
        _ => return unauthenticated(),
    };
    Json(json!({
        "user": { "name": "Asha", "email": ADMIN_EMAIL, "roles": [{ "name": role }] }
    }))
    .into_response()
}

/// Echoes the paging parameters it received as the single row.
fn paginate(segment: &str, query: &HashMap<String, String>) -> Response {
    Json(json!({
        "data": [{
            "id": 1,
            "name": format!("{} one", segment),
            "resource": segment,
            "page": query.get("page"),
            "total": query.get("total"),
        }],
        "meta": { "total": 42 }
    }))
    .into_response()
}

/// One request as the store API received it. Files are recorded by file name.
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub fields: BTreeMap<String, String>,
}

pub type StoreLog = Arc<Mutex<Vec<Captured>>>;

/// Every request the store API has seen for `path`.
pub fn received(log: &StoreLog, path: &str) -> Vec<Captured> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|c| c.path == path)
        .cloned()
        .collect()
}

async fn read_fields(request: Request<Body>) -> BTreeMap<String, String> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    let mut fields = BTreeMap::new();
    if is_multipart {
        let mut multipart = Multipart::from_request(request, &()).await.unwrap();
        while let Some(field) = multipart.next_field().await.unwrap() {
            let name = field.name().unwrap_or_default().to_string();
            let value = match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    field.bytes().await.unwrap();
                    file_name
                }
                None => field.text().await.unwrap(),
            };
            fields.insert(name, value);
        }
    } else {
        let bytes = request.into_body().collect().await.unwrap().to_bytes();
        if let Ok(Value::Object(map)) = serde_json::from_slice(&bytes) {
            for (name, value) in map {
                let value = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                fields.insert(name, value);
            }
        }
    }
    fields
}

/// Routes by hand so every path shape of the store API can coexist.
async fn dispatch(State(log): State<StoreLog>, request: Request<Body>) -> Response {
    let method = request.method().to_string();
    let path = request
        .uri()
        .path()
        .trim_start_matches("/api/v1/")
        .to_string();
    let query = Query::<HashMap<String, String>>::try_from_uri(request.uri())
        .map(|Query(q)| q)
        .unwrap_or_default();
    let headers = request.headers().clone();
    let fields = read_fields(request).await;

    log.lock().unwrap().push(Captured {
        method: method.clone(),
        path: path.clone(),
        query: query.clone(),
        fields: fields.clone(),
    });

    let parts: Vec<&str> = path.split('/').collect();

    if path == "profile" {
        return profile(&headers);
    }
    if path == "auth/login" {
        return login(&fields);
    }
    match bearer(&headers) {
        None | Some(EXPIRING_TOKEN) => return unauthenticated(),
        Some(_) => {}
    }

    match (method.as_str(), parts.as_slice()) {
        ("POST", ["auth", "logout"]) => match bearer(&headers) {
            Some(ADMIN_TOKEN) => Json(json!({ "message": "Logged out" })).into_response(),
            _ => unauthenticated(),
        },
        ("GET", [segment, "paginate"]) => paginate(segment, &query),
        ("POST", ["coupon", "create"]) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "The given data was invalid.",
                "errors": { "code": ["The code has already been taken."] }
            })),
        )
            .into_response(),
        ("POST", ["gallery-category", "create"]) => {
            let name = fields.get("name").cloned().unwrap_or_default();
            Json(json!({ "message": format!("Created {}", name) })).into_response()
        }
        ("POST", ["product", "create"]) => {
            Json(json!({ "message": "Product created" })).into_response()
        }
        ("POST", ["product", "update", _]) => unauthenticated(),
        ("GET", ["tax"]) => {
            Json(json!({ "tax": { "id": 1, "tax_in_percentage": "18" } })).into_response()
        }
        ("POST", ["tax", ""]) => Json(json!({ "message": "Tax updated" })).into_response(),
        // Saving works, but the session is gone by the time the page reloads
        ("POST", ["delivery-charge", ""]) => {
            Json(json!({ "message": "Delivery charge updated" })).into_response()
        }
        ("GET", ["delivery-charge"]) => unauthenticated(),
        ("DELETE", [_, "delete", _]) => Json(json!({ "message": "Deleted" })).into_response(),
        _ => (StatusCode::NOT_FOUND, Json(json!({ "message": "Not found" }))).into_response(),
    }
}

pub fn store_api(log: StoreLog) -> Router {
    Router::new().fallback(dispatch).with_state(log)
}

/// Serve the stand-in store API on an ephemeral port and return its base URL.
pub async fn spawn_store_api(log: StoreLog) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, store_api(log)).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

/// The admin router plus the log of what it sent to the store API.
pub async fn admin_with_log() -> (Router, StoreLog) {
    let log = StoreLog::default();
    let mut config = Config::default();
    config.backend.base_url = spawn_store_api(log.clone()).await;
    let app = jap_admin::api::create_router(Arc::new(AppState::new(config)));
    (app, log)
}

pub async fn admin() -> Router {
    admin_with_log().await.0
}

pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    with_cookie(Request::builder().method("GET").uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, token: Option<&str>, body: &str) -> Request<Body> {
    with_cookie(Request::builder().method("POST").uri(uri), token)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    with_cookie(Request::builder().method("POST").uri(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const BOUNDARY: &str = "jap-admin-test-boundary";

/// Build a multipart body from text fields and `(name, file_name, bytes)` files.
pub fn multipart(texts: &[(&str, &str)], files: &[(&str, &str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in texts {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    for (name, file_name, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn post_multipart(uri: &str, token: Option<&str>, body: Vec<u8>) -> Request<Body> {
    with_cookie(Request::builder().method("POST").uri(uri), token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn with_cookie(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::COOKIE, format!("{}={}", COOKIE, token)),
        None => builder,
    }
}

pub async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

pub fn cookie_cleared(response: &Response) -> bool {
    set_cookies(response)
        .iter()
        .any(|c| c.starts_with(&format!("{}=;", COOKIE)) && c.contains("Max-Age=0"))
}

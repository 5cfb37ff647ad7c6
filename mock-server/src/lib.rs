use std::collections::HashMap;

use axum::{
    extract::{Path, Query, RawQuery},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Joke {
    pub id: u32,
    pub joke: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JokeResponse {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: Joke,
}

/// What the server saw on an echo route.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Echo {
    pub method: String,
    pub query: Option<String>,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/jokes/random", get(random_joke))
        .route("/echo", get(echo_get).post(echo_post))
        .route("/malformed", get(malformed).post(malformed))
        .route("/status/{code}", get(status).post(status))
        .route("/jokes", post(create_joke))
        .route("/large/{mib}", get(large))
        .route("/invalid-utf8", get(invalid_utf8))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn random_joke(Query(params): Query<HashMap<String, String>>) -> Json<JokeResponse> {
    let first = params.get("firstName").map(String::as_str).unwrap_or("Chuck");
    let last = params.get("lastName").map(String::as_str).unwrap_or("Norris");
    Json(JokeResponse {
        kind: "success".to_string(),
        value: Joke {
            id: 1,
            joke: format!("{first} {last} can divide by zero."),
        },
    })
}

async fn echo_get(RawQuery(query): RawQuery, headers: HeaderMap) -> Json<Echo> {
    Json(Echo {
        method: "GET".to_string(),
        query,
        headers: header_map(&headers),
        body: None,
    })
}

async fn echo_post(RawQuery(query): RawQuery, headers: HeaderMap, body: String) -> Json<Echo> {
    Json(Echo {
        method: "POST".to_string(),
        query,
        headers: header_map(&headers),
        body: Some(body),
    })
}

async fn create_joke(Json(input): Json<Value>) -> (StatusCode, Json<JokeResponse>) {
    let joke = input
        .get("joke")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    (
        StatusCode::CREATED,
        Json(JokeResponse {
            kind: "success".to_string(),
            value: Joke { id: 2, joke },
        }),
    )
}

async fn malformed() -> ([(header::HeaderName, &'static str); 1], &'static str) {
    ([(header::CONTENT_TYPE, "application/json")], "{\"type\": \"success\", ")
}

/// A JSON string literal whose contents are `mib` MiB of `a`.
async fn large(Path(mib): Path<usize>) -> ([(header::HeaderName, &'static str); 1], String) {
    let mut body = String::with_capacity(mib * 1024 * 1024 + 2);
    body.push('"');
    body.extend(std::iter::repeat('a').take(mib * 1024 * 1024));
    body.push('"');
    ([(header::CONTENT_TYPE, "application/json")], body)
}

async fn invalid_utf8() -> ([(header::HeaderName, &'static str); 1], &'static [u8]) {
    ([(header::CONTENT_TYPE, "application/json")], b"{\"type\":\"\xff\xfe\"}")
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    (status, format!("status {code}"))
}

/// Lower-cased header names; repeated headers keep the last value.
fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}

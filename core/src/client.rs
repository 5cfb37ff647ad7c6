//! Typed GET / POST entry points.
//!
//! # Design
//! Every operation builds a `RequestDescriptor`, hands the resulting
//! `HttpRequest` to `transport::dispatch`, and returns a `Pending` straight
//! away. The dispatch callback checks the status, decodes the body into `T`
//! and resolves the `Pending` exactly once. Nothing is retried.
//!
//! The free functions at the bottom of this module use a default
//! `WebApiClient` with `UreqTransport`, for callers that want the plain
//! static helpers.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::{decode_bytes, encode};
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::pending::{pending, Pending};
use crate::query::Query;
use crate::request::RequestDescriptor;
use crate::transport::{dispatch, Transport, UreqTransport};

/// Caller-supplied header pairs.
pub type Headers<'a> = &'a [(&'a str, &'a str)];

#[derive(Clone)]
pub struct WebApiClient {
    transport: Arc<dyn Transport>,
}

impl Default for WebApiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WebApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebApiClient").finish_non_exhaustive()
    }
}

impl WebApiClient {
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::new())
    }

    pub fn with_transport(transport: impl Transport) -> Self {
        Self {
            transport: Arc::new(transport),
        }
    }

    /// GET `url`, sending `auth_token` as the `AuthToken` header when present.
    pub fn get<T>(&self, url: &str, auth_token: Option<&str>) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send_get(RequestDescriptor::new(url).auth_token(auth_token))
    }

    pub fn get_with_headers<T>(&self, url: &str, headers: Headers<'_>) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send_get(RequestDescriptor::new(url).headers(headers.iter().copied()))
    }

    /// GET with a query string. `None`, an empty literal and empty params all
    /// leave the URL untouched.
    pub fn get_with_query<T>(&self, url: &str, headers: Headers<'_>, query: Option<Query>) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send_get(
            RequestDescriptor::new(url)
                .headers(headers.iter().copied())
                .query(query),
        )
    }

    /// POST a raw body string.
    pub fn post<T>(&self, url: &str, auth_token: Option<&str>, body: impl Into<String>) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send_post(RequestDescriptor::new(url).auth_token(auth_token), body.into())
    }

    /// POST `request` encoded as JSON.
    pub fn post_json<T, R>(&self, url: &str, auth_token: Option<&str>, request: &R) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
        R: Serialize + ?Sized,
    {
        match encode(request) {
            Ok(body) => self.post(url, auth_token, body),
            Err(e) => Pending::ready(Err(e)),
        }
    }

    pub fn post_with_headers<T>(&self, url: &str, headers: Headers<'_>, body: impl Into<String>) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send_post(
            RequestDescriptor::new(url).headers(headers.iter().copied()),
            body.into(),
        )
    }

    pub fn send_get<T>(&self, descriptor: RequestDescriptor) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send(descriptor.build_get())
    }

    pub fn send_post<T>(&self, descriptor: RequestDescriptor, body: String) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        self.send(descriptor.build_post(body))
    }

    fn send<T>(&self, request: HttpRequest) -> Pending<T>
    where
        T: DeserializeOwned + Send + 'static,
    {
        tracing::debug!(method = request.method.as_str(), url = %request.url, "dispatching request");
        let url = request.url.clone();
        let (completion, pending) = pending();

        dispatch(Arc::clone(&self.transport), request, move |outcome| {
            if completion.is_cancelled() {
                tracing::trace!(%url, "caller dropped request, discarding response");
                return;
            }
            let result = outcome
                .map_err(ApiError::from)
                .and_then(|response| parse_response(&url, response));
            completion.complete(result);
        });

        pending
    }
}

fn parse_response<T: DeserializeOwned>(url: &str, response: HttpResponse) -> Result<T, ApiError> {
    tracing::debug!(%url, status = response.status, "response received");
    check_status(url, &response)?;
    decode_bytes(&response.body).map_err(|e| {
        tracing::debug!(%url, error = %e.source, "response body did not decode");
        ApiError::from(e)
    })
}

/// Map non-2xx responses to `TransportError::Status`.
fn check_status(url: &str, response: &HttpResponse) -> Result<(), TransportError> {
    if response.is_success() {
        return Ok(());
    }
    Err(TransportError::Status {
        url: url.to_string(),
        status: response.status,
        body: response.text().into_owned(),
    })
}

pub fn get<T>(url: &str, auth_token: Option<&str>) -> Pending<T>
where
    T: DeserializeOwned + Send + 'static,
{
    WebApiClient::new().get(url, auth_token)
}

pub fn get_with_headers<T>(url: &str, headers: Headers<'_>) -> Pending<T>
where
    T: DeserializeOwned + Send + 'static,
{
    WebApiClient::new().get_with_headers(url, headers)
}

pub fn get_with_query<T>(url: &str, headers: Headers<'_>, query: Option<Query>) -> Pending<T>
where
    T: DeserializeOwned + Send + 'static,
{
    WebApiClient::new().get_with_query(url, headers, query)
}

pub fn post<T>(url: &str, auth_token: Option<&str>, body: impl Into<String>) -> Pending<T>
where
    T: DeserializeOwned + Send + 'static,
{
    WebApiClient::new().post(url, auth_token, body)
}

pub fn post_json<T, R>(url: &str, auth_token: Option<&str>, request: &R) -> Pending<T>
where
    T: DeserializeOwned + Send + 'static,
    R: Serialize + ?Sized,
{
    WebApiClient::new().post_json(url, auth_token, request)
}

pub fn post_with_headers<T>(url: &str, headers: Headers<'_>, body: impl Into<String>) -> Pending<T>
where
    T: DeserializeOwned + Send + 'static,
{
    WebApiClient::new().post_with_headers(url, headers, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;
    use crate::query::QueryParams;
    use serde::Deserialize;
    use std::sync::Mutex;

    /// Records every request and answers with a canned response.
    struct Recorder {
        seen: Arc<Mutex<Vec<HttpRequest>>>,
        status: u16,
        body: Vec<u8>,
    }

    impl Transport for Recorder {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(HttpResponse::new(self.status, self.body.clone()))
        }
    }

    fn client(status: u16, body: impl Into<Vec<u8>>) -> (WebApiClient, Arc<Mutex<Vec<HttpRequest>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let transport = Recorder {
            seen: Arc::clone(&seen),
            status,
            body: body.into(),
        };
        (WebApiClient::with_transport(transport), seen)
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Joke {
        id: u32,
        joke: String,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct JokeResponse {
        #[serde(rename = "type")]
        kind: String,
        value: Joke,
    }

    const JOKE: &str = r#"{"type":"success","value":{"id":1,"joke":"x"}}"#;

    #[test]
    fn get_decodes_wrapper_and_sends_token() {
        let (c, seen) = client(200, JOKE);
        let resp: JokeResponse = c.get("http://h/jokes/random", Some("t0k")).blocking_wait().unwrap();
        assert_eq!(resp.kind, "success");
        assert_eq!(resp.value, Joke { id: 1, joke: "x".to_string() });

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, HttpMethod::Get);
        assert_eq!(seen[0].header("AuthToken"), Some("t0k"));
        assert_eq!(seen[0].header("Accept"), Some("application/json"));
    }

    #[test]
    fn get_with_query_encodes_params() {
        let (c, seen) = client(200, JOKE);
        let params = QueryParams::new().with("firstName", "John").with("lastName", "Doe");
        let _: JokeResponse = c
            .get_with_query("http://h/jokes/random", &[("X-Trace", "1")], Some(params.into()))
            .blocking_wait()
            .unwrap();
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].url, "http://h/jokes/random?firstName=John&lastName=Doe");
        assert_eq!(seen[0].header("X-Trace"), Some("1"));
    }

    #[test]
    fn post_json_sends_encoded_request() {
        #[derive(Serialize)]
        struct NewJoke<'a> {
            joke: &'a str,
            tags: Vec<&'a str>,
        }
        let req = NewJoke {
            joke: "x",
            tags: vec!["nerdy"],
        };
        let (c, seen) = client(200, "true");
        let ok: bool = c.post_json("http://h/jokes", None, &req).blocking_wait().unwrap();
        assert!(ok);

        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].method, HttpMethod::Post);
        assert_eq!(seen[0].body, Some(encode(&req).unwrap()));
        assert_eq!(seen[0].header("Content-Type"), Some("application/json"));
        assert!(seen[0].header("AuthToken").is_none());
    }

    #[test]
    fn post_with_headers_sends_raw_body() {
        let (c, seen) = client(200, "1");
        let n: u32 = c
            .post_with_headers("http://h/count", &[("X-Api-Key", "k")], "{\"n\":1}")
            .blocking_wait()
            .unwrap();
        assert_eq!(n, 1);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].body.as_deref(), Some("{\"n\":1}"));
        assert_eq!(seen[0].header("x-api-key"), Some("k"));
    }

    #[test]
    fn undecodable_body_fails_with_body_attached() {
        let (c, _) = client(200, "<html>maintenance</html>");
        let err = c.get::<JokeResponse>("http://h", None).blocking_wait().unwrap_err();
        match err {
            ApiError::Deserialization(e) => assert_eq!(e.body, "<html>maintenance</html>"),
            other => panic!("expected deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn non_utf8_body_is_a_deserialization_error() {
        let (c, _) = client(200, b"{\"type\":\"\xff\xfe\"}");
        let err = c.get::<JokeResponse>("http://h", None).blocking_wait().unwrap_err();
        match err {
            ApiError::Deserialization(e) => assert_eq!(e.body, "{\"type\":\"\u{fffd}\u{fffd}\"}"),
            other => panic!("expected deserialization error, got {other:?}"),
        }
    }

    #[test]
    fn error_status_is_a_transport_error() {
        let (c, _) = client(503, "down");
        let err = c.get::<JokeResponse>("http://h", None).blocking_wait().unwrap_err();
        assert!(matches!(
            err,
            ApiError::Transport(TransportError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn unencodable_request_fails_without_sending() {
        let mut bad = std::collections::BTreeMap::new();
        bad.insert((1, 2), "v");
        let (c, seen) = client(200, "{}");
        let err = c
            .post_json::<serde_json::Value, _>("http://h", None, &bad)
            .blocking_wait()
            .unwrap_err();
        assert!(matches!(err, ApiError::Serialization(_)));
        assert!(seen.lock().unwrap().is_empty());
    }
}

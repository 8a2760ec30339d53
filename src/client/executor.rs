//! Request execution.
//!
//! Every call the client makes is described by an [`ApiRequest`] and handed
//! to a [`RequestExecutor`]. [`HttpExecutor`] sends it over HTTP with
//! `reqwest`; tests and alternate transports plug in their own executor
//! through [`TdaClient::with_executor`](crate::TdaClient::with_executor).

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE, LOCATION};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::{Error, Result};

/// Body of an outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// JSON document
    Json(Value),
    /// `application/x-www-form-urlencoded` pairs
    Form(Vec<(String, String)>),
    /// Pre-serialized text, sent as is
    Text(String),
}

/// Description of one API call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,
    /// Path below the base URL, starting with `/`
    pub path: String,
    /// Query parameters
    pub query: Vec<(String, String)>,
    /// Extra headers
    pub headers: HeaderMap,
    /// Request body
    pub body: Option<RequestBody>,
    /// Whether the bearer token must be attached
    pub authorized: bool,
}

impl ApiRequest {
    /// An authorized request with no query or body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
            authorized: true,
        }
    }

    /// An authorized GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// An authorized POST request.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// An authorized PUT request.
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// An authorized DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Mark the request as not needing the bearer token.
    pub fn unauthorized(mut self) -> Self {
        self.authorized = false;
        self
    }

    /// Append one query parameter.
    pub fn query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Append the fields of a serializable struct as query parameters.
    ///
    /// `None` fields are skipped, strings are used verbatim, arrays are
    /// joined with commas and other values use their JSON text.
    pub fn query<Q: Serialize + ?Sized>(mut self, query: &Q) -> Result<Self> {
        match serde_json::to_value(query)? {
            Value::Object(fields) => {
                for (key, value) in fields {
                    if let Some(value) = query_value(&value) {
                        self.query.push((key, value));
                    }
                }
                Ok(self)
            }
            Value::Null => Ok(self),
            other => Err(Error::InvalidInput(format!(
                "query must serialize to an object, got {}",
                other
            ))),
        }
    }

    /// Set a header.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self> {
        self.body = Some(RequestBody::Json(serde_json::to_value(body)?));
        Ok(self)
    }

    /// Set a form body.
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.body = Some(RequestBody::Form(
            pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        ));
        self
    }

    /// Set a text body.
    pub fn text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self
    }

    /// Look up a query parameter.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(query_value)
                .collect::<Vec<_>>()
                .join(","),
        ),
        other => Some(other.to_string()),
    }
}

/// A successful (2xx) response.
#[derive(Debug, Clone, Default)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Decoded body; `None` when the body was empty
    pub body: Option<Value>,
}

impl ApiResponse {
    /// A response with the given status and JSON body.
    pub fn new(status: u16, body: Option<Value>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body,
        }
    }

    /// Returns `true` for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Header value as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Location` header.
    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }
}

/// Sends [`ApiRequest`]s and returns their responses.
///
/// Implementations return `Ok` only for 2xx responses; any other status
/// becomes [`Error::Api`] and transport failures become [`Error::Http`].
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Execute one request.
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

/// [`RequestExecutor`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpExecutor {
    /// Create an executor sending requests below `base_url`.
    pub fn new(http: reqwest::Client, base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;
        Ok(Self { http, base_url })
    }

    /// The base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url> {
        let mut url = Url::parse(&format!(
            "{}{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path
        ))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request)?;
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let mut headers = request.headers;
        let form_or_text = matches!(
            request.body,
            Some(RequestBody::Form(_)) | Some(RequestBody::Text(_))
        );
        if !form_or_text && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let builder = self.http.request(request.method.clone(), url).headers(headers);
        let builder = match request.body {
            Some(RequestBody::Json(body)) => builder.json(&body),
            Some(RequestBody::Form(pairs)) => builder.form(&pairs),
            Some(RequestBody::Text(body)) => builder.body(body),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let text = response.text().await?;
        let body = decode_body(text);

        if !(200..300).contains(&status) {
            tracing::warn!(status, path = %request.path, "request failed");
            return Err(Error::from_api_response(status, body.unwrap_or_default()));
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

fn decode_body(text: String) -> Option<Value> {
    if text.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

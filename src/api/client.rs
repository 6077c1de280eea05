use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::utils::error::ApiError;

/// Options for a single API call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method, GET unless set
    pub method: Method,

    /// Extra headers, merged over the JSON content-type default
    pub headers: HeaderMap,

    /// Query string pairs
    pub query: Vec<(&'static str, String)>,

    /// JSON request body
    pub body: Option<Value>,

    /// Hand the response body back as raw bytes
    pub blob: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
            blob: false,
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post() -> Self {
        Self {
            method: Method::POST,
            ..Self::default()
        }
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self, ApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn query(mut self, pairs: Vec<(&'static str, String)>) -> Self {
        self.query = pairs;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn blob(mut self) -> Self {
        self.blob = true;
        self
    }
}

/// Decoded response body
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// 204 or an empty body
    Empty,

    /// Body with a JSON content type
    Json(Value),

    /// Any other body
    Text(String),

    /// Raw body, when requested
    Blob(Vec<u8>),
}

impl Payload {
    /// Deserialize a JSON payload. Non-JSON payloads yield `None`, leaving
    /// the caller to fall back to its defaults.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Option<T>, ApiError> {
        match self {
            Payload::Json(value) => Ok(Some(serde_json::from_value(value)?)),
            _ => Ok(None),
        }
    }

    /// Body bytes regardless of how the response was decoded
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Payload::Empty => Vec::new(),
            Payload::Json(value) => value.to_string().into_bytes(),
            Payload::Text(text) => text.into_bytes(),
            Payload::Blob(bytes) => bytes,
        }
    }
}

/// Thin client for the capture service REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for `base_url`. No request timeout is set; the
    /// service owns all timing decisions.
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a request against `endpoint`. Failures are logged here and
    /// returned for the caller to present.
    pub async fn call(&self, endpoint: &str, options: RequestOptions) -> Result<Payload, ApiError> {
        self.send(endpoint, options).await.map_err(|e| {
            error!("API call {} failed: {}", endpoint, e);
            e
        })
    }

    /// Multipart upload of a capture file to an absolute URL
    pub async fn upload_file(&self, url: &str, path: &Path) -> Result<Payload, ApiError> {
        self.send_file(url, path).await.map_err(|e| {
            error!("Upload of {} to {} failed: {}", path.display(), url, e);
            e
        })
    }

    async fn send(&self, endpoint: &str, options: RequestOptions) -> Result<Payload, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        debug!("{} {} {:?}", options.method, url, options.query);

        let mut request = self.http.request(options.method, &url).headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = &options.body {
            request = request.body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        read_response(response, options.blob).await
    }

    async fn send_file(&self, url: &str, path: &Path) -> Result<Payload, ApiError> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "capture.pcap".to_string());

        let form = Form::new().part("file", Part::bytes(data).file_name(file_name));
        let response = self.http.post(url).multipart(form).send().await?;
        read_response(response, false).await
    }
}

async fn read_response(response: Response, blob: bool) -> Result<Payload, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await?;
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    if status == StatusCode::NO_CONTENT {
        return Ok(Payload::Empty);
    }

    if blob {
        let bytes = response.bytes().await?;
        return Ok(Payload::Blob(bytes.to_vec()));
    }

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.contains("application/json"))
        .unwrap_or(false);

    let text = response.text().await?;
    if text.is_empty() {
        return Ok(Payload::Empty);
    }

    if is_json {
        Ok(Payload::Json(serde_json::from_str(&text)?))
    } else {
        Ok(Payload::Text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_json_payload_decodes_to_none() {
        let decoded: Option<Value> = Payload::Text("started".into()).decode().unwrap();
        assert!(decoded.is_none());
        let decoded: Option<Value> = Payload::Empty.decode().unwrap();
        assert!(decoded.is_none());
    }

    #[test]
    fn json_payload_decodes_into_type() {
        #[derive(serde::Deserialize)]
        struct Ack {
            ok: bool,
        }
        let ack: Option<Ack> = Payload::Json(json!({"ok": true})).decode().unwrap();
        assert!(ack.unwrap().ok);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:8080/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080/api");
    }

    #[test]
    fn options_builders_compose() {
        let opts = RequestOptions::post()
            .json(&json!({"format": "csv"}))
            .unwrap()
            .blob();
        assert_eq!(opts.method, Method::POST);
        assert!(opts.blob);
        assert_eq!(opts.body, Some(json!({"format": "csv"})));
    }
}

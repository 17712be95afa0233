//! JSON request helper shared by the backend api and the identity provider.
//!
//! Every call sends a JSON body and buffers the whole reply, so callers get plain
//! `Send` data back from spawned tasks.

use std::sync::LazyLock;

use serde::Serialize;
use serde::de::DeserializeOwned;

static CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Post,
    Put,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
        }
    }
}

/// Buffered reply.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The request never produced a complete reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

/// The message is shown to users, so the request url is stripped from it.
impl From<reqwest::Error> for HttpError {
    fn from(err: reqwest::Error) -> Self {
        Self {
            message: err.without_url().to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsonRequest {
    method: Method,
    url: String,
    headers: Vec<(&'static str, String)>,
    body: Vec<u8>,
}

impl JsonRequest {
    fn new<T: Serialize>(method: Method, url: &str, body: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            method,
            url: url.to_owned(),
            headers: Vec::new(),
            body: serde_json::to_vec(body)?,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub async fn send(self) -> Result<Response, HttpError> {
        let mut request = CLIENT
            .request(self.method.into(), self.url.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        for (name, value) in self.headers {
            request = request.header(name, value);
        }
        let response = request.body(self.body).send().await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        Ok(Response { status, body })
    }
}

pub struct Client;

impl Client {
    pub fn post<T: Serialize>(url: &str, body: &T) -> Result<JsonRequest, serde_json::Error> {
        JsonRequest::new(Method::Post, url, body)
    }

    pub fn put<T: Serialize>(url: &str, body: &T) -> Result<JsonRequest, serde_json::Error> {
        JsonRequest::new(Method::Put, url, body)
    }
}

//! Transport capability consumed by the dispatcher.
//!
//! # Responsibilities
//! - Define the request/response pair exchanged with a transport
//! - Define the pluggable `Transport` trait (closures implement it)
//! - Carry an optional abort signal that transports may honour
//!
//! # Design Decisions
//! - Transports own auth, retry, caching and cancellation policy
//! - Bodies are already serialized when they reach a transport
//! - Non-2xx statuses are responses, never transport errors

use std::collections::BTreeMap;
use std::future::Future;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;

use crate::contract::Method;

/// Header name → value, sorted by name.
pub type Headers = BTreeMap<String, String>;

/// Credentials policy forwarded verbatim to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Credentials {
    Omit,
    SameOrigin,
    Include,
}

/// Serialized request payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Text(String),
    Binary(Vec<u8>),
}

impl RequestBody {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RequestBody::Text(text) => Some(text),
            RequestBody::Binary(_) => None,
        }
    }
}

/// Everything a transport needs to perform one call.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Complete URL: base URL, path and query string.
    pub path: String,
    pub method: Method,
    pub headers: Headers,
    pub body: Option<RequestBody>,
    pub credentials: Option<Credentials>,
    pub signal: Option<AbortSignal>,
}

/// Payload returned by a transport.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// Body was not valid JSON.
    Text(String),
    Empty,
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Text(text) => Some(text),
            _ => None,
        }
    }

    /// View as JSON: text becomes a string, empty becomes null.
    pub fn to_value(&self) -> Value {
        match self {
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Text(text) => Value::String(text.clone()),
            ResponseBody::Empty => Value::Null,
        }
    }
}

impl From<Value> for ResponseBody {
    fn from(value: Value) -> Self {
        ResponseBody::Json(value)
    }
}

/// Status-tagged result of one transport call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: ResponseBody,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<ResponseBody>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failures of the transport itself.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection, TLS, timeout or protocol failure.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The call was cancelled through its abort signal.
    #[error("Request aborted")]
    Aborted,

    /// The transport rejected the request before sending it.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failure reported by a custom transport.
    #[error("Transport error: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Performs the network call for a dispatch.
pub trait Transport: Send + Sync {
    fn invoke(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse, TransportError>>;
}

impl<F, Fut> Transport for F
where
    F: Fn(ApiRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<ApiResponse, TransportError>> + Send + 'static,
{
    fn invoke(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse, TransportError>> {
        Box::pin(self(request))
    }
}

/// Create a linked abort handle and signal.
pub fn abort_pair() -> (AbortHandle, AbortSignal) {
    let (tx, rx) = watch::channel(false);
    (AbortHandle { tx }, AbortSignal { rx })
}

/// Triggers cancellation of every call carrying the paired signal.
#[derive(Debug)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    pub fn abort(&self) {
        self.tx.send_replace(true);
    }

    pub fn signal(&self) -> AbortSignal {
        AbortSignal {
            rx: self.tx.subscribe(),
        }
    }
}

/// Observes an [`AbortHandle`]. Passed through the dispatcher untouched.
#[derive(Debug, Clone)]
pub struct AbortSignal {
    rx: watch::Receiver<bool>,
}

impl AbortSignal {
    pub fn is_aborted(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once aborted. Never resolves if the handle is dropped first.
    pub async fn aborted(&mut self) {
        let closed = self.rx.wait_for(|aborted| *aborted).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn request() -> ApiRequest {
        ApiRequest {
            path: "http://api.com/posts".into(),
            method: Method::Get,
            headers: Headers::new(),
            body: None,
            credentials: None,
            signal: None,
        }
    }

    #[tokio::test]
    async fn test_closure_is_a_transport() {
        let transport = |req: ApiRequest| async move {
            Ok::<_, TransportError>(ApiResponse::new(200, json!({ "path": req.path })))
        };
        let response = transport.invoke(request()).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            ResponseBody::Json(json!({ "path": "http://api.com/posts" }))
        );
    }

    #[tokio::test]
    async fn test_abort_signal() {
        let (handle, mut signal) = abort_pair();
        assert!(!signal.is_aborted());

        let waiter = tokio::spawn(async move {
            signal.aborted().await;
        });
        handle.abort();
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("signal should resolve")
            .unwrap();
        assert!(handle.signal().is_aborted());
    }

    #[test]
    fn test_response_body_views() {
        assert_eq!(ResponseBody::Text("hi".into()).to_value(), json!("hi"));
        assert_eq!(ResponseBody::Empty.to_value(), Value::Null);
        assert!(ResponseBody::Json(json!(1)).as_text().is_none());
    }

    #[test]
    fn test_credentials_serde_names() {
        let parsed: Credentials = serde_json::from_value(json!("same-origin")).unwrap();
        assert_eq!(parsed, Credentials::SameOrigin);
    }
}

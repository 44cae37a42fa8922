//! Default transport built on reqwest.
//!
//! # Responsibilities
//! - Send the prepared request with connect/request timeouts
//! - Return JSON bodies as JSON and anything else as plain text
//! - Honour an abort signal by racing it against the request
//!
//! # Design Decisions
//! - A body that is not JSON is a normal response, never an error
//! - No retries; one request per invocation

use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::Client;

use crate::client::transport::{
    ApiRequest, ApiResponse, RequestBody, ResponseBody, Transport, TransportError,
};
use crate::config::TimeoutConfig;

/// reqwest-backed transport used when no override is supplied.
#[derive(Debug, Clone)]
pub struct FetchTransport {
    client: Client,
}

impl FetchTransport {
    /// Build a client with the configured timeouts.
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.path.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match request.body {
            Some(RequestBody::Text(text)) => builder.body(text),
            Some(RequestBody::Binary(bytes)) => builder.body(bytes),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        tracing::debug!(
            url = %request.path,
            status,
            credentials = ?request.credentials,
            bytes = text.len(),
            "Transport response received"
        );

        Ok(ApiResponse {
            status,
            body: parse_body(text),
        })
    }
}

impl Transport for FetchTransport {
    fn invoke(&self, request: ApiRequest) -> BoxFuture<'_, Result<ApiResponse, TransportError>> {
        Box::pin(async move {
            match request.signal.clone() {
                Some(mut signal) => {
                    if signal.is_aborted() {
                        return Err(TransportError::Aborted);
                    }
                    tokio::select! {
                        result = self.send(request) => result,
                        _ = signal.aborted() => Err(TransportError::Aborted),
                    }
                }
                None => self.send(request).await,
            }
        })
    }
}

/// JSON when it parses, plain text otherwise.
pub fn parse_body(text: String) -> ResponseBody {
    if text.is_empty() {
        return ResponseBody::Empty;
    }
    match serde_json::from_str(&text) {
        Ok(value) => ResponseBody::Json(value),
        Err(e) => {
            tracing::debug!(error = %e, "Response body is not JSON, returning text");
            ResponseBody::Text(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_body_json() {
        assert_eq!(
            parse_body(r#"{"key":"value"}"#.into()),
            ResponseBody::Json(json!({ "key": "value" }))
        );
        assert_eq!(parse_body("42".into()), ResponseBody::Json(json!(42)));
    }

    #[test]
    fn test_parse_body_text_fallback() {
        assert_eq!(
            parse_body("Service Unavailable".into()),
            ResponseBody::Text("Service Unavailable".into())
        );
        assert_eq!(parse_body(String::new()), ResponseBody::Empty);
    }

    #[test]
    fn test_new_with_default_timeouts() {
        assert!(FetchTransport::new(&TimeoutConfig::default()).is_ok());
    }
}

//! The dispatcher: contract-checked calls through a transport.
//!
//! # Responsibilities
//! - Resolve `(method, path)` against the contract before sending
//! - Build the complete URL: base URL + path + encoded query
//! - Merge base headers with the fixed JSON content type
//! - Serialize the body as JSON text
//! - Invoke the transport exactly once and return its result verbatim
//!
//! # Design Decisions
//! - The transport is injected; there is no global default instance
//! - Immutable after construction, cheap to clone, safe to share
//! - Transport failures propagate untouched; 4xx/5xx are results
//! - Response bodies are only inspected when validation is enabled

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::Instrument;

use crate::client::endpoint::Endpoint;
use crate::client::error::DispatchError;
use crate::client::fetch::FetchTransport;
use crate::client::response::DispatchResult;
use crate::client::transport::{AbortSignal, ApiRequest, Headers, RequestBody, Transport};
use crate::config::ClientConfig;
use crate::contract::{ContractTree, Method};
use crate::observability::metrics;
use crate::query;
use crate::routing::PathMatcher;

/// Header always sent with every request; wins over base headers.
pub const CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Query, body and abort signal for one call.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    pub query: Option<Value>,
    pub body: Option<Value>,
    pub signal: Option<AbortSignal>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(mut self, query: Value) -> Self {
        self.query = Some(query);
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn signal(mut self, signal: AbortSignal) -> Self {
        self.signal = Some(signal);
        self
    }
}

struct Inner {
    config: ClientConfig,
    contract: Arc<ContractTree>,
    matcher: PathMatcher,
    transport: Arc<dyn Transport>,
}

/// Contract-aware API client.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<Inner>,
}

impl Dispatcher {
    /// Dispatcher using the default reqwest transport.
    pub fn new(config: ClientConfig, contract: Arc<ContractTree>) -> Result<Self, DispatchError> {
        let transport = FetchTransport::new(&config.timeouts)?;
        Ok(Self::with_transport(config, contract, transport))
    }

    /// Dispatcher using a caller-supplied transport.
    pub fn with_transport(
        config: ClientConfig,
        contract: Arc<ContractTree>,
        transport: impl Transport + 'static,
    ) -> Self {
        Self::with_shared_transport(config, contract, Arc::new(transport))
    }

    pub fn with_shared_transport(
        config: ClientConfig,
        contract: Arc<ContractTree>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let matcher = PathMatcher::new(&contract);
        tracing::info!(
            base_url = %config.base_url,
            routes = matcher.len(),
            validate_responses = config.validate_responses,
            "Dispatcher initialized"
        );
        Self {
            inner: Arc::new(Inner {
                config,
                contract,
                matcher,
                transport,
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn contract(&self) -> &ContractTree {
        &self.inner.contract
    }

    pub fn matcher(&self) -> &PathMatcher {
        &self.inner.matcher
    }

    /// `base_url + path + encode(query)`.
    ///
    /// A path that already carries a query string gets the encoded pairs
    /// appended with `&`.
    pub fn complete_url(&self, path: &str, query: Option<&Value>) -> Result<String, DispatchError> {
        let encoded = match query {
            Some(value) => query::encode(value)?,
            None => String::new(),
        };
        let query = match encoded.strip_prefix('?') {
            Some(pairs) if path.ends_with('?') || path.ends_with('&') => pairs,
            Some(pairs) if path.contains('?') => {
                return Ok(format!("{}{}&{}", self.inner.config.base_url, path, pairs))
            }
            _ => encoded.as_str(),
        };
        Ok(format!("{}{}{}", self.inner.config.base_url, path, query))
    }

    /// Base headers with `Content-Type: application/json` on top.
    pub fn headers(&self) -> Headers {
        let (name, value) = CONTENT_TYPE;
        let mut headers: Headers = self
            .inner
            .config
            .base_headers
            .iter()
            .filter(|(k, _)| !k.eq_ignore_ascii_case(name))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        headers.insert(name.to_string(), value.to_string());
        headers
    }

    /// Resolve, encode and send one call.
    pub async fn dispatch(
        &self,
        method: Method,
        path: &str,
        args: CallArgs,
    ) -> Result<DispatchResult, DispatchError> {
        let span = tracing::info_span!("dispatch", %method, path);
        let started = Instant::now();

        let outcome = self.dispatch_inner(method, path, args).instrument(span).await;
        match &outcome {
            Ok(result) => metrics::record_dispatch(method, result.status, started),
            Err(e) => metrics::record_failure(method, e.kind()),
        }
        outcome
    }

    async fn dispatch_inner(
        &self,
        method: Method,
        path: &str,
        args: CallArgs,
    ) -> Result<DispatchResult, DispatchError> {
        let found = self.inner.matcher.find(method, path).map_err(|e| {
            tracing::warn!(error = %e, "Dispatch rejected: no matching route");
            DispatchError::from(e)
        })?;
        let key = found.key.to_string();
        let route = found.route.clone();

        let body = match args.body {
            None | Some(Value::Null) => None,
            Some(body) => {
                if !method.is_mutation() {
                    return Err(DispatchError::BodyNotAllowed {
                        method,
                        path: path.to_string(),
                    });
                }
                let text = serde_json::to_string(&body).map_err(DispatchError::Serialize)?;
                Some(RequestBody::Text(text))
            }
        };

        let request = ApiRequest {
            path: self.complete_url(path, args.query.as_ref())?,
            method,
            headers: self.headers(),
            body,
            credentials: self.inner.config.credentials,
            signal: args.signal,
        };

        tracing::debug!(route = %key, url = %request.path, "Invoking transport");
        let response = self.inner.transport.invoke(request).await.map_err(|e| {
            tracing::warn!(route = %key, error = %e, "Transport failed");
            DispatchError::from(e)
        })?;
        tracing::debug!(route = %key, status = response.status, "Dispatch complete");

        if self.inner.config.validate_responses {
            if let Some(shape) = route.response(response.status) {
                shape
                    .validate(&response.body.to_value())
                    .map_err(|violation| DispatchError::ResponseValidation {
                        status: response.status,
                        violation,
                    })?;
            }
        }

        Ok(DispatchResult::new(response.status, response.body, key, route))
    }

    /// Dispatch a typed endpoint.
    pub async fn call<E: Endpoint>(&self, endpoint: &E) -> Result<DispatchResult, DispatchError> {
        let query = endpoint
            .query()
            .map(serde_json::to_value)
            .transpose()
            .map_err(|e| DispatchError::Query(query::QueryError::Serialize(e)))?;
        let body = endpoint
            .body()
            .map(serde_json::to_value)
            .transpose()
            .map_err(DispatchError::Serialize)?;

        let args = CallArgs {
            query,
            body,
            signal: endpoint.signal(),
        };
        self.dispatch(E::METHOD, &endpoint.path(), args).await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.inner.config.base_url)
            .field("routes", &self.inner.matcher.len())
            .field("validate_responses", &self.inner.config.validate_responses)
            .finish()
    }
}

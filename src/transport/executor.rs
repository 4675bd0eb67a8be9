//! Request execution.
//!
//! # Responsibilities
//! - Serialize the body once and build each attempt's request
//! - Attach authentication, caller headers and query parameters
//! - Hand single attempts to the retry strategy and classify their outcome
//! - Decode successful bodies inside the attempt; an undecodable 2xx is a
//!   host failure like any other
//! - Bind write responses to a task waiter

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::config::{validate_config, ClientConfig, ConfigError};
use crate::host::{CallType, HostRegistry, StatefulHost};
use crate::resilience::outcome::{classify_status, classify_transport_error, StatusClass};
use crate::resilience::{RetryOutcome, RetryStrategy};
use crate::task::{TaskHandle, TaskPoller, TaskResponse, TaskStatus, TaskWaiter, WaitOutcome, Waitable};
use crate::transport::error::{FailureCause, TransportError, TransportResult};
use crate::transport::request::RequestOptions;

const APPLICATION_ID_HEADER: &str = "x-algolia-application-id";
const API_KEY_HEADER: &str = "x-algolia-api-key";

/// Error body returned by the API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Message for a failed response: the API's `message` field, else the raw
/// body, else the status reason.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.message;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        trimmed.to_string()
    }
}

/// Executes API calls with host failover.
///
/// Cheap to clone; clones share the HTTP connection pool and host registry.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
    strategy: RetryStrategy,
}

impl HttpTransport {
    /// Create a transport with its own host registry.
    pub fn new(config: ClientConfig) -> TransportResult<Self> {
        let registry = Arc::new(HostRegistry::new(
            &config.effective_hosts(),
            config.host_down_expiry(),
        ));
        Self::with_registry(config, registry)
    }

    /// Create a transport sharing an existing host registry.
    ///
    /// The configuration is validated the same way a loaded file is.
    pub fn with_registry(config: ClientConfig, registry: Arc<HostRegistry>) -> TransportResult<Self> {
        validate_config(&config).map_err(|errors| TransportError::Config(ConfigError::Validation(errors)))?;

        let client = reqwest::Client::builder()
            .connect_timeout(config.timeouts.connect())
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(TransportError::Client)?;

        tracing::debug!(
            application_id = %config.application_id,
            hosts = registry.hosts().len(),
            "Transport initialized"
        );

        let strategy = RetryStrategy::new(registry, config.timeouts.clone());
        Ok(Self {
            client,
            config: Arc::new(config),
            strategy,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<HostRegistry> {
        self.strategy.registry()
    }

    /// Perform one logical call and decode the response into `R`.
    pub async fn execute<B, R>(
        &self,
        method: Method,
        path: &str,
        call_type: CallType,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> TransportResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        if !path.starts_with('/') {
            return Err(TransportError::InvalidRequest(format!(
                "path must start with '/': {path}"
            )));
        }
        if options.timeout().is_some_and(|t| t.is_zero()) {
            return Err(TransportError::InvalidRequest(
                "timeout override must be greater than zero".into(),
            ));
        }
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(TransportError::Encode)?;
        let headers = self.build_headers(options)?;
        let query = options.query();

        let operation_id = Uuid::new_v4();
        let span = tracing::debug_span!(
            "api_call",
            %operation_id,
            %method,
            path,
            %call_type
        );

        let call = self
            .strategy
            .attempt(call_type, options.timeout(), |host, _timeout| {
                self.send_once::<R>(host, method.clone(), path, body.clone(), headers.clone(), &query)
            })
            .instrument(span);

        match options.cancellation() {
            Some(token) => cancellable(token, call).await,
            None => call.await,
        }
    }

    /// Perform a write call whose response carries a task id, binding the
    /// response to a waiter for that task on `index_name`.
    pub async fn execute_write<B, R>(
        &self,
        method: Method,
        path: &str,
        index_name: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> TransportResult<Waitable<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned + TaskResponse,
    {
        let response: R = self
            .execute(method, path, CallType::Write, body, options)
            .await?;
        let handle = TaskHandle::new(response.task_id(), index_name);
        Ok(Waitable::new(response, TaskWaiter::new(self.clone(), handle)))
    }

    /// Query the status of a task.
    pub async fn task_status(
        &self,
        handle: &TaskHandle,
        options: &RequestOptions,
    ) -> TransportResult<TaskStatus> {
        self.execute::<(), _>(Method::GET, &handle.status_path(), CallType::Read, None, options)
            .await
    }

    /// Poll a task until it is published or the wait is abandoned.
    pub async fn wait_task(
        &self,
        handle: &TaskHandle,
        initial_delay: Duration,
        options: &RequestOptions,
    ) -> WaitOutcome {
        let poller = TaskPoller::new(initial_delay, self.config.polling.max_delay());
        let token = options.cancellation().cloned().unwrap_or_default();
        tracing::debug!(task_id = handle.task_id(), index = %handle.index(), "Waiting for task");
        poller
            .wait_for_completion(|| self.task_status(handle, options), &token)
            .await
    }

    fn build_headers(&self, options: &RequestOptions) -> TransportResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            APPLICATION_ID_HEADER,
            header_value(&self.config.application_id, APPLICATION_ID_HEADER)?,
        );
        let mut api_key = header_value(&self.config.api_key, API_KEY_HEADER)?;
        api_key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, api_key);

        for (name, value) in options.headers() {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::InvalidRequest(format!("header name '{name}': {e}")))?;
            let value = header_value(value, name.as_str())?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    /// One attempt against one host; the retry strategy bounds its duration.
    async fn send_once<R: DeserializeOwned>(
        &self,
        host: Arc<StatefulHost>,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        headers: HeaderMap,
        query: &[(&str, &str)],
    ) -> RetryOutcome<R> {
        let url = endpoint_url(&host.url, path);

        let mut request = self.client.request(method, url).headers(headers);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return RetryOutcome::RetryableError(classify_transport_error(&e)),
        };
        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => return RetryOutcome::RetryableError(classify_transport_error(&e)),
        };

        match classify_status(status) {
            StatusClass::Success => match serde_json::from_str::<R>(&text) {
                Ok(value) => RetryOutcome::Success(value),
                Err(e) => RetryOutcome::RetryableError(FailureCause::Decode(e.to_string())),
            },
            StatusClass::Application => RetryOutcome::ApplicationError {
                status: status.as_u16(),
                message: error_message(status, &text),
            },
            StatusClass::Retryable => RetryOutcome::RetryableError(FailureCause::Server {
                status: status.as_u16(),
                message: error_message(status, &text),
            }),
        }
    }
}

/// Append an absolute API path to a host's base URL, keeping any path
/// prefix the base carries.
fn endpoint_url(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    let joined = format!("{}{}", base.path().trim_end_matches('/'), path);
    url.set_path(&joined);
    url
}

fn header_value(value: &str, name: &str) -> TransportResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| TransportError::InvalidRequest(format!("header '{name}': {e}")))
}

/// Race a call against a cancellation token; the losing future is dropped,
/// which closes any in-flight connection.
async fn cancellable<T>(
    token: &CancellationToken,
    call: impl std::future::Future<Output = TransportResult<T>>,
) -> TransportResult<T> {
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::debug!("Call cancelled by caller");
            Err(TransportError::Cancelled)
        }
        result = call => result,
    }
}

//! The SdkClient wrapper.
//!
//! # Responsibilities
//! - Construct the wrapped generated client (header wiring, security
//!   worker, legacy token setter)
//! - Run every call through the normalizing combinator: inject the
//!   cancellation signal, race the timeout, map the outcome to an
//!   [`Envelope`]
//! - Report raw failures to the configured observer, never for aborts
//!
//! # Design Decisions
//! - No runtime reflection: callers hand the wrapper a closure naming the
//!   leaf method, which keeps the full method signature typed
//! - Wrapped calls never reject; every outcome is an envelope
//! - Each call owns its controller and timer; concurrent calls on one
//!   client never interfere

pub mod abort;
pub mod envelope;

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use uuid::Uuid;

use crate::client::abort::{AbortController, AbortHandle};
use crate::client::envelope::Envelope;
use crate::config::loader::ConfigError;
use crate::config::schema::{ClientOptions, ErrorCallback};
use crate::config::validation::{validate_base_url, ValidationError};
use crate::http::types::{ApiFailure, ApiResult};
use crate::http::{ApiConfig, CallParams, GeneratedClient, SecurityWorker};
use crate::observability::metrics;

/// Normalizing, cancellable wrapper around a generated API client.
///
/// Construct with [`SdkClient::new`]; issue calls with [`SdkClient::call`]
/// or [`SdkClient::start_call`]. The wrapped client stays reachable via
/// [`SdkClient::api`] for anything the wrapper does not cover.
pub struct SdkClient<A> {
    api: A,
    timeout: Option<Duration>,
    on_request_error: Option<ErrorCallback>,
}

impl<A: GeneratedClient> SdkClient<A> {
    /// Build the wrapper and its generated client from options.
    pub fn new(options: ClientOptions) -> Result<Self, ConfigError> {
        Self::with_http(options, None)
    }

    /// Like [`new`](SdkClient::new), with an injected HTTP client
    /// (connection pool sharing, test instrumentation).
    pub fn with_http(
        options: ClientOptions,
        http: Option<reqwest::Client>,
    ) -> Result<Self, ConfigError> {
        validate_base_url(&options.base_url).map_err(|e| ConfigError::Validation(vec![e]))?;

        // Static tokens ride along twice: once in the base headers, once
        // through the security worker. Generators differ in which they read.
        let mut base_headers = HeaderMap::new();
        if let Some(token) = options.token.as_ref().and_then(|t| t.static_token()) {
            let value = bearer_value(token).map_err(|reason| {
                ConfigError::Validation(vec![ValidationError::InvalidToken(reason)])
            })?;
            base_headers.insert(AUTHORIZATION, value);
        }

        let security_worker: Option<SecurityWorker> =
            options.token.clone().map(|source| {
                Arc::new(move || {
                    let token = source.resolve()?;
                    match bearer_value(&token) {
                        Ok(value) => {
                            let mut headers = HeaderMap::new();
                            headers.insert(AUTHORIZATION, value);
                            Some(headers)
                        }
                        Err(reason) => {
                            tracing::warn!(%reason, "dropping token with invalid header characters");
                            None
                        }
                    }
                }) as SecurityWorker
            });

        let config = ApiConfig {
            base_url: options.base_url.clone(),
            base_headers,
            security_worker,
            http,
        };
        let mut api = A::from_config(config);
        if let Some(token) = options.token.as_ref().and_then(|t| t.static_token()) {
            api.set_auth_token(token);
        }

        tracing::debug!(
            base_url = %options.base_url,
            timeout = ?options.timeout,
            "sdk client constructed"
        );

        Ok(Self {
            api,
            timeout: options.timeout,
            on_request_error: options.on_request_error,
        })
    }
}

impl<A> SdkClient<A> {
    /// The wrapped generated client.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Run one call through the wrapper.
    ///
    /// `op` receives the wrapped client and the per-call parameters
    /// (cancellation signal + request id) and names the leaf method:
    ///
    /// ```ignore
    /// let envelope = client
    ///     .call(|api, params| async move { api.users.get_user("123", &params).await })
    ///     .await;
    /// ```
    pub async fn call<'a, T, F, Fut>(&'a self, op: F) -> Envelope<T>
    where
        F: FnOnce(&'a A, CallParams) -> Fut,
        Fut: Future<Output = ApiResult<T>> + 'a,
    {
        let controller = AbortController::new();
        let params = CallParams::new(controller.signal());
        let request_id = params.request_id;
        let fut = op(&self.api, params);
        drive(
            self.timeout,
            self.on_request_error.clone(),
            request_id,
            controller,
            fut,
        )
        .await
    }

    /// Like [`call`](SdkClient::call), returning a [`PendingCall`] whose
    /// abort handle is available before the call resolves.
    pub fn start_call<'a, T, F, Fut>(&'a self, op: F) -> PendingCall<'a, T>
    where
        F: FnOnce(&'a A, CallParams) -> Fut,
        Fut: Future<Output = ApiResult<T>> + Send + 'a,
        T: Send + 'a,
    {
        let controller = AbortController::new();
        let handle = controller.handle();
        let params = CallParams::new(controller.signal());
        let request_id = params.request_id;
        let fut = op(&self.api, params);
        PendingCall {
            handle,
            fut: Box::pin(drive(
                self.timeout,
                self.on_request_error.clone(),
                request_id,
                controller,
                fut,
            )),
        }
    }
}

impl<A> std::fmt::Debug for SdkClient<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdkClient")
            .field("timeout", &self.timeout)
            .field("on_request_error", &self.on_request_error.is_some())
            .finish()
    }
}

/// An in-flight wrapped call. Resolves to the call's [`Envelope`]; exposes
/// the abort handle for cancellation before resolution.
pub struct PendingCall<'a, T> {
    fut: BoxFuture<'a, Envelope<T>>,
    handle: AbortHandle,
}

impl<'a, T> PendingCall<'a, T> {
    /// Handle for cancelling this call early.
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.clone()
    }

    /// Cancel this call.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl<'a, T> Future for PendingCall<'a, T> {
    type Output = Envelope<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.fut.as_mut().poll(cx)
    }
}

/// Race the underlying call against cancellation and the timeout, then
/// normalize whatever settled into an envelope. Settlement drops the timer,
/// so a late expiry cannot fire into a finished call.
async fn drive<T, Fut>(
    timeout: Option<Duration>,
    on_request_error: Option<ErrorCallback>,
    request_id: Uuid,
    controller: AbortController,
    fut: Fut,
) -> Envelope<T>
where
    Fut: Future<Output = ApiResult<T>>,
{
    let handle = controller.handle();
    let signal = controller.signal();

    tokio::pin!(fut);
    let settled = tokio::select! {
        result = &mut fut => Some(result),
        _ = signal.cancelled() => None,
        _ = deadline(timeout) => {
            // expiry routes through the same controller as a manual abort
            handle.abort();
            None
        }
    };

    match settled {
        Some(Ok(response)) => {
            tracing::debug!(
                request_id = %request_id,
                status = response.status,
                "request succeeded"
            );
            metrics::record_call("success");
            Envelope::success(response.data, response.status, handle)
        }
        Some(Err(failure)) if !failure.is_abort() => {
            report(&on_request_error, &failure);
            tracing::warn!(
                request_id = %request_id,
                error = %failure,
                status = ?failure.status(),
                "request failed"
            );
            metrics::record_call("failure");
            metrics::record_failure(failure.kind());
            Envelope::failure(failure.to_string(), failure.status(), handle)
        }
        _ => {
            tracing::debug!(request_id = %request_id, "request aborted");
            metrics::record_call("aborted");
            metrics::record_abort();
            Envelope::aborted(handle)
        }
    }
}

async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

/// Invoke the error observer. A panicking observer must not break the
/// no-reject contract, so unwinds are contained here.
fn report(callback: &Option<ErrorCallback>, failure: &ApiFailure) {
    if let Some(callback) = callback {
        if catch_unwind(AssertUnwindSafe(|| callback(failure))).is_err() {
            tracing::warn!("on_request_error callback panicked");
        }
    }
}

fn bearer_value(token: &str) -> Result<HeaderValue, String> {
    HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| e.to_string())
}

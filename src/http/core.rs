//! HTTP round-trip execution for generated clients.
//!
//! # Responsibilities
//! - Build requests against the configured base URL
//! - Layer headers: base, then security worker, then per-call
//! - Race the round-trip against the call's cancellation signal
//! - Map responses and transport errors into the failure taxonomy
//!
//! One attempt per call; retries, pooling tuning, and backoff live outside
//! this component.

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::http::types::{ApiFailure, ApiResponse, ApiResult};
use crate::http::{ApiConfig, CallParams, SecurityWorker};

/// Request executor shared by a generated client's namespaces.
pub struct HttpCore {
    client: reqwest::Client,
    base_url: String,
    base_headers: HeaderMap,
    security_worker: Option<SecurityWorker>,
}

impl HttpCore {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            client: config.http.unwrap_or_default(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            base_headers: config.base_headers,
            security_worker: config.security_worker,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute one round-trip and decode the body into `T`.
    ///
    /// Resolves to [`ApiFailure::Aborted`] as soon as the call's signal
    /// fires; dropping the in-flight future is what tears the attempt down.
    pub async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &CallParams,
    ) -> ApiResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let exchange = async {
            let (status, success, bytes) = self.roundtrip(method, path, body, params).await?;
            if success {
                let data =
                    serde_json::from_slice(&bytes).map_err(|e| ApiFailure::decode(status, e))?;
                Ok(ApiResponse { data, status })
            } else {
                Err(ApiFailure::from_error_body(status, &bytes))
            }
        };

        tokio::select! {
            result = exchange => result,
            _ = params.signal.cancelled() => {
                tracing::debug!(request_id = %params.request_id, "request cancelled in flight");
                Err(ApiFailure::Aborted)
            }
        }
    }

    /// Execute one round-trip, discarding the response body. For endpoints
    /// answering 204 or with irrelevant payloads.
    pub async fn request_unit<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &CallParams,
    ) -> ApiResult<()>
    where
        B: Serialize + ?Sized,
    {
        let exchange = async {
            let (status, success, bytes) = self.roundtrip(method, path, body, params).await?;
            if success {
                Ok(ApiResponse { data: (), status })
            } else {
                Err(ApiFailure::from_error_body(status, &bytes))
            }
        };

        tokio::select! {
            result = exchange => result,
            _ = params.signal.cancelled() => {
                tracing::debug!(request_id = %params.request_id, "request cancelled in flight");
                Err(ApiFailure::Aborted)
            }
        }
    }

    async fn roundtrip<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        params: &CallParams,
    ) -> Result<(u16, bool, Vec<u8>), ApiFailure>
    where
        B: Serialize + ?Sized,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self
            .client
            .request(method.clone(), url.as_str())
            .headers(self.base_headers.clone());

        // Resolved per request: rotation takes effect without a rebuild.
        if let Some(worker) = &self.security_worker {
            if let Some(auth_headers) = worker() {
                request = request.headers(auth_headers);
            }
        }
        if !params.headers.is_empty() {
            request = request.headers(params.headers.clone());
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(
            method = %method,
            url = %url,
            request_id = %params.request_id,
            "dispatching request"
        );

        let response = request.send().await?;
        let status = response.status().as_u16();
        let success = response.status().is_success();
        let bytes = response.bytes().await?.to_vec();

        if !success {
            tracing::debug!(
                status,
                request_id = %params.request_id,
                "request returned error status"
            );
        }
        Ok((status, success, bytes))
    }
}

impl std::fmt::Debug for HttpCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpCore")
            .field("base_url", &self.base_url)
            .field("security_worker", &self.security_worker.is_some())
            .finish()
    }
}

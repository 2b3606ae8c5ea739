//! Minimal generated-style client.
//!
//! The smallest client obeying the [`GeneratedClient`] contract: untyped
//! JSON in and out. Used by the probe CLI and handy as a template for
//! hand-written clients where running the generator is overkill.

use reqwest::Method;
use serde_json::Value;

use crate::http::core::HttpCore;
use crate::http::types::ApiResult;
use crate::http::{ApiConfig, CallParams, GeneratedClient};

/// Untyped JSON client over [`HttpCore`].
#[derive(Debug)]
pub struct RawApi {
    core: HttpCore,
}

impl GeneratedClient for RawApi {
    fn from_config(config: ApiConfig) -> Self {
        Self {
            core: HttpCore::new(config),
        }
    }
}

impl RawApi {
    pub fn core(&self) -> &HttpCore {
        &self.core
    }

    /// GET `path`, decoding the response as JSON.
    pub async fn get_json(&self, path: &str, params: &CallParams) -> ApiResult<Value> {
        self.core
            .request(Method::GET, path, None::<&Value>, params)
            .await
    }

    /// Issue `method` against `path` with an optional JSON body.
    pub async fn request_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        params: &CallParams,
    ) -> ApiResult<Value> {
        self.core.request(method, path, body, params).await
    }

    /// Issue `method` against `path`, ignoring the response body.
    pub async fn request_unit(
        &self,
        method: Method,
        path: &str,
        params: &CallParams,
    ) -> ApiResult<()> {
        self.core
            .request_unit(method, path, None::<&Value>, params)
            .await
    }
}

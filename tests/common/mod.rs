//! Shared utilities for integration testing: a mock API server and a
//! hand-written generated-style client over it.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::http::{HeaderMap as RequestHeaders, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use reqwest::Method;
use sdk_client::http::core::HttpCore;
use sdk_client::{ApiConfig, ApiResult, CallParams, GeneratedClient};

/// Start the mock API on an ephemeral port.
pub async fn start_mock_api() -> SocketAddr {
    let app = Router::new()
        .route("/users/{id}", get(get_user))
        .route("/slow", get(slow))
        .route("/auth/echo", get(auth_echo))
        .route("/broken", get(broken))
        .route("/gateway", get(gateway))
        .route("/echo", post(echo_body));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}

async fn get_user(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "123" {
        (
            StatusCode::OK,
            Json(json!({"id": "123", "name": "John Doe"})),
        )
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"error": {"message": "User not found"}})),
        )
    }
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(1000)).await;
    Json(json!({"ok": true}))
}

async fn auth_echo(headers: RequestHeaders) -> Json<Value> {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    Json(json!({"authorization": auth}))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "not json at all")
}

async fn gateway() -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({"message": "upstream exploded"})),
    )
}

async fn echo_body(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

/// What an OpenAPI generator would emit for the mock API: namespaces as
/// struct fields, one async method per endpoint, all over one `HttpCore`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
}

pub struct DemoApi {
    pub users: Users,
    pub system: System,
}

pub struct Users {
    core: Arc<HttpCore>,
}

pub struct System {
    core: Arc<HttpCore>,
}

impl GeneratedClient for DemoApi {
    fn from_config(config: ApiConfig) -> Self {
        let core = Arc::new(HttpCore::new(config));
        Self {
            users: Users { core: core.clone() },
            system: System { core },
        }
    }
}

impl Users {
    pub async fn get_user(&self, id: &str, params: &CallParams) -> ApiResult<User> {
        self.core
            .request(Method::GET, &format!("/users/{id}"), None::<&Value>, params)
            .await
    }
}

impl System {
    pub async fn slow(&self, params: &CallParams) -> ApiResult<Value> {
        self.core
            .request(Method::GET, "/slow", None::<&Value>, params)
            .await
    }

    pub async fn auth_echo(&self, params: &CallParams) -> ApiResult<Value> {
        self.core
            .request(Method::GET, "/auth/echo", None::<&Value>, params)
            .await
    }

    pub async fn broken(&self, params: &CallParams) -> ApiResult<Value> {
        self.core
            .request(Method::GET, "/broken", None::<&Value>, params)
            .await
    }

    pub async fn gateway(&self, params: &CallParams) -> ApiResult<Value> {
        self.core
            .request(Method::GET, "/gateway", None::<&Value>, params)
            .await
    }

    pub async fn echo(&self, body: &Value, params: &CallParams) -> ApiResult<Value> {
        self.core
            .request(Method::POST, "/echo", Some(body), params)
            .await
    }
}

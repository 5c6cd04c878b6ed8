//! REST client for integration testing.
//!
//! Drives the real router with `tower::ServiceExt::oneshot`, no socket.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use server_core::common::CitizenId;
use server_core::domains::auth::JwtService;
use server_core::kernel::ServerDeps;
use server_core::server::{build_app, HttpOptions};
use std::sync::Arc;
use tower::ServiceExt;

pub struct ApiClient {
    router: Router,
    jwt_service: Arc<JwtService>,
}

#[derive(Debug)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn assert_status(self, expected: StatusCode) -> Value {
        assert_eq!(self.status, expected, "unexpected response body: {}", self.body);
        self.body
    }
}

/// Who is calling
#[derive(Debug, Clone)]
pub struct Caller {
    pub citizen_id: CitizenId,
    pub email: String,
    pub display_name: String,
    pub is_admin: bool,
}

impl Caller {
    pub fn citizen(display_name: &str) -> Self {
        let citizen_id = CitizenId::new();
        Self {
            email: format!("{}@example.in", citizen_id),
            display_name: display_name.to_string(),
            citizen_id,
            is_admin: false,
        }
    }

    pub fn admin(display_name: &str) -> Self {
        Self {
            is_admin: true,
            ..Self::citizen(display_name)
        }
    }
}

impl ApiClient {
    pub fn new(deps: ServerDeps, jwt_service: Arc<JwtService>) -> Self {
        Self {
            router: build_app(deps, HttpOptions::default()),
            jwt_service,
        }
    }

    pub fn token_for(&self, caller: &Caller) -> String {
        self.jwt_service
            .create_token(
                caller.citizen_id.into_uuid(),
                &caller.email,
                &caller.display_name,
                caller.is_admin,
            )
            .expect("Failed to create token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        caller: Option<&Caller>,
        body: Option<Value>,
    ) -> ApiResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(caller) = caller {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token_for(caller)),
            );
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        ApiResponse { status, body }
    }

    pub async fn get(&self, uri: &str, caller: Option<&Caller>) -> ApiResponse {
        self.request(Method::GET, uri, caller, None).await
    }

    pub async fn post(&self, uri: &str, caller: Option<&Caller>, body: Value) -> ApiResponse {
        self.request(Method::POST, uri, caller, Some(body)).await
    }
}

//! Shared harness for HTTP-level tests.
//!
//! Builds the full router (auth gate, handlers, HTTP middleware) over the
//! in-memory store and drives it with `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header::CONTENT_TYPE},
};
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use expense_tracker::{
    app::build_router,
    config::Config,
    repos::MemoryExpenseRepo,
    services::auth::{TokenClaims, TokenIssuer, TokenVerifier, UserClaim},
    state::AppState,
};

pub const SECRET: &str = "integration-test-secret";

pub struct TestApp {
    router: Router,
    pub repo: MemoryExpenseRepo,
    issuer: TokenIssuer,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            _ => None,
        })
        .expect("test config");

        let repo = MemoryExpenseRepo::new();
        let verifier = TokenVerifier::new(SECRET, 0).expect("verifier");
        let state = AppState::new(Arc::new(repo.clone()), Arc::new(verifier));

        Self {
            router: build_router(state, &config),
            repo,
            issuer: TokenIssuer::new(SECRET, 3600).expect("issuer"),
        }
    }

    pub fn token_for(&self, user: Uuid) -> String {
        self.issuer.issue(user).expect("issue token")
    }

    pub fn sign(&self, claims: &TokenClaims) -> String {
        self.issuer.sign(claims).expect("sign token")
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("request execution");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body extraction");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    /// Create an expense through the API and return its JSON representation.
    pub async fn create(&self, token: &str, body: Value) -> Value {
        let (status, json) = self
            .send(request(Method::POST, "/api/expenses", Some(token), Some(body)))
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {json}");
        json
    }

    pub async fn list(&self, token: &str, query: &str) -> Vec<Value> {
        let uri = if query.is_empty() {
            "/api/expenses".to_string()
        } else {
            format!("/api/expenses?{query}")
        };
        let (status, json) = self.send(request(Method::GET, &uri, Some(token), None)).await;
        assert_eq!(status, StatusCode::OK, "list failed: {json}");
        json.as_array().expect("array body").clone()
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("x-auth-token", token);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request build")
}

pub fn now_secs() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

pub fn claims_for(user: Uuid, exp: u64) -> TokenClaims {
    TokenClaims {
        user: UserClaim {
            id: user.to_string(),
        },
        iat: Some(now_secs()),
        exp,
        nbf: None,
    }
}

pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}

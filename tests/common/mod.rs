//! Common test utilities for driving the emulator's router in-process

#![allow(dead_code)] // Not every test file uses every helper

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bamsim::{EmulatorStore, router};
use serde_json::Value;
use tower::ServiceExt;

/// Router plus a handle on the state behind it
pub struct TestApp {
    pub store: EmulatorStore,
    router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_store(EmulatorStore::default())
    }

    pub fn with_store(store: EmulatorStore) -> Self {
        Self {
            router: router(store.clone()),
            store,
        }
    }

    /// Send a request and decode the JSON body (`Null` for empty bodies)
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        authorization: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        self.send_request(builder.body(Body::from(body)).unwrap())
            .await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    /// Log in through the v1 endpoint and return the token
    pub async fn login(&self) -> String {
        let (status, body) = self
            .send(
                "GET",
                "/Services/REST/v1/login",
                Some(&basic("alice", "secret")),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }
}

pub fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:{}", username, password)))
}

pub fn bam(token: &str) -> String {
    format!("BAMAuthToken: {}", token)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

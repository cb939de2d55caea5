//! Test doubles for `ChatModel` and the provider endpoint.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use super::{ChatModel, ChatRequest, LlmError};

/// Returns a canned reply (or a provider error) and records every request it sees.
pub struct StubModel {
    reply: Option<String>,
    calls: Mutex<Vec<ChatRequest>>,
}

impl StubModel {
    pub fn replying(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for StubModel {
    async fn complete(&self, request: &ChatRequest) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.reply {
            Some(text) => Ok(text.trim().to_string()),
            None => Err(LlmError::Api {
                status: 503,
                message: "unavailable".into(),
            }),
        }
    }

    fn model(&self) -> &str {
        "stub"
    }
}

/// Serves `router` as a throwaway provider on a random local port and returns its base URL.
pub async fn spawn_provider(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}/v1")
}

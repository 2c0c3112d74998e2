// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Scripted transport for tests
//!
//! Responses are returned in the order they were queued and every request is
//! recorded, so tests can assert on how many network calls were made and
//! what they carried.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::{IdentifierClientError, IdentifierClientResult};
use crate::transport::{HttpRequest, HttpResponse, Transport};

#[derive(Debug, Default)]
struct MockState {
    responses: VecDeque<HttpResponse>,
    requests: Vec<HttpRequest>,
}

/// Transport that replays queued responses and records requests
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the recorded requests
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Queue a response with a JSON body
    pub fn push_json(&self, status: StatusCode, body: Value) -> &Self {
        self.push(HttpResponse::new(status, body.to_string()))
    }

    /// Queue a raw response
    pub fn push(&self, response: HttpResponse) -> &Self {
        self.state().responses.push_back(response);
        self
    }

    /// Queue a successful identity-provider token response
    pub fn push_token(&self, access_token: &str, expires_in: i64) -> &Self {
        self.push_json(
            StatusCode::OK,
            serde_json::json!({
                "access_token": access_token,
                "expires_in": expires_in,
                "token_type": "Bearer",
                "resource_server": "identifiers.globus.org",
                "scope": "https://auth.globus.org/scopes/identifiers.globus.org/create_update",
            }),
        )
    }

    /// All requests sent so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state().requests.len()
    }

    /// Responses queued but not yet consumed
    pub fn pending_responses(&self) -> usize {
        self.state().responses.len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> IdentifierClientResult<HttpResponse> {
        let mut state = self.state();
        let url = request.url.to_string();
        state.requests.push(request);
        state.responses.pop_front().ok_or_else(|| {
            IdentifierClientError::UnexpectedResponse(format!("no mock response queued for {url}"))
        })
    }
}

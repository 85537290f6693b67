//! Optional outbound call to an external LLM reranker.
//!
//! The core only ever builds the rerank payload (see [`crate::rerank`]); this
//! module is the host-shell transport that posts it. Degradation is silent
//! by design — a reranker failure never changes a candidate's decision.

use reqwest::Client;
use serde_json::Value;
use tracing::warn;

/// Wraps a `reqwest::Client` pointed at a fixed reranker endpoint.
pub struct RerankerClient {
    client: Client,
    endpoint: String,
    bearer_token: Option<String>,
}

impl RerankerClient {
    pub fn new(endpoint: impl Into<String>, bearer_token: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            bearer_token,
        }
    }

    /// POSTs `payload` as `application/json`. Any transport, status, or
    /// decode failure degrades to `None` and is logged as a warning — this
    /// never changes the candidate's decision.
    pub async fn send(&self, payload: &Value) -> Option<Value> {
        let mut request = self.client.post(&self.endpoint).json(payload);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "reranker request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "reranker returned non-success status");
            return None;
        }

        match response.json::<Value>().await {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, "reranker response was not valid JSON");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction_accepts_optional_token() {
        let with_token = RerankerClient::new("https://example.test/rerank", Some("secret".to_string()));
        let without_token = RerankerClient::new("https://example.test/rerank", None);
        assert_eq!(with_token.endpoint, "https://example.test/rerank");
        assert!(without_token.bearer_token.is_none());
    }
}

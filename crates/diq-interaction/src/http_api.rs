//! reqwest implementation of the DecisionIQ REST API.

use async_trait::async_trait;
use diq_core::api::{AuthApi, DecisionApi};
use diq_core::config::ClientConfig;
use diq_core::decision::{DecisionDraft, DecisionRecord, Outcome};
use diq_core::session::{Credential, UserProfile};
use diq_core::{DiqError, Result};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;

use crate::response;

/// HTTP client for the DecisionIQ backend.
///
/// One request per call: no retries, no coalescing, and no timeout beyond
/// the transport default.
#[derive(Clone)]
pub struct HttpApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct TokenRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ProfileUpdateRequest<'a> {
    username: &'a str,
    email: &'a str,
}

#[derive(Debug, Serialize)]
struct OutcomePatchRequest<'a> {
    outcome: &'a Outcome,
}

impl HttpApiClient {
    /// Creates a client rooted at `base_url` (e.g. `http://localhost:8000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.normalized_base_url())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path such as `/decisions/`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn decision_url(&self, id: &str) -> String {
        self.url(&format!("/decisions/{}/", id))
    }

    /// Attaches `Authorization: Bearer <credential>`.
    fn auth_request(&self, request: RequestBuilder, credential: &Credential) -> RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, credential.bearer_header())
    }

    /// Sends the request and reads the whole body as text.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<(StatusCode, String)> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!("[HttpApi] {} request failed: {}", what, e);
            DiqError::network(e.to_string())
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| {
            tracing::warn!("[HttpApi] {} body could not be read: {}", what, e);
            DiqError::network(e.to_string())
        })?;
        tracing::debug!("[HttpApi] {} status: {} body: {} bytes", what, status, body.len());
        Ok((status, body))
    }

    /// Sends a protected request and decodes its JSON body.
    async fn send_protected<T: serde::de::DeserializeOwned>(
        &self,
        request: RequestBuilder,
        credential: &Credential,
        what: &str,
    ) -> Result<T> {
        let (status, body) = self.send(self.auth_request(request, credential), what).await?;
        if !status.is_success() {
            return Err(response::protected_error(status, &body));
        }
        response::parse_body(&body, what)
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn obtain_token(&self, username: &str, password: &str) -> Result<Credential> {
        let request = self
            .client
            .post(self.url("/auth/token/"))
            .json(&TokenRequest { username, password });

        let (status, body) = self.send(request, "login").await?;
        if !status.is_success() {
            return Err(DiqError::server_rejected(
                status.as_u16(),
                response::login_error_message(&body),
            ));
        }

        response::access_token(&body).map(Credential::new)
    }

    async fn register(&self, username: &str, email: &str, password: &str) -> Result<()> {
        let request = self.client.post(self.url("/auth/register/")).json(&RegisterRequest {
            username,
            email,
            password,
        });

        let (status, body) = self.send(request, "register").await?;
        if !status.is_success() {
            return Err(DiqError::server_rejected(
                status.as_u16(),
                response::register_error_message(&body),
            ));
        }
        Ok(())
    }

    async fn fetch_profile(&self, credential: &Credential) -> Result<UserProfile> {
        self.send_protected(self.client.get(self.url("/me/")), credential, "profile")
            .await
    }

    async fn update_profile(
        &self,
        credential: &Credential,
        username: &str,
        email: &str,
    ) -> Result<UserProfile> {
        let request = self
            .client
            .patch(self.url("/me/update/"))
            .json(&ProfileUpdateRequest { username, email });
        self.send_protected(request, credential, "profile update")
            .await
    }
}

#[async_trait]
impl DecisionApi for HttpApiClient {
    async fn list_decisions(&self, credential: &Credential) -> Result<Vec<DecisionRecord>> {
        self.send_protected(self.client.get(self.url("/decisions/")), credential, "decisions")
            .await
    }

    async fn create_decision(
        &self,
        credential: &Credential,
        draft: &DecisionDraft,
    ) -> Result<DecisionRecord> {
        let request = self.client.post(self.url("/decisions/")).json(draft);
        self.send_protected(request, credential, "create decision")
            .await
    }

    async fn patch_outcome(
        &self,
        credential: &Credential,
        id: &str,
        outcome: &Outcome,
    ) -> Result<DecisionRecord> {
        let request = self
            .client
            .patch(self.decision_url(id))
            .json(&OutcomePatchRequest { outcome });
        self.send_protected(request, credential, "update outcome")
            .await
    }

    async fn delete_decision(&self, credential: &Credential, id: &str) -> Result<()> {
        let request = self.auth_request(self.client.delete(self.decision_url(id)), credential);
        let (status, body) = self.send(request, "delete decision").await?;
        if response::is_delete_success(status) {
            Ok(())
        } else {
            Err(response::protected_error(status, &body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_follow_route_table() {
        let client = HttpApiClient::new("http://localhost:8000/api/");
        assert_eq!(client.base_url(), "http://localhost:8000/api");
        assert_eq!(client.url("/auth/token/"), "http://localhost:8000/api/auth/token/");
        assert_eq!(
            client.decision_url("65f0c2"),
            "http://localhost:8000/api/decisions/65f0c2/"
        );
    }

    #[test]
    fn test_outcome_patch_body_shape() {
        let outcome = Outcome {
            success: false,
            stress: 7,
            happiness: 3,
            notes: "rushed".to_string(),
        };
        let body = serde_json::to_value(OutcomePatchRequest { outcome: &outcome }).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "outcome": {"success": false, "stress": 7, "happiness": 3, "notes": "rushed"}
            })
        );
    }

    #[test]
    fn test_draft_body_has_all_fields() {
        let draft = DecisionDraft {
            situation: "s".to_string(),
            decision: "d".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(&draft).unwrap();
        for key in [
            "situation",
            "intent",
            "constraints",
            "alternatives",
            "decision",
            "reasoning",
        ] {
            assert!(body.get(key).is_some(), "missing {}", key);
        }
    }
}

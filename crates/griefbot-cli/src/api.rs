//! Experiment server REST client

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use griefbot::{DomainError, SessionFramework, SessionInfo};
use reqwest::Client;
use serde::{Deserialize, Serialize};

const REST_KEY_HEADER: &str = "otree-rest-key";

/// REST client for an oTree server
pub struct OtreeClient {
    client: Client,
    base_url: String,
    rest_key: Option<String>,
}

// ============================================
// API Request / Response Types
// ============================================

#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub session_config_name: &'a str,
    pub num_participants: usize,
}

#[derive(Debug, Deserialize)]
pub struct CreateSessionResponse {
    pub code: String,
    #[serde(default)]
    pub admin_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub participants: Vec<ParticipantResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ParticipantResponse {
    pub code: String,
}

impl OtreeClient {
    /// Create a new API client
    pub fn new(base_url: &str, rest_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            rest_key: rest_key.map(str::to_string),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start URL a bot opens for one participant
    pub fn participant_url(&self, participant_code: &str) -> String {
        format!("{}/InitializeParticipant/{}", self.base_url, participant_code)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.client.request(method, &url);
        match &self.rest_key {
            Some(key) => builder.header(REST_KEY_HEADER, key),
            None => builder,
        }
    }

    /// Create a session and return its code
    pub async fn create_session(
        &self,
        config_name: &str,
        num_participants: usize,
    ) -> Result<CreateSessionResponse> {
        let request = CreateSessionRequest {
            session_config_name: config_name,
            num_participants,
        };

        let resp = self
            .request(reqwest::Method::POST, "/api/sessions")
            .json(&request)
            .send()
            .await
            .context("Failed to connect to experiment server")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let created: CreateSessionResponse =
            resp.json().await.context("Failed to parse response")?;

        Ok(created)
    }

    /// Fetch session details including participant codes
    pub async fn get_session(&self, code: &str) -> Result<SessionResponse> {
        let resp = self
            .request(reqwest::Method::GET, &format!("/api/sessions/{}", code))
            .send()
            .await
            .context("Failed to connect to experiment server")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        let session: SessionResponse = resp.json().await.context("Failed to parse response")?;

        Ok(session)
    }

    async fn create_session_info(
        &self,
        config_name: &str,
        participant_count: usize,
    ) -> Result<SessionInfo> {
        let created = self.create_session(config_name, participant_count).await?;
        let session = self.get_session(&created.code).await?;
        let info = self.session_info(config_name, created, session);

        if info.participant_count() < participant_count {
            bail!(
                "Session {} has {} participants, expected {}",
                info.session_id,
                info.participant_count(),
                participant_count
            );
        }
        Ok(info)
    }

    fn session_info(
        &self,
        config_name: &str,
        created: CreateSessionResponse,
        session: SessionResponse,
    ) -> SessionInfo {
        let participant_codes: Vec<String> =
            session.participants.into_iter().map(|p| p.code).collect();
        let participant_urls = participant_codes
            .iter()
            .map(|code| self.participant_url(code))
            .collect();

        SessionInfo {
            session_id: created.code,
            config_name: config_name.to_string(),
            participant_codes,
            participant_urls,
            admin_url: created.admin_url,
        }
    }
}

#[async_trait]
impl SessionFramework for OtreeClient {
    async fn init_session(
        &self,
        config_name: &str,
        participant_count: usize,
    ) -> Result<SessionInfo, DomainError> {
        tracing::info!(config_name, participant_count, "Creating session");
        let info = self
            .create_session_info(config_name, participant_count)
            .await
            .map_err(|e| DomainError::external(format!("{:#}", e)))?;
        tracing::info!(session_id = %info.session_id, "Session created");
        Ok(info)
    }

    fn name(&self) -> &str {
        "otree"
    }
}

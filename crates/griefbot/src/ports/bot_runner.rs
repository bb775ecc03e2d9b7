//! Bot Runner Port
//!
//! Abstract interface to the LLM-backed automation library that drives one
//! participant slot through an experiment.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::entities::{PromptOverrides, SessionInfo};
use crate::domain::errors::DomainError;

/// One bot run for one participant slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BotRequest {
    pub url: String,
    pub session_name: String,
    pub session_id: String,
    pub participant_id: String,
    #[serde(rename = "user_prompts", skip_serializing_if = "Option::is_none")]
    pub prompt_overrides: Option<PromptOverrides>,
    /// Block until the bot has finished
    #[serde(skip)]
    pub wait: bool,
}

impl BotRequest {
    /// Request for slot `index` of `session`, or `None` if the slot does not exist
    pub fn for_slot(session: &SessionInfo, index: usize) -> Option<Self> {
        let (url, participant_id) = session.slot(index)?;
        Some(Self {
            url: url.to_string(),
            session_name: session.config_name.clone(),
            session_id: session.session_id.clone(),
            participant_id: participant_id.to_string(),
            prompt_overrides: None,
            wait: false,
        })
    }

    pub fn with_prompts(mut self, prompts: PromptOverrides) -> Self {
        self.prompt_overrides = Some(prompts);
        self
    }

    pub fn waiting(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }
}

/// Outcome of a single bot invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotRunStatus {
    /// The bot ran to completion
    Completed,
    /// The bot was started and keeps running in the background
    Detached,
}

/// LLM bot automation
#[async_trait]
pub trait BotRunner: Send + Sync {
    /// Run one bot; returns once it finished, or once it started if `wait` is false
    async fn run_single_bot(&self, request: BotRequest) -> Result<BotRunStatus, DomainError>;

    /// Run bots on every slot of a session and wait for all of them
    async fn run_bots_on_session(
        &self,
        session: &SessionInfo,
        prompt_overrides: Option<&PromptOverrides>,
    ) -> Result<(), DomainError> {
        for index in 0..session.participant_count() {
            let Some(mut request) = BotRequest::for_slot(session, index) else {
                continue;
            };
            request.prompt_overrides = prompt_overrides.cloned();
            self.run_single_bot(request.waiting(true)).await?;
        }
        Ok(())
    }
}

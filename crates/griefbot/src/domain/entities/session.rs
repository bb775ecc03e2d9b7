//! Session - Experiment session handles returned by the session framework

use serde::{Deserialize, Serialize};

/// A freshly created experiment session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub config_name: String,
    /// One code per participant slot, in slot order
    pub participant_codes: Vec<String>,
    /// Start URL per participant slot, aligned with `participant_codes`
    pub participant_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub admin_url: Option<String>,
}

impl SessionInfo {
    pub fn participant_count(&self) -> usize {
        self.participant_urls.len()
    }

    /// URL and participant code of a slot
    pub fn slot(&self, index: usize) -> Option<(&str, &str)> {
        let url = self.participant_urls.get(index)?;
        let code = self.participant_codes.get(index)?;
        Some((url.as_str(), code.as_str()))
    }
}

//! SessionLog - Record written after a completed session

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::profile::Profile;
use super::session::SessionInfo;

/// Timestamp layout used in the record and in the log file name
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Flattened profile fields as they appear in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub name: String,
    pub age: u32,
    pub loss_type: String,
    pub loss_circumstances: String,
    pub time_since_loss: String,
    pub support_preference: String,
    pub personality_trait: String,
    pub custom_details: BTreeMap<String, String>,
}

impl From<&Profile> for ProfileRecord {
    fn from(profile: &Profile) -> Self {
        Self {
            name: profile.name.clone(),
            age: profile.age,
            loss_type: profile.loss_type.to_string(),
            loss_circumstances: profile.loss_circumstances.to_string(),
            time_since_loss: profile.time_since_loss.to_string(),
            support_preference: profile.support_preference.to_string(),
            personality_trait: profile.personality_trait.to_string(),
            custom_details: profile.custom_details.clone(),
        }
    }
}

/// One JSON document per session run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionLog {
    pub timestamp: String,
    pub session_id: String,
    pub profile: ProfileRecord,
    pub session_info: SessionInfo,
}

impl SessionLog {
    pub fn new(profile: &Profile, session_info: &SessionInfo, at: DateTime<Local>) -> Self {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            session_id: session_info.session_id.clone(),
            profile: ProfileRecord::from(profile),
            session_info: session_info.clone(),
        }
    }

    /// `<prefix>_<timestamp>.json`
    pub fn file_name(&self, prefix: &str) -> String {
        format!("{}_{}.json", prefix, self.timestamp)
    }
}

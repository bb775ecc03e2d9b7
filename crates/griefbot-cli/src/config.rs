//! Configuration management for griefbot CLI
//!
//! Run settings live in a TOML file; server credentials in `secrets.env`.

use anyhow::{Context, Result};
use griefbot::{BotStrategy, ProfileOverrides, ProfileSelection, RunSettings, SessionLogWriter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "griefbot";
const CONFIG_FILE: &str = "config.toml";
const LOCAL_CONFIG_FILE: &str = "griefbot.toml";

const SERVER_URL_VAR: &str = "OTREE_SERVER_URL";
const REST_KEY_VAR: &str = "OTREE_REST_KEY";
const ADMIN_PASSWORD_VAR: &str = "OTREE_ADMIN_PASSWORD";

/// External bot program settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_bot_program")]
    pub program: String,
    #[serde(default = "default_bot_args")]
    pub args: Vec<String>,
}

fn default_bot_program() -> String {
    "python3".to_string()
}

fn default_bot_args() -> Vec<String> {
    vec!["-m".to_string(), "botex_bridge".to_string()]
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            program: default_bot_program(),
            args: default_bot_args(),
        }
    }
}

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile_type: ProfileSelection,
    pub predefined_profile_index: usize,
    pub num_sessions: usize,
    pub show_profile_details: bool,
    pub demonstrate_prompts_only: bool,
    pub run_comparative_sessions: bool,
    pub run_all_profiles: bool,
    pub export_data: bool,
    pub export_prefix: String,
    pub export_dir: PathBuf,
    pub config_name: String,
    pub strategy: BotStrategy,
    pub secrets_file: PathBuf,
    pub custom_profile: ProfileOverrides,
    pub bot: BotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_type: ProfileSelection::Predefined,
            predefined_profile_index: 0,
            num_sessions: 1,
            show_profile_details: true,
            demonstrate_prompts_only: false,
            run_comparative_sessions: false,
            run_all_profiles: false,
            export_data: true,
            export_prefix: "grief_support_session".to_string(),
            export_dir: PathBuf::from("."),
            config_name: "grief_support".to_string(),
            strategy: BotStrategy::PersonaSlot,
            secrets_file: PathBuf::from("secrets.env"),
            custom_profile: ProfileOverrides::default(),
            bot: BotConfig::default(),
        }
    }
}

impl Config {
    /// Get the user config file path
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join(CONFIG_DIR);
        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Resolve which file to load: explicit path, `./griefbot.toml`, user config
    pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            return Ok(Some(path.to_path_buf()));
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Ok(Some(local));
        }
        let user = Self::user_config_path()?;
        Ok(user.exists().then_some(user))
    }

    /// Load config from the resolved file, or defaults
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        match Self::locate(explicit)? {
            Some(path) => Ok((Self::from_file(&path)?, Some(path))),
            None => Ok((Self::default(), None)),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        Self::parse(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Settings for the orchestrator
    pub fn run_settings(&self) -> RunSettings {
        RunSettings {
            config_name: self.config_name.clone(),
            profile_selection: self.profile_type,
            predefined_profile_index: self.predefined_profile_index,
            custom_profile: self.custom_profile.clone(),
            num_sessions: self.num_sessions,
            show_profile_details: self.show_profile_details,
            demonstrate_prompts_only: self.demonstrate_prompts_only,
            run_comparative_sessions: self.run_comparative_sessions,
            run_all_profiles: self.run_all_profiles,
            strategy: self.strategy,
        }
    }

    /// Log writer when export is enabled
    pub fn log_writer(&self) -> Option<SessionLogWriter> {
        self.export_data
            .then(|| SessionLogWriter::new(&self.export_dir, &self.export_prefix))
    }
}

/// Experiment server credentials
#[derive(Debug, Clone)]
pub struct Secrets {
    pub server_url: String,
    pub rest_key: Option<String>,
    pub admin_password: Option<String>,
}

impl Secrets {
    /// Read `path` if it exists; process environment fills the gaps
    pub fn load(path: &Path) -> Result<Self> {
        let mut values: HashMap<String, String> = HashMap::new();
        if path.exists() {
            for item in dotenvy::from_path_iter(path)
                .with_context(|| format!("Failed to read secrets from {:?}", path))?
            {
                let (key, value) =
                    item.with_context(|| format!("Failed to parse secrets file {:?}", path))?;
                values.insert(key, value);
            }
        } else {
            tracing::debug!(path = %path.display(), "No secrets file, using environment");
        }

        let lookup = |key: &str| -> Option<String> {
            values
                .get(key)
                .cloned()
                .or_else(|| std::env::var(key).ok())
                .filter(|v| !v.is_empty())
        };

        let server_url = lookup(SERVER_URL_VAR).context(format!(
            "{} is not set. Add it to {:?} or the environment.",
            SERVER_URL_VAR, path
        ))?;

        Ok(Self {
            server_url,
            rest_key: lookup(REST_KEY_VAR),
            admin_password: lookup(ADMIN_PASSWORD_VAR),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.profile_type, ProfileSelection::Predefined);
        assert_eq!(config.num_sessions, 1);
        assert_eq!(config.config_name, "grief_support");
        assert_eq!(config.export_prefix, "grief_support_session");
        assert_eq!(config.bot.program, "python3");
        assert!(config.export_data);
    }

    #[test]
    fn test_parse_full_config() {
        let config = Config::parse(
            r#"
profile_type = "custom"
num_sessions = 3
export_data = false
strategy = "whole_session"

[custom_profile]
name = "Chris"
age = 35
loss_type = "pet"

[custom_profile.custom_details]
pet_name = "Biscuit"

[bot]
program = "botex-runner"
args = []
"#,
        )
        .unwrap();

        assert_eq!(config.profile_type, ProfileSelection::Custom);
        assert_eq!(config.strategy, BotStrategy::WholeSession);
        assert_eq!(config.custom_profile.name.as_deref(), Some("Chris"));
        assert_eq!(config.custom_profile.age, Some(35));
        assert_eq!(config.custom_profile.loss_type.as_deref(), Some("pet"));
        assert!(config.custom_profile.support_preference.is_none());
        assert_eq!(config.custom_profile.custom_details["pet_name"], "Biscuit");
        assert_eq!(config.bot.program, "botex-runner");
        assert!(config.bot.args.is_empty());
        assert!(config.log_writer().is_none());

        let settings = config.run_settings();
        assert_eq!(settings.num_sessions, 3);
        assert_eq!(settings.profile_selection, ProfileSelection::Custom);
    }

    #[test]
    fn test_unknown_profile_type_rejected() {
        assert!(Config::parse(r#"profile_type = "imaginary""#).is_err());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("griefbot.toml");
        fs::write(&path, "predefined_profile_index = 3\nexport_dir = \"logs\"\n").unwrap();

        let (config, loaded) = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.as_deref(), Some(path.as_path()));
        assert_eq!(config.predefined_profile_index, 3);
        let writer = config.log_writer().unwrap();
        assert_eq!(writer.dir(), Path::new("logs"));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&temp_dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_secrets_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("secrets.env");
        fs::write(
            &path,
            "OTREE_SERVER_URL=http://localhost:8000\nOTREE_REST_KEY=abc\nOTREE_ADMIN_PASSWORD=pw\n",
        )
        .unwrap();

        let secrets = Secrets::load(&path).unwrap();
        assert_eq!(secrets.server_url, "http://localhost:8000");
        assert_eq!(secrets.rest_key.as_deref(), Some("abc"));
        assert_eq!(secrets.admin_password.as_deref(), Some("pw"));
    }
}

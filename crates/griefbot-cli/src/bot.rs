//! Bot runner backed by an external program
//!
//! Each bot run starts the configured program and writes the request as one
//! JSON document to its stdin.

use async_trait::async_trait;
use griefbot::{BotRequest, BotRunStatus, BotRunner, DomainError, PromptOverrides, SessionInfo};
use std::io::ErrorKind;
use std::process::Stdio;
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};
use tokio::task::{JoinHandle, JoinSet};

/// How to launch one bot process
#[derive(Debug, Clone)]
struct Launcher {
    program: String,
    args: Vec<String>,
    env: Vec<(String, String)>,
}

impl Launcher {
    async fn spawn(&self, request: &BotRequest) -> Result<Child, DomainError> {
        let payload = serde_json::to_vec(request)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| {
                DomainError::external(format!("Failed to start bot program {}: {}", self.program, e))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(&payload).await {
                Ok(()) => {}
                // The exit status tells the rest
                Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                    tracing::warn!(participant_id = %request.participant_id, "Bot closed stdin early");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(child)
    }
}

async fn wait_for(mut child: Child, participant_id: &str) -> Result<(), DomainError> {
    let status = child.wait().await?;
    if status.success() {
        tracing::info!(participant_id, "Bot finished");
        Ok(())
    } else {
        Err(DomainError::external(format!(
            "Bot for participant {} exited with {}",
            participant_id, status
        )))
    }
}

/// Runs bots as subprocesses
pub struct CommandBotRunner {
    launcher: Launcher,
    detached: Mutex<Vec<JoinHandle<()>>>,
}

impl CommandBotRunner {
    pub fn new(program: &str, args: &[String]) -> Self {
        Self {
            launcher: Launcher {
                program: program.to_string(),
                args: args.to_vec(),
                env: Vec::new(),
            },
            detached: Mutex::new(Vec::new()),
        }
    }

    /// Extra environment passed to every bot process
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.launcher.env.push((key.to_string(), value.to_string()));
        self
    }

    /// Wait for bots started without `wait`
    pub async fn wait_detached(&self) {
        let handles: Vec<JoinHandle<()>> = match self.detached.lock() {
            Ok(mut detached) => detached.drain(..).collect(),
            Err(poisoned) => poisoned.into_inner().drain(..).collect(),
        };
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::warn!(error = %e, "Detached bot task failed");
            }
        }
    }

    fn track(&self, handle: JoinHandle<()>) {
        match self.detached.lock() {
            Ok(mut detached) => detached.push(handle),
            Err(poisoned) => poisoned.into_inner().push(handle),
        }
    }
}

#[async_trait]
impl BotRunner for CommandBotRunner {
    async fn run_single_bot(&self, request: BotRequest) -> Result<BotRunStatus, DomainError> {
        tracing::info!(
            session_id = %request.session_id,
            participant_id = %request.participant_id,
            custom_prompts = request.prompt_overrides.is_some(),
            wait = request.wait,
            "Starting bot"
        );
        let child = self.launcher.spawn(&request).await?;

        if request.wait {
            wait_for(child, &request.participant_id).await?;
            return Ok(BotRunStatus::Completed);
        }

        let participant_id = request.participant_id;
        self.track(tokio::spawn(async move {
            if let Err(e) = wait_for(child, &participant_id).await {
                tracing::error!(error = %e, "Detached bot failed");
            }
        }));
        Ok(BotRunStatus::Detached)
    }

    async fn run_bots_on_session(
        &self,
        session: &SessionInfo,
        prompt_overrides: Option<&PromptOverrides>,
    ) -> Result<(), DomainError> {
        let mut bots = JoinSet::new();
        let mut launch_error = None;
        for index in 0..session.participant_count() {
            let Some(mut request) = BotRequest::for_slot(session, index) else {
                continue;
            };
            request.prompt_overrides = prompt_overrides.cloned();
            match self.launcher.spawn(&request).await {
                Ok(child) => {
                    bots.spawn(async move { wait_for(child, &request.participant_id).await });
                }
                Err(e) => {
                    tracing::error!(session_id = %session.session_id, slot = index, error = %e, "Bot failed to start");
                    launch_error = Some(e);
                    break;
                }
            }
        }

        collect_bots(bots, launch_error, &session.session_id).await
    }
}

/// Wait for every started bot, then report the first error
async fn collect_bots(
    mut bots: JoinSet<Result<(), DomainError>>,
    mut first_error: Option<DomainError>,
    session_id: &str,
) -> Result<(), DomainError> {
    while let Some(joined) = bots.join_next().await {
        let result = joined.map_err(DomainError::external).and_then(|r| r);
        if let Err(e) = result {
            tracing::error!(session_id, error = %e, "Bot failed");
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }
    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::Path;

    fn session(n: usize) -> SessionInfo {
        let codes: Vec<String> = (1..=n).map(|i| format!("p{i}")).collect();
        SessionInfo {
            session_id: "abc".to_string(),
            config_name: "grief_support".to_string(),
            participant_urls: codes
                .iter()
                .map(|c| format!("http://localhost:8000/InitializeParticipant/{c}"))
                .collect(),
            participant_codes: codes,
            admin_url: None,
        }
    }

    /// `sh` script storing stdin in a fresh file under `dir`
    fn recorder(dir: &Path) -> CommandBotRunner {
        CommandBotRunner::new(
            "sh",
            &[
                "-c".to_string(),
                r#"cat > "$(mktemp "$0/bot.XXXXXX")""#.to_string(),
                dir.display().to_string(),
            ],
        )
    }

    fn recorded(dir: &Path) -> Vec<serde_json::Value> {
        std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| {
                let content = std::fs::read_to_string(entry.unwrap().path()).unwrap();
                serde_json::from_str(&content).unwrap()
            })
            .collect()
    }

    #[tokio::test]
    async fn test_single_bot_receives_request() {
        let temp_dir = tempfile::tempdir().unwrap();
        let runner = recorder(temp_dir.path());

        let request = BotRequest::for_slot(&session(2), 0)
            .unwrap()
            .with_prompts(PromptOverrides::new().with("system", "You are Sarah."))
            .waiting(true);
        let status = runner.run_single_bot(request).await.unwrap();
        assert_eq!(status, BotRunStatus::Completed);

        let docs = recorded(temp_dir.path());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["participant_id"], "p1");
        assert_eq!(docs[0]["session_name"], "grief_support");
        assert_eq!(docs[0]["user_prompts"]["system"], "You are Sarah.");
        assert!(docs[0].get("wait").is_none());
    }

    #[tokio::test]
    async fn test_detached_bot() {
        let temp_dir = tempfile::tempdir().unwrap();
        let runner = recorder(temp_dir.path());

        let request = BotRequest::for_slot(&session(2), 1).unwrap();
        let status = runner.run_single_bot(request).await.unwrap();
        assert_eq!(status, BotRunStatus::Detached);

        runner.wait_detached().await;
        let docs = recorded(temp_dir.path());
        assert_eq!(docs.len(), 1);
        assert!(docs[0].get("user_prompts").is_none());
    }

    #[tokio::test]
    async fn test_failing_bot_is_an_error() {
        let runner = CommandBotRunner::new("sh", &["-c".to_string(), "exit 3".to_string()]);
        let request = BotRequest::for_slot(&session(1), 0).unwrap().waiting(true);
        let err = runner.run_single_bot(request).await.unwrap_err();
        assert!(matches!(err, DomainError::ExternalService(_)));
    }

    #[tokio::test]
    async fn test_missing_program_is_an_error() {
        let runner = CommandBotRunner::new("griefbot-no-such-program", &[]);
        let request = BotRequest::for_slot(&session(1), 0).unwrap().waiting(true);
        assert!(runner.run_single_bot(request).await.is_err());
    }

    #[tokio::test]
    async fn test_launch_error_still_waits_for_started_bots() {
        let temp_dir = tempfile::tempdir().unwrap();
        let slow = CommandBotRunner::new(
            "sh",
            &[
                "-c".to_string(),
                r#"sleep 0.2; cat > "$(mktemp "$0/bot.XXXXXX")""#.to_string(),
                temp_dir.path().display().to_string(),
            ],
        );
        let request = BotRequest::for_slot(&session(2), 0).unwrap();
        let child = slow.launcher.spawn(&request).await.unwrap();

        let mut bots = JoinSet::new();
        bots.spawn(async move { wait_for(child, &request.participant_id).await });
        let launch_error = DomainError::external("Failed to start bot program for slot 1");

        let err = collect_bots(bots, Some(launch_error), "abc").await.unwrap_err();
        assert!(err.to_string().contains("slot 1"));
        let docs = recorded(temp_dir.path());
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0]["participant_id"], "p1");
    }

    #[tokio::test]
    async fn test_session_with_missing_program_is_an_error() {
        let runner = CommandBotRunner::new("griefbot-no-such-program", &[]);
        assert!(runner.run_bots_on_session(&session(2), None).await.is_err());
    }

    #[tokio::test]
    async fn test_all_bots_on_session() {
        let temp_dir = tempfile::tempdir().unwrap();
        let runner = recorder(temp_dir.path());
        let prompts = PromptOverrides::new().with("system", "shared");

        runner
            .run_bots_on_session(&session(3), Some(&prompts))
            .await
            .unwrap();

        let mut participants: Vec<String> = recorded(temp_dir.path())
            .iter()
            .map(|doc| {
                assert_eq!(doc["user_prompts"]["system"], "shared");
                doc["participant_id"].as_str().unwrap().to_string()
            })
            .collect();
        participants.sort();
        assert_eq!(participants, vec!["p1", "p2", "p3"]);
    }
}

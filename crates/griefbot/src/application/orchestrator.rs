//! Session Orchestrator (Use Case)
//!
//! Picks profiles, turns them into prompt overrides, starts experiment
//! sessions and hands each participant slot to the bot runner.

use chrono::Local;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;

use super::session_log::SessionLogWriter;
use crate::domain::catalog::{get_all_predefined_profiles, get_predefined_profile, get_random_profile};
use crate::domain::entities::{
    build_persona_prompts, build_session_prompts, Profile, ProfileOverrides, PromptOverrides,
    SessionInfo, SessionLog,
};
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{BotStrategy, ProfileSelection};
use crate::experiments::session_config;
use crate::ports::{BotRequest, BotRunner, SessionFramework};

/// What to run and how
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config_name: String,
    pub profile_selection: ProfileSelection,
    pub predefined_profile_index: usize,
    pub custom_profile: ProfileOverrides,
    pub num_sessions: usize,
    pub show_profile_details: bool,
    pub demonstrate_prompts_only: bool,
    pub run_comparative_sessions: bool,
    pub run_all_profiles: bool,
    pub strategy: BotStrategy,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            config_name: "grief_support".to_string(),
            profile_selection: ProfileSelection::Predefined,
            predefined_profile_index: 0,
            custom_profile: ProfileOverrides::default(),
            num_sessions: 1,
            show_profile_details: true,
            demonstrate_prompts_only: false,
            run_comparative_sessions: false,
            run_all_profiles: false,
            strategy: BotStrategy::PersonaSlot,
        }
    }
}

/// Result of one session attempt
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub label: String,
    pub profile_name: Option<String>,
    pub session_id: Option<String>,
    pub log_path: Option<PathBuf>,
    pub error: Option<String>,
}

impl SessionOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Results of a batch of attempts
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub outcomes: Vec<SessionOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

/// What a configured run produced
#[derive(Debug, Clone)]
pub enum RunReport {
    /// Prompts were rendered, no session was created
    Demonstration {
        profile: Profile,
        prompts: PromptOverrides,
    },
    Batch(BatchReport),
}

/// Progress callbacks for operator output
pub trait RunObserver: Send + Sync {
    fn batch_started(&self, _description: &str) {}

    fn session_started(&self, _label: &str, _profile: Option<&Profile>) {}

    fn progress(&self, _message: &str) {}

    fn session_finished(&self, _outcome: &SessionOutcome) {}
}

/// Observer that ignores every event
pub struct SilentObserver;

impl RunObserver for SilentObserver {}

/// A session scheduled by the batch planner
struct PlannedSession {
    label: String,
    profile: Profile,
}

/// Orchestrates profile selection and bot sessions
pub struct SessionOrchestrator<F: SessionFramework, B: BotRunner> {
    framework: Arc<F>,
    bots: Arc<B>,
    settings: RunSettings,
    log_writer: Option<SessionLogWriter>,
    observer: Arc<dyn RunObserver>,
    rng: StdRng,
}

impl<F: SessionFramework, B: BotRunner> SessionOrchestrator<F, B> {
    pub fn new(framework: Arc<F>, bots: Arc<B>, settings: RunSettings) -> Self {
        Self {
            framework,
            bots,
            settings,
            log_writer: None,
            observer: Arc::new(SilentObserver),
            rng: StdRng::from_entropy(),
        }
    }

    /// Fix the random source for reproducible profiles and prompts
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Export a log record after each successful session
    pub fn with_log_writer(mut self, writer: SessionLogWriter) -> Self {
        self.log_writer = Some(writer);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Run whatever the settings ask for
    ///
    /// Configuration errors are returned before any session is created.
    /// Failed sessions are recorded in the report and do not stop the batch.
    pub async fn run_configured(&mut self) -> Result<RunReport, DomainError> {
        if self.settings.demonstrate_prompts_only {
            let profile = get_predefined_profile(0)?;
            let prompts = build_persona_prompts(&profile, &mut self.rng);
            return Ok(RunReport::Demonstration { profile, prompts });
        }

        let planned = self.plan()?;
        let mut report = BatchReport::default();
        for session in planned {
            let outcome = self.attempt(&session.label, &session.profile).await;
            report.outcomes.push(outcome);
        }

        tracing::info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished"
        );
        Ok(RunReport::Batch(report))
    }

    /// Resolve every profile up front so configuration errors fail fast
    fn plan(&mut self) -> Result<Vec<PlannedSession>, DomainError> {
        session_config(&self.settings.config_name)?;

        if self.settings.run_comparative_sessions || self.settings.run_all_profiles {
            let (description, label) = if self.settings.run_comparative_sessions {
                ("Running comparative sessions with multiple profiles", "Session")
            } else {
                ("Running all predefined profiles", "Profile")
            };
            self.observer.batch_started(description);
            return Ok(get_all_predefined_profiles()
                .into_iter()
                .enumerate()
                .map(|(i, profile)| PlannedSession {
                    label: format!("{} {}: {}", label, i + 1, profile.name),
                    profile,
                })
                .collect());
        }

        let total = self.settings.num_sessions;
        let mut planned = Vec::with_capacity(total);
        for n in 0..total {
            let profile = match self.settings.profile_selection {
                ProfileSelection::Predefined => {
                    get_predefined_profile(self.settings.predefined_profile_index)?
                }
                ProfileSelection::Random => get_random_profile(&mut self.rng),
                ProfileSelection::Custom => {
                    Profile::from_overrides(&self.settings.custom_profile, &mut self.rng)?
                }
            };
            planned.push(PlannedSession {
                label: format!("Session {} of {}", n + 1, total),
                profile,
            });
        }

        self.observer.batch_started(&format!(
            "Configuration: {} profile, {} session(s)",
            self.settings.profile_selection, total
        ));
        Ok(planned)
    }

    /// Run one session for `profile`; `true` if every step succeeded
    pub async fn run_session(&mut self, profile: &Profile) -> bool {
        self.attempt("Session", profile).await.succeeded()
    }

    async fn attempt(&mut self, label: &str, profile: &Profile) -> SessionOutcome {
        let shown = self.settings.show_profile_details.then_some(profile);
        self.observer.session_started(label, shown);

        let mut outcome = SessionOutcome {
            label: label.to_string(),
            profile_name: Some(profile.name.clone()),
            session_id: None,
            log_path: None,
            error: None,
        };

        match self.execute(profile, &mut outcome).await {
            Ok(()) => {
                tracing::info!(
                    session_id = outcome.session_id.as_deref().unwrap_or_default(),
                    profile = %profile.name,
                    "Session completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    session_id = outcome.session_id.as_deref().unwrap_or_default(),
                    profile = %profile.name,
                    error = %e,
                    "Session failed"
                );
                outcome.error = Some(e.to_string());
            }
        }

        self.observer.session_finished(&outcome);
        outcome
    }

    async fn execute(
        &mut self,
        profile: &Profile,
        outcome: &mut SessionOutcome,
    ) -> Result<(), DomainError> {
        let config_name = self.settings.config_name.clone();
        let participants = session_config(&config_name)?.num_demo_participants;

        let prompts = match self.settings.strategy {
            BotStrategy::PersonaSlot => build_persona_prompts(profile, &mut self.rng),
            BotStrategy::WholeSession => build_session_prompts(profile),
        };

        self.observer.progress(&format!("Initializing {} session...", config_name));
        tracing::info!(
            framework = self.framework.name(),
            config_name = %config_name,
            participants,
            strategy = %self.settings.strategy,
            "Starting session"
        );
        let session = self.framework.init_session(&config_name, participants).await?;
        outcome.session_id = Some(session.session_id.clone());
        self.observer.progress(&format!("Session ID: {}", session.session_id));

        match self.settings.strategy {
            BotStrategy::PersonaSlot => self.run_persona_slots(profile, &session, prompts).await?,
            BotStrategy::WholeSession => {
                self.observer.progress(&format!(
                    "Running all bots with {}'s profile...",
                    profile.name
                ));
                self.bots.run_bots_on_session(&session, Some(&prompts)).await?;
            }
        }

        if let Some(writer) = &self.log_writer {
            let log = SessionLog::new(profile, &session, Local::now());
            let path = writer.write(&log)?;
            self.observer
                .progress(&format!("Session log saved to: {}", path.display()));
            outcome.log_path = Some(path);
        }
        Ok(())
    }

    /// Slot 0 plays the persona; other slots use library defaults.
    /// Only the last slot blocks until its bot finishes.
    async fn run_persona_slots(
        &self,
        profile: &Profile,
        session: &SessionInfo,
        prompts: PromptOverrides,
    ) -> Result<(), DomainError> {
        let count = session.participant_count();
        if count == 0 {
            return Err(DomainError::ExternalService(format!(
                "session {} has no participant slots",
                session.session_id
            )));
        }

        let mut persona_prompts = Some(prompts);
        for index in 0..count {
            let request = BotRequest::for_slot(session, index).ok_or_else(|| {
                DomainError::ExternalService(format!(
                    "session {} is missing the participant code for slot {}",
                    session.session_id, index
                ))
            })?;
            let request = match persona_prompts.take() {
                Some(prompts) => {
                    self.observer.progress(&format!(
                        "Running {} as grief-stricken person...",
                        profile.name
                    ));
                    request.with_prompts(prompts)
                }
                None => {
                    self.observer
                        .progress("Running service provider with default behavior...");
                    request
                }
            };

            let status = self
                .bots
                .run_single_bot(request.waiting(index + 1 == count))
                .await?;
            tracing::debug!(slot = index, ?status, "Bot run returned");
        }
        Ok(())
    }

    /// Start a session for any configured game and run every bot with defaults
    pub async fn run_game(&self, config_name: &str) -> SessionOutcome {
        let mut outcome = SessionOutcome {
            label: config_name.to_string(),
            profile_name: None,
            session_id: None,
            log_path: None,
            error: None,
        };
        self.observer.session_started(config_name, None);

        let result: Result<(), DomainError> = async {
            let participants = session_config(config_name)?.num_demo_participants;
            let session = self.framework.init_session(config_name, participants).await?;
            outcome.session_id = Some(session.session_id.clone());
            self.observer.progress(&format!("Session ID: {}", session.session_id));
            self.bots.run_bots_on_session(&session, None).await
        }
        .await;

        if let Err(e) = result {
            tracing::error!(game = config_name, error = %e, "Game session failed");
            outcome.error = Some(e.to_string());
        }
        self.observer.session_finished(&outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::BotRunStatus;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeFramework {
        calls: Mutex<Vec<(String, usize)>>,
        fail: bool,
    }

    #[async_trait]
    impl SessionFramework for FakeFramework {
        async fn init_session(
            &self,
            config_name: &str,
            participant_count: usize,
        ) -> Result<SessionInfo, DomainError> {
            if self.fail {
                return Err(DomainError::ExternalService("server unreachable".into()));
            }
            let mut calls = self.calls.lock().unwrap();
            calls.push((config_name.to_string(), participant_count));
            let id = format!("s{}", calls.len());
            let codes: Vec<String> = (0..participant_count).map(|i| format!("{id}p{i}")).collect();
            Ok(SessionInfo {
                session_id: id,
                config_name: config_name.to_string(),
                participant_urls: codes
                    .iter()
                    .map(|c| format!("http://localhost/InitializeParticipant/{c}"))
                    .collect(),
                participant_codes: codes,
                admin_url: None,
            })
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    #[derive(Default)]
    struct FakeBots {
        requests: Mutex<Vec<BotRequest>>,
        session_runs: Mutex<Vec<Option<PromptOverrides>>>,
        /// Fail the n-th call to `run_single_bot` (0-based)
        fail_on: Option<usize>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BotRunner for FakeBots {
        async fn run_single_bot(&self, request: BotRequest) -> Result<BotRunStatus, DomainError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on == Some(n) {
                return Err(DomainError::ExternalService("browser crashed".into()));
            }
            let status = if request.wait {
                BotRunStatus::Completed
            } else {
                BotRunStatus::Detached
            };
            self.requests.lock().unwrap().push(request);
            Ok(status)
        }

        async fn run_bots_on_session(
            &self,
            _session: &SessionInfo,
            prompt_overrides: Option<&PromptOverrides>,
        ) -> Result<(), DomainError> {
            self.session_runs
                .lock()
                .unwrap()
                .push(prompt_overrides.cloned());
            Ok(())
        }
    }

    fn orchestrator(
        framework: FakeFramework,
        bots: FakeBots,
        settings: RunSettings,
    ) -> (
        SessionOrchestrator<FakeFramework, FakeBots>,
        Arc<FakeFramework>,
        Arc<FakeBots>,
    ) {
        let framework = Arc::new(framework);
        let bots = Arc::new(bots);
        let orch = SessionOrchestrator::new(framework.clone(), bots.clone(), settings).with_seed(42);
        (orch, framework, bots)
    }

    fn batch(report: RunReport) -> BatchReport {
        match report {
            RunReport::Batch(batch) => batch,
            RunReport::Demonstration { .. } => panic!("expected a batch"),
        }
    }

    #[tokio::test]
    async fn test_persona_on_first_slot_only_last_waits() {
        let (mut orch, framework, bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), RunSettings::default());

        let profile = get_predefined_profile(0).unwrap();
        assert!(orch.run_session(&profile).await);

        assert_eq!(
            framework.calls.lock().unwrap().as_slice(),
            &[("grief_support".to_string(), 2)]
        );
        let requests = bots.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert!(!requests[0].wait);
        assert_eq!(requests[0].participant_id, "s1p0");
        let prompts = requests[0].prompt_overrides.as_ref().unwrap();
        assert!(prompts.get("system").unwrap().contains("Sarah"));
        assert!(requests[1].wait);
        assert!(requests[1].prompt_overrides.is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_index_creates_no_session() {
        let settings = RunSettings {
            predefined_profile_index: 5,
            num_sessions: 2,
            ..Default::default()
        };
        let (mut orch, framework, _bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), settings);

        let err = orch.run_configured().await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::ProfileIndexOutOfRange { index: 5, max: 4 }
        ));
        assert!(framework.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_custom_key_creates_no_session() {
        let settings = RunSettings {
            profile_selection: ProfileSelection::Custom,
            custom_profile: ProfileOverrides {
                support_preference: Some("financial".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let (mut orch, framework, _bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), settings);

        assert!(matches!(
            orch.run_configured().await,
            Err(DomainError::UnknownKey { .. })
        ));
        assert!(framework.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_config_name_creates_no_session() {
        let settings = RunSettings {
            config_name: "ultimatum".to_string(),
            ..Default::default()
        };
        let (mut orch, framework, bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), settings);

        assert!(matches!(
            orch.run_configured().await,
            Err(DomainError::UnknownKey { .. })
        ));
        assert!(framework.calls.lock().unwrap().is_empty());
        assert!(bots.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_participant_game_persona_slot_waits() {
        let settings = RunSettings {
            config_name: "stakeholder".to_string(),
            ..Default::default()
        };
        let (mut orch, framework, bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), settings);

        let profile = get_predefined_profile(0).unwrap();
        assert!(orch.run_session(&profile).await);

        assert_eq!(
            framework.calls.lock().unwrap().as_slice(),
            &[("stakeholder".to_string(), 1)]
        );
        let requests = bots.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].participant_id, "s1p0");
        assert!(requests[0].wait);
        let prompts = requests[0].prompt_overrides.as_ref().unwrap();
        assert!(prompts.get("system").unwrap().contains("Sarah"));
    }

    #[tokio::test]
    async fn test_bot_failure_does_not_abort_batch() {
        let settings = RunSettings {
            num_sessions: 3,
            ..Default::default()
        };
        let bots = FakeBots {
            fail_on: Some(0),
            ..Default::default()
        };
        let (mut orch, framework, _bots) = orchestrator(FakeFramework::default(), bots, settings);

        let report = batch(orch.run_configured().await.unwrap());
        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.succeeded(), 2);
        assert!(!report.outcomes[0].succeeded());
        assert_eq!(report.outcomes[0].session_id.as_deref(), Some("s1"));
        assert!(report.outcomes[0]
            .error
            .as_deref()
            .unwrap()
            .contains("browser crashed"));
        assert_eq!(framework.calls.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_framework_failure_marks_attempt_failed() {
        let framework = FakeFramework {
            fail: true,
            ..Default::default()
        };
        let (mut orch, _framework, bots) =
            orchestrator(framework, FakeBots::default(), RunSettings::default());

        let profile = get_predefined_profile(2).unwrap();
        assert!(!orch.run_session(&profile).await);
        assert!(bots.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_comparative_runs_every_predefined_profile() {
        let settings = RunSettings {
            run_comparative_sessions: true,
            ..Default::default()
        };
        let (mut orch, framework, _bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), settings);

        let report = batch(orch.run_configured().await.unwrap());
        let names: Vec<String> = report
            .outcomes
            .iter()
            .filter_map(|o| o.profile_name.clone())
            .collect();
        assert_eq!(names, vec!["Sarah", "Michael", "Elena", "Robert", "Maya"]);
        assert_eq!(report.outcomes[1].label, "Session 2: Michael");
        assert_eq!(framework.calls.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_demonstration_creates_no_session() {
        let settings = RunSettings {
            demonstrate_prompts_only: true,
            num_sessions: 4,
            ..Default::default()
        };
        let (mut orch, framework, _bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), settings);

        match orch.run_configured().await.unwrap() {
            RunReport::Demonstration { profile, prompts } => {
                assert_eq!(profile.name, "Sarah");
                assert_eq!(prompts.len(), 3);
            }
            RunReport::Batch(_) => panic!("expected a demonstration"),
        }
        assert!(framework.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whole_session_strategy() {
        let settings = RunSettings {
            strategy: BotStrategy::WholeSession,
            ..Default::default()
        };
        let (mut orch, _framework, bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), settings);

        let profile = get_predefined_profile(3).unwrap();
        assert!(orch.run_session(&profile).await);

        assert!(bots.requests.lock().unwrap().is_empty());
        let runs = bots.session_runs.lock().unwrap();
        assert_eq!(runs.len(), 1);
        let system = runs[0].as_ref().unwrap().get("system").unwrap().to_string();
        assert!(system.contains("Robert"));
    }

    #[tokio::test]
    async fn test_random_batch_reproducible_with_seed() {
        let settings = RunSettings {
            profile_selection: ProfileSelection::Random,
            num_sessions: 3,
            ..Default::default()
        };
        let (mut a, _, bots_a) =
            orchestrator(FakeFramework::default(), FakeBots::default(), settings.clone());
        let (mut b, _, bots_b) =
            orchestrator(FakeFramework::default(), FakeBots::default(), settings);

        a.run_configured().await.unwrap();
        b.run_configured().await.unwrap();

        let prompts_a: Vec<_> = bots_a
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt_overrides.clone())
            .collect();
        let prompts_b: Vec<_> = bots_b
            .requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.prompt_overrides.clone())
            .collect();
        assert_eq!(prompts_a, prompts_b);
    }

    #[tokio::test]
    async fn test_log_written_after_success() {
        let temp_dir = tempfile::tempdir().unwrap();
        let (orch, _framework, _bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), RunSettings::default());
        let mut orch = orch.with_log_writer(SessionLogWriter::new(temp_dir.path(), "grief"));

        let report = batch(orch.run_configured().await.unwrap());
        let path = report.outcomes[0].log_path.clone().unwrap();
        assert!(path.starts_with(temp_dir.path()));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(json["session_id"], "s1");
        assert_eq!(json["profile"]["name"], "Sarah");
    }

    #[tokio::test]
    async fn test_run_game_single_player() {
        let (orch, framework, bots) =
            orchestrator(FakeFramework::default(), FakeBots::default(), RunSettings::default());

        let outcome = orch.run_game("stakeholder").await;
        assert!(outcome.succeeded());
        assert_eq!(
            framework.calls.lock().unwrap().as_slice(),
            &[("stakeholder".to_string(), 1)]
        );
        assert_eq!(bots.session_runs.lock().unwrap().as_slice(), &[None]);

        let unknown = orch.run_game("ultimatum").await;
        assert!(!unknown.succeeded());
    }
}

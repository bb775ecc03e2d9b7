//! Griefbot Library
//!
//! Persona profiles, prompt overrides, session orchestration and experiment
//! definitions for LLM bot runs on a web experiment server.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain/`): Profile catalog and entities
//!   - `value_objects/`: Taxonomies (LossType, LossCircumstance, TimeSinceLoss, ...)
//!   - `entities/`: Profile, PromptOverrides, SessionInfo, SessionLog
//!   - `catalog`: Predefined profiles and random draws
//!   - `errors`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces for the experiment server and bot library
//!
//! - **Application** (`application/`): Session orchestrator and log export
//!
//! - **Experiments** (`experiments/`): Session configs, fields, pages and payoffs
//!
//! # Usage
//!
//! ```rust,ignore
//! use griefbot::{RunSettings, SessionOrchestrator};
//!
//! let mut orchestrator = SessionOrchestrator::new(framework, bots, RunSettings::default());
//! let report = orchestrator.run_configured().await?;
//! ```

pub mod application;
pub mod domain;
pub mod experiments;
pub mod ports;

// Re-export commonly used types
pub use application::{
    BatchReport, RunObserver, RunReport, RunSettings, SessionLogWriter, SessionOrchestrator,
    SessionOutcome, SilentObserver,
};
pub use domain::{
    BotStrategy, DomainError, LossCircumstance, LossType, PersonalityTrait, Profile,
    ProfileOverrides, ProfileSelection, PromptOverrides, SessionInfo, SessionLog,
    SupportPreference, TaxonomyCategory, TimeSinceLoss,
};
pub use ports::{BotRequest, BotRunStatus, BotRunner, SessionFramework};

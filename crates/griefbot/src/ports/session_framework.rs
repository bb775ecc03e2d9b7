//! Session Framework Port
//!
//! Abstract interface to the web experiment server that owns sessions,
//! groups, players and page sequencing.

use async_trait::async_trait;

use crate::domain::entities::SessionInfo;
use crate::domain::errors::DomainError;

/// Experiment session management
///
/// # Example
///
/// ```rust,ignore
/// use griefbot::ports::SessionFramework;
///
/// struct OtreeClient { /* ... */ }
///
/// #[async_trait]
/// impl SessionFramework for OtreeClient {
///     async fn init_session(&self, config_name: &str, participant_count: usize)
///         -> Result<SessionInfo, DomainError> {
///         // POST /api/sessions
///     }
/// }
/// ```
#[async_trait]
pub trait SessionFramework: Send + Sync {
    /// Create a session for `config_name` with `participant_count` slots
    async fn init_session(
        &self,
        config_name: &str,
        participant_count: usize,
    ) -> Result<SessionInfo, DomainError>;

    /// Framework name for log output
    fn name(&self) -> &str;
}

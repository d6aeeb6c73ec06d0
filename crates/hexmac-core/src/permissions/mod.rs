mod orchestrator;
mod single_flight;
mod status;

#[cfg(test)]
pub(crate) mod fake;

pub use orchestrator::PermissionOrchestrator;
pub use single_flight::SingleFlightProvider;
pub use status::{
    from_access_granted, from_av_authorization_status, from_speech_authorization_status,
};

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// State of a permission, as reported by the OS.
///
/// Anything the OS reports outside these three values is collapsed to
/// `NotDetermined`, never to `Authorized`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthorizationState {
    /// The user has granted access
    Authorized,
    /// The user has denied access, or access is restricted by system policy
    Denied,
    /// The user has not been asked yet
    #[default]
    NotDetermined,
}

impl AuthorizationState {
    pub fn is_authorized(self) -> bool {
        self == AuthorizationState::Authorized
    }

    /// Whether the OS has already made a decision. Settled states never prompt again.
    pub fn is_settled(self) -> bool {
        self != AuthorizationState::NotDetermined
    }
}

/// The two OS authorization subsystems the app depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionKind {
    /// Audio capture (AVFoundation on macOS)
    Microphone,
    /// On-device / server speech recognition (Speech framework on macOS)
    SpeechRecognition,
}

impl PermissionKind {
    pub const ALL: [PermissionKind; 2] = [PermissionKind::Microphone, PermissionKind::SpeechRecognition];

    pub fn as_str(self) -> &'static str {
        match self {
            PermissionKind::Microphone => "microphone",
            PermissionKind::SpeechRecognition => "speechRecognition",
        }
    }
}

impl fmt::Display for PermissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of requesting several permissions at once
///
/// Serializes as `{"microphone": ..., "speechRecognition": ..., "allGranted": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedPermissionResult {
    #[serde(flatten)]
    states: BTreeMap<PermissionKind, AuthorizationState>,
    all_granted: bool,
}

impl CombinedPermissionResult {
    /// Build the result once every constituent state has resolved.
    ///
    /// An empty set is never reported as granted.
    pub fn from_states<I>(states: I) -> Self
    where
        I: IntoIterator<Item = (PermissionKind, AuthorizationState)>,
    {
        let states: BTreeMap<_, _> = states.into_iter().collect();
        let all_granted = !states.is_empty() && states.values().all(|s| s.is_authorized());
        Self { states, all_granted }
    }

    pub fn state(&self, kind: PermissionKind) -> Option<AuthorizationState> {
        self.states.get(&kind).copied()
    }

    pub fn all_granted(&self) -> bool {
        self.all_granted
    }

    pub fn states(&self) -> impl Iterator<Item = (PermissionKind, AuthorizationState)> + '_ {
        self.states.iter().map(|(k, s)| (*k, *s))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{0} authorization is not available on this platform")]
    Unsupported(PermissionKind),
    #[error("{kind} authorization subsystem unreachable: {reason}")]
    Unreachable { kind: PermissionKind, reason: String },
    #[error("{0} authorization callback was dropped before delivering a decision")]
    CallbackDropped(PermissionKind),
}

/// Uniform tri-state access to the OS authorization subsystems
#[async_trait]
pub trait AuthorizationProvider: Send + Sync {
    /// Read the current state without prompting the user
    fn query(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError>;

    /// Show the OS prompt and wait for the user's decision.
    ///
    /// Callers go through [`AuthorizationProvider::request`], which only prompts
    /// while the state is still undetermined.
    async fn prompt(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError>;

    /// Request access, prompting only if the OS has not decided yet.
    ///
    /// The check and the prompt are not atomic; wrap the provider in a
    /// [`SingleFlightProvider`] when requests may run concurrently.
    async fn request(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        let current = self.query(kind)?;
        if current.is_settled() {
            tracing::debug!("{} already settled as {:?}, not prompting", kind, current);
            return Ok(current);
        }

        tracing::info!("Prompting for {} authorization", kind);
        let decided = self.prompt(kind).await?;
        tracing::info!("{} authorization resolved: {:?}", kind, decided);
        Ok(decided)
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeProvider;
    use super::*;
    use serde_json::json;

    #[test]
    fn test_combined_result_serialization() {
        let result = CombinedPermissionResult::from_states([
            (PermissionKind::Microphone, AuthorizationState::Authorized),
            (PermissionKind::SpeechRecognition, AuthorizationState::Denied),
        ]);

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({
                "microphone": "authorized",
                "speechRecognition": "denied",
                "allGranted": false
            })
        );
    }

    #[test]
    fn test_all_granted_requires_every_state_authorized() {
        let granted = CombinedPermissionResult::from_states(
            PermissionKind::ALL.map(|k| (k, AuthorizationState::Authorized)),
        );
        assert!(granted.all_granted());

        let undetermined = CombinedPermissionResult::from_states([
            (PermissionKind::Microphone, AuthorizationState::Authorized),
            (PermissionKind::SpeechRecognition, AuthorizationState::NotDetermined),
        ]);
        assert!(!undetermined.all_granted());

        let empty = CombinedPermissionResult::from_states(std::iter::empty());
        assert!(!empty.all_granted());
    }

    #[test]
    fn test_state_names() {
        assert_eq!(
            serde_json::to_value(AuthorizationState::NotDetermined).unwrap(),
            json!("notDetermined")
        );
        assert_eq!(PermissionKind::SpeechRecognition.to_string(), "speechRecognition");
        assert_eq!(AuthorizationState::default(), AuthorizationState::NotDetermined);
    }

    #[tokio::test]
    async fn test_request_prompts_when_undetermined() {
        let provider = FakeProvider::default();
        provider.decide(PermissionKind::Microphone, AuthorizationState::Authorized);

        let state = provider.request(PermissionKind::Microphone).await.unwrap();

        assert_eq!(state, AuthorizationState::Authorized);
        assert_eq!(provider.prompts(PermissionKind::Microphone), 1);
        assert_eq!(
            provider.query(PermissionKind::Microphone).unwrap(),
            AuthorizationState::Authorized
        );
    }

    #[tokio::test]
    async fn test_request_on_settled_state_does_not_prompt() {
        let provider = FakeProvider::default();
        provider.set_state(PermissionKind::Microphone, AuthorizationState::Denied);
        provider.set_state(PermissionKind::SpeechRecognition, AuthorizationState::Authorized);
        provider.decide(PermissionKind::Microphone, AuthorizationState::Authorized);

        let mic = provider.request(PermissionKind::Microphone).await.unwrap();
        let speech = provider.request(PermissionKind::SpeechRecognition).await.unwrap();

        assert_eq!(mic, AuthorizationState::Denied);
        assert_eq!(speech, AuthorizationState::Authorized);
        assert_eq!(provider.prompts(PermissionKind::Microphone), 0);
        assert_eq!(provider.prompts(PermissionKind::SpeechRecognition), 0);
    }

    #[tokio::test]
    async fn test_request_surfaces_unreachable_subsystem() {
        let provider = FakeProvider::default();
        provider.make_unreachable(PermissionKind::SpeechRecognition);

        let err = provider
            .request(PermissionKind::SpeechRecognition)
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Unreachable { .. }));
        assert_eq!(provider.prompts(PermissionKind::SpeechRecognition), 0);
    }
}

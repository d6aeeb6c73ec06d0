use std::sync::Arc;

use super::{AuthorizationProvider, AuthorizationState, CombinedPermissionResult, PermissionKind};

/// Requests every permission the app needs in one call
pub struct PermissionOrchestrator {
    provider: Arc<dyn AuthorizationProvider>,
}

impl PermissionOrchestrator {
    pub fn new(provider: Arc<dyn AuthorizationProvider>) -> Self {
        Self { provider }
    }

    /// Request microphone and speech recognition access.
    ///
    /// Both requests run concurrently and the result is only built once both
    /// have resolved. Each kind ends up `Authorized` or `Denied`: a provider
    /// failure or an undecided prompt counts as `Denied`, so this always
    /// produces a result.
    pub async fn request_all(&self) -> CombinedPermissionResult {
        let (microphone, speech) = tokio::join!(
            self.settle(PermissionKind::Microphone),
            self.settle(PermissionKind::SpeechRecognition),
        );

        let result = CombinedPermissionResult::from_states([
            (PermissionKind::Microphone, microphone),
            (PermissionKind::SpeechRecognition, speech),
        ]);

        tracing::info!(
            "requestAll finished: microphone={:?}, speechRecognition={:?}, allGranted={}",
            microphone,
            speech,
            result.all_granted()
        );
        result
    }

    async fn settle(&self, kind: PermissionKind) -> AuthorizationState {
        match self.provider.request(kind).await {
            Ok(AuthorizationState::NotDetermined) => {
                tracing::warn!("{} request left undecided, reporting denied", kind);
                AuthorizationState::Denied
            }
            Ok(state) => state,
            Err(e) => {
                tracing::warn!("{} request failed, reporting denied: {}", kind, e);
                AuthorizationState::Denied
            }
        }
    }
}

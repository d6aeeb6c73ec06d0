use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{AuthorizationProvider, AuthorizationState, PermissionKind, ProviderError};

/// Serializes requests per kind so concurrent callers share one prompt.
///
/// A caller arriving while a prompt is open waits for it, then re-queries and
/// finds the state settled.
pub struct SingleFlightProvider {
    inner: Arc<dyn AuthorizationProvider>,
    microphone: Mutex<()>,
    speech_recognition: Mutex<()>,
}

impl SingleFlightProvider {
    pub fn new(inner: Arc<dyn AuthorizationProvider>) -> Self {
        Self {
            inner,
            microphone: Mutex::new(()),
            speech_recognition: Mutex::new(()),
        }
    }

    fn lock_for(&self, kind: PermissionKind) -> &Mutex<()> {
        match kind {
            PermissionKind::Microphone => &self.microphone,
            PermissionKind::SpeechRecognition => &self.speech_recognition,
        }
    }
}

#[async_trait]
impl AuthorizationProvider for SingleFlightProvider {
    fn query(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        self.inner.query(kind)
    }

    async fn prompt(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        let _in_flight = self.lock_for(kind).lock().await;
        self.inner.prompt(kind).await
    }

    async fn request(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        let _in_flight = self.lock_for(kind).lock().await;
        self.inner.request(kind).await
    }
}

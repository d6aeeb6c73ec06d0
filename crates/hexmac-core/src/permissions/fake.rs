use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use super::{AuthorizationProvider, AuthorizationState, PermissionKind, ProviderError};

#[derive(Default)]
struct Subsystem {
    state: AuthorizationState,
    decision: AuthorizationState,
    unreachable: bool,
    gate: Option<oneshot::Receiver<()>>,
    prompts: usize,
}

/// Scriptable provider for unit tests
#[derive(Default)]
pub(crate) struct FakeProvider {
    subsystems: Mutex<HashMap<PermissionKind, Subsystem>>,
}

impl FakeProvider {
    fn with<T>(&self, kind: PermissionKind, f: impl FnOnce(&mut Subsystem) -> T) -> T {
        let mut subsystems = self.subsystems.lock().unwrap();
        f(subsystems.entry(kind).or_default())
    }

    pub fn set_state(&self, kind: PermissionKind, state: AuthorizationState) {
        self.with(kind, |s| s.state = state);
    }

    /// What the user answers when prompted
    pub fn decide(&self, kind: PermissionKind, decision: AuthorizationState) {
        self.with(kind, |s| s.decision = decision);
    }

    pub fn make_unreachable(&self, kind: PermissionKind) {
        self.with(kind, |s| s.unreachable = true);
    }

    /// Hold the prompt for `kind` open until the returned sender fires
    pub fn gate(&self, kind: PermissionKind) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.with(kind, |s| s.gate = Some(rx));
        tx
    }

    pub fn prompts(&self, kind: PermissionKind) -> usize {
        self.with(kind, |s| s.prompts)
    }
}

#[async_trait]
impl AuthorizationProvider for FakeProvider {
    fn query(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        self.with(kind, |s| {
            if s.unreachable {
                Err(ProviderError::Unreachable {
                    kind,
                    reason: "fake subsystem offline".to_string(),
                })
            } else {
                Ok(s.state)
            }
        })
    }

    async fn prompt(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        let gate = self.with(kind, |s| {
            s.prompts += 1;
            s.gate.take()
        });

        if let Some(gate) = gate {
            gate.await.map_err(|_| ProviderError::CallbackDropped(kind))?;
        }

        Ok(self.with(kind, |s| {
            s.state = s.decision;
            s.decision
        }))
    }
}

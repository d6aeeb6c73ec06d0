use async_trait::async_trait;
use hexmac_core::{AuthorizationProvider, AuthorizationState, PermissionKind, ProviderError};

/// Provider for platforms without the modeled authorization subsystems.
/// Single checks surface an error; `requestAllPermissions` reports both as denied.
pub struct UnsupportedAuthorizationProvider;

#[async_trait]
impl AuthorizationProvider for UnsupportedAuthorizationProvider {
    fn query(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        Err(ProviderError::Unsupported(kind))
    }

    async fn prompt(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        Err(ProviderError::Unsupported(kind))
    }
}

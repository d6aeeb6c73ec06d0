#[cfg(target_os = "macos")]
mod macos;
#[cfg(not(target_os = "macos"))]
mod unsupported;

use std::sync::Arc;

use hexmac_core::AuthorizationProvider;

/// Authorization provider for the current platform
pub fn system_provider() -> Arc<dyn AuthorizationProvider> {
    #[cfg(target_os = "macos")]
    {
        Arc::new(macos::MacAuthorizationProvider)
    }
    #[cfg(not(target_os = "macos"))]
    {
        tracing::warn!("Permission subsystems are not available on this platform");
        Arc::new(unsupported::UnsupportedAuthorizationProvider)
    }
}

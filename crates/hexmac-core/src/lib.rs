//! Hexmac core: permission orchestration and capture visibility behind a
//! method-call bridge. Nothing in here depends on the UI toolkit.

pub mod config;
pub mod error;
pub mod permissions;
pub mod router;
pub mod visibility;

pub use config::{load_config, save_config, AppConfig, ConfigError};
pub use error::{BridgeError, BridgeResponse, BridgeResult, ErrorResponse};
pub use permissions::{
    AuthorizationProvider, AuthorizationState, CombinedPermissionResult, PermissionKind,
    PermissionOrchestrator, ProviderError, SingleFlightProvider,
};
pub use router::{Method, MethodCall, MessageRouter, PERMISSIONS_CHANNEL, SCREEN_CAPTURE_CHANNEL};
pub use visibility::{
    CaptureSurface, CaptureVisibilityController, SurfaceError, Visibility, VisibilityActor,
    VisibilityError, VisibilityRequest,
};

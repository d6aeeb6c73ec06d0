//! Dispatch of named UI requests to the permission and visibility services

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BridgeError, BridgeResponse, BridgeResult};
use crate::permissions::{
    AuthorizationProvider, PermissionKind, PermissionOrchestrator, SingleFlightProvider,
};
use crate::visibility::{CaptureVisibilityController, VisibilityRequest};

/// Channel carrying the permission methods
pub const PERMISSIONS_CHANNEL: &str = "com.hexmac/permissions";
/// Channel carrying `setHidden`
pub const SCREEN_CAPTURE_CHANNEL: &str = "interx/screen_capture";

/// A request from the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodCall {
    /// When set, only methods of this channel are accepted
    #[serde(default)]
    pub channel: Option<String>,
    pub method: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            channel: None,
            method: method.into(),
            arguments: None,
        }
    }

    pub fn with_arguments(mut self, arguments: Value) -> Self {
        self.arguments = Some(arguments);
        self
    }

    pub fn on_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    CheckMicrophonePermission,
    RequestMicrophonePermission,
    CheckSpeechRecognitionPermission,
    RequestSpeechRecognitionPermission,
    RequestAllPermissions,
    SetHidden,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::CheckMicrophonePermission,
        Method::RequestMicrophonePermission,
        Method::CheckSpeechRecognitionPermission,
        Method::RequestSpeechRecognitionPermission,
        Method::RequestAllPermissions,
        Method::SetHidden,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Method::CheckMicrophonePermission => "checkMicrophonePermission",
            Method::RequestMicrophonePermission => "requestMicrophonePermission",
            Method::CheckSpeechRecognitionPermission => "checkSpeechRecognitionPermission",
            Method::RequestSpeechRecognitionPermission => "requestSpeechRecognitionPermission",
            Method::RequestAllPermissions => "requestAllPermissions",
            Method::SetHidden => "setHidden",
        }
    }

    pub fn channel(self) -> &'static str {
        match self {
            Method::SetHidden => SCREEN_CAPTURE_CHANNEL,
            _ => PERMISSIONS_CHANNEL,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SetHiddenArgs {
    Flag(bool),
    Request(VisibilityRequest),
}

fn parse_set_hidden(arguments: Option<&Value>) -> BridgeResult<VisibilityRequest> {
    let invalid = |reason: String| BridgeError::InvalidArguments {
        method: Method::SetHidden.name().to_string(),
        reason,
    };

    let value = arguments.ok_or_else(|| invalid("expected a boolean, got nothing".to_string()))?;
    match SetHiddenArgs::deserialize(value) {
        Ok(SetHiddenArgs::Flag(hidden)) => Ok(VisibilityRequest { hidden }),
        Ok(SetHiddenArgs::Request(request)) => Ok(request),
        Err(_) => Err(invalid(format!("expected a boolean, got {}", value))),
    }
}

/// Routes [`MethodCall`]s to the provider, orchestrator and visibility controller
pub struct MessageRouter {
    provider: Arc<dyn AuthorizationProvider>,
    orchestrator: PermissionOrchestrator,
    visibility: CaptureVisibilityController,
}

impl MessageRouter {
    pub fn new(
        provider: Arc<dyn AuthorizationProvider>,
        visibility: CaptureVisibilityController,
    ) -> Self {
        // Single and combined requests share one in-flight prompt per kind
        let provider: Arc<dyn AuthorizationProvider> = Arc::new(SingleFlightProvider::new(provider));
        Self {
            orchestrator: PermissionOrchestrator::new(provider.clone()),
            provider,
            visibility,
        }
    }

    /// Dispatch a call and wrap the outcome in a response envelope
    pub async fn handle(&self, call: MethodCall) -> BridgeResponse {
        let method = call.method.clone();
        let result = self.dispatch(call).await;
        if let Err(e) = &result {
            tracing::warn!("{} failed: {}", method, e);
        }
        result.into()
    }

    pub async fn dispatch(&self, call: MethodCall) -> BridgeResult<Value> {
        let method = resolve(&call)?;
        tracing::info!("Dispatching {}", method.name());

        match method {
            Method::CheckMicrophonePermission => self.check(PermissionKind::Microphone),
            Method::CheckSpeechRecognitionPermission => self.check(PermissionKind::SpeechRecognition),
            Method::RequestMicrophonePermission => self.request(PermissionKind::Microphone).await,
            Method::RequestSpeechRecognitionPermission => {
                self.request(PermissionKind::SpeechRecognition).await
            }
            Method::RequestAllPermissions => {
                let result = self.orchestrator.request_all().await;
                Ok(serde_json::to_value(result)?)
            }
            Method::SetHidden => {
                let request = parse_set_hidden(call.arguments.as_ref())?;
                self.visibility.set_hidden(request.hidden).await?;
                Ok(Value::Null)
            }
        }
    }

    fn check(&self, kind: PermissionKind) -> BridgeResult<Value> {
        let state = self.provider.query(kind)?;
        Ok(serde_json::to_value(state)?)
    }

    async fn request(&self, kind: PermissionKind) -> BridgeResult<Value> {
        let state = self.provider.request(kind).await?;
        Ok(serde_json::to_value(state)?)
    }
}

fn resolve(call: &MethodCall) -> BridgeResult<Method> {
    let unimplemented = || BridgeError::UnimplementedMethod {
        method: call.method.clone(),
    };

    let method = Method::from_name(&call.method).ok_or_else(unimplemented)?;
    match call.channel.as_deref() {
        Some(channel) if channel != method.channel() => Err(unimplemented()),
        _ => Ok(method),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_names_round_trip() {
        for method in Method::ALL {
            assert_eq!(Method::from_name(method.name()), Some(method));
        }
        assert_eq!(Method::from_name("doSomethingUnknown"), None);
        assert_eq!(Method::from_name("sethidden"), None);
    }

    #[test]
    fn test_channel_filter() {
        let on_permissions = MethodCall::new("setHidden").on_channel(PERMISSIONS_CHANNEL);
        assert!(matches!(
            resolve(&on_permissions),
            Err(BridgeError::UnimplementedMethod { .. })
        ));

        let on_capture = MethodCall::new("setHidden").on_channel(SCREEN_CAPTURE_CHANNEL);
        assert_eq!(resolve(&on_capture).unwrap(), Method::SetHidden);

        let unscoped = MethodCall::new("requestAllPermissions");
        assert_eq!(resolve(&unscoped).unwrap(), Method::RequestAllPermissions);
    }

    #[test]
    fn test_set_hidden_arguments() {
        assert_eq!(
            parse_set_hidden(Some(&json!(true))).unwrap(),
            VisibilityRequest { hidden: true }
        );
        assert_eq!(
            parse_set_hidden(Some(&json!({ "hidden": false }))).unwrap(),
            VisibilityRequest { hidden: false }
        );

        for bad in [
            json!("true"),
            json!(1),
            json!(null),
            json!({ "hidden": "yes" }),
            json!({ "hidden": true, "junk": 1 }),
        ] {
            assert!(matches!(
                parse_set_hidden(Some(&bad)),
                Err(BridgeError::InvalidArguments { .. })
            ));
        }
        assert!(matches!(
            parse_set_hidden(None),
            Err(BridgeError::InvalidArguments { .. })
        ));
    }

    #[test]
    fn test_method_call_wire_shape() {
        let call: MethodCall =
            serde_json::from_value(json!({ "method": "setHidden", "arguments": true })).unwrap();
        assert_eq!(call, MethodCall::new("setHidden").with_arguments(json!(true)));
    }
}

//! AVFoundation (microphone) and Speech framework authorization.
//!
//! Completion handlers fire on arbitrary background queues; each one only
//! hands its value to a oneshot channel, and the awaiting command resumes on
//! the async runtime.

use std::sync::Mutex;

use async_trait::async_trait;
use block2::RcBlock;
use hexmac_core::permissions::{
    from_access_granted, from_av_authorization_status, from_speech_authorization_status,
};
use hexmac_core::{AuthorizationProvider, AuthorizationState, PermissionKind, ProviderError};
use objc2::msg_send;
use objc2::runtime::{AnyClass, Bool};
use objc2_foundation::NSString;
use tokio::sync::oneshot;

#[link(name = "AVFoundation", kind = "framework")]
extern "C" {
    static AVMediaTypeAudio: &'static NSString;
}

#[link(name = "Speech", kind = "framework")]
extern "C" {}

/// Authorization provider backed by the macOS privacy subsystems
pub struct MacAuthorizationProvider;

fn class_for(kind: PermissionKind) -> Result<&'static AnyClass, ProviderError> {
    let name = match kind {
        PermissionKind::Microphone => "AVCaptureDevice",
        PermissionKind::SpeechRecognition => "SFSpeechRecognizer",
    };
    AnyClass::get(name).ok_or_else(|| ProviderError::Unreachable {
        kind,
        reason: format!("{} class not found", name),
    })
}

/// Wrap a oneshot sender so a `Fn` block can fire it once
fn once<T>(tx: oneshot::Sender<T>) -> impl Fn(T) {
    let tx = Mutex::new(Some(tx));
    move |value| {
        if let Some(tx) = tx.lock().ok().and_then(|mut slot| slot.take()) {
            let _ = tx.send(value);
        }
    }
}

/// Start the microphone prompt. The block is released before returning so
/// nothing non-`Send` is held across the await.
fn start_microphone_prompt() -> Result<oneshot::Receiver<bool>, ProviderError> {
    let cls = class_for(PermissionKind::Microphone)?;
    let (tx, rx) = oneshot::channel();
    let deliver = once(tx);
    let block = RcBlock::new(move |granted: Bool| deliver(granted.as_bool()));

    unsafe {
        let _: () = msg_send![
            cls,
            requestAccessForMediaType: AVMediaTypeAudio,
            completionHandler: &*block
        ];
    }
    Ok(rx)
}

fn start_speech_prompt() -> Result<oneshot::Receiver<isize>, ProviderError> {
    let cls = class_for(PermissionKind::SpeechRecognition)?;
    let (tx, rx) = oneshot::channel();
    let deliver = once(tx);
    let block = RcBlock::new(move |status: isize| deliver(status));

    unsafe {
        let _: () = msg_send![cls, requestAuthorization: &*block];
    }
    Ok(rx)
}

#[async_trait]
impl AuthorizationProvider for MacAuthorizationProvider {
    fn query(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        let cls = class_for(kind)?;
        let state = match kind {
            PermissionKind::Microphone => {
                let raw: isize =
                    unsafe { msg_send![cls, authorizationStatusForMediaType: AVMediaTypeAudio] };
                from_av_authorization_status(raw)
            }
            PermissionKind::SpeechRecognition => {
                let raw: isize = unsafe { msg_send![cls, authorizationStatus] };
                from_speech_authorization_status(raw)
            }
        };
        tracing::debug!("{} authorization: {:?}", kind, state);
        Ok(state)
    }

    async fn prompt(&self, kind: PermissionKind) -> Result<AuthorizationState, ProviderError> {
        match kind {
            PermissionKind::Microphone => {
                let rx = start_microphone_prompt()?;
                let granted = rx.await.map_err(|_| ProviderError::CallbackDropped(kind))?;
                Ok(from_access_granted(granted))
            }
            PermissionKind::SpeechRecognition => {
                let rx = start_speech_prompt()?;
                let raw = rx.await.map_err(|_| ProviderError::CallbackDropped(kind))?;
                Ok(from_speech_authorization_status(raw))
            }
        }
    }
}

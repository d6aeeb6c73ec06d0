//! Translation of raw OS authorization values into [`AuthorizationState`].
//!
//! `restricted` (parental controls, MDM) has no remediation path of its own and
//! is reported as `Denied`. Values the OS may add later fall back to
//! `NotDetermined`.

use super::AuthorizationState;

// AVAuthorizationStatus
const AV_NOT_DETERMINED: isize = 0;
const AV_RESTRICTED: isize = 1;
const AV_DENIED: isize = 2;
const AV_AUTHORIZED: isize = 3;

// SFSpeechRecognizerAuthorizationStatus (note the different order)
const SPEECH_NOT_DETERMINED: isize = 0;
const SPEECH_DENIED: isize = 1;
const SPEECH_RESTRICTED: isize = 2;
const SPEECH_AUTHORIZED: isize = 3;

/// Map an `AVAuthorizationStatus` (microphone) value
pub fn from_av_authorization_status(raw: isize) -> AuthorizationState {
    match raw {
        AV_AUTHORIZED => AuthorizationState::Authorized,
        AV_DENIED | AV_RESTRICTED => AuthorizationState::Denied,
        AV_NOT_DETERMINED => AuthorizationState::NotDetermined,
        other => {
            tracing::warn!("Unknown AVAuthorizationStatus {}, treating as notDetermined", other);
            AuthorizationState::NotDetermined
        }
    }
}

/// Map an `SFSpeechRecognizerAuthorizationStatus` value
pub fn from_speech_authorization_status(raw: isize) -> AuthorizationState {
    match raw {
        SPEECH_AUTHORIZED => AuthorizationState::Authorized,
        SPEECH_DENIED | SPEECH_RESTRICTED => AuthorizationState::Denied,
        SPEECH_NOT_DETERMINED => AuthorizationState::NotDetermined,
        other => {
            tracing::warn!(
                "Unknown SFSpeechRecognizerAuthorizationStatus {}, treating as notDetermined",
                other
            );
            AuthorizationState::NotDetermined
        }
    }
}

/// Map the boolean delivered by a grant/deny completion handler
pub fn from_access_granted(granted: bool) -> AuthorizationState {
    if granted {
        AuthorizationState::Authorized
    } else {
        AuthorizationState::Denied
    }
}

use serde::Serialize;

pub const SELF_NAME: &str = "Prediction API";
pub const VOICE_NAME: &str = "Voice RSS TTS";
pub const SPEECH_NAME: &str = "Wit.ai Speech-to-Text";

#[derive(Debug, Clone, Serialize)]
pub struct DependencyStatus {
    pub name: &'static str,
    pub status: StatusKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Connected,
    Disabled,
    Error,
}

impl DependencyStatus {
    pub fn connected(name: &'static str) -> Self {
        Self {
            name,
            status: StatusKind::Connected,
            message: None,
        }
    }

    pub fn disabled(name: &'static str, message: &str) -> Self {
        Self {
            name,
            status: StatusKind::Disabled,
            message: Some(message.to_string()),
        }
    }

    pub fn error(name: &'static str, message: &str) -> Self {
        Self {
            name,
            status: StatusKind::Error,
            message: Some(message.to_string()),
        }
    }
}

// Fixed report order: this service first, then voice synthesis, then
// speech-to-text. The service entry is always connected.
pub fn assemble(voice: DependencyStatus, speech: DependencyStatus) -> Vec<DependencyStatus> {
    vec![DependencyStatus::connected(SELF_NAME), voice, speech]
}

// Speech-to-text has no live check; configured presence counts as connected.
pub fn speech_to_text_status(configured: bool) -> DependencyStatus {
    if configured {
        DependencyStatus::connected(SPEECH_NAME)
    } else {
        DependencyStatus::disabled(SPEECH_NAME, "Token not configured")
    }
}

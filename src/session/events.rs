use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Recognition event kind
///
/// Wire names match the notification names used by the native layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    Start,
    End,
    VolumeChanged,
    PartialResults,
    Results,
    Recognized,
    Error,
}

impl EventKind {
    /// Every event kind, in notification-slot order
    pub const ALL: [EventKind; 7] = [
        EventKind::Start,
        EventKind::End,
        EventKind::VolumeChanged,
        EventKind::PartialResults,
        EventKind::Results,
        EventKind::Recognized,
        EventKind::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::End => "end",
            EventKind::VolumeChanged => "volumeChanged",
            EventKind::PartialResults => "partialResults",
            EventKind::Results => "results",
            EventKind::Recognized => "recognized",
            EventKind::Error => "error",
        }
    }

    /// Terminal events release session ownership once delivered
    pub fn is_terminal(&self) -> bool {
        matches!(self, EventKind::Results | EventKind::Error)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a notification name is not one of the seven known kinds
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown voice event: {0}")]
pub struct UnknownEventKind(pub String);

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// Native error descriptor carried by the `error` event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorData {
    /// Platform error code, if the engine reports one
    #[serde(default)]
    pub code: Option<String>,
    /// Human readable description
    pub message: String,
}

/// A recognition event with its payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum VoiceEvent {
    /// Engine started listening
    Start,
    /// Engine stopped listening
    End,
    /// Input volume changed
    VolumeChanged { value: f32 },
    /// Interim transcripts, best first
    PartialResults { value: Vec<String> },
    /// Final transcripts, best first (terminal)
    Results { value: Vec<String> },
    /// Speech was recognized
    Recognized { transcript: String },
    /// Native recognition failure (terminal)
    Error(ErrorData),
}

impl VoiceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            VoiceEvent::Start => EventKind::Start,
            VoiceEvent::End => EventKind::End,
            VoiceEvent::VolumeChanged { .. } => EventKind::VolumeChanged,
            VoiceEvent::PartialResults { .. } => EventKind::PartialResults,
            VoiceEvent::Results { .. } => EventKind::Results,
            VoiceEvent::Recognized { .. } => EventKind::Recognized,
            VoiceEvent::Error(_) => EventKind::Error,
        }
    }

    /// Build a typed event from a raw native notification
    ///
    /// Payload shapes:
    /// - `start`, `end`: ignored
    /// - `volumeChanged`: number
    /// - `partialResults`, `results`: array of strings
    /// - `recognized`: string
    /// - `error`: `{ "message": ..., "code": ... }` or a bare string
    ///
    /// Returns `Ok(None)` for names that are not known event kinds.
    pub fn from_raw(name: &str, payload: serde_json::Value) -> serde_json::Result<Option<Self>> {
        let kind = match name.parse::<EventKind>() {
            Ok(kind) => kind,
            Err(_) => return Ok(None),
        };

        let event = match kind {
            EventKind::Start => VoiceEvent::Start,
            EventKind::End => VoiceEvent::End,
            EventKind::VolumeChanged => VoiceEvent::VolumeChanged {
                value: serde_json::from_value(payload)?,
            },
            EventKind::PartialResults => VoiceEvent::PartialResults {
                value: serde_json::from_value(payload)?,
            },
            EventKind::Results => VoiceEvent::Results {
                value: serde_json::from_value(payload)?,
            },
            EventKind::Recognized => VoiceEvent::Recognized {
                transcript: serde_json::from_value(payload)?,
            },
            EventKind::Error => match payload {
                serde_json::Value::String(message) => VoiceEvent::Error(ErrorData {
                    code: None,
                    message,
                }),
                other => VoiceEvent::Error(serde_json::from_value(other)?),
            },
        };

        Ok(Some(event))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_kind_names_parse_back() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
        assert!("unknown".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_only_results_and_error_are_terminal() {
        let terminal: Vec<_> = EventKind::ALL.into_iter().filter(|k| k.is_terminal()).collect();
        assert_eq!(terminal, vec![EventKind::Results, EventKind::Error]);
    }

    #[test]
    fn test_from_raw_typed_payloads() {
        assert_eq!(
            VoiceEvent::from_raw("volumeChanged", json!(11)).unwrap(),
            Some(VoiceEvent::VolumeChanged { value: 11.0 })
        );
        assert_eq!(
            VoiceEvent::from_raw("results", json!(["voice", "voice2"])).unwrap(),
            Some(VoiceEvent::Results {
                value: vec!["voice".to_string(), "voice2".to_string()]
            })
        );
        assert_eq!(
            VoiceEvent::from_raw("start", json!({ "a": 5 })).unwrap(),
            Some(VoiceEvent::Start)
        );
        assert_eq!(
            VoiceEvent::from_raw("error", json!({ "message": "info" })).unwrap(),
            Some(VoiceEvent::Error(ErrorData {
                code: None,
                message: "info".to_string()
            }))
        );
    }

    #[test]
    fn test_from_raw_unknown_name_is_dropped() {
        assert_eq!(VoiceEvent::from_raw("unknown", json!({ "b": 6 })).unwrap(), None);
    }

    #[test]
    fn test_from_raw_rejects_bad_payload() {
        assert!(VoiceEvent::from_raw("partialResults", json!(42)).is_err());
    }

    #[test]
    fn test_serialization_tag() {
        let json = serde_json::to_string(&VoiceEvent::Recognized {
            transcript: "something".to_string(),
        })
        .unwrap();
        assert!(json.contains("\"type\":\"recognized\""));
        assert!(json.contains("\"transcript\":\"something\""));
    }
}

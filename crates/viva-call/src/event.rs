//! Typed events emitted by the external voice session.
//!
//! Six event kinds cover one call lifecycle: call-start, call-end, message,
//! speech-start, speech-end, and error. Only `message` carries a payload;
//! its wire shape is `{type, transcriptType, role, transcript}`.

use crate::error::{CallError, CallResult};
use serde::{Deserialize, Serialize};

/// Events delivered by the voice session during one call.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The session confirmed the call is live.
    CallStart,
    /// The remote side ended the call.
    CallEnd,
    /// A payload message arrived (transcripts, status updates).
    Message(ServerMessage),
    /// A party started vocalizing.
    SpeechStart,
    /// A party stopped vocalizing.
    SpeechEnd,
    /// The session reported an error. Logged only; never moves call state.
    Error { message: String },
}

/// Wire payload of a `message` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerMessage {
    /// Payload discriminator; only `transcript` is consumed.
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Partial (interim) or final transcript.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_type: Option<TranscriptType>,
    /// Which party produced the transcript.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<SpeechRole>,
    /// Transcribed text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

impl ServerMessage {
    /// Build a transcript message with the given finality and role.
    pub fn transcript(
        role: SpeechRole,
        transcript_type: TranscriptType,
        text: impl Into<String>,
    ) -> Self {
        Self {
            kind: MessageKind::Transcript,
            transcript_type: Some(transcript_type),
            role: Some(role),
            transcript: Some(text.into()),
        }
    }

    /// Decode a raw JSON message payload from the session.
    pub fn parse(raw: &str) -> CallResult<Self> {
        serde_json::from_str(raw).map_err(|e| CallError::Decode(e.to_string()))
    }
}

/// Message payload kinds. Sessions also emit status and tool-call messages;
/// those map to `Other` and are ignored rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Transcript,
    #[serde(other)]
    Other,
}

/// Finality of a transcript: interim results are partial, committed ones final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptType {
    Partial,
    Final,
}

/// Speaking party on the wire. System transcripts are valid payloads but are
/// never appended to the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechRole {
    User,
    Assistant,
    System,
}

//! Transcript reduction: fold session events into an ordered, append-only
//! message log and the speaking indicator.
//!
//! Only final transcripts from the user or the assistant are appended.
//! Partial (interim) transcripts, system transcripts, and non-transcript
//! messages are dropped. The log never shrinks during a call.

use crate::event::{MessageKind, ServerMessage, SessionEvent, SpeechRole, TranscriptType};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One finalized line of the conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedMessage {
    pub role: SpeechRole,
    pub content: String,
}

/// Folds transcript and speech events into observable UI state.
#[derive(Debug, Default)]
pub struct TranscriptReducer {
    messages: Vec<SavedMessage>,
    speaking: bool,
}

impl TranscriptReducer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one session event. Call-lifecycle events are not this reducer's
    /// concern and pass through untouched.
    pub fn apply(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::Message(msg) => self.apply_message(msg),
            SessionEvent::SpeechStart => self.speaking = true,
            SessionEvent::SpeechEnd => self.speaking = false,
            _ => {}
        }
    }

    fn apply_message(&mut self, msg: &ServerMessage) {
        if msg.kind != MessageKind::Transcript
            || msg.transcript_type != Some(TranscriptType::Final)
        {
            return;
        }
        let role = match msg.role {
            Some(r @ (SpeechRole::User | SpeechRole::Assistant)) => r,
            _ => return,
        };
        let content = match &msg.transcript {
            Some(text) => text.clone(),
            None => return,
        };
        debug!("transcript line appended ({})", role_label(role));
        self.messages.push(SavedMessage { role, content });
    }

    /// Ordered log of finalized lines.
    pub fn messages(&self) -> &[SavedMessage] {
        &self.messages
    }

    /// The newest finalized line (the UI shows only this one).
    pub fn latest(&self) -> Option<&SavedMessage> {
        self.messages.last()
    }

    /// True iff the most recent speech event was speech-start.
    pub fn is_speaking(&self) -> bool {
        self.speaking
    }

    /// Local hang-up path: the indicator goes dark immediately, without
    /// waiting for a trailing speech-end from the session.
    pub fn clear_speaking(&mut self) {
        self.speaking = false;
    }

    /// Consume the reducer, yielding the final log.
    pub fn into_messages(self) -> Vec<SavedMessage> {
        self.messages
    }
}

fn role_label(role: SpeechRole) -> &'static str {
    match role {
        SpeechRole::User => "user",
        SpeechRole::Assistant => "assistant",
        SpeechRole::System => "system",
    }
}

//! **CallAgent** — the interview component: subscribes to the session, folds
//! events into call status and transcript, and performs the finish side
//! effect (one feedback attempt, then navigate back to the landing view).
//!
//! Event handling is single-threaded in the event-loop sense: each event is
//! applied to completion before the next is taken. The subscription handle is
//! held for exactly the lifetime of the fold loop, so listeners are released
//! on every exit path, including teardown while still connecting.

use crate::call::{CallController, CallStatus};
use crate::config::CallConfig;
use crate::error::CallResult;
use crate::event::SessionEvent;
use crate::feedback::{FeedbackRequest, FeedbackSink};
use crate::session::VoiceSession;
use crate::transcript::{SavedMessage, TranscriptReducer};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{info, warn};

/// Optional callback invoked once the finish side effect completes; the
/// embedder uses it to return to the landing view.
pub type OnNavigateHome = Option<Arc<dyn Fn() + Send + Sync>>;

/// Identity of the human party on the call.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Display name, interpolated into the interviewer's opening.
    pub username: String,
    /// Identifier the scoring service keys on.
    pub user_id: String,
}

impl Candidate {
    pub fn new(username: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            user_id: user_id.into(),
        }
    }
}

/// Outcome of a driven call.
#[derive(Debug, Clone)]
pub struct CallReport {
    /// Terminal status (Finished for a completed call; Inactive when the
    /// start was rejected and rolled back).
    pub status: CallStatus,
    /// Finalized transcript, in order.
    pub transcript: Vec<SavedMessage>,
    /// True when the feedback submission attempt succeeded.
    pub feedback_submitted: bool,
}

/// One interview call instance. Finished is terminal: `run` consumes the
/// agent, and a new interview constructs a new agent.
pub struct CallAgent {
    config: CallConfig,
    candidate: Candidate,
    session: Arc<dyn VoiceSession>,
    sink: Arc<dyn FeedbackSink>,
    controller: CallController,
    reducer: TranscriptReducer,
}

impl CallAgent {
    pub fn new(
        config: CallConfig,
        candidate: Candidate,
        session: Arc<dyn VoiceSession>,
        sink: Arc<dyn FeedbackSink>,
    ) -> Self {
        let controller = CallController::new(Arc::clone(&session), config.workflow_id.clone());
        Self {
            config,
            candidate,
            session,
            sink,
            controller,
            reducer: TranscriptReducer::new(),
        }
    }

    pub fn status(&self) -> CallStatus {
        self.controller.status()
    }

    /// Speaking indicator for the card UI.
    pub fn is_speaking(&self) -> bool {
        self.reducer.is_speaking()
    }

    /// Finalized transcript so far.
    pub fn transcript(&self) -> &[SavedMessage] {
        self.reducer.messages()
    }

    /// Newest finalized line, if any.
    pub fn latest_line(&self) -> Option<&str> {
        self.reducer.latest().map(|m| m.content.as_str())
    }

    /// Express the intent to start the call. Active is only reached once the
    /// session confirms with a call-start event.
    pub async fn start_call(&mut self) {
        self.controller.start_call(&self.candidate.username).await;
    }

    /// Local hang-up: the speaking indicator goes dark immediately and the
    /// session is asked to tear down.
    pub async fn end_call(&mut self) {
        self.reducer.clear_speaking();
        self.controller.end_call().await;
    }

    /// Apply one session event, to completion, before the next is taken.
    pub fn handle_event(&mut self, event: &SessionEvent) {
        match event {
            SessionEvent::CallStart => self.controller.on_call_start(),
            SessionEvent::CallEnd => self.controller.on_call_end(),
            SessionEvent::Error { message } => self.controller.on_error(message),
            _ => {}
        }
        self.reducer.apply(event);
    }

    /// Drive a full call: subscribe, start, fold events until the call
    /// finishes, then submit the transcript once (when non-empty) and invoke
    /// the navigation callback. A `hangup` signal, when provided, plays the
    /// role of the end-call button.
    pub async fn run(
        mut self,
        mut hangup: Option<oneshot::Receiver<()>>,
        on_navigate_home: OnNavigateHome,
    ) -> CallResult<CallReport> {
        enum Next {
            Event(Option<SessionEvent>),
            Hangup(bool),
        }

        let mut subscription = self.session.subscribe()?;
        self.start_call().await;

        while matches!(self.status(), CallStatus::Connecting | CallStatus::Active) {
            let next = if let Some(rx) = hangup.as_mut() {
                tokio::select! {
                    ev = subscription.recv() => Next::Event(ev),
                    res = rx => Next::Hangup(res.is_ok()),
                }
            } else {
                Next::Event(subscription.recv().await)
            };
            match next {
                Next::Hangup(pressed) => {
                    hangup = None;
                    if pressed {
                        self.end_call().await;
                    }
                }
                Next::Event(Some(ev)) => self.handle_event(&ev),
                Next::Event(None) => break,
            }
        }

        drop(subscription);
        self.finish(on_navigate_home).await
    }

    /// The finish side effect: when the call reached Finished, one feedback
    /// submission attempt (non-empty transcripts only, outcome logged and
    /// swallowed), then navigation home regardless of the outcome.
    pub async fn finish(self, on_navigate_home: OnNavigateHome) -> CallResult<CallReport> {
        let status = self.status();
        let mut feedback_submitted = false;

        if status == CallStatus::Finished {
            if !self.reducer.messages().is_empty() {
                let request = FeedbackRequest {
                    session_type: self.config.session_type.clone(),
                    user_id: self.candidate.user_id.clone(),
                    transcript: self.reducer.messages().to_vec(),
                    submitted_at: Utc::now(),
                };
                match self.sink.submit(&request).await {
                    Ok(()) => {
                        feedback_submitted = true;
                        info!(
                            "Transcript submitted for scoring ({} messages)",
                            request.transcript.len()
                        );
                    }
                    Err(e) => warn!("Transcript submission failed: {}", e),
                }
            }
            if let Some(navigate) = on_navigate_home {
                navigate();
            }
        }

        Ok(CallReport {
            status,
            transcript: self.reducer.into_messages(),
            feedback_submitted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{ServerMessage, SpeechRole, TranscriptType};
    use crate::feedback::NullFeedbackSink;
    use crate::session::ScriptedSession;

    fn agent(session: Arc<ScriptedSession>) -> CallAgent {
        CallAgent::new(
            CallConfig::new("wf-test"),
            Candidate::new("Ada", "user-1"),
            session,
            Arc::new(NullFeedbackSink),
        )
    }

    #[tokio::test]
    async fn events_fold_into_status_and_transcript() {
        let session = Arc::new(ScriptedSession::new());
        let mut agent = agent(session);
        agent.start_call().await;
        assert_eq!(agent.status(), CallStatus::Connecting);

        agent.handle_event(&SessionEvent::CallStart);
        assert_eq!(agent.status(), CallStatus::Active);

        agent.handle_event(&SessionEvent::SpeechStart);
        assert!(agent.is_speaking());
        agent.handle_event(&SessionEvent::Message(ServerMessage::transcript(
            SpeechRole::User,
            TranscriptType::Final,
            "hello",
        )));
        agent.handle_event(&SessionEvent::SpeechEnd);

        assert!(!agent.is_speaking());
        assert_eq!(agent.latest_line(), Some("hello"));

        agent.handle_event(&SessionEvent::CallEnd);
        assert_eq!(agent.status(), CallStatus::Finished);
    }

    #[tokio::test]
    async fn local_hangup_clears_speaking() {
        let session = Arc::new(ScriptedSession::new());
        let mut agent = agent(Arc::clone(&session));
        agent.start_call().await;
        agent.handle_event(&SessionEvent::CallStart);
        agent.handle_event(&SessionEvent::SpeechStart);
        agent.end_call().await;
        assert_eq!(agent.status(), CallStatus::Finished);
        assert!(!agent.is_speaking());
        assert_eq!(session.stop_requests(), 1);
    }

    #[tokio::test]
    async fn session_error_events_change_no_state() {
        let session = Arc::new(ScriptedSession::new());
        let mut agent = agent(session);
        agent.start_call().await;
        agent.handle_event(&SessionEvent::CallStart);
        agent.handle_event(&SessionEvent::Error {
            message: "ejection".to_string(),
        });
        assert_eq!(agent.status(), CallStatus::Active);
        assert!(agent.transcript().is_empty());
    }
}

//! Call-status state machine.
//!
//! INACTIVE/FINISHED --start--> CONNECTING --(session call-start)--> ACTIVE
//! --(local hang-up or session call-end)--> FINISHED. The Active transition is
//! never taken locally: starting a call only expresses intent, and the
//! session's call-start notification confirms it.

use crate::session::{StartOverrides, VoiceSession};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Lifecycle of one interview call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Inactive,
    Connecting,
    Active,
    Finished,
}

impl CallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Inactive => "inactive",
            CallStatus::Connecting => "connecting",
            CallStatus::Active => "active",
            CallStatus::Finished => "finished",
        }
    }
}

/// Drives the status machine and issues start/stop to the injected session.
pub struct CallController {
    session: Arc<dyn VoiceSession>,
    workflow_id: String,
    status: CallStatus,
}

impl CallController {
    pub fn new(session: Arc<dyn VoiceSession>, workflow_id: impl Into<String>) -> Self {
        Self {
            session,
            workflow_id: workflow_id.into(),
            status: CallStatus::Inactive,
        }
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    /// Begin a call for the given candidate. Only meaningful from
    /// Inactive/Finished. A rejected session start is logged and the status
    /// rolled back to Inactive synchronously; the error never reaches the UI.
    pub async fn start_call(&mut self, username: &str) {
        if !matches!(self.status, CallStatus::Inactive | CallStatus::Finished) {
            warn!("start_call ignored in state {}", self.status.as_str());
            return;
        }
        self.transition(CallStatus::Connecting);
        let overrides = StartOverrides::with_username(username);
        if let Err(e) = self.session.start(&self.workflow_id, overrides).await {
            error!("Failed to start call: {}", e);
            self.transition(CallStatus::Inactive);
        }
    }

    /// Hang up locally: mark the call finished and request teardown.
    /// Deliberately unguarded; a repeated hang-up re-requests stop.
    pub async fn end_call(&mut self) {
        self.transition(CallStatus::Finished);
        if let Err(e) = self.session.stop().await {
            warn!("Session stop request failed: {}", e);
        }
    }

    /// Session confirmed the call is live.
    pub fn on_call_start(&mut self) {
        self.transition(CallStatus::Active);
    }

    /// Session reported the call ended remotely.
    pub fn on_call_end(&mut self) {
        self.transition(CallStatus::Finished);
    }

    /// Session errors are logged only; the machine never moves on them.
    pub fn on_error(&mut self, message: &str) {
        error!("Session error: {}", message);
    }

    fn transition(&mut self, next: CallStatus) {
        if self.status != next {
            debug!("call status {} -> {}", self.status.as_str(), next.as_str());
        }
        self.status = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ScriptedSession;

    fn controller(session: Arc<ScriptedSession>) -> CallController {
        CallController::new(session, "wf-test")
    }

    #[tokio::test]
    async fn start_moves_to_connecting_not_active() {
        let session = Arc::new(ScriptedSession::new());
        let mut ctl = controller(Arc::clone(&session));
        ctl.start_call("Ada").await;
        assert_eq!(ctl.status(), CallStatus::Connecting);
        assert_eq!(
            session.last_start().map(|(wf, o)| (wf, o.username)),
            Some(("wf-test".to_string(), "Ada".to_string()))
        );
    }

    #[tokio::test]
    async fn active_only_via_call_start_notification() {
        let session = Arc::new(ScriptedSession::new());
        let mut ctl = controller(session);
        ctl.start_call("Ada").await;
        assert_eq!(ctl.status(), CallStatus::Connecting);
        ctl.on_call_start();
        assert_eq!(ctl.status(), CallStatus::Active);
    }

    #[tokio::test]
    async fn start_is_guarded_while_connecting() {
        let session = Arc::new(ScriptedSession::new());
        let mut ctl = controller(Arc::clone(&session));
        ctl.start_call("Ada").await;
        ctl.start_call("Ada").await;
        assert_eq!(ctl.status(), CallStatus::Connecting);
        assert_eq!(session.start_count(), 1);
    }

    #[tokio::test]
    async fn rejected_start_rolls_back_to_inactive() {
        let session = Arc::new(ScriptedSession::failing());
        let mut ctl = controller(session);
        ctl.start_call("Ada").await;
        assert_eq!(ctl.status(), CallStatus::Inactive);
    }

    #[tokio::test]
    async fn restart_allowed_after_finish() {
        let session = Arc::new(ScriptedSession::new());
        let mut ctl = controller(Arc::clone(&session));
        ctl.start_call("Ada").await;
        ctl.on_call_start();
        ctl.end_call().await;
        assert_eq!(ctl.status(), CallStatus::Finished);
        ctl.start_call("Ada").await;
        assert_eq!(ctl.status(), CallStatus::Connecting);
        assert_eq!(session.start_count(), 2);
    }

    #[tokio::test]
    async fn end_call_requests_stop_each_time() {
        let session = Arc::new(ScriptedSession::new());
        let mut ctl = controller(Arc::clone(&session));
        ctl.start_call("Ada").await;
        ctl.on_call_start();
        ctl.end_call().await;
        ctl.end_call().await;
        assert_eq!(ctl.status(), CallStatus::Finished);
        assert_eq!(session.stop_requests(), 2);
    }

    #[tokio::test]
    async fn error_notification_changes_nothing() {
        let session = Arc::new(ScriptedSession::new());
        let mut ctl = controller(session);
        ctl.start_call("Ada").await;
        ctl.on_call_start();
        ctl.on_error("meeting ended due to silence");
        assert_eq!(ctl.status(), CallStatus::Active);
    }
}

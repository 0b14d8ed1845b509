//! **VoiceSession** — the injected voice-call capability and its scoped
//! event subscription.
//!
//! The call engine never talks to an SDK singleton; it depends on this trait
//! so a real transport and the in-process `ScriptedSession` are
//! interchangeable. Subscriptions are scoped: the handle deregisters its
//! listener on drop, on every exit path including teardown mid-connect.

use crate::error::{CallError, CallResult};
use crate::event::SessionEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::debug;

/// Variable values handed to the session at call start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOverrides {
    /// Candidate display name, interpolated into the interviewer's prompt.
    pub username: String,
}

impl StartOverrides {
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
}

/// External voice-call capability: start/stop plus an event-subscription
/// surface. Implement for a real SDK transport; `ScriptedSession` is the
/// in-process stand-in.
#[async_trait]
pub trait VoiceSession: Send + Sync {
    /// Begin a call on the given workflow. A successful return does not mean
    /// the call is live; the session confirms with `SessionEvent::CallStart`.
    async fn start(&self, workflow_id: &str, overrides: StartOverrides) -> CallResult<()>;

    /// Request call teardown.
    async fn stop(&self) -> CallResult<()>;

    /// Register an event listener. The returned handle deregisters on drop.
    fn subscribe(&self) -> CallResult<EventSubscription>;
}

/// Scoped subscription handle: receive events while held, release the
/// listener registration on drop.
pub struct EventSubscription {
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl EventSubscription {
    /// Wrap a receiver with a release action run exactly once on drop.
    pub fn new(
        rx: mpsc::UnboundedReceiver<SessionEvent>,
        release: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            rx,
            release: Some(Box::new(release)),
        }
    }

    /// Receive the next session event (None when the session is gone).
    pub async fn recv(&mut self) -> Option<SessionEvent> {
        self.rx.recv().await
    }

    /// Non-blocking receive.
    pub fn try_recv(&mut self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

type SubscriberList = Arc<Mutex<Vec<(u64, mpsc::UnboundedSender<SessionEvent>)>>>;

/// Placeholder session: replays a scripted event sequence once `start` is
/// called. Use it to exercise the full call pipeline without a live SDK
/// transport; it also records start/stop requests for assertions.
#[derive(Default)]
pub struct ScriptedSession {
    script: Mutex<Vec<SessionEvent>>,
    fail_start: bool,
    subscribers: SubscriberList,
    next_id: AtomicU64,
    starts: Mutex<Vec<(String, StartOverrides)>>,
    stop_requests: AtomicUsize,
}

impl ScriptedSession {
    /// Session with no script; drive it manually with `emit`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Session that replays `script` to subscribers when started.
    pub fn with_script(script: Vec<SessionEvent>) -> Self {
        Self {
            script: Mutex::new(script),
            ..Self::default()
        }
    }

    /// Session whose `start` always rejects.
    pub fn failing() -> Self {
        Self {
            fail_start: true,
            ..Self::default()
        }
    }

    /// Push one event to all current subscribers. Closed receivers are pruned.
    pub fn emit(&self, event: SessionEvent) {
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.retain(|(_, tx)| tx.send(event.clone()).is_ok());
        }
    }

    /// Number of live listener registrations.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// How many times `start` was invoked (including rejected attempts).
    pub fn start_count(&self) -> usize {
        self.starts.lock().map(|s| s.len()).unwrap_or(0)
    }

    /// Arguments of the most recent `start` call.
    pub fn last_start(&self) -> Option<(String, StartOverrides)> {
        self.starts.lock().ok().and_then(|s| s.last().cloned())
    }

    /// How many times teardown was requested.
    pub fn stop_requests(&self) -> usize {
        self.stop_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VoiceSession for ScriptedSession {
    async fn start(&self, workflow_id: &str, overrides: StartOverrides) -> CallResult<()> {
        if let Ok(mut starts) = self.starts.lock() {
            starts.push((workflow_id.to_string(), overrides));
        }
        if self.fail_start {
            return Err(CallError::SessionStart("scripted start failure".to_string()));
        }
        let script: Vec<SessionEvent> = match self.script.lock() {
            Ok(mut s) => s.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        debug!("scripted session started; replaying {} events", script.len());
        for event in script {
            self.emit(event);
        }
        Ok(())
    }

    async fn stop(&self) -> CallResult<()> {
        self.stop_requests.fetch_add(1, Ordering::SeqCst);
        debug!("scripted session stop requested");
        Ok(())
    }

    fn subscribe(&self) -> CallResult<EventSubscription> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.subscribers
            .lock()
            .map_err(|_| CallError::Subscription("subscriber list poisoned".to_string()))?
            .push((id, tx));
        let list = Arc::clone(&self.subscribers);
        Ok(EventSubscription::new(rx, move || {
            if let Ok(mut subs) = list.lock() {
                subs.retain(|(sub_id, _)| *sub_id != id);
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn scripted_events_reach_subscriber_after_start() {
        let session = ScriptedSession::with_script(vec![
            SessionEvent::CallStart,
            SessionEvent::SpeechStart,
        ]);
        let mut sub = session.subscribe().unwrap();
        session
            .start("wf-1", StartOverrides::with_username("Ada"))
            .await
            .unwrap();
        assert_eq!(sub.recv().await, Some(SessionEvent::CallStart));
        assert_eq!(sub.recv().await, Some(SessionEvent::SpeechStart));
        assert_eq!(
            session.last_start(),
            Some(("wf-1".to_string(), StartOverrides::with_username("Ada")))
        );
    }

    #[tokio::test]
    async fn script_is_replayed_only_once() {
        let session = ScriptedSession::with_script(vec![SessionEvent::CallStart]);
        let mut sub = session.subscribe().unwrap();
        session
            .start("wf-1", StartOverrides::default())
            .await
            .unwrap();
        session
            .start("wf-1", StartOverrides::default())
            .await
            .unwrap();
        assert_eq!(sub.recv().await, Some(SessionEvent::CallStart));
        assert!(sub.try_recv().is_none());
    }

    #[tokio::test]
    async fn failing_session_rejects_start() {
        let session = ScriptedSession::failing();
        let err = session
            .start("wf-1", StartOverrides::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::SessionStart(_)));
        assert_eq!(session.start_count(), 1);
    }

    #[test]
    fn dropping_subscription_releases_registration() {
        let session = ScriptedSession::new();
        let sub = session.subscribe().unwrap();
        let other = session.subscribe().unwrap();
        assert_eq!(session.subscriber_count(), 2);
        drop(sub);
        assert_eq!(session.subscriber_count(), 1);
        drop(other);
        assert_eq!(session.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn emit_skips_dropped_receivers() {
        let session = ScriptedSession::new();
        let mut kept = session.subscribe().unwrap();
        let dropped = session.subscribe().unwrap();
        drop(dropped);
        session.emit(SessionEvent::SpeechEnd);
        assert_eq!(kept.try_recv(), Some(SessionEvent::SpeechEnd));
        assert_eq!(session.subscriber_count(), 1);
    }
}

//! # viva-call — AI interview call session engine
//!
//! Drives one two-party "viva" (oral interview) call: an injected voice
//! session emits call-lifecycle and transcript events, and this crate folds
//! them into observable call state, then submits the finished transcript for
//! scoring and navigates back to the landing view.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                          Call Agent                            │
//! │  ┌──────────────┐    ┌────────────────┐   ┌────────────────┐  │
//! │  │ VoiceSession │ →  │ CallController │   │   Transcript   │  │
//! │  │   (events)   │    │  (status FSM)  │   │    Reducer     │  │
//! │  └──────────────┘    └────────────────┘   └────────────────┘  │
//! │         │                    │ FINISHED           │           │
//! │         │                    ▼                    ▼           │
//! │         │          ┌───────────────────────────────────────┐  │
//! │         └────────→ │ FeedbackSink (one attempt) → go home  │  │
//! │                    └───────────────────────────────────────┘  │
//! └────────────────────────────────────────────────────────────────┘
//! ```

pub mod agent;
pub mod call;
pub mod config;
pub mod error;
pub mod event;
pub mod feedback;
pub mod session;
pub mod transcript;

pub use agent::{CallAgent, CallReport, Candidate, OnNavigateHome};
pub use call::{CallController, CallStatus};
pub use config::CallConfig;
pub use error::{CallError, CallResult};
pub use event::{MessageKind, ServerMessage, SessionEvent, SpeechRole, TranscriptType};
pub use feedback::{FeedbackRequest, FeedbackSink, HttpFeedbackSink, NullFeedbackSink};
pub use session::{EventSubscription, ScriptedSession, StartOverrides, VoiceSession};
pub use transcript::{SavedMessage, TranscriptReducer};

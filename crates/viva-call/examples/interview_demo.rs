//! Interview Demo — a full scripted call through the agent.
//!
//! Drives the pipeline with `ScriptedSession`, so no live SDK transport is
//! needed. Configure `VIVA_WORKFLOW_ID` / `VIVA_FEEDBACK_URL` in `.env` to
//! exercise a real scoring endpoint; otherwise the null sink is wired.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use viva_call::{
    CallAgent, CallConfig, Candidate, FeedbackSink, HttpFeedbackSink, NullFeedbackSink,
    ScriptedSession, ServerMessage, SessionEvent, SpeechRole, TranscriptType,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Interview Demo — scripted call through the viva-call agent");

    let config = match CallConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            info!("Using demo config ({})", e);
            CallConfig::new("demo-workflow")
        }
    };

    let sink: Arc<dyn FeedbackSink> = match &config.feedback_url {
        Some(url) => {
            info!("Submitting transcript to {}", url);
            Arc::new(HttpFeedbackSink::new(url.clone())?)
        }
        None => {
            info!("No VIVA_FEEDBACK_URL set; using the null sink.");
            Arc::new(NullFeedbackSink)
        }
    };

    let script = vec![
        SessionEvent::CallStart,
        SessionEvent::SpeechStart,
        SessionEvent::Message(ServerMessage::transcript(
            SpeechRole::Assistant,
            TranscriptType::Final,
            "Tell me about a project you are proud of.",
        )),
        SessionEvent::SpeechEnd,
        SessionEvent::SpeechStart,
        SessionEvent::Message(ServerMessage::transcript(
            SpeechRole::User,
            TranscriptType::Partial,
            "I built a real-time",
        )),
        SessionEvent::Message(ServerMessage::transcript(
            SpeechRole::User,
            TranscriptType::Final,
            "I built a real-time transcription pipeline in Rust.",
        )),
        SessionEvent::SpeechEnd,
        SessionEvent::CallEnd,
    ];

    let session = Arc::new(ScriptedSession::with_script(script));
    let candidate = Candidate::new("Ada", "user-001");
    let agent = CallAgent::new(config, candidate, session, sink);

    let navigated = Arc::new(AtomicBool::new(false));
    let nav = Arc::clone(&navigated);
    let report = agent
        .run(
            None,
            Some(Arc::new(move || {
                nav.store(true, Ordering::SeqCst);
            })),
        )
        .await?;

    info!("Call finished: {}", report.status.as_str());
    for line in &report.transcript {
        info!("  {:?}: {}", line.role, line.content);
    }
    info!(
        "Feedback submitted: {}; navigated home: {}",
        report.feedback_submitted,
        navigated.load(Ordering::SeqCst)
    );

    Ok(())
}

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use voice_session::{Config, ErrorData, Recognizer, SimulatedEngine, VoiceEvent};

/// Run a scripted recognition against the simulated engine
#[derive(Debug, Parser)]
#[command(name = "voice-session", version)]
struct Args {
    /// Config file (extension optional)
    #[arg(long, default_value = "config/voice-session")]
    config: String,

    /// Locale to recognize, overrides the configured default
    #[arg(long)]
    locale: Option<String>,

    /// End the script with a native error instead of results
    #[arg(long)]
    fail: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let engine = Arc::new(SimulatedEngine::new());
    engine.set_available(cfg.engine.available);

    let recognizer = Recognizer::new(engine.clone());
    if !recognizer.is_available() {
        warn!("Speech recognition is not available");
        return Ok(());
    }

    let session = recognizer.create_session();
    let other = recognizer.create_session();
    let mut events = session.event_stream()?;

    let locale = args.locale.or(cfg.recognition.default_locale);
    session.start(locale.as_deref())?;
    engine.set_recognizing(true);

    if let Err(e) = other.start(locale.as_deref()) {
        info!("Second session refused as expected: {}", e);
    }

    // Native notifications arrive on a platform thread
    let native = Arc::clone(&engine);
    let fail = args.fail;
    let script = tokio::task::spawn_blocking(move || {
        let step = Duration::from_millis(150);
        let mut notifications = vec![
            VoiceEvent::Start,
            VoiceEvent::VolumeChanged { value: 4.5 },
            VoiceEvent::PartialResults {
                value: vec!["hello".to_string()],
            },
            VoiceEvent::PartialResults {
                value: vec!["hello world".to_string()],
            },
            VoiceEvent::End,
            VoiceEvent::Recognized {
                transcript: "hello world".to_string(),
            },
        ];
        notifications.push(if fail {
            VoiceEvent::Error(ErrorData {
                code: Some("7".to_string()),
                message: "No match".to_string(),
            })
        } else {
            VoiceEvent::Results {
                value: vec!["hello world".to_string(), "hello word".to_string()],
            }
        });

        for event in notifications {
            std::thread::sleep(step);
            native.trigger(event);
        }
        native.set_recognizing(false);
    });

    while let Some(event) = events.next().await {
        match &event {
            VoiceEvent::PartialResults { value } => info!("Partial: {:?}", value.first()),
            VoiceEvent::Results { value } => info!("Results: {:?}", value),
            VoiceEvent::Error(data) => warn!("Recognition failed: {}", data.message),
            other => info!("Event: {}", other.kind()),
        }

        if event.kind().is_terminal() {
            break;
        }
    }

    script.await.context("Notification script panicked")?;

    // Ownership was released by the terminal event
    other.start(locale.as_deref())?;
    info!("Second session took over the recognizer");
    other.cancel()?;

    session.destroy()?;
    other.destroy()?;

    Ok(())
}

//! Symptom Interview - chatbot-style symptom intake with disease prediction
//!
//! Asks a configurable number of follow-up questions generated by a hosted
//! language model, then classifies the collected answers with one of several
//! pre-trained text classifiers.

mod api;
mod classify;
mod interview;
mod question;
mod runtime;
mod terminal;

use api::{create_router, AppState};
use clap::{Parser, Subcommand};
use classify::ModelRepository;
use question::{LoggingService, OpenRouterService, QuestionConfig, QuestionService};
use runtime::{InterviewRuntime, SessionManager};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(author, version, about = "Symptom interview with disease prediction")]
struct Cli {
    /// Model repository manifest
    #[arg(long, env = "MODEL_MANIFEST", default_value = classify::DEFAULT_MANIFEST)]
    manifest: PathBuf,

    /// HTTP port for `serve`
    #[arg(long, env = "SYMPTOM_PORT", default_value_t = 8000)]
    port: u16,

    /// Seconds of inactivity before a `serve` session is dropped
    #[arg(long, env = "SESSION_IDLE_SECS", default_value_t = runtime::DEFAULT_SESSION_IDLE.as_secs())]
    session_idle_secs: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Run one interview in this terminal
    Chat,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Serve);

    // Initialize logging; the terminal front-end keeps stdout for the dialogue
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "symptom_interview=info,tower_http=debug".into());
    match command {
        Command::Serve => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_span_list(false),
            )
            .init(),
        Command::Chat => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }

    // Load models once for the process lifetime
    tracing::info!(path = %cli.manifest.display(), "Loading model repository");
    let models = Arc::new(ModelRepository::load(&cli.manifest)?);
    tracing::info!(models = ?models.keys(), "Model repository loaded");

    // Question service
    let question_config = QuestionConfig::from_env();
    if question_config.api_key.is_none() {
        tracing::warn!("OPENROUTER_API_KEY is not set; question requests will be rejected");
    }
    let questions: Arc<dyn QuestionService> = Arc::new(LoggingService::new(Arc::new(
        OpenRouterService::new(&question_config)?,
    )));

    match command {
        Command::Serve => {
            let sessions = SessionManager::new(questions, models)
                .with_idle_timeout(Duration::from_secs(cli.session_idle_secs));
            serve(cli.port, sessions).await
        }
        Command::Chat => {
            let mut runtime = InterviewRuntime::new("terminal", questions, models);
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            terminal::run(&mut runtime, stdin, tokio::io::stdout()).await?;
            Ok(())
        }
    }
}

async fn serve(port: u16, sessions: SessionManager) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(sessions);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Symptom interview server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    serve, Json, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

use crate::classify::classify_decision;
use crate::config::LlmConfig;
use crate::openai::create_chat_completion;
use crate::prompts::pick_reflection_prompts;
use crate::ChatMessage;

pub const HEADER_TIMER_DURATION: &str = "X-Timer-Duration";
pub const HEADER_REFLECTION_PROMPT_1: &str = "X-Reflection-Prompt-1";
pub const HEADER_REFLECTION_PROMPT_2: &str = "X-Reflection-Prompt-2";
pub const HEADER_DECISION_IMPORTANCE: &str = "X-Decision-Importance";

/// Fixed body returned when the main completion call fails.
const GENERIC_ERROR_BODY: &str = "Sorry, there was an error processing your request.";

const ASSISTANT_SYSTEM_PROMPT: &str = r#"You are a thoughtful decision-making assistant who helps users think through their choices.

Instead of asking many direct questions, use a conversational approach with just 1-2 key points to consider. For example:
- "It might help to think about your budget constraints here."
- "Understanding the startup's business model would be an important factor to consider."

Especially at the start of a conversation, focus on gathering information the user likely already knows, rather than prompting deep reflection immediately.

Be concise and avoid overwhelming the user. If you do need to ask a direct question, limit yourself to just one."#;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    http: reqwest::Client,
    llm: Arc<LlmConfig>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ChatRequestBody {
    pub messages: Vec<ChatMessage>,
}

// Minijinja Environment setup
fn create_minijinja_env() -> AutoReloader {
    // Use AutoReloader for development convenience
    AutoReloader::new(|notifier| {
        let loader = path_loader("templates");
        let mut env = Environment::new();
        env.set_loader(loader);
        // Watch the templates directory for changes
        notifier.watch_path("templates", true);
        Ok(env)
    })
}

async fn index_handler(
    State(state): State<AppState>,
) -> Result<axum::response::Html<String>, (StatusCode, String)> {
    state
        .templates
        .acquire_env()
        .and_then(|env| {
            env.get_template("index.html").and_then(|tmpl| {
                let context = minijinja::context! {
                    title => "Decision Assistant",
                };
                tmpl.render(context)
            })
        })
        .map(axum::response::Html)
        .map_err(|e| {
            error!("Failed to get or render template: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        })
}

/// POST /api/chat: forward the conversation to the completion API, classify
/// the decision, and return the reply with timer metadata in headers.
async fn chat_handler(
    State(state): State<AppState>,
    Json(body): Json<ChatRequestBody>,
) -> Result<(HeaderMap, String), (StatusCode, String)> {
    // Generate the assistant reply first
    let mut messages = Vec::with_capacity(body.messages.len() + 1);
    messages.push(ChatMessage::system(ASSISTANT_SYSTEM_PROMPT));
    messages.extend_from_slice(&body.messages);

    let reply = create_chat_completion(
        &state.http,
        &state.llm,
        &state.llm.chat_model,
        &messages,
        None,
    )
    .await
    .map_err(|e| {
        error!("Error in chat API: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            GENERIC_ERROR_BODY.to_string(),
        )
    })?;

    // Classify importance and pick a timer duration in one call; this falls
    // back to routine/60s internally rather than failing the request.
    let classification =
        classify_decision(&state.http, &state.llm, &body.messages, &reply).await;
    let prompts = pick_reflection_prompts(classification.importance);

    let mut headers = HeaderMap::new();
    headers.insert(
        HEADER_TIMER_DURATION,
        HeaderValue::from(classification.duration_secs),
    );
    headers.insert(
        HEADER_DECISION_IMPORTANCE,
        HeaderValue::from_static(classification.importance.as_str()),
    );
    for (name, value) in [
        (HEADER_REFLECTION_PROMPT_1, prompts[0]),
        (HEADER_REFLECTION_PROMPT_2, prompts[1]),
    ] {
        let value = HeaderValue::from_str(value).map_err(|e| {
            error!("Invalid reflection prompt header value: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                GENERIC_ERROR_BODY.to_string(),
            )
        })?;
        headers.insert(name, value);
    }

    Ok((headers, reply))
}

/// Build the application router. Split out from `start_web_server` so
/// integration tests can drive it in-process.
pub fn build_router(llm: LlmConfig) -> Router {
    let state = AppState {
        templates: Arc::new(create_minijinja_env()),
        http: reqwest::Client::new(),
        llm: Arc::new(llm),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/api/chat", post(chat_handler))
        // Static assets must be nested under their own path so they do not
        // shadow the other routes.
        .nest_service("/static", ServeDir::new("static"))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(port: u16, llm: LlmConfig) -> Result<()> {
    let app = build_router(llm);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}

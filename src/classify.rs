use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, info};

use crate::config::LlmConfig;
use crate::openai::create_chat_completion;
use crate::ChatMessage;

/// Upper bound on the reflection timer, in seconds.
pub const MAX_DURATION_SECS: u32 = 240;
/// Fallback duration when the classifier fails or omits one.
pub const DEFAULT_DURATION_SECS: u32 = 60;

/// Token budget for the classifier reply; two short labelled lines.
const CLASSIFIER_MAX_TOKENS: u32 = 30;

const CLASSIFIER_SYSTEM_PROMPT: &str = r#"Analyze the conversation and the MOST RECENT AI RESPONSE to determine how much reflection time the user needs.
Return TWO pieces of information in this exact format:
"importance: [category]
duration: [seconds]"

For importance, classify the overall decision context into:
- trivial: Simple day-to-day choices with minimal consequences
- routine: Regular choices with short-term impacts
- complex: Significant choices with medium to long-term consequences
- life-altering: Major choices with far-reaching consequences

For duration, determine appropriate reflection time (in seconds) based on:
1. How complex or thought-provoking the JUST GENERATED AI RESPONSE is
2. How many questions were asked in the AI's response
3. Whether the user needs time to deeply consider these specific questions

In other words, the timer is for the user to reflect on what the AI just asked them.

Guidelines for duration:
- If the AI response contains simple clarifying questions: 0-20 seconds
- If the AI response raises moderate complexity considerations: 10-20 seconds
- If the AI response asks deep, value-based questions: 15-30 seconds
- If the AI response requires life-changing reflection: 30-60 seconds

Set 0 seconds in case the decision is simple, AI didn't ask any questions or they are simple and the user doesn't need to reflect. but in general be judicious - too long timers can be frustrating."#;

lazy_static! {
    static ref IMPORTANCE_RE: Regex = Regex::new(r"(?i)importance:\s*(\w+-?\w*)").unwrap();
    static ref DURATION_RE: Regex = Regex::new(r"(?i)duration:\s*(\d+)").unwrap();
}

/// How consequential the decision under discussion is. Controls which canned
/// reflection prompts are shown alongside the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Importance {
    Trivial,
    Routine,
    Complex,
    LifeAltering,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::Trivial => "trivial",
            Importance::Routine => "routine",
            Importance::Complex => "complex",
            Importance::LifeAltering => "life-altering",
        }
    }

    /// Parse a category name from classifier output. Anything outside the
    /// four known categories falls back to `Routine`.
    pub fn parse_or_routine(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trivial" => Importance::Trivial,
            "routine" => Importance::Routine,
            "complex" => Importance::Complex,
            "life-altering" => Importance::LifeAltering,
            _ => Importance::Routine,
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub importance: Importance,
    pub duration_secs: u32,
}

impl Default for Classification {
    fn default() -> Self {
        Self {
            importance: Importance::Routine,
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

/// Extract importance and duration from the classifier's free-text reply.
/// Missing or unrecognized fields fall back to routine / 60s; the duration
/// is always clamped to [0, 240].
pub fn parse_classification(raw: &str) -> Classification {
    let importance = IMPORTANCE_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| Importance::parse_or_routine(m.as_str()))
        .unwrap_or(Importance::Routine);

    let duration = DURATION_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(u64::from(DEFAULT_DURATION_SECS));

    Classification {
        importance,
        duration_secs: duration.min(u64::from(MAX_DURATION_SECS)) as u32,
    }
}

/// Classify the decision context and pick a reflection duration in one model
/// call. Never fails: any error is logged and the routine/60s default is
/// returned so the chat endpoint can still respond.
pub async fn classify_decision(
    client: &Client,
    cfg: &LlmConfig,
    history: &[ChatMessage],
    assistant_reply: &str,
) -> Classification {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(ChatMessage::system(CLASSIFIER_SYSTEM_PROMPT));
    messages.extend_from_slice(history);
    messages.push(ChatMessage::system(format!(
        "The above was the conversation history. This is the LAST AI response the user needs to reflect on: \"{}\"",
        assistant_reply
    )));

    match create_chat_completion(
        client,
        cfg,
        &cfg.classifier_model,
        &messages,
        Some(CLASSIFIER_MAX_TOKENS),
    )
    .await
    {
        Ok(raw) => {
            let classification = parse_classification(&raw);
            info!(
                importance = %classification.importance,
                duration_secs = classification.duration_secs,
                "Decision classified"
            );
            classification
        }
        Err(e) => {
            error!("Error in classification: {:?}", e);
            Classification::default()
        }
    }
}

// Interactive terminal chat. Runs the same completion + classification chain
// as the web endpoint, counting the reflection time down in the terminal
// before the next prompt is accepted.

use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::classify::classify_decision;
use crate::config::LlmConfig;
use crate::openai::create_chat_completion;
use crate::Conversation;

const CHAT_SYSTEM_PROMPT: &str = r#"You are a thoughtful decision-making assistant who helps users think through their choices.

Instead of asking many direct questions, use a conversational approach with just 1-2 key points to consider.

Be concise and avoid overwhelming the user. If you do need to ask a direct question, limit yourself to just one."#;

pub async fn run_chat(llm: LlmConfig) -> Result<()> {
    info!("Starting interactive decision chat");

    let client = reqwest::Client::new();
    let mut convo = Conversation::new();

    println!("What decision are you facing? (empty line to quit)");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    print!("> ");
    std::io::stdout().flush().ok();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let input = line.trim();
        if input.is_empty() {
            break;
        }

        convo.add_user(input);

        let mut messages = vec![crate::ChatMessage::system(CHAT_SYSTEM_PROMPT)];
        messages.extend_from_slice(&convo.messages);

        let reply =
            create_chat_completion(&client, &llm, &llm.chat_model, &messages, None).await?;
        println!("\n{}\n", reply);

        let classification =
            classify_decision(&client, &llm, &convo.messages, &reply).await;
        convo.add_assistant(reply);

        if classification.duration_secs > 0 {
            let prompts = crate::prompts::pick_reflection_prompts(classification.importance);
            println!("Let's reflect ({}):", classification.importance);
            println!("  1. {}", prompts[0]);
            println!("  2. {}", prompts[1]);

            // Hold the prompt closed until the reflection time elapses
            for remaining in (1..=classification.duration_secs).rev() {
                print!("\rReflection time: {:>3}s remaining ", remaining);
                std::io::stdout().flush().ok();
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            println!("\rReflection time is up.            ");
        }

        print!("> ");
        std::io::stdout().flush().ok();
    }

    info!("Chat session finished");
    Ok(())
}

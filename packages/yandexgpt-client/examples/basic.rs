//! Basic YandexGPT client usage example

use yandexgpt_client::{CompletionRequest, Message, YandexGptClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize from environment
    let client = YandexGptClient::from_env()?;

    println!("=== Completion ===");
    let response = client
        .completion(
            CompletionRequest::new(client.model_uri("yandexgpt-lite"))
                .message(Message::system("You are a helpful assistant."))
                .message(Message::user("What is Rust in one sentence?"))
                .temperature(0.3)
                .max_tokens(100),
        )
        .await?;

    println!("Response: {}", response.text);
    if let Some(usage) = response.usage {
        println!("Tokens used: {}", usage.total_tokens);
    }

    Ok(())
}

use anyhow::{Result, bail};
use colored::Colorize;
use manu_application::ChatService;

/// Asks one question in a throwaway session and prints the reply.
pub async fn run(service: &ChatService, text: &str) -> Result<()> {
    if text.trim().is_empty() {
        bail!("Nothing to ask: the question is blank");
    }

    let reply = service.ask(text).await?;
    tracing::debug!("[ask] Reply {} at {}", reply.id, reply.timestamp);
    for line in reply.content.lines() {
        println!("{}", line.bright_blue());
    }
    Ok(())
}

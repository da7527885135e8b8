use std::borrow::Cow::{self, Borrowed, Owned};

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use manu_application::{ChatService, ChatView, INPUT_PLACEHOLDER};
use manu_core::ChatError;
use manu_core::session::{Message, MessageKind, ViewState};

const COMMANDS: [&str; 7] = [
    "/starters", "/quick", "/history", "/new", "/heart", "/image", "/help",
];

/// Rustyline helper providing slash-command completion, highlighting and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else if line.starts_with('#') {
            Owned(line.bright_yellow().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_hint<'h>(&self, hint: &'h str) -> Cow<'h, str> {
        Owned(hint.bright_black().to_string())
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.is_empty() {
            return Some(INPUT_PLACEHOLDER.to_string());
        }
        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Slash commands understood by the REPL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlashCommand {
    Starters,
    Quick,
    History,
    New,
    Heart,
    Help,
}

/// One parsed line of REPL input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplInput {
    Empty,
    Quit,
    Command(SlashCommand),
    UnknownCommand(String),
    /// `#N`, 1-based
    Pick(usize),
    /// `/image <url>`
    Image(String),
    Text(String),
}

fn parse_input(line: &str) -> ReplInput {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return ReplInput::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return ReplInput::Quit;
    }
    if let Some(number) = trimmed.strip_prefix('#') {
        if let Ok(n) = number.trim().parse::<usize>() {
            if n > 0 {
                return ReplInput::Pick(n);
            }
        }
    }
    if let Some(url) = trimmed.strip_prefix("/image") {
        if url.is_empty() || url.starts_with(char::is_whitespace) {
            return ReplInput::Image(url.trim().to_string());
        }
    }
    if trimmed.starts_with('/') {
        return match trimmed {
            "/starters" => ReplInput::Command(SlashCommand::Starters),
            "/quick" => ReplInput::Command(SlashCommand::Quick),
            "/history" => ReplInput::Command(SlashCommand::History),
            "/new" => ReplInput::Command(SlashCommand::New),
            "/heart" => ReplInput::Command(SlashCommand::Heart),
            "/help" => ReplInput::Command(SlashCommand::Help),
            other => ReplInput::UnknownCommand(other.to_string()),
        };
    }
    ReplInput::Text(trimmed.to_string())
}

fn print_message(message: &Message) {
    let time = message.timestamp.as_str();
    if message.is_from_user() {
        let body = match message.kind {
            MessageKind::Heart => "❤️".red().to_string(),
            MessageKind::Image => format!("[image] {}", message.content).green().to_string(),
            _ => format!("> {}", message.content).green().to_string(),
        };
        println!(
            "{} {} {}",
            body,
            time.bright_black(),
            message.status_marks().bright_black()
        );
        print_reactions(message);
        return;
    }

    let author = if message.is_from_ai { "AI Assistant" } else { "Assistant" };
    println!("{} {}", format!("[{}]", author).bright_magenta(), time.bright_black());
    match message.kind {
        MessageKind::Heart => println!("{}", "❤️".red()),
        _ => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
        }
    }
    print_reactions(message);
    println!();
}

fn print_reactions(message: &Message) {
    if !message.reactions.is_empty() {
        println!("  {}", message.reactions.join(" "));
    }
}

fn print_numbered(title: &str, items: &[String]) {
    println!("{}", title.bright_yellow());
    for (i, item) in items.iter().enumerate() {
        println!("  {} {}", format!("#{}", i + 1).bright_yellow(), item);
    }
}

fn print_help() {
    println!("{}", "Commands:".bright_magenta());
    println!("  /starters  show conversation starters (new chats only)");
    println!("  /quick     show quick replies");
    println!("  /history   reprint the conversation");
    println!("  /new       start a new chat");
    println!("  /heart     send a heart");
    println!("  /image URL share an image");
    println!("  /help      show this help");
    println!("  #N         send suggestion N from the list on screen");
    println!("  quit|exit  leave");
}

/// Sends text and prints the reply, recovering from a vanished session.
async fn send_and_print(view: &ChatView, send: SendKind<'_>) {
    let outcome = match send {
        SendKind::Text(text) => view.send(text).await,
        SendKind::Starter(starter) => view.send_starter(starter).await,
        SendKind::QuickReply(reply) => view.send_quick_reply(reply).await,
    };

    match outcome {
        Ok(Some(reply)) => print_message(&reply),
        Ok(None) => {}
        Err(e) if e.is_session_not_found() => {
            let id = view.ensure_session().await;
            println!(
                "{}",
                format!("Your chat expired, started a new one ({}). Please try again.", id)
                    .yellow()
            );
        }
        Err(e) if e.is_timeout() => {
            println!("{}", "The assistant took too long to answer. Please try again.".red());
        }
        Err(ChatError::ReplyInFlight) => {
            println!("{}", "Still waiting for the previous reply.".yellow());
        }
        Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
    }
}

enum SendKind<'a> {
    Text(&'a str),
    Starter(&'a str),
    QuickReply(&'a str),
}

/// Picks suggestion `n` from whichever list is currently on screen.
async fn pick_suggestion(view: &ChatView, n: usize) -> Result<()> {
    let snapshot = view.snapshot().await?;
    let index = n - 1;

    if !snapshot.conversation_starters.is_empty() {
        match snapshot.conversation_starters.get(index) {
            Some(starter) => {
                println!("{}", format!("> {}", starter).green());
                send_and_print(view, SendKind::Starter(starter)).await;
            }
            None => println!("{}", format!("No starter #{}", n).yellow()),
        }
    } else if !snapshot.quick_replies.is_empty() {
        match snapshot.quick_replies.get(index) {
            Some(reply) => {
                println!("{}", format!("> {}", reply).green());
                send_and_print(view, SendKind::QuickReply(reply)).await;
            }
            None => println!("{}", format!("No quick reply #{}", n).yellow()),
        }
    } else {
        println!(
            "{}",
            "No suggestions on screen. Use /starters or /quick first.".bright_black()
        );
    }
    Ok(())
}

async fn run_command(view: &ChatView, command: SlashCommand) -> Result<()> {
    match command {
        SlashCommand::Starters => {
            let snapshot = view.snapshot().await?;
            if snapshot.conversation_starters.is_empty() {
                println!(
                    "{}",
                    "Starters are only offered in a new chat. Try /new or /quick.".bright_black()
                );
            } else {
                print_numbered("Try asking:", &snapshot.conversation_starters);
            }
        }
        SlashCommand::Quick => {
            view.focus_input();
            let snapshot = view.snapshot().await?;
            print_numbered("Quick replies:", &snapshot.quick_replies);
        }
        SlashCommand::History => {
            for message in view.snapshot().await?.messages {
                print_message(&message);
            }
        }
        SlashCommand::New => {
            view.start_new_session().await?;
            let snapshot = view.snapshot().await?;
            for message in &snapshot.messages {
                print_message(message);
            }
            print_numbered("Try asking:", &snapshot.conversation_starters);
        }
        SlashCommand::Heart => print_message(&view.send_heart().await?),
        SlashCommand::Help => print_help(),
    }
    Ok(())
}

/// Runs the interactive assistant chat until the user quits.
pub async fn run(service: &ChatService) -> Result<()> {
    let view = service.open_view().await;

    // Typing indicator, driven by the view state.
    let mut states = view.subscribe();
    let indicator = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            if *states.borrow_and_update() == ViewState::AwaitingReply {
                println!("{}", "AI Assistant is typing...".bright_black().italic());
            }
        }
    });

    let mut rl = Editor::new()?;
    rl.set_helper(Some(CliHelper::new()));

    println!("{}", "=== SocialManu AI Assistant ===".bright_magenta().bold());
    println!(
        "{}",
        "Type a question, '#N' to pick a suggestion, '/help' for commands, or 'quit' to exit."
            .bright_black()
    );
    println!();

    let snapshot = view.snapshot().await?;
    for message in &snapshot.messages {
        print_message(message);
    }
    print_numbered("Try asking:", &snapshot.conversation_starters);
    println!();

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let input = parse_input(&line);
                if input != ReplInput::Empty {
                    let _ = rl.add_history_entry(line.as_str());
                }

                match input {
                    ReplInput::Empty => continue,
                    ReplInput::Quit => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    ReplInput::Command(command) => {
                        if let Err(e) = run_command(&view, command).await {
                            eprintln!("{}", format!("Error: {}", e).red());
                        }
                    }
                    ReplInput::UnknownCommand(command) => {
                        println!(
                            "{}",
                            format!("Unknown command {}. Type /help.", command).bright_black()
                        );
                    }
                    ReplInput::Pick(n) => {
                        if let Err(e) = pick_suggestion(&view, n).await {
                            eprintln!("{}", format!("Error: {}", e).red());
                        }
                    }
                    ReplInput::Image(url) => match view.send_image(&url).await {
                        Ok(Some(image)) => print_message(&image),
                        Ok(None) => println!("{}", "Usage: /image <url>".bright_black()),
                        Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
                    },
                    ReplInput::Text(text) => {
                        send_and_print(&view, SendKind::Text(&text)).await;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    view.close();
    drop(view);
    let _ = indicator.await;
    service.shutdown().await;

    Ok(())
}

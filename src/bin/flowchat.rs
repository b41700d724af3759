//! Interactive chat with a hosted flow.
//!
//! # Usage
//!
//! ```bash
//! # Token from the environment, everything else from ./flowchat.yaml
//! FLOWCHAT_APPLICATION_TOKEN=... flowchat
//!
//! # Pick the flow on the command line
//! flowchat --endpoint mark_cristalli
//!
//! # Use another configuration file and disable colors
//! flowchat --config finance.yaml --no-color
//! ```
//!
//! # Commands
//!
//! - `/history` - Show the whole conversation
//! - `/stats` - Show session statistics
//! - `/help` - Show available commands
//! - `/quit` - Exit the application

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use flowchat::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};

/// Main entry point for the flowchat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("flowchat [OPTIONS]");
    let config = ChatConfig::from_args(args)?;

    let mut session = ChatSession::from_config(&config.flow)?;
    let mut renderer = PlainTextRenderer::with_color(config.use_color);
    let mut rl = DefaultEditor::new()?;

    println!("{}", config.title);
    println!("Flow: {}", config.flow.endpoint);
    println!("Type /help for commands, /quit to exit\n");

    loop {
        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::History => {
                            if session.history().is_empty() {
                                renderer.print_info("No messages yet.");
                            } else {
                                renderer.print_history(session.history());
                            }
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                    }
                    continue;
                }

                renderer.start_thinking();
                match session.send(line).await {
                    Ok(turn) => renderer.print_turn(&turn),
                    Err(err) => renderer.print_error(err.message()),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Flow endpoint: {}", stats.endpoint);
    println!(
        "      Turns: {} ({} user / {} assistant)",
        stats.turn_count, stats.user_turns, stats.assistant_turns
    );
    println!(
        "      Requests: {} ({} failed)",
        stats.total_requests, stats.failed_requests
    );
    println!("      Tweaked components: {}", stats.tweak_count);
}

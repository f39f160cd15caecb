// ABOUTME: seek-chat - terminal chat client with local history and streamed replies
// ABOUTME: Parses the command line, configures logging, and dispatches to commands
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Interactive chat (default)
//! seek-chat
//!
//! # Send one message in the active conversation
//! seek-chat send "What is the capital of France?"
//!
//! # List conversations, newest activity first
//! seek-chat list
//!
//! # Print a conversation
//! seek-chat show 3f2a9c0d1e4b4a6f8e2d7c1b0a9f8e7d
//!
//! # List available models
//! seek-chat models
//! ```

mod commands;
mod helpers;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use seek_chat::config::ClientConfig;
use seek_chat::controller::ConversationController;
use seek_chat::logging::LoggingConfig;
use seek_chat::render::RenderSink;
use tracing::debug;

use helpers::terminal::TerminalRenderer;

#[derive(Parser)]
#[command(
    name = "seek-chat",
    about = "Terminal chat client",
    long_about = "Chat from the terminal with locally persisted conversations and streamed replies."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Directory holding the conversation history (overrides SEEK_CHAT_DATA_DIR)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[non_exhaustive]
#[derive(Subcommand)]
enum Command {
    /// Interactive chat (default)
    Chat,

    /// Send one message and print the reply
    Send {
        /// Conversation to send in (defaults to the last active one)
        #[arg(long)]
        conversation: Option<String>,

        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// List conversations
    List,

    /// Print a conversation
    Show {
        /// Conversation id
        conversation_id: String,
    },

    /// List available models
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::from_env();
    if cli.verbose {
        logging = logging.verbose();
    }
    logging.init()?;

    let mut config = ClientConfig::from_env()?;
    if let Some(data_dir) = cli.data_dir {
        config = config.with_data_dir(data_dir);
    }
    debug!(data_dir = %config.storage.data_dir.display(), "Using data directory");

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => {
            let controller = controller(&config, TerminalRenderer::interactive())?;
            commands::chat::run(&controller).await?;
        }
        Command::Send { conversation, text } => {
            let controller = controller(&config, TerminalRenderer::reply_only())?;
            commands::conversations::send(&controller, conversation.as_deref(), &text.join(" "))
                .await?;
        }
        Command::List => commands::conversations::list(&config),
        Command::Show { conversation_id } => {
            commands::conversations::show(&config, &conversation_id)?;
        }
        Command::Models => {
            let controller = controller(&config, TerminalRenderer::reply_only())?;
            commands::models::list(&controller).await?;
        }
    }

    Ok(())
}

fn controller(
    config: &ClientConfig,
    renderer: impl RenderSink + 'static,
) -> Result<ConversationController> {
    Ok(ConversationController::from_config(
        config,
        Arc::new(renderer),
    )?)
}

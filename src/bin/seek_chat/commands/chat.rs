// ABOUTME: Interactive chat loop for seek-chat
// ABOUTME: Reads lines from stdin, dispatching slash commands and sending everything else
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::Result;
use seek_chat::controller::{ConversationController, SendOutcome};
use seek_chat::errors::ErrorDisposition;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use crate::helpers::display::{display_conversation_list, display_help, display_models};

/// One line of REPL input
#[derive(Debug, PartialEq, Eq)]
pub enum ReplCommand {
    /// Send the text as a message
    Message(String),
    /// Start a new conversation
    New,
    /// List conversations
    List,
    /// Switch conversation
    Open(String),
    /// List models
    Models,
    /// Select a model
    Model(String),
    /// Retry authentication
    Auth,
    /// Show help
    Help,
    /// Exit
    Quit,
    /// Blank input
    Empty,
    /// Unrecognized or incomplete slash command
    Invalid(String),
}

impl ReplCommand {
    /// Parse one input line
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return Self::Empty;
        }
        let Some(command) = line.strip_prefix('/') else {
            return Self::Message(line.to_owned());
        };

        let mut parts = command.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let argument = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

        match (name, argument) {
            ("new", None) => Self::New,
            ("list", None) => Self::List,
            ("open", Some(id)) => Self::Open(id.to_owned()),
            ("models", None) => Self::Models,
            ("model", Some(id)) => Self::Model(id.to_owned()),
            ("auth", None) => Self::Auth,
            ("help", None) => Self::Help,
            ("quit" | "exit", None) => Self::Quit,
            ("open" | "model", None) => Self::Invalid(format!("/{name} needs an id")),
            _ => Self::Invalid(format!("Unknown command: {line}")),
        }
    }
}

/// Run the interactive loop until `/quit` or end of input
pub async fn run(controller: &ConversationController) -> Result<()> {
    let report = controller.initialize().await;
    debug!(?report, "Chat session ready");
    println!("Type a message, or /help for commands.");

    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match ReplCommand::parse(&line) {
            ReplCommand::Empty => {}
            ReplCommand::Message(text) => send(controller, &text).await,
            ReplCommand::New => {
                controller.new_conversation().await;
            }
            ReplCommand::List => display_conversation_list(&controller.conversations().await),
            ReplCommand::Open(id) => {
                controller.open_conversation(&id).await;
            }
            ReplCommand::Models => {
                display_models(&controller.models().await, &controller.active_model().await);
            }
            ReplCommand::Model(id) => {
                if let Err(e) = controller.select_model(&id).await {
                    eprintln!("{}", e.message);
                }
            }
            ReplCommand::Auth => match controller.retry_authentication().await {
                Ok(()) => println!("Authenticated."),
                Err(e) => eprintln!("Authentication failed: {}", e.message),
            },
            ReplCommand::Help => display_help(),
            ReplCommand::Quit => break,
            ReplCommand::Invalid(reason) => eprintln!("{reason}"),
        }
    }

    info!("Chat session ended");
    Ok(())
}

async fn send(controller: &ConversationController, text: &str) {
    match controller.send(text).await {
        SendOutcome::Completed(_) | SendOutcome::Cancelled => {}
        SendOutcome::Failed(e) => debug!(error = %e, "Reply not received"),
        SendOutcome::Rejected(e) => match e.disposition() {
            ErrorDisposition::Reject => eprintln!("{}", e.message),
            _ => eprintln!("{e}"),
        },
    }
}

// ABOUTME: Model catalog command for seek-chat
// ABOUTME: Authenticates, fetches the catalog, and prints it with the active model marked
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use anyhow::{bail, Result};
use seek_chat::controller::ConversationController;

use crate::helpers::display::display_models;

/// Print the model catalog
pub async fn list(controller: &ConversationController) -> Result<()> {
    let report = controller.initialize().await;
    if !report.authenticated {
        bail!("Could not authenticate with the chat service");
    }
    display_models(&controller.models().await, &controller.active_model().await);
    Ok(())
}

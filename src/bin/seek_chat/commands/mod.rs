// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports command modules for seek-chat
// ABOUTME: Provides the interactive chat loop and one-shot conversation and model commands

pub mod chat;
pub mod conversations;
pub mod models;

// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
// ABOUTME: Re-exports helper modules for seek-chat
// ABOUTME: Provides display formatting and the terminal rendering sink

pub mod display;
pub mod terminal;

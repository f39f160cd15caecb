// ABOUTME: Model catalog entries as published by the chat service
// ABOUTME: Includes the active selection with its built-in default
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::models::{
    DEFAULT_MODEL_ICON, DEFAULT_MODEL_ID, DEFAULT_MODEL_NAME, DEFAULT_MODEL_VERSION,
};

/// One entry of the upstream model listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Upstream model id sent with each chat request
    pub id: String,
    /// Human-readable model family name
    #[serde(rename = "model")]
    pub display_name: String,
    /// Model version label
    #[serde(default)]
    pub version: String,
    /// Icon URL or asset reference
    #[serde(rename = "icon", default)]
    pub icon_ref: String,
    /// Whether the model is restricted to paying accounts
    #[serde(rename = "paidOnly", default)]
    pub paid_only: bool,
}

/// The model every new request is sent to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveModel {
    /// Upstream model id
    pub id: String,
    /// Human-readable model family name
    pub display_name: String,
    /// Model version label
    pub version: String,
    /// Icon URL or asset reference
    pub icon_ref: String,
}

impl ActiveModel {
    /// Label shown next to the input, e.g. `Claude 3.7`
    #[must_use]
    pub fn label(&self) -> String {
        if self.version.is_empty() {
            self.display_name.clone()
        } else {
            format!("{} {}", self.display_name, self.version)
        }
    }
}

impl Default for ActiveModel {
    fn default() -> Self {
        Self {
            id: DEFAULT_MODEL_ID.to_owned(),
            display_name: DEFAULT_MODEL_NAME.to_owned(),
            version: DEFAULT_MODEL_VERSION.to_owned(),
            icon_ref: DEFAULT_MODEL_ICON.to_owned(),
        }
    }
}

impl From<&ModelDescriptor> for ActiveModel {
    fn from(model: &ModelDescriptor) -> Self {
        Self {
            id: model.id.clone(),
            display_name: model.display_name.clone(),
            version: model.version.clone(),
            icon_ref: model.icon_ref.clone(),
        }
    }
}

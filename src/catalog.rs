// ABOUTME: Model catalog fetched once per process with a built-in default selection
// ABOUTME: Tracks the active model used for every outgoing chat request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use seek_chat_core::errors::{AppError, AppResult};
use seek_chat_core::models::{ActiveModel, Credential, ModelDescriptor};
use tracing::{info, warn};

use crate::transport::ChatTransport;

/// Ordered model listing plus the active selection
///
/// The default model is active before (and regardless of whether) the
/// listing ever loads.
#[derive(Debug, Default)]
pub struct ModelCatalog {
    models: Vec<ModelDescriptor>,
    active: ActiveModel,
    loaded: bool,
}

impl ModelCatalog {
    /// Catalog holding only the default model
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the listing unless a previous fetch succeeded
    ///
    /// The active selection is kept when it appears in the new listing.
    ///
    /// # Errors
    ///
    /// Propagates the transport error; the catalog is left unchanged and the
    /// active model stays usable
    pub async fn load_once(
        &mut self,
        transport: &dyn ChatTransport,
        credential: &Credential,
    ) -> AppResult<()> {
        if self.loaded {
            return Ok(());
        }
        match transport.list_models(credential).await {
            Ok(models) => {
                info!(count = models.len(), "Model catalog loaded");
                self.replace(models);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, model.id = %self.active.id, "Model catalog unavailable, keeping current model");
                Err(e)
            }
        }
    }

    /// Install a fetched listing
    pub fn replace(&mut self, models: Vec<ModelDescriptor>) {
        self.models = models;
        self.loaded = true;
    }

    /// Make `model_id` the active model
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the id is neither listed nor the current selection
    pub fn select(&mut self, model_id: &str) -> AppResult<&ActiveModel> {
        if let Some(model) = self.models.iter().find(|model| model.id == model_id) {
            self.active = ActiveModel::from(model);
        } else if model_id != self.active.id && model_id != ActiveModel::default().id {
            return Err(AppError::invalid_input(format!("Unknown model '{model_id}'")));
        } else if model_id != self.active.id {
            self.active = ActiveModel::default();
        }
        info!(model.id = %self.active.id, model.label = %self.active.label(), "Selected model");
        Ok(&self.active)
    }

    /// Listed models in upstream order (empty until loaded)
    #[must_use]
    pub fn models(&self) -> &[ModelDescriptor] {
        &self.models
    }

    /// Active model
    #[must_use]
    pub const fn active(&self) -> &ActiveModel {
        &self.active
    }

    /// Whether a listing has been fetched
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }
}

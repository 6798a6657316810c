use tracing::{info, warn};

use crate::error::EngineError;

use super::client::GeneratorClient;
use super::extract::extract;
use super::prompt::build_prompt;
use super::sanitize::sanitize;

/// Generation backend lifecycle. Corrections are only served from `Ready`;
/// the other states exist so callers get a precise refusal instead of a
/// confusing backend error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Initializing,
    Ready,
    Failed,
}

impl LifecycleState {
    pub fn on_load_start(self) -> Self {
        LifecycleState::Initializing
    }

    pub fn on_load_success(self) -> Self {
        LifecycleState::Ready
    }

    pub fn on_load_failure(self) -> Self {
        LifecycleState::Failed
    }

    /// Switching models invalidates whatever was loaded.
    pub fn on_model_change(self) -> Self {
        LifecycleState::Uninitialized
    }

    pub fn label(&self) -> &'static str {
        match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Initializing => "initializing",
            LifecycleState::Ready => "ready",
            LifecycleState::Failed => "failed",
        }
    }
}

/// The extracted corrections plus the user input echoed back for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrectionOutcome {
    pub corrections: Vec<String>,
    pub original: String,
}

/// Orchestrates one correction request: sanitize the input, build the
/// prompt, call the generation backend, extract candidates from the reply.
pub struct CorrectionEngine {
    client: Box<dyn GeneratorClient>,
    state: LifecycleState,
}

impl CorrectionEngine {
    pub fn new(client: Box<dyn GeneratorClient>) -> Self {
        Self {
            client,
            state: LifecycleState::Uninitialized,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn describe_backend(&self) -> String {
        self.client.describe()
    }

    /// Drive the backend to `Ready`. Idempotent once ready.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        if self.state == LifecycleState::Ready {
            return Ok(());
        }

        self.state = self.state.on_load_start();
        info!("⏳ Initializing generation backend ({})", self.client.describe());

        match self.client.warm_up() {
            Ok(()) => {
                self.state = self.state.on_load_success();
                info!("✅ Correction engine ready");
                Ok(())
            }
            Err(error) => {
                self.state = self.state.on_load_failure();
                warn!("Generation backend initialization failed: {error:#}");
                Err(EngineError::Initialization {
                    details: format!("{error:#}"),
                })
            }
        }
    }

    /// Model-change event: swap the backend client; the new one must be
    /// initialized before corrections are served again.
    pub fn change_backend(&mut self, client: Box<dyn GeneratorClient>) {
        info!("Model changed to {}", client.describe());
        self.client = client;
        self.state = self.state.on_model_change();
    }

    pub fn correct(
        &self,
        locale_code: &str,
        raw_input: &str,
    ) -> Result<CorrectionOutcome, EngineError> {
        if self.state != LifecycleState::Ready {
            return Err(EngineError::NotReady {
                state: self.state.label(),
            });
        }

        let sanitized = sanitize(raw_input);
        let prompt = build_prompt(locale_code, &sanitized);
        info!(locale = locale_code, "Correcting: '{sanitized}'");

        let reply = self
            .client
            .generate(&prompt)
            .map_err(|error| EngineError::Generation {
                details: format!("{error:#}"),
            })?;

        let corrections = extract(Some(reply.text.as_str()), reply.mode);
        info!(count = corrections.len(), "Extracted corrections");

        Ok(CorrectionOutcome {
            corrections,
            original: raw_input.to_string(),
        })
    }
}

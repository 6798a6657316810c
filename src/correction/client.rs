use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::extract::ResponseMode;

/// Response timeout for the generation backend.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One full reply from the generation backend. The backend may stream
/// internally, but extraction only ever sees the accumulated text.
#[derive(Debug, Clone)]
pub struct GeneratedResponse {
    pub text: String,
    pub mode: ResponseMode,
}

/// Seam between the correction engine and the generation backend, so tests
/// and alternative backends never touch the network paths below.
#[cfg_attr(test, mockall::automock)]
pub trait GeneratorClient: Send + Sync {
    /// Run one generation request and return the full response text together
    /// with the mode it was produced under.
    fn generate(&self, prompt: &str) -> Result<GeneratedResponse>;

    /// Ask the backend to load the configured model without generating text.
    fn warm_up(&self) -> Result<()>;

    /// Backend and model label for logs and the status endpoint.
    fn describe(&self) -> String;
}

/// Client for an Ollama-style `/api/generate` endpoint.
pub struct OllamaClient {
    endpoint: String,
    model: String,
    json_format: bool,
    http: reqwest::blocking::Client,
}

impl OllamaClient {
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build the HTTP client for the generation backend")?;

        Ok(Self {
            endpoint: endpoint.into(),
            model: model.into(),
            json_format: true,
            http,
        })
    }

    /// Drop the JSON output constraint; replies arrive as plain prose and go
    /// through the freeform extraction path.
    #[allow(dead_code)]
    pub fn freeform_output(mut self) -> Self {
        self.json_format = false;
        self
    }

    fn mode(&self) -> ResponseMode {
        if self.json_format {
            ResponseMode::Structured
        } else {
            ResponseMode::Freeform
        }
    }
}

impl GeneratorClient for OllamaClient {
    fn generate(&self, prompt: &str) -> Result<GeneratedResponse> {
        let payload = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: self.json_format.then_some("json"),
        };

        let response = self
            .http
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .context("generation request to the backend failed")?
            .error_for_status()
            .context("the generation backend returned an error status")?;

        let body: GenerateResponse = response
            .json()
            .context("could not decode the generation backend response")?;

        debug!(chars = body.response.len(), "received generation response");
        Ok(GeneratedResponse {
            text: body.response,
            mode: self.mode(),
        })
    }

    fn warm_up(&self) -> Result<()> {
        // an empty prompt makes Ollama load the model and return immediately
        let payload = GenerateRequest {
            model: &self.model,
            prompt: "",
            stream: false,
            format: None,
        };

        self.http
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .context("could not reach the generation backend")?
            .error_for_status()
            .context("the generation backend refused the model load")?;

        info!(model = %self.model, "generation backend is ready");
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} via {}", self.model, self.endpoint)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

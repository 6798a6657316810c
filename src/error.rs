/// Errors the correction engine surfaces to its callers.
///
/// Extraction is total and never appears here; these cover the collaborators
/// around it (backend reachability, lifecycle misuse).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("correction engine is not ready (state: {state})")]
    NotReady { state: &'static str },

    #[error("generation backend initialization failed: {details}")]
    Initialization { details: String },

    #[error("generation request failed: {details}")]
    Generation { details: String },
}

//! The correction pipeline: input sanitation, prompt assembly, generation
//! backend client, response extraction and the engine tying them together.

pub mod client;
pub mod engine;
pub mod extract;
pub mod prompt;
pub mod sanitize;

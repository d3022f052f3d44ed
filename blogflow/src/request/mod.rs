//! Caller-supplied inputs for a pipeline run.
//!
//! Both types are validated once by the orchestrator and then only borrowed;
//! no stage mutates them.

mod generation;
mod model;

pub use generation::{parse_keywords, GenerationRequest, Tone};
pub use model::{Credential, ModelConfig, TemperatureStrategy};

// CV evaluation: LLM analysis with a deterministic narrative fallback.
// All LLM calls go through llm_client; everything below analyzer is pure.

pub mod analyzer;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod render;
pub mod rubric;
pub mod scorer;
pub mod segmenter;
pub mod signals;
pub mod synthesizer;

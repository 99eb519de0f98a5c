// Content generation: prompt building, LLM reply parsing, orchestration.
// All LLM calls go through llm_client; nothing here talks HTTP directly.

pub mod generator;
pub mod handlers;
pub mod parser;
pub mod prompts;

// Resume generation: prompt composition, the AI round-trip, normalization of
// whatever comes back, and the HTTP handlers on top.
// All AI calls go through llm_client; nothing here talks to the provider directly.

pub mod clean;
pub mod composer;
pub mod generator;
pub mod handlers;
pub mod normalizer;
pub mod prompts;

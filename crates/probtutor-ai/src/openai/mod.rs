//! OpenAI Assistants API client.
//!
//! Implements `AssistantService` over the v2 Assistants REST endpoints
//! (assistants, threads, messages, runs, files). Authentication is a
//! bearer API key read from `OPENAI_API_KEY`.

mod api;
mod client;
mod config;
mod wire;

pub use client::OpenAiClient;
pub use config::OpenAiConfig;

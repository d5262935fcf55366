//! Reasoning collaborator implementations and configuration loading.

pub mod config;
pub mod openai_api_collaborator;

pub use config::ConfigStorage;
pub use openai_api_collaborator::OpenAiCollaborator;

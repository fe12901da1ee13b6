// ReadStash shared type definitions
// Each submodule defines types used across the application.

pub mod article;
pub mod errors;
pub mod message;
pub mod reader;
pub mod settings;

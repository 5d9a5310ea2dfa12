// Core client functionality for the chat form:
// - Payload types and the display-text rule
// - Collaborator traits and the submit handler
// - HTTP client for the chat server
// - Configuration loading
// - Shared error types

// Export types module - Request/response data structures
pub mod types;
pub use types::*;

// Export render module - Display text selection
pub mod render;
pub use render::*;

// Export form module - Collaborators and the submit handler
pub mod form;
pub use form::*;

// Export client module - HTTP client for the chat server
pub mod client;
pub use client::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

// Core of the comparison demo client:
// - HTTP client for the comparison backend
// - Response envelopes and payload types
// - Session state and its transitions
// - Configuration loading
// - Display formatting and shared error types

// Export client module - API client for the comparison backend
pub mod client;
pub use client::*;

// Export types module - Envelopes and payloads
pub mod types;
pub use types::*;

// Export config module - Configuration loading
pub mod config;
pub use config::*;

// Export errors module - Shared error types
pub mod errors;
pub use errors::*;

pub mod format;
pub use format::{format_reasoning, friendly_error, HtmlMarkup, PlainMarkup, ReasoningMarkup};

pub mod session;
pub use session::{DemoSession, DemoState, Phase};

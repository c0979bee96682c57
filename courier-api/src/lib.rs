//! Courier API - HTTP client for the backend REST API.
//!
//! This crate provides a typed HTTP client for the endpoints the client
//! consumes: authentication (activation, registration, login), paginated
//! conversation batch fetches, and contact listing. It handles bearer-token
//! auth, TLS options, request timeouts, and automatic retry with
//! exponential backoff.

pub mod client;
pub mod endpoints;
pub mod response;

// Re-export key types
pub use client::{ApiClient, RetryConfig};
pub use response::{
    ContactResponse, ConversationResponse, ConversationsPage, ErrorResponse, RegisteredUser,
    SessionResponse,
};

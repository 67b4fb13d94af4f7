//! crates/maidat_core/src/ports.rs
//!
//! Defines the service contract for the external generative content provider.
//! The trait forms the boundary of the hexagonal architecture, so the requester
//! and the shell never depend on a specific API client.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors of the provider's client library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("The provider did not answer within {0:?}")]
    Timeout(Duration),
    #[error("The provider returned no text content")]
    EmptyResponse,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// A schema-constrained generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Fixes language and register for the whole exchange.
    pub system_instructions: String,
    pub prompt: String,
    /// Name the schema is registered under with the provider.
    pub schema_name: String,
    pub response_schema: Value,
}

#[async_trait]
pub trait ContentGenerationService: Send + Sync {
    /// Sends one request and returns the raw generated text, expected to be
    /// JSON conforming to `request.response_schema`.
    async fn generate_structured(&self, request: &GenerationRequest) -> PortResult<String>;
}

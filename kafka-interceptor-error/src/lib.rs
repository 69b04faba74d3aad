// Copyright 2023 The Kafka Interceptor Rust Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! # Kafka Interceptor Error Handling
//!
//! A single error type shared by every crate of the workspace. Each variant names what went
//! wrong (startup wiring, configuration, payload serialization, an interceptor hook, a send) and
//! carries enough context to be logged as-is.
//!
//! ```rust
//! use kafka_interceptor_error::InterceptorError;
//! use kafka_interceptor_error::InterceptorResult;
//!
//! fn resolve(name: &str) -> InterceptorResult<()> {
//!     if name.is_empty() {
//!         return Err(InterceptorError::registry_unavailable("no registry bound"));
//!     }
//!     Ok(())
//! }
//! # resolve("default").unwrap();
//! ```

mod serialization;

pub use serialization::SerializationError;
use thiserror::Error;

/// Result alias used across the interceptor crates.
pub type InterceptorResult<T> = std::result::Result<T, InterceptorError>;

/// Main error type for all interceptor operations.
#[derive(Debug, Error)]
pub enum InterceptorError {
    // ============================================================================
    // Serialization Errors
    // ============================================================================
    /// Payload encoding/decoding errors
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    // ============================================================================
    // Startup Errors
    // ============================================================================
    /// The object registry that supplies interceptors could not be read
    #[error("Interceptor registry unavailable: {reason}")]
    RegistryUnavailable { reason: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Configuration source could not be loaded or deserialized
    #[error("Configuration error: {reason}")]
    ConfigInvalid { reason: String },

    // ============================================================================
    // Interceptor Errors
    // ============================================================================
    /// An interceptor hook reported a failure
    #[error("Interceptor '{interceptor}' failed: {reason}")]
    InterceptorFailed { interceptor: String, reason: String },

    // ============================================================================
    // Producer Errors
    // ============================================================================
    /// The underlying sender rejected the record
    #[error("Send to topic '{topic}' failed: {reason}")]
    SendFailed { topic: String, reason: String },

    // ============================================================================
    // System Errors
    // ============================================================================
    /// Illegal argument
    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    /// Internal error (should be rare)
    #[error("Internal error: {0}")]
    Internal(String),
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl InterceptorError {
    /// Create a registry unavailable error
    #[inline]
    pub fn registry_unavailable(reason: impl Into<String>) -> Self {
        Self::RegistryUnavailable { reason: reason.into() }
    }

    /// Create a configuration error
    #[inline]
    pub fn config_invalid(reason: impl Into<String>) -> Self {
        Self::ConfigInvalid { reason: reason.into() }
    }

    /// Create an interceptor failure
    #[inline]
    pub fn interceptor_failed(interceptor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InterceptorFailed {
            interceptor: interceptor.into(),
            reason: reason.into(),
        }
    }

    /// Create a send failure
    #[inline]
    pub fn send_failed(topic: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SendFailed {
            topic: topic.into(),
            reason: reason.into(),
        }
    }

    #[inline]
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        Self::IllegalArgument(message.into())
    }

    #[inline]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns `true` when the error comes from startup wiring and the host should not start.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::RegistryUnavailable { .. } | Self::ConfigInvalid { .. })
    }
}

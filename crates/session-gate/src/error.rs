//! Error types for session-gate.

/// Errors raised while completing a sign-in with the identity provider.
///
/// Every variant ends the handshake. The authenticator turns them into a
/// redirect to the failure page, so none of them reach the browser directly.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    /// Callback arrived without an authorization code
    #[error("Authorization code missing from callback")]
    MissingCode,

    /// Provider redirected back with an `error` parameter
    #[error("Provider denied the request: {0}")]
    ProviderDenied(String),

    /// Provider answered the exchange with a non-success status
    #[error("Provider rejected the exchange ({status}): {message}")]
    ProviderRejected {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Profile came back without a subject identifier
    #[error("Provider profile has no identifier")]
    MissingIdentity,

    /// Network error talking to the provider
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("Failed to parse provider response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl AuthError {
    /// Create a provider rejection error.
    #[must_use]
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::ProviderRejected { status, message: message.into() }
    }

    /// Returns true if the failure came from the provider's answer rather
    /// than from the browser's callback request.
    #[must_use]
    pub const fn is_provider_fault(&self) -> bool {
        matches!(
            self,
            Self::ProviderRejected { .. } | Self::MissingIdentity | Self::Http(_) | Self::Parse(_)
        )
    }
}

/// Errors from startup configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not supplied
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    /// A setting was supplied but unusable
    #[error("Invalid setting {field}: {message}")]
    Invalid {
        /// Setting name
        field: &'static str,
        /// What is wrong with it
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid-setting error.
    #[must_use]
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid { field, message: message.into() }
    }
}

/// Result type alias for provider operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Result type alias for configuration.
pub type ConfigResult<T> = Result<T, ConfigError>;

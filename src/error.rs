use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field path or configuration key that caused the error (e.g., "config.base_url", "wav.header.format")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., expected value, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "base64_decoder", "tts_client")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the studio runtime.
///
/// Codec failures (`Decode`, `InvalidParameter`) are never retried: the codec is
/// deterministic, so the same input fails the same way.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Decode error: {message}{}", format_context(.context))]
    Decode {
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid parameter: {message}{}", format_context(.context))]
    InvalidParameter {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Network error: {message}{}", format_context(.context))]
    Network {
        message: String,
        context: ErrorContext,
    },

    #[error("Remote API error: {message}{}", format_context(.context))]
    Api {
        message: String,
        context: ErrorContext,
    },

    #[error("Playback error: {message}{}", format_context(.context))]
    Playback {
        message: String,
        context: ErrorContext,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::decode_with_context(msg, ErrorContext::new())
    }

    pub fn decode_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Decode {
            message: msg.into(),
            context,
        }
    }

    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::invalid_parameter_with_context(msg, ErrorContext::new())
    }

    pub fn invalid_parameter_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::InvalidParameter {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn network_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Network {
            message: msg.into(),
            context,
        }
    }

    pub fn api_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Api {
            message: msg.into(),
            context,
        }
    }

    pub fn playback(msg: impl Into<String>) -> Self {
        Error::Playback {
            message: msg.into(),
            context: ErrorContext::new(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Decode { context, .. }
            | Error::InvalidParameter { context, .. }
            | Error::Configuration { context, .. }
            | Error::Network { context, .. }
            | Error::Api { context, .. }
            | Error::Playback { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Whether the failure came from the codec rather than a collaborator.
    pub fn is_codec_error(&self) -> bool {
        matches!(self, Error::Decode { .. } | Error::InvalidParameter { .. })
    }
}

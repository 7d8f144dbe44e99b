//! Error types for the plugin
//!
//! Every variant except [`PluginError::Decode`] is reported back to protoc
//! through the response's `error` field.

use fieldmap_codegen::GeneratorError;

/// Error type for the plugin
#[derive(Debug, thiserror::Error)]
pub enum PluginError {
    /// The plugin parameter string is malformed or incomplete
    #[error("invalid parameter: {0}")]
    Parameter(String),

    /// A message named by a parameter is not among the request's files
    #[error("message not found: {0}")]
    MessageNotFound(String),

    /// A field uses a protobuf construct with no schema counterpart
    #[error("unsupported field {field}: {reason}")]
    Unsupported {
        /// Fully qualified field name
        field: String,
        /// What is not supported
        reason: String,
    },

    /// Field-mapping generation failed
    #[error(transparent)]
    Generator(#[from] GeneratorError),

    /// Failed to decode the CodeGeneratorRequest
    #[error("decode error: {0}")]
    Decode(#[from] prost::DecodeError),
}

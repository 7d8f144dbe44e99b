//! Error types for code generation
//!
//! Every generator stops at the first error it meets and discards the lines
//! it had emitted so far.

use crate::types::ResolveError;

/// Result alias used by all generators
pub type Result<T> = std::result::Result<T, GeneratorError>;

/// Error type for code generation
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A field map entry names a source path that does not exist
    #[error("failed to find field ( {0} ) for transform")]
    UnknownTransformSource(String),

    /// A required target field has no direct source and no mapping
    #[error("required toField {0} does not have a valid fromField mapping")]
    MissingRequiredTarget(String),

    /// Map-typed target whose key is neither a string nor a string typedef
    #[error("could not convert key ({0}), map is not string-keyed")]
    NonStringKey(String),

    /// Header mapped onto a field that cannot hold a header value
    #[error("invalid: trying to assign header {header} to non-string field in {field}")]
    NonStringHeaderTarget {
        /// Header name
        header: String,
        /// Target field name
        field: String,
    },

    /// Source field exists but has a different structural kind than the target
    #[error("could not convert {expected} fields, incompatible type for {field}")]
    IncompatibleType {
        /// Target field name
        field: String,
        /// Kind the target expected: "struct", "list", "set" or "map"
        expected: &'static str,
    },

    /// Header target path does not resolve through the request fields
    #[error("could not find field path in client request {0}")]
    UnknownTargetPath(String),

    /// Package lookup for a named type failed
    #[error("could not lookup fieldType when building converter for {type_name}")]
    PackageResolution {
        /// IDL name of the type being resolved
        type_name: String,
        /// Resolver failure
        #[source]
        source: ResolveError,
    },
}

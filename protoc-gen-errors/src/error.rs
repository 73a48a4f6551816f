//! Error types for code generation

use crate::wire::DecodeError;

/// Error type for code generation
///
/// Every variant aborts the whole plugin run: the message is returned to
/// protoc in `CodeGeneratorResponse.error` and no file is written.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// Code generation failed
    #[error("code generation error: {0}")]
    CodeGenError(String),

    /// Option bytes or descriptor bytes are malformed
    #[error("{location}: failed to decode error option: {source}")]
    Decode {
        /// Where the bytes came from
        location: String,
        /// Underlying wire error
        #[source]
        source: DecodeError,
    },

    /// An error option without a code
    #[error("{location}: error option is missing its code")]
    MissingCode {
        /// Where the option is declared
        location: String,
    },

    /// The same code declared twice while duplicates are rejected
    #[error("{location}: duplicate error code {code:?}, first declared at {first}")]
    DuplicateCode {
        /// The repeated code
        code: String,
        /// The later declaration
        location: String,
        /// The declaration that was kept
        first: String,
    },

    /// Invalid plugin parameter
    #[error("invalid plugin parameter: {0}")]
    Config(String),

    /// Failed to decode the CodeGeneratorRequest
    #[error("decode error: {0}")]
    Request(#[from] prost::DecodeError),
}

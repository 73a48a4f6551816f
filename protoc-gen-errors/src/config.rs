//! Plugin parameters
//!
//! protoc passes everything before the `:` of `--errors_out` as a single
//! comma-separated parameter string:
//!
//! ```text
//! protoc --errors_out=runtime=crate::errors,duplicates=reject:./gen proto/*.proto
//! ```
//!
//! | key             | values              | default        |
//! |-----------------|---------------------|----------------|
//! | `runtime`       | Rust path           | `proto_errors` |
//! | `duplicates`    | `first`, `reject`   | `first`        |
//! | `decode_errors` | `abort`, `skip`     | `abort`        |
//! | `suffix`        | output file suffix  | `_errors.rs`   |

use crate::error::GeneratorError;

/// What to do when one code is declared more than once in a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Keep the first declaration in traversal order
    #[default]
    FirstWins,
    /// Fail generation
    Reject,
}

/// What to do with an option occurrence that cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeErrorPolicy {
    /// Fail generation
    #[default]
    Abort,
    /// Log a warning and drop the occurrence
    Skip,
}

/// Generator configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Path of the runtime crate as seen from generated code
    pub runtime_path: String,

    /// Handling of a code declared twice in one file
    pub duplicates: DuplicatePolicy,

    /// Handling of an option that fails to decode
    pub decode_errors: DecodeErrorPolicy,

    /// Appended to the proto path (minus `.proto`) to name output files
    pub file_suffix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            runtime_path: "proto_errors".to_string(),
            duplicates: DuplicatePolicy::default(),
            decode_errors: DecodeErrorPolicy::default(),
            file_suffix: "_errors.rs".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Parse the protoc plugin parameter string
    pub fn from_parameter(param: &str) -> Result<Self, GeneratorError> {
        let mut config = Self::default();

        for part in param.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part
                .split_once('=')
                .map(|(k, v)| (k.trim(), v.trim()))
                .ok_or_else(|| GeneratorError::Config(format!("expected key=value, got {part:?}")))?;

            match key {
                "runtime" => {
                    syn::parse_str::<syn::Path>(value).map_err(|e| {
                        GeneratorError::Config(format!("runtime={value:?} is not a Rust path: {e}"))
                    })?;
                    config.runtime_path = value.to_string();
                }
                "duplicates" => {
                    config.duplicates = match value {
                        "first" => DuplicatePolicy::FirstWins,
                        "reject" => DuplicatePolicy::Reject,
                        other => {
                            return Err(GeneratorError::Config(format!(
                                "duplicates must be first or reject, got {other:?}"
                            )));
                        }
                    }
                }
                "decode_errors" => {
                    config.decode_errors = match value {
                        "abort" => DecodeErrorPolicy::Abort,
                        "skip" => DecodeErrorPolicy::Skip,
                        other => {
                            return Err(GeneratorError::Config(format!(
                                "decode_errors must be abort or skip, got {other:?}"
                            )));
                        }
                    }
                }
                "suffix" => {
                    if value.is_empty() || value.contains('/') {
                        return Err(GeneratorError::Config(format!(
                            "suffix must be a non-empty file name suffix, got {value:?}"
                        )));
                    }
                    config.file_suffix = value.to_string();
                }
                other => {
                    return Err(GeneratorError::Config(format!("unknown parameter {other:?}")));
                }
            }
        }

        Ok(config)
    }
}

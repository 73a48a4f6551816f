//! protoc-gen-errors
//!
//! A protoc plugin that turns error options declared on proto files and
//! methods into typed constructors backed by the `proto-errors` runtime.
//!
//! Usage:
//!   protoc --errors_out=./gen proto/*.proto
//!   protoc --errors_out=runtime=crate::errors,duplicates=reject:./gen proto/*.proto

#![deny(missing_docs)]

pub mod config;
pub mod descriptor;
pub mod emit;
mod error;
pub mod extract;
pub mod logging;
pub mod mangle;
pub mod option;
pub mod wire;

pub use config::{DecodeErrorPolicy, DuplicatePolicy, GeneratorConfig};
pub use error::GeneratorError;
pub use extract::{AttachmentPoint, FileErrors, extract_file};

use descriptor::ProtoFile;
use prost::Message;
use prost_types::compiler::code_generator_response::{Feature, File};
use prost_types::compiler::{CodeGeneratorRequest, CodeGeneratorResponse};

/// Generate code from raw CodeGeneratorRequest bytes
///
/// Any failure is reported through `CodeGeneratorResponse.error` so protoc
/// prints it and writes nothing.
pub fn generate_from_bytes(input: &[u8]) -> CodeGeneratorResponse {
    match try_generate(input) {
        Ok(file) => CodeGeneratorResponse {
            file,
            supported_features: Some(Feature::Proto3Optional as u64),
            ..Default::default()
        },
        Err(e) => {
            tracing::error!(error = %e, "generation failed");
            error_response(&e)
        }
    }
}

/// Response carrying only an error message
pub fn error_response(error: &GeneratorError) -> CodeGeneratorResponse {
    CodeGeneratorResponse {
        error: Some(error.to_string()),
        supported_features: Some(Feature::Proto3Optional as u64),
        ..Default::default()
    }
}

fn try_generate(input: &[u8]) -> Result<Vec<File>, GeneratorError> {
    // prost handles the plain fields; extensions need the raw walk below
    let request = CodeGeneratorRequest::decode(input)?;
    let config = GeneratorConfig::from_parameter(request.parameter())?;
    tracing::debug!(?config, files = request.file_to_generate.len(), "generating");

    let protos = descriptor::request_files(input).map_err(|source| GeneratorError::Decode {
        location: "CodeGeneratorRequest".to_string(),
        source,
    })?;

    generate_files(&request.file_to_generate, &protos, &config)
}

/// Generate one Rust file per requested proto file that declares errors
///
/// `protos` may hold more files than requested (imports); only the ones
/// named in `files_to_generate` are emitted, in that order.
pub fn generate_files(
    files_to_generate: &[String],
    protos: &[ProtoFile<'_>],
    config: &GeneratorConfig,
) -> Result<Vec<File>, GeneratorError> {
    let mut files = Vec::new();

    for name in files_to_generate {
        let Some(proto) = protos.iter().find(|p| &p.name == name) else {
            return Err(GeneratorError::CodeGenError(format!(
                "requested file {name:?} is not in the request"
            )));
        };

        let errors = extract_file(proto, config)?;
        match emit::generate(&errors, config)? {
            Some(file) => {
                tracing::debug!(file = %name, errors = errors.errors.len(), "generated");
                files.push(file);
            }
            None => tracing::debug!(file = %name, "no error options, skipping"),
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::fixtures;
    use crate::option::{FILE_ERRORS_EXTENSION, METHOD_ERRORS_EXTENSION, fixtures::error_def};

    fn order_proto() -> Vec<u8> {
        let file_options = fixtures::options(
            FILE_ERRORS_EXTENSION,
            &[error_def("ERROR_OUT_OF_STOCK", "Product {{product_id}} is out of stock", 9, false)],
        );
        let method_options = fixtures::options(
            METHOD_ERRORS_EXTENSION,
            &[
                error_def("ERROR_OUT_OF_STOCK", "shadowed", 5, true),
                error_def("ERROR_PAYMENT_TIMEOUT", "Payment timed out", 4, true),
            ],
        );
        let service = fixtures::service(
            "OrderService",
            &[fixtures::method("CreateOrder", Some(method_options.as_slice()))],
        );
        fixtures::file("shop/v1/order.proto", "shop.v1", Some(file_options.as_slice()), &[service])
    }

    #[test]
    fn test_generate_from_bytes() {
        let plain = fixtures::file("shop/v1/types.proto", "shop.v1", None, &[]);
        let request = fixtures::request(
            &["shop/v1/types.proto", "shop/v1/order.proto"],
            "",
            &[plain, order_proto()],
        );

        let response = generate_from_bytes(&request);
        assert_eq!(response.error, None);
        assert_eq!(response.supported_features, Some(1));
        assert_eq!(response.file.len(), 1);

        let file = &response.file[0];
        assert_eq!(file.name.as_deref(), Some("shop/v1/order_errors.rs"));
        let content = file.content.as_deref().unwrap();
        assert_eq!(content.matches("pub const OUT_OF_STOCK:").count(), 1);
        assert_eq!(content.matches("pub struct OutOfStockParams").count(), 1);
        assert_eq!(content.matches("pub fn out_of_stock(").count(), 1);
        assert_eq!(content.matches("pub fn is_out_of_stock(").count(), 1);
        assert!(!content.contains("shadowed"));
        assert!(content.contains("pub const PAYMENT_TIMEOUT:"));
    }

    #[test]
    fn test_imports_not_generated() {
        let request = fixtures::request(&[], "", &[order_proto()]);
        let response = generate_from_bytes(&request);
        assert_eq!(response.error, None);
        assert!(response.file.is_empty());
    }

    #[test]
    fn test_parameter_errors_reported() {
        let request = fixtures::request(&["shop/v1/order.proto"], "backend=seaorm", &[order_proto()]);
        let response = generate_from_bytes(&request);
        assert!(response.file.is_empty());
        let error = response.error.unwrap();
        assert!(error.contains("backend"), "{error}");
    }

    #[test]
    fn test_duplicate_reject_aborts_everything() {
        let other_options = fixtures::options(
            FILE_ERRORS_EXTENSION,
            &[error_def("ERROR_OTHER", "other", 13, false)],
        );
        let other = fixtures::file("shop/v1/other.proto", "shop.v1", Some(other_options.as_slice()), &[]);
        let request = fixtures::request(
            &["shop/v1/other.proto", "shop/v1/order.proto"],
            "duplicates=reject",
            &[other, order_proto()],
        );

        let response = generate_from_bytes(&request);
        assert!(response.file.is_empty());
        assert!(response.error.unwrap().contains("ERROR_OUT_OF_STOCK"));
    }

    #[test]
    fn test_malformed_request() {
        let response = generate_from_bytes(&[0x0a, 0x05, b'a']);
        assert!(response.error.is_some());
        assert!(response.file.is_empty());
    }

    #[test]
    fn test_missing_requested_file() {
        let request = fixtures::request(&["missing.proto"], "", &[order_proto()]);
        let response = generate_from_bytes(&request);
        assert!(response.error.unwrap().contains("missing.proto"));
    }
}

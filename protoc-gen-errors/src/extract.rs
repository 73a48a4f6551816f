//! Error definitions declared in one proto file
//!
//! Options are harvested file-level first, then method by method in
//! declaration order, and merged by code.

use crate::config::{DecodeErrorPolicy, DuplicatePolicy, GeneratorConfig};
use crate::descriptor::ProtoFile;
use crate::error::GeneratorError;
use crate::option::{
    ErrorOption, FILE_ERRORS_EXTENSION, METHOD_ERRORS_EXTENSION, decode_error_option,
    extension_payloads,
};
use crate::wire::DecodeError;
use proto_errors::ErrorDefinition;
use std::collections::HashMap;
use std::fmt;

/// Where an error option was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentPoint {
    /// `FileOptions` of `file`
    File {
        /// Proto path
        file: String,
    },
    /// `MethodOptions` of one RPC
    Method {
        /// Proto path
        file: String,
        /// Fully qualified service name
        service: String,
        /// Method name
        method: String,
    },
}

impl fmt::Display for AttachmentPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttachmentPoint::File { file } => write!(f, "{file} (file options)"),
            AttachmentPoint::Method {
                file,
                service,
                method,
            } => write!(f, "{file} ({service}.{method})"),
        }
    }
}

/// One decoded option, before merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawOptionOccurrence {
    /// Decoded payload
    pub option: ErrorOption,
    /// Declaration site
    pub origin: AttachmentPoint,
}

/// A definition that survived merging, with where it was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedError {
    /// Merged definition
    pub definition: ErrorDefinition,
    /// Site of the first declaration
    pub origin: AttachmentPoint,
}

/// Merged error definitions of one proto file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileErrors {
    /// Proto path, e.g. `user/v1/user.proto`
    pub file: String,
    /// Proto package
    pub package: String,
    /// In first-declaration order
    pub errors: Vec<ExtractedError>,
}

impl FileErrors {
    /// Definitions in first-declaration order
    pub fn definitions(&self) -> impl Iterator<Item = &ErrorDefinition> {
        self.errors.iter().map(|e| &e.definition)
    }

    /// Whether the file declares no errors
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Extract and merge the error definitions of `file`
pub fn extract_file(
    file: &ProtoFile<'_>,
    config: &GeneratorConfig,
) -> Result<FileErrors, GeneratorError> {
    let occurrences = occurrences(file, config.decode_errors)?;
    tracing::debug!(
        file = %file.name,
        occurrences = occurrences.len(),
        "collected error options"
    );

    let errors = dedup(occurrences, config.duplicates)?;
    Ok(FileErrors {
        file: file.name.clone(),
        package: file.package.clone(),
        errors,
    })
}

/// Every error option of `file`, file-level first, then per method
pub fn occurrences(
    file: &ProtoFile<'_>,
    policy: DecodeErrorPolicy,
) -> Result<Vec<RawOptionOccurrence>, GeneratorError> {
    let mut out = Vec::new();

    let origin = AttachmentPoint::File {
        file: file.name.clone(),
    };
    collect(&file.options, FILE_ERRORS_EXTENSION, &origin, policy, &mut out)?;

    for service in &file.services {
        let service_name = service.full_name(&file.package);
        for method in &service.methods {
            let origin = AttachmentPoint::Method {
                file: file.name.clone(),
                service: service_name.clone(),
                method: method.name.clone(),
            };
            collect(&method.options, METHOD_ERRORS_EXTENSION, &origin, policy, &mut out)?;
        }
    }

    Ok(out)
}

fn collect(
    options: &[&[u8]],
    extension: u32,
    origin: &AttachmentPoint,
    policy: DecodeErrorPolicy,
    out: &mut Vec<RawOptionOccurrence>,
) -> Result<(), GeneratorError> {
    for options in options {
        let payloads = match extension_payloads(options, extension) {
            Ok(payloads) => payloads,
            Err(source) => {
                decode_failure(policy, origin, source)?;
                continue;
            }
        };

        for payload in payloads {
            match decode_error_option(payload) {
                Ok(option) if option.code.is_empty() => match policy {
                    DecodeErrorPolicy::Abort => {
                        return Err(GeneratorError::MissingCode {
                            location: origin.to_string(),
                        });
                    }
                    DecodeErrorPolicy::Skip => {
                        tracing::warn!(location = %origin, "skipping error option without a code");
                    }
                },
                Ok(option) => out.push(RawOptionOccurrence {
                    option,
                    origin: origin.clone(),
                }),
                Err(source) => decode_failure(policy, origin, source)?,
            }
        }
    }
    Ok(())
}

fn decode_failure(
    policy: DecodeErrorPolicy,
    origin: &AttachmentPoint,
    source: DecodeError,
) -> Result<(), GeneratorError> {
    match policy {
        DecodeErrorPolicy::Abort => Err(GeneratorError::Decode {
            location: origin.to_string(),
            source,
        }),
        DecodeErrorPolicy::Skip => {
            tracing::warn!(location = %origin, error = %source, "skipping undecodable error option");
            Ok(())
        }
    }
}

/// Merge occurrences by code, keeping the first declaration
pub fn dedup(
    occurrences: Vec<RawOptionOccurrence>,
    policy: DuplicatePolicy,
) -> Result<Vec<ExtractedError>, GeneratorError> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut errors: Vec<ExtractedError> = Vec::new();

    for RawOptionOccurrence { option, origin } in occurrences {
        if let Some(&index) = seen.get(&option.code) {
            let first = &errors[index].origin;
            match policy {
                DuplicatePolicy::FirstWins => {
                    tracing::debug!(
                        code = %option.code,
                        kept = %first,
                        dropped = %origin,
                        "dropping duplicate error code"
                    );
                    continue;
                }
                DuplicatePolicy::Reject => {
                    return Err(GeneratorError::DuplicateCode {
                        code: option.code,
                        location: origin.to_string(),
                        first: first.to_string(),
                    });
                }
            }
        }

        seen.insert(option.code.clone(), errors.len());
        errors.push(ExtractedError {
            definition: ErrorDefinition::new(
                option.code,
                option.message,
                option.status,
                option.retryable,
            ),
            origin,
        });
    }

    Ok(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ProtoMethod, ProtoService};
    use crate::option::fixtures::error_def;
    use crate::wire::encode;
    use proto_errors::StatusClass;

    fn file_options(defs: &[Vec<u8>]) -> Vec<u8> {
        crate::descriptor::fixtures::options(FILE_ERRORS_EXTENSION, defs)
    }

    fn method_options(defs: &[Vec<u8>]) -> Vec<u8> {
        crate::descriptor::fixtures::options(METHOD_ERRORS_EXTENSION, defs)
    }

    fn proto_file<'a>(options: Vec<&'a [u8]>, methods: Vec<(&str, Vec<&'a [u8]>)>) -> ProtoFile<'a> {
        ProtoFile {
            name: "shop/v1/order.proto".to_string(),
            package: "shop.v1".to_string(),
            options,
            services: vec![ProtoService {
                name: "OrderService".to_string(),
                methods: methods
                    .into_iter()
                    .map(|(name, options)| ProtoMethod {
                        name: name.to_string(),
                        options,
                    })
                    .collect(),
            }],
        }
    }

    #[test]
    fn test_file_then_method_order() {
        let file_opts = file_options(&[error_def("ERROR_OUT_OF_STOCK", "{{product_id}} out of stock", 9, false)]);
        let create_opts = method_options(&[
            error_def("ERROR_CARD_DECLINED", "Card {{last4}} declined", 9, false),
            error_def("ERROR_PAYMENT_TIMEOUT", "Payment timed out", 4, true),
        ]);
        let file = proto_file(
            vec![file_opts.as_slice()],
            vec![("ListOrders", vec![]), ("CreateOrder", vec![create_opts.as_slice()])],
        );

        let errors = extract_file(&file, &GeneratorConfig::default()).unwrap();
        let codes: Vec<_> = errors.definitions().map(|d| d.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["ERROR_OUT_OF_STOCK", "ERROR_CARD_DECLINED", "ERROR_PAYMENT_TIMEOUT"]
        );

        let timeout = &errors.errors[2];
        assert_eq!(timeout.definition.status, StatusClass::DeadlineExceeded);
        assert!(timeout.definition.retryable);
        assert_eq!(
            timeout.origin,
            AttachmentPoint::Method {
                file: "shop/v1/order.proto".to_string(),
                service: "shop.v1.OrderService".to_string(),
                method: "CreateOrder".to_string(),
            }
        );
        assert_eq!(timeout.origin.to_string(), "shop/v1/order.proto (shop.v1.OrderService.CreateOrder)");
    }

    #[test]
    fn test_duplicate_first_wins() {
        let file_opts = file_options(&[error_def("ERROR_DUP", "from file", 5, false)]);
        let method_opts = method_options(&[
            error_def("ERROR_DUP", "from method", 13, true),
            error_def("ERROR_OTHER", "other", 13, false),
        ]);
        let file = proto_file(vec![file_opts.as_slice()], vec![("Get", vec![method_opts.as_slice()])]);

        let errors = extract_file(&file, &GeneratorConfig::default()).unwrap();
        assert_eq!(errors.errors.len(), 2);
        let dup = &errors.errors[0].definition;
        assert_eq!(dup.code, "ERROR_DUP");
        assert_eq!(dup.message_template, "from file");
        assert_eq!(dup.status, StatusClass::NotFound);
        assert!(!dup.retryable);
    }

    #[test]
    fn test_duplicate_rejected() {
        let method_opts = method_options(&[error_def("ERROR_DUP", "a", 5, false)]);
        let file = proto_file(
            vec![],
            vec![("Get", vec![method_opts.as_slice()]), ("Put", vec![method_opts.as_slice()])],
        );
        let config = GeneratorConfig {
            duplicates: DuplicatePolicy::Reject,
            ..GeneratorConfig::default()
        };

        match extract_file(&file, &config) {
            Err(GeneratorError::DuplicateCode {
                code,
                location,
                first,
            }) => {
                assert_eq!(code, "ERROR_DUP");
                assert!(location.contains("OrderService.Put"), "{location}");
                assert!(first.contains("OrderService.Get"), "{first}");
            }
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_code() {
        let opts = file_options(&[error_def("", "no code", 5, false)]);
        let file = proto_file(vec![opts.as_slice()], vec![]);

        match extract_file(&file, &GeneratorConfig::default()) {
            Err(GeneratorError::MissingCode { location }) => {
                assert_eq!(location, "shop/v1/order.proto (file options)");
            }
            other => panic!("expected missing code, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_failure_aborts() {
        // ErrorDef with a string field that declares more bytes than it has
        let broken = vec![0x0a, 0x10, b'E'];
        let opts = method_options(&[broken]);
        let file = proto_file(vec![], vec![("Get", vec![opts.as_slice()])]);

        let err = extract_file(&file, &GeneratorConfig::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::Decode { .. }));
        assert!(err.to_string().contains("OrderService.Get"), "{err}");
    }

    #[test]
    fn test_decode_failure_skipped() {
        let broken_options = encode::message(|out| {
            encode::tag(3, 3, out);
        });
        let good = method_options(&[
            vec![0xff],
            error_def("", "no code", 5, false),
            error_def("ERROR_GOOD", "ok", 5, false),
        ]);
        let file = proto_file(vec![broken_options.as_slice()], vec![("Get", vec![good.as_slice()])]);
        let config = GeneratorConfig {
            decode_errors: DecodeErrorPolicy::Skip,
            ..GeneratorConfig::default()
        };

        let errors = extract_file(&file, &config).unwrap();
        let codes: Vec<_> = errors.definitions().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["ERROR_GOOD"]);
    }

    #[test]
    fn test_group_fields_before_extension() {
        let opts = encode::message(|out| {
            encode::tag(60000, 3, out);
            encode::varint_field(1, 7, out);
            encode::tag(60000, 4, out);
            encode::bytes_field(
                FILE_ERRORS_EXTENSION,
                &error_def("ERROR_GOOD", "ok", 5, false),
                out,
            );
        });
        let file = proto_file(vec![opts.as_slice()], vec![]);

        let errors = extract_file(&file, &GeneratorConfig::default()).unwrap();
        let codes: Vec<_> = errors.definitions().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["ERROR_GOOD"]);
    }

    #[test]
    fn test_no_options() {
        let file = proto_file(vec![], vec![("Get", vec![])]);
        let errors = extract_file(&file, &GeneratorConfig::default()).unwrap();
        assert!(errors.is_empty());
        assert_eq!(errors.package, "shop.v1");
    }
}

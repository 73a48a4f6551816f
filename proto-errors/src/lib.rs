//! proto-errors
//!
//! Runtime support for errors declared as protobuf options and generated by
//! `protoc-gen-errors`.
//!
//! ```
//! use proto_errors::{ErrorDefinition, ErrorKit, ErrorCode, StatusClass};
//!
//! const CARD_DECLINED: ErrorCode = ErrorCode::new("ERROR_CARD_DECLINED");
//!
//! let kit = ErrorKit::new();
//! kit.registry().register(ErrorDefinition::new(
//!     CARD_DECLINED.as_str(),
//!     "Card ending in {{last4}} was declined",
//!     StatusClass::FailedPrecondition,
//!     false,
//! ));
//!
//! let status = kit.new_error(&CARD_DECLINED, &[("last4", "4242")]);
//! assert_eq!(status.message(), "Card ending in 4242 was declined");
//! assert!(kit.is(&status, &CARD_DECLINED));
//! ```

#![deny(missing_docs)]

pub mod builtin;
mod code;
mod error;
mod kit;
mod registry;
mod status;
pub mod template;

pub use code::{CodedError, ErrorCode, HasCode};
pub use error::Error;
pub use kit::{
    DEFAULT_ERROR_CODE_HEADER, DEFAULT_RETRYABLE_HEADER, ErrorKit, HeaderKeys, coded_source,
};
pub use registry::{ErrorDefinition, Registry};
pub use status::StatusClass;
pub use template::{MissingFieldsError, NoValues, TemplateCache, TemplateValues};

/// Re-exported for generated code, which names `tonic::Status` through it
pub use tonic;

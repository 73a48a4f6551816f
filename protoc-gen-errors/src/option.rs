//! The `errors.v1.ErrorDef` option message
//!
//! ```protobuf
//! message ErrorDef {
//!   string code = 1;
//!   string message = 2;
//!   int32 status_code = 3;
//!   bool retryable = 4;
//! }
//!
//! extend google.protobuf.FileOptions   { repeated ErrorDef file_errors   = 50700; }
//! extend google.protobuf.MethodOptions { repeated ErrorDef method_errors = 50701; }
//! ```
//!
//! `status_code` may also be written as a string holding a status name
//! (`"not_found"`). A status of 0 (`OK`), an unknown number or an unknown
//! name falls back to `Internal`.

use crate::wire::{DecodeError, WireReader, WireValue};
use proto_errors::StatusClass;

/// `errors.v1.file_errors` on `google.protobuf.FileOptions`
pub const FILE_ERRORS_EXTENSION: u32 = 50700;

/// `errors.v1.method_errors` on `google.protobuf.MethodOptions`
pub const METHOD_ERRORS_EXTENSION: u32 = 50701;

const CODE_FIELD: u32 = 1;
const MESSAGE_FIELD: u32 = 2;
const STATUS_CODE_FIELD: u32 = 3;
const RETRYABLE_FIELD: u32 = 4;

/// One decoded `ErrorDef`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorOption {
    /// Error code; empty when the field was absent
    pub code: String,

    /// Message template
    pub message: String,

    /// Status class after fallback
    pub status: StatusClass,

    /// Retry flag
    pub retryable: bool,
}

/// Decode the payload of one `ErrorDef`
///
/// Unknown fields are skipped. A scalar field seen twice keeps the last
/// value, as protobuf parsers do.
pub fn decode_error_option(bytes: &[u8]) -> Result<ErrorOption, DecodeError> {
    let mut code = String::new();
    let mut message = String::new();
    let mut status_code = 0;
    let mut status_name: Option<String> = None;
    let mut retryable = false;

    for field in WireReader::new(bytes) {
        let field = field?;
        match (field.number, field.value) {
            (CODE_FIELD, WireValue::LengthDelimited(_)) => {
                code = field.as_str()?.unwrap_or_default().to_string();
            }
            (MESSAGE_FIELD, WireValue::LengthDelimited(_)) => {
                message = field.as_str()?.unwrap_or_default().to_string();
            }
            (STATUS_CODE_FIELD, WireValue::Varint(_)) => {
                status_code = field.value.as_i32().unwrap_or_default();
                status_name = None;
            }
            (STATUS_CODE_FIELD, WireValue::LengthDelimited(_)) => {
                status_name = field.as_str()?.map(str::to_string);
            }
            (RETRYABLE_FIELD, WireValue::Varint(_)) => {
                retryable = field.value.as_bool().unwrap_or_default();
            }
            _ => {}
        }
    }

    let status = match status_name {
        Some(name) => status_from_name(&code, &name),
        None => status_from_number(&code, status_code),
    };

    Ok(ErrorOption {
        code,
        message,
        status,
        retryable,
    })
}

fn status_from_number(code: &str, value: i32) -> StatusClass {
    match StatusClass::from_i32(value) {
        Some(StatusClass::Ok) | None => {
            tracing::warn!(code, status_code = value, "status code is not an error status, using internal");
            StatusClass::Internal
        }
        Some(status) => status,
    }
}

fn status_from_name(code: &str, name: &str) -> StatusClass {
    match StatusClass::from_name(name) {
        Some(StatusClass::Ok) | None => {
            tracing::warn!(code, status = name, "unknown status name, using internal");
            StatusClass::Internal
        }
        Some(status) => status,
    }
}

/// Payloads of every occurrence of `extension` in an options message
///
/// `options` is an encoded `FileOptions` or `MethodOptions`; the repeated
/// extension shows up as one length-delimited field per element.
pub fn extension_payloads(options: &[u8], extension: u32) -> Result<Vec<&[u8]>, DecodeError> {
    let mut payloads = Vec::new();
    for field in WireReader::new(options) {
        let field = field?;
        if field.number == extension {
            if let Some(payload) = field.value.as_bytes() {
                payloads.push(payload);
            }
        }
    }
    Ok(payloads)
}

//! General-purpose error codes registered by [`Registry::new`]
//!
//! [`Registry::new`]: crate::Registry::new

use crate::code::ErrorCode;
use crate::registry::ErrorDefinition;
use crate::status::StatusClass;

/// `ERROR_NOT_FOUND`
pub const NOT_FOUND: ErrorCode = ErrorCode::new("ERROR_NOT_FOUND");
/// `ERROR_INVALID_ARGUMENT`
pub const INVALID_ARGUMENT: ErrorCode = ErrorCode::new("ERROR_INVALID_ARGUMENT");
/// `ERROR_ALREADY_EXISTS`
pub const ALREADY_EXISTS: ErrorCode = ErrorCode::new("ERROR_ALREADY_EXISTS");
/// `ERROR_PERMISSION_DENIED`
pub const PERMISSION_DENIED: ErrorCode = ErrorCode::new("ERROR_PERMISSION_DENIED");
/// `ERROR_UNAUTHENTICATED`
pub const UNAUTHENTICATED: ErrorCode = ErrorCode::new("ERROR_UNAUTHENTICATED");
/// `ERROR_INTERNAL`
pub const INTERNAL: ErrorCode = ErrorCode::new("ERROR_INTERNAL");
/// `ERROR_UNAVAILABLE`
pub const UNAVAILABLE: ErrorCode = ErrorCode::new("ERROR_UNAVAILABLE");
/// `ERROR_DEADLINE_EXCEEDED`
pub const DEADLINE_EXCEEDED: ErrorCode = ErrorCode::new("ERROR_DEADLINE_EXCEEDED");
/// `ERROR_RESOURCE_EXHAUSTED`
pub const RESOURCE_EXHAUSTED: ErrorCode = ErrorCode::new("ERROR_RESOURCE_EXHAUSTED");
/// `ERROR_FAILED_PRECONDITION`
pub const FAILED_PRECONDITION: ErrorCode = ErrorCode::new("ERROR_FAILED_PRECONDITION");
/// `ERROR_ABORTED`
pub const ABORTED: ErrorCode = ErrorCode::new("ERROR_ABORTED");
/// `ERROR_UNIMPLEMENTED`
pub const UNIMPLEMENTED: ErrorCode = ErrorCode::new("ERROR_UNIMPLEMENTED");
/// `ERROR_CANCELED`
pub const CANCELED: ErrorCode = ErrorCode::new("ERROR_CANCELED");
/// `ERROR_DATA_LOSS`
pub const DATA_LOSS: ErrorCode = ErrorCode::new("ERROR_DATA_LOSS");

/// (code, template, status, retryable)
const TABLE: [(ErrorCode, &str, StatusClass, bool); 14] = [
    (NOT_FOUND, "Resource '{{id}}' not found", StatusClass::NotFound, false),
    (
        INVALID_ARGUMENT,
        "Invalid argument: {{reason}}",
        StatusClass::InvalidArgument,
        false,
    ),
    (
        ALREADY_EXISTS,
        "Resource '{{id}}' already exists",
        StatusClass::AlreadyExists,
        false,
    ),
    (
        PERMISSION_DENIED,
        "Permission denied: {{reason}}",
        StatusClass::PermissionDenied,
        false,
    ),
    (
        UNAUTHENTICATED,
        "Authentication required",
        StatusClass::Unauthenticated,
        false,
    ),
    (INTERNAL, "Internal server error", StatusClass::Internal, false),
    (
        UNAVAILABLE,
        "Service unavailable, please retry",
        StatusClass::Unavailable,
        true,
    ),
    (
        DEADLINE_EXCEEDED,
        "Request timed out",
        StatusClass::DeadlineExceeded,
        true,
    ),
    (
        RESOURCE_EXHAUSTED,
        "Rate limit exceeded: {{reason}}",
        StatusClass::ResourceExhausted,
        true,
    ),
    (
        FAILED_PRECONDITION,
        "Precondition failed: {{reason}}",
        StatusClass::FailedPrecondition,
        false,
    ),
    (ABORTED, "Operation aborted: {{reason}}", StatusClass::Aborted, true),
    (
        UNIMPLEMENTED,
        "Method '{{method}}' is not implemented",
        StatusClass::Unimplemented,
        false,
    ),
    (CANCELED, "Request canceled", StatusClass::Canceled, false),
    (DATA_LOSS, "Unrecoverable data loss", StatusClass::DataLoss, false),
];

/// Definitions of every built-in code
pub fn definitions() -> Vec<ErrorDefinition> {
    TABLE
        .iter()
        .map(|(code, template, status, retryable)| {
            ErrorDefinition::new(code.as_str(), *template, *status, *retryable)
        })
        .collect()
}

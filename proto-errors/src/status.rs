//! Transport status classification

use std::fmt;

/// gRPC status code attached to an error definition
///
/// The discriminants are the wire values used by gRPC and by the
/// `status_code` field of the error option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(i32)]
pub enum StatusClass {
    /// Not an error; returned on success
    Ok = 0,
    /// The operation was cancelled
    Canceled = 1,
    /// Unknown error
    Unknown = 2,
    /// Client specified an invalid argument
    InvalidArgument = 3,
    /// Deadline expired before the operation could complete
    DeadlineExceeded = 4,
    /// Some requested entity was not found
    NotFound = 5,
    /// Some entity that we attempted to create already exists
    AlreadyExists = 6,
    /// The caller does not have permission to execute the operation
    PermissionDenied = 7,
    /// Some resource has been exhausted
    ResourceExhausted = 8,
    /// The system is not in a state required for the operation
    FailedPrecondition = 9,
    /// The operation was aborted
    Aborted = 10,
    /// The operation was attempted past the valid range
    OutOfRange = 11,
    /// The operation is not implemented or supported
    Unimplemented = 12,
    /// Internal error
    Internal = 13,
    /// The service is currently unavailable
    Unavailable = 14,
    /// Unrecoverable data loss or corruption
    DataLoss = 15,
    /// The request lacks valid authentication credentials
    Unauthenticated = 16,
}

impl StatusClass {
    /// Every status class, in wire order
    pub const ALL: [StatusClass; 17] = [
        StatusClass::Ok,
        StatusClass::Canceled,
        StatusClass::Unknown,
        StatusClass::InvalidArgument,
        StatusClass::DeadlineExceeded,
        StatusClass::NotFound,
        StatusClass::AlreadyExists,
        StatusClass::PermissionDenied,
        StatusClass::ResourceExhausted,
        StatusClass::FailedPrecondition,
        StatusClass::Aborted,
        StatusClass::OutOfRange,
        StatusClass::Unimplemented,
        StatusClass::Internal,
        StatusClass::Unavailable,
        StatusClass::DataLoss,
        StatusClass::Unauthenticated,
    ];

    /// Status class for a numeric wire value, if it names one
    pub fn from_i32(value: i32) -> Option<Self> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Status class for a lowercase snake-case name such as `"not_found"`
    ///
    /// `"cancelled"` is accepted as an alias of `"canceled"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if name == "cancelled" {
            return Some(StatusClass::Canceled);
        }
        Self::ALL.into_iter().find(|class| class.name() == name)
    }

    /// Numeric wire value, or `Internal` when the value is not a known code
    pub fn from_i32_or_internal(value: i32) -> Self {
        Self::from_i32(value).unwrap_or(StatusClass::Internal)
    }

    /// Lowercase snake-case name
    pub fn name(self) -> &'static str {
        match self {
            StatusClass::Ok => "ok",
            StatusClass::Canceled => "canceled",
            StatusClass::Unknown => "unknown",
            StatusClass::InvalidArgument => "invalid_argument",
            StatusClass::DeadlineExceeded => "deadline_exceeded",
            StatusClass::NotFound => "not_found",
            StatusClass::AlreadyExists => "already_exists",
            StatusClass::PermissionDenied => "permission_denied",
            StatusClass::ResourceExhausted => "resource_exhausted",
            StatusClass::FailedPrecondition => "failed_precondition",
            StatusClass::Aborted => "aborted",
            StatusClass::OutOfRange => "out_of_range",
            StatusClass::Unimplemented => "unimplemented",
            StatusClass::Internal => "internal",
            StatusClass::Unavailable => "unavailable",
            StatusClass::DataLoss => "data_loss",
            StatusClass::Unauthenticated => "unauthenticated",
        }
    }

    /// Variant name, as written in generated code (`StatusClass::NotFound`)
    pub fn variant_name(self) -> &'static str {
        match self {
            StatusClass::Ok => "Ok",
            StatusClass::Canceled => "Canceled",
            StatusClass::Unknown => "Unknown",
            StatusClass::InvalidArgument => "InvalidArgument",
            StatusClass::DeadlineExceeded => "DeadlineExceeded",
            StatusClass::NotFound => "NotFound",
            StatusClass::AlreadyExists => "AlreadyExists",
            StatusClass::PermissionDenied => "PermissionDenied",
            StatusClass::ResourceExhausted => "ResourceExhausted",
            StatusClass::FailedPrecondition => "FailedPrecondition",
            StatusClass::Aborted => "Aborted",
            StatusClass::OutOfRange => "OutOfRange",
            StatusClass::Unimplemented => "Unimplemented",
            StatusClass::Internal => "Internal",
            StatusClass::Unavailable => "Unavailable",
            StatusClass::DataLoss => "DataLoss",
            StatusClass::Unauthenticated => "Unauthenticated",
        }
    }
}

impl fmt::Display for StatusClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<StatusClass> for tonic::Code {
    fn from(class: StatusClass) -> Self {
        tonic::Code::from_i32(class as i32)
    }
}

impl From<tonic::Code> for StatusClass {
    fn from(code: tonic::Code) -> Self {
        StatusClass::from_i32_or_internal(code as i32)
    }
}

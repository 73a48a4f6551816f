//! Minimal descriptor walk
//!
//! `prost_types::FileDescriptorProto` throws away unknown fields, and the
//! error options are extensions, so descriptors are walked here straight
//! from the encoded request. Only the path down to file and method options
//! is read:
//!
//! ```text
//! CodeGeneratorRequest.proto_file (15) | FileDescriptorSet.file (1)
//!   FileDescriptorProto: name (1), package (2), service (6), options (8)
//!     ServiceDescriptorProto: name (1), method (2)
//!       MethodDescriptorProto: name (1), options (4)
//! ```

use crate::wire::{DecodeError, Field, WireReader};

const REQUEST_PROTO_FILE: u32 = 15;
const SET_FILE: u32 = 1;

const FILE_NAME: u32 = 1;
const FILE_PACKAGE: u32 = 2;
const FILE_SERVICE: u32 = 6;
const FILE_OPTIONS: u32 = 8;

const SERVICE_NAME: u32 = 1;
const SERVICE_METHOD: u32 = 2;

const METHOD_NAME: u32 = 1;
const METHOD_OPTIONS: u32 = 4;

/// A `FileDescriptorProto`, reduced to what error extraction needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoFile<'a> {
    /// Path relative to the import root, e.g. `user/v1/user.proto`
    pub name: String,

    /// Proto package, empty when the file declares none
    pub package: String,

    /// Encoded `FileOptions`, one slice per occurrence on the wire
    pub options: Vec<&'a [u8]>,

    /// Services in declaration order
    pub services: Vec<ProtoService<'a>>,
}

/// A `ServiceDescriptorProto`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoService<'a> {
    /// Unqualified service name
    pub name: String,
    /// Methods in declaration order
    pub methods: Vec<ProtoMethod<'a>>,
}

/// A `MethodDescriptorProto`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtoMethod<'a> {
    /// Method name as declared
    pub name: String,

    /// Encoded `MethodOptions`, one slice per occurrence on the wire
    pub options: Vec<&'a [u8]>,
}

impl ProtoService<'_> {
    /// Fully qualified service name
    pub fn full_name(&self, package: &str) -> String {
        if package.is_empty() {
            self.name.clone()
        } else {
            format!("{package}.{}", self.name)
        }
    }
}

/// Files of an encoded `CodeGeneratorRequest`, in request order
pub fn request_files(request: &[u8]) -> Result<Vec<ProtoFile<'_>>, DecodeError> {
    files(request, REQUEST_PROTO_FILE)
}

/// Files of an encoded `FileDescriptorSet`, in set order
pub fn descriptor_set_files(set: &[u8]) -> Result<Vec<ProtoFile<'_>>, DecodeError> {
    files(set, SET_FILE)
}

fn files(bytes: &[u8], field_number: u32) -> Result<Vec<ProtoFile<'_>>, DecodeError> {
    let mut files = Vec::new();
    for field in WireReader::new(bytes) {
        let field = field?;
        if field.number == field_number {
            if let Some(payload) = field.value.as_bytes() {
                files.push(parse_file(payload)?);
            }
        }
    }
    Ok(files)
}

fn parse_file(bytes: &[u8]) -> Result<ProtoFile<'_>, DecodeError> {
    let mut file = ProtoFile::default();
    for field in WireReader::new(bytes) {
        let field = field?;
        match field.number {
            FILE_NAME => file.name = string(&field)?,
            FILE_PACKAGE => file.package = string(&field)?,
            FILE_SERVICE => {
                if let Some(payload) = field.value.as_bytes() {
                    file.services.push(parse_service(payload)?);
                }
            }
            FILE_OPTIONS => file.options.extend(field.value.as_bytes()),
            _ => {}
        }
    }
    Ok(file)
}

fn parse_service(bytes: &[u8]) -> Result<ProtoService<'_>, DecodeError> {
    let mut service = ProtoService::default();
    for field in WireReader::new(bytes) {
        let field = field?;
        match field.number {
            SERVICE_NAME => service.name = string(&field)?,
            SERVICE_METHOD => {
                if let Some(payload) = field.value.as_bytes() {
                    service.methods.push(parse_method(payload)?);
                }
            }
            _ => {}
        }
    }
    Ok(service)
}

fn parse_method(bytes: &[u8]) -> Result<ProtoMethod<'_>, DecodeError> {
    let mut method = ProtoMethod::default();
    for field in WireReader::new(bytes) {
        let field = field?;
        match field.number {
            METHOD_NAME => method.name = string(&field)?,
            METHOD_OPTIONS => method.options.extend(field.value.as_bytes()),
            _ => {}
        }
    }
    Ok(method)
}

fn string(field: &Field<'_>) -> Result<String, DecodeError> {
    Ok(field.as_str()?.unwrap_or_default().to_string())
}

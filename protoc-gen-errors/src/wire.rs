//! Minimal protobuf wire-format reader
//!
//! Reads the fields of an encoded message one at a time without a schema.
//! Each field is a varint tag `(field_number << 3) | wire_type` followed by
//! its payload. Only what the descriptor walk and the error option need is
//! understood:
//!
//! | wire type | meaning          | handling                  |
//! |-----------|------------------|---------------------------|
//! | 0         | varint           | value returned            |
//! | 1         | fixed 64-bit     | skipped by callers        |
//! | 2         | length-delimited | borrowed slice returned   |
//! | 3, 4      | group            | body returned, skipped    |
//! | 5         | fixed 32-bit     | skipped by callers        |
//!
//! A group runs from its start tag to the end tag with the same field
//! number; nested groups are balanced. The unassigned types 6 and 7, a
//! stray end-group tag and an unterminated group are rejected. The reader
//! never panics on bad input; truncation surfaces as a [`DecodeError`].

/// Maximum encoded length of a 64-bit varint
const MAX_VARINT_LEN: usize = 10;

/// Maximum group nesting, matching protobuf's default recursion limit
const MAX_GROUP_DEPTH: usize = 100;

const WIRE_VARINT: u8 = 0;
const WIRE_FIXED64: u8 = 1;
const WIRE_LENGTH_DELIMITED: u8 = 2;
const WIRE_START_GROUP: u8 = 3;
const WIRE_END_GROUP: u8 = 4;
const WIRE_FIXED32: u8 = 5;

/// Errors produced while reading wire-format bytes
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// Input ended in the middle of a varint, tag or fixed-width value
    #[error("truncated input at byte {offset}")]
    Truncated {
        /// Offset where the incomplete value starts
        offset: usize,
    },

    /// A varint ran past ten bytes
    #[error("varint longer than 10 bytes at byte {offset}")]
    VarintOverflow {
        /// Offset where the varint starts
        offset: usize,
    },

    /// A length prefix points past the end of the input
    #[error("length-delimited field at byte {offset} declares {declared} bytes but only {remaining} remain")]
    LengthOverflow {
        /// Offset of the payload
        offset: usize,
        /// Declared payload length
        declared: u64,
        /// Bytes left in the input
        remaining: usize,
    },

    /// Tag with a wire type this reader does not accept
    #[error("unsupported wire type {wire_type} at byte {offset}")]
    InvalidWireType {
        /// Offset of the tag
        offset: usize,
        /// The wire type bits
        wire_type: u8,
    },

    /// Tag encodes field number zero or a number above the protobuf maximum
    #[error("invalid field number {field_number} at byte {offset}")]
    InvalidFieldNumber {
        /// Offset of the tag
        offset: usize,
        /// The decoded field number
        field_number: u64,
    },

    /// An end-group tag without a matching start, or closing another field
    #[error("unbalanced end-group tag for field {field_number} at byte {offset}")]
    UnbalancedGroup {
        /// Offset of the end-group tag
        offset: usize,
        /// Field number of the end-group tag
        field_number: u32,
    },

    /// A start-group tag never closed before the input ended
    #[error("group for field {field_number} at byte {offset} is not terminated")]
    UnterminatedGroup {
        /// Offset of the start-group tag
        offset: usize,
        /// Field number of the group
        field_number: u32,
    },

    /// Groups nested deeper than the reader follows
    #[error("groups nested too deeply at byte {offset}")]
    GroupTooDeep {
        /// Offset of the innermost start-group tag
        offset: usize,
    },

    /// A string field is not valid UTF-8
    #[error("field {field_number} is not valid UTF-8")]
    InvalidUtf8 {
        /// The offending field
        field_number: u32,
    },
}

/// The payload of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireValue<'a> {
    /// Wire type 0
    Varint(u64),
    /// Wire type 1
    Fixed64(u64),
    /// Wire type 2
    LengthDelimited(&'a [u8]),
    /// Wire types 3 and 4; the encoded fields between the two tags
    Group(&'a [u8]),
    /// Wire type 5
    Fixed32(u32),
}

impl<'a> WireValue<'a> {
    /// Varint payload read as a bool
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            WireValue::Varint(v) => Some(*v != 0),
            _ => None,
        }
    }

    /// Varint payload truncated to `i32`, as protobuf does for `int32`/enums
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            WireValue::Varint(v) => Some(*v as i32),
            _ => None,
        }
    }

    /// Length-delimited payload
    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            WireValue::LengthDelimited(bytes) => Some(*bytes),
            _ => None,
        }
    }
}

/// A decoded field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field<'a> {
    /// Field number from the tag
    pub number: u32,
    /// Payload
    pub value: WireValue<'a>,
}

impl<'a> Field<'a> {
    /// Length-delimited payload as UTF-8
    ///
    /// Returns `Ok(None)` when the field has another wire type.
    pub fn as_str(&self) -> Result<Option<&'a str>, DecodeError> {
        match self.value {
            WireValue::LengthDelimited(bytes) => std::str::from_utf8(bytes)
                .map(Some)
                .map_err(|_| DecodeError::InvalidUtf8 {
                    field_number: self.number,
                }),
            _ => Ok(None),
        }
    }
}

/// Iterator over the fields of one encoded message
///
/// Yields `Err` once and then stops when the input is malformed.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
    failed: bool,
}

impl<'a> WireReader<'a> {
    /// Reader over the fields of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            failed: false,
        }
    }

    fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let start = self.pos;
        let mut value: u64 = 0;
        for index in 0..MAX_VARINT_LEN {
            let byte = *self
                .buf
                .get(self.pos)
                .ok_or(DecodeError::Truncated { offset: start })?;
            self.pos += 1;
            value |= u64::from(byte & 0x7f) << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::VarintOverflow { offset: start })
    }

    fn read_fixed<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let start = self.pos;
        let bytes = self
            .buf
            .get(start..start + N)
            .ok_or(DecodeError::Truncated { offset: start })?;
        self.pos += N;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    fn read_tag(&mut self) -> Result<(u32, u8), DecodeError> {
        let offset = self.pos;
        let tag = self.read_varint()?;
        let field_number = tag >> 3;
        if field_number == 0 || field_number > u64::from(u32::MAX >> 3) {
            return Err(DecodeError::InvalidFieldNumber {
                offset,
                field_number,
            });
        }
        Ok((field_number as u32, (tag & 0x7) as u8))
    }

    fn read_field(&mut self, depth: usize) -> Result<Field<'a>, DecodeError> {
        let tag_offset = self.pos;
        let (number, wire_type) = self.read_tag()?;

        let value = match wire_type {
            WIRE_VARINT => WireValue::Varint(self.read_varint()?),
            WIRE_FIXED64 => WireValue::Fixed64(u64::from_le_bytes(self.read_fixed::<8>()?)),
            WIRE_LENGTH_DELIMITED => {
                let declared = self.read_varint()?;
                let offset = self.pos;
                let remaining = self.buf.len() - offset;
                let len = usize::try_from(declared)
                    .ok()
                    .filter(|len| *len <= remaining)
                    .ok_or(DecodeError::LengthOverflow {
                        offset,
                        declared,
                        remaining,
                    })?;
                self.pos += len;
                WireValue::LengthDelimited(&self.buf[offset..offset + len])
            }
            WIRE_START_GROUP => {
                let body_start = self.pos;
                let body_end = self.skip_group(number, tag_offset, depth + 1)?;
                WireValue::Group(&self.buf[body_start..body_end])
            }
            WIRE_END_GROUP => {
                return Err(DecodeError::UnbalancedGroup {
                    offset: tag_offset,
                    field_number: number,
                });
            }
            WIRE_FIXED32 => WireValue::Fixed32(u32::from_le_bytes(self.read_fixed::<4>()?)),
            other => {
                return Err(DecodeError::InvalidWireType {
                    offset: tag_offset,
                    wire_type: other,
                });
            }
        };

        Ok(Field { number, value })
    }

    /// Consume a group body up to its end tag
    ///
    /// Returns the offset of the end tag; the reader is left just past it.
    fn skip_group(
        &mut self,
        number: u32,
        start_offset: usize,
        depth: usize,
    ) -> Result<usize, DecodeError> {
        if depth > MAX_GROUP_DEPTH {
            return Err(DecodeError::GroupTooDeep {
                offset: start_offset,
            });
        }

        loop {
            if self.pos >= self.buf.len() {
                return Err(DecodeError::UnterminatedGroup {
                    offset: start_offset,
                    field_number: number,
                });
            }

            let tag_offset = self.pos;
            let (inner, wire_type) = self.read_tag()?;
            if wire_type == WIRE_END_GROUP {
                if inner == number {
                    return Ok(tag_offset);
                }
                return Err(DecodeError::UnbalancedGroup {
                    offset: tag_offset,
                    field_number: inner,
                });
            }

            self.pos = tag_offset;
            self.read_field(depth)?;
        }
    }
}

impl<'a> Iterator for WireReader<'a> {
    type Item = Result<Field<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.buf.len() {
            return None;
        }
        let field = self.read_field(0);
        self.failed = field.is_err();
        Some(field)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn fields(buf: &[u8]) -> Result<Vec<Field<'_>>, DecodeError> {
        WireReader::new(buf).collect()
    }

    #[test]
    fn test_reads_varint_and_string_fields() {
        let data = [
            0x0a, 0x08, b'E', b'R', b'R', b'_', b'T', b'E', b'S', b'T', // 1: "ERR_TEST"
            0x12, 0x03, b'm', b's', b'g', // 2: "msg"
            0x18, 0x05, // 3: 5
            0x20, 0x01, // 4: 1
        ];
        let fields = fields(&data).unwrap();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields[0].number, 1);
        assert_eq!(fields[0].as_str().unwrap(), Some("ERR_TEST"));
        assert_eq!(fields[1].as_str().unwrap(), Some("msg"));
        assert_eq!(fields[2].value, WireValue::Varint(5));
        assert_eq!(fields[3].value.as_bool(), Some(true));
        assert_eq!(fields[2].as_str().unwrap(), None);
    }

    #[test]
    fn test_multi_byte_varint_and_tag() {
        // field 50700, varint 300
        let data = encode::message(|out| encode::varint_field(50700, 300, out));
        let fields = fields(&data).unwrap();
        assert_eq!(fields[0].number, 50700);
        assert_eq!(fields[0].value, WireValue::Varint(300));
    }

    #[test]
    fn test_fixed_width_fields() {
        let mut data = Vec::new();
        encode::tag(7, 1, &mut data);
        data.extend_from_slice(&1u64.to_le_bytes());
        encode::tag(8, 5, &mut data);
        data.extend_from_slice(&2u32.to_le_bytes());
        let fields = fields(&data).unwrap();
        assert_eq!(fields[0].value, WireValue::Fixed64(1));
        assert_eq!(fields[1].value, WireValue::Fixed32(2));
    }

    #[test]
    fn test_declared_length_exceeds_remaining() {
        let data = [0x0a, 0x08, b'E', b'R', b'R'];
        let err = fields(&data).unwrap_err();
        assert_eq!(
            err,
            DecodeError::LengthOverflow {
                offset: 2,
                declared: 8,
                remaining: 3,
            }
        );
    }

    #[test]
    fn test_truncated_varint() {
        assert_eq!(fields(&[0x18]).unwrap_err(), DecodeError::Truncated { offset: 1 });
        assert_eq!(fields(&[0x18, 0x80]).unwrap_err(), DecodeError::Truncated { offset: 1 });
        assert_eq!(fields(&[0x80]).unwrap_err(), DecodeError::Truncated { offset: 0 });
    }

    #[test]
    fn test_truncated_fixed() {
        let mut data = Vec::new();
        encode::tag(1, 1, &mut data);
        data.extend_from_slice(&[0, 0, 0]);
        assert_eq!(fields(&data).unwrap_err(), DecodeError::Truncated { offset: 1 });
    }

    #[test]
    fn test_varint_overflow() {
        let mut data = vec![0x08];
        data.extend_from_slice(&[0xff; 11]);
        assert_eq!(fields(&data).unwrap_err(), DecodeError::VarintOverflow { offset: 1 });
    }

    #[test]
    fn test_group_is_skipped_as_one_field() {
        let data = encode::message(|out| {
            encode::tag(60000, 3, out);
            encode::varint_field(1, 7, out);
            encode::string_field(2, "inner", out);
            encode::tag(60000, 4, out);
            encode::string_field(1, "after", out);
        });
        let fields = fields(&data).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].number, 60000);
        let body = match fields[0].value {
            WireValue::Group(body) => body,
            other => panic!("expected group, got {other:?}"),
        };
        assert_eq!(WireReader::new(body).count(), 2);
        assert_eq!(fields[0].value.as_bytes(), None);
        assert_eq!(fields[1].as_str().unwrap(), Some("after"));
    }

    #[test]
    fn test_nested_groups() {
        let data = encode::message(|out| {
            encode::tag(5, 3, out);
            encode::tag(6, 3, out);
            encode::varint_field(1, 1, out);
            encode::tag(6, 4, out);
            encode::tag(5, 4, out);
            encode::varint_field(2, 2, out);
        });
        let fields = fields(&data).unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[1].value, WireValue::Varint(2));
    }

    #[test]
    fn test_unbalanced_groups() {
        // end tag with no start
        assert_eq!(
            fields(&[0x0c]).unwrap_err(),
            DecodeError::UnbalancedGroup {
                offset: 0,
                field_number: 1,
            }
        );

        // group 1 closed by field 2's end tag
        let data = encode::message(|out| {
            encode::tag(1, 3, out);
            encode::tag(2, 4, out);
        });
        assert_eq!(
            fields(&data).unwrap_err(),
            DecodeError::UnbalancedGroup {
                offset: 1,
                field_number: 2,
            }
        );

        // never closed
        let data = encode::message(|out| {
            encode::tag(1, 3, out);
            encode::varint_field(2, 1, out);
        });
        assert_eq!(
            fields(&data).unwrap_err(),
            DecodeError::UnterminatedGroup {
                offset: 0,
                field_number: 1,
            }
        );
    }

    #[test]
    fn test_group_depth_limit() {
        let data = encode::message(|out| {
            for _ in 0..=MAX_GROUP_DEPTH {
                encode::tag(1, 3, out);
            }
        });
        assert!(matches!(
            fields(&data).unwrap_err(),
            DecodeError::GroupTooDeep { .. }
        ));
    }

    #[test]
    fn test_rejects_reserved_wire_types_and_field_zero() {
        assert!(matches!(
            fields(&[0x0e]).unwrap_err(),
            DecodeError::InvalidWireType { wire_type: 6, .. }
        ));
        assert!(matches!(
            fields(&[0x0f]).unwrap_err(),
            DecodeError::InvalidWireType { wire_type: 7, .. }
        ));
        assert!(matches!(
            fields(&[0x00, 0x01]).unwrap_err(),
            DecodeError::InvalidFieldNumber { field_number: 0, .. }
        ));
    }

    #[test]
    fn test_reader_stops_after_error() {
        let mut reader = WireReader::new(&[0x0f, 0x08, 0x01]);
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_invalid_utf8() {
        let data = encode::message(|out| encode::bytes_field(1, &[0xff, 0xfe], out));
        let fields = fields(&data).unwrap();
        assert_eq!(
            fields[0].as_str().unwrap_err(),
            DecodeError::InvalidUtf8 { field_number: 1 }
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(fields(&[]).unwrap().is_empty());
    }
}

//! Bit-field decoding of packed detector cell identifiers.
//!
//! Encoding strings follow the LCIO `BitField64` grammar: a comma separated
//! list of `name:width` or `name:offset:width` entries, least significant bits
//! first. A negative width marks a two's-complement signed field.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, NtupError};

fn decode_error(code: &str, message: impl Into<String>, encoding: &str) -> NtupError {
    NtupError::Decode(ErrorInfo::new(code, message).with_context("encoding", encoding))
}

/// A single named field inside a 64-bit cell identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitFieldSpec {
    /// Field name.
    pub name: String,
    /// Offset of the least significant bit.
    pub offset: u32,
    /// Number of bits.
    pub width: u32,
    /// Whether the field holds a signed value.
    pub signed: bool,
}

impl BitFieldSpec {
    fn mask(&self) -> u64 {
        if self.width >= 64 {
            u64::MAX
        } else {
            ((1u64 << self.width) - 1) << self.offset
        }
    }

    /// Extracts the field value from a raw identifier.
    pub fn extract(&self, raw: u64) -> i64 {
        let bits = (raw & self.mask()) >> self.offset;
        if self.signed && self.width < 64 {
            let shift = 64 - self.width;
            ((bits << shift) as i64) >> shift
        } else {
            bits as i64
        }
    }
}

/// Subsystem and layer of a decoded hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorLayer {
    /// Detector subsystem index.
    pub system: i64,
    /// Layer index within the subsystem.
    pub layer: i64,
}

/// Decoder for one encoding string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellIdDecoder {
    encoding: String,
    fields: Vec<BitFieldSpec>,
}

impl CellIdDecoder {
    /// Parses an encoding string such as `system:5,side:-2,layer:6,module:11,sensor:8`.
    pub fn parse(encoding: &str) -> Result<Self, NtupError> {
        let mut fields: Vec<BitFieldSpec> = Vec::new();
        let mut used: u64 = 0;
        let mut next_offset: u32 = 0;

        for entry in encoding.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let parts: Vec<&str> = entry.split(':').map(str::trim).collect();
            let (name, offset, raw_width) = match parts.as_slice() {
                [name, width] => (*name, next_offset, *width),
                [name, offset, width] => {
                    let offset = offset.parse::<u32>().map_err(|_| {
                        decode_error("bad_offset", format!("invalid offset in '{entry}'"), encoding)
                    })?;
                    (*name, offset, *width)
                }
                _ => {
                    return Err(decode_error(
                        "bad_field",
                        format!("cannot parse field '{entry}'"),
                        encoding,
                    ))
                }
            };
            let width = raw_width.parse::<i32>().map_err(|_| {
                decode_error("bad_width", format!("invalid width in '{entry}'"), encoding)
            })?;
            if name.is_empty() {
                return Err(decode_error("empty_name", "field name is empty", encoding));
            }
            if fields.iter().any(|field| field.name == name) {
                return Err(decode_error(
                    "duplicate_field",
                    format!("field '{name}' declared twice"),
                    encoding,
                ));
            }
            let signed = width < 0;
            let width = width.unsigned_abs();
            if width == 0 || offset.checked_add(width).map_or(true, |end| end > 64) {
                return Err(decode_error(
                    "field_out_of_range",
                    format!("field '{name}' does not fit in 64 bits"),
                    encoding,
                ));
            }
            let spec = BitFieldSpec {
                name: name.to_string(),
                offset,
                width,
                signed,
            };
            if used & spec.mask() != 0 {
                return Err(decode_error(
                    "overlapping_field",
                    format!("field '{name}' overlaps a previous field"),
                    encoding,
                ));
            }
            used |= spec.mask();
            next_offset = offset + width;
            fields.push(spec);
        }

        if fields.is_empty() {
            return Err(decode_error("empty_encoding", "encoding declares no fields", encoding));
        }
        Ok(Self {
            encoding: encoding.to_string(),
            fields,
        })
    }

    /// Returns the encoding string this decoder was built from.
    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    /// Returns the parsed field layout.
    pub fn fields(&self) -> &[BitFieldSpec] {
        &self.fields
    }

    /// Returns the value of the field `name` inside `cell_id`.
    pub fn field(&self, cell_id: u64, name: &str) -> Result<i64, NtupError> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .map(|field| field.extract(cell_id))
            .ok_or_else(|| {
                NtupError::Decode(
                    ErrorInfo::new("unknown_field", "field not declared by encoding")
                        .with_context("encoding", self.encoding.as_str())
                        .with_context("field", name),
                )
            })
    }

    /// Decodes every field of `cell_id`.
    pub fn decode(&self, cell_id: u64) -> BTreeMap<String, i64> {
        self.fields
            .iter()
            .map(|field| (field.name.clone(), field.extract(cell_id)))
            .collect()
    }

    /// Decodes the `system` and `layer` fields.
    pub fn detector_layer(&self, cell_id: u64) -> Result<DetectorLayer, NtupError> {
        Ok(DetectorLayer {
            system: self.field(cell_id, "system")?,
            layer: self.field(cell_id, "layer")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_offsets_are_respected() {
        let decoder = CellIdDecoder::parse("system:0:5,layer:8:4").unwrap();
        let raw = (3u64 << 8) | 7;
        assert_eq!(decoder.field(raw, "system").unwrap(), 7);
        assert_eq!(decoder.field(raw, "layer").unwrap(), 3);
    }

    #[test]
    fn full_width_field_extracts_everything() {
        let decoder = CellIdDecoder::parse("all:64").unwrap();
        assert_eq!(decoder.field(u64::MAX, "all").unwrap(), -1);
    }
}

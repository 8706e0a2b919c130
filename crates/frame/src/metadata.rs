//! Generic key/value metadata blob carried by versioned frame headers

// crate modules
use crate::cursor::ByteCursor;
use crate::error::{Error, Result};

// external crates
use serde::Serialize;

/// Metadata key holding the polynomial order of the frame's DG data
pub const KEY_POLY_ORDER: &str = "polyOrder";

/// Metadata key holding the basis family name of the frame's DG data
pub const KEY_BASIS_TYPE: &str = "basisType";

/// A single metadata value
///
/// The blob is self-describing, with each entry carrying a type tag of 0
/// (integer), 1 (real), or 2 (string).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MetaValue {
    /// Signed 64-bit integer entry
    Int(i64),
    /// 64-bit real entry
    Real(f64),
    /// Length-prefixed UTF-8 string entry
    Str(String),
}

/// Key/value metadata parsed from a versioned frame header
///
/// Recognised keys are surfaced through typed accessors, everything else
/// passes through unchanged in file order for downstream tooling.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    /// Parse `size` bytes of metadata entries from the cursor
    ///
    /// Each entry is `key_len:u64`, the UTF-8 key bytes, `tag:u64`, then the
    /// tagged value. Strings are length-prefixed the same way as keys.
    pub(crate) fn from_cursor(cursor: &mut ByteCursor, size: usize) -> Result<Self> {
        let mut blob = ByteCursor::new(cursor.read_bytes(size)?);
        let mut entries = Vec::new();

        while !blob.is_empty() {
            let key = read_string(&mut blob)?;
            let value = match blob.read_u64()? {
                0 => MetaValue::Int(blob.read_u64()? as i64),
                1 => MetaValue::Real(blob.read_f64()?),
                2 => MetaValue::Str(read_string(&mut blob)?),
                tag => {
                    return Err(Error::Metadata(format!(
                        "unknown value tag {tag} for key \"{key}\""
                    )))
                }
            };
            entries.push((key, value));
        }

        Ok(Self { entries })
    }

    /// Append an entry, keeping insertion order
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        self.entries.push((key.into(), value));
    }

    /// Look up an entry by key
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries
            .iter()
            .find_map(|(k, v)| (k == key).then_some(v))
    }

    /// Polynomial order of the DG data, if recorded
    pub fn poly_order(&self) -> Option<usize> {
        match self.get(KEY_POLY_ORDER)? {
            MetaValue::Int(p) if *p >= 0 => Some(*p as usize),
            _ => None,
        }
    }

    /// Name of the basis family, if recorded
    pub fn basis_type(&self) -> Option<&str> {
        match self.get(KEY_BASIS_TYPE)? {
            MetaValue::Str(name) => Some(name),
            _ => None,
        }
    }

    /// Number of entries in the blob
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the blob held no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in file order
    pub fn iter(&self) -> impl Iterator<Item = &(String, MetaValue)> {
        self.entries.iter()
    }
}

/// Length-prefixed UTF-8 string
fn read_string(cursor: &mut ByteCursor) -> Result<String> {
    let length = cursor.read_u64()? as usize;
    let bytes = cursor.read_bytes(length)?;
    String::from_utf8(bytes.to_vec()).map_err(|e| Error::Metadata(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_string(buffer: &mut Vec<u8>, s: &str) {
        buffer.extend((s.len() as u64).to_le_bytes());
        buffer.extend(s.as_bytes());
    }

    fn blob() -> Vec<u8> {
        let mut buffer = Vec::new();
        push_string(&mut buffer, "polyOrder");
        buffer.extend(0u64.to_le_bytes());
        buffer.extend(2u64.to_le_bytes());
        push_string(&mut buffer, "basisType");
        buffer.extend(2u64.to_le_bytes());
        push_string(&mut buffer, "serendipity");
        push_string(&mut buffer, "tEnd");
        buffer.extend(1u64.to_le_bytes());
        buffer.extend(12.5f64.to_le_bytes());
        buffer
    }

    #[test]
    fn recognised_keys_are_typed() {
        let bytes = blob();
        let mut cursor = ByteCursor::new(&bytes);
        let metadata = Metadata::from_cursor(&mut cursor, bytes.len()).unwrap();

        assert_eq!(metadata.poly_order(), Some(2));
        assert_eq!(metadata.basis_type(), Some("serendipity"));
    }

    #[test]
    fn unrecognised_keys_pass_through() {
        let bytes = blob();
        let mut cursor = ByteCursor::new(&bytes);
        let metadata = Metadata::from_cursor(&mut cursor, bytes.len()).unwrap();

        assert_eq!(metadata.len(), 3);
        assert_eq!(metadata.get("tEnd"), Some(&MetaValue::Real(12.5)));
        assert_eq!(metadata.get("missing"), None);
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut buffer = Vec::new();
        push_string(&mut buffer, "weird");
        buffer.extend(9u64.to_le_bytes());
        let mut cursor = ByteCursor::new(&buffer);
        assert!(Metadata::from_cursor(&mut cursor, buffer.len()).is_err());
    }
}

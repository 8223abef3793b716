//! Keys and values crossing the low-level storage boundary.

use serde::{Deserialize, Serialize};

use crate::error::{LevelError, LevelResult};

/// A key or value as the host hands it over: text or raw bytes.
///
/// The map underneath stores strings only. Bytes are decoded as UTF-8 on the
/// way in and anything else is rejected, so binary payloads that are not
/// valid UTF-8 cannot be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slice {
    Str(String),
    Bytes(Vec<u8>),
}

impl Slice {
    /// Decode into the string form stored in the map.
    pub fn into_string(self) -> LevelResult<String> {
        match self {
            Slice::Str(s) => Ok(s),
            Slice::Bytes(b) => {
                String::from_utf8(b).map_err(|e| LevelError::Encoding(e.to_string()))
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Slice::Str(s) => s.as_bytes(),
            Slice::Bytes(b) => b,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Slice::Str(s) => s.into_bytes(),
            Slice::Bytes(b) => b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

impl From<&str> for Slice {
    fn from(s: &str) -> Self {
        Slice::Str(s.to_string())
    }
}

impl From<String> for Slice {
    fn from(s: String) -> Self {
        Slice::Str(s)
    }
}

impl From<&[u8]> for Slice {
    fn from(b: &[u8]) -> Self {
        Slice::Bytes(b.to_vec())
    }
}

impl From<Vec<u8>> for Slice {
    fn from(b: Vec<u8>) -> Self {
        Slice::Bytes(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_bytes_decode() {
        let slice = Slice::from("héllo".as_bytes());
        assert_eq!(slice.into_string().unwrap(), "héllo");
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let slice = Slice::from(vec![0xff, 0xfe, 0x00]);
        let err = slice.into_string().unwrap_err();
        assert!(matches!(err, LevelError::Encoding(_)));
    }

    #[test]
    fn test_json_shapes() {
        let s: Slice = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(s, Slice::Str("abc".into()));
        let b: Slice = serde_json::from_str("[104, 105]").unwrap();
        assert_eq!(b, Slice::Bytes(b"hi".to_vec()));
        assert_eq!(b.into_string().unwrap(), "hi");
    }
}

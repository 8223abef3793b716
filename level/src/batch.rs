//! Batch operations as submitted by the host, and what came of them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::slice::Slice;

/// One batch entry in the host's loose shape:
/// `{"type": "put", "key": "a", "value": "1"}` or `{"type": "del", "key": "b"}`.
///
/// Every field is optional so malformed entries still deserialize and can be
/// reported instead of failing the whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawBatchOp {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<Slice>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Slice>,
}

impl RawBatchOp {
    pub fn put(key: impl Into<Slice>, value: impl Into<Slice>) -> Self {
        Self {
            kind: Some("put".into()),
            key: Some(key.into()),
            value: Some(value.into()),
        }
    }

    pub fn del(key: impl Into<Slice>) -> Self {
        Self {
            kind: Some("del".into()),
            key: Some(key.into()),
            value: None,
        }
    }
}

/// A validated batch entry, ready for the map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BatchOp {
    Put { key: String, value: String },
    Del { key: String },
}

impl BatchOp {
    pub(crate) fn parse(raw: Option<RawBatchOp>) -> Result<BatchOp, SkipReason> {
        let raw = raw.ok_or(SkipReason::Missing)?;
        let kind = raw.kind.ok_or(SkipReason::MissingType)?;
        let key = || -> Result<String, SkipReason> {
            raw.key
                .clone()
                .ok_or(SkipReason::MissingKey)?
                .into_string()
                .map_err(|e| SkipReason::Encoding(e.to_string()))
        };
        match kind.as_str() {
            "put" => {
                let value = raw
                    .value
                    .clone()
                    .ok_or(SkipReason::MissingValue)?
                    .into_string()
                    .map_err(|e| SkipReason::Encoding(e.to_string()))?;
                Ok(BatchOp::Put { key: key()?, value })
            }
            "del" => Ok(BatchOp::Del { key: key()? }),
            _ => Err(SkipReason::UnknownType(kind)),
        }
    }
}

/// Why a batch entry was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The slot held no operation at all.
    Missing,
    MissingType,
    UnknownType(String),
    MissingKey,
    /// A `put` without a value.
    MissingValue,
    Encoding(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Missing => write!(f, "missing operation"),
            SkipReason::MissingType => write!(f, "missing operation type"),
            SkipReason::UnknownType(t) => write!(f, "unknown operation type {t:?}"),
            SkipReason::MissingKey => write!(f, "missing key"),
            SkipReason::MissingValue => write!(f, "put without value"),
            SkipReason::Encoding(e) => write!(f, "{e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedOp {
    /// Position of the entry in the submitted batch.
    pub index: usize,
    pub reason: SkipReason,
}

/// Outcome of a batch that completed without a map error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Number of operations sent to the map.
    pub applied: usize,
    pub skipped: Vec<SkippedOp>,
}

impl BatchReport {
    /// True when every submitted entry was applied.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}
